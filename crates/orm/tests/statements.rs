//! Integration tests for CRUD statement synthesis.
//!
//! Tests the public API as users would interact with it.

#![allow(missing_docs)]

mod common;

use common::{PurchaseOrderMapper, TagMapper, UserInfoMapper, assert_sql_eq, user_info_schema};
use kono_orm::{
    CrudOperation, CrudProvider, EntityDescriptor, EntitySchema, ParameterKind, SqlCommandType,
    TypeRef,
};

fn camel_case_provider() -> CrudProvider {
    let descriptor = EntityDescriptor::new(
        "com.acme.mapper.UserInfoMapper",
        user_info_schema(),
        TypeRef::of::<String>(),
    )
    .unwrap();
    CrudProvider::from_descriptor(descriptor)
}

#[test]
fn insert() {
    let provider = camel_case_provider();
    let statement = provider.statement(CrudOperation::Insert);

    assert_eq!(statement.id, "com.acme.mapper.UserInfoMapper.insert");
    assert_eq!(statement.command_type, SqlCommandType::Insert);
    assert_sql_eq(
        &statement.sql,
        "INSERT INTO user_info (id, user_name, created_at) VALUES (#{id}, #{userName}, #{createdAt})",
    );
}

#[test]
fn insert_columns_align_with_placeholders() {
    let descriptor = camel_case_provider().descriptor().clone();
    let columns = descriptor.columns();
    let placeholders = descriptor.value_placeholders();

    assert_eq!(columns.len(), 3);
    assert_eq!(placeholders.len(), 3);
    for (field, (column, placeholder)) in
        descriptor.column_fields().iter().zip(columns.iter().zip(&placeholders))
    {
        assert_eq!(column, &field.column());
        assert_eq!(placeholder, &format!("#{{{}}}", field.name));
    }
}

#[test]
fn find_by_id() {
    let statement = camel_case_provider().statement(CrudOperation::FindById);

    assert_eq!(statement.id, "com.acme.mapper.UserInfoMapper.findById");
    assert_eq!(statement.command_type, SqlCommandType::Select);
    assert_sql_eq(
        &statement.sql,
        "SELECT id, user_name, created_at FROM user_info WHERE id = #{id}",
    );
}

#[test]
fn update_by_id() {
    let provider = camel_case_provider();
    let statement = provider.statement(CrudOperation::UpdateById);

    assert_eq!(statement.command_type, SqlCommandType::Update);
    assert_sql_eq(
        &statement.sql,
        "UPDATE user_info SET user_name = #{userName}, created_at = #{createdAt} WHERE id = #{id}",
    );

    let assignments = provider.descriptor().update_assignments();
    assert_eq!(assignments.len(), 2);
    assert!(assignments.iter().all(|(column, placeholder)| column != "id" && placeholder != "#{id}"));
}

#[test]
fn delete_by_id() {
    let statement = camel_case_provider().statement(CrudOperation::DeleteById);

    assert_eq!(statement.command_type, SqlCommandType::Delete);
    assert_sql_eq(&statement.sql, "DELETE FROM user_info WHERE id = #{id}");
}

#[test]
fn identifiers_are_quoted() {
    let statement = camel_case_provider().statement(CrudOperation::DeleteById);
    assert_eq!(statement.sql, r#"DELETE FROM "user_info" WHERE "id" = #{id}"#);
}

#[test]
fn parameter_types() {
    let provider = CrudProvider::new::<UserInfoMapper>().unwrap();
    let entity = provider.descriptor().entity_type().clone();
    let key = TypeRef::of::<String>();

    for statement in provider.statements() {
        let expected = match statement.operation.parameter() {
            ParameterKind::Entity => &entity,
            ParameterKind::PrimaryKey => &key,
        };
        assert_eq!(&statement.parameter_type, expected, "{}", statement.id);
    }

    assert_eq!(provider.statement(CrudOperation::Insert).parameter_type, entity);
    assert_eq!(provider.statement(CrudOperation::UpdateById).parameter_type, entity);
    assert_eq!(provider.statement(CrudOperation::FindById).parameter_type, key);
    assert_eq!(provider.statement(CrudOperation::DeleteById).parameter_type, key);
}

#[test]
fn statements_in_registration_order() {
    let provider = CrudProvider::new::<UserInfoMapper>().unwrap();
    let ids: Vec<_> = provider.statements().into_iter().map(|s| s.id).collect();
    assert_eq!(
        ids,
        [
            "app.mapper.UserInfoMapper.insert",
            "app.mapper.UserInfoMapper.findById",
            "app.mapper.UserInfoMapper.updateById",
            "app.mapper.UserInfoMapper.deleteById",
        ]
    );
}

#[test]
fn derived_entity_statements() {
    let provider = CrudProvider::new::<PurchaseOrderMapper>().unwrap();

    assert_sql_eq(
        &provider.statement(CrudOperation::Insert).sql,
        "INSERT INTO orders (customer, order_no, total) VALUES (#{customer}, #{order_no}, #{total})",
    );
    assert_sql_eq(
        &provider.statement(CrudOperation::UpdateById).sql,
        "UPDATE orders SET customer = #{customer}, total = #{total} WHERE order_no = #{order_no}",
    );
}

#[test]
fn reserved_word_table() {
    let schema = EntitySchema::new(TypeRef::new("Order", "app::Order"))
        .primary_key("id", "i64")
        .field("placedAt", "i64");
    let descriptor = EntityDescriptor::new("app::OrderMapper", schema, TypeRef::of::<i64>()).unwrap();
    let statement = CrudOperation::FindById.synthesize(&descriptor);

    assert_eq!(statement.sql, r#"SELECT "id", "placed_at" FROM "order" WHERE "id" = #{id}"#);
}

#[test]
fn key_only_entity_statements() {
    let provider = CrudProvider::new::<TagMapper>().unwrap();
    let operations: Vec<_> = provider.statements().into_iter().map(|s| s.operation).collect();

    assert_eq!(
        operations,
        [CrudOperation::Insert, CrudOperation::FindById, CrudOperation::DeleteById]
    );
    assert!(provider.descriptor().update_assignments().is_empty());
}
