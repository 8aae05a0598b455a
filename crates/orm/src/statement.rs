//! CRUD statement synthesis.

use std::fmt;

use sea_query::{Alias, Expr, SimpleExpr};
use serde::Serialize;

use crate::query::AnsiBuilder;
use crate::schema::{EntityDescriptor, TypeRef};

/// The kind of SQL command a statement executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlCommandType {
    /// `INSERT`
    Insert,
    /// `SELECT`
    Select,
    /// `UPDATE`
    Update,
    /// `DELETE`
    Delete,
}

impl fmt::Display for SqlCommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Insert => "INSERT",
            Self::Select => "SELECT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        };
        f.write_str(kind)
    }
}

/// Which type a statement's parameter object has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// The whole entity.
    Entity,
    /// The primary key alone.
    PrimaryKey,
}

/// The four synthesized operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CrudOperation {
    /// Insert a full row.
    Insert,
    /// Select a row by primary key.
    FindById,
    /// Update every non-key column by primary key.
    UpdateById,
    /// Delete a row by primary key.
    DeleteById,
}

impl CrudOperation {
    /// Every operation, in registration order.
    pub const ALL: [Self; 4] = [Self::Insert, Self::FindById, Self::UpdateById, Self::DeleteById];

    /// Operation name used as the statement identifier suffix.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::FindById => "findById",
            Self::UpdateById => "updateById",
            Self::DeleteById => "deleteById",
        }
    }

    /// The SQL command executed by the operation.
    #[must_use]
    pub const fn command_type(self) -> SqlCommandType {
        match self {
            Self::Insert => SqlCommandType::Insert,
            Self::FindById => SqlCommandType::Select,
            Self::UpdateById => SqlCommandType::Update,
            Self::DeleteById => SqlCommandType::Delete,
        }
    }

    /// The operation's parameter object.
    #[must_use]
    pub const fn parameter(self) -> ParameterKind {
        match self {
            Self::Insert | Self::UpdateById => ParameterKind::Entity,
            Self::FindById | Self::DeleteById => ParameterKind::PrimaryKey,
        }
    }

    /// Whether the operation yields well-formed SQL for the entity.
    ///
    /// `updateById` needs at least one non-key column to assign.
    #[must_use]
    pub fn applies_to(self, descriptor: &EntityDescriptor) -> bool {
        match self {
            Self::UpdateById => !descriptor.update_assignments().is_empty(),
            Self::Insert | Self::FindById | Self::DeleteById => true,
        }
    }

    /// Builds the operation's statement for an entity.
    #[must_use]
    pub fn synthesize(self, descriptor: &EntityDescriptor) -> SynthesizedStatement {
        let sql = match self {
            Self::Insert => insert_sql(descriptor),
            Self::FindById => find_by_id_sql(descriptor),
            Self::UpdateById => update_by_id_sql(descriptor),
            Self::DeleteById => delete_by_id_sql(descriptor),
        };
        let parameter_type = match self.parameter() {
            ParameterKind::Entity => descriptor.entity_type().clone(),
            ParameterKind::PrimaryKey => descriptor.primary_key_type().clone(),
        };
        let id = descriptor.statement_id(self.name());

        tracing::debug!(
            statement_id = %id,
            table = descriptor.table(),
            sql = %sql,
            "CrudOperation generated SQL"
        );

        SynthesizedStatement {
            id,
            operation: self,
            sql,
            command_type: self.command_type(),
            parameter_type,
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// SQL text plus the metadata needed to register it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedStatement {
    /// `<namespace>.<operation>`
    pub id: String,
    /// The operation that produced the statement.
    pub operation: CrudOperation,
    /// Statement text with `#{field}` parameter markers.
    pub sql: String,
    /// The SQL command kind.
    pub command_type: SqlCommandType,
    /// The parameter object's type.
    pub parameter_type: TypeRef,
}

fn marker(token: String) -> SimpleExpr {
    Expr::cust(token)
}

fn primary_condition(descriptor: &EntityDescriptor) -> SimpleExpr {
    Expr::col(Alias::new(descriptor.primary_column()))
        .eq(marker(descriptor.primary_placeholder()))
}

fn insert_sql(descriptor: &EntityDescriptor) -> String {
    let mut statement = sea_query::Query::insert();
    statement.into_table(Alias::new(descriptor.table()));
    statement.columns(descriptor.columns().into_iter().map(Alias::new));
    statement.values_panic(descriptor.value_placeholders().into_iter().map(marker));

    let (sql, _) = statement.build(AnsiBuilder::default());
    sql
}

fn find_by_id_sql(descriptor: &EntityDescriptor) -> String {
    let mut statement = sea_query::Query::select();
    statement.columns(descriptor.columns().into_iter().map(Alias::new));
    statement.from(Alias::new(descriptor.table()));
    statement.and_where(primary_condition(descriptor));

    let (sql, _) = statement.build(AnsiBuilder::default());
    sql
}

fn update_by_id_sql(descriptor: &EntityDescriptor) -> String {
    let mut statement = sea_query::Query::update();
    statement.table(Alias::new(descriptor.table()));

    for (column, token) in descriptor.update_assignments() {
        statement.value(Alias::new(column), marker(token));
    }

    statement.and_where(primary_condition(descriptor));

    let (sql, _) = statement.build(AnsiBuilder::default());
    sql
}

fn delete_by_id_sql(descriptor: &EntityDescriptor) -> String {
    let mut statement = sea_query::Query::delete();
    statement.from_table(Alias::new(descriptor.table()));
    statement.and_where(primary_condition(descriptor));

    let (sql, _) = statement.build(AnsiBuilder::default());
    sql
}
