//! CRUD statement synthesis for mapper contracts.
//!
//! Derives `insert`, `findById`, `updateById` and `deleteById` statements from
//! an entity's declared fields and registers them, at most once each, in a
//! statement registry.
//!
//! # Quick Start
//!
//! ## Define an Entity
//!
//! ```ignore
//! use kono_orm::{CrudMapper, Entity};
//!
//! #[derive(Debug, Clone, Entity)]
//! pub struct UserInfo {
//!     #[crud(primary_key)]
//!     pub id: String,
//!     pub user_name: String,
//!     pub created_at: DateTime<Utc>,
//! }
//!
//! pub struct UserInfoMapper;
//!
//! impl CrudMapper for UserInfoMapper {
//!     type Entity = UserInfo;
//!     type Key = String;
//! }
//! ```
//!
//! ## Register Statements
//!
//! ```ignore
//! use kono_orm::{Configuration, CrudProvider};
//!
//! let mut config = Configuration::from_env()?;
//! let provider = CrudProvider::new::<UserInfoMapper>()?;
//! provider.register_all(&mut config)?;
//!
//! // Registering again is a no-op that reports `AlreadyPresent` per statement.
//! let report = provider.register_all(&mut config)?;
//! assert_eq!(report.already_present(), 4);
//! ```
//!
//! The generated statements read:
//!
//! ```text
//! INSERT INTO "user_info" ("id", "user_name", "created_at") VALUES (#{id}, #{user_name}, #{created_at})
//! SELECT "id", "user_name", "created_at" FROM "user_info" WHERE "id" = #{id}
//! UPDATE "user_info" SET "user_name" = #{user_name}, "created_at" = #{created_at} WHERE "id" = #{id}
//! DELETE FROM "user_info" WHERE "id" = #{id}
//! ```
//!
//! ## Explicit Schemas
//!
//! Entities can also be described at runtime:
//!
//! ```ignore
//! use kono_orm::{EntityDescriptor, EntitySchema, TypeRef};
//!
//! let schema = EntitySchema::new(TypeRef::new("UserInfo", "app::UserInfo"))
//!     .primary_key("id", "String")
//!     .field("userName", "String");
//! let descriptor = EntityDescriptor::new("app::UserInfoMapper", schema, TypeRef::of::<String>())?;
//! let provider = CrudProvider::from_descriptor(descriptor);
//! ```

mod configuration;
mod error;
mod naming;
mod options;
mod provider;
mod query;
mod schema;
mod source;
mod statement;

pub use configuration::{
    Configuration, MappedStatement, MappedStatementBuilder, ResultMap, ResultMapping,
    StatementRegistry,
};
pub use error::{ConfigError, Result};
pub use kono_orm_macro::Entity;
pub use naming::{is_property_name, placeholder, to_column_name, to_table_name};
pub use options::{ConfigOptions, PlaceholderStyle};
pub use provider::{CrudProvider, Registration, RegistrationReport};
pub use schema::{
    CrudMapper, Entity, EntityDescriptor, EntitySchema, FieldDef, FieldDescriptor, Storage, TypeRef,
};
pub use source::{AdditionalParameters, ParameterMapping, SqlSource, SqlSourceBuilder};
pub use statement::{CrudOperation, ParameterKind, SqlCommandType, SynthesizedStatement};
