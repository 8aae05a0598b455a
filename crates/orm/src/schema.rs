use std::any;
use std::collections::HashSet;

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::naming::{is_property_name, placeholder, to_column_name, to_table_name};

/// Trait for entities whose fields map onto table columns.
///
/// Typically implemented with `#[derive(Entity)]` rather than by hand.
///
/// # Examples
///
/// ```ignore
/// #[derive(Entity)]
/// pub struct UserInfo {
///     #[crud(primary_key)]
///     pub id: i64,
///     pub user_name: String,
/// }
/// ```
pub trait Entity {
    /// The entity's simple type name, e.g. `UserInfo`.
    const NAME: &'static str;

    /// Explicit table name. When `None` the table is derived from [`Self::NAME`].
    const TABLE: Option<&'static str> = None;

    /// Declared fields, in declaration order.
    fn fields() -> &'static [FieldDef];

    /// Fully qualified type path, used in diagnostics.
    #[must_use]
    fn type_path() -> &'static str {
        any::type_name::<Self>()
    }
}

/// Mapper contract binding one entity type to one primary-key type.
///
/// ```ignore
/// pub struct UserInfoMapper;
///
/// impl CrudMapper for UserInfoMapper {
///     type Entity = UserInfo;
///     type Key = i64;
/// }
/// ```
pub trait CrudMapper {
    /// The row-shape type.
    type Entity: Entity;

    /// The primary key's type.
    type Key;

    /// Namespace prefixed to every statement identifier.
    #[must_use]
    fn namespace() -> &'static str {
        any::type_name::<Self>()
    }
}

/// Whether a declared field belongs to instances or to the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Storage {
    /// Per-row field, mapped to a column.
    Instance,
    /// Type-level field (an associated constant or static). Never a column.
    Associated,
}

/// Static field metadata emitted by `#[derive(Entity)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Program-level field name.
    pub name: &'static str,
    /// Declared type, as written.
    pub type_name: &'static str,
    /// Set for the field tagged as primary key.
    pub primary_key: bool,
    /// Instance or associated storage.
    pub storage: Storage,
}

impl FieldDef {
    /// An ordinary column field.
    #[must_use]
    pub const fn column(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            primary_key: false,
            storage: Storage::Instance,
        }
    }

    /// The column field tagged as primary key.
    #[must_use]
    pub const fn primary_key(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            primary_key: true,
            storage: Storage::Instance,
        }
    }

    /// A type-level field that is not mapped to a column.
    #[must_use]
    pub const fn associated(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            primary_key: false,
            storage: Storage::Associated,
        }
    }
}

/// A type's simple name and full path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeRef {
    /// Simple name, e.g. `UserInfo` or `Option<i64>`.
    pub name: String,
    /// Full path, e.g. `app::model::UserInfo`.
    pub path: String,
}

impl TypeRef {
    /// Creates a type reference from explicit parts.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Describes `T` using [`std::any::type_name`].
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::from_path(any::type_name::<T>())
    }

    /// Builds a type reference from a full path, deriving the simple name by
    /// dropping the module prefix of the outer type.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let outer_len = path.find('<').unwrap_or(path.len());
        let (outer, generics) = path.split_at(outer_len);
        let simple = outer.rsplit("::").next().unwrap_or(outer);
        Self::new(format!("{simple}{generics}"), path)
    }
}

/// An owned field descriptor (name + declared type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Program-level field name, used in placeholders.
    pub name: String,
    /// Declared type, as written.
    pub type_name: String,
    /// Set for the field tagged as primary key.
    pub primary_key: bool,
    /// Instance or associated storage.
    pub storage: Storage,
}

impl FieldDescriptor {
    /// The field's column name.
    #[must_use]
    pub fn column(&self) -> String {
        to_column_name(&self.name)
    }
}

impl From<&FieldDef> for FieldDescriptor {
    fn from(def: &FieldDef) -> Self {
        Self {
            name: def.name.to_owned(),
            type_name: def.type_name.to_owned(),
            primary_key: def.primary_key,
            storage: def.storage,
        }
    }
}

/// Explicit, runtime-declared entity metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    entity: TypeRef,
    table: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl EntitySchema {
    /// Starts an empty schema for the named entity type.
    #[must_use]
    pub const fn new(entity: TypeRef) -> Self {
        Self {
            entity,
            table: None,
            fields: Vec::new(),
        }
    }

    /// Reads the schema from an [`Entity`] implementation.
    #[must_use]
    pub fn of<E: Entity>() -> Self {
        Self {
            entity: TypeRef::new(E::NAME, E::type_path()),
            table: E::TABLE.map(ToOwned::to_owned),
            fields: E::fields().iter().map(FieldDescriptor::from).collect(),
        }
    }

    /// Overrides the derived table name.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Declares a column field.
    #[must_use]
    pub fn field(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.push(name.into(), type_name.into(), false, Storage::Instance)
    }

    /// Declares the column field tagged as primary key.
    #[must_use]
    pub fn primary_key(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.push(name.into(), type_name.into(), true, Storage::Instance)
    }

    /// Declares a type-level field that is skipped when mapping columns.
    #[must_use]
    pub fn associated(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.push(name.into(), type_name.into(), false, Storage::Associated)
    }

    fn push(
        mut self, name: String, type_name: String, primary_key: bool, storage: Storage,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            type_name,
            primary_key,
            storage,
        });
        self
    }

    /// The entity type.
    #[must_use]
    pub const fn entity(&self) -> &TypeRef {
        &self.entity
    }

    /// All declared fields, associated ones included.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// Derived, cached metadata for one mapper contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDescriptor {
    namespace: String,
    entity_type: TypeRef,
    primary_key_type: TypeRef,
    column_fields: Vec<FieldDescriptor>,
    identifier: FieldDescriptor,
    table: String,
}

impl EntityDescriptor {
    /// Introspects the mapper contract `M`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the entity has no primary key, more
    /// than one primary key, a duplicated or malformed field name, or an
    /// empty table name.
    pub fn of<M: CrudMapper>() -> Result<Self> {
        Self::new(
            M::namespace(),
            EntitySchema::of::<M::Entity>(),
            TypeRef::of::<M::Key>(),
        )
    }

    /// Builds a descriptor from an explicit schema and key type.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the entity has no primary key, more
    /// than one primary key, a duplicated or malformed field name, or an
    /// empty table name.
    pub fn new(
        namespace: impl Into<String>, schema: EntitySchema, primary_key_type: TypeRef,
    ) -> Result<Self> {
        let EntitySchema {
            entity,
            table,
            fields,
        } = schema;

        if let Some(bad) = fields.iter().find(|field| !is_property_name(&field.name)) {
            return Err(ConfigError::InvalidFieldName {
                entity: entity.path.clone(),
                field: bad.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        if let Some(dup) = fields.iter().find(|field| !seen.insert(field.name.as_str())) {
            return Err(ConfigError::DuplicateField {
                entity: entity.path.clone(),
                field: dup.name.clone(),
            });
        }

        let column_fields: Vec<FieldDescriptor> =
            fields.into_iter().filter(|field| field.storage == Storage::Instance).collect();

        let mut keys = column_fields.iter().filter(|field| field.primary_key);
        let identifier = match (keys.next(), keys.next()) {
            (Some(key), None) => key.clone(),
            (None, _) => {
                return Err(ConfigError::MissingPrimaryKey {
                    entity: entity.path,
                });
            }
            (Some(_), Some(_)) => {
                return Err(ConfigError::AmbiguousPrimaryKey {
                    fields: column_fields
                        .iter()
                        .filter(|field| field.primary_key)
                        .map(|field| field.name.clone())
                        .collect(),
                    entity: entity.path,
                });
            }
        };

        let table = table.unwrap_or_else(|| to_table_name(&entity.name));
        if table.is_empty() {
            return Err(ConfigError::EmptyTableName {
                entity: entity.path,
            });
        }

        let descriptor = Self {
            namespace: namespace.into(),
            entity_type: entity,
            primary_key_type,
            column_fields,
            identifier,
            table,
        };

        tracing::debug!(
            namespace = %descriptor.namespace,
            entity = %descriptor.entity_type.path,
            table = %descriptor.table,
            identifier = %descriptor.identifier.name,
            column_count = descriptor.column_fields.len(),
            "EntityDescriptor derived"
        );

        Ok(descriptor)
    }

    /// Namespace prefixed to statement identifiers.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The entity type.
    #[must_use]
    pub const fn entity_type(&self) -> &TypeRef {
        &self.entity_type
    }

    /// The primary key's type.
    #[must_use]
    pub const fn primary_key_type(&self) -> &TypeRef {
        &self.primary_key_type
    }

    /// Column fields in declaration order.
    #[must_use]
    pub fn column_fields(&self) -> &[FieldDescriptor] {
        &self.column_fields
    }

    /// The primary-key field.
    #[must_use]
    pub const fn identifier(&self) -> &FieldDescriptor {
        &self.identifier
    }

    /// The table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The primary key's column name.
    #[must_use]
    pub fn primary_column(&self) -> String {
        self.identifier.column()
    }

    /// The primary key's placeholder token, e.g. `#{id}`.
    #[must_use]
    pub fn primary_placeholder(&self) -> String {
        placeholder(&self.identifier.name)
    }

    /// The `pk_col = #{pkField}` condition, unquoted.
    #[must_use]
    pub fn primary_condition(&self) -> String {
        format!("{} = {}", self.primary_column(), self.primary_placeholder())
    }

    /// Column names for every column field.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.column_fields.iter().map(FieldDescriptor::column).collect()
    }

    /// Placeholder tokens for every column field, aligned with [`Self::columns`].
    #[must_use]
    pub fn value_placeholders(&self) -> Vec<String> {
        self.column_fields.iter().map(|field| placeholder(&field.name)).collect()
    }

    /// `(column, placeholder)` pairs for every non-key column field.
    #[must_use]
    pub fn update_assignments(&self) -> Vec<(String, String)> {
        self.column_fields
            .iter()
            .filter(|field| field.name != self.identifier.name)
            .map(|field| (field.column(), placeholder(&field.name)))
            .collect()
    }

    /// Statement identifier `<namespace>.<operation>`.
    #[must_use]
    pub fn statement_id(&self, operation: &str) -> String {
        format!("{}.{operation}", self.namespace)
    }
}
