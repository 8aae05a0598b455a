//! Statement registry contract and its in-memory implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::options::{ConfigOptions, PlaceholderStyle};
use crate::schema::TypeRef;
use crate::source::{AdditionalParameters, SqlSource, SqlSourceBuilder};
use crate::statement::SqlCommandType;

/// Host registry that mapped statements are committed to.
///
/// Registration is expected to happen once at startup from a single thread;
/// the `&mut self` receiver on [`Self::add_mapped_statement`] makes the
/// caller hold the only writer.
pub trait StatementRegistry {
    /// Whether a statement with this identifier is already registered.
    fn has_statement(&self, id: &str) -> bool;

    /// Parses statement text into the registry's executable form.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement text cannot be parsed.
    fn parse_sql_source(
        &self, sql: &str, parameter_type: &TypeRef, additional: &AdditionalParameters,
    ) -> Result<SqlSource>;

    /// Commits a statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be stored.
    fn add_mapped_statement(&mut self, statement: MappedStatement) -> Result<()>;
}

/// A column to property mapping inside a [`ResultMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultMapping {
    /// Entity property.
    pub property: String,
    /// Result set column.
    pub column: String,
}

/// Describes how result rows are turned into values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultMap {
    /// Result map identifier.
    pub id: String,
    /// Type rows are materialized into.
    pub result_type: TypeRef,
    /// Explicit mappings. Empty for inline maps, which rely on auto-mapping.
    pub mappings: Vec<ResultMapping>,
}

impl ResultMap {
    /// The inline result map `<statement_id>-Inline` with no explicit mappings.
    #[must_use]
    pub fn inline(statement_id: &str, result_type: TypeRef) -> Self {
        Self {
            id: format!("{statement_id}-Inline"),
            result_type,
            mappings: Vec::new(),
        }
    }
}

/// An executable statement held by a registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedStatement {
    /// Globally unique statement identifier.
    pub id: String,
    /// Parsed statement source.
    pub sql_source: SqlSource,
    /// SQL command kind.
    pub command_type: SqlCommandType,
    /// Result maps applied to returned rows.
    pub result_maps: Vec<ResultMap>,
}

impl MappedStatement {
    /// Starts building a statement.
    #[must_use]
    pub fn builder(
        id: impl Into<String>, sql_source: SqlSource, command_type: SqlCommandType,
    ) -> MappedStatementBuilder {
        MappedStatementBuilder {
            statement: Self {
                id: id.into(),
                sql_source,
                command_type,
                result_maps: Vec::new(),
            },
        }
    }
}

/// Builder for [`MappedStatement`].
pub struct MappedStatementBuilder {
    statement: MappedStatement,
}

impl MappedStatementBuilder {
    /// Sets the result maps.
    #[must_use]
    pub fn result_maps(mut self, result_maps: Vec<ResultMap>) -> Self {
        self.statement.result_maps = result_maps;
        self
    }

    /// Finishes the statement.
    #[must_use]
    pub fn build(self) -> MappedStatement {
        self.statement
    }
}

/// In-memory [`StatementRegistry`].
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    source_builder: SqlSourceBuilder,
    statements: BTreeMap<String, MappedStatement>,
    result_maps: BTreeMap<String, ResultMap>,
}

impl Configuration {
    /// Creates an empty registry emitting the given placeholder style.
    #[must_use]
    pub fn new(style: PlaceholderStyle) -> Self {
        Self {
            source_builder: SqlSourceBuilder::new(style),
            ..Self::default()
        }
    }

    /// Creates an empty registry from options.
    ///
    /// # Errors
    ///
    /// Returns an error if the options carry an unsupported placeholder.
    pub fn with_options(options: &ConfigOptions) -> Result<Self> {
        Ok(Self::new(options.placeholder_style()?))
    }

    /// Creates an empty registry from options in the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the options cannot be loaded or are invalid.
    pub fn from_env() -> Result<Self> {
        let options = ConfigOptions::load()?;
        Self::with_options(&options).context("issue configuring statement registry")
    }

    /// Looks up a statement by identifier.
    #[must_use]
    pub fn mapped_statement(&self, id: &str) -> Option<&MappedStatement> {
        self.statements.get(id)
    }

    /// Registered statement identifiers, in sorted order.
    pub fn mapped_statement_names(&self) -> impl Iterator<Item = &str> {
        self.statements.keys().map(String::as_str)
    }

    /// Registered statements, sorted by identifier.
    pub fn mapped_statements(&self) -> impl Iterator<Item = &MappedStatement> {
        self.statements.values()
    }

    /// Looks up a result map by identifier.
    #[must_use]
    pub fn result_map(&self, id: &str) -> Option<&ResultMap> {
        self.result_maps.get(id)
    }

    /// Number of registered statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether no statement is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl StatementRegistry for Configuration {
    fn has_statement(&self, id: &str) -> bool {
        self.statements.contains_key(id)
    }

    fn parse_sql_source(
        &self, sql: &str, parameter_type: &TypeRef, additional: &AdditionalParameters,
    ) -> Result<SqlSource> {
        self.source_builder.parse(sql, parameter_type, additional)
    }

    fn add_mapped_statement(&mut self, statement: MappedStatement) -> Result<()> {
        if self.statements.contains_key(&statement.id) {
            bail!("mapped statement `{}` already exists", statement.id);
        }

        for result_map in &statement.result_maps {
            self.result_maps.entry(result_map.id.clone()).or_insert_with(|| result_map.clone());
        }
        self.statements.insert(statement.id.clone(), statement);
        Ok(())
    }
}
