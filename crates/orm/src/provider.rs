use anyhow::{Context, Result};
use serde::Serialize;
use tracing::instrument;

use crate::configuration::{MappedStatement, ResultMap, StatementRegistry};
use crate::error;
use crate::schema::{CrudMapper, EntityDescriptor};
use crate::source::AdditionalParameters;
use crate::statement::{CrudOperation, SynthesizedStatement};

/// Outcome of registering one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Registration {
    /// The statement was added to the registry.
    Inserted,
    /// A statement with the same identifier was already registered; nothing changed.
    AlreadyPresent,
    /// The operation has no well-formed SQL for the entity and was not registered.
    Skipped,
}

/// Per-statement outcomes of [`CrudProvider::register_all`], in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationReport {
    /// `(statement id, outcome)` pairs.
    pub entries: Vec<(String, Registration)>,
}

impl RegistrationReport {
    /// Number of statements added.
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.count(Registration::Inserted)
    }

    /// Number of statements skipped because they were already registered.
    #[must_use]
    pub fn already_present(&self) -> usize {
        self.count(Registration::AlreadyPresent)
    }

    /// Number of operations skipped because they do not apply to the entity.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(Registration::Skipped)
    }

    fn count(&self, outcome: Registration) -> usize {
        self.entries.iter().filter(|(_, registration)| *registration == outcome).count()
    }
}

/// Synthesizes and registers the CRUD statements of one mapper contract.
#[derive(Debug, Clone)]
pub struct CrudProvider {
    descriptor: EntityDescriptor,
}

impl CrudProvider {
    /// Introspects the mapper contract `M`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::ConfigError) if the entity declaration is unusable.
    pub fn new<M: CrudMapper>() -> error::Result<Self> {
        Ok(Self::from_descriptor(EntityDescriptor::of::<M>()?))
    }

    /// Wraps an already derived descriptor.
    #[must_use]
    pub const fn from_descriptor(descriptor: EntityDescriptor) -> Self {
        Self { descriptor }
    }

    /// The introspected entity metadata.
    #[must_use]
    pub const fn descriptor(&self) -> &EntityDescriptor {
        &self.descriptor
    }

    /// Synthesizes one operation's statement.
    #[must_use]
    pub fn statement(&self, operation: CrudOperation) -> SynthesizedStatement {
        operation.synthesize(&self.descriptor)
    }

    /// Synthesizes the statement of every applicable operation, in registration order.
    #[must_use]
    pub fn statements(&self) -> Vec<SynthesizedStatement> {
        CrudOperation::ALL
            .into_iter()
            .filter(|operation| operation.applies_to(&self.descriptor))
            .map(|operation| self.statement(operation))
            .collect()
    }

    /// Registers insert, findById, updateById and deleteById, in that order.
    ///
    /// Safe to call repeatedly: statements already present are skipped.
    /// `updateById` is reported as [`Registration::Skipped`] for entities
    /// with no column besides the primary key.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry fails to parse or store a statement.
    #[instrument(skip_all, fields(namespace = %self.descriptor.namespace()))]
    pub fn register_all<R>(&self, registry: &mut R) -> Result<RegistrationReport>
    where
        R: StatementRegistry + ?Sized,
    {
        let mut report = RegistrationReport::default();
        for operation in CrudOperation::ALL {
            if !operation.applies_to(&self.descriptor) {
                let id = self.descriptor.statement_id(operation.name());
                tracing::warn!(statement_id = %id, "no columns to update, statement skipped");
                report.entries.push((id, Registration::Skipped));
                continue;
            }
            let statement = self.statement(operation);
            let id = statement.id.clone();
            let registration = self.register(registry, statement)?;
            report.entries.push((id, registration));
        }

        tracing::info!(
            inserted = report.inserted(),
            already_present = report.already_present(),
            skipped = report.skipped(),
            "CRUD statements registered"
        );

        Ok(report)
    }

    /// Registers a single synthesized statement unless its identifier is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry fails to parse or store the statement.
    pub fn register<R>(
        &self, registry: &mut R, statement: SynthesizedStatement,
    ) -> Result<Registration>
    where
        R: StatementRegistry + ?Sized,
    {
        let SynthesizedStatement {
            id,
            sql,
            command_type,
            parameter_type,
            ..
        } = statement;

        if registry.has_statement(&id) {
            tracing::warn!(statement_id = %id, "statement has been registered");
            return Ok(Registration::AlreadyPresent);
        }

        let sql_source = registry
            .parse_sql_source(&sql, &parameter_type, &AdditionalParameters::new())
            .with_context(|| format!("issue parsing SQL for statement `{id}`"))?;
        let result_maps = vec![ResultMap::inline(&id, self.descriptor.entity_type().clone())];
        let mapped = MappedStatement::builder(id.clone(), sql_source, command_type)
            .result_maps(result_maps)
            .build();

        registry
            .add_mapped_statement(mapped)
            .with_context(|| format!("issue adding statement `{id}`"))?;

        tracing::debug!(statement_id = %id, command = %command_type, "statement registered");
        Ok(Registration::Inserted)
    }
}
