//! Common test helpers shared across integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use kono_orm::{CrudMapper, Entity, EntitySchema, TypeRef};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

// Common test entities used across multiple test files

#[derive(Debug, Clone, Entity)]
pub struct UserInfo {
    #[crud(primary_key)]
    pub id: String,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

pub struct UserInfoMapper;

impl CrudMapper for UserInfoMapper {
    type Entity = UserInfo;
    type Key = String;

    fn namespace() -> &'static str {
        "app.mapper.UserInfoMapper"
    }
}

#[derive(Debug, Clone, Entity)]
#[crud(table = "orders")]
pub struct PurchaseOrder {
    pub customer: String,
    #[crud(primary_key)]
    pub order_no: i64,
    pub total: f64,
}

pub struct PurchaseOrderMapper;

impl CrudMapper for PurchaseOrderMapper {
    type Entity = PurchaseOrder;
    type Key = i64;
}

#[derive(Debug, Clone, Entity)]
pub struct AuditLog {
    pub at: DateTime<Utc>,
    pub message: String,
}

pub struct AuditLogMapper;

impl CrudMapper for AuditLogMapper {
    type Entity = AuditLog;
    type Key = i64;
}

#[derive(Debug, Clone, Entity)]
pub struct Tag {
    #[crud(primary_key)]
    pub id: i64,
}

pub struct TagMapper;

impl CrudMapper for TagMapper {
    type Entity = Tag;
    type Key = i64;

    fn namespace() -> &'static str {
        "app.mapper.TagMapper"
    }
}

/// `UserInfo` declared with camel-case field names and a type-level field.
pub fn user_info_schema() -> EntitySchema {
    EntitySchema::new(TypeRef::new("UserInfo", "com.acme.model.UserInfo"))
        .associated("serialVersionUID", "u64")
        .primary_key("id", "String")
        .field("userName", "String")
        .field("createdAt", "LocalDateTime")
}

/// Normalize SQL by collapsing whitespace.
fn normalize_sql(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize SQL for comparison by removing identifier quotes and normalizing whitespace.
/// Preserves quotes inside string literals.
fn canonicalize_sql(sql: &str) -> String {
    let mut cleaned = String::with_capacity(sql.len());
    let mut in_single_quote = false;

    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_single_quote = !in_single_quote;
                cleaned.push(ch);
            }
            '"' if !in_single_quote => {
                // Strip identifier quoting to avoid brittle comparisons.
            }
            _ => cleaned.push(ch),
        }
    }

    normalize_sql(&cleaned)
}

/// Assert that two SQL strings match once identifier quotes are stripped.
#[allow(clippy::missing_panics_doc)]
pub fn assert_sql_eq(actual: &str, expected: &str) {
    assert_eq!(canonicalize_sql(actual), canonicalize_sql(expected), "raw SQL: {actual}");
}

/// Counts `WARN` events emitted while installed.
#[derive(Clone, Default)]
pub struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
