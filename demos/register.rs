//! Registers the CRUD statements for a `UserInfo` mapper and prints them.
//!
//! ```sh
//! RUST_LOG=debug KONO_ORM_PLACEHOLDER='$' cargo run -p demos --bin register
//! ```

use anyhow::Result;
use chrono::{DateTime, Utc};
use kono_orm::{Configuration, CrudMapper, CrudProvider, Entity};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

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
}

fn main() -> Result<()> {
    Registry::default().with(EnvFilter::from_default_env()).with(fmt::layer()).init();

    let mut config = Configuration::from_env()?;
    let provider = CrudProvider::new::<UserInfoMapper>()?;

    provider.register_all(&mut config)?;

    // second pass only reports what is already there
    let report = provider.register_all(&mut config)?;
    tracing::info!(already_present = report.already_present(), "second registration pass");

    for statement in config.mapped_statements() {
        println!("{}", serde_json::to_string_pretty(statement)?);
    }

    Ok(())
}
