pub mod dev_workspace;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::app::error::AppError;

/// Tracking table for applied seeds. Separate from sqlx's own migration table.
pub const SEEDS_TABLE: &str = "_prodtrack_seeds";

/// Outcome of running a seed. Skipped seeds are not recorded so they may run again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Seed executed and made changes; recorded in `_prodtrack_seeds`.
    Applied,
    /// Seed chose not to run (e.g. env not set); not recorded.
    Skipped,
}

/// A database seed. Seeds run in version order and are tracked for idempotency.
#[async_trait]
pub trait Seed: Send + Sync {
    /// Unique version identifier (timestamp format: YYYYMMDDHHMMSS).
    fn version(&self) -> i64;

    fn description(&self) -> &str;

    /// Execute the seed through the db layer.
    /// Return Skipped when the seed opts out; it will not be recorded.
    async fn run(&self, pool: &SqlitePool) -> Result<SeedOutcome, AppError>;
}

/// Which already-applied seeds to run again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rerun {
    #[default]
    None,
    All,
    Version(i64),
}

impl Rerun {
    fn includes(self, version: i64) -> bool {
        match self {
            Rerun::None => false,
            Rerun::All => true,
            Rerun::Version(v) => v == version,
        }
    }
}

/// All seeds in execution order (sorted by version).
pub fn all_seeds() -> Vec<Box<dyn Seed>> {
    let mut seeds: Vec<Box<dyn Seed>> = vec![Box::new(dev_workspace::DevWorkspace::from_env())];
    seeds.sort_by_key(|s| s.version());
    seeds
}

/// Run every pending seed in `seeds`, plus any already-applied ones selected by `rerun`.
pub async fn run_seeds(
    pool: &SqlitePool,
    seeds: &[Box<dyn Seed>],
    rerun: Rerun,
) -> Result<(), AppError> {
    ensure_seeds_table(pool).await?;
    let applied = applied_versions(pool).await?;

    for seed in seeds {
        let version = seed.version();
        let description = seed.description();
        let already_applied = applied.contains(&version);

        if already_applied && !rerun.includes(version) {
            tracing::info!(seed = description, "skipping seed (already applied)");
            continue;
        }
        if already_applied {
            forget_seed(pool, version).await?;
        }

        tracing::info!(seed = description, version, "running seed");
        match seed.run(pool).await? {
            SeedOutcome::Applied => {
                record_seed(pool, version, description).await?;
                tracing::info!(seed = description, "seed applied");
            }
            SeedOutcome::Skipped => {
                tracing::info!(seed = description, "seed skipped (conditions not met)");
            }
        }
    }
    Ok(())
}

async fn ensure_seeds_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {SEEDS_TABLE} (
            version INTEGER PRIMARY KEY NOT NULL,
            description TEXT NOT NULL,
            installed_on INTEGER NOT NULL DEFAULT (unixepoch()),
            success INTEGER NOT NULL DEFAULT 1
        )
        "#
    ))
    .execute(pool)
    .await?;
    Ok(())
}

/// Versions recorded in the tracking table.
pub async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!("SELECT version FROM {SEEDS_TABLE}"))
        .fetch_all(pool)
        .await
}

async fn record_seed(pool: &SqlitePool, version: i64, description: &str) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        "INSERT INTO {SEEDS_TABLE} (version, description) VALUES (?, ?)"
    ))
    .bind(version)
    .bind(description)
    .execute(pool)
    .await?;
    Ok(())
}

async fn forget_seed(pool: &SqlitePool, version: i64) -> Result<(), sqlx::Error> {
    sqlx::query(&format!("DELETE FROM {SEEDS_TABLE} WHERE version = ?"))
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}
