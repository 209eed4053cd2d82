use dotenvy::dotenv;
use prodtrack::{app, seeds};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// `--force-all` re-runs every seed, `--force <version>` re-runs one.
fn rerun_from_args(args: &[String]) -> seeds::Rerun {
    if args.iter().any(|a| a == "--force-all") {
        return seeds::Rerun::All;
    }
    args.iter()
        .position(|a| a == "--force")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse::<i64>().ok())
        .map(seeds::Rerun::Version)
        .unwrap_or_default()
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_PKG_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = app::config::Config::from_env()
        .expect("Failed to load config (check DATABASE_URL and other env vars)");

    let _db_lock = match app::single_writer::acquire(&config.database_url) {
        Ok(guard) => guard,
        Err(msg) => {
            tracing::error!("{}", msg);
            std::process::exit(1);
        }
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await
        .expect("Failed to set busy timeout");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let args: Vec<String> = env::args().collect();
    if let Err(err) = seeds::run_seeds(&pool, &seeds::all_seeds(), rerun_from_args(&args)).await {
        tracing::error!(%err, "seeding failed");
        std::process::exit(1);
    }
}
