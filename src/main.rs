use clap::{Parser, Subcommand};
use docflow::middleware::cors::apply_cors;
use docflow::{config::Config, routes::create_router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docflow", version, about = "Document intent classification pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print recent store contents for debugging
    CheckDb {
        /// Maximum number of agent records to print
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docflow=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Connect to database
    let pool = docflow::db::create_pool(&config.database).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(pool, config).await,
        Command::CheckDb { limit } => check_db(&pool, limit).await,
    }
}

async fn serve(pool: sqlx::SqlitePool, config: Config) -> anyhow::Result<()> {
    info!("Configuration loaded: {:?}", config.server);

    // Create shared state
    let state = docflow::AppState {
        pool,
        config: config.clone(),
    };

    // Create router
    let app = apply_cors(create_router(state), &config.server.cors_allowed_origins);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn check_db(pool: &sqlx::SqlitePool, limit: i64) -> anyhow::Result<()> {
    use docflow::db::operations::DatabaseOperations;

    let stats = DatabaseOperations::get_stats(pool).await?;
    println!("Documents: {}", stats.total_documents);
    for (status, count) in &stats.by_status {
        println!("  status {status}: {count}");
    }
    for (intent, count) in &stats.by_intent {
        println!("  intent {intent}: {count}");
    }

    let rows = DatabaseOperations::list_agent_data(pool, limit).await?;
    println!("\nFound {} agent records:", rows.len());
    for row in rows {
        println!("\nRecord #{} ({})", row.id, row.processed_at);
        println!("  file: {}", row.file_name);
        println!("  intent: {}", row.intent);
        println!("  agent: {}", row.agent_type);
        println!("  status: {}", row.status);
        if row.requires_followup {
            println!(
                "  follow-up: {}",
                row.followup_notes.unwrap_or_else(|| "(no notes)".into())
            );
        }
        println!("  data: {}", serde_json::to_string_pretty(&row.data)?);
    }

    Ok(())
}
