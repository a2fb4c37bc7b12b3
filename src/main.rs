use axum::Router;
use clap::Parser;
use quartet::{calculator, config::AppKind, db, landing, quiz, todo, AppState, Config};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quartet", about = "Serve one of the four web apps")]
struct Cli {
    /// Which app to serve
    #[arg(value_enum)]
    app: AppKind,

    /// Port to listen on (default 5000, or PORT from the environment)
    #[arg(short, long)]
    port: Option<u16>,

    /// Sqlite database URL (default is a per-app file in the working directory)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.app, cli.port, cli.database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await?;
    db::init_schema(config.app, &db_pool).await?;

    if config.app == AppKind::Quiz {
        quiz::seed::seed_if_empty(&db_pool).await?;
    }

    let bind_addr = config.bind_addr.clone();
    let app_name = config.app.name();
    let app_state = AppState { db_pool, config: config.clone() };

    let app: Router = match config.app {
        AppKind::Landing => landing::router().with_state(app_state),
        AppKind::Calculator => calculator::router().with_state(app_state),
        AppKind::Quiz => {
            let session_store = MemoryStore::default();
            let session_layer = SessionManagerLayer::new(session_store)
                .with_secure(false)
                .with_same_site(SameSite::Lax)
                .with_expiry(Expiry::OnInactivity(time::Duration::hours(24)));

            quiz::router()
                .with_state(app_state)
                .layer(session_layer)
                .layer(CorsLayer::permissive())
        }
        AppKind::Todo => todo::router().with_state(app_state),
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("serving {app_name} on {bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
