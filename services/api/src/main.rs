use std::{env, sync::Arc};

use anyhow::Result;
use common::{
    database::{health_check, init_pool, run_migrations},
    storage::{MemoryStorage, ObjectStorage, S3Storage, StorageKind},
    store::Backend,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use api::{
    auth::{self, AdminAuth},
    config::{AppConfig, BackendKind},
    rate_limiter::RateLimiter,
    repositories::Repositories,
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // `api hash-password <password>` prints a PHC string for `admin.password_hash`
    let mut args = env::args().skip(1);
    if args.next().as_deref() == Some("hash-password") {
        let password = args
            .next()
            .ok_or_else(|| anyhow::anyhow!("usage: api hash-password <password>"))?;
        let hash = auth::hash_password(&password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        println!("{hash}");
        return Ok(());
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting wedding films API");

    let config = AppConfig::load()?;

    let storage: Arc<dyn ObjectStorage> = match config.storage.kind {
        StorageKind::S3 => Arc::new(S3Storage::from_config(&config.storage).await),
        StorageKind::Memory => {
            warn!("Using in-memory video storage; uploads are lost on restart");
            Arc::new(MemoryStorage::new(config.storage.public_base_url.clone()))
        }
    };

    let backend = match config.backend.kind {
        BackendKind::Postgres => {
            let pool = init_pool(&config.database).await?;

            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            if config.database.run_migrations {
                run_migrations(&pool).await?;
                info!("Migrations applied");
            }
            Backend::postgres(pool, storage)
        }
        BackendKind::Memory => {
            warn!("Using in-memory record store; data is lost on restart");
            Backend::in_memory(storage)
        }
    };

    let repositories = Repositories::new(backend);
    let auth = AdminAuth::new(&config.admin);
    let login_limiter = RateLimiter::new(config.admin.login.clone());
    let state = AppState::new(repositories, auth, login_limiter);

    let app = routes::create_router(state, config.server.upload_limit_bytes);

    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    info!("API listening on {}", config.server.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
