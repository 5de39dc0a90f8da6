use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use linkhop_cache::BoundedCache;
use linkhop_core::Repository;
use linkhop_gateway::{telemetry, App, AppState, Config, StorageBackendArg};
use linkhop_generator::Base62Generator;
use linkhop_ratelimit::FixedWindowLimiter;
use linkhop_redirector::RedirectorService;
use linkhop_shortener::ShortenerService;
use linkhop_storage::{InMemoryRepository, PgRepository, PoolSettings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    telemetry::init(config.log_format).context("failed to install tracing subscriber")?;
    config.validate()?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        environment = %config.environment,
        storage_backend = %config.storage,
        code_length = config.code_length,
        default_ttl_days = config.default_ttl_days,
        "starting linkhop gateway"
    );

    match config.storage {
        StorageBackendArg::InMemory => serve(&config, InMemoryRepository::new()).await,
        StorageBackendArg::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("database url is required when storage backend is postgres")?;
            let settings = PoolSettings::builder()
                .max_connections(config.db_max_connections)
                .build();
            let repository = PgRepository::connect(database_url, settings).await?;
            repository.ensure_schema().await?;
            serve(&config, repository).await
        }
    }
}

async fn serve<R: Repository>(config: &Config, repository: R) -> anyhow::Result<()> {
    let repository = Arc::new(repository);
    let cache = Arc::new(BoundedCache::new(config.cache_max_entries));
    let limiter = Arc::new(FixedWindowLimiter::new(config.rate_max_buckets));

    let shortener = ShortenerService::new(
        Arc::clone(&repository),
        Base62Generator::new(),
        config.shortener_settings()?,
    );
    let redirector = RedirectorService::new(repository, Arc::clone(&cache));

    let state = AppState::builder()
        .shortener(Arc::new(shortener))
        .redirector(Arc::new(redirector))
        .cache(cache.clone())
        .limiter(limiter)
        .policy(config.rate_limit_policy())
        .base_url(config.base_url.as_str())
        .environment(config.environment)
        .build();

    if config.cache_sweep_secs > 0 {
        spawn_cache_sweep(cache, Duration::from_secs(config.cache_sweep_secs));
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn spawn_cache_sweep(cache: Arc<BoundedCache>, every: Duration) {
    info!(interval_secs = every.as_secs(), "starting cache sweep");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            cache.purge_expired();
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
