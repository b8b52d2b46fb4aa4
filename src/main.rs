use std::{process, sync::Arc, time::Duration};

use eventdesk::{
    application::{
        admin::AdminService,
        error::AppError,
        records::RecordService,
        repos::{OwnedRecordsRepo, OwnedRecordsWriteRepo},
    },
    cache::{CacheConfig, CacheStore, MemoryCacheStore, ReadThrough},
    config,
    domain::resource::OwnedResource,
    infra::{
        db::PostgresRepositories, error::InfraError, http, http::ApiState,
        redis::RedisCacheStore, telemetry,
    },
};
use sqlx::PgPool;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_database(&settings).await?;
    PostgresRepositories::run_migrations(&pool).await?;
    let repositories = Arc::new(PostgresRepositories::new(pool));

    let cache_config = CacheConfig::from(&settings.cache);
    let cache_store = build_cache_store(&settings.cache, &cache_config).await;
    let deadline = settings.server.request_deadline;

    let state = ApiState {
        events: record_service(&repositories, cache_store.clone(), &cache_config, deadline),
        functions: record_service(&repositories, cache_store, &cache_config, deadline),
        admin: AdminService::new(
            repositories.clone(),
            repositories.clone(),
            repositories.clone(),
        ),
        health: repositories,
        admin_token: settings.admin.token.clone(),
    };

    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_database(&settings).await?;
    PostgresRepositories::run_migrations(&pool).await?;
    info!(target = "eventdesk::migrate", "Migrations applied");
    Ok(())
}

async fn connect_database(settings: &config::Settings) -> Result<PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))
}

/// Redis when configured and reachable, otherwise the in-process store.
async fn build_cache_store(
    settings: &config::CacheSettings,
    cache_config: &CacheConfig,
) -> Option<Arc<dyn CacheStore>> {
    if !cache_config.enabled {
        info!(target = "eventdesk::cache", "Cache disabled; reads go to Postgres");
        return None;
    }

    if let Some(url) = settings.redis_url.as_deref() {
        match RedisCacheStore::connect(url).await {
            Ok(store) => return Some(Arc::new(store)),
            Err(err) => warn!(
                target = "eventdesk::cache",
                error = %err,
                "Redis unavailable at startup; falling back to in-memory cache"
            ),
        }
    }

    info!(
        target = "eventdesk::cache",
        capacity = cache_config.memory_capacity,
        "Using in-memory cache"
    );
    Some(Arc::new(MemoryCacheStore::new(cache_config)))
}

fn record_service<R>(
    repositories: &Arc<PostgresRepositories>,
    cache: Option<Arc<dyn CacheStore>>,
    cache_config: &CacheConfig,
    deadline: Duration,
) -> RecordService<R>
where
    R: OwnedResource,
    PostgresRepositories: OwnedRecordsRepo<R> + OwnedRecordsWriteRepo<R>,
{
    let reads = ReadThrough::new(repositories.clone(), cache, cache_config.clone(), deadline);
    RecordService::new(Arc::new(reads), repositories.clone())
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "eventdesk::http",
        addr = %settings.server.addr,
        "Listening"
    );

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(async {
        let _ = stop_rx.await;
    });
    let mut handle = tokio::spawn(async move { server.await });

    tokio::select! {
        joined = &mut handle => return server_outcome(joined),
        () = shutdown_signal() => {}
    }

    let _ = stop_tx.send(());
    let grace = settings.server.graceful_shutdown;
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(joined) => server_outcome(joined),
        Err(_) => {
            warn!(
                target = "eventdesk::http",
                grace_secs = grace.as_secs(),
                "Graceful shutdown window elapsed; dropping open connections"
            );
            handle.abort();
            Ok(())
        }
    }
}

fn server_outcome(
    joined: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match joined {
        Ok(result) => result.map_err(|err| AppError::unexpected(format!("server error: {err}"))),
        Err(err) => Err(AppError::unexpected(format!("server task failed: {err}"))),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(target = "eventdesk::http", error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target = "eventdesk::http", "Shutdown signal received");
}
