//! Service entry-point: loads configuration, wires adapters, serves HTTP and
//! runs the outbox dispatcher until shutdown.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authgate::adapters::auth::{Argon2PasswordHasher, JwtTokenService};
use authgate::adapters::email::{LogEmailSender, ResendConfig, ResendEmailSender};
use authgate::adapters::events::{EventRegistry, OutboxDispatcher, OutboxDispatcherConfig};
use authgate::adapters::http::{app_router, AuthHandlers};
use authgate::adapters::memory::InMemoryStore;
use authgate::adapters::postgres::{
    self, PostgresOutboxStore, PostgresTransactionFactory, PostgresUserReader,
};
use authgate::application::{
    LoginHandler, RegisterHandler, SendValidationEmailHandler, ValidateEmailHandler,
};
use authgate::config::{AppConfig, StorageBackend};
use authgate::domain::events::EventKind;
use authgate::ports::{
    EmailSender, OutboxStore, PasswordHasher, TokenService, TransactionFactory, UserReader,
};

/// Persistence ports backed by one storage engine.
struct Storage {
    transactions: Arc<dyn TransactionFactory>,
    users: Arc<dyn UserReader>,
    outbox: Arc<dyn OutboxStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(config.is_production());
    config.validate()?;

    let storage = open_storage(&config).await?;

    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new(
        config.auth.argon2_memory_kib,
        config.auth.argon2_iterations,
        config.auth.argon2_parallelism,
    )?);
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl(),
    ));
    let email = email_sender(&config)?;

    let registry = EventRegistry::new().subscribe(
        EventKind::UserCreated,
        Arc::new(SendValidationEmailHandler::new(
            storage.users.clone(),
            tokens.clone(),
            email,
            config.server.public_base_url.clone(),
        )),
    );

    let mut dispatcher_config =
        OutboxDispatcherConfig::default().with_poll_interval(config.outbox.poll_interval());
    if let Some(size) = config.outbox.batch_size {
        dispatcher_config = dispatcher_config.with_batch_size(size);
    }
    if let Some(attempts) = config.outbox.max_attempts {
        dispatcher_config = dispatcher_config.with_max_attempts(attempts);
    }
    let dispatcher = OutboxDispatcher::with_config(
        storage.outbox.clone(),
        Arc::new(registry),
        dispatcher_config,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let dispatcher_task = tokio::spawn(async move { dispatcher.run(shutdown_rx).await });

    let handlers = AuthHandlers::new(
        Arc::new(RegisterHandler::new(
            storage.transactions.clone(),
            hasher.clone(),
            tokens.clone(),
        )),
        Arc::new(LoginHandler::new(storage.users.clone(), hasher, tokens.clone())),
        Arc::new(ValidateEmailHandler::new(storage.transactions, tokens)),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app_router(handlers, config.server.request_timeout()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped, draining outbox");
    let _ = shutdown_tx.send(true);
    if let Err(e) = dispatcher_task.await {
        warn!(error = %e, "Outbox dispatcher task ended abnormally");
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,authgate=debug,sqlx=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing init failed: {}", e);
    }
}

async fn open_storage(config: &AppConfig) -> Result<Storage, Box<dyn std::error::Error>> {
    if config.database.backend() == StorageBackend::Memory {
        warn!("No database configured, keeping state in memory");
        let store = InMemoryStore::new();
        return Ok(Storage {
            transactions: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            outbox: Arc::new(store),
        });
    }

    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
        info!("Database migrations applied");
    }

    Ok(Storage {
        transactions: Arc::new(PostgresTransactionFactory::new(pool.clone())),
        users: Arc::new(PostgresUserReader::new(pool.clone())),
        outbox: Arc::new(PostgresOutboxStore::new(pool)),
    })
}

fn email_sender(config: &AppConfig) -> Result<Arc<dyn EmailSender>, Box<dyn std::error::Error>> {
    let Some(api_key) = config.email.api_key() else {
        warn!("No Resend API key configured, validation emails will only be logged");
        return Ok(Arc::new(LogEmailSender));
    };

    let resend = ResendConfig::new(api_key, config.email.from_header())
        .with_base_url(config.email.api_base_url.clone());
    Ok(Arc::new(ResendEmailSender::new(resend)?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
