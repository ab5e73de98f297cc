//! StarBot server binary.
//!
//! Wires configuration, logging, the description store and its refresher,
//! the session store and its sweeper, the Gemini generator and the chat
//! HTTP API, then serves until Ctrl-C or SIGTERM.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use starbot::adapters::ai::{GeminiConfig, GeminiProvider};
use starbot::adapters::description::source_for;
use starbot::adapters::http::{build_app, ChatAppState};
use starbot::adapters::session::InMemorySessionStore;
use starbot::application::{
    ConversationEngine, DescriptionRefresher, DescriptionStore, EngineConfig, SessionSweeper,
};
use starbot::config::{AppConfig, ValidationError};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        organization = %config.persona.organization,
        environment = ?config.server.environment,
        "Starting StarBot"
    );

    // Description store; a failed first load leaves the engine answering with sentinels
    let source = source_for(&config.description.source)?;
    let descriptions = Arc::new(DescriptionStore::with_config(
        source,
        config.description.store_config(),
    ));
    if let Err(e) = descriptions.load_with_retry().await {
        tracing::warn!(error = %e, "Starting without a description; will retry on refresh");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresher = config.description.refresh_interval().map(|interval| {
        DescriptionRefresher::new(descriptions.clone())
            .with_interval(interval)
            .spawn(shutdown_rx.clone())
    });

    // Generation endpoint
    let api_key = config
        .ai
        .api_key
        .clone()
        .ok_or(ValidationError::MissingRequired("STARBOT__AI__API_KEY"))?;
    let generator = GeminiProvider::new(
        GeminiConfig::from_secret(api_key)
            .with_model(config.ai.model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries)
            .with_initial_backoff(config.ai.initial_backoff()),
    )?;

    let engine_config = EngineConfig::default()
        .with_sampling(config.ai.sampling())
        .with_safety_threshold(config.ai.safety_threshold)
        .with_generation_timeout(config.ai.exchange_timeout())
        .with_event_shortcuts(config.persona.event_shortcuts)
        .with_exemplars(config.persona.exemplars_enabled);

    let sessions = Arc::new(InMemorySessionStore::new());
    let sweeper = config.session.idle_ttl().map(|max_idle| {
        SessionSweeper::new(sessions.clone())
            .with_max_idle(max_idle)
            .with_interval(config.session.sweep_interval())
            .spawn(shutdown_rx.clone())
    });

    let engine = Arc::new(ConversationEngine::new(
        Arc::new(generator),
        descriptions,
        sessions,
        config.persona.phrases(),
        config.description.timezone()?,
        engine_config,
    ));

    let state = ChatAppState::new(engine).with_greeting(config.persona.greet);
    let app = build_app(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background work
    let _ = shutdown_tx.send(true);
    if let Some(handle) = refresher {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Description refresher ended abnormally");
        }
    }
    if let Some(handle) = sweeper {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Session sweeper ended abnormally");
        }
    }

    tracing::info!("StarBot stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise.
/// `RUST_LOG` overrides `server.log_level`.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
