mod config;
mod db;
mod logging;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::mailer::{LogMailer, Mailer, ResendMailer};
use services::password::PasswordPolicy;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    logging::init(config.debug);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run(config: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!(max_connections = config.db_max_connections, "database ready");

    let mailer: Arc<dyn Mailer> = match (&config.resend_api_key, config.debug) {
        (Some(key), false) => Arc::new(ResendMailer::new(key, &config.email_from)),
        _ => {
            tracing::warn!("debug mode: emails are logged, not sent");
            Arc::new(LogMailer)
        }
    };
    let passwords = PasswordPolicy::new(config.password_breach_check)?;
    let state = state::AppState::new(pool, mailer, passwords, config.cookie_secure);

    let leptos_options = leptos::config::get_configuration(None)?.leptos_options;
    let app = routes::app(state, leptos_options);

    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "urlsh listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl-c handler failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
