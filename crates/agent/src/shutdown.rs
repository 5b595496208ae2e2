use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Create a `CancellationToken` and spawn a task that cancels it on
/// SIGINT or SIGTERM. Clones of the token are handed to every pipeline
/// stage so each can drain and stop on its own schedule.
pub fn create_shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let signal = shutdown_signal().await;
        info!(signal, "shutdown signal received");
        token_clone.cancel();
    });

    token
}

/// Wait for the first SIGINT or SIGTERM and name which one arrived.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
