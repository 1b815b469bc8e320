//! Inbound webhook listener.
//!
//! The listener acknowledges every delivery immediately with a fixed
//! response; processing happens on a single worker thread fed by a
//! channel, so notifications are handled one at a time, start to finish.
//! The acknowledgement never reflects the processing outcome.

use crate::api::TodoistApi;
use crate::events::Dispatcher;
use crate::types::Event;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Configuration for the webhook server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on, all interfaces.
    pub port: u16,
}

impl ServerConfig {
    /// Create config for the given port.
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

/// Run the webhook server until ctrl-c.
///
/// Events are queued onto an unbounded channel and drained by a dedicated
/// worker thread owning the dispatcher, which is the serialization point
/// the rest of the system relies on. Worker failures are logged, never
/// returned to the webhook caller.
pub async fn run<A>(config: ServerConfig, mut dispatcher: Dispatcher<A>) -> Result<()>
where
    A: TodoistApi + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();

    let worker = std::thread::spawn(move || {
        while let Some(event) = rx.blocking_recv() {
            if let Err(e) = dispatcher.handle(&event) {
                log::error!("failed to process {}: {}", event.event_name, e);
            }
        }
    });

    let app = Router::new().route("/webhook", post(webhook)).with_state(tx);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    log::info!("listening for webhooks on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            log::info!("shutting down");
        })
        .await
        .context("Webhook server error")?;

    // Serve dropped the queue's last sender on shutdown; the worker
    // drains whatever is left and exits.
    if worker.join().is_err() {
        log::error!("worker thread panicked");
    }
    Ok(())
}

async fn webhook(
    State(tx): State<mpsc::UnboundedSender<Event>>,
    Json(event): Json<Event>,
) -> (StatusCode, &'static str) {
    log::info!("received event: {}", event.event_name);
    // A closed channel means shutdown is in progress; the delivery is
    // acknowledged either way.
    tx.send(event).ok();
    (StatusCode::OK, "Webhook received")
}
