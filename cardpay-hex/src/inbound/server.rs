//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cardpay_types::PaymentStore;

use super::handlers::{self, AppState};
use crate::PaymentService;
use crate::openapi::ApiDoc;

/// HTTP Server for the card-pay API.
pub struct HttpServer<S: PaymentStore> {
    state: Arc<AppState<S>>,
}

impl<S: PaymentStore> HttpServer<S> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: PaymentService<S>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/cards/initialize", post(handlers::initialize_cards::<S>))
            .route(
                "/api/cards/initialize-test-scenarios",
                post(handlers::initialize_scenario_cards::<S>),
            )
            .route("/api/cards/test-scenarios", get(handlers::test_scenarios))
            .route("/api/cards", post(handlers::create_card::<S>))
            .route("/api/cards", get(handlers::list_cards::<S>))
            .route("/api/cards", delete(handlers::delete_cards::<S>))
            .route("/api/cards/{card_number}", get(handlers::get_card::<S>))
            .route("/api/payments/process", post(handlers::process_payment::<S>))
            .route(
                "/api/payments/transactions",
                get(handlers::list_transactions::<S>),
            )
            .route(
                "/api/payments/transactions/{transaction_id}",
                get(handlers::get_transaction::<S>),
            )
            .route(
                "/api/payments/transactions/card/{card_number}",
                get(handlers::transactions_for_card::<S>),
            )
            .route(
                "/api/payments/refund/{transaction_id}",
                post(handlers::process_refund::<S>),
            )
            .route(
                "/api/payments/status/{transaction_id}",
                get(handlers::transaction_status::<S>),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone());

        api.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
