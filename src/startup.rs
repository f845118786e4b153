use axum::{Router, extract::Request, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    configuration::Settings,
    routes::{create_page, health_check, inventory_page, resolve},
    services::{AuthService, BackendClient, LinkService},
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub link_service: LinkService,
    pub auth_service: AuthService,
}

impl AppState {
    /// Both services talk to the same backend through one client.
    pub fn new(backend: BackendClient) -> Self {
        Self {
            link_service: LinkService::new(backend.clone()),
            auth_service: AuthService::new(backend),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health_check", get(health_check))
        .route("/create", get(create_page))
        .route("/inventory", get(inventory_page))
        .route("/{slug}", get(resolve))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "HTTP request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
        .with_state(state)
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(configuration: Settings) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&configuration.backend)?;
        tracing::info!(backend = %backend.origin(), "Using link service");

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Listening on {}", local_addr);

        Ok(Self {
            port: local_addr.port(),
            listener,
            router: router(AppState::new(backend)),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
