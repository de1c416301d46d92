//! HTTP query service
//!
//! Exposes the record store over two routes:
//! - `GET /api/medicines` lists every record
//! - `POST /api/medicines` inserts one record unless the name exists

pub mod handlers;
pub mod response;

use crate::config::{default_max_body_bytes, ServerConfig};
use crate::error::Result;
use crate::store::MedicineStore;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MedicineStore>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn MedicineStore>) -> Self {
        Self {
            store,
            max_body_bytes: default_max_body_bytes(),
        }
    }

    pub fn with_config(store: Arc<dyn MedicineStore>, config: &ServerConfig) -> Self {
        Self {
            store,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/medicines",
            get(handlers::list_medicines).post(handlers::create_medicine),
        )
        .layer(from_fn(cors_middleware))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}

/// Any origin may call the API; preflight requests are answered directly.
async fn cors_middleware(req: Request<Body>, next: Next) -> Response {
    let mut resp = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    let headers = resp.headers_mut();
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type"),
    );
    resp
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Server running on http://{}", addr);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received");
}
