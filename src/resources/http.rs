use super::AppContext;
use crate::app::Listener;
use crate::error::ResourceError;
use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Liveness report served at `/health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub debug: bool,
    pub bot: bool,
    pub database: bool,
    pub cache: bool,
}

/// Build the site's router over the shared collaborators
pub fn router(context: AppContext) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(context)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

async fn health_handler(State(context): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: context.started_at,
        debug: context.debug,
        bot: context.bot.is_logged_in(),
        database: context.database.is_connected(),
        cache: context.cache.is_connected(),
    })
}

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

/// HTTP listener serving the site's routes
pub struct HttpServer {
    context: AppContext,
    running: Mutex<Option<RunningServer>>,
}

impl HttpServer {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            running: Mutex::new(None),
        }
    }

    /// Address actually bound, once started
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .lock()
            .await
            .as_ref()
            .map(|server| server.local_addr)
    }
}

#[async_trait]
impl Listener for HttpServer {
    async fn start(&self, host: &str, port: u16) -> Result<(), ResourceError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(ResourceError::listener("HTTP server is already running"));
        }

        let addr = format!("{}:{}", host, port);
        info!("Creating webserver on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let app = router(self.context.clone());
        let signal = shutdown.clone();

        // Bind errors surface above; the accept loop runs in the background
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.cancelled().await })
                .await
        });

        info!("Server started - http://{}:{}/", host, local_addr.port());

        *running = Some(RunningServer {
            local_addr,
            shutdown,
            task,
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), ResourceError> {
        let server = self.running.lock().await.take();
        let Some(server) = server else {
            debug!("HTTP server not running");
            return Ok(());
        };

        info!("Closing webserver on {}", server.local_addr);
        server.shutdown.cancel();

        match server.task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!("HTTP server error: {}", e);
                Err(e.into())
            }
            Err(e) => Err(ResourceError::listener(format!(
                "HTTP server task failed: {}",
                e
            ))),
        }
    }
}
