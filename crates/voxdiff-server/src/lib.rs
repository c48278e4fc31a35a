//! HTTP server assembly
//!
//! Wires the chat and transcription endpoints, the health check and the
//! CORS and tracing layers from a validated [`Config`].

mod cors;
mod health;

use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use tower_http::trace::TraceLayer;
use voxdiff_chat::ChatService;
use voxdiff_config::Config;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// The Whisper engine is not loaded here, only on the first `/stt` call.
    ///
    /// # Errors
    ///
    /// Returns an error if the language model or speech clients cannot be
    /// constructed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let model = voxdiff_llm::build_model(&config.llm)?;

        let speech = if config.speech_enabled() {
            Some(tts::build_chain(&config.tts)?)
        } else {
            tracing::info!(protocol = ?config.chat.protocol, "speech synthesis disabled");
            None
        };

        let chat = Arc::new(ChatService::new(model, speech, config.chat.protocol));

        let mut app = Router::new().merge(voxdiff_chat::endpoint_router().with_state(chat));

        if config.stt.enabled {
            app = app.merge(stt::endpoint_router().with_state(stt::build_transcriber(&config.stt)));
        }

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.layer(TraceLayer::new_for_http());

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address: config.server.listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Override the listen address, e.g. from the command line
    #[must_use]
    pub fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn server(extra: &str) -> Server {
        let raw = format!("[llm]\napi_key = \"test-key\"\n[tts]\nenabled = false\n{extra}");
        Server::new(&Config::from_toml(&raw).unwrap()).unwrap()
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = get(server("").into_router(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn health_path_is_configurable() {
        let router = server("[server.health]\npath = \"/healthz\"").into_router();

        assert_eq!(get(router.clone(), "/healthz").await.0, StatusCode::OK);
        assert_eq!(get(router, "/health").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn disabled_stt_has_no_route() {
        let router = server("[stt]\nenabled = false").into_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/stt")
                    .header(http::header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"audioBase64":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let response = server("")
            .into_router()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/chat")
                    .header(http::header::ORIGIN, "vscode-webview://panel")
                    .header(http::header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(http::header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[test]
    fn default_listen_address() {
        let server = server("");
        assert_eq!(server.listen_address(), voxdiff_config::DEFAULT_LISTEN_ADDRESS);

        let addr: SocketAddr = "0.0.0.0:9000".parse().unwrap();
        assert_eq!(server.with_listen_address(addr).listen_address(), addr);
    }
}
