//! Server initialization and main run loop

use super::config::{AppConfig, DatabaseConfig};
use super::validation::validate_production_config;
use anyhow::{Context, Result};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::any::Any;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use whiteboard_core::{DrawingController, SqliteDrawingStore};

use crate::api::{self, ApiError};

/// Open the drawing store and create its schema
pub async fn open_store(config: &DatabaseConfig) -> Result<SqliteDrawingStore> {
    let store = SqliteDrawingStore::connect(&config.url, config.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.url))?;
    info!(url = %config.url, "Drawing store initialized");
    Ok(store)
}

/// Create the schema and exit
pub async fn migrate(config: AppConfig) -> Result<()> {
    open_store(&config.database).await?;
    info!("Database schema is up to date");
    Ok(())
}

/// Build the full application router
pub fn build_app(controller: Arc<DrawingController>, config: &AppConfig) -> Router {
    let app = api::api_router(controller);

    // Compiled frontend with SPA fallback in production, JSON 404 otherwise
    let app = if config.is_production() {
        let static_dir = Path::new(&config.server.static_dir);
        info!("Serving frontend from {}", static_dir.display());
        let serve_dir = ServeDir::new(static_dir)
            .append_index_html_on_directories(true)
            .fallback(ServeFile::new(static_dir.join("index.html")));
        app.fallback_service(serve_dir)
    } else {
        app.fallback(api::route_not_found)
    };

    app.layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Request handler panicked");
    ApiError::internal().into_response()
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run(config: AppConfig) -> Result<()> {
    info!(
        "Starting Whiteboard v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );
    validate_production_config(&config);

    let store = open_store(&config.database).await?;
    let controller = Arc::new(DrawingController::new(Arc::new(store)));
    let app = build_app(controller, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Whiteboard shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;
    use whiteboard_canvas::{
        CanvasAction, CanvasConfig, ClientConfig, DrawingsClient, Mode, Whiteboard,
    };
    use whiteboard_core::{Color, NewDrawing, Point, Shape};

    async fn memory_controller() -> Arc<DrawingController> {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        Arc::new(DrawingController::new(Arc::new(
            open_store(&config).await.unwrap(),
        )))
    }

    /// Serve the real router on an ephemeral port and return its API base URL
    async fn spawn_server() -> String {
        let app = build_app(memory_controller().await, &AppConfig::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    fn client(base_url: String) -> DrawingsClient {
        DrawingsClient::new(ClientConfig {
            base_url,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = build_app(memory_controller().await, &AppConfig::default());
        let response = app
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"message":"Route not found"}"#);
    }

    #[tokio::test]
    async fn test_panic_becomes_500() {
        async fn boom() -> &'static str {
            panic!("boom")
        }

        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));
        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"message":"Internal server error"}"#);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = build_app(memory_controller().await, &AppConfig::default());
        let response = app
            .oneshot(
                Request::get("/api/drawings")
                    .header("origin", "http://elsewhere.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_production_serves_frontend_with_spa_fallback() {
        let dir = std::env::temp_dir().join(format!("whiteboard-static-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<html>board</html>").unwrap();

        let mut config = AppConfig::default();
        config.environment = "production".to_string();
        config.server.static_dir = dir.to_string_lossy().into_owned();
        let app = build_app(memory_controller().await, &config);

        let response = app
            .clone()
            .oneshot(Request::get("/drawings/123").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<html>board</html>");

        let response = app
            .oneshot(Request::get("/api/drawings").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_client_round_trip_against_server() {
        let client = client(spawn_server().await);

        let content = NewDrawing {
            name: Some("sketch".to_string()),
            shapes: vec![Shape::Circle {
                x: 10.0,
                y: 10.0,
                radius: 5.0,
                color: Color::new("#00f"),
            }],
            ..NewDrawing::default()
        };
        let created = client.create(&content).await.unwrap();
        assert_eq!(created.name.as_deref(), Some("sketch"));
        assert_eq!(created.shapes, content.shapes);

        let fetched = client.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(client.list().await.unwrap(), vec![created.clone()]);

        let message = client.delete(&created.id).await.unwrap();
        assert_eq!(message, "Drawing deleted successfully");

        let err = client.get(&created.id).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "server responded 404: Drawing not found");
    }

    #[tokio::test]
    async fn test_session_save_update_select_delete() {
        let base_url = spawn_server().await;
        let mut board = Whiteboard::new(&CanvasConfig::default(), client(base_url.clone())).unwrap();

        board.dispatch(CanvasAction::SetMode(Mode::Circle));
        board.dispatch(CanvasAction::PointerDown(Point::new(10.0, 10.0)));
        board.dispatch(CanvasAction::PointerUp(Point::new(13.0, 14.0)));

        assert!(board.save().await);
        let id = board.current_id().unwrap();
        assert_eq!(board.drawings().len(), 1);
        assert_eq!(board.drawings()[0].shapes.len(), 1);

        board.dispatch(CanvasAction::SetMode(Mode::Rectangle));
        board.dispatch(CanvasAction::PointerDown(Point::new(0.0, 0.0)));
        board.dispatch(CanvasAction::PointerUp(Point::new(50.0, 50.0)));
        assert!(board.save().await);
        assert_eq!(board.current_id(), Some(id));
        assert_eq!(board.drawings().len(), 1);
        assert_eq!(board.drawings()[0].shapes.len(), 2);

        let mut other = Whiteboard::new(&CanvasConfig::default(), client(base_url)).unwrap();
        assert!(other.fetch_drawings().await);
        let stored = other.drawings()[0].clone();
        other.select(stored);
        assert_eq!(other.state().shapes().len(), 2);
        assert_eq!(other.surface().pixel(50, 25), Some([0, 0, 0, 255]));

        assert!(other.delete(id).await);
        assert_eq!(other.current_id(), None);
        assert!(other.drawings().is_empty());
    }
}
