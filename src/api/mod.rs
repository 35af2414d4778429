//! HTTP route layer
//!
//! Each route makes one store or relay call and maps the outcome to JSON.
//! Authentication is handled by the gate in front of this service.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET/POST/DELETE /api/chat` | [`chat`] |
//! | `GET/POST /api/config` | [`config`] |
//! | `GET/POST /api/skills` | [`skills`] |
//! | `POST /api/setup` | [`setup`] |
//! | `GET/POST /api/gpio`, `GET /api/gpio/header` | [`gpio`] |
//! | `GET /api/system/stats`, `GET /api/logs`, `GET /health` | [`system`] |

use axum::extract::OriginalUri;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod chat;
pub mod config;
pub mod error;
pub mod gpio;
pub mod setup;
pub mod skills;
pub mod state;
pub mod system;

pub use error::ApiError;
pub use state::{AppState, SharedState};

/// Build the full application router
///
/// Unknown `/api` paths get a JSON 404. Any other path is served from
/// `server.ui_dir` when configured, falling back to its `index.html` so
/// client-side routes resolve.
pub fn build_router(state: SharedState) -> Router {
    let mut router = Router::new()
        .nest("/api", api_routes())
        .route("/health", get(system::health));

    match &state.config.server.ui_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router = router.fallback_service(ServeDir::new(dir).fallback(index));
        }
        None => {
            router = router.fallback(not_found);
        }
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn api_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/chat",
            get(chat::history).post(chat::send).delete(chat::clear),
        )
        .route("/config", get(config::show).post(config::replace))
        .route("/skills", get(skills::list).post(skills::manage))
        .route("/setup", post(setup::apply))
        .route("/gpio", get(gpio::layout).post(gpio::save))
        .route("/gpio/header", get(gpio::header))
        .route("/system/stats", get(system::system_stats))
        .route("/logs", get(system::logs))
        .fallback(not_found)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}
