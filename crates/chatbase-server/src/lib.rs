//! Static responder for the chat widget.
//!
//! `/` and `/chat` answer with the widget document; every other path is a
//! plain file lookup under the widget root.

pub mod config;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, WidgetConfig};

/// Paths that resolve to the widget document.
pub const WIDGET_PATHS: [&str; 2] = ["/", "/chat"];

pub fn router(config: &WidgetConfig) -> Router {
    let widget = ServeFile::new(config.index_path());

    WIDGET_PATHS
        .iter()
        .fold(Router::new(), |router, path| {
            router.route_service(path, widget.clone())
        })
        .fallback_service(ServeDir::new(&config.root))
        .layer(TraceLayer::new_for_http())
}
