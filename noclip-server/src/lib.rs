mod auth;
mod clips;
mod config;
mod context;
mod docs;
mod errors;
mod schemas;
mod serialized;
mod users;

use axum::routing::get;
use log::info;
use noclip_collab::Collab;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use auth::API_KEY_HEADER;
pub use config::*;
pub use context::ServerContext;
pub use errors::{ServerError, ServerResult};

pub type Router = axum::Router<ServerContext>;

/// Builds the full noclip API around `context`
pub fn router(context: ServerContext) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/clip", clips::router())
        .nest("/users", users::router())
        .route("/api.json", get(docs::docs))
        .layer(cors)
        .with_state(context)
}

/// Serves the API on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, collab: Collab) -> std::io::Result<()> {
    let context = ServerContext::new(collab);

    axum::serve(listener, router(context)).await
}

/// Starts the noclip server
pub async fn run_server(config: &ServerConfig, collab: Collab) -> std::io::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;

    info!("Listening on {}", listener.local_addr()?);

    serve(listener, collab).await
}
