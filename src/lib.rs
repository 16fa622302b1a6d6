pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;

use axum::{extract::Request, routing::get, Router};
use store::TodoStore;
use tower::{util::MapRequest, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub store: TodoStore,
}

/// The router behind path normalization, which has to run before routing.
/// Serve it with `axum::ServiceExt::<Request>::into_make_service`.
pub type App = NormalizePath<MapRequest<Router, fn(Request) -> Request>>;

pub fn create_app(state: AppState) -> App {
    let routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/todos",
            get(handlers::api::list_all_todos).post(handlers::api::create_new_todo),
        )
        .route(
            "/api/todos/{id}",
            get(handlers::api::get_single_todo)
                .put(handlers::api::update_existing_todo)
                .delete(handlers::api::delete_existing_todo),
        )
        .fallback(handlers::api::route_not_found)
        .method_not_allowed_fallback(handlers::api::route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(middleware::handle_panic));

    let routes = routes.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(LatencyUnit::Millis),
                    ),
            )
            .layer(CorsLayer::permissive()),
    );

    // Outside CORS, so preflight responses get the headers too.
    let router = middleware::with_security_headers(routes);

    ServiceBuilder::new()
        .layer(NormalizePathLayer::trim_trailing_slash())
        .map_request(middleware::lowercase_path as fn(Request) -> Request)
        .service(router)
}
