pub mod api;
pub mod item_routes;
pub mod urls;

use crate::state::AppState;
use api::create_api_routes;
use axum::{
    body::Body,
    extract::{MatchedPath, RawPathParams, Request, State},
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use item_routes::create_item_routes;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug_span, field, warn, Span};
use urls::{parse_pk, ItemRoute, UrlTable};

/// Route a request was dispatched to, given axum's matched path and the
/// decoded `pk` capture. A `pk` that is not an integer means no route.
fn matched_route(urls: &UrlTable, matched_path: &str, pk: Option<&str>) -> Option<ItemRoute> {
    ItemRoute::ALL.into_iter().find(|route| {
        urls.route_path(*route) == matched_path
            && (!route.takes_pk() || pk.and_then(parse_pk).is_some())
    })
}

/// Record the item route name on the request span
async fn record_route(
    State(urls): State<Arc<UrlTable>>,
    matched_path: MatchedPath,
    params: Option<RawPathParams>,
    request: Request,
    next: Next,
) -> Response {
    let pk = params.as_ref().and_then(|params| {
        params
            .iter()
            .find(|(key, _)| *key == "pk")
            .map(|(_, value)| value)
    });
    if let Some(route) = matched_route(&urls, matched_path.as_str(), pk) {
        Span::current().record("route", route.name());
    }
    next.run(request).await
}

/// Assemble the full application router
pub fn create_app(state: AppState, cors_origins: &[String]) -> Router {
    let item_routes = create_item_routes(&state.urls).route_layer(
        middleware::from_fn_with_state(state.urls.clone(), record_route),
    );

    let mut app = Router::new()
        .merge(item_routes)
        // Mount API routes
        .merge(create_api_routes())
        .with_state(state)
        // Add tracing layer; `route` is filled in once routing has run
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            debug_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                route = field::Empty,
            )
        }));

    if !cors_origins.is_empty() {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST]),
        );
    }

    app
}
