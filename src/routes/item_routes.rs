use crate::{
    handlers::{
        item_create, item_create_form, item_delete, item_delete_confirm, item_detail, item_list,
        item_pk::ItemPk, item_update, item_update_form,
    },
    routes::urls::{ItemRoute, UrlTable},
    state::AppState,
};
use axum::{
    http::StatusCode,
    routing::{get, MethodRouter},
    Router,
};
use tracing::debug;

/// Unbound methods on a pk route. The pk is checked first so a
/// non-integer segment stays a 404 whatever the method.
async fn pk_method_not_allowed(ItemPk(_): ItemPk) -> StatusCode {
    StatusCode::METHOD_NOT_ALLOWED
}

fn handlers_for(route: ItemRoute) -> MethodRouter<AppState> {
    let methods = match route {
        ItemRoute::List => get(item_list),
        ItemRoute::Detail => get(item_detail),
        ItemRoute::Create => get(item_create_form).post(item_create),
        ItemRoute::Delete => get(item_delete_confirm).post(item_delete),
        ItemRoute::Update => get(item_update_form).post(item_update),
    };

    if route.takes_pk() {
        methods.fallback(pk_method_not_allowed)
    } else {
        methods
    }
}

/// Create item routes, one per entry of the URL table
pub fn create_item_routes(urls: &UrlTable) -> Router<AppState> {
    ItemRoute::ALL
        .into_iter()
        .fold(Router::new(), |router, route| {
            let path = urls.route_path(route);
            debug!("Mounting {} ({}) at {}", route, route.pattern(), path);
            router.route(&path, handlers_for(route))
        })
}
