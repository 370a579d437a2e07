use utoipa::OpenApi;
use crate::{models::*, routes::urls::{ItemRoute, UrlTable}, state::AppState};
use axum::{extract::State, Json};

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Item store is reachable", body = ReadyResponse),
        (status = 503, description = "Item store is not reachable", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// List all items (`item.list`)
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "All items ordered by id", body = ItemListResponse)
    )
)]
#[allow(dead_code)]
pub async fn item_list_doc() {}

/// Fetch a single item (`item.detail`)
#[utoipa::path(
    get,
    path = "/{pk}/",
    params(("pk" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn item_detail_doc() {}

/// Blank creation form (`item.create`)
#[utoipa::path(
    get,
    path = "/create/",
    responses(
        (status = 200, description = "Empty form", body = ItemFormResponse)
    )
)]
#[allow(dead_code)]
pub async fn item_create_form_doc() {}

/// Create a new item (`item.create`)
#[utoipa::path(
    post,
    path = "/create/",
    request_body = ItemForm,
    responses(
        (status = 201, description = "Item created successfully", body = Item)
    )
)]
#[allow(dead_code)]
pub async fn item_create_doc() {}

/// Deletion confirmation (`item.delete`)
#[utoipa::path(
    get,
    path = "/delete/{pk}/",
    params(("pk" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item about to be deleted", body = ItemDeleteConfirmResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn item_delete_confirm_doc() {}

/// Delete an item (`item.delete`)
#[utoipa::path(
    post,
    path = "/delete/{pk}/",
    params(("pk" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = ItemDeleteResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn item_delete_doc() {}

/// Prefilled update form (`item.update`)
#[utoipa::path(
    get,
    path = "/update/{pk}/",
    params(("pk" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Form with current values", body = ItemFormResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn item_update_form_doc() {}

/// Update an item (`item.update`)
#[utoipa::path(
    post,
    path = "/update/{pk}/",
    params(("pk" = i64, Path, description = "Item id")),
    request_body = ItemForm,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn item_update_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        item_list_doc,
        item_detail_doc,
        item_create_form_doc,
        item_create_doc,
        item_delete_confirm_doc,
        item_delete_doc,
        item_update_form_doc,
        item_update_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            ErrorResponse,
            Item,
            ItemForm,
            ItemListResponse,
            ItemFormResponse,
            ItemDeleteConfirmResponse,
            ItemDeleteResponse
        )
    ),
    tags(
        (name = "items", description = "Item CRUD endpoints")
    )
)]
pub struct ApiDoc;

/// Item paths are declared relative to the mount point and re-keyed here
/// under the configured prefix.
pub fn mounted_openapi(urls: &UrlTable) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let relative = UrlTable::default();

    // Take every item path out before inserting, so a prefix such as
    // `/create` cannot collide with a key that is still relative.
    let items: Vec<_> = ItemRoute::ALL
        .into_iter()
        .filter_map(|route| {
            doc.paths
                .paths
                .remove(&relative.openapi_path(route))
                .map(|item| (route, item))
        })
        .collect();
    for (route, item) in items {
        doc.paths.paths.insert(urls.openapi_path(route), item);
    }
    doc
}

/// Serve the generated OpenAPI document
pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(mounted_openapi(&state.urls))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_paths_follow_the_mount_prefix() {
        let doc = mounted_openapi(&UrlTable::new("/api"));
        let keys: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "/api/",
                "/api/create/",
                "/api/delete/{pk}/",
                "/api/health",
                "/api/ready",
                "/api/update/{pk}/",
                "/api/{pk}/",
            ]
        );
    }

    #[test]
    fn root_mount_keeps_relative_paths() {
        let doc = mounted_openapi(&UrlTable::default());
        assert!(doc.paths.paths.contains_key("/"));
        assert!(doc.paths.paths.contains_key("/delete/{pk}/"));
    }

    #[test]
    fn get_and_post_share_a_path() {
        let doc = mounted_openapi(&UrlTable::new("/items"));
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value["paths"]["/items/create/"]["get"].is_object());
        assert!(value["paths"]["/items/create/"]["post"].is_object());
    }
}
