use crate::{
    db::StoreError,
    handlers::item_pk::ItemPk,
    models::{
        ApiError, ErrorResponse, Item, ItemDeleteConfirmResponse, ItemDeleteResponse, ItemForm,
        ItemFormResponse, ItemListResponse,
    },
    routes::urls::{ItemRoute, UrlError},
    state::AppState,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    Json,
};
use tracing::{error, info};

fn store_failure(e: StoreError, context: String) -> ApiError {
    error!("{}: {}", context, e);
    ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, context)
}

fn reverse_failure(e: UrlError) -> ApiError {
    error!("Failed to reverse item URL: {}", e);
    ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to build URL: {}", e))
}

fn reverse(state: &AppState, route: ItemRoute, pk: Option<i64>) -> Result<String, ApiError> {
    state.urls.reverse_route(route, pk).map_err(reverse_failure)
}

async fn fetch_item(state: &AppState, pk: i64) -> Result<Item, ApiError> {
    match state.store.get(pk).await {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(item_not_found(pk)),
        Err(e) => Err(store_failure(e, format!("Failed to load item '{}'", pk))),
    }
}

fn item_not_found(pk: i64) -> ApiError {
    info!("Item '{}' not found", pk);
    ErrorResponse::reply(StatusCode::NOT_FOUND, format!("Item '{}' not found", pk))
}

/// List all items
pub async fn item_list(
    State(state): State<AppState>,
) -> Result<Json<ItemListResponse>, ApiError> {
    let items = state
        .store
        .list()
        .await
        .map_err(|e| store_failure(e, "Failed to list items".to_string()))?;

    Ok(Json(ItemListResponse {
        count: items.len(),
        items,
    }))
}

/// Fetch a single item
pub async fn item_detail(
    State(state): State<AppState>,
    ItemPk(pk): ItemPk,
) -> Result<Json<Item>, ApiError> {
    fetch_item(&state, pk).await.map(Json)
}

/// Blank form for creating an item
pub async fn item_create_form(
    State(state): State<AppState>,
) -> Result<Json<ItemFormResponse>, ApiError> {
    Ok(Json(ItemFormResponse {
        action: reverse(&state, ItemRoute::Create, None)?,
        initial: ItemForm::default(),
    }))
}

/// Create a new item
pub async fn item_create(
    State(state): State<AppState>,
    Json(form): Json<ItemForm>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Item>), ApiError> {
    let item = state
        .store
        .create(form)
        .await
        .map_err(|e| store_failure(e, "Failed to create item".to_string()))?;
    info!("Item '{}' created", item.id);

    let location = reverse(&state, ItemRoute::Detail, Some(item.id))?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

/// Confirmation payload for deleting an item
pub async fn item_delete_confirm(
    State(state): State<AppState>,
    ItemPk(pk): ItemPk,
) -> Result<Json<ItemDeleteConfirmResponse>, ApiError> {
    let item = fetch_item(&state, pk).await?;
    Ok(Json(ItemDeleteConfirmResponse {
        action: reverse(&state, ItemRoute::Delete, Some(pk))?,
        item,
    }))
}

/// Delete an item
pub async fn item_delete(
    State(state): State<AppState>,
    ItemPk(pk): ItemPk,
) -> Result<Json<ItemDeleteResponse>, ApiError> {
    let removed = state
        .store
        .delete(pk)
        .await
        .map_err(|e| store_failure(e, format!("Failed to delete item '{}'", pk)))?;
    if !removed {
        return Err(item_not_found(pk));
    }
    info!("Item '{}' deleted", pk);

    Ok(Json(ItemDeleteResponse {
        success: true,
        redirect: reverse(&state, ItemRoute::List, None)?,
    }))
}

/// Form prefilled with the current values of an item
pub async fn item_update_form(
    State(state): State<AppState>,
    ItemPk(pk): ItemPk,
) -> Result<Json<ItemFormResponse>, ApiError> {
    let item = fetch_item(&state, pk).await?;
    Ok(Json(ItemFormResponse {
        action: reverse(&state, ItemRoute::Update, Some(pk))?,
        initial: ItemForm::from(&item),
    }))
}

/// Update an item
pub async fn item_update(
    State(state): State<AppState>,
    ItemPk(pk): ItemPk,
    Json(form): Json<ItemForm>,
) -> Result<([(header::HeaderName, String); 1], Json<Item>), ApiError> {
    let item = match state.store.update(pk, form).await {
        Ok(Some(item)) => item,
        Ok(None) => return Err(item_not_found(pk)),
        Err(e) => return Err(store_failure(e, format!("Failed to update item '{}'", pk))),
    };
    info!("Item '{}' updated", pk);

    let location = reverse(&state, ItemRoute::Detail, Some(pk))?;
    Ok(([(header::LOCATION, location)], Json(item)))
}

#[cfg(test)]
mod tests {
    use crate::db::MemoryItemStore;
    use crate::routes::{create_app, urls::UrlTable};
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(prefix: &str) -> Router {
        let state = AppState::new(Arc::new(MemoryItemStore::new()), UrlTable::new(prefix));
        create_app(state, &[])
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request(method, uri, body)).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn item_lifecycle_through_http() {
        let app = app("/items");

        let (status, body) = send(&app, Method::GET, "/items/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/items/create/",
                Some(json!({"name": "lamp", "description": "desk lamp"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/items/1/");

        let (status, body) = send(&app, Method::GET, "/items/1/", None).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["id"], 1);
        assert_eq!(body["name"], "lamp");

        let (status, body) = send(&app, Method::GET, "/items/update/1/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action"], "/items/update/1/");
        assert_eq!(body["initial"]["description"], "desk lamp");

        let (status, body) = send(
            &app,
            Method::POST,
            "/items/update/1/",
            Some(json!({"name": "lamp", "description": "floor lamp"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["description"], "floor lamp");

        let (status, body) = send(&app, Method::GET, "/items/delete/1/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action"], "/items/delete/1/");
        assert_eq!(body["item"]["name"], "lamp");

        let (status, body) = send(&app, Method::POST, "/items/delete/1/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["redirect"], "/items/");

        let (status, body) = send(&app, Method::GET, "/items/1/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn percent_encoded_pk_is_decoded() {
        let app = app("");
        let (status, _) = send(
            &app,
            Method::POST,
            "/create/",
            Some(json!({"name": "cup", "description": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::GET, "/%31/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "cup");
    }

    #[tokio::test]
    async fn create_form_is_blank() {
        let app = app("");
        let (status, body) = send(&app, Method::GET, "/create/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action"], "/create/");
        assert_eq!(body["initial"], json!({"name": "", "description": ""}));
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let app = app("");
        for name in ["b", "a", "c"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/create/",
                Some(json!({"name": name, "description": ""})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(body["count"], 3);
        let ids: Vec<i64> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn non_integer_and_missing_pk_are_not_found() {
        let app = app("");
        for path in ["/abc/", "/delete/abc/", "/update/abc/", "/update/", "/delete/", "/-1/", "/42"] {
            let (status, body) = send(&app, Method::GET, path, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "path {path}");
            assert_eq!(body, Value::Null, "path {path}");
        }
    }

    #[tokio::test]
    async fn missing_items_are_not_found() {
        let app = app("");
        let (status, _) = send(&app, Method::GET, "/42/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::POST, "/delete/42/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(
            &app,
            Method::POST,
            "/update/42/",
            Some(json!({"name": "x", "description": "y"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_integer_pk_is_not_found_for_any_method() {
        let app = app("");
        let cases = [
            (Method::POST, "/abc/"),
            (Method::PUT, "/delete/abc/"),
            (Method::DELETE, "/update/abc/"),
            (Method::POST, "/-1/"),
            (Method::PATCH, "/update/"),
        ];
        for (method, path) in cases {
            let (status, _) = send(&app, method.clone(), path, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {path}");
        }
    }

    #[tokio::test]
    async fn unsupported_methods_are_rejected() {
        let app = app("");
        let (status, _) = send(&app, Method::POST, "/", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, _) = send(&app, Method::DELETE, "/1/", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        let (status, _) = send(&app, Method::PUT, "/update/1/", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn malformed_create_body_is_rejected() {
        let app = app("");
        let (status, body) = send(&app, Method::POST, "/create/", Some(json!({"name": 5}))).await;
        assert!(status.is_client_error(), "status {status}");
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, Method::POST, "/update/1/", Some(json!({}))).await;
        assert!(status.is_client_error(), "status {status}");

        let (_, body) = send(&app, Method::GET, "/", None).await;
        assert_eq!(body["count"], 0);
    }
}
