use crate::routes::urls::parse_pk;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
};
use tracing::debug;

/// Integer item id taken from the `:pk` path capture.
///
/// A capture that is not an integer means the route did not match, so the
/// rejection is the same bare 404 axum gives an unknown path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPk(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ItemPk
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::NOT_FOUND)?;

        match parse_pk(&raw) {
            Some(pk) => Ok(ItemPk(pk)),
            None => {
                debug!("Path segment '{}' is not an item id", raw);
                Err(StatusCode::NOT_FOUND)
            }
        }
    }
}
