use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Deserialize;

use crate::error::CalstarError;

/// Page size when the request does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page a client can ask for.
pub const MAX_PAGE_SIZE: u64 = 100;

/// `?limit=&offset=` query parameters.
///
/// ```rust,ignore
/// async fn list_courses(State(state): State<AppState>, page: Pagination) -> ApiResult<...> {
///     // page.limit, page.offset
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// Number of items to return (default: 20, max: 100)
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Number of items to skip (default: 0)
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: u64, offset: u64) -> Self {
        Pagination { limit, offset }.clamped()
    }

    /// Clamp limit to [`MAX_PAGE_SIZE`].
    pub fn clamped(self) -> Self {
        Pagination {
            limit: self.limit.min(MAX_PAGE_SIZE),
            offset: self.offset,
        }
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = CalstarError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        // Malformed values fall back to the first page.
        let page: Pagination = serde_urlencoded::from_str(query).unwrap_or_default();
        Ok(page.clamped())
    }
}
