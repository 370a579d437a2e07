//! Item URL table.
//!
//! Each route is declared once as a list of path segments. The axum mount
//! path, the literal pattern (`/delete/<int:pk>/`) and reversed URLs are all
//! rendered from those segments, so the three can never drift apart.
//!
//! A `pk` segment only matches ASCII digits that fit in an `i64`. Anything
//! else is "no route", which the hosting router turns into its plain 404.

use std::fmt;
use thiserror::Error;

/// One segment of a route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Pk,
}

const LIST: &[Segment] = &[];
const DETAIL: &[Segment] = &[Segment::Pk];
const CREATE: &[Segment] = &[Segment::Literal("create")];
const DELETE: &[Segment] = &[Segment::Literal("delete"), Segment::Pk];
const UPDATE: &[Segment] = &[Segment::Literal("update"), Segment::Pk];

/// The five item routes, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRoute {
    List,
    Detail,
    Create,
    Delete,
    Update,
}

impl ItemRoute {
    pub const ALL: [ItemRoute; 5] = [
        ItemRoute::List,
        ItemRoute::Detail,
        ItemRoute::Create,
        ItemRoute::Delete,
        ItemRoute::Update,
    ];

    /// Route name used for reverse lookups.
    pub fn name(self) -> &'static str {
        match self {
            ItemRoute::List => "item.list",
            ItemRoute::Detail => "item.detail",
            ItemRoute::Create => "item.create",
            ItemRoute::Delete => "item.delete",
            ItemRoute::Update => "item.update",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.name() == name)
    }

    fn segments(self) -> &'static [Segment] {
        match self {
            ItemRoute::List => LIST,
            ItemRoute::Detail => DETAIL,
            ItemRoute::Create => CREATE,
            ItemRoute::Delete => DELETE,
            ItemRoute::Update => UPDATE,
        }
    }

    /// Literal pattern relative to the mount point, e.g. `/update/<int:pk>/`.
    pub fn pattern(self) -> String {
        render(self.segments(), |segment| match segment {
            Segment::Literal(text) => (*text).to_string(),
            Segment::Pk => "<int:pk>".to_string(),
        })
    }

    pub fn takes_pk(self) -> bool {
        self.segments().contains(&Segment::Pk)
    }

    /// Match a mount-relative path. Returns the extracted pk, if any.
    fn match_path(self, path: &str) -> Option<Option<i64>> {
        let inner = path.strip_prefix('/')?;
        let parts: Vec<&str> = if inner.is_empty() {
            Vec::new()
        } else {
            inner.strip_suffix('/')?.split('/').collect()
        };

        let segments = self.segments();
        if parts.len() != segments.len() {
            return None;
        }

        let mut pk = None;
        for (segment, part) in segments.iter().zip(parts) {
            match segment {
                Segment::Literal(text) if *text == part => {}
                Segment::Literal(_) => return None,
                Segment::Pk => pk = Some(parse_pk(part)?),
            }
        }
        Some(pk)
    }
}

impl fmt::Display for ItemRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a `pk` path segment: one or more ASCII digits fitting in an `i64`.
pub fn parse_pk(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn render(segments: &[Segment], mut part: impl FnMut(&Segment) -> String) -> String {
    let mut out = String::from("/");
    for segment in segments {
        out.push_str(&part(segment));
        out.push('/');
    }
    out
}

/// Result of resolving a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: ItemRoute,
    pub pk: Option<i64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("no route named '{0}'")]
    NoReverseMatch(String),
    #[error("route '{0}' requires a pk")]
    MissingPk(&'static str),
    #[error("route '{0}' does not take a pk")]
    UnexpectedPk(&'static str),
    #[error("pk {pk} cannot be used for route '{route}'")]
    InvalidPk { route: &'static str, pk: i64 },
}

/// The item routes mounted under a path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTable {
    prefix: String,
}

impl UrlTable {
    /// `prefix` is normalised to a leading slash and no trailing slash;
    /// an empty prefix (or `/`) mounts the routes at the root.
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        };
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Path string to register with the axum router, e.g. `/items/:pk/`.
    pub fn route_path(&self, route: ItemRoute) -> String {
        let relative = render(route.segments(), |segment| match segment {
            Segment::Literal(text) => (*text).to_string(),
            Segment::Pk => ":pk".to_string(),
        });
        format!("{}{}", self.prefix, relative)
    }

    /// OpenAPI path key for a route, e.g. `/items/delete/{pk}/`.
    pub fn openapi_path(&self, route: ItemRoute) -> String {
        let relative = render(route.segments(), |segment| match segment {
            Segment::Literal(text) => (*text).to_string(),
            Segment::Pk => "{pk}".to_string(),
        });
        format!("{}{}", self.prefix, relative)
    }

    /// Resolve an absolute request path to the first route that matches.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let relative = path.strip_prefix(self.prefix.as_str())?;
        ItemRoute::ALL.into_iter().find_map(|route| {
            route
                .match_path(relative)
                .map(|pk| RouteMatch { route, pk })
        })
    }

    /// Build the absolute URL for a named route.
    pub fn reverse(&self, name: &str, pk: Option<i64>) -> Result<String, UrlError> {
        let route =
            ItemRoute::from_name(name).ok_or_else(|| UrlError::NoReverseMatch(name.to_string()))?;
        self.reverse_route(route, pk)
    }

    pub fn reverse_route(&self, route: ItemRoute, pk: Option<i64>) -> Result<String, UrlError> {
        let pk = match (route.takes_pk(), pk) {
            (true, Some(pk)) if pk < 0 => {
                return Err(UrlError::InvalidPk { route: route.name(), pk })
            }
            (true, Some(pk)) => Some(pk),
            (true, None) => return Err(UrlError::MissingPk(route.name())),
            (false, Some(_)) => return Err(UrlError::UnexpectedPk(route.name())),
            (false, None) => None,
        };

        let relative = render(route.segments(), |segment| match (segment, pk) {
            (Segment::Literal(text), _) => (*text).to_string(),
            (Segment::Pk, Some(pk)) => pk.to_string(),
            (Segment::Pk, None) => String::new(),
        });
        Ok(format!("{}{}", self.prefix, relative))
    }
}

impl Default for UrlTable {
    fn default() -> Self {
        Self::new("")
    }
}
