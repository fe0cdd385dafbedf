//! Route classification.
//!
//! Precedence: `OPTIONS` pre-flight, `/health`, then per collection (in the
//! order properties, tenants, leases) the collection route followed by the
//! item route. Anything left over is [`Route::Unmatched`].

use std::fmt;

use crate::event::ApiEvent;

/// Name of the path/query parameter carrying an item id.
pub const ID_PARAM: &str = "id";

/// Literal placeholder some gateways leave in the path when the template
/// was not expanded.
const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Properties,
    Tenants,
    Leases,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Properties, Collection::Tenants, Collection::Leases];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Properties => "properties",
            Collection::Tenants => "tenants",
            Collection::Leases => "leases",
        }
    }

    /// Leases are immutable once created and only support `DELETE` by id.
    fn item_route(self, method: &str, id: String) -> Option<Route> {
        match (self, method) {
            (Collection::Leases, "DELETE") => Some(Route::Delete(self, id)),
            (Collection::Leases, _) => None,
            (_, "GET") => Some(Route::Get(self, id)),
            (_, "PUT") => Some(Route::Update(self, id)),
            (_, "DELETE") => Some(Route::Delete(self, id)),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Preflight,
    Health,
    List(Collection),
    Create(Collection),
    Get(Collection, String),
    Update(Collection, String),
    Delete(Collection, String),
    Unmatched { path: String, method: String },
}

pub fn classify(event: &ApiEvent) -> Route {
    let method = event.method();
    if method == "OPTIONS" {
        return Route::Preflight;
    }

    let path = event.path();
    if path == "/health" {
        return Route::Health;
    }

    for collection in Collection::ALL {
        let collection_path = format!("/{}", collection.name());
        if path == collection_path {
            match method.as_str() {
                "GET" => return Route::List(collection),
                "POST" => return Route::Create(collection),
                _ => {}
            }
        }

        if let Some(id) = resolve_item_id(event, collection) {
            if let Some(route) = collection.item_route(&method, id) {
                return route;
            }
        }
    }

    Route::Unmatched {
        path: path.to_string(),
        method,
    }
}

/// Finds the item id for `collection`, trying the path-template parameter,
/// then the query string, then the segment after `/{collection}/`.
///
/// Parameters only count when the request path is within the collection,
/// so `?id=` on an unrelated path never resolves.
pub fn resolve_item_id(event: &ApiEvent, collection: Collection) -> Option<String> {
    let path = event.path();
    let collection_path = format!("/{}", collection.name());
    let prefix = format!("{collection_path}/");
    if path != collection_path && !path.starts_with(&prefix) {
        return None;
    }

    if let Some(id) = event.path_param(ID_PARAM).or_else(|| event.query_param(ID_PARAM)) {
        return Some(id.to_string());
    }

    id_from_path(path, &prefix)
}

fn id_from_path(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;
    let segment = rest.split('/').next()?;
    if segment.is_empty() || segment == ID_PLACEHOLDER {
        return None;
    }
    Some(segment.to_string())
}
