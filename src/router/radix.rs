//! Radix tree for verb + path route resolution
//!
//! Each node represents one path segment. A node owns:
//! - static children keyed by their literal segment
//! - at most one parameter child (`:id` or `{id}`)
//! - the handlers registered at this node, keyed by HTTP method
//!
//! ## Matching rules
//!
//! - Paths are split on `/` and empty segments are ignored, at registration
//!   and at resolution alike. `/pets`, `/pets/` and `//pets` are the same route,
//!   and `/`, `//` and the empty path all denote the root.
//! - Static segments beat parameters. When a static branch dead-ends the
//!   parameter branch is tried instead (backtracking).
//! - Only nodes with at least one registered method count as found.
//!   Resolution ignores the request method so the caller can tell a
//!   missing route (404) from a missing method (405).
//! - Parameter values are percent-decoded; static segments compare raw.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use mango::router::RouteTree;
//!
//! let mut tree = RouteTree::new();
//! tree.insert(Method::GET, "/users/:id", "get_user").unwrap();
//! tree.insert(Method::GET, "/users/me", "get_me").unwrap();
//!
//! let resolved = tree.resolve("/users/42").unwrap();
//! assert_eq!(resolved.get(&Method::GET), Some(&"get_user"));
//! assert_eq!(resolved.param("id"), Some("42"));
//!
//! let resolved = tree.resolve("/users/me").unwrap();
//! assert_eq!(resolved.get(&Method::GET), Some(&"get_me"));
//! assert!(tree.resolve("/accounts").is_none());
//! ```

use http::Method;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use super::error::RouteError;

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/:id/posts/:post_id).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path parameters in path order.
///
/// Names are `Arc<str>` shared with the tree; values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Split a path into its non-empty segments.
pub(crate) fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

enum Segment<'a> {
    Static(&'a str),
    Param(&'a str),
}

impl<'a> Segment<'a> {
    fn parse(segment: &'a str, pattern: &str) -> Result<Self, RouteError> {
        let name = if let Some(name) = segment.strip_prefix(':') {
            name
        } else if let Some(name) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            name
        } else {
            return Ok(Segment::Static(segment));
        };

        if name.is_empty() {
            return Err(RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "parameter segment without a name",
            });
        }
        if name.contains([':', '{', '}']) {
            return Err(RouteError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "parameter name contains ':', '{' or '}'",
            });
        }
        Ok(Segment::Param(name))
    }
}

struct RadixNode<T> {
    /// Parameter name if this node is a parameter child
    param_name: Option<Arc<str>>,
    /// Handlers registered at this node
    routes: HashMap<Method, T>,
    /// Static children keyed by literal segment
    children: HashMap<String, RadixNode<T>>,
    param_child: Option<Box<RadixNode<T>>>,
}

impl<T> RadixNode<T> {
    fn new() -> Self {
        Self {
            param_name: None,
            routes: HashMap::new(),
            children: HashMap::new(),
            param_child: None,
        }
    }

    fn new_param(param_name: Arc<str>) -> Self {
        Self {
            param_name: Some(param_name),
            ..Self::new()
        }
    }

    fn insert(
        &mut self,
        segments: &[Segment<'_>],
        method: Method,
        value: T,
        pattern: &str,
    ) -> Result<(), RouteError> {
        let Some((segment, remaining)) = segments.split_first() else {
            if self.routes.contains_key(&method) {
                return Err(RouteError::Duplicate {
                    method,
                    pattern: pattern.to_string(),
                });
            }
            self.routes.insert(method, value);
            return Ok(());
        };

        match segment {
            Segment::Static(literal) => self
                .children
                .entry((*literal).to_string())
                .or_insert_with(RadixNode::new)
                .insert(remaining, method, value, pattern),
            Segment::Param(name) => {
                let child = self
                    .param_child
                    .get_or_insert_with(|| Box::new(RadixNode::new_param(Arc::from(*name))));
                let existing = child.param_name.as_deref().unwrap_or_default();
                if existing != *name {
                    return Err(RouteError::ConflictingParam {
                        pattern: pattern.to_string(),
                        existing: existing.to_string(),
                        requested: (*name).to_string(),
                    });
                }
                child.insert(remaining, method, value, pattern)
            }
        }
    }

    fn search(&self, segments: &[&str], params: &mut ParamVec) -> Option<&RadixNode<T>> {
        let Some((segment, remaining)) = segments.split_first() else {
            return (!self.routes.is_empty()).then_some(self);
        };

        if let Some(child) = self.children.get(*segment) {
            if let Some(found) = child.search(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let Some(name) = &child.param_name {
                params.push((Arc::clone(name), decode_segment(segment)));
                if let Some(found) = child.search(remaining, params) {
                    return Some(found);
                }
                // Backtrack: this branch did not lead to a route
                params.pop();
            }
        }

        None
    }

    fn count(&self) -> usize {
        self.routes.len()
            + self.children.values().map(RadixNode::count).sum::<usize>()
            + self.param_child.as_ref().map_or(0, |c| c.count())
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_string())
}

/// Result of resolving a path: the handlers registered at the matched node
/// and the extracted path parameters.
#[derive(Debug)]
pub struct Resolved<'a, T> {
    pub handlers: &'a HashMap<Method, T>,
    pub params: ParamVec,
}

impl<'a, T> Resolved<'a, T> {
    /// Handler for `method`, if registered at this node.
    #[must_use]
    pub fn get(&self, method: &Method) -> Option<&'a T> {
        self.handlers.get(method)
    }

    /// Value of the path parameter `name` (last occurrence wins).
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Methods registered at this node in a stable order, for `Allow` headers.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self.handlers.keys().cloned().collect();
        methods.sort_by(|a, b| method_rank(a).cmp(&method_rank(b)));
        methods
    }
}

fn method_rank(method: &Method) -> (u8, &str) {
    let rank = match *method {
        Method::GET => 0,
        Method::HEAD => 1,
        Method::POST => 2,
        Method::PUT => 3,
        Method::PATCH => 4,
        Method::DELETE => 5,
        Method::OPTIONS => 6,
        _ => 7,
    };
    (rank, method.as_str())
}

/// Routing tree mapping method + path pattern to a value (usually a handler).
///
/// Built during configuration and read-only afterwards; `&RouteTree` may be
/// shared freely between request threads.
pub struct RouteTree<T> {
    root: RadixNode<T>,
}

impl<T> Default for RouteTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteTree<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: RadixNode::new(),
        }
    }

    /// Register `value` for `method` at `pattern`.
    ///
    /// # Errors
    ///
    /// - [`RouteError::Duplicate`] if the method is already registered for
    ///   this (normalised) pattern; the existing value is kept
    /// - [`RouteError::ConflictingParam`] if a different parameter name is
    ///   already registered at the same position
    /// - [`RouteError::InvalidPattern`] for unnamed or malformed parameters
    pub fn insert(&mut self, method: Method, pattern: &str, value: T) -> Result<(), RouteError> {
        let segments = split_path(pattern)
            .map(|s| Segment::parse(s, pattern))
            .collect::<Result<Vec<_>, _>>()?;
        self.root.insert(&segments, method, value, pattern)
    }

    /// Resolve `path` to the node holding its handlers.
    ///
    /// Returns `None` when no node with at least one registered method matches.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<Resolved<'_, T>> {
        let segments: SmallVec<[&str; 16]> = split_path(path).collect();
        let mut params = ParamVec::new();
        let node = self.root.search(&segments, &mut params)?;
        Some(Resolved {
            handlers: &node.routes,
            params,
        })
    }

    /// Number of registered (method, pattern) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
