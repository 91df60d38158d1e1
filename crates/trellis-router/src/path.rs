//! Path utilities for route registration and matching.
//!
//! All functions are **pure**: given same input, always produce same output
//! with no side effects.

use std::borrow::Cow;

use crate::error::RouteError;

/// Splits a path into its non-empty segments.
///
/// Empty segments produced by leading, trailing, or doubled slashes are
/// ignored, so `/users//42/` yields the same segments as `/users/42`.
///
/// # Examples
///
/// ```
/// use trellis_router::path::split_segments;
///
/// let segments: Vec<&str> = split_segments("/users/42").collect();
/// assert_eq!(segments, vec!["users", "42"]);
///
/// let segments: Vec<&str> = split_segments("//users///42/").collect();
/// assert_eq!(segments, vec!["users", "42"]);
///
/// assert_eq!(split_segments("/").count(), 0);
/// ```
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.trim().is_empty())
}

/// Validates if a path is in canonical form.
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use trellis_router::path::is_canonical;
///
/// assert!(is_canonical("/"));
/// assert!(is_canonical("/about"));
/// assert!(is_canonical("/users/:id"));
///
/// assert!(!is_canonical(""));
/// assert!(!is_canonical("about"));
/// assert!(!is_canonical("/about/"));
/// assert!(!is_canonical("/about//page"));
/// ```
pub fn is_canonical(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    if path == "/" {
        return true;
    }

    !path.ends_with('/')
}

/// Normalizes a path to canonical form.
///
/// Returns `Cow::Borrowed` when the input is already canonical (zero
/// allocations), `Cow::Owned` when normalization was needed.
///
/// # Examples
///
/// ```
/// use trellis_router::path::normalize;
/// use std::borrow::Cow;
///
/// let path = normalize("/about");
/// assert!(matches!(path, Cow::Borrowed("/about")));
///
/// assert_eq!(normalize("/about/"), "/about");
/// assert_eq!(normalize("/path//to///page"), "/path/to/page");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> Cow<'_, str> {
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    let normalized = split_segments(path).collect::<Vec<_>>().join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Validates a path at route-registration time.
///
/// Registration happens at build/program start, so malformed input is a
/// programming defect and fails fast instead of surfacing at match time.
///
/// # Rules
///
/// - Must start with `/` (route paths are absolute)
/// - Must not contain `\`
/// - Every capture segment must carry a name (`:` alone is rejected)
///
/// Trailing or doubled slashes are tolerated here; the compiler stores the
/// normalized form.
///
/// # Examples
///
/// ```
/// use trellis_router::path::validate_route_path;
///
/// assert!(validate_route_path("/users/:id").is_ok());
/// assert!(validate_route_path("/users/").is_ok());
///
/// assert!(validate_route_path("users/:id").is_err());
/// assert!(validate_route_path("/users/:").is_err());
/// ```
pub fn validate_route_path(path: &str) -> Result<(), RouteError> {
    if !path.starts_with('/') {
        return Err(RouteError::NotAbsolute(path.to_string()));
    }

    if let Some(found) = path.chars().find(|c| *c == '\\') {
        return Err(RouteError::InvalidCharacter {
            path: path.to_string(),
            found,
        });
    }

    for segment in split_segments(path) {
        if segment.starts_with(':') && segment[1..].trim().is_empty() {
            return Err(RouteError::EmptyCapture(path.to_string()));
        }
    }

    Ok(())
}
