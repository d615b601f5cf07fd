//! Path normalization for automatically tracked page views.
//!
//! Request paths that embed record ids (`/users/123/edit`) or id-prefixed
//! slugs (`/posts/42-my-title`) would otherwise produce one tracked action
//! per record. Normalization collapses those segments to `-`.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder written in place of an id segment.
pub const PLACEHOLDER: &str = "-";

#[allow(clippy::expect_used)]
static ID_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]+|[0-9]+-[^/]+)$").expect("id segment pattern is valid"));

/// Replace every id segment of `path` with [`PLACEHOLDER`].
///
/// A segment is the text after a `/` up to the next `/` or the end of the
/// path. It is an id segment when it is one or more ASCII digits, optionally
/// followed by `-` and at least one more character. Text before the first
/// `/` is never replaced.
///
/// # Example
///
/// ```
/// use landmark_core::normalize_path;
///
/// assert_eq!(normalize_path("/users/123/edit"), "/users/-/edit");
/// assert_eq!(normalize_path("/posts/42-my-title/comments"), "/posts/-/comments");
/// assert_eq!(normalize_path("/about"), "/about");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut segments = path.split('/');
    let mut out = String::with_capacity(path.len());
    if let Some(head) = segments.next() {
        out.push_str(head);
    }
    for segment in segments {
        out.push('/');
        if ID_SEGMENT.is_match(segment) {
            out.push_str(PLACEHOLDER);
        } else {
            out.push_str(segment);
        }
    }
    out
}
