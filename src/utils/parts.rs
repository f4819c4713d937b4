//! Reading [`Part`] lists.

use crate::types::Part;

/// Text of the first part, the only one the services read.
///
/// ```
/// use a2a_router::types::Part;
/// use a2a_router::utils::first_text_part;
///
/// let parts = vec![Part::text("Hello"), Part::text("World")];
/// assert_eq!(first_text_part(&parts), Some("Hello"));
/// ```
pub fn first_text_part(parts: &[Part]) -> Option<&str> {
    parts.first().map(Part::as_text)
}
