pub mod auth_service;
pub mod contact_service;

/// A request field counts as provided only when present and non-empty.
pub(crate) fn required_field(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
