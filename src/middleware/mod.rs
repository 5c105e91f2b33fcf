pub mod auth;
pub mod error_details;
pub mod security_headers;

pub use error_details::ErrorDetails;
pub use security_headers::SecurityHeaders;
