pub mod format;
pub mod validate;

pub use format::format_failure;
pub use validate::{REDACTED_PASSWORD, parse_server, password_confirmed, validate_resource_id};
