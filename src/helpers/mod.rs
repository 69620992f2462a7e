pub mod validate;

pub use validate::{REDACTED_PASSWORD, redact_uri_password, validate_mongodb_uri};
