pub mod auth;

pub use auth::{CurrentUser, ensure_authorized};
