pub mod envelope;
pub mod payloads;
pub mod views;

pub use envelope::ApiResponse;
