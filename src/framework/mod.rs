#[cfg(feature = "tower")]
pub mod axum;
