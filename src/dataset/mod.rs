pub mod error;
pub mod loader;
pub mod sampling;
pub mod summary;
