//! Domain layer: entities and pure logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no engine).

pub mod entities;
pub mod error;
pub mod image;

pub use entities::*;
pub use error::DomainError;
pub use image::ImageReference;
