//! Application services

pub mod container;

pub use container::{ContainerService, CreatedContainer, PullReport};
