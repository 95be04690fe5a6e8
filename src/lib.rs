//! pmdok: a small command-line front-end for a Docker-compatible engine.
//!
//! Layers, outermost first: [`cli`] parses and dispatches, [`application`]
//! holds the engine facade, [`domain`] the pure types, and [`infrastructure`]
//! the engine client, filesystem access and service wiring.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
