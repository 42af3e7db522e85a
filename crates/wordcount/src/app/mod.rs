//! Application layer: counting, selection observation, and the extension's
//! page and background collaborators.

pub mod activation;
pub mod content;
pub mod counting;
pub mod display;
pub mod platform;
pub mod snapshot;
pub mod watcher;
