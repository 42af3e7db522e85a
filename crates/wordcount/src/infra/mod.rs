//! Infrastructure adapters: configuration, logging, and the headless page.

pub mod config;
pub mod document;
pub mod events;
pub mod logging;
pub mod page;
