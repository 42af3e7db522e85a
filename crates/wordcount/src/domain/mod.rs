//! Core domain types shared by the counting engine and its collaborators.

pub mod errors;
pub mod model;
