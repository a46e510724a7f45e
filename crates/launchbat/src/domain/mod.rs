//! Core types shared by scanners, the generator, and the UI.

pub mod errors;
pub mod model;
