//! Application layer: scanners, the executable resolver, and batch generation.

pub mod batch;
pub mod catalog;
pub mod installed;
pub mod resolver;
pub mod shortcuts;
