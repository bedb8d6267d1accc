//! Shared utilities used across the domain layer.

pub mod grid;
pub mod sync;

pub use grid::max_by_projection;
pub use sync::lock_unpoisoned;
