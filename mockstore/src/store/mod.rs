//! The in-memory tree behind a store and the walks that resolve paths in it.

pub mod resolver;
mod store_tree;

pub use store_tree::*;
