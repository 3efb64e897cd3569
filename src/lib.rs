//! Bookshelf application library
//!
//! Project modules built on the bookshelf framework crates.

pub mod modules;

pub use modules::*;
