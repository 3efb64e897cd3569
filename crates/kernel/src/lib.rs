//! Core building blocks shared by every bookshelf crate: the [`Module`]
//! trait, the [`ModuleRegistry`] that drives module lifecycles, and the
//! layered [`settings::Settings`].

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Migration, Module};
pub use registry::ModuleRegistry;
