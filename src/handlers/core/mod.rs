//! Core handler infrastructure: the handler trait, its context, and the
//! dispatcher.

pub mod context;
pub mod registry;

pub use context::{Context, Handler};
pub use registry::{Phase, Registry};
