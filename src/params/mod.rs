//! Layered view parameters
//!
//! A view is described by six layers: sources, grouping, classifier path, group
//! index, search and sort. [`ParameterStore`] owns them and applies the reset
//! rules between layers.

pub mod error;
pub mod store;
pub mod types;

pub use error::ParamsError;
pub use store::{Invalidate, ParameterStore};
pub use types::{Layer, ViewParameters};
