//! Shared-model contexts: the high-level surface of the crate.
//!
//! A [`ModelContext`] manages one application model across a component tree:
//! providers register a store for their subtree, consumers resolve it (with
//! global fallback) and read it directly, derive [`Selector`](crate::Selector)
//! views from it, or bind [`Actions`] to mutate it later.

mod actions;
mod model;

pub use actions::Actions;
pub use model::{
    create_model_context, ContextOptions, Fallback, ModelContext, ModelKey, ModelStore,
    MountOptions, ProvideOptions, StoreScope,
};
