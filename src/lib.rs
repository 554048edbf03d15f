//! # Modelcell
//!
//! Share one piece of application data ("model") across a component tree,
//! with fine-grained subscription to slices of it.
//!
//! Modelcell composes two small primitives into a named, ergonomic API:
//!
//! ## Store (observable cell)
//!
//! - `Store<V>` - a mutable cell that notifies subscribers synchronously on
//!   every write, in subscription order
//! - `Selector<R>` - a read-only view derived through a projection,
//!   re-emitting only when the projected value actually changed
//! - `Subscription` - RAII guard detaching a listener on drop
//!
//! ## Scope (tree-scoped lookup)
//!
//! - `scope::enter` - run a component's setup inside a scope frame
//! - `scope::provide_value` / `scope::lookup_value` - nearest-enclosing
//!   key/value bindings, restricted to initialization time
//! - `scope::on_destroy` - teardown callbacks for the current frame
//!
//! ## Model contexts (the two combined)
//!
//! - `ModelContext<T>` - provide a store for a subtree, resolve it from
//!   anywhere below (falling back to a per-context global store), derive
//!   selectors, and bind actions for use after initialization
//!
//! ```
//! use modelcell::{create_model_context, scope, ContextOptions};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Counter {
//!     count: u32,
//! }
//!
//! let counter = create_model_context::<Counter>(ContextOptions::default());
//!
//! scope::enter(|| {
//!     counter.mount(Counter { count: 0 });
//!
//!     let count = counter.select(|model| model.as_ref().map_or(0, |c| c.count));
//!     let actions = counter.bind_actions();
//!
//!     actions.update(|model| {
//!         if let Some(counter) = model.as_mut() {
//!             counter.count += 1;
//!         }
//!     });
//!     assert_eq!(count.get(), 1);
//! });
//! ```

pub mod context;
pub mod scope;
pub mod store;

mod error;

// Re-export main types for convenience
pub use context::{
    create_model_context, Actions, ContextOptions, Fallback, ModelContext, ModelKey, ModelStore,
    MountOptions, ProvideOptions, StoreScope,
};
pub use error::ContextError;
pub use scope::ContextKey;
pub use store::{Selector, Store, Subscription};
