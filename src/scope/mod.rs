//! Tree-scoped key/value bindings for component initialization.
//!
//! A component tree initializes synchronously, child setup nesting inside
//! parent setup. This module models that with a thread-local stack of scope
//! frames: [`enter`] pushes a frame around one component's setup closure,
//! [`provide_value`] binds a value for the frame and its descendants,
//! [`lookup_value`] resolves the nearest enclosing binding, and
//! [`on_destroy`] schedules teardown work for when the frame exits.
//!
//! All four are restricted to initialization time: outside any frame the
//! positional information they depend on does not exist, so they panic
//! rather than silently misbehave.

mod key;
mod registry;

pub use key::ContextKey;
pub use registry::{depth, enter, lookup_value, on_destroy, provide_value};
