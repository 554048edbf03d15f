//! The observable cell and its derived views.
//!
//! [`Store`] is a mutable cell that notifies subscribers synchronously on
//! every write. [`Selector`] is a read-only view derived from a store through
//! a projection function, re-emitting only when the projected value actually
//! changes. [`Subscription`] is the RAII guard tying a listener's lifetime to
//! a value.

mod selector;
mod store;

pub use selector::Selector;
pub use store::{Store, Subscription};
