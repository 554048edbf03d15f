use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};

use crate::scope::ContextKey;

/// One level of the initialization stack: the bindings a component provided
/// and the teardown callbacks it registered.
struct Frame {
    bindings: HashMap<u64, Box<dyn Any>>,
    teardown: Vec<Box<dyn FnOnce()>>,
}

impl Frame {
    fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            teardown: Vec::new(),
        }
    }
}

// Component trees initialize synchronously on one thread; the stack mirrors
// how child setup nests inside parent setup.
thread_local! {
    static SCOPE_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Run `f` inside a fresh scope frame.
///
/// Entering a scope models one component's initialization; nesting `enter`
/// calls models a child component initializing inside its parent. When `f`
/// returns, the frame is popped and its teardown callbacks (see
/// [`on_destroy`]) run in registration order. If `f` panics, the frame is
/// still popped but teardown callbacks do not run.
///
/// # Examples
///
/// ```
/// use modelcell::scope;
///
/// let value = scope::enter(|| {
///     scope::on_destroy(|| println!("torn down"));
///     21 * 2
/// });
/// assert_eq!(value, 42);
/// ```
pub fn enter<R>(f: impl FnOnce() -> R) -> R {
    SCOPE_STACK.with(|stack| stack.borrow_mut().push(Frame::new()));
    tracing::trace!(depth = depth(), "entered scope frame");

    let result = catch_unwind(AssertUnwindSafe(f));
    let frame = SCOPE_STACK.with(|stack| stack.borrow_mut().pop());

    match result {
        Ok(value) => {
            if let Some(frame) = frame {
                tracing::trace!(
                    callbacks = frame.teardown.len(),
                    "leaving scope frame, running teardown"
                );
                for callback in frame.teardown {
                    callback();
                }
            }
            value
        }
        Err(payload) => resume_unwind(payload),
    }
}

/// Register a callback to run when the current scope frame is torn down.
///
/// Callbacks run after the frame is popped, in the order they were
/// registered.
///
/// # Panics
///
/// Panics when called outside any scope frame.
pub fn on_destroy(callback: impl FnOnce() + 'static) {
    SCOPE_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let frame = stack.last_mut().unwrap_or_else(|| {
            panic!(
                "scope::on_destroy can only be called during component initialization; \
                 wrap setup in `scope::enter`"
            )
        });
        frame.teardown.push(Box::new(callback));
    });
}

/// Bind `value` to `key` in the current scope frame.
///
/// The binding is visible to [`lookup_value`] calls from this frame and any
/// frame nested inside it, until a nested frame shadows it with its own
/// binding for the same key. Binding the same key twice in one frame
/// overwrites the earlier binding.
///
/// # Panics
///
/// Panics when called outside any scope frame.
pub fn provide_value<V: Clone + 'static>(key: ContextKey<V>, value: V) {
    SCOPE_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let depth = stack.len();
        let frame = stack.last_mut().unwrap_or_else(|| {
            panic!(
                "scope::provide_value can only be called during component initialization; \
                 wrap setup in `scope::enter`"
            )
        });
        frame.bindings.insert(key.id(), Box::new(value));
        tracing::trace!(key = key.id(), depth, "bound value in scope frame");
    });
}

/// Look up the nearest binding for `key`, searching frames innermost-first.
///
/// # Panics
///
/// Panics when called outside any scope frame: past initialization the
/// positional information the lookup depends on no longer exists, so a late
/// call is a programming error rather than a miss.
pub fn lookup_value<V: Clone + 'static>(key: ContextKey<V>) -> Option<V> {
    SCOPE_STACK.with(|stack| {
        let stack = stack.borrow();
        if stack.is_empty() {
            panic!(
                "scope::lookup_value can only be called during component initialization; \
                 wrap setup in `scope::enter`"
            );
        }
        stack
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(&key.id()))
            .and_then(|binding| binding.downcast_ref::<V>())
            .cloned()
    })
}

/// Number of scope frames currently active on this thread.
pub fn depth() -> usize {
    SCOPE_STACK.with(|stack| stack.borrow().len())
}
