use std::fmt;
use std::sync::Arc;

use crate::store::{Store, Subscription};

/// Keeps a selector's upstream listener alive, recursively through chained
/// derivations. Dropping the last clone of a selector drops its chain and
/// detaches every listener it installed.
struct Chain {
    _subscription: Subscription,
    _parent: Option<Arc<Chain>>,
}

/// A derived, read-only observable computed from a [`Store`].
///
/// A selector applies a projection to its source's value and holds the last
/// projected result. On every upstream write it recomputes once and notifies
/// its own subscribers only when the new result differs from the previous one
/// under its equality predicate (`==` by default). Consecutive emissions are
/// therefore never equal, no matter how often the source changes.
///
/// Unlike a raw store subscription, a selector listener is invoked
/// immediately with the current value when it attaches, so late subscribers
/// always start from the latest settled state.
///
/// Selectors are created with [`Store::select`] / [`Store::select_with`] and
/// can themselves be further derived. Cloning a selector clones the handle;
/// dropping every clone detaches the selector from its source.
///
/// # Examples
///
/// ```
/// use modelcell::Store;
///
/// let store = Store::new((1, "a"));
/// let first = store.select(|pair| pair.0);
/// assert_eq!(first.get(), 1);
///
/// store.set((2, "b"));
/// assert_eq!(first.get(), 2);
/// ```
pub struct Selector<R> {
    cell: Store<R>,
    chain: Arc<Chain>,
}

impl<V: Clone + Send + Sync + 'static> Store<V> {
    /// Derive a read-only view of this store through `projection`.
    ///
    /// The view recomputes on every write to this store and re-emits only
    /// when the projected value changed under `==`.
    pub fn select<R>(&self, projection: impl Fn(&V) -> R + Send + Sync + 'static) -> Selector<R>
    where
        R: Clone + PartialEq + Send + Sync + 'static,
    {
        self.select_with(projection, |previous, next| previous == next)
    }

    /// Like [`select`](Store::select), with a caller-supplied equality
    /// predicate deciding whether a recomputed value counts as a change.
    pub fn select_with<R>(
        &self,
        projection: impl Fn(&V) -> R + Send + Sync + 'static,
        equals: impl Fn(&R, &R) -> bool + Send + Sync + 'static,
    ) -> Selector<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        derive(self, None, projection, equals)
    }
}

fn derive<V, R>(
    source: &Store<V>,
    parent: Option<Arc<Chain>>,
    projection: impl Fn(&V) -> R + Send + Sync + 'static,
    equals: impl Fn(&R, &R) -> bool + Send + Sync + 'static,
) -> Selector<R>
where
    V: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    let initial = source.read(|value| projection(value));
    let cell = Store::new(initial);

    // One projection call and one equality check per upstream write,
    // regardless of how many subscribers the selector has.
    let subscription = {
        let cell = cell.clone();
        source.subscribe(move |value| {
            let next = projection(value);
            if cell.read(|previous| !equals(previous, &next)) {
                cell.set(next);
            }
        })
    };

    Selector {
        cell,
        chain: Arc::new(Chain {
            _subscription: subscription,
            _parent: parent,
        }),
    }
}

impl<R: Clone + Send + Sync + 'static> Selector<R> {
    /// Get a clone of the last emitted value.
    pub fn get(&self) -> R {
        self.cell.get()
    }

    /// Read the last emitted value through a closure without cloning it.
    pub fn read<O>(&self, f: impl FnOnce(&R) -> O) -> O {
        self.cell.read(f)
    }

    /// Subscribe to emissions of this selector.
    ///
    /// The listener is invoked synchronously with the current value right
    /// away, then once per gated emission. The returned [`Subscription`]
    /// detaches it when dropped.
    pub fn subscribe(&self, listener: impl Fn(&R) + Send + Sync + 'static) -> Subscription {
        self.cell.read(|value| listener(value));
        self.cell.subscribe(listener)
    }

    /// Number of listeners currently attached to this selector.
    pub fn subscriber_count(&self) -> usize {
        self.cell.subscriber_count()
    }

    /// Derive a further view from this selector; equality gate is `==`.
    pub fn select<S>(&self, projection: impl Fn(&R) -> S + Send + Sync + 'static) -> Selector<S>
    where
        S: Clone + PartialEq + Send + Sync + 'static,
    {
        self.select_with(projection, |previous, next| previous == next)
    }

    /// Derive a further view with a caller-supplied equality predicate.
    pub fn select_with<S>(
        &self,
        projection: impl Fn(&R) -> S + Send + Sync + 'static,
        equals: impl Fn(&S, &S) -> bool + Send + Sync + 'static,
    ) -> Selector<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        derive(&self.cell, Some(Arc::clone(&self.chain)), projection, equals)
    }
}

impl<R> Clone for Selector<R> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            chain: Arc::clone(&self.chain),
        }
    }
}

impl<R: Clone + Send + Sync + fmt::Debug + 'static> fmt::Debug for Selector<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("value", &self.cell.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
