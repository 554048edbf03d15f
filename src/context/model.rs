use std::fmt;

use crate::context::Actions;
use crate::error::ContextError;
use crate::scope::{self, ContextKey};
use crate::store::{Selector, Store};

/// A store managed by a model context: the model value, or `None`.
pub type ModelStore<T> = Store<Option<T>>;

/// The scope key a model context registers its stores under.
pub type ModelKey<T> = ContextKey<ModelStore<T>>;

/// Where a provided store lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreScope {
    /// A fresh store tied to the providing component's subtree.
    #[default]
    Local,
    /// The context's single process-wide store.
    Global,
}

/// What store resolution does when no enclosing scope provided a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Fallback {
    /// Fall back to the context's global store; never fails.
    #[default]
    Global,
    /// Fail with [`ContextError::MissingProvider`].
    Strict,
}

/// Options for [`create_model_context`].
pub struct ContextOptions<T> {
    /// Diagnostic name, used in log events and error messages.
    pub name: Option<&'static str>,
    /// Scope key to register stores under; minted fresh when absent.
    pub key: Option<ModelKey<T>>,
    /// Initial value of the global store.
    pub initial: Option<T>,
    /// Scope used by `provide`/`mount` when the call does not override it.
    pub default_scope: StoreScope,
}

impl<T> Default for ContextOptions<T> {
    fn default() -> Self {
        Self {
            name: None,
            key: None,
            initial: None,
            default_scope: StoreScope::default(),
        }
    }
}

/// Options for [`ModelContext::provide_with`].
pub struct ProvideOptions<T> {
    /// Register this store instead of choosing one by scope.
    pub store: Option<ModelStore<T>>,
    /// Override the context's default scope for this call.
    pub scope: Option<StoreScope>,
}

impl<T> Default for ProvideOptions<T> {
    fn default() -> Self {
        Self {
            store: None,
            scope: None,
        }
    }
}

/// Options for [`ModelContext::mount_with`].
pub struct MountOptions<T> {
    /// Register this store instead of choosing one by scope.
    pub store: Option<ModelStore<T>>,
    /// Override the context's default scope for this call.
    pub scope: Option<StoreScope>,
    /// Reset the mounted store to `None` when the mounting scope tears down.
    pub reset_on_destroy: bool,
}

impl<T> Default for MountOptions<T> {
    fn default() -> Self {
        Self {
            store: None,
            scope: None,
            reset_on_destroy: true,
        }
    }
}

/// Create a model context for one application model type.
///
/// Allocates the context's key (unless one is supplied) and its global store,
/// initialized to `options.initial`. Pure allocation: nothing is registered
/// in any scope until [`provide`](ModelContext::provide) or
/// [`mount`](ModelContext::mount) is called.
///
/// # Examples
///
/// ```
/// use modelcell::{create_model_context, ContextOptions};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Profile {
///     likes: u32,
/// }
///
/// let profile = create_model_context::<Profile>(ContextOptions {
///     name: Some("profile"),
///     ..Default::default()
/// });
/// assert_eq!(profile.get_global(), None);
/// ```
pub fn create_model_context<T: Clone + Send + Sync + 'static>(
    options: ContextOptions<T>,
) -> ModelContext<T> {
    ModelContext::new(options)
}

/// A factory-produced handle managing one shared model across a component
/// tree.
///
/// A context bundles a unique scope key, a single global store (created once,
/// never replaced), and the operations for providing, resolving, reading,
/// and deriving from the model's current store. Providers register a store
/// during their initialization; consumers anywhere in the subtree resolve it,
/// falling back to the global store when no provider is in scope.
///
/// Cloning a context clones the handle: all clones share the same key and
/// global store.
pub struct ModelContext<T> {
    key: ModelKey<T>,
    global: ModelStore<T>,
    default_scope: StoreScope,
    name: Option<&'static str>,
}

impl<T: Clone + Send + Sync + 'static> ModelContext<T> {
    /// See [`create_model_context`].
    pub fn new(options: ContextOptions<T>) -> Self {
        let key = options.key.unwrap_or_else(ContextKey::unique);
        let context = Self {
            key,
            global: Store::new(options.initial),
            default_scope: options.default_scope,
            name: options.name,
        };
        tracing::debug!(
            context = context.label(),
            key = key.id(),
            default_scope = ?context.default_scope,
            "created model context"
        );
        context
    }

    /// Provide a store holding `data` for the current scope.
    ///
    /// Chooses a store by the context's default scope (a fresh local store,
    /// or the global one), registers it under the context's key, writes
    /// `data` into it, and returns it. Providing again in the same scope
    /// overwrites the registration; the last call wins for that scope.
    ///
    /// Must be called during component initialization (inside
    /// [`scope::enter`]).
    pub fn provide(&self, data: impl Into<Option<T>>) -> ModelStore<T> {
        self.provide_with(data, ProvideOptions::default())
    }

    /// Like [`provide`](ModelContext::provide), with an explicit store or
    /// scope override.
    pub fn provide_with(
        &self,
        data: impl Into<Option<T>>,
        options: ProvideOptions<T>,
    ) -> ModelStore<T> {
        let scope = options.scope.unwrap_or(self.default_scope);
        let store = match options.store {
            Some(store) => store,
            None => match scope {
                StoreScope::Global => self.global.clone(),
                StoreScope::Local => Store::new(None),
            },
        };
        scope::provide_value(self.key, store.clone());
        store.set(data.into());
        tracing::debug!(
            context = self.label(),
            scope = ?scope,
            depth = scope::depth(),
            "provided store"
        );
        store
    }

    /// Register a caller-owned store for the current scope without writing
    /// to it.
    pub fn provide_store(&self, store: &ModelStore<T>) -> ModelStore<T> {
        scope::provide_value(self.key, store.clone());
        tracing::debug!(
            context = self.label(),
            depth = scope::depth(),
            "provided existing store"
        );
        store.clone()
    }

    /// Provide a store holding `data` and reset it to `None` when the
    /// current scope tears down.
    ///
    /// This is the intended top-level entry point: one `mount` per logical
    /// page or section of the tree. Use [`mount_with`](ModelContext::mount_with)
    /// to opt out of the teardown reset.
    pub fn mount(&self, data: impl Into<Option<T>>) -> ModelStore<T> {
        self.mount_with(data, MountOptions::default())
    }

    /// Like [`mount`](ModelContext::mount), with explicit options.
    pub fn mount_with(
        &self,
        data: impl Into<Option<T>>,
        options: MountOptions<T>,
    ) -> ModelStore<T> {
        let store = self.provide_with(
            data,
            ProvideOptions {
                store: options.store,
                scope: options.scope,
            },
        );
        if options.reset_on_destroy {
            let name = self.label();
            let store = store.clone();
            scope::on_destroy(move || {
                tracing::debug!(context = name, "mounted scope torn down, resetting store");
                store.set(None);
            });
        }
        store
    }

    /// Resolve the store for the current position in the tree.
    ///
    /// Returns the nearest store registered by an enclosing scope. When none
    /// is registered, [`Fallback::Global`] yields the context's global store
    /// and [`Fallback::Strict`] fails with
    /// [`ContextError::MissingProvider`].
    ///
    /// Must be called during component initialization (inside
    /// [`scope::enter`]).
    pub fn resolve_store(&self, fallback: Fallback) -> Result<ModelStore<T>, ContextError> {
        match fallback {
            Fallback::Global => Ok(self.store()),
            Fallback::Strict => self.try_store(),
        }
    }

    /// Resolve the current store, falling back to the global one. Never
    /// fails.
    pub fn store(&self) -> ModelStore<T> {
        scope::lookup_value(self.key).unwrap_or_else(|| self.global.clone())
    }

    /// Resolve the current store strictly: some enclosing scope must have
    /// provided one.
    pub fn try_store(&self) -> Result<ModelStore<T>, ContextError> {
        scope::lookup_value(self.key).ok_or_else(|| {
            tracing::debug!(
                context = self.label(),
                depth = scope::depth(),
                "strict resolution found no provider"
            );
            ContextError::MissingProvider {
                context: self.label().to_string(),
            }
        })
    }

    /// Derive a read-only view of the current store's model.
    ///
    /// Resolves the store once, at call time, with global fallback. The view
    /// recomputes on every write to that store and re-emits only when the
    /// projected value changed under `==`; see [`Selector`].
    pub fn select<R>(
        &self,
        projection: impl Fn(&Option<T>) -> R + Send + Sync + 'static,
    ) -> Selector<R>
    where
        R: Clone + PartialEq + Send + Sync + 'static,
    {
        self.store().select(projection)
    }

    /// Like [`select`](ModelContext::select), with a caller-supplied
    /// equality predicate.
    pub fn select_with<R>(
        &self,
        projection: impl Fn(&Option<T>) -> R + Send + Sync + 'static,
        equals: impl Fn(&R, &R) -> bool + Send + Sync + 'static,
    ) -> Selector<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        self.store().select_with(projection, equals)
    }

    /// Resolve the current store once and return mutation operations bound
    /// to it.
    ///
    /// Resolution happens here, at bind time, so this must be called during
    /// component initialization; the returned [`Actions`] handle is then
    /// valid anywhere, for the rest of the component's life.
    pub fn bind_actions(&self) -> Actions<T> {
        Actions::bound(self.store())
    }

    /// Set the current store's model. Resolves with global fallback.
    pub fn set(&self, value: impl Into<Option<T>>) {
        self.store().set(value.into());
    }

    /// Update the current store's model in place. Resolves with global
    /// fallback.
    pub fn update(&self, f: impl FnOnce(&mut Option<T>)) {
        self.store().update(f);
    }

    /// Get a clone of the current store's model. Resolves with global
    /// fallback.
    pub fn get(&self) -> Option<T> {
        self.store().get()
    }

    /// Set the global store's model. Valid anywhere; no scope resolution.
    pub fn set_global(&self, value: impl Into<Option<T>>) {
        self.global.set(value.into());
    }

    /// Update the global store's model in place. Valid anywhere.
    pub fn update_global(&self, f: impl FnOnce(&mut Option<T>)) {
        self.global.update(f);
    }

    /// Get a clone of the global store's model. Valid anywhere.
    pub fn get_global(&self) -> Option<T> {
        self.global.get()
    }

    /// Overwrite `store`'s model unconditionally.
    ///
    /// For reconciling externally refreshed data into an already-registered
    /// store — for example after a navigation that reuses a mounted
    /// component — without touching any scope registration.
    pub fn sync(&self, store: &ModelStore<T>, data: impl Into<Option<T>>) {
        tracing::trace!(context = self.label(), "syncing externally refreshed data");
        store.set(data.into());
    }

    /// The scope key this context registers stores under.
    pub fn key(&self) -> ModelKey<T> {
        self.key
    }

    /// The context's global store handle.
    pub fn global(&self) -> &ModelStore<T> {
        &self.global
    }

    /// The diagnostic name given at creation, if any.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// The scope `provide`/`mount` use when not overridden per call.
    pub fn default_scope(&self) -> StoreScope {
        self.default_scope
    }

    fn label(&self) -> &'static str {
        self.name.unwrap_or("<unnamed>")
    }
}

impl<T> Clone for ModelContext<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            global: self.global.clone(),
            default_scope: self.default_scope,
            name: self.name,
        }
    }
}

impl<T: Clone + Send + Sync + fmt::Debug + 'static> fmt::Debug for ModelContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("default_scope", &self.default_scope)
            .field("global", &self.global)
            .finish()
    }
}
