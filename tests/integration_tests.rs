//! Integration tests for Modelcell

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use parking_lot::Mutex;

use modelcell::{
    create_model_context, scope, ContextError, ContextOptions, Fallback, MountOptions, Store,
    StoreScope,
};

#[derive(Clone, Debug, PartialEq)]
struct Post {
    id: u32,
    likes: u32,
}

fn post_context() -> modelcell::ModelContext<Post> {
    create_model_context(ContextOptions {
        name: Some("post"),
        ..Default::default()
    })
}

#[test]
fn direct_subscriber_observes_exact_write_sequence() {
    let store = Store::new(0);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let _sub = store.subscribe({
        let seen = seen.clone();
        move |value| seen.lock().push(*value)
    });

    for value in [1, 2, 2, 3] {
        store.set(value);
    }

    // No coalescing, no suppression: one notification per write.
    assert_eq!(*seen.lock(), vec![1, 2, 2, 3]);
}

#[test]
fn selector_emits_distinct_projections_only() {
    let store = Store::new(Post { id: 1, likes: 0 });
    let likes = store.select(|p| p.likes);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let _sub = likes.subscribe({
        let seen = seen.clone();
        move |value| seen.lock().push(*value)
    });

    for count in [0, 0, 1, 1, 1, 2, 0] {
        store.update(move |p| p.likes = count);
    }

    assert_eq!(*seen.lock(), vec![0, 1, 2, 0]);
}

#[test]
fn mount_then_select_then_update_scenario() {
    // Context created with no initial value; mount registers a local store;
    // a descendant selects the like count; bound actions bump it.
    let context = post_context();

    scope::enter(|| {
        context.mount(Post { id: 1, likes: 0 });

        scope::enter(|| {
            let likes = context.select(|model| model.as_ref().map_or(0, |p| p.likes));
            let actions = context.bind_actions();
            let seen = Arc::new(Mutex::new(Vec::new()));

            let _sub = likes.subscribe({
                let seen = seen.clone();
                move |value| seen.lock().push(*value)
            });

            actions.update(|model| {
                if let Some(post) = model.as_mut() {
                    post.likes += 1;
                }
            });

            assert_eq!(*seen.lock(), vec![0, 1]);
        });
    });
}

#[test]
fn select_without_any_mount_falls_back_to_global() {
    let context = post_context();
    scope::enter(|| {
        let model = context.select(|model| model.clone());
        assert_eq!(model.get(), None);
    });

    let seeded = create_model_context::<Post>(ContextOptions {
        initial: Some(Post { id: 7, likes: 3 }),
        ..Default::default()
    });
    scope::enter(|| {
        let model = seeded.select(|model| model.clone());
        assert_eq!(model.get(), Some(Post { id: 7, likes: 3 }));
    });
}

#[test]
fn sibling_mounts_are_isolated() {
    let context = post_context();

    scope::enter(|| {
        let first = scope::enter(|| {
            let store = context.mount_with(
                Post { id: 1, likes: 0 },
                MountOptions {
                    reset_on_destroy: false,
                    ..Default::default()
                },
            );
            (store, context.bind_actions())
        });
        let second = scope::enter(|| {
            let store = context.mount_with(
                Post { id: 2, likes: 0 },
                MountOptions {
                    reset_on_destroy: false,
                    ..Default::default()
                },
            );
            (store, context.bind_actions())
        });

        first.1.update(|model| {
            if let Some(post) = model.as_mut() {
                post.likes = 10;
            }
        });

        assert_eq!(first.0.get(), Some(Post { id: 1, likes: 10 }));
        assert_eq!(second.0.get(), Some(Post { id: 2, likes: 0 }));
    });
}

#[test]
fn global_fallback_never_fails_strict_fails_without_provider() {
    let context = post_context();

    scope::enter(|| {
        assert!(context.resolve_store(Fallback::Global).is_ok());
        assert!(matches!(
            context.resolve_store(Fallback::Strict),
            Err(ContextError::MissingProvider { .. })
        ));

        context.provide(Post { id: 1, likes: 0 });
        assert!(context.resolve_store(Fallback::Strict).is_ok());
    });
}

#[test]
fn nested_provider_shadows_outer_for_descendants() {
    let context = post_context();

    scope::enter(|| {
        context.provide(Post { id: 1, likes: 0 });
        scope::enter(|| {
            context.provide(Post { id: 2, likes: 0 });
            assert_eq!(context.get().map(|p| p.id), Some(2));
        });
        // Back in the outer scope the original registration is visible.
        assert_eq!(context.get().map(|p| p.id), Some(1));
    });
}

#[test]
fn mount_teardown_resets_and_notifies_subscribers() {
    let context = post_context();
    let resets = Arc::new(AtomicUsize::new(0));

    let store = scope::enter(|| {
        let store = context.mount(Post { id: 1, likes: 0 });
        store
            .subscribe({
                let resets = resets.clone();
                move |value| {
                    if value.is_none() {
                        resets.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
            .detach();
        store
    });

    assert_eq!(store.get(), None);
    assert_eq!(resets.load(Ordering::SeqCst), 1);
}

#[test]
fn sync_reconciles_refreshed_data() {
    let context = post_context();
    let store = scope::enter(|| {
        context.mount_with(
            Post { id: 1, likes: 4 },
            MountOptions {
                reset_on_destroy: false,
                ..Default::default()
            },
        )
    });

    // A navigation refreshed the data out of band; reconcile without
    // re-registering anything.
    context.sync(&store, Post { id: 1, likes: 9 });
    assert_eq!(store.get(), Some(Post { id: 1, likes: 9 }));
}

#[test]
fn global_scope_context_shares_one_store_across_mount_points() {
    let context = create_model_context::<Post>(ContextOptions {
        default_scope: StoreScope::Global,
        ..Default::default()
    });

    scope::enter(|| {
        let store = context.mount_with(
            Post { id: 1, likes: 0 },
            MountOptions {
                reset_on_destroy: false,
                ..Default::default()
            },
        );
        assert_eq!(store, *context.global());
    });

    // The write went to the context-wide store.
    assert_eq!(context.get_global(), Some(Post { id: 1, likes: 0 }));
}

#[test]
fn two_contexts_do_not_share_state() {
    let posts = post_context();
    let drafts = post_context();

    posts.set_global(Post { id: 1, likes: 0 });
    assert_eq!(drafts.get_global(), None);

    scope::enter(|| {
        posts.provide(Post { id: 2, likes: 0 });
        assert!(drafts.try_store().is_err());
    });
}

#[test]
fn selector_and_actions_work_across_threads() {
    let context = post_context();
    let (likes, actions) = scope::enter(|| {
        context.mount_with(
            Post { id: 1, likes: 0 },
            MountOptions {
                reset_on_destroy: false,
                ..Default::default()
            },
        );
        (
            context.select(|model| model.as_ref().map_or(0, |p| p.likes)),
            context.bind_actions(),
        )
    });

    let writer = std::thread::spawn(move || {
        actions.update(|model| {
            if let Some(post) = model.as_mut() {
                post.likes = 42;
            }
        });
    });
    writer.join().expect("writer thread panicked");

    assert_eq!(likes.get(), 42);
}

#[test]
fn notification_pass_completes_before_write_returns() {
    let store = Store::new(0);
    let calls = Arc::new(AtomicUsize::new(0));

    let _sub = store.subscribe({
        let calls = calls.clone();
        move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    });

    store.set(1);
    // Synchronous delivery: the count is already visible here.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
