//! A profile page sharing one model across its component tree.
//!
//! Run with `RUST_LOG=modelcell=trace` to see the crate's tracing events.

use modelcell::{create_model_context, scope, ContextOptions};

#[derive(Clone, Debug, PartialEq)]
struct Profile {
    id: u32,
    name: String,
    likes: u32,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Profile Page ===\n");

    let profile = create_model_context::<Profile>(ContextOptions {
        name: Some("profile"),
        ..Default::default()
    });

    // The page component mounts the model; child components consume it.
    let store = scope::enter(|| {
        let store = profile.mount(Profile {
            id: 1,
            name: "Ada".to_string(),
            likes: 0,
        });
        println!("Mounted profile page");

        // A header component deep in the tree selects just the name.
        scope::enter(|| {
            let name = profile.select(|model| {
                model
                    .as_ref()
                    .map_or_else(|| "(nobody)".to_string(), |p| p.name.clone())
            });
            name.subscribe(|name| println!("header shows: {name}")).detach();
        });

        // A like button selects the count and binds actions during setup,
        // then "clicks" happen later, outside initialization.
        let (likes, actions) = scope::enter(|| {
            let likes = profile.select(|model| model.as_ref().map_or(0, |p| p.likes));
            likes
                .subscribe(|count| println!("like button shows: {count}"))
                .detach();
            (likes, profile.bind_actions())
        });

        println!("\nClicking like twice...");
        for _ in 0..2 {
            actions.update(|model| {
                if let Some(profile) = model.as_mut() {
                    profile.likes += 1;
                }
            });
        }

        println!("\nFinal like count: {}", likes.get());
        store
    });

    println!("\nPage torn down; store reset to {:?}", store.get());
}
