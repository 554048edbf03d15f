//! Two sibling tabs, each with its own local store, over a shared context.

use modelcell::{create_model_context, scope, ContextOptions, Fallback};

#[derive(Clone, Debug, PartialEq)]
struct Document {
    title: String,
    words: u32,
}

fn main() {
    println!("=== Scoped Tabs ===\n");

    let document = create_model_context::<Document>(ContextOptions {
        name: Some("document"),
        ..Default::default()
    });

    scope::enter(|| {
        // Without any provider, consumers fall back to the global store.
        println!(
            "before any tab mounts, resolved model: {:?}",
            document.get()
        );
        println!(
            "strict resolution: {:?}\n",
            document.resolve_store(Fallback::Strict).err()
        );

        // Each tab mounts its own local store; edits stay isolated. The
        // closure passed to `scope::enter` spans the tab's whole lifetime.
        let left_store = scope::enter(|| {
            let store = document.mount(Document {
                title: "notes.md".to_string(),
                words: 120,
            });
            let actions = document.bind_actions();
            document
                .select(|model| model.as_ref().map_or(0, |d| d.words))
                .subscribe(|words| println!("left tab word count: {words}"))
                .detach();

            println!("\nTyping in the left tab...");
            actions.update(|model| {
                if let Some(doc) = model.as_mut() {
                    doc.words += 30;
                }
            });
            store
        });

        let right_store = scope::enter(|| {
            let store = document.mount(Document {
                title: "draft.md".to_string(),
                words: 4000,
            });
            document
                .select(|model| model.as_ref().map_or(0, |d| d.words))
                .subscribe(|words| println!("\nright tab word count: {words}"))
                .detach();
            store
        });

        // Each tab was torn down when its scope exited, so both stores were
        // reset; the left tab's edits never touched the right tab's store.
        println!("\nafter teardown, left store:  {:?}", left_store.get());
        println!("after teardown, right store: {:?}", right_store.get());
        println!("global store untouched:      {:?}", document.get());
    });
}
