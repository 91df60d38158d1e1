//! End-to-end demo: compile a route table, drive client-side navigation,
//! compose a render plan, and build a per-request server router.
//!
//! Run with: cargo run -p trellis --example nested_outlets

use anyhow::Result;
use trellis::{
    compose, MemorySource, NavigationStore, RenderStep, Request, Routing, StaticRouter,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let routing = Routing::new()
        .with_get("/", "<Home/>")
        .with_get("/users", "<UsersLayout/>")
        .with_get("/users/:id", "<UserDetails/>")
        .with_post("/users", "<CreateUser/>");

    // Client side: a store bound to an in-memory location.
    let source = MemorySource::new("/users/42");
    let store = NavigationStore::new(&routing, source.clone())?;

    let subscription = store.subscribe(|matched| match matched {
        Some(matched) => println!("navigated to {}", matched.location.pathname),
        None => println!("navigated to an unknown route"),
    });

    source.set_location("/users/7", Some("?tab=posts"));
    store.on_route_change();
    subscription.unsubscribe();

    if let Some(current) = store.current() {
        println!("\nrender plan for {}:", current.location.pathname);
        if let Some(plan) = compose(&current) {
            print_plan(&plan, 1);
        }
    }

    // Server side: one isolated router per request.
    let router = StaticRouter::new(routing);
    let request = router.for_request(&Request::new("/users/42?tab=posts"))?;
    if let Some(matched) = request.current() {
        println!("\nserver match: {}", serde_json::to_string_pretty(&matched.location)?);
        for (path, entry) in &matched.matches {
            println!("  {} -> {:?} at {}", path, entry.params, entry.current_path);
        }
    }

    Ok(())
}

fn print_plan(step: &RenderStep<'_, &str>, depth: usize) {
    let pad = "  ".repeat(depth);
    match step {
        RenderStep::Leaf { fragment, .. } => println!("{pad}{fragment}"),
        RenderStep::Nested {
            fragment, outlet, ..
        } => {
            println!("{pad}{fragment}");
            for child in outlet {
                print_plan(child, depth + 1);
            }
        }
        RenderStep::Group(steps) => {
            for child in steps {
                print_plan(child, depth);
            }
        }
    }
}
