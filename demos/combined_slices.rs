//! Combined Slices
//!
//! This example composes independent reducers into one store and shows
//! that regions untouched by a command keep their identity.
//!
//! Key concepts:
//! - Registering slices by name with a default value
//! - Typed reads from the combined state tree
//! - Referential stability for unchanged slices
//! - Saving and resuming a store through a checkpoint
//!
//! Run with: cargo run --example combined_slices

use reductor::core::{SliceRegistry, StateTree};
use reductor::{action_enum, configure_store, Checkpoint, StoreBuilder, StoreConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    name: String,
    email: String,
}

action_enum! {
    #[derive(Debug, Clone)]
    enum AppAction {
        Increment => "increment",
        Decrement => "decrement",
        UpdateEmail(String) => "updateEmail",
    }
    prefix: "app"
}

fn counter(n: &Arc<i64>, action: &AppAction) -> Arc<i64> {
    match action {
        AppAction::Increment => Arc::new(**n + 1),
        AppAction::Decrement => Arc::new(**n - 1),
        _ => Arc::clone(n),
    }
}

fn user(user: &Arc<User>, action: &AppAction) -> Arc<User> {
    match action {
        AppAction::UpdateEmail(email) if *email != user.email => Arc::new(User {
            email: email.clone(),
            ..(**user).clone()
        }),
        _ => Arc::clone(user),
    }
}

fn slices() -> SliceRegistry<AppAction> {
    SliceRegistry::new().slice("counter", 0i64, counter).slice(
        "user",
        User {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        },
        user,
    )
}

fn describe(label: &str, before: &StateTree, after: &StateTree) {
    let counter_same = match (before.get::<i64>("counter"), after.get::<i64>("counter")) {
        (Some(a), Some(b)) => Arc::ptr_eq(&a, &b),
        _ => false,
    };
    let user_same = match (before.get::<User>("user"), after.get::<User>("user")) {
        (Some(a), Some(b)) => Arc::ptr_eq(&a, &b),
        _ => false,
    };
    println!(
        "  {:<22} counter reused: {:<5} user reused: {}",
        label, counter_same, user_same
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Combined Slices Example ===\n");

    let store = configure_store(slices())?;

    println!("Dispatching commands:");
    let before = store.get_state();
    store.dispatch(AppAction::Increment)?;
    let after_increment = store.get_state();
    describe("increment", &before, &after_increment);

    store.dispatch(AppAction::UpdateEmail("ada@lovelace.dev".into()))?;
    let after_email = store.get_state();
    describe("updateEmail", &after_increment, &after_email);

    store.dispatch(AppAction::UpdateEmail("ada@lovelace.dev".into()))?;
    let after_same_email = store.get_state();
    println!(
        "  {:<22} whole tree reused: {}\n",
        "same email again",
        Arc::ptr_eq(&after_email, &after_same_email)
    );

    let count = store.select(|tree| tree.get::<i64>("counter").map(|n| *n));
    let email = store.select(|tree| tree.get::<User>("user").map(|u| u.email.clone()));
    println!("Current state:");
    println!("  counter: {:?}", count);
    println!("  email:   {:?}\n", email);

    println!("Rejecting an invalid registry:");
    let duplicate = slices().slice("counter", 0i64, counter);
    match configure_store(duplicate) {
        Ok(_) => println!("  Unexpectedly accepted"),
        Err(e) => println!("  Error: {}\n", e),
    }

    println!("Checkpointing a single-slice store:");
    let users = StoreBuilder::new()
        .initial(User {
            name: "Grace".into(),
            email: "grace@example.com".into(),
        })
        .reducer_fn(user)
        .config(StoreConfig::named("users").with_history(8))
        .build()?;
    users.dispatch(AppAction::UpdateEmail("grace@navy.mil".into()))?;

    let json = users.checkpoint().to_json()?;
    println!("  Saved {} bytes of JSON", json.len());

    let resumed = StoreBuilder::new()
        .restore(Checkpoint::<User>::from_json(&json)?)
        .reducer_fn(user)
        .config(StoreConfig::named("users").with_history(8))
        .build()?;
    println!("  Resumed email: {}\n", resumed.get_state().email);

    println!("Key Takeaways:");
    println!("- Each slice reducer only sees its own region of the tree");
    println!("- Unchanged slices and unchanged trees keep the same Arc");
    println!("- Checkpoints capture state and history, not reducers or subscribers");

    println!("\n=== Example Complete ===");
    Ok(())
}
