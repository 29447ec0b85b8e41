//! Todo List
//!
//! This example drives a todo list store through synchronous commands and
//! an asynchronous fetch.
//!
//! Key concepts:
//! - Commands declared with `action_enum!`
//! - A pure reducer returning the previous snapshot when nothing changes
//! - Subscribers notified after every applied command
//! - An effect dispatching started/succeeded/failed commands
//!
//! Run with: RUST_LOG=debug cargo run --example todo_list

use reductor::effects::{EffectContext, EffectError};
use reductor::middleware::LoggerMiddleware;
use reductor::{action_enum, Effect, EffectResult, StoreBuilder, StoreConfig, ThunkMiddleware};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
struct Todos {
    tasks: Vec<String>,
    loading: bool,
    error: Option<String>,
}

action_enum! {
    #[derive(Debug, Clone)]
    enum TodoAction {
        Add(String) => "add",
        Delete(usize) => "delete",
        FetchStarted => "fetchStarted",
        FetchSucceeded(Vec<String>) => "fetchSucceeded",
        FetchFailed(String) => "fetchFailed",
    }
    prefix: "todos"
}

fn todos(state: &Arc<Todos>, action: &TodoAction) -> Arc<Todos> {
    match action {
        TodoAction::Add(title) => {
            let mut tasks = state.tasks.clone();
            tasks.push(title.clone());
            Arc::new(Todos {
                tasks,
                ..(**state).clone()
            })
        }
        TodoAction::Delete(index) if *index < state.tasks.len() => {
            let mut tasks = state.tasks.clone();
            tasks.remove(*index);
            Arc::new(Todos {
                tasks,
                ..(**state).clone()
            })
        }
        TodoAction::Delete(_) => Arc::clone(state),
        TodoAction::FetchStarted => Arc::new(Todos {
            loading: true,
            error: None,
            ..(**state).clone()
        }),
        TodoAction::FetchSucceeded(tasks) => Arc::new(Todos {
            tasks: tasks.clone(),
            loading: false,
            error: None,
        }),
        TodoAction::FetchFailed(reason) => Arc::new(Todos {
            loading: false,
            error: Some(reason.clone()),
            ..(**state).clone()
        }),
    }
}

// Simulated remote call
async fn fetch_remote(fail: bool) -> Result<Vec<String>, String> {
    tokio::time::sleep(Duration::from_millis(50)).await;
    if fail {
        Err("server unavailable".to_string())
    } else {
        Ok(vec!["Write report".to_string(), "Call plumber".to_string()])
    }
}

fn fetch_todos(fail: bool) -> Effect<Todos, TodoAction> {
    Effect::new(
        "todos/fetch",
        move |ctx: EffectContext<Todos, TodoAction>| async move {
            ctx.dispatch(TodoAction::FetchStarted)?;
            let tasks = fetch_remote(fail).await.map_err(EffectError::failed)?;
            ctx.dispatch(TodoAction::FetchSucceeded(tasks))?;
            EffectResult::Ok(())
        },
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Todo List Example ===\n");

    let store = StoreBuilder::new()
        .initial(Todos::default())
        .reducer_fn(todos)
        .middleware(LoggerMiddleware::new())
        .middleware(ThunkMiddleware::new().on_error(|_, err: &EffectError| {
            Some(TodoAction::FetchFailed(err.to_string()))
        }))
        .config(StoreConfig::named("todos").with_history(16))
        .build()?;

    let reader = store.clone();
    let subscription = store.subscribe(move || {
        let state = reader.get_state();
        println!(
            "  [Subscriber] {} task(s), loading: {}, error: {:?}",
            state.tasks.len(),
            state.loading,
            state.error
        );
    });

    println!("Adding and deleting tasks:");
    store.dispatch(TodoAction::Add("Buy milk".into()))?;
    store.dispatch(TodoAction::Add("Buy eggs".into()))?;
    store.dispatch(TodoAction::Delete(0))?;
    println!("  Tasks: {:?}\n", store.get_state().tasks);

    println!("Fetching tasks from the server:");
    if let Some(handle) = store.dispatch_effect(fetch_todos(false))?.into_handle() {
        handle.wait().await?;
    }
    println!("  Tasks: {:?}\n", store.get_state().tasks);

    println!("Fetching again with a failing server:");
    if let Some(handle) = store.dispatch_effect(fetch_todos(true))?.into_handle() {
        if let Err(e) = handle.wait().await {
            println!("  Effect ended with: {}", e);
        }
    }
    println!("  Error: {:?}\n", store.get_state().error);

    subscription.unsubscribe();

    if let Some(history) = store.history() {
        println!("Dispatch history:");
        for record in history.records() {
            println!(
                "  #{} {} (changed: {})",
                record.sequence, record.kind, record.changed
            );
        }
        println!();
    }

    println!("Key Takeaways:");
    println!("- Reducers are pure: same snapshot and command, same result");
    println!("- Effects do async work and only change state by dispatching commands");
    println!("- Failures become ordinary commands through the thunk middleware");

    println!("\n=== Example Complete ===");
    Ok(())
}
