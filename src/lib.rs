//! Reductor: a reducer-driven state store
//!
//! Reductor follows the "pure core, imperative shell" split. Reducers are pure
//! functions from a state snapshot and a command to the next snapshot, while
//! asynchronous work is isolated in effects run by middleware.
//!
//! # Core Concepts
//!
//! - **Commands**: Plain values describing what happened, via the `Command` trait
//! - **Reducers**: Pure functions producing the next immutable snapshot
//! - **Slices**: Named reducers combined into one root reducer over a `StateTree`
//! - **Store**: Owns the current snapshot, dispatches and notifies subscribers
//! - **Middleware**: A chain wrapping dispatch; `ThunkMiddleware` runs effects
//!
//! # Example
//!
//! ```rust
//! use reductor::{action_enum, StoreBuilder};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default)]
//! struct Todos {
//!     tasks: Vec<String>,
//! }
//!
//! action_enum! {
//!     #[derive(Debug)]
//!     enum TodoAction {
//!         Add(String) => "add",
//!         Delete(usize) => "delete",
//!     }
//!     prefix: "todos"
//! }
//!
//! fn todos(state: &Arc<Todos>, action: &TodoAction) -> Arc<Todos> {
//!     match action {
//!         TodoAction::Add(title) => {
//!             let mut tasks = state.tasks.clone();
//!             tasks.push(title.clone());
//!             Arc::new(Todos { tasks })
//!         }
//!         TodoAction::Delete(index) if *index < state.tasks.len() => {
//!             let mut tasks = state.tasks.clone();
//!             tasks.remove(*index);
//!             Arc::new(Todos { tasks })
//!         }
//!         TodoAction::Delete(_) => Arc::clone(state),
//!     }
//! }
//!
//! let store = StoreBuilder::new()
//!     .initial(Todos::default())
//!     .reducer_fn(todos)
//!     .build()
//!     .unwrap();
//!
//! let _subscription = store.subscribe(|| println!("state changed"));
//! store.dispatch(TodoAction::Add("Buy milk".into())).unwrap();
//! store.dispatch(TodoAction::Add("Buy eggs".into())).unwrap();
//! store.dispatch(TodoAction::Delete(0)).unwrap();
//!
//! assert_eq!(store.get_state().tasks, vec!["Buy eggs"]);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod effects;
pub mod middleware;
pub mod store;

// Re-export commonly used types
pub use builder::{configure_store, create_store, BuildError, StoreBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{Action, Command, Reducer, ReducerError, SliceRegistry, StateTree};
pub use effects::{Effect, EffectContext, EffectError, EffectHandle, EffectResult};
pub use middleware::{Middleware, ThunkMiddleware};
pub use store::{Dispatched, Store, StoreConfig, StoreError, Subscription};
