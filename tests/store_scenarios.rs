//! End-to-end scenarios: a todo list with an async fetch, composed
//! slices, guards and checkpoints.

use reductor::core::{SliceRegistry, StateTree};
use reductor::effects::{EffectContext, EffectError};
use reductor::middleware::{GuardMiddleware, LoggerMiddleware};
use reductor::{
    action_enum, configure_store, Checkpoint, Dispatched, Effect, EffectResult, Store,
    StoreBuilder, StoreConfig, ThunkMiddleware,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
struct Todos {
    tasks: Vec<String>,
    loading: bool,
    error: Option<String>,
}

action_enum! {
    #[derive(Clone, Debug, PartialEq)]
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
    let mut next = (**state).clone();
    match action {
        TodoAction::Add(title) => next.tasks.push(title.clone()),
        TodoAction::Delete(index) if *index < state.tasks.len() => {
            next.tasks.remove(*index);
        }
        TodoAction::Delete(_) => return Arc::clone(state),
        TodoAction::FetchStarted => {
            next.loading = true;
            next.error = None;
        }
        TodoAction::FetchSucceeded(tasks) => {
            next.loading = false;
            next.tasks = tasks.clone();
        }
        TodoAction::FetchFailed(reason) => {
            next.loading = false;
            next.error = Some(reason.clone());
        }
    }
    Arc::new(next)
}

fn todo_store() -> Store<Todos, TodoAction> {
    StoreBuilder::new()
        .initial(Todos::default())
        .reducer_fn(todos)
        .middleware(LoggerMiddleware::new())
        .middleware(ThunkMiddleware::new().on_error(|_, err: &EffectError| {
            Some(TodoAction::FetchFailed(err.to_string()))
        }))
        .config(StoreConfig::named("todos").with_history(32))
        .build()
        .unwrap()
}

fn fetch_todos(result: Result<Vec<String>, String>) -> Effect<Todos, TodoAction> {
    Effect::new(
        "todos/fetch",
        move |ctx: EffectContext<Todos, TodoAction>| async move {
            ctx.dispatch(TodoAction::FetchStarted)?;
            tokio::time::sleep(Duration::from_millis(10)).await;
            let tasks = result.map_err(EffectError::failed)?;
            ctx.dispatch(TodoAction::FetchSucceeded(tasks))?;
            EffectResult::Ok(())
        },
    )
}

#[test]
fn add_and_delete_tasks_notify_each_time() {
    let store = todo_store();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _subscription = store.subscribe(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.dispatch(TodoAction::Add("Buy milk".into())).unwrap();
    store.dispatch(TodoAction::Add("Buy eggs".into())).unwrap();
    store.dispatch(TodoAction::Delete(0)).unwrap();

    assert_eq!(store.get_state().tasks, vec!["Buy eggs"]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        store.history().unwrap().kinds(),
        vec!["todos/add", "todos/add", "todos/delete"]
    );
}

#[test]
fn out_of_range_delete_keeps_snapshot() {
    let store = todo_store();
    store.dispatch(TodoAction::Add("Buy milk".into())).unwrap();
    let before = store.get_state();

    let outcome = store.dispatch(TodoAction::Delete(5)).unwrap();

    assert!(matches!(outcome, Dispatched::Applied { changed: false }));
    assert!(Arc::ptr_eq(&before, &store.get_state()));
}

#[tokio::test]
async fn async_fetch_round_trip() {
    let store = todo_store();

    let handle = store
        .dispatch_effect(fetch_todos(Ok(vec!["a".into(), "b".into()])))
        .unwrap()
        .into_handle()
        .unwrap();
    handle.wait().await.unwrap();

    let state = store.get_state();
    assert!(!state.loading);
    assert_eq!(state.tasks, vec!["a", "b"]);
    assert_eq!(
        store.history().unwrap().kinds(),
        vec!["todos/fetchStarted", "todos/fetchSucceeded"]
    );
}

#[tokio::test]
async fn failed_fetch_dispatches_failure_command() {
    let store = todo_store();

    let handle = store
        .dispatch_effect(fetch_todos(Err("server unavailable".into())))
        .unwrap()
        .into_handle()
        .unwrap();
    let outcome = handle.wait().await;

    assert!(matches!(outcome, Err(EffectError::Failed(_))));
    let state = store.get_state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Effect failed: server unavailable"));
}

#[tokio::test]
async fn effect_reads_state_between_dispatches() {
    let store = todo_store();
    store.dispatch(TodoAction::Add("seed".into())).unwrap();

    let copy_first = Effect::new(
        "todos/duplicateFirst",
        |ctx: EffectContext<Todos, TodoAction>| async move {
            let first = ctx.get_state().tasks.first().cloned();
            if let Some(title) = first {
                ctx.dispatch(TodoAction::Add(title))?;
            }
            EffectResult::Ok(())
        },
    );
    let handle = store.dispatch_effect(copy_first).unwrap().into_handle().unwrap();
    handle.wait().await.unwrap();

    assert_eq!(store.get_state().tasks, vec!["seed", "seed"]);
}

#[test]
fn composed_slices_keep_untouched_regions() {
    #[derive(Debug, PartialEq)]
    struct User {
        name: String,
    }

    action_enum! {
        #[derive(Debug)]
        enum AppAction {
            Increment => "increment",
            Rename(String) => "rename",
        }
        prefix: "app"
    }

    let store = configure_store(
        SliceRegistry::new()
            .slice("counter", 0u32, |n: &Arc<u32>, action: &AppAction| match action {
                AppAction::Increment => Arc::new(**n + 1),
                _ => Arc::clone(n),
            })
            .slice(
                "user",
                User {
                    name: "ada".into(),
                },
                |user: &Arc<User>, action: &AppAction| match action {
                    AppAction::Rename(name) => Arc::new(User { name: name.clone() }),
                    _ => Arc::clone(user),
                },
            ),
    )
    .unwrap();

    let before = store.get_state();
    store.dispatch(AppAction::Increment).unwrap();
    let after = store.get_state();

    assert_eq!(*after.get::<u32>("counter").unwrap(), 1);
    assert!(Arc::ptr_eq(
        &before.get::<User>("user").unwrap(),
        &after.get::<User>("user").unwrap()
    ));

    store.dispatch(AppAction::Rename("grace".into())).unwrap();
    let renamed: Arc<StateTree> = store.get_state();
    assert_eq!(renamed.get::<User>("user").unwrap().name, "grace");
    assert!(Arc::ptr_eq(
        &after.get::<u32>("counter").unwrap(),
        &renamed.get::<u32>("counter").unwrap()
    ));
}

#[test]
fn subscriber_dispatch_is_applied_after_pass() {
    let store = todo_store();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let inner = store.clone();
    let log = Arc::clone(&seen);
    let _subscription = store.subscribe(move || {
        let state = inner.get_state();
        log.lock().push(state.tasks.len());
        if state.tasks.len() == 1 {
            let outcome = inner.dispatch(TodoAction::Add("follow-up".into())).unwrap();
            assert!(matches!(outcome, Dispatched::Queued));
        }
    });

    store.dispatch(TodoAction::Add("first".into())).unwrap();

    assert_eq!(store.get_state().tasks, vec!["first", "follow-up"]);
    assert_eq!(*seen.lock(), vec![1, 2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn effect_dispatch_during_pass_is_queued_in_order() {
    let store = todo_store();
    let (in_pass_tx, in_pass_rx) = tokio::sync::oneshot::channel::<()>();
    let (outcome_tx, outcome_rx) = std::sync::mpsc::channel::<Vec<bool>>();

    let effect = Effect::new(
        "todos/sync",
        move |ctx: EffectContext<Todos, TodoAction>| async move {
            in_pass_rx.await.map_err(EffectError::failed)?;
            let first = ctx.dispatch(TodoAction::Add("from effect 1".into()))?;
            let second = ctx.dispatch(TodoAction::Add("from effect 2".into()))?;
            let queued = vec![
                matches!(first, Dispatched::Queued),
                matches!(second, Dispatched::Queued),
            ];
            outcome_tx.send(queued).map_err(EffectError::failed)?;
            EffectResult::Ok(())
        },
    );
    let handle = store
        .dispatch_effect(effect)
        .unwrap()
        .into_handle()
        .unwrap();

    let signal = parking_lot::Mutex::new(Some(in_pass_tx));
    let outcomes = parking_lot::Mutex::new(outcome_rx);
    let observed = Arc::new(parking_lot::Mutex::new(None));
    let slot = Arc::clone(&observed);
    let _subscription = store.subscribe(move || {
        // Hold the first pass open until the effect has dispatched.
        if let Some(tx) = signal.lock().take() {
            let _ = tx.send(());
            let queued = outcomes.lock().recv_timeout(Duration::from_secs(5)).ok();
            *slot.lock() = queued;
        }
    });

    let outcome = store.dispatch(TodoAction::Add("outer".into())).unwrap();
    handle.wait().await.unwrap();

    assert!(outcome.is_applied());
    assert_eq!(*observed.lock(), Some(vec![true, true]));
    assert_eq!(
        store.get_state().tasks,
        vec!["outer", "from effect 1", "from effect 2"]
    );
    assert_eq!(store.history().unwrap().total(), 3);
}

#[test]
fn guard_blocks_commands_while_loading() {
    let store = StoreBuilder::new()
        .initial(Todos {
            loading: true,
            ..Todos::default()
        })
        .reducer_fn(todos)
        .middleware(GuardMiddleware::when(|state: &Todos, action: &TodoAction| {
            !state.loading || !matches!(action, TodoAction::Add(_))
        }))
        .build()
        .unwrap();

    let blocked = store.dispatch(TodoAction::Add("too early".into())).unwrap();
    assert!(matches!(blocked, Dispatched::Blocked));
    assert!(store.get_state().tasks.is_empty());

    store
        .dispatch(TodoAction::FetchSucceeded(vec!["loaded".into()]))
        .unwrap();
    store.dispatch(TodoAction::Add("now".into())).unwrap();
    assert_eq!(store.get_state().tasks, vec!["loaded", "now"]);
}

#[test]
fn checkpoint_resumes_todo_list() {
    let store = todo_store();
    store.dispatch(TodoAction::Add("Buy milk".into())).unwrap();
    let bytes = store.checkpoint().to_binary().unwrap();

    let resumed = StoreBuilder::new()
        .restore(Checkpoint::<Todos>::from_binary(&bytes).unwrap())
        .reducer_fn(todos)
        .config(StoreConfig::named("todos").with_history(32))
        .build()
        .unwrap();
    resumed.dispatch(TodoAction::Add("Buy eggs".into())).unwrap();

    assert_eq!(resumed.get_state().tasks, vec!["Buy milk", "Buy eggs"]);
    assert_eq!(resumed.history().unwrap().total(), 2);
}
