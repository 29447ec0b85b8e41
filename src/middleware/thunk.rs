//! Middleware that runs effects on the tokio runtime.

use crate::core::{Action, Command};
use crate::effects::{EffectContext, EffectError, EffectHandle};
use crate::middleware::chain::{Middleware, Next};
use crate::store::{panic_message, Dispatched, Store, StoreError};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

type ErrorMapper<A> = Arc<dyn Fn(&str, &EffectError) -> Option<A> + Send + Sync>;

/// Intercepts [`Action::Effect`] and runs it instead of forwarding it.
///
/// Commands pass through untouched. An effect is spawned on the current
/// tokio runtime and `dispatch` returns [`Dispatched::Pending`] at once;
/// the state only changes when the effect dispatches commands itself.
///
/// A failing effect never reaches the caller of `dispatch`. The failure is
/// logged and, if [`on_error`](ThunkMiddleware::on_error) is set, turned
/// into a command that is dispatched like any other. A panicking effect is
/// treated as a failure with [`EffectError::Panicked`].
pub struct ThunkMiddleware<A> {
    on_error: Option<ErrorMapper<A>>,
}

impl<A: Command> ThunkMiddleware<A> {
    pub fn new() -> Self {
        Self { on_error: None }
    }

    /// Translate effect failures into a command, given the effect label.
    pub fn on_error<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&str, &EffectError) -> Option<A> + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(mapper));
        self
    }
}

impl<A: Command> Default for ThunkMiddleware<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Middleware<S, A> for ThunkMiddleware<A>
where
    S: Send + Sync + 'static,
    A: Command,
{
    fn handle(
        &self,
        store: &Store<S, A>,
        action: Action<S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Dispatched, StoreError> {
        let effect = match action {
            Action::Effect(effect) => effect,
            command => return next.run(command),
        };

        let label = effect.label().to_string();
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime {
            label: label.clone(),
        })?;

        let context = EffectContext::new(store.clone());
        let store = store.clone();
        let on_error = self.on_error.clone();
        let task_label = label.clone();

        debug!(store = %store.name(), effect = %label, "Starting effect");

        let task = runtime.spawn(async move {
            // The producer is called inside the future so a panic in either is caught here.
            let run = AssertUnwindSafe(async move { effect.run(context).await });
            let outcome = match run.catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => {
                    error!(
                        store = %store.name(),
                        effect = %task_label,
                        reason = %panic_message(payload.as_ref()),
                        "Effect panicked"
                    );
                    Err(EffectError::Panicked {
                        label: task_label.clone(),
                    })
                }
            };
            match &outcome {
                Ok(()) => debug!(store = %store.name(), effect = %task_label, "Effect finished"),
                Err(err) => {
                    warn!(
                        store = %store.name(),
                        effect = %task_label,
                        error = %err,
                        "Effect failed"
                    );
                    if let Some(command) = on_error.as_ref().and_then(|map| map(&task_label, err))
                    {
                        if let Err(dispatch_err) = store.dispatch(command) {
                            warn!(
                                store = %store.name(),
                                effect = %task_label,
                                error = %dispatch_err,
                                "Could not dispatch failure command"
                            );
                        }
                    }
                }
            }
            outcome
        });

        Ok(Dispatched::Pending(EffectHandle::new(label, task)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StoreBuilder;
    use crate::effects::{Effect, EffectResult};
    use std::time::Duration;

    fn explode() -> EffectResult {
        panic!("bug in producer")
    }

    #[derive(Clone, Debug, PartialEq)]
    enum FetchAction {
        Started,
        Succeeded(Vec<String>),
        Failed(String),
    }

    impl Command for FetchAction {
        fn kind(&self) -> &str {
            match self {
                Self::Started => "todos/started",
                Self::Succeeded(_) => "todos/succeeded",
                Self::Failed(_) => "todos/failed",
            }
        }
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Todos {
        loading: bool,
        items: Vec<String>,
        error: Option<String>,
    }

    fn reduce(state: &Arc<Todos>, action: &FetchAction) -> Arc<Todos> {
        match action {
            FetchAction::Started => Arc::new(Todos {
                loading: true,
                error: None,
                ..(**state).clone()
            }),
            FetchAction::Succeeded(titles) => {
                let mut items = state.items.clone();
                items.extend(titles.iter().cloned());
                Arc::new(Todos {
                    loading: false,
                    items,
                    error: None,
                })
            }
            FetchAction::Failed(reason) => Arc::new(Todos {
                loading: false,
                error: Some(reason.clone()),
                ..(**state).clone()
            }),
        }
    }

    fn store() -> Store<Todos, FetchAction> {
        StoreBuilder::new()
            .initial(Todos::default())
            .reducer_fn(reduce)
            .middleware(ThunkMiddleware::new().on_error(|_label, err| {
                Some(FetchAction::Failed(err.to_string()))
            }))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn commands_pass_through() {
        let store = store();
        let outcome = store.dispatch(FetchAction::Started).unwrap();
        assert!(outcome.is_applied());
        assert!(store.get_state().loading);
    }

    #[tokio::test]
    async fn effect_returns_pending_before_it_resolves() {
        let store = store();
        let (release, gate) = tokio::sync::oneshot::channel::<()>();

        let effect = Effect::new("todos/fetch", move |ctx: EffectContext<Todos, FetchAction>| async move {
            ctx.dispatch(FetchAction::Started)?;
            gate.await.map_err(EffectError::failed)?;
            ctx.dispatch(FetchAction::Succeeded(vec!["delectus aut autem".into()]))?;
            EffectResult::Ok(())
        });

        let handle = store.dispatch_effect(effect).unwrap().into_handle().unwrap();
        assert_eq!(handle.label(), "todos/fetch");
        assert!(store.get_state().items.is_empty());

        release.send(()).unwrap();
        handle.wait().await.unwrap();

        let state = store.get_state();
        assert!(!state.loading);
        assert_eq!(state.items, vec!["delectus aut autem"]);
    }

    #[tokio::test]
    async fn failure_becomes_failure_command() {
        let store = store();
        let before = store.get_state();

        let effect = Effect::new("todos/fetch", |_ctx| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            EffectResult::Err(EffectError::failed("connection refused"))
        });

        let handle = store.dispatch_effect(effect).unwrap().into_handle().unwrap();
        let outcome = handle.wait().await;

        assert!(matches!(outcome, Err(EffectError::Failed(_))));
        let state = store.get_state();
        assert_eq!(state.items, before.items);
        assert_eq!(
            state.error.as_deref(),
            Some("Effect failed: connection refused")
        );
    }

    #[tokio::test]
    async fn failure_without_mapper_leaves_state_untouched() {
        let store: Store<Todos, FetchAction> = StoreBuilder::new()
            .initial(Todos::default())
            .reducer_fn(reduce)
            .middleware(ThunkMiddleware::new())
            .build()
            .unwrap();
        let before = store.get_state();

        let handle = store
            .dispatch_effect(Effect::new("todos/fetch", |_ctx| async {
                EffectResult::Err(EffectError::failed("timeout"))
            }))
            .unwrap()
            .into_handle()
            .unwrap();

        assert!(handle.wait().await.is_err());
        assert!(Arc::ptr_eq(&before, &store.get_state()));
    }

    #[tokio::test]
    async fn panicking_effect_is_contained() {
        let store = store();

        let handle = store
            .dispatch_effect(Effect::new("todos/fetch", |_ctx| async { explode() }))
            .unwrap()
            .into_handle()
            .unwrap();

        assert!(matches!(
            handle.wait().await,
            Err(EffectError::Panicked { ref label }) if label == "todos/fetch"
        ));
        assert_eq!(
            store.get_state().error.as_deref(),
            Some("Effect 'todos/fetch' panicked")
        );

        store.dispatch(FetchAction::Started).unwrap();
        assert!(store.get_state().loading);
    }

    #[tokio::test]
    async fn effect_can_chain_another_effect() {
        let store = store();

        let effect = Effect::new("todos/outer", |ctx: EffectContext<Todos, FetchAction>| async move {
            let inner = Effect::new("todos/inner", |ctx: EffectContext<Todos, FetchAction>| async move {
                ctx.dispatch(FetchAction::Succeeded(vec!["nested".into()]))?;
                EffectResult::Ok(())
            });
            if let Some(handle) = ctx.dispatch_effect(inner)?.into_handle() {
                handle.wait().await?;
            }
            assert_eq!(ctx.get_state().items, vec!["nested"]);
            EffectResult::Ok(())
        });

        let handle = store.dispatch_effect(effect).unwrap().into_handle().unwrap();
        handle.wait().await.unwrap();
        assert_eq!(store.get_state().items, vec!["nested"]);
    }
}
