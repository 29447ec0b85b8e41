//! Actions: the values that describe what happened.
//!
//! A store accepts two kinds of action. Plain [`Command`]s are immutable
//! data that reach the reducers; [`Effect`]s are asynchronous producers that
//! middleware run on the side and that issue further commands once their
//! work resolves.

use crate::effects::Effect;
use std::fmt;

/// Trait for plain, reducer-facing actions.
///
/// Commands are usually closed enums with one variant per verb, so reducers
/// can match on them exhaustively. The `kind` is only used for logging and
/// history; by convention it reads `"<slice>/<verb>"`.
///
/// # Example
///
/// ```rust
/// use reductor::core::Command;
///
/// #[derive(Clone, Debug)]
/// enum TaskAction {
///     Add(String),
///     Delete(usize),
/// }
///
/// impl Command for TaskAction {
///     fn kind(&self) -> &str {
///         match self {
///             Self::Add(_) => "task/add",
///             Self::Delete(_) => "task/delete",
///         }
///     }
/// }
///
/// assert_eq!(TaskAction::Add("Buy milk".into()).kind(), "task/add");
/// ```
pub trait Command: Send + 'static {
    /// Stable identifier of this command's verb.
    fn kind(&self) -> &str;
}

/// Everything that can be handed to `dispatch`.
pub enum Action<S, A> {
    /// Plain data, forwarded down the chain to the root reducer.
    Command(A),

    /// Asynchronous producer, intercepted by effect-aware middleware.
    Effect(Effect<S, A>),
}

impl<S, A: Command> Action<S, A> {
    pub fn command(command: A) -> Self {
        Self::Command(command)
    }

    pub fn effect(effect: Effect<S, A>) -> Self {
        Self::Effect(effect)
    }

    /// The command kind, or the effect label.
    pub fn kind(&self) -> &str {
        match self {
            Self::Command(command) => command.kind(),
            Self::Effect(effect) => effect.label(),
        }
    }

    pub fn is_effect(&self) -> bool {
        matches!(self, Self::Effect(_))
    }
}

impl<S, A: fmt::Debug> fmt::Debug for Action<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(command) => f.debug_tuple("Command").field(command).finish(),
            Self::Effect(effect) => f.debug_tuple("Effect").field(&effect.label()).finish(),
        }
    }
}
