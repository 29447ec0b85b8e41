//! Asynchronous effects: the imperative shell around the pure reducers.
//!
//! An [`Effect`] is dispatched like any other action, but instead of
//! reaching the reducers it is picked up by the thunk middleware, which
//! runs it on the tokio runtime and returns an [`EffectHandle`] at once.
//! State only changes when the effect later dispatches ordinary commands.

mod effect;
mod handle;

pub use effect::{Effect, EffectContext, EffectError, EffectFuture, EffectResult};
pub use handle::EffectHandle;
