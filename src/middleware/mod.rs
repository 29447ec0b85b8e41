//! Dispatch middleware.
//!
//! Middleware wrap `dispatch` in a single-pass chain: the first registered
//! middleware sees the raw action first and each one forwards explicitly
//! through [`Next`], ending at the root reducer.
//!
//! - [`ThunkMiddleware`] runs effects on the tokio runtime
//! - [`LoggerMiddleware`] traces every action
//! - [`GuardMiddleware`] blocks commands based on the current state

mod chain;
mod guarded;
mod logger;
mod thunk;

pub use chain::{Middleware, Next};
pub use guarded::GuardMiddleware;
pub use logger::LoggerMiddleware;
pub use thunk::ThunkMiddleware;
