//! The store and its subscriber machinery.
//!
//! A [`Store`] owns the current state snapshot and is the only way to
//! replace it. It is built through [`crate::builder::StoreBuilder`] and
//! passed around explicitly; there is no global instance.

mod config;
mod error;
#[allow(clippy::module_inception)]
mod store;
mod subscription;

pub use config::StoreConfig;
pub use error::StoreError;
pub use store::{Dispatched, Store};
pub(crate) use store::panic_message;
pub use subscription::{Listener, Subscription};
