//! Slice registry: composing named reducers into one root reducer.
//!
//! Each slice owns one region of the [`StateTree`]. The registry erases the
//! slice types so that reducers over unrelated state can be combined, while
//! [`StateTree::get`] recovers the typed `Arc` on the reading side.

use crate::builder::BuildError;
use crate::core::reducer::{Reducer, ReducerError};
use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type-erased, reference-counted value of one slice.
pub type SliceState = Arc<dyn Any + Send + Sync>;

type ErasedReducer<A> =
    Box<dyn Fn(&SliceState, &A) -> Result<SliceState, ReducerError> + Send + Sync>;

/// Global state: slice name to that slice's current value.
#[derive(Clone, Default)]
pub struct StateTree {
    slices: BTreeMap<String, SliceState>,
}

impl StateTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed read of one slice. `None` if absent or of another type.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.slices
            .get(name)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// Set a slice value, e.g. when preloading state.
    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.slices.insert(name.into(), Arc::new(value));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slices.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    fn raw(&self, name: &str) -> Option<&SliceState> {
        self.slices.get(name)
    }
}

impl fmt::Debug for StateTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.slices.keys()).finish()
    }
}

struct SliceEntry<A> {
    name: String,
    initial: SliceState,
    reduce: ErasedReducer<A>,
}

/// Builder collecting named slice reducers.
///
/// Problems are accumulated and reported together by [`SliceRegistry::build`];
/// a duplicate name is never silently overwritten.
///
/// # Example
///
/// ```rust
/// use reductor::core::SliceRegistry;
/// use std::sync::Arc;
///
/// enum Act { Inc, Rename(String) }
///
/// let root = SliceRegistry::<Act>::new()
///     .slice("counter", 0i64, |n: &Arc<i64>, a: &Act| match a {
///         Act::Inc => Arc::new(**n + 1),
///         _ => Arc::clone(n),
///     })
///     .slice("user", String::from("ada"), |name: &Arc<String>, a: &Act| match a {
///         Act::Rename(next) => Arc::new(next.clone()),
///         _ => Arc::clone(name),
///     })
///     .build()
///     .unwrap();
///
/// let tree = root.initial_state();
/// assert_eq!(*tree.get::<i64>("counter").unwrap(), 0);
/// ```
pub struct SliceRegistry<A> {
    entries: Vec<SliceEntry<A>>,
}

impl<A: 'static> SliceRegistry<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a slice with its default value and reducer closure.
    pub fn slice<T, F>(self, name: impl Into<String>, initial: T, reducer: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Arc<T>, &A) -> Arc<T> + Send + Sync + 'static,
    {
        self.slice_with(name, initial, crate::core::FnReducer::new(reducer))
    }

    /// Register a slice driven by any [`Reducer`] implementation.
    pub fn slice_with<T, R>(mut self, name: impl Into<String>, initial: T, reducer: R) -> Self
    where
        T: Any + Send + Sync,
        R: Reducer<T, A> + 'static,
    {
        let name = name.into();
        let slice = name.clone();
        let reduce = move |state: &SliceState, action: &A| {
            let typed = Arc::clone(state).downcast::<T>().map_err(|_| {
                ReducerError::SliceTypeMismatch {
                    slice: slice.clone(),
                    expected: type_name::<T>(),
                }
            })?;
            let next = reducer.reduce(&typed, action)?;
            if Arc::ptr_eq(&typed, &next) {
                Ok(Arc::clone(state))
            } else {
                let next: SliceState = next;
                Ok(next)
            }
        };

        self.entries.push(SliceEntry {
            name,
            initial: Arc::new(initial),
            reduce: Box::new(reduce),
        });
        self
    }

    /// Validate every registration and produce the root reducer.
    pub fn build(self) -> Result<CombinedReducer<A>, BuildError> {
        if self.entries.is_empty() {
            return Err(BuildError::NoSlices);
        }

        let mut seen = HashSet::new();
        let checks: Vec<Validation<(), NonEmptyVec<BuildError>>> = self
            .entries
            .iter()
            .map(|entry| {
                if entry.name.trim().is_empty() {
                    Validation::fail(BuildError::EmptySliceName)
                } else if !seen.insert(entry.name.clone()) {
                    Validation::fail(BuildError::DuplicateSlice {
                        name: entry.name.clone(),
                    })
                } else {
                    Validation::success(())
                }
            })
            .collect();

        match Validation::all_vec(checks).map(|_| ()) {
            Validation::Success(_) => Ok(CombinedReducer {
                entries: self.entries,
            }),
            Validation::Failure(errors) => {
                Err(BuildError::InvalidSlices(errors.iter().cloned().collect()))
            }
        }
    }
}

impl<A: 'static> Default for SliceRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Root reducer over a [`StateTree`], produced by [`SliceRegistry::build`].
pub struct CombinedReducer<A> {
    entries: Vec<SliceEntry<A>>,
}

impl<A> CombinedReducer<A> {
    /// Tree holding every slice's declared default.
    pub fn initial_state(&self) -> StateTree {
        let slices = self
            .entries
            .iter()
            .map(|entry| (entry.name.clone(), Arc::clone(&entry.initial)))
            .collect();
        StateTree { slices }
    }

    pub fn slice_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}

impl<A> Reducer<StateTree, A> for CombinedReducer<A> {
    fn reduce(&self, state: &Arc<StateTree>, action: &A) -> Result<Arc<StateTree>, ReducerError> {
        // Keys outside the registry are dropped, so a foreign key forces a new tree.
        let mut changed = state.len() != self.entries.len();
        let mut slices = BTreeMap::new();

        for entry in &self.entries {
            let previous = match state.raw(&entry.name) {
                Some(value) => value,
                None => {
                    changed = true;
                    &entry.initial
                }
            };
            let next = (entry.reduce)(previous, action)?;
            changed |= !Arc::ptr_eq(previous, &next);
            slices.insert(entry.name.clone(), next);
        }

        if changed {
            Ok(Arc::new(StateTree { slices }))
        } else {
            Ok(Arc::clone(state))
        }
    }
}
