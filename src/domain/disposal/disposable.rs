use std::any::Any;

use crate::error::DisposalError;

/// Outcome of one disposal attempt that did not raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisposalState {
    /// The resource is gone; the task can be forgotten.
    Purged,
    /// Not done yet, try again later.
    Failed(String),
}

/// A unit of asynchronous resource teardown.
///
/// Two tasks are the same task when [`dyn_eq`](Self::dyn_eq) says so; disposers use it to
/// avoid tracking duplicates.
pub trait Disposable: std::fmt::Debug + Any + Send + Sync {
    fn dispose(&self) -> Result<DisposalState, DisposalError>;

    fn display_name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    fn dyn_eq(&self, other: &dyn Disposable) -> bool;
}

/// Structural equality against a type-erased task, for `dyn_eq` implementations.
pub fn same_disposable<T: Disposable + PartialEq>(this: &T, other: &dyn Disposable) -> bool {
    other.as_any().downcast_ref::<T>().is_some_and(|other| this == other)
}
