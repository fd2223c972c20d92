// 📡 Remote Data - Result of an asynchronous fetch
// Four states, never more: NotAsked → Loading → Success | Failure
//
// Values are produced by whatever triggered the fetch. Everything in this
// crate only reads them, so combinators never invent a state: mapping over
// NotAsked / Loading / Failure passes them through untouched.

use serde::{Deserialize, Serialize};

// ============================================================================
// REMOTE VALUE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Remote<E, T> {
    /// No fetch has been requested yet
    NotAsked,

    /// Fetch in flight
    Loading,

    /// Fetch resolved with a value
    Success(T),

    /// Fetch resolved with an error
    Failure(E),
}

impl<E, T> Default for Remote<E, T> {
    fn default() -> Self {
        Remote::NotAsked
    }
}

impl<E, T> Remote<E, T> {
    /// Lift a plain value into a resolved Remote
    pub fn of(value: T) -> Self {
        Remote::Success(value)
    }

    pub fn is_not_asked(&self) -> bool {
        matches!(self, Remote::NotAsked)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Remote::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Remote::Failure(_))
    }

    /// Status name as it appears in serialized snapshots
    pub fn status(&self) -> &'static str {
        match self {
            Remote::NotAsked => "NOT_ASKED",
            Remote::Loading => "LOADING",
            Remote::Success(_) => "SUCCESS",
            Remote::Failure(_) => "FAILURE",
        }
    }

    pub fn as_ref(&self) -> Remote<&E, &T> {
        match self {
            Remote::NotAsked => Remote::NotAsked,
            Remote::Loading => Remote::Loading,
            Remote::Success(value) => Remote::Success(value),
            Remote::Failure(error) => Remote::Failure(error),
        }
    }

    /// Transform the success value; every other state passes through
    pub fn map<U, F>(self, f: F) -> Remote<E, U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Remote::NotAsked => Remote::NotAsked,
            Remote::Loading => Remote::Loading,
            Remote::Success(value) => Remote::Success(f(value)),
            Remote::Failure(error) => Remote::Failure(error),
        }
    }

    /// Transform the failure value; every other state passes through
    pub fn map_err<G, F>(self, f: F) -> Remote<G, T>
    where
        F: FnOnce(E) -> G,
    {
        match self {
            Remote::NotAsked => Remote::NotAsked,
            Remote::Loading => Remote::Loading,
            Remote::Success(value) => Remote::Success(value),
            Remote::Failure(error) => Remote::Failure(f(error)),
        }
    }

    /// Success value, or `default` for any unresolved or failed state
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Remote::Success(value) => value,
            _ => default,
        }
    }

    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Remote::Success(value) => value,
            _ => f(),
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.unwrap_or_else(T::default)
    }

    pub fn success(self) -> Option<T> {
        match self {
            Remote::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Pair two Remotes, all-or-nothing.
    ///
    /// Failure wins over Loading, Loading wins over NotAsked; only two
    /// successes produce a success.
    pub fn zip<U>(self, other: Remote<E, U>) -> Remote<E, (T, U)> {
        match (self, other) {
            (Remote::Failure(error), _) | (_, Remote::Failure(error)) => Remote::Failure(error),
            (Remote::Loading, _) | (_, Remote::Loading) => Remote::Loading,
            (Remote::NotAsked, _) | (_, Remote::NotAsked) => Remote::NotAsked,
            (Remote::Success(a), Remote::Success(b)) => Remote::Success((a, b)),
        }
    }
}

impl<E, T> From<Result<T, E>> for Remote<E, T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Remote::Success(value),
            Err(error) => Remote::Failure(error),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
