//! Single-flight guard around asynchronous retrievals.
//!
//! A guard tracks one logical resource. While a retrieval is in flight every further
//! request is turned away with [`Admission::Busy`] so callers keep rendering their
//! placeholder. Once the retrieval settles the guard moves to [`FetchState::Loaded`],
//! records the payload or error, and fires exactly one of the caller's hooks.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::RetrievalError;

/// Load state of a tracked resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchState {
  /// No retrieval has been attempted.
  #[default]
  Idle,
  /// A retrieval is in flight.
  Loading,
  /// The last retrieval settled, successfully or not.
  Loaded,
}

/// Observable state of a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSnapshot<T> {
  /// Current load state.
  pub status: FetchState,
  /// Payload of the last successful retrieval.
  pub payload: Option<T>,
  /// Message of the last failed retrieval.
  pub error: Option<String>,
}

impl<T> Default for FetchSnapshot<T> {
  fn default() -> Self {
    Self {
      status: FetchState::Idle,
      payload: None,
      error: None,
    }
  }
}

impl<T> FetchSnapshot<T> {
  /// Whether a retrieval is currently in flight.
  pub fn is_loading(&self) -> bool {
    self.status == FetchState::Loading
  }
}

/// Result of asking a guard to start a retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
  /// The retrieval was started; the caller should show its placeholder.
  Started,
  /// Another retrieval is still in flight; the caller should keep its placeholder.
  Busy,
}

type SettledHook<T> = Box<dyn FnOnce(T) + Send>;
type ErrorHook = Box<dyn FnOnce(String) + Send>;

/// Callbacks fired when a started retrieval settles.
pub struct SettleHooks<T> {
  on_settled: Option<SettledHook<T>>,
  on_error: Option<ErrorHook>,
}

impl<T> Default for SettleHooks<T> {
  fn default() -> Self {
    Self {
      on_settled: None,
      on_error: None,
    }
  }
}

impl<T> SettleHooks<T> {
  /// Hooks that do nothing; callers rely on [`FetchGuard::snapshot`] instead.
  pub fn none() -> Self {
    Self::default()
  }

  /// Run `hook` with the payload of a successful retrieval.
  pub fn on_settled(mut self, hook: impl FnOnce(T) + Send + 'static) -> Self {
    self.on_settled = Some(Box::new(hook));
    self
  }

  /// Run `hook` with the message of a failed retrieval.
  pub fn on_error(mut self, hook: impl FnOnce(String) + Send + 'static) -> Self {
    self.on_error = Some(Box::new(hook));
    self
  }

  fn settled(self, payload: T) {
    if let Some(hook) = self.on_settled {
      hook(payload);
    }
  }

  fn failed(self, message: String) {
    if let Some(hook) = self.on_error {
      hook(message);
    }
  }
}

/// Guard ensuring at most one retrieval is in flight for a resource key.
pub struct FetchGuard<T> {
  key: String,
  fallback_message: String,
  state: Arc<watch::Sender<FetchSnapshot<T>>>,
}

impl<T> FetchGuard<T>
where
  T: Clone + Send + Sync + 'static,
{
  /// Create an idle guard.
  ///
  /// `fallback_message` is reported when a retrieval fails with an empty message.
  pub fn new(key: impl Into<String>, fallback_message: impl Into<String>) -> Self {
    let (state, _) = watch::channel(FetchSnapshot::default());
    Self {
      key: key.into(),
      fallback_message: fallback_message.into(),
      state: Arc::new(state),
    }
  }

  /// Resource key the guard tracks.
  pub fn key(&self) -> &str {
    &self.key
  }

  /// Current load state.
  pub fn state(&self) -> FetchState {
    self.state.borrow().status
  }

  /// Copy of the current observable state.
  pub fn snapshot(&self) -> FetchSnapshot<T> {
    self.state.borrow().clone()
  }

  /// Receiver notified on every state transition.
  pub fn subscribe(&self) -> watch::Receiver<FetchSnapshot<T>> {
    self.state.subscribe()
  }

  /// Wait until no retrieval is in flight and return the resulting state.
  pub async fn settled(&self) -> FetchSnapshot<T> {
    let mut receiver = self.state.subscribe();
    match receiver.wait_for(|snapshot| !snapshot.is_loading()).await {
      Ok(snapshot) => snapshot.clone(),
      Err(_) => self.snapshot(),
    }
  }

  /// Start `retrieve` unless a retrieval is already in flight.
  ///
  /// The state is checked and moved to [`FetchState::Loading`] before `retrieve` is called,
  /// so overlapping requests never start a second retrieval. Must be called from within a
  /// Tokio runtime; the retrieval runs to completion on a spawned task and cannot be
  /// cancelled. A panicking retrieval is reported as a failure with the fallback message.
  /// Hooks run before the settled state is published, so [`FetchGuard::settled`] never
  /// returns ahead of them.
  pub fn request<F, Fut>(&self, retrieve: F, hooks: SettleHooks<T>) -> Admission
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, RetrievalError>> + Send + 'static,
  {
    let admitted = self.state.send_if_modified(|snapshot| {
      if snapshot.is_loading() {
        return false;
      }
      snapshot.status = FetchState::Loading;
      snapshot.error = None;
      true
    });

    if !admitted {
      debug!("[{}] retrieval still in flight", self.key);
      return Admission::Busy;
    }

    debug!("[{}] starting retrieval", self.key);
    let retrieval = tokio::spawn(retrieve());
    let state = Arc::clone(&self.state);
    let key = self.key.clone();
    let fallback = self.fallback_message.clone();
    tokio::spawn(async move {
      let outcome = match retrieval.await {
        Ok(outcome) => outcome,
        Err(err) => {
          warn!("[{key}] retrieval aborted: {err}");
          Err(RetrievalError::failed(String::new()))
        }
      };
      settle(&state, &key, &fallback, outcome, hooks);
    });

    Admission::Started
  }
}

fn settle<T: Clone>(
  state: &watch::Sender<FetchSnapshot<T>>,
  key: &str,
  fallback: &str,
  outcome: Result<T, RetrievalError>,
  hooks: SettleHooks<T>,
) {
  match outcome {
    Ok(payload) => {
      debug!("[{key}] retrieval settled");
      hooks.settled(payload.clone());
      state.send_modify(|snapshot| {
        snapshot.status = FetchState::Loaded;
        snapshot.payload = Some(payload);
        snapshot.error = None;
      });
    }
    Err(err) => {
      let mut message = err.to_string();
      if message.is_empty() {
        message = fallback.to_string();
      }
      warn!("[{key}] retrieval failed: {message}");
      hooks.failed(message.clone());
      state.send_modify(|snapshot| {
        snapshot.status = FetchState::Loaded;
        snapshot.error = Some(message);
      });
    }
  }
}
