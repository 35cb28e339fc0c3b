// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side effects that run off the dispatch thread.
//!
//! ## Overview
//!
//! Preference writes and broadcasts are fire-and-forget jobs on one
//! [`BackgroundExecutor`] thread. The dispatch thread never waits on them and
//! their failures are logged, never routed back.
//!
//! - [`BackGestureNotifier`]: tells apps whose activities block system gestures
//!   that a back gesture happened, a limited number of times per device.
//! - [`SideEffects`]: the bundle the router drives, which also resets the home
//!   bounce onboarding hint the first time gestures are enabled.

use core::fmt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use thiserror::Error;

/// Preference key of the remaining back-gesture notifications.
pub const KEY_BACK_NOTIFICATION_COUNT: &str = "backNotificationCount";
/// Broadcast action sent to gesture-blocked packages.
pub const NOTIFY_ACTION_BACK: &str = "com.android.quickstep.action.BACK_GESTURE";
/// Preference key recording that gestures were enabled at least once.
pub const HAS_ENABLED_QUICKSTEP_ONCE: &str = "launcher.has_enabled_quickstep_once";
/// Preference key of the home bounce onboarding hint.
pub const HOME_BOUNCE_SEEN: &str = "launcher.apps_view_shown";
/// Notifications per device.
pub const MAX_BACK_NOTIFICATION_COUNT: i32 = 3;

/// Errors from a [`PreferenceStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A writer panicked while holding the store.
    #[error("preference store lock poisoned")]
    Poisoned,
    /// The key holds a value of a different type.
    #[error("preference {key} holds a {found}, expected a {expected}")]
    TypeMismatch {
        /// Key that was read.
        key: String,
        /// Requested type.
        expected: &'static str,
        /// Stored type.
        found: &'static str,
    },
}

/// Errors from a [`Broadcaster`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    /// Nothing in `package` receives `action`.
    #[error("no receiver for {action} in {package}")]
    NoReceiver {
        /// Broadcast action.
        action: String,
        /// Target package.
        package: String,
    },
    /// The transport is shut down.
    #[error("broadcast transport closed")]
    Closed,
}

/// Errors from running a side effect.
#[derive(Debug, Error)]
pub enum SideEffectError {
    /// Reading or writing preferences failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Sending a broadcast failed.
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
    /// The worker thread could not be started.
    #[error("failed to spawn background worker")]
    Spawn(#[from] std::io::Error),
    /// The worker thread has exited.
    #[error("background worker is gone")]
    WorkerGone,
}

/// Persistent key/value preferences.
pub trait PreferenceStore: Send + Sync {
    /// Read an integer.
    fn get_int(&self, key: &str) -> Result<Option<i32>, StoreError>;
    /// Write an integer.
    fn put_int(&self, key: &str, value: i32) -> Result<(), StoreError>;
    /// Read a boolean.
    fn get_bool(&self, key: &str) -> Result<Option<bool>, StoreError>;
    /// Write a boolean.
    fn put_bool(&self, key: &str, value: bool) -> Result<(), StoreError>;
}

/// Sends intents to other packages.
pub trait Broadcaster: Send + Sync {
    /// Deliver `action` to `package`.
    fn send(&self, action: &str, package: &str) -> Result<(), BroadcastError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum PrefValue {
    Int(i32),
    Bool(bool),
}

impl PrefValue {
    fn type_name(self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
        }
    }
}

/// [`PreferenceStore`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, PrefValue>>,
}

impl MemoryPreferenceStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &str) -> Result<Option<PrefValue>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).copied())
    }

    fn put(&self, key: &str, value: PrefValue) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_owned(), value);
        Ok(())
    }

    fn mismatch(key: &str, expected: &'static str, found: PrefValue) -> StoreError {
        StoreError::TypeMismatch {
            key: key.to_owned(),
            expected,
            found: found.type_name(),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_int(&self, key: &str) -> Result<Option<i32>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Int(v)) => Ok(Some(v)),
            Some(other) => Err(Self::mismatch(key, "int", other)),
        }
    }

    fn put_int(&self, key: &str, value: i32) -> Result<(), StoreError> {
        self.put(key, PrefValue::Int(value))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, StoreError> {
        match self.get(key)? {
            None => Ok(None),
            Some(PrefValue::Bool(v)) => Ok(Some(v)),
            Some(other) => Err(Self::mismatch(key, "bool", other)),
        }
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<(), StoreError> {
        self.put(key, PrefValue::Bool(value))
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single worker thread running queued jobs in order.
///
/// Dropping the executor lets queued jobs finish, then joins the thread.
pub struct BackgroundExecutor {
    sender: Option<mpsc::Sender<Job>>,
    thread: Option<JoinHandle<()>>,
}

impl fmt::Debug for BackgroundExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundExecutor")
            .field("running", &self.sender.is_some())
            .finish_non_exhaustive()
    }
}

impl BackgroundExecutor {
    /// Start the worker thread.
    pub fn spawn() -> Result<Self, SideEffectError> {
        let (sender, receiver) = mpsc::channel::<Job>();
        let thread = std::thread::Builder::new()
            .name("gesture-io".into())
            .spawn(move || {
                for job in receiver {
                    job();
                }
            })?;
        Ok(Self {
            sender: Some(sender),
            thread: Some(thread),
        })
    }

    /// Queue `job`.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) -> Result<(), SideEffectError> {
        let sender = self.sender.as_ref().ok_or(SideEffectError::WorkerGone)?;
        sender
            .send(Box::new(job))
            .map_err(|_| SideEffectError::WorkerGone)
    }

    /// Block until every job queued so far has run.
    pub fn flush(&self) -> Result<(), SideEffectError> {
        let (done, wait) = mpsc::sync_channel(1);
        self.execute(move || {
            let _ = done.send(());
        })?;
        wait.recv().map_err(|_| SideEffectError::WorkerGone)
    }
}

impl Drop for BackgroundExecutor {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::warn!("background worker panicked");
        }
    }
}

/// Notifies gesture-blocked apps about back gestures.
///
/// The remaining count is `-1` until [`load`](Self::load) runs on unlock.
#[derive(Clone)]
pub struct BackGestureNotifier {
    remaining: Arc<AtomicI32>,
    prefs: Arc<dyn PreferenceStore>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl fmt::Debug for BackGestureNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackGestureNotifier")
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

impl BackGestureNotifier {
    /// Create a notifier that has not loaded its count yet.
    pub fn new(prefs: Arc<dyn PreferenceStore>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self {
            remaining: Arc::new(AtomicI32::new(-1)),
            prefs,
            broadcaster,
        }
    }

    /// Notifications left.
    pub fn remaining(&self) -> i32 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Load the persisted count, defaulting to the maximum.
    pub fn load(&self) -> Result<(), StoreError> {
        let stored = self
            .prefs
            .get_int(KEY_BACK_NOTIFICATION_COUNT)?
            .unwrap_or(MAX_BACK_NOTIFICATION_COUNT);
        self.remaining.store(stored.max(0), Ordering::Release);
        Ok(())
    }

    /// A notification would be sent for these blocked packages.
    pub fn should_notify(&self, blocked_packages: &[String]) -> bool {
        self.remaining() > 0 && !blocked_packages.is_empty()
    }

    /// Spend one notification and broadcast to every blocked package.
    ///
    /// Returns false if nothing was sent.
    pub fn try_notify(&self, blocked_packages: &[String]) -> Result<bool, SideEffectError> {
        if blocked_packages.is_empty() {
            return Ok(false);
        }
        let Ok(previous) =
            self.remaining
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                    (n > 0).then(|| n - 1)
                })
        else {
            return Ok(false);
        };
        self.prefs
            .put_int(KEY_BACK_NOTIFICATION_COUNT, previous - 1)?;
        for package in blocked_packages {
            self.broadcaster.send(NOTIFY_ACTION_BACK, package)?;
        }
        Ok(true)
    }
}

/// The side effects driven by the router.
pub struct SideEffects {
    executor: BackgroundExecutor,
    prefs: Arc<dyn PreferenceStore>,
    notifier: BackGestureNotifier,
}

impl fmt::Debug for SideEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffects")
            .field("executor", &self.executor)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl SideEffects {
    /// Start the worker and wire the notifier to `prefs` and `broadcaster`.
    pub fn new(
        prefs: Arc<dyn PreferenceStore>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Result<Self, SideEffectError> {
        Ok(Self {
            executor: BackgroundExecutor::spawn()?,
            notifier: BackGestureNotifier::new(Arc::clone(&prefs), broadcaster),
            prefs,
        })
    }

    /// The back-gesture notifier.
    pub fn notifier(&self) -> &BackGestureNotifier {
        &self.notifier
    }

    /// Wait for queued jobs.
    pub fn flush(&self) -> Result<(), SideEffectError> {
        self.executor.flush()
    }

    /// A back action was reported by system UI.
    pub fn on_back_action(&self, completed: bool, is_button: bool, blocked_packages: Vec<String>) {
        if !completed || is_button || !self.notifier.should_notify(&blocked_packages) {
            return;
        }
        let notifier = self.notifier.clone();
        self.run("back gesture notification", move || {
            notifier.try_notify(&blocked_packages).map(|_| ())
        });
    }

    /// The user unlocked the device.
    pub fn on_user_unlocked(&self, button_nav: bool) {
        if let Err(error) = self.notifier.load() {
            tracing::warn!(%error, "failed to load back notification count");
        }
        self.reset_home_bounce_seen(true, button_nav);
    }

    /// Re-arm the home bounce hint the first time gestures are enabled.
    pub fn reset_home_bounce_seen(&self, user_unlocked: bool, button_nav: bool) {
        if !user_unlocked || button_nav {
            return;
        }
        let prefs = Arc::clone(&self.prefs);
        self.run("home bounce reset", move || {
            if !prefs.get_bool(HAS_ENABLED_QUICKSTEP_ONCE)?.unwrap_or(true) {
                prefs.put_bool(HAS_ENABLED_QUICKSTEP_ONCE, true)?;
                prefs.put_bool(HOME_BOUNCE_SEEN, false)?;
            }
            Ok(())
        });
    }

    fn run(
        &self,
        what: &'static str,
        job: impl FnOnce() -> Result<(), SideEffectError> + Send + 'static,
    ) {
        let queued = self.executor.execute(move || {
            if let Err(error) = job() {
                tracing::warn!(%error, what, "side effect failed");
            }
        });
        if let Err(error) = queued {
            tracing::warn!(%error, what, "side effect dropped");
        }
    }
}
