// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch thread.
//!
//! ## Overview
//!
//! [`GestureRouter`] is single-threaded: its collaborators may be `!Send` and
//! its slots are unsynchronized. [`DispatchLoop::spawn`] builds the router on
//! a dedicated thread and feeds it [`RoutingMessage`]s in arrival order. Input
//! events, system callbacks, plugin changes and dump requests all travel the
//! same channel, so no lock ever guards routing state.
//!
//! [`RoutingHandle`] is the cloneable, `Send` sender side.

use core::fmt;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::consumer::{ConsumerFactory, ConsumerId};
use crate::device::{DeviceState, DeviceStateUpdate, OverscrollPlugin, OverviewComponents, TaskResolver};
use crate::event::InputEvent;
use crate::router::GestureRouter;

/// Errors from a [`RoutingHandle`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// The dispatch thread has exited.
    #[error("gesture dispatch thread is gone")]
    Disconnected,
    /// The dispatch thread could not be started.
    #[error("failed to spawn gesture dispatch thread: {0}")]
    Spawn(String),
}

/// Work delivered to the dispatch thread.
pub enum RoutingMessage {
    /// An event from the input monitor.
    Input(InputEvent),
    /// A consumer reported itself inactive.
    ConsumerInactive(ConsumerId),
    /// A device state callback.
    DeviceState(DeviceStateUpdate),
    /// The overscroll plugin connected.
    PluginConnected(Arc<dyn OverscrollPlugin>),
    /// The overscroll plugin disconnected.
    PluginDisconnected,
    /// System UI reported a back action.
    BackAction {
        /// The action completed.
        completed: bool,
        /// It came from the navigation bar button.
        is_button: bool,
    },
    /// The system initialized the service.
    Initialize,
    /// The host configuration changed.
    ConfigurationChanged {
        /// The overview activity handles the change itself.
        handled_by_activity: bool,
    },
    /// Render a dump for `args` and send it back.
    Dump {
        /// Dump arguments, see [`DumpCommand`](crate::dump::DumpCommand).
        args: Vec<String>,
        /// Where to send the text.
        reply: mpsc::Sender<String>,
    },
    /// Stop the loop.
    Shutdown,
}

impl fmt::Debug for RoutingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(event) => f.debug_tuple("Input").field(event).finish(),
            Self::ConsumerInactive(id) => f.debug_tuple("ConsumerInactive").field(id).finish(),
            Self::DeviceState(update) => f.debug_tuple("DeviceState").field(update).finish(),
            Self::PluginConnected(plugin) => f.debug_tuple("PluginConnected").field(plugin).finish(),
            Self::PluginDisconnected => f.write_str("PluginDisconnected"),
            Self::BackAction {
                completed,
                is_button,
            } => f
                .debug_struct("BackAction")
                .field("completed", completed)
                .field("is_button", is_button)
                .finish(),
            Self::Initialize => f.write_str("Initialize"),
            Self::ConfigurationChanged {
                handled_by_activity,
            } => f
                .debug_struct("ConfigurationChanged")
                .field("handled_by_activity", handled_by_activity)
                .finish(),
            Self::Dump { args, .. } => f.debug_struct("Dump").field("args", args).finish_non_exhaustive(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Sender side of the dispatch thread.
#[derive(Clone, Debug)]
pub struct RoutingHandle {
    sender: mpsc::Sender<RoutingMessage>,
}

impl RoutingHandle {
    /// Queue `message`.
    pub fn send(&self, message: RoutingMessage) -> Result<(), RoutingError> {
        self.sender
            .send(message)
            .map_err(|_| RoutingError::Disconnected)
    }

    /// Queue an input event.
    pub fn input(&self, event: impl Into<InputEvent>) -> Result<(), RoutingError> {
        self.send(RoutingMessage::Input(event.into()))
    }

    /// Queue a device state update.
    pub fn device_state(&self, update: DeviceStateUpdate) -> Result<(), RoutingError> {
        self.send(RoutingMessage::DeviceState(update))
    }

    /// Report a consumer as inactive.
    pub fn consumer_inactive(&self, id: ConsumerId) -> Result<(), RoutingError> {
        self.send(RoutingMessage::ConsumerInactive(id))
    }

    /// Render a dump on the dispatch thread and wait for it.
    pub fn dump<S: Into<String>>(
        &self,
        args: impl IntoIterator<Item = S>,
    ) -> Result<String, RoutingError> {
        let (reply, wait) = mpsc::channel();
        self.send(RoutingMessage::Dump {
            args: args.into_iter().map(Into::into).collect(),
            reply,
        })?;
        wait.recv().map_err(|_| RoutingError::Disconnected)
    }
}

/// A running dispatch thread.
#[derive(Debug)]
pub struct DispatchLoop {
    handle: RoutingHandle,
    thread: Option<JoinHandle<()>>,
}

impl DispatchLoop {
    /// Spawn the dispatch thread and build the router on it with `build`.
    ///
    /// The router lives and dies on that thread, so its collaborators need not
    /// be `Send`; only `build` crosses the thread boundary.
    pub fn spawn<D, T, O, F, B>(build: B) -> Result<Self, RoutingError>
    where
        D: DeviceState + 'static,
        T: TaskResolver + 'static,
        O: OverviewComponents + 'static,
        F: ConsumerFactory + 'static,
        B: FnOnce(RoutingHandle) -> GestureRouter<D, T, O, F> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let handle = RoutingHandle { sender };
        let inner = handle.clone();
        let thread = std::thread::Builder::new()
            .name("gesture-dispatch".into())
            .spawn(move || {
                let mut router = build(inner);
                router.lifecycle().on_create();
                for message in receiver {
                    if router.handle_message(message).is_break() {
                        break;
                    }
                }
                router.lifecycle().on_destroy();
                tracing::debug!("gesture dispatch loop stopped");
            })
            .map_err(|e| RoutingError::Spawn(e.to_string()))?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// A new handle to the thread.
    pub fn handle(&self) -> RoutingHandle {
        self.handle.clone()
    }

    /// Ask the loop to stop and wait for it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.handle.send(RoutingMessage::Shutdown);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::error!("gesture dispatch thread panicked");
        }
    }
}

impl Drop for DispatchLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
