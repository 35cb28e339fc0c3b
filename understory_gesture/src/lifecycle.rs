// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Service lifecycle flags.
//!
//! The host creates the service, binds its input channel (connected), and later
//! receives the system's initialization callback (initialized). The flags are
//! shared so other threads can observe them; routing itself only reads them on
//! the dispatch thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct Flags {
    connected: AtomicBool,
    initialized: AtomicBool,
}

/// Cloneable handle to the connected and initialized flags.
#[derive(Clone, Debug, Default)]
pub struct ServiceLifecycle {
    flags: Arc<Flags>,
}

impl ServiceLifecycle {
    /// Flags for a service that has not been created yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The service was created and its input channel bound.
    pub fn on_create(&self) {
        self.flags.connected.store(true, Ordering::Release);
        tracing::debug!("touch service created");
    }

    /// The system finished initializing the service.
    pub fn on_initialize(&self) {
        self.flags.initialized.store(true, Ordering::Release);
        tracing::debug!("touch service initialized");
    }

    /// The service is being torn down.
    pub fn on_destroy(&self) {
        self.flags.initialized.store(false, Ordering::Release);
        self.flags.connected.store(false, Ordering::Release);
        tracing::debug!("touch service destroyed");
    }

    /// The input channel is bound.
    pub fn is_connected(&self) -> bool {
        self.flags.connected.load(Ordering::Acquire)
    }

    /// The system initialized the service.
    pub fn is_initialized(&self) -> bool {
        self.flags.initialized.load(Ordering::Acquire)
    }
}
