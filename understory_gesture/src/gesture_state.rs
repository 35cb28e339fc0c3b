// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture state shared between the router and the consumers of one gesture.
//!
//! ## Lifecycle
//!
//! - A fresh [`GestureState`] is created on each Down that starts a gesture.
//! - Before the router switches chains it clones the previous state by value, so
//!   callbacks fired while the old chain winds down cannot change what the new
//!   chain is built from.
//! - Reset replaces the current state with [`GestureState::default`].
//!
//! The router owns the current slot; consumers hold a [`SharedGestureState`]
//! handle to the state of the gesture they were created for.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use crate::device::ActivityInterface;
use crate::types::{RunningTask, TaskId};

/// Handle to the state of one gesture.
pub type SharedGestureState = Rc<RefCell<GestureState>>;

bitflags::bitflags! {
    /// Progress markers recorded by the consumers of a gesture.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GestureStateFlags: u8 {
        /// The recents animation started for this gesture.
        const RECENTS_ANIMATION_STARTED = 1 << 0;
        /// The recents animation finished.
        const RECENTS_ANIMATION_ENDED = 1 << 1;
        /// The recents animation was canceled.
        const RECENTS_ANIMATION_CANCELED = 1 << 2;
        /// An end target was chosen.
        const END_TARGET_SET = 1 << 3;
    }
}

/// Where a gesture's animation settles.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GestureEndTarget {
    /// Home screen.
    Home,
    /// Overview.
    Recents,
    /// A different task.
    NewTask,
    /// Back to the task the gesture started over.
    LastTask,
}

impl GestureEndTarget {
    /// The target is shown by the launcher process.
    #[inline]
    pub const fn is_launcher(self) -> bool {
        matches!(self, Self::Home | Self::Recents)
    }
}

/// Identity and progress of a single gesture.
#[derive(Clone, Default)]
pub struct GestureState {
    log_id: Option<u32>,
    activity_interface: Option<Rc<dyn ActivityInterface>>,
    running_task: Option<RunningTask>,
    finishing_recents_animation_task_id: Option<TaskId>,
    down_time_ms: Option<u64>,
    flags: GestureStateFlags,
    end_target: Option<GestureEndTarget>,
}

impl fmt::Debug for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureState")
            .field("log_id", &self.log_id)
            .field("has_activity_interface", &self.activity_interface.is_some())
            .field("running_task", &self.running_task)
            .field(
                "finishing_recents_animation_task_id",
                &self.finishing_recents_animation_task_id,
            )
            .field("down_time_ms", &self.down_time_ms)
            .field("flags", &self.flags)
            .field("end_target", &self.end_target)
            .finish()
    }
}

impl GestureState {
    /// Create the state of a new gesture bound to `activity_interface`.
    pub fn new(log_id: u32, activity_interface: Rc<dyn ActivityInterface>) -> Self {
        Self {
            log_id: Some(log_id),
            activity_interface: Some(activity_interface),
            ..Self::default()
        }
    }

    /// Wrap into a shared handle.
    pub fn into_shared(self) -> SharedGestureState {
        Rc::new(RefCell::new(self))
    }

    /// Gesture log id; `None` for the default state.
    pub fn log_id(&self) -> Option<u32> {
        self.log_id
    }

    /// The bound destination.
    pub fn activity_interface(&self) -> Option<&Rc<dyn ActivityInterface>> {
        self.activity_interface.as_ref()
    }

    /// The task the gesture started over.
    pub fn running_task(&self) -> Option<&RunningTask> {
        self.running_task.as_ref()
    }

    /// Replace the running task.
    pub fn update_running_task(&mut self, task: Option<RunningTask>) {
        self.running_task = task;
    }

    /// Task a finishing recents animation is settling into, if any.
    pub fn finishing_recents_animation_task_id(&self) -> Option<TaskId> {
        self.finishing_recents_animation_task_id
    }

    /// Record (or clear) the task a finishing recents animation settles into.
    pub fn set_finishing_recents_animation_task_id(&mut self, id: Option<TaskId>) {
        self.finishing_recents_animation_task_id = id;
    }

    /// A previous animation is still finishing into a real task.
    pub fn has_pending_finish(&self) -> bool {
        self.finishing_recents_animation_task_id
            .is_some_and(TaskId::is_valid)
    }

    /// Time of the Down that started the gesture.
    pub fn down_time_ms(&self) -> Option<u64> {
        self.down_time_ms
    }

    /// Record the time of the Down that started the gesture.
    pub fn set_down_time_ms(&mut self, time_ms: u64) {
        self.down_time_ms = Some(time_ms);
    }

    /// Progress flags.
    pub fn flags(&self) -> GestureStateFlags {
        self.flags
    }

    /// Set progress flags.
    pub fn set_flags(&mut self, flags: GestureStateFlags) {
        self.flags |= flags;
    }

    /// Chosen end target.
    pub fn end_target(&self) -> Option<GestureEndTarget> {
        self.end_target
    }

    /// Choose the end target.
    pub fn set_end_target(&mut self, target: GestureEndTarget) {
        self.end_target = Some(target);
        self.flags |= GestureStateFlags::END_TARGET_SET;
    }

    /// The recents animation started and has neither ended nor been canceled.
    pub fn is_recents_animation_running(&self) -> bool {
        self.flags
            .contains(GestureStateFlags::RECENTS_ANIMATION_STARTED)
            && !self.flags.intersects(
                GestureStateFlags::RECENTS_ANIMATION_ENDED
                    | GestureStateFlags::RECENTS_ANIMATION_CANCELED,
            )
    }

    /// The recents animation is running towards a launcher-owned target.
    pub fn is_running_animation_to_launcher(&self) -> bool {
        self.is_recents_animation_running()
            && self.end_target.is_some_and(GestureEndTarget::is_launcher)
    }

    /// The bound destination shows a live tile.
    pub fn is_in_live_tile_mode(&self) -> bool {
        self.activity_interface
            .as_ref()
            .is_some_and(|a| a.is_in_live_tile_mode())
    }

    /// Write a human-readable summary for dumps.
    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "GestureState:")?;
        match self.log_id {
            Some(id) => writeln!(out, "  gestureId={id}")?,
            None => writeln!(out, "  gestureId=none")?,
        }
        match self.running_task.as_ref().and_then(|t| t.id) {
            Some(id) => writeln!(out, "  runningTask={id}")?,
            None => writeln!(out, "  runningTask=none")?,
        }
        match self.finishing_recents_animation_task_id {
            Some(id) => writeln!(out, "  finishingRecentsAnimationTaskId={id}")?,
            None => writeln!(out, "  finishingRecentsAnimationTaskId=none")?,
        }
        writeln!(out, "  endTarget={:?}", self.end_target)?;
        writeln!(out, "  flags={:?}", self.flags)
    }
}
