// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types shared by the router and its collaborators: tasks, components,
//! navigation modes, and system UI state flags.
//!
//! ## Overview
//!
//! These types describe what the router learns about the device and the
//! foreground task. They are produced by the traits in [`device`](crate::device)
//! and consumed by the [`router`](crate::router).

use core::fmt;

/// Identifier of a running task.
///
/// Positive ids refer to real tasks. The router only treats a previous gesture's
/// finishing id as a continuation target when it is strictly positive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub i32);

impl TaskId {
    /// Returns true if this id can name a live task.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// A package/class pair naming an activity.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ComponentName {
    /// Owning package, e.g. `com.android.launcher3`.
    pub package: String,
    /// Fully qualified activity class.
    pub class: String,
}

impl ComponentName {
    /// Create a component from its package and class.
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            class: class.into(),
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.class)
    }
}

/// Window-level activity type of a task.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ActivityType {
    /// Not reported.
    #[default]
    Undefined,
    /// A regular application.
    Standard,
    /// The home screen.
    Home,
    /// The recents/overview surface.
    Recents,
    /// The system assistant.
    Assistant,
}

/// Descriptor of the task currently in the foreground.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunningTask {
    /// Task identifier.
    pub id: Option<TaskId>,
    /// Component the task was launched with.
    pub base_component: Option<ComponentName>,
    /// Component currently on top of the task.
    pub top_activity: Option<ComponentName>,
    /// Activity type reported by the window configuration.
    pub activity_type: ActivityType,
    /// True when the task was launched with the exclude-from-recents flag.
    pub excluded_from_recents: bool,
}

impl RunningTask {
    /// A task descriptor that only carries an id.
    ///
    /// Used to point a continuation gesture at the task a previous animation
    /// is still finishing into.
    pub fn with_id(id: TaskId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Returns true for an assistant surface that hides itself from recents.
    ///
    /// Gestures over such a surface are routed as if they started over the
    /// task behind it.
    pub fn is_excluded_assistant(&self) -> bool {
        self.activity_type == ActivityType::Assistant && self.excluded_from_recents
    }
}

/// System navigation mode.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavigationMode {
    /// Back, home, and recents buttons.
    #[default]
    ThreeButton,
    /// Back button plus a swipeable home pill.
    TwoButton,
    /// Fully gestural navigation.
    NoButton,
}

impl NavigationMode {
    /// Some gestures are available (two-button or fully gestural).
    #[inline]
    pub const fn has_gestures(self) -> bool {
        !matches!(self, Self::ThreeButton)
    }
}

bitflags::bitflags! {
    /// System UI state published by the system bar process.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SystemUiFlags: u32 {
        /// A task is pinned to the screen.
        const SCREEN_PINNING = 1 << 0;
        /// The navigation bar is hidden.
        const NAV_BAR_HIDDEN = 1 << 1;
        /// The notification panel is expanded.
        const NOTIFICATION_PANEL_EXPANDED = 1 << 2;
        /// The keyguard is showing.
        const STATUS_BAR_KEYGUARD_SHOWING = 1 << 3;
        /// The keyguard is showing but occluded by an activity (e.g. camera).
        const STATUS_BAR_KEYGUARD_SHOWING_OCCLUDED = 1 << 4;
        /// The security bouncer is showing.
        const BOUNCER_SHOWING = 1 << 5;
        /// The accessibility button is clickable.
        const A11Y_BUTTON_CLICKABLE = 1 << 6;
        /// The accessibility button supports long-click.
        const A11Y_BUTTON_LONG_CLICKABLE = 1 << 7;
        /// Home is disabled.
        const HOME_DISABLED = 1 << 8;
        /// Overview is disabled.
        const OVERVIEW_DISABLED = 1 << 9;
        /// Quick settings are expanded.
        const QUICK_SETTINGS_EXPANDED = 1 << 10;
        /// Bubbles are expanded.
        const BUBBLES_EXPANDED = 1 << 11;
        /// Gestures may start even while the navigation bar is hidden.
        const ALLOW_GESTURE_IGNORING_BAR_VISIBILITY = 1 << 12;
        /// Launcher tracing is enabled.
        const TRACING_ENABLED = 1 << 13;
    }
}

impl SystemUiFlags {
    /// Returns true when the assistant corner gesture must not fire.
    ///
    /// Disabled in quick settings, during screen pinning, while the bouncer is
    /// showing, and while notifications are expanded on an unlocked device.
    pub fn is_assistant_gesture_disabled(self) -> bool {
        let always = Self::SCREEN_PINNING | Self::BOUNCER_SHOWING | Self::QUICK_SETTINGS_EXPANDED;
        if self.intersects(always) {
            return true;
        }
        self.contains(Self::NOTIFICATION_PANEL_EXPANDED)
            && !self.contains(Self::STATUS_BAR_KEYGUARD_SHOWING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_validity() {
        assert!(TaskId(42).is_valid());
        assert!(!TaskId(0).is_valid());
        assert!(!TaskId(-1).is_valid());
    }

    #[test]
    fn excluded_assistant_requires_both_type_and_flag() {
        let mut task = RunningTask {
            id: Some(TaskId(3)),
            activity_type: ActivityType::Assistant,
            ..RunningTask::default()
        };
        assert!(!task.is_excluded_assistant());
        task.excluded_from_recents = true;
        assert!(task.is_excluded_assistant());
        task.activity_type = ActivityType::Standard;
        assert!(!task.is_excluded_assistant());
    }

    #[test]
    fn assistant_disabled_flags() {
        assert!(!SystemUiFlags::empty().is_assistant_gesture_disabled());
        assert!(SystemUiFlags::SCREEN_PINNING.is_assistant_gesture_disabled());
        assert!(SystemUiFlags::BOUNCER_SHOWING.is_assistant_gesture_disabled());
        assert!(SystemUiFlags::NOTIFICATION_PANEL_EXPANDED.is_assistant_gesture_disabled());
        // Notifications over the keyguard do not block the gesture.
        assert!(
            !(SystemUiFlags::NOTIFICATION_PANEL_EXPANDED
                | SystemUiFlags::STATUS_BAR_KEYGUARD_SHOWING)
                .is_assistant_gesture_disabled()
        );
    }

    #[test]
    fn navigation_modes_with_gestures() {
        assert!(!NavigationMode::ThreeButton.has_gestures());
        assert!(NavigationMode::TwoButton.has_gestures());
        assert!(NavigationMode::NoButton.has_gestures());
    }

    #[test]
    fn with_id_only_sets_id() {
        let task = RunningTask::with_id(TaskId(42));
        assert_eq!(task.id, Some(TaskId(42)));
        assert!(task.base_component.is_none());
        assert_eq!(task.activity_type, ActivityType::Undefined);
    }
}
