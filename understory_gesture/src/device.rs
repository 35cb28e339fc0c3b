// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits the router queries while picking a consumer chain.
//!
//! ## Overview
//!
//! - [`DeviceState`]: navigation mode, lock state, touch regions, and system UI predicates.
//!   [`RecentsDeviceState`](crate::device_state::RecentsDeviceState) is a ready-made implementation.
//! - [`TaskResolver`]: the foreground task.
//! - [`ActivityInterface`]: the destination activity (launcher or fallback recents).
//! - [`OverviewComponents`]: which destination is bound, and the home component.
//! - [`OverscrollPlugin`]: an optional quick-capture plugin instance.
//!
//! All of these are called on the dispatch thread only.

use std::rc::Rc;

use kurbo::Rect;

use crate::event::MotionEvent;
use crate::types::{ComponentName, NavigationMode, RunningTask, SystemUiFlags};

/// A change to device state delivered by an external callback.
///
/// These arrive as [`RoutingMessage`](crate::dispatch::RoutingMessage)s and are
/// applied on the dispatch thread through [`DeviceState::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceStateUpdate {
    /// System UI state flags changed.
    SystemUiFlags(SystemUiFlags),
    /// The assistant became (un)available.
    AssistantAvailable(bool),
    /// Assistant visibility in `[0, 1]`.
    AssistantVisibility(f32),
    /// The navigation mode changed.
    NavigationMode(NavigationMode),
    /// The region of the navigation bar that defers gestures.
    DeferredGestureRegion(Rect),
    /// The user unlocked the device for the first time since boot.
    UserUnlocked,
}

/// Device and navigation state as seen by the router.
pub trait DeviceState {
    /// Returns true if `event` lands in the region that starts a swipe-up gesture.
    fn is_in_swipe_up_region(&self, event: &MotionEvent) -> bool;
    /// Fully gestural navigation (no buttons).
    fn is_fully_gestural_nav_mode(&self) -> bool;
    /// Any navigation mode with gestures.
    fn is_gestural_nav_mode(&self) -> bool;
    /// Three-button navigation.
    fn is_button_nav_mode(&self) -> bool;
    /// Whether the current system UI state allows a system gesture to begin.
    fn can_start_system_gesture(&self) -> bool;
    /// The keyguard is showing but occluded by an activity.
    fn is_keyguard_showing_occluded(&self) -> bool;
    /// A task is pinned to the screen.
    fn is_screen_pinning_active(&self) -> bool;
    /// The accessibility menu button is available.
    fn is_accessibility_menu_available(&self) -> bool;
    /// `event` may trigger the assistant corner gesture.
    fn can_trigger_assistant_action(&self, event: &MotionEvent) -> bool;
    /// The task's top activity opted out of system gestures.
    fn is_gesture_blocked_activity(&self, task: Option<&RunningTask>) -> bool;
    /// `event` lands in an app-declared gesture exclusion region.
    fn is_in_exclusion_region(&self, event: &MotionEvent) -> bool;
    /// The user has unlocked the device since boot.
    fn is_user_unlocked(&self) -> bool;

    /// Last reported assistant visibility in `[0, 1]`.
    fn assistant_visibility(&self) -> f32 {
        0.0
    }

    /// Packages owning gesture-blocked activities.
    fn gesture_blocked_packages(&self) -> Vec<String> {
        Vec::new()
    }

    /// Apply an externally delivered update. The default ignores it.
    fn apply(&mut self, update: DeviceStateUpdate) {
        let _ = update;
    }
}

/// Resolves the foreground task.
pub trait TaskResolver {
    /// Returns the running task, or `None` if nothing can be resolved.
    ///
    /// With `filter_only_visible_recents`, tasks hidden from recents (such as an
    /// excluded assistant) are skipped, yielding the task behind them.
    fn running_task(&self, filter_only_visible_recents: bool) -> Option<RunningTask>;
}

/// A created destination activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedActivity {
    /// Component of the activity.
    pub component: ComponentName,
    /// The activity's root view currently has window focus.
    pub has_window_focus: bool,
    /// The activity is started (visible to the user).
    pub is_started: bool,
}

/// The destination a swipe-up gesture animates towards.
///
/// There is one binding for the launcher and one for the fallback recents
/// activity; [`OverviewComponents::activity_interface`] returns whichever is active.
pub trait ActivityInterface {
    /// The destination activity is resumed.
    fn is_resumed(&self) -> bool;
    /// Overview is showing a live tile of the previous app.
    fn is_in_live_tile_mode(&self) -> bool;
    /// Whether the destination should wait for the gesture to resolve before starting.
    fn defer_starting_activity(&self, device: &dyn DeviceState, event: &MotionEvent) -> bool;
    /// The created destination activity, if any.
    fn created_activity(&self) -> Option<CreatedActivity>;
    /// Notify the destination that assistant visibility changed.
    fn on_assistant_visibility_changed(&self, visibility: f32) {
        let _ = visibility;
    }
}

/// Observes which overview destination is active.
pub trait OverviewComponents {
    /// Binding for the active destination.
    fn activity_interface(&self) -> Rc<dyn ActivityInterface>;
    /// Home and overview are provided by the same activity (the launcher).
    fn is_home_and_overview_same(&self) -> bool;
    /// Component of the current home activity.
    fn home_component(&self) -> ComponentName;
    /// Component of the overview activity (used for preloading).
    fn overview_component(&self) -> ComponentName;
    /// The assistant gesture should be constrained (e.g. a smaller trigger area).
    fn assistant_gesture_is_constrained(&self) -> bool {
        false
    }
}

/// A quick-capture overscroll plugin.
///
/// Instances are delivered from plugin callbacks on other threads, hence `Send + Sync`.
pub trait OverscrollPlugin: Send + Sync + core::fmt::Debug {
    /// The plugin is ready to handle gestures.
    fn is_active(&self) -> bool;
}
