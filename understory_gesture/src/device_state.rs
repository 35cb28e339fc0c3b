// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`DeviceState`] implementation backed by system UI flags and touch regions.
//!
//! ## Regions
//!
//! All regions are screen-space [`Rect`]s:
//! - the swipe-up region (the navigation bar area that starts a system gesture),
//! - the assistant corner regions,
//! - app-declared exclusion regions, which disable horizontal quick switch.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::Rect;
//! use understory_gesture::device::DeviceState;
//! use understory_gesture::device_state::RecentsDeviceState;
//! use understory_gesture::event::{MotionAction, MotionEvent};
//! use understory_gesture::types::NavigationMode;
//!
//! let mut state = RecentsDeviceState::new(NavigationMode::NoButton);
//! state.set_swipe_up_region(Rect::new(0.0, 1900.0, 1080.0, 2000.0));
//! let down = MotionEvent::new(MotionAction::Down, 540.0, 1950.0, 0);
//! assert!(state.is_in_swipe_up_region(&down));
//! ```

use std::collections::HashSet;

use kurbo::Rect;

use crate::device::{DeviceState, DeviceStateUpdate};
use crate::event::MotionEvent;
use crate::types::{ComponentName, NavigationMode, RunningTask, SystemUiFlags};

/// Device state computed from system UI flags, navigation mode, and touch regions.
#[derive(Clone, Debug)]
pub struct RecentsDeviceState {
    navigation_mode: NavigationMode,
    system_ui_flags: SystemUiFlags,
    user_unlocked: bool,
    swipe_up_region: Rect,
    deferred_gesture_region: Option<Rect>,
    assistant_regions: Vec<Rect>,
    exclusion_regions: Vec<Rect>,
    assistant_available: bool,
    assistant_visibility: f32,
    gesture_blocked_activities: HashSet<ComponentName>,
}

impl Default for RecentsDeviceState {
    fn default() -> Self {
        Self::new(NavigationMode::default())
    }
}

impl RecentsDeviceState {
    /// Create a locked device state with empty regions.
    pub fn new(navigation_mode: NavigationMode) -> Self {
        Self {
            navigation_mode,
            system_ui_flags: SystemUiFlags::empty(),
            user_unlocked: false,
            swipe_up_region: Rect::ZERO,
            deferred_gesture_region: None,
            assistant_regions: Vec::new(),
            exclusion_regions: Vec::new(),
            assistant_available: false,
            assistant_visibility: 0.0,
            gesture_blocked_activities: HashSet::new(),
        }
    }

    /// Current navigation mode.
    pub fn navigation_mode(&self) -> NavigationMode {
        self.navigation_mode
    }

    /// Current system UI flags.
    pub fn system_ui_flags(&self) -> SystemUiFlags {
        self.system_ui_flags
    }

    /// Set the navigation mode.
    pub fn set_navigation_mode(&mut self, mode: NavigationMode) {
        self.navigation_mode = mode;
    }

    /// Replace the system UI flags.
    pub fn set_system_ui_flags(&mut self, flags: SystemUiFlags) {
        self.system_ui_flags = flags;
    }

    /// Mark the user as unlocked (or locked again, for tests).
    pub fn set_user_unlocked(&mut self, unlocked: bool) {
        self.user_unlocked = unlocked;
    }

    /// Set the region that starts a swipe-up gesture.
    pub fn set_swipe_up_region(&mut self, region: Rect) {
        self.swipe_up_region = region;
    }

    /// Set the region that defers gestures, if any.
    pub fn set_deferred_gesture_region(&mut self, region: Option<Rect>) {
        self.deferred_gesture_region = region;
    }

    /// Replace the assistant corner regions.
    pub fn set_assistant_regions(&mut self, regions: impl IntoIterator<Item = Rect>) {
        self.assistant_regions = regions.into_iter().collect();
    }

    /// Replace the exclusion regions.
    pub fn set_exclusion_regions(&mut self, regions: impl IntoIterator<Item = Rect>) {
        self.exclusion_regions = regions.into_iter().collect();
    }

    /// Set whether the assistant is available.
    pub fn set_assistant_available(&mut self, available: bool) {
        self.assistant_available = available;
    }

    /// Record assistant visibility.
    pub fn set_assistant_visibility(&mut self, visibility: f32) {
        self.assistant_visibility = visibility.clamp(0.0, 1.0);
    }

    /// Add an activity that blocks system gestures.
    pub fn add_gesture_blocked_activity(&mut self, component: ComponentName) {
        self.gesture_blocked_activities.insert(component);
    }

    /// The point lies in the deferred-gesture region.
    pub fn is_in_deferred_gesture_region(&self, event: &MotionEvent) -> bool {
        self.deferred_gesture_region
            .is_some_and(|r| r.contains(event.position))
    }
}

impl DeviceState for RecentsDeviceState {
    fn is_in_swipe_up_region(&self, event: &MotionEvent) -> bool {
        self.swipe_up_region.contains(event.position)
    }

    fn is_fully_gestural_nav_mode(&self) -> bool {
        self.navigation_mode == NavigationMode::NoButton
    }

    fn is_gestural_nav_mode(&self) -> bool {
        self.navigation_mode.has_gestures()
    }

    fn is_button_nav_mode(&self) -> bool {
        self.navigation_mode == NavigationMode::ThreeButton
    }

    fn can_start_system_gesture(&self) -> bool {
        let f = self.system_ui_flags;
        let can_start_with_nav_hidden = !f.contains(SystemUiFlags::NAV_BAR_HIDDEN)
            || f.contains(SystemUiFlags::ALLOW_GESTURE_IGNORING_BAR_VISIBILITY);
        let blocking = SystemUiFlags::NOTIFICATION_PANEL_EXPANDED
            | SystemUiFlags::QUICK_SETTINGS_EXPANDED
            | SystemUiFlags::BUBBLES_EXPANDED;
        can_start_with_nav_hidden
            && !f.intersects(blocking)
            && (!f.contains(SystemUiFlags::HOME_DISABLED)
                || !f.contains(SystemUiFlags::OVERVIEW_DISABLED))
    }

    fn is_keyguard_showing_occluded(&self) -> bool {
        self.system_ui_flags
            .contains(SystemUiFlags::STATUS_BAR_KEYGUARD_SHOWING_OCCLUDED)
    }

    fn is_screen_pinning_active(&self) -> bool {
        self.system_ui_flags.contains(SystemUiFlags::SCREEN_PINNING)
    }

    fn is_accessibility_menu_available(&self) -> bool {
        self.system_ui_flags
            .contains(SystemUiFlags::A11Y_BUTTON_CLICKABLE)
    }

    fn can_trigger_assistant_action(&self, event: &MotionEvent) -> bool {
        self.assistant_available
            && !self.system_ui_flags.is_assistant_gesture_disabled()
            && self
                .assistant_regions
                .iter()
                .any(|r| r.contains(event.position))
    }

    fn is_gesture_blocked_activity(&self, task: Option<&RunningTask>) -> bool {
        task.and_then(|t| t.top_activity.as_ref())
            .is_some_and(|c| self.gesture_blocked_activities.contains(c))
    }

    fn is_in_exclusion_region(&self, event: &MotionEvent) -> bool {
        // Apps can only declare exclusions against gestural navigation.
        self.is_gestural_nav_mode()
            && self
                .exclusion_regions
                .iter()
                .any(|r| r.contains(event.position))
    }

    fn is_user_unlocked(&self) -> bool {
        self.user_unlocked
    }

    fn assistant_visibility(&self) -> f32 {
        self.assistant_visibility
    }

    fn gesture_blocked_packages(&self) -> Vec<String> {
        let mut packages: Vec<String> = self
            .gesture_blocked_activities
            .iter()
            .map(|c| c.package.clone())
            .collect();
        packages.sort();
        packages.dedup();
        packages
    }

    fn apply(&mut self, update: DeviceStateUpdate) {
        match update {
            DeviceStateUpdate::SystemUiFlags(flags) => self.set_system_ui_flags(flags),
            DeviceStateUpdate::AssistantAvailable(available) => {
                self.set_assistant_available(available);
            }
            DeviceStateUpdate::AssistantVisibility(v) => self.set_assistant_visibility(v),
            DeviceStateUpdate::NavigationMode(mode) => self.set_navigation_mode(mode),
            DeviceStateUpdate::DeferredGestureRegion(r) => {
                self.set_deferred_gesture_region(Some(r));
            }
            DeviceStateUpdate::UserUnlocked => self.set_user_unlocked(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MotionAction;

    fn down(x: f64, y: f64) -> MotionEvent {
        MotionEvent::new(MotionAction::Down, x, y, 0)
    }

    fn gestural() -> RecentsDeviceState {
        let mut s = RecentsDeviceState::new(NavigationMode::NoButton);
        s.set_user_unlocked(true);
        s.set_swipe_up_region(Rect::new(0.0, 1900.0, 1080.0, 2000.0));
        s.set_assistant_regions([
            Rect::new(0.0, 1800.0, 100.0, 2000.0),
            Rect::new(980.0, 1800.0, 1080.0, 2000.0),
        ]);
        s
    }

    #[test]
    fn nav_mode_predicates() {
        let mut s = gestural();
        assert!(s.is_fully_gestural_nav_mode());
        assert!(s.is_gestural_nav_mode());
        assert!(!s.is_button_nav_mode());
        s.set_navigation_mode(NavigationMode::TwoButton);
        assert!(!s.is_fully_gestural_nav_mode());
        assert!(s.is_gestural_nav_mode());
        s.set_navigation_mode(NavigationMode::ThreeButton);
        assert!(s.is_button_nav_mode());
    }

    #[test]
    fn swipe_up_region_hit() {
        let s = gestural();
        assert!(s.is_in_swipe_up_region(&down(540.0, 1950.0)));
        assert!(!s.is_in_swipe_up_region(&down(540.0, 100.0)));
    }

    #[test]
    fn system_gesture_blocked_by_expanded_shade() {
        let mut s = gestural();
        assert!(s.can_start_system_gesture());
        s.set_system_ui_flags(SystemUiFlags::NOTIFICATION_PANEL_EXPANDED);
        assert!(!s.can_start_system_gesture());
        s.set_system_ui_flags(SystemUiFlags::NAV_BAR_HIDDEN);
        assert!(!s.can_start_system_gesture());
        s.set_system_ui_flags(
            SystemUiFlags::NAV_BAR_HIDDEN | SystemUiFlags::ALLOW_GESTURE_IGNORING_BAR_VISIBILITY,
        );
        assert!(s.can_start_system_gesture());
        s.set_system_ui_flags(SystemUiFlags::HOME_DISABLED | SystemUiFlags::OVERVIEW_DISABLED);
        assert!(!s.can_start_system_gesture());
        s.set_system_ui_flags(SystemUiFlags::HOME_DISABLED);
        assert!(s.can_start_system_gesture());
    }

    #[test]
    fn assistant_requires_availability_region_and_flags() {
        let mut s = gestural();
        let corner = down(50.0, 1950.0);
        assert!(!s.can_trigger_assistant_action(&corner));
        s.set_assistant_available(true);
        assert!(s.can_trigger_assistant_action(&corner));
        assert!(!s.can_trigger_assistant_action(&down(540.0, 1950.0)));
        s.set_system_ui_flags(SystemUiFlags::SCREEN_PINNING);
        assert!(!s.can_trigger_assistant_action(&corner));
    }

    #[test]
    fn blocked_activity_and_packages() {
        let mut s = gestural();
        let blocked = ComponentName::new("com.example.game", ".Main");
        s.add_gesture_blocked_activity(blocked.clone());
        s.add_gesture_blocked_activity(ComponentName::new("com.example.game", ".Other"));
        let task = RunningTask {
            top_activity: Some(blocked),
            ..RunningTask::default()
        };
        assert!(s.is_gesture_blocked_activity(Some(&task)));
        assert!(!s.is_gesture_blocked_activity(None));
        assert_eq!(s.gesture_blocked_packages(), vec!["com.example.game".to_string()]);
    }

    #[test]
    fn exclusion_regions_only_in_gestural_modes() {
        let mut s = gestural();
        s.set_exclusion_regions([Rect::new(0.0, 0.0, 200.0, 2000.0)]);
        assert!(s.is_in_exclusion_region(&down(10.0, 1950.0)));
        s.set_navigation_mode(NavigationMode::ThreeButton);
        assert!(!s.is_in_exclusion_region(&down(10.0, 1950.0)));
    }

    #[test]
    fn apply_updates() {
        let mut s = RecentsDeviceState::default();
        assert!(!s.is_user_unlocked());
        s.apply(DeviceStateUpdate::UserUnlocked);
        s.apply(DeviceStateUpdate::NavigationMode(NavigationMode::NoButton));
        s.apply(DeviceStateUpdate::SystemUiFlags(SystemUiFlags::SCREEN_PINNING));
        s.apply(DeviceStateUpdate::AssistantVisibility(3.0));
        s.apply(DeviceStateUpdate::DeferredGestureRegion(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(s.is_user_unlocked());
        assert!(s.is_fully_gestural_nav_mode());
        assert!(s.is_screen_pinning_active());
        assert_eq!(s.assistant_visibility(), 1.0);
        assert!(s.is_in_deferred_gesture_region(&down(5.0, 5.0)));
    }
}
