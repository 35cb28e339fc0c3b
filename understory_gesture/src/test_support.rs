// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fake collaborators shared by the unit tests.

use core::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::consumer::{
    ConsumerContext, ConsumerFactory, ConsumerHandler, ConsumerId, ConsumerSpec, ConsumerTypes,
    Outcome,
};
use crate::device::{
    ActivityInterface, CreatedActivity, DeviceState, DeviceStateUpdate, OverscrollPlugin,
    OverviewComponents, TaskResolver,
};
use crate::event::{MotionAction, MotionEvent};
use crate::gesture_state::SharedGestureState;
use crate::types::{ActivityType, ComponentName, RunningTask, TaskId};
use crate::worker::{BroadcastError, Broadcaster};

pub(crate) const HOME_PACKAGE: &str = "com.android.launcher3";
pub(crate) const APP_PACKAGE: &str = "com.example.mail";

pub(crate) fn home_component() -> ComponentName {
    ComponentName::new(HOME_PACKAGE, ".Launcher")
}

pub(crate) fn app_task(id: i32) -> RunningTask {
    let component = ComponentName::new(APP_PACKAGE, ".Inbox");
    RunningTask {
        id: Some(TaskId(id)),
        base_component: Some(component.clone()),
        top_activity: Some(component),
        activity_type: ActivityType::Standard,
        excluded_from_recents: false,
    }
}

pub(crate) fn excluded_assistant_task() -> RunningTask {
    let component = ComponentName::new("com.example.assistant", ".Voice");
    RunningTask {
        id: Some(TaskId(99)),
        base_component: Some(component.clone()),
        top_activity: Some(component),
        activity_type: ActivityType::Assistant,
        excluded_from_recents: true,
    }
}

#[derive(Debug)]
pub(crate) struct FakeDevice {
    pub(crate) unlocked: bool,
    pub(crate) fully_gestural: bool,
    pub(crate) button_nav: bool,
    pub(crate) can_start: bool,
    pub(crate) in_swipe_up_region: bool,
    pub(crate) keyguard_occluded: bool,
    pub(crate) pinning: bool,
    pub(crate) a11y_menu: bool,
    pub(crate) assistant_trigger: bool,
    pub(crate) gesture_blocked: bool,
    pub(crate) exclusion: bool,
    pub(crate) visibility: f32,
    pub(crate) blocked_packages: Vec<String>,
    pub(crate) applied: Vec<DeviceStateUpdate>,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self {
            unlocked: true,
            fully_gestural: true,
            button_nav: false,
            can_start: true,
            in_swipe_up_region: true,
            keyguard_occluded: false,
            pinning: false,
            a11y_menu: false,
            assistant_trigger: false,
            gesture_blocked: false,
            exclusion: false,
            visibility: 0.0,
            blocked_packages: Vec::new(),
            applied: Vec::new(),
        }
    }
}

impl DeviceState for FakeDevice {
    fn is_in_swipe_up_region(&self, _: &MotionEvent) -> bool {
        self.in_swipe_up_region
    }
    fn is_fully_gestural_nav_mode(&self) -> bool {
        self.fully_gestural
    }
    fn is_gestural_nav_mode(&self) -> bool {
        !self.button_nav
    }
    fn is_button_nav_mode(&self) -> bool {
        self.button_nav
    }
    fn can_start_system_gesture(&self) -> bool {
        self.can_start
    }
    fn is_keyguard_showing_occluded(&self) -> bool {
        self.keyguard_occluded
    }
    fn is_screen_pinning_active(&self) -> bool {
        self.pinning
    }
    fn is_accessibility_menu_available(&self) -> bool {
        self.a11y_menu
    }
    fn can_trigger_assistant_action(&self, _: &MotionEvent) -> bool {
        self.assistant_trigger
    }
    fn is_gesture_blocked_activity(&self, task: Option<&RunningTask>) -> bool {
        self.gesture_blocked && task.is_some()
    }
    fn is_in_exclusion_region(&self, _: &MotionEvent) -> bool {
        self.exclusion
    }
    fn is_user_unlocked(&self) -> bool {
        self.unlocked
    }
    fn assistant_visibility(&self) -> f32 {
        self.visibility
    }
    fn gesture_blocked_packages(&self) -> Vec<String> {
        self.blocked_packages.clone()
    }
    fn apply(&mut self, update: DeviceStateUpdate) {
        match &update {
            DeviceStateUpdate::UserUnlocked => self.unlocked = true,
            DeviceStateUpdate::AssistantVisibility(v) => self.visibility = *v,
            _ => {}
        }
        self.applied.push(update);
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeTasks {
    /// Result without filtering.
    pub(crate) top: Option<RunningTask>,
    /// Result when tasks hidden from recents are skipped.
    pub(crate) behind: Option<RunningTask>,
}

impl TaskResolver for FakeTasks {
    fn running_task(&self, filter_only_visible_recents: bool) -> Option<RunningTask> {
        if filter_only_visible_recents {
            self.behind.clone()
        } else {
            self.top.clone()
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeActivity {
    pub(crate) resumed: Cell<bool>,
    pub(crate) live_tile: Cell<bool>,
    pub(crate) defer: Cell<bool>,
    pub(crate) created: RefCell<Option<CreatedActivity>>,
    pub(crate) visibility: Cell<Option<f32>>,
}

impl FakeActivity {
    pub(crate) fn create(&self, has_window_focus: bool) {
        *self.created.borrow_mut() = Some(CreatedActivity {
            component: home_component(),
            has_window_focus,
            is_started: true,
        });
    }
}

impl ActivityInterface for FakeActivity {
    fn is_resumed(&self) -> bool {
        self.resumed.get()
    }
    fn is_in_live_tile_mode(&self) -> bool {
        self.live_tile.get()
    }
    fn defer_starting_activity(&self, _: &dyn DeviceState, _: &MotionEvent) -> bool {
        self.defer.get()
    }
    fn created_activity(&self) -> Option<CreatedActivity> {
        self.created.borrow().clone()
    }
    fn on_assistant_visibility_changed(&self, visibility: f32) {
        self.visibility.set(Some(visibility));
    }
}

#[derive(Debug)]
pub(crate) struct FakeOverview {
    pub(crate) activity: Rc<FakeActivity>,
    pub(crate) home_and_overview_same: bool,
    pub(crate) constrained: bool,
}

impl Default for FakeOverview {
    fn default() -> Self {
        Self {
            activity: Rc::new(FakeActivity::default()),
            home_and_overview_same: true,
            constrained: false,
        }
    }
}

impl OverviewComponents for FakeOverview {
    fn activity_interface(&self) -> Rc<dyn ActivityInterface> {
        self.activity.clone()
    }
    fn is_home_and_overview_same(&self) -> bool {
        self.home_and_overview_same
    }
    fn home_component(&self) -> ComponentName {
        home_component()
    }
    fn overview_component(&self) -> ComponentName {
        ComponentName::new(HOME_PACKAGE, ".RecentsActivity")
    }
    fn assistant_gesture_is_constrained(&self) -> bool {
        self.constrained
    }
}

#[derive(Debug)]
pub(crate) struct FakePlugin {
    active: AtomicBool,
}

impl FakePlugin {
    pub(crate) fn shared(active: bool) -> Arc<dyn OverscrollPlugin> {
        Arc::new(Self {
            active: AtomicBool::new(active),
        })
    }
}

impl OverscrollPlugin for FakePlugin {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Scripted reactions of a recorded handler.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Behavior {
    pub(crate) intercept_on: Option<MotionAction>,
    pub(crate) deactivate_on: Option<MotionAction>,
    pub(crate) deactivate_on_switch: bool,
    pub(crate) start_animation_on: Option<MotionAction>,
}

#[derive(Debug, Default)]
struct Journal {
    events: Vec<(ConsumerId, MotionAction)>,
    switched: Vec<ConsumerId>,
    detached: HashSet<ConsumerId>,
    claims: Vec<(ConsumerId, bool)>,
}

/// Shared journal of everything recorded handlers saw.
#[derive(Clone, Debug, Default)]
pub(crate) struct Recorder(Rc<RefCell<Journal>>);

impl Recorder {
    pub(crate) fn handler(&self, id: ConsumerId, behavior: Behavior) -> Box<dyn ConsumerHandler> {
        Box::new(RecordingHandler {
            id,
            behavior,
            recorder: self.clone(),
        })
    }

    pub(crate) fn events(&self) -> Vec<(ConsumerId, MotionAction)> {
        self.0.borrow().events.clone()
    }

    pub(crate) fn switched(&self) -> Vec<ConsumerId> {
        self.0.borrow().switched.clone()
    }

    /// `(claimant, succeeded)` for each animation start attempt.
    pub(crate) fn claims(&self) -> Vec<(ConsumerId, bool)> {
        self.0.borrow().claims.clone()
    }

    pub(crate) fn set_detached(&self, id: ConsumerId, detached: bool) {
        let mut journal = self.0.borrow_mut();
        if detached {
            journal.detached.insert(id);
        } else {
            journal.detached.remove(&id);
        }
    }

    pub(crate) fn clear_events(&self) {
        self.0.borrow_mut().events.clear();
    }
}

struct RecordingHandler {
    id: ConsumerId,
    behavior: Behavior,
    recorder: Recorder,
}

impl ConsumerHandler for RecordingHandler {
    fn on_motion_event(&mut self, event: &MotionEvent, cx: &mut ConsumerContext<'_>) -> Outcome {
        let action = event.action;
        self.recorder.0.borrow_mut().events.push((self.id, action));
        if self.behavior.start_animation_on == Some(action) {
            let id = cx.consumer_id();
            let ok = cx.animations().start_recents_animation(id, None).is_ok();
            self.recorder.0.borrow_mut().claims.push((self.id, ok));
        }
        if self.behavior.deactivate_on == Some(action) {
            cx.request_deactivate();
        }
        if self.behavior.intercept_on == Some(action) {
            Outcome::Intercept
        } else {
            Outcome::Continue
        }
    }

    fn is_detached_from_gesture(&self) -> bool {
        self.recorder.0.borrow().detached.contains(&self.id)
    }

    fn on_about_to_be_switched(&mut self, cx: &mut ConsumerContext<'_>) {
        self.recorder.0.borrow_mut().switched.push(self.id);
        if self.behavior.deactivate_on_switch {
            cx.request_deactivate();
        }
    }
}

/// One consumer built by [`RecordingFactory`].
#[derive(Clone, Debug)]
pub(crate) struct Built {
    pub(crate) id: ConsumerId,
    pub(crate) spec: ConsumerSpec,
    pub(crate) log_id: Option<u32>,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingFactory {
    pub(crate) recorder: Recorder,
    pub(crate) behaviors: HashMap<ConsumerTypes, Behavior>,
    pub(crate) built: Vec<Built>,
}

impl RecordingFactory {
    pub(crate) fn last_spec(&self, kind: ConsumerTypes) -> Option<&ConsumerSpec> {
        self.built
            .iter()
            .rev()
            .map(|b| &b.spec)
            .find(|s| s.kind() == kind)
    }
}

impl ConsumerFactory for RecordingFactory {
    fn create(
        &mut self,
        id: ConsumerId,
        spec: &ConsumerSpec,
        gesture: &SharedGestureState,
    ) -> Box<dyn ConsumerHandler> {
        self.built.push(Built {
            id,
            spec: spec.clone(),
            log_id: gesture.borrow().log_id(),
        });
        let behavior = self
            .behaviors
            .get(&spec.kind())
            .copied()
            .unwrap_or_default();
        self.recorder.handler(id, behavior)
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBroadcaster {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingBroadcaster {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn send(&self, action: &str, package: &str) -> Result<(), BroadcastError> {
        if self.fail {
            return Err(BroadcastError::Closed);
        }
        self.sent
            .lock()
            .unwrap()
            .push((action.to_owned(), package.to_owned()));
        Ok(())
    }
}
