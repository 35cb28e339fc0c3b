// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch thread.
//!
//! Run the router on its own thread, feed it events and device updates from
//! the main thread, and request dumps through the handle.
//!
//! Run:
//! - `cargo run -p understory_gesture_demos --example dispatch_thread`

use std::rc::Rc;

use kurbo::Rect;
use understory_gesture::consumer::{
    ConsumerContext, ConsumerFactory, ConsumerHandler, ConsumerId, ConsumerSpec, Outcome,
};
use understory_gesture::device::{
    ActivityInterface, CreatedActivity, DeviceState, DeviceStateUpdate, OverviewComponents,
    TaskResolver,
};
use understory_gesture::device_state::RecentsDeviceState;
use understory_gesture::dispatch::DispatchLoop;
use understory_gesture::event::{MotionAction, MotionEvent};
use understory_gesture::gesture_state::SharedGestureState;
use understory_gesture::router::GestureRouter;
use understory_gesture::types::{ComponentName, NavigationMode, RunningTask, TaskId};

struct Passive;

impl ConsumerHandler for Passive {
    fn on_motion_event(&mut self, _: &MotionEvent, _: &mut ConsumerContext<'_>) -> Outcome {
        Outcome::Continue
    }
}

struct PassiveFactory;

impl ConsumerFactory for PassiveFactory {
    fn create(
        &mut self,
        _: ConsumerId,
        _: &ConsumerSpec,
        _: &SharedGestureState,
    ) -> Box<dyn ConsumerHandler> {
        Box::new(Passive)
    }
}

struct SingleTask;

impl TaskResolver for SingleTask {
    fn running_task(&self, _: bool) -> Option<RunningTask> {
        Some(RunningTask::with_id(TaskId(3)))
    }
}

struct Launcher;

impl ActivityInterface for Launcher {
    fn is_resumed(&self) -> bool {
        false
    }
    fn is_in_live_tile_mode(&self) -> bool {
        false
    }
    fn defer_starting_activity(&self, _: &dyn DeviceState, _: &MotionEvent) -> bool {
        false
    }
    fn created_activity(&self) -> Option<CreatedActivity> {
        None
    }
}

struct Overview(Rc<Launcher>);

impl OverviewComponents for Overview {
    fn activity_interface(&self) -> Rc<dyn ActivityInterface> {
        self.0.clone()
    }
    fn is_home_and_overview_same(&self) -> bool {
        true
    }
    fn home_component(&self) -> ComponentName {
        ComponentName::new("com.android.launcher3", ".Launcher")
    }
    fn overview_component(&self) -> ComponentName {
        ComponentName::new("com.android.launcher3", ".Launcher")
    }
}

fn main() {
    let dispatch = DispatchLoop::spawn(|_handle| {
        let mut device = RecentsDeviceState::new(NavigationMode::NoButton);
        device.set_swipe_up_region(Rect::new(0.0, 1900.0, 1080.0, 2000.0));
        GestureRouter::new(device, SingleTask, Overview(Rc::new(Launcher)), PassiveFactory)
    })
    .unwrap();
    let handle = dispatch.handle();

    // Locked: the lock-screen consumer takes the gesture.
    handle
        .input(MotionEvent::new(MotionAction::Down, 540.0, 1950.0, 0))
        .unwrap();
    print!("{}", handle.dump(Vec::<String>::new()).unwrap());

    handle.device_state(DeviceStateUpdate::UserUnlocked).unwrap();
    handle
        .input(MotionEvent::new(MotionAction::Up, 540.0, 1950.0, 10))
        .unwrap();
    handle
        .input(MotionEvent::new(MotionAction::Down, 540.0, 1950.0, 20))
        .unwrap();
    print!("{}", handle.dump(Vec::<String>::new()).unwrap());

    print!("{}", handle.dump(["cmd"]).unwrap());
    dispatch.shutdown();
}
