// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routing basics.
//!
//! Route a swipe from an app, then a swipe from the assistant corner, and print
//! the chain picked for each gesture and the gesture log.
//!
//! Run:
//! - `cargo run -p understory_gesture_demos --example routing_basics`

use std::rc::Rc;

use kurbo::Rect;
use understory_gesture::consumer::{
    ConsumerContext, ConsumerFactory, ConsumerHandler, ConsumerId, ConsumerSpec, Outcome,
};
use understory_gesture::device::{
    ActivityInterface, CreatedActivity, DeviceState, OverviewComponents, TaskResolver,
};
use understory_gesture::device_state::RecentsDeviceState;
use understory_gesture::event::{MotionAction, MotionEvent};
use understory_gesture::gesture_state::SharedGestureState;
use understory_gesture::router::GestureRouter;
use understory_gesture::types::{ActivityType, ComponentName, NavigationMode, RunningTask, TaskId};

struct Printing {
    id: ConsumerId,
    label: &'static str,
}

impl ConsumerHandler for Printing {
    fn on_motion_event(&mut self, event: &MotionEvent, _: &mut ConsumerContext<'_>) -> Outcome {
        println!("  {:?} {} <- {}", self.id, self.label, event.action.label());
        Outcome::Continue
    }
}

struct PrintingFactory;

impl ConsumerFactory for PrintingFactory {
    fn create(
        &mut self,
        id: ConsumerId,
        spec: &ConsumerSpec,
        _: &SharedGestureState,
    ) -> Box<dyn ConsumerHandler> {
        Box::new(Printing {
            id,
            label: spec.kind().label(),
        })
    }
}

struct Mail;

impl TaskResolver for Mail {
    fn running_task(&self, _: bool) -> Option<RunningTask> {
        let component = ComponentName::new("com.example.mail", ".Inbox");
        Some(RunningTask {
            id: Some(TaskId(7)),
            base_component: Some(component.clone()),
            top_activity: Some(component),
            activity_type: ActivityType::Standard,
            excluded_from_recents: false,
        })
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

fn swipe(router: &mut GestureRouter<RecentsDeviceState, Mail, Overview, PrintingFactory>, x: f64) {
    router.on_input_event(MotionEvent::new(MotionAction::Down, x, 1950.0, 0).into());
    println!("chain: {}", router.consumer_name());
    router.on_input_event(MotionEvent::new(MotionAction::Move, x, 1700.0, 16).into());
    router.on_input_event(MotionEvent::new(MotionAction::Up, x, 1200.0, 32).into());
    println!("after up: {}", router.consumer_name());
}

fn main() {
    let mut device = RecentsDeviceState::new(NavigationMode::NoButton);
    device.set_user_unlocked(true);
    device.set_swipe_up_region(Rect::new(0.0, 1900.0, 1080.0, 2000.0));
    device.set_assistant_available(true);
    device.set_assistant_regions([Rect::new(0.0, 1800.0, 200.0, 2000.0)]);

    let mut router = GestureRouter::new(device, Mail, Overview(Rc::new(Launcher)), PrintingFactory);

    println!("swipe from the middle of the navigation bar");
    swipe(&mut router, 540.0);
    assert_eq!(router.consumer_name(), "RESET_GESTURE");

    println!("swipe from the assistant corner");
    swipe(&mut router, 100.0);

    let mut out = String::new();
    router.dump(&mut out).unwrap();
    println!("{out}");
}
