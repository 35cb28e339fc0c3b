// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
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
use understory_gesture::types::{
    ActivityType, ComponentName, NavigationMode, RunningTask, SystemUiFlags, TaskId,
};

struct Counting(u64);

impl ConsumerHandler for Counting {
    fn on_motion_event(&mut self, event: &MotionEvent, _: &mut ConsumerContext<'_>) -> Outcome {
        self.0 = self.0.wrapping_add(event.time_ms);
        Outcome::Continue
    }
}

struct CountingFactory;

impl ConsumerFactory for CountingFactory {
    fn create(
        &mut self,
        _: ConsumerId,
        _: &ConsumerSpec,
        _: &SharedGestureState,
    ) -> Box<dyn ConsumerHandler> {
        Box::new(Counting(0))
    }
}

struct App;

impl TaskResolver for App {
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

fn device(a11y: bool) -> RecentsDeviceState {
    let mut device = RecentsDeviceState::new(NavigationMode::NoButton);
    device.set_user_unlocked(true);
    device.set_swipe_up_region(Rect::new(0.0, 1900.0, 1080.0, 2000.0));
    device.set_assistant_available(true);
    device.set_assistant_regions([Rect::new(0.0, 1800.0, 200.0, 2000.0)]);
    if a11y {
        device.set_system_ui_flags(SystemUiFlags::A11Y_BUTTON_CLICKABLE);
    }
    device
}

fn gesture(moves: u64, x: f64) -> Vec<MotionEvent> {
    let mut events = Vec::with_capacity(moves as usize + 2);
    events.push(MotionEvent::new(MotionAction::Down, x, 1950.0, 0));
    for i in 1..=moves {
        events.push(MotionEvent::new(MotionAction::Move, x, 1950.0 - i as f64, i));
    }
    events.push(MotionEvent::new(MotionAction::Up, x, 1950.0 - moves as f64, moves + 1));
    events
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_routing");
    for &(label, x, a11y) in &[
        ("base_only", 540.0, false),
        ("assistant_a11y_layers", 100.0, true),
    ] {
        let events = gesture(64, x);
        group.throughput(Throughput::Elements(events.len() as u64));
        group.bench_function(label, |b| {
            b.iter_batched(
                || {
                    GestureRouter::new(
                        device(a11y),
                        App,
                        Overview(Rc::new(Launcher)),
                        CountingFactory,
                    )
                },
                |mut router| {
                    for event in &events {
                        router.on_input_event((*event).into());
                    }
                    black_box(router.consumer_name());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_layering(c: &mut Criterion) {
    use understory_gesture::layering::{LayerInputs, plan_layers};
    let inputs = LayerInputs {
        fully_gestural: true,
        assistant_trigger: true,
        accessibility_menu_available: true,
        ..LayerInputs::default()
    };
    c.bench_function("plan_layers", |b| {
        b.iter(|| black_box(plan_layers(black_box(&inputs))));
    });
}

criterion_group!(benches, bench_gestures, bench_layering);
criterion_main!(benches);
