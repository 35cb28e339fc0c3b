// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: deterministic routing of system navigation gestures.
//!
//! ## Overview
//!
//! This crate decides, once per gesture, which consumer owns the pointer stream that starts
//! in the navigation area, and tears that ownership down when the gesture ends.
//! It does not recognize gestures or animate anything.
//! Instead, it composes a consumer chain from device, task and overview state, and forwards
//! every event of the gesture to that chain. What each consumer does is supplied by your
//! [`ConsumerFactory`](crate::consumer::ConsumerFactory).
//!
//! ## Inputs
//!
//! The [`GestureRouter`](crate::router::GestureRouter) queries four collaborators:
//! - [`DeviceState`](crate::device::DeviceState): navigation mode, lock state, touch regions.
//!   [`RecentsDeviceState`](crate::device_state::RecentsDeviceState) implements it from system UI flags.
//! - [`TaskResolver`](crate::device::TaskResolver): the foreground task.
//! - [`OverviewComponents`](crate::device::OverviewComponents): the destination activity and home component.
//! - [`ConsumerFactory`](crate::consumer::ConsumerFactory): behavior for each [`ConsumerSpec`](crate::consumer::ConsumerSpec).
//!
//! ## Chains
//!
//! A [`Chain`](crate::consumer::Chain) is a base consumer (over an app, over overview, over the lock
//! screen) wrapped by optional interceptors (assistant, overscroll, accessibility) in a fixed order.
//! Screen pinning replaces the chain outright. Two idle baselines stand in when no consumer applies.
//! Chains are named outer to inner, e.g. `ACCESSIBILITY:ASSISTANT:OTHER_ACTIVITY`.
//!
//! ## Teardown
//!
//! Up and Cancel reset the router to its baseline unless the active consumer is detached from the
//! gesture (for example, it still drives an animation). Consumers may report themselves inactive;
//! reports from a chain that was already replaced are ignored.
//!
//! ## Recents animation
//!
//! At most one consumer owns the recents animation at a time, tracked by
//! [`TaskAnimationManager`](crate::animation::TaskAnimationManager). A gesture that starts while the
//! previous one is still settling continues its animation instead of starting another.
//!
//! ## Threading
//!
//! The router is single-threaded. [`DispatchLoop`](crate::dispatch::DispatchLoop) runs it on its own
//! thread and serializes input, system callbacks and dump requests through one channel.
//! Preference writes and broadcasts run on a separate worker ([`SideEffects`](crate::worker::SideEffects)).
//!
//! ## Consumer sketch
//!
//! ```no_run
//! use understory_gesture::consumer::{
//!     ConsumerContext, ConsumerFactory, ConsumerHandler, ConsumerId, ConsumerSpec, Outcome,
//! };
//! use understory_gesture::event::MotionEvent;
//! use understory_gesture::gesture_state::SharedGestureState;
//!
//! /// Prints every event it sees and lets interceptors pass events inward.
//! struct Printing(&'static str);
//!
//! impl ConsumerHandler for Printing {
//!     fn on_motion_event(&mut self, event: &MotionEvent, _cx: &mut ConsumerContext<'_>) -> Outcome {
//!         println!("{} <- {}", self.0, event.action.label());
//!         Outcome::Continue
//!     }
//! }
//!
//! struct PrintingFactory;
//!
//! impl ConsumerFactory for PrintingFactory {
//!     fn create(
//!         &mut self,
//!         _id: ConsumerId,
//!         spec: &ConsumerSpec,
//!         _gesture: &SharedGestureState,
//!     ) -> Box<dyn ConsumerHandler> {
//!         Box::new(Printing(spec.kind().label()))
//!     }
//! }
//! ```

pub mod animation;
pub mod config;
pub mod consumer;
pub mod device;
pub mod device_state;
pub mod dispatch;
pub mod dump;
pub mod event;
pub mod gesture_state;
pub mod layering;
pub mod lifecycle;
pub mod log;
pub mod router;
pub mod types;
pub mod worker;

#[cfg(test)]
mod test_support;
