// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router implementation.
//!
//! ## Overview
//!
//! Picks one consumer chain per gesture and forwards every event of the gesture
//! to it. Produces a new chain on each Down that lands in the swipe-up region
//! and tears it down on the terminal event.
//!
//! ## Chain Selection
//!
//! - Locked user: the device-locked consumer if a system gesture may start,
//!   otherwise the reset baseline. No interceptors.
//! - Unlocked: a base consumer picked from device, task and previous gesture
//!   state, then the interceptor layers of [`plan_layers`].
//! - A gesture that begins while the previous gesture's animation is still
//!   finishing continues that animation instead of starting a second one.
//!
//! ## Two Slots
//!
//! The router keeps the current chain and an "unchecked" slot that receives
//! the events. They normally alias. A Down outside the swipe-up region leaves
//! the current chain in place and routes the gesture to a detached chain:
//! either an assistant interceptor over the idle baseline, or the idle baseline
//! alone. A quick switch still settling in the current chain is not disturbed.
//!
//! ## Teardown
//!
//! Up and Cancel reset the router unless the active consumer has detached
//! itself from the gesture. A consumer may also ask to be deactivated; that
//! request resets only if it comes from the chain's active node.

use core::fmt;
use core::ops::ControlFlow;
use std::mem;
use std::rc::Rc;
use std::sync::Arc;

use crate::animation::TaskAnimationManager;
use crate::config::GestureConfig;
use crate::consumer::{
    Chain, ConsumerFactory, ConsumerId, ConsumerSpec, OtherActivitySpec, SwipeHandlerKind,
};
use crate::device::{
    ActivityInterface, DeviceState, DeviceStateUpdate, OverscrollPlugin, OverviewComponents,
    TaskResolver,
};
use crate::dispatch::RoutingMessage;
use crate::dump::{AVAILABLE_COMMANDS, DumpCommand};
use crate::event::{InputEvent, MotionAction, MotionEvent};
use crate::gesture_state::{GestureState, SharedGestureState};
use crate::layering::{LayerInputs, LayerStep, plan_layers, select_overscroll_plugin};
use crate::lifecycle::ServiceLifecycle;
use crate::log::{ActiveGestureLog, GestureLogEvent};
use crate::types::RunningTask;
use crate::worker::SideEffects;

/// Where the events of the current gesture go.
#[derive(Debug)]
enum Unchecked {
    /// The current chain.
    Consumer,
    /// A chain that is not installed as current.
    Detached(Chain),
}

/// Gesture router.
///
/// ## Usage
///
/// - Construct with [`GestureRouter::new`] from the four collaborators.
/// - Optionally configure with [`GestureRouter::with_config`],
///   [`GestureRouter::with_side_effects`] and friends.
/// - Call [`GestureRouter::on_input_event`] for every event from the input
///   monitor, in order, on one thread. [`DispatchLoop`](crate::dispatch::DispatchLoop)
///   does this for you.
pub struct GestureRouter<D, T, O, F> {
    device: D,
    tasks: T,
    overview: O,
    factory: F,
    config: GestureConfig,
    lifecycle: ServiceLifecycle,
    animations: TaskAnimationManager,
    log: ActiveGestureLog,
    gesture_state: SharedGestureState,
    consumer: Chain,
    unchecked: Unchecked,
    next_consumer_id: u64,
    pending_inactive: Vec<ConsumerId>,
    connected_plugin: Option<Arc<dyn OverscrollPlugin>>,
    local_plugin: Option<Arc<dyn OverscrollPlugin>>,
    side_effects: Option<SideEffects>,
}

impl<D, T, O, F> fmt::Debug for GestureRouter<D, T, O, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRouter")
            .field("config", &self.config)
            .field("consumer", &self.consumer.name())
            .field("unchecked", &self.unchecked)
            .field("gesture_state", &self.gesture_state.borrow())
            .field("animations", &self.animations)
            .finish_non_exhaustive()
    }
}

impl<D, T, O, F> GestureRouter<D, T, O, F>
where
    D: DeviceState,
    T: TaskResolver,
    O: OverviewComponents,
    F: ConsumerFactory,
{
    /// Create an idle router.
    pub fn new(device: D, tasks: T, overview: O, factory: F) -> Self {
        let config = GestureConfig::default();
        Self {
            device,
            tasks,
            overview,
            factory,
            log: ActiveGestureLog::with_capacity(config.gesture_log_capacity),
            config,
            lifecycle: ServiceLifecycle::new(),
            animations: TaskAnimationManager::new(),
            gesture_state: GestureState::default().into_shared(),
            consumer: Chain::NoOp,
            unchecked: Unchecked::Consumer,
            next_consumer_id: 1,
            pending_inactive: Vec::new(),
            connected_plugin: None,
            local_plugin: None,
            side_effects: None,
        }
    }

    /// Replace the configuration. Resizes (and clears) the gesture log.
    pub fn with_config(mut self, config: GestureConfig) -> Self {
        self.log = ActiveGestureLog::with_capacity(config.gesture_log_capacity);
        self.config = config;
        self
    }

    /// Share lifecycle flags with the host.
    pub fn with_lifecycle(mut self, lifecycle: ServiceLifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Provide the plugin used when a local overscroll plugin is forced.
    pub fn with_local_overscroll_plugin(mut self, plugin: Arc<dyn OverscrollPlugin>) -> Self {
        self.local_plugin = Some(plugin);
        self
    }

    /// Run back-gesture notifications and preference resets on `side_effects`.
    pub fn with_side_effects(mut self, side_effects: SideEffects) -> Self {
        self.side_effects = Some(side_effects);
        self
    }

    /// Device state.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable device state.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Task resolver.
    pub fn tasks(&self) -> &T {
        &self.tasks
    }

    /// Mutable task resolver.
    pub fn tasks_mut(&mut self) -> &mut T {
        &mut self.tasks
    }

    /// Overview components.
    pub fn overview(&self) -> &O {
        &self.overview
    }

    /// Consumer factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Mutable consumer factory.
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Lifecycle flags.
    pub fn lifecycle(&self) -> &ServiceLifecycle {
        &self.lifecycle
    }

    /// The recents-animation slot.
    pub fn animations(&self) -> &TaskAnimationManager {
        &self.animations
    }

    /// Mutable recents-animation slot, for the code driving the animation.
    pub fn animations_mut(&mut self) -> &mut TaskAnimationManager {
        &mut self.animations
    }

    /// The gesture log.
    pub fn log(&self) -> &ActiveGestureLog {
        &self.log
    }

    /// Side effects, if configured.
    pub fn side_effects(&self) -> Option<&SideEffects> {
        self.side_effects.as_ref()
    }

    /// State of the current gesture.
    pub fn gesture_state(&self) -> SharedGestureState {
        Rc::clone(&self.gesture_state)
    }

    /// The current chain.
    pub fn consumer(&self) -> &Chain {
        &self.consumer
    }

    /// Name of the current chain.
    pub fn consumer_name(&self) -> String {
        self.consumer.name()
    }

    /// The chain receiving events: the current chain or a detached one.
    pub fn unchecked_chain(&self) -> &Chain {
        match &self.unchecked {
            Unchecked::Consumer => &self.consumer,
            Unchecked::Detached(chain) => chain,
        }
    }

    /// Events currently go to a chain other than the current one.
    pub fn is_unchecked_detached(&self) -> bool {
        matches!(self.unchecked, Unchecked::Detached(_))
    }

    /// Route one event from the input monitor.
    ///
    /// Only motion events are routed; anything else is logged and dropped.
    pub fn on_input_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Motion(motion) => self.on_motion_event(&motion),
            other => tracing::error!(event = ?other, "unknown input event"),
        }
    }

    fn on_motion_event(&mut self, event: &MotionEvent) {
        if event.action == MotionAction::Down {
            self.on_down(event);
        }

        if !self.unchecked_chain().is_no_op() {
            self.log.add(GestureLogEvent::MotionEvent {
                action: event.action,
            });
        }

        let clean_up = event.action.is_terminal() && !self.consumer.is_active_detached();
        let target = match &mut self.unchecked {
            Unchecked::Consumer => &mut self.consumer,
            Unchecked::Detached(chain) => chain,
        };
        target.dispatch(event, &mut self.animations, &mut self.pending_inactive);
        self.process_pending_inactive();

        if clean_up {
            self.reset();
        }
    }

    fn on_down(&mut self, event: &MotionEvent) {
        if self.device.is_in_swipe_up_region(event) {
            // Snapshot before the switch: deactivation raised while the old
            // chain winds down resets the shared slot.
            let previous = self.gesture_state.borrow().clone();
            let state = self.create_gesture_state(event);

            self.consumer
                .on_about_to_be_switched(&mut self.animations, &mut self.pending_inactive);
            self.process_pending_inactive();

            self.consumer = self.new_consumer(&previous, &state, event);
            if self.consumer.root().is_some() {
                // The reset baseline settles a stale animation itself on Down.
                self.animations.release_orphaned(&self.consumer.node_ids());
            }
            self.unchecked = Unchecked::Consumer;
            self.gesture_state = state;

            let name = self.consumer.name();
            tracing::debug!(log_id = ?self.log.current_log_id(), consumer = %name, "input consumer set");
            self.log.add(GestureLogEvent::SetInputConsumer { name });
        } else if self.device.is_user_unlocked()
            && self.device.is_fully_gestural_nav_mode()
            && self.device.can_trigger_assistant_action(event)
        {
            let state = self.create_gesture_state(event);
            let spec = ConsumerSpec::Assistant {
                constrained: self.overview.assistant_gesture_is_constrained(),
            };
            let assistant = self.wrap(&spec, &state, Chain::NoOp);
            // The current chain may be a quick switch that is still settling.
            self.unchecked = Unchecked::Detached(assistant);
            self.gesture_state = state;
        } else {
            self.unchecked = Unchecked::Detached(Chain::NoOp);
            self.gesture_state = GestureState::default().into_shared();
        }
    }

    fn create_gesture_state(&mut self, event: &MotionEvent) -> SharedGestureState {
        let log_id = self.log.generate_and_set_log_id();
        let mut state = GestureState::new(log_id, self.overview.activity_interface());
        state.update_running_task(self.tasks.running_task(false));
        state.set_down_time_ms(event.time_ms);
        state.into_shared()
    }

    fn next_id(&mut self) -> ConsumerId {
        let id = ConsumerId(self.next_consumer_id);
        self.next_consumer_id += 1;
        id
    }

    fn leaf(&mut self, spec: &ConsumerSpec, state: &SharedGestureState) -> Chain {
        let id = self.next_id();
        let handler = self.factory.create(id, spec, state);
        Chain::leaf(id, spec.kind(), handler)
    }

    fn wrap(&mut self, spec: &ConsumerSpec, state: &SharedGestureState, delegate: Chain) -> Chain {
        let id = self.next_id();
        let handler = self.factory.create(id, spec, state);
        Chain::wrap(id, spec.kind(), handler, delegate)
    }

    fn new_consumer(
        &mut self,
        previous: &GestureState,
        state: &SharedGestureState,
        event: &MotionEvent,
    ) -> Chain {
        let can_start_system_gesture = self.device.can_start_system_gesture();

        if !self.device.is_user_unlocked() {
            tracing::debug!(can_start_system_gesture, "user locked");
            let spec = if can_start_system_gesture {
                self.device_locked_spec(state)
            } else {
                None
            };
            return match spec {
                Some(spec) => self.leaf(&spec, state),
                None => Chain::ResetGesture,
            };
        }

        // A follow-up gesture over a running animation bypasses the system
        // state check; the first gesture started in a valid state.
        let base_spec = if can_start_system_gesture || previous.is_recents_animation_running() {
            self.new_base_spec(previous, state, event)
        } else {
            None
        };
        let continuing = matches!(
            base_spec,
            Some(ConsumerSpec::OtherActivity(OtherActivitySpec {
                continuing_last_gesture: true,
                ..
            }))
        );
        let mut chain = match &base_spec {
            Some(spec) => self.leaf(spec, state),
            None => Chain::ResetGesture,
        };
        let base_id = chain.root().map(|n| n.id());

        let fully_gestural = self.device.is_fully_gestural_nav_mode();
        let inputs = LayerInputs {
            fully_gestural,
            assistant_trigger: self.device.can_trigger_assistant_action(event),
            assistant_constrained: self.overview.assistant_gesture_is_constrained(),
            overscroll_plugin: select_overscroll_plugin(
                fully_gestural && self.config.enable_quick_capture_gesture,
                self.config.force_local_overscroll_plugin,
                self.local_plugin.as_ref(),
                self.connected_plugin.as_ref(),
            ),
            screen_pinning_active: self.device.is_screen_pinning_active(),
            accessibility_menu_available: self.device.is_accessibility_menu_available(),
        };
        for step in plan_layers(&inputs) {
            chain = match step {
                LayerStep::Wrap(spec) => self.wrap(&spec, state, chain),
                LayerStep::Replace(spec) => self.leaf(&spec, state),
                LayerStep::ReplaceWithIdle => Chain::ResetGesture,
            };
        }

        if continuing && let Some(base_id) = base_id {
            if chain.node_ids().contains(&base_id) {
                let log_id = state.borrow().log_id();
                if let Err(error) = self.animations.continue_recents_animation(base_id, log_id) {
                    tracing::debug!(%error, "no animation to continue");
                }
            } else {
                tracing::debug!("continuation consumer replaced by a layer");
            }
        }
        chain
    }

    fn device_locked_spec(&self, state: &SharedGestureState) -> Option<ConsumerSpec> {
        (self.device.is_fully_gestural_nav_mode() && state.borrow().running_task().is_some())
            .then_some(ConsumerSpec::DeviceLocked)
    }

    /// The base consumer for a gesture, or `None` for the reset baseline.
    fn new_base_spec(
        &self,
        previous: &GestureState,
        state: &SharedGestureState,
        event: &MotionEvent,
    ) -> Option<ConsumerSpec> {
        if self.device.is_keyguard_showing_occluded() {
            return self.device_locked_spec(state);
        }

        let mut force_overview = false;
        let over_excluded_assistant = state
            .borrow()
            .running_task()
            .is_some_and(RunningTask::is_excluded_assistant);
        if over_excluded_assistant {
            // Route as if the gesture started over the task behind the assistant.
            let behind = self.tasks.running_task(true);
            let home = self.overview.home_component();
            force_overview = behind
                .as_ref()
                .and_then(|t| t.base_component.as_ref())
                .is_some_and(|c| c.package == home.package);
            state.borrow_mut().update_running_task(behind);
        }

        let activity = state.borrow().activity_interface().cloned()?;

        if previous.has_pending_finish()
            && let Some(task_id) = previous.finishing_recents_animation_task_id()
        {
            // The previous finish was interrupted: keep going towards its task.
            state
                .borrow_mut()
                .update_running_task(Some(RunningTask::with_id(task_id)));
            return Some(self.other_activity_spec(previous, &*activity, event, true));
        }

        if state.borrow().running_task().is_none() {
            return None;
        }

        if previous.is_running_animation_to_launcher()
            || activity.is_resumed()
            || force_overview
            || (self.config.enable_quickstep_live_tile && activity.is_in_live_tile_mode())
        {
            return self.overview_spec(previous, &*activity, event, force_overview);
        }

        if self
            .device
            .is_gesture_blocked_activity(state.borrow().running_task())
        {
            return None;
        }

        Some(self.other_activity_spec(previous, &*activity, event, false))
    }

    fn other_activity_spec(
        &self,
        previous: &GestureState,
        activity: &dyn ActivityInterface,
        event: &MotionEvent,
        continuing_last_gesture: bool,
    ) -> ConsumerSpec {
        let (swipe_handler, should_defer) = if self.overview.is_home_and_overview_same() {
            (
                SwipeHandlerKind::Launcher,
                activity.defer_starting_activity(&self.device, event),
            )
        } else {
            (
                SwipeHandlerKind::Fallback,
                previous.finishing_recents_animation_task_id().is_none(),
            )
        };
        ConsumerSpec::OtherActivity(OtherActivitySpec {
            swipe_handler,
            should_defer,
            disable_horizontal_swipe: self.device.is_in_exclusion_region(event),
            continuing_last_gesture,
        })
    }

    fn overview_spec(
        &self,
        previous: &GestureState,
        activity: &dyn ActivityInterface,
        event: &MotionEvent,
        force_overview: bool,
    ) -> Option<ConsumerSpec> {
        let created = activity.created_activity()?;
        if created.has_window_focus
            || previous.is_running_animation_to_launcher()
            || (self.config.assistant_gives_launcher_focus && force_overview)
        {
            Some(ConsumerSpec::Overview {
                starting_in_activity_bounds: false,
            })
        } else {
            Some(ConsumerSpec::OverviewWithoutFocus {
                disable_horizontal_swipe: self.device.is_in_exclusion_region(event),
            })
        }
    }

    /// Return to the reset baseline and forget the current gesture.
    ///
    /// Idempotent.
    pub fn reset(&mut self) {
        self.consumer = Chain::ResetGesture;
        self.unchecked = Unchecked::Consumer;
        self.gesture_state = GestureState::default().into_shared();
        self.log.add(GestureLogEvent::Reset);
    }

    /// A consumer reported that it is no longer active.
    ///
    /// Resets only if `id` is the active node of the current chain; callbacks
    /// from replaced chains are ignored.
    pub fn on_consumer_inactive(&mut self, id: ConsumerId) {
        if self.consumer.active_in_hierarchy() == Some(id) {
            self.reset();
        } else {
            tracing::debug!(?id, consumer = %self.consumer.name(), "ignoring stale inactivity");
            self.log.add(GestureLogEvent::StaleInactivity);
        }
    }

    fn process_pending_inactive(&mut self) {
        for id in mem::take(&mut self.pending_inactive) {
            self.on_consumer_inactive(id);
        }
    }

    /// Apply a device state callback.
    pub fn on_device_state_update(&mut self, update: DeviceStateUpdate) {
        let assistant_changed = matches!(
            update,
            DeviceStateUpdate::AssistantAvailable(_) | DeviceStateUpdate::AssistantVisibility(_)
        );
        let user_unlocked = matches!(update, DeviceStateUpdate::UserUnlocked);
        let navigation_changed = matches!(update, DeviceStateUpdate::NavigationMode(_));
        self.device.apply(update);

        if assistant_changed {
            self.on_assistant_visibility_changed();
        }
        if user_unlocked {
            self.on_user_unlocked();
        }
        if navigation_changed && let Some(effects) = &self.side_effects {
            effects.reset_home_bounce_seen(
                self.device.is_user_unlocked(),
                self.device.is_button_nav_mode(),
            );
        }
    }

    fn on_user_unlocked(&mut self) {
        if let Some(effects) = &self.side_effects {
            effects.on_user_unlocked(self.device.is_button_nav_mode());
        }
        self.on_assistant_visibility_changed();
    }

    fn on_assistant_visibility_changed(&self) {
        if self.device.is_user_unlocked() {
            self.overview
                .activity_interface()
                .on_assistant_visibility_changed(self.device.assistant_visibility());
        }
    }

    /// The overscroll plugin connected.
    pub fn on_plugin_connected(&mut self, plugin: Arc<dyn OverscrollPlugin>) {
        tracing::debug!(?plugin, "overscroll plugin connected");
        self.connected_plugin = Some(plugin);
    }

    /// The overscroll plugin disconnected.
    pub fn on_plugin_disconnected(&mut self) {
        tracing::debug!("overscroll plugin disconnected");
        self.connected_plugin = None;
    }

    /// System UI reported a back action.
    pub fn on_back_action(&mut self, completed: bool, is_button: bool) {
        self.log.add(GestureLogEvent::BackAction {
            completed,
            is_button,
        });
        if let Some(effects) = &self.side_effects {
            effects.on_back_action(completed, is_button, self.device.gesture_blocked_packages());
        }
    }

    /// The system initialized the service.
    pub fn on_initialize(&mut self) {
        self.lifecycle.on_initialize();
        self.preload_overview(true);
    }

    /// The host configuration changed.
    ///
    /// An overview activity that exists in the background and cannot absorb
    /// the change is preloaded again.
    pub fn on_configuration_changed(&mut self, handled_by_activity: bool) {
        if !self.device.is_user_unlocked() {
            return;
        }
        let Some(created) = self.overview.activity_interface().created_activity() else {
            return;
        };
        if created.is_started || handled_by_activity {
            return;
        }
        self.preload_overview(false);
    }

    /// Warm up overview ahead of the first gesture.
    ///
    /// Returns true if a preload was issued.
    pub fn preload_overview(&mut self, from_init: bool) -> bool {
        if !self.device.is_user_unlocked() {
            return false;
        }
        if self.device.is_button_nav_mode() && !self.overview.is_home_and_overview_same() {
            // Overview must not start before the real home on first boot.
            return false;
        }
        let created = self.overview.activity_interface().created_activity();
        if created.is_some() && from_init {
            return false;
        }
        self.animations
            .preload_recents_animation(self.overview.overview_component())
    }

    /// Handle one message from the dispatch channel.
    pub fn handle_message(&mut self, message: RoutingMessage) -> ControlFlow<()> {
        match message {
            RoutingMessage::Input(event) => self.on_input_event(event),
            RoutingMessage::ConsumerInactive(id) => self.on_consumer_inactive(id),
            RoutingMessage::DeviceState(update) => self.on_device_state_update(update),
            RoutingMessage::PluginConnected(plugin) => self.on_plugin_connected(plugin),
            RoutingMessage::PluginDisconnected => self.on_plugin_disconnected(),
            RoutingMessage::BackAction {
                completed,
                is_button,
            } => self.on_back_action(completed, is_button),
            RoutingMessage::Initialize => self.on_initialize(),
            RoutingMessage::ConfigurationChanged {
                handled_by_activity,
            } => self.on_configuration_changed(handled_by_activity),
            RoutingMessage::Dump { args, reply } => {
                let mut out = String::new();
                if let Err(error) = self.run_dump(args.as_slice(), &mut out) {
                    tracing::warn!(%error, "dump failed");
                }
                // The requester may have given up waiting.
                let _ = reply.send(out);
            }
            RoutingMessage::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Run a dump request: a full dump without arguments, or a `cmd`.
    pub fn run_dump<S: AsRef<str>>(&mut self, args: &[S], out: &mut dyn fmt::Write) -> fmt::Result {
        match DumpCommand::parse(args) {
            DumpCommand::Full => self.dump(out),
            DumpCommand::ClearTouchLog => {
                self.log.clear();
                Ok(())
            }
            DumpCommand::ListCommands | DumpCommand::Unknown(_) => {
                writeln!(out, "Available commands:")?;
                for (name, help) in AVAILABLE_COMMANDS {
                    writeln!(out, "  {name}: {help}")?;
                }
                Ok(())
            }
        }
    }

    /// Write the full diagnostic dump.
    pub fn dump(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "GestureConfig: {:?}", self.config)?;
        writeln!(
            out,
            "Lifecycle: connected={} initialized={}",
            self.lifecycle.is_connected(),
            self.lifecycle.is_initialized()
        )?;
        writeln!(out, "DeviceState:")?;
        writeln!(out, "  userUnlocked={}", self.device.is_user_unlocked())?;
        writeln!(out, "  fullyGestural={}", self.device.is_fully_gestural_nav_mode())?;
        writeln!(
            out,
            "  canStartSystemGesture={}",
            self.device.can_start_system_gesture()
        )?;
        writeln!(out, "  overscrollPlugin={}", self.connected_plugin.is_some())?;
        self.gesture_state.borrow().dump(out)?;
        let activity = self.overview.activity_interface();
        writeln!(out, "TouchState:")?;
        match activity.created_activity() {
            Some(created) => writeln!(out, "  createdOverviewActivity={}", created.component)?,
            None => writeln!(out, "  createdOverviewActivity=none")?,
        }
        writeln!(out, "  resumed={}", activity.is_resumed())?;
        writeln!(out, "  consumer={}", self.consumer.name())?;
        writeln!(out, "  animation={:?}", self.animations.claim())?;
        self.log.dump("", out)
    }
}
