// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consumer chains: the composed handlers that own a gesture's event stream.
//!
//! ## Overview
//!
//! A [`Chain`] is either one of the two idle baselines ([`Chain::NoOp`] and
//! [`Chain::ResetGesture`]) or a stack of [`ChainNode`]s. The innermost node is a
//! base consumer chosen from device and task state; every other node is an
//! interceptor wrapping exactly one delegate.
//!
//! The set of consumers is closed: [`ConsumerSpec`] names every variant the
//! router can build. What a consumer actually does with events is supplied by a
//! [`ConsumerFactory`], which turns a spec into a [`ConsumerHandler`].
//!
//! ## Delegation
//!
//! Each handler returns an [`Outcome`]:
//! - [`Outcome::Continue`]: an interceptor passes the event on to its delegate.
//! - [`Outcome::Consume`]: the event stops here.
//! - [`Outcome::Intercept`]: the interceptor takes over the rest of the gesture.
//!   Its delegate receives one synthesized Cancel and nothing after that.
//!
//! The node that currently owns the gesture is the chain's
//! [active node](Chain::active_in_hierarchy). Inactivity callbacks are checked
//! against it so that a callback from an already replaced chain is ignored.

use core::fmt;
use std::sync::Arc;

use crate::animation::TaskAnimationManager;
use crate::device::OverscrollPlugin;
use crate::event::MotionEvent;
use crate::gesture_state::SharedGestureState;

/// Identity of one node in a consumer chain.
///
/// Ids are allocated monotonically by the router and never reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(pub u64);

bitflags::bitflags! {
    /// Consumer kinds; a chain's type is the union of its nodes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ConsumerTypes: u16 {
        /// Idle baseline that ignores everything.
        const NO_OP = 1 << 0;
        /// Idle baseline installed by reset.
        const RESET_GESTURE = 1 << 1;
        /// Gestures over the lock screen.
        const DEVICE_LOCKED = 1 << 2;
        /// Swipe from an app towards overview or home.
        const OTHER_ACTIVITY = 1 << 3;
        /// Gestures while overview has focus.
        const OVERVIEW = 1 << 4;
        /// Gestures while overview is resumed without focus.
        const OVERVIEW_WITHOUT_FOCUS = 1 << 5;
        /// Assistant corner swipe.
        const ASSISTANT = 1 << 6;
        /// Quick-capture overscroll plugin.
        const OVERSCROLL = 1 << 7;
        /// Screen pinning lock.
        const SCREEN_PINNED = 1 << 8;
        /// Accessibility menu swipe.
        const ACCESSIBILITY = 1 << 9;
    }
}

impl ConsumerTypes {
    /// Label of a single kind; empty for unions or the empty set.
    pub fn label(self) -> &'static str {
        match self {
            Self::NO_OP => "NO_OP",
            Self::RESET_GESTURE => "RESET_GESTURE",
            Self::DEVICE_LOCKED => "DEVICE_LOCKED",
            Self::OTHER_ACTIVITY => "OTHER_ACTIVITY",
            Self::OVERVIEW => "OVERVIEW",
            Self::OVERVIEW_WITHOUT_FOCUS => "OVERVIEW_WITHOUT_FOCUS",
            Self::ASSISTANT => "ASSISTANT",
            Self::OVERSCROLL => "OVERSCROLL",
            Self::SCREEN_PINNED => "SCREEN_PINNED",
            Self::ACCESSIBILITY => "ACCESSIBILITY",
            _ => "",
        }
    }
}

/// Which swipe handler an other-activity consumer drives.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SwipeHandlerKind {
    /// Home and overview are the launcher.
    Launcher,
    /// Overview is a separate recents activity.
    Fallback,
}

/// Parameters of an other-activity consumer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OtherActivitySpec {
    /// Swipe handler to create once the gesture is recognized.
    pub swipe_handler: SwipeHandlerKind,
    /// The destination waits for the gesture to resolve before starting.
    pub should_defer: bool,
    /// The gesture started in an exclusion region.
    pub disable_horizontal_swipe: bool,
    /// Continue the previous gesture's still-finishing animation.
    pub continuing_last_gesture: bool,
}

/// Every consumer the router can build.
#[derive(Clone, Debug)]
pub enum ConsumerSpec {
    /// Gestures over the lock screen.
    DeviceLocked,
    /// Swipe from an app.
    OtherActivity(OtherActivitySpec),
    /// Overview has (or is getting) focus.
    Overview {
        /// The gesture started inside the activity's bounds.
        starting_in_activity_bounds: bool,
    },
    /// Overview is resumed but another window has focus.
    OverviewWithoutFocus {
        /// The gesture started in an exclusion region.
        disable_horizontal_swipe: bool,
    },
    /// Assistant corner swipe interceptor.
    Assistant {
        /// Use the constrained trigger.
        constrained: bool,
    },
    /// Quick-capture overscroll interceptor.
    Overscroll {
        /// The plugin instance to drive.
        plugin: Arc<dyn OverscrollPlugin>,
    },
    /// Screen pinning lock; replaces rather than wraps.
    ScreenPinned,
    /// Accessibility menu interceptor.
    Accessibility,
}

impl ConsumerSpec {
    /// Kind of consumer this spec builds.
    pub fn kind(&self) -> ConsumerTypes {
        match self {
            Self::DeviceLocked => ConsumerTypes::DEVICE_LOCKED,
            Self::OtherActivity(_) => ConsumerTypes::OTHER_ACTIVITY,
            Self::Overview { .. } => ConsumerTypes::OVERVIEW,
            Self::OverviewWithoutFocus { .. } => ConsumerTypes::OVERVIEW_WITHOUT_FOCUS,
            Self::Assistant { .. } => ConsumerTypes::ASSISTANT,
            Self::Overscroll { .. } => ConsumerTypes::OVERSCROLL,
            Self::ScreenPinned => ConsumerTypes::SCREEN_PINNED,
            Self::Accessibility => ConsumerTypes::ACCESSIBILITY,
        }
    }

    /// Interceptors wrap a delegate; everything else is a leaf.
    pub fn is_interceptor(&self) -> bool {
        matches!(
            self,
            Self::Assistant { .. } | Self::Overscroll { .. } | Self::Accessibility
        )
    }
}

/// Result of handing one event to a [`ConsumerHandler`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Pass the event to the delegate, if any.
    Continue,
    /// Stop here.
    Consume,
    /// Take over the rest of the gesture; the delegate is canceled.
    Intercept,
}

/// What a handler can reach while processing an event.
#[derive(Debug)]
pub struct ConsumerContext<'a> {
    id: ConsumerId,
    animations: &'a mut TaskAnimationManager,
    deactivations: &'a mut Vec<ConsumerId>,
}

impl<'a> ConsumerContext<'a> {
    pub(crate) fn new(
        id: ConsumerId,
        animations: &'a mut TaskAnimationManager,
        deactivations: &'a mut Vec<ConsumerId>,
    ) -> Self {
        Self {
            id,
            animations,
            deactivations,
        }
    }

    /// Id of the node being called.
    pub fn consumer_id(&self) -> ConsumerId {
        self.id
    }

    /// The recents-animation slot.
    pub fn animations(&mut self) -> &mut TaskAnimationManager {
        self.animations
    }

    /// Report that this consumer is no longer active.
    ///
    /// The router resets once the current dispatch returns, provided this node
    /// is still the active node of the current chain.
    pub fn request_deactivate(&mut self) {
        self.deactivations.push(self.id);
    }
}

/// Behavior of one consumer.
pub trait ConsumerHandler {
    /// Handle one event of the gesture.
    fn on_motion_event(&mut self, event: &MotionEvent, cx: &mut ConsumerContext<'_>) -> Outcome;

    /// The consumer no longer tracks the finger (e.g. an animation it started
    /// outlives the gesture). Checked on terminal events to decide whether the
    /// router may reset right away.
    fn is_detached_from_gesture(&self) -> bool {
        false
    }

    /// A new gesture is about to replace this consumer's chain.
    fn on_about_to_be_switched(&mut self, cx: &mut ConsumerContext<'_>) {
        let _ = cx;
    }
}

/// Supplies the behavior of each consumer the router builds.
pub trait ConsumerFactory {
    /// Create the handler for node `id`, built from `spec` for `gesture`.
    fn create(
        &mut self,
        id: ConsumerId,
        spec: &ConsumerSpec,
        gesture: &SharedGestureState,
    ) -> Box<dyn ConsumerHandler>;
}

/// One node of a consumer chain.
pub struct ChainNode {
    id: ConsumerId,
    kind: ConsumerTypes,
    interceptor: bool,
    intercepting: bool,
    handler: Box<dyn ConsumerHandler>,
    delegate: Chain,
}

impl fmt::Debug for ChainNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainNode")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("interceptor", &self.interceptor)
            .field("intercepting", &self.intercepting)
            .field("delegate", &self.delegate)
            .finish_non_exhaustive()
    }
}

impl ChainNode {
    /// Id of this node.
    pub fn id(&self) -> ConsumerId {
        self.id
    }

    /// Kind of this node.
    pub fn kind(&self) -> ConsumerTypes {
        self.kind
    }

    /// The wrapped chain; [`Chain::NoOp`] for base consumers.
    pub fn delegate(&self) -> &Chain {
        &self.delegate
    }

    /// This interceptor has taken over the gesture.
    pub fn is_intercepting(&self) -> bool {
        self.intercepting
    }

    fn dispatch(
        &mut self,
        event: &MotionEvent,
        animations: &mut TaskAnimationManager,
        deactivations: &mut Vec<ConsumerId>,
    ) {
        let mut cx = ConsumerContext::new(self.id, animations, deactivations);
        let outcome = self.handler.on_motion_event(event, &mut cx);
        if self.intercepting || !self.interceptor {
            return;
        }
        match outcome {
            Outcome::Continue => self.delegate.dispatch(event, animations, deactivations),
            Outcome::Consume => {}
            Outcome::Intercept => {
                self.intercepting = true;
                self.delegate
                    .dispatch(&event.to_cancel(), animations, deactivations);
            }
        }
    }
}

/// A composed consumer chain.
#[derive(Debug, Default)]
pub enum Chain {
    /// Idle baseline: ignores every event.
    #[default]
    NoOp,
    /// Idle baseline installed by reset: on Down it settles any recents
    /// animation a previous gesture left running.
    ResetGesture,
    /// Base consumer, possibly wrapped by interceptors.
    Node(Box<ChainNode>),
}

impl Chain {
    /// A base consumer.
    pub fn leaf(id: ConsumerId, kind: ConsumerTypes, handler: Box<dyn ConsumerHandler>) -> Self {
        Self::Node(Box::new(ChainNode {
            id,
            kind,
            interceptor: false,
            intercepting: false,
            handler,
            delegate: Self::NoOp,
        }))
    }

    /// An interceptor wrapping `delegate`.
    pub fn wrap(
        id: ConsumerId,
        kind: ConsumerTypes,
        handler: Box<dyn ConsumerHandler>,
        delegate: Self,
    ) -> Self {
        Self::Node(Box::new(ChainNode {
            id,
            kind,
            interceptor: true,
            intercepting: false,
            handler,
            delegate,
        }))
    }

    /// The chain ignores events entirely.
    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    /// Outermost node, if any.
    pub fn root(&self) -> Option<&ChainNode> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Union of the kinds of all nodes.
    ///
    /// An interceptor includes its delegate, even when that is a baseline.
    pub fn types(&self) -> ConsumerTypes {
        self.kinds().fold(ConsumerTypes::empty(), |acc, k| acc | k)
    }

    /// Node kinds joined outer to inner with `:`, e.g. `ASSISTANT:OTHER_ACTIVITY`.
    pub fn name(&self) -> String {
        let labels: Vec<&str> = self.kinds().map(ConsumerTypes::label).collect();
        labels.join(":")
    }

    fn kinds(&self) -> impl Iterator<Item = ConsumerTypes> + '_ {
        let mut cur = Some(self);
        core::iter::from_fn(move || {
            let chain = cur.take()?;
            match chain {
                Self::NoOp => Some(ConsumerTypes::NO_OP),
                Self::ResetGesture => Some(ConsumerTypes::RESET_GESTURE),
                Self::Node(node) => {
                    if node.interceptor {
                        cur = Some(&node.delegate);
                    }
                    Some(node.kind)
                }
            }
        })
    }

    /// Ids of all nodes, outer to inner.
    pub fn node_ids(&self) -> Vec<ConsumerId> {
        let mut ids = Vec::new();
        let mut cur = self;
        while let Self::Node(node) = cur {
            ids.push(node.id);
            cur = &node.delegate;
        }
        ids
    }

    /// Innermost node (the base consumer), if any.
    pub fn base(&self) -> Option<&ChainNode> {
        let mut cur = self.root()?;
        while let Self::Node(next) = &cur.delegate {
            cur = next;
        }
        Some(cur)
    }

    /// The node that currently owns the gesture.
    ///
    /// An interceptor owns it once intercepting; otherwise ownership is
    /// delegated inward, ending at the base consumer. Baselines own nothing.
    pub fn active_in_hierarchy(&self) -> Option<ConsumerId> {
        self.active_node().map(|n| n.id)
    }

    /// The active node reports itself detached from the gesture.
    pub fn is_active_detached(&self) -> bool {
        self.active_node()
            .is_some_and(|n| n.handler.is_detached_from_gesture())
    }

    fn active_node(&self) -> Option<&ChainNode> {
        let mut cur = self.root()?;
        loop {
            if cur.intercepting || !cur.interceptor {
                return Some(cur);
            }
            cur = cur.delegate.root()?;
        }
    }

    /// Forward one event into the chain.
    pub fn dispatch(
        &mut self,
        event: &MotionEvent,
        animations: &mut TaskAnimationManager,
        deactivations: &mut Vec<ConsumerId>,
    ) {
        match self {
            Self::NoOp => {}
            Self::ResetGesture => {
                if event.action == crate::event::MotionAction::Down
                    && animations.finish_running_recents_animation(false)
                {
                    tracing::debug!("reset consumer settled a stale recents animation");
                }
            }
            Self::Node(node) => node.dispatch(event, animations, deactivations),
        }
    }

    /// Tell every node that a new chain is about to replace this one.
    pub fn on_about_to_be_switched(
        &mut self,
        animations: &mut TaskAnimationManager,
        deactivations: &mut Vec<ConsumerId>,
    ) {
        let mut cur = self;
        while let Self::Node(node) = cur {
            let mut cx = ConsumerContext::new(node.id, animations, deactivations);
            node.handler.on_about_to_be_switched(&mut cx);
            cur = &mut node.delegate;
        }
    }
}
