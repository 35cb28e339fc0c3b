// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interceptor layering around a base consumer.
//!
//! ## Overview
//!
//! Once a base consumer is picked, optional interceptors are stacked on top of it
//! in the fixed priority order of [`LAYER_ORDER`]. Each entry either wraps the
//! chain built so far or replaces it. Later entries end up outermost, so they
//! see events first.
//!
//! [`plan_layers`] is a pure function of [`LayerInputs`]; the router evaluates
//! the predicates once, plans, and then applies the resulting [`LayerStep`]s.

use std::sync::Arc;

use crate::consumer::ConsumerSpec;
use crate::device::OverscrollPlugin;

/// An optional layer applied over the base consumer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InterceptorLayer {
    /// Assistant corner swipe; wraps.
    Assistant,
    /// Quick-capture overscroll; wraps.
    Overscroll,
    /// Screen pinning lock; replaces.
    ScreenPinned,
    /// Accessibility menu; wraps.
    Accessibility,
}

/// Application order, innermost first.
pub const LAYER_ORDER: [InterceptorLayer; 4] = [
    InterceptorLayer::Assistant,
    InterceptorLayer::Overscroll,
    InterceptorLayer::ScreenPinned,
    InterceptorLayer::Accessibility,
];

/// Predicates sampled at the Down that starts a gesture.
#[derive(Clone, Debug, Default)]
pub struct LayerInputs {
    /// Fully gestural navigation.
    pub fully_gestural: bool,
    /// The Down may trigger the assistant gesture.
    pub assistant_trigger: bool,
    /// The assistant gesture uses the constrained trigger.
    pub assistant_constrained: bool,
    /// The plugin to layer, already resolved by [`select_overscroll_plugin`].
    pub overscroll_plugin: Option<Arc<dyn OverscrollPlugin>>,
    /// A task is pinned.
    pub screen_pinning_active: bool,
    /// The accessibility menu is available.
    pub accessibility_menu_available: bool,
}

/// One step of a layering plan.
#[derive(Clone, Debug)]
pub enum LayerStep {
    /// Wrap the chain built so far in a new interceptor node.
    Wrap(ConsumerSpec),
    /// Drop the chain built so far and start over from a new leaf.
    Replace(ConsumerSpec),
    /// Drop the chain built so far in favor of the reset baseline.
    ReplaceWithIdle,
}

/// Pick the overscroll plugin for a new gesture.
///
/// Returns nothing unless quick capture is enabled. A forced local plugin is
/// used as is; otherwise the connected plugin is used while it reports active.
pub fn select_overscroll_plugin(
    quick_capture_enabled: bool,
    force_local: bool,
    local: Option<&Arc<dyn OverscrollPlugin>>,
    connected: Option<&Arc<dyn OverscrollPlugin>>,
) -> Option<Arc<dyn OverscrollPlugin>> {
    if !quick_capture_enabled {
        return None;
    }
    if let (true, Some(local)) = (force_local, local) {
        return Some(Arc::clone(local));
    }
    connected.filter(|p| p.is_active()).cloned()
}

/// Plan the layers for one gesture.
///
/// Without fully gestural navigation only screen pinning applies, and it
/// replaces the chain with the reset baseline.
pub fn plan_layers(inputs: &LayerInputs) -> Vec<LayerStep> {
    if !inputs.fully_gestural {
        return if inputs.screen_pinning_active {
            vec![LayerStep::ReplaceWithIdle]
        } else {
            Vec::new()
        };
    }
    LAYER_ORDER
        .iter()
        .filter_map(|layer| match layer {
            InterceptorLayer::Assistant => inputs.assistant_trigger.then(|| {
                LayerStep::Wrap(ConsumerSpec::Assistant {
                    constrained: inputs.assistant_constrained,
                })
            }),
            InterceptorLayer::Overscroll => inputs
                .overscroll_plugin
                .as_ref()
                .map(|plugin| LayerStep::Wrap(ConsumerSpec::Overscroll {
                    plugin: Arc::clone(plugin),
                })),
            InterceptorLayer::ScreenPinned => inputs
                .screen_pinning_active
                .then_some(LayerStep::Replace(ConsumerSpec::ScreenPinned)),
            InterceptorLayer::Accessibility => inputs
                .accessibility_menu_available
                .then_some(LayerStep::Wrap(ConsumerSpec::Accessibility)),
        })
        .collect()
}
