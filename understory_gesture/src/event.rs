// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events delivered to the router.
//!
//! Only [`InputEvent::Motion`] is routed. Anything else that reaches the input
//! monitor is logged and dropped without touching routing state.

use kurbo::Point;

/// Action of a pointer-motion event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MotionAction {
    /// First pointer went down; starts a gesture.
    Down,
    /// Pointer moved.
    Move,
    /// Last pointer went up; ends the gesture.
    Up,
    /// The gesture was canceled by the system; ends the gesture.
    Cancel,
    /// An additional pointer went down.
    PointerDown,
    /// A non-primary pointer went up.
    PointerUp,
}

impl MotionAction {
    /// Returns true for the actions that end a gesture.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }

    /// Upper-case label used in logs and dumps.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Down => "DOWN",
            Self::Move => "MOVE",
            Self::Up => "UP",
            Self::Cancel => "CANCEL",
            Self::PointerDown => "POINTER_DOWN",
            Self::PointerUp => "POINTER_UP",
        }
    }
}

/// A single pointer-motion event in screen coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionEvent {
    /// What happened.
    pub action: MotionAction,
    /// Position of the primary pointer.
    pub position: Point,
    /// Event time in milliseconds on the input clock.
    pub time_ms: u64,
}

impl MotionEvent {
    /// Create an event at `(x, y)`.
    pub fn new(action: MotionAction, x: f64, y: f64, time_ms: u64) -> Self {
        Self {
            action,
            position: Point::new(x, y),
            time_ms,
        }
    }

    /// The same event with its action replaced by [`MotionAction::Cancel`].
    ///
    /// Interceptors hand this to their delegate when they take over a gesture.
    pub fn to_cancel(self) -> Self {
        Self {
            action: MotionAction::Cancel,
            ..self
        }
    }
}

/// A key event observed by the input monitor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    /// Platform key code.
    pub code: u32,
    /// True for key down, false for key up.
    pub pressed: bool,
}

/// Anything the input monitor can deliver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer motion; the only routed kind.
    Motion(MotionEvent),
    /// Key input; never routed.
    Key(KeyEvent),
}

impl From<MotionEvent> for InputEvent {
    fn from(event: MotionEvent) -> Self {
        Self::Motion(event)
    }
}
