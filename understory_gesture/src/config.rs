// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature flags and tunables read by the router.

use crate::log::DEFAULT_CAPACITY;

/// Router configuration.
///
/// Every field has a default, so a config can name only the flags it changes:
///
/// ```
/// use understory_gesture::config::GestureConfig;
///
/// let config = GestureConfig {
///     enable_quick_capture_gesture: true,
///     ..GestureConfig::default()
/// };
/// assert!(!config.force_local_overscroll_plugin);
/// assert_eq!(config.gesture_log_capacity, 40);
/// ```
///
/// With the `serde` feature, fields missing from the input take the same defaults:
///
/// ```
/// # #[cfg(feature = "serde")]
/// # {
/// use understory_gesture::config::GestureConfig;
///
/// let config: GestureConfig =
///     serde_json::from_str(r#"{ "enable_quickstep_live_tile": true }"#).unwrap();
/// assert!(config.enable_quickstep_live_tile);
/// assert_eq!(config.gesture_log_capacity, 40);
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Layer the overscroll plugin over fully gestural chains.
    pub enable_quick_capture_gesture: bool,
    /// Prefer the locally provided overscroll plugin over a connected one.
    pub force_local_overscroll_plugin: bool,
    /// Route to overview while it shows a live tile.
    pub enable_quickstep_live_tile: bool,
    /// A gesture over an excluded assistant focuses the launcher.
    pub assistant_gives_launcher_focus: bool,
    /// Entries retained by the gesture log.
    pub gesture_log_capacity: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enable_quick_capture_gesture: false,
            force_local_overscroll_plugin: false,
            enable_quickstep_live_tile: false,
            assistant_gives_launcher_focus: false,
            gesture_log_capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: GestureConfig =
            serde_json::from_str(r#"{ "enable_quickstep_live_tile": true }"#).unwrap();
        assert_eq!(
            config,
            GestureConfig {
                enable_quickstep_live_tile: true,
                ..GestureConfig::default()
            }
        );
    }

    #[test]
    fn serializes_field_names() {
        let json = serde_json::to_value(GestureConfig::default()).unwrap();
        assert_eq!(json["gesture_log_capacity"], 40);
        assert_eq!(json["enable_quick_capture_gesture"], false);
    }
}
