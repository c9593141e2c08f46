//! Device types for the OpenPad input-remapping workspace
//!
//! This crate provides the shared vocabulary used by the remapping pipeline:
//! strongly-typed identifiers for devices, virtual controllers, and
//! configurations, the axis taxonomy of the virtual controller, and the
//! tagged input-event type delivered by the host's event abstraction.
//!
//! All state in the pipeline is sized by the static capacity bounds defined
//! here; identifiers are bounds-checked at construction so downstream code
//! can index arena storage without further checks.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod event;

pub use event::InputEvent;

use serde::{Deserialize, Serialize};

/// Maximum number of physical input devices per class (keyboard, mouse,
/// joystick ids each live in `0..MAX_DEVICES`).
pub const MAX_DEVICES: usize = 16;

/// Maximum number of virtual controllers driven simultaneously.
pub const MAX_CONTROLLERS: usize = 7;

/// Maximum number of configurations (binding profiles) per controller.
pub const MAX_CONFIGURATIONS: usize = 8;

/// Total number of virtual controller axes, relative and absolute.
pub const AXIS_COUNT: usize = 32;

/// Axes `0..REL_AXIS_COUNT` are relative (stick-like, zero-centered at
/// rest). The remaining axes are absolute (pressure levels, triggers).
pub const REL_AXIS_COUNT: usize = 8;

/// Number of distinct mouse button ids, wheel directions included.
pub const MOUSE_BUTTON_COUNT: usize = 12;

/// Identifier of a physical input device within its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(u8);

impl DeviceId {
    /// Create a device id, rejecting values outside `0..MAX_DEVICES`.
    pub fn new(index: usize) -> Option<Self> {
        if index < MAX_DEVICES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// The arena index of this device.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Identifier of a virtual controller.
///
/// Defaults to controller 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(u8);

impl ControllerId {
    /// Create a controller id, rejecting values outside `0..MAX_CONTROLLERS`.
    pub fn new(index: usize) -> Option<Self> {
        if index < MAX_CONTROLLERS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// The arena index of this controller.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Iterate over every controller id.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..MAX_CONTROLLERS).map(|i| Self(i as u8))
    }
}

/// Identifier of a binding configuration (profile slot) on a controller.
///
/// Defaults to configuration 0, the slot every controller starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigId(u8);

impl ConfigId {
    /// Create a configuration id, rejecting values outside
    /// `0..MAX_CONFIGURATIONS`.
    pub fn new(index: usize) -> Option<Self> {
        if index < MAX_CONFIGURATIONS {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// The arena index of this configuration.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Iterate over every configuration id.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..MAX_CONFIGURATIONS).map(|i| Self(i as u8))
    }
}

/// Identifier of a virtual controller axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisId(u8);

impl AxisId {
    /// Left stick, horizontal component.
    pub const LSTICK_X: Self = Self(0);
    /// Left stick, vertical component.
    pub const LSTICK_Y: Self = Self(1);
    /// Right stick, horizontal component.
    pub const RSTICK_X: Self = Self(2);
    /// Right stick, vertical component.
    pub const RSTICK_Y: Self = Self(3);

    /// Create an axis id, rejecting values outside `0..AXIS_COUNT`.
    pub fn new(index: usize) -> Option<Self> {
        if index < AXIS_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// The arena index of this axis.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Iterate over every axis id.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..AXIS_COUNT).map(|i| Self(i as u8))
    }

    /// Whether this axis is one of the four stick components.
    #[inline]
    pub fn is_stick(self) -> bool {
        self.0 <= Self::RSTICK_Y.0
    }

    /// Whether this axis is relative (zero-centered at rest).
    #[inline]
    pub fn is_relative(self) -> bool {
        usize::from(self.0) < REL_AXIS_COUNT
    }

    /// For a stick component, the horizontal component of the same stick;
    /// any other axis is returned unchanged.
    #[inline]
    pub fn stick_base(self) -> Self {
        if self.is_stick() { Self(self.0 & !1) } else { self }
    }

    /// For a stick X component, the paired Y component.
    #[inline]
    pub fn stick_partner(self) -> Option<Self> {
        if self.is_stick() && self.0 % 2 == 0 {
            Some(Self(self.0 + 1))
        } else {
            None
        }
    }

    /// Human-readable axis name for diagnostics.
    pub fn name(self) -> &'static str {
        const NAMES: [&str; AXIS_COUNT] = [
            "lstick x", "lstick y", "rstick x", "rstick y", "rel 4", "rel 5", "rel 6", "rel 7",
            "abs 8", "abs 9", "abs 10", "abs 11", "abs 12", "abs 13", "abs 14", "abs 15", "abs 16",
            "abs 17", "abs 18", "abs 19", "abs 20", "abs 21", "abs 22", "abs 23", "abs 24",
            "abs 25", "abs 26", "abs 27", "abs 28", "abs 29", "abs 30", "abs 31",
        ];
        NAMES.get(self.index()).copied().unwrap_or("unknown")
    }
}

/// Class of a physical input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Keyboard (button sources only).
    Keyboard,
    /// Mouse (button and relative-motion sources).
    Mouse,
    /// Joystick or gamepad (button and absolute-axis sources).
    Joystick,
}

/// Dead-zone shape for two-component (stick) targets.
///
/// A rectangular shape applies the configured dead zone to each component
/// independently; a circular shape apportions it by the motion angle so the
/// combined dead zone forms a circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Component-independent dead zone.
    #[default]
    Rectangle,
    /// Angle-apportioned dead zone.
    Circle,
}

/// Mouse-to-axis response policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseMode {
    /// Absolute offset each tick; the axis recenters when motion stops.
    #[default]
    Aiming,
    /// Cumulative position with a dead-zone jump; no auto-centering.
    Driving,
}

/// Spatial component of a mouse motion sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseAxis {
    /// Horizontal motion component.
    X,
    /// Vertical motion component.
    Y,
}

/// Which mouse response parameter the calibration UI is currently tuning.
///
/// While one of the dead-zone targets is selected for the active calibration
/// mouse, the transform engine previews the dead zone directly and the
/// motion pipeline suppresses its decay carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationFocus {
    /// Tuning the X-axis dead zone.
    DeadZoneX,
    /// Tuning the Y-axis dead zone.
    DeadZoneY,
    /// Tuning the dead-zone shape.
    DeadZoneShape,
}

impl CalibrationFocus {
    /// Whether this focus previews the dead zone of the given motion
    /// component.
    #[inline]
    pub fn previews(self, which: MouseAxis) -> bool {
        match (self, which) {
            (Self::DeadZoneX | Self::DeadZoneShape, MouseAxis::X) => true,
            (Self::DeadZoneY | Self::DeadZoneShape, MouseAxis::Y) => true,
            _ => false,
        }
    }
}

/// Mouse button ids as delivered by the host event layer.
pub mod mouse_buttons {
    /// Left button.
    pub const LEFT: u8 = 0;
    /// Right button.
    pub const RIGHT: u8 = 1;
    /// Middle button.
    pub const MIDDLE: u8 = 2;
    /// Wheel rotated away from the user.
    pub const WHEEL_UP: u8 = 3;
    /// Wheel rotated toward the user.
    pub const WHEEL_DOWN: u8 = 4;
    /// Wheel tilted right.
    pub const WHEEL_RIGHT: u8 = 5;
    /// Wheel tilted left.
    pub const WHEEL_LEFT: u8 = 6;
    /// Back side button.
    pub const BACK: u8 = 7;
    /// Forward side button.
    pub const FORWARD: u8 = 8;

    /// Whether the id is one of the four wheel directions.
    #[inline]
    pub fn is_wheel(button: u8) -> bool {
        matches!(button, WHEEL_UP | WHEEL_DOWN | WHEEL_RIGHT | WHEEL_LEFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_bounds_checked() {
        assert!(DeviceId::new(0).is_some());
        assert!(DeviceId::new(MAX_DEVICES).is_none());
        assert!(ControllerId::new(MAX_CONTROLLERS - 1).is_some());
        assert!(ControllerId::new(MAX_CONTROLLERS).is_none());
        assert!(ConfigId::new(MAX_CONFIGURATIONS).is_none());
        assert!(AxisId::new(AXIS_COUNT).is_none());
    }

    #[test]
    fn test_stick_pairing() {
        assert_eq!(AxisId::LSTICK_Y.stick_base(), AxisId::LSTICK_X);
        assert_eq!(AxisId::RSTICK_X.stick_base(), AxisId::RSTICK_X);
        assert_eq!(AxisId::LSTICK_X.stick_partner(), Some(AxisId::LSTICK_Y));
        assert_eq!(AxisId::LSTICK_Y.stick_partner(), None);

        let trigger = AxisId::new(9).expect("axis index in range");
        assert!(!trigger.is_stick());
        assert!(!trigger.is_relative());
        assert_eq!(trigger.stick_base(), trigger);
    }

    #[test]
    fn test_axis_names() {
        assert_eq!(AxisId::LSTICK_X.name(), "lstick x");
        assert_eq!(AxisId::RSTICK_Y.name(), "rstick y");
    }

    #[test]
    fn test_calibration_focus_previews() {
        assert!(CalibrationFocus::DeadZoneX.previews(MouseAxis::X));
        assert!(!CalibrationFocus::DeadZoneX.previews(MouseAxis::Y));
        assert!(CalibrationFocus::DeadZoneShape.previews(MouseAxis::X));
        assert!(CalibrationFocus::DeadZoneShape.previews(MouseAxis::Y));
        assert!(!CalibrationFocus::DeadZoneY.previews(MouseAxis::X));
    }

    #[test]
    fn test_ids_serde_transparent() {
        let id = ControllerId::new(3).expect("controller index in range");
        let json = serde_json::to_string(&id).expect("serialization failed");
        assert_eq!(json, "3");
    }

    #[test]
    fn test_wheel_buttons() {
        assert!(mouse_buttons::is_wheel(mouse_buttons::WHEEL_UP));
        assert!(mouse_buttons::is_wheel(mouse_buttons::WHEEL_LEFT));
        assert!(!mouse_buttons::is_wheel(mouse_buttons::LEFT));
    }
}
