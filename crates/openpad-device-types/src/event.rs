//! Tagged input events delivered by the host's event abstraction layer.
//!
//! Every event carries the id of the device that produced it. Event kinds
//! with no meaning to a given subsystem are simply skipped by that
//! subsystem; an unknown kind is unrepresentable.

use serde::{Deserialize, Serialize};

use crate::{DeviceClass, DeviceId};

/// A normalized raw input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InputEvent {
    /// Keyboard key pressed.
    KeyDown {
        /// Source keyboard.
        device: DeviceId,
        /// Key symbol id.
        key: u16,
    },
    /// Keyboard key released.
    KeyUp {
        /// Source keyboard.
        device: DeviceId,
        /// Key symbol id.
        key: u16,
    },
    /// Mouse button pressed.
    MouseButtonDown {
        /// Source mouse.
        device: DeviceId,
        /// Button id (see [`crate::mouse_buttons`]).
        button: u8,
    },
    /// Mouse button released.
    MouseButtonUp {
        /// Source mouse.
        device: DeviceId,
        /// Button id (see [`crate::mouse_buttons`]).
        button: u8,
    },
    /// Relative mouse motion sample.
    MouseMotion {
        /// Source mouse.
        device: DeviceId,
        /// Horizontal displacement since the previous sample.
        xrel: i32,
        /// Vertical displacement since the previous sample.
        yrel: i32,
    },
    /// Joystick button pressed.
    JoystickButtonDown {
        /// Source joystick.
        device: DeviceId,
        /// Button id.
        button: u16,
    },
    /// Joystick button released.
    JoystickButtonUp {
        /// Source joystick.
        device: DeviceId,
        /// Button id.
        button: u16,
    },
    /// Joystick analog axis motion.
    JoystickAxis {
        /// Source joystick.
        device: DeviceId,
        /// Source axis id.
        axis: u8,
        /// Raw signed axis value.
        value: i32,
    },
    /// Rumble feedback notification for a joystick.
    JoystickRumble {
        /// Target joystick.
        device: DeviceId,
        /// Weak motor magnitude.
        weak: u16,
        /// Strong motor magnitude.
        strong: u16,
    },
}

impl InputEvent {
    /// The device that produced this event.
    #[inline]
    pub fn device_id(&self) -> DeviceId {
        match *self {
            Self::KeyDown { device, .. }
            | Self::KeyUp { device, .. }
            | Self::MouseButtonDown { device, .. }
            | Self::MouseButtonUp { device, .. }
            | Self::MouseMotion { device, .. }
            | Self::JoystickButtonDown { device, .. }
            | Self::JoystickButtonUp { device, .. }
            | Self::JoystickAxis { device, .. }
            | Self::JoystickRumble { device, .. } => device,
        }
    }

    /// For button-press events, the device class and button id.
    #[inline]
    pub fn button_press(&self) -> Option<(DeviceClass, u16)> {
        match *self {
            Self::KeyDown { key, .. } => Some((DeviceClass::Keyboard, key)),
            Self::MouseButtonDown { button, .. } => Some((DeviceClass::Mouse, u16::from(button))),
            Self::JoystickButtonDown { button, .. } => Some((DeviceClass::Joystick, button)),
            _ => None,
        }
    }

    /// For button-release events, the device class and button id.
    #[inline]
    pub fn button_release(&self) -> Option<(DeviceClass, u16)> {
        match *self {
            Self::KeyUp { key, .. } => Some((DeviceClass::Keyboard, key)),
            Self::MouseButtonUp { button, .. } => Some((DeviceClass::Mouse, u16::from(button))),
            Self::JoystickButtonUp { button, .. } => Some((DeviceClass::Joystick, button)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(index: usize) -> DeviceId {
        DeviceId::new(index).expect("device index in range")
    }

    #[test]
    fn test_device_id_accessor() {
        let dev = device(2);
        let events = [
            InputEvent::KeyDown { device: dev, key: 10 },
            InputEvent::MouseMotion { device: dev, xrel: 1, yrel: -1 },
            InputEvent::JoystickRumble { device: dev, weak: 0, strong: 0 },
        ];
        for event in events {
            assert_eq!(event.device_id(), dev);
        }
    }

    #[test]
    fn test_button_press_classification() {
        let dev = device(0);
        let down = InputEvent::MouseButtonDown { device: dev, button: 4 };
        assert_eq!(down.button_press(), Some((DeviceClass::Mouse, 4)));
        assert_eq!(down.button_release(), None);

        let up = InputEvent::JoystickButtonUp { device: dev, button: 9 };
        assert_eq!(up.button_release(), Some((DeviceClass::Joystick, 9)));
        assert_eq!(up.button_press(), None);

        let motion = InputEvent::MouseMotion { device: dev, xrel: 3, yrel: 0 };
        assert_eq!(motion.button_press(), None);
        assert_eq!(motion.button_release(), None);
    }
}
