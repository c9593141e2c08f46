//! Port traits for the engine's external collaborators.
//!
//! The engine core owns no hardware and no calibration UI; hosts implement
//! these traits and hand them to every entry point through
//! [`crate::EngineIo`]. Keeping the collaborators behind ports makes the
//! single-thread-of-control contract explicit: the engine only touches them
//! synchronously, from inside the call that received them.

use openpad_device_types::{
    AxisId, CalibrationFocus, ConfigId, ControllerId, DeviceId, InputEvent, MouseMode,
};

/// Direction slot of the per-axis pressed flags.
///
/// Two opposite buttons may drive the same zero-centered axis; the adapter
/// tracks one flag per direction so releasing one button can restore the
/// other's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressDirection {
    /// The positive half of the axis.
    Positive,
    /// The negative half of the axis.
    Negative,
}

/// Virtual-controller adapter abstraction.
///
/// One implementation drives all controllers; per-controller state is
/// addressed by [`ControllerId`]. Axis values are integers in the device's
/// native range; `max_signed` and `axis_scale` describe that range per
/// axis.
pub trait ControllerAdapter {
    /// Current value of an axis.
    fn axis(&self, controller: ControllerId, axis: AxisId) -> i32;

    /// Overwrite the value of an axis.
    fn set_axis(&mut self, controller: ControllerId, axis: AxisId, value: i32);

    /// Flag the controller so its state is sent to hardware this tick.
    fn request_send(&mut self, controller: ControllerId);

    /// Read one of the two per-axis pressed flags.
    fn pressed(&self, controller: ControllerId, axis: AxisId, direction: PressDirection) -> bool;

    /// Write one of the two per-axis pressed flags.
    fn set_pressed(
        &mut self,
        controller: ControllerId,
        axis: AxisId,
        direction: PressDirection,
        pressed: bool,
    );

    /// Maximum signed magnitude of an axis for this controller's device
    /// type.
    fn max_signed(&self, controller: ControllerId, axis: AxisId) -> i32;

    /// Scale factor applied to configured multipliers and dead zones for
    /// this controller's device type.
    fn axis_scale(&self, controller: ControllerId, axis: AxisId) -> f64;

    /// Issue a rumble command to a physical device.
    fn set_rumble(&mut self, device: DeviceId, weak: u16, strong: u16);
}

/// Live mouse filter options, owned by the calibration subsystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseOptions {
    /// Number of history slots the smoother considers.
    pub buffer_size: usize,
    /// Per-step weight decay of the smoother.
    pub filter: f64,
    /// Mouse-to-axis response policy.
    pub mode: MouseMode,
}

impl Default for MouseOptions {
    fn default() -> Self {
        Self { buffer_size: 1, filter: 0.0, mode: MouseMode::Aiming }
    }
}

/// Calibration subsystem abstraction.
pub trait CalibrationSource {
    /// Filter options for a mouse under a given configuration.
    fn mouse_options(&self, device: DeviceId, config: ConfigId) -> MouseOptions;

    /// The controller a mouse is associated with.
    fn mouse_controller(&self, device: DeviceId) -> ControllerId;

    /// The mouse currently selected for calibration, if any.
    fn active_mouse(&self) -> Option<DeviceId>;

    /// The dead-zone parameter currently being tuned, if any.
    fn focus(&self) -> Option<CalibrationFocus>;
}

/// Macro subsystem hook.
///
/// Receives one synthesized motion event per device per tick, after the
/// smoothed values are computed.
pub trait MacroSink {
    /// Deliver the smoothed motion for a device.
    fn motion(&mut self, device: DeviceId, xrel: f64, yrel: f64);
}

/// Re-queue target for postponed raw events.
///
/// The host must redeliver pushed events through
/// [`crate::Engine::process_event`] on a later iteration, preserving the
/// relative order of non-postponed events from the same device.
pub trait EventQueue {
    /// Queue an event for redelivery.
    fn push(&mut self, event: InputEvent);
}
