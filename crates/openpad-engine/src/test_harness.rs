//! In-memory collaborator doubles for engine tests.
//!
//! Available to downstream crates behind the `harness` feature, so hosts
//! can exercise engine behavior without real hardware.

use openpad_device_types::{
    AXIS_COUNT, AxisId, CalibrationFocus, ConfigId, ControllerId, DeviceId, InputEvent,
    MAX_CONTROLLERS,
};

use crate::engine::EngineIo;
use crate::ports::{
    CalibrationSource, ControllerAdapter, EventQueue, MacroSink, MouseOptions, PressDirection,
};

/// A virtual-controller adapter backed by plain arrays.
///
/// All axes share one `max_signed` magnitude and one `axis_scale`; issued
/// rumble commands are recorded in order.
#[derive(Debug, Clone)]
pub struct TestAdapter {
    axes: Vec<[i32; AXIS_COUNT]>,
    pressed: Vec<[[bool; 2]; AXIS_COUNT]>,
    /// Controllers flagged for sending this tick.
    pub pending: Vec<bool>,
    /// Shared maximum signed axis magnitude.
    pub max: i32,
    /// Shared axis scale factor.
    pub scale: f64,
    /// Every rumble command issued, in order.
    pub rumble_commands: Vec<(DeviceId, u16, u16)>,
}

impl TestAdapter {
    /// Create an adapter whose axes all span `-max..max`.
    pub fn new(max: i32) -> Self {
        Self {
            axes: vec![[0; AXIS_COUNT]; MAX_CONTROLLERS],
            pressed: vec![[[false; 2]; AXIS_COUNT]; MAX_CONTROLLERS],
            pending: vec![false; MAX_CONTROLLERS],
            max,
            scale: 1.0,
            rumble_commands: Vec::new(),
        }
    }

    /// Same as [`TestAdapter::new`] with a non-unit axis scale.
    pub fn with_scale(max: i32, scale: f64) -> Self {
        Self { scale, ..Self::new(max) }
    }

    fn direction_index(direction: PressDirection) -> usize {
        match direction {
            PressDirection::Positive => 0,
            PressDirection::Negative => 1,
        }
    }
}

impl ControllerAdapter for TestAdapter {
    fn axis(&self, controller: ControllerId, axis: AxisId) -> i32 {
        self.axes[controller.index()][axis.index()]
    }

    fn set_axis(&mut self, controller: ControllerId, axis: AxisId, value: i32) {
        self.axes[controller.index()][axis.index()] = value;
    }

    fn request_send(&mut self, controller: ControllerId) {
        self.pending[controller.index()] = true;
    }

    fn pressed(&self, controller: ControllerId, axis: AxisId, direction: PressDirection) -> bool {
        self.pressed[controller.index()][axis.index()][Self::direction_index(direction)]
    }

    fn set_pressed(
        &mut self,
        controller: ControllerId,
        axis: AxisId,
        direction: PressDirection,
        pressed: bool,
    ) {
        self.pressed[controller.index()][axis.index()][Self::direction_index(direction)] = pressed;
    }

    fn max_signed(&self, _controller: ControllerId, _axis: AxisId) -> i32 {
        self.max
    }

    fn axis_scale(&self, _controller: ControllerId, _axis: AxisId) -> f64 {
        self.scale
    }

    fn set_rumble(&mut self, device: DeviceId, weak: u16, strong: u16) {
        self.rumble_commands.push((device, weak, strong));
    }
}

/// A calibration source with fixed answers.
#[derive(Debug, Clone, Default)]
pub struct StubCalibration {
    /// Options returned for every (device, configuration) pair.
    pub options: MouseOptions,
    /// Controller returned for every device.
    pub controller: ControllerId,
    /// The device reported as the active calibration mouse.
    pub active_mouse: Option<DeviceId>,
    /// The reported calibration focus.
    pub focus: Option<CalibrationFocus>,
}

impl CalibrationSource for StubCalibration {
    fn mouse_options(&self, _device: DeviceId, _config: ConfigId) -> MouseOptions {
        self.options
    }

    fn mouse_controller(&self, _device: DeviceId) -> ControllerId {
        self.controller
    }

    fn active_mouse(&self) -> Option<DeviceId> {
        self.active_mouse
    }

    fn focus(&self) -> Option<CalibrationFocus> {
        self.focus
    }
}

/// Records every synthesized motion handed to the macro subsystem.
#[derive(Debug, Clone, Default)]
pub struct RecordingMacroSink {
    /// `(device, xrel, yrel)` per delivery, in order.
    pub events: Vec<(DeviceId, f64, f64)>,
}

impl MacroSink for RecordingMacroSink {
    fn motion(&mut self, device: DeviceId, xrel: f64, yrel: f64) {
        self.events.push((device, xrel, yrel));
    }
}

/// Collects postponed events for manual redelivery.
#[derive(Debug, Clone, Default)]
pub struct VecEventQueue {
    /// Postponed events, oldest first.
    pub events: Vec<InputEvent>,
}

impl EventQueue for VecEventQueue {
    fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }
}

/// All four collaborator doubles in one place.
#[derive(Debug, Clone)]
pub struct Harness {
    /// The adapter double.
    pub adapter: TestAdapter,
    /// The calibration double.
    pub calibration: StubCalibration,
    /// The macro recorder.
    pub macros: RecordingMacroSink,
    /// The postponement queue.
    pub queue: VecEventQueue,
}

impl Harness {
    /// Create a harness whose adapter axes span `-max..max`.
    pub fn new(max: i32) -> Self {
        Self {
            adapter: TestAdapter::new(max),
            calibration: StubCalibration::default(),
            macros: RecordingMacroSink::default(),
            queue: VecEventQueue::default(),
        }
    }

    /// Borrow the collaborators as an [`EngineIo`] bundle.
    pub fn io(&mut self) -> EngineIo<'_> {
        EngineIo {
            adapter: &mut self.adapter,
            calibration: &self.calibration,
            macros: &mut self.macros,
            queue: &mut self.queue,
        }
    }
}
