//! The owning engine context and its tick loop.
//!
//! All pipeline state lives in one [`Engine`] value. The host calls
//! [`Engine::process_event`] for every incoming event and [`Engine::tick`]
//! once per refresh period, always from the same logical thread; the
//! engine never blocks, suspends, or re-enters itself.

use openpad_device_types::{
    AxisId, ConfigId, ControllerId, DeviceClass, DeviceId, MAX_DEVICES,
};
use openpad_filters::MotionFilter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bindings::BindingRegistry;
use crate::intensity::{IntensityParams, IntensityTable};
use crate::ports::{CalibrationSource, ControllerAdapter, EventQueue, MacroSink};
use crate::rumble::RumbleAggregator;
use crate::triggers::{ConfigSwitcher, TriggerEntry};

/// Engine tuning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tick period bound to the hardware poll interval, in microseconds.
    pub refresh_period_us: u32,
    /// Number of ticks a wheel button-up event is redelivered before it is
    /// allowed through.
    pub postpone_count: u8,
    /// Carry sub-unit motion residue between ticks.
    pub subpositions: bool,
    /// Emit a status line when a configuration switch commits.
    pub status: bool,
    /// Scale applied to motion components before the response curve, to
    /// compensate for event rates differing from the tick rate.
    pub frequency_scale: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_period_us: 4000,
            postpone_count: 3,
            subpositions: false,
            status: false,
            frequency_scale: 1.0,
        }
    }
}

impl EngineConfig {
    /// The tick period in milliseconds, never below one.
    pub fn tick_period_ms(&self) -> u32 {
        (self.refresh_period_us / 1000).max(1)
    }
}

/// The collaborator ports handed to every entry point.
///
/// Bundling them keeps call sites honest about what the engine may touch
/// during a call, and pins all of it to the caller's single thread of
/// control.
pub struct EngineIo<'a> {
    /// The virtual-controller adapter.
    pub adapter: &'a mut dyn ControllerAdapter,
    /// The calibration subsystem.
    pub calibration: &'a dyn CalibrationSource,
    /// The macro subsystem.
    pub macros: &'a mut dyn MacroSink,
    /// Re-queue target for postponed events.
    pub queue: &'a mut dyn EventQueue,
}

/// The event-to-control pipeline state.
#[derive(Debug)]
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) bindings: BindingRegistry,
    pub(crate) intensity: IntensityTable,
    pub(crate) switcher: ConfigSwitcher,
    pub(crate) motion: Vec<MotionFilter>,
    pub(crate) rumble: RumbleAggregator,
}

impl Engine {
    /// Create an engine; the adapter provides the axis ranges intensities
    /// initialize to.
    pub fn new(config: EngineConfig, adapter: &dyn ControllerAdapter) -> Self {
        Self {
            config,
            bindings: BindingRegistry::new(),
            intensity: IntensityTable::new(adapter),
            switcher: ConfigSwitcher::new(),
            motion: vec![MotionFilter::new(); MAX_DEVICES],
            rumble: RumbleAggregator::new(),
        }
    }

    /// The engine's tuning parameters.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The binding registry, for the configuration loader and the
    /// calibration subsystem.
    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    /// Mutable binding registry access.
    ///
    /// Registration and calibration tuning must complete before event
    /// dispatch resumes; the exclusive borrow enforces that.
    pub fn bindings_mut(&mut self) -> &mut BindingRegistry {
        &mut self.bindings
    }

    /// Install intensity parameters for one (controller, configuration,
    /// axis) slot.
    pub fn set_axis_intensity(
        &mut self,
        controller: ControllerId,
        config: ConfigId,
        axis: AxisId,
        params: IntensityParams,
    ) {
        self.intensity.set(controller, config, axis, params);
    }

    /// The intensity slot for one axis.
    pub fn axis_intensity(
        &self,
        controller: ControllerId,
        config: ConfigId,
        axis: AxisId,
    ) -> &crate::intensity::Intensity {
        self.intensity.get(controller, config, axis)
    }

    /// Define the trigger that switches a controller to a configuration.
    pub fn set_config_trigger(
        &mut self,
        controller: ControllerId,
        config: ConfigId,
        entry: TriggerEntry,
    ) {
        self.switcher.set_trigger(controller, config, entry);
    }

    /// The active configuration of a controller.
    pub fn current_config(&self, controller: ControllerId) -> ConfigId {
        self.switcher.current(controller)
    }

    /// The pending switch target of a controller, if any.
    pub fn pending_config(&self, controller: ControllerId) -> Option<ConfigId> {
        self.switcher.pending(controller)
    }

    /// Clear all bindings, triggers, and runtime state, as at a
    /// reconfiguration boundary.
    pub fn reset(&mut self, adapter: &dyn ControllerAdapter) {
        self.bindings.clear_all();
        self.intensity.init(adapter);
        self.switcher = ConfigSwitcher::new();
        for filter in &mut self.motion {
            *filter = MotionFilter::new();
        }
        self.rumble = RumbleAggregator::new();
    }

    /// Run one fixed-period tick: motion pipeline, configuration
    /// activation, rumble aggregation.
    pub fn tick(&mut self, io: &mut EngineIo<'_>) {
        self.process_motion(io);
        self.activate_configs(io);
        self.rumble.process(io.adapter);
    }

    fn activate_configs(&mut self, io: &mut EngineIo<'_>) {
        for controller in ControllerId::all() {
            let Some(committed) = self.switcher.advance_controller(controller) else {
                continue;
            };
            for axis in AxisId::all() {
                self.intensity.apply(controller, committed.to, axis, io.adapter);
            }
            if self.config.status {
                info!(
                    "controller {} is switched from configuration {} to {}",
                    controller.index(),
                    committed.from.index(),
                    committed.to.index()
                );
            }
        }
    }

    /// Step every intensity slot whose up/down trigger matches a pressed
    /// button, applying changes to the live axes immediately.
    pub(crate) fn intensity_lookup(
        &mut self,
        class: DeviceClass,
        device: DeviceId,
        button: u16,
        adapter: &mut dyn ControllerAdapter,
    ) {
        for controller in ControllerId::all() {
            let config = self.switcher.current(controller);
            for axis in AxisId::all() {
                if self.intensity.try_adjust(class, device, button, controller, config, axis) {
                    self.intensity.apply(controller, config, axis, adapter);
                    let value = self.intensity.get(controller, config, axis).value;
                    info!(
                        "controller {} configuration {} axis {} intensity: {:.0}",
                        controller.index(),
                        config.index(),
                        axis.name(),
                        value
                    );
                }
            }
        }
    }
}
