//! Axis intensity: runtime-adjustable stick sensitivity.
//!
//! Each (controller, configuration, axis) slot holds the magnitude written
//! to the axis when its source is fully actuated. Dedicated up/down
//! buttons step the value at runtime; a change is applied to the live axis
//! value immediately, preserving its sign.

use openpad_device_types::{
    AXIS_COUNT, AxisId, ConfigId, ControllerId, DeviceClass, DeviceId, MAX_CONFIGURATIONS,
    MAX_CONTROLLERS, Shape,
};
use serde::{Deserialize, Serialize};

use crate::ports::ControllerAdapter;

/// A button that steps an intensity slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntensityTrigger {
    /// Device class of the trigger button.
    pub class: DeviceClass,
    /// Device the trigger button lives on.
    pub device: DeviceId,
    /// Button id.
    pub button: u16,
}

impl IntensityTrigger {
    fn matches(&self, class: DeviceClass, device: DeviceId, button: u16) -> bool {
        self.class == class && self.device == device && self.button == button
    }
}

/// Loader-facing intensity parameters for one axis slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityParams {
    /// Button stepping the intensity up, if any.
    pub up: Option<IntensityTrigger>,
    /// Button stepping the intensity down, if any.
    pub down: Option<IntensityTrigger>,
    /// Step size per press.
    pub step: f64,
    /// Lower bound offset; the value never drops below `dead_zone + step`.
    pub dead_zone: f64,
    /// Shape used when applying the value to a stick pair.
    pub shape: Shape,
}

/// One intensity slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intensity {
    /// Up trigger, if configured.
    pub up: Option<IntensityTrigger>,
    /// Down trigger, if configured.
    pub down: Option<IntensityTrigger>,
    /// Current magnitude. Invariant: within `[dead_zone + step, max_value]`.
    pub value: f64,
    /// Step size per press.
    pub step: f64,
    /// Lower bound offset.
    pub dead_zone: f64,
    /// Upper bound, derived from the adapter's axis range.
    pub max_value: i32,
    /// Shape used when applying the value to a stick pair.
    pub shape: Shape,
}

impl Intensity {
    fn disabled(max_value: i32) -> Self {
        Self {
            up: None,
            down: None,
            value: f64::from(max_value),
            step: 0.0,
            dead_zone: 0.0,
            max_value,
            shape: Shape::Rectangle,
        }
    }

    fn floor(&self) -> f64 {
        self.dead_zone + self.step
    }
}

/// All intensity slots, indexed by (controller, configuration, axis).
#[derive(Debug, Clone)]
pub struct IntensityTable {
    slots: Vec<Intensity>,
}

fn slot(controller: ControllerId, config: ConfigId, axis: AxisId) -> usize {
    (controller.index() * MAX_CONFIGURATIONS + config.index()) * AXIS_COUNT + axis.index()
}

impl IntensityTable {
    /// Create a table with every slot disabled and at the adapter's
    /// maximum.
    pub fn new(adapter: &dyn ControllerAdapter) -> Self {
        let mut table = Self {
            slots: vec![Intensity::disabled(0); MAX_CONTROLLERS * MAX_CONFIGURATIONS * AXIS_COUNT],
        };
        table.init(adapter);
        table
    }

    /// Reset every slot: triggers disabled, value snapped to the adapter's
    /// maximum for the axis.
    pub fn init(&mut self, adapter: &dyn ControllerAdapter) {
        for controller in ControllerId::all() {
            for config in ConfigId::all() {
                for axis in AxisId::all() {
                    let max_value = adapter.max_signed(controller, axis);
                    self.slots[slot(controller, config, axis)] = Intensity::disabled(max_value);
                }
            }
        }
    }

    /// Install loader-provided parameters for one slot.
    ///
    /// The value starts at the dead zone, so the first up press lands on
    /// `dead_zone + step`.
    pub fn set(
        &mut self,
        controller: ControllerId,
        config: ConfigId,
        axis: AxisId,
        params: IntensityParams,
    ) {
        let entry = &mut self.slots[slot(controller, config, axis)];
        entry.up = params.up;
        entry.down = params.down;
        entry.step = params.step;
        entry.dead_zone = params.dead_zone;
        entry.shape = params.shape;
        entry.value = params.dead_zone;
    }

    /// The slot for one axis.
    pub fn get(&self, controller: ControllerId, config: ConfigId, axis: AxisId) -> &Intensity {
        &self.slots[slot(controller, config, axis)]
    }

    /// Step the slot if the button matches its up or down trigger.
    ///
    /// Stepping past a bound wraps to the opposite end when the opposite
    /// trigger exists (cyclic adjustment through a single button), and
    /// saturates at the bound otherwise. Returns whether the value changed.
    pub fn try_adjust(
        &mut self,
        class: DeviceClass,
        device: DeviceId,
        button: u16,
        controller: ControllerId,
        config: ConfigId,
        axis: AxisId,
    ) -> bool {
        let entry = &mut self.slots[slot(controller, config, axis)];
        if entry.up.is_some_and(|up| up.matches(class, device, button)) {
            entry.value += entry.step;
            if entry.value > f64::from(entry.max_value) {
                entry.value =
                    if entry.down.is_some() { entry.floor() } else { f64::from(entry.max_value) };
            }
            true
        } else if entry.down.is_some_and(|down| down.matches(class, device, button)) {
            entry.value -= entry.step;
            if entry.value < entry.floor() {
                entry.value =
                    if entry.up.is_some() { f64::from(entry.max_value) } else { entry.floor() };
            }
            true
        } else {
            false
        }
    }

    /// Re-apply a slot's intensity to the live axis value(s).
    ///
    /// Stick components are handled as a pair: the write targets both
    /// components, each keeping the sign it currently holds, and a circular
    /// shape limits the magnitude to `value / sqrt(2)` while both
    /// components are deflected. Slots with no trigger configured are left
    /// alone.
    pub fn apply(
        &self,
        controller: ControllerId,
        config: ConfigId,
        axis: AxisId,
        adapter: &mut dyn ControllerAdapter,
    ) {
        let axis = axis.stick_base();
        let entry = self.get(controller, config, axis);
        if entry.up.is_none() && entry.down.is_none() {
            return;
        }

        let mut value = entry.value;
        if axis.is_stick() && entry.shape == Shape::Circle {
            let partner = axis.stick_partner();
            if adapter.axis(controller, axis) != 0
                && partner.is_some_and(|partner| adapter.axis(controller, partner) != 0)
            {
                value = (value * value / 2.0).sqrt();
            }
        }

        Self::write_signed(controller, axis, value, adapter);
        if let Some(partner) = axis.stick_partner() {
            Self::write_signed(controller, partner, value, adapter);
        }
    }

    fn write_signed(
        controller: ControllerId,
        axis: AxisId,
        value: f64,
        adapter: &mut dyn ControllerAdapter,
    ) {
        let current = adapter.axis(controller, axis);
        if current > 0 {
            adapter.set_axis(controller, axis, value.round() as i32);
            adapter.request_send(controller);
        } else if current < 0 {
            adapter.set_axis(controller, axis, -value.round() as i32);
            adapter.request_send(controller);
        }
    }
}
