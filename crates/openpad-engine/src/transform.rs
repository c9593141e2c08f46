//! Axis transforms: bound events become adapter axis writes.
//!
//! Three families of transforms live here:
//!
//! - digital buttons driving an axis at the current intensity, with a
//!   two-slot pressed flag per axis so opposite-direction buttons compose
//!   correctly across releases;
//! - joystick analog axes through a power response curve (or a threshold
//!   comparison when the multiplier is zero, repurposing the axis as a
//!   digital trigger);
//! - smoothed mouse motion through the aiming/driving response policies,
//!   with sub-unit residue handed back to the caller.
//!
//! Axis values mirror the adapter's integer storage: intermediate results
//! truncate toward zero exactly where the adapter write would.

use openpad_curves as curves;
use openpad_device_types::{
    AxisId, ConfigId, ControllerId, DeviceId, MouseAxis, MouseMode,
};

use crate::bindings::{AxisProps, Mapper};
use crate::intensity::IntensityTable;
use crate::ports::{CalibrationSource, ControllerAdapter, PressDirection};

/// Drive an axis from a button press at the current intensity.
pub(crate) fn apply_button_press(
    mapper: &Mapper,
    axis: AxisId,
    controller: ControllerId,
    config: ConfigId,
    intensity: &IntensityTable,
    adapter: &mut dyn ControllerAdapter,
) {
    let value = intensity.get(controller, config, axis).value as i32;
    let written = match mapper.target.props {
        AxisProps::Negative => -value,
        _ => value,
    };
    adapter.set_axis(controller, axis, written);
    intensity.apply(controller, config, axis, adapter);

    if axis.is_relative() {
        match mapper.target.props {
            AxisProps::Positive => adapter.set_pressed(controller, axis, PressDirection::Positive, true),
            AxisProps::Negative => adapter.set_pressed(controller, axis, PressDirection::Negative, true),
            _ => {}
        }
    }
}

/// Release a button-driven axis.
///
/// The axis is zeroed only when the opposite direction is not held;
/// otherwise the opposite direction's effect is restored, so two opposite
/// buttons bound to one axis compose across overlapping presses.
pub(crate) fn apply_button_release(
    mapper: &Mapper,
    axis: AxisId,
    controller: ControllerId,
    config: ConfigId,
    intensity: &IntensityTable,
    adapter: &mut dyn ControllerAdapter,
) {
    let value = intensity.get(controller, config, axis).value as i32;
    adapter.set_axis(controller, axis, 0);
    if mapper.target.props != AxisProps::None {
        intensity.apply(controller, config, axis, adapter);
    }

    if axis.is_relative() {
        let (direction, opposite) = if mapper.target.props == AxisProps::Positive {
            (PressDirection::Positive, PressDirection::Negative)
        } else {
            (PressDirection::Negative, PressDirection::Positive)
        };
        adapter.set_pressed(controller, axis, direction, false);
        if adapter.pressed(controller, axis, opposite) {
            let restored = if mapper.target.props == AxisProps::Negative { value } else { -value };
            adapter.set_axis(controller, axis, restored);
        }
    }
}

/// Drive an axis from a joystick analog axis value.
pub(crate) fn apply_joystick_axis(
    mapper: &Mapper,
    axis: AxisId,
    raw_value: i32,
    controller: ControllerId,
    adapter: &mut dyn ControllerAdapter,
) {
    let scale = adapter.axis_scale(controller, axis);
    let multiplier = mapper.response.multiplier * scale;
    let max_axis = adapter.max_signed(controller, axis);
    let min_axis = if mapper.target.props == AxisProps::Centered { -max_axis } else { 0 };

    if multiplier != 0.0 {
        let dead_zone = mapper.response.dead_zone * scale;
        let mut value = raw_value;
        if value != 0 {
            value = curves::power_response(f64::from(value), multiplier, mapper.response.exponent)
                as i32;
        }
        value = curves::signed_offset(f64::from(value), dead_zone) as i32;
        adapter.set_axis(controller, axis, value.clamp(min_axis, max_axis));
    } else {
        // Axis to button: the raw value against a signed threshold.
        let hit = curves::threshold_crossed(f64::from(raw_value), mapper.response.threshold);
        adapter.set_axis(controller, axis, if hit { max_axis } else { min_axis });
    }
}

/// Drive an axis from one smoothed mouse motion component, returning the
/// motion residue to replay next tick.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_mouse_axis(
    mapper: &Mapper,
    axis: AxisId,
    which: MouseAxis,
    device: DeviceId,
    x: f64,
    y: f64,
    frequency_scale: f64,
    mode: MouseMode,
    controller: ControllerId,
    adapter: &mut dyn ControllerAdapter,
    calibration: &dyn CalibrationSource,
) -> f64 {
    let max_axis = adapter.max_signed(controller, axis);
    let min_axis = if mapper.target.props == AxisProps::Centered { -max_axis } else { 0 };
    let scale = adapter.axis_scale(controller, axis);
    let multiplier = mapper.response.multiplier * scale;
    let exponent = mapper.response.exponent;
    let mut dz = curves::apportion(
        mapper.response.dead_zone * scale,
        x,
        y,
        which,
        mapper.response.shape,
    );

    let component = match which {
        MouseAxis::X => x,
        MouseAxis::Y => y,
    };
    let val = component * frequency_scale;

    // Dead-zone preview while this device's dead zone is being calibrated:
    // write the dead zone itself, bypassing the response curve.
    if calibration.active_mouse() == Some(device)
        && calibration.focus().is_some_and(|focus| focus.previews(which))
    {
        let preview = if val > 0.0 { dz as i32 } else { -(dz as i32) };
        adapter.set_axis(controller, axis, preview);
        return 0.0;
    }

    let mut z = 0.0;
    if val != 0.0 {
        z = curves::power_response(val, multiplier, exponent);
        // Subtract the first curve position from the dead zone, so high
        // multipliers do not inflate the offset.
        dz -= multiplier;
    }

    let mut ztrunk = 0.0;
    match mode {
        MouseMode::Aiming => {
            if z > 0.0 {
                let written = (dz + z) as i32;
                adapter.set_axis(controller, axis, written);
                // Saturated writes leave no residue.
                if written < max_axis {
                    ztrunk = f64::from(written) - dz;
                }
            } else if z < 0.0 {
                let written = (z - dz) as i32;
                adapter.set_axis(controller, axis, written);
                if written > min_axis {
                    ztrunk = f64::from(written) + dz;
                }
            } else {
                adapter.set_axis(controller, axis, 0);
            }
        }
        MouseMode::Driving => {
            let mut state = (f64::from(adapter.axis(controller, axis)) + z) as i32;
            if state > 0 && f64::from(state) < dz {
                state = (f64::from(state) - 2.0 * dz) as i32;
            }
            if state < 0 && f64::from(state) > -dz {
                state = (f64::from(state) + 2.0 * dz) as i32;
            }
            adapter.set_axis(controller, axis, state.clamp(min_axis, max_axis));
        }
    }

    if val != 0.0 && ztrunk != 0.0 {
        curves::motion_residue(val, ztrunk, multiplier, exponent)
    } else {
        0.0
    }
}

/// Drive an axis from one mouse motion component used as a digital
/// trigger (zero-multiplier mouse binding).
pub(crate) fn apply_mouse_axis_button(
    mapper: &Mapper,
    axis: AxisId,
    component: f64,
    controller: ControllerId,
    adapter: &mut dyn ControllerAdapter,
) {
    let max_axis = adapter.max_signed(controller, axis);
    let hit = curves::threshold_crossed(component, mapper.response.threshold);
    adapter.set_axis(controller, axis, if hit { max_axis } else { 0 });
}
