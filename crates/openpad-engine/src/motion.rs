//! Per-tick mouse motion processing.
//!
//! Each tick, every mouse's merged samples are smoothed and dispatched as
//! one synthesized motion event, then handed to the macro subsystem. The
//! buffer rolls afterwards whether or not motion was dispatched, so the
//! trailing window decays naturally.

use openpad_device_types::{ControllerId, DeviceId, MAX_DEVICES, MouseAxis, MouseMode};

use crate::bindings::{Source, SourceKind};
use crate::engine::{Engine, EngineIo};
use crate::transform;

impl Engine {
    /// Process one merged motion event for each mouse.
    pub(crate) fn process_motion(&mut self, io: &mut EngineIo<'_>) {
        for index in 0..MAX_DEVICES {
            let Some(device) = DeviceId::new(index) else { continue };
            let controller = io.calibration.mouse_controller(device);
            let config = self.switcher.current(controller);
            let options = io.calibration.mouse_options(device, config);

            if !self.motion[index].change() && options.mode == MouseMode::Driving {
                // No auto-centering in driving mode.
                continue;
            }

            if self.motion[index].active() {
                if self.config.subpositions {
                    self.motion[index].carry_residue();
                }
                self.motion[index].smooth(options.buffer_size, options.filter);
                self.dispatch_motion(device, io);
                let (x, y) = self.motion[index].smoothed();
                io.macros.motion(device, x, y);
            }

            self.motion[index].advance();
            if io.calibration.active_mouse() == Some(device) && io.calibration.focus().is_some() {
                // While a dead zone is being tuned on this device, skip the
                // decay carry so the axis is not auto-centered next tick.
                self.motion[index].suppress_decay();
            }
        }
    }

    /// Offer the smoothed motion of one device to every controller's
    /// mouse-axis table.
    fn dispatch_motion(&mut self, device: DeviceId, io: &mut EngineIo<'_>) {
        let (mx, my) = if self.motion[device.index()].change() {
            self.motion[device.index()].smoothed()
        } else {
            (0.0, 0.0)
        };

        for controller in ControllerId::all() {
            let config = self.switcher.current(controller);
            let mode = io.calibration.mouse_options(device, config).mode;
            let len = self.bindings.table(SourceKind::MouseAxis, device, controller, config).len();
            for index in 0..len {
                let mapper =
                    self.bindings.table(SourceKind::MouseAxis, device, controller, config)[index];
                io.adapter.request_send(controller);
                let Some(axis) = mapper.target.axis else { continue };
                let Source::MouseAxis(which) = mapper.source else { continue };

                if mapper.response.multiplier != 0.0 {
                    let residue = transform::apply_mouse_axis(
                        &mapper,
                        axis,
                        which,
                        device,
                        mx,
                        my,
                        self.config.frequency_scale,
                        mode,
                        controller,
                        io.adapter,
                        io.calibration,
                    );
                    self.motion[device.index()].set_residue(which, residue);
                } else {
                    let component = match which {
                        MouseAxis::X => mx,
                        MouseAxis::Y => my,
                    };
                    transform::apply_mouse_axis_button(
                        &mapper,
                        axis,
                        component,
                        controller,
                        io.adapter,
                    );
                }
            }
        }
    }
}
