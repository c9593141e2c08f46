//! Top-level event dispatch.
//!
//! Every incoming event is offered to all controllers: the active
//! configuration selects the candidate table for the event's device and
//! kind, and every structurally matching mapper is applied. Trigger and
//! intensity lookups run first, on button events only; rumble and raw
//! motion events feed their accumulators and never reach the tables
//! directly.

use openpad_device_types::{
    ConfigId, ControllerId, DeviceClass, DeviceId, InputEvent, mouse_buttons,
};

use crate::bindings::{Source, SourceKind};
use crate::engine::{Engine, EngineIo};
use crate::transform;

impl Engine {
    /// Process one incoming event.
    pub fn process_event(&mut self, event: &InputEvent, io: &mut EngineIo<'_>) {
        match *event {
            InputEvent::JoystickRumble { device, weak, strong } => {
                self.rumble.accumulate(device, weak, strong);
            }
            InputEvent::MouseMotion { device, xrel, yrel } => {
                self.motion[device.index()].accumulate(f64::from(xrel), f64::from(yrel));
            }
            _ => {
                let device = event.device_id();
                if let Some((class, button)) = event.button_press() {
                    self.switcher.lookup(
                        class,
                        device,
                        button,
                        false,
                        self.config.tick_period_ms(),
                    );
                    self.intensity_lookup(class, device, button, io.adapter);
                } else if let Some((class, button)) = event.button_release() {
                    self.switcher.lookup(class, device, button, true, self.config.tick_period_ms());
                }
                self.dispatch_tables(event, io);
            }
        }
    }

    fn dispatch_tables(&mut self, event: &InputEvent, io: &mut EngineIo<'_>) {
        let device = event.device_id();
        for controller in ControllerId::all() {
            let config = self.switcher.current(controller);
            match *event {
                InputEvent::KeyDown { key, .. } => {
                    self.dispatch_button(
                        SourceKind::KeyboardButton,
                        device,
                        controller,
                        config,
                        key,
                        true,
                        io,
                    );
                }
                InputEvent::KeyUp { key, .. } => {
                    self.dispatch_button(
                        SourceKind::KeyboardButton,
                        device,
                        controller,
                        config,
                        key,
                        false,
                        io,
                    );
                }
                InputEvent::JoystickButtonDown { button, .. } => {
                    self.dispatch_button(
                        SourceKind::JoystickButton,
                        device,
                        controller,
                        config,
                        button,
                        true,
                        io,
                    );
                }
                InputEvent::JoystickButtonUp { button, .. } => {
                    self.dispatch_button(
                        SourceKind::JoystickButton,
                        device,
                        controller,
                        config,
                        button,
                        false,
                        io,
                    );
                }
                InputEvent::MouseButtonDown { button, .. } => {
                    self.dispatch_button(
                        SourceKind::MouseButton,
                        device,
                        controller,
                        config,
                        u16::from(button),
                        true,
                        io,
                    );
                }
                InputEvent::MouseButtonUp { button, .. } => {
                    if self.dispatch_mouse_button_up(device, controller, config, button, event, io)
                    {
                        // The event was re-queued for later redelivery.
                        return;
                    }
                }
                InputEvent::JoystickAxis { axis, value, .. } => {
                    self.dispatch_joystick_axis(device, controller, config, axis, value, io);
                }
                InputEvent::MouseMotion { .. } | InputEvent::JoystickRumble { .. } => {}
            }
        }
    }

    fn dispatch_button(
        &self,
        kind: SourceKind,
        device: DeviceId,
        controller: ControllerId,
        config: ConfigId,
        button: u16,
        pressed: bool,
        io: &mut EngineIo<'_>,
    ) {
        for mapper in self.bindings.table(kind, device, controller, config) {
            if mapper.source != Source::Button(button) {
                continue;
            }
            io.adapter.request_send(controller);
            if let Some(axis) = mapper.target.axis {
                if pressed {
                    transform::apply_button_press(
                        mapper,
                        axis,
                        controller,
                        config,
                        &self.intensity,
                        io.adapter,
                    );
                } else {
                    transform::apply_button_release(
                        mapper,
                        axis,
                        controller,
                        config,
                        &self.intensity,
                        io.adapter,
                    );
                }
            }
        }
    }

    /// Mouse button releases go through the postponement check; returns
    /// true when the event was re-queued and dispatch must stop.
    fn dispatch_mouse_button_up(
        &mut self,
        device: DeviceId,
        controller: ControllerId,
        config: ConfigId,
        button: u8,
        event: &InputEvent,
        io: &mut EngineIo<'_>,
    ) -> bool {
        let len = self.bindings.table(SourceKind::MouseButton, device, controller, config).len();
        for index in 0..len {
            let mapper =
                self.bindings.table(SourceKind::MouseButton, device, controller, config)[index];
            if mapper.source != Source::Button(u16::from(button)) {
                continue;
            }
            if self.postpone_mouse_release(device, button, event, io) {
                return true;
            }
            io.adapter.request_send(controller);
            if let Some(axis) = mapper.target.axis {
                transform::apply_button_release(
                    &mapper,
                    axis,
                    controller,
                    config,
                    &self.intensity,
                    io.adapter,
                );
            }
        }
        false
    }

    /// Postponement check for mouse button releases.
    ///
    /// Wheel releases arrive in the same burst as their press; hardware
    /// polled at the tick rate misses the pair unless the release is
    /// redelivered a few ticks later. A release that matches a pending,
    /// non-switch-back configuration trigger is re-queued unconditionally
    /// so the switch condition is evaluated on redelivery.
    fn postpone_mouse_release(
        &mut self,
        device: DeviceId,
        button: u8,
        event: &InputEvent,
        io: &mut EngineIo<'_>,
    ) -> bool {
        let mut postponed = false;

        if mouse_buttons::is_wheel(button) {
            let filter = &mut self.motion[device.index()];
            if u16::from(filter.postpone_count(button)) + 1 < u16::from(self.config.postpone_count)
            {
                io.queue.push(*event);
                filter.postpone_increment(button);
                postponed = true;
            } else {
                filter.postpone_reset(button);
            }
        }

        for controller in ControllerId::all() {
            let Some(next) = self.switcher.pending(controller) else { continue };
            let Some(trigger) = self.switcher.trigger(controller, next) else { continue };
            if trigger.class == DeviceClass::Mouse
                && trigger.device == device
                && trigger.button == u16::from(button)
                && !trigger.switch_back
            {
                io.queue.push(*event);
                postponed = true;
                break;
            }
        }

        postponed
    }

    fn dispatch_joystick_axis(
        &self,
        device: DeviceId,
        controller: ControllerId,
        config: ConfigId,
        source_axis: u8,
        value: i32,
        io: &mut EngineIo<'_>,
    ) {
        for mapper in self.bindings.table(SourceKind::JoystickAxis, device, controller, config) {
            if mapper.source != Source::JoystickAxis(source_axis) {
                continue;
            }
            io.adapter.request_send(controller);
            if let Some(axis) = mapper.target.axis {
                transform::apply_joystick_axis(mapper, axis, value, controller, io.adapter);
            }
        }
    }
}
