//! Binding registry: the per-device/controller/configuration mapper tables.
//!
//! One table exists per (source kind, device, controller, configuration)
//! combination. Tables grow by append only while a configuration is loaded
//! and are cleared wholesale at reconfiguration boundaries; during steady
//! state they are read-only.

use openpad_device_types::{
    AxisId, ConfigId, ControllerId, DeviceClass, DeviceId, MAX_CONFIGURATIONS, MAX_CONTROLLERS,
    MAX_DEVICES, MouseAxis, Shape,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::BindingError;

/// Default calibration radius handed out with calibration handles.
const DEFAULT_RADIUS: u16 = 512;

/// Default calibration velocity handed out with calibration handles.
const DEFAULT_VELOCITY: u16 = 1;

/// The physical source a mapper listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// A key or button id.
    Button(u16),
    /// A joystick analog axis id.
    JoystickAxis(u8),
    /// A mouse motion component.
    MouseAxis(MouseAxis),
}

/// Which part of the target axis range a binding drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisProps {
    /// Non-centered target (trigger-style, `0..max`).
    #[default]
    None,
    /// Zero-centered target (`-max..max`).
    Centered,
    /// The positive half of a zero-centered target.
    Positive,
    /// The negative half of a zero-centered target.
    Negative,
}

/// The virtual-controller effect of a mapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Target axis; `None` means a button-only action with no axis write.
    pub axis: Option<AxisId>,
    /// Range properties of the target axis.
    pub props: AxisProps,
}

/// Response parameters of a mapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Curve gain. Zero repurposes an analog source as a digital trigger.
    pub multiplier: f64,
    /// Curve exponent.
    pub exponent: f64,
    /// Dead zone, in configured (unscaled) units.
    pub dead_zone: f64,
    /// Signed threshold for analog-to-digital bindings.
    pub threshold: i32,
    /// Dead-zone shape for two-component targets.
    pub shape: Shape,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            multiplier: 1.0,
            exponent: 1.0,
            dead_zone: 0.0,
            threshold: 0,
            shape: Shape::Rectangle,
        }
    }
}

/// One binding: a physical source mapped to a controller effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mapper {
    /// The source this mapper listens to.
    pub source: Source,
    /// The effect it produces.
    pub target: Target,
    /// Its response parameters.
    pub response: Response,
}

/// The five table families, one per source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Keyboard key bindings.
    KeyboardButton,
    /// Mouse button bindings.
    MouseButton,
    /// Mouse motion bindings.
    MouseAxis,
    /// Joystick button bindings.
    JoystickButton,
    /// Joystick analog axis bindings.
    JoystickAxis,
}

const SOURCE_KINDS: usize = 5;

impl SourceKind {
    fn index(self) -> usize {
        match self {
            Self::KeyboardButton => 0,
            Self::MouseButton => 1,
            Self::MouseAxis => 2,
            Self::JoystickButton => 3,
            Self::JoystickAxis => 4,
        }
    }

    /// Classify a registration by device class and source.
    fn classify(class: DeviceClass, source: Source) -> Option<Self> {
        match (class, source) {
            (DeviceClass::Keyboard, Source::Button(_)) => Some(Self::KeyboardButton),
            (DeviceClass::Mouse, Source::Button(_)) => Some(Self::MouseButton),
            (DeviceClass::Mouse, Source::MouseAxis(_)) => Some(Self::MouseAxis),
            (DeviceClass::Joystick, Source::Button(_)) => Some(Self::JoystickButton),
            (DeviceClass::Joystick, Source::JoystickAxis(_)) => Some(Self::JoystickAxis),
            _ => None,
        }
    }
}

/// Stable reference to a registered mapper, for calibration tuning.
///
/// Replaces back-pointer aliasing into table storage: the calibration
/// subsystem holds handles and mutates response parameters through
/// [`BindingRegistry::response_mut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperHandle {
    /// Table family.
    pub kind: SourceKind,
    /// Source device.
    pub device: DeviceId,
    /// Target controller.
    pub controller: ControllerId,
    /// Configuration slot.
    pub config: ConfigId,
    /// Position within the table.
    pub index: usize,
}

/// Calibration handles for one mouse under one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseCalibrationEntry {
    /// The mouse device.
    pub device: DeviceId,
    /// The controller its bindings drive.
    pub controller: ControllerId,
    /// The configuration slot.
    pub config: ConfigId,
    /// Handle to the X-component mapper, if bound.
    pub x: Option<MapperHandle>,
    /// Handle to the Y-component mapper, if bound.
    pub y: Option<MapperHandle>,
    /// Default test-circle radius.
    pub radius: u16,
    /// Default test velocity.
    pub velocity: u16,
    /// DPI of the controller's configured mouse.
    pub dpi: u32,
}

/// Result of a calibration scan over the mouse-axis tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationScan {
    /// The first device with mouse-axis bindings, used as the default
    /// calibration mouse.
    pub default_mouse: Option<DeviceId>,
    /// One entry per (device, configuration) with mouse-axis bindings.
    pub entries: Vec<MouseCalibrationEntry>,
}

/// Owns every mapper table.
#[derive(Debug, Clone)]
pub struct BindingRegistry {
    tables: Vec<Vec<Mapper>>,
    dpi: [u32; MAX_CONTROLLERS],
}

fn slot(kind: SourceKind, device: DeviceId, controller: ControllerId, config: ConfigId) -> usize {
    ((kind.index() * MAX_DEVICES + device.index()) * MAX_CONTROLLERS + controller.index())
        * MAX_CONFIGURATIONS
        + config.index()
}

impl BindingRegistry {
    /// Create an empty registry with every table allocated and empty.
    pub fn new() -> Self {
        let table_count = SOURCE_KINDS * MAX_DEVICES * MAX_CONTROLLERS * MAX_CONFIGURATIONS;
        Self { tables: vec![Vec::new(); table_count], dpi: [0; MAX_CONTROLLERS] }
    }

    /// Append a mapper to the table selected by the device class, the
    /// mapper's source, and the addressing ids.
    ///
    /// # Errors
    ///
    /// [`BindingError::SourceMismatch`] when the source cannot originate
    /// from the device class; [`BindingError::Allocation`] when growing the
    /// table fails. In both cases the table is left unchanged.
    pub fn register(
        &mut self,
        class: DeviceClass,
        device: DeviceId,
        controller: ControllerId,
        config: ConfigId,
        mapper: Mapper,
    ) -> Result<(), BindingError> {
        let kind = SourceKind::classify(class, mapper.source)
            .ok_or(BindingError::SourceMismatch { class, source: mapper.source })?;
        let table = &mut self.tables[slot(kind, device, controller, config)];
        if let Err(source) = table.try_reserve(1) {
            warn!("cannot allocate mapper storage for {class:?} binding: {source}");
            return Err(BindingError::Allocation(source));
        }
        table.push(mapper);
        Ok(())
    }

    /// The candidate mappers for one table.
    #[inline]
    pub fn table(
        &self,
        kind: SourceKind,
        device: DeviceId,
        controller: ControllerId,
        config: ConfigId,
    ) -> &[Mapper] {
        &self.tables[slot(kind, device, controller, config)]
    }

    /// Look up a mapper through its handle.
    pub fn mapper(&self, handle: MapperHandle) -> Option<&Mapper> {
        self.tables[slot(handle.kind, handle.device, handle.controller, handle.config)]
            .get(handle.index)
    }

    /// Mutable access to a mapper's response parameters, for live
    /// calibration tuning.
    pub fn response_mut(&mut self, handle: MapperHandle) -> Option<&mut Response> {
        self.tables[slot(handle.kind, handle.device, handle.controller, handle.config)]
            .get_mut(handle.index)
            .map(|mapper| &mut mapper.response)
    }

    /// Release every table. Used at reconfiguration boundaries.
    pub fn clear_all(&mut self) {
        for table in &mut self.tables {
            *table = Vec::new();
        }
    }

    /// Whether any binding references the given joystick.
    pub fn is_joystick_used(&self, device: DeviceId) -> bool {
        for controller in ControllerId::all() {
            for config in ConfigId::all() {
                if !self.table(SourceKind::JoystickButton, device, controller, config).is_empty()
                    || !self.table(SourceKind::JoystickAxis, device, controller, config).is_empty()
                {
                    return true;
                }
            }
        }
        false
    }

    /// Set the mouse DPI configured for a controller.
    pub fn set_controller_dpi(&mut self, controller: ControllerId, dpi: u32) {
        self.dpi[controller.index()] = dpi;
    }

    /// The mouse DPI configured for a controller.
    pub fn controller_dpi(&self, controller: ControllerId) -> u32 {
        self.dpi[controller.index()]
    }

    /// Scan the mouse-axis tables and produce calibration handles.
    ///
    /// For each mouse, the first controller with any mouse-axis binding is
    /// taken as its calibration controller; one entry is produced per
    /// configuration with bindings, holding handles to the X and Y
    /// component mappers. The first such device becomes the default
    /// calibration mouse.
    pub fn scan_mouse_calibration(&self) -> CalibrationScan {
        let mut scan = CalibrationScan::default();

        for device_index in 0..MAX_DEVICES {
            let Some(device) = DeviceId::new(device_index) else { continue };
            let Some(controller) = ControllerId::all().find(|&controller| {
                ConfigId::all().any(|config| {
                    !self.table(SourceKind::MouseAxis, device, controller, config).is_empty()
                })
            }) else {
                continue;
            };

            if scan.default_mouse.is_none() {
                scan.default_mouse = Some(device);
            }

            for config in ConfigId::all() {
                let table = self.table(SourceKind::MouseAxis, device, controller, config);
                if table.is_empty() {
                    continue;
                }
                let mut entry = MouseCalibrationEntry {
                    device,
                    controller,
                    config,
                    x: None,
                    y: None,
                    radius: DEFAULT_RADIUS,
                    velocity: DEFAULT_VELOCITY,
                    dpi: self.controller_dpi(controller),
                };
                for (index, mapper) in table.iter().enumerate() {
                    let handle = MapperHandle {
                        kind: SourceKind::MouseAxis,
                        device,
                        controller,
                        config,
                        index,
                    };
                    match mapper.source {
                        Source::MouseAxis(MouseAxis::X) => entry.x = Some(handle),
                        _ => entry.y = Some(handle),
                    }
                }
                scan.entries.push(entry);
            }
        }

        scan
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (DeviceId, ControllerId, ConfigId) {
        (
            DeviceId::new(0).expect("device id"),
            ControllerId::new(0).expect("controller id"),
            ConfigId::new(0).expect("config id"),
        )
    }

    fn button_mapper(button: u16, axis: usize) -> Mapper {
        Mapper {
            source: Source::Button(button),
            target: Target { axis: AxisId::new(axis), props: AxisProps::Positive },
            response: Response::default(),
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let (device, controller, config) = ids();
        let mut registry = BindingRegistry::new();
        registry
            .register(DeviceClass::Keyboard, device, controller, config, button_mapper(10, 0))
            .expect("register");
        registry
            .register(DeviceClass::Keyboard, device, controller, config, button_mapper(11, 1))
            .expect("register");

        let table = registry.table(SourceKind::KeyboardButton, device, controller, config);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].source, Source::Button(10));

        // Other families are untouched.
        assert!(registry.table(SourceKind::MouseButton, device, controller, config).is_empty());
    }

    #[test]
    fn test_register_source_mismatch() {
        let (device, controller, config) = ids();
        let mut registry = BindingRegistry::new();
        let mapper = Mapper {
            source: Source::MouseAxis(MouseAxis::X),
            target: Target { axis: AxisId::new(0), props: AxisProps::Centered },
            response: Response::default(),
        };
        let result = registry.register(DeviceClass::Keyboard, device, controller, config, mapper);
        assert!(matches!(result, Err(BindingError::SourceMismatch { .. })));
        assert!(registry.table(SourceKind::KeyboardButton, device, controller, config).is_empty());
    }

    #[test]
    fn test_clear_all() {
        let (device, controller, config) = ids();
        let mut registry = BindingRegistry::new();
        registry
            .register(DeviceClass::Joystick, device, controller, config, button_mapper(0, 0))
            .expect("register");
        assert!(registry.is_joystick_used(device));

        registry.clear_all();
        assert!(!registry.is_joystick_used(device));
        assert!(registry.table(SourceKind::JoystickButton, device, controller, config).is_empty());
    }

    #[test]
    fn test_response_mut_through_handle() {
        let (device, controller, config) = ids();
        let mut registry = BindingRegistry::new();
        registry
            .register(DeviceClass::Mouse, device, controller, config, Mapper {
                source: Source::MouseAxis(MouseAxis::X),
                target: Target { axis: AxisId::new(0), props: AxisProps::Centered },
                response: Response::default(),
            })
            .expect("register");

        let handle = MapperHandle {
            kind: SourceKind::MouseAxis,
            device,
            controller,
            config,
            index: 0,
        };
        let response = registry.response_mut(handle).expect("handle resolves");
        response.multiplier = 4.0;
        assert_eq!(registry.mapper(handle).expect("mapper").response.multiplier, 4.0);

        let stale = MapperHandle { index: 5, ..handle };
        assert!(registry.response_mut(stale).is_none());
    }

    #[test]
    fn test_calibration_scan() {
        let (device, controller, config) = ids();
        let mut registry = BindingRegistry::new();
        registry.set_controller_dpi(controller, 1800);
        registry
            .register(DeviceClass::Mouse, device, controller, config, Mapper {
                source: Source::MouseAxis(MouseAxis::X),
                target: Target { axis: Some(AxisId::RSTICK_X), props: AxisProps::Centered },
                response: Response::default(),
            })
            .expect("register");
        registry
            .register(DeviceClass::Mouse, device, controller, config, Mapper {
                source: Source::MouseAxis(MouseAxis::Y),
                target: Target { axis: Some(AxisId::RSTICK_Y), props: AxisProps::Centered },
                response: Response::default(),
            })
            .expect("register");

        let scan = registry.scan_mouse_calibration();
        assert_eq!(scan.default_mouse, Some(device));
        assert_eq!(scan.entries.len(), 1);
        let entry = &scan.entries[0];
        assert_eq!(entry.controller, controller);
        assert_eq!(entry.dpi, 1800);
        assert_eq!(entry.radius, 512);
        let x = entry.x.expect("x handle");
        let y = entry.y.expect("y handle");
        assert_eq!(x.index, 0);
        assert_eq!(y.index, 1);
    }

    #[test]
    fn test_calibration_scan_empty() {
        let registry = BindingRegistry::new();
        let scan = registry.scan_mouse_calibration();
        assert_eq!(scan.default_mouse, None);
        assert!(scan.entries.is_empty());
    }
}
