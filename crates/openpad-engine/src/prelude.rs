//! Convenience re-exports for engine hosts.
//!
//! ```
//! use openpad_engine::prelude::*;
//! ```

pub use crate::bindings::{AxisProps, BindingRegistry, Mapper, Response, Source, SourceKind, Target};
pub use crate::engine::{Engine, EngineConfig, EngineIo};
pub use crate::error::BindingError;
pub use crate::intensity::{IntensityParams, IntensityTrigger};
pub use crate::ports::{
    CalibrationSource, ControllerAdapter, EventQueue, MacroSink, MouseOptions, PressDirection,
};
pub use crate::triggers::TriggerEntry;
pub use openpad_device_types::{
    AxisId, CalibrationFocus, ConfigId, ControllerId, DeviceClass, DeviceId, InputEvent, MouseAxis,
    MouseMode, Shape, mouse_buttons,
};
