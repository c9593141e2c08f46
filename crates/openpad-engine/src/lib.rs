//! OpenPad remapping engine
//!
//! This crate contains the real-time event-to-control pipeline that turns
//! raw input-device events (keyboard, mouse, joystick) into normalized
//! virtual-game-controller state:
//!
//! - [`bindings`]: per-device/controller/configuration mapper tables
//! - [`intensity`]: runtime-adjustable stick sensitivity
//! - [`triggers`]: the configuration-switch state machine
//! - [`motion`]: the per-tick mouse motion pipeline
//! - [`transform`]: response-curve axis transforms
//! - [`rumble`]: rumble feedback aggregation
//! - [`dispatch`]: the top-level per-event entry point
//!
//! The engine is strictly single-threaded and tick-driven: hosts call
//! [`Engine::process_event`] per event and [`Engine::tick`] per refresh
//! period, serialized by the caller. Nothing here blocks, and no event is
//! fatal: malformed or irrelevant input is skipped so one bad event never
//! stalls input processing for the other controllers.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

pub mod bindings;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod intensity;
pub mod motion;
pub mod ports;
pub mod prelude;
pub mod rumble;
#[cfg(any(test, feature = "harness"))]
pub mod test_harness;
pub mod transform;
pub mod triggers;

pub use bindings::{
    AxisProps, BindingRegistry, CalibrationScan, Mapper, MapperHandle, MouseCalibrationEntry,
    Response, Source, SourceKind, Target,
};
pub use engine::{Engine, EngineConfig, EngineIo};
pub use error::BindingError;
pub use intensity::{Intensity, IntensityParams, IntensityTable, IntensityTrigger};
pub use ports::{
    CalibrationSource, ControllerAdapter, EventQueue, MacroSink, MouseOptions, PressDirection,
};
pub use rumble::RumbleAggregator;
pub use triggers::{CommittedSwitch, ConfigSwitcher, TriggerEntry};
