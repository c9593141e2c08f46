//! Error types for the remapping engine.
//!
//! Nothing in the per-event or per-tick path is fatal: a malformed or
//! irrelevant event is skipped, and the only fallible operation is growing
//! a binding table at configuration-load time.

use openpad_device_types::DeviceClass;
use thiserror::Error;

use crate::bindings::Source;

/// Errors raised while registering bindings.
#[derive(Debug, Error)]
pub enum BindingError {
    /// Growing the mapper table failed. The registration is dropped; all
    /// previously registered bindings remain valid.
    #[error("cannot allocate mapper storage")]
    Allocation(#[from] std::collections::TryReserveError),

    /// The binding's source does not exist on the named device class
    /// (e.g. a mouse-axis source on a keyboard).
    #[error("source {source:?} cannot originate from a {class:?} device")]
    SourceMismatch {
        /// Device class the binding was registered for.
        class: DeviceClass,
        /// The offending source.
        source: Source,
    },
}
