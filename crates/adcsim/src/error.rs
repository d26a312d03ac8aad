//! Error type shared by device and registry operations.
use std::fmt;

/// Error type returned by the fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The operation addressed a device that is not registered, or whose
    /// handle was already removed from the registry.
    NoDevice,

    /// A channel index, register index, or destination capacity was outside
    /// the valid range.
    ///
    /// - `index` is the index (or required capacity) that was requested.
    /// - `limit` is the bound that applies (first out-of-range value).
    OutOfRange { index: usize, limit: usize },

    /// The attribute id was not recognized by the device's dispatch.
    UnknownAttribute { id: u32 },

    /// The device state could not be created from the supplied
    /// initialization parameters. The contained `String` names what was
    /// wrong (for example an external buffer too short for all channels).
    AllocationFailure(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NoDevice => write!(f, "no such device"),
            DeviceError::OutOfRange { index, limit } => {
                write!(f, "index {} out of range (limit {})", index, limit)
            }
            DeviceError::UnknownAttribute { id } => {
                write!(f, "unknown attribute id {}", id)
            }
            DeviceError::AllocationFailure(reason) => {
                write!(f, "device allocation failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for DeviceError {}
