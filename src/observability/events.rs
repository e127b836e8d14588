//! Observable events
//!
//! Every log line names one of these. Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    BootStart,
    ConfigLoaded,
    /// No config file found, defaults in use
    ConfigDefaulted,
    StorageOpened,
    /// Storage could not be opened, but its data is intact
    StorageOpenFailed,
    /// Server bound and accepting requests
    Serving,
    ShutdownStart,
    ShutdownComplete,
    /// Startup failed (FATAL)
    BootFailed,

    // Requests
    RequestReceived,
    RequestRejected,

    // Car operations
    CarCreateBegin,
    CarCreated,
    CarLookup,
    CarListed,
    CarUpdateBegin,
    CarUpdated,
    CarDeleted,
    CarNotFound,
    DuplicateVinRejected,
    StorageFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigDefaulted => "CONFIG_DEFAULTED",
            Event::StorageOpened => "STORAGE_OPENED",
            Event::StorageOpenFailed => "STORAGE_OPEN_FAILED",
            Event::Serving => "SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::BootFailed => "BOOT_FAILED",
            Event::RequestReceived => "REQUEST_RECEIVED",
            Event::RequestRejected => "REQUEST_REJECTED",
            Event::CarCreateBegin => "CAR_CREATE_BEGIN",
            Event::CarCreated => "CAR_CREATED",
            Event::CarLookup => "CAR_LOOKUP",
            Event::CarListed => "CAR_LISTED",
            Event::CarUpdateBegin => "CAR_UPDATE_BEGIN",
            Event::CarUpdated => "CAR_UPDATED",
            Event::CarDeleted => "CAR_DELETED",
            Event::CarNotFound => "CAR_NOT_FOUND",
            Event::DuplicateVinRejected => "DUPLICATE_VIN_REJECTED",
            Event::StorageFailed => "STORAGE_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Event::CarLookup | Event::CarListed | Event::RequestReceived => Severity::Trace,
            Event::CarNotFound
            | Event::DuplicateVinRejected
            | Event::RequestRejected
            | Event::ConfigDefaulted => Severity::Warn,
            Event::StorageFailed | Event::StorageOpenFailed => Severity::Error,
            Event::BootFailed => Severity::Fatal,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
