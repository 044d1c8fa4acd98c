//! Error handling for PlotKit
//!
//! Provides error types for all layers of the application:
//! - Geometry errors (construction operations that cannot proceed)
//! - Device errors (serial link / streaming protocol)
//! - Config errors (machine profile persistence)
//!
//! All error types use `thiserror`. Geometry and device operations
//! return `Result` rather than panicking; an uncaught failure mid-draw
//! would leave the canvas and the physical machine inconsistent.

use thiserror::Error;

/// Geometry error type
///
/// Every construction operation failure is recoverable: the operation
/// aborts with no shape mutation applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The selected lines are parallel or nearly so
    #[error("Lines are parallel or nearly parallel (angle below {min_angle_rad} rad)")]
    NearParallel {
        /// Minimum corner angle accepted by the operation.
        min_angle_rad: f64,
    },

    /// No intersection point could be found
    #[error("Selected lines do not intersect")]
    NoIntersection,

    /// A radius, chamfer size, or similar dimension was not positive
    #[error("Dimension must be positive, got {value}")]
    NonPositiveDimension {
        /// The offending input value.
        value: f64,
    },

    /// The operation was invoked on the wrong number or kind of shapes
    #[error("Invalid selection: {reason}")]
    InvalidSelection {
        /// Why the selection was rejected.
        reason: String,
    },

    /// Trim-mid requires the crossing line to hit both boundaries
    #[error("Crossing line must intersect both boundary lines at distinct interior points")]
    BoundaryMiss,

    /// Extend found no boundary intersection ahead of the endpoint
    #[error("No boundary intersection found in the extension direction")]
    NoForwardIntersection,

    /// A referenced shape id is not in the store
    #[error("Unknown shape id {id}")]
    UnknownShape {
        /// The missing identifier.
        id: u64,
    },
}

/// Device error type
///
/// Errors on the serial link or in the streaming protocol. The handle
/// is left open but unusable until a fresh connect.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The port could not be opened
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// Port identifier (e.g. "/dev/ttyUSB0", "COM3").
        port: String,
        /// Underlying reason.
        reason: String,
    },

    /// A write to the port failed
    #[error("Write failed on {port}: {reason}")]
    WriteFailed {
        /// Port identifier.
        port: String,
        /// Underlying reason.
        reason: String,
    },

    /// No acknowledgment arrived within the deadline
    #[error("Timed out after {waited_ms}ms waiting for acknowledgment ({outstanding} outstanding)")]
    AckTimeout {
        /// Milliseconds waited.
        waited_ms: u64,
        /// Commands still unacknowledged.
        outstanding: usize,
    },

    /// The controller sent something that could not be interpreted
    #[error("Malformed controller response: {response:?}")]
    MalformedResponse {
        /// The raw response line.
        response: String,
    },

    /// Illegal live-carve state transition
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        /// Current state name.
        from: &'static str,
        /// Requested state name.
        to: &'static str,
    },
}

/// Config error type
///
/// Profile persistence failures. Callers that only display settings
/// fall back to hard-coded defaults and log the problem.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The profile file exists but is not valid JSON
    #[error("Malformed profile {name}: {reason}")]
    Malformed {
        /// Profile name.
        name: String,
        /// Parse failure detail.
        reason: String,
    },

    /// Reading or writing a profile file failed
    #[error("Profile I/O error for {name}: {reason}")]
    Io {
        /// Profile name.
        name: String,
        /// Underlying reason.
        reason: String,
    },

    /// The profile parsed but holds unusable values
    #[error("Invalid profile: {reason}")]
    InvalidProfile {
        /// What validation rejected.
        reason: String,
    },
}

/// Main error type for PlotKit
///
/// A unified error type used in public APIs across all crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Device error
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a device error
    pub fn is_device_error(&self) -> bool {
        matches!(self, Error::Device(_))
    }

    /// Check if this is a config error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
