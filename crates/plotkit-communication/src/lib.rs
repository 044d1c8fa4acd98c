//! # PlotKit Communication
//!
//! Device communication: serial port access behind the [`port::DevicePort`]
//! trait, the blocking and acknowledgment-gated streaming protocols,
//! machine position queries, and the live-carve session.

pub mod blocking;
pub mod live_carve;
pub mod port;
pub mod position;
pub mod streaming;
pub mod testutil;

pub use blocking::{BlockingSender, CommandDelays};
pub use live_carve::{CarveParams, CarveState, CarvedStroke, LiveCarve};
pub use port::{list_ports, DevicePort, PortInfo, SerialDevicePort};
pub use position::{parse_position, query_command, query_position, MachinePosition};
pub use streaming::{stream_buffered, StreamConfig, StreamOutcome};
