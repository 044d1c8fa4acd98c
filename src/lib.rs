//! # PlotKit
//!
//! A laser/pen plotter CAD core. The workspace is organized as:
//!
//! 1. **plotkit-core** - Error taxonomy, units, the canvas/machine
//!    transform, and the G-code command representation
//! 2. **plotkit-designer** - Canvas shapes, construction geometry
//!    (fillet, chamfer, trim, extend, mirror, rotate), snapshot undo,
//!    and G-code program synthesis
//! 3. **plotkit-communication** - Serial ports, blocking and
//!    acknowledgment-gated streaming, position queries, live carving
//! 4. **plotkit-settings** - Machine profiles and their persistence
//! 5. **plotkit** - Main binary tying the crates together

pub use plotkit_communication as communication;
pub use plotkit_designer as designer;
pub use plotkit_settings as settings;

pub use plotkit_core::{
    CanvasTransform, CommandClass, ControllerFlavor, Error, GcodeCommand, Result, Units,
};

pub use plotkit_designer::{
    build_program, program_text, EditorState, OutputParams, Shape, ShapeStore,
};

pub use plotkit_communication::{
    list_ports, query_position, stream_buffered, SerialDevicePort, StreamConfig,
};

pub use plotkit_settings::{MachineProfile, ProfileStore};

/// Builds G-code output parameters from a machine profile.
///
/// The designer and settings crates do not depend on each other; this
/// is the glue between them.
pub fn output_params_for(profile: &MachineProfile) -> OutputParams {
    OutputParams {
        transform: profile.transform(),
        units: profile.units,
        draw_feed: profile.draw_feed,
        laser_power: profile.laser_power,
        laser_enabled: profile.laser_enabled,
        z_axis_enabled: profile.z_axis_enabled,
        travel_height: profile.travel_height,
        draw_height: profile.draw_height,
    }
}

/// Builds streaming flow-control settings from a machine profile.
pub fn stream_config_for(profile: &MachineProfile) -> StreamConfig {
    StreamConfig {
        max_pending: profile.stream_ceiling,
        ..StreamConfig::default()
    }
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Console output with `RUST_LOG` environment variable support,
/// defaulting to INFO.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
