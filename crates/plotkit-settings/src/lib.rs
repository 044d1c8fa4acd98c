//! # PlotKit Settings
//!
//! Machine profile management: the [`profile::MachineProfile`] device
//! description and its JSON persistence under the platform config
//! directory.

pub mod persistence;
pub mod profile;

pub use persistence::ProfileStore;
pub use profile::MachineProfile;
