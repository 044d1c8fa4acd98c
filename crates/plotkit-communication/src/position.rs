//! Machine position queries.
//!
//! GRBL answers `?` with a status report like
//! `<Idle|MPos:10.000,20.000,0.000|FS:0,0>`; Marlin answers `M114`
//! with `X:10.00 Y:20.00 Z:0.00 E:0.00 Count ...`. Both reduce to an
//! XYZ triple in machine coordinates.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::port::DevicePort;
use plotkit_core::{ControllerFlavor, DeviceError, Result};

/// Machine position in machine coordinates (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachinePosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The position-query command for a controller flavor.
pub fn query_command(flavor: ControllerFlavor) -> &'static str {
    match flavor {
        ControllerFlavor::Grbl => "?",
        ControllerFlavor::Marlin => "M114",
    }
}

/// Parses a position out of a single response line, if it holds one.
pub fn parse_position(flavor: ControllerFlavor, response: &str) -> Option<MachinePosition> {
    match flavor {
        ControllerFlavor::Grbl => parse_grbl(response),
        ControllerFlavor::Marlin => parse_marlin(response),
    }
}

/// `<State|MPos:x,y,z|...>` (WPos accepted as a fallback).
fn parse_grbl(response: &str) -> Option<MachinePosition> {
    let fields = response.trim().trim_matches(['<', '>']).split('|');
    for field in fields {
        let Some(coords) = field
            .strip_prefix("MPos:")
            .or_else(|| field.strip_prefix("WPos:"))
        else {
            continue;
        };
        let mut parts = coords.split(',').map(|p| p.trim().parse::<f64>());
        let x = parts.next()?.ok()?;
        let y = parts.next()?.ok()?;
        let z = parts.next()?.ok()?;
        return Some(MachinePosition { x, y, z });
    }
    None
}

/// `X:.. Y:.. Z:..` token triples, first occurrence of each.
fn parse_marlin(response: &str) -> Option<MachinePosition> {
    let mut x = None;
    let mut y = None;
    let mut z = None;
    for token in response.split_whitespace() {
        if let Some(v) = token.strip_prefix("X:") {
            x.get_or_insert(v.parse::<f64>().ok()?);
        } else if let Some(v) = token.strip_prefix("Y:") {
            y.get_or_insert(v.parse::<f64>().ok()?);
        } else if let Some(v) = token.strip_prefix("Z:") {
            z.get_or_insert(v.parse::<f64>().ok()?);
        }
    }
    Some(MachinePosition {
        x: x?,
        y: y?,
        z: z?,
    })
}

/// Sends the flavor's query and waits for a parseable position.
///
/// `"ok"` lines and unrelated chatter are skipped; if the timeout
/// expires the last unparseable response (if any) is reported.
pub fn query_position(
    port: &mut dyn DevicePort,
    flavor: ControllerFlavor,
    timeout: Duration,
) -> Result<MachinePosition> {
    port.write_line(query_command(flavor))?;

    let deadline = Instant::now() + timeout;
    let mut last_response: Option<String> = None;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match port.read_line(remaining)? {
            Some(response) => {
                if let Some(position) = parse_position(flavor, &response) {
                    return Ok(position);
                }
                if response != "ok" {
                    warn!(%response, %flavor, "unparseable position response");
                    last_response = Some(response);
                }
            }
            None => {
                return Err(DeviceError::MalformedResponse {
                    response: last_response.unwrap_or_else(|| "<no response>".to_string()),
                }
                .into());
            }
        }
        if Instant::now() >= deadline {
            return Err(DeviceError::MalformedResponse {
                response: last_response.unwrap_or_else(|| "<no response>".to_string()),
            }
            .into());
        }
    }
}
