//! Acknowledgment-gated buffered streaming.
//!
//! GRBL-style character-counting protocols are approximated here at
//! line granularity: at most `max_pending` commands are in flight
//! before an `"ok"` must come back. Only `"ok"` is credit; every other
//! response (errors, alarms, status chatter) is collected and logged
//! but never decrements the pending count, so a controller reporting
//! errors throttles the stream instead of being flooded.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::port::DevicePort;
use plotkit_core::{DeviceError, GcodeCommand, Result};

/// Flow-control configuration for buffered streaming.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Maximum commands in flight before sending blocks on an ack.
    pub max_pending: usize,
    /// Poll interval for responses while gated.
    pub read_timeout: Duration,
    /// Maximum total wait for one acknowledgment before aborting.
    pub ack_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_pending: 8,
            read_timeout: Duration::from_millis(20),
            ack_timeout: Duration::from_secs(10),
        }
    }
}

/// What happened during one streaming run.
#[derive(Debug, Clone, Default)]
pub struct StreamOutcome {
    /// Commands written to the port.
    pub sent: usize,
    /// `"ok"` acknowledgments received.
    pub acked: usize,
    /// Non-`"ok"` responses, in arrival order.
    pub other_responses: Vec<String>,
}

/// Streams a program with the pending ceiling enforced throughout,
/// then drains until every sent command is acknowledged.
pub fn stream_buffered(
    port: &mut dyn DevicePort,
    commands: &[GcodeCommand],
    config: &StreamConfig,
) -> Result<StreamOutcome> {
    let mut outcome = StreamOutcome::default();
    let mut pending = 0usize;
    let ceiling = config.max_pending.max(1);

    info!(commands = commands.len(), ceiling, "streaming program");

    for command in commands {
        while pending >= ceiling {
            wait_for_ack(port, config, &mut pending, &mut outcome)?;
        }
        // Credit acks that arrived while we were sending, without
        // blocking the stream.
        while pending > 0 {
            match port.read_line(Duration::ZERO)? {
                Some(response) => handle_response(&response, &mut pending, &mut outcome),
                None => break,
            }
        }

        port.write_line(&command.text)?;
        pending += 1;
        outcome.sent += 1;
        debug!(command = %command.text, pending, "sent");
    }

    while pending > 0 {
        wait_for_ack(port, config, &mut pending, &mut outcome)?;
    }

    info!(
        sent = outcome.sent,
        acked = outcome.acked,
        other = outcome.other_responses.len(),
        "stream complete"
    );
    Ok(outcome)
}

/// Blocks until one `"ok"` arrives, within the ack timeout.
fn wait_for_ack(
    port: &mut dyn DevicePort,
    config: &StreamConfig,
    pending: &mut usize,
    outcome: &mut StreamOutcome,
) -> Result<()> {
    let deadline = Instant::now() + config.ack_timeout;
    let before = *pending;
    loop {
        if let Some(response) = port.read_line(config.read_timeout)? {
            handle_response(&response, pending, outcome);
            if *pending < before {
                return Ok(());
            }
        }
        if Instant::now() >= deadline {
            return Err(DeviceError::AckTimeout {
                waited_ms: config.ack_timeout.as_millis() as u64,
                outstanding: *pending,
            }
            .into());
        }
    }
}

fn handle_response(response: &str, pending: &mut usize, outcome: &mut StreamOutcome) {
    if response.trim() == "ok" {
        *pending = pending.saturating_sub(1);
        outcome.acked += 1;
    } else {
        warn!(%response, "non-ok response during stream");
        outcome.other_responses.push(response.to_string());
    }
}
