//! In-memory port double for protocol tests.

use std::collections::VecDeque;
use std::time::Duration;

use crate::port::DevicePort;
use plotkit_core::Result;

/// A scripted [`DevicePort`] that records writes and replays queued
/// responses. In acking mode every write queues an `"ok"`, modelling a
/// controller that acknowledges each line; the port also tracks the
/// highest number of unacknowledged lines it ever held, which is what
/// the flow-control invariant is asserted against.
pub struct MockPort {
    name: String,
    written: Vec<String>,
    responses: VecDeque<String>,
    auto_ack: bool,
    outstanding: usize,
    max_outstanding: usize,
}

impl MockPort {
    /// A port that acknowledges every line.
    pub fn acking() -> Self {
        Self {
            name: "mock".to_string(),
            written: Vec::new(),
            responses: VecDeque::new(),
            auto_ack: true,
            outstanding: 0,
            max_outstanding: 0,
        }
    }

    /// A port that never responds.
    pub fn silent() -> Self {
        Self {
            auto_ack: false,
            ..Self::acking()
        }
    }

    /// Queues a response ahead of any pending acknowledgments.
    pub fn inject_response(&mut self, response: &str) {
        self.responses.push_front(response.to_string());
    }

    /// Queues a response behind any pending acknowledgments.
    pub fn push_response(&mut self, response: &str) {
        self.responses.push_back(response.to_string());
    }

    /// Every line written so far, in order.
    pub fn written(&self) -> &[String] {
        &self.written
    }

    /// Highest unacknowledged line count ever reached.
    pub fn max_outstanding(&self) -> usize {
        self.max_outstanding
    }
}

impl DevicePort for MockPort {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.written.push(line.to_string());
        self.outstanding += 1;
        self.max_outstanding = self.max_outstanding.max(self.outstanding);
        if self.auto_ack {
            self.responses.push_back("ok".to_string());
        }
        Ok(())
    }

    fn read_line(&mut self, _timeout: Duration) -> Result<Option<String>> {
        match self.responses.pop_front() {
            Some(response) => {
                if response == "ok" {
                    self.outstanding = self.outstanding.saturating_sub(1);
                }
                Ok(Some(response))
            }
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
