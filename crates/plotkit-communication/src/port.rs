//! Serial port access.
//!
//! [`DevicePort`] is the seam between the protocol layers and the
//! hardware: streaming, position queries, and live carving all talk to
//! `&mut dyn DevicePort`, so tests substitute a mock and the port is
//! exclusively borrowed for the duration of an operation. There is one
//! writer at a time by construction.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

use plotkit_core::{DeviceError, Error, Result};

/// Line-oriented device connection.
pub trait DevicePort: Send {
    /// Writes one command line; the newline is appended here.
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Reads one response line, waiting up to `timeout`. Returns
    /// `Ok(None)` when no complete line arrived in time.
    fn read_line(&mut self, timeout: Duration) -> Result<Option<String>>;

    /// The port name (e.g. "/dev/ttyUSB0").
    fn name(&self) -> &str;
}

/// Byte-level I/O the serial backend must provide.
pub trait ReadWrite: Read + Write + Send {}
impl<T: Read + Write + Send> ReadWrite for T {}

/// Information about an available serial port.
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port name (e.g. "/dev/ttyUSB0", "COM3").
    pub port_name: String,
    /// Human-readable description.
    pub description: String,
    /// USB vendor/product ids when applicable.
    pub usb_ids: Option<(u16, u16)>,
}

/// Lists serial ports matching controller patterns.
///
/// - Windows: COM*
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()
        .map_err(|e| Error::other(format!("failed to enumerate ports: {e}")))?;

    Ok(ports
        .iter()
        .filter(|p| is_controller_port(&p.port_name))
        .map(|p| PortInfo {
            port_name: p.port_name.clone(),
            description: describe_port(p),
            usb_ids: match &p.port_type {
                serialport::SerialPortType::UsbPort(usb) => Some((usb.vid, usb.pid)),
                _ => None,
            },
        })
        .collect())
}

fn is_controller_port(port_name: &str) -> bool {
    if port_name.starts_with("COM") && port_name[3..].chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if port_name.starts_with("/dev/ttyUSB") || port_name.starts_with("/dev/ttyACM") {
        return true;
    }
    if port_name.starts_with("/dev/cu.usbserial-") || port_name.starts_with("/dev/cu.usbmodem") {
        return true;
    }
    false
}

fn describe_port(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb) => format!(
            "USB {} {}",
            usb.manufacturer.as_deref().unwrap_or("Device"),
            usb.product.as_deref().unwrap_or("Serial Port")
        ),
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// A real serial connection via the `serialport` crate.
///
/// The inner handle uses a short read timeout so `read_line` can poll
/// against its own deadline; partial lines are carried across calls in
/// the pending buffer.
pub struct SerialDevicePort {
    name: String,
    inner: Mutex<Box<dyn ReadWrite>>,
    pending: Vec<u8>,
}

impl SerialDevicePort {
    /// Opens a port at 8N1 with the given baud rate.
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_millis(10))
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|e| {
                warn!(port = port_name, error = %e, "failed to open serial port");
                DeviceError::FailedToOpen {
                    port: port_name.to_string(),
                    reason: e.to_string(),
                }
            })?;

        debug!(port = port_name, baud = baud_rate, "serial port opened");
        Ok(Self {
            name: port_name.to_string(),
            inner: Mutex::new(Box::new(port)),
            pending: Vec::new(),
        })
    }

    /// Extracts the next complete line from the pending buffer.
    fn take_pending_line(&mut self) -> Option<String> {
        let nl = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=nl).collect();
        let text = String::from_utf8_lossy(&line).trim().to_string();
        Some(text)
    }
}

impl DevicePort for SerialDevicePort {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        inner
            .write_all(line.as_bytes())
            .and_then(|_| inner.write_all(b"\n"))
            .and_then(|_| inner.flush())
            .map_err(|e| {
                DeviceError::WriteFailed {
                    port: self.name.clone(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Option<String>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(line) = self.take_pending_line() {
                if line.is_empty() {
                    continue; // bare CR/LF between responses
                }
                return Ok(Some(line));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }

            let mut buf = [0u8; 256];
            let read = {
                let mut inner = self.inner.lock();
                inner.read(&mut buf)
            };
            match read {
                Ok(0) => {}
                Ok(n) => self.pending.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
