//! Serial port configuration and connection management
//!
//! Opens the port the simulated sensor writes to, and lists the ports
//! available on this machine.

use super::Sink;
use crate::config::DEFAULT_BAUD;
use crate::error::{Result, SimError};
use colored::Colorize;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Write};
use std::time::Duration;

/// Configuration for serial port connection
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/ttyUSB0, COM3)
    pub port_path: String,
    /// Baud rate (default: 9600)
    pub baud_rate: u32,
    /// Data bits (default: 8)
    pub data_bits: DataBits,
    /// Parity (default: None)
    pub parity: Parity,
    /// Stop bits (default: 1)
    pub stop_bits: StopBits,
    /// Flow control (default: None)
    pub flow_control: FlowControl,
    /// I/O timeout
    pub timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port_path: String::from("/dev/ttyUSB0"),
            baud_rate: DEFAULT_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: Duration::from_secs(1),
        }
    }
}

impl PortConfig {
    /// Create a new 8N1 configuration for the given port
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            ..Default::default()
        }
    }

    /// Set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

/// An open serial port that frames are written to
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    config: PortConfig,
}

impl SerialConnection {
    /// Open a serial connection with the given configuration
    pub fn open(config: PortConfig) -> Result<Self> {
        let port = serialport::new(&config.port_path, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .map_err(|source| SimError::Connection {
                port: config.port_path.clone(),
                source,
            })?;

        log::info!("Opened {} at {} baud", config.port_path, config.baud_rate);
        Ok(Self { port, config })
    }
}

impl Write for SerialConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

impl Sink for SerialConnection {
    fn close(mut self) -> io::Result<()> {
        let flushed = self.port.flush();
        log::info!("Closed {}", self.config.port_path);
        // Dropping the boxed port releases the device handle
        drop(self);
        flushed
    }
}

/// A serial port found on this machine
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub path: String,
    pub kind: PortKind,
    /// USB vendor and product id
    pub usb_id: Option<(u16, u16)>,
    /// USB manufacturer and product strings, space-joined
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortKind {
    Usb,
    Bluetooth,
    Other,
}

impl From<serialport::SerialPortInfo> for PortInfo {
    fn from(p: serialport::SerialPortInfo) -> Self {
        match p.port_type {
            serialport::SerialPortType::UsbPort(usb) => {
                let label = [usb.manufacturer, usb.product]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                PortInfo {
                    path: p.port_name,
                    kind: PortKind::Usb,
                    usb_id: Some((usb.vid, usb.pid)),
                    label: (!label.is_empty()).then_some(label),
                }
            }
            serialport::SerialPortType::BluetoothPort => PortInfo {
                path: p.port_name,
                kind: PortKind::Bluetooth,
                usb_id: None,
                label: None,
            },
            _ => PortInfo {
                path: p.port_name,
                kind: PortKind::Other,
                usb_id: None,
                label: None,
            },
        }
    }
}

impl PortInfo {
    /// One-line summary after the path, e.g. `usb 1a86:7523 QinHeng CH340`
    pub fn describe(&self) -> String {
        let mut parts = vec![match self.kind {
            PortKind::Usb => "usb".to_string(),
            PortKind::Bluetooth => "bluetooth".to_string(),
            PortKind::Other => "serial".to_string(),
        }];
        if let Some((vid, pid)) = self.usb_id {
            parts.push(format!("{:04x}:{:04x}", vid, pid));
        }
        if let Some(ref label) = self.label {
            parts.push(label.clone());
        }
        parts.join(" ")
    }
}

/// List all available serial ports
pub fn list_ports() -> anyhow::Result<Vec<PortInfo>> {
    use anyhow::Context;

    let ports =
        serialport::available_ports().with_context(|| "Failed to enumerate serial ports")?;
    Ok(ports.into_iter().map(PortInfo::from).collect())
}

/// Print the ports a simulator could write to
pub fn print_ports() -> anyhow::Result<()> {
    let ports = list_ports()?;

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        println!("\n{}", "To simulate without hardware, create a virtual pair:".cyan().bold());
        println!("  Linux:   socat -d -d pty,raw,echo=0 pty,raw,echo=0");
        println!("  Windows: install com0com and use one end of the pair");
        return Ok(());
    }

    println!("{}", "Available Serial Ports:".green().bold());
    for port in &ports {
        println!("  {:<20} {}", port.path.white().bold(), port.describe().dimmed());
    }
    println!("\n{}", "Use: distance-sim <PORT> to start sending".yellow());

    Ok(())
}
