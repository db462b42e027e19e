//! Serial port enumeration.
//!
//! Used by `--list-ports` so an operator whose device path is wrong can see
//! what the OS actually exposes.

use super::error::PortError;
use serialport::{SerialPortInfo, SerialPortType};

/// List every serial port the OS reports, sorted by name.
pub fn list_ports() -> Result<Vec<SerialPortInfo>, PortError> {
    let mut ports = serialport::available_ports()?;
    ports.sort_by(|a, b| a.port_name.cmp(&b.port_name));
    Ok(ports)
}

/// Human-readable description of a port, one property per line.
pub fn describe(info: &SerialPortInfo) -> Vec<String> {
    let mut lines = vec![info.port_name.clone()];

    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            lines.push("   Type:         USB Serial Port".to_string());
            lines.push(format!("   VID:PID:      {:04X}:{:04X}", usb.vid, usb.pid));
            if let Some(ref manufacturer) = usb.manufacturer {
                lines.push(format!("   Manufacturer: {manufacturer}"));
            }
            if let Some(ref product) = usb.product {
                lines.push(format!("   Product:      {product}"));
            }
            if let Some(ref serial) = usb.serial_number {
                lines.push(format!("   Serial#:      {serial}"));
            }
        }
        SerialPortType::BluetoothPort => lines.push("   Type:         Bluetooth Serial Port".to_string()),
        SerialPortType::PciPort => lines.push("   Type:         PCI Serial Port".to_string()),
        SerialPortType::Unknown => lines.push("   Type:         Unknown".to_string()),
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_pci_port() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::PciPort,
        };

        assert_eq!(
            describe(&info),
            vec!["/dev/ttyS0".to_string(), "   Type:         PCI Serial Port".to_string()]
        );
    }

    #[test]
    fn test_describe_unknown_port() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyACM0".to_string(),
            port_type: SerialPortType::Unknown,
        };

        let lines = describe(&info);
        assert_eq!(lines[0], "/dev/ttyACM0");
        assert!(lines[1].contains("Unknown"));
    }
}
