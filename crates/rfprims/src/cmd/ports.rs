use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::cmd::PortsArgs;
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(_args: PortsArgs) -> CliResult<i32> {
    let ports = serialport::available_ports()
        .map_err(|err| CliError::new(INTERNAL, format!("port enumeration failed: {err}")))?;

    if ports.is_empty() {
        println!("no serial devices found");
        return Ok(SUCCESS);
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["DEVICE", "TYPE", "DESCRIPTION"]);

    for port in ports {
        let (kind, description) = describe(&port.port_type);
        table.add_row(vec![port.port_name.clone(), kind.to_string(), description]);
    }
    println!("{table}");
    Ok(SUCCESS)
}

fn describe(port_type: &serialport::SerialPortType) -> (&'static str, String) {
    match port_type {
        serialport::SerialPortType::UsbPort(info) => {
            let description = info
                .product
                .clone()
                .unwrap_or_else(|| format!("{:04x}:{:04x}", info.vid, info.pid));
            ("usb", description)
        }
        serialport::SerialPortType::BluetoothPort => ("bluetooth", String::new()),
        serialport::SerialPortType::PciPort => ("pci", String::new()),
        serialport::SerialPortType::Unknown => ("unknown", String::new()),
    }
}
