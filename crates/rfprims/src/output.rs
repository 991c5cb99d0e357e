use std::io::IsTerminal;

use clap::ValueEnum;
use rfprims_frame::{encode_to_bytes, frame_type_name, Frame};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// One human-readable line per frame.
    Pretty,
    /// Re-encoded wire bytes as hex.
    Hex,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Hex
        }
    }
}

pub fn print_frame(frame: &Frame, format: OutputFormat) {
    match format {
        OutputFormat::Pretty => println!("{}", pretty_line(frame)),
        OutputFormat::Hex => match encode_to_bytes(frame) {
            Ok(wire) => println!("{}", hex_string(&wire)),
            Err(err) => eprintln!("error: frame not encodable: {err}"),
        },
    }
}

fn pretty_line(frame: &Frame) -> String {
    let type_name = frame_type_name(frame.frame_type());
    let name = frame.command_name();
    let data = data_preview(frame.data());

    match frame {
        Frame::AtCommand { .. } => format!("{type_name} name={name} data={data}"),
        Frame::AtCommandResponse { status, .. } => {
            format!("{type_name} name={name} status={status} data={data}")
        }
        Frame::RemoteAtCommand {
            dest64,
            dest16,
            options,
            ..
        } => format!(
            "{type_name} dest64={dest64:016X} dest16={dest16:04X} options=0x{options:02X} name={name} data={data}"
        ),
        Frame::RemoteAtCommandResponse {
            dest64,
            dest16,
            status,
            ..
        } => format!(
            "{type_name} dest64={dest64:016X} dest16={dest16:04X} name={name} status={status} data={data}"
        ),
    }
}

pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (index, byte) in bytes.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

fn data_preview(data: &[u8]) -> String {
    if data.is_empty() {
        return "<query>".to_string();
    }
    match std::str::from_utf8(data) {
        Ok(text) if text.chars().all(|c| !c.is_control()) => text.to_string(),
        _ => format!("0x{}", hex_compact(data)),
    }
}

fn hex_compact(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02X}")).collect()
}
