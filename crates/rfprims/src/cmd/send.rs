use std::sync::mpsc;
use std::time::Duration;

use rfprims_frame::{CommandName, Frame, FrameBuilder};
use rfprims_link::Coordinator;
use rfprims_serial::TtyLink;

use crate::cmd::SendArgs;
use crate::exit::{
    frame_error, link_error, transport_error, CliError, CliResult, SUCCESS, TIMEOUT, USAGE,
};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let wait_timeout = parse_duration(&args.wait_timeout)?;
    let name: CommandName = args
        .name
        .parse()
        .map_err(|err| frame_error("invalid --name", err))?;
    let frame = build_frame(&args, name)?;

    let link = TtyLink::open(&args.device, args.baud)
        .map_err(|err| transport_error("open failed", err))?;
    let coordinator =
        Coordinator::new(Box::new(link)).map_err(|err| link_error("link setup failed", err))?;

    if args.wait {
        coordinator.start_listen();

        let (tx, rx) = mpsc::channel();
        coordinator
            .enqueue(
                &frame,
                Box::new(move |response| {
                    let _ = tx.send(response);
                }),
            )
            .map_err(|err| link_error("send failed", err))?;

        match rx.recv_timeout(wait_timeout) {
            Ok(response) => print_frame(&response, format),
            Err(_) => {
                return Err(CliError::new(
                    TIMEOUT,
                    format!("no response within {}", args.wait_timeout),
                ))
            }
        }
    } else {
        coordinator
            .send(&frame)
            .map_err(|err| link_error("send failed", err))?;
    }

    coordinator.close();
    Ok(SUCCESS)
}

fn build_frame(args: &SendArgs, name: CommandName) -> CliResult<Frame> {
    let data = resolve_data(args)?;
    let builder = if args.remote {
        let mut builder = FrameBuilder::remote_at_command().name(name);
        if let Some(dest64) = &args.dest64 {
            builder = builder.dest64(parse_hex_value::<u64>(dest64)?);
        }
        if let Some(dest16) = &args.dest16 {
            builder = builder.dest16(parse_hex_value::<u16>(dest16)?);
        }
        builder
    } else {
        FrameBuilder::at_command().name(name)
    };

    builder
        .data(data)
        .build()
        .map_err(|err| frame_error("invalid frame", err))
}

fn resolve_data(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(hex) = &args.hex {
        return parse_hex_bytes(hex);
    }
    Ok(Vec::new())
}

fn parse_hex_bytes(input: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        return Err(CliError::new(
            USAGE,
            "hex data must have an even number of digits",
        ));
    }
    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&cleaned[i..i + 2], 16)
                .map_err(|_| CliError::new(USAGE, format!("invalid hex data: {input}")))
        })
        .collect()
}

fn parse_hex_value<T: HexValue>(input: &str) -> CliResult<T> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    T::from_hex(digits).ok_or_else(|| CliError::new(USAGE, format!("invalid hex address: {input}")))
}

trait HexValue: Sized {
    fn from_hex(digits: &str) -> Option<Self>;
}

impl HexValue for u16 {
    fn from_hex(digits: &str) -> Option<Self> {
        u16::from_str_radix(digits, 16).ok()
    }
}

impl HexValue for u64 {
    fn from_hex(digits: &str) -> Option<Self> {
        u64::from_str_radix(digits, 16).ok()
    }
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use rfprims_frame::{options, BROADCAST_ADDRESS_16, BROADCAST_ADDRESS_64};

    use super::*;

    fn base_args() -> SendArgs {
        SendArgs {
            device: "/dev/null".into(),
            name: "NI".to_string(),
            baud: 9_600,
            data: None,
            hex: None,
            remote: false,
            dest64: None,
            dest16: None,
            wait: false,
            wait_timeout: "5s".to_string(),
        }
    }

    #[test]
    fn local_query_frame() {
        let args = base_args();
        let frame = build_frame(&args, "NI".parse().unwrap()).unwrap();
        assert!(matches!(frame, Frame::AtCommand { .. }));
        assert!(frame.data().is_empty());
    }

    #[test]
    fn hex_data_is_decoded() {
        let mut args = base_args();
        args.hex = Some("0A 1b".to_string());
        let frame = build_frame(&args, "D0".parse().unwrap()).unwrap();
        assert_eq!(frame.data().as_ref(), &[0x0A, 0x1B]);
    }

    #[test]
    fn odd_hex_digit_count_is_a_usage_error() {
        let mut args = base_args();
        args.hex = Some("ABC".to_string());
        let err = build_frame(&args, "D0".parse().unwrap()).unwrap_err();
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn remote_defaults_to_broadcast() {
        let mut args = base_args();
        args.remote = true;
        let frame = build_frame(&args, "NI".parse().unwrap()).unwrap();
        match frame {
            Frame::RemoteAtCommand {
                dest64,
                dest16,
                options: opts,
                ..
            } => {
                assert_eq!(dest64, BROADCAST_ADDRESS_64);
                assert_eq!(dest16, BROADCAST_ADDRESS_16);
                assert_eq!(opts, options::APPLY_CHANGES);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn remote_addresses_parse_from_hex() {
        let mut args = base_args();
        args.remote = true;
        args.dest64 = Some("0x0013A20040521CF0".to_string());
        args.dest16 = Some("1234".to_string());
        let frame = build_frame(&args, "NI".parse().unwrap()).unwrap();
        match frame {
            Frame::RemoteAtCommand { dest64, dest16, .. } => {
                assert_eq!(dest64, 0x0013_A200_4052_1CF0);
                assert_eq!(dest16, 0x1234);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn durations_parse_with_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("7").unwrap(), Duration::from_secs(7));
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("abc").is_err());
    }
}
