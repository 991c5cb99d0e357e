use bytes::Bytes;

use crate::error::{FrameError, Result};
use crate::frame::{
    options, CommandName, CommandStatus, Frame, AT_COMMAND, AT_COMMAND_RESPONSE,
    BROADCAST_ADDRESS_16, BROADCAST_ADDRESS_64, REMOTE_AT_COMMAND, REMOTE_AT_COMMAND_RESPONSE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    AtCommand,
    AtCommandResponse,
    RemoteAtCommand,
    RemoteAtCommandResponse,
}

impl Kind {
    fn frame_type(self) -> u8 {
        match self {
            Kind::AtCommand => AT_COMMAND,
            Kind::AtCommandResponse => AT_COMMAND_RESPONSE,
            Kind::RemoteAtCommand => REMOTE_AT_COMMAND,
            Kind::RemoteAtCommandResponse => REMOTE_AT_COMMAND_RESPONSE,
        }
    }
}

/// Staged construction of protocol frames.
///
/// An entry point picks the frame type, fluent setters fill in fields and
/// [`build`](Self::build) validates the combination. A remote command
/// request with no destination set is addressed to the broadcast pair,
/// and command options default to apply-changes-immediately.
///
/// ```
/// use rfprims_frame::FrameBuilder;
///
/// let frame = FrameBuilder::remote_at_command()
///     .name("NI".parse()?)
///     .build()?;
/// # Ok::<(), rfprims_frame::FrameError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    kind: Kind,
    dest64: Option<u64>,
    dest16: Option<u16>,
    options: u8,
    name: Option<CommandName>,
    data: Bytes,
    status: CommandStatus,
}

impl FrameBuilder {
    /// Build an AT command request for the locally attached module.
    pub fn at_command() -> Self {
        Self::new(Kind::AtCommand)
    }

    /// Build a local AT command response.
    pub fn at_command_response() -> Self {
        Self::new(Kind::AtCommandResponse)
    }

    /// Build an AT command request addressed to a remote module.
    pub fn remote_at_command() -> Self {
        Self::new(Kind::RemoteAtCommand)
    }

    /// Build a remote AT command response.
    pub fn remote_at_command_response() -> Self {
        Self::new(Kind::RemoteAtCommandResponse)
    }

    fn new(kind: Kind) -> Self {
        Self {
            kind,
            dest64: None,
            dest16: None,
            options: options::APPLY_CHANGES,
            name: None,
            data: Bytes::new(),
            status: CommandStatus::Ok,
        }
    }

    /// Set the two-character command name. Required for every frame type.
    pub fn name(mut self, name: CommandName) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the command data. Empty data on a request means "query".
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the 16-bit destination network address.
    pub fn dest16(mut self, address: u16) -> Self {
        self.dest16 = Some(address);
        self
    }

    /// Set the 16-bit destination from raw wire bytes (big-endian).
    pub fn dest16_bytes(self, address: [u8; 2]) -> Self {
        self.dest16(u16::from_be_bytes(address))
    }

    /// Set the 64-bit destination serial address.
    pub fn dest64(mut self, address: u64) -> Self {
        self.dest64 = Some(address);
        self
    }

    /// Set the 64-bit destination from raw wire bytes (big-endian).
    pub fn dest64_bytes(self, address: [u8; 8]) -> Self {
        self.dest64(u64::from_be_bytes(address))
    }

    /// Address the frame to every module on the network.
    pub fn broadcast(mut self) -> Self {
        self.dest16 = Some(BROADCAST_ADDRESS_16);
        self.dest64 = Some(BROADCAST_ADDRESS_64);
        self
    }

    /// Set the remote command option bits (see [`options`]).
    pub fn options(mut self, options: u8) -> Self {
        self.options = options;
        self
    }

    /// Set the response status. Ignored by request frame types.
    pub fn status(mut self, status: CommandStatus) -> Self {
        self.status = status;
        self
    }

    /// Validate the staged fields and produce the frame.
    pub fn build(self) -> Result<Frame> {
        let name = self.name.ok_or(FrameError::MissingCommandName {
            frame_type: self.kind.frame_type(),
        })?;

        let frame = match self.kind {
            Kind::AtCommand => Frame::AtCommand {
                name,
                data: self.data,
            },
            Kind::AtCommandResponse => Frame::AtCommandResponse {
                name,
                status: self.status,
                data: self.data,
            },
            Kind::RemoteAtCommand => Frame::RemoteAtCommand {
                dest64: self.dest64.unwrap_or(BROADCAST_ADDRESS_64),
                dest16: self.dest16.unwrap_or(BROADCAST_ADDRESS_16),
                options: self.options,
                name,
                data: self.data,
            },
            Kind::RemoteAtCommandResponse => Frame::RemoteAtCommandResponse {
                dest64: self.dest64.unwrap_or(BROADCAST_ADDRESS_64),
                dest16: self.dest16.unwrap_or(BROADCAST_ADDRESS_16),
                name,
                status: self.status,
                data: self.data,
            },
        };
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> CommandName {
        s.parse().expect("two-character name")
    }

    #[test]
    fn at_command_query() {
        let frame = FrameBuilder::at_command().name(name("NI")).build().unwrap();
        assert_eq!(
            frame,
            Frame::AtCommand {
                name: name("NI"),
                data: Bytes::new(),
            }
        );
    }

    #[test]
    fn missing_name_is_an_error() {
        let err = FrameBuilder::at_command().build().unwrap_err();
        assert!(matches!(
            err,
            FrameError::MissingCommandName {
                frame_type: AT_COMMAND
            }
        ));

        let err = FrameBuilder::remote_at_command().build().unwrap_err();
        assert!(matches!(
            err,
            FrameError::MissingCommandName {
                frame_type: REMOTE_AT_COMMAND
            }
        ));
    }

    #[test]
    fn remote_request_defaults_to_broadcast_and_apply_changes() {
        let frame = FrameBuilder::remote_at_command()
            .name(name("NI"))
            .build()
            .unwrap();

        assert_eq!(
            frame,
            Frame::RemoteAtCommand {
                dest64: BROADCAST_ADDRESS_64,
                dest16: BROADCAST_ADDRESS_16,
                options: options::APPLY_CHANGES,
                name: name("NI"),
                data: Bytes::new(),
            }
        );
    }

    #[test]
    fn explicit_destination_overrides_default() {
        let frame = FrameBuilder::remote_at_command()
            .name(name("D0"))
            .dest64(0x0013_A200_4052_1CF0)
            .dest16(0x2001)
            .options(options::APPLY_CHANGES | options::EXTENDED_TIMEOUT)
            .data(vec![0x04])
            .build()
            .unwrap();

        match frame {
            Frame::RemoteAtCommand {
                dest64,
                dest16,
                options: opts,
                ..
            } => {
                assert_eq!(dest64, 0x0013_A200_4052_1CF0);
                assert_eq!(dest16, 0x2001);
                assert_eq!(opts, options::APPLY_CHANGES | options::EXTENDED_TIMEOUT);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn byte_setters_match_numeric_setters() {
        let from_bytes = FrameBuilder::remote_at_command()
            .name(name("NI"))
            .dest64_bytes([0x00, 0x13, 0xA2, 0x00, 0x40, 0x52, 0x1C, 0xF0])
            .dest16_bytes([0x12, 0x34])
            .build()
            .unwrap();
        let from_numbers = FrameBuilder::remote_at_command()
            .name(name("NI"))
            .dest64(0x0013_A200_4052_1CF0)
            .dest16(0x1234)
            .build()
            .unwrap();

        assert_eq!(from_bytes, from_numbers);
    }

    #[test]
    fn broadcast_helper_sets_the_legacy_pair() {
        let frame = FrameBuilder::remote_at_command()
            .name(name("NI"))
            .dest64(1)
            .dest16(2)
            .broadcast()
            .build()
            .unwrap();

        match frame {
            Frame::RemoteAtCommand { dest64, dest16, .. } => {
                assert_eq!(dest64, BROADCAST_ADDRESS_64);
                assert_eq!(dest16, BROADCAST_ADDRESS_16);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn response_builder_carries_status() {
        let frame = FrameBuilder::at_command_response()
            .name(name("NI"))
            .status(CommandStatus::InvalidCommand)
            .data(Bytes::from_static(b"x"))
            .build()
            .unwrap();

        assert_eq!(frame.status(), Some(CommandStatus::InvalidCommand));
    }

    #[test]
    fn built_frames_encode_and_decode() {
        let frame = FrameBuilder::remote_at_command_response()
            .name(name("SL"))
            .dest64(0xAABB)
            .dest16(0x0001)
            .status(CommandStatus::Ok)
            .data(vec![0x40, 0x52])
            .build()
            .unwrap();

        let wire = crate::codec::encode_to_bytes(&frame).unwrap();
        assert_eq!(crate::codec::decode_frame(&wire), Some(frame));
    }
}
