//! Command wire format
//!
//! Commands travel as one ASCII datagram each:
//! ```text
//! AT*REF={sequence},{opcode}\r
//! ```
//!
//! The opcode set is closed and known at compile time; the sequence number is
//! advisory telemetry and is never used for deduplication or ordering.

use thiserror::Error;

/// The closed set of commands the drone understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveRight,
    MoveLeft,
    TakeOff,
    Land,
    CameraOn,
}

/// Errors that can occur while decoding a command datagram
#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("unknown opcode: {0}")]
    UnknownOpcode(String),

    #[error("malformed command frame: {0}")]
    Malformed(&'static str),

    #[error("command frame is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),
}

impl Command {
    /// Every defined command, in opcode order
    pub const ALL: [Command; 7] = [
        Command::MoveUp,
        Command::MoveDown,
        Command::MoveRight,
        Command::MoveLeft,
        Command::TakeOff,
        Command::Land,
        Command::CameraOn,
    ];

    /// The fixed numeric opcode for this command
    pub fn opcode(self) -> &'static str {
        match self {
            Command::MoveUp => "290717696",
            Command::MoveDown => "290711696",
            Command::MoveRight => "290721696",
            Command::MoveLeft => "290731696",
            Command::TakeOff => "290741696",
            Command::Land => "290751696",
            Command::CameraOn => "2907510942",
        }
    }

    /// Map a received opcode back to a command
    pub fn from_opcode(opcode: &str) -> Result<Command, CommandError> {
        match opcode {
            "290717696" => Ok(Command::MoveUp),
            "290711696" => Ok(Command::MoveDown),
            "290721696" => Ok(Command::MoveRight),
            "290731696" => Ok(Command::MoveLeft),
            "290741696" => Ok(Command::TakeOff),
            "290751696" => Ok(Command::Land),
            "2907510942" => Ok(Command::CameraOn),
            other => Err(CommandError::UnknownOpcode(other.to_string())),
        }
    }
}

/// One command datagram: sequence counter plus opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    pub sequence: u64,
    pub command: Command,
}

impl CommandFrame {
    pub fn new(sequence: u64, command: Command) -> Self {
        Self { sequence, command }
    }

    /// Produce the wire string for this frame
    pub fn encode(&self) -> String {
        format!("AT*REF={},{}\r", self.sequence, self.command.opcode())
    }

    /// Parse a received datagram
    pub fn decode(datagram: &[u8]) -> Result<CommandFrame, CommandError> {
        let text = std::str::from_utf8(datagram)?;
        let text = text.strip_suffix('\r').unwrap_or(text);

        let rest = text
            .strip_prefix("AT*REF=")
            .ok_or(CommandError::Malformed("missing AT*REF prefix"))?;

        let (seq, opcode) = rest
            .split_once(',')
            .ok_or(CommandError::Malformed("missing sequence/opcode separator"))?;

        let sequence: u64 = seq
            .parse()
            .map_err(|_| CommandError::Malformed("sequence is not a number"))?;

        let command = Command::from_opcode(opcode)?;

        Ok(CommandFrame { sequence, command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_exact_wire_string() {
        let frame = CommandFrame::new(0, Command::TakeOff);
        assert_eq!(frame.encode(), "AT*REF=0,290741696\r");
    }

    #[test]
    fn test_roundtrip_all_commands() {
        for cmd in Command::ALL {
            for seq in [0u64, 1, 42, u64::MAX] {
                let encoded = CommandFrame::new(seq, cmd).encode();
                let decoded = CommandFrame::decode(encoded.as_bytes()).expect("decode failed");
                assert_eq!(decoded.command, cmd);
                assert_eq!(decoded.sequence, seq);
            }
        }
    }

    #[test]
    fn test_opcode_mapping_is_bijective() {
        for cmd in Command::ALL {
            assert_eq!(Command::from_opcode(cmd.opcode()), Ok(cmd));
        }
    }

    #[test]
    fn test_unknown_opcode() {
        let err = CommandFrame::decode(b"AT*REF=0,999999\r").unwrap_err();
        assert_eq!(err, CommandError::UnknownOpcode("999999".into()));
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(
            CommandFrame::decode(b"REF=0,290741696\r"),
            Err(CommandError::Malformed(_))
        ));
        assert!(matches!(
            CommandFrame::decode(b"AT*REF=290741696\r"),
            Err(CommandError::Malformed(_))
        ));
        assert!(matches!(
            CommandFrame::decode(b"AT*REF=abc,290741696\r"),
            Err(CommandError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_utf8_datagram() {
        let err = CommandFrame::decode(&[0xff, 0xfe, 0xfd]).unwrap_err();
        assert!(matches!(err, CommandError::NotUtf8(_)));
    }

    #[test]
    fn test_decode_without_trailing_cr() {
        // Tolerate a missing carriage return, the opcode still identifies the command
        let decoded = CommandFrame::decode(b"AT*REF=3,290751696").expect("decode failed");
        assert_eq!(decoded.command, Command::Land);
        assert_eq!(decoded.sequence, 3);
    }
}
