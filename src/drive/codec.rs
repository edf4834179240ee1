// Drive Direct command frame
//
// Frame format: [OPCODE(145), RIGHT_HI, RIGHT_LO, LEFT_HI, LEFT_LO]
// Both speeds are signed 16-bit big-endian. Right comes before left on the
// wire even though the command is (left, right).

use crate::messages::DriveCommand;

/// Drive Direct opcode
pub const OPCODE_DRIVE_DIRECT: u8 = 145;

/// Bytes in one frame
pub const FRAME_LEN: usize = 5;

/// Errors decoding a frame
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CodecError {
    #[error("Frame must be 5 bytes, got {len}")]
    Length { len: usize },

    #[error("Unexpected opcode {opcode}, expected 145")]
    Opcode { opcode: u8 },
}

/// Encode a wheel command into its wire frame.
///
/// Speeds are expected within [-500, 500] already; nothing is re-checked here.
pub fn encode(cmd: DriveCommand) -> [u8; FRAME_LEN] {
    let right = cmd.right.to_be_bytes();
    let left = cmd.left.to_be_bytes();
    [OPCODE_DRIVE_DIRECT, right[0], right[1], left[0], left[1]]
}

/// Decode one frame back into a wheel command
pub fn decode(frame: &[u8]) -> Result<DriveCommand, CodecError> {
    if frame.len() != FRAME_LEN {
        return Err(CodecError::Length { len: frame.len() });
    }
    if frame[0] != OPCODE_DRIVE_DIRECT {
        return Err(CodecError::Opcode { opcode: frame[0] });
    }

    Ok(DriveCommand {
        right: i16::from_be_bytes([frame[1], frame[2]]),
        left: i16::from_be_bytes([frame[3], frame[4]]),
    })
}

/// Decode a stream of back-to-back frames, such as a file channel dump
pub fn decode_all(bytes: &[u8]) -> Result<Vec<DriveCommand>, CodecError> {
    bytes.chunks(FRAME_LEN).map(decode).collect()
}
