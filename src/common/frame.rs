// src/common/frame.rs

use super::types::{MagSample, GAIN_UT_PER_LSB};

/// Exact length of the frame returned by `READ_MEASUREMENT`: one status
/// byte followed by three big-endian 16-bit axis words.
pub const SAMPLE_FRAME_LEN: usize = 7;

/// The decoder rejected a buffer before touching any field.
///
/// A wrong-length frame indicates a framing bug in the transport, not a
/// transient bus fault: it is surfaced immediately and never retried.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("bad sample frame: expected {expected} bytes, got {got}")]
pub struct FrameError {
    pub expected: usize,
    pub got: usize,
}

/// Decodes a raw measurement frame into a sample in microtesla.
///
/// Byte 0 is the device status byte (carried on the wire, not
/// interpreted here). Bytes 1-2, 3-4 and 5-6 are the x, y and z axis
/// words, big-endian unsigned, each scaled by [`GAIN_UT_PER_LSB`].
///
/// Pure function: no side effects, deterministic, idempotent.
pub fn decode_sample(raw: &[u8]) -> Result<MagSample, FrameError> {
    if raw.len() != SAMPLE_FRAME_LEN {
        return Err(FrameError {
            expected: SAMPLE_FRAME_LEN,
            got: raw.len(),
        });
    }

    let axis = |high: u8, low: u8| (((high as u16) << 8) | low as u16) as f32 * GAIN_UT_PER_LSB;

    Ok(MagSample {
        x: axis(raw[1], raw[2]),
        y: axis(raw[3], raw[4]),
        z: axis(raw[5], raw[6]),
    })
}
