// Signal mask decoding for the SigPnd/SigBlk/SigIgn/SigCgt status fields

use crate::error::{Error, Result};

/// Number of bytes in a status signal mask (16 hex characters)
const MASK_BYTES: usize = 8;

/// A set of signal numbers in `1..=32`.
///
/// Bit `i` of the inner value stands for signal `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SignalSet(u32);

impl SignalSet {
    pub fn from_bits(bits: u32) -> Self {
        SignalSet(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether the given signal number is a member of this set
    pub fn contains(&self, sig: u32) -> bool {
        (1..=32).contains(&sig) && self.0 & (1 << (sig - 1)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Signal numbers in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..32u32)
            .filter(move |bit| self.0 & (1 << *bit) != 0)
            .map(|bit| bit + 1)
    }
}

/// Decode a hex signal mask such as `0000000000014003`.
///
/// Only the low 32 bits are kept: they are bytes 4..8 of the decoded byte
/// sequence, read big-endian.
pub fn decode_signal_mask(hex: &str) -> Result<SignalSet> {
    let bytes = decode_hex(hex.trim())?;
    if bytes.len() < MASK_BYTES {
        return Err(Error::malformed(
            "signal mask",
            format!("expected {} bytes, got {}", MASK_BYTES, bytes.len()),
        ));
    }

    let mask = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    Ok(SignalSet(mask))
}

fn decode_hex(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(Error::malformed(
            "signal mask",
            format!("odd number of hex digits in '{}'", hex),
        ));
    }

    // from_str_radix tolerates a leading '+', the mask format does not
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(Error::malformed(
            "signal mask",
            format!("invalid hex digit '{}' in '{}'", bad, hex),
        ));
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| Error::malformed("signal mask", e.to_string()))
        })
        .collect()
}
