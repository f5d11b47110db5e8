//! Wire framing for distance readings
//!
//! A frame is ASCII text: `D:` followed by the distance with exactly two
//! fractional digits and a single `\n`, e.g. `D:147.32\n`.

use std::fmt;

/// Prefix of every frame
pub const FRAME_PREFIX: &str = "D:";

/// One encoded reading, ready to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(String);

impl Frame {
    pub fn new(distance: f64) -> Self {
        Self(format!("{}{}\n", FRAME_PREFIX, format_distance(distance)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.trim_end())
    }
}

/// Fixed-point formatting shared by frames, progress lines and records
pub fn format_distance(distance: f64) -> String {
    format!("{:.2}", distance)
}

#[cfg(test)]
pub(crate) fn is_well_formed(frame: &str) -> bool {
    let Some(body) = frame
        .strip_prefix(FRAME_PREFIX)
        .and_then(|rest| rest.strip_suffix('\n'))
    else {
        return false;
    };
    let Some((int, frac)) = body.split_once('.') else {
        return false;
    };
    !int.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.len() == 2
        && frac.bytes().all(|b| b.is_ascii_digit())
}
