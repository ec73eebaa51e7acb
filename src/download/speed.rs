//! Human-readable transfer rate formatting.
//!
//! Raw byte rates are floored, classified into a binary unit tier, and
//! reported with two decimal places. The unit strings here are the exact
//! strings emitted in progress events and `--json` output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bytes per kilobyte (binary).
const BYTES_PER_KB: f64 = 1024.0;

/// Bytes per megabyte (binary).
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Bytes per gigabyte (binary).
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Unit tier for a formatted transfer rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    /// Bytes per second.
    #[serde(rename = "B/s")]
    BytesPerSec,
    /// Kibibytes per second.
    #[serde(rename = "KB/s")]
    KilobytesPerSec,
    /// Mebibytes per second.
    #[serde(rename = "MB/s")]
    MegabytesPerSec,
    /// Gibibytes per second.
    #[serde(rename = "GB/s")]
    GigabytesPerSec,
}

impl SpeedUnit {
    /// Returns the display suffix for this unit.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BytesPerSec => "B/s",
            Self::KilobytesPerSec => "KB/s",
            Self::MegabytesPerSec => "MB/s",
            Self::GigabytesPerSec => "GB/s",
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A formatted transfer rate: scaled value plus unit tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    /// Rate scaled to `unit`, rounded to two decimal places.
    pub value: f64,
    /// Unit tier the value is expressed in.
    pub unit: SpeedUnit,
}

impl Speed {
    /// The zero rate, reported before any elapsed time has accumulated.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            value: 0.0,
            unit: SpeedUnit::BytesPerSec,
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}

/// Formats a raw rate in bytes per second into a [`Speed`].
///
/// The rate is floored to whole bytes first, then classified directly into
/// the highest tier whose threshold it meets (GB/s, MB/s, KB/s, else B/s).
/// The reported value is the floored rate divided by the tier size, rounded
/// to two decimals. Rates at or above 1 GB/s stay in GB/s however large.
#[must_use]
pub fn format_speed(bytes_per_second: f64) -> Speed {
    let floored = bytes_per_second.floor();

    let (value, unit) = if floored >= BYTES_PER_GB {
        (floored / BYTES_PER_GB, SpeedUnit::GigabytesPerSec)
    } else if floored >= BYTES_PER_MB {
        (floored / BYTES_PER_MB, SpeedUnit::MegabytesPerSec)
    } else if floored >= BYTES_PER_KB {
        (floored / BYTES_PER_KB, SpeedUnit::KilobytesPerSec)
    } else {
        (floored, SpeedUnit::BytesPerSec)
    };

    Speed {
        value: round_to_hundredths(value),
        unit,
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
