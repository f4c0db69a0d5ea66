//! # VSCP Events
//!
//! In-memory event shapes accepted by the frame builder.
//!
//! Only the extended shape ([`VscpEventEx`]) carries the GUID, the explicit
//! date/time block and an owned payload, so it is the only shape that can be
//! serialized into a multicast frame. The reduced [`VscpEvent`] is accepted by
//! the API but rejected at build time; converting it is an explicit call.

use crate::error::{ProtocolError, Result};
use std::fmt;
use std::str::FromStr;

/// Length of a VSCP node GUID in bytes
pub const GUID_LENGTH: usize = 16;

/// 16-byte VSCP node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid([u8; GUID_LENGTH]);

impl Guid {
    pub const fn new(bytes: [u8; GUID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build a GUID from a slice, which must be exactly 16 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; GUID_LENGTH] = bytes.try_into().map_err(|_| {
            ProtocolError::InvalidGuid(format!(
                "expected {GUID_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; GUID_LENGTH] {
        &self.0
    }
}

impl From<[u8; GUID_LENGTH]> for Guid {
    fn from(bytes: [u8; GUID_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Guid {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

/// Formats as `FF:FF:...:FF`, the textual GUID form used across VSCP tooling
impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl FromStr for Guid {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; GUID_LENGTH];
        let mut count = 0usize;

        for part in s.trim().split(':') {
            if count == GUID_LENGTH {
                return Err(ProtocolError::InvalidGuid(format!(
                    "more than {GUID_LENGTH} octets in '{s}'"
                )));
            }
            bytes[count] = u8::from_str_radix(part.trim(), 16)
                .map_err(|_| ProtocolError::InvalidGuid(format!("bad octet '{part}' in '{s}'")))?;
            count += 1;
        }

        if count != GUID_LENGTH {
            return Err(ProtocolError::InvalidGuid(format!(
                "expected {GUID_LENGTH} octets, got {count}"
            )));
        }

        Ok(Self(bytes))
    }
}

/// Explicit UTC date/time block carried by an extended event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// All six fields zero means "stamp with the current UTC time when encoding"
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    pub fn from_utc(now: time::OffsetDateTime) -> Self {
        let now = now.to_offset(time::UtcOffset::UTC);
        Self {
            year: u16::try_from(now.year()).unwrap_or(0),
            month: u8::from(now.month()),
            day: now.day(),
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
        }
    }
}

/// Extended VSCP event carrying every field of the multicast frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VscpEventEx {
    /// Flags and priority
    pub head: u16,
    /// Monotonic microsecond counter
    pub timestamp: u32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub vscp_class: u16,
    pub vscp_type: u16,
    pub guid: Guid,
    pub data: Vec<u8>,
}

impl VscpEventEx {
    /// Declared payload length; always equal to `data.len()`
    pub fn size_data(&self) -> usize {
        self.data.len()
    }

    pub fn date_time(&self) -> DateTime {
        DateTime {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        }
    }

    pub fn set_date_time(&mut self, dt: DateTime) {
        self.year = dt.year;
        self.month = dt.month;
        self.day = dt.day;
        self.hour = dt.hour;
        self.minute = dt.minute;
        self.second = dt.second;
    }

    pub fn with_date_time(mut self, dt: DateTime) -> Self {
        self.set_date_time(dt);
        self
    }
}

/// Reduced VSCP event without GUID or date/time block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VscpEvent {
    pub head: u16,
    pub timestamp: u32,
    /// Object id used by the sending host, not part of the wire format
    pub obid: u32,
    pub vscp_class: u16,
    pub vscp_type: u16,
    pub data: Vec<u8>,
}

impl VscpEvent {
    /// Promote to the extended shape. The date/time block is left unset, so the
    /// frame builder stamps it with the current UTC time.
    pub fn into_extended(self, guid: Guid) -> VscpEventEx {
        VscpEventEx {
            head: self.head,
            timestamp: self.timestamp,
            vscp_class: self.vscp_class,
            vscp_type: self.vscp_type,
            guid,
            data: self.data,
            ..VscpEventEx::default()
        }
    }
}

/// Any event a caller may hand to the encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Standard(VscpEvent),
    Extended(VscpEventEx),
}

impl Event {
    /// Borrow the extended shape, rejecting the reduced one
    pub fn as_extended(&self) -> Result<&VscpEventEx> {
        match self {
            Event::Extended(ex) => Ok(ex),
            Event::Standard(_) => Err(ProtocolError::TypeMismatch(
                crate::error::constants::ERR_STANDARD_EVENT.to_string(),
            )),
        }
    }
}

impl From<VscpEventEx> for Event {
    fn from(ex: VscpEventEx) -> Self {
        Event::Extended(ex)
    }
}

impl From<VscpEvent> for Event {
    fn from(ev: VscpEvent) -> Self {
        Event::Standard(ev)
    }
}
