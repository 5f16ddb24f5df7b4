//! Identity and value types shared by every Roomdraw layer.
//!
//! These are small, `Copy`-able newtypes. Wrapping a primitive in a named
//! struct means a `RoomId` can never be passed where an `Amount` is
//! expected, even though both are integers underneath.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// RoomId
// ---------------------------------------------------------------------------

/// Caller-chosen identifier of a room.
///
/// Only equality matters; two ids carry no ordering meaning for the
/// lottery. `#[serde(transparent)]` makes `RoomId(42)` serialize as `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// An external identity: a 20-byte address.
///
/// The core only compares and hashes accounts. On the wire and in logs an
/// account is `0x` followed by 40 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Account([u8; 20]);

impl Account {
    /// Number of bytes in an address.
    pub const LEN: usize = 20;

    /// Wraps raw address bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({self})")
    }
}

impl FromStr for Account {
    type Err = ProtocolError;

    /// Parses `0x`-prefixed (or bare) hex. Either case is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidAccount(s.to_string());
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if hex.len() != Self::LEN * 2 || !hex.is_ascii() {
            return Err(invalid());
        }

        let mut bytes = [0u8; 20];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &hex[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
        }
        Ok(Self(bytes))
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A quantity of funds in the smallest unit (wei).
///
/// Stakes and pooled balances are integers so `0.1 + 0.2` is exactly
/// `0.3`. [`Amount::parse_ether`] and `Display` convert to and from the
/// decimal ether strings users type and read.
///
/// On the wire an amount is a decimal *wei* string (`"100000000000000000"`),
/// since JSON numbers lose precision past 2^53 in JavaScript callers.
/// `Amount` has no `FromStr`. User input is ether and goes through
/// `parse_ether`, wire input is wei and goes through serde.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount(u128);

impl Amount {
    /// Zero funds.
    pub const ZERO: Self = Self(0);

    /// Decimal places between wei and ether.
    pub const DECIMALS: u32 = 18;

    /// Wei in one ether.
    pub const WEI_PER_ETHER: u128 = 10u128.pow(Self::DECIMALS);

    /// Creates an amount from a wei count.
    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    /// Returns the wei count.
    pub const fn as_wei(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Parses a decimal ether string such as `"0.1"`, `"2"` or `".5"`.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidAmount`] for empty input, signs,
    /// non-digit characters, more than 18 fractional digits, or a value
    /// that does not fit in 128 bits.
    pub fn parse_ether(s: &str) -> Result<Self, ProtocolError> {
        let invalid = || ProtocolError::InvalidAmount(s.to_string());
        let trimmed = s.trim();

        let (whole, frac) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(invalid());
        }
        if frac.len() > Self::DECIMALS as usize {
            return Err(invalid());
        }

        let whole_wei = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .ok()
                .and_then(|w| w.checked_mul(Self::WEI_PER_ETHER))
                .ok_or_else(invalid)?
        };
        let frac_wei = if frac.is_empty() {
            0
        } else {
            let scale = 10u128.pow(Self::DECIMALS - frac.len() as u32);
            frac.parse::<u128>().map_err(|_| invalid())? * scale
        };

        whole_wei
            .checked_add(frac_wei)
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Amount {
    /// Renders ether with trailing fractional zeros trimmed: `0.3`, `1`, `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::WEI_PER_ETHER;
        let frac = self.0 % Self::WEI_PER_ETHER;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:018}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>()
            .map(Self)
            .map_err(|_| de::Error::custom(format!("invalid wei amount {raw:?}")))
    }
}

impl std::iter::Sum for Amount {
    /// Saturates instead of wrapping; a ledger can never hold more than
    /// `u128::MAX` wei because every credit is checked.
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| Self(acc.0.saturating_add(a.0)))
    }
}
