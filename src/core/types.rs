use crate::core::errors::ExchangeError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// Exact base-10 number used for every price and amount crossing the API boundary.
///
/// The textual scale is preserved: `"0.00006000"` parses and prints back as
/// `"0.00006000"`, and equality is numeric (`5 == 5.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Numeric(Decimal);

impl Numeric {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parse a base-10 string, rejecting anything that cannot be held exactly
    pub fn parse(s: &str) -> Result<Self, ExchangeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ExchangeError::InvalidNumericFormat(
                "empty string".to_string(),
            ));
        }

        let parsed = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            Decimal::from_str_exact(trimmed)
        };

        parsed
            .map(Self)
            .map_err(|e| ExchangeError::InvalidNumericFormat(format!("'{}': {}", s, e)))
    }

    /// Convert a native float through its shortest round-trip decimal representation
    pub fn from_f64(value: f64) -> Result<Self, ExchangeError> {
        if !value.is_finite() {
            return Err(ExchangeError::InvalidNumericFormat(format!(
                "'{}' is not a finite number",
                value
            )));
        }
        Self::parse(&value.to_string())
    }

    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Number of digits after the decimal point, as written
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }

    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Round half-to-even to `decimal_places` and pad with zeros to exactly that scale
    #[must_use]
    pub fn quantize(&self, decimal_places: u32) -> Self {
        let mut rounded = self
            .0
            .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(decimal_places);
        Self(rounded)
    }

    /// Strip trailing zeros
    #[must_use]
    pub fn normalize(&self) -> Self {
        Self(self.0.normalize())
    }

    // Sums, differences and products are exact or `None`. rust_decimal rounds
    // instead of failing when a result needs more than 28 places or its
    // mantissa overflows at the wider scale; both show up as a lost scale.
    // A zero operand comes back unscaled, which is still exact.

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let sum = self.0.checked_add(rhs.0)?;
        exact_sum(self.0, rhs.0, sum).then_some(Self(sum))
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        let difference = self.0.checked_sub(rhs.0)?;
        exact_sum(self.0, rhs.0, difference).then_some(Self(difference))
    }

    /// Trailing zeros are dropped from the operands when that is what it takes
    /// to keep the product exact.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        if self.is_zero() || rhs.is_zero() {
            return Some(Self::ZERO);
        }
        exact_product(self.0, rhs.0)
            .or_else(|| exact_product(self.0.normalize(), rhs.0.normalize()))
            .map(Self)
    }

    /// Rounds to 28 places; `None` on division by zero or overflow
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(Self)
    }
}

fn exact_sum(lhs: Decimal, rhs: Decimal, result: Decimal) -> bool {
    lhs.is_zero() || rhs.is_zero() || result.scale() == lhs.scale().max(rhs.scale())
}

fn exact_product(lhs: Decimal, rhs: Decimal) -> Option<Decimal> {
    let product = lhs.checked_mul(rhs)?;
    (product.scale() == lhs.scale() + rhs.scale()).then_some(product)
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Numeric {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Numeric {
    type Error = ExchangeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Numeric {
    type Error = ExchangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<f64> for Numeric {
    type Error = ExchangeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl From<Decimal> for Numeric {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Numeric> for Decimal {
    fn from(value: Numeric) -> Self {
        value.0
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<u64> for Numeric {
    fn from(value: u64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<u32> for Numeric {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl Neg for Numeric {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Serialize for Numeric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

// Prices and amounts arrive as strings and are parsed exactly. Bare JSON numbers
// (fee rates, percentages) are read back through their shortest decimal form.
impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Self::parse(&s).map_err(de::Error::custom),
            serde_json::Value::Number(n) => Self::parse(&n.to_string()).map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected a decimal string or number, got {}",
                other
            ))),
        }
    }
}

/// Order side, encoded on the wire as `0` (buy) or `1` (sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn code(self) -> u8 {
        match self {
            Self::Buy => 0,
            Self::Sell => 1,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ExchangeError> {
        match code {
            0 => Ok(Self::Buy),
            1 => Ok(Self::Sell),
            other => Err(ExchangeError::InvalidOrderParameters(format!(
                "side must be 0 (buy) or 1 (sell), got {}",
                other
            ))),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "0" => Ok(Self::Buy),
            "sell" | "1" => Ok(Self::Sell),
            _ => Err(ExchangeError::InvalidOrderParameters(format!(
                "can't parse '{}' as order side",
                s
            ))),
        }
    }
}

impl TryFrom<i64> for OrderSide {
    type Error = ExchangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl TryFrom<&str> for OrderSide {
    type Error = ExchangeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// `false` is buy, `true` is sell
impl From<bool> for OrderSide {
    fn from(value: bool) -> Self {
        if value {
            Self::Sell
        } else {
            Self::Buy
        }
    }
}

impl Serialize for OrderSide {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for OrderSide {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| de::Error::custom(format!("invalid side {}", n)))
                .and_then(|code| Self::from_code(code).map_err(de::Error::custom)),
            serde_json::Value::String(s) => s.parse().map_err(de::Error::custom),
            serde_json::Value::Bool(b) => Ok(Self::from(b)),
            other => Err(de::Error::custom(format!("invalid side {}", other))),
        }
    }
}

/// Lifecycle state of an order as reported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OrderStatus {
    Unknown,
    PendingRequest,
    Received,
    Open,
    Filled,
    PartiallyFilled,
    PendingCancel,
    Cancelled,
    PartiallyCancelled,
    Failed,
    Expired,
}

impl OrderStatus {
    const ALL: [Self; 11] = [
        Self::Unknown,
        Self::PendingRequest,
        Self::Received,
        Self::Open,
        Self::Filled,
        Self::PartiallyFilled,
        Self::PendingCancel,
        Self::Cancelled,
        Self::PartiallyCancelled,
        Self::Failed,
        Self::Expired,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::PendingRequest => "PendingRequest",
            Self::Received => "Received",
            Self::Open => "Open",
            Self::Filled => "Filled",
            Self::PartiallyFilled => "PartiallyFilled",
            Self::PendingCancel => "PendingCancel",
            Self::Cancelled => "Cancelled",
            Self::PartiallyCancelled => "PartiallyCancelled",
            Self::Failed => "Failed",
            Self::Expired => "Expired",
        }
    }

    /// Order can still be matched
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::PartiallyFilled)
    }
}

impl From<u8> for OrderStatus {
    fn from(code: u8) -> Self {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .unwrap_or(Self::Unknown)
    }
}

impl From<OrderStatus> for u8 {
    fn from(status: OrderStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that names a trading pair: a raw symbol like `"EPIC-002_BTC-000"`
/// or one of the pair-carrying entities.
pub trait PairReference {
    fn pair_symbol(&self) -> &str;
}

impl PairReference for str {
    fn pair_symbol(&self) -> &str {
        self
    }
}

impl PairReference for String {
    fn pair_symbol(&self) -> &str {
        self.as_str()
    }
}

impl<T: PairReference + ?Sized> PairReference for &T {
    fn pair_symbol(&self) -> &str {
        (**self).pair_symbol()
    }
}
