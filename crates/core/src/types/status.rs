//! Backend enums shared by forms and records.
//!
//! All of them travel as `SCREAMING_SNAKE_CASE` strings, the way the
//! backend's Java enums serialize.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Language a book is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    French,
    English,
    Arabic,
}

impl Language {
    /// The wire name, also used as the `language` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::French => "FRENCH",
            Self::English => "ENGLISH",
            Self::Arabic => "ARABIC",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FRENCH" | "FR" => Ok(Self::French),
            "ENGLISH" | "EN" => Ok(Self::English),
            "ARABIC" | "AR" => Ok(Self::Arabic),
            _ => Err(UnknownVariant::new("language", s)),
        }
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    /// The wire name, also used as the `status` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Returned => "RETURNED",
        }
    }

    /// Whether the order can no longer move to another status.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Returned)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "SHIPPED" => Ok(Self::Shipped),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            "RETURNED" => Ok(Self::Returned),
            _ => Err(UnknownVariant::new("order status", s)),
        }
    }
}

/// Where an order is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    /// Delivered to the customer's address.
    #[default]
    Home,
    /// Picked up at the carrier's desk in the wilaya.
    Desk,
}

impl DeliveryType {
    /// The wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Desk => "DESK",
        }
    }
}

impl FromStr for DeliveryType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HOME" => Ok(Self::Home),
            "DESK" => Ok(Self::Desk),
            _ => Err(UnknownVariant::new("delivery type", s)),
        }
    }
}

/// Aggregation window for dashboard sales figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesPeriod {
    Week,
    #[default]
    Month,
    Year,
}

impl SalesPeriod {
    /// The wire name, used as the `period` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "WEEK",
            Self::Month => "MONTH",
            Self::Year => "YEAR",
        }
    }
}

impl FromStr for SalesPeriod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WEEK" => Ok(Self::Week),
            "MONTH" => Ok(Self::Month),
            "YEAR" => Ok(Self::Year),
            _ => Err(UnknownVariant::new("sales period", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_language_wire_format() {
        assert_eq!(serde_json::to_string(&Language::French).unwrap(), "\"FRENCH\"");
        let parsed: Language = serde_json::from_str("\"ARABIC\"").unwrap();
        assert_eq!(parsed, Language::Arabic);
    }

    #[test]
    fn test_language_from_str_accepts_short_codes() {
        assert_eq!("fr".parse::<Language>().unwrap(), Language::French);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_order_status_round_trips_through_as_str() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Returned,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_order_status_is_final() {
        assert!(!OrderStatus::Pending.is_final());
        assert!(!OrderStatus::Shipped.is_final());
        assert!(OrderStatus::Delivered.is_final());
        assert!(OrderStatus::Cancelled.is_final());
    }

    #[test]
    fn test_unknown_variant_message() {
        let err = "lost".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown order status: lost");
    }
}
