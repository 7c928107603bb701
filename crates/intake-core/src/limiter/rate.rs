//! Rate limit expressions such as `10/minute` or `5 per second`
//!
//! Copyright (c) 2025 Intake Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Granularity of a rate limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
}

impl Granularity {
    pub fn seconds(&self) -> u64 {
        match self {
            Granularity::Second => 1,
            Granularity::Minute => 60,
            Granularity::Hour => 60 * 60,
            Granularity::Day => 24 * 60 * 60,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
        }
    }

    fn parse(unit: &str) -> Option<Self> {
        match unit.trim().to_lowercase().trim_end_matches('s') {
            "second" | "sec" => Some(Granularity::Second),
            "minute" | "min" => Some(Granularity::Minute),
            "hour" => Some(Granularity::Hour),
            "day" => Some(Granularity::Day),
            _ => None,
        }
    }
}

/// `amount` hits per `multiples` windows of `granularity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RateLimit {
    pub amount: u32,
    pub multiples: u32,
    pub granularity: Granularity,
}

impl RateLimit {
    pub fn new(amount: u32, granularity: Granularity) -> Self {
        Self {
            amount,
            multiples: 1,
            granularity,
        }
    }

    pub fn per_second(amount: u32) -> Self {
        Self::new(amount, Granularity::Second)
    }

    pub fn per_minute(amount: u32) -> Self {
        Self::new(amount, Granularity::Minute)
    }

    /// Length of one window
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.granularity.seconds() * u64::from(self.multiples))
    }

    /// Permits regained per second
    pub fn refill_rate(&self) -> f64 {
        f64::from(self.amount) / self.period().as_secs_f64()
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiples == 1 {
            write!(f, "{} per {}", self.amount, self.granularity.name())
        } else {
            write!(f, "{} per {} {}s", self.amount, self.multiples, self.granularity.name())
        }
    }
}

impl FromStr for RateLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid rate limit '{}', expected e.g. '10/minute'", s);
        let lowered = s.trim().to_lowercase();
        let (amount, window) = lowered
            .split_once('/')
            .or_else(|| lowered.split_once(" per "))
            .ok_or_else(invalid)?;

        let amount: u32 = amount.trim().parse().map_err(|_| invalid())?;
        if amount == 0 {
            return Err(invalid());
        }

        let mut parts = window.split_whitespace();
        let (multiples, unit) = match (parts.next(), parts.next(), parts.next()) {
            (Some(unit), None, None) => (1, unit),
            (Some(count), Some(unit), None) => (count.parse().map_err(|_| invalid())?, unit),
            _ => return Err(invalid()),
        };
        if multiples == 0 {
            return Err(invalid());
        }

        let granularity = Granularity::parse(unit).ok_or_else(invalid)?;
        Ok(Self {
            amount,
            multiples,
            granularity,
        })
    }
}

impl TryFrom<String> for RateLimit {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RateLimit> for String {
    fn from(limit: RateLimit) -> Self {
        limit.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("10/minute".parse::<RateLimit>().unwrap(), RateLimit::per_minute(10));
        assert_eq!("5 per second".parse::<RateLimit>().unwrap(), RateLimit::per_second(5));
        assert_eq!(
            "100/hour".parse::<RateLimit>().unwrap(),
            RateLimit::new(100, Granularity::Hour)
        );
        assert_eq!(
            "1000 per day".parse::<RateLimit>().unwrap(),
            RateLimit::new(1000, Granularity::Day)
        );

        let every_two = "3 per 2 minutes".parse::<RateLimit>().unwrap();
        assert_eq!(every_two.multiples, 2);
        assert_eq!(every_two.period(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("ten/minute".parse::<RateLimit>().is_err());
        assert!("10/fortnight".parse::<RateLimit>().is_err());
        assert!("0/second".parse::<RateLimit>().is_err());
        assert!("10".parse::<RateLimit>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for text in ["10 per minute", "3 per 2 minutes"] {
            assert_eq!(text.parse::<RateLimit>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_refill_rate() {
        assert_eq!(RateLimit::per_minute(60).refill_rate(), 1.0);
    }
}
