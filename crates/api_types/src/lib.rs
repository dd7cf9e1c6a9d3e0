//! Wire types shared between the tracker core and the persistence backend.
//!
//! The shapes here follow the backend contract exactly: field names are
//! camelCase, the transaction type travels as `type` and amounts are plain
//! JSON numbers.

use serde::{Deserialize, Serialize};

pub mod money {
    use std::{
        fmt,
        ops::{Add, Sub},
        str::FromStr,
    };

    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    /// Error returned when a user supplied amount can't be parsed.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum AmountParseError {
        #[error("empty amount")]
        Empty,
        #[error("invalid amount")]
        Invalid,
        #[error("too many decimals")]
        TooManyDecimals,
        #[error("amount too large")]
        Overflow,
    }

    /// Signed money amount represented as **integer hundredths** of the
    /// backend currency unit.
    ///
    /// On the wire an amount is a plain JSON number (`12.5`), so the type
    /// converts through `f64` at the serde boundary and stays integral
    /// everywhere else. Sums and comparisons never drift.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use api_types::money::Amount;
    ///
    /// let amount = Amount::new(12_34);
    /// assert_eq!(amount.hundredths(), 1234);
    /// assert_eq!(amount.to_string(), "12.34");
    /// ```
    ///
    /// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
    /// more than 2 decimals):
    ///
    /// ```rust
    /// use api_types::money::Amount;
    ///
    /// assert_eq!("10".parse::<Amount>().unwrap().hundredths(), 1000);
    /// assert_eq!("10,5".parse::<Amount>().unwrap().hundredths(), 1050);
    /// assert!("12.345".parse::<Amount>().is_err());
    /// ```
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(try_from = "f64", into = "f64")]
    #[repr(transparent)]
    pub struct Amount(i64);

    impl Amount {
        pub const ZERO: Amount = Amount(0);

        /// Largest magnitude accepted from the wire or from user input, one
        /// trillion units. Sums of up to ~92000 such amounts stay inside `i64`.
        pub const MAX: Amount = Amount(100_000_000_000_000);

        /// Creates a new amount from integer hundredths.
        #[must_use]
        pub const fn new(hundredths: i64) -> Self {
            Self(hundredths)
        }

        /// Creates an amount from whole units (`Amount::units(100)` is `100.00`).
        #[must_use]
        pub const fn units(units: i64) -> Self {
            Self(units * 100)
        }

        /// Returns the raw value in hundredths.
        #[must_use]
        pub const fn hundredths(self) -> i64 {
            self.0
        }

        #[must_use]
        pub const fn is_zero(self) -> bool {
            self.0 == 0
        }

        #[must_use]
        pub const fn is_positive(self) -> bool {
            self.0 > 0
        }

        #[must_use]
        pub const fn is_negative(self) -> bool {
            self.0 < 0
        }

        /// Returns the amount as a floating point value, for ratios only.
        #[must_use]
        pub fn as_f64(self) -> f64 {
            self.0 as f64 / 100.0
        }

        /// Addition clamped to the `i64` range.
        #[must_use]
        pub const fn saturating_add(self, rhs: Amount) -> Amount {
            Amount(self.0.saturating_add(rhs.0))
        }

        #[must_use]
        pub const fn saturating_sub(self, rhs: Amount) -> Amount {
            Amount(self.0.saturating_sub(rhs.0))
        }
    }

    impl fmt::Display for Amount {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let sign = if self.0 < 0 { "-" } else { "" };
            let abs = self.0.unsigned_abs();
            f.pad(&format!("{sign}{}.{:02}", abs / 100, abs % 100))
        }
    }

    impl TryFrom<f64> for Amount {
        type Error = String;

        fn try_from(value: f64) -> Result<Self, Self::Error> {
            if !value.is_finite() {
                return Err(format!("amount is not a finite number: {value}"));
            }
            let scaled = (value * 100.0).round();
            if scaled.abs() > Amount::MAX.0 as f64 {
                return Err(format!("amount out of range: {value}"));
            }
            Ok(Amount(scaled as i64))
        }
    }

    impl From<Amount> for f64 {
        fn from(value: Amount) -> Self {
            value.as_f64()
        }
    }

    impl Add for Amount {
        type Output = Amount;

        fn add(self, rhs: Amount) -> Self::Output {
            self.saturating_add(rhs)
        }
    }

    impl Sub for Amount {
        type Output = Amount;

        fn sub(self, rhs: Amount) -> Self::Output {
            self.saturating_sub(rhs)
        }
    }

    impl std::iter::Sum for Amount {
        fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
            iter.fold(Amount::ZERO, Add::add)
        }
    }

    impl FromStr for Amount {
        type Err = AmountParseError;

        /// Parses a decimal string into hundredths.
        ///
        /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
        /// At most 2 fractional digits.
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(AmountParseError::Empty);
            }

            let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
                (true, stripped)
            } else if let Some(stripped) = trimmed.strip_prefix('+') {
                (false, stripped)
            } else {
                (false, trimmed)
            };

            let rest = rest.trim();
            if rest.is_empty() {
                return Err(AmountParseError::Empty);
            }

            let rest = rest.replace(',', ".");
            let mut parts = rest.split('.');
            let units_str = parts.next().ok_or(AmountParseError::Invalid)?;
            let frac_str = parts.next();
            if parts.next().is_some() {
                return Err(AmountParseError::Invalid);
            }

            if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(AmountParseError::Invalid);
            }
            let units: i64 = units_str.parse().map_err(|_| AmountParseError::Overflow)?;

            let frac: i64 = match frac_str {
                None | Some("") => 0,
                Some(frac) => {
                    if !frac.chars().all(|c| c.is_ascii_digit()) {
                        return Err(AmountParseError::Invalid);
                    }
                    match frac.len() {
                        1 => frac.parse::<i64>().map_err(|_| AmountParseError::Invalid)? * 10,
                        2 => frac.parse::<i64>().map_err(|_| AmountParseError::Invalid)?,
                        _ => return Err(AmountParseError::TooManyDecimals),
                    }
                }
            };

            let total = units
                .checked_mul(100)
                .and_then(|v| v.checked_add(frac))
                .filter(|total| *total <= Amount::MAX.0)
                .ok_or(AmountParseError::Overflow)?;

            Ok(Amount(if negative { -total } else { total }))
        }
    }

}

pub mod transaction {
    use std::{fmt, str::FromStr};

    use chrono::NaiveDate;

    use super::*;
    use crate::money::Amount;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    impl TransactionKind {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Expense => "expense",
            }
        }
    }

    impl fmt::Display for TransactionKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for TransactionKind {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_lowercase().as_str() {
                "income" => Ok(Self::Income),
                "expense" => Ok(Self::Expense),
                other => Err(format!("unknown transaction type: {other}")),
            }
        }
    }

    /// Backend assigned identifier.
    ///
    /// Opaque to the client. Some backends hand out numeric ids, so both JSON
    /// strings and numbers are accepted and kept as text.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(from = "RawId", into = "String")]
    pub struct TransactionId(String);

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    impl From<RawId> for TransactionId {
        fn from(value: RawId) -> Self {
            match value {
                RawId::Text(text) => Self(text),
                RawId::Number(number) => Self(number.to_string()),
            }
        }
    }

    impl From<TransactionId> for String {
        fn from(value: TransactionId) -> Self {
            value.0
        }
    }

    impl TransactionId {
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for TransactionId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// A transaction record as returned by `GET /transactions`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        #[serde(alias = "_id")]
        pub id: TransactionId,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount: Amount,
        pub category: String,
        pub description: String,
        #[serde(with = "calendar_date")]
        pub date: NaiveDate,
    }

    /// Request body for `POST /transactions` and `PUT /transactions/{id}`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionPayload {
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount: Amount,
        pub category: String,
        pub description: String,
        #[serde(with = "calendar_date")]
        pub date: NaiveDate,
    }

    /// Calendar dates travel as `YYYY-MM-DD`.
    ///
    /// Backends that store a timestamp send RFC3339 instead; only the UTC date
    /// part of those is kept.
    pub mod calendar_date {
        use chrono::{DateTime, NaiveDate, Utc};
        use serde::{Deserialize, Deserializer, Serializer, de};

        const FORMAT: &str = "%Y-%m-%d";

        pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_str(&date.format(FORMAT))
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = String::deserialize(deserializer)?;
            parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
        }

        pub fn parse(raw: &str) -> Option<NaiveDate> {
            let raw = raw.trim();
            if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
                return Some(date);
            }
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        }
    }
}

pub mod stats {
    use super::*;
    use crate::money::Amount;

    /// Aggregate returned by `GET /stats`. Computed by the backend.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Stats {
        pub total_income: Amount,
        pub total_expenses: Amount,
        pub balance: Amount,
    }
}
