use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod transaction;
pub mod transaction_line;

pub use transaction::{Transaction, TransactionKind};
pub use transaction_line::TransactionLine;

/// Failure to read a Twinfield code value into its domain type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown {kind} {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("invalid period {0:?}, expected YYYY/PP")]
    InvalidPeriod(String),
}

/// Declares a Twinfield code list: the enum, its wire names, `Display` and `FromStr`.
macro_rules! code_list {
    (
        $(#[$meta:meta])*
        $name:ident($kind:literal) {
            $($(#[$variant_meta:meta])* $variant:ident => $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(ParseError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

code_list! {
    /// Where a transaction ends up once Twinfield accepts it.
    Destiny("destiny") {
        /// Stored as a provisional transaction that can still be edited.
        Temporary => "temporary",
        /// Posted to the general ledger.
        Final => "final",
    }
}

code_list! {
    LineType("line type") {
        Total => "total",
        Detail => "detail",
        Vat => "vat",
    }
}

code_list! {
    DebitCredit("debit/credit indicator") {
        Debit => "debit",
        Credit => "credit",
    }
}

code_list! {
    /// Matching state of a line against open items.
    MatchStatus("match status") {
        Available => "available",
        Matched => "matched",
        Proposed => "proposed",
        NotMatchable => "notmatchable",
    }
}

code_list! {
    /// Nature of an intra-community supply, reported on ICT sales lines.
    PerformanceType("performance type") {
        Goods => "goods",
        Services => "services",
    }
}

/// A fiscal period, written `YYYY/PP` on the wire (e.g. `2013/05`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: u16,
    pub number: u8,
}

impl Period {
    #[must_use]
    pub fn new(year: u16, number: u8) -> Self {
        Self { year, number }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.number)
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidPeriod(s.to_string());
        let (year, number) = s.split_once('/').ok_or_else(invalid)?;
        if year.len() != 4 || number.is_empty() || number.len() > 2 {
            return Err(invalid());
        }
        Ok(Self {
            year: year.parse().map_err(|_| invalid())?,
            number: number.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_lists_use_wire_names() {
        assert_eq!(Destiny::Temporary.as_str(), "temporary");
        assert_eq!("notmatchable".parse::<MatchStatus>(), Ok(MatchStatus::NotMatchable));
        assert_eq!(LineType::Vat.to_string(), "vat");
        assert_eq!(
            "sideways".parse::<DebitCredit>(),
            Err(ParseError::UnknownVariant {
                kind: "debit/credit indicator",
                value: "sideways".to_string(),
            })
        );
    }

    #[test]
    fn period_round_trips_through_text() {
        let period: Period = "2013/05".parse().unwrap();
        assert_eq!(period, Period::new(2013, 5));
        assert_eq!(period.to_string(), "2013/05");
        assert_eq!("2024/0".parse::<Period>(), Ok(Period::new(2024, 0)));
    }

    #[test]
    fn period_rejects_malformed_text() {
        for text in ["2013", "13/05", "2013/", "2013/123", "abcd/01", "2013-05"] {
            assert!(text.parse::<Period>().is_err(), "{text} should not parse");
        }
    }
}
