//! Business-rule switches for cart and checkout.
//!
//! Both default to the permissive behavior: missing products are dropped
//! from checkout and stock is only checked for presence.

use std::str::FromStr;

/// What checkout does with a cart line whose product no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingProductPolicy {
    /// Drop the line and continue.
    #[default]
    Skip,
    /// Fail the checkout before any order is written.
    Reject,
}

/// How strictly requested quantities are compared to stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockPolicy {
    /// `add` only requires stock > 0; checkout clamps stock at zero.
    #[default]
    Lenient,
    /// `add` and checkout reject quantities above available stock.
    Strict,
}

impl FromStr for MissingProductPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            other => Err(format!("expected 'skip' or 'reject', got '{other}'")),
        }
    }
}

impl FromStr for StockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("expected 'lenient' or 'strict', got '{other}'")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policies() {
        assert_eq!(
            "Reject".parse::<MissingProductPolicy>().unwrap(),
            MissingProductPolicy::Reject
        );
        assert_eq!(" strict ".parse::<StockPolicy>().unwrap(), StockPolicy::Strict);
        assert!("sometimes".parse::<StockPolicy>().is_err());
    }

    #[test]
    fn test_defaults_are_permissive() {
        assert_eq!(MissingProductPolicy::default(), MissingProductPolicy::Skip);
        assert_eq!(StockPolicy::default(), StockPolicy::Lenient);
    }
}
