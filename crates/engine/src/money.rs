use std::{fmt, str::FromStr};

use crate::{EngineError, ResultEngine};

/// Signed money amount represented as **integer cents** of Brazilian real.
///
/// Use this type for **all** monetary values in the engine (transaction
/// amounts, fixed expenses, goal targets) to avoid floating-point drift.
///
/// The value is signed:
/// - positive = income / increase
/// - negative = expense / decrease
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(1_234_56);
/// assert_eq!(amount.cents(), 123456);
/// assert_eq!(amount.to_string(), "R$ 1.234,56");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator, or the
/// Brazilian `1.234,56` form; rejects > 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert_eq!("1.234,56".parse::<MoneyCents>().unwrap().cents(), 123456);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);
    /// Largest amount a single record may carry (R$ 10 trillion).
    pub const MAX_AMOUNT: MoneyCents = MoneyCents(1_000_000_000_000_000);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Checks a stored amount against `1..=MAX_AMOUNT`.
    pub(crate) fn ensure_stored(cents: i64, what: &str) -> ResultEngine<()> {
        if cents <= 0 {
            return Err(EngineError::InvalidAmount(format!("{what} must be > 0")));
        }
        if cents > Self::MAX_AMOUNT.0 {
            return Err(EngineError::InvalidAmount(format!(
                "{what} must be at most {}",
                Self::MAX_AMOUNT
            )));
        }
        Ok(())
    }

    /// Plain decimal rendering without currency symbol or grouping
    /// (`-1234.56`), suitable for spreadsheets.
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let reais = group_thousands(abs / 100);
        let cents = abs % 100;
        write!(f, "{sign}R$ {reais},{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Adds raw cent amounts, clamping at the `i64` bounds.
pub(crate) fn sum_minor<I: IntoIterator<Item = i64>>(amounts: I) -> i64 {
    amounts.into_iter().fold(0, i64::saturating_add)
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// When both appear, `.` groups thousands and `,` separates decimals
    /// (`1.234,56`).
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix("R$").map(str::trim).unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = if rest.contains(',') && rest.contains('.') {
            let (int_part, frac_part) = rest.rsplit_once(',').ok_or_else(invalid)?;
            let groups: Vec<&str> = int_part.split('.').collect();
            let well_grouped = groups.first().is_some_and(|g| (1..=3).contains(&g.len()))
                && groups.iter().skip(1).all(|g| g.len() == 3);
            if !well_grouped {
                return Err(invalid());
            }
            format!("{}.{}", groups.concat(), frac_part)
        } else {
            rest.replace(',', ".")
        };

        let mut parts = rest.split('.');
        let reais_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if reais_str.is_empty() || !reais_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let reais: i64 = reais_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = reais
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(MoneyCents(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_brl() {
        assert_eq!(MoneyCents::new(0).to_string(), "R$ 0,00");
        assert_eq!(MoneyCents::new(1).to_string(), "R$ 0,01");
        assert_eq!(MoneyCents::new(1050).to_string(), "R$ 10,50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-R$ 10,50");
        assert_eq!(MoneyCents::new(123_456_789).to_string(), "R$ 1.234.567,89");
        assert_eq!(MoneyCents::new(100_000).to_string(), "R$ 1.000,00");
    }

    #[test]
    fn decimal_string_has_no_grouping() {
        assert_eq!(MoneyCents::new(123_456).to_decimal_string(), "1234.56");
        assert_eq!(MoneyCents::new(-5).to_decimal_string(), "-0.05");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<MoneyCents>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_accepts_brazilian_grouping() {
        assert_eq!("1.234,56".parse::<MoneyCents>().unwrap().cents(), 123_456);
        assert_eq!("R$ 12.000,00".parse::<MoneyCents>().unwrap().cents(), 1_200_000);
        assert!("12.34,56".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("0,001".parse::<MoneyCents>().is_err());
        assert!("".parse::<MoneyCents>().is_err());
        assert!("abc".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn stored_amounts_are_capped() {
        assert!(MoneyCents::ensure_stored(1, "amount").is_ok());
        assert!(MoneyCents::ensure_stored(MoneyCents::MAX_AMOUNT.cents(), "amount").is_ok());
        assert_eq!(
            MoneyCents::ensure_stored(0, "amount"),
            Err(EngineError::InvalidAmount("amount must be > 0".to_string()))
        );
        assert_eq!(
            MoneyCents::ensure_stored(MoneyCents::MAX_AMOUNT.cents() + 1, "target"),
            Err(EngineError::InvalidAmount(
                "target must be at most R$ 10.000.000.000.000,00".to_string()
            ))
        );
    }

    #[test]
    fn sums_clamp_instead_of_overflowing() {
        assert_eq!(sum_minor([100, 250, -50]), 300);
        assert_eq!(sum_minor([i64::MAX / 2 + 1, i64::MAX / 2 + 1]), i64::MAX);
        assert_eq!(sum_minor(std::iter::empty()), 0);
    }
}
