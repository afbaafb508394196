use chrono::NaiveDate;
use secrecy::SecretString;

/// An API token and the calendar day it was issued on.
///
/// The service invalidates tokens at the end of their issuing day, so a
/// token is fresh exactly when `creation_day` is today. Tokens are
/// replaced on refresh, never edited.
#[derive(Debug, Clone)]
pub struct Token {
    value: SecretString,
    creation_day: NaiveDate,
}

impl Token {
    pub fn new(value: SecretString, creation_day: NaiveDate) -> Self {
        Self {
            value,
            creation_day,
        }
    }

    pub fn value(&self) -> &SecretString {
        &self.value
    }

    pub fn creation_day(&self) -> NaiveDate {
        self.creation_day
    }

    /// Whether this token may still be used on `today`.
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        self.creation_day == today
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn valid_only_on_issuing_day() {
        let token = Token::new(SecretString::from("t".to_string()), day(2026, 10, 18));
        assert!(token.is_valid_on(day(2026, 10, 18)));
        assert!(!token.is_valid_on(day(2026, 10, 19)));
        assert!(!token.is_valid_on(day(2026, 10, 17)));
    }

    #[test]
    fn same_day_of_month_in_another_month_is_stale() {
        let token = Token::new(SecretString::from("t".to_string()), day(2026, 9, 18));
        assert!(!token.is_valid_on(day(2026, 10, 18)));
    }
}
