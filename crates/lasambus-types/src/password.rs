//! Account password policy.
//!
//! Registration rejects weak passwords before any network call. The rules match the ones the
//! backend enforces, so a password accepted here is only refused server-side for reasons the
//! client cannot see (for example the length ceiling).

use crate::TextError;

/// Characters that satisfy the "special character" rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// One rule of the password policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordCheck {
    Length,
    Uppercase,
    Lowercase,
    Number,
    Special,
}

impl PasswordCheck {
    pub const ALL: [PasswordCheck; 5] = [
        PasswordCheck::Length,
        PasswordCheck::Uppercase,
        PasswordCheck::Lowercase,
        PasswordCheck::Number,
        PasswordCheck::Special,
    ];

    /// Human-readable requirement shown next to an unmet check.
    pub fn requirement(self) -> &'static str {
        match self {
            PasswordCheck::Length => "at least 8 characters",
            PasswordCheck::Uppercase => "one uppercase letter",
            PasswordCheck::Lowercase => "one lowercase letter",
            PasswordCheck::Number => "one number",
            PasswordCheck::Special => "one special character",
        }
    }

    fn passes(self, password: &str) -> bool {
        match self {
            PasswordCheck::Length => password.chars().count() >= MIN_PASSWORD_LEN,
            PasswordCheck::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordCheck::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordCheck::Number => password.chars().any(|c| c.is_ascii_digit()),
            PasswordCheck::Special => password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }
}

/// Result of evaluating every policy rule against a candidate password.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordChecks {
    failed: Vec<PasswordCheck>,
}

impl PasswordChecks {
    pub fn evaluate(password: &str) -> Self {
        let failed = PasswordCheck::ALL
            .into_iter()
            .filter(|check| !check.passes(password))
            .collect();
        Self { failed }
    }

    pub fn is_valid(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed(&self) -> &[PasswordCheck] {
        &self.failed
    }
}

/// A password known to satisfy the policy.
///
/// `Debug` is redacted so passwords never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validates `input` against the password policy.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::WeakPassword`] listing every unmet requirement.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        let checks = PasswordChecks::evaluate(&input);
        if !checks.is_valid() {
            return Err(TextError::WeakPassword(
                checks.failed().iter().map(|c| c.requirement()).collect(),
            ));
        }
        Ok(Self(input))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

impl serde::Serialize for Password {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes_every_check() {
        let checks = PasswordChecks::evaluate("Amb#ulance9");
        assert!(checks.is_valid());
        assert!(Password::new("Amb#ulance9").is_ok());
    }

    #[test]
    fn weak_password_lists_each_unmet_requirement() {
        let checks = PasswordChecks::evaluate("short");
        assert_eq!(
            checks.failed(),
            &[
                PasswordCheck::Length,
                PasswordCheck::Uppercase,
                PasswordCheck::Number,
                PasswordCheck::Special
            ]
        );

        let err = Password::new("short").expect_err("weak password should be rejected");
        match err {
            TextError::WeakPassword(reqs) => assert_eq!(reqs.len(), 4),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn debug_output_is_redacted() {
        let password = Password::new("Amb#ulance9").expect("valid password");
        assert_eq!(format!("{password:?}"), "Password(***)");
    }
}
