use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::AccountId;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialError {
    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("Password must be at least 6 characters.")]
    PasswordTooShort,

    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// What an account may do. Stored with the account at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(CredentialError::UnknownRole(other.to_owned())),
        }
    }
}

/// A normalised (trimmed, lower-cased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Parses an address of the shape `local@domain.tld`.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidEmail` for anything else.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let normalized = raw.trim().to_ascii_lowercase();
        let (local, domain) = normalized
            .split_once('@')
            .ok_or(CredentialError::InvalidEmail)?;
        let valid = !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            && !domain.ends_with('.')
            && !normalized.chars().any(char::is_whitespace);
        if !valid {
            return Err(CredentialError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated email + password pair, as submitted to the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: Email,
    password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `CredentialError` if the email is malformed or the password is too short.
    pub fn new(email: &str, password: impl Into<String>) -> Result<Self, CredentialError> {
        let email = Email::parse(email)?;
        let password = password.into();
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(CredentialError::PasswordTooShort);
        }
        Ok(Self { email, password })
    }

    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// A registered account. The role is the server-side claim used for routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    email: Email,
    role: Role,
    created_at: DateTime<Utc>,
}

impl Account {
    #[must_use]
    pub fn new(id: AccountId, email: Email, role: Role, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            role,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> AccountId {
        self.id
    }

    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalised() {
        let email = Email::parse("  Ada@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "ada@example.com");
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for raw in ["", "ada", "ada@", "@example.com", "ada@example", "a b@x.io", "a@@x.io"] {
            assert_eq!(
                Email::parse(raw).unwrap_err(),
                CredentialError::InvalidEmail,
                "{raw}"
            );
        }
    }

    #[test]
    fn password_needs_six_chars() {
        assert_eq!(
            Credentials::new("ada@example.com", "12345").unwrap_err(),
            CredentialError::PasswordTooShort
        );
        assert!(Credentials::new("ada@example.com", "123456").is_ok());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("ada@example.com", "hunter22").unwrap();
        assert!(!format!("{creds:?}").contains("hunter22"));
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("Teacher".parse::<Role>().unwrap(), Role::Teacher);
        assert_eq!(Role::Student.to_string(), "student");
        assert!("admin".parse::<Role>().is_err());
    }
}
