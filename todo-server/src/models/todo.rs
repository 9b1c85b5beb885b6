//! Todo record and validated input types
//!
//! `Username`, `Email` and `FullName` are validated at construction, so a
//! `NewTodo` or `TodoChanges` that exists is always safe to persist.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::FromRow;

use super::ValidationError;

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 64;

/// Maximum length for email addresses (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

/// Maximum length for full names
const MAX_FULL_NAME_LEN: usize = 128;

/// local@domain.tld with no whitespace and a single `@`
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("invalid email regex")
});

/// Todo record as stored in the `todo` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Todo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated username
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username, trimming surrounding whitespace.
    ///
    /// # Rules
    /// - Not empty after trimming
    /// - Max 64 characters
    /// - No inner whitespace
    ///
    /// # Example
    /// ```
    /// use todo_server::models::Username;
    ///
    /// assert!(Username::new("ada").is_ok());
    /// assert!(Username::new("   ").is_err());
    /// assert!(Username::new("ada lovelace").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }
        if s.chars().count() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "must not contain whitespace",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Create an email address, trimming surrounding whitespace.
    ///
    /// # Example
    /// ```
    /// use todo_server::models::Email;
    ///
    /// assert!(Email::new("ada@example.com").is_ok());
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if s.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }
        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must be a valid email address",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional display name. Blank input is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    /// Parse an optional full name; `None` and blank strings yield `Ok(None)`.
    pub fn parse(s: Option<&str>) -> Result<Option<Self>, ValidationError> {
        let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if s.chars().count() > MAX_FULL_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "full_name",
                max: MAX_FULL_NAME_LEN,
            });
        }
        Ok(Some(Self(s.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated input for create and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub username: Username,
    pub email: Email,
    pub full_name: Option<FullName>,
}

impl NewTodo {
    pub fn new(
        username: &str,
        email: &str,
        full_name: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: Email::new(email)?,
            full_name: FullName::parse(full_name)?,
        })
    }
}

/// Validated partial update. `None` leaves the stored value unchanged;
/// `full_name: Some(None)` clears the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub username: Option<Username>,
    pub email: Option<Email>,
    pub full_name: Option<Option<FullName>>,
}

impl TodoChanges {
    pub fn new(
        username: Option<&str>,
        email: Option<&str>,
        full_name: Option<Option<&str>>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: username.map(Username::new).transpose()?,
            email: email.map(Email::new).transpose()?,
            full_name: full_name.map(FullName::parse).transpose()?,
        })
    }

    /// Apply the changes to a record in place. Timestamps are left to the caller.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(username) = &self.username {
            todo.username = username.as_str().to_owned();
        }
        if let Some(email) = &self.email {
            todo.email = email.as_str().to_owned();
        }
        if let Some(full_name) = &self.full_name {
            todo.full_name = full_name.as_ref().map(|n| n.as_str().to_owned());
        }
    }
}
