use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("credential field must not be empty: {0}")]
    Empty(&'static str),
}

/// GROWI login credentials.
///
/// Both fields are checked non-empty at construction and frozen afterwards;
/// the session manager only ever borrows them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(CredentialsError::Empty("username"));
        }
        if password.is_empty() {
            return Err(CredentialsError::Empty("password"));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

// Keep the password out of logs and error chains.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Credentials, CredentialsError};

    #[test]
    fn rejects_empty_fields() {
        assert_eq!(
            Credentials::new("", "pw").unwrap_err(),
            CredentialsError::Empty("username")
        );
        assert_eq!(
            Credentials::new("  ", "pw").unwrap_err(),
            CredentialsError::Empty("username")
        );
        assert_eq!(
            Credentials::new("admin", "").unwrap_err(),
            CredentialsError::Empty("password")
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let creds = Credentials::new("admin", "hunter2").unwrap();
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
