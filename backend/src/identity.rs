//! Identity seam: resolves the authenticated user the engine acts for.

use thiserror::Error;

pub const USER_ENV_VAR: &str = "CAREER_USER";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentityError {
    #[error("No authenticated user (set {0})")]
    Missing(&'static str),

    #[error("Invalid user id '{0}'")]
    Invalid(String),
}

pub trait IdentityProvider {
    /// Opaque, non-blank user identifier
    fn current_user(&self) -> Result<String, IdentityError>;
}

/// Reads the user id from `CAREER_USER`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvIdentity;

impl IdentityProvider for EnvIdentity {
    fn current_user(&self) -> Result<String, IdentityError> {
        match std::env::var(USER_ENV_VAR) {
            Ok(user) => checked(user),
            Err(_) => Err(IdentityError::Missing(USER_ENV_VAR)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaticIdentity(pub String);

impl StaticIdentity {
    pub fn new(user: impl Into<String>) -> Self {
        Self(user.into())
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Result<String, IdentityError> {
        checked(self.0.clone())
    }
}

// Ids become part of store collection paths
fn checked(user: String) -> Result<String, IdentityError> {
    let trimmed = user.trim();
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(IdentityError::Invalid(user));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity() {
        assert_eq!(StaticIdentity::new(" ada ").current_user(), Ok("ada".to_string()));
        assert_eq!(
            StaticIdentity::new("  ").current_user(),
            Err(IdentityError::Invalid("  ".to_string()))
        );
        assert!(StaticIdentity::new("a/b").current_user().is_err());
    }
}
