use std::env;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No access token: environment variable {0} is not set")]
    MissingToken(String),
    #[error("Access token in {0} is empty")]
    EmptyToken(String),
}

/// Supplies the bearer token for editor calls.
///
/// Obtaining the token interactively is the host's concern; implementations
/// only hand over one that already exists.
pub trait CredentialSource {
    fn token(&self) -> Result<String, AuthError>;
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl CredentialSource for StaticToken {
    fn token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialSource for EnvToken {
    fn token(&self) -> Result<String, AuthError> {
        let token = env::var(&self.var).map_err(|_| AuthError::MissingToken(self.var.clone()))?;
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken(self.var.clone()));
        }
        Ok(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_token_is_returned_as_is() {
        assert_eq!(StaticToken("abc".to_string()).token(), Ok("abc".to_string()));
    }

    #[test]
    fn missing_env_var_is_an_auth_error() {
        let source = EnvToken::new("DOCMARK_TEST_TOKEN_THAT_IS_NEVER_SET");
        assert_eq!(
            source.token(),
            Err(AuthError::MissingToken(
                "DOCMARK_TEST_TOKEN_THAT_IS_NEVER_SET".to_string()
            ))
        );
    }
}
