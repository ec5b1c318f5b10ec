use std::fmt;
use std::time::{Duration, SystemTime};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Identity pair presented to the identity provider. Never mutated after construction.
#[derive(Clone)]
pub struct Credential {
    corp_id: String,
    corp_secret: SecretString,
}

impl Credential {
    pub fn new(corp_id: impl Into<String>, corp_secret: SecretString) -> Self {
        Self {
            corp_id: corp_id.into(),
            corp_secret,
        }
    }

    pub fn corp_id(&self) -> &str {
        &self.corp_id
    }

    pub fn corp_secret(&self) -> &str {
        self.corp_secret.expose_secret()
    }

    pub fn is_complete(&self) -> bool {
        !self.corp_id.is_empty() && !self.corp_secret.expose_secret().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("corp_id", &self.corp_id)
            .field("corp_secret", &"[REDACTED]")
            .finish()
    }
}

/// A token as handed back by the identity provider, before it is cached.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub value: String,
    pub expires_in: Duration,
}

/// Serializable view of the cache used for diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenSnapshot {
    pub value: String,
    pub expires_at: jiff::Timestamp,
}

/// Cached access token and the instant after which it must not be handed out.
#[derive(Clone, Debug)]
pub struct CachedToken {
    value: String,
    expires_at: SystemTime,
}

impl Default for CachedToken {
    fn default() -> Self {
        Self::empty()
    }
}

impl CachedToken {
    /// No token, expiry in the past.
    pub fn empty() -> Self {
        Self {
            value: String::new(),
            expires_at: SystemTime::UNIX_EPOCH,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    /// Returns the token when present and `now` is strictly before its expiry.
    pub fn valid_at(&self, now: SystemTime) -> Option<&str> {
        if !self.value.is_empty() && now < self.expires_at {
            Some(&self.value)
        } else {
            None
        }
    }

    /// Stores a freshly issued token expiring `issued.expires_in` after `now`.
    ///
    /// A lifetime the clock cannot represent is rejected and leaves the cache as it was.
    pub fn replace(&mut self, issued: IssuedToken, now: SystemTime) -> Result<&str, AuthError> {
        let expires_at = now
            .checked_add(issued.expires_in)
            .ok_or_else(|| AuthError::Rejected {
                code: 0,
                message: format!("expires_in out of range: {}s", issued.expires_in.as_secs()),
            })?;
        self.value = issued.value;
        self.expires_at = expires_at;
        Ok(&self.value)
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    pub fn to_snapshot(&self) -> Option<TokenSnapshot> {
        if self.value.is_empty() {
            return None;
        }
        let expires_at = jiff::Timestamp::try_from(self.expires_at).ok()?;
        Some(TokenSnapshot {
            value: self.value.clone(),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued(value: &str, secs: u64) -> IssuedToken {
        IssuedToken {
            value: value.into(),
            expires_in: Duration::from_secs(secs),
        }
    }

    #[test]
    fn empty_token_is_never_valid() {
        let token = CachedToken::empty();
        assert!(token.is_empty());
        assert!(token.valid_at(SystemTime::UNIX_EPOCH).is_none());
        assert!(token.to_snapshot().is_none());
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = SystemTime::now();
        let mut token = CachedToken::empty();
        token.replace(issued("T", 10), now).unwrap();

        assert_eq!(token.valid_at(now), Some("T"));
        assert_eq!(token.valid_at(now + Duration::from_secs(9)), Some("T"));
        assert!(token.valid_at(now + Duration::from_secs(10)).is_none());
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut token = CachedToken::empty();
        token.replace(issued("T", 7200), SystemTime::now()).unwrap();
        assert!(token.to_snapshot().is_some());
        token.clear();
        assert!(token.is_empty());
    }

    #[test]
    fn unrepresentable_lifetime_keeps_previous_token() {
        let now = SystemTime::now();
        let mut token = CachedToken::empty();
        token.replace(issued("old", 60), now).unwrap();

        let err = token.replace(issued("huge", u64::MAX), now).unwrap_err();
        assert!(err.message().contains("expires_in out of range"));
        assert_eq!(token.valid_at(now), Some("old"));
        assert_eq!(token.expires_at(), now + Duration::from_secs(60));
    }

    #[test]
    fn credential_debug_hides_secret() {
        let cred = Credential::new("corp", SecretString::new("s3cr3t".into()));
        let rendered = format!("{cred:?}");
        assert!(rendered.contains("corp"));
        assert!(!rendered.contains("s3cr3t"));
        assert!(cred.is_complete());
        assert!(!Credential::new("", SecretString::new("x".into())).is_complete());
    }
}
