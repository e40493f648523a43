//! Authentication seam
//!
//! The session only needs two facts from the outside world: whether the
//! player is signed in, and what to call them. Real deployments plug a
//! provider in behind [`AuthProvider`]; the CLI uses [`StaticAuth`].

/// Display name used when the identity carries no usable name.
pub const DEFAULT_AGENT_NAME: &str = "AGENT";

/// Display identity of a signed-in player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Account username, preferred for display.
    pub username: Option<String>,
    /// First name, used when no username is set.
    pub first_name: Option<String>,
}

impl Identity {
    /// An identity with the given username.
    #[must_use]
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            first_name: None,
        }
    }

    /// Username, falling back to first name, falling back to
    /// [`DEFAULT_AGENT_NAME`].
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.first_name.as_deref())
            .unwrap_or(DEFAULT_AGENT_NAME)
    }
}

/// External authentication provider.
pub trait AuthProvider: Send + Sync {
    /// Whether a player is currently signed in.
    fn is_authenticated(&self) -> bool;

    /// The signed-in player's identity, if any.
    fn identity(&self) -> Option<Identity>;
}

/// Fixed-identity provider for the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    identity: Option<Identity>,
}

impl StaticAuth {
    /// A provider signed in under `username`.
    #[must_use]
    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity::named(username)),
        }
    }

    /// A provider with no signed-in player.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self { identity: None }
    }
}

impl AuthProvider for StaticAuth {
    fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    fn identity(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_username() {
        let identity = Identity {
            username: Some("neo".to_string()),
            first_name: Some("Thomas".to_string()),
        };
        assert_eq!(identity.display_name(), "neo");
    }

    #[test]
    fn test_display_name_falls_back_to_first_name() {
        let identity = Identity {
            username: None,
            first_name: Some("Thomas".to_string()),
        };
        assert_eq!(identity.display_name(), "Thomas");
    }

    #[test]
    fn test_display_name_default_agent() {
        assert_eq!(Identity::default().display_name(), "AGENT");
    }

    #[test]
    fn test_static_auth_signed_in() {
        let auth = StaticAuth::signed_in("neo");
        assert!(auth.is_authenticated());
        assert_eq!(auth.identity().unwrap().display_name(), "neo");
    }

    #[test]
    fn test_static_auth_signed_out() {
        let auth = StaticAuth::signed_out();
        assert!(!auth.is_authenticated());
        assert!(auth.identity().is_none());
    }
}
