use std::fmt;

/// Opaque credential issued by the third-party identity provider.
///
/// The token is never interpreted by this crate; it is attached verbatim to
/// authenticated requests and to the push channel handshake.
#[derive(Clone)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw token value, for an Authorization header or a handshake parameter.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keep credentials out of logs.
        f.write_str("AuthToken(..)")
    }
}

/// Caller identity for authenticated operations.
///
/// Created at sign-in, dropped at sign-out. Both the data API client and the
/// push channel receive the session at construction time; there is no
/// ambient global.
#[derive(Debug, Clone)]
pub struct Session {
    token: AuthToken,
}

impl Session {
    pub fn sign_in(token: AuthToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }
}
