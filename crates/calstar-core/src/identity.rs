//! Contract with the external identity provider.
//!
//! Credentials, sessions and token validation belong to the provider. A
//! [`crate::models::user::Model`] only keeps the provider's opaque handle and
//! the username/email it reported when the user was first recorded.

/// What the identity provider must expose about an authenticated principal.
pub trait Identity {
    /// Stable, opaque key for the principal within the provider.
    fn handle(&self) -> &str;
    fn username(&self) -> &str;
    fn email(&self) -> &str;
}

/// Plain identity record, for providers that hand over owned values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseIdentity {
    pub handle: String,
    pub username: String,
    pub email: String,
}

impl BaseIdentity {
    pub fn new(
        handle: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        BaseIdentity {
            handle: handle.into(),
            username: username.into(),
            email: email.into(),
        }
    }
}

impl Identity for BaseIdentity {
    fn handle(&self) -> &str {
        &self.handle
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn email(&self) -> &str {
        &self.email
    }
}
