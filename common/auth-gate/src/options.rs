/// Behavioural toggles fixed when an [`Authenticator`](crate::Authenticator) is built.
///
/// Setters may be chained; the last call for a toggle wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthOptions {
    pub require_admin: bool,
}

impl AuthOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject authenticated callers that are not admins with 403.
    pub fn only_admin(self) -> Self {
        self.require_admin(true)
    }

    pub fn require_admin(mut self, enabled: bool) -> Self {
        self.require_admin = enabled;
        self
    }
}
