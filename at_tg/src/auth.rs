use teloxide::types::UserId;

/// Lets only the configured administrator through
#[derive(Clone, Debug)]
pub struct AdminGuard {
    admin: UserId,
}

impl AdminGuard {
    pub fn new(admin_id: u64) -> Self {
        Self { admin: UserId(admin_id) }
    }

    pub fn admin(&self) -> UserId {
        self.admin
    }

    /// Check if user is the administrator, logging rejected attempts
    pub fn is_authorized(&self, user_id: &UserId) -> bool {
        let authorized = *user_id == self.admin;
        if !authorized {
            tracing::warn!("Unauthorized access attempt from user {user_id}");
        }
        authorized
    }
}
