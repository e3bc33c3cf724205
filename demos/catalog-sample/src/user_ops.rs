//! Sample operations exposed to the catalog.

use callable_catalog::callables;
use tracing::info;

/// User administration operations.
#[derive(Debug, Default)]
pub struct UserOps {
    reimports: u32,
}

#[callables]
impl UserOps {
    #[callable("Triggers a manual user reimport", false)]
    pub fn reimport_user(&mut self, user_id: i32) {
        self.reimports += 1;
        info!(user_id, "reimporting user");
    }

    #[callable("Get user information", true)]
    pub fn get_user_details(&self, user_id: i32) -> String {
        info!(user_id, "getting user details");
        format!("{{ id: {user_id}, name: \"Sample User\", email: \"user@example.com\" }}")
    }

    /// Not exposed to the catalog.
    pub fn non_callable_method(&self) {
        info!(reimports = self.reimports, "this method should not be discovered");
    }
}
