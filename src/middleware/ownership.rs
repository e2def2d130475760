use super::auth::Principal;
use crate::error::ApiError;

/// What the caller is trying to do with an owned resource
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::View => "View",
            Action::Create => "Create",
            Action::Update => "Update",
            Action::Delete => "Delete",
        }
    }
}

impl Principal {
    /// Allow the operation only when the principal is the owner.
    ///
    /// `family` names the resource in the rejection, e.g. `Collections`
    /// produces "Cannot View Other User's Collections".
    pub fn ensure_owner(&self, owner_id: i64, action: Action, family: &str) -> Result<(), ApiError> {
        if self.id == owner_id {
            return Ok(());
        }

        tracing::warn!(
            "User {} ({}) denied: {} {} of user {}",
            self.username,
            self.id,
            action.verb(),
            family,
            owner_id
        );
        Err(ApiError::forbidden(format!(
            "Cannot {} Other User's {}",
            action.verb(),
            family
        )))
    }
}
