use uuid::Uuid;

use crate::domain::repository::UserRepository;
use crate::domain::types::ProfileChanges;
use crate::error::ApiError;

pub struct UpdateAccountUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateAccountUseCase<U> {
    /// Apply a partial profile update; absent fields keep their value.
    pub async fn execute(&self, user_id: Uuid, changes: ProfileChanges) -> Result<(), ApiError> {
        if let Some(organization_id) = changes.organization_id {
            if !self.users.organization_exists(organization_id).await? {
                return Err(ApiError::ModelNotExist);
            }
        }
        self.users.update_profile(user_id, &changes).await
    }
}
