use uuid::Uuid;

use crate::{
    model::{
        ModelManager,
        error::{DatabaseError, DatabaseResult},
    },
    web::AuthenticatedUser,
};

/// A row that belongs to exactly one user.
#[async_trait::async_trait]
pub trait HasOwner {
    async fn get_owner_id(&self, mm: &ModelManager, actor: &AuthenticatedUser)
    -> DatabaseResult<Uuid>;
}

/// Passes when `actor` owns `resource` or is an admin.
pub async fn check_access<T: HasOwner + Sync>(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    resource: &T,
) -> DatabaseResult<()> {
    // admin can get all resources
    if actor.is_admin() {
        return Ok(());
    }

    let owner = resource.get_owner_id(mm, actor).await?;
    if owner == actor.user_id() {
        Ok(())
    } else {
        Err(DatabaseError::Forbidden)
    }
}
