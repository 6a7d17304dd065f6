use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::accounts::AccountEntity;

#[async_trait]
#[automock]
pub trait AccountRepository {
    async fn find_by_username(&self, username: String) -> Result<Option<AccountEntity>>;
}
