use async_trait::async_trait;
use gigbook_shared::{User, UserId};
use std::collections::HashMap;

/// Resolves display data for user ids. Consumed for display only.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(
        &self,
        id: UserId,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Fixed set of users, loaded once.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserDirectory {
    users: HashMap<UserId, User>,
}

impl InMemoryUserDirectory {
    pub fn new(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user(
        &self,
        id: UserId,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let user = self.users.get(&id).cloned();
        if user.is_none() {
            tracing::debug!("User {} not in directory", id);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup() {
        let directory = InMemoryUserDirectory::new(vec![User::new(1, "Ada"), User::new(2, "Bo")]);
        let found = directory.find_user(UserId(2)).await.unwrap();
        assert_eq!(found.map(|u| u.display_name), Some("Bo".to_string()));
        assert!(directory.find_user(UserId(3)).await.unwrap().is_none());
    }
}
