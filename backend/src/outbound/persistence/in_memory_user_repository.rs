//! In-memory `UserRepository` adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserFilter, UserPatch, UserRepository, UserRepositoryError};
use crate::domain::{EmailAddress, User, UserId};

/// User documents keyed by id. Email addresses are unique across the store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Empty user store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, rejecting duplicate ids or emails.
    pub async fn with_users(
        users: impl IntoIterator<Item = User>,
    ) -> Result<Self, UserRepositoryError> {
        let repository = Self::new();
        for user in users {
            repository.insert(&user).await?;
        }
        Ok(repository)
    }
}

fn email_taken_by_other(
    users: &HashMap<UserId, User>,
    email: &EmailAddress,
    owner: &UserId,
) -> bool {
    users
        .values()
        .any(|user| user.email() == email && user.id() != owner)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email() == email).cloned())
    }

    async fn query(&self, query: &UserFilter) -> Result<Vec<User>, UserRepositoryError> {
        let users = self.users.read().await;
        let mut matched: Vec<User> = users
            .values()
            .filter(|user| query.matches(user))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(matched)
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.id()) {
            return Err(UserRepositoryError::duplicate(format!("id {}", user.id())));
        }
        if email_taken_by_other(&users, user.email(), user.id()) {
            return Err(UserRepositoryError::duplicate(format!(
                "email {}",
                user.email()
            )));
        }
        users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write().await;
        if let Some(contact) = &patch.contact
            && email_taken_by_other(&users, &contact.email, id)
        {
            return Err(UserRepositoryError::duplicate(format!(
                "email {}",
                contact.email
            )));
        }
        let user = users
            .get_mut(id)
            .ok_or_else(|| UserRepositoryError::query(format!("user {id} does not exist")))?;
        patch.apply_to(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, ServiceName, ServiceStatus};
    use crate::test_support::users::{UserBuilder, epoch};
    use chrono::Duration;
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn insert_then_lookup_by_id_and_email(repository: InMemoryUserRepository) {
        let user = UserBuilder::recipient().email("dana@example.org").build();
        repository.insert(&user).await.expect("insert succeeds");

        assert_eq!(repository.get(user.id()).await, Ok(Some(user.clone())));
        let email = EmailAddress::new("DANA@example.org").expect("valid email");
        assert_eq!(repository.find_by_email(&email).await, Ok(Some(user)));
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_taken_id_and_email(repository: InMemoryUserRepository) {
        let user = UserBuilder::recipient().email("dana@example.org").build();
        repository.insert(&user).await.expect("insert succeeds");

        let same_id = UserBuilder::recipient().id(user.id().clone()).build();
        let same_email = UserBuilder::volunteer().email("dana@example.org").build();
        assert!(matches!(
            repository.insert(&same_id).await,
            Err(UserRepositoryError::Duplicate { .. })
        ));
        assert!(matches!(
            repository.insert(&same_email).await,
            Err(UserRepositoryError::Duplicate { .. })
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_user_is_a_query_error(repository: InMemoryUserRepository) {
        let err = repository
            .update(&UserId::random(), &UserPatch::empty(epoch()))
            .await
            .expect_err("missing user");
        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_rejects_email_owned_by_someone_else(repository: InMemoryUserRepository) {
        let first = UserBuilder::recipient().email("first@example.org").build();
        let mut second = UserBuilder::recipient().email("second@example.org").build();
        repository.insert(&first).await.expect("insert first");
        repository.insert(&second).await.expect("insert second");

        let mut contact = second.contact().clone();
        contact.email = first.email().clone();
        second.set_contact(contact);
        let err = repository
            .update(second.id(), &UserPatch::full(&second))
            .await
            .expect_err("email collision");
        assert!(matches!(err, UserRepositoryError::Duplicate { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn services_patch_is_visible_to_later_reads(repository: InMemoryUserRepository) {
        let mut user = UserBuilder::recipient()
            .service("Cooking", ServiceStatus::NeedAssistance)
            .build();
        repository.insert(&user).await.expect("insert succeeds");
        let cooking = ServiceName::new("Cooking").expect("valid name");
        user.set_service_status(cooking.clone(), ServiceStatus::InProgress);

        let later = epoch() + Duration::minutes(1);
        repository
            .update(user.id(), &UserPatch::services_of(&user, later))
            .await
            .expect("update succeeds");

        let stored = repository
            .get(user.id())
            .await
            .expect("read succeeds")
            .expect("user present");
        assert_eq!(stored.service_status(&cooking), Some(ServiceStatus::InProgress));
        assert_eq!(stored.updated_at(), later);
    }

    #[rstest]
    #[tokio::test]
    async fn query_filters_by_role() {
        let recipient = UserBuilder::recipient().build();
        let volunteer = UserBuilder::volunteer().build();
        let repository = InMemoryUserRepository::with_users([recipient.clone(), volunteer])
            .await
            .expect("seeded");

        let recipients = repository
            .query(&UserFilter::recipients())
            .await
            .expect("query succeeds");
        assert_eq!(recipients, vec![recipient]);
        assert!(recipients.iter().all(|user| user.role() == Role::Recipient));
    }
}
