//! User registration, lookup and profile updates.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    NewUser, UserCommand, UserFilter, UserListFilter, UserPatch, UserRepository,
    UserRepositoryError, UserUpdate, UsersQuery,
};
use crate::domain::service_state;
use crate::domain::{
    AssistanceContext, AssistanceError, ContactDetails, EmailAddress, Error, Role, ServiceName,
    ServiceStatus, User, UserDraft, UserId, geo,
};

#[derive(Clone)]
pub struct UserService<U> {
    users: Arc<U>,
    context: AssistanceContext,
}

impl<U> UserService<U> {
    /// Build the service over `users`.
    pub fn new(users: Arc<U>, context: AssistanceContext) -> Self {
        Self { users, context }
    }
}

impl<U> UserService<U>
where
    U: UserRepository,
{
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AssistanceError> {
        self.context
            .deadline
            .run("users.find_by_email", self.users.find_by_email(email))
            .await
    }

    /// Register a user with a fresh id; `lastOK` starts at now.
    ///
    /// `IN_PROGRESS` is refused: a service only enters it through a meeting claim.
    pub async fn create_user(&self, request: NewUser) -> Result<User, AssistanceError> {
        if let Some((service, _)) = request
            .services
            .iter()
            .find(|(_, status)| **status == ServiceStatus::InProgress)
        {
            return Err(AssistanceError::invalid_input(
                "services",
                format!("{service} cannot be registered as {}", ServiceStatus::InProgress),
            ));
        }
        let now = self.context.clock.utc();
        let user = User::new(UserDraft {
            id: UserId::random(),
            role: request.role,
            contact: request.contact,
            languages: request.languages,
            services: request.services,
            location: request.location,
            last_ok: now,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| AssistanceError::invalid_input("user", err.to_string()))?;

        let email = user.email().clone();
        if self.find_by_email(&email).await?.is_some() {
            return Err(AssistanceError::EmailAlreadyRegistered { email });
        }
        match self
            .context
            .deadline
            .within("users.insert", self.users.insert(&user))
            .await?
        {
            Ok(()) => Ok(user),
            // Lost a race with a concurrent registration.
            Err(UserRepositoryError::Duplicate { .. }) => {
                Err(AssistanceError::EmailAlreadyRegistered { email })
            }
            Err(err) => Err(AssistanceError::StorageUnavailable {
                operation: "users.insert",
                message: err.to_string(),
            }),
        }
    }

    /// Load a user by id.
    pub async fn get_user(&self, id: &UserId) -> Result<User, AssistanceError> {
        self.context
            .deadline
            .run("users.get", self.users.get(id))
            .await?
            .ok_or_else(|| AssistanceError::UserNotFound {
                user_id: id.clone(),
            })
    }

    /// Load a user by email, matched case-insensitively.
    pub async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, AssistanceError> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| AssistanceError::UserEmailNotFound {
                email: email.clone(),
            })
    }

    /// Apply `update` under the user's lock.
    ///
    /// Recipient statuses go through the service state machine: asking for
    /// `NEED_ASSISTANCE` promotes, `DO_NOT_NEED_ASSISTANCE` resolves, and
    /// `IN_PROGRESS` is refused because only a meeting may claim a service.
    pub async fn update_user(
        &self,
        id: &UserId,
        update: UserUpdate,
    ) -> Result<User, AssistanceError> {
        let _guard = self.context.locks.lock(id).await;
        let mut user = self.get_user(id).await?;

        if let Some(contact) = update.contact {
            self.replace_contact(&mut user, contact).await?;
        }
        if let Some(languages) = update.languages {
            user.set_languages(languages);
        }
        if let Some(location) = update.location {
            user.set_location(location);
        }
        if let Some(last_ok) = update.last_ok {
            user.set_last_ok(last_ok);
        }
        if let Some(services) = update.services {
            apply_service_changes(&mut user, services)?;
        }
        user.touch(self.context.clock.utc());

        self.context
            .deadline
            .run("users.update", self.users.update(id, &UserPatch::full(&user)))
            .await?;
        Ok(user)
    }

    async fn replace_contact(
        &self,
        user: &mut User,
        contact: ContactDetails,
    ) -> Result<(), AssistanceError> {
        if contact.first_name.trim().is_empty() {
            return Err(AssistanceError::invalid_input(
                "firstName",
                "first name must not be empty",
            ));
        }
        if &contact.email != user.email() {
            let taken = self
                .find_by_email(&contact.email)
                .await?
                .is_some_and(|other| other.id() != user.id());
            if taken {
                return Err(AssistanceError::EmailAlreadyRegistered {
                    email: contact.email,
                });
            }
        }
        user.set_contact(contact);
        Ok(())
    }

    /// Users matching every supplied criterion.
    pub async fn list_users(&self, filter: &UserListFilter) -> Result<Vec<User>, AssistanceError> {
        let store_filter = UserFilter {
            role: filter.role,
            email: filter.email.clone(),
        };
        let users = self
            .context
            .deadline
            .run("users.query", self.users.query(&store_filter))
            .await?;
        Ok(users
            .into_iter()
            .filter(|user| {
                filter
                    .centre
                    .is_none_or(|centre| geo::is_nearby(&user.location(), &centre))
            })
            .filter(|user| {
                filter.requires_assistance.is_none_or(|wanted| {
                    user.has_service_in(ServiceStatus::NeedAssistance) == wanted
                })
            })
            .collect())
    }
}

fn apply_service_changes(
    user: &mut User,
    services: BTreeMap<ServiceName, ServiceStatus>,
) -> Result<(), AssistanceError> {
    let invalid = |service: &ServiceName, status: ServiceStatus| {
        AssistanceError::invalid_input(
            "services",
            format!("{service} cannot be set to {status} for a {}", user.role()),
        )
    };
    // Validate everything before touching the user.
    for (service, status) in &services {
        let allowed = match user.role() {
            Role::Recipient => matches!(
                status,
                ServiceStatus::NeedAssistance | ServiceStatus::DoNotNeedAssistance
            ),
            Role::Volunteer => status.is_valid_for(Role::Volunteer),
        };
        if !allowed {
            return Err(invalid(service, *status));
        }
    }

    for (service, status) in services {
        let outcome = match (user.role(), status) {
            (Role::Recipient, ServiceStatus::NeedAssistance) => {
                service_state::promote_to_need(user, &service).map(drop)
            }
            (Role::Recipient, _) => service_state::resolve(user, &service).map(drop),
            (Role::Volunteer, _) => {
                user.set_service_status(service.clone(), status);
                Ok(())
            }
        };
        outcome.map_err(|err| AssistanceError::invalid_input("services", err.to_string()))?;
    }
    Ok(())
}

#[async_trait]
impl<U> UserCommand for UserService<U>
where
    U: UserRepository,
{
    async fn create_user(&self, request: NewUser) -> Result<User, Error> {
        UserService::create_user(self, request)
            .await
            .map_err(Error::from)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, Error> {
        UserService::update_user(self, &id, update)
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<U> UsersQuery for UserService<U>
where
    U: UserRepository,
{
    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        UserService::get_user(self, id).await.map_err(Error::from)
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        UserService::get_user_by_email(self, email)
            .await
            .map_err(Error::from)
    }

    async fn list_users(&self, filter: UserListFilter) -> Result<Vec<User>, Error> {
        UserService::list_users(self, &filter)
            .await
            .map_err(Error::from)
    }
}
