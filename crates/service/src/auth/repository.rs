use async_trait::async_trait;
use models::user::Role;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, name: &str, email: &str, password_hash: &str, role: Role) -> Result<AuthUser, AuthError>;
    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<Uuid, (AuthUser, String)>>, // key: user_id, value: (user, password hash)
    }

    impl MockAuthRepository {
        fn users(&self) -> Result<MutexGuard<'_, HashMap<Uuid, (AuthUser, String)>>, AuthError> {
            self.users.lock().map_err(|e| AuthError::Repository(e.to_string()))
        }

        /// Drop a user, simulating deletion by an administrator.
        pub fn remove(&self, id: Uuid) {
            if let Ok(mut users) = self.users.lock() {
                users.remove(&id);
            }
        }

        /// Change a stored role behind the service's back.
        pub fn set_role(&self, id: Uuid, role: Role) {
            if let Ok(mut users) = self.users.lock() {
                if let Some((u, _)) = users.get_mut(&id) {
                    u.role = role;
                }
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users()?;
            Ok(users.values().find(|(u, _)| u.email == email).map(|(u, _)| u.clone()))
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users()?;
            Ok(users.get(&id).map(|(u, _)| u.clone()))
        }

        async fn create_user(&self, name: &str, email: &str, password_hash: &str, role: Role) -> Result<AuthUser, AuthError> {
            let mut users = self.users()?;
            if users.values().any(|(u, _)| u.email == email) {
                return Err(AuthError::Conflict);
            }
            let user = AuthUser { id: Uuid::new_v4(), name: name.to_string(), email: email.to_string(), role };
            users.insert(user.id, (user.clone(), password_hash.to_string()));
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let users = self.users()?;
            Ok(users
                .get(&user_id)
                .map(|(_, hash)| Credentials { user_id, password_hash: hash.clone() }))
        }
    }
}
