use super::auth_service::{AuthService, AuthServiceImpl};
use crate::domain::{repository::UserRepository, user::{User, UserId}};
use crate::error::{Error, Result};
use crate::infrastructure::jwt::TokenIssuer;
use async_trait::async_trait;

#[derive(Clone, Default)]
struct InMemoryUsers {
    items: std::sync::Arc<std::sync::Mutex<Vec<User>>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let mut users = self.items.lock().unwrap();
        if users.iter().any(|u| u.email == email) { return Err(Error::DuplicateEmail) }
        let user = User { id: UserId(users.len() as i64 + 1), email: email.into(), password_hash: password_hash.into(), created_at: "2026-01-01T00:00:00.000Z".into() };
        users.push(user.clone());
        Ok(user)
    }
    async fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.items.lock().unwrap().iter().find(|u| u.email == email).cloned().ok_or(Error::UserNotFound)
    }
}

fn service() -> AuthServiceImpl<InMemoryUsers> {
    AuthServiceImpl::new(InMemoryUsers::default(), TokenIssuer::new("unit-secret"))
}

#[tokio::test]
async fn unit_register_then_login() {
    let service = service();
    let token = service.register("a@x.com", "pw123456").await.unwrap();
    assert_eq!(service.authenticate(&token).unwrap(), UserId(1));
    let again = service.login("a@x.com", "pw123456").await.unwrap();
    assert_eq!(service.authenticate(&again).unwrap(), UserId(1));
}

#[tokio::test]
async fn unit_register_validates_before_storing() {
    let users = InMemoryUsers::default();
    let service = AuthServiceImpl::new(users.clone(), TokenIssuer::new("unit-secret"));
    assert!(matches!(service.register("", "pw123456").await, Err(Error::EmailRequired)));
    assert!(matches!(service.register("nope", "pw123456").await, Err(Error::InvalidEmail)));
    assert!(matches!(service.register("a@x.com", "12345").await, Err(Error::PasswordTooShort)));
    assert!(users.items.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unit_duplicate_email() {
    let service = service();
    service.register("a@x.com", "pw123456").await.unwrap();
    assert!(matches!(service.register("a@x.com", "other-pw").await, Err(Error::DuplicateEmail)));
}

#[tokio::test]
async fn unit_login_failures_are_indistinguishable() {
    let service = service();
    service.register("a@x.com", "pw123456").await.unwrap();
    assert!(matches!(service.login("a@x.com", "wrong-pw").await, Err(Error::InvalidCredentials)));
    assert!(matches!(service.login("b@x.com", "pw123456").await, Err(Error::InvalidCredentials)));
    assert!(matches!(service.login("", "").await, Err(Error::MissingCredentials)));
}

