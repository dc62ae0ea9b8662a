use async_trait::async_trait;

use crate::domain::repository::UserRepository;
use crate::domain::user::UserId;
use crate::domain::validation;
use crate::error::{Error, Result};
use crate::infrastructure::jwt::TokenIssuer;
use crate::infrastructure::password::{hash_password, verify_password};

#[async_trait]
pub trait AuthService: Send + Sync + 'static {
    /// Creates the account and returns a fresh session token.
    async fn register(&self, email: &str, password: &str) -> Result<String>;
    async fn login(&self, email: &str, password: &str) -> Result<String>;
    /// Resolves a bearer token to its owner.
    fn authenticate(&self, token: &str) -> Result<UserId>;
}

#[derive(Clone)]
pub struct AuthServiceImpl<R: UserRepository> {
    repo: R,
    tokens: TokenIssuer,
}

impl<R: UserRepository> AuthServiceImpl<R> {
    pub fn new(repo: R, tokens: TokenIssuer) -> Self { Self { repo, tokens } }
}

#[async_trait]
impl<R: UserRepository> AuthService for AuthServiceImpl<R> {
    async fn register(&self, email: &str, password: &str) -> Result<String> {
        let email = validation::email(email)?;
        validation::password(password)?;
        let hash = hash_password(password)?;
        let user = self.repo.create_user(&email, &hash).await?;
        tracing::info!(user_id = user.id.0, "registered user");
        self.tokens.issue(user.id)
    }

    async fn login(&self, email: &str, password: &str) -> Result<String> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(Error::MissingCredentials);
        }
        let user = match self.repo.get_user_by_email(email).await {
            Ok(user) => user,
            Err(Error::UserNotFound) => return Err(Error::InvalidCredentials),
            Err(e) => return Err(e),
        };
        if !verify_password(password, &user.password_hash) {
            return Err(Error::InvalidCredentials);
        }
        self.tokens.issue(user.id)
    }

    fn authenticate(&self, token: &str) -> Result<UserId> { self.tokens.verify(token) }
}
