use async_trait::async_trait;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::{CartLine, User};

/// Repository trait for account persistence
///
/// Cart and address mutations go through `update`: the service edits the
/// embedded vectors on a fetched document and writes the whole account back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account
    async fn insert(&self, user: User) -> UserResult<User>;

    /// Get an account by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get an account by email
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// Check whether an email is already registered
    async fn email_exists(&self, email: &str) -> UserResult<bool>;

    /// Check whether a username is already taken
    async fn username_exists(&self, username: &str) -> UserResult<bool>;

    /// List all accounts
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Replace an account document
    async fn update(&self, user: User) -> UserResult<User>;

    /// Delete an account by ID
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// A user's cart with product summaries joined in
    async fn cart_with_products(&self, user: Uuid) -> UserResult<Vec<CartLine>>;
}
