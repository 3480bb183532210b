//! User service - accounts, credentials, cart and addresses

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    AddToCartRequest, Address, CartItem, CartLine, LoginRequest, RegisterRequest,
    UpdateUserRequest, User, UserResponse,
};
use crate::repository::UserRepository;

/// User service providing account, auth, cart and address operations
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new UserService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new account
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if self.repository.email_exists(&input.email).await? {
            return Err(UserError::EmailExists);
        }
        if self.repository.username_exists(&input.username).await? {
            return Err(UserError::UsernameExists);
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input, password_hash);

        self.repository.insert(user).await
    }

    /// Verify credentials for login.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// response does not reveal which accounts exist.
    #[instrument(skip(self, input))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<User> {
        let user = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Get an account by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;
        Ok(user.into())
    }

    /// List all accounts
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Update a profile. Users may update themselves; admins may update
    /// anyone.
    #[instrument(skip(self, input))]
    pub async fn update_user(
        &self,
        caller: Uuid,
        caller_is_admin: bool,
        id: Uuid,
        input: UpdateUserRequest,
    ) -> UserResult<UserResponse> {
        if caller != id && !caller_is_admin {
            return Err(UserError::Forbidden(
                "You can only update your own profile".to_string(),
            ));
        }

        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let Some(ref new_email) = input.email {
            if !new_email.eq_ignore_ascii_case(&user.email)
                && self.repository.email_exists(new_email).await?
            {
                return Err(UserError::EmailExists);
            }
        }

        let new_password_hash = match input.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };

        user.apply_update(input, new_password_hash);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Delete an account (admin)
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Add an item to the cart. A line with the same product and size has its
    /// quantity incremented instead of being duplicated.
    #[instrument(skip(self, input), fields(product_id = %input.product))]
    pub async fn add_to_cart(&self, user_id: Uuid, input: AddToCartRequest) -> UserResult<()> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        match user
            .cart
            .iter_mut()
            .find(|line| line.product == input.product && line.size == input.size)
        {
            Some(line) => line.quantity += input.quantity,
            None => user.cart.push(CartItem {
                product: input.product,
                quantity: input.quantity,
                size: input.size,
            }),
        }
        user.updated_at = chrono::Utc::now();

        self.repository.update(user).await?;
        Ok(())
    }

    /// The caller's cart with product summaries
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: Uuid) -> UserResult<Vec<CartLine>> {
        self.repository.cart_with_products(user_id).await
    }

    /// Set the quantity of an existing cart line
    #[instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        user_id: Uuid,
        product: Uuid,
        size: &str,
        quantity: i32,
    ) -> UserResult<()> {
        if quantity < 1 {
            return Err(UserError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let mut user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let line = user
            .cart
            .iter_mut()
            .find(|line| line.product == product && line.size == size)
            .ok_or(UserError::CartItemNotFound)?;
        line.quantity = quantity;
        user.updated_at = chrono::Utc::now();

        self.repository.update(user).await?;
        Ok(())
    }

    /// Remove a cart line by product and size
    #[instrument(skip(self))]
    pub async fn remove_cart_item(
        &self,
        user_id: Uuid,
        product: Uuid,
        size: &str,
    ) -> UserResult<()> {
        let mut user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let before = user.cart.len();
        user.cart
            .retain(|line| !(line.product == product && line.size == size));
        if user.cart.len() == before {
            return Err(UserError::CartItemNotFound);
        }
        user.updated_at = chrono::Utc::now();

        self.repository.update(user).await?;
        Ok(())
    }

    /// Append a saved address
    #[instrument(skip(self, address))]
    pub async fn add_address(&self, user_id: Uuid, address: Address) -> UserResult<Vec<Address>> {
        address
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        user.saved_addresses.push(address);
        user.updated_at = chrono::Utc::now();

        let updated = self.repository.update(user).await?;
        Ok(updated.saved_addresses)
    }

    /// The caller's saved addresses
    #[instrument(skip(self))]
    pub async fn list_addresses(&self, user_id: Uuid) -> UserResult<Vec<Address>> {
        let user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;
        Ok(user.saved_addresses)
    }

    /// Replace a saved address by its position
    #[instrument(skip(self, address))]
    pub async fn update_address(
        &self,
        user_id: Uuid,
        index: usize,
        address: Address,
    ) -> UserResult<Vec<Address>> {
        address
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let slot = user
            .saved_addresses
            .get_mut(index)
            .ok_or(UserError::AddressOutOfRange(index))?;
        *slot = address;
        user.updated_at = chrono::Utc::now();

        let updated = self.repository.update(user).await?;
        Ok(updated.saved_addresses)
    }

    /// Remove a saved address by its position
    #[instrument(skip(self))]
    pub async fn delete_address(&self, user_id: Uuid, index: usize) -> UserResult<Vec<Address>> {
        let mut user = self
            .repository
            .get_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        if index >= user.saved_addresses.len() {
            return Err(UserError::AddressOutOfRange(index));
        }
        user.saved_addresses.remove(index);
        user.updated_at = chrono::Utc::now();

        let updated = self.repository.update(user).await?;
        Ok(updated.saved_addresses)
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

// Password helpers

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: "Ada".into(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            password: "correct-horse-1".into(),
            gender: None,
        }
    }

    fn stored_user(password: &str) -> User {
        User::new(register_request(), hash_password(password).unwrap())
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("s3cret-enough").unwrap();
        assert!(verify_password("s3cret-enough", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(true));

        let service = UserService::new(repo);
        let result = service.register(register_request()).await;

        assert!(matches!(result, Err(UserError::EmailExists)));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_username_exists().returning(|_| Ok(true));

        let service = UserService::new(repo);
        let result = service.register(register_request()).await;

        assert!(matches!(result, Err(UserError::UsernameExists)));
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_exists().returning(|_| Ok(false));
        repo.expect_username_exists().returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|user| {
                user.password_hash != "correct-horse-1" && !user.is_admin
            })
            .returning(Ok);

        let service = UserService::new(repo);
        let user = service.register(register_request()).await.unwrap();

        assert!(verify_password("correct-horse-1", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_login_same_error_for_unknown_email_and_bad_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Ok(None));

        let service = UserService::new(repo);
        let unknown = service
            .login(LoginRequest {
                email: "ghost@example.com".into(),
                password: "whatever".into(),
            })
            .await;
        assert!(matches!(unknown, Err(UserError::InvalidCredentials)));

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Ok(Some(stored_user("right-password1"))));

        let service = UserService::new(repo);
        let wrong = service
            .login(LoginRequest {
                email: "ada@example.com".into(),
                password: "wrong-password1".into(),
            })
            .await;
        assert!(matches!(wrong, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_succeeds_with_correct_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email()
            .returning(|_| Ok(Some(stored_user("right-password1"))));

        let service = UserService::new(repo);
        let user = service
            .login(LoginRequest {
                email: "ada@example.com".into(),
                password: "right-password1".into(),
            })
            .await
            .unwrap();

        assert_eq!(user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_add_to_cart_merges_same_product_and_size() {
        let mut user = stored_user("pw-irrelevant1");
        let product = Uuid::now_v7();
        user.cart.push(CartItem {
            product,
            quantity: 1,
            size: "M".into(),
        });
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update()
            .withf(move |u| {
                u.cart.len() == 1 && u.cart[0].quantity == 3 && u.cart[0].size == "M"
            })
            .times(1)
            .returning(Ok);

        let service = UserService::new(repo);
        service
            .add_to_cart(
                user_id,
                AddToCartRequest {
                    product,
                    quantity: 2,
                    size: "M".into(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_to_cart_pushes_new_line_for_different_size() {
        let mut user = stored_user("pw-irrelevant1");
        let product = Uuid::now_v7();
        user.cart.push(CartItem {
            product,
            quantity: 1,
            size: "M".into(),
        });
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update()
            .withf(|u| u.cart.len() == 2)
            .times(1)
            .returning(Ok);

        let service = UserService::new(repo);
        service
            .add_to_cart(
                user_id,
                AddToCartRequest {
                    product,
                    quantity: 1,
                    size: "L".into(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_cart_item_missing_line_is_not_found() {
        let user = stored_user("pw-irrelevant1");
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update().times(0);

        let service = UserService::new(repo);
        let result = service
            .remove_cart_item(user_id, Uuid::now_v7(), "M")
            .await;

        assert!(matches!(result, Err(UserError::CartItemNotFound)));
    }

    #[tokio::test]
    async fn test_update_user_forbidden_for_other_non_admin() {
        let repo = MockUserRepository::new();
        let service = UserService::new(repo);

        let result = service
            .update_user(
                Uuid::now_v7(),
                false,
                Uuid::now_v7(),
                UpdateUserRequest::default(),
            )
            .await;

        assert!(matches!(result, Err(UserError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_user_allowed_for_admin() {
        let user = stored_user("pw-irrelevant1");
        let target = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update()
            .withf(|u| u.name == "Renamed")
            .times(1)
            .returning(Ok);

        let service = UserService::new(repo);
        service
            .update_user(
                Uuid::now_v7(),
                true,
                target,
                UpdateUserRequest {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    fn address() -> Address {
        Address {
            full_name: "Ada Lovelace".into(),
            phone: "555-0100".into(),
            street: "1 Analytical Way".into(),
            city: "London".into(),
            state: "LDN".into(),
            zip: "E1".into(),
            country: "UK".into(),
        }
    }

    #[tokio::test]
    async fn test_update_address_out_of_range_is_not_found() {
        let user = stored_user("pw-irrelevant1");
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update().times(0);

        let service = UserService::new(repo);
        let result = service.update_address(user_id, 0, address()).await;

        assert!(matches!(result, Err(UserError::AddressOutOfRange(0))));
    }

    #[tokio::test]
    async fn test_delete_address_removes_by_index() {
        let mut user = stored_user("pw-irrelevant1");
        user.saved_addresses.push(address());
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update()
            .withf(|u| u.saved_addresses.is_empty())
            .times(1)
            .returning(Ok);

        let service = UserService::new(repo);
        let remaining = service.delete_address(user_id, 0).await.unwrap();
        assert!(remaining.is_empty());
    }
}
