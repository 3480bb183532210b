use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// One line of a user's shopping cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    /// Product id
    pub product: Uuid,
    /// Units of this size
    pub quantity: i32,
    /// Size label the customer picked
    pub size: String,
}

/// A saved shipping address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Address {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(length(min = 1, max = 30))]
    pub phone: String,
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 20))]
    pub zip: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

/// User entity - represents an account stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Unique handle
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Argon2 hash; persisted, but clients only ever see [`UserResponse`]
    pub password_hash: String,
    /// Self-reported gender, free-form
    #[serde(default)]
    pub gender: Option<String>,
    /// Administrative privileges
    #[serde(default)]
    pub is_admin: bool,
    /// Shopping cart lines
    #[serde(default)]
    pub cart: Vec<CartItem>,
    /// Saved shipping addresses
    #[serde(default)]
    pub saved_addresses: Vec<Address>,
    /// Ids of orders placed by this user
    #[serde(default)]
    pub orders: Vec<Uuid>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Account view returned to clients (no password hash)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub gender: Option<String>,
    pub is_admin: bool,
    pub cart: Vec<CartItem>,
    pub saved_addresses: Vec<Address>,
    pub orders: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            gender: user.gender,
            is_admin: user.is_admin,
            cart: user.cart,
            saved_addresses: user.saved_addresses,
            orders: user.orders,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for registering a new account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub gender: Option<String>,
}

/// DTO for logging in
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Identity attached to an authenticated session
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub is_admin: bool,
}

/// DTO for a partial profile update
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub gender: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

/// DTO for adding a cart line
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    pub product: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 20))]
    pub size: String,
}

/// DTO for changing a cart line's quantity
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Size selector for cart line updates
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SizeQuery {
    pub size: String,
}

/// Selector for removing a cart line
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartItemQuery {
    pub product_id: Uuid,
    pub size: String,
}

/// Compact product info joined into cart reads
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartProduct {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
}

/// A cart line with its product summary attached
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product: CartProduct,
    pub quantity: i32,
    pub size: String,
}

impl User {
    /// Create a new account from a registration request and password hash
    pub fn new(input: RegisterRequest, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            username: input.username,
            email: input.email,
            password_hash,
            gender: input.gender,
            is_admin: false,
            cart: Vec::new(),
            saved_addresses: Vec::new(),
            orders: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial profile update; the password hash is supplied
    /// separately when the password changes
    pub fn apply_update(&mut self, update: UpdateUserRequest, new_password_hash: Option<String>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(gender) = update.gender {
            self.gender = Some(gender);
        }
        if let Some(hash) = new_password_hash {
            self.password_hash = hash;
        }
        self.updated_at = Utc::now();
    }
}
