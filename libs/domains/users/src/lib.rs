//! Users domain
//!
//! Accounts with embedded cart, saved addresses and order references,
//! cookie-based JWT sessions and argon2 password hashing, backed by MongoDB.
//!
//! Follows the layered pattern: models → repository (trait + MongoDB
//! implementation) → service → handlers. Auth endpoints live in
//! [`auth_handlers`], everything else in [`handlers`].

pub mod auth_handlers;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use auth_handlers::{auth_router, AuthApiDoc};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    AddToCartRequest, Address, AuthResponse, CartItem, CartLine, CartProduct, LoginRequest,
    RegisterRequest, UpdateCartItemRequest, UpdateUserRequest, User, UserResponse,
};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
