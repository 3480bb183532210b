//! Catalog domain
//!
//! Products, reviews and the gender-blended storefront listing, backed by
//! MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Listing algorithm, validation, rating invariant
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, query parsing
//! └─────────────┘
//! ```
//!
//! The listing is the heart of the domain: when a gender is requested that
//! segment fills the page first and the opposite segment backfills the rest,
//! with pure window arithmetic in [`pagination`] deciding how each page
//! splits across the two segments.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod pagination;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use handlers::{ApiDoc, ReviewsApiDoc};
pub use models::{
    CreateProduct, FilterOptions, Gender, ListParams, Product, ProductDetail, ProductListing,
    ProductPage, ProductQuery, ProductReview, SizeEntry, SizeType, UpdateProduct, UserReview,
    WriteReviewRequest,
};
pub use mongodb::MongoCatalogRepository;
pub use pagination::{split_page, total_pages, Window};
pub use repository::CatalogRepository;
pub use service::CatalogService;
