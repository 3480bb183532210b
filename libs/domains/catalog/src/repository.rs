use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::{
    CreateProduct, FilterOptions, Gender, Product, ProductDetail, ProductListing, ProductQuery,
    ProductReview, UpdateProduct, UserReview,
};
use crate::pagination::Window;

/// Repository trait for catalog persistence
///
/// Gender is passed alongside the query rather than inside it: the listing
/// algorithm counts and fetches each segment separately, while the grand
/// total ignores the segment split entirely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Create a new product
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>>;

    /// Get a product with its reviews and reviewer names
    async fn get_detail(&self, id: Uuid) -> CatalogResult<Option<ProductDetail>>;

    /// Update an existing product
    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product>;

    /// Delete a product by ID
    async fn delete(&self, id: Uuid) -> CatalogResult<()>;

    /// Count products matching the query filters, optionally narrowed to one
    /// gender segment. Never includes the text-search stage.
    async fn count_matching(
        &self,
        query: &ProductQuery,
        gender: Option<Gender>,
    ) -> CatalogResult<u64>;

    /// Fetch one window of the listing, reviews joined and live rating
    /// attached. Applies the text-search stage when the query carries a term.
    async fn fetch_window(
        &self,
        query: &ProductQuery,
        gender: Option<Gender>,
        window: Window,
    ) -> CatalogResult<Vec<ProductListing>>;

    /// Distinct categories, sizes and colors for the filter sidebar
    async fn filter_options(&self) -> CatalogResult<FilterOptions>;

    /// Distinct category values
    async fn categories(&self) -> CatalogResult<Vec<String>>;

    /// Get a review by ID
    async fn get_review(&self, id: Uuid) -> CatalogResult<Option<ProductReview>>;

    /// Find a user's review of a product, if any
    async fn find_review(&self, product: Uuid, user: Uuid)
        -> CatalogResult<Option<ProductReview>>;

    /// Insert a review and register it on the product document
    async fn insert_review(&self, review: ProductReview) -> CatalogResult<()>;

    /// Rewrite an existing review's rating and comment
    async fn update_review(
        &self,
        id: Uuid,
        rating: i32,
        comment: String,
    ) -> CatalogResult<ProductReview>;

    /// Delete a review and unregister it from the product document
    async fn remove_review(&self, review: &ProductReview) -> CatalogResult<()>;

    /// List a user's reviews with product summaries, newest first
    async fn user_reviews(&self, user: Uuid) -> CatalogResult<Vec<UserReview>>;

    /// Recompute and persist the cached average rating for a product.
    /// Returns the new value (0 when no reviews remain).
    async fn recompute_rating(&self, product: Uuid) -> CatalogResult<f64>;
}
