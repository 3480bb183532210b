use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Product gender segment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// The other segment, used to backfill short pages
    pub fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }
}

/// How a product is sized
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SizeType {
    #[default]
    Clothing,
    Shoes,
}

/// A single size variant with its stocked quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SizeEntry {
    /// Size label ("M", "42", ...)
    pub size: String,
    /// Units available in this size
    #[serde(default)]
    pub quantity: i32,
}

/// Product entity - represents a product stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Product name
    pub name: String,
    /// Brand name
    pub brand: String,
    /// Unit price
    pub price: f64,
    /// Sizing scheme for this product
    pub size_type: SizeType,
    /// Available sizes
    #[serde(default)]
    pub sizes: Vec<SizeEntry>,
    /// Primary color
    pub color: String,
    /// Target gender segment
    pub gender: Gender,
    /// Category label (free-form, drives the facet filters)
    pub category: String,
    /// Discount percentage (0 when not on sale)
    #[serde(default)]
    pub discount: f64,
    /// Image reference (opaque string, typically a URL or asset key)
    pub image: String,
    /// Ids of reviews written for this product
    #[serde(default)]
    pub reviews: Vec<Uuid>,
    /// Cached average rating, 0 when the product has no reviews
    #[serde(default)]
    pub rating: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A customer review of a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductReview {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Reviewed product id
    pub product: Uuid,
    /// Author user id
    pub user: Uuid,
    /// Star rating, 1 to 5
    pub rating: i32,
    /// Review text
    pub comment: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub size_type: SizeType,
    #[serde(default)]
    pub sizes: Vec<SizeEntry>,
    #[validate(length(min = 1, max = 50))]
    pub color: String,
    pub gender: Gender,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default)]
    pub discount: f64,
    #[validate(length(min = 1))]
    pub image: String,
}

/// DTO for updating an existing product
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub size_type: Option<SizeType>,
    pub sizes: Option<Vec<SizeEntry>>,
    #[validate(length(min = 1, max = 50))]
    pub color: Option<String>,
    pub gender: Option<Gender>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: Option<f64>,
    #[validate(length(min = 1))]
    pub image: Option<String>,
}

/// Raw query parameters for the product listing endpoint.
///
/// Everything arrives as an optional string; parsing is deliberately
/// forgiving (see `ProductQuery::from_params`), so a malformed value never
/// fails the request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
pub struct ListParams {
    /// Page number (1-based)
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// Gender segment to show first ("Male" or "Female")
    pub gender: Option<String>,
    /// Filter by category
    pub category: Option<String>,
    /// Filter by brand
    pub brand: Option<String>,
    /// Filter by available size label
    pub size: Option<String>,
    /// Filter by color
    pub color: Option<String>,
    /// Minimum price
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    /// Maximum price
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    /// Fuzzy text search term
    pub search: Option<String>,
}

/// Parsed and defaulted listing query
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub page: i64,
    pub limit: i64,
    pub gender: Option<Gender>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
}

impl ProductQuery {
    /// Parse raw listing params leniently.
    ///
    /// Unparseable page/limit values fall back to 1/10, unparseable prices
    /// and unknown genders are dropped, and blank filters are ignored.
    pub fn from_params(params: ListParams) -> Self {
        let page = params
            .page
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 1)
            .unwrap_or(1);
        let limit = params
            .limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v >= 1)
            .unwrap_or(10);
        let gender = params
            .gender
            .as_deref()
            .and_then(|v| v.trim().parse::<Gender>().ok());

        let parse_price = |value: Option<&str>| {
            value
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
        };

        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Self {
            page,
            limit,
            gender,
            category: non_blank(params.category),
            brand: non_blank(params.brand),
            size: non_blank(params.size),
            color: non_blank(params.color),
            min_price: parse_price(params.min_price.as_deref()),
            max_price: parse_price(params.max_price.as_deref()),
            search: non_blank(params.search),
        }
    }

    /// Documents to skip for the requested page.
    ///
    /// Saturates instead of overflowing so an absurd page number yields an
    /// empty page, not a panic.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit) as u64
    }
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self::from_params(ListParams::default())
    }
}

/// A product row in a listing, with its reviews joined in.
///
/// `rating` here is the live average computed by the listing pipeline and is
/// null for products without reviews; it is distinct from the cached
/// `Product::rating` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListing {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub size_type: SizeType,
    #[serde(default)]
    pub sizes: Vec<SizeEntry>,
    pub color: String,
    pub gender: Gender,
    pub category: String,
    #[serde(default)]
    pub discount: f64,
    pub image: String,
    /// Full review documents joined from the reviews collection
    #[serde(default)]
    pub reviews: Vec<ProductReview>,
    /// Average of the joined review ratings, null when there are none
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Paged listing envelope
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<ProductListing>,
    pub total_pages: u64,
    pub current_page: i64,
    pub total_products: u64,
}

/// A review enriched with its author's display name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewWithAuthor {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user: Uuid,
    /// Author name, absent if the account was deleted
    pub name: Option<String>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A single product with its reviews and reviewer names
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub reviews: Vec<ReviewWithAuthor>,
}

/// Distinct facet values for the storefront filter sidebar
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}

/// DTO for writing (or rewriting) a review
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct WriteReviewRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

/// Compact product info shown next to a user's own review
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewedProduct {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub image: String,
    pub price: f64,
}

/// One of the caller's reviews, with the reviewed product attached
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserReview {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub product: ReviewedProduct,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product from CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            brand: input.brand,
            price: input.price,
            size_type: input.size_type,
            sizes: input.sizes,
            color: input.color,
            gender: input.gender,
            category: input.category,
            discount: input.discount,
            image: input.image,
            reviews: Vec::new(),
            rating: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateProduct DTO
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(brand) = update.brand {
            self.brand = brand;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(size_type) = update.size_type {
            self.size_type = size_type;
        }
        if let Some(sizes) = update.sizes {
            self.sizes = sizes;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(discount) = update.discount {
            self.discount = discount;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
        self.updated_at = Utc::now();
    }
}

impl ProductReview {
    /// Create a new review
    pub fn new(product: Uuid, user: Uuid, rating: i32, comment: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            product,
            user,
            rating,
            comment,
            created_at: now,
            updated_at: now,
        }
    }
}
