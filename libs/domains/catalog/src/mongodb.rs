//! MongoDB implementation of CatalogRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, from_document, to_bson, Bson, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, FilterOptions, Gender, Product, ProductDetail, ProductListing, ProductQuery,
    ProductReview, ReviewWithAuthor, UpdateProduct, UserReview,
};
use crate::pagination::Window;
use crate::repository::CatalogRepository;

/// MongoDB implementation of the CatalogRepository
pub struct MongoCatalogRepository {
    products: Collection<Product>,
    reviews: Collection<ProductReview>,
    users: Collection<Document>,
}

fn uuid_bson(id: &Uuid) -> Bson {
    to_bson(id).unwrap_or(Bson::Null)
}

/// The current time serialized exactly like the struct timestamp fields,
/// so in-place `$set` updates stay format-compatible with inserts
fn now_bson() -> Bson {
    to_bson(&chrono::Utc::now()).unwrap_or(Bson::Null)
}

impl MongoCatalogRepository {
    /// Create a new MongoCatalogRepository
    pub fn new(db: &Database) -> Self {
        Self {
            products: db.collection::<Product>("products"),
            reviews: db.collection::<ProductReview>("product_reviews"),
            users: db.collection::<Document>("users"),
        }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> CatalogResult<()> {
        let product_indexes = vec![
            IndexModel::builder()
                .keys(doc! { "category": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "brand": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_brand".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "gender": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_gender".to_string())
                        .build(),
                )
                .build(),
            // Matches the listing sort so pages come straight off the index
            IndexModel::builder()
                .keys(doc! { "discount": -1, "_id": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_discount_sort".to_string())
                        .build(),
                )
                .build(),
        ];

        let review_indexes = vec![
            // One review per user per product
            IndexModel::builder()
                .keys(doc! { "product": 1, "user": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_product_user_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "user": 1 })
                .options(IndexOptions::builder().name("idx_user".to_string()).build())
                .build(),
        ];

        self.products.create_indexes(product_indexes).await?;
        self.reviews.create_indexes(review_indexes).await?;
        tracing::info!("Catalog indexes created successfully");
        Ok(())
    }

    /// Build the $match document from the query filters.
    ///
    /// Gender is applied only when a segment override is supplied; the text
    /// search term never appears here (it lives in its own $search stage).
    fn build_match(query: &ProductQuery, gender: Option<Gender>) -> Document {
        let mut doc = doc! {};

        if let Some(gender) = gender {
            doc.insert("gender", gender.to_string());
        }

        if let Some(ref category) = query.category {
            doc.insert("category", category);
        }

        if let Some(ref brand) = query.brand {
            doc.insert("brand", brand);
        }

        if let Some(ref color) = query.color {
            doc.insert("color", color);
        }

        if let Some(ref size) = query.size {
            doc.insert("sizes", doc! { "$elemMatch": { "size": size } });
        }

        if query.min_price.is_some() || query.max_price.is_some() {
            let mut price_filter = doc! {};
            if let Some(min) = query.min_price {
                price_filter.insert("$gte", min);
            }
            if let Some(max) = query.max_price {
                price_filter.insert("$lte", max);
            }
            doc.insert("price", price_filter);
        }

        doc
    }

    /// Atlas Search stage for fuzzy full-text matching
    fn search_stage(term: &str) -> Document {
        doc! {
            "$search": {
                "index": "products",
                "text": {
                    "query": term,
                    "path": { "wildcard": "*" },
                    "fuzzy": { "maxEdits": 2 }
                }
            }
        }
    }

    /// One listing fetch: optional search, match, review join, deterministic
    /// sort, window, live average rating
    fn listing_pipeline(
        query: &ProductQuery,
        gender: Option<Gender>,
        window: Window,
    ) -> Vec<Document> {
        let mut pipeline = Vec::new();

        if let Some(ref term) = query.search {
            pipeline.push(Self::search_stage(term));
        }

        pipeline.push(doc! { "$match": Self::build_match(query, gender) });
        pipeline.push(doc! {
            "$lookup": {
                "from": "product_reviews",
                "localField": "_id",
                "foreignField": "product",
                "as": "reviews"
            }
        });
        // _id tie-break keeps equal-discount ordering stable across fetches
        pipeline.push(doc! { "$sort": { "discount": -1, "_id": 1 } });
        pipeline.push(doc! { "$skip": window.skip as i64 });
        pipeline.push(doc! { "$limit": window.limit });
        pipeline.push(doc! { "$addFields": { "rating": { "$avg": "$reviews.rating" } } });

        pipeline
    }
}

#[async_trait]
impl CatalogRepository for MongoCatalogRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> CatalogResult<Product> {
        let product = Product::new(input);

        self.products.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CatalogResult<Option<Product>> {
        let product = self.products.find_one(doc! { "_id": uuid_bson(&id) }).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_detail(&self, id: Uuid) -> CatalogResult<Option<ProductDetail>> {
        let Some(product) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let cursor = self
            .reviews
            .find(doc! { "product": uuid_bson(&id) })
            .sort(doc! { "created_at": -1 })
            .await?;
        let reviews: Vec<ProductReview> = cursor.try_collect().await?;

        // Resolve author names in one round trip
        let user_ids: Vec<Bson> = reviews.iter().map(|r| uuid_bson(&r.user)).collect();
        let mut names = std::collections::HashMap::new();
        if !user_ids.is_empty() {
            let mut cursor = self
                .users
                .find(doc! { "_id": { "$in": user_ids } })
                .projection(doc! { "name": 1 })
                .await?;
            while let Some(user) = cursor.try_next().await? {
                if let (Ok(id), Ok(name)) = (user.get_str("_id"), user.get_str("name")) {
                    names.insert(id.to_string(), name.to_string());
                }
            }
        }

        let reviews = reviews
            .into_iter()
            .map(|r| ReviewWithAuthor {
                id: r.id,
                user: r.user,
                name: names.get(&r.user.to_string()).cloned(),
                rating: r.rating,
                comment: r.comment,
                created_at: r.created_at,
            })
            .collect();

        Ok(Some(ProductDetail { product, reviews }))
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        let filter = doc! { "_id": uuid_bson(&id) };
        let existing = self
            .products
            .find_one(filter.clone())
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        let mut updated = existing;
        updated.apply_update(input);

        self.products.replace_one(filter, &updated).await?;

        tracing::info!(product_id = %id, "Product updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CatalogResult<()> {
        let result = self
            .products
            .delete_one(doc! { "_id": uuid_bson(&id) })
            .await?;

        if result.deleted_count == 0 {
            return Err(CatalogError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Product deleted successfully");
        Ok(())
    }

    #[instrument(skip(self, query))]
    async fn count_matching(
        &self,
        query: &ProductQuery,
        gender: Option<Gender>,
    ) -> CatalogResult<u64> {
        let filter = Self::build_match(query, gender);
        let count = self.products.count_documents(filter).await?;
        Ok(count)
    }

    #[instrument(skip(self, query), fields(skip = window.skip, limit = window.limit))]
    async fn fetch_window(
        &self,
        query: &ProductQuery,
        gender: Option<Gender>,
        window: Window,
    ) -> CatalogResult<Vec<ProductListing>> {
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let pipeline = Self::listing_pipeline(query, gender, window);
        let cursor = self.products.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(|d| from_document(d).map_err(|e| CatalogError::Database(e.to_string())))
            .collect()
    }

    #[instrument(skip(self))]
    async fn filter_options(&self) -> CatalogResult<FilterOptions> {
        let collect = |values: Vec<Bson>| {
            let mut out: Vec<String> = values
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            out.sort();
            out
        };

        let categories = collect(self.products.distinct("category", doc! {}).await?);
        let sizes = collect(self.products.distinct("sizes.size", doc! {}).await?);
        let colors = collect(self.products.distinct("color", doc! {}).await?);

        Ok(FilterOptions {
            categories,
            sizes,
            colors,
        })
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> CatalogResult<Vec<String>> {
        let values = self.products.distinct("category", doc! {}).await?;
        let mut categories: Vec<String> = values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        categories.sort();
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn get_review(&self, id: Uuid) -> CatalogResult<Option<ProductReview>> {
        let review = self.reviews.find_one(doc! { "_id": uuid_bson(&id) }).await?;
        Ok(review)
    }

    #[instrument(skip(self))]
    async fn find_review(
        &self,
        product: Uuid,
        user: Uuid,
    ) -> CatalogResult<Option<ProductReview>> {
        let review = self
            .reviews
            .find_one(doc! { "product": uuid_bson(&product), "user": uuid_bson(&user) })
            .await?;
        Ok(review)
    }

    #[instrument(skip(self, review), fields(review_id = %review.id, product_id = %review.product))]
    async fn insert_review(&self, review: ProductReview) -> CatalogResult<()> {
        self.reviews.insert_one(&review).await?;
        self.products
            .update_one(
                doc! { "_id": uuid_bson(&review.product) },
                doc! { "$push": { "reviews": uuid_bson(&review.id) } },
            )
            .await?;

        tracing::info!(review_id = %review.id, "Review created");
        Ok(())
    }

    #[instrument(skip(self, comment))]
    async fn update_review(
        &self,
        id: Uuid,
        rating: i32,
        comment: String,
    ) -> CatalogResult<ProductReview> {
        let filter = doc! { "_id": uuid_bson(&id) };
        let update = doc! {
            "$set": {
                "rating": rating,
                "comment": comment,
                "updated_at": now_bson()
            }
        };

        self.reviews.update_one(filter.clone(), update).await?;

        let review = self
            .reviews
            .find_one(filter)
            .await?
            .ok_or(CatalogError::ReviewNotFound(id))?;

        tracing::info!(review_id = %id, "Review updated");
        Ok(review)
    }

    #[instrument(skip(self, review), fields(review_id = %review.id))]
    async fn remove_review(&self, review: &ProductReview) -> CatalogResult<()> {
        self.reviews
            .delete_one(doc! { "_id": uuid_bson(&review.id) })
            .await?;
        self.products
            .update_one(
                doc! { "_id": uuid_bson(&review.product) },
                doc! { "$pull": { "reviews": uuid_bson(&review.id) } },
            )
            .await?;

        tracing::info!(review_id = %review.id, "Review deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn user_reviews(&self, user: Uuid) -> CatalogResult<Vec<UserReview>> {
        let pipeline = vec![
            doc! { "$match": { "user": uuid_bson(&user) } },
            doc! { "$sort": { "created_at": -1 } },
            doc! {
                "$lookup": {
                    "from": "products",
                    "localField": "product",
                    "foreignField": "_id",
                    "as": "product"
                }
            },
            doc! { "$unwind": "$product" },
            doc! {
                "$project": {
                    "rating": 1,
                    "comment": 1,
                    "created_at": 1,
                    "updated_at": 1,
                    "product._id": 1,
                    "product.name": 1,
                    "product.brand": 1,
                    "product.image": 1,
                    "product.price": 1
                }
            },
        ];

        let cursor = self.reviews.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(|d| from_document(d).map_err(|e| CatalogError::Database(e.to_string())))
            .collect()
    }

    #[instrument(skip(self))]
    async fn recompute_rating(&self, product: Uuid) -> CatalogResult<f64> {
        let pipeline = vec![
            doc! { "$match": { "product": uuid_bson(&product) } },
            doc! { "$group": { "_id": Bson::Null, "average": { "$avg": "$rating" } } },
        ];

        let mut cursor = self.reviews.aggregate(pipeline).await?;
        let rating = match cursor.try_next().await? {
            Some(group) => {
                let average = group.get_f64("average").unwrap_or(0.0);
                (average * 10.0).round() / 10.0
            }
            None => 0.0,
        };

        self.products
            .update_one(
                doc! { "_id": uuid_bson(&product) },
                doc! { "$set": { "rating": rating, "updated_at": now_bson() } },
            )
            .await?;

        tracing::debug!(product_id = %product, rating, "Cached rating recomputed");
        Ok(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_updates_match_the_insert_encoding() {
        let review = ProductReview::new(Uuid::now_v7(), Uuid::now_v7(), 5, "solid".into());
        let inserted = mongodb::bson::to_document(&review).unwrap();
        let inserted_at = inserted.get_str("updated_at").unwrap();
        assert!(inserted_at.ends_with('Z'));

        let Bson::String(updated_at) = now_bson() else {
            panic!("timestamp did not encode as a string");
        };
        assert!(updated_at.ends_with('Z'));
    }

    #[test]
    fn test_build_match_empty() {
        let query = ProductQuery::default();
        let doc = MongoCatalogRepository::build_match(&query, None);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_build_match_with_gender_override() {
        let query = ProductQuery::default();
        let doc = MongoCatalogRepository::build_match(&query, Some(Gender::Female));
        assert_eq!(doc.get_str("gender").unwrap(), "Female");
    }

    #[test]
    fn test_build_match_ignores_query_gender_without_override() {
        // The grand total deliberately ignores the segment split
        let query = ProductQuery {
            gender: Some(Gender::Male),
            ..Default::default()
        };
        let doc = MongoCatalogRepository::build_match(&query, None);
        assert!(!doc.contains_key("gender"));
    }

    #[test]
    fn test_build_match_with_price_range() {
        let query = ProductQuery {
            min_price: Some(10.0),
            max_price: Some(50.0),
            ..Default::default()
        };
        let doc = MongoCatalogRepository::build_match(&query, None);
        let price = doc.get_document("price").unwrap();
        assert_eq!(price.get_f64("$gte").unwrap(), 10.0);
        assert_eq!(price.get_f64("$lte").unwrap(), 50.0);
    }

    #[test]
    fn test_build_match_with_one_sided_price() {
        let query = ProductQuery {
            max_price: Some(99.0),
            ..Default::default()
        };
        let doc = MongoCatalogRepository::build_match(&query, None);
        let price = doc.get_document("price").unwrap();
        assert!(price.get("$gte").is_none());
        assert_eq!(price.get_f64("$lte").unwrap(), 99.0);
    }

    #[test]
    fn test_build_match_with_size_elem_match() {
        let query = ProductQuery {
            size: Some("42".to_string()),
            ..Default::default()
        };
        let doc = MongoCatalogRepository::build_match(&query, None);
        let sizes = doc.get_document("sizes").unwrap();
        assert!(sizes.contains_key("$elemMatch"));
    }

    #[test]
    fn test_build_match_never_contains_search() {
        let query = ProductQuery {
            search: Some("sneaker".to_string()),
            ..Default::default()
        };
        let doc = MongoCatalogRepository::build_match(&query, None);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_search_stage_shape() {
        let stage = MongoCatalogRepository::search_stage("jacket");
        let search = stage.get_document("$search").unwrap();
        assert_eq!(search.get_str("index").unwrap(), "products");
        let text = search.get_document("text").unwrap();
        assert_eq!(text.get_str("query").unwrap(), "jacket");
        assert_eq!(
            text.get_document("fuzzy").unwrap().get_i32("maxEdits").unwrap(),
            2
        );
    }

    #[test]
    fn test_listing_pipeline_stage_order() {
        let query = ProductQuery::default();
        let pipeline =
            MongoCatalogRepository::listing_pipeline(&query, None, Window::new(10, 5));

        let stages: Vec<&str> = pipeline
            .iter()
            .map(|d| d.keys().next().map(String::as_str).unwrap_or(""))
            .collect();
        assert_eq!(
            stages,
            vec!["$match", "$lookup", "$sort", "$skip", "$limit", "$addFields"]
        );
        assert_eq!(pipeline[3].get_i64("$skip").unwrap(), 10);
        assert_eq!(pipeline[4].get_i64("$limit").unwrap(), 5);
    }

    #[test]
    fn test_listing_pipeline_search_comes_first() {
        let query = ProductQuery {
            search: Some("boots".to_string()),
            ..Default::default()
        };
        let pipeline =
            MongoCatalogRepository::listing_pipeline(&query, Some(Gender::Male), Window::new(0, 10));
        assert!(pipeline[0].contains_key("$search"));
        assert!(pipeline[1].contains_key("$match"));
    }

    #[test]
    fn test_listing_pipeline_sort_is_deterministic() {
        let query = ProductQuery::default();
        let pipeline = MongoCatalogRepository::listing_pipeline(&query, None, Window::new(0, 10));
        let sort = pipeline[2].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("discount").unwrap(), -1);
        assert_eq!(sort.get_i32("_id").unwrap(), 1);
    }
}
