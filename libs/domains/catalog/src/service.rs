//! Catalog service - business logic layer

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CreateProduct, FilterOptions, ListParams, Product, ProductDetail, ProductPage, ProductQuery,
    ProductReview, UpdateProduct, UserReview, WriteReviewRequest,
};
use crate::pagination::{split_page, total_pages, Window};
use crate::repository::CatalogRepository;

/// Catalog service providing listing, CRUD and review operations
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    /// Create a new CatalogService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Serve one page of the product listing.
    ///
    /// When a gender is requested, that segment fills the page first and the
    /// opposite segment backfills whatever space remains. The page totals are
    /// computed from the plain filter match: they ignore both the text search
    /// and the gender split, so `totalPages` is stable across segments.
    #[instrument(skip(self, params))]
    pub async fn find_products(&self, params: ListParams) -> CatalogResult<ProductPage> {
        let query = ProductQuery::from_params(params);

        let total_products = self.repository.count_matching(&query, None).await?;
        let skip = query.skip();

        let products = match query.gender {
            Some(gender) => {
                let total_primary = self
                    .repository
                    .count_matching(&query, Some(gender))
                    .await?;
                let (primary, secondary) = split_page(total_primary, skip, query.limit);

                let mut products = if primary.is_empty() {
                    Vec::new()
                } else {
                    self.repository
                        .fetch_window(&query, Some(gender), primary)
                        .await?
                };

                if !secondary.is_empty() {
                    let backfill = self
                        .repository
                        .fetch_window(&query, Some(gender.opposite()), secondary)
                        .await?;
                    products.extend(backfill);
                }

                products
            }
            None => {
                self.repository
                    .fetch_window(&query, None, Window::new(skip, query.limit))
                    .await?
            }
        };

        Ok(ProductPage {
            products,
            total_pages: total_pages(total_products, query.limit),
            current_page: query.page,
            total_products,
        })
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Get a product with reviews and reviewer names
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> CatalogResult<ProductDetail> {
        self.repository
            .get_detail(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Update an existing product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> CatalogResult<Product> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<()> {
        self.repository.delete(id).await
    }

    /// Distinct facet values for the filter sidebar
    #[instrument(skip(self))]
    pub async fn filter_options(&self) -> CatalogResult<FilterOptions> {
        self.repository.filter_options().await
    }

    /// Distinct categories
    #[instrument(skip(self))]
    pub async fn categories(&self) -> CatalogResult<Vec<String>> {
        self.repository.categories().await
    }

    /// Write or rewrite the caller's review of a product.
    ///
    /// A user holds at most one review per product; resubmitting replaces the
    /// rating and comment in place. The cached product rating is recomputed
    /// after every mutation.
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn write_review(
        &self,
        user: Uuid,
        input: WriteReviewRequest,
    ) -> CatalogResult<ProductReview> {
        input
            .validate()
            .map_err(|e| CatalogError::Validation(e.to_string()))?;

        let product = self
            .repository
            .get_by_id(input.product_id)
            .await?
            .ok_or(CatalogError::NotFound(input.product_id))?;

        let review = match self.repository.find_review(product.id, user).await? {
            Some(existing) => {
                self.repository
                    .update_review(existing.id, input.rating, input.comment)
                    .await?
            }
            None => {
                let review = ProductReview::new(product.id, user, input.rating, input.comment);
                self.repository.insert_review(review.clone()).await?;
                review
            }
        };

        self.repository.recompute_rating(product.id).await?;
        Ok(review)
    }

    /// Delete one of the caller's reviews
    #[instrument(skip(self))]
    pub async fn delete_review(&self, user: Uuid, id: Uuid) -> CatalogResult<()> {
        let review = self
            .repository
            .get_review(id)
            .await?
            .ok_or(CatalogError::ReviewNotFound(id))?;

        if review.user != user {
            return Err(CatalogError::Forbidden(
                "You can only delete your own reviews".to_string(),
            ));
        }

        self.repository.remove_review(&review).await?;
        self.repository.recompute_rating(review.product).await?;
        Ok(())
    }

    /// The caller's reviews, newest first
    #[instrument(skip(self))]
    pub async fn user_reviews(&self, user: Uuid) -> CatalogResult<Vec<UserReview>> {
        self.repository.user_reviews(user).await
    }
}

impl<R: CatalogRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, ProductListing, SizeType};
    use crate::repository::MockCatalogRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn listing(gender: Gender) -> ProductListing {
        ProductListing {
            id: Uuid::now_v7(),
            name: "Runner".into(),
            brand: "Acme".into(),
            price: 59.0,
            size_type: SizeType::Shoes,
            sizes: vec![],
            color: "white".into(),
            gender,
            category: "shoes".into(),
            discount: 0.0,
            image: "runner.webp".into(),
            reviews: vec![],
            rating: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn listings(gender: Gender, count: usize) -> Vec<ProductListing> {
        (0..count).map(|_| listing(gender)).collect()
    }

    fn list_params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "page" => p.page = value,
                "limit" => p.limit = value,
                "gender" => p.gender = value,
                "search" => p.search = value,
                other => panic!("unknown param {}", other),
            }
        }
        p
    }

    #[tokio::test]
    async fn test_first_page_blends_genders_primary_first() {
        let mut repo = MockCatalogRepository::new();

        // 12 products match overall, 7 of them male
        repo.expect_count_matching()
            .withf(|_, gender| gender.is_none())
            .returning(|_, _| Ok(12));
        repo.expect_count_matching()
            .withf(|_, gender| *gender == Some(Gender::Male))
            .returning(|_, _| Ok(7));

        repo.expect_fetch_window()
            .withf(|_, gender, window| {
                *gender == Some(Gender::Male) && *window == Window::new(0, 7)
            })
            .returning(|_, _, _| Ok(listings(Gender::Male, 7)));
        repo.expect_fetch_window()
            .withf(|_, gender, window| {
                *gender == Some(Gender::Female) && *window == Window::new(0, 3)
            })
            .returning(|_, _, _| Ok(listings(Gender::Female, 3)));

        let service = CatalogService::new(repo);
        let page = service
            .find_products(list_params(&[("gender", "Male")]))
            .await
            .unwrap();

        assert_eq!(page.products.len(), 10);
        assert!(page.products[..7].iter().all(|p| p.gender == Gender::Male));
        assert!(page.products[7..].iter().all(|p| p.gender == Gender::Female));
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_products, 12);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_second_page_skips_backfill_already_served() {
        let mut repo = MockCatalogRepository::new();

        repo.expect_count_matching()
            .withf(|_, gender| gender.is_none())
            .returning(|_, _| Ok(20));
        repo.expect_count_matching()
            .withf(|_, gender| *gender == Some(Gender::Male))
            .returning(|_, _| Ok(7));

        // Primary is exhausted on page 2; only the female fetch happens,
        // skipping the 3 rows that backfilled page 1
        repo.expect_fetch_window()
            .withf(|_, gender, window| {
                *gender == Some(Gender::Female) && *window == Window::new(3, 10)
            })
            .times(1)
            .returning(|_, _, _| Ok(listings(Gender::Female, 10)));

        let service = CatalogService::new(repo);
        let page = service
            .find_products(list_params(&[("gender", "Male"), ("page", "2")]))
            .await
            .unwrap();

        assert_eq!(page.products.len(), 10);
        assert!(page.products.iter().all(|p| p.gender == Gender::Female));
        assert_eq!(page.current_page, 2);
    }

    #[tokio::test]
    async fn test_total_pages_ignore_gender_split() {
        let mut repo = MockCatalogRepository::new();

        repo.expect_count_matching()
            .withf(|_, gender| gender.is_none())
            .returning(|_, _| Ok(12));
        repo.expect_count_matching()
            .withf(|_, gender| gender.is_some())
            .returning(|_, _| Ok(4));
        repo.expect_fetch_window()
            .returning(|_, gender, window| {
                Ok(listings(gender.unwrap(), window.limit as usize))
            });

        let service = CatalogService::new(repo);
        let page = service
            .find_products(list_params(&[("gender", "Female"), ("limit", "5")]))
            .await
            .unwrap();

        // 12 matching at limit 5: 3 pages regardless of the blend
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_products, 12);
    }

    #[tokio::test]
    async fn test_without_gender_single_fetch() {
        let mut repo = MockCatalogRepository::new();

        repo.expect_count_matching()
            .withf(|_, gender| gender.is_none())
            .returning(|_, _| Ok(3));
        repo.expect_fetch_window()
            .withf(|_, gender, window| gender.is_none() && *window == Window::new(0, 10))
            .times(1)
            .returning(|_, _, _| Ok(listings(Gender::Male, 3)));

        let service = CatalogService::new(repo);
        let page = service.find_products(ListParams::default()).await.unwrap();

        assert_eq!(page.products.len(), 3);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_search_scopes_fetches_but_not_totals() {
        let mut repo = MockCatalogRepository::new();

        // Counts receive the query but the match builder drops the term; here
        // we assert the service still passes the search term through to the
        // fetches so the $search stage can apply.
        repo.expect_count_matching()
            .withf(|query, gender| {
                query.search.as_deref() == Some("boots") && gender.is_none()
            })
            .returning(|_, _| Ok(50));
        repo.expect_count_matching()
            .withf(|query, gender| {
                query.search.as_deref() == Some("boots") && gender.is_some()
            })
            .returning(|_, _| Ok(5));
        repo.expect_fetch_window()
            .withf(|query, _, _| query.search.as_deref() == Some("boots"))
            .times(2)
            .returning(|_, gender, window| {
                Ok(listings(gender.unwrap(), window.limit as usize))
            });

        let service = CatalogService::new(repo);
        let page = service
            .find_products(list_params(&[("gender", "Male"), ("search", "boots")]))
            .await
            .unwrap();

        assert_eq!(page.total_products, 50);
        assert_eq!(page.products.len(), 10);
    }

    #[tokio::test]
    async fn test_write_review_inserts_when_none_exists() {
        let mut repo = MockCatalogRepository::new();
        let product_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();

        let mut product = crate::models::Product::new(CreateProduct {
            name: "Runner".into(),
            brand: "Acme".into(),
            price: 59.0,
            size_type: SizeType::Shoes,
            sizes: vec![],
            color: "white".into(),
            gender: Gender::Male,
            category: "shoes".into(),
            discount: 0.0,
            image: "runner.webp".into(),
        });
        product.id = product_id;

        repo.expect_get_by_id()
            .with(eq(product_id))
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_find_review().returning(|_, _| Ok(None));
        repo.expect_insert_review()
            .withf(move |review| review.product == product_id && review.rating == 4)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_recompute_rating()
            .with(eq(product_id))
            .times(1)
            .returning(|_| Ok(4.0));

        let service = CatalogService::new(repo);
        let review = service
            .write_review(
                user_id,
                WriteReviewRequest {
                    product_id,
                    rating: 4,
                    comment: "Solid".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(review.user, user_id);
        assert_eq!(review.rating, 4);
    }

    #[tokio::test]
    async fn test_write_review_resubmission_updates_in_place() {
        let mut repo = MockCatalogRepository::new();
        let product_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let existing = ProductReview::new(product_id, user_id, 2, "Meh".into());
        let existing_id = existing.id;

        let mut product = crate::models::Product::new(CreateProduct {
            name: "Runner".into(),
            brand: "Acme".into(),
            price: 59.0,
            size_type: SizeType::Shoes,
            sizes: vec![],
            color: "white".into(),
            gender: Gender::Male,
            category: "shoes".into(),
            discount: 0.0,
            image: "runner.webp".into(),
        });
        product.id = product_id;

        repo.expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        repo.expect_find_review()
            .returning(move |_, _| Ok(Some(existing.clone())));
        repo.expect_insert_review().times(0);
        repo.expect_update_review()
            .withf(move |id, rating, _| *id == existing_id && *rating == 5)
            .times(1)
            .returning(move |id, rating, comment| {
                let mut updated = ProductReview::new(product_id, user_id, rating, comment);
                updated.id = id;
                Ok(updated)
            });
        repo.expect_recompute_rating()
            .times(1)
            .returning(|_| Ok(5.0));

        let service = CatalogService::new(repo);
        let review = service
            .write_review(
                user_id,
                WriteReviewRequest {
                    product_id,
                    rating: 5,
                    comment: "Changed my mind".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(review.id, existing_id);
        assert_eq!(review.rating, 5);
    }

    #[tokio::test]
    async fn test_write_review_missing_product_is_not_found() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = CatalogService::new(repo);
        let result = service
            .write_review(
                Uuid::now_v7(),
                WriteReviewRequest {
                    product_id: Uuid::now_v7(),
                    rating: 3,
                    comment: "n/a".into(),
                },
            )
            .await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_write_review_rejects_out_of_range_rating() {
        let repo = MockCatalogRepository::new();
        let service = CatalogService::new(repo);

        let result = service
            .write_review(
                Uuid::now_v7(),
                WriteReviewRequest {
                    product_id: Uuid::now_v7(),
                    rating: 6,
                    comment: "too good".into(),
                },
            )
            .await;

        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_review_rejects_other_users() {
        let mut repo = MockCatalogRepository::new();
        let owner = Uuid::now_v7();
        let review = ProductReview::new(Uuid::now_v7(), owner, 4, "Mine".into());
        let review_id = review.id;

        repo.expect_get_review()
            .with(eq(review_id))
            .returning(move |_| Ok(Some(review.clone())));
        repo.expect_remove_review().times(0);

        let service = CatalogService::new(repo);
        let result = service.delete_review(Uuid::now_v7(), review_id).await;

        assert!(matches!(result, Err(CatalogError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_review_recomputes_rating() {
        let mut repo = MockCatalogRepository::new();
        let owner = Uuid::now_v7();
        let product_id = Uuid::now_v7();
        let review = ProductReview::new(product_id, owner, 4, "Mine".into());
        let review_id = review.id;

        repo.expect_get_review()
            .returning(move |_| Ok(Some(review.clone())));
        repo.expect_remove_review().times(1).returning(|_| Ok(()));
        repo.expect_recompute_rating()
            .with(eq(product_id))
            .times(1)
            .returning(|_| Ok(0.0));

        let service = CatalogService::new(repo);
        service.delete_review(owner, review_id).await.unwrap();
    }
}
