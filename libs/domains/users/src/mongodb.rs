//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, from_document, to_bson, Bson, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CartLine, User};
use crate::repository::UserRepository;

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<User>,
}

fn uuid_bson(id: &Uuid) -> Bson {
    to_bson(id).unwrap_or(Bson::Null)
}

impl MongoUserRepository {
    /// Create a new MongoUserRepository
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>("users"),
        }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> UserResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_email_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_username_unique".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(&user).await?;
        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let user = self.collection.find_one(doc! { "_id": uuid_bson(&id) }).await?;
        Ok(user)
    }

    #[instrument(skip(self, email))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    #[instrument(skip(self, email))]
    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = self.collection.count_documents(doc! { "email": email }).await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, username))]
    async fn username_exists(&self, username: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "username": username })
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?;
        let users: Vec<User> = cursor.try_collect().await?;
        Ok(users)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let filter = doc! { "_id": uuid_bson(&user.id) };
        let result = self.collection.replace_one(filter, &user).await?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id));
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": uuid_bson(&id) })
            .await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn cart_with_products(&self, user: Uuid) -> UserResult<Vec<CartLine>> {
        let pipeline = vec![
            doc! { "$match": { "_id": uuid_bson(&user) } },
            doc! { "$unwind": "$cart" },
            doc! {
                "$lookup": {
                    "from": "products",
                    "localField": "cart.product",
                    "foreignField": "_id",
                    "as": "product_info"
                }
            },
            doc! { "$unwind": "$product_info" },
            doc! {
                "$project": {
                    "_id": 0,
                    "quantity": "$cart.quantity",
                    "size": "$cart.size",
                    "product._id": "$product_info._id",
                    "product.name": "$product_info.name",
                    "product.brand": "$product_info.brand",
                    "product.image": "$product_info.image",
                    "product.price": "$product_info.price",
                    "product.discount": "$product_info.discount"
                }
            },
        ];

        let cursor = self.collection.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(|d| from_document(d).map_err(|e| UserError::Database(e.to_string())))
            .collect()
    }
}
