//! MongoDB implementation of OrderRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, from_document, to_bson, Bson, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{AdminOrder, AdminOrderQuery, Order, PurchasedItem};
use crate::repository::OrderRepository;

/// MongoDB implementation of the OrderRepository
///
/// Checkout reads the buyer's cart out of the users collection and prices it
/// against the products collection via a lookup, so this repository holds a
/// users handle next to the orders one.
pub struct MongoOrderRepository {
    orders: Collection<Order>,
    users: Collection<Document>,
}

fn uuid_bson(id: &Uuid) -> Bson {
    to_bson(id).unwrap_or(Bson::Null)
}

impl MongoOrderRepository {
    /// Create a new MongoOrderRepository
    pub fn new(db: &Database) -> Self {
        Self {
            orders: db.collection::<Order>("orders"),
            users: db.collection::<Document>("users"),
        }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> OrderResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "user": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_user_created".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "order_status": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_order_status".to_string())
                        .build(),
                )
                .build(),
        ];

        self.orders.create_indexes(indexes).await?;
        tracing::info!("Order indexes created successfully");
        Ok(())
    }

    /// Atlas Search stage for the admin order search
    fn search_stage(term: &str) -> Document {
        doc! {
            "$search": {
                "index": "orders",
                "text": {
                    "query": term,
                    "path": { "wildcard": "*" },
                    "fuzzy": { "maxEdits": 2 }
                }
            }
        }
    }

    /// Admin listing pipeline: optional search, filters, newest first, buyer
    /// summary joined in
    fn admin_pipeline(query: &AdminOrderQuery) -> Vec<Document> {
        let mut pipeline = Vec::new();

        if let Some(ref term) = query.search {
            pipeline.push(Self::search_stage(term));
        }

        let mut filter = doc! {};
        if let Some(status) = query.status {
            filter.insert("order_status", status.to_string());
        }
        if let Some(requested) = query.cancellation_requested {
            filter.insert("cancellation_requested", requested);
        }
        if !filter.is_empty() {
            pipeline.push(doc! { "$match": filter });
        }

        pipeline.push(doc! { "$sort": { "created_at": -1 } });
        pipeline.push(doc! {
            "$lookup": {
                "from": "users",
                "localField": "user",
                "foreignField": "_id",
                "as": "customer"
            }
        });
        pipeline.push(doc! {
            "$unwind": { "path": "$customer", "preserveNullAndEmptyArrays": true }
        });
        pipeline.push(doc! {
            "$project": {
                "customer.password_hash": 0,
                "customer.cart": 0,
                "customer.saved_addresses": 0,
                "customer.orders": 0
            }
        });

        pipeline
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self))]
    async fn cart_snapshot(&self, user: Uuid) -> OrderResult<Vec<PurchasedItem>> {
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
                    "product": "$cart.product",
                    "quantity": "$cart.quantity",
                    "selected_size": "$cart.size",
                    "price_at_purchase": "$product_info.price"
                }
            },
        ];

        let cursor = self.users.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(|d| from_document(d).map_err(|e| OrderError::Database(e.to_string())))
            .collect()
    }

    #[instrument(skip(self, order), fields(order_id = %order.id, user_id = %order.user))]
    async fn place_order(&self, order: Order) -> OrderResult<Order> {
        self.orders.insert_one(&order).await?;

        self.users
            .update_one(
                doc! { "_id": uuid_bson(&order.user) },
                doc! {
                    "$set": { "cart": [] },
                    "$push": { "orders": uuid_bson(&order.id) }
                },
            )
            .await?;

        tracing::info!(order_id = %order.id, total = order.total_price, "Order placed");
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let order = self.orders.find_one(doc! { "_id": uuid_bson(&id) }).await?;
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user: Uuid) -> OrderResult<Vec<Order>> {
        let cursor = self
            .orders
            .find(doc! { "user": uuid_bson(&user) })
            .sort(doc! { "created_at": -1 })
            .await?;
        let orders: Vec<Order> = cursor.try_collect().await?;
        Ok(orders)
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn update(&self, order: Order) -> OrderResult<Order> {
        let filter = doc! { "_id": uuid_bson(&order.id) };
        let result = self.orders.replace_one(filter, &order).await?;

        if result.matched_count == 0 {
            return Err(OrderError::NotFound(order.id));
        }

        Ok(order)
    }

    #[instrument(skip(self, query))]
    async fn admin_list(&self, query: &AdminOrderQuery) -> OrderResult<Vec<AdminOrder>> {
        let pipeline = Self::admin_pipeline(query);
        let cursor = self.orders.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents
            .into_iter()
            .map(|d| from_document(d).map_err(|e| OrderError::Database(e.to_string())))
            .collect()
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> OrderResult<u64> {
        let result = self.orders.delete_many(doc! {}).await?;
        self.users
            .update_many(doc! {}, doc! { "$set": { "orders": [] } })
            .await?;

        tracing::warn!(deleted = result.deleted_count, "All orders deleted");
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn clear_user_orders(&self, user: Uuid) -> OrderResult<u64> {
        let result = self
            .orders
            .delete_many(doc! { "user": uuid_bson(&user) })
            .await?;
        self.users
            .update_one(
                doc! { "_id": uuid_bson(&user) },
                doc! { "$set": { "orders": [] } },
            )
            .await?;

        tracing::info!(user_id = %user, deleted = result.deleted_count, "User orders cleared");
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    #[test]
    fn test_admin_pipeline_without_filters() {
        let pipeline = MongoOrderRepository::admin_pipeline(&AdminOrderQuery::default());
        let stages: Vec<&str> = pipeline
            .iter()
            .map(|d| d.keys().next().map(String::as_str).unwrap_or(""))
            .collect();
        assert_eq!(stages, vec!["$sort", "$lookup", "$unwind", "$project"]);
    }

    #[test]
    fn test_admin_pipeline_applies_filters() {
        let query = AdminOrderQuery {
            status: Some(OrderStatus::OutForDelivery),
            cancellation_requested: Some(true),
            search: None,
        };
        let pipeline = MongoOrderRepository::admin_pipeline(&query);

        let matching = pipeline[0].get_document("$match").unwrap();
        assert_eq!(matching.get_str("order_status").unwrap(), "Out for Delivery");
        assert!(matching.get_bool("cancellation_requested").unwrap());
    }

    #[test]
    fn test_admin_pipeline_search_comes_first() {
        let query = AdminOrderQuery {
            search: Some("ada".into()),
            ..Default::default()
        };
        let pipeline = MongoOrderRepository::admin_pipeline(&query);

        let search = pipeline[0].get_document("$search").unwrap();
        assert_eq!(search.get_str("index").unwrap(), "orders");
    }

    #[test]
    fn test_admin_pipeline_strips_sensitive_customer_fields() {
        let pipeline = MongoOrderRepository::admin_pipeline(&AdminOrderQuery::default());
        let project = pipeline.last().unwrap().get_document("$project").unwrap();
        assert_eq!(project.get_i32("customer.password_hash").unwrap(), 0);
    }
}
