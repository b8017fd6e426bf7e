//! Product repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Product, ProductBulkUpdate, ProductCreate, ProductListQuery, ProductUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List products, optionally filtered by category, status and a
    /// case-insensitive substring on name or SKU.
    pub async fn find(&self, query: &ProductListQuery) -> RepoResult<Vec<Product>> {
        let mut sql = String::from("SELECT * FROM product WHERE true");
        if query.category.is_some() {
            sql.push_str(" AND category = $category");
        }
        if query.status.is_some() {
            sql.push_str(" AND status = $status");
        }
        if query.search.is_some() {
            sql.push_str(
                " AND (string::lowercase(name) CONTAINS $search \
                 OR string::lowercase(sku) CONTAINS $search)",
            );
        }
        sql.push_str(" ORDER BY name");

        let mut q = self.base.db().query(sql);
        if let Some(category) = &query.category {
            q = q.bind(("category", category.clone()));
        }
        if let Some(status) = query.status {
            q = q.bind(("status", status));
        }
        if let Some(search) = &query.search {
            q = q.bind(("search", search.to_lowercase()));
        }

        let products: Vec<Product> = q.await?.take(0)?;
        Ok(products)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        self.find(&ProductListQuery::default()).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    pub async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE sku = $sku LIMIT 1")
            .bind(("sku", sku.to_string()))
            .await?
            .take(0)?;
        Ok(products.into_iter().next())
    }

    /// Create a product, rejecting duplicate SKUs and margin-less pricing.
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.retail_price <= data.wholesale_price {
            return Err(RepoError::Validation(
                "retail price must be greater than wholesale price".to_string(),
            ));
        }
        if self.find_by_sku(&data.sku).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "sku '{}' already exists",
                data.sku
            )));
        }

        let now = now_millis();
        let product = Product {
            id: None,
            sku: data.sku,
            name: data.name,
            category: data.category,
            wholesale_price: data.wholesale_price,
            retail_price: data.retail_price,
            stock: data.stock,
            min_stock: data.min_stock,
            status: data.status,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Partial update. Last write wins; no version check is performed.
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let mut product = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("product '{id}' not found")))?;

        if let Some(name) = data.name {
            product.name = name;
        }
        if let Some(category) = data.category {
            product.category = category;
        }
        if let Some(wholesale_price) = data.wholesale_price {
            product.wholesale_price = wholesale_price;
        }
        if let Some(retail_price) = data.retail_price {
            product.retail_price = retail_price;
        }
        if product.retail_price <= product.wholesale_price {
            return Err(RepoError::Validation(
                "retail price must be greater than wholesale price".to_string(),
            ));
        }
        if let Some(stock) = data.stock {
            product.stock = stock;
        }
        if let Some(min_stock) = data.min_stock {
            product.min_stock = min_stock;
        }
        if let Some(status) = data.status {
            product.status = status;
        }
        product.updated_at = now_millis();

        let rid = product.id.clone();
        let updated: Option<Product> = match rid {
            Some(rid) => self.base.db().update(rid).content(product).await?,
            None => {
                let pure_id = strip_table_prefix(PRODUCT_TABLE, id).to_string();
                self.base
                    .db()
                    .update((PRODUCT_TABLE, pure_id))
                    .content(product)
                    .await?
            }
        };
        updated.ok_or_else(|| RepoError::Database("Failed to update product".to_string()))
    }

    /// Apply the same status and/or category to a set of products.
    /// Missing ids are skipped; the count of touched rows is returned.
    pub async fn bulk_update(&self, data: ProductBulkUpdate) -> RepoResult<u32> {
        if data.status.is_none() && data.category.is_none() {
            return Err(RepoError::Validation(
                "bulk update requires a status or a category".to_string(),
            ));
        }

        let mut touched = 0u32;
        for id in &data.ids {
            let update = ProductUpdate {
                name: None,
                category: data.category.clone(),
                wholesale_price: None,
                retail_price: None,
                stock: None,
                min_stock: None,
                status: data.status,
            };
            match self.update(id, update).await {
                Ok(_) => touched += 1,
                Err(RepoError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(touched)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let removed: Option<Product> = self.base.db().delete((PRODUCT_TABLE, pure_id)).await?;
        Ok(removed.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::ProductStatus;

    async fn repo() -> ProductRepository {
        let svc = DbService::memory().await.unwrap();
        ProductRepository::new(svc.db)
    }

    fn make(sku: &str, category: &str) -> ProductCreate {
        ProductCreate {
            sku: sku.to_string(),
            name: format!("Widget {sku}"),
            category: category.to_string(),
            wholesale_price: 60.0,
            retail_price: 100.0,
            stock: 10,
            min_stock: 2,
            status: ProductStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_sku() {
        let repo = repo().await;
        repo.create(make("W-1", "tools")).await.unwrap();
        let err = repo.create(make("W-1", "tools")).await;
        assert!(matches!(err, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_margin() {
        let repo = repo().await;
        let mut data = make("W-1", "tools");
        data.retail_price = 50.0;
        let err = repo.create(data).await;
        assert!(matches!(err, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_filtered_search() {
        let repo = repo().await;
        repo.create(make("W-1", "tools")).await.unwrap();
        repo.create(make("G-7", "garden")).await.unwrap();

        let by_category = repo
            .find(&ProductListQuery {
                category: Some("garden".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].sku, "G-7");

        let by_search = repo
            .find(&ProductListQuery {
                search: Some("w-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].sku, "W-1");
    }

    #[tokio::test]
    async fn test_bulk_update_status() {
        let repo = repo().await;
        let a = repo.create(make("W-1", "tools")).await.unwrap();
        let b = repo.create(make("W-2", "tools")).await.unwrap();

        let ids = vec![
            a.id.unwrap().key().to_string(),
            b.id.unwrap().key().to_string(),
            "missing".to_string(),
        ];
        let touched = repo
            .bulk_update(ProductBulkUpdate {
                ids,
                status: Some(ProductStatus::Discontinued),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(touched, 2);

        for p in repo.find_all().await.unwrap() {
            assert_eq!(p.status, ProductStatus::Discontinued);
        }
    }

    #[tokio::test]
    async fn test_update_preserves_untouched_fields() {
        let repo = repo().await;
        let p = repo.create(make("W-1", "tools")).await.unwrap();
        let id = p.id.clone().unwrap().key().to_string();

        let updated = repo
            .update(
                &id,
                ProductUpdate {
                    name: None,
                    category: None,
                    wholesale_price: None,
                    retail_price: None,
                    stock: Some(42),
                    min_stock: None,
                    status: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.stock, 42);
        assert_eq!(updated.sku, "W-1");
        assert_eq!(updated.retail_price, 100.0);
    }
}
