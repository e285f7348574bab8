use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use emi_catalog::{Product, ValidationError, Variants};
use emi_core::{CoreError, CoreResult, ProductRepository};

pub struct StoreProductRepository {
    pool: PgPool,
}

impl StoreProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, slug, base_variant, variants, mrp, price, image, images, emi_plan_ids, created_at, updated_at";

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    slug: String,
    base_variant: String,
    variants: Json<Variants>,
    mrp: f64,
    price: f64,
    image: String,
    images: Vec<String>,
    emi_plan_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            slug: row.slug,
            base_variant: row.base_variant,
            variants: row.variants.0,
            mrp: row.mrp,
            price: row.price,
            image: row.image,
            images: row.images,
            emi_plans: row.emi_plan_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The unique index on `slug` backs up the service-level check when two
/// writers race for the same slug.
fn write_error(err: sqlx::Error, slug: &str) -> CoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ValidationError::duplicate_slug(slug).into()
        }
        _ => CoreError::storage(err),
    }
}

#[async_trait]
impl ProductRepository for StoreProductRepository {
    async fn create_product(&self, product: &Product) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, slug, base_variant, variants, mrp, price, image, images, emi_plan_ids, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.base_variant)
        .bind(Json(&product.variants))
        .bind(product.mrp)
        .bind(product.price)
        .bind(&product.image)
        .bind(&product.images)
        .bind(&product.emi_plans)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &product.slug))?;

        Ok(())
    }

    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(row.map(Product::from))
    }

    async fn get_product_by_slug(&self, slug: &str) -> CoreResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE slug = $1", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(row.map(Product::from))
    }

    async fn list_products(&self) -> CoreResult<Vec<Product>> {
        let sql = format!("SELECT {} FROM products ORDER BY created_at, id", PRODUCT_COLUMNS);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update_product(&self, product: &Product) -> CoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, slug = $3, base_variant = $4, variants = $5, mrp = $6, price = $7,
                image = $8, images = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.base_variant)
        .bind(Json(&product.variants))
        .bind(product.mrp)
        .bind(product.price)
        .bind(&product.image)
        .bind(&product.images)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &product.slug))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, id: Uuid) -> CoreResult<bool> {
        // emi_plans rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_products(&self) -> CoreResult<u64> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(result.rows_affected())
    }

    async fn count_products(&self) -> CoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(CoreError::storage)?;

        Ok(count as u64)
    }
}
