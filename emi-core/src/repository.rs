use async_trait::async_trait;
use uuid::Uuid;
use emi_catalog::{EmiPlan, Product};
use crate::CoreResult;

/// Repository trait for the `products` collection
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fails with a `slug` validation error when the slug is taken.
    async fn create_product(&self, product: &Product) -> CoreResult<()>;

    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>>;

    async fn get_product_by_slug(&self, slug: &str) -> CoreResult<Option<Product>>;

    /// All products in creation order.
    async fn list_products(&self) -> CoreResult<Vec<Product>>;

    /// Writes every field except `emi_plans` and `created_at`.
    /// Returns `false` when the product no longer exists.
    async fn update_product(&self, product: &Product) -> CoreResult<bool>;

    /// Removes the product together with the plans it owns.
    async fn delete_product(&self, id: Uuid) -> CoreResult<bool>;

    async fn delete_all_products(&self) -> CoreResult<u64>;

    async fn count_products(&self) -> CoreResult<u64>;
}

/// Repository trait for the `emi_plans` collection.
///
/// Implementations keep `Product::emi_plans` in step with `EmiPlan::product_id`:
/// inserting or removing a plan and editing the owner's list happen as one unit.
#[async_trait]
pub trait EmiPlanRepository: Send + Sync {
    /// Inserts the plans and appends their ids to the owner's plan list.
    /// Fails with `NotFound` when the product does not exist.
    async fn create_plans(&self, product_id: Uuid, plans: &[EmiPlan]) -> CoreResult<()>;

    async fn list_plans(&self, product_id: Uuid) -> CoreResult<Vec<EmiPlan>>;

    /// Returns `false` when no plan with this id belongs to the product.
    async fn delete_plan(&self, product_id: Uuid, plan_id: Uuid) -> CoreResult<bool>;

    async fn delete_all_plans(&self) -> CoreResult<u64>;

    async fn count_plans(&self) -> CoreResult<u64>;
}
