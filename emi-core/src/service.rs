use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use emi_catalog::{
    normalize_slug, EmiPlan, EmiPlanInput, Product, ProductInput, ValidationError,
};
use crate::repository::{EmiPlanRepository, ProductRepository};
use crate::{CoreError, CoreResult};

/// A product with its plans resolved in `emi_plans` order
#[derive(Debug, Clone)]
pub struct ProductDetails {
    pub product: Product,
    pub plans: Vec<EmiPlan>,
}

/// Catalog read/write operations shared by the HTTP layer and tooling.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    plans: Arc<dyn EmiPlanRepository>,
}

impl CatalogService {
    pub fn new(products: Arc<dyn ProductRepository>, plans: Arc<dyn EmiPlanRepository>) -> Self {
        Self { products, plans }
    }

    pub async fn list_products(&self) -> CoreResult<Vec<ProductDetails>> {
        let products = self.products.list_products().await?;
        let mut result = Vec::with_capacity(products.len());
        for product in products {
            result.push(self.details(product).await?);
        }
        Ok(result)
    }

    /// Look a product up by id, falling back to its slug.
    pub async fn get_product(&self, slug_or_id: &str) -> CoreResult<ProductDetails> {
        let product = self.find(slug_or_id).await?;
        self.details(product).await
    }

    pub async fn create_product(&self, input: ProductInput) -> CoreResult<ProductDetails> {
        let new = input.validate()?;
        self.ensure_slug_available(new.slug(), None).await?;

        let product = new.into_product();
        self.products.create_product(&product).await?;
        info!(product_id = %product.id, slug = %product.slug, "Product created");

        Ok(ProductDetails {
            product,
            plans: Vec::new(),
        })
    }

    /// Full-document replacement. The plan list is not part of the document.
    pub async fn replace_product(
        &self,
        slug_or_id: &str,
        input: ProductInput,
    ) -> CoreResult<ProductDetails> {
        let existing = self.find(slug_or_id).await?;
        self.store_update(existing, input).await
    }

    /// Field update: fields missing from `input` keep their stored value.
    pub async fn update_product(
        &self,
        slug_or_id: &str,
        input: ProductInput,
    ) -> CoreResult<ProductDetails> {
        let existing = self.find(slug_or_id).await?;
        let merged = input.overlay(&existing);
        self.store_update(existing, merged).await
    }

    pub async fn delete_product(&self, slug_or_id: &str) -> CoreResult<()> {
        let product = self.find(slug_or_id).await?;
        if !self.products.delete_product(product.id).await? {
            return Err(CoreError::not_found("Product", slug_or_id));
        }
        info!(product_id = %product.id, slug = %product.slug, "Product deleted");
        Ok(())
    }

    pub async fn list_plans(&self, slug_or_id: &str) -> CoreResult<Vec<EmiPlan>> {
        let product = self.find(slug_or_id).await?;
        Ok(self.details(product).await?.plans)
    }

    /// Validates every plan before writing any of them.
    pub async fn create_plans(
        &self,
        slug_or_id: &str,
        inputs: Vec<EmiPlanInput>,
    ) -> CoreResult<Vec<EmiPlan>> {
        if inputs.is_empty() {
            return Err(ValidationError::new("emiPlans", "At least one EMI plan is required").into());
        }
        let validated = inputs
            .into_iter()
            .map(EmiPlanInput::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let product = self.find(slug_or_id).await?;
        let plans: Vec<EmiPlan> = validated
            .into_iter()
            .map(|plan| plan.into_plan(product.id))
            .collect();

        self.plans.create_plans(product.id, &plans).await?;
        info!(product_id = %product.id, count = plans.len(), "EMI plans created");

        Ok(plans)
    }

    pub async fn delete_plan(&self, slug_or_id: &str, plan_id: Uuid) -> CoreResult<()> {
        let product = self.find(slug_or_id).await?;
        if !self.plans.delete_plan(product.id, plan_id).await? {
            return Err(CoreError::not_found("EMI plan", plan_id));
        }
        info!(product_id = %product.id, %plan_id, "EMI plan deleted");
        Ok(())
    }

    pub async fn count_products(&self) -> CoreResult<u64> {
        self.products.count_products().await
    }

    pub async fn count_plans(&self) -> CoreResult<u64> {
        self.plans.count_plans().await
    }

    async fn find(&self, slug_or_id: &str) -> CoreResult<Product> {
        if let Ok(id) = Uuid::parse_str(slug_or_id.trim()) {
            if let Some(product) = self.products.get_product(id).await? {
                return Ok(product);
            }
        }

        self.products
            .get_product_by_slug(&normalize_slug(slug_or_id))
            .await?
            .ok_or_else(|| CoreError::not_found("Product", slug_or_id))
    }

    async fn ensure_slug_available(&self, slug: &str, owner: Option<Uuid>) -> CoreResult<()> {
        match self.products.get_product_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(ValidationError::duplicate_slug(slug).into())
            }
            _ => Ok(()),
        }
    }

    async fn store_update(
        &self,
        mut product: Product,
        input: ProductInput,
    ) -> CoreResult<ProductDetails> {
        let new = input.validate()?;
        self.ensure_slug_available(new.slug(), Some(product.id)).await?;

        product.replace_with(new);
        if !self.products.update_product(&product).await? {
            return Err(CoreError::not_found("Product", product.id));
        }
        info!(product_id = %product.id, slug = %product.slug, "Product updated");

        self.details(product).await
    }

    async fn details(&self, product: Product) -> CoreResult<ProductDetails> {
        let mut by_id: HashMap<Uuid, EmiPlan> = self
            .plans
            .list_plans(product.id)
            .await?
            .into_iter()
            .map(|plan| (plan.id, plan))
            .collect();

        let plans = product
            .emi_plans
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        Ok(ProductDetails { product, plans })
    }
}
