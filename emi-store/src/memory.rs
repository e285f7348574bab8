use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use emi_catalog::{EmiPlan, Product, ValidationError};
use emi_core::{CoreError, CoreResult, EmiPlanRepository, ProductRepository};

/// In-process catalog store.
///
/// Both collections sit behind one lock, so plan writes and the owner's
/// `emi_plans` list always change together.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

#[derive(Default)]
struct CatalogState {
    // insertion order doubles as creation order
    products: Vec<Product>,
    plans: Vec<EmiPlan>,
}

impl CatalogState {
    fn product_mut(&mut self, id: Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    fn slug_taken(&self, slug: &str, except: Uuid) -> bool {
        self.products.iter().any(|p| p.slug == slug && p.id != except)
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn create_product(&self, product: &Product) -> CoreResult<()> {
        let mut state = self.state.write().await;
        if state.slug_taken(&product.slug, product.id) {
            return Err(ValidationError::duplicate_slug(&product.slug).into());
        }
        state.products.push(product.clone());
        Ok(())
    }

    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_product_by_slug(&self, slug: &str) -> CoreResult<Option<Product>> {
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_products(&self) -> CoreResult<Vec<Product>> {
        Ok(self.state.read().await.products.clone())
    }

    async fn update_product(&self, product: &Product) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        if state.slug_taken(&product.slug, product.id) {
            return Err(ValidationError::duplicate_slug(&product.slug).into());
        }

        let Some(stored) = state.product_mut(product.id) else {
            return Ok(false);
        };
        let emi_plans = std::mem::take(&mut stored.emi_plans);
        let created_at = stored.created_at;
        *stored = Product {
            emi_plans,
            created_at,
            ..product.clone()
        };
        Ok(true)
    }

    async fn delete_product(&self, id: Uuid) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.products.len();
        state.products.retain(|p| p.id != id);
        if state.products.len() == before {
            return Ok(false);
        }
        state.plans.retain(|plan| plan.product_id != id);
        Ok(true)
    }

    async fn delete_all_products(&self) -> CoreResult<u64> {
        let mut state = self.state.write().await;
        let removed = state.products.len() as u64;
        state.products.clear();
        state.plans.clear();
        Ok(removed)
    }

    async fn count_products(&self) -> CoreResult<u64> {
        Ok(self.state.read().await.products.len() as u64)
    }
}

#[async_trait]
impl EmiPlanRepository for InMemoryCatalog {
    async fn create_plans(&self, product_id: Uuid, plans: &[EmiPlan]) -> CoreResult<()> {
        let mut state = self.state.write().await;
        let product = state
            .product_mut(product_id)
            .ok_or_else(|| CoreError::not_found("Product", product_id))?;

        product.emi_plans.extend(plans.iter().map(|plan| plan.id));
        product.updated_at = Utc::now();
        state.plans.extend(plans.iter().map(|plan| EmiPlan {
            product_id,
            ..plan.clone()
        }));
        Ok(())
    }

    async fn list_plans(&self, product_id: Uuid) -> CoreResult<Vec<EmiPlan>> {
        let state = self.state.read().await;
        Ok(state
            .plans
            .iter()
            .filter(|plan| plan.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn delete_plan(&self, product_id: Uuid, plan_id: Uuid) -> CoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.plans.len();
        state
            .plans
            .retain(|plan| !(plan.id == plan_id && plan.product_id == product_id));
        if state.plans.len() == before {
            return Ok(false);
        }

        if let Some(product) = state.product_mut(product_id) {
            product.emi_plans.retain(|id| *id != plan_id);
            product.updated_at = Utc::now();
        }
        Ok(true)
    }

    async fn delete_all_plans(&self) -> CoreResult<u64> {
        let mut state = self.state.write().await;
        let removed = state.plans.len() as u64;
        state.plans.clear();
        for product in state.products.iter_mut() {
            product.emi_plans.clear();
        }
        Ok(removed)
    }

    async fn count_plans(&self) -> CoreResult<u64> {
        Ok(self.state.read().await.plans.len() as u64)
    }
}
