use std::sync::Arc;
use serde::Serialize;
use tracing::info;
use emi_catalog::{EmiPlan, EmiPlanInput, SampleEntry};
use crate::repository::{EmiPlanRepository, ProductRepository};
use crate::CoreResult;

/// Record counts after a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub products: u64,
    pub plans: u64,
}

/// Resets storage and repopulates it from a fixed dataset.
///
/// Must not run alongside API traffic. A failure aborts the remaining steps
/// and leaves whatever was already written in place.
pub struct CatalogLoader {
    products: Arc<dyn ProductRepository>,
    plans: Arc<dyn EmiPlanRepository>,
}

impl CatalogLoader {
    pub fn new(products: Arc<dyn ProductRepository>, plans: Arc<dyn EmiPlanRepository>) -> Self {
        Self { products, plans }
    }

    pub async fn run(&self, entries: &[SampleEntry]) -> CoreResult<LoadReport> {
        // Reject a bad dataset before anything is cleared.
        let mut staged = Vec::with_capacity(entries.len());
        for entry in entries {
            let product = entry.product.clone().validate()?;
            let plans = entry
                .emi_plans
                .iter()
                .cloned()
                .map(EmiPlanInput::validate)
                .collect::<Result<Vec<_>, _>>()?;
            staged.push((product, plans));
        }

        let removed_products = self.products.delete_all_products().await?;
        let removed_plans = self.plans.delete_all_plans().await?;
        info!(products = removed_products, plans = removed_plans, "Cleared existing catalog");

        for (new_product, new_plans) in staged {
            let product = new_product.into_product();
            self.products.create_product(&product).await?;

            let plans: Vec<EmiPlan> = new_plans
                .into_iter()
                .map(|plan| plan.into_plan(product.id))
                .collect();
            self.plans.create_plans(product.id, &plans).await?;

            info!(
                slug = %product.slug,
                variants = product.variants.len(),
                plans = plans.len(),
                "Loaded product"
            );
        }

        let report = LoadReport {
            products: self.products.count_products().await?,
            plans: self.plans.count_plans().await?,
        };
        info!(products = report.products, plans = report.plans, "Catalog load complete");

        Ok(report)
    }
}
