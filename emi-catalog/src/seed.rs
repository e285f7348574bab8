use serde::{Deserialize, Serialize};
use crate::emi::EmiPlanInput;
use crate::product::ProductInput;

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

/// One product of the sample catalog together with its installment plans
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleEntry {
    pub product: ProductInput,
    #[serde(default)]
    pub emi_plans: Vec<EmiPlanInput>,
}

/// The fixed dataset loaded by the catalog loader.
pub fn sample_catalog() -> Result<Vec<SampleEntry>, serde_json::Error> {
    serde_json::from_str(SAMPLE_CATALOG)
}
