pub mod product;
pub mod emi;
pub mod validation;
pub mod seed;

pub use product::{NewProduct, Product, ProductInput, VariantKind, VariantOption, Variants};
pub use emi::{EmiPlan, EmiPlanInput, NewEmiPlan};
pub use validation::{normalize_slug, ValidationError};
pub use seed::{sample_catalog, SampleEntry};
