use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::validation::{at_least, at_most, optional_text, required_number, ValidationError};

/// Installment (EMI) financing plan owned by exactly one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiPlan {
    pub id: Uuid,
    pub monthly_amount: f64,
    pub tenure_months: i32,
    /// Annual rate in percent, 0..=100
    pub interest_rate: f64,
    pub cashback: Option<String>,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw write payload for a plan. The owning product always comes from the
/// caller's context, never from the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiPlanInput {
    pub monthly_amount: Option<f64>,
    pub tenure_months: Option<f64>,
    pub interest_rate: Option<f64>,
    pub cashback: Option<String>,
}

impl EmiPlanInput {
    pub fn validate(self) -> Result<NewEmiPlan, ValidationError> {
        let monthly_amount =
            required_number("monthlyAmount", self.monthly_amount, "Monthly amount is required")?;
        let monthly_amount = at_least(
            "monthlyAmount",
            monthly_amount,
            0.0,
            "Monthly amount cannot be negative",
        )?;

        let tenure = required_number("tenureMonths", self.tenure_months, "Tenure is required")?;
        let tenure = at_least("tenureMonths", tenure, 1.0, "Tenure must be at least 1 month")?;
        if tenure.fract() != 0.0 || tenure > i32::MAX as f64 {
            return Err(ValidationError::new(
                "tenureMonths",
                "Tenure must be a whole number of months",
            ));
        }

        let interest_rate =
            required_number("interestRate", self.interest_rate, "Interest rate is required")?;
        let interest_rate = at_least(
            "interestRate",
            interest_rate,
            0.0,
            "Interest rate cannot be negative",
        )?;
        let interest_rate = at_most(
            "interestRate",
            interest_rate,
            100.0,
            "Interest rate cannot exceed 100%",
        )?;

        Ok(NewEmiPlan {
            monthly_amount,
            tenure_months: tenure as i32,
            interest_rate,
            cashback: optional_text(self.cashback),
        })
    }
}

/// A plan payload that passed validation, not yet bound to a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmiPlan {
    monthly_amount: f64,
    tenure_months: i32,
    interest_rate: f64,
    cashback: Option<String>,
}

impl NewEmiPlan {
    pub fn into_plan(self, product_id: Uuid) -> EmiPlan {
        let now = Utc::now();
        EmiPlan {
            id: Uuid::new_v4(),
            monthly_amount: self.monthly_amount,
            tenure_months: self.tenure_months,
            interest_rate: self.interest_rate,
            cashback: self.cashback,
            product_id,
            created_at: now,
            updated_at: now,
        }
    }
}
