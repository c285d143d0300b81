//! Financial ledger rows: expenditures and payments/receipts.
//!
//! Amounts are `Decimal` end to end so `total = qty * rate` holds to the
//! cent, which is a stated property of the ledger.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One expenditure line. `slno` is the human-chosen serial number and is
/// unique; `total` is always computed server-side.
#[derive(Debug, Clone, Serialize)]
pub struct Expenditure {
    pub id: Uuid,
    pub slno: String,
    pub item_description: String,
    pub qty: Decimal,
    pub unit: String,
    pub rate: Decimal,
    pub total: Decimal,
    pub project_name: String,
    pub location: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for an expenditure. Field names follow the admin
/// console's camelCase convention.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureInput {
    pub slno: String,
    pub item_description: String,
    pub qty: Decimal,
    pub unit: String,
    pub rate: Decimal,
    pub project_name: String,
    pub location: String,
    pub date: NaiveDate,
}

impl ExpenditureInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.slno.trim().is_empty()
            || self.item_description.trim().is_empty()
            || self.unit.trim().is_empty()
            || self.project_name.trim().is_empty()
            || self.location.trim().is_empty()
        {
            return Err("All fields are required".to_string());
        }

        if self.qty <= Decimal::ZERO || self.rate < Decimal::ZERO {
            return Err(
                "Quantity must be greater than 0 and rate must be non-negative".to_string(),
            );
        }

        Ok(())
    }

    pub fn total(&self) -> Decimal {
        self.qty * self.rate
    }
}

/// Direction of a payment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Payment,
    Receipt,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Payment => "payment",
            PaymentKind::Receipt => "receipt",
        }
    }

    pub fn from_db(value: &str) -> PaymentKind {
        match value {
            "receipt" => PaymentKind::Receipt,
            _ => PaymentKind::Payment,
        }
    }
}

/// One payment or receipt against a site.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: PaymentKind,
    pub labour_name: String,
    pub site_name: String,
    pub pay_amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub labour_name: String,
    pub site_name: String,
    pub pay_amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl PaymentInput {
    pub fn validate(&self) -> Result<PaymentKind, String> {
        if self.labour_name.trim().is_empty() || self.site_name.trim().is_empty() {
            return Err("Type, labour name, site name, amount, and date are required".to_string());
        }

        let kind = match self.kind.as_str() {
            "payment" => PaymentKind::Payment,
            "receipt" => PaymentKind::Receipt,
            _ => return Err("Type must be either \"payment\" or \"receipt\"".to_string()),
        };

        if self.pay_amount <= Decimal::ZERO {
            return Err("Amount must be greater than 0".to_string());
        }

        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expenditure_input() -> ExpenditureInput {
        ExpenditureInput {
            slno: "EXP-001".to_string(),
            item_description: "Chairs".to_string(),
            qty: dec!(2),
            unit: "pcs".to_string(),
            rate: dec!(500),
            project_name: "X".to_string(),
            location: "Kathmandu".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn total_is_qty_times_rate_to_the_cent() {
        let input = expenditure_input();
        assert_eq!(input.total(), dec!(1000));

        let fractional = ExpenditureInput {
            qty: dec!(3),
            rate: dec!(0.10),
            ..input
        };
        assert_eq!(fractional.total(), dec!(0.30));
    }

    #[test]
    fn zero_qty_and_negative_rate_are_rejected() {
        let mut input = expenditure_input();
        input.qty = Decimal::ZERO;
        assert!(input.validate().is_err());

        let mut input = expenditure_input();
        input.rate = dec!(-1);
        assert!(input.validate().is_err());

        // rate of exactly zero is allowed
        let mut input = expenditure_input();
        input.rate = Decimal::ZERO;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn expenditure_input_accepts_camel_case() {
        let input: ExpenditureInput = serde_json::from_str(
            r#"{"slno":"EXP-001","itemDescription":"Chairs","qty":2,"unit":"pcs",
                "rate":500,"projectName":"X","location":"Kathmandu","date":"2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(input.item_description, "Chairs");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn payment_kind_is_whitelisted() {
        let mut input = PaymentInput {
            kind: "payment".to_string(),
            labour_name: "Crew A".to_string(),
            site_name: "Site 1".to_string(),
            pay_amount: dec!(100),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: None,
        };
        assert_eq!(input.validate().unwrap(), PaymentKind::Payment);

        input.kind = "refund".to_string();
        assert!(input.validate().is_err());

        input.kind = "receipt".to_string();
        input.pay_amount = Decimal::ZERO;
        assert!(input.validate().is_err());
    }
}
