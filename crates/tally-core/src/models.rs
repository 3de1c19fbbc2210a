//! Domain models for Tally

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub project: String,
    /// Tag name; not a foreign key, may outlive the tag it names
    pub tag: Option<String>,
    pub revenue: f64,
    pub date: NaiveDate,
}

/// Fields for creating or replacing a sale
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub project: String,
    pub tag: Option<String>,
    pub revenue: f64,
    pub date: NaiveDate,
}

impl NewSale {
    pub fn validate(&self) -> Result<()> {
        validate_label("project", &self.project)?;
        validate_amount("revenue", self.revenue)
    }

    /// Tag with blank values collapsed to `None`
    pub fn normalized_tag(&self) -> Option<&str> {
        self.tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// A direct project cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub id: i64,
    pub project: String,
    pub cost: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCost {
    pub project: String,
    pub cost: f64,
    pub date: NaiveDate,
}

impl NewCost {
    pub fn validate(&self) -> Result<()> {
        validate_label("project", &self.project)?;
        validate_amount("cost", self.cost)
    }
}

/// Selling, general & administrative overhead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SgaCost {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSgaCost {
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl NewSgaCost {
    pub fn validate(&self) -> Result<()> {
        validate_label("category", &self.category)?;
        validate_amount("amount", self.amount)
    }
}

/// Money in and out for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowEntry {
    pub id: i64,
    /// Month label, `YYYY-MM`
    pub month: String,
    pub inflow: f64,
    pub outflow: f64,
}

impl CashflowEntry {
    pub fn net(&self) -> f64 {
        self.inflow - self.outflow
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCashflow {
    pub month: String,
    pub inflow: f64,
    pub outflow: f64,
}

impl NewCashflow {
    /// Validate and return the canonical `YYYY-MM` month label
    pub fn validate(&self) -> Result<String> {
        validate_amount("inflow", self.inflow)?;
        validate_amount("outflow", self.outflow)?;
        parse_month(&self.month)
    }
}

/// A sales tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A stored profit snapshot
///
/// `profit` is frozen at the time of recording and is not recomputed when
/// the underlying ledgers change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSnapshot {
    pub id: i64,
    pub revenue: f64,
    pub cost: f64,
    pub sg_a_cost: f64,
    pub profit: f64,
    pub date: NaiveDate,
}

/// A registered user (the credential hash never leaves the db layer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| Error::Validation(format!("Invalid date '{}' (use YYYY-MM-DD)", s)))
}

/// Parse a `YYYY-MM` month label, returning it in canonical zero-padded form
pub fn parse_month(s: &str) -> Result<String> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", trimmed), DATE_FORMAT)
        .map(|d| d.format("%Y-%m").to_string())
        .map_err(|_| Error::Validation(format!("Invalid month '{}' (use YYYY-MM)", s)))
}

fn validate_label(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::Validation(format!("{} must be a number", field)));
    }
    if value < 0.0 {
        return Err(Error::Validation(format!(
            "{} must not be negative (got {})",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(date("2024-03-15").to_string(), "2024-03-15");
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("15/03/2024").is_err());
    }

    #[test]
    fn test_parse_month_normalizes() {
        assert_eq!(parse_month("2023-01").unwrap(), "2023-01");
        assert_eq!(parse_month(" 2023-1 ").unwrap(), "2023-01");
        assert!(parse_month("2023-13").is_err());
        assert!(parse_month("January").is_err());
    }

    #[test]
    fn test_new_sale_validation() {
        let mut sale = NewSale {
            project: "Website".to_string(),
            tag: Some("  ".to_string()),
            revenue: 1200.0,
            date: date("2024-01-10"),
        };
        assert!(sale.validate().is_ok());
        assert_eq!(sale.normalized_tag(), None);

        sale.revenue = -1.0;
        assert!(matches!(sale.validate(), Err(Error::Validation(_))));

        sale.revenue = f64::NAN;
        assert!(matches!(sale.validate(), Err(Error::Validation(_))));

        sale.revenue = 0.0;
        sale.project = " ".to_string();
        assert!(matches!(sale.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_new_cashflow_validation() {
        let flow = NewCashflow {
            month: "2024-2".to_string(),
            inflow: 500.0,
            outflow: 700.0,
        };
        assert_eq!(flow.validate().unwrap(), "2024-02");

        let bad = NewCashflow {
            outflow: -5.0,
            ..flow
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_cashflow_net() {
        let entry = CashflowEntry {
            id: 1,
            month: "2024-01".to_string(),
            inflow: 300.0,
            outflow: 450.0,
        };
        assert_eq!(entry.net(), -150.0);
    }
}
