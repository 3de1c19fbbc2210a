//! Presentation decks
//!
//! A deck is a JSON document of slides, each carrying one chart's data
//! series and an optional headline metric. Every figure is taken from the
//! same aggregation calls the tables and CLI summaries use.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::write_atomic;
use crate::aggregate::{GroupTotal, MonthlyTotal, TargetStatus};
use crate::db::Database;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// One labelled value of a chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub label: String,
    pub value: f64,
}

impl Point {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub chart: Chart,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub slides: Vec<Slide>,
}

/// Which ledger a deck presents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckKind {
    Sales,
    Costs,
    Sga,
    Profit,
}

impl DeckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeckKind::Sales => "sales",
            DeckKind::Costs => "costs",
            DeckKind::Sga => "sga",
            DeckKind::Profit => "profit",
        }
    }
}

impl FromStr for DeckKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sales" => Ok(DeckKind::Sales),
            "costs" | "cost" => Ok(DeckKind::Costs),
            "sga" | "sg&a" => Ok(DeckKind::Sga),
            "profit" | "profits" => Ok(DeckKind::Profit),
            other => Err(Error::Validation(format!("Unknown deck '{}'", other))),
        }
    }
}

fn bar_of_groups(title: &str, x_label: &str, groups: &[GroupTotal], metric: String) -> Slide {
    Slide {
        title: title.to_string(),
        chart: Chart {
            kind: ChartKind::Bar,
            x_label: x_label.to_string(),
            y_label: "Amount".to_string(),
            series: groups.iter().map(|g| Point::new(&g.label, g.amount)).collect(),
        },
        metric: Some(metric),
    }
}

fn line_of_months(title: &str, y_label: &str, months: &[MonthlyTotal]) -> Slide {
    Slide {
        title: title.to_string(),
        chart: Chart {
            kind: ChartKind::Line,
            x_label: "Month".to_string(),
            y_label: y_label.to_string(),
            series: months.iter().map(|m| Point::new(&m.month, m.amount)).collect(),
        },
        metric: None,
    }
}

fn target_slide(status: &TargetStatus) -> Slide {
    let mut series = Vec::with_capacity(2);
    if let Some(target) = status.target() {
        series.push(Point::new("Target", target));
    }
    series.push(Point::new("Actual", status.actual()));

    let metric = match status.variance() {
        Some(variance) => format!("Variance: {:.2}", variance),
        None => "No target set".to_string(),
    };
    Slide {
        title: "Target vs actual".to_string(),
        chart: Chart {
            kind: ChartKind::Bar,
            x_label: String::new(),
            y_label: "Revenue".to_string(),
            series,
        },
        metric: Some(metric),
    }
}

fn sales_slides(db: &Database) -> Result<Vec<Slide>> {
    let by_tag = db.sales_by_tag()?;
    Ok(vec![
        target_slide(&db.sales_target_status()?),
        line_of_months("Monthly sales", "Revenue", &db.sales_by_month()?),
        Slide {
            title: "Sales share by tag".to_string(),
            chart: Chart {
                kind: ChartKind::Pie,
                x_label: "Tag".to_string(),
                y_label: "Share".to_string(),
                series: by_tag.iter().map(|g| Point::new(&g.label, g.share)).collect(),
            },
            metric: None,
        },
    ])
}

fn profit_slides(db: &Database) -> Result<Vec<Slide>> {
    let summary = db.profit_summary()?;
    let monthly = db.profit_by_month()?;
    Ok(vec![
        Slide {
            title: "Profit overview".to_string(),
            chart: Chart {
                kind: ChartKind::Bar,
                x_label: String::new(),
                y_label: "Amount".to_string(),
                series: vec![
                    Point::new("Revenue", summary.revenue),
                    Point::new("Cost", summary.cost),
                    Point::new("SG&A", summary.sg_a_cost),
                    Point::new("Profit", summary.profit),
                ],
            },
            metric: Some(format!(
                "Profit: {:.2} ({}k)",
                summary.profit,
                summary.profit_thousands()
            )),
        },
        Slide {
            title: "Monthly profit".to_string(),
            chart: Chart {
                kind: ChartKind::Line,
                x_label: "Month".to_string(),
                y_label: "Profit".to_string(),
                series: monthly
                    .iter()
                    .map(|m| Point::new(&m.month, m.profit))
                    .collect(),
            },
            metric: None,
        },
    ])
}

/// Assemble a deck from the current store contents
pub fn build_deck(db: &Database, kind: DeckKind) -> Result<Deck> {
    let (title, slides) = match kind {
        DeckKind::Sales => ("Sales", sales_slides(db)?),
        DeckKind::Costs => (
            "Costs",
            vec![bar_of_groups(
                "Costs by project",
                "Project",
                &db.costs_by_project()?,
                format!("Total cost: {:.2}", db.cost_total()?),
            )],
        ),
        DeckKind::Sga => (
            "SG&A",
            vec![bar_of_groups(
                "SG&A by category",
                "Category",
                &db.sga_by_category()?,
                format!("Total SG&A: {:.2}", db.sga_total()?),
            )],
        ),
        DeckKind::Profit => ("Profit", profit_slides(db)?),
    };

    Ok(Deck {
        title: title.to_string(),
        generated_at: Utc::now(),
        slides,
    })
}

/// Build a deck and write it to `path` as pretty JSON
pub fn write_deck(db: &Database, kind: DeckKind, path: &Path) -> Result<Deck> {
    let deck = build_deck(db, kind)?;
    write_atomic(path, |file| {
        serde_json::to_writer_pretty(&mut *file, &deck)?;
        Ok(())
    })?;
    info!(deck = kind.as_str(), slides = deck.slides.len(), "Deck exported");
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, NewCost, NewSale, NewSgaCost};

    fn seeded() -> Database {
        let db = Database::in_memory().unwrap();
        db.create_tag("Retail").unwrap();
        db.record_sale(&NewSale {
            project: "Kiosk".to_string(),
            tag: Some("Retail".to_string()),
            revenue: 7000.0,
            date: parse_date("2024-01-15").unwrap(),
        })
        .unwrap();
        db.record_sale(&NewSale {
            project: "Web".to_string(),
            tag: None,
            revenue: 3000.0,
            date: parse_date("2024-02-15").unwrap(),
        })
        .unwrap();
        db.record_cost(&NewCost {
            project: "Kiosk".to_string(),
            cost: 4000.0,
            date: parse_date("2024-01-20").unwrap(),
        })
        .unwrap();
        db.record_sga_cost(&NewSgaCost {
            category: "Rent".to_string(),
            amount: 2000.0,
            date: parse_date("2024-02-01").unwrap(),
        })
        .unwrap();
        db
    }

    #[test]
    fn test_sales_deck_without_target() {
        let db = seeded();
        let deck = build_deck(&db, DeckKind::Sales).unwrap();
        assert_eq!(deck.slides.len(), 3);

        let target = &deck.slides[0];
        assert_eq!(target.chart.series, vec![Point::new("Actual", 10000.0)]);
        assert_eq!(target.metric.as_deref(), Some("No target set"));

        let monthly = &deck.slides[1];
        assert_eq!(monthly.chart.kind, ChartKind::Line);
        assert_eq!(monthly.chart.series.len(), 2);

        let pie = &deck.slides[2];
        assert_eq!(pie.chart.kind, ChartKind::Pie);
        assert_eq!(pie.chart.series[0], Point::new("Retail", 0.7));
    }

    #[test]
    fn test_sales_deck_with_target() {
        let db = seeded();
        db.set_target_revenue(8000.0).unwrap();
        let deck = build_deck(&db, DeckKind::Sales).unwrap();
        let target = &deck.slides[0];
        assert_eq!(target.chart.series[0], Point::new("Target", 8000.0));
        assert_eq!(target.metric.as_deref(), Some("Variance: 2000.00"));
    }

    #[test]
    fn test_profit_deck_matches_summary() {
        let db = seeded();
        let deck = build_deck(&db, DeckKind::Profit).unwrap();
        let overview = &deck.slides[0];
        assert_eq!(overview.chart.series[3], Point::new("Profit", 4000.0));
        assert_eq!(overview.metric.as_deref(), Some("Profit: 4000.00 (4k)"));

        let monthly: Vec<f64> = deck.slides[1].chart.series.iter().map(|p| p.value).collect();
        assert_eq!(monthly, vec![3000.0, 1000.0]);
    }

    #[test]
    fn test_cost_and_sga_decks() {
        let db = seeded();
        let costs = build_deck(&db, DeckKind::Costs).unwrap();
        assert_eq!(costs.slides[0].metric.as_deref(), Some("Total cost: 4000.00"));

        let sga = build_deck(&db, DeckKind::Sga).unwrap();
        assert_eq!(sga.slides[0].chart.series, vec![Point::new("Rent", 2000.0)]);
    }

    #[test]
    fn test_write_deck_json() {
        let db = seeded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.json");
        write_deck(&db, DeckKind::Sales, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["title"], "Sales");
        assert_eq!(value["slides"][1]["chart"]["kind"], "line");
        assert!(value["slides"][1].get("metric").is_none());
    }

    #[test]
    fn test_deck_kind_parse() {
        assert_eq!("Profit".parse::<DeckKind>().unwrap(), DeckKind::Profit);
        assert_eq!("sg&a".parse::<DeckKind>().unwrap(), DeckKind::Sga);
        assert!("charts".parse::<DeckKind>().is_err());
    }
}
