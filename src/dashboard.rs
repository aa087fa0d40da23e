//! Dashboard description: which cards and rows to build, and from what data.
//!
//! A dashboard file is JSON in one of two shapes. Either a full
//! [`DashboardSpec`]:
//!
//! ```json
//! { "cards": [{ "title": "Uptime", "value": 99.9, "suffix": "%" }], "rows": [] }
//! ```
//!
//! or the summary returned by the analytics backend, which is turned into the
//! standard four cards by [`DashboardSpec::from_summary`]:
//!
//! ```json
//! { "total_revenue": 48250.0, "total_expense": 12100.5, "net_profit": 36149.5,
//!   "current_balance": 36149.5, "risk_exposure": "Low (Stable)" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::widgets::{metric_card, metric_row, MetricCard, MetricRow, MetricValue};

/// Aggregates served by the summary endpoint. Missing numbers count as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryMetrics {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_expense: f64,
    #[serde(default)]
    pub net_profit: f64,
    #[serde(default)]
    pub current_balance: f64,
    /// Placeholder label until the risk model lands; not shown on the card
    #[serde(default)]
    pub risk_exposure: Option<String>,
}

impl SummaryMetrics {
    /// Expenses as a percentage of revenue, 0 without revenue
    pub fn expense_ratio(&self) -> f64 {
        if self.total_revenue > 0.0 {
            (self.total_expense / self.total_revenue * 100.0).round()
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardSpec {
    pub title: String,
    #[serde(default)]
    pub value: Option<MetricValue>,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub extra: Vec<String>,
}

impl CardSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn value(mut self, value: impl Into<MetricValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn extra(mut self, line: impl Into<String>) -> Self {
        self.extra.push(line.into());
        self
    }

    /// Build the widget. Transition settings are left to the caller.
    pub fn build(&self) -> MetricCard {
        let mut card = metric_card(self.title.as_str())
            .value(self.value.clone())
            .prefix(self.prefix.as_str())
            .suffix(self.suffix.as_str());
        if let Some(info) = &self.info {
            card = card.info(info.as_str());
        }
        for line in &self.extra {
            card = card.extra(line.as_str());
        }
        card
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowSpec {
    pub label: String,
    pub value: f64,
    #[serde(default)]
    pub suffix: String,
}

impl RowSpec {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            suffix: String::new(),
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn build(&self) -> MetricRow {
        metric_row(self.label.as_str(), self.value).suffix(self.suffix.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSpec {
    pub cards: Vec<CardSpec>,
    #[serde(default)]
    pub rows: Vec<RowSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DashboardFile {
    Spec(DashboardSpec),
    Summary(SummaryMetrics),
}

impl DashboardSpec {
    /// The standard overview: revenue, expenses, balance and risk
    pub fn from_summary(summary: &SummaryMetrics) -> Self {
        let cards = vec![
            CardSpec::new("Total Revenue")
                .value(summary.total_revenue)
                .prefix("$")
                .info("Total revenue generated from all accounts in the current period."),
            CardSpec::new("Total Expenses")
                .value(summary.total_expense)
                .prefix("$")
                .info("Aggregated expenses across all registered accounts."),
            CardSpec::new("Net Balance")
                .value(summary.current_balance)
                .prefix("$")
                .info("Current liquid assets available (Revenue - Expenses).")
                .extra("+12% from last month"),
            CardSpec::new("Risk Score")
                .value("ANALYZING")
                .info(
                    "Real-time risk assessment score based on transaction patterns and anomalies.",
                )
                .extra("ML Model Pending (Phase 2)"),
        ];

        let rows = vec![
            RowSpec::new("Net Profit", summary.net_profit),
            RowSpec::new("Expense Ratio", summary.expense_ratio()).suffix("%"),
        ];

        Self { cards, rows }
    }

    /// Parse either a full dashboard or a backend summary
    pub fn from_json(json: &str) -> Result<Self> {
        let file: DashboardFile = serde_json::from_str(json)?;
        Ok(match file {
            DashboardFile::Spec(spec) => spec,
            DashboardFile::Summary(summary) => Self::from_summary(&summary),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Dashboard {
            path: path.to_path_buf(),
            source,
        })?;
        let spec = Self::from_json(&json)?;
        log::info!(
            "Loaded dashboard {} with {} cards and {} rows",
            path.display(),
            spec.cards.len(),
            spec.rows.len()
        );
        Ok(spec)
    }

    pub fn build_cards(&self) -> Vec<MetricCard> {
        self.cards.iter().map(CardSpec::build).collect()
    }

    pub fn build_rows(&self) -> Vec<MetricRow> {
        self.rows.iter().map(RowSpec::build).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> SummaryMetrics {
        SummaryMetrics {
            total_revenue: 48250.0,
            total_expense: 12062.5,
            net_profit: 36187.5,
            current_balance: 36187.5,
            risk_exposure: Some("Low (Stable)".to_string()),
        }
    }

    #[test]
    fn test_from_summary_builds_standard_cards() {
        let spec = DashboardSpec::from_summary(&summary());
        let titles: Vec<_> = spec.cards.iter().map(|card| card.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Total Revenue", "Total Expenses", "Net Balance", "Risk Score"]
        );
        assert_eq!(spec.cards[0].value, Some(MetricValue::Number(48250.0)));
        assert_eq!(spec.cards[2].extra, vec!["+12% from last month"]);
        assert_eq!(
            spec.cards[3].value,
            Some(MetricValue::Label("ANALYZING".to_string()))
        );
        assert!(spec.cards.iter().all(|card| card.info.is_some()));
        assert_eq!(spec.rows[1].value, 25.0);
    }

    #[test]
    fn test_summary_json_with_missing_fields() {
        let spec = DashboardSpec::from_json(r#"{ "total_revenue": 10.0 }"#).unwrap();
        assert_eq!(spec.cards.len(), 4);
        assert_eq!(spec.cards[1].value, Some(MetricValue::Number(0.0)));
        assert_eq!(spec.rows[1].value, 0.0);
    }

    #[test]
    fn test_full_spec_json() {
        let json = r#"{
            "cards": [
                { "title": "Uptime", "value": 99.9, "suffix": "%" },
                { "title": "Status", "value": "DEGRADED", "info": "Two regions report errors." },
                { "title": "Pending" }
            ],
            "rows": [{ "label": "Incidents", "value": 3 }]
        }"#;
        let spec = DashboardSpec::from_json(json).unwrap();
        assert_eq!(spec.cards.len(), 3);
        assert_eq!(spec.cards[0].value, Some(MetricValue::Number(99.9)));
        assert_eq!(
            spec.cards[1].value,
            Some(MetricValue::Label("DEGRADED".to_string()))
        );
        assert_eq!(spec.cards[2].value, None);
        assert_eq!(spec.rows[0].value, 3.0);

        let cards = spec.build_cards();
        assert!(!cards[0].has_info());
        assert!(cards[1].has_info());
        assert_eq!(cards[2].readout(), None);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = DashboardSpec::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = DashboardSpec::load("/nonexistent/dashboard.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dashboard.json"));
    }
}
