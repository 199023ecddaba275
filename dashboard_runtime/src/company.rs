//! Company-data ingestion.
//!
//! Reads a quarterly CSV export, maps its headers onto standard columns via
//! alias lists, and derives the summary metrics the dashboard shows next to
//! the plan. The engine never reads any of this; it only moves the default
//! investment a caller proposes.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RuntimeError};

const DEFAULT_CAC: f64 = 385.0;
const DEFAULT_HEADCOUNT: i64 = 620;
const DEFAULT_CHURN: f64 = 0.08;
const DEFAULT_PIPELINE: f64 = 2_500_000.0;
const DEFAULT_QUARTERLY_DEALS: i64 = 45;
const DEFAULT_DEAL_SIZE: f64 = 85_000.0;
const DEFAULT_NPS: f64 = 42.0;
const DEFAULT_CSAT: f64 = 4.2;

/// Half-over-half change, in percent, beyond which a series is trending.
const TREND_THRESHOLD_PCT: f64 = 5.0;

// ── Column mapping ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardColumn {
    Revenue,
    Profit,
    Costs,
    Headcount,
    Cac,
    NewCustomers,
    MarketingSpend,
    ChurnRate,
    RetentionRate,
    Nps,
    Csat,
    Pipeline,
    DealsClosed,
    AvgDealSize,
}

impl StandardColumn {
    pub const ALL: [StandardColumn; 14] = [
        StandardColumn::Revenue,
        StandardColumn::Profit,
        StandardColumn::Costs,
        StandardColumn::Headcount,
        StandardColumn::Cac,
        StandardColumn::NewCustomers,
        StandardColumn::MarketingSpend,
        StandardColumn::ChurnRate,
        StandardColumn::RetentionRate,
        StandardColumn::Nps,
        StandardColumn::Csat,
        StandardColumn::Pipeline,
        StandardColumn::DealsClosed,
        StandardColumn::AvgDealSize,
    ];

    /// Accepted header spellings, most specific first. Headers are compared
    /// after lower-casing and replacing spaces with underscores.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            StandardColumn::Revenue => {
                &["revenue", "sales", "turnover", "gross_revenue", "total_revenue"]
            }
            StandardColumn::Profit => &[
                "profit",
                "net_profit",
                "operating_profit",
                "ebitda",
                "ebit",
                "net_income",
            ],
            StandardColumn::Costs => {
                &["costs", "expenses", "total_costs", "operating_costs", "opex"]
            }
            StandardColumn::Headcount => {
                &["headcount", "employees", "fte", "staff_count", "workforce"]
            }
            StandardColumn::Cac => &["cac", "customer_acquisition_cost", "acquisition_cost"],
            StandardColumn::NewCustomers => &[
                "new_customers",
                "new_clients",
                "acquisitions",
                "customer_acquisitions",
            ],
            StandardColumn::MarketingSpend => &[
                "marketing_spend",
                "marketing_budget",
                "ad_spend",
                "advertising",
            ],
            StandardColumn::ChurnRate => {
                &["churn_rate", "churn", "attrition_rate", "customer_churn"]
            }
            StandardColumn::RetentionRate => {
                &["retention_rate", "retention", "customer_retention"]
            }
            StandardColumn::Nps => &["nps", "net_promoter_score"],
            StandardColumn::Csat => &["csat", "customer_satisfaction"],
            StandardColumn::Pipeline => {
                &["pipeline", "sales_pipeline", "opportunity_pipeline"]
            }
            StandardColumn::DealsClosed => &["deals_closed", "closed_deals", "wins", "sales_wins"],
            StandardColumn::AvgDealSize => &[
                "avg_deal_size",
                "deal_size",
                "average_deal",
                "contract_value",
            ],
        }
    }
}

/// Lower-case and underscore a raw header. A leading byte-order mark is
/// dropped.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

// ── Derived metrics ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Compare the mean of the first half of a series with the second half.
pub fn trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }
    let mid = values.len() / 2;
    let first = mean(&values[..mid]);
    let second = mean(&values[mid..]);
    let change_pct = if first != 0.0 {
        (second - first) / first * 100.0
    } else {
        0.0
    };
    if change_pct > TREND_THRESHOLD_PCT {
        Trend::Increasing
    } else if change_pct < -TREND_THRESHOLD_PCT {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Summary metrics. `None` means the source column was absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyMetrics {
    pub total_revenue: Option<f64>,
    pub avg_quarterly_revenue: Option<f64>,
    pub revenue_trend: Option<Trend>,
    pub total_profit: Option<f64>,
    /// Percent of total revenue.
    pub profit_margin: Option<f64>,
    pub profit_trend: Option<Trend>,
    pub avg_cac: Option<f64>,
    pub cac_trend: Option<Trend>,
    pub current_headcount: i64,
    pub headcount_change: Option<i64>,
    pub current_churn: f64,
    pub avg_churn: Option<f64>,
    pub current_pipeline: Option<f64>,
    pub quarterly_deals: Option<i64>,
    pub avg_deal_size: Option<f64>,
    pub current_nps: Option<f64>,
    pub current_csat: Option<f64>,
    pub revenue_per_employee: Option<f64>,
}

impl CompanyMetrics {
    fn derive(columns: &BTreeMap<StandardColumn, Vec<f64>>) -> Self {
        let col = |c: StandardColumn| columns.get(&c).map(Vec::as_slice);
        let mut m = CompanyMetrics {
            current_headcount: DEFAULT_HEADCOUNT,
            current_churn: DEFAULT_CHURN,
            ..Default::default()
        };

        if let Some(revenue) = col(StandardColumn::Revenue) {
            m.total_revenue = Some(revenue.iter().sum());
            m.avg_quarterly_revenue = Some(mean(revenue));
            m.revenue_trend = Some(trend(revenue));
        }

        if let Some(profit) = col(StandardColumn::Profit) {
            let total: f64 = profit.iter().sum();
            m.total_profit = Some(total);
            m.profit_margin = Some(match m.total_revenue {
                Some(rev) if rev != 0.0 => total / rev * 100.0,
                _ => 0.0,
            });
            m.profit_trend = Some(trend(profit));
        }

        if let Some(cac) = col(StandardColumn::Cac) {
            m.avg_cac = Some(if cac.is_empty() { DEFAULT_CAC } else { mean(cac) });
            m.cac_trend = Some(trend(cac));
        } else if let (Some(spend), Some(customers)) = (
            col(StandardColumn::MarketingSpend),
            col(StandardColumn::NewCustomers),
        ) {
            let customers: f64 = customers.iter().sum();
            m.avg_cac = Some(if customers > 0.0 {
                spend.iter().sum::<f64>() / customers
            } else {
                DEFAULT_CAC
            });
        }

        if let Some(headcount) = col(StandardColumn::Headcount) {
            m.current_headcount = headcount.last().map_or(DEFAULT_HEADCOUNT, |v| *v as i64);
            m.headcount_change = Some(match (headcount.first(), headcount.last()) {
                (Some(first), Some(last)) if headcount.len() > 1 => *last as i64 - *first as i64,
                _ => 0,
            });
        }

        if let Some(churn) = col(StandardColumn::ChurnRate) {
            m.current_churn = churn.last().copied().unwrap_or(DEFAULT_CHURN);
            m.avg_churn = Some(if churn.is_empty() { DEFAULT_CHURN } else { mean(churn) });
        } else if let Some(retention) = col(StandardColumn::RetentionRate) {
            m.current_churn = retention.last().map_or(DEFAULT_CHURN, |r| 1.0 - r / 100.0);
        }

        m.current_pipeline = col(StandardColumn::Pipeline)
            .map(|v| v.last().copied().unwrap_or(DEFAULT_PIPELINE));
        m.quarterly_deals = col(StandardColumn::DealsClosed)
            .map(|v| v.last().map_or(DEFAULT_QUARTERLY_DEALS, |d| *d as i64));
        m.avg_deal_size = col(StandardColumn::AvgDealSize)
            .map(|v| if v.is_empty() { DEFAULT_DEAL_SIZE } else { mean(v) });
        m.current_nps = col(StandardColumn::Nps).map(|v| v.last().copied().unwrap_or(DEFAULT_NPS));
        m.current_csat =
            col(StandardColumn::Csat).map(|v| v.last().copied().unwrap_or(DEFAULT_CSAT));

        if m.current_headcount != 0 {
            m.revenue_per_employee = m.total_revenue.map(|rev| rev / m.current_headcount as f64);
        }
        m
    }
}

// ── Profile ────────────────────────────────────────────────────────

/// An uploaded company dataset and its derived metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyProfile {
    columns: BTreeMap<StandardColumn, Vec<f64>>,
    unmapped_columns: Vec<String>,
    record_count: usize,
    metrics: CompanyMetrics,
}

impl CompanyProfile {
    /// Parse a CSV document: one header row, then one row per period.
    ///
    /// Quoted cells may span lines. Short rows are tolerated; cells that are
    /// empty or not numeric are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
        if headers.iter().all(String::is_empty) {
            return Err(RuntimeError::CompanyData("document is empty".to_string()));
        }

        // First matching alias wins, in alias order.
        let mut mapping: BTreeMap<StandardColumn, usize> = BTreeMap::new();
        for column in StandardColumn::ALL {
            let hit = column
                .aliases()
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == alias));
            if let Some(idx) = hit {
                mapping.insert(column, idx);
            }
        }
        let unmapped_columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !mapping.values().any(|m| m == i))
            .map(|(_, h)| h.clone())
            .collect();

        let mut columns: BTreeMap<StandardColumn, Vec<f64>> =
            mapping.keys().map(|c| (*c, Vec::new())).collect();
        let mut record_count = 0usize;

        for (row_idx, record) in rdr.records().enumerate() {
            let record = record?;
            record_count += 1;
            for (column, idx) in &mapping {
                let Some(raw) = record.get(*idx) else {
                    continue;
                };
                if raw.is_empty() {
                    continue;
                }
                match parse_number(raw) {
                    Some(v) => columns.entry(*column).or_default().push(v),
                    None => tracing::warn!(
                        row = row_idx + 1,
                        column = ?column,
                        value = raw,
                        "skipping non-numeric company data cell"
                    ),
                }
            }
        }

        if record_count == 0 {
            return Err(RuntimeError::CompanyData(
                "document has a header but no rows".to_string(),
            ));
        }

        let metrics = CompanyMetrics::derive(&columns);
        tracing::info!(
            records = record_count,
            mapped = columns.len(),
            unmapped = unmapped_columns.len(),
            "company data processed"
        );

        Ok(Self {
            columns,
            unmapped_columns,
            record_count,
            metrics,
        })
    }

    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    pub fn metrics(&self) -> &CompanyMetrics {
        &self.metrics
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn detected_columns(&self) -> Vec<StandardColumn> {
        self.columns.keys().copied().collect()
    }

    pub fn unmapped_columns(&self) -> &[String] {
        &self.unmapped_columns
    }

    pub fn column(&self, column: StandardColumn) -> Option<&[f64]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    /// `share` of total revenue, when revenue is known and positive.
    pub fn proposed_investment(&self, share: f64) -> Option<f64> {
        self.metrics
            .total_revenue
            .filter(|rev| *rev > 0.0)
            .map(|rev| rev * share)
    }
}

/// Parse a numeric cell, tolerating a leading `$` and thousands separators.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
