use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;
use thiserror::Error;

use crate::util::parse_ms;

/// Which historical layout of the embedded condition sub-field a file uses.
///
/// The Lisbon export changed the structure of the condition column starting
/// with the 2020 files. The fixed offsets in the loader are facts about
/// those files, not tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    /// 2018 and 2019 files.
    Pre2020,
    /// 2020 and 2021 files.
    Post2020,
}

/// A single row could not be turned into a [`Restriction`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("row has {0} fields, expected at least 8")]
    TooFewFields(usize),
    #[error("condition sub-field has {got} pieces, layout needs {need}")]
    TooFewConditionPieces { got: usize, need: usize },
    #[error("timestamp text {0:?} is not a number")]
    BadTimestamp(String),
}

/// Failure while assembling the year-over-year variation report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("total for {year} is zero, variation against it is undefined")]
    ZeroBaseline { year: String },
}

/// Start/end pair of a restriction, as extracted from the condition
/// sub-fields.
///
/// The pre-2020 files are parsed to epoch milliseconds at decode time; the
/// 2020+ files keep the sliced text and only parse it when a duration is
/// requested. A bad value therefore fails at different points depending on
/// the variant, and that timing is part of the observed behavior.
#[derive(Debug, Clone)]
pub enum Period {
    Millis { start_ms: f64, end_ms: f64 },
    Deferred { start: String, end: String },
}

/// One decoded traffic-restriction entry. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Restriction {
    pub entity_id: String,
    pub impact: String,
    pub restriction_type: String,
    pub address: String,
    pub condition_fields: Vec<String>,
    pub cause: String,
    pub position: String,
    pub creation: String,
    pub period: Period,
}

impl Restriction {
    /// Hours between the embedded start and end timestamps, rounded.
    ///
    /// Recomputed on every call, never cached. End is parsed before start,
    /// matching the order the files are read in.
    pub fn duration_hours(&self) -> Result<i64, DecodeError> {
        let (start_ms, end_ms) = match &self.period {
            Period::Millis { start_ms, end_ms } => (*start_ms, *end_ms),
            Period::Deferred { start, end } => {
                let end_ms = parse_ms(end)?;
                let start_ms = parse_ms(start)?;
                (start_ms, end_ms)
            }
        };
        Ok(((end_ms - start_ms) / 1000.0 / 3600.0).round() as i64)
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CauseRow {
    #[serde(rename = "Causa")]
    #[tabled(rename = "Causa")]
    pub cause: String,
    #[serde(rename = "Horas")]
    #[tabled(rename = "Horas")]
    pub hours: i64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ImpactRow {
    #[serde(rename = "Impacto")]
    #[tabled(rename = "Impacto")]
    pub impact: String,
    #[serde(rename = "Casos")]
    #[tabled(rename = "Casos")]
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub file: String,
    pub total_hours: i64,
    pub hours_by_cause: BTreeMap<String, i64>,
    pub count_by_impact: BTreeMap<String, usize>,
    pub rows_loaded: usize,
    pub rows_skipped: usize,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated: NaiveDate,
    pub years: Vec<YearSummary>,
    pub forecast_year: i32,
    pub forecast_hours: f64,
}
