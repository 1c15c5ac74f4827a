use crate::types::{DecodeError, ReportError, Restriction};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Write;

pub const SOURCE_URL: &str =
    "https://lisboaaberta.cm-lisboa.pt/index.php/pt/dados/conjuntosde-dados";

/// Sum of the duration of every restriction, in rounded hours.
///
/// A deferred timestamp that fails to parse here (2020+ layout) propagates
/// and aborts the year; it is not part of the per-row skip policy.
pub fn total_duration(records: &[Restriction]) -> Result<i64, DecodeError> {
    let mut sum = 0i64;
    for r in records {
        sum += r.duration_hours()?;
    }
    Ok(sum)
}

/// Duration in hours grouped by cause. Keys are exactly the distinct causes
/// observed; the sorted map keeps report lines stable between runs.
pub fn duration_by_cause(
    records: &[Restriction],
) -> Result<BTreeMap<String, i64>, DecodeError> {
    let mut by_cause: BTreeMap<String, i64> = BTreeMap::new();
    for r in records {
        *by_cause.entry(r.cause.clone()).or_insert(0) += r.duration_hours()?;
    }
    Ok(by_cause)
}

/// Number of cases grouped by impact/relevance label.
pub fn count_by_impact(records: &[Restriction]) -> BTreeMap<String, usize> {
    let mut by_impact: BTreeMap<String, usize> = BTreeMap::new();
    for r in records {
        *by_impact.entry(r.impact.clone()).or_insert(0) += 1;
    }
    by_impact
}

fn cause_lines(by_cause: &BTreeMap<String, i64>) -> String {
    let mut out = String::new();
    for (cause, hours) in by_cause {
        let _ = writeln!(out, "{}: {}h", cause, hours);
    }
    out
}

fn impact_lines(by_impact: &BTreeMap<String, usize>) -> String {
    let mut out = String::new();
    for (impact, count) in by_impact {
        let _ = writeln!(out, "{}: {}", impact, count);
    }
    out
}

/// Yearly report text, fixed template. An empty year renders a valid,
/// sparse report.
pub fn annual_report(
    file_name: &str,
    year: i32,
    total_hours: i64,
    by_cause: &BTreeMap<String, i64>,
    by_impact: &BTreeMap<String, usize>,
    today: NaiveDate,
) -> String {
    format!(
        "Relatório de dados de condicionamento em Lisboa.\n\
         \n\
         Fonte: {source}\n\
         Arquivo: {file_name}\n\
         Ano: {year}\n\
         -----------------------------------------------------\n\
         \n\
         1. Súmula da duração dos condicionamentos no ano: {total_hours}h\n\
         \n\
         2. Lista da súmula da duração dos condicionamentos no ano por causa:\n\
         \n\
         {causes}\n\
         3. Número de casos das várias relevâncias por causa em cada ano:\n\
         \n\
         {impacts}\n\
         -----------------------------------------------------\n\
         Dados da Câmara Municipal de Lisboa (Lisboa Aberta).\n\
         Data: {today}\n",
        source = SOURCE_URL,
        causes = cause_lines(by_cause),
        impacts = impact_lines(by_impact),
    )
}

/// Percentage change between two consecutive yearly totals,
/// round((next/prev - 1) * 100).
///
/// A zero baseline is a legitimate edge case worth flagging distinctly from
/// malformed input, so it surfaces as a typed error instead of inf/NaN.
pub fn pct_change(prev: i64, next: i64, prev_year: i32) -> Result<i64, ReportError> {
    if prev == 0 {
        return Err(ReportError::ZeroBaseline {
            year: prev_year.to_string(),
        });
    }
    Ok(((next as f64 / prev as f64 - 1.0) * 100.0).round() as i64)
}

/// Year-over-year variation report over consecutive totals. Any zero-hour
/// baseline year aborts the whole report.
pub fn yoy_report(
    years: &[i32],
    totals: &[i64],
    today: NaiveDate,
) -> Result<String, ReportError> {
    debug_assert_eq!(years.len(), totals.len());
    let mut lines = String::new();
    for i in 0..totals.len().saturating_sub(1) {
        let change = pct_change(totals[i], totals[i + 1], years[i])?;
        let _ = writeln!(
            lines,
            "Variação da súmula da duração total dos constrangimentos entre {} e {}: {}%",
            years[i + 1],
            years[i],
            change
        );
    }
    let next_year = years.last().copied().unwrap_or(0) + 1;
    Ok(format!(
        "Relatório de variação da súmula dos condicionamentos em Lisboa ano a ano:\n\
         \n\
         {lines}\n\
         Veja o gráfico com a súmula da duração do total de condicionamentos por ano\n\
         e a previsão para {next_year}.\n\
         \n\
         -----------------------------------------------------\n\
         Dados da Câmara Municipal de Lisboa (Lisboa Aberta).\n\
         Data: {today}\n",
    ))
}
