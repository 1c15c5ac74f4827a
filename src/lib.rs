pub mod chart;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

use std::error::Error;
use std::path::Path;

use chrono::Local;
use log::info;

use crate::types::{CauseRow, ImpactRow, RunSummary, SchemaVariant, YearSummary};
use crate::util::format_int;

/// The four yearly exports and the layout each one uses. Input file names
/// are fixed by the publisher.
pub const YEARS: [(i32, SchemaVariant); 4] = [
    (2018, SchemaVariant::Pre2020),
    (2019, SchemaVariant::Pre2020),
    (2020, SchemaVariant::Post2020),
    (2021, SchemaVariant::Post2020),
];

pub fn input_file_name(year: i32) -> String {
    format!("condicionamentostransito{}.csv", year)
}

/// Run the whole batch: per-year load → aggregate → report, then the
/// year-over-year report, the JSON summary, the charts and the forecast.
///
/// A missing file, a deferred timestamp that fails to parse, or a
/// zero-hour baseline year aborts the run; per-row decode failures only
/// drop the row.
pub fn run(data_dir: &Path, out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let today = Local::now().date_naive();
    let mut years: Vec<i32> = Vec::new();
    let mut totals: Vec<i64> = Vec::new();
    let mut summaries: Vec<YearSummary> = Vec::new();

    for (year, variant) in YEARS {
        let file_name = input_file_name(year);
        let path = data_dir.join(&file_name);
        info!("a carregar {}", path.display());
        let (records, load_report) = loader::load_restrictions(&path, variant)?;
        println!(
            "{}: {} linhas lidas, {} descartadas",
            year,
            format_int(load_report.decoded_rows),
            format_int(load_report.skipped_rows)
        );

        let total = reports::total_duration(&records)?;
        let by_cause = reports::duration_by_cause(&records)?;
        let by_impact = reports::count_by_impact(&records);

        let report = reports::annual_report(&file_name, year, total, &by_cause, &by_impact, today);
        output::write_text(&out_dir.join(format!("dados_{}.txt", year)), &report)?;

        println!("Duração por causa ({}):", year);
        let cause_rows: Vec<CauseRow> = by_cause
            .iter()
            .map(|(cause, hours)| CauseRow {
                cause: cause.clone(),
                hours: *hours,
            })
            .collect();
        output::preview_table_rows(&cause_rows, 5);

        println!("Casos por impacto ({}):", year);
        let impact_rows: Vec<ImpactRow> = by_impact
            .iter()
            .map(|(impact, count)| ImpactRow {
                impact: impact.clone(),
                count: *count,
            })
            .collect();
        output::preview_table_rows(&impact_rows, 5);

        years.push(year);
        totals.push(total);
        summaries.push(YearSummary {
            year,
            file: file_name,
            total_hours: total,
            hours_by_cause: by_cause,
            count_by_impact: by_impact,
            rows_loaded: load_report.decoded_rows,
            rows_skipped: load_report.skipped_rows,
        });
    }

    let yoy = reports::yoy_report(&years, &totals, today)?;
    output::write_text(&out_dir.join("variacao_por_ano.txt"), &yoy)?;

    let totals_f: Vec<f64> = totals.iter().map(|t| *t as f64).collect();
    let coeffs = chart::fit_quadratic(&totals_f);
    let forecast = chart::eval_poly(&coeffs, totals_f.len() as f64);
    let forecast_year = years.last().copied().unwrap_or(0) + 1;
    chart::render_line_chart(&out_dir.join("duracao_por_ano.svg"), &years, &totals, &coeffs)?;
    chart::render_bar_chart(&out_dir.join("duracao_por_ano_barras.svg"), &years, &totals)?;
    println!(
        "Previsão da súmula da duração para {}: {}h",
        forecast_year,
        forecast.round()
    );

    let summary = RunSummary {
        generated: today,
        years: summaries,
        forecast_year,
        forecast_hours: forecast,
    };
    output::write_json(&out_dir.join("resumo.json"), &summary)?;

    Ok(())
}
