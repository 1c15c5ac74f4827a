// Chart rendering and the next-year forecast.
//
// Charts are written as SVG so the binary needs no native font or image
// libraries; the files are cosmetic output, not a data contract.
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

/// Least-squares degree-2 fit through the points (0, y0) .. (n-1, yn-1).
///
/// Returns `[c0, c1, c2]` for `c0 + c1*x + c2*x^2`, solved from the normal
/// equations with partial pivoting. Deterministic: identical inputs give
/// identical coefficients.
pub fn fit_quadratic(ys: &[f64]) -> [f64; 3] {
    // Sums of x^0..x^4 and of y*x^0..x^2.
    let mut sx = [0.0f64; 5];
    let mut sxy = [0.0f64; 3];
    for (i, &y) in ys.iter().enumerate() {
        let x = i as f64;
        let mut p = 1.0;
        for k in 0..5 {
            sx[k] += p;
            p *= x;
        }
        let mut p = 1.0;
        for k in 0..3 {
            sxy[k] += y * p;
            p *= x;
        }
    }

    // Augmented 3x3 system.
    let mut m = [
        [sx[0], sx[1], sx[2], sxy[0]],
        [sx[1], sx[2], sx[3], sxy[1]],
        [sx[2], sx[3], sx[4], sxy[2]],
    ];
    for col in 0..3 {
        let mut pivot = col;
        for row in col + 1..3 {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        m.swap(col, pivot);
        for row in col + 1..3 {
            let f = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] -= f * m[col][k];
            }
        }
    }
    let mut c = [0.0f64; 3];
    for row in (0..3).rev() {
        let mut acc = m[row][3];
        for k in row + 1..3 {
            acc -= m[row][k] * c[k];
        }
        c[row] = acc / m[row][row];
    }
    c
}

pub fn eval_poly(coeffs: &[f64; 3], x: f64) -> f64 {
    coeffs[0] + coeffs[1] * x + coeffs[2] * x * x
}

/// Forecast for the year after the last observed one: the fitted parabola
/// evaluated one index past the data.
pub fn forecast_next(totals: &[f64]) -> f64 {
    eval_poly(&fit_quadratic(totals), totals.len() as f64)
}

/// Line chart of the yearly totals with the fitted curve extended one year
/// ahead and the forecast point marked.
pub fn render_line_chart(
    path: &Path,
    years: &[i32],
    totals: &[i64],
    coeffs: &[f64; 3],
) -> Result<(), Box<dyn Error>> {
    let forecast_x = years.len() as f64;
    let forecast = eval_poly(coeffs, forecast_x);
    let first_year = years.first().copied().unwrap_or(0);
    let next_year = years.last().copied().unwrap_or(0) + 1;

    let observed_max = totals.iter().copied().max().unwrap_or(0) as f64;
    let y_max = observed_max.max(forecast).max(1.0) * 1.1;
    let y_min = forecast.min(0.0) * 1.1;

    let root = SVGBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Súmula da duração dos constrangimentos em Lisboa por ano",
            ("sans-serif", 24),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..forecast_x + 0.5, y_min..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Anos")
        .y_desc("Horas")
        .x_labels(years.len() + 1)
        .x_label_formatter(&|x| format!("{}", first_year + x.round() as i32))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            totals
                .iter()
                .enumerate()
                .map(|(i, t)| (i as f64, *t as f64)),
            BLUE.stroke_width(2),
        ))?
        .label("Total observado")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE.stroke_width(2)));

    let fitted: Vec<(f64, f64)> = (0..=(years.len() * 10))
        .map(|i| {
            let x = i as f64 / 10.0;
            (x, eval_poly(coeffs, x))
        })
        .collect();
    chart
        .draw_series(LineSeries::new(fitted, &RED))?
        .label("Ajuste quadrático")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED));

    chart
        .draw_series(std::iter::once(Circle::new(
            (forecast_x, forecast),
            5,
            RED.filled(),
        )))?
        .label(format!("Previsão {}: {}h", next_year, forecast.round()))
        .legend(|(x, y)| Circle::new((x + 8, y), 4, RED.filled()));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;
    root.present()?;
    Ok(())
}

/// Bar chart of the yearly totals.
pub fn render_bar_chart(path: &Path, years: &[i32], totals: &[i64]) -> Result<(), Box<dyn Error>> {
    let first_year = years.first().copied().unwrap_or(0);
    let y_max = totals.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.1;

    let root = SVGBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Súmula da duração dos constrangimentos em Lisboa por ano",
            ("sans-serif", 24),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..years.len() as f64 - 0.5, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Anos")
        .y_desc("Horas")
        .x_labels(years.len())
        .x_label_formatter(&|x| format!("{}", first_year + x.round() as i32))
        .draw()?;

    chart.draw_series(totals.iter().enumerate().map(|(i, t)| {
        Rectangle::new(
            [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, *t as f64)],
            BLUE.mix(0.6).filled(),
        )
    }))?;
    root.present()?;
    Ok(())
}
