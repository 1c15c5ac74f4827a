use condicionamentos::{input_file_name, run};
use std::path::Path;

// Condition sub-field pieces shaped like the real exports: 15 characters
// before the end timestamp, 16 before the start one.
fn end_piece(ms: i64) -> String {
    format!("{{\"dtFechoPrev\":{}}}", ms)
}

fn pre2020_cond(start_ms: i64, end_ms: i64) -> String {
    format!(
        "{},estado:ATIVO,tipo:TOTAL,faixas:2,sentido:ASC,{{\"dtInicioPrev\":{}.0}}",
        end_piece(end_ms),
        start_ms
    )
}

fn post2020_cond(start_ms: i64, end_ms: i64) -> String {
    format!(
        "{},estado:ATIVO,tipo:TOTAL,faixas:2,{{\"dtInicioPrev\":{}}}",
        end_piece(end_ms),
        start_ms
    )
}

fn write_fixture(dir: &Path, year: i32, rows: &[[String; 8]]) {
    let mut wtr = csv::Writer::from_path(dir.join(input_file_name(year))).unwrap();
    wtr.write_record([
        "id", "impacto", "restricao", "morada", "condicao", "motivo", "posicao", "criacao",
    ])
    .unwrap();
    for row in rows {
        wtr.write_record(row).unwrap();
    }
    wtr.flush().unwrap();
}

fn row(id: &str, impact: &str, cond: String, cause: &str) -> [String; 8] {
    [
        id.to_string(),
        impact.to_string(),
        "Condicionamento de trânsito".to_string(),
        "Av. da Liberdade".to_string(),
        cond,
        cause.to_string(),
        "38.72,-9.14".to_string(),
        "2021-01-01 00:00".to_string(),
    ]
}

const HOUR_MS: i64 = 3_600_000;

#[test]
fn full_pipeline_over_four_years() {
    let data_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();

    // 2018: 12h + 3h = 15h, one malformed row dropped silently.
    write_fixture(
        data_dir.path(),
        2018,
        &[
            row("1", "Alto", pre2020_cond(0, 12 * HOUR_MS), "OBRAS"),
            row("2", "Baixo", pre2020_cond(0, 3 * HOUR_MS), "PODA DE ÁRVORES"),
            row("3", "Alto", "sem,subcampos".to_string(), "OBRAS"),
        ],
    );
    // 2019: 30h.
    write_fixture(
        data_dir.path(),
        2019,
        &[row("4", "Alto", pre2020_cond(0, 30 * HOUR_MS), "OBRAS")],
    );
    // 2020: 10h, post-2020 layout.
    write_fixture(
        data_dir.path(),
        2020,
        &[row("5", "Médio", post2020_cond(0, 10 * HOUR_MS), "EVENTO")],
    );
    // 2021: 20h.
    write_fixture(
        data_dir.path(),
        2021,
        &[row("6", "Baixo", post2020_cond(0, 20 * HOUR_MS), "OBRAS")],
    );

    run(data_dir.path(), out_dir.path()).unwrap();

    let dados_2018 =
        std::fs::read_to_string(out_dir.path().join("dados_2018.txt")).unwrap();
    assert!(dados_2018.contains("Ano: 2018"));
    assert!(dados_2018.contains("no ano: 15h"));
    assert!(dados_2018.contains("OBRAS: 12h"));
    assert!(dados_2018.contains("PODA DE ÁRVORES: 3h"));
    assert!(dados_2018.contains("Alto: 1"));
    assert!(dados_2018.contains("Baixo: 1"));

    let variacao =
        std::fs::read_to_string(out_dir.path().join("variacao_por_ano.txt")).unwrap();
    // round(30/15 - 1), round(10/30 - 1), round(20/10 - 1), in percent.
    assert!(variacao.contains("entre 2019 e 2018: 100%"));
    assert!(variacao.contains("entre 2020 e 2019: -67%"));
    assert!(variacao.contains("entre 2021 e 2020: 100%"));

    let resumo: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out_dir.path().join("resumo.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(resumo["years"][0]["total_hours"], 15);
    assert_eq!(resumo["years"][0]["rows_loaded"], 2);
    assert_eq!(resumo["years"][0]["rows_skipped"], 1);
    assert_eq!(resumo["years"][3]["year"], 2021);
    assert_eq!(resumo["forecast_year"], 2022);
    assert!(resumo["forecast_hours"].as_f64().unwrap().is_finite());

    assert!(out_dir.path().join("duracao_por_ano.svg").exists());
    assert!(out_dir.path().join("duracao_por_ano_barras.svg").exists());
}

#[test]
fn missing_input_file_aborts_the_run() {
    let data_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    assert!(run(data_dir.path(), out_dir.path()).is_err());
}

#[test]
fn header_only_files_produce_sparse_reports_but_no_yoy() {
    let data_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    for year in [2018, 2019, 2020, 2021] {
        write_fixture(data_dir.path(), year, &[]);
    }

    // All totals are zero, so the first year-over-year pair divides by a
    // zero baseline and the run fails after the annual reports are out.
    let err = run(data_dir.path(), out_dir.path()).unwrap_err();
    assert!(err.to_string().contains("2018"));

    let dados_2018 =
        std::fs::read_to_string(out_dir.path().join("dados_2018.txt")).unwrap();
    assert!(dados_2018.contains("no ano: 0h"));
    assert!(!out_dir.path().join("variacao_por_ano.txt").exists());
}
