use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_text(path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
    std::fs::write(path, content)?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print the first `max_rows` rows of a summary as a markdown table.
pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(sem dados)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CauseRow;

    #[test]
    fn writes_text_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("dados_2018.txt");
        write_text(&txt, "Relatório\n").unwrap();
        assert_eq!(std::fs::read_to_string(&txt).unwrap(), "Relatório\n");

        let json = dir.path().join("resumo.json");
        let rows = vec![CauseRow {
            cause: "OBRAS".to_string(),
            hours: 12,
        }];
        write_json(&json, &rows).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(parsed[0]["Causa"], "OBRAS");
        assert_eq!(parsed[0]["Horas"], 12);
    }
}
