use crate::types::{DecodeError, Period, Restriction, SchemaVariant};
use crate::util::{parse_ms, strip_fixed};
use csv::{ReaderBuilder, StringRecord};
use log::debug;
use std::error::Error;
use std::path::Path;

/// Counters for one file load. The drop-and-continue policy means skipped
/// rows are invisible to the aggregates; the counters keep the drop rate
/// observable and testable.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub decoded_rows: usize,
    pub skipped_rows: usize,
}

/// Decode one CSV row into a [`Restriction`] using the given layout.
///
/// Field 5 (index 4) carries a comma-joined sub-structure; the start/end
/// timestamps sit at fixed character offsets inside two of its pieces:
///
/// - pre-2020: end in piece 0 (cut 15/1), start in piece 5 (cut 16/3),
///   both parsed to milliseconds here;
/// - 2020+: end in piece 0 (cut 15/1), start in piece 4 (cut 16/1), kept
///   as text and parsed only when a duration is requested.
pub fn decode_row(
    record: &StringRecord,
    variant: SchemaVariant,
) -> Result<Restriction, DecodeError> {
    if record.len() < 8 {
        return Err(DecodeError::TooFewFields(record.len()));
    }
    let field = |i: usize| record.get(i).unwrap_or("").to_string();

    let condition_fields: Vec<String> = record
        .get(4)
        .unwrap_or("")
        .split(',')
        .map(str::to_string)
        .collect();
    let need = match variant {
        SchemaVariant::Pre2020 => 6,
        SchemaVariant::Post2020 => 5,
    };
    if condition_fields.len() < need {
        return Err(DecodeError::TooFewConditionPieces {
            got: condition_fields.len(),
            need,
        });
    }

    let period = match variant {
        SchemaVariant::Pre2020 => {
            let end_ms = parse_ms(&strip_fixed(&condition_fields[0], 15, 1))?;
            let start_ms = parse_ms(&strip_fixed(&condition_fields[5], 16, 3))?;
            Period::Millis { start_ms, end_ms }
        }
        SchemaVariant::Post2020 => Period::Deferred {
            end: strip_fixed(&condition_fields[0], 15, 1),
            start: strip_fixed(&condition_fields[4], 16, 1),
        },
    };

    Ok(Restriction {
        entity_id: field(0),
        impact: field(1),
        restriction_type: field(2),
        address: field(3),
        condition_fields,
        cause: field(5),
        position: field(6),
        creation: field(7),
        period,
    })
}

/// Read a yearly export: skip the header row, decode each remaining row
/// independently, drop the rows that fail to decode.
///
/// File-read errors are not caught here; they abort the year. Record order
/// is file order minus the dropped rows, and the result may be empty.
pub fn load_restrictions(
    path: &Path,
    variant: SchemaVariant,
) -> Result<(Vec<Restriction>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut restrictions: Vec<Restriction> = Vec::new();

    for result in rdr.records() {
        total_rows += 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("linha {}: erro de CSV, descartada: {}", total_rows, e);
                skipped_rows += 1;
                continue;
            }
        };
        match decode_row(&record, variant) {
            Ok(r) => restrictions.push(r),
            Err(e) => {
                debug!("linha {}: descartada: {}", total_rows, e);
                skipped_rows += 1;
            }
        }
    }

    let report = LoadReport {
        total_rows,
        decoded_rows: restrictions.len(),
        skipped_rows,
    };
    Ok((restrictions, report))
}
