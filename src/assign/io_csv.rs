// Primitives for reading CSV files.

use crate::assign::{io_common::make_default_id, *};

pub fn read_csv_responses(path: &str) -> AssignResult<ResponseTable> {
    let default_id = make_default_id(path);

    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header: Vec<String> = match records.next() {
        Some(line_r) => line_r
            .context(CsvLineParseSnafu {})?
            .iter()
            .map(|s| s.to_string())
            .collect(),
        None => return EmptyInputSnafu {}.fail(),
    };

    let mut rows: Vec<ParsedResponse> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let line = line_r.context(CsvLineParseSnafu {})?;
        // The header is line 1.
        let lineno = line
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        if line.iter().all(|s| s.trim().is_empty()) {
            debug!("read_csv_responses: lineno: {:?}: blank row", lineno);
            continue;
        }
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        debug!("read_csv_responses: lineno: {:?} row: {:?}", lineno, &cells);
        rows.push(ParsedResponse {
            id: default_id(lineno),
            lineno,
            cells,
        });
    }
    Ok(ResponseTable { header, rows })
}
