// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::assign::{io_common::make_default_id, *};

fn get_range(
    path: &str,
    worksheet_name_o: Option<&str>,
) -> AssignResult<calamine::Range<DataType>> {
    debug!("get_range: path: {:?} worksheet: {:?}", path, worksheet_name_o);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let range_o = match worksheet_name_o {
        // A worksheet name was provided, use it.
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?,
        None => workbook.worksheet_range_at(0).context(MissingWorksheetSnafu {
            path,
            name: "<first>",
        })?,
    };
    range_o.context(OpeningExcelSnafu { path })
}

fn read_cell(cell: &DataType, lineno: usize) -> AssignResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok(String::new()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        // Read as a date when the serial number is in range.
        DataType::DateTime(f) => Ok(cell
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| f.to_string())),
        x => ExcelWrongCellTypeSnafu {
            lineno: lineno as u64,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

pub fn read_xlsx_responses(
    path: &str,
    worksheet_name_o: Option<&str>,
) -> AssignResult<ResponseTable> {
    let default_id = make_default_id(path);
    let wrange = get_range(path, worksheet_name_o)?;

    // The range starts at the first non-empty row of the worksheet.
    let header_lineno = wrange.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyInputSnafu {})?
        .iter()
        .map(|c| read_cell(c, header_lineno))
        .collect::<AssignResult<Vec<String>>>()?;
    debug!("read_xlsx_responses: header: {:?}", header);

    let mut rows: Vec<ParsedResponse> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = header_lineno + idx + 1;
        let cells = row
            .iter()
            .map(|c| read_cell(c, lineno))
            .collect::<AssignResult<Vec<String>>>()?;
        if cells.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        debug!("read_xlsx_responses: lineno: {:?} row: {:?}", lineno, &cells);
        rows.push(ParsedResponse {
            id: default_id(lineno),
            lineno,
            cells,
        });
    }
    Ok(ResponseTable { header, rows })
}
