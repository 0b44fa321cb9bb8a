use log::{debug, info, warn};

use team_allocation::*;

use snafu::{prelude::*, Snafu};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::assign::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
mod report;

#[derive(Debug, Snafu)]
pub enum AssignError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("The input has no header row"))]
    EmptyInput {},
    #[snafu(display("Line {lineno}: cannot read cell {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a line of the CSV file"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} has no value for column {column}"))]
    CsvLineTooShort { lineno: usize, column: String },
    #[snafu(display("Error writing the roster"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Column {column:?} not found in the header"))]
    MissingColumn { column: String },
    #[snafu(display("Line {lineno}: the name is empty"))]
    MissingName { lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Missing parent directory for {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("The allocation failed: {source}"))]
    Allocation { source: AllocationErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type AssignResult<T> = Result<T, AssignError>;
pub type BAssignResult<T> = Result<T, Box<AssignError>>;

/// One row of the form, as read by the table readers.
/// This is before resolving the columns.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedResponse {
    pub id: String,
    /// The line in the input file, starting at 1 for the header.
    pub lineno: usize,
    pub cells: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseTable {
    pub header: Vec<String>,
    pub rows: Vec<ParsedResponse>,
}

fn read_responses(settings: &AssignSettings) -> BAssignResult<ResponseTable> {
    let path = settings.input_path.as_str();
    info!("Attempting to read responses {:?}", path);
    let table = match settings.provider {
        InputProvider::Csv => io_csv::read_csv_responses(path)?,
        InputProvider::Xlsx => {
            io_xlsx::read_xlsx_responses(path, settings.excel_worksheet_name.as_deref())?
        }
    };
    debug!(
        "read_responses: header: {:?}, {} rows",
        table.header,
        table.rows.len()
    );
    Ok(table)
}

fn build_records(
    table: &ResponseTable,
    settings: &AssignSettings,
) -> BAssignResult<Vec<PersonRecord>> {
    let name_idx = io_common::column_index(&table.header, &settings.name_column)?;
    let interest_idx = io_common::column_index(&table.header, &settings.interest_column)?;
    let leader_idx = io_common::column_index(&table.header, &settings.leader_column)?;

    let mut res: Vec<PersonRecord> = Vec::new();
    for response in table.rows.iter() {
        let name = io_common::get_cell(response, name_idx, &settings.name_column)?.trim();
        if name.is_empty() {
            return Err(Box::new(AssignError::MissingName {
                lineno: response.lineno,
            }));
        }
        let interested = io_common::split_choices(
            io_common::get_cell(response, interest_idx, &settings.interest_column)?,
            &settings.delimiters,
        );
        let lead = io_common::split_choices(
            io_common::get_cell(response, leader_idx, &settings.leader_column)?,
            &settings.delimiters,
        );
        debug!(
            "build_records: {}: {}: interested: {:?} lead: {:?}",
            response.id, name, interested, lead
        );
        res.push(PersonRecord {
            name: name.to_string(),
            interested,
            lead,
        });
    }
    Ok(res)
}

fn apply_args(mut config: AssignConfig, args: &Args) -> AssignConfig {
    fn pick<T: Clone>(arg: &Option<T>, current: &mut Option<T>) {
        if arg.is_some() {
            *current = arg.clone();
        }
    }
    let input = &mut config.input_source;
    pick(&args.input, &mut input.file_path);
    pick(&args.input_type, &mut input.provider);
    pick(&args.name_column, &mut input.name_column);
    pick(&args.interest_column, &mut input.interest_column);
    pick(&args.leader_column, &mut input.leader_column);
    pick(&args.delimiters, &mut input.delimiters);
    pick(&args.excel_worksheet_name, &mut input.excel_worksheet_name);

    let output = &mut config.output_settings;
    pick(&args.out, &mut output.output_file);
    pick(&args.summary, &mut output.summary_file);
    pick(&args.output_columns, &mut output.output_columns);

    let rules = &mut config.rules;
    pick(&args.min_team_size, &mut rules.min_team_size);
    pick(&args.max_team_size, &mut rules.max_team_size);
    pick(&args.max_teams_per_project, &mut rules.max_teams_per_project);
    pick(&args.leaders_per_team, &mut rules.leaders_per_team);
    config
}

fn log_result(result: &AllocationResult) {
    for (project, teams) in result.placed_projects.iter() {
        let name = result.project_name(*project).unwrap_or_default();
        for team in teams.iter() {
            let names: Vec<&str> = team
                .members
                .iter()
                .filter_map(|p| result.person_name(*p))
                .collect();
            info!("{}: {:?}", name, names);
        }
    }
    for project in result.unplaced_projects.iter() {
        info!(
            "{}: no team",
            result.project_name(*project).unwrap_or_default()
        );
    }
    if !result.unplaced_people.is_empty() {
        warn!("{} people without a team", result.unplaced_people.len());
    }
}

fn check_reference(reference_p: &str, pretty_js_summary: &str) -> AssignResult<()> {
    let summary_ref = read_summary(reference_p)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_summary {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_summary, "\n");
        whatever!("Difference detected between computed summary and reference summary")
    }
    Ok(())
}

/// Reads the responses, forms the teams and writes the results.
///
/// Nothing is written if any step fails.
pub fn run_assignment(args: &Args) -> BAssignResult<()> {
    let config = match args.config.as_deref() {
        Some(config_path) => read_config(config_path)?,
        None => AssignConfig::default(),
    };
    let config = apply_args(config, args);
    info!("config: {:?}", config);
    let settings = validate_config(&config)?;

    let table = read_responses(&settings)?;
    let records = build_records(&table, &settings)?;

    let result = run_allocation(&records, &settings.rules).context(AllocationSnafu {})?;
    log_result(&result);

    let roster = report::build_roster(&result, &table, &settings)?;
    let summary_js: JSValue = report::build_summary_js(&settings, &result);
    let pretty_js_summary =
        serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    // The reference summary, if provided for comparison
    if let Some(reference_p) = args.reference.as_deref() {
        check_reference(reference_p, &pretty_js_summary)?;
    }

    // All the files are staged before any of them is moved into place.
    let roster_csv = report::roster_to_csv(&roster)?;
    let roster_file = match settings.output_file.as_deref() {
        Some(out) if out != "stdout" => Some(io_common::StagedFile::stage(out, &roster_csv)?),
        _ => None,
    };
    let summary_file = match settings.summary_file.as_deref() {
        Some(summary_p) if summary_p != "stdout" => Some(io_common::StagedFile::stage(
            summary_p,
            pretty_js_summary.as_bytes(),
        )?),
        _ => None,
    };

    let roster_path = roster_file.as_ref().map(|f| f.path().to_string());
    match roster_file {
        Some(staged) => {
            staged.commit()?;
            info!("Rosters written to {}", roster_path.as_deref().unwrap_or_default());
        }
        None => report::print_roster(&roster_csv)?,
    }

    match (summary_file, settings.summary_file.as_deref()) {
        (Some(staged), _) => {
            let summary_p = staged.path().to_string();
            if let Err(e) = staged.commit() {
                if let Some(p) = roster_path.as_deref() {
                    warn!("Removing {} after the failed summary write", p);
                    let _ = std::fs::remove_file(p);
                }
                return Err(Box::new(e));
            }
            info!("Summary written to {}", summary_p);
        }
        (None, Some("stdout")) => {
            println!("{}", pretty_js_summary);
        }
        (None, _) => {
            debug!("summary: {}", pretty_js_summary);
        }
    }

    Ok(())
}

#[cfg(test)]
fn test_args(test_name: &str, out_dir: &std::path::Path) -> Args {
    let test_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(test_name);
    Args {
        config: Some(
            test_dir
                .join(format!("{}_config.json", test_name))
                .display()
                .to_string(),
        ),
        reference: Some(
            test_dir
                .join(format!("{}_expected_summary.json", test_name))
                .display()
                .to_string(),
        ),
        out: Some(out_dir.join("teams.csv").display().to_string()),
        ..Args::default()
    }
}

#[cfg(test)]
fn run_assignment_test(test_name: &str) -> (BAssignResult<()>, String) {
    let _ = env_logger::builder().is_test(true).try_init();
    let out_dir = tempfile::tempdir().unwrap();
    let args = test_args(test_name, out_dir.path());
    let res = run_assignment(&args);
    let roster = std::fs::read_to_string(out_dir.path().join("teams.csv")).unwrap_or_default();
    (res, roster)
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) -> String {
    let (res, roster) = run_assignment_test(test_name);
    if let Err(e) = res {
        panic!("test {}: an error occured: {}", test_name, e);
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agents() {
        let roster = test_wrapper("agents");
        assert_eq!(
            roster,
            "Gre\n\
             Cypher,2022/11/10 5:45:49 PM PST\n\
             Raze,2022/11/10 5:45:52 PM PST\n\
             \n\
             UNASSIGNED\n\
             Breach,2022/11/10 5:45:46 PM PST\n"
        );
    }

    #[test]
    fn agents_xlsx() {
        let roster = test_wrapper("agents_xlsx");
        assert_eq!(
            roster,
            "Gre\n\
             Cypher,2022/11/10 5:45:49 PM PST\n\
             Raze,2022/11/10 5:45:52 PM PST\n\
             \n\
             UNASSIGNED\n\
             Breach,2022/11/10 5:45:46 PM PST\n"
        );
    }

    #[test]
    fn two_leaders() {
        let roster = test_wrapper("two_leaders");
        let lines: Vec<&str> = roster.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Comms", "Astra", "Brim", "Chamber", "Deadlock", "", "Pool", "Fade", "Gekko",
                "Harbor", "Jett", "", "UNASSIGNED", "Iso", "Kayo",
            ]
        );
    }

    #[test]
    fn reference_mismatch_writes_nothing() {
        let (res, roster) = run_assignment_test("reference_mismatch");
        assert!(res.is_err());
        assert!(roster.is_empty());
    }

    #[test]
    fn failed_summary_write_leaves_no_roster() {
        let _ = env_logger::builder().is_test(true).try_init();
        let out_dir = tempfile::tempdir().unwrap();
        let args = Args {
            summary: Some(
                out_dir
                    .path()
                    .join("missing_dir")
                    .join("summary.json")
                    .display()
                    .to_string(),
            ),
            ..test_args("agents", out_dir.path())
        };
        let res = run_assignment(&args);
        assert!(matches!(
            res.map_err(|e| *e),
            Err(AssignError::WritingOutput { .. })
        ));
        // Neither the roster nor its temporary file are left behind.
        assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn roster_and_summary_written_together() {
        let out_dir = tempfile::tempdir().unwrap();
        let summary_p = out_dir.path().join("summary.json");
        let args = Args {
            summary: Some(summary_p.display().to_string()),
            ..test_args("agents", out_dir.path())
        };
        run_assignment(&args).unwrap();
        let summary = read_summary(&summary_p.display().to_string()).unwrap();
        assert_eq!(summary["results"]["unassigned"], serde_json::json!(["Breach"]));
        assert!(out_dir.path().join("teams.csv").exists());
        assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn invalid_rules_write_nothing() {
        let (res, roster) = run_assignment_test("invalid_rules");
        assert!(matches!(
            res.map_err(|e| *e),
            Err(AssignError::Allocation { .. })
        ));
        assert!(roster.is_empty());
    }

    #[test]
    fn args_override_config() {
        let mut config = AssignConfig::default();
        config.rules.min_team_size = Some(4);
        config.input_source.file_path = Some("from_config.csv".to_string());
        let args = Args {
            min_team_size: Some(3),
            leaders_per_team: Some(0),
            ..Args::default()
        };
        let config = apply_args(config, &args);
        assert_eq!(config.rules.min_team_size, Some(3));
        assert_eq!(config.rules.leaders_per_team, Some(0));
        assert_eq!(
            config.input_source.file_path,
            Some("from_config.csv".to_string())
        );
    }

    #[test]
    fn records_from_table() {
        let table = ResponseTable {
            header: vec!["Name".into(), "Interested?".into(), "Leader?".into()],
            rows: vec![
                ParsedResponse {
                    id: "r-2".into(),
                    lineno: 2,
                    cells: vec!["Sage".into(), "red, blu".into(), "".into()],
                },
                ParsedResponse {
                    id: "r-3".into(),
                    lineno: 3,
                    cells: vec!["Jett".into(), "".into()],
                },
            ],
        };
        let settings = validate_config(&AssignConfig {
            input_source: InputSource {
                file_path: Some("responses.csv".into()),
                ..InputSource::default()
            },
            ..AssignConfig::default()
        })
        .unwrap();
        let res = build_records(&table, &settings);
        match res.map_err(|e| *e) {
            Err(AssignError::CsvLineTooShort { lineno, column }) => {
                assert_eq!(lineno, 3);
                assert_eq!(column, "Leader?");
            }
            x => panic!("unexpected result {:?}", x),
        }

        let first = ResponseTable {
            header: table.header.clone(),
            rows: table.rows[..1].to_vec(),
        };
        let records = build_records(&first, &settings).unwrap();
        assert_eq!(
            records,
            vec![PersonRecord {
                name: "Sage".into(),
                interested: vec!["red".into(), "blu".into()],
                lead: vec![],
            }]
        );
    }
}
