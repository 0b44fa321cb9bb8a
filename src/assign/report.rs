use std::io::Write;

use serde_json::json;

use crate::assign::{io_common::column_index, *};

/// A roster line. An empty line separates two teams.
pub type RosterRow = Vec<String>;

fn person_row(
    table: &ResponseTable,
    person: PersonIndex,
    col_idxs: &[(usize, &str)],
) -> AssignResult<RosterRow> {
    let response = match table.rows.get(person) {
        Some(r) => r,
        None => whatever!("No response for person #{}", person),
    };
    col_idxs
        .iter()
        .map(|(idx, column)| {
            io_common::get_cell(response, *idx, column).map(|s| s.to_string())
        })
        .collect()
}

/// Lists every project with teams followed by the rows of its members, then the
/// people without a team.
///
/// The people of the result are expected in the same order as the rows of the table.
pub fn build_roster(
    result: &AllocationResult,
    table: &ResponseTable,
    settings: &AssignSettings,
) -> AssignResult<Vec<RosterRow>> {
    let col_idxs: Vec<(usize, &str)> = settings
        .output_columns
        .iter()
        .map(|c| column_index(&table.header, c).map(|idx| (idx, c.as_str())))
        .collect::<AssignResult<Vec<_>>>()?;
    debug!("build_roster: output columns: {:?}", col_idxs);

    let mut res: Vec<RosterRow> = Vec::new();
    for (project, teams) in result.placed_projects.iter() {
        let name = result.project_name(*project).unwrap_or_default();
        res.push(vec![name.to_string()]);
        for team in teams.iter() {
            for person in team.members.iter() {
                res.push(person_row(table, *person, &col_idxs)?);
            }
            res.push(Vec::new());
        }
    }
    if !result.unplaced_people.is_empty() {
        res.push(vec![settings.unassigned_label.clone()]);
        for person in result.unplaced_people.iter() {
            res.push(person_row(table, *person, &col_idxs)?);
        }
    }
    Ok(res)
}

/// Serializes the roster in CSV format.
pub fn roster_to_csv(roster: &[RosterRow]) -> AssignResult<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();
    for row in roster.iter() {
        if row.is_empty() {
            // The csv writer would quote an empty record.
            out.push(b'\n');
            continue;
        }
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut out);
        wtr.write_record(row).context(CsvWriteSnafu {})?;
        wtr.flush()
            .map_err(csv::Error::from)
            .context(CsvWriteSnafu {})?;
    }
    Ok(out)
}

pub fn print_roster(content: &[u8]) -> AssignResult<()> {
    std::io::stdout()
        .write_all(content)
        .context(WritingOutputSnafu { path: "stdout" })
}

pub fn build_summary_js(settings: &AssignSettings, result: &AllocationResult) -> JSValue {
    let rules = &settings.rules;
    let demand: Vec<JSValue> = result
        .demand
        .iter()
        .map(|(project, score)| json!({"project": project, "score": score}))
        .collect();

    let person_names = |members: &[PersonIndex]| -> Vec<String> {
        members
            .iter()
            .filter_map(|p| result.person_name(*p))
            .map(|s| s.to_string())
            .collect()
    };

    let mut teams = serde_json::Map::new();
    for (project, project_teams) in result.placed_projects.iter() {
        let names: Vec<Vec<String>> = project_teams
            .iter()
            .map(|t| person_names(t.members.as_slice()))
            .collect();
        if let Some(name) = result.project_name(*project) {
            teams.insert(name.to_string(), json!(names));
        }
    }

    let unplaced_projects: Vec<&str> = result
        .unplaced_projects
        .iter()
        .filter_map(|p| result.project_name(*p))
        .collect();

    json!({
        "config": {
            "minTeamSize": rules.min_team_size,
            "maxTeamSize": rules.max_team_size,
            "maxTeamsPerProject": rules.max_teams_per_project,
            "leadersPerTeam": rules.leaders_per_team,
        },
        "results": {
            "demand": demand,
            "teams": teams,
            "unplacedProjects": unplaced_projects,
            "unassigned": person_names(result.unplaced_people.as_slice()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn strings(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    fn response(lineno: usize, cells: &[&str]) -> ParsedResponse {
        ParsedResponse {
            id: format!("test-{:08}", lineno),
            lineno,
            cells: strings(cells),
        }
    }

    fn example() -> (AllocationResult, ResponseTable, AssignSettings) {
        let table = ResponseTable {
            header: strings(&["Name", "Email", "Interested?", "Leader?"]),
            rows: vec![
                response(2, &["Breach", "breach@example.com", "Blu", "Red"]),
                response(3, &["Cypher", "cypher@example.com", "", "Blu;Gre"]),
                response(4, &["Raze", "raze, esq.", "Gre", "Blu;Red;Yel"]),
            ],
        };
        let mut placed_projects = BTreeMap::new();
        placed_projects.insert(
            1,
            vec![Team {
                members: vec![1, 2],
                leader_count: 1,
            }],
        );
        let result = AllocationResult {
            projects: strings(&["Blu", "Gre", "Red", "Yel"]),
            people: strings(&["Breach", "Cypher", "Raze"]),
            demand: vec![
                ("Yel".to_string(), 11),
                ("Gre".to_string(), 12),
                ("Red".to_string(), 22),
                ("Blu".to_string(), 23),
            ],
            unplaced_projects: vec![0, 2, 3],
            placed_projects,
            unplaced_people: vec![0],
        };
        let config = AssignConfig {
            input_source: InputSource {
                file_path: Some("responses.csv".to_string()),
                ..InputSource::default()
            },
            output_settings: OutputSettings {
                output_columns: Some(strings(&["Name", "Email"])),
                ..OutputSettings::default()
            },
            ..AssignConfig::default()
        };
        let settings = validate_config(&config).unwrap();
        (result, table, settings)
    }

    #[test]
    fn roster() {
        let (result, table, settings) = example();
        let roster = build_roster(&result, &table, &settings).unwrap();
        assert_eq!(
            roster,
            vec![
                strings(&["Gre"]),
                strings(&["Cypher", "cypher@example.com"]),
                strings(&["Raze", "raze, esq."]),
                vec![],
                strings(&["UNASSIGNED"]),
                strings(&["Breach", "breach@example.com"]),
            ]
        );
        let content = String::from_utf8(roster_to_csv(&roster).unwrap()).unwrap();
        assert_eq!(
            content,
            "Gre\nCypher,cypher@example.com\nRaze,\"raze, esq.\"\n\nUNASSIGNED\nBreach,breach@example.com\n"
        );
    }

    #[test]
    fn roster_unknown_column() {
        let (result, table, mut settings) = example();
        settings.output_columns = strings(&["Name", "Phone"]);
        let res = build_roster(&result, &table, &settings);
        assert!(matches!(res, Err(AssignError::MissingColumn { .. })));
    }

    #[test]
    fn summary() {
        let (result, _, settings) = example();
        let js = build_summary_js(&settings, &result);
        assert_eq!(js["config"]["leadersPerTeam"], json!(1));
        assert_eq!(js["results"]["teams"], json!({"Gre": [["Cypher", "Raze"]]}));
        assert_eq!(
            js["results"]["unplacedProjects"],
            json!(["Blu", "Red", "Yel"])
        );
        assert_eq!(js["results"]["unassigned"], json!(["Breach"]));
        assert_eq!(
            js["results"]["demand"][0],
            json!({"project": "Yel", "score": 11})
        );
    }
}
