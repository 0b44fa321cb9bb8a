use crate::assign::*;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "summaryFile")]
    pub summary_file: Option<String>,
    #[serde(rename = "outputColumns")]
    pub output_columns: Option<Vec<String>>,
    #[serde(rename = "unassignedLabel")]
    pub unassigned_label: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "nameColumn")]
    pub name_column: Option<String>,
    #[serde(rename = "interestColumn")]
    pub interest_column: Option<String>,
    #[serde(rename = "leaderColumn")]
    pub leader_column: Option<String>,
    pub delimiters: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    #[serde(rename = "minTeamSize")]
    pub min_team_size: Option<u32>,
    #[serde(rename = "maxTeamSize")]
    pub max_team_size: Option<u32>,
    #[serde(rename = "maxTeamsPerProject")]
    pub max_teams_per_project: Option<u32>,
    #[serde(rename = "leadersPerTeam")]
    pub leaders_per_team: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSource")]
    pub input_source: InputSource,
    pub rules: RulesConfig,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputProvider {
    Csv,
    Xlsx,
}

/// The configuration once the defaults are filled in.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AssignSettings {
    pub provider: InputProvider,
    pub input_path: String,
    pub excel_worksheet_name: Option<String>,
    pub name_column: String,
    pub interest_column: String,
    pub leader_column: String,
    pub delimiters: String,
    pub output_file: Option<String>,
    pub summary_file: Option<String>,
    pub output_columns: Vec<String>,
    pub unassigned_label: String,
    pub rules: AllocationRules,
}

pub const DEFAULT_NAME_COLUMN: &str = "Name";
pub const DEFAULT_INTEREST_COLUMN: &str = "Interested?";
pub const DEFAULT_LEADER_COLUMN: &str = "Leader?";
pub const DEFAULT_DELIMITERS: &str = ";,";
pub const DEFAULT_UNASSIGNED_LABEL: &str = "UNASSIGNED";

// Relative paths in the configuration are relative to the configuration file.
fn resolve_path(root: &Path, p: &mut Option<String>) {
    if let Some(s) = p.as_deref() {
        if s != "stdout" && Path::new(s).is_relative() {
            *p = Some(root.join(s).display().to_string());
        }
    }
}

pub fn read_config(path: &str) -> AssignResult<AssignConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config: AssignConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);

    let root = Path::new(path).parent().context(MissingParentDirSnafu { path })?;
    resolve_path(root, &mut config.input_source.file_path);
    resolve_path(root, &mut config.output_settings.output_file);
    resolve_path(root, &mut config.output_settings.summary_file);
    Ok(config)
}

pub fn read_summary(path: &str) -> AssignResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn non_blank(x: &Option<String>) -> Option<String> {
    x.as_deref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Fills in the defaults.
///
/// The rules themselves are checked by the allocator.
pub fn validate_config(config: &AssignConfig) -> AssignResult<AssignSettings> {
    let input = &config.input_source;
    let provider = match input.provider.as_deref().map(|s| s.trim()) {
        None | Some("csv") => InputProvider::Csv,
        Some("xlsx") | Some("excel") => InputProvider::Xlsx,
        Some(x) => whatever!("Provider {:?} not implemented", x),
    };
    let input_path = match non_blank(&input.file_path) {
        Some(p) => p,
        None => whatever!("No input file provided"),
    };
    let delimiters = input
        .delimiters
        .clone()
        .unwrap_or_else(|| DEFAULT_DELIMITERS.to_string());
    if delimiters.is_empty() {
        whatever!("The list of delimiters is empty");
    }
    let name_column =
        non_blank(&input.name_column).unwrap_or_else(|| DEFAULT_NAME_COLUMN.to_string());

    let output = &config.output_settings;
    let output_columns: Vec<String> = match output.output_columns.as_deref() {
        Some(cols) if !cols.is_empty() => cols.iter().map(|s| s.trim().to_string()).collect(),
        _ => vec![name_column.clone()],
    };

    let defaults = AllocationRules::DEFAULT_RULES;
    let rules = &config.rules;
    let rules = AllocationRules {
        min_team_size: rules.min_team_size.unwrap_or(defaults.min_team_size),
        max_team_size: rules.max_team_size.unwrap_or(defaults.max_team_size),
        max_teams_per_project: rules
            .max_teams_per_project
            .unwrap_or(defaults.max_teams_per_project),
        leaders_per_team: rules.leaders_per_team.unwrap_or(defaults.leaders_per_team),
    };

    Ok(AssignSettings {
        provider,
        input_path,
        excel_worksheet_name: non_blank(&input.excel_worksheet_name),
        name_column,
        interest_column: non_blank(&input.interest_column)
            .unwrap_or_else(|| DEFAULT_INTEREST_COLUMN.to_string()),
        leader_column: non_blank(&input.leader_column)
            .unwrap_or_else(|| DEFAULT_LEADER_COLUMN.to_string()),
        delimiters,
        output_file: non_blank(&output.output_file),
        summary_file: non_blank(&output.summary_file),
        output_columns,
        unassigned_label: output
            .unassigned_label
            .clone()
            .unwrap_or_else(|| DEFAULT_UNASSIGNED_LABEL.to_string()),
        rules,
    })
}
