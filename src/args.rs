use clap::Parser;

/// Forms project teams out of the preferences collected with a form.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with all the settings of the allocation.
    /// The other options override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, teamalloc will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path or 'stdout') Where to write the team rosters, in CSV format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or 'stdout') Where to write the summary of the allocation, in JSON format.
    #[clap(long, value_parser)]
    pub summary: Option<String>,

    /// (file path) The responses of the form.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default Name) The header of the column with the name of each person.
    #[clap(long, value_parser)]
    pub name_column: Option<String>,

    /// (default 'Interested?') The header of the column with the projects to join.
    #[clap(long, value_parser)]
    pub interest_column: Option<String>,

    /// (default 'Leader?') The header of the column with the projects to lead.
    #[clap(long, value_parser)]
    pub leader_column: Option<String>,

    /// (default ';,') The characters that separate the projects in a cell.
    #[clap(long, value_parser)]
    pub delimiters: Option<String>,

    /// (list of column headers) The columns to copy in the rosters for each person.
    /// Defaults to the name column.
    #[clap(long, value_parser)]
    pub output_columns: Option<Vec<String>>,

    /// (default 2) Teams smaller than this are not formed.
    #[clap(long, value_parser)]
    pub min_team_size: Option<u32>,

    /// (default 3)
    #[clap(long, value_parser)]
    pub max_team_size: Option<u32>,

    /// (default 1)
    #[clap(long, value_parser)]
    pub max_teams_per_project: Option<u32>,

    /// (default 1) The number of leaders in every team. 0 disables the leaders.
    #[clap(long, value_parser)]
    pub leaders_per_team: Option<u32>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
