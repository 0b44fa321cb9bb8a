// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// The position of a person in the input, starting at 0.
pub type PersonIndex = usize;

/// The position of a project in the (alphabetically sorted) project vocabulary.
pub type ProjectIndex = usize;

/// The preferences of one person, as provided by the record source.
///
/// The lists may contain duplicates or blank entries: blanks are ignored and
/// a project that appears in both lists is treated as a leadership preference.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PersonRecord {
    /// The identity of the person. It only needs to be non-empty.
    pub name: String,
    /// The projects this person is willing to join as a member.
    pub interested: Vec<String>,
    /// The projects this person is willing to lead.
    pub lead: Vec<String>,
}

// ******** Output data structures *********

/// A committed team.
///
/// The first `leader_count` members joined as leaders of the project, the rest
/// as members. Leaders that were used to complete a team count as members.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Team {
    pub members: Vec<PersonIndex>,
    pub leader_count: usize,
}

impl Team {
    pub fn leaders(&self) -> &[PersonIndex] {
        &self.members[..self.leader_count.min(self.members.len())]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AllocationResult {
    /// The project vocabulary. The position in this list is the project index.
    pub projects: Vec<String>,
    /// The names of all the people, in input order.
    pub people: Vec<String>,
    /// The demand score of each project, in the order the projects were processed.
    pub demand: Vec<(String, u64)>,
    /// Projects for which no team could be committed, in increasing index.
    pub unplaced_projects: Vec<ProjectIndex>,
    pub placed_projects: BTreeMap<ProjectIndex, Vec<Team>>,
    /// People that were not committed to any team, in increasing index.
    pub unplaced_people: Vec<PersonIndex>,
}

impl AllocationResult {
    pub fn project_name(&self, project: ProjectIndex) -> Option<&str> {
        self.projects.get(project).map(|s| s.as_str())
    }

    pub fn person_name(&self, person: PersonIndex) -> Option<&str> {
        self.people.get(person).map(|s| s.as_str())
    }

    /// The total number of people placed in a team.
    pub fn placed_count(&self) -> usize {
        self.placed_projects
            .values()
            .flat_map(|teams| teams.iter())
            .map(|t| t.len())
            .sum()
    }
}

/// Errors that prevent the allocation from completing successfully.
///
/// No partial result is ever returned along with an error.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AllocationErrors {
    /// A record is incomplete or refers to a project outside of the vocabulary.
    MalformedInput { person: PersonIndex, reason: String },
    /// The rules cannot produce any team.
    Configuration { reason: String },
}

impl Error for AllocationErrors {}

impl Display for AllocationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationErrors::MalformedInput { person, reason } => {
                write!(f, "Malformed input for person #{}: {}", person, reason)
            }
            AllocationErrors::Configuration { reason } => {
                write!(f, "Invalid allocation rules: {}", reason)
            }
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AllocationRules {
    /// Teams smaller than this are never committed.
    pub min_team_size: u32,
    pub max_team_size: u32,
    pub max_teams_per_project: u32,
    /// Number of people with a leadership preference at the head of each team.
    /// Zero means no leadership requirement.
    pub leaders_per_team: u32,
}

impl AllocationRules {
    pub const DEFAULT_RULES: AllocationRules = AllocationRules {
        min_team_size: 2,
        max_team_size: 3,
        max_teams_per_project: 1,
        leaders_per_team: 1,
    };

    /// Checks that the rules can produce at least one team.
    pub fn validate(&self) -> Result<(), AllocationErrors> {
        let reason = if self.min_team_size == 0 {
            Some("the minimum team size must be at least 1".to_string())
        } else if self.max_team_size < self.min_team_size {
            Some(format!(
                "the maximum team size ({}) is smaller than the minimum team size ({})",
                self.max_team_size, self.min_team_size
            ))
        } else if self.max_teams_per_project == 0 {
            Some("the maximum number of teams per project must be at least 1".to_string())
        } else if self.leaders_per_team > self.max_team_size {
            Some(format!(
                "{} leaders per team cannot fit in teams of at most {} people",
                self.leaders_per_team, self.max_team_size
            ))
        } else {
            None
        };
        match reason {
            Some(reason) => Err(AllocationErrors::Configuration { reason }),
            None => Ok(()),
        }
    }
}
