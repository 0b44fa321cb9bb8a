/*!
Allocation of people to project teams.

Each person states which projects they would join and which ones they would lead.
Projects are processed from the least to the most demanded, and each one receives
as many teams as the available people allow, every team headed by a fixed number
of leaders.

```
use team_allocation::*;

let records = vec![
    PersonRecord {
        name: "Anna".to_string(),
        interested: vec!["Garden".to_string()],
        lead: vec![],
    },
    PersonRecord {
        name: "Bob".to_string(),
        interested: vec![],
        lead: vec!["Garden".to_string()],
    },
];

let result = run_allocation(&records, &AllocationRules::DEFAULT_RULES)?;
let teams = &result.placed_projects[&0];
assert_eq!(teams[0].members, vec![1, 0]);
assert!(result.unplaced_people.is_empty());
# Ok::<(), AllocationErrors>(())
```

See the [manual] for the details of the algorithm and the command line tool.
*/

pub mod builder;
mod config;
pub mod manual;
mod preferences;

use log::{debug, info, warn};

use std::collections::BTreeMap;

pub use crate::config::*;
pub use crate::preferences::project_vocabulary;
use crate::preferences::*;

/// The people that are not committed to a team yet.
///
/// Only shrinks during a run.
#[derive(Eq, PartialEq, Debug, Clone)]
struct Availability {
    taken: Vec<bool>,
}

impl Availability {
    fn new(num_people: usize) -> Availability {
        Availability {
            taken: vec![false; num_people],
        }
    }

    fn is_available(&self, person: PersonIndex) -> bool {
        !self.taken[person]
    }

    fn take(&mut self, person: PersonIndex) {
        self.taken[person] = true;
    }

    fn remaining(&self) -> Vec<PersonIndex> {
        self.taken
            .iter()
            .enumerate()
            .filter_map(|(idx, taken)| if *taken { None } else { Some(idx) })
            .collect()
    }
}

// Why a project did not get a team. Only used for logging: callers see a single list.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum UnplacedReason {
    LowDemand,
    NotEnoughPeople,
    NoTeamFormed,
}

#[derive(Eq, PartialEq, Debug, Clone)]
enum ProjectOutcome {
    Unplaced(UnplacedReason),
    Placed(Vec<Team>),
}

/// Runs the allocation on the given records.
///
/// The project vocabulary is inferred from the records (see [project_vocabulary]).
pub fn run_allocation(
    records: &[PersonRecord],
    rules: &AllocationRules,
) -> Result<AllocationResult, AllocationErrors> {
    let projects = project_vocabulary(records);
    run_allocation_with_projects(records, &projects, rules)
}

/// Runs the allocation with a project vocabulary provided by the caller.
///
/// Arguments:
/// * `records` the preferences of each person, in input order
/// * `projects` the project vocabulary. Its order defines the project indices.
/// Every project mentioned in the records must be part of it.
/// * `rules` the constraints on the teams
pub fn run_allocation_with_projects(
    records: &[PersonRecord],
    projects: &[String],
    rules: &AllocationRules,
) -> Result<AllocationResult, AllocationErrors> {
    info!(
        "run_allocation: Processing {:?} people, {:?} projects, rules: {:?}",
        records.len(),
        projects.len(),
        rules
    );
    rules.validate()?;

    let matrix = encode_preferences(records, projects)?;
    let summary = summarize_demand(&matrix);

    let mut availability = Availability::new(matrix.num_people());
    let mut unplaced_projects: Vec<ProjectIndex> = Vec::new();
    let mut placed_projects: BTreeMap<ProjectIndex, Vec<Team>> = BTreeMap::new();

    for &(project, score) in summary.iter() {
        let outcome = allocate_project(&matrix, project, score, rules, &mut availability);
        match outcome {
            ProjectOutcome::Unplaced(reason) => {
                info!(
                    "Project {} (demand {}): no team ({:?})",
                    projects[project], score.0, reason
                );
                unplaced_projects.push(project);
            }
            ProjectOutcome::Placed(teams) => {
                info!(
                    "Project {} (demand {}): {} team(s)",
                    projects[project],
                    score.0,
                    teams.len()
                );
                placed_projects.insert(project, teams);
            }
        }
    }
    unplaced_projects.sort_unstable();

    let unplaced_people = availability.remaining();
    info!(
        "run_allocation: {} project(s) without team, {} people not placed",
        unplaced_projects.len(),
        unplaced_people.len()
    );

    Ok(AllocationResult {
        projects: projects.to_vec(),
        people: records.iter().map(|r| r.name.clone()).collect(),
        demand: summary
            .iter()
            .map(|(project, score)| (projects[*project].clone(), score.0))
            .collect(),
        unplaced_projects,
        placed_projects,
        unplaced_people,
    })
}

/// Finds the team size that splits `count` people with the fewest leftovers.
///
/// Returns the size of each team and the number of teams that receive one extra
/// member. Larger team sizes are preferred.
///
/// # Panics
///
/// Panics if `min_size` is 0 or larger than `max_size`. Rules checked by
/// [AllocationRules::validate] always satisfy this.
///
/// ```
/// use team_allocation::best_split;
///
/// assert_eq!(best_split(21, 5, 7), (7, 0));
/// assert_eq!(best_split(16, 5, 7), (5, 1));
/// ```
pub fn best_split(count: u32, min_size: u32, max_size: u32) -> (u32, u32) {
    assert!(min_size > 0 && min_size <= max_size);
    if count % max_size == 0 {
        return (max_size, 0);
    }
    let mut best: Option<(u32, u32)> = None;
    // The maximum size is excluded: its teams could not take an extra member.
    for size in (min_size..max_size).rev() {
        let remainder = count % size;
        if remainder == 0 {
            return (size, 0);
        }
        match best {
            Some((_, best_remainder)) if best_remainder <= remainder => {}
            _ => best = Some((size, remainder)),
        }
    }
    // Only happens when min_size == max_size: the leftovers stay out.
    best.unwrap_or((max_size, 0))
}

fn allocate_project(
    matrix: &PreferenceMatrix,
    project: ProjectIndex,
    score: DemandScore,
    rules: &AllocationRules,
    availability: &mut Availability,
) -> ProjectOutcome {
    let min_team_size = rules.min_team_size as usize;
    let leaders_per_team = rules.leaders_per_team as usize;

    // Even if everyone was available, there would not be enough interest.
    let threshold = DemandScore(
        rules.leaders_per_team as u64 * matrix.offset().0 + rules.min_team_size as u64,
    );
    if score < threshold {
        debug!(
            "allocate_project: project {}: demand {:?} below threshold {:?}",
            project, score, threshold
        );
        return ProjectOutcome::Unplaced(UnplacedReason::LowDemand);
    }

    let mut members_ready: Vec<PersonIndex> = Vec::new();
    let mut leaders_ready: Vec<PersonIndex> = Vec::new();
    for person in 0..matrix.num_people() {
        if !availability.is_available(person) {
            continue;
        }
        match matrix.role(person, project) {
            Role::Member => members_ready.push(person),
            Role::Leader => leaders_ready.push(person),
            Role::Uninterested => {}
        }
    }
    debug!(
        "allocate_project: project {}: members_ready: {:?} leaders_ready: {:?}",
        project, members_ready, leaders_ready
    );

    let count = members_ready.len() + leaders_ready.len();
    if count < min_team_size {
        return ProjectOutcome::Unplaced(UnplacedReason::NotEnoughPeople);
    }

    let (group_size, remainder) =
        best_split(count as u32, rules.min_team_size, rules.max_team_size);
    debug!(
        "allocate_project: project {}: split {} people into teams of {} ({} with an extra member)",
        project, count, group_size, remainder
    );

    let mut teams = build_teams(
        &members_ready,
        &leaders_ready,
        group_size as usize,
        remainder as usize,
        leaders_per_team,
    );

    let max_teams = rules.max_teams_per_project as usize;
    if teams.len() > max_teams {
        warn!(
            "allocate_project: project {}: dropping {} team(s) above the limit",
            project,
            teams.len() - max_teams
        );
        teams.truncate(max_teams);
    }

    // The last team may have run out of people.
    if let Some(last) = teams.last() {
        if last.len() < min_team_size {
            warn!(
                "allocate_project: project {}: releasing short team {:?}",
                project, last.members
            );
            teams.pop();
        }
    }

    if teams.is_empty() {
        return ProjectOutcome::Unplaced(UnplacedReason::NoTeamFormed);
    }

    for team in teams.iter() {
        for person in team.members.iter() {
            availability.take(*person);
        }
    }
    ProjectOutcome::Placed(teams)
}

// Teams are filled in order: leaders first, then members, then the spare leaders
// if the members ran out.
fn build_teams(
    members_ready: &[PersonIndex],
    leaders_ready: &[PersonIndex],
    group_size: usize,
    mut remainder: usize,
    leaders_per_team: usize,
) -> Vec<Team> {
    let mut teams: Vec<Team> = Vec::new();
    let mut next_member = 0;
    let mut next_leader = 0;

    loop {
        let leaders_left = leaders_ready.len() - next_leader;
        let members_left = members_ready.len() - next_member;
        if leaders_left < leaders_per_team || leaders_left + members_left == 0 {
            break;
        }

        let mut members: Vec<PersonIndex> =
            leaders_ready[next_leader..next_leader + leaders_per_team].to_vec();
        next_leader += leaders_per_team;

        let mut target = group_size;
        if remainder > 0 {
            target += 1;
            remainder -= 1;
        }
        let num_members = target.saturating_sub(members.len()).min(members_left);
        members.extend_from_slice(&members_ready[next_member..next_member + num_members]);
        next_member += num_members;

        if members.len() < group_size {
            let num_spare =
                (group_size - members.len()).min(leaders_ready.len() - next_leader);
            members.extend_from_slice(&leaders_ready[next_leader..next_leader + num_spare]);
            next_leader += num_spare;
        }

        debug!("build_teams: new team: {:?}", members);
        teams.push(Team {
            members,
            leader_count: leaders_per_team,
        });
    }
    teams
}
