use log::debug;

use std::collections::{BTreeSet, HashMap};

use crate::config::*;

/// The interest of one person for one project.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub(crate) enum Role {
    Uninterested,
    Member,
    Leader,
}

/// Weight of a leadership preference in the demand scores.
///
/// Always strictly greater than the number of people, so that a single leader
/// outweighs any number of members.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub(crate) struct LeaderOffset(pub(crate) u64);

impl LeaderOffset {
    pub(crate) fn for_population(person_count: usize) -> LeaderOffset {
        let mut offset: u64 = 10;
        while offset <= person_count as u64 {
            offset *= 10;
        }
        LeaderOffset(offset)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub(crate) struct DemandScore(pub(crate) u64);

impl DemandScore {
    pub(crate) const EMPTY: DemandScore = DemandScore(0);
}

impl std::iter::Sum for DemandScore {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        DemandScore(iter.map(|ds| ds.0).sum())
    }
}


/// People are rows, projects are columns.
///
/// Immutable once built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub(crate) struct PreferenceMatrix {
    roles: Vec<Vec<Role>>,
    num_projects: usize,
    offset: LeaderOffset,
}

impl PreferenceMatrix {
    pub(crate) fn num_people(&self) -> usize {
        self.roles.len()
    }

    pub(crate) fn num_projects(&self) -> usize {
        self.num_projects
    }

    pub(crate) fn offset(&self) -> LeaderOffset {
        self.offset
    }

    pub(crate) fn role(&self, person: PersonIndex, project: ProjectIndex) -> Role {
        self.roles[person][project]
    }

    /// The contribution of one cell to the demand of its project:
    /// 0 for no interest, 1 for a member, offset + 1 for a leader.
    pub(crate) fn score(&self, person: PersonIndex, project: ProjectIndex) -> DemandScore {
        match self.role(person, project) {
            Role::Uninterested => DemandScore::EMPTY,
            Role::Member => DemandScore(1),
            Role::Leader => DemandScore(self.offset.0 + 1),
        }
    }
}

/// Returns the sorted list of all the projects mentioned in the records.
///
/// Blank entries are not projects and are skipped.
pub fn project_vocabulary(records: &[PersonRecord]) -> Vec<String> {
    let projects: BTreeSet<String> = records
        .iter()
        .flat_map(|r| r.interested.iter().chain(r.lead.iter()))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();
    projects.into_iter().collect()
}

pub(crate) fn encode_preferences(
    records: &[PersonRecord],
    projects: &[String],
) -> Result<PreferenceMatrix, AllocationErrors> {
    let project_ids: HashMap<&str, ProjectIndex> = projects
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();
    let offset = LeaderOffset::for_population(records.len());
    debug!(
        "encode_preferences: {} people, {} projects, leader offset {:?}",
        records.len(),
        projects.len(),
        offset
    );

    let mut roles: Vec<Vec<Role>> = Vec::with_capacity(records.len());
    for (person, record) in records.iter().enumerate() {
        if record.name.trim().is_empty() {
            return Err(AllocationErrors::MalformedInput {
                person,
                reason: "missing name".to_string(),
            });
        }
        let mut row = vec![Role::Uninterested; projects.len()];
        // Leadership is applied last: it wins when a project is in both lists.
        let tagged = record
            .interested
            .iter()
            .map(|p| (p, Role::Member))
            .chain(record.lead.iter().map(|p| (p, Role::Leader)));
        for (name, role) in tagged {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let project = project_ids.get(name).cloned().ok_or_else(|| {
                AllocationErrors::MalformedInput {
                    person,
                    reason: format!("unknown project {:?}", name),
                }
            })?;
            row[project] = role;
        }
        debug!("encode_preferences: {} -> {:?}", record.name, row);
        roles.push(row);
    }

    Ok(PreferenceMatrix {
        roles,
        num_projects: projects.len(),
        offset,
    })
}

/// Returns all the projects with their demand score, by increasing score.
///
/// Projects with the same score keep their vocabulary order.
pub(crate) fn summarize_demand(matrix: &PreferenceMatrix) -> Vec<(ProjectIndex, DemandScore)> {
    let mut summary: Vec<(ProjectIndex, DemandScore)> = (0..matrix.num_projects())
        .map(|project| {
            let score: DemandScore = (0..matrix.num_people())
                .map(|person| matrix.score(person, project))
                .sum();
            (project, score)
        })
        .collect();
    // Stable sort: ties stay in project order.
    summary.sort_by_key(|(_, score)| *score);
    debug!("summarize_demand: {:?}", summary);
    summary
}
