pub use crate::config::*;

/// A builder for collecting preferences.
///
/// ```
/// pub use team_allocation::builder::Builder;
/// pub use team_allocation::AllocationRules;
/// # use team_allocation::AllocationErrors;
///
/// let mut builder = Builder::new(&AllocationRules::DEFAULT_RULES)?
///     .projects(&["Garden".to_string(), "Library".to_string()])?;
///
/// builder.add_person_simple("Anna", &["Garden".to_string()], &[])?;
/// builder.add_person_simple("Bob", &[], &["Garden".to_string(), "".to_string()])?;
///
/// let result = builder.run()?;
/// assert_eq!(result.unplaced_projects, vec![1]);
///
/// # Ok::<(), AllocationErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AllocationRules,
    pub(crate) _projects: Option<Vec<String>>,
    pub(crate) _records: Vec<PersonRecord>,
}

impl Builder {
    pub fn new(rules: &AllocationRules) -> Result<Builder, AllocationErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _projects: None,
            _records: Vec::new(),
        })
    }

    /// Fixes the project vocabulary instead of inferring it from the preferences.
    ///
    /// The projects are sorted and the blank names are dropped.
    pub fn projects(self, projects: &[String]) -> Result<Builder, AllocationErrors> {
        let mut names: Vec<String> = projects
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        names.sort();
        names.dedup();
        Ok(Builder {
            _rules: self._rules,
            _projects: Some(names),
            _records: self._records,
        })
    }

    /// Adds a person with the projects to join and the projects to lead.
    ///
    /// When a vocabulary was set with [Builder::projects], the projects are checked
    /// right away.
    pub fn add_person_simple(
        &mut self,
        name: &str,
        interested: &[String],
        lead: &[String],
    ) -> Result<(), AllocationErrors> {
        self.add_person(&PersonRecord {
            name: name.to_string(),
            interested: interested.to_vec(),
            lead: lead.to_vec(),
        })
    }

    pub fn add_person(&mut self, record: &PersonRecord) -> Result<(), AllocationErrors> {
        let person = self._records.len();
        if record.name.trim().is_empty() {
            return Err(AllocationErrors::MalformedInput {
                person,
                reason: "missing name".to_string(),
            });
        }
        if let Some(projects) = self._projects.as_deref() {
            let unknown = record
                .interested
                .iter()
                .chain(record.lead.iter())
                .map(|s| s.trim())
                .find(|s| !s.is_empty() && !projects.iter().any(|p| p.as_str() == *s));
            if let Some(name) = unknown {
                return Err(AllocationErrors::MalformedInput {
                    person,
                    reason: format!("unknown project {:?}", name),
                });
            }
        }
        self._records.push(record.clone());
        Ok(())
    }

    pub fn run(&self) -> Result<AllocationResult, AllocationErrors> {
        match self._projects.as_deref() {
            Some(projects) => {
                crate::run_allocation_with_projects(&self._records, projects, &self._rules)
            }
            None => crate::run_allocation(&self._records, &self._rules),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infers_projects() {
        let mut builder = Builder::new(&AllocationRules::DEFAULT_RULES).unwrap();
        builder
            .add_person_simple("Breach", &names(&["Blu"]), &names(&["Red"]))
            .unwrap();
        builder
            .add_person_simple("Cypher", &[], &names(&["Blu", "Gre"]))
            .unwrap();
        builder
            .add_person_simple("Raze", &names(&["Gre"]), &names(&["Blu", "Red", "Yel"]))
            .unwrap();
        let result = builder.run().unwrap();
        assert_eq!(result.projects, names(&["Blu", "Gre", "Red", "Yel"]));
        assert_eq!(result.unplaced_projects, vec![0, 2, 3]);
        assert_eq!(result.unplaced_people, vec![0]);
    }

    #[test]
    fn rejects_unknown_projects() {
        let mut builder = Builder::new(&AllocationRules::DEFAULT_RULES)
            .unwrap()
            .projects(&names(&["Red", " ", "Blu", "Red"]))
            .unwrap();
        assert_eq!(builder._projects, Some(names(&["Blu", "Red"])));
        let res = builder.add_person_simple("Killjoy", &names(&["Gre"]), &[]);
        assert!(matches!(
            res,
            Err(AllocationErrors::MalformedInput { person: 0, .. })
        ));
        assert!(builder._records.is_empty());
    }

    #[test]
    fn rejects_invalid_rules() {
        let rules = AllocationRules {
            min_team_size: 3,
            max_team_size: 2,
            ..AllocationRules::DEFAULT_RULES
        };
        assert!(Builder::new(&rules).is_err());
    }
}
