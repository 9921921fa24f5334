//! Catalog queries over jobs, competencies, profiles, assessors and plans.
//!
//! Pure functions over slices fetched from the API. Nothing here mutates
//! its inputs.

use crate::{
    AssessorMapping, Competency, CompetencyType, EntityId, IdpStatus, IndividualDevelopmentPlan,
    Job, JobCompetencyMapping, ProficiencyLevel, Sid,
};
use std::collections::HashMap;

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Jobs whose code, title or division contains `query` (case-insensitive).
/// A blank query matches everything.
pub fn search_jobs<'a>(jobs: &'a [Job], query: &str, active_only: bool) -> Vec<&'a Job> {
    let needle = query.trim().to_lowercase();
    jobs.iter()
        .filter(|job| !active_only || job.is_active)
        .filter(|job| {
            needle.is_empty()
                || contains_ci(&job.code, &needle)
                || contains_ci(&job.title, &needle)
                || job
                    .division
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, &needle))
        })
        .collect()
}

/// Competencies whose name or family contains `query`, optionally
/// restricted to one type.
pub fn search_competencies<'a>(
    competencies: &'a [Competency],
    query: &str,
    competency_type: Option<CompetencyType>,
) -> Vec<&'a Competency> {
    let needle = query.trim().to_lowercase();
    competencies
        .iter()
        .filter(|c| competency_type.map_or(true, |t| c.competency_type == t))
        .filter(|c| {
            needle.is_empty()
                || contains_ci(&c.name, &needle)
                || c.family.as_deref().is_some_and(|f| contains_ci(f, &needle))
        })
        .collect()
}

/// One resolved line of a job's competency profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry<'a> {
    pub competency: &'a Competency,
    pub required_level: ProficiencyLevel,
    pub is_required: bool,
}

/// Competency profile of a job (its JCP rows joined with the dictionary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetencyProfile<'a> {
    pub job_code: String,
    /// Required entries first, then optional ones; input order within each group.
    pub entries: Vec<ProfileEntry<'a>>,
    /// Competency ids referenced by a mapping but absent from the dictionary.
    pub unresolved: Vec<EntityId>,
}

impl<'a> CompetencyProfile<'a> {
    pub fn for_job(
        job_code: &str,
        mappings: &[JobCompetencyMapping],
        competencies: &'a [Competency],
    ) -> Self {
        let by_id: HashMap<EntityId, &'a Competency> =
            competencies.iter().map(|c| (c.id, c)).collect();

        let mut entries = Vec::new();
        let mut unresolved = Vec::new();
        for mapping in mappings.iter().filter(|m| m.job_code == job_code) {
            match by_id.get(&mapping.competency_id).copied() {
                Some(competency) => entries.push(ProfileEntry {
                    competency,
                    required_level: mapping.required_level,
                    is_required: mapping.is_required,
                }),
                None => unresolved.push(mapping.competency_id),
            }
        }
        // Stable sort keeps input order inside each group.
        entries.sort_by_key(|e| !e.is_required);

        Self {
            job_code: job_code.to_string(),
            entries,
            unresolved,
        }
    }

    pub fn required(&self) -> impl Iterator<Item = &ProfileEntry<'a>> {
        self.entries.iter().filter(|e| e.is_required)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Active (assessor, competency) pairs that occur more than once, in
/// first-seen order. The API does not enforce uniqueness.
pub fn duplicate_assessor_pairs(mappings: &[AssessorMapping]) -> Vec<(Sid, EntityId)> {
    let mut counts: HashMap<(&Sid, EntityId), usize> = HashMap::new();
    let mut order = Vec::new();
    for mapping in mappings.iter().filter(|m| m.is_active) {
        let key = (&mapping.assessor_sid, mapping.competency_id);
        let count = counts.entry(key).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push((mapping.assessor_sid.clone(), mapping.competency_id));
        }
    }
    order
}

/// Active assessors for a competency qualified at or above `min_level`.
pub fn assessors_for<'a>(
    mappings: &'a [AssessorMapping],
    competency_id: EntityId,
    min_level: ProficiencyLevel,
) -> Vec<&'a AssessorMapping> {
    mappings
        .iter()
        .filter(|m| m.is_active && m.competency_id == competency_id)
        .filter(|m| m.competency_level >= min_level)
        .collect()
}

/// Roll-up of an employee's development plans.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IdpSummary {
    pub planned: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Mean progress over all plans; 0 when there are none.
    pub mean_progress: f32,
}

impl IdpSummary {
    pub fn from_plans(plans: &[IndividualDevelopmentPlan]) -> Self {
        let mut summary = Self::default();
        if plans.is_empty() {
            return summary;
        }
        let mut total: u32 = 0;
        for plan in plans {
            match plan.status {
                IdpStatus::Planned => summary.planned += 1,
                IdpStatus::InProgress => summary.in_progress += 1,
                IdpStatus::Completed => summary.completed += 1,
            }
            total += u32::from(plan.progress_percentage.min(100));
        }
        summary.mean_progress = total as f32 / plans.len() as f32;
        summary
    }

    pub fn total(&self) -> usize {
        self.planned + self.in_progress + self.completed
    }
}

// =============================================================================
// TESTS
// =============================================================================
