use std::collections::HashMap;

use serde::Serialize;

use crate::error::StatsError;
use crate::model::{Category, VacancyRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillShare {
    pub skill: String,
    pub count: usize,
    /// `count` over the category's skill-bearing vacancies, rounded to 3 places.
    pub share: f64,
}

/// (label, count) pairs in a meaningful order for charting.
pub type Distribution = Vec<(String, usize)>;

/// How often each skill is asked for within one category.
///
/// Only vacancies that list at least one skill count towards the denominator.
/// Sorted by count, most frequent first; equal counts keep first-seen order.
pub fn skill_popularity(
    records: &[VacancyRecord],
    category: Category,
) -> Result<Vec<SkillShare>, StatsError> {
    let mut skill_bearing = 0usize;
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for skills in records
        .iter()
        .filter(|r| r.category == Some(category))
        .filter_map(VacancyRecord::listed_skills)
    {
        skill_bearing += 1;
        for skill in skills {
            match index.get(skill) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(skill.clone(), counts.len());
                    counts.push((skill.clone(), 1));
                }
            }
        }
    }

    if skill_bearing == 0 {
        return Err(StatsError::NoSkillBearingVacancies(category.to_string()));
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(counts
        .into_iter()
        .map(|(skill, count)| SkillShare {
            share: round3(count as f64 / skill_bearing as f64),
            skill,
            count,
        })
        .collect())
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round_ties_even() / 1000.0
}

/// Label used for records that lack the tallied value.
pub const MISSING: &str = "—";

/// Tally in first-seen order. Missing values are counted under [`MISSING`].
fn tally<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Distribution {
    let mut out: Distribution = Vec::new();
    for v in values {
        let label = v.unwrap_or(MISSING);
        match out.iter_mut().find(|(l, _)| l == label) {
            Some((_, n)) => *n += 1,
            None => out.push((label.to_string(), 1)),
        }
    }
    out
}

/// Vacancies per category, least common first. Unclassified records are skipped.
pub fn by_category(records: &[VacancyRecord]) -> Distribution {
    let mut d = tally(records.iter().filter_map(|r| r.category).map(|c| Some(c.label())));
    d.sort_by_key(|(_, n)| *n);
    d
}

/// Vacancies per experience text, in first-seen order.
pub fn by_experience(records: &[VacancyRecord]) -> Distribution {
    tally(records.iter().map(|r| r.experience.as_deref()))
}

/// Vacancies per work format, least common first.
pub fn by_busyness(records: &[VacancyRecord]) -> Distribution {
    let mut d = tally(records.iter().map(|r| r.busyness.as_deref()));
    d.sort_by_key(|(_, n)| *n);
    d
}

/// Vacancies per city, most common first.
pub fn by_city(records: &[VacancyRecord]) -> Distribution {
    let mut d = tally(records.iter().map(|r| r.city.as_deref()));
    d.sort_by(|a, b| b.1.cmp(&a.1));
    d
}
