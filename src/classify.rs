use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Category, VacancyRecord};

/// One classification rule: a title matching `pattern` gets `category`.
#[derive(Debug)]
pub struct Rule {
    pub category: Category,
    pub pattern: Regex,
}

/// Tried in order, first match wins. Anything unmatched is [`Category::Other`].
pub static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    [
        (
            Category::DataAnalyst,
            r"(?i)data.+anal|data.+анал|анал.*дан|\bda\b",
        ),
        (
            Category::BiAnalyst,
            r"(?i)bi.+anal|\bbi\b|bi.+анал|анал.*bi",
        ),
        (
            Category::ProductAnalyst,
            r"(?i)product|prod.+анал|анал.*прод|продукт",
        ),
        (
            Category::WebAnalyst,
            r"(?i)веб|web.+anal|анал.*web|\bweb\b",
        ),
        (Category::DataEngineer, r"(?i)engin|инжен|\bde\b"),
        (
            Category::DataScientist,
            r"(?i)data.+scien|scien|наук|\bds\b",
        ),
    ]
    .into_iter()
    .map(|(category, re)| Rule {
        category,
        pattern: Regex::new(re).unwrap(),
    })
    .collect()
});

pub fn classify(title: &str) -> Category {
    matching_rule(title)
        .map(|r| r.category)
        .unwrap_or(Category::Other)
}

pub fn matching_rule(title: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.pattern.is_match(title))
}

/// Attach a category to every record; a missing title classifies as Other.
pub fn classify_all(records: &mut [VacancyRecord]) {
    for r in records.iter_mut() {
        r.category = Some(classify(r.title.as_deref().unwrap_or("")));
    }
}
