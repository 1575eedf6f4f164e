use std::fmt;

/// Vacancy identifier as it appears in the listing URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VacancyId(String);

impl VacancyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VacancyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Experience filter accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Experience {
    NoExperience,
    Between1And3,
    Between3And6,
    MoreThan6,
}

impl Experience {
    pub const ALL: [Experience; 4] = [
        Experience::NoExperience,
        Experience::Between1And3,
        Experience::Between3And6,
        Experience::MoreThan6,
    ];

    /// Query value, also used as the file-name prefix.
    pub fn as_query(self) -> &'static str {
        match self {
            Experience::NoExperience => "noExperience",
            Experience::Between1And3 => "between1And3",
            Experience::Between3And6 => "between3And6",
            Experience::MoreThan6 => "moreThan6",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    DataAnalyst,
    BiAnalyst,
    ProductAnalyst,
    WebAnalyst,
    DataEngineer,
    DataScientist,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::DataAnalyst,
        Category::BiAnalyst,
        Category::ProductAnalyst,
        Category::WebAnalyst,
        Category::DataEngineer,
        Category::DataScientist,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::DataAnalyst => "Data Analyst",
            Category::BiAnalyst => "BI Analyst",
            Category::ProductAnalyst => "Product Analyst",
            Category::WebAnalyst => "Web Analyst",
            Category::DataEngineer => "Data Engineer",
            Category::DataScientist => "Data Scientist",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scraped vacancy. `category` is filled in after loading, by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct VacancyRecord {
    pub id: VacancyId,
    pub title: Option<String>,
    pub experience: Option<String>,
    pub work_type: Option<String>,
    pub busyness: Option<String>,
    pub city: Option<String>,
    pub company: Option<String>,
    pub rating: Option<f64>,
    /// `Some(vec![])` straight from a page; reloaded files turn `[]` into `None`.
    pub skills: Option<Vec<String>>,
    pub pub_date: Option<String>,
    pub url: String,
    pub category: Option<Category>,
}

impl VacancyRecord {
    /// Skills, only when the vacancy actually lists some.
    pub fn listed_skills(&self) -> Option<&[String]> {
        self.skills.as_deref().filter(|s| !s.is_empty())
    }

    pub fn published_on(&self) -> Option<Result<chrono::NaiveDate, crate::error::DateError>> {
        self.pub_date.as_deref().map(crate::dates::parse_ru_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(id: &str) -> VacancyRecord {
        VacancyRecord {
            id: VacancyId::new(id),
            title: None,
            experience: None,
            work_type: None,
            busyness: None,
            city: None,
            company: None,
            rating: None,
            skills: None,
            pub_date: None,
            url: String::new(),
            category: None,
        }
    }

    #[test]
    fn listed_skills_ignores_empty_lists() {
        let mut r = bare("1");
        assert!(r.listed_skills().is_none());
        r.skills = Some(vec![]);
        assert!(r.listed_skills().is_none());
        r.skills = Some(vec!["SQL".into()]);
        assert_eq!(r.listed_skills(), Some(&["SQL".to_string()][..]));
    }

    #[test]
    fn publication_date() {
        let mut r = bare("1");
        assert!(r.published_on().is_none());
        r.pub_date = Some("2 апреля 2024".into());
        let d = r.published_on().unwrap().unwrap();
        assert_eq!(d, chrono::NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
    }

    #[test]
    fn labels() {
        assert_eq!(Category::BiAnalyst.to_string(), "BI Analyst");
        assert_eq!(Experience::Between3And6.to_string(), "between3And6");
    }
}
