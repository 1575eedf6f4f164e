use scraper::Html;

use super::{element_text, first_text, SiteLayout};
use crate::error::ParseError;
use crate::model::{VacancyId, VacancyRecord};

/// Raw per-field results for one detail page. Nothing here fails on its own;
/// [`PageFields::into_record`] decides which absences are fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFields {
    pub title: Option<String>,
    pub company: Option<String>,
    pub rating: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub employment_mode: Option<String>,
    pub pub_date: Option<String>,
    pub skills: Vec<String>,
}

pub fn extract(html: &str, layout: &SiteLayout) -> PageFields {
    let doc = Html::parse_document(html);
    PageFields {
        title: first_text(&doc, &layout.title),
        company: first_text(&doc, &layout.company),
        rating: first_text(&doc, &layout.rating),
        location: first_text(&doc, &layout.location),
        experience: first_text(&doc, &layout.experience),
        employment_mode: first_text(&doc, &layout.employment_mode),
        pub_date: first_text(&doc, &layout.pub_date),
        skills: doc
            .select(&layout.skills)
            .map(element_text)
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

impl PageFields {
    /// Location, employment mode and publication date are required; the rest may be absent.
    pub fn into_record(self, id: VacancyId, url: String) -> Result<VacancyRecord, ParseError> {
        let location = self.location.ok_or(ParseError::MissingField("location"))?;
        let city = location
            .split(", ")
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ParseError::MalformedField {
                field: "location",
                value: location.clone(),
            })?
            .to_string();

        let mode = self
            .employment_mode
            .ok_or(ParseError::MissingField("employment_mode"))?;
        let (work_type, busyness) = split_mode(&mode).ok_or_else(|| ParseError::MalformedField {
            field: "employment_mode",
            value: mode.clone(),
        })?;

        let pub_date = self.pub_date.ok_or(ParseError::MissingField("pub_date"))?;

        Ok(VacancyRecord {
            id,
            title: self.title,
            experience: self.experience,
            work_type: Some(work_type),
            busyness: Some(busyness),
            city: Some(city),
            company: self.company,
            rating: self.rating.as_deref().and_then(parse_rating),
            skills: Some(self.skills),
            pub_date: Some(pub_date),
            url,
            category: None,
        })
    }
}

fn split_mode(mode: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = mode.split(", ").collect();
    match parts.as_slice() {
        [work_type, busyness] => Some((work_type.to_string(), busyness.to_string())),
        _ => None,
    }
}

fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SelectorConfig;

    fn layout() -> SiteLayout {
        SiteLayout::compile(&SelectorConfig::default()).unwrap()
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn full_vacancy_page() {
        let fields = extract(&fixture("vacancy_full"), &layout());
        assert_eq!(fields.title.as_deref(), Some("Аналитик данных (Data Analyst)"));
        assert_eq!(fields.company.as_deref(), Some("ООО Ромашка"));
        assert_eq!(fields.rating.as_deref(), Some("4,3"));
        assert_eq!(fields.experience.as_deref(), Some("1–3 года"));
        assert_eq!(fields.pub_date.as_deref(), Some("15 марта 2024"));
        assert_eq!(fields.skills, ["SQL", "Python", "Power BI"]);

        let record = fields
            .into_record(VacancyId::new("93851234"), "https://hh.ru/vacancy/93851234".into())
            .unwrap();
        assert_eq!(record.city.as_deref(), Some("Москва"));
        assert_eq!(record.work_type.as_deref(), Some("Полная занятость"));
        assert_eq!(record.busyness.as_deref(), Some("удаленная работа"));
        assert_eq!(record.rating, Some(4.3));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let fields = extract(&fixture("vacancy_minimal"), &layout());
        assert!(fields.company.is_none());
        assert!(fields.rating.is_none());
        assert!(fields.skills.is_empty());

        let record = fields
            .into_record(VacancyId::new("1"), "https://hh.ru/vacancy/1".into())
            .unwrap();
        assert_eq!(record.city.as_deref(), Some("Пермь"));
        assert_eq!(record.skills, Some(vec![]));
        assert_eq!(record.rating, None);
    }

    #[test]
    fn missing_required_field_drops_record() {
        let fields = extract(&fixture("vacancy_malformed"), &layout());
        let err = fields
            .into_record(VacancyId::new("2"), "https://hh.ru/vacancy/2".into())
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingField("employment_mode")));
    }

    #[test]
    fn employment_mode_needs_two_parts() {
        let fields = PageFields {
            location: Some("Казань".into()),
            employment_mode: Some("Полная занятость".into()),
            pub_date: Some("1 мая 2024".into()),
            ..PageFields::default()
        };
        let err = fields
            .into_record(VacancyId::new("3"), String::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedField {
                field: "employment_mode",
                ..
            }
        ));
    }

    #[test]
    fn unreadable_rating_is_just_absent() {
        assert_eq!(parse_rating("нет оценок"), None);
        assert_eq!(parse_rating(" 4.8 "), Some(4.8));
    }
}
