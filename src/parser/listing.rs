use scraper::Html;

use super::SiteLayout;
use crate::model::VacancyId;

/// Vacancy ids linked from one search-results page, in page order.
pub fn extract_ids(html: &str, layout: &SiteLayout) -> Vec<VacancyId> {
    let doc = Html::parse_document(html);
    doc.select(&layout.listing_link)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| {
            let id = layout.vacancy_link.captures(href)?.get(1)?.as_str();
            (!id.is_empty()).then(|| VacancyId::new(id))
        })
        .collect()
}
