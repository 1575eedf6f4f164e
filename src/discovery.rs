use tracing::{info, warn};

use crate::model::{Experience, VacancyId};
use crate::parser::{listing, SiteLayout};
use crate::settings::{Settings, ITEMS_ON_PAGE};
use crate::transport::Transport;

/// One search: OR of the vacancy-name terms, filtered by experience and recency.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub terms: Vec<String>,
    pub experience: Experience,
    pub start_page: u32,
    /// Recency window in days (0 lets the site pick its default).
    pub search_period: u32,
}

impl SearchQuery {
    pub fn new(terms: &[&str], experience: Experience) -> Self {
        Self {
            terms: terms.iter().map(|t| t.to_string()).collect(),
            experience,
            start_page: 0,
            search_period: 0,
        }
    }

    /// `%22data+analyst%22+or+%22bi%22`
    pub fn text_param(&self) -> String {
        self.terms
            .iter()
            .map(|t| format!("%22{}%22", encode_term(t)))
            .collect::<Vec<_>>()
            .join("+or+")
    }

    pub fn page_url(&self, settings: &Settings, page: u32) -> String {
        format!(
            "{}?text={}&search_period={}&items_on_page={}&area={}&experience={}&page={}",
            settings.search_url,
            self.text_param(),
            self.search_period,
            ITEMS_ON_PAGE,
            settings.area,
            self.experience.as_query(),
            page
        )
    }
}

/// Words of one term, each percent-encoded, joined by `+`.
fn encode_term(term: &str) -> String {
    term.split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// Walk result pages from `query.start_page` until a page has no vacancy links
/// or the transport fails. Either way the ids gathered so far are returned.
pub fn discover_ids<T: Transport + ?Sized>(
    transport: &T,
    settings: &Settings,
    layout: &SiteLayout,
    query: &SearchQuery,
) -> Vec<VacancyId> {
    let mut ids = Vec::new();
    let mut page = query.start_page;

    loop {
        if page % 10 == 0 {
            info!(page, experience = %query.experience, "Fetching search page");
        }

        let url = query.page_url(settings, page);
        let html = match transport.get(&url) {
            Ok(html) => html,
            Err(e) => {
                warn!(page, error = %e, "Search page failed, stopping with {} ids", ids.len());
                return ids;
            }
        };

        let found = listing::extract_ids(&html, layout);
        if found.is_empty() {
            info!(page, total = ids.len(), "No more vacancies");
            return ids;
        }
        ids.extend(found);
        page += 1;
    }
}
