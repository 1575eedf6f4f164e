pub mod listing;
pub mod vacancy;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;
use crate::settings::SelectorConfig;

/// Compiled form of [`SelectorConfig`]. The only place that knows how the site's HTML looks.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    pub listing_link: Selector,
    pub vacancy_link: Regex,
    pub title: Selector,
    pub company: Selector,
    pub rating: Selector,
    pub location: Selector,
    pub experience: Selector,
    pub employment_mode: Selector,
    pub pub_date: Selector,
    pub skills: Selector,
}

impl SiteLayout {
    pub fn compile(cfg: &SelectorConfig) -> Result<Self, ParseError> {
        Ok(Self {
            listing_link: selector(&cfg.listing_link)?,
            vacancy_link: Regex::new(&cfg.vacancy_link_pattern)?,
            title: selector(&cfg.title)?,
            company: selector(&cfg.company)?,
            rating: selector(&cfg.rating)?,
            location: selector(&cfg.location)?,
            experience: selector(&cfg.experience)?,
            employment_mode: selector(&cfg.employment_mode)?,
            pub_date: selector(&cfg.pub_date)?,
            skills: selector(&cfg.skills)?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Element text with whitespace runs (no-break spaces included) collapsed.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match, `None` when nothing matches or the element is blank.
pub(crate) fn first_text(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}
