use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError};
use serde::Deserialize;
use tracing::info;

pub const ITEMS_ON_PAGE: u32 = 15;
pub const DEFAULT_AREA: u32 = 113;

/// Everything the scraper needs to know about the site and the client.
///
/// Every field has a default, so a config file only has to name what it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search_url: String,
    pub vacancy_url: String,
    pub area: u32,
    pub user_agents: Vec<String>,
    /// Request timeout in seconds; the HTTP client's default when unset.
    pub timeout_secs: Option<u64>,
    pub show_progress: bool,
    pub geocoder_url: String,
    pub selectors: SelectorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_url: "https://hh.ru/search/vacancy".into(),
            vacancy_url: "https://hh.ru/vacancy".into(),
            area: DEFAULT_AREA,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".into(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15".into(),
                "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0".into(),
            ],
            timeout_secs: None,
            show_progress: true,
            geocoder_url: "https://nominatim.openstreetmap.org/search".into(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with a TOML/JSON/YAML file (format from the extension).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// CSS selectors and link pattern for the two page kinds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub listing_link: String,
    /// First capture group is the vacancy id.
    pub vacancy_link_pattern: String,
    pub title: String,
    pub company: String,
    pub rating: String,
    pub location: String,
    pub experience: String,
    pub employment_mode: String,
    pub pub_date: String,
    pub skills: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_link: r#"a.bloko-link[target="_blank"][href]"#.into(),
            vacancy_link_pattern: r"^https?://(?:[\w-]+\.)*hh\.ru/vacancy/(\d+)".into(),
            title: r#"h1[data-qa^="vacancy-title"]"#.into(),
            company: r#"span[class*="bloko-header-section-2"]"#.into(),
            rating: r#"div[data-qa="employer-review-small-widget-total-rating"]"#.into(),
            location: r#"[data-qa*="vacancy-view-location"], [data-qa*="vacancy-view-raw-address"]"#
                .into(),
            experience: r#"span[data-qa="vacancy-experience"]"#.into(),
            employment_mode: r#"p[data-qa="vacancy-view-employment-mode"]"#.into(),
            pub_date: "p.vacancy-creation-time-redesigned span".into(),
            skills: r#"li[data-qa="skills-element"]"#.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overrides_only_named_keys() {
        let dir = std::env::temp_dir().join(format!("hh_vacancies_settings_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.toml");
        std::fs::write(
            &path,
            "area = 1\ntimeout_secs = 5\n\n[selectors]\ntitle = \"h1.title\"\n",
        )
        .unwrap();

        let s = Settings::load(&path).unwrap();
        assert_eq!(s.area, 1);
        assert_eq!(s.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(s.selectors.title, "h1.title");
        assert_eq!(s.selectors.skills, SelectorConfig::default().skills);
        assert_eq!(s.search_url, Settings::default().search_url);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
