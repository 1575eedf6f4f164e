//! Scrape hh.ru vacancies, classify them by role and summarise skill demand.
//!
//! The flow is [`discovery`] (search pages to ids), [`extraction`] (ids to
//! records), [`store`] (snapshot files), then [`classify`], [`stats`],
//! [`report`] and [`geo`] for analysis. [`pipeline`] strings the first three
//! together.

pub mod classify;
pub mod dates;
pub mod discovery;
pub mod error;
pub mod extraction;
pub mod geo;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod settings;
pub mod stats;
pub mod store;
pub mod transport;

pub use classify::{classify, classify_all};
pub use discovery::{discover_ids, SearchQuery};
pub use extraction::{extract_vacancies, Extraction};
pub use model::{Category, Experience, VacancyId, VacancyRecord};
pub use parser::SiteLayout;
pub use settings::Settings;
pub use transport::{HttpTransport, Transport};

/// Install a fmt subscriber filtered by `RUST_LOG`, `info` when unset.
/// Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}
