use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::classify;
use crate::discovery::{self, SearchQuery};
use crate::extraction;
use crate::model::{Experience, VacancyRecord};
use crate::parser::SiteLayout;
use crate::settings::Settings;
use crate::store;
use crate::transport::Transport;

/// Search, extract and save one snapshot file per experience bucket.
///
/// `today` names the files. Returns the written paths in bucket order.
pub fn collect_and_save<T: Transport + ?Sized>(
    transport: &T,
    settings: &Settings,
    terms: &[&str],
    experiences: &[Experience],
    search_period: u32,
    today: NaiveDate,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let layout = SiteLayout::compile(&settings.selectors).context("Invalid selector settings")?;
    let mut written = Vec::with_capacity(experiences.len());

    for &experience in experiences {
        let t0 = Instant::now();
        info!(%experience, "Searching vacancies");
        let query = SearchQuery {
            search_period,
            ..SearchQuery::new(terms, experience)
        };
        let ids = discovery::discover_ids(transport, settings, &layout, &query);

        info!(%experience, ids = ids.len(), "Fetching vacancy details");
        let extraction = extraction::extract_vacancies(transport, settings, &layout, &ids);

        let path = store::write_snapshot(out_dir, experience, today, &extraction.records)
            .with_context(|| format!("Failed to save {experience} vacancies"))?;
        info!(
            %experience,
            rows = extraction.records.len(),
            "Saved {} in {:.1}s",
            path.display(),
            t0.elapsed().as_secs_f64()
        );
        written.push(path);
    }

    Ok(written)
}

/// Merge the snapshots saved on `date` and attach categories.
pub fn load_classified(dir: &Path, date: NaiveDate) -> Result<Vec<VacancyRecord>> {
    let mut records = store::load_snapshots(dir, date)
        .with_context(|| format!("Failed to load snapshots from {}", dir.display()))?;
    classify::classify_all(&mut records);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::stats;
    use crate::transport::testing::ScriptedTransport;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn end_to_end_with_canned_site() {
        let dir = std::env::temp_dir().join(format!("hh_vacancies_pipeline_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let settings = Settings {
            show_progress: false,
            ..Settings::default()
        };
        let terms = ["data analyst"];
        let no_exp = SearchQuery {
            search_period: 1,
            ..SearchQuery::new(&terms, Experience::NoExperience)
        };
        let senior = SearchQuery {
            search_period: 1,
            ..SearchQuery::new(&terms, Experience::MoreThan6)
        };

        let transport = ScriptedTransport::default()
            .page(no_exp.page_url(&settings, 0), fixture("search_page"))
            .page(no_exp.page_url(&settings, 1), "<html></html>")
            .page("https://hh.ru/vacancy/93851234", fixture("vacancy_full"))
            .page("https://hh.ru/vacancy/93855555", fixture("vacancy_malformed"))
            .page("https://hh.ru/vacancy/93850001", fixture("vacancy_minimal"))
            .status(senior.page_url(&settings, 0), 503);

        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let paths = collect_and_save(
            &transport,
            &settings,
            &terms,
            &[Experience::NoExperience, Experience::MoreThan6],
            1,
            today,
            &dir,
        )
        .unwrap();
        assert_eq!(paths, [dir.join("noExperience_02-04-2024"), dir.join("moreThan6_02-04-2024")]);

        let records = load_classified(&dir, today).unwrap();
        let got: Vec<(&str, Option<Category>)> =
            records.iter().map(|r| (r.id.as_str(), r.category)).collect();
        assert_eq!(
            got,
            [
                ("93851234", Some(Category::DataAnalyst)),
                ("93850001", Some(Category::WebAnalyst)),
            ]
        );
        // The minimal page lists no skills, so only one vacancy is skill-bearing.
        assert_eq!(records[1].skills, None);
        let shares = stats::skill_popularity(&records, Category::DataAnalyst).unwrap();
        assert_eq!(shares.len(), 3);
        assert!(shares.iter().all(|s| s.share == 1.0));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bad_selectors_fail_fast() {
        let mut settings = Settings::default();
        settings.selectors.listing_link = "a[".into();
        let transport = ScriptedTransport::default();
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let err = collect_and_save(
            &transport,
            &settings,
            &["bi"],
            &[Experience::NoExperience],
            0,
            today,
            Path::new("."),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid selector settings"));
        assert!(transport.requested.borrow().is_empty());
    }
}
