use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::model::{VacancyId, VacancyRecord};
use crate::parser::{vacancy, SiteLayout};
use crate::settings::Settings;
use crate::transport::Transport;

/// Result of a detail-extraction run.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<VacancyRecord>,
    /// Ids whose page was fetched (includes the one that halted the run, if any).
    pub attempted: usize,
    /// Pages that parsed but lacked a required field.
    pub dropped: usize,
    /// Set when a transport error stopped the run early.
    pub halted_at: Option<VacancyId>,
}

pub fn vacancy_url(settings: &Settings, id: &VacancyId) -> String {
    format!("{}/{}", settings.vacancy_url.trim_end_matches('/'), id)
}

/// Fetch and parse each vacancy page in order.
///
/// A page missing a required field is skipped. The first transport error ends
/// the run; later ids are never requested.
pub fn extract_vacancies<T: Transport + ?Sized>(
    transport: &T,
    settings: &Settings,
    layout: &SiteLayout,
    ids: &[VacancyId],
) -> Extraction {
    let pb = if settings.show_progress {
        ProgressBar::new(ids.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let mut out = Extraction::default();

    for id in ids {
        let url = vacancy_url(settings, id);
        out.attempted += 1;

        let html = match transport.get(&url) {
            Ok(html) => html,
            Err(e) => {
                warn!(%id, error = %e, "Vacancy page failed, stopping with {} records", out.records.len());
                out.halted_at = Some(id.clone());
                break;
            }
        };

        match vacancy::extract(&html, layout).into_record(id.clone(), url) {
            Ok(record) => {
                out.records.push(record);
                if out.records.len() % 10 == 0 {
                    info!(extracted = out.records.len(), "Vacancy progress");
                }
            }
            Err(e) => {
                debug!(%id, error = %e, "Skipping vacancy");
                out.dropped += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Extracted {} of {} vacancies ({} dropped)",
        out.records.len(),
        ids.len(),
        out.dropped
    );
    out
}
