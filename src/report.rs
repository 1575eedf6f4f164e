use std::io::{self, Write};

use tracing::warn;

use crate::error::StatsError;
use crate::model::{Category, VacancyRecord};
use crate::stats::{self, Distribution};

/// Skills below this share are left off the skill charts.
pub const MIN_SKILL_SHARE: f64 = 0.05;
const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub value_label: String,
    pub bars: Vec<(String, f64)>,
    pub orientation: Orientation,
}

impl BarChart {
    fn from_distribution(title: &str, d: Distribution) -> Self {
        Self {
            title: title.to_string(),
            value_label: "Number of vacancies".to_string(),
            bars: d.into_iter().map(|(l, n)| (l, n as f64)).collect(),
            orientation: Orientation::Vertical,
        }
    }
}

pub fn vacancies_by_category(records: &[VacancyRecord]) -> BarChart {
    BarChart::from_distribution(
        "Distribution of vacancies in the labor market",
        stats::by_category(records),
    )
}

pub fn vacancies_by_experience(records: &[VacancyRecord]) -> BarChart {
    BarChart::from_distribution(
        "Distribution of vacancies depending on experience",
        stats::by_experience(records),
    )
}

pub fn vacancies_by_work_format(records: &[VacancyRecord]) -> BarChart {
    BarChart::from_distribution(
        "Distribution of vacancies depending on the format of the work",
        stats::by_busyness(records),
    )
}

/// Horizontal chart of skill demand in percent, skills under [`MIN_SKILL_SHARE`] dropped.
pub fn skill_chart(records: &[VacancyRecord], category: Category) -> Result<BarChart, StatsError> {
    let bars = stats::skill_popularity(records, category)?
        .into_iter()
        .filter(|s| s.share >= MIN_SKILL_SHARE)
        .map(|s| (s.skill, s.share * 100.0))
        .collect();
    Ok(BarChart {
        title: format!("The necessary skills for {category}"),
        value_label: "The percentage of demand for the skill".to_string(),
        bars,
        orientation: Orientation::Horizontal,
    })
}

/// Skill charts for each category that has skill-bearing vacancies.
pub fn skill_charts(records: &[VacancyRecord], categories: &[Category]) -> Vec<BarChart> {
    categories
        .iter()
        .filter_map(|&c| match skill_chart(records, c) {
            Ok(chart) => Some(chart),
            Err(e) => {
                warn!(category = %c, error = %e, "No skill chart");
                None
            }
        })
        .collect()
}

/// Draws charts somewhere: a plotting backend, a file, a terminal.
pub trait ChartRenderer {
    fn render(&mut self, chart: &BarChart) -> io::Result<()>;
}

/// Renders each chart as a Markdown section: a table with text bars.
pub struct MarkdownRenderer<W: Write> {
    out: W,
}

impl<W: Write> MarkdownRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for MarkdownRenderer<W> {
    fn render(&mut self, chart: &BarChart) -> io::Result<()> {
        writeln!(self.out, "## {}\n", chart.title)?;
        if chart.bars.is_empty() {
            writeln!(self.out, "_No data._\n")?;
            return Ok(());
        }

        let label_head = match chart.orientation {
            Orientation::Horizontal => "Skill",
            Orientation::Vertical => "Value",
        };
        writeln!(self.out, "| {} | {} | |", label_head, chart.value_label)?;
        writeln!(self.out, "|---|---:|---|")?;

        let max = chart.bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        for (label, value) in &chart.bars {
            let width = if max > 0.0 {
                ((value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            writeln!(
                self.out,
                "| {} | {} | {} |",
                label.replace('|', "\\|"),
                format_value(*value),
                "█".repeat(width)
            )?;
        }
        writeln!(self.out)
    }
}

fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VacancyId;

    fn rec(id: &str, category: Category, skills: &[&str], busyness: &str) -> VacancyRecord {
        VacancyRecord {
            id: VacancyId::new(id),
            title: None,
            experience: Some("нет опыта".into()),
            work_type: None,
            busyness: Some(busyness.into()),
            city: None,
            company: None,
            rating: None,
            skills: Some(skills.iter().map(|s| s.to_string()).collect()),
            pub_date: None,
            url: String::new(),
            category: Some(category),
        }
    }

    #[test]
    fn skill_chart_keeps_common_skills_in_percent() {
        let mut records: Vec<VacancyRecord> = (0..20)
            .map(|i| rec(&i.to_string(), Category::DataAnalyst, &["SQL"], "полный день"))
            .collect();
        records[0].skills = Some(vec!["SQL".into(), "Rare".into()]);
        records[1].skills = Some(vec!["SQL".into(), "Excel".into()]);
        records[2].skills = Some(vec!["Excel".into()]);

        let chart = skill_chart(&records, Category::DataAnalyst).unwrap();
        assert_eq!(chart.orientation, Orientation::Horizontal);
        assert_eq!(chart.title, "The necessary skills for Data Analyst");
        // SQL 19/20, Excel 2/20; Rare 1/20 sits exactly on the cut-off.
        assert_eq!(
            chart.bars,
            [
                ("SQL".to_string(), 95.0),
                ("Excel".to_string(), 10.0),
                ("Rare".to_string(), 5.0)
            ]
        );
    }

    #[test]
    fn skill_charts_skip_empty_categories() {
        let records = vec![rec("1", Category::WebAnalyst, &["GA"], "удаленная работа")];
        let charts = skill_charts(&records, &[Category::DataAnalyst, Category::WebAnalyst]);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "The necessary skills for Web Analyst");
    }

    #[test]
    fn markdown_rendering() {
        let records = vec![
            rec("1", Category::DataAnalyst, &[], "полный день"),
            rec("2", Category::DataAnalyst, &[], "полный день"),
            rec("3", Category::DataAnalyst, &[], "удаленная работа"),
        ];
        let mut r = MarkdownRenderer::new(Vec::new());
        r.render(&vacancies_by_work_format(&records)).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "## Distribution of vacancies depending on the format of the work"
        );
        assert_eq!(lines[4], format!("| удаленная работа | 1 | {} |", "█".repeat(15)));
        assert_eq!(lines[5], format!("| полный день | 2 | {} |", "█".repeat(30)));
    }

    #[test]
    fn empty_chart_renders_placeholder() {
        let mut r = MarkdownRenderer::new(Vec::new());
        r.render(&vacancies_by_category(&[])).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.contains("_No data._"));
    }
}
