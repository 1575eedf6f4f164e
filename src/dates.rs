use chrono::NaiveDate;

use crate::error::DateError;

const MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Parse a publication date like `15 марта 2024`.
pub fn parse_ru_date(input: &str) -> Result<NaiveDate, DateError> {
    let mut found = false;
    let normalized = input
        .split_whitespace()
        .map(|token| {
            let lower = token.to_lowercase();
            match MONTHS.iter().position(|m| *m == lower) {
                Some(idx) if !found => {
                    found = true;
                    format!("{:02}", idx + 1)
                }
                _ => token.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if !found {
        return Err(DateError::NoMonth(input.to_string()));
    }

    NaiveDate::parse_from_str(&normalized, "%d %m %Y").map_err(|source| DateError::Layout {
        input: input.to_string(),
        source,
    })
}
