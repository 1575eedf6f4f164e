use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use csv::StringRecord;
use regex::Regex;
use tracing::info;

use crate::error::StoreError;
use crate::model::{Experience, VacancyId, VacancyRecord};

pub const COLUMNS: [&str; 11] = [
    "id",
    "vacancy_name",
    "experience",
    "work_type",
    "busyness",
    "city",
    "company",
    "rating",
    "skills",
    "pub_date",
    "url",
];

/// One quoted list item at the start of the text, single- or double-quoted.
static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")"#).unwrap()
});

pub fn date_key(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// `{experience}_{dd-mm-yyyy}`
pub fn file_name(experience: Experience, date: NaiveDate) -> String {
    format!("{}_{}", experience.as_query(), date_key(date))
}

/// Write one snapshot file, replacing any earlier file for the same key.
pub fn write_snapshot(
    dir: &Path,
    experience: Experience,
    date: NaiveDate,
    records: &[VacancyRecord],
) -> Result<PathBuf, StoreError> {
    let path = dir.join(file_name(experience, date));
    write_records(&path, records)?;
    info!(path = %path.display(), rows = records.len(), "Wrote snapshot");
    Ok(path)
}

pub fn write_records(path: &Path, records: &[VacancyRecord]) -> Result<(), StoreError> {
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::Writer::from_path(path).map_err(csv_err)?;

    let mut header = vec![""];
    header.extend(COLUMNS);
    wtr.write_record(&header).map_err(csv_err)?;

    for (i, r) in records.iter().enumerate() {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        wtr.write_record([
            i.to_string(),
            r.id.to_string(),
            opt(&r.title),
            opt(&r.experience),
            opt(&r.work_type),
            opt(&r.busyness),
            opt(&r.city),
            opt(&r.company),
            r.rating.map(|x| x.to_string()).unwrap_or_default(),
            r.skills.as_deref().map(encode_skills).unwrap_or_default(),
            opt(&r.pub_date),
            r.url.clone(),
        ])
        .map_err(csv_err)?;
    }

    wtr.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and concatenate every snapshot in `dir` whose name carries `date`.
///
/// Files are read in name order. `[]` skill lists come back as `None`.
pub fn load_snapshots(dir: &Path, date: NaiveDate) -> Result<Vec<VacancyRecord>, StoreError> {
    let key = date_key(date);
    let io_err = |source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let name = entry.file_name();
        if name.to_string_lossy().contains(&key) && entry.path().is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut all = Vec::new();
    for path in &paths {
        all.extend(read_records(path)?);
    }
    info!(files = paths.len(), rows = all.len(), date = %key, "Loaded snapshots");
    Ok(all)
}

pub fn read_records(path: &Path) -> Result<Vec<VacancyRecord>, StoreError> {
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let mut idx = [0usize; COLUMNS.len()];
    for (slot, column) in idx.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or(StoreError::MissingColumn {
                path: path.to_path_buf(),
                column,
            })?;
    }

    let mut out = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let rec = result.map_err(csv_err)?;
        out.push(parse_row(path, row, &rec, &idx)?);
    }
    Ok(out)
}

fn parse_row(
    path: &Path,
    row: usize,
    rec: &StringRecord,
    idx: &[usize; COLUMNS.len()],
) -> Result<VacancyRecord, StoreError> {
    let cell = |i: usize| rec.get(idx[i]).unwrap_or("");
    let opt = |i: usize| Some(cell(i)).filter(|s| !s.is_empty()).map(str::to_string);
    let bad = |column: &'static str, value: &str| StoreError::BadValue {
        path: path.to_path_buf(),
        row,
        column,
        value: value.to_string(),
    };

    let rating = match cell(7) {
        "" => None,
        raw => Some(raw.parse::<f64>().map_err(|_| bad("rating", raw))?),
    };
    let skills = match cell(8) {
        "" => None,
        raw => {
            let list = decode_skills(raw).ok_or_else(|| bad("skills", raw))?;
            Some(list).filter(|s| !s.is_empty())
        }
    };

    Ok(VacancyRecord {
        id: VacancyId::new(cell(0)),
        title: opt(1),
        experience: opt(2),
        work_type: opt(3),
        busyness: opt(4),
        city: opt(5),
        company: opt(6),
        rating,
        skills,
        pub_date: opt(9),
        url: cell(10).to_string(),
        category: None,
    })
}

/// `['SQL', 'Python']`
pub fn encode_skills(skills: &[String]) -> String {
    let items: Vec<String> = skills
        .iter()
        .map(|s| format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Inverse of [`encode_skills`], also reading Python-repr lists where an item
/// holding `'` is double-quoted. `None` unless quoted items separated by `", "`
/// make up the whole list.
fn decode_skills(raw: &str) -> Option<Vec<String>> {
    let mut rest = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut items: Vec<String> = Vec::new();
    while !rest.is_empty() {
        if !items.is_empty() {
            rest = rest.strip_prefix(", ")?;
        }
        let caps = QUOTED_RE.captures(rest)?;
        let body = caps.get(1).or_else(|| caps.get(2))?;
        items.push(unescape(body.as_str()));
        rest = &rest[caps.get(0)?.end()..];
    }
    Some(items)
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}
