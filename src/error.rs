use std::path::PathBuf;

use thiserror::Error;

/// A fetch that did not produce a usable page. Ends the current phase.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// A page (or selector config) that does not have the shape we expect.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("malformed field `{field}`: {value:?}")]
    MalformedField { field: &'static str, value: String },
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum DateError {
    #[error("no month name in {0:?}")]
    NoMonth(String),
    #[error("{input:?} is not a `day month year` date")]
    Layout {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("no vacancies with skills in category {0}")]
    NoSkillBearingVacancies(String),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no location found for {0:?}")]
    NotFound(String),
    #[error("bad coordinate {0:?}")]
    Coordinate(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: missing column `{column}`")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{path}: row {row}: bad `{column}` value {value:?}")]
    BadValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
}
