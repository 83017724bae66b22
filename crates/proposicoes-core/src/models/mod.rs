//! Data models for the proposicoes export client

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Wire format for every date sent to the API
pub const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

/// Input formats accepted from users, tried in order
const INPUT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Entry of a reference list (municipality or species)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

/// Which reference list to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Municipality,
    Species,
}

impl ReferenceKind {
    /// Listing endpoint, relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            ReferenceKind::Municipality => "municipios",
            ReferenceKind::Species => "projeto/especies",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Municipality => "municipalities",
            ReferenceKind::Species => "species",
        }
    }
}

/// Validated parameter set sent with an export request
///
/// Built fresh for every submission and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportQuery {
    municipality_id: i64,
    category: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ExportQuery {
    /// Fails when either date falls outside years 1..=9999, which
    /// `yyyy-MM-dd` cannot represent
    pub fn new(
        municipality_id: i64,
        category: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        for date in [start_date, end_date] {
            if !has_four_digit_year(date) {
                return Err(Error::validation(format!(
                    "{} cannot be sent as yyyy-MM-dd",
                    date
                )));
            }
        }
        Ok(Self {
            municipality_id,
            category: category.into(),
            start_date,
            end_date,
        })
    }

    pub fn municipality_id(&self) -> i64 {
        self.municipality_id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// URL parameters for `GET /proposicao/gerar-excel`
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id_municipio", self.municipality_id.to_string()),
            ("tipo", self.category.clone()),
            ("data_inicio", format_calendar_date(self.start_date)),
            ("data_final", format_calendar_date(self.end_date)),
        ]
    }
}

/// Whether the date's year fits the four digits of `yyyy-MM-dd`
pub fn has_four_digit_year(date: NaiveDate) -> bool {
    (1..=9999).contains(&date.year())
}

/// Format a date as `yyyy-MM-dd`
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(CALENDAR_DATE_FORMAT).to_string()
}

/// Parse a user supplied date
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY`, `DD-MM-YYYY` and the keywords
/// `today` / `yesterday`.
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    let today = chrono::Local::now().date_naive();
    match s.to_lowercase().as_str() {
        "today" | "hoje" => return Ok(today),
        "yesterday" | "ontem" => return Ok(today - chrono::Duration::days(1)),
        _ => {}
    }

    INPUT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        // %Y accepts any number of digits; keep the wire format fixed-width
        .filter(|d| has_four_digit_year(*d))
        .ok_or_else(|| {
            Error::validation(format!(
                "Invalid date format: {}. Use YYYY-MM-DD or DD/MM/YYYY",
                s
            ))
        })
}
