use crate::error::{QueryError, Result};
use chrono::NaiveDate;
use serde::Serialize;

pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";

const APP: &str = "Telecom";
const METHOD: &str = "Chamada";
const ACTION: &str = "getRetLigEntrante";

/// The single calendar day a query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    date: NaiveDate,
}

impl QueryWindow {
    pub fn new(date: NaiveDate) -> Self {
        QueryWindow { date }
    }

    /// Validate user input in `DD/MM/YYYY` form.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || QueryError::InvalidDateInput {
            input: input.to_string(),
        };
        let trimmed = input.trim();

        // chrono's %Y takes any width and a sign; the year must be exactly YYYY.
        let year = trimmed.rsplit('/').next().unwrap_or_default();
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(trimmed, INPUT_DATE_FORMAT)
            .map(QueryWindow::new)
            .map_err(|_| invalid())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> String {
        format!("{} 00:00:00", self.date.format(INPUT_DATE_FORMAT))
    }

    pub fn end(&self) -> String {
        format!("{} 23:59:59", self.date.format(INPUT_DATE_FORMAT))
    }

    pub fn form<'a>(&self, token: &'a str) -> FormPayload<'a> {
        FormPayload {
            token,
            app: APP,
            method: METHOD,
            action: ACTION,
            start: self.start(),
            end: self.end(),
        }
    }
}

/// Form-encoded body of the inbound call query.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct FormPayload<'a> {
    #[serde(rename = "vToken")]
    pub token: &'a str,
    #[serde(rename = "vApp")]
    pub app: &'static str,
    #[serde(rename = "vMetodo")]
    pub method: &'static str,
    #[serde(rename = "vAct")]
    pub action: &'static str,
    #[serde(rename = "vDataInicio")]
    pub start: String,
    #[serde(rename = "vDataFim")]
    pub end: String,
}
