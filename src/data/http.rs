//! HTTP retrieval and parsing of category data files.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde_json::{Map, Value};

use crate::data::DataSource;
use crate::domain::{Category, Record};
use crate::error::AppError;

const ENV_DATA_URL: &str = "MDASH_DATA_URL";

/// Fetches category documents from a configured base URL.
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base = std::env::var(ENV_DATA_URL).map_err(|_| {
            AppError::config(format!(
                "Missing {ENV_DATA_URL} in environment (.env). Pass --data-url, or --offline for synthetic data."
            ))
        })?;
        Ok(Self::new(base))
    }

    fn fetch_document(&self, file: &str) -> Result<String, AppError> {
        let url = format!("{}/{}", self.base_url, file);
        let resp = self
            .client
            .get(&url)
            // The files are regenerated in place under stable names; ask
            // intermediaries for fresh content, never a cached body.
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .map_err(|e| AppError::data(format!("Request for {url} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::data(format!(
                "Request for {url} failed with status {}.",
                resp.status()
            )));
        }

        resp.text()
            .map_err(|e| AppError::data(format!("Failed to read body of {url}: {e}")))
    }
}

impl DataSource for HttpSource {
    fn fetch(&self, category: &Category) -> Result<Vec<Record>, AppError> {
        let body = self.fetch_document(category.file)?;
        parse_records(&body)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Parse one category document: a JSON array of `{date, ...metrics}` objects.
///
/// Field order of each object is preserved (the selectable series list depends
/// on it). Records come back in document order; sorting is the load
/// pipeline's job.
pub fn parse_records(body: &str) -> Result<Vec<Record>, AppError> {
    let raw: Vec<Map<String, Value>> = serde_json::from_str(body)
        .map_err(|e| AppError::data(format!("Invalid data document: {e}")))?;

    let mut records = Vec::with_capacity(raw.len());
    for (i, obj) in raw.into_iter().enumerate() {
        let date = obj
            .get("date")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::data(format!("Record {i} has no date field.")))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| AppError::data(format!("Record {i} has invalid date '{date}': {e}")))?;

        let fields = obj
            .iter()
            .filter(|(name, _)| name.as_str() != "date")
            .map(|(name, value)| (name.clone(), metric_value(value)))
            .collect();

        records.push(Record::new(date, fields));
    }
    Ok(records)
}

/// Coerce a metric cell to an observation.
///
/// `null` means "no observation". Numeric strings are accepted because some
/// FRED exports quote values, and `"."` is FRED's missing marker.
fn metric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "." {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}
