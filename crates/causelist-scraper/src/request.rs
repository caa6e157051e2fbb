//! Cause list requests and outcomes.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::complex::CourtComplex;
use crate::error::ScraperError;

/// A validated request for one complex's cause lists on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseListRequest {
    pub complex: CourtComplex,
    pub date: NaiveDate,
}

impl CauseListRequest {
    pub fn new(complex: CourtComplex, date: NaiveDate) -> Self {
        Self { complex, date }
    }

    /// Build a request from raw form input: an ISO `YYYY-MM-DD` date and a
    /// complex display name.
    pub fn parse(date: &str, complex_name: &str) -> Result<Self, ScraperError> {
        let date = date.trim();
        if date.is_empty() {
            return Err(ScraperError::InvalidRequest(
                "Please select a date.".to_string(),
            ));
        }

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            ScraperError::InvalidRequest(format!("Invalid date '{}', expected YYYY-MM-DD", date))
        })?;

        if complex_name.trim().is_empty() {
            return Err(ScraperError::InvalidRequest(
                "Please select a court complex.".to_string(),
            ));
        }
        let complex = complex_name.parse()?;

        Ok(Self { complex, date })
    }

    /// Date rendered the way the court site's date field expects it.
    pub fn site_date(&self, format: &str) -> Result<String, ScraperError> {
        use std::fmt::Write as _;

        let mut out = String::new();
        write!(out, "{}", self.date.format(format))
            .map_err(|_| ScraperError::DateFormat(format.to_string()))?;
        Ok(out)
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct CauseListOutcome {
    pub run_id: Uuid,
    pub complex: CourtComplex,
    pub date: NaiveDate,
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

impl CauseListOutcome {
    /// Human-readable summary shown to the user.
    pub fn summary(&self) -> String {
        format!(
            "Downloaded {} cause list PDF(s) for {} on {} into {}",
            self.files.len(),
            self.complex,
            self.date,
            self.directory.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let req = CauseListRequest::parse("2026-10-17", "Dwarka Court Complex").unwrap();
        assert_eq!(req.complex, CourtComplex::Dwarka);
        assert_eq!(req.date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    }

    #[test]
    fn test_parse_empty_date() {
        let err = CauseListRequest::parse("  ", "Dwarka Court Complex").unwrap_err();
        assert!(err.is_invalid_request());
        assert_eq!(err.to_string(), "Please select a date.");
    }

    #[test]
    fn test_parse_bad_date() {
        for bad in ["17-10-2026", "2026-13-01", "2026-02-30", "yesterday"] {
            let err = CauseListRequest::parse(bad, "Saket Court Complex").unwrap_err();
            assert!(err.is_invalid_request(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_unknown_complex() {
        assert!(CauseListRequest::parse("2026-10-17", "Supreme Court").is_err());
        let err = CauseListRequest::parse("2026-10-17", "").unwrap_err();
        assert_eq!(err.to_string(), "Please select a court complex.");
    }

    #[test]
    fn test_site_date() {
        let req = CauseListRequest::parse("2026-01-05", "Rohini Court Complex").unwrap();
        assert_eq!(req.site_date("%d-%m-%Y").unwrap(), "05-01-2026");
        assert_eq!(req.site_date("%d/%m/%Y").unwrap(), "05/01/2026");
    }

    #[test]
    fn test_site_date_bad_format() {
        let req = CauseListRequest::parse("2026-01-05", "Rohini Court Complex").unwrap();
        let err = req.site_date("%Q").unwrap_err();
        assert!(matches!(err, ScraperError::DateFormat(ref f) if f == "%Q"));
        assert!(!err.is_invalid_request());
    }

    #[test]
    fn test_outcome_summary() {
        let outcome = CauseListOutcome {
            run_id: Uuid::nil(),
            complex: CourtComplex::Saket,
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            directory: PathBuf::from("/tmp/Court PDFs"),
            files: vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
        };
        assert_eq!(
            outcome.summary(),
            "Downloaded 2 cause list PDF(s) for Saket Court Complex on 2026-10-17 into /tmp/Court PDFs"
        );
    }
}
