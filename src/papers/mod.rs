use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const SYLLABUS_CODE: &str = "9618";
pub const YEARS: [u16; 5] = [2021, 2022, 2023, 2024, 2025];
pub const PAPERS: [u8; 4] = [1, 2, 3, 4];

#[derive(Error, Debug, PartialEq)]
pub enum SearchError {
    #[error("Unsupported year: {0}")]
    InvalidYear(String),

    #[error("Unknown month session: {0}")]
    InvalidMonth(String),

    #[error("Paper must be between 1 and 4, got {0}")]
    InvalidPaper(String),

    #[error("Variant must be letters and digits, got '{0}'")]
    InvalidVariant(String),
}

/// Exam session a paper was sat in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthSession {
    June,
    November,
    March,
}

impl MonthSession {
    pub const ALL: [MonthSession; 3] = [MonthSession::June, MonthSession::November, MonthSession::March];

    /// Letter used in Cambridge filenames.
    pub fn code(self) -> char {
        match self {
            MonthSession::June => 's',
            MonthSession::November => 'w',
            MonthSession::March => 'm',
        }
    }

    /// Label shown in the month selector.
    pub fn label(self) -> &'static str {
        match self {
            MonthSession::June => "June (s)",
            MonthSession::November => "Nov (w)",
            MonthSession::March => "March (m)",
        }
    }
}

impl fmt::Display for MonthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MonthSession {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "june (s)" | "june" | "s" => Ok(MonthSession::June),
            "nov (w)" | "nov" | "november" | "w" => Ok(MonthSession::November),
            "march (m)" | "march" | "m" => Ok(MonthSession::March),
            other => Err(SearchError::InvalidMonth(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub topic: String,
    pub keywords: String,
    pub year: u16,
    pub month: MonthSession,
    pub paper: u8,
    pub variant: String,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            topic: "Data Representation".to_string(),
            keywords: "Binary".to_string(),
            year: YEARS[0],
            month: MonthSession::June,
            paper: PAPERS[0],
            variant: "1".to_string(),
        }
    }
}

impl SearchParameters {
    /// Checks the selector values against the fixed sets the form offers.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !YEARS.contains(&self.year) {
            return Err(SearchError::InvalidYear(self.year.to_string()));
        }
        if !PAPERS.contains(&self.paper) {
            return Err(SearchError::InvalidPaper(self.paper.to_string()));
        }
        if self.variant.is_empty() || !self.variant.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SearchError::InvalidVariant(self.variant.clone()));
        }
        Ok(())
    }

    /// Canonical question paper filename, e.g. `9618_s23_qp_21.pdf`.
    pub fn filename(&self) -> String {
        format!(
            "{}_{}{:02}_qp_{}{}.pdf",
            SYLLABUS_CODE,
            self.month.code(),
            self.year % 100,
            self.paper,
            self.variant
        )
    }
}

/// Maps search parameters onto the papers directory. Performs no I/O.
#[derive(Debug, Clone)]
pub struct PaperLocator {
    base_dir: PathBuf,
}

impl PaperLocator {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve(&self, params: &SearchParameters) -> PathBuf {
        self.base_dir.join(params.filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(year: u16, month: MonthSession, paper: u8, variant: &str) -> SearchParameters {
        SearchParameters {
            year,
            month,
            paper,
            variant: variant.to_string(),
            ..SearchParameters::default()
        }
    }

    #[test]
    fn test_june_filename() {
        let p = params(2023, MonthSession::June, 2, "1");
        assert_eq!(p.filename(), "9618_s23_qp_21.pdf");
    }

    #[test]
    fn test_month_letters() {
        assert_eq!(params(2021, MonthSession::November, 4, "3").filename(), "9618_w21_qp_43.pdf");
        assert_eq!(params(2025, MonthSession::March, 1, "2").filename(), "9618_m25_qp_12.pdf");
    }

    #[test]
    fn test_filename_is_deterministic() {
        let p = params(2024, MonthSession::November, 3, "2");
        assert_eq!(p.filename(), p.clone().filename());
    }

    #[test]
    fn test_month_parsing_accepts_labels() {
        assert_eq!("June (s)".parse::<MonthSession>(), Ok(MonthSession::June));
        assert_eq!("Nov (w)".parse::<MonthSession>(), Ok(MonthSession::November));
        assert_eq!("march".parse::<MonthSession>(), Ok(MonthSession::March));
        assert_eq!("w".parse::<MonthSession>(), Ok(MonthSession::November));
        assert!(matches!(
            "July".parse::<MonthSession>(),
            Err(SearchError::InvalidMonth(_))
        ));
    }

    #[test]
    fn test_resolve_joins_base_dir() {
        let locator = PaperLocator::new("past_papers");
        let path = locator.resolve(&params(2022, MonthSession::June, 1, "1"));
        assert_eq!(path, Path::new("past_papers").join("9618_s22_qp_11.pdf"));
    }

    #[test]
    fn test_validate_rejects_out_of_set_values() {
        assert_eq!(
            params(2019, MonthSession::June, 1, "1").validate(),
            Err(SearchError::InvalidYear("2019".to_string()))
        );
        assert_eq!(
            params(2023, MonthSession::June, 5, "1").validate(),
            Err(SearchError::InvalidPaper("5".to_string()))
        );
        assert!(matches!(
            params(2023, MonthSession::June, 1, "../1").validate(),
            Err(SearchError::InvalidVariant(_))
        ));
        assert!(matches!(
            params(2023, MonthSession::June, 2, "").validate(),
            Err(SearchError::InvalidVariant(_))
        ));
        assert!(params(2023, MonthSession::June, 1, "1").validate().is_ok());
    }
}
