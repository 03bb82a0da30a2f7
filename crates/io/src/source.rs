//! Light-curve sources and query filters.

use std::fmt;
use std::str::FromStr;

use astra_lightcurve::LightCurveSet;

use crate::error::IoError;

/// Observing cadence of a light-curve product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cadence {
    /// About 30-minute sampling.
    Long,
    /// About 1-minute sampling.
    Short,
}

impl Cadence {
    /// Lower-case name used in archive file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }

    /// Nominal sample spacing in days (29.4 and 0.98 minutes).
    pub fn sampling_days(self) -> f64 {
        match self {
            Self::Long => 0.020_433_6,
            Self::Short => 0.000_681_1,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            other => Err(IoError::Validation {
                count: 1,
                details: format!("unknown cadence '{other}', expected 'long' or 'short'"),
            }),
        }
    }
}

/// Restricts which products a fetch returns. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchFilters {
    /// Required cadence.
    pub cadence: Option<Cadence>,
    /// Required pipeline author (case-insensitive).
    pub author: Option<String>,
    /// Allowed observing quarters.
    pub quarters: Option<Vec<u32>>,
}

impl SearchFilters {
    /// Matches every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one cadence.
    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = Some(cadence);
        self
    }

    /// Restricts to one author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Restricts to the given quarters.
    pub fn with_quarters(mut self, quarters: Vec<u32>) -> Self {
        self.quarters = Some(quarters);
        self
    }

    /// Returns `true` if a product with these attributes passes the filters.
    pub fn matches(&self, author: &str, cadence: Cadence, quarter: u32) -> bool {
        self.cadence.is_none_or(|c| c == cadence)
            && self
                .author
                .as_deref()
                .is_none_or(|a| a.eq_ignore_ascii_case(author))
            && self.quarters.as_ref().is_none_or(|q| q.contains(&quarter))
    }
}

impl fmt::Display for SearchFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cadence = self.cadence.map_or("any", Cadence::as_str);
        let author = self.author.as_deref().unwrap_or("any");
        write!(f, "cadence {cadence}, author {author}, quarters ")?;
        match &self.quarters {
            Some(q) => write!(f, "{q:?}"),
            None => f.write_str("any"),
        }
    }
}

/// Anything that can produce the light curves of a named target.
pub trait LightCurveSource {
    /// Fetches every product of `target` that passes `filters`, one curve
    /// per product, ordered by quarter.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::TargetNotFound`] when nothing matches, or the
    /// source's own read errors.
    fn fetch(&self, target: &str, filters: &SearchFilters) -> Result<LightCurveSet, IoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_parse_and_display() {
        assert_eq!("long".parse::<Cadence>().unwrap(), Cadence::Long);
        assert_eq!("Short".parse::<Cadence>().unwrap(), Cadence::Short);
        assert!("fast".parse::<Cadence>().is_err());
        assert_eq!(Cadence::Long.to_string(), "long");
        assert!(Cadence::Short.sampling_days() < Cadence::Long.sampling_days());
    }

    #[test]
    fn empty_filters_match_everything() {
        let f = SearchFilters::new();
        assert!(f.matches("Kepler", Cadence::Short, 7));
    }

    #[test]
    fn filters_combine() {
        let f = SearchFilters::new()
            .with_cadence(Cadence::Long)
            .with_author("kepler")
            .with_quarters(vec![1, 2]);
        assert!(f.matches("Kepler", Cadence::Long, 2));
        assert!(!f.matches("Kepler", Cadence::Short, 2));
        assert!(!f.matches("K2", Cadence::Long, 2));
        assert!(!f.matches("Kepler", Cadence::Long, 3));
    }

    #[test]
    fn filters_display() {
        let f = SearchFilters::new().with_cadence(Cadence::Long).with_quarters(vec![3]);
        assert_eq!(f.to_string(), "cadence long, author any, quarters [3]");
    }
}
