//! Court complexes of the Delhi District Courts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScraperError;

/// One of the seven court complexes that publish cause lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourtComplex {
    PatialaHouse,
    TisHazari,
    Karkardooma,
    Rohini,
    Dwarka,
    Saket,
    RouseAvenue,
}

impl CourtComplex {
    /// Every complex, in the order the form lists them.
    pub const fn all() -> [CourtComplex; 7] {
        [
            CourtComplex::PatialaHouse,
            CourtComplex::TisHazari,
            CourtComplex::Karkardooma,
            CourtComplex::Rohini,
            CourtComplex::Dwarka,
            CourtComplex::Saket,
            CourtComplex::RouseAvenue,
        ]
    }

    /// Name as shown on the court website.
    pub const fn display_name(self) -> &'static str {
        match self {
            CourtComplex::PatialaHouse => "Patiala House Court Complex",
            CourtComplex::TisHazari => "Tis Hazari Court Complex",
            CourtComplex::Karkardooma => "Karkardooma Court Complex",
            CourtComplex::Rohini => "Rohini Court Complex",
            CourtComplex::Dwarka => "Dwarka Court Complex",
            CourtComplex::Saket => "Saket Court Complex",
            CourtComplex::RouseAvenue => "Rouse Avenue Court Complex",
        }
    }

    /// Display name with spaces replaced, for file names.
    pub fn file_stem(self) -> String {
        self.display_name().replace(' ', "_")
    }
}

impl fmt::Display for CourtComplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CourtComplex {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ScraperError::InvalidRequest(format!("Unknown court complex: '{}'", wanted))
            })
    }
}

impl Serialize for CourtComplex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for CourtComplex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
