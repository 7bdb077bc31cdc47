//! `group:artifact[:version]` dependency coordinates

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static COORDINATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<group>[A-Za-z0-9_.\-]+):(?P<artifact>[A-Za-z0-9_.\-]+)(?::(?P<version>[^:\s]+))?$")
        .expect("coordinate pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: Option<String>,
}

impl Coordinate {
    pub fn parse(input: &str) -> Result<Self> {
        let caps = COORDINATE_RE
            .captures(input.trim())
            .ok_or_else(|| Error::InvalidCoordinate(input.to_string()))?;

        Ok(Self {
            group: caps["group"].to_string(),
            artifact: caps["artifact"].to_string(),
            version: caps.name("version").map(|v| v.as_str().to_string()),
        })
    }

    /// Identity within a bucket, ignoring the version
    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    /// Prefix match on segment boundaries, so `g:a` does not match `g:ab`
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let rendered = self.to_string();
        match rendered.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with(':'),
            None => false,
        }
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Coordinate::parse(s)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.artifact, version),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
