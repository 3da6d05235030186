//! Go-flavoured semantic versions: `v` prefix, optional `v1` / `v1.2` shorthand.

use crate::snapshot::ChangeLevel;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Version suggested when the module has never been tagged.
pub const INITIAL_VERSION: &str = "v0.1.0";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version `{version}`: {reason}")]
pub struct VersionError {
    pub version: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Dot-separated prerelease identifiers; empty for a release.
    pub prerelease: Vec<String>,
    pub build: Option<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            build: None,
        }
    }

    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let invalid = |reason| VersionError {
            version: text.to_string(),
            reason,
        };

        let rest = text.strip_prefix('v').ok_or_else(|| invalid("missing `v` prefix"))?;
        let (rest, build) = match rest.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (rest, None),
        };
        let (core, prerelease) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(invalid("too many components"));
        }
        if parts.len() < 3 && (prerelease.is_some() || build.is_some()) {
            return Err(invalid("shorthand versions take no suffix"));
        }
        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if !is_numeric(part) {
                return Err(invalid("components must be numbers without leading zeros"));
            }
            *slot = part.parse().map_err(|_| invalid("component out of range"))?;
        }

        let prerelease = match prerelease {
            Some(pre) => {
                let idents: Vec<String> = pre.split('.').map(str::to_string).collect();
                let valid = idents.iter().all(|id| {
                    is_identifier(id) && (!id.bytes().all(|b| b.is_ascii_digit()) || is_numeric(id))
                });
                if !valid {
                    return Err(invalid("malformed prerelease"));
                }
                idents
            }
            None => Vec::new(),
        };

        if let Some(build) = build {
            if !build.split('.').all(is_identifier) {
                return Err(invalid("malformed build metadata"));
            }
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            prerelease,
            build: build.map(str::to_string),
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// The next version for a change of the given level.
    ///
    /// Below v1 a breaking change only bumps the minor number and a feature
    /// only the patch. Prerelease and build suffixes are dropped.
    pub fn bump(&self, level: ChangeLevel) -> Result<Self, VersionError> {
        let next = |component: u64| {
            component.checked_add(1).ok_or_else(|| VersionError {
                version: self.to_string(),
                reason: "version component overflows",
            })
        };
        Ok(match (level, self.major) {
            (ChangeLevel::Breaking, 0) => Self::new(0, next(self.minor)?, 0),
            (ChangeLevel::Breaking, major) => Self::new(next(major)?, 0, 0),
            (ChangeLevel::Feature, 0) => Self::new(0, self.minor, next(self.patch)?),
            (ChangeLevel::Feature, major) => Self::new(major, next(self.minor)?, 0),
            (ChangeLevel::None, major) => Self::new(major, self.minor, next(self.patch)?),
        })
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.is_prerelease() {
            write!(f, "-{}", self.prerelease.join("."))?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| compare_prerelease(&self.prerelease, &other.prerelease))
            // Build metadata carries no precedence; it only keeps the order total.
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_prerelease(a: &[String], b: &[String]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    for (x, y) in a.iter().zip(b) {
        let ord = match (is_numeric(x), is_numeric(y)) {
            (true, true) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

/// Digits only, no leading zero unless the number is zero.
fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

pub fn is_valid(text: &str) -> bool {
    Version::parse(text).is_ok()
}

/// Keep the strings that are valid versions, ordered oldest first.
pub fn sort_versions<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut versions: Vec<(Version, String)> = tags
        .into_iter()
        .map(Into::into)
        .filter_map(|tag| Version::parse(&tag).ok().map(|v| (v, tag)))
        .collect();
    versions.sort();
    versions.into_iter().map(|(_, tag)| tag).collect()
}

/// Suggest the version to tag after `latest`, given how much changed since.
pub fn suggest_version(latest: Option<&str>, level: ChangeLevel) -> Result<String, VersionError> {
    match latest {
        None => Ok(INITIAL_VERSION.to_string()),
        Some(latest) => Ok(Version::parse(latest)?.bump(level)?.to_string()),
    }
}
