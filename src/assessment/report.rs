//! Diagnostic report parsing.
//!
//! The diagnostic tool writes an XML document rooted at `<DxDiag>`. Only two
//! fields matter: `<DirectXVersion>` (the graphics interface version) and
//! the first `<DriverModel>` (the display driver model). Both are read with
//! anchored regexes rather than a full XML parse.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{FleetError, Result};

static ROOT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<DxDiag[\s>/]").expect("ROOT_REGEX must compile"));

static INTERFACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<DirectXVersion>(.*?)</DirectXVersion>")
        .expect("INTERFACE_REGEX must compile")
});

static DRIVER_MODEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<DriverModel>(.*?)</DriverModel>").expect("DRIVER_MODEL_REGEX must compile")
});

/// Dotted numeric version compared component by component.
///
/// Missing trailing components count as zero, so `1` equals `1.0`.
#[derive(Debug, Clone)]
pub struct NumericVersion {
    components: Vec<u64>,
}

impl NumericVersion {
    /// Parse `9`, `11.1`, `2.10`; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let components = raw
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    part.parse::<u64>().ok()
                }
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { components })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl Ord for NumericVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| {
                let a = self.components.get(i).copied().unwrap_or(0);
                let b = other.components.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for NumericVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NumericVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NumericVersion {}

impl fmt::Display for NumericVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl Serialize for NumericVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A version field as read from the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum VersionReading {
    Parsed(NumericVersion),
    /// The raw text did not convert to a number.
    Unparseable(String),
}

impl VersionReading {
    /// Read `raw`, ignoring a leading textual label such as `WDDM` or `DirectX`.
    pub fn read(raw: &str) -> Self {
        let trimmed = raw.trim();
        let numeric = trimmed.trim_start_matches(|c: char| c.is_ascii_alphabetic()).trim();
        match NumericVersion::parse(numeric) {
            Some(version) => VersionReading::Parsed(version),
            None => VersionReading::Unparseable(trimmed.to_string()),
        }
    }

    pub fn version(&self) -> Option<&NumericVersion> {
        match self {
            VersionReading::Parsed(version) => Some(version),
            VersionReading::Unparseable(_) => None,
        }
    }

    /// Whether the reading is at least `minimum`. Unparseable never is.
    pub fn meets(&self, minimum: &NumericVersion) -> bool {
        self.version().is_some_and(|version| version >= minimum)
    }
}

impl fmt::Display for VersionReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionReading::Parsed(version) => write!(f, "{}", version),
            VersionReading::Unparseable(raw) => write!(f, "{:?}", raw),
        }
    }
}

/// Fields extracted from one diagnostic run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticReport {
    pub interface_version: VersionReading,
    pub driver_model: VersionReading,
}

/// Parse raw diagnostic output.
///
/// # Errors
///
/// Returns `MalformedOutput` when the `<DxDiag>` root or either field is
/// missing. Non-numeric field values are not errors.
pub fn parse(raw: &str) -> Result<DiagnosticReport> {
    if !ROOT_REGEX.is_match(raw) {
        return Err(malformed("no <DxDiag> root element"));
    }

    let interface = field(&INTERFACE_REGEX, raw)
        .ok_or_else(|| malformed("missing <DirectXVersion>"))?;
    let driver_model =
        field(&DRIVER_MODEL_REGEX, raw).ok_or_else(|| malformed("missing <DriverModel>"))?;

    Ok(DiagnosticReport {
        interface_version: VersionReading::read(interface),
        driver_model: VersionReading::read(driver_model),
    })
}

fn field<'a>(regex: &Regex, raw: &'a str) -> Option<&'a str> {
    regex
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn malformed(reason: &str) -> FleetError {
    FleetError::MalformedOutput {
        reason: reason.to_string(),
    }
}
