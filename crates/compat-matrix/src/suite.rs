//! On-disk suite format.
//!
//! A suite is a TOML or JSON document with an optional `suite` header and a
//! list of `probe` entries:
//!
//! ```toml
//! [suite]
//! name = "element-to-string"
//! kind = "element"
//!
//! [[probe]]
//! name = "div"
//! expect.DEFAULT = ["[object HTMLDivElement]"]
//!
//! [[probe]]
//! name = "bgsound"
//! expect.DEFAULT = "[object HTMLUnknownElement]"
//! expect.IE = "[object HTMLBGSoundElement]"
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::env::TargetEnv;
use crate::error::{MatrixError, Result};
use crate::expectation::Expectations;
use crate::probe::{ProbeCase, ProbeKind};

/// Serialization format of a suite file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    Toml,
    Json,
}

impl SuiteFormat {
    /// Detects the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for anything but `.toml` and `.json`.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(SuiteFormat::Toml),
            Some("json") => Ok(SuiteFormat::Json),
            _ => Err(MatrixError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteFile {
    #[serde(default)]
    pub suite: SuiteHeader,

    #[serde(default, rename = "probe", alias = "probes")]
    pub probes: Vec<ProbeEntry>,
}

/// Defaults applied to every probe of a suite.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteHeader {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<ProbeKind>,
    pub property: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeEntry {
    pub name: String,
    pub kind: Option<ProbeKind>,
    pub property: Option<String>,
    #[serde(default)]
    pub expect: IndexMap<String, ExpectedValues>,
}

/// A single string is shorthand for a one-element sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpectedValues {
    One(String),
    Many(Vec<String>),
}

impl From<ExpectedValues> for Vec<String> {
    fn from(values: ExpectedValues) -> Self {
        match values {
            ExpectedValues::One(value) => vec![value],
            ExpectedValues::Many(values) => values,
        }
    }
}

impl SuiteFile {
    /// Parses suite content in the given format. `origin` only feeds error
    /// messages.
    ///
    /// # Errors
    ///
    /// Returns `SuiteParse` if the document is malformed or uses unknown keys.
    pub fn parse(content: &str, format: SuiteFormat, origin: &Path) -> Result<Self> {
        let parsed = match format {
            SuiteFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            SuiteFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| MatrixError::SuiteParse {
            path: origin.to_path_buf(),
            message,
        })
    }

    /// Validates every entry and turns it into a [`ProbeCase`], applying the
    /// header defaults.
    ///
    /// # Errors
    ///
    /// Fails on the first entry with an unknown or repeated environment tag,
    /// an invalid name, an invalid property or no `DEFAULT` expectation.
    pub fn into_cases(self) -> Result<Vec<ProbeCase>> {
        let header = self.suite;

        self.probes
            .into_iter()
            .map(|entry| {
                let kind = entry.kind.or(header.kind).unwrap_or_default();
                let label = format!("{kind}:{}", entry.name);
                let mut map = IndexMap::with_capacity(entry.expect.len());
                for (tag, values) in entry.expect {
                    let env = tag.parse::<TargetEnv>()?;
                    if map.insert(env, values.into()).is_some() {
                        return Err(MatrixError::DuplicateEnvironment {
                            probe: label,
                            tag,
                        });
                    }
                }
                let expectations = Expectations::from_map(&label, map)?;
                let case = ProbeCase::new(entry.name, kind, expectations)?;

                match (kind, entry.property.or_else(|| header.property.clone())) {
                    (ProbeKind::Style, Some(property)) => case.with_property(property),
                    _ => Ok(case),
                }
            })
            .collect()
    }
}
