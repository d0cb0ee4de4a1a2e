//! Target environment identifiers.
//!
//! A run is always bound to exactly one [`TargetEnv`]. `DEFAULT` doubles as the
//! fallback key inside expectation tables, the remaining tags name a browser
//! family or version whose recorded behavior may differ from the default.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// Closed set of environment tags an expectation can be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TargetEnv {
    #[serde(rename = "DEFAULT")]
    Default,
    #[serde(rename = "CHROME")]
    Chrome,
    #[serde(rename = "EDGE")]
    Edge,
    #[serde(rename = "FF", alias = "FIREFOX")]
    Firefox,
    #[serde(rename = "FF_ESR", alias = "FIREFOX_ESR")]
    FirefoxEsr,
    #[serde(rename = "IE")]
    InternetExplorer,
}

impl TargetEnv {
    /// Every tag, `DEFAULT` first.
    pub const ALL: [TargetEnv; 6] = [
        TargetEnv::Default,
        TargetEnv::Chrome,
        TargetEnv::Edge,
        TargetEnv::Firefox,
        TargetEnv::FirefoxEsr,
        TargetEnv::InternetExplorer,
    ];

    /// Tags that name an actual browser variant (everything but `DEFAULT`).
    pub fn concrete() -> impl Iterator<Item = TargetEnv> {
        Self::ALL.into_iter().filter(|env| !env.is_default())
    }

    #[must_use]
    pub fn is_default(self) -> bool {
        self == TargetEnv::Default
    }

    /// The tag as written in suite files and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TargetEnv::Default => "DEFAULT",
            TargetEnv::Chrome => "CHROME",
            TargetEnv::Edge => "EDGE",
            TargetEnv::Firefox => "FF",
            TargetEnv::FirefoxEsr => "FF_ESR",
            TargetEnv::InternetExplorer => "IE",
        }
    }
}

impl fmt::Display for TargetEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetEnv {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "DEFAULT" => Ok(TargetEnv::Default),
            "CHROME" => Ok(TargetEnv::Chrome),
            "EDGE" => Ok(TargetEnv::Edge),
            "FF" | "FIREFOX" => Ok(TargetEnv::Firefox),
            "FF_ESR" | "FIREFOX_ESR" => Ok(TargetEnv::FirefoxEsr),
            "IE" => Ok(TargetEnv::InternetExplorer),
            _ => Err(MatrixError::UnknownEnvironment(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_case_insensitively() {
        assert_eq!("ie".parse::<TargetEnv>().unwrap(), TargetEnv::InternetExplorer);
        assert_eq!("ff-esr".parse::<TargetEnv>().unwrap(), TargetEnv::FirefoxEsr);
        assert_eq!("Firefox".parse::<TargetEnv>().unwrap(), TargetEnv::Firefox);
        assert_eq!(" CHROME ".parse::<TargetEnv>().unwrap(), TargetEnv::Chrome);
    }

    #[test]
    fn rejects_unknown_tags() {
        let err = "SAFARI".parse::<TargetEnv>().unwrap_err();
        assert!(matches!(err, MatrixError::UnknownEnvironment(tag) if tag == "SAFARI"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for env in TargetEnv::ALL {
            assert_eq!(env.to_string().parse::<TargetEnv>().unwrap(), env);
        }
    }

    #[test]
    fn concrete_excludes_default() {
        let concrete: Vec<_> = TargetEnv::concrete().collect();
        assert_eq!(concrete.len(), 5);
        assert!(!concrete.contains(&TargetEnv::Default));
    }

    #[test]
    fn serde_uses_suite_tags() {
        let json = serde_json::to_string(&TargetEnv::FirefoxEsr).unwrap();
        assert_eq!(json, "\"FF_ESR\"");
        let parsed: TargetEnv = serde_json::from_str("\"FIREFOX\"").unwrap();
        assert_eq!(parsed, TargetEnv::Firefox);
    }
}
