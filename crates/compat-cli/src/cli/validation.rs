use std::fmt;
use std::str::FromStr;

use compat_matrix::{MatrixError, TargetEnv};

/// A single target environment, or every concrete one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSelection {
    All,
    One(TargetEnv),
}

impl TargetSelection {
    /// Environments to run, in tag order. `All` skips `DEFAULT`.
    pub fn targets(self) -> Vec<TargetEnv> {
        match self {
            Self::All => TargetEnv::concrete().collect(),
            Self::One(env) => vec![env],
        }
    }
}

impl FromStr for TargetSelection {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.trim().parse().map(Self::One)
        }
    }
}

impl fmt::Display for TargetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::One(env) => write!(f, "{env}"),
        }
    }
}

/// clap value parser for `--target`.
pub fn parse_target(s: &str) -> Result<TargetSelection, String> {
    s.parse().map_err(|e: MatrixError| e.to_string())
}
