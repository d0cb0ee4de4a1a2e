//! The test case catalog: every probe loaded from the configured suites.
//!
//! Loading is all-or-nothing. Any authoring error aborts, since a partially
//! loaded matrix would silently skip cases.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::env::TargetEnv;
use crate::error::{MatrixError, Result};
use crate::probe::{ProbeCase, ProbeKind};
use crate::suite::{SuiteFile, SuiteFormat};

/// Ordered, id-keyed collection of probe cases.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cases: IndexMap<String, ProbeCase>,
    origins: IndexMap<String, String>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every suite reachable from `paths`. Directories contribute their
    /// `.toml` and `.json` files, sorted by file name; nested directories are
    /// not descended into.
    ///
    /// # Errors
    ///
    /// Returns the first authoring error encountered.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut catalog = Self::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                for file in suite_files_in(path)? {
                    catalog.load_file(&file)?;
                }
            } else if path.is_file() {
                catalog.load_file(path)?;
            } else {
                return Err(MatrixError::SuiteNotFound(path.to_path_buf()));
            }
        }
        Ok(catalog)
    }

    /// Loads a single suite file into the catalog.
    ///
    /// # Errors
    ///
    /// Fails on unreadable or malformed files and on duplicate probe ids.
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let format = SuiteFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        self.load_str(&content, format, path)
    }

    /// Loads suite content that did not come from disk; `origin` labels it in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::load_file`].
    pub fn load_str(&mut self, content: &str, format: SuiteFormat, origin: &Path) -> Result<usize> {
        let cases = SuiteFile::parse(content, format, origin)?.into_cases()?;
        let count = cases.len();
        let label = origin.display().to_string();
        for case in cases {
            self.insert(case, &label)?;
        }
        debug!("Loaded {} probes from {}", count, label);
        Ok(count)
    }

    /// Adds one case.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateProbe` if a case with the same id already exists.
    pub fn insert(&mut self, case: ProbeCase, origin: &str) -> Result<()> {
        let id = case.id();
        if let Some(first) = self.origins.get(&id) {
            return Err(MatrixError::DuplicateProbe {
                id,
                first: first.clone(),
                second: origin.to_string(),
            });
        }
        self.origins.insert(id.clone(), origin.to_string());
        self.cases.insert(id, case);
        Ok(())
    }

    /// Keeps only the cases whose id matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFilter` if `pattern` is not a valid regular expression.
    pub fn filtered(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| MatrixError::InvalidFilter {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        self.cases.retain(|id, _| regex.is_match(id));
        let cases = &self.cases;
        self.origins.retain(|id, _| cases.contains_key(id));
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ProbeCase> {
        self.cases.get(id)
    }

    /// Looks up the expected sequence for `(id, env)`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProbe` if no case has that id.
    pub fn expected(&self, id: &str, env: TargetEnv) -> Result<&[String]> {
        self.get(id)
            .map(|case| case.expected(env))
            .ok_or_else(|| MatrixError::UnknownProbe(id.to_string()))
    }

    /// Suite file a case was loaded from.
    #[must_use]
    pub fn origin(&self, id: &str) -> Option<&str> {
        self.origins.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProbeCase> {
        self.cases.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    #[must_use]
    pub fn count_by_kind(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for case in self.cases.values() {
            *counts.entry(case.kind().as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of cases with an explicit entry for `env`.
    #[must_use]
    pub fn override_count(&self, env: TargetEnv) -> usize {
        self.cases
            .values()
            .filter(|case| case.expectations().is_overridden(env))
            .count()
    }

    #[must_use]
    pub fn count_of(&self, kind: ProbeKind) -> usize {
        self.cases.values().filter(|case| case.kind() == kind).count()
    }
}

impl IntoIterator for Catalog {
    type Item = ProbeCase;
    type IntoIter = indexmap::map::IntoValues<String, ProbeCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.into_values()
    }
}

fn suite_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && SuiteFormat::from_path(&path).is_ok() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
