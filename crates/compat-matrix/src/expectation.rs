//! Per-environment expectation tables.
//!
//! An [`Expectations`] value always holds a `DEFAULT` sequence; construction
//! from an authored map fails with [`MatrixError::MissingExpectation`] when the
//! default is absent, so resolution itself can never fail.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::env::TargetEnv;
use crate::error::{MatrixError, Result};

/// Literal output recorded when a probe raises inside the engine.
pub const EXCEPTION_TOKEN: &str = "exception";

/// Expected output sequences for one probe, keyed by environment.
///
/// An empty sequence means "no output expected", which is distinct from a
/// sequence holding one empty string and from `["exception"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectations {
    default: Vec<String>,
    overrides: BTreeMap<TargetEnv, Vec<String>>,
}

impl Expectations {
    pub fn new<I, S>(default: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default: default.into_iter().map(Into::into).collect(),
            overrides: BTreeMap::new(),
        }
    }

    /// Adds an environment-specific override. Passing `DEFAULT` replaces the
    /// default sequence.
    #[must_use]
    pub fn with_override<I, S>(mut self, env: TargetEnv, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if env.is_default() {
            self.default = values;
        } else {
            self.overrides.insert(env, values);
        }
        self
    }

    /// Builds a table from an authored `env -> values` map.
    ///
    /// # Errors
    ///
    /// Returns `MissingExpectation` if the map has no `DEFAULT` entry.
    pub fn from_map(probe: &str, mut map: IndexMap<TargetEnv, Vec<String>>) -> Result<Self> {
        let default = map
            .shift_remove(&TargetEnv::Default)
            .ok_or_else(|| MatrixError::MissingExpectation {
                probe: probe.to_string(),
            })?;

        Ok(Self {
            default,
            overrides: map.into_iter().collect(),
        })
    }

    /// Returns the sequence expected under `env`: its own entry when present,
    /// the `DEFAULT` entry otherwise.
    #[must_use]
    pub fn resolve(&self, env: TargetEnv) -> &[String] {
        self.overrides.get(&env).unwrap_or(&self.default)
    }

    #[must_use]
    pub fn default_values(&self) -> &[String] {
        &self.default
    }

    #[must_use]
    pub fn override_for(&self, env: TargetEnv) -> Option<&[String]> {
        self.overrides.get(&env).map(Vec::as_slice)
    }

    /// True if `env` has its own entry rather than falling back.
    #[must_use]
    pub fn is_overridden(&self, env: TargetEnv) -> bool {
        self.overrides.contains_key(&env)
    }

    pub fn overrides(&self) -> impl Iterator<Item = (TargetEnv, &[String])> {
        self.overrides.iter().map(|(env, values)| (*env, values.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_default() {
        let expectations =
            Expectations::new(["X"]).with_override(TargetEnv::InternetExplorer, ["Y"]);

        assert_eq!(expectations.resolve(TargetEnv::InternetExplorer), ["Y"]);
        assert_eq!(expectations.resolve(TargetEnv::Chrome), ["X"]);
        assert_eq!(expectations.resolve(TargetEnv::Default), ["X"]);
    }

    #[test]
    fn from_map_requires_default() {
        let mut map = IndexMap::new();
        map.insert(TargetEnv::Chrome, vec!["[object HTMLDivElement]".to_string()]);

        let err = Expectations::from_map("element:div", map).unwrap_err();
        assert!(matches!(err, MatrixError::MissingExpectation { probe } if probe == "element:div"));
    }

    #[test]
    fn from_map_splits_default_and_overrides() {
        let mut map = IndexMap::new();
        map.insert(TargetEnv::Firefox, vec!["ff".to_string()]);
        map.insert(TargetEnv::Default, vec!["default".to_string()]);

        let expectations = Expectations::from_map("global:Foo", map).unwrap();
        assert_eq!(expectations.default_values(), ["default"]);
        assert_eq!(expectations.override_for(TargetEnv::Firefox), Some(&["ff".to_string()][..]));
        assert!(!expectations.is_overridden(TargetEnv::Default));
    }

    #[test]
    fn empty_sequence_and_empty_string_stay_distinct() {
        let none = Expectations::new(Vec::<String>::new());
        let empty_string = Expectations::new([""]);
        let exception = Expectations::new([EXCEPTION_TOKEN]);

        assert!(none.resolve(TargetEnv::Chrome).is_empty());
        assert_eq!(empty_string.resolve(TargetEnv::Chrome), [""]);
        assert_eq!(exception.resolve(TargetEnv::Chrome), ["exception"]);
        assert_ne!(none, empty_string);
        assert_ne!(empty_string, exception);
    }

    #[test]
    fn default_override_replaces_default() {
        let expectations = Expectations::new(["old"]).with_override(TargetEnv::Default, ["new"]);
        assert_eq!(expectations.default_values(), ["new"]);
        assert_eq!(expectations.overrides().count(), 0);
    }
}
