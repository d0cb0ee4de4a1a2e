//! Probe cases: what is submitted to the engine and what it should emit.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::env::TargetEnv;
use crate::error::{MatrixError, Result};
use crate::expectation::Expectations;

/// CSS property read by style probes when none is given.
pub const DEFAULT_STYLE_PROPERTY: &str = "display";

static GLOBAL_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$").expect("valid regex")
});

/// Words that cannot start an expression path in a classic script.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with",
];

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*(-[A-Za-z0-9]+)*$").expect("valid regex"));

static CSS_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("valid regex"));

/// How a probe name is materialized inside the synthesized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// Evaluate a global name or dotted path, e.g. `HTMLDivElement` or
    /// `Intl.Collator`.
    #[default]
    Global,
    /// Create an element by tag name and log its string form.
    Element,
    /// Create an element and log a computed style property before and after
    /// attaching it to the document.
    Style,
}

impl ProbeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProbeKind::Global => "global",
            ProbeKind::Element => "element",
            ProbeKind::Style => "style",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the catalog.
///
/// Names are validated on construction, so a `ProbeCase` can be embedded in a
/// page without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCase {
    name: String,
    kind: ProbeKind,
    property: Option<String>,
    expectations: Expectations,
}

impl ProbeCase {
    /// Creates a probe case after validating its name for the given kind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProbeName` if the name cannot be probed as `kind`.
    pub fn new(
        name: impl Into<String>,
        kind: ProbeKind,
        expectations: Expectations,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name, kind)?;
        Ok(Self {
            name,
            kind,
            property: None,
            expectations,
        })
    }

    pub fn global(name: impl Into<String>, expectations: Expectations) -> Result<Self> {
        Self::new(name, ProbeKind::Global, expectations)
    }

    pub fn element(name: impl Into<String>, expectations: Expectations) -> Result<Self> {
        Self::new(name, ProbeKind::Element, expectations)
    }

    pub fn style(name: impl Into<String>, expectations: Expectations) -> Result<Self> {
        Self::new(name, ProbeKind::Style, expectations)
    }

    /// Sets the CSS property a style probe reads.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProperty` for malformed property names, and
    /// `InvalidProbeName` when the probe is not a style probe.
    pub fn with_property(mut self, property: impl Into<String>) -> Result<Self> {
        let property = property.into();
        if self.kind != ProbeKind::Style {
            return Err(MatrixError::InvalidProbeName {
                kind: self.kind.to_string(),
                name: self.name,
                hint: "only style probes take a property".to_string(),
            });
        }
        if !CSS_PROPERTY.is_match(&property) {
            return Err(MatrixError::InvalidProperty(property));
        }
        self.property = (property != DEFAULT_STYLE_PROPERTY).then_some(property);
        Ok(self)
    }

    /// Stable identifier: `<kind>:<name>`, with `:<property>` appended for
    /// style probes that read something other than `display`.
    #[must_use]
    pub fn id(&self) -> String {
        match &self.property {
            Some(property) => format!("{}:{}:{}", self.kind, self.name, property),
            None => format!("{}:{}", self.kind, self.name),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    /// CSS property for style probes; `None` for other kinds.
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        match self.kind {
            ProbeKind::Style => Some(self.property.as_deref().unwrap_or(DEFAULT_STYLE_PROPERTY)),
            _ => None,
        }
    }

    #[must_use]
    pub fn expectations(&self) -> &Expectations {
        &self.expectations
    }

    /// Shorthand for `self.expectations().resolve(env)`.
    #[must_use]
    pub fn expected(&self, env: TargetEnv) -> &[String] {
        self.expectations.resolve(env)
    }
}

fn validate_name(name: &str, kind: ProbeKind) -> Result<()> {
    let (valid, hint) = match kind {
        ProbeKind::Global if starts_with_reserved_word(name) => (
            false,
            "a reserved word cannot be evaluated as a global",
        ),
        ProbeKind::Global => (
            GLOBAL_PATH.is_match(name),
            "expected an identifier or dotted path such as Intl.Collator",
        ),
        ProbeKind::Element | ProbeKind::Style => (
            TAG_NAME.is_match(name),
            "expected a tag name of letters, digits and inner hyphens",
        ),
    };

    if valid {
        Ok(())
    } else {
        Err(MatrixError::InvalidProbeName {
            kind: kind.to_string(),
            name: name.to_string(),
            hint: hint.to_string(),
        })
    }
}

// Later segments are property names, where reserved words are allowed.
fn starts_with_reserved_word(path: &str) -> bool {
    let head = path.split('.').next().unwrap_or_default();
    RESERVED_WORDS.contains(&head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div_expectations() -> Expectations {
        Expectations::new(["[object HTMLDivElement]"])
    }

    #[test]
    fn accepts_dotted_global_paths() {
        for name in ["HTMLDivElement", "Intl.Collator", "$", "_private.inner.x1"] {
            assert!(ProbeCase::global(name, div_expectations()).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_script_injection_in_globals() {
        for name in ["", "a;b", "alert(1)", "a..b", ".a", "1abc", "a b"] {
            let err = ProbeCase::global(name, div_expectations()).unwrap_err();
            assert!(matches!(err, MatrixError::InvalidProbeName { .. }), "{name}");
        }
    }

    #[test]
    fn rejects_reserved_words_as_globals() {
        for name in ["class", "new", "typeof", "import", "if", "enum", "this.x"] {
            let err = ProbeCase::global(name, div_expectations()).unwrap_err();
            let reserved = matches!(
                &err,
                MatrixError::InvalidProbeName { hint, .. } if hint.contains("reserved")
            );
            assert!(reserved, "{name}: {err}");
        }

        assert!(ProbeCase::global("document.default", div_expectations()).is_ok());
        assert!(ProbeCase::global("classList", div_expectations()).is_ok());
        assert!(ProbeCase::element("template", div_expectations()).is_ok());
    }

    #[test]
    fn validates_tag_names() {
        assert!(ProbeCase::element("div", div_expectations()).is_ok());
        assert!(ProbeCase::element("h1", div_expectations()).is_ok());
        assert!(ProbeCase::element("my-widget", div_expectations()).is_ok());
        assert!(ProbeCase::element("div'", div_expectations()).is_err());
        assert!(ProbeCase::style("-div", div_expectations()).is_err());
    }

    #[test]
    fn ids_include_kind_and_non_default_property() {
        let element = ProbeCase::element("div", div_expectations()).unwrap();
        assert_eq!(element.id(), "element:div");
        assert_eq!(element.property(), None);

        let display = ProbeCase::style("div", Expectations::new(["", "block"]))
            .unwrap()
            .with_property("display")
            .unwrap();
        assert_eq!(display.id(), "style:div");
        assert_eq!(display.property(), Some("display"));

        let visibility = ProbeCase::style("div", Expectations::new(["", "visible"]))
            .unwrap()
            .with_property("visibility")
            .unwrap();
        assert_eq!(visibility.id(), "style:div:visibility");
    }

    #[test]
    fn property_only_applies_to_style_probes() {
        let err = ProbeCase::element("div", div_expectations())
            .unwrap()
            .with_property("display")
            .unwrap_err();
        assert!(matches!(err, MatrixError::InvalidProbeName { .. }));

        let err = ProbeCase::style("div", div_expectations())
            .unwrap()
            .with_property("display: none")
            .unwrap_err();
        assert!(matches!(err, MatrixError::InvalidProperty(_)));
    }
}
