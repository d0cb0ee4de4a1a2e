//! # compat-matrix
//!
//! Data model for browser compatibility matrices: probe cases, expectation
//! tables keyed by target environment, suite loading, and the outcome
//! comparator.
//!
//! A probe names something the engine under test should materialize (a
//! global, an element, a computed style). Each probe carries a `DEFAULT`
//! expected output sequence plus optional per-environment overrides:
//!
//! ```
//! use compat_matrix::{compare, Expectations, ProbeCase, TargetEnv};
//!
//! let case = ProbeCase::global(
//!     "Foo",
//!     Expectations::new(["X"]).with_override(TargetEnv::InternetExplorer, ["Y"]),
//! )
//! .unwrap();
//!
//! assert_eq!(case.expected(TargetEnv::InternetExplorer), ["Y"]);
//! assert_eq!(case.expected(TargetEnv::Chrome), ["X"]);
//! assert!(compare(&case, TargetEnv::Chrome, &["X".to_string()]).is_pass());
//! ```

pub mod catalog;
pub mod compare;
pub mod env;
pub mod error;
pub mod expectation;
pub mod probe;
pub mod suite;

pub use catalog::Catalog;
pub use compare::{compare, compare_sequences, first_difference, Comparison, Difference};
pub use env::TargetEnv;
pub use error::{MatrixError, Result};
pub use expectation::{Expectations, EXCEPTION_TOKEN};
pub use probe::{ProbeCase, ProbeKind, DEFAULT_STYLE_PROPERTY};
pub use suite::{SuiteFile, SuiteFormat};
