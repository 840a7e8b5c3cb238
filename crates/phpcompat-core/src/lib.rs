//! phpcompat-core: version-gated feature checks for PHP source
//!
//! This crate provides:
//! - `Version` / `VersionRange`: the target PHP versions of a scan
//! - `FeatureTable` / `FeatureIndex`: compiled-in facts about when features
//!   appeared, were deprecated or removed
//! - `evaluate()`: a table intersected with the range
//! - `MessageTemplate` / `Diagnostic`: findings handed back to the host
//! - `tokenize()` / `TokenStream`: a PHP token stream with scope metadata
//! - `dispatch`: primitives deciding whether a token is a real use of a feature

pub mod diagnostic;
pub mod dispatch;
pub mod evaluate;
pub mod feature;
pub mod lexer;
pub mod logging;
pub mod names;
pub mod range;
pub mod token;
pub mod validate;
pub mod version;

pub use diagnostic::{Diagnostic, MessageTemplate, Position, Severity};
pub use evaluate::{evaluate, Diagnosis};
pub use feature::{DataError, FeatureFact, FeatureIndex, FeatureTable, FeatureTableBuilder, Status};
pub use lexer::tokenize;
pub use names::NameList;
pub use range::{ConfigError, VersionRange};
pub use token::{Token, TokenKind, TokenStream};
pub use validate::Validator;
pub use version::{Version, VersionError};
