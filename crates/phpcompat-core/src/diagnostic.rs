//! Diagnostics and message templating

use crate::evaluate::Diagnosis;
use serde::Serialize;
use std::fmt;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - should be reviewed
    Warning,
    /// Error - code will not work on part of the target range
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Where in the token stream a diagnostic points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Token index
    pub token: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

/// A single finding handed back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub position: Position,
    pub severity: Severity,
    /// Fully formatted message
    pub message: String,
    /// Machine readable code, e.g. `array_columnFound`
    pub code: String,
    /// The values substituted into the message template
    pub data: Vec<String>,
}

impl Diagnostic {
    /// Build a diagnostic from a `%s` template and its data
    pub fn from_template(
        position: Position,
        severity: Severity,
        template: &str,
        data: Vec<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            position,
            severity,
            message: sprintf(template, &data),
            code: code.into(),
            data,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Substitute each `%s` in `template` with the next entry of `args`
pub fn sprintf(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut rest = template;

    while let Some(idx) = rest.find("%s") {
        out.push_str(&rest[..idx]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("%s"),
        }
        rest = &rest[idx + 2..];
    }
    out.push_str(rest);
    out
}

/// Turn an arbitrary feature name into an error-code fragment
///
/// Lower-cased, with every character outside `[a-z0-9_]` replaced by `_`.
pub fn string_to_error_code(name: &str) -> String {
    name.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// How a family of features is described in messages
///
/// `subject` contains one `%s` for the feature name, e.g. `"Function %s()"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTemplate {
    pub subject: &'static str,
}

impl MessageTemplate {
    pub const fn new(subject: &'static str) -> Self {
        Self { subject }
    }

    /// Render every part of a diagnosis as separate diagnostics
    ///
    /// An introduction problem and a withdrawal problem are independent facts,
    /// so a range reaching both yields two diagnostics.
    pub fn report(
        &self,
        position: Position,
        name: &str,
        alternative: Option<&str>,
        diagnosis: &Diagnosis,
    ) -> Vec<Diagnostic> {
        self.report_described(position, name, name, alternative, diagnosis)
    }

    /// Like [`report`](Self::report), but with a display text for the message
    /// that differs from the name the error code is derived from
    pub fn report_described(
        &self,
        position: Position,
        name: &str,
        display: &str,
        alternative: Option<&str>,
        diagnosis: &Diagnosis,
    ) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let code_base = string_to_error_code(name);

        if let Some(version) = diagnosis.not_in_version {
            let template = format!("{} is not present in PHP version %s or earlier", self.subject);
            out.push(Diagnostic::from_template(
                position,
                Severity::Error,
                &template,
                vec![display.to_string(), version.to_string()],
                format!("{}Found", code_base),
            ));
        } else if let Some((version, condition)) = diagnosis.conditional {
            let template = format!(
                "{} is present in PHP version %s but will be disregarded unless PHP is compiled with %s",
                self.subject
            );
            out.push(Diagnostic::from_template(
                position,
                Severity::Warning,
                &template,
                vec![display.to_string(), version.to_string(), condition.to_string()],
                format!("{}ConditionalFound", code_base),
            ));
        }

        if diagnosis.is_withdrawal() {
            out.push(self.withdrawal(position, display, alternative, diagnosis, &code_base));
        }

        out
    }

    fn withdrawal(
        &self,
        position: Position,
        display: &str,
        alternative: Option<&str>,
        diagnosis: &Diagnosis,
        code_base: &str,
    ) -> Diagnostic {
        let mut parts = Vec::new();
        let mut data = vec![display.to_string()];
        let mut code = code_base.to_string();

        if let Some(version) = diagnosis.deprecated {
            parts.push("deprecated since PHP %s");
            data.push(version.to_string());
            code.push_str("Deprecated");
        }
        if let Some(version) = diagnosis.removed {
            parts.push("removed since PHP %s");
            data.push(version.to_string());
            code.push_str("Removed");
        }

        let mut template = format!("{} is {}", self.subject, parts.join(" and "));
        if let Some(alternative) = alternative {
            template.push_str("; Use %s instead");
            data.push(alternative.to_string());
        }

        let severity = if diagnosis.removed.is_some() {
            Severity::Error
        } else {
            Severity::Warning
        };

        Diagnostic::from_template(position, severity, &template, data, code)
    }
}
