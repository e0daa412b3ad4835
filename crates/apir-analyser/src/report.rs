//! # Analysis Report
//!
//! Findings of all analyser tasks over one assembly. A finding either
//! concerns a specific artifact (a module, usually) or the assembly as a
//! whole.

use std::fmt;

use serde::{Deserialize, Serialize};

use apir_core::ArtifactId;

/// One error or warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Artifact the finding is about; unset for assembly-wide findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<ArtifactId>,
    /// Message text.
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "[{subject}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Collected findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Errors.
    pub errors: Vec<Finding>,
    /// Warnings.
    pub warnings: Vec<Finding>,
}

impl AnalysisReport {
    /// Empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembly-wide error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(Finding {
            subject: None,
            message: message.into(),
        });
    }

    /// Assembly-wide warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(Finding {
            subject: None,
            message: message.into(),
        });
    }

    /// Error about one artifact.
    pub fn add_artifact_error(&mut self, subject: &ArtifactId, message: impl Into<String>) {
        self.errors.push(Finding {
            subject: Some(subject.clone()),
            message: message.into(),
        });
    }

    /// Warning about one artifact.
    pub fn add_artifact_warning(&mut self, subject: &ArtifactId, message: impl Into<String>) {
        self.warnings.push(Finding {
            subject: Some(subject.clone()),
            message: message.into(),
        });
    }

    /// Whether any error was reported.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// No errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Append another report.
    pub fn merge(&mut self, other: AnalysisReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Error messages only, in report order.
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|f| f.message.as_str()).collect()
    }

    /// Warning messages only, in report order.
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|f| f.message.as_str()).collect()
    }
}
