use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-issued identifier correlating upload, processing and reclassification
/// of one file. The server may encode it as a JSON number or string; both
/// decode to the same opaque value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Int(value) => Ok(Self(value.to_string())),
            RawId::Text(value) => Ok(Self(value)),
        }
    }
}

/// Exactly one section of the upload view is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Idle,
    Progress,
    Results,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const HIGH_THRESHOLD: f64 = 0.8;
    pub const MEDIUM_THRESHOLD: f64 = 0.6;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfidenceBadge {
    pub text: String,
    pub level: ConfidenceLevel,
}

impl ConfidenceBadge {
    pub fn from_score(score: f64) -> Self {
        let clamped = if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            text: format!("{}%", (clamped * 100.0).round() as u32),
            level: ConfidenceLevel::from_score(clamped),
        }
    }
}

pub const FALLBACK_DEPARTMENT: &str = "General Office";

const ROUTING_TABLE: &[(&str, &str)] = &[
    ("invoice", "Accounting"),
    ("resume", "Human Resources"),
    ("contract", "Legal"),
    ("bank statement", "Finance"),
];

/// Department a document type is routed to; unknown types land in the
/// catch-all department.
pub fn department_for(document_type: &str) -> &'static str {
    let normalized = document_type.trim().to_ascii_lowercase();
    ROUTING_TABLE
        .iter()
        .find(|(doc_type, _)| *doc_type == normalized)
        .map(|(_, department)| *department)
        .unwrap_or(FALLBACK_DEPARTMENT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Uploaded,
    Processing,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
