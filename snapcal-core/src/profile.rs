//! Student profile for course recommendations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SnapcalError, SnapcalResult};

/// What the recommendation form collects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    pub name: Option<String>,
    pub major: Option<String>,
    /// e.g. "sophomore" or "2nd year"
    pub year: Option<String>,
    pub interests: Vec<String>,
    pub completed_courses: Vec<String>,
    pub goals: Option<String>,
}

impl StudentProfile {
    /// Load a profile from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> SnapcalResult<Self> {
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") => toml::from_str(&content).map_err(|e| SnapcalError::Config(e.to_string())),
            other => Err(SnapcalError::Config(format!(
                "Unsupported profile format '{}'. Use .toml or .json",
                other.unwrap_or("")
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == StudentProfile::default()
    }

    /// Render the profile as the user part of a recommendation prompt.
    pub fn to_prompt(&self) -> String {
        let mut lines = Vec::new();

        if let Some(ref name) = self.name {
            lines.push(format!("Name: {}", name));
        }
        if let Some(ref major) = self.major {
            lines.push(format!("Major: {}", major));
        }
        if let Some(ref year) = self.year {
            lines.push(format!("Year: {}", year));
        }
        if !self.interests.is_empty() {
            lines.push(format!("Interests: {}", self.interests.join(", ")));
        }
        if !self.completed_courses.is_empty() {
            lines.push(format!("Completed courses: {}", self.completed_courses.join(", ")));
        }
        if let Some(ref goals) = self.goals {
            lines.push(format!("Goals: {}", goals));
        }

        lines.join("\n")
    }
}
