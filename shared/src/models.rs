//! Domain models shared across the application

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category a learning item is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearningCategory {
    Languages,
    Technologies,
    Concepts,
    Projects,
    Other,
}

impl LearningCategory {
    /// Every category, in the order clients display them
    pub const ALL: [LearningCategory; 5] = [
        LearningCategory::Languages,
        LearningCategory::Technologies,
        LearningCategory::Concepts,
        LearningCategory::Projects,
        LearningCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningCategory::Languages => "Languages",
            LearningCategory::Technologies => "Technologies",
            LearningCategory::Concepts => "Concepts",
            LearningCategory::Projects => "Projects",
            LearningCategory::Other => "Other",
        }
    }
}

impl fmt::Display for LearningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LearningCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Unknown learning category: {}", s))
    }
}
