use std::fmt;

use serde::{Deserialize, Serialize};

/// An oracle response reduced to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Affirmative,
    Negative,
    /// Neither "yes" nor "no" could be found. Treated like `Negative`.
    Unknown,
}

impl Verdict {
    /// Substring heuristic: any occurrence of "yes" (case-insensitive) wins,
    /// even inside another word. A standalone "no" is an explicit refusal;
    /// everything else is `Unknown`.
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("yes") {
            return Verdict::Affirmative;
        }

        if lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == "no")
        {
            Verdict::Negative
        } else {
            Verdict::Unknown
        }
    }

    pub fn is_affirmative(&self) -> bool {
        matches!(self, Verdict::Affirmative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Affirmative => "affirmative",
            Verdict::Negative => "negative",
            Verdict::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
