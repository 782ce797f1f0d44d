use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    Mild,
    Moderate,
    High,
    Emergency,
}

impl SeverityLevel {
    /// Deterministic mapping from a 1-10 score to a tier (§4.2 table).
    pub fn from_score(score: u8) -> Self {
        match score {
            1..=3 => SeverityLevel::Mild,
            4..=6 => SeverityLevel::Moderate,
            7..=8 => SeverityLevel::High,
            _ => SeverityLevel::Emergency,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Mild => "mild",
            SeverityLevel::Moderate => "moderate",
            SeverityLevel::High => "high",
            SeverityLevel::Emergency => "emergency",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mild" => Some(SeverityLevel::Mild),
            "moderate" => Some(SeverityLevel::Moderate),
            "high" => Some(SeverityLevel::High),
            "emergency" => Some(SeverityLevel::Emergency),
            _ => None,
        }
    }
}

/// Which branch of the classifier produced an [`Assessment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentMode {
    InstantEmergency,
    Ai,
    RuleBased,
    ClientFallback,
}

/// Transient per-request classification result. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub severity: u8,
    pub severity_level: SeverityLevel,
    pub specialties: Vec<String>,
    pub auto_emergency: bool,
    pub detected_keywords: Vec<String>,
    pub requires_maternity: bool,
    pub requires_nicu: bool,
    pub requires_trauma: bool,
    pub needs_clarification: bool,
    pub clarifying_questions: Vec<String>,
    pub stage1_cache: Option<String>,
    pub reasoning: String,
    pub recommended_action: String,
    pub red_flags: Vec<String>,
    pub disclaimer: String,
    pub mode: AssessmentMode,
}

impl Assessment {
    pub const DISCLAIMER: &'static str =
        "This assessment is informational only and is not a medical diagnosis. \
         In a life-threatening emergency, call local emergency services immediately.";
}

/// Request body for `POST /symptoms/classify`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub symptoms: String,
    #[serde(default)]
    pub clarifying_answers: Vec<String>,
    #[serde(default)]
    pub stage1_cache: Option<String>,
    #[serde(default)]
    pub age: Option<u16>,
    #[serde(default)]
    pub duration: Option<String>,
}
