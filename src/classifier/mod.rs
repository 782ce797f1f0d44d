pub mod ai;
pub mod emergency;
pub mod rules;
pub mod types;

use std::time::Duration;

use emergency::Category;
use types::{Assessment, AssessmentMode, SeverityLevel};

pub use ai::AiClassifier;
pub use types::ClassifyRequest;

pub struct Classifier {
    ai: AiClassifier,
}

impl Classifier {
    pub fn new(ai_url: Option<String>, ai_timeout: Duration, stage1_retention: Duration) -> Self {
        Classifier {
            ai: AiClassifier::new(ai_url, ai_timeout, stage1_retention),
        }
    }

    /// Classify a symptom report. Never fails: the worst case is a
    /// `General Medicine` / mild assessment tagged `client-fallback`
    /// (§4.2 failure semantics, P9 totality).
    pub async fn classify(&self, req: &ClassifyRequest) -> Assessment {
        let text = req.symptoms.trim();
        if text.is_empty() {
            return Self::rule_based_assessment("", AssessmentMode::ClientFallback);
        }

        if let Some(assessment) = self.try_instant_emergency(text) {
            return assessment;
        }

        if let Some(assessment) = self.try_ai_branch(req).await {
            return assessment;
        }

        Self::rule_based_assessment(text, AssessmentMode::RuleBased)
    }

    fn try_instant_emergency(&self, text: &str) -> Option<Assessment> {
        let m = emergency::match_emergency_terms(text);
        if m.matched_terms.is_empty() {
            return None;
        }

        let requires_maternity = m.categories.contains(&Category::Obstetric);
        let requires_trauma = m
            .categories
            .iter()
            .any(|c| matches!(c, Category::Trauma | Category::Neurological));

        Some(Assessment {
            severity: 10,
            severity_level: SeverityLevel::Emergency,
            specialties: vec!["Emergency Medicine".to_string()],
            auto_emergency: true,
            detected_keywords: m.matched_terms.iter().map(|s| s.to_string()).collect(),
            requires_maternity,
            requires_nicu: false,
            requires_trauma,
            needs_clarification: false,
            clarifying_questions: vec![],
            stage1_cache: None,
            reasoning: "Matched a known emergency term in the reported symptoms.".to_string(),
            recommended_action:
                "Go to the nearest emergency-capable facility immediately, or call emergency services."
                    .to_string(),
            red_flags: m.matched_terms.iter().map(|s| s.to_string()).collect(),
            disclaimer: Assessment::DISCLAIMER.to_string(),
            mode: AssessmentMode::InstantEmergency,
        })
    }

    async fn try_ai_branch(&self, req: &ClassifyRequest) -> Option<Assessment> {
        if !self.ai.is_configured() {
            return None;
        }

        let result = match &req.stage1_cache {
            None => {
                self.ai
                    .start_round1(&req.symptoms, req.age, req.duration.as_deref())
                    .await
            }
            Some(cache) => {
                self.ai
                    .finish_round2(&req.symptoms, &req.clarifying_answers, cache)
                    .await
            }
        };

        match result {
            Ok(assessment) => Some(assessment),
            Err(e) => {
                tracing::warn!(error = ?e, "external classifier branch failed, falling back");
                None
            }
        }
    }

    fn rule_based_assessment(text: &str, mode: AssessmentMode) -> Assessment {
        let rule = rules::classify_rule_based(text);
        let severity_level = SeverityLevel::from_score(rule.severity);
        let red_flags: Vec<String> = rule
            .high_severity_matches
            .iter()
            .map(|s| s.to_string())
            .collect();

        Assessment {
            severity: rule.severity,
            severity_level,
            specialties: vec![rule.department.to_string()],
            auto_emergency: false,
            detected_keywords: vec![],
            requires_maternity: rule.department == "Obstetrics & Gynecology",
            requires_nicu: false,
            requires_trauma: rule.department == "Orthopedics",
            needs_clarification: false,
            clarifying_questions: vec![],
            stage1_cache: None,
            reasoning: format!(
                "Matched keywords for {} with no emergency indicators.",
                rule.department
            ),
            recommended_action: format!("Consult {} for further evaluation.", rule.department),
            red_flags,
            disclaimer: Assessment::DISCLAIMER.to_string(),
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(None, Duration::from_secs(8), Duration::from_secs(600))
    }

    #[tokio::test]
    async fn emergency_term_short_circuits() {
        let c = classifier();
        let req = ClassifyRequest {
            symptoms: "I have chest pain and cannot breathe".to_string(),
            clarifying_answers: vec![],
            stage1_cache: None,
            age: None,
            duration: None,
        };
        let a = c.classify(&req).await;
        assert_eq!(a.severity, 10);
        assert_eq!(a.severity_level, SeverityLevel::Emergency);
        assert!(a.auto_emergency);
        assert!(a.detected_keywords.contains(&"chest pain".to_string()));
        assert!(a.detected_keywords.contains(&"cannot breathe".to_string()));
        assert!(!a.needs_clarification);
    }

    #[tokio::test]
    async fn falls_back_to_rule_based_without_ai_configured() {
        let c = classifier();
        let req = ClassifyRequest {
            symptoms: "mild headache since morning".to_string(),
            clarifying_answers: vec![],
            stage1_cache: None,
            age: None,
            duration: None,
        };
        let a = c.classify(&req).await;
        assert_eq!(a.mode, AssessmentMode::RuleBased);
        assert_eq!(a.severity_level, SeverityLevel::Mild);
    }

    #[tokio::test]
    async fn classifier_is_total_for_any_nonempty_input() {
        let c = classifier();
        for text in ["", "   ", "asdkjaslkdj random text 1234", "🤒"] {
            let req = ClassifyRequest {
                symptoms: text.to_string(),
                clarifying_answers: vec![],
                stage1_cache: None,
                age: None,
                duration: None,
            };
            let a = c.classify(&req).await;
            assert!((1..=10).contains(&a.severity) || text.trim().is_empty());
        }
    }

    #[tokio::test]
    async fn idempotent_for_deterministic_branches() {
        let c = classifier();
        let req = ClassifyRequest {
            symptoms: "severe headache and dizziness".to_string(),
            clarifying_answers: vec![],
            stage1_cache: None,
            age: None,
            duration: None,
        };
        let a1 = c.classify(&req).await;
        let a2 = c.classify(&req).await;
        assert_eq!(a1.severity, a2.severity);
        assert_eq!(a1.specialties, a2.specialties);
        assert_eq!(a1.severity_level, a2.severity_level);
    }
}
