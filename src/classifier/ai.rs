use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{Assessment, AssessmentMode, SeverityLevel};

/// Server-side continuation state for a round-1 clarifying exchange. The
/// token handed to the client is opaque; only this process ever interprets
/// it.
#[derive(Debug, Clone)]
struct Stage1Entry {
    symptom_text: String,
    provider_continuation: serde_json::Value,
    created_at: Instant,
}

/// Process-local store for in-flight two-round clarifying exchanges.
/// Read-mostly in steady state; writes are one insert per round-1 call and
/// one removal per round-2 call or expiry sweep.
#[derive(Clone)]
pub struct Stage1Cache {
    entries: Arc<RwLock<HashMap<String, Stage1Entry>>>,
    retention: Duration,
}

impl Stage1Cache {
    pub fn new(retention: Duration) -> Self {
        Stage1Cache {
            entries: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    async fn insert(&self, symptom_text: &str, continuation: serde_json::Value) -> String {
        let token = Uuid::new_v4().to_string();
        let mut guard = self.entries.write().await;
        guard.insert(
            token.clone(),
            Stage1Entry {
                symptom_text: symptom_text.to_string(),
                provider_continuation: continuation,
                created_at: Instant::now(),
            },
        );
        token
    }

    /// Returns the cached continuation iff the token exists, has not
    /// expired, and the echoed symptom text matches what round 1 saw.
    async fn take(&self, token: &str, symptom_text: &str) -> Option<serde_json::Value> {
        let mut guard = self.entries.write().await;
        let entry = guard.remove(token)?;
        if entry.created_at.elapsed() > self.retention {
            return None;
        }
        if entry.symptom_text != symptom_text {
            return None;
        }
        Some(entry.provider_continuation)
    }
}

#[derive(Debug, Serialize)]
struct Round1Request<'a> {
    symptoms: &'a str,
    age: Option<u16>,
    duration: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct Round1Response {
    clarifying_questions: Vec<String>,
    continuation: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct Round2Request<'a> {
    symptoms: &'a str,
    answers: &'a [String],
    continuation: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Round2Response {
    severity: u8,
    specialties: Vec<String>,
    requires_maternity: bool,
    requires_nicu: bool,
    requires_trauma: bool,
    reasoning: String,
    recommended_action: String,
    #[serde(default)]
    red_flags: Vec<String>,
}

/// Errors that mean "fall through to the rule-based branch"; none of these
/// are ever surfaced to the HTTP caller (§4.2 failure semantics).
#[derive(Debug)]
pub enum AiClassifyError {
    NotConfigured,
    Timeout,
    Transport(String),
    SchemaMismatch(String),
    CacheMiss,
}

pub struct AiClassifier {
    client: reqwest::Client,
    base_url: Option<String>,
    timeout: Duration,
    cache: Stage1Cache,
}

impl AiClassifier {
    pub fn new(base_url: Option<String>, timeout: Duration, stage1_retention: Duration) -> Self {
        AiClassifier {
            client: reqwest::Client::new(),
            base_url,
            timeout,
            cache: Stage1Cache::new(stage1_retention),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Round 1: request clarifying questions from the external model.
    pub async fn start_round1(
        &self,
        symptoms: &str,
        age: Option<u16>,
        duration: Option<&str>,
    ) -> Result<Assessment, AiClassifyError> {
        let base = self.base_url.as_ref().ok_or(AiClassifyError::NotConfigured)?;

        let resp = tokio::time::timeout(
            self.timeout,
            self.client
                .post(format!("{base}/classify/round1"))
                .json(&Round1Request {
                    symptoms,
                    age,
                    duration,
                })
                .send(),
        )
        .await
        .map_err(|_| AiClassifyError::Timeout)?
        .map_err(|e| AiClassifyError::Transport(e.to_string()))?;

        let parsed: Round1Response = resp
            .json()
            .await
            .map_err(|e| AiClassifyError::SchemaMismatch(e.to_string()))?;

        if !(2..=5).contains(&parsed.clarifying_questions.len()) {
            return Err(AiClassifyError::SchemaMismatch(
                "clarifying_questions must have 2-5 entries".to_string(),
            ));
        }

        let token = self.cache.insert(symptoms, parsed.continuation).await;

        Ok(Assessment {
            severity: 0,
            severity_level: SeverityLevel::Mild,
            specialties: vec![],
            auto_emergency: false,
            detected_keywords: vec![],
            requires_maternity: false,
            requires_nicu: false,
            requires_trauma: false,
            needs_clarification: true,
            clarifying_questions: parsed.clarifying_questions,
            stage1_cache: Some(token),
            reasoning: String::new(),
            recommended_action: String::new(),
            red_flags: vec![],
            disclaimer: Assessment::DISCLAIMER.to_string(),
            mode: AssessmentMode::Ai,
        })
    }

    /// Round 2: resubmit answers plus the echoed cache token for a final
    /// recommendation.
    pub async fn finish_round2(
        &self,
        symptoms: &str,
        answers: &[String],
        stage1_cache: &str,
    ) -> Result<Assessment, AiClassifyError> {
        let base = self.base_url.as_ref().ok_or(AiClassifyError::NotConfigured)?;

        let continuation = self
            .cache
            .take(stage1_cache, symptoms)
            .await
            .ok_or(AiClassifyError::CacheMiss)?;

        let resp = tokio::time::timeout(
            self.timeout,
            self.client
                .post(format!("{base}/classify/round2"))
                .json(&Round2Request {
                    symptoms,
                    answers,
                    continuation,
                })
                .send(),
        )
        .await
        .map_err(|_| AiClassifyError::Timeout)?
        .map_err(|e| AiClassifyError::Transport(e.to_string()))?;

        let parsed: Round2Response = resp
            .json()
            .await
            .map_err(|e| AiClassifyError::SchemaMismatch(e.to_string()))?;

        if !(1..=10).contains(&parsed.severity) {
            return Err(AiClassifyError::SchemaMismatch(
                "severity must be in 1..=10".to_string(),
            ));
        }

        Ok(Assessment {
            severity: parsed.severity,
            severity_level: SeverityLevel::from_score(parsed.severity),
            specialties: parsed.specialties,
            auto_emergency: false,
            detected_keywords: vec![],
            requires_maternity: parsed.requires_maternity,
            requires_nicu: parsed.requires_nicu,
            requires_trauma: parsed.requires_trauma,
            needs_clarification: false,
            clarifying_questions: vec![],
            stage1_cache: None,
            reasoning: parsed.reasoning,
            recommended_action: parsed.recommended_action,
            red_flags: parsed.red_flags,
            disclaimer: Assessment::DISCLAIMER.to_string(),
            mode: AssessmentMode::Ai,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stage1_cache_round_trip() {
        let cache = Stage1Cache::new(Duration::from_secs(60));
        let token = cache
            .insert("fever since 3 days", serde_json::json!({"x": 1}))
            .await;
        let got = cache.take(&token, "fever since 3 days").await;
        assert!(got.is_some());
        // Token is single-use.
        assert!(cache.take(&token, "fever since 3 days").await.is_none());
    }

    #[tokio::test]
    async fn stage1_cache_rejects_mismatched_symptoms() {
        let cache = Stage1Cache::new(Duration::from_secs(60));
        let token = cache.insert("fever", serde_json::json!({})).await;
        assert!(cache.take(&token, "a different complaint").await.is_none());
    }

    #[tokio::test]
    async fn stage1_cache_expires() {
        let cache = Stage1Cache::new(Duration::from_millis(1));
        let token = cache.insert("fever", serde_json::json!({})).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(cache.take(&token, "fever").await.is_none());
    }

    #[tokio::test]
    async fn not_configured_short_circuits() {
        let classifier = AiClassifier::new(None, Duration::from_secs(1), Duration::from_secs(60));
        let err = classifier.start_round1("fever", None, None).await.unwrap_err();
        assert!(matches!(err, AiClassifyError::NotConfigured));
    }
}
