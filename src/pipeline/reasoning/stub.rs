//! Offline classifiers: a deterministic stub and the "no backend" fallback.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{ConsistencyClassifier, ReasoningError};
use crate::pipeline::types::{Prediction, Verdict};

/// Rationale returned by [`UnavailableClassifier`].
pub const UNCONFIGURED_RATIONALE: &str =
    "Reasoning backend not configured. Mock: the retrieved context contradicts the claim.";

/// Words ignored by the lexical rule.
const STOPWORDS: &[&str] = &[
    "about", "after", "again", "also", "been", "before", "being", "from", "have", "into",
    "just", "never", "only", "over", "said", "some", "than", "that", "their", "them", "then",
    "there", "they", "this", "through", "throughout", "very", "were", "what", "when", "where",
    "which", "while", "with", "would",
];

/// Claim terms that must appear in the evidence for a consistent verdict.
const LEXICAL_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone)]
enum StubRule {
    Fixed(Verdict),
    Failing,
    Lexical,
}

/// Deterministic classifier.
#[derive(Debug)]
pub struct StubClassifier {
    rule: StubRule,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubClassifier {
    /// Always answer with `verdict`.
    pub fn fixed(verdict: Verdict) -> Self {
        Self::with_rule(StubRule::Fixed(verdict))
    }

    /// Always fail with an HTTP client error.
    pub fn failing() -> Self {
        Self::with_rule(StubRule::Failing)
    }

    /// Consistent when at least half of the claim's content words appear in
    /// the evidence.
    pub fn lexical() -> Self {
        Self::with_rule(StubRule::Lexical)
    }

    fn with_rule(rule: StubRule) -> Self {
        Self {
            rule,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Suspend for `delay` on every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn content_words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3)
        .map(|w| w.to_lowercase())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn lexical_verdict(claim: &str, evidence: &[String]) -> Verdict {
    if evidence.is_empty() {
        return Verdict::new(
            Prediction::Contradicted,
            "No evidence was retrieved to support the claim.",
        );
    }

    let claim_terms = content_words(claim);
    if claim_terms.is_empty() {
        return Verdict::new(Prediction::Contradicted, "The claim has no checkable terms.");
    }

    let evidence_terms = content_words(&evidence.join(" "));
    let matched = claim_terms.intersection(&evidence_terms).count();
    let ratio = matched as f32 / claim_terms.len() as f32;
    let prediction = if ratio >= LEXICAL_THRESHOLD {
        Prediction::Consistent
    } else {
        Prediction::Contradicted
    };

    Verdict::new(
        prediction,
        format!(
            "{matched} of {} claim terms appear in the retrieved evidence.",
            claim_terms.len()
        ),
    )
}

#[async_trait]
impl ConsistencyClassifier for StubClassifier {
    async fn classify(
        &self,
        _character: &str,
        claim: &str,
        evidence: &[String],
    ) -> Result<Verdict, ReasoningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.rule {
            StubRule::Fixed(verdict) => Ok(verdict.clone()),
            StubRule::Failing => Err(ReasoningError::HttpClient("stub failure".into())),
            StubRule::Lexical => Ok(lexical_verdict(claim, evidence)),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Fallback used when no reasoning backend is configured.
///
/// Mirrors a round trip with a short delay, then answers with a
/// contradiction and a rationale that makes the missing backend obvious.
#[derive(Debug, Clone)]
pub struct UnavailableClassifier {
    delay: Duration,
}

impl UnavailableClassifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for UnavailableClassifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl ConsistencyClassifier for UnavailableClassifier {
    async fn classify(
        &self,
        character: &str,
        _claim: &str,
        _evidence: &[String],
    ) -> Result<Verdict, ReasoningError> {
        tracing::warn!(character, "No reasoning backend configured, returning mock verdict");
        tokio::time::sleep(self.delay).await;
        Ok(Verdict::new(Prediction::Contradicted, UNCONFIGURED_RATIONALE))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn fixed_stub_counts_calls() {
        let stub = StubClassifier::fixed(Verdict::new(Prediction::Consistent, "fine"));
        let v = stub.classify("a", "b", &[]).await.unwrap();
        assert_eq!(v.prediction, Prediction::Consistent);
        stub.classify("a", "b", &[]).await.unwrap();
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn failing_stub_errors() {
        let stub = StubClassifier::failing();
        assert!(stub.classify("a", "b", &[]).await.is_err());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn lexical_rule_matches_overlap() {
        let stub = StubClassifier::lexical();
        let v = stub
            .classify(
                "Jay Gatsby",
                "Gatsby changed his name at seventeen",
                &ev(&["James Gatz changed his name at the age of seventeen to Gatsby."]),
            )
            .await
            .unwrap();
        assert_eq!(v.prediction, Prediction::Consistent);
        assert!(v.rationale.contains("claim terms"));
    }

    #[tokio::test]
    async fn lexical_rule_rejects_unrelated_claim() {
        let stub = StubClassifier::lexical();
        let v = stub
            .classify(
                "Daisy",
                "Daisy waited faithfully throughout the war",
                &ev(&["Tom Buchanan arrived in the middle of spring."]),
            )
            .await
            .unwrap();
        assert_eq!(v.prediction, Prediction::Contradicted);
    }

    #[tokio::test]
    async fn lexical_rule_without_evidence_is_contradiction() {
        let stub = StubClassifier::lexical();
        let v = stub.classify("x", "anything at all", &[]).await.unwrap();
        assert_eq!(v.prediction, Prediction::Contradicted);
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_classifier_waits_then_contradicts() {
        let classifier = UnavailableClassifier::default();
        let started = tokio::time::Instant::now();
        let v = classifier.classify("x", "y", &[]).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(v.prediction, Prediction::Contradicted);
        assert_eq!(v.rationale, UNCONFIGURED_RATIONALE);
    }
}
