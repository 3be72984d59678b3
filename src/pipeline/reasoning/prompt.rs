/// System prompt sent with every reasoning request.
pub const REASONER_SYSTEM_PROMPT: &str =
    "You are the Character-Conditioned Long-Term Memory Reasoner. Output valid JSON only.";

/// Separator placed between evidence excerpts.
pub const EVIDENCE_SEPARATOR: &str = "\n---\n";

/// Build the per-item reasoning prompt.
pub fn build_reasoning_prompt(character: &str, claim: &str, evidence: &[String]) -> String {
    let context = if evidence.is_empty() {
        "(no excerpts were retrieved)".to_string()
    } else {
        evidence.join(EVIDENCE_SEPARATOR)
    };

    format!(
        "Your task is to determine if a character's backstory claim is consistent \
with the provided novel excerpts.

Character: {character}
Claim: {claim}

Retrieved Novel Context (Evidence):
{context}

Analyze the evidence deeply.
If the claim is consistent with the evidence, output prediction 1.
If the claim contradicts the evidence, output prediction 0.
Provide a single clean sentence as rationale.

Respond with a JSON object of the form:
{{\"prediction\": 0 or 1, \"rationale\": \"one sentence\"}}"
    )
}
