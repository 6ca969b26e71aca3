use insight_core::{
    AssetImplication, Evidence, ImpactLevel, InsightError, RiskLevel, Scenarios,
};
use serde::Deserialize;

/// Backend-proposed event card, before confidence adjustment and tagging
#[derive(Debug, Clone, Deserialize)]
pub struct EventCardDraft {
    pub title: String,
    pub summary: String,
    pub impact: ImpactLevel,
    #[serde(default)]
    pub affected_assets: Vec<String>,
    pub confidence: u8,
    #[serde(default)]
    pub rationale: String,
}

/// Backend-proposed insight, before confidence adjustment and tagging
#[derive(Debug, Clone, Deserialize)]
pub struct InsightDraft {
    pub theses: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    #[serde(default)]
    pub counter_arguments: Vec<String>,
    pub scenarios: Scenarios,
    pub confidence: u8,
    pub risk_level: RiskLevel,
    #[serde(default = "default_horizon")]
    pub horizon: String,
    #[serde(default)]
    pub asset_implications: Vec<AssetImplication>,
}

fn default_horizon() -> String {
    "1-2 weeks".to_string()
}

/// Extract the first JSON object embedded in model output.
///
/// Backends are asked for bare JSON but occasionally wrap it in code fences
/// or lead with prose; tolerate both by slicing from the first `{` to its
/// matching close brace.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

pub fn parse_event_card(text: &str) -> Result<EventCardDraft, InsightError> {
    let json = extract_json(text)
        .ok_or_else(|| InsightError::ParseFailed("no JSON object in response".to_string()))?;
    serde_json::from_str(json).map_err(|e| InsightError::ParseFailed(e.to_string()))
}

pub fn parse_insight(text: &str) -> Result<InsightDraft, InsightError> {
    let json = extract_json(text)
        .ok_or_else(|| InsightError::ParseFailed("no JSON object in response".to_string()))?;
    serde_json::from_str(json).map_err(|e| InsightError::ParseFailed(e.to_string()))
}
