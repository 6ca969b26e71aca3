use crate::config::OrchestratorConfig;

/// Adjust a base confidence by source count and credibility, then clamp.
///
/// Applied exactly once per artifact, after generation, on both the
/// generative and fallback paths. Corroboration raises confidence, a single
/// source lowers it, and the credibility shift only applies when there is at
/// least one source to measure.
pub fn adjust_confidence(
    base: u8,
    source_count: usize,
    mean_credibility: Option<f64>,
    config: &OrchestratorConfig,
) -> u8 {
    let mut value = base as i32;

    if source_count >= 3 {
        value += 10;
    } else if source_count == 1 {
        value -= 15;
    }

    if let Some(credibility) = mean_credibility {
        if credibility >= 80.0 {
            value += 10;
        } else if credibility < 50.0 {
            value -= 20;
        }
    }

    value.clamp(config.confidence_floor as i32, config.confidence_ceiling as i32) as u8
}

/// Mean credibility of a source set; `None` when empty
pub fn mean_credibility(credibilities: &[u8]) -> Option<f64> {
    if credibilities.is_empty() {
        return None;
    }
    let sum: u32 = credibilities.iter().map(|&c| c as u32).sum();
    Some(sum as f64 / credibilities.len() as f64)
}
