use tradegraph_models::Signal;

use crate::prompts::FINAL_PROPOSAL_MARKER;

/// Reduces the risk judge's free text to a single action.
pub trait SignalExtractor: Send + Sync {
    fn extract(&self, final_decision: &str) -> Signal;
}

/// Keyword scan over the decision text.
///
/// Prefers the first action word following the `FINAL TRANSACTION PROPOSAL`
/// marker, then the last standalone action word anywhere, then HOLD.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSignalExtractor;

impl SignalExtractor for KeywordSignalExtractor {
    fn extract(&self, final_decision: &str) -> Signal {
        let upper = final_decision.to_uppercase();

        if let Some(pos) = upper.rfind(FINAL_PROPOSAL_MARKER) {
            let tail = &upper[pos + FINAL_PROPOSAL_MARKER.len()..];
            if let Some(signal) = action_words(tail).next() {
                return signal;
            }
        }

        action_words(&upper).last().unwrap_or(Signal::Hold)
    }
}

fn action_words(text: &str) -> impl Iterator<Item = Signal> + '_ {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter_map(|word| match word {
            "BUY" => Some(Signal::Buy),
            "SELL" => Some(Signal::Sell),
            "HOLD" => Some(Signal::Hold),
            _ => None,
        })
}
