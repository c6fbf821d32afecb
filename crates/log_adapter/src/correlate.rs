//! Call-identifier correlation between tool calls and their results.

use std::collections::HashMap;

use log_model::{EventDraft, ToolStatus};

use crate::ParseWarning;

/// Maps source call identifiers to the pending tool-event drafts they
/// created, so results can attach to the right invocation.
///
/// The map is evicted when the parse completes: [`ToolCorrelator::finish`]
/// reports every still-pending call as a warning and consumes the
/// correlator. Calls without a result keep `status = Pending` in the model.
#[derive(Debug, Default)]
pub struct ToolCorrelator {
    pending: HashMap<String, usize>,
}

impl ToolCorrelator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending call living at `draft_position` in the draft list.
    ///
    /// A duplicate call identifier replaces the earlier registration; the
    /// earlier call then stays pending.
    pub fn record_call(&mut self, call_id: impl Into<String>, draft_position: usize) {
        let _ = self.pending.insert(call_id.into(), draft_position);
    }

    /// Claims the draft position for a result, removing the mapping.
    /// `None` means the result is unmatched.
    pub fn claim(&mut self, call_id: &str) -> Option<usize> {
        self.pending.remove(call_id)
    }

    /// Number of calls still awaiting a result.
    #[must_use]
    pub fn open_calls(&self) -> usize {
        self.pending.len()
    }

    /// Evicts the map, reporting every never-resolved call.
    #[must_use]
    pub fn finish(self, drafts: &[EventDraft]) -> Vec<ParseWarning> {
        let mut unresolved: Vec<(String, String)> = self
            .pending
            .into_iter()
            .map(|(call_id, position)| {
                let tool_name = drafts
                    .get(position)
                    .and_then(|draft| draft.tool.as_ref())
                    .filter(|tool| tool.status == ToolStatus::Pending)
                    .map(|tool| tool.name.clone())
                    .unwrap_or_default();
                (call_id, tool_name)
            })
            .collect();
        unresolved.sort();

        unresolved
            .into_iter()
            .map(|(call_id, tool_name)| ParseWarning::UnresolvedToolCall { call_id, tool_name })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use log_model::{EventDraft, ToolInvocation};

    use super::ToolCorrelator;
    use crate::ParseWarning;

    #[test]
    fn claim_returns_and_removes_the_registration() {
        let mut correlator = ToolCorrelator::new();
        correlator.record_call("call-1", 0);

        assert_eq!(correlator.claim("call-1"), Some(0));
        assert_eq!(correlator.claim("call-1"), None);
    }

    #[test]
    fn unknown_call_ids_are_unmatched() {
        let mut correlator = ToolCorrelator::new();
        assert_eq!(correlator.claim("never-seen"), None);
    }

    #[test]
    fn finish_reports_every_open_call() {
        let drafts = vec![
            EventDraft::tool_call(None, ToolInvocation::pending("Read", json!({}))),
            EventDraft::tool_call(None, ToolInvocation::pending("Bash", json!({}))),
        ];

        let mut correlator = ToolCorrelator::new();
        correlator.record_call("a", 0);
        correlator.record_call("b", 1);
        let _ = correlator.claim("a");

        let warnings = correlator.finish(&drafts);
        assert_eq!(
            warnings,
            vec![ParseWarning::UnresolvedToolCall {
                call_id: "b".to_string(),
                tool_name: "Bash".to_string(),
            }]
        );
    }
}
