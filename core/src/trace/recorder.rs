//! Step recorder for a single invocation

use crate::trace::Step;

/// Holds the ordered steps of one invocation
///
/// Orders are assigned when a step is appended, which happens after the
/// traced call returns, so the sequence follows call completion. The
/// recorder has no internal locking; it is mutated through `&mut` only.
#[derive(Debug, Clone, Default)]
pub struct StepRecorder {
    steps: Vec<Step>,
    last_order: usize,
}

impl StepRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step, assigning it the next order, and return that order
    pub fn append(&mut self, mut step: Step) -> usize {
        self.last_order += 1;
        step.order = self.last_order;
        self.steps.push(step);
        self.last_order
    }

    /// Recorded steps in order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether any recorded step failed
    pub fn has_failures(&self) -> bool {
        self.steps.iter().any(Step::is_failed)
    }

    /// Error of the first failed step, if any
    pub fn first_error(&self) -> Option<&str> {
        self.steps
            .iter()
            .find(|step| step.is_failed())
            .and_then(|step| step.error.as_deref())
    }

    /// Clear all recorded steps and restart numbering
    pub fn clear(&mut self) {
        self.steps.clear();
        self.last_order = 0;
    }
}
