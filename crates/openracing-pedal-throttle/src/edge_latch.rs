//! First-crossing latch for edge-triggered pedal steps.

/// What the caller should do with the current pressure sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDecision {
    None,
    Step,
}

const LATCH_SATURATION: u8 = 2;

/// Allows at most one discrete step per press episode.
///
/// The first sample above the step threshold fires a [`StepDecision::Step`];
/// everything after that is ignored until the pedal returns all the way to
/// zero. Dropping below the threshold without reaching zero does not rearm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeLatch {
    count: u8,
}

impl EdgeLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pressure(&mut self, raw_pressure: u8, step_threshold: u8) -> StepDecision {
        if raw_pressure == 0 {
            self.reset();
            return StepDecision::None;
        }

        if raw_pressure > step_threshold && self.count < LATCH_SATURATION {
            self.count = self.count.saturating_add(1);
            if self.count == 1 {
                return StepDecision::Step;
            }
        }

        StepDecision::None
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// 0 = armed, 1 = just stepped, 2 = held past the step.
    #[inline]
    pub fn count(&self) -> u8 {
        self.count
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.count == 0
    }
}
