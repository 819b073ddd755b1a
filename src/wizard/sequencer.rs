//! Linear step sequencing for the wizard.
//!
//! States are the step indices `0..=N`; `N` is the terminal monitor state.
//! Forward moves are guarded by the active step's "next available" signal,
//! which defaults to whether the step is optional and is raised by the
//! deploy step once a deployment succeeds.

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use super::steps::{Step, StepId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("step {0} must be completed before moving on")]
    NextUnavailable(&'static str),

    #[error("step {0} is required and cannot be skipped")]
    NotOptional(&'static str),

    #[error("the wizard is already complete")]
    Complete,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    steps: Vec<Step>,
    active: usize,
    skipped: BTreeSet<usize>,
    back_available: bool,
    next_available: bool,
    deployed: bool,
}

impl Sequencer {
    /// Start at the first step, or straight in the terminal state when the
    /// release is already deployed.
    pub fn new(steps: Vec<Step>, already_deployed: bool) -> Self {
        let active = if already_deployed { steps.len() } else { 0 };
        let mut sequencer = Self {
            steps,
            active,
            skipped: BTreeSet::new(),
            back_available: false,
            next_available: false,
            deployed: already_deployed,
        };
        sequencer.apply_default_availability();
        sequencer
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active step, `None` in the terminal state
    pub fn active_step(&self) -> Option<&Step> {
        self.steps.get(self.active)
    }

    pub fn active_id(&self) -> Option<StepId> {
        self.active_step().map(|s| s.id)
    }

    pub fn is_complete(&self) -> bool {
        self.active == self.steps.len()
    }

    pub fn is_skipped(&self, idx: usize) -> bool {
        self.skipped.contains(&idx)
    }

    pub fn skipped(&self) -> &BTreeSet<usize> {
        &self.skipped
    }

    pub fn back_available(&self) -> bool {
        self.back_available
    }

    pub fn next_available(&self) -> bool {
        self.next_available
    }

    pub fn is_deployed(&self) -> bool {
        self.deployed
    }

    /// Availability a step gets on entry: back unless first, next only if optional
    pub fn default_availability(&self) -> (bool, bool) {
        match self.active_step() {
            Some(step) => (self.active > 0, step.optional),
            None => (false, false),
        }
    }

    fn apply_default_availability(&mut self) {
        let (back, next) = self.default_availability();
        self.back_available = back;
        self.next_available = next;
        // The deploy step opens "next" once a deployment went through
        if self.active_id() == Some(StepId::Deploy) && self.deployed {
            self.next_available = true;
        }
    }

    pub fn set_next_available(&mut self, available: bool) {
        self.next_available = available && !self.is_complete();
    }

    /// Record the outcome of a deploy attempt on the deploy step
    pub fn set_deployed(&mut self, deployed: bool) {
        self.deployed = deployed;
        if self.active_id() == Some(StepId::Deploy) {
            self.set_next_available(deployed);
        }
    }

    pub fn advance(&mut self) -> Result<(), SequenceError> {
        let step = match self.active_step() {
            Some(step) => *step,
            None => return Err(SequenceError::Complete),
        };
        if !self.next_available {
            return Err(SequenceError::NextUnavailable(step.id.short_name()));
        }

        self.skipped.remove(&self.active);
        self.active += 1;
        debug!("Advanced to step {}", self.active);
        self.apply_default_availability();
        Ok(())
    }

    /// Step back one. At the first step and in the terminal state this does
    /// nothing and returns `false`.
    pub fn retreat(&mut self) -> bool {
        if self.active == 0 || self.is_complete() {
            return false;
        }
        self.active -= 1;
        debug!("Retreated to step {}", self.active);
        self.apply_default_availability();
        true
    }

    pub fn skip(&mut self) -> Result<(), SequenceError> {
        let step = match self.active_step() {
            Some(step) => *step,
            None => return Err(SequenceError::Complete),
        };
        if !step.optional {
            return Err(SequenceError::NotOptional(step.id.short_name()));
        }

        self.skipped.insert(self.active);
        self.active += 1;
        debug!("Skipped {:?}, now at step {}", step.id, self.active);
        self.apply_default_availability();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.active = 0;
        self.skipped.clear();
        self.apply_default_availability();
    }
}
