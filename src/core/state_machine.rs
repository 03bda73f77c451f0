//! State machine for tracking the staged publishing workflow
//!
//! The sequential hook-then-publish-then-cleanup chain is expressed as an
//! explicit state sequence so the "never publish after a failed hook" and
//! "always attempt cleanup" invariants stay mechanically checkable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publishing pipeline state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishState {
    Initial,
    Staged,
    ManifestWritten,
    DocsTrimmed,
    CommentsStripped,
    HookRun,
    Published,
    Aborted,
    CleanedUp,
}

impl PublishState {
    /// Get string representation of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishState::Initial => "INITIAL",
            PublishState::Staged => "STAGED",
            PublishState::ManifestWritten => "MANIFEST_WRITTEN",
            PublishState::DocsTrimmed => "DOCS_TRIMMED",
            PublishState::CommentsStripped => "COMMENTS_STRIPPED",
            PublishState::HookRun => "HOOK_RUN",
            PublishState::Published => "PUBLISHED",
            PublishState::Aborted => "ABORTED",
            PublishState::CleanedUp => "CLEANED_UP",
        }
    }
}

/// State transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateTransition {
    /// From state
    pub from: PublishState,

    /// To state
    pub to: PublishState,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

/// State machine for tracking the staging pipeline of a single run
#[derive(Debug)]
pub struct PublishStateMachine {
    current_state: PublishState,
    transitions: Vec<StateTransition>,
}

impl Default for PublishStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishStateMachine {
    /// Create a new state machine in the initial state
    pub fn new() -> Self {
        Self {
            current_state: PublishState::Initial,
            transitions: Vec::new(),
        }
    }

    /// Transition to a new state
    pub fn transition(&mut self, to: PublishState) {
        self.transitions.push(StateTransition {
            from: self.current_state,
            to,
            timestamp: Utc::now(),
        });
        self.current_state = to;
    }

    /// Get current state
    pub fn state(&self) -> PublishState {
        self.current_state
    }

    /// Get recorded transitions
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// Check if the pipeline reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state(),
            PublishState::Aborted | PublishState::CleanedUp
        )
    }

    /// Get elapsed time between first and last transition in milliseconds
    pub fn elapsed_ms(&self) -> i64 {
        if self.transitions.is_empty() {
            return 0;
        }

        let first = &self.transitions[0];
        let last = &self.transitions[self.transitions.len() - 1];

        (last.timestamp - first.timestamp).num_milliseconds()
    }

    /// Get transition history as human-readable string
    pub fn history(&self) -> String {
        self.transitions
            .iter()
            .map(|t| {
                format!(
                    "{}: {} → {}",
                    t.timestamp.to_rfc3339(),
                    t.from.as_str(),
                    t.to.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
