//! Per-feature classification states.
//!
//! Every feature that ends up in a spreadsheet cell after validation is in
//! exactly one [`PegState`]. The offending functional assignment travels with
//! the state in [`FeatureStatus`] and is present only for [`PegState::BadRole`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// The state of a feature in one subsystem cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PegState {
    /// Claimed by the cell and its assignment matches the column.
    Good,
    /// Claimed by the cell but no usable assignment was found for it.
    Missing,
    /// Not claimed by the cell, yet its assignment matches the column.
    Disconnected,
    /// Claimed by the cell but assigned a function that does not match.
    BadRole,
}

impl PegState {
    /// All states, in tally order.
    pub const ALL: [PegState; 4] = [
        PegState::Good,
        PegState::Missing,
        PegState::Disconnected,
        PegState::BadRole,
    ];

    /// Position of this state in a per-state tally array.
    pub fn index(self) -> usize {
        match self {
            PegState::Good => 0,
            PegState::Missing => 1,
            PegState::Disconnected => 2,
            PegState::BadRole => 3,
        }
    }

    /// True for every state that counts against subsystem health.
    pub fn is_error(self) -> bool {
        self != PegState::Good
    }
}

impl fmt::Display for PegState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PegState::Good => "good",
            PegState::Missing => "missing",
            PegState::Disconnected => "disconnected",
            PegState::BadRole => "bad role",
        };
        f.write_str(name)
    }
}

/// The status of one feature in one cell.
///
/// `function` is `Some` exactly when `state` is [`PegState::BadRole`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStatus {
    state: PegState,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    function: Option<String>,
}

impl FeatureStatus {
    /// A freshly claimed feature: [`PegState::Missing`] until validation finds it.
    pub fn new() -> Self {
        FeatureStatus {
            state: PegState::Missing,
            function: None,
        }
    }

    /// A matching feature the cell never claimed.
    pub fn disconnected() -> Self {
        FeatureStatus {
            state: PegState::Disconnected,
            function: None,
        }
    }

    /// Moves this status to a new state.
    ///
    /// The function is retained only for [`PegState::BadRole`]; every other
    /// state clears it.
    pub fn set_state(&mut self, state: PegState, function: &str) {
        self.state = state;
        self.function = (state == PegState::BadRole).then(|| function.to_string());
    }

    pub fn state(&self) -> PegState {
        self.state
    }

    /// The offending assignment, present only in the bad-role state.
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

impl Default for FeatureStatus {
    fn default() -> Self {
        Self::new()
    }
}
