use thiserror::Error;

/// An error raised by a [`Ring`] operation or by [`Rules`] validation.
///
/// Every variant describes a violated precondition, so none of them is
/// worth retrying: the caller has to change the input.
///
/// [`Ring`]: `crate::Ring`
/// [`Rules`]: `crate::Rules`
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /// A removal was requested from a ring that has fewer than two nodes,
    /// so there is no node distinct from the one that must remain.
    #[error("cannot remove a node from a ring of {len} node(s)")]
    Underflow {
        /// The number of nodes in the ring when the removal was attempted.
        len: usize,
    },
    /// The game was configured without any players.
    #[error("the number of players must be positive")]
    NoPlayers,
    /// The game was configured to play no marbles at all.
    #[error("the value of the last marble must be positive")]
    NoMarbles,
    /// The game was configured to remove a marble every zeroth turn.
    #[error("the removal cadence must be positive")]
    ZeroCadence,
    /// Scaling the value of the last marble does not fit in a `u64`.
    #[error("the value of the last marble overflows when scaled by {factor}")]
    Overflow {
        /// The factor that was applied.
        factor: u64,
    },
}

/// An error raised when parsing [`Rules`] from a puzzle description.
///
/// [`Rules`]: `crate::Rules`
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ParseRulesError {
    /// The text does not have the shape
    /// `"<players> players; last marble is worth <points> points"`.
    #[error("expected \"<players> players; last marble is worth <points> points\", found {0:?}")]
    Malformed(String),
    /// One of the two numbers in the description is not a valid integer.
    #[error("invalid {what} {text:?}")]
    InvalidNumber {
        /// Which number was being parsed.
        what: &'static str,
        /// The offending text.
        text: String,
    },
    /// The description was well formed, but the rules it states are not.
    #[error(transparent)]
    Invalid(#[from] Error),
}
