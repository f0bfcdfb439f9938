//! Board errors.

use thiserror::Error;

use crate::coord::HexCoord;

/// Errors raised by explicit board edits.
///
/// Oracle mutations used during resolution (`ignite`, `extinguish`,
/// `deliver_smoke`) report "nothing happened" through their return value
/// instead; only setup-time edits can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The coordinate is not on this board.
    #[error("hex {0} is off the board ({1}x{2})")]
    OffBoard(HexCoord, u32, u32),
}
