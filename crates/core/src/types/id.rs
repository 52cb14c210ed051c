//! Positional identifiers.

use serde::{Deserialize, Serialize};

/// 1-based row position of an item in the cart table.
///
/// Row 0 of the cart table is the header, so the n-th product added lands in
/// row n. Zero is not a valid position.
///
/// ```
/// use automation_exercise_core::CartPosition;
///
/// assert_eq!(CartPosition::from_index(0).get(), 1);
/// assert_eq!(CartPosition::from_index(2).row_index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartPosition(u32);

impl CartPosition {
    /// Position of the product at a 0-based listing index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self(index as u32 + 1)
    }

    /// The 1-based value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The row index in the cart table (header is row 0).
    #[must_use]
    pub const fn row_index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for CartPosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
