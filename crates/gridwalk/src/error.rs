//! Error type shared by every traversal in the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input could not be parsed into the expected shape.
    #[error("Format error on line {line}: {message}")]
    Format { line: usize, message: String },

    /// A position outside the grid was dereferenced.
    #[error("Position ({row}, {col}) is out of bounds")]
    OutOfBounds { row: i32, col: i32 },

    /// Ordering rules among these pages contradict each other.
    #[error("Ordering rules form a cycle among pages {pages:?}")]
    Cycle { pages: Vec<u32> },

    /// Too many operator assignments to enumerate.
    #[error("Equation {target} has {slots} operator slots, too many to search")]
    SearchSpace { target: u64, slots: usize },

    /// A value left the `u64` range.
    #[error("Stone {value} overflows when multiplied")]
    Overflow { value: u64 },
}

impl Error {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Error::Format {
            line,
            message: message.into(),
        }
    }
}

