//! Error types for sitefix.

use thiserror::Error;

/// Error type for sitefix operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Offsets string length is not a multiple of the token width
    #[error("offsets string length {0} is not a multiple of the token width")]
    OffsetLength(usize),

    /// Offsets token is not a base-36 integer
    #[error("offsets token {0:?} is not a base-36 integer")]
    OffsetToken(String),

    /// Decoded offsets are not non-decreasing
    #[error("offsets decrease at token {0}")]
    OffsetOrder(usize),

    /// Offset value too large for the fixed token width
    #[error("offset {0} does not fit in a fixed-width token")]
    OffsetOverflow(usize),

    /// Offsets sentinel does not match the rule text length
    #[error("offsets sentinel {sentinel} does not match rule text length {text_len}")]
    OffsetSentinel { sentinel: usize, text_len: usize },

    /// The index references a section the offsets table does not cover
    #[error("section index {index} out of range ({sections} sections)")]
    SectionOutOfRange { index: usize, sections: usize },

    /// The index has no generic label entry
    #[error("rule index has no generic label entry")]
    MissingGenericLabel,

    /// Section span does not lie inside the rule text
    #[error("section {index} span is not valid for the rule text")]
    SectionSpan { index: usize },

    /// Selector line with no active directive header
    #[error("selector with no directive header in section {section}, line {line}")]
    Parse { section: usize, line: usize },

    /// Invalid color literal
    #[error("invalid color literal: {0}")]
    InvalidColor(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sitefix operations.
pub type Result<T> = std::result::Result<T, Error>;
