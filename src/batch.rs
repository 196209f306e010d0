//! Splitting multi-line input into URLs to generate in bulk.

use tracing::warn;

use crate::error::{Error, Result};
use crate::validate::validate_url;

/// Caption width used for batch results.
pub const BATCH_CAPTION_LEN: usize = 30;

/// How many invalid URLs are named in the skip message.
const SKIPPED_PREVIEW: usize = 3;

/// URLs from a batch input, partitioned by validity and kept in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

impl BatchPlan {
    /// Message listing skipped URLs, or `None` when everything was valid.
    ///
    /// ```rust
    /// use urlqr::batch::parse_batch;
    ///
    /// let plan = parse_batch("https://example.com\nnope\nalso nope").unwrap();
    /// assert_eq!(
    ///     plan.skipped_message().unwrap(),
    ///     "Skipping 2 invalid URL(s): nope, also nope"
    /// );
    /// ```
    pub fn skipped_message(&self) -> Option<String> {
        if self.invalid.is_empty() {
            return None;
        }
        let listed: Vec<&str> = self
            .invalid
            .iter()
            .take(SKIPPED_PREVIEW)
            .map(String::as_str)
            .collect();
        let more = if self.invalid.len() > SKIPPED_PREVIEW {
            "..."
        } else {
            ""
        };
        Some(format!(
            "Skipping {} invalid URL(s): {}{}",
            self.invalid.len(),
            listed.join(", "),
            more
        ))
    }
}

/// Parses one URL per line. Lines are trimmed and blank lines ignored.
///
/// Returns [`Error::EmptyBatch`] when no non-blank line is present.
pub fn parse_batch(text: &str) -> Result<BatchPlan> {
    let mut plan = BatchPlan::default();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match validate_url(line) {
            Ok(()) => plan.valid.push(line.to_owned()),
            Err(err) => {
                warn!(url = line, %err, "skipping invalid batch entry");
                plan.invalid.push(line.to_owned());
            }
        }
    }
    if plan.valid.is_empty() && plan.invalid.is_empty() {
        return Err(Error::EmptyBatch);
    }
    Ok(plan)
}

/// File stem for the `n`th batch result, counting from 1.
pub fn batch_file_stem(n: usize) -> String {
    format!("qr_code_{n}")
}
