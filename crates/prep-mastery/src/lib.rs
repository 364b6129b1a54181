//! Topic mastery arithmetic for NEET Prep
//!
//! This crate holds the pure, side-effect free rules shared by the server and
//! the device client: turning cumulative practice counters into an accuracy
//! and a three-level mastery label, merging new practice submissions into the
//! stored tally, and scoring a finished mock test.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accuracy (percent) for a topic to be considered [`Classification::Strong`].
pub const STRONG_THRESHOLD: u64 = 70;

/// Minimum accuracy (percent) for a topic to be considered [`Classification::NeedsRevision`].
pub const REVISION_THRESHOLD: u64 = 40;

/// Maximum marks of a full NEET paper; mock test scores are scaled to it.
pub const NEET_MAX_SCORE: f64 = 720.0;

/// Errors raised when counters cannot describe a valid accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MasteryError {
    /// No attempts were recorded, so accuracy is undefined.
    #[error("accuracy is undefined without any attempts")]
    NoAttempts,
    /// More correct answers than attempts.
    #[error("correct answers ({correct}) exceed total attempts ({total})")]
    CorrectExceedsTotal {
        /// Correct answers reported
        correct: u32,
        /// Total attempts reported
        total: u32,
    },
    /// Cumulative counters no longer fit in 32 bits.
    #[error("attempt counters overflowed")]
    Overflow,
}

/// Mastery label of a topic derived from cumulative accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// Accuracy of at least 70%
    Strong,
    /// Accuracy of at least 40% but below 70%
    #[serde(rename = "Needs Revision")]
    NeedsRevision,
    /// Accuracy below 40%
    Weak,
}

impl Classification {
    /// Classify an already computed accuracy percentage.
    ///
    /// `NaN` compares false against every threshold and therefore lands on
    /// [`Classification::Weak`]; prefer [`classify`] which rejects empty tallies.
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= STRONG_THRESHOLD as f64 {
            Self::Strong
        } else if accuracy >= REVISION_THRESHOLD as f64 {
            Self::NeedsRevision
        } else {
            Self::Weak
        }
    }

    /// Label used on the wire and in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::NeedsRevision => "Needs Revision",
            Self::Weak => "Weak",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Strong" => Ok(Self::Strong),
            "Needs Revision" | "NeedsRevision" => Ok(Self::NeedsRevision),
            "Weak" => Ok(Self::Weak),
            other => Err(format!("unknown classification: '{other}'")),
        }
    }
}

fn check_counts(correct: u32, total: u32) -> Result<(), MasteryError> {
    if total == 0 {
        return Err(MasteryError::NoAttempts);
    }
    if correct > total {
        return Err(MasteryError::CorrectExceedsTotal { correct, total });
    }
    Ok(())
}

/// Classify a topic from its cumulative counters.
///
/// # Arguments
///
/// * `correct` - Number of correctly answered questions
/// * `total` - Number of attempted questions, must be positive
///
/// # Returns
///
/// The mastery label. Thresholds are evaluated on exact integer arithmetic
/// (`correct * 100 >= 70 * total`) so `7/10` is always `Strong`.
///
/// # Errors
///
/// [`MasteryError::NoAttempts`] when `total` is zero and
/// [`MasteryError::CorrectExceedsTotal`] when the counters are inconsistent.
pub fn classify(correct: u32, total: u32) -> Result<Classification, MasteryError> {
    check_counts(correct, total)?;

    let scaled = u64::from(correct) * 100;
    let total = u64::from(total);

    let classification = if scaled >= STRONG_THRESHOLD * total {
        Classification::Strong
    } else if scaled >= REVISION_THRESHOLD * total {
        Classification::NeedsRevision
    } else {
        Classification::Weak
    };

    Ok(classification)
}

/// Accuracy percentage rounded to one decimal place.
///
/// # Errors
///
/// Same conditions as [`classify`].
pub fn accuracy(correct: u32, total: u32) -> Result<f64, MasteryError> {
    check_counts(correct, total)?;
    Ok(round_one_decimal(
        f64::from(correct) / f64::from(total) * 100.0,
    ))
}

/// Round to one decimal place, half away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Cumulative practice counters of one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTally {
    /// Correctly answered questions
    pub correct: u32,
    /// Attempted questions
    pub total: u32,
}

/// Derived view of a [`TopicTally`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MasterySummary {
    /// Accuracy in percent, one decimal
    pub accuracy: f64,
    /// Mastery label computed from the full counters
    pub classification: Classification,
}

impl TopicTally {
    /// Create a tally from raw counters.
    pub const fn new(correct: u32, total: u32) -> Self {
        Self { correct, total }
    }

    /// Merge a practice submission into this tally.
    ///
    /// Counters only ever grow; the merged tally is what accuracy and
    /// classification must be recomputed from.
    ///
    /// # Errors
    ///
    /// Rejects empty or inconsistent submissions and counter overflow.
    pub fn merge(self, submission: Self) -> Result<Self, MasteryError> {
        check_counts(submission.correct, submission.total)?;

        let correct = self
            .correct
            .checked_add(submission.correct)
            .ok_or(MasteryError::Overflow)?;
        let total = self
            .total
            .checked_add(submission.total)
            .ok_or(MasteryError::Overflow)?;

        Ok(Self { correct, total })
    }

    /// Accuracy and classification of the cumulative counters.
    ///
    /// # Errors
    ///
    /// Same conditions as [`classify`].
    pub fn summary(&self) -> Result<MasterySummary, MasteryError> {
        Ok(MasterySummary {
            accuracy: accuracy(self.correct, self.total)?,
            classification: classify(self.correct, self.total)?,
        })
    }
}

/// Score of a mock test scaled to [`NEET_MAX_SCORE`].
///
/// An empty test scores zero.
pub fn score_test(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(correct) / f64::from(total) * NEET_MAX_SCORE
}

/// Chapters whose in-test accuracy classifies as [`Classification::Weak`].
///
/// # Arguments
///
/// * `outcomes` - One `(chapter, answered_correctly)` pair per question
///
/// # Returns
///
/// Weak chapter names in the order they first appear in `outcomes`.
pub fn weak_chapters<I, S>(outcomes: I) -> Vec<String>
where
    I: IntoIterator<Item = (S, bool)>,
    S: AsRef<str>,
{
    let mut tallies: Vec<(String, TopicTally)> = Vec::new();

    for (chapter, is_correct) in outcomes {
        let chapter = chapter.as_ref();
        let index = match tallies.iter().position(|(name, _)| name == chapter) {
            Some(index) => index,
            None => {
                tallies.push((chapter.to_string(), TopicTally::default()));
                tallies.len() - 1
            }
        };
        let tally = &mut tallies[index].1;
        tally.total += 1;
        if is_correct {
            tally.correct += 1;
        }
    }

    tallies
        .into_iter()
        .filter(|(_, tally)| matches!(classify(tally.correct, tally.total), Ok(Classification::Weak)))
        .map(|(chapter, _)| chapter)
        .collect()
}
