pub mod aggregate;
pub mod bigram;
pub mod config;
pub mod error;
pub mod intervals;
pub mod kern;
pub mod onsets;
pub mod report;
pub mod score;

pub use aggregate::{BigramAggregate, Occurrence};
pub use bigram::{annotate, annotate_all, build_bigrams, AnnotatedBigram, Bigram, IntervalDescriptor};
pub use config::{RawConfig, RunConfig};
pub use error::BigramError;
pub use kern::parse;
pub use onsets::{extract_onsets, Onset, DEFAULT_RESOLUTION};
pub use report::{report_all, report_unique, ReportOptions};
pub use score::{NoteEvent, Pitch, Score, Step, Ticks, TICKS_PER_QUARTER};

/// Run the full per-file pipeline over a **kern source: parse, sample
/// onsets, pair bigrams, annotate intervals.
/// This is the main entry point for the library.
pub fn analyze(source: &str, resolution: Ticks) -> Result<Vec<AnnotatedBigram>, BigramError> {
    let score = kern::parse(source)?;
    analyze_score(&score, resolution)
}

/// Same pipeline for an already-parsed score.
pub fn analyze_score(score: &Score, resolution: Ticks) -> Result<Vec<AnnotatedBigram>, BigramError> {
    let onsets = extract_onsets(score, resolution)?;
    let bigrams = build_bigrams(&onsets);
    Ok(annotate_all(&bigrams))
}
