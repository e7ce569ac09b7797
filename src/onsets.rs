//! # Onset Extraction
//!
//! Samples a score's outer voices on a fixed grid and folds the samples
//! into a sequence of simultaneous `(offset, bass, soprano)` onsets.
//!
//! The rest-inclusive policy is used throughout: the running pair starts
//! as `(Rest, Rest)`, the sequence opens with a sentinel onset at −1
//! quarter ("nothing sounding yet"), and a grid point is recorded whenever
//! at least one voice has exactly one fresh onset there, rests included.
//! A voice reporting a chord, or more than one event, at the sampled tick
//! contributes no onset that step.

use crate::error::BigramError;
use crate::score::{NoteEvent, Score, Ticks, Voice, TICKS_PER_QUARTER};

/// Default sampling step: an eighth note, half a quarter.
pub const DEFAULT_RESOLUTION: Ticks = TICKS_PER_QUARTER / 2;

/// One sampled instant: what the bass and soprano are doing at `offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Onset {
    pub offset: Ticks,
    pub bass: NoteEvent,
    pub soprano: NoteEvent,
}

/// Forward-only scan over a voice timeline. Grid offsets increase
/// monotonically and event offsets are non-decreasing, so each event is
/// visited once across the whole extraction.
struct Cursor<'a> {
    events: &'a [NoteEvent],
    next: usize,
}

impl<'a> Cursor<'a> {
    fn new(voice: &'a Voice) -> Self {
        Self {
            events: &voice.events,
            next: 0,
        }
    }

    /// The single qualifying event starting exactly at `offset`, if any.
    /// Chords are dropped first; two remaining events at the same tick
    /// mean "no onset" rather than an error.
    fn sole_onset_at(&mut self, offset: Ticks) -> Option<&'a NoteEvent> {
        while self.next < self.events.len() && self.events[self.next].offset() < offset {
            self.next += 1;
        }
        let mut found = None;
        let mut i = self.next;
        while i < self.events.len() && self.events[i].offset() == offset {
            if !self.events[i].is_chord() {
                if found.is_some() {
                    return None;
                }
                found = Some(&self.events[i]);
            }
            i += 1;
        }
        found
    }
}

/// Extract the onset sequence for a score at the given grid step.
///
/// The grid runs from 0 up to and including `last_offset + resolution`;
/// events are matched by exact onset tick, never by interval containment,
/// so held notes do not re-trigger. Fails with [`BigramError::EmptyVoice`]
/// when an outer voice has no timeline at all.
pub fn extract_onsets(score: &Score, resolution: Ticks) -> Result<Vec<Onset>, BigramError> {
    assert!(resolution > 0, "resolution must be positive");

    let soprano = score
        .soprano()
        .filter(|v| !v.events.is_empty())
        .ok_or(BigramError::EmptyVoice { voice: "soprano" })?;
    let bass = score
        .bass()
        .filter(|v| !v.events.is_empty())
        .ok_or(BigramError::EmptyVoice { voice: "bass" })?;
    let last_offset = score
        .last_offset()
        .ok_or(BigramError::EmptyVoice { voice: "score" })?;

    let sentinel_rest = NoteEvent::Rest {
        offset: -TICKS_PER_QUARTER,
        duration: 0,
    };
    let mut current_bass = sentinel_rest.clone();
    let mut current_soprano = sentinel_rest.clone();
    let mut onsets = vec![Onset {
        offset: -TICKS_PER_QUARTER,
        bass: current_bass.clone(),
        soprano: current_soprano.clone(),
    }];

    let mut bass_cursor = Cursor::new(bass);
    let mut soprano_cursor = Cursor::new(soprano);

    let mut offset: Ticks = 0;
    while offset <= last_offset + resolution {
        let b = bass_cursor.sole_onset_at(offset);
        let s = soprano_cursor.sole_onset_at(offset);
        if b.is_some() || s.is_some() {
            if let Some(event) = b {
                current_bass = event.clone();
            }
            if let Some(event) = s {
                current_soprano = event.clone();
            }
            onsets.push(Onset {
                offset,
                bass: current_bass.clone(),
                soprano: current_soprano.clone(),
            });
        }
        offset += resolution;
    }

    Ok(onsets)
}
