//! # Score Model
//!
//! Data model for a parsed two-voice (or more) score: pitches, note/rest
//! events, per-voice timelines, and the integer tick time base.
//!
//! ## Time base
//! All offsets and durations are integer ticks with 960 ticks per quarter
//! note. Tuplet durations (a triplet eighth is 320 ticks) stay exact, so
//! the onset extractor can match grid offsets with plain equality instead
//! of comparing floats. Offsets are converted back to quarter-note floats
//! only when a report is rendered.
//!
//! ## Voice order
//! `Score::voices` is stored top-down: `voices[0]` is the soprano (the
//! rightmost **kern spine) and `voices[last]` is the bass. Multi-staff
//! sources enumerate spines left-to-right in score order but we store them
//! right-to-left, so the outer-voice accessors stay index-stable.

use std::fmt;

/// Integer time in ticks. Signed so the sentinel onset can sit at −1 quarter.
pub type Ticks = i64;

/// Ticks per quarter note. 960 divides evenly for duplets through
/// quintuplets and every dotted value the parser can produce.
pub const TICKS_PER_QUARTER: Ticks = 960;

/// Convert a quarter-note length (e.g. a CLI `--resolution 0.5`) to ticks.
pub fn quarters_to_ticks(quarters: f64) -> Ticks {
    (quarters * TICKS_PER_QUARTER as f64).round() as Ticks
}

/// Letter class C through B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Step {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// Position within the diatonic octave: C=0 .. B=6.
    pub fn ordinal(self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 1,
            Step::E => 2,
            Step::F => 3,
            Step::G => 4,
            Step::A => 5,
            Step::B => 6,
        }
    }

    /// Semitones above C for the natural letter.
    pub fn semitones(self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 2,
            Step::E => 4,
            Step::F => 5,
            Step::G => 7,
            Step::A => 9,
            Step::B => 11,
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Step::C),
            'D' => Some(Step::D),
            'E' => Some(Step::E),
            'F' => Some(Step::F),
            'G' => Some(Step::G),
            'A' => Some(Step::A),
            'B' => Some(Step::B),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Step::C => 'C',
            Step::D => 'D',
            Step::E => 'E',
            Step::F => 'F',
            Step::G => 'G',
            Step::A => 'A',
            Step::B => 'B',
        }
    }
}

/// A spelled pitch: letter class, chromatic alteration, scientific octave.
/// C4 is middle C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub step: Step,
    pub alter: i8,
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: Step, alter: i8, octave: i8) -> Self {
        Self { step, alter, octave }
    }

    /// MIDI note number (C4 = 60). Spellings outside 0..=127 are still
    /// computed; only playback would need to clamp, and we never play.
    pub fn midi(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.step.semitones() + self.alter as i32
    }

    /// Position on the diatonic staff-step line: octave * 7 + letter ordinal.
    /// The difference of two indices is the generic interval size in steps.
    pub fn diatonic_index(&self) -> i32 {
        self.octave as i32 * 7 + self.step.ordinal()
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step.letter())?;
        if self.alter > 0 {
            for _ in 0..self.alter {
                write!(f, "#")?;
            }
        } else {
            for _ in 0..-self.alter {
                write!(f, "b")?;
            }
        }
        write!(f, "{}", self.octave)
    }
}

/// One element of a voice timeline.
///
/// `Chord` exists so the onset extractor can recognize a multi-note onset
/// and exclude it (a sampled instant with more than one simultaneous note
/// per voice is "no onset", never an error). Chords never reach a bigram.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteEvent {
    Note {
        pitch: Pitch,
        offset: Ticks,
        duration: Ticks,
    },
    Rest {
        offset: Ticks,
        duration: Ticks,
    },
    Chord {
        pitches: Vec<Pitch>,
        offset: Ticks,
        duration: Ticks,
    },
}

impl NoteEvent {
    pub fn offset(&self) -> Ticks {
        match self {
            NoteEvent::Note { offset, .. }
            | NoteEvent::Rest { offset, .. }
            | NoteEvent::Chord { offset, .. } => *offset,
        }
    }

    pub fn duration(&self) -> Ticks {
        match self {
            NoteEvent::Note { duration, .. }
            | NoteEvent::Rest { duration, .. }
            | NoteEvent::Chord { duration, .. } => *duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, NoteEvent::Rest { .. })
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, NoteEvent::Chord { .. })
    }

    /// The single pitch of a `Note`; `None` for rests and chords.
    pub fn pitch(&self) -> Option<&Pitch> {
        match self {
            NoteEvent::Note { pitch, .. } => Some(pitch),
            _ => None,
        }
    }
}

/// An ordered timeline of events for one voice.
/// Invariant: offsets are non-decreasing (the parser advances a running
/// position per spine, so this holds by construction).
#[derive(Debug, Clone, Default)]
pub struct Voice {
    pub events: Vec<NoteEvent>,
}

impl Voice {
    pub fn last_offset(&self) -> Option<Ticks> {
        self.events.last().map(|e| e.offset())
    }
}

/// A parsed score: one or more voices, stored top-down (soprano first).
#[derive(Debug, Clone, Default)]
pub struct Score {
    pub voices: Vec<Voice>,
}

impl Score {
    /// The upper outer voice: first declared.
    pub fn soprano(&self) -> Option<&Voice> {
        self.voices.first()
    }

    /// The lower outer voice: last declared.
    pub fn bass(&self) -> Option<&Voice> {
        self.voices.last()
    }

    /// Offset of the last event anywhere in the score, the upper bound of
    /// the sampling grid.
    pub fn last_offset(&self) -> Option<Ticks> {
        self.voices.iter().filter_map(|v| v.last_offset()).max()
    }
}
