//! # Bigram Construction and Interval Annotation
//!
//! Pairs consecutive onsets into overlapping bigrams and names the four
//! intervals of each pair: the harmonic interval at each end (H1, H2) and
//! the melodic interval each voice traverses (Mbass, Msoprano).
//!
//! Degenerate cases never fail. A harmonic field is "-" when either side
//! is a rest. A melodic field is "X" when the voice enters from silence
//! and "-" when it goes to (or stays in) silence; only note-to-note motion
//! gets a directed interval name.

use std::fmt;

use crate::intervals::{directed_interval, interval_between, DirectedInterval, Interval};
use crate::onsets::Onset;
use crate::score::{NoteEvent, Ticks};

/// Two temporally adjacent onsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Bigram {
    pub first: Onset,
    pub second: Onset,
}

/// Pair consecutive onsets: `n` onsets yield `max(n − 1, 0)` bigrams, in
/// order, with no filtering.
pub fn build_bigrams(onsets: &[Onset]) -> Vec<Bigram> {
    onsets
        .windows(2)
        .map(|pair| Bigram {
            first: pair[0].clone(),
            second: pair[1].clone(),
        })
        .collect()
}

/// A harmonic interval field: a name, or "-" when a rest is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmonicField {
    Silent,
    Interval(Interval),
}

impl fmt::Display for HarmonicField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarmonicField::Silent => write!(f, "-"),
            HarmonicField::Interval(interval) => write!(f, "{}", interval),
        }
    }
}

/// A melodic interval field: a directed name, or a placeholder for motion
/// into ("X") or out of ("-") silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MelodicField {
    FromSilence,
    ToSilence,
    Interval(DirectedInterval),
}

impl fmt::Display for MelodicField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MelodicField::FromSilence => write!(f, "X"),
            MelodicField::ToSilence => write!(f, "-"),
            MelodicField::Interval(interval) => write!(f, "{}", interval),
        }
    }
}

/// The four named intervals of a bigram. Doubles as the aggregation key;
/// the rendered form `"(H1 [Mbass Msoprano] H2)"` is only produced at
/// report time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalDescriptor {
    pub h1: HarmonicField,
    pub m_bass: MelodicField,
    pub m_soprano: MelodicField,
    pub h2: HarmonicField,
}

impl fmt::Display for IntervalDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} [{} {}] {})",
            self.h1, self.m_bass, self.m_soprano, self.h2
        )
    }
}

/// A descriptor with the bigram's position, ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBigram {
    pub start: Ticks,
    pub end: Ticks,
    pub descriptor: IntervalDescriptor,
}

fn harmonic(bass: &NoteEvent, soprano: &NoteEvent) -> HarmonicField {
    match (bass.pitch(), soprano.pitch()) {
        (Some(b), Some(s)) => HarmonicField::Interval(interval_between(b, s)),
        _ => HarmonicField::Silent,
    }
}

fn melodic(from: &NoteEvent, to: &NoteEvent) -> MelodicField {
    if from.is_rest() && !to.is_rest() {
        return MelodicField::FromSilence;
    }
    match (from.pitch(), to.pitch()) {
        (Some(a), Some(b)) => MelodicField::Interval(directed_interval(a, b)),
        _ => MelodicField::ToSilence,
    }
}

/// Name the four intervals of a bigram. Total over well-formed bigrams:
/// rests are absorbed by the placeholder rules, never measured against.
pub fn annotate(bigram: &Bigram) -> IntervalDescriptor {
    IntervalDescriptor {
        h1: harmonic(&bigram.first.bass, &bigram.first.soprano),
        m_bass: melodic(&bigram.first.bass, &bigram.second.bass),
        m_soprano: melodic(&bigram.first.soprano, &bigram.second.soprano),
        h2: harmonic(&bigram.second.bass, &bigram.second.soprano),
    }
}

/// Annotate a whole bigram sequence, carrying each bigram's offsets along.
pub fn annotate_all(bigrams: &[Bigram]) -> Vec<AnnotatedBigram> {
    bigrams
        .iter()
        .map(|bigram| AnnotatedBigram {
            start: bigram.first.offset,
            end: bigram.second.offset,
            descriptor: annotate(bigram),
        })
        .collect()
}
