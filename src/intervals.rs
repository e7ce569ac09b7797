//! # Diatonic Interval Naming
//!
//! Names the diatonic interval between two spelled pitches in
//! quality-plus-number form: "P5", "M3", "m6", "A4", "d5", compound "M10".
//! Melodic intervals carry a direction, rendered as a leading "-" for
//! descending motion ("-M2" is a descending major second).
//!
//! The generic number comes from the letter-name distance (C→E is always
//! some kind of third, however the notes are altered); the quality comes
//! from the chromatic distance measured against the major/perfect baseline
//! for that generic size.

use std::fmt;

use crate::score::Pitch;

/// Semitones in the major/perfect interval for each simple generic size
/// (unison through seventh).
const MAJOR_SCALE_SEMITONES: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Interval quality. Augmented and diminished carry a degree so doubly
/// altered spellings ("AA4", "dd7") still get a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Perfect,
    Major,
    Minor,
    Augmented(u8),
    Diminished(u8),
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Perfect => write!(f, "P"),
            Quality::Major => write!(f, "M"),
            Quality::Minor => write!(f, "m"),
            Quality::Augmented(degree) => {
                for _ in 0..*degree {
                    write!(f, "A")?;
                }
                Ok(())
            }
            Quality::Diminished(degree) => {
                for _ in 0..*degree {
                    write!(f, "d")?;
                }
                Ok(())
            }
        }
    }
}

/// An unsigned diatonic interval, e.g. the harmonic interval between two
/// simultaneous notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub quality: Quality,
    /// Generic number, 1 = unison. Compound intervals keep their full
    /// number (an octave plus a third is 10).
    pub number: u16,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quality, self.number)
    }
}

/// A diatonic interval with melodic direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectedInterval {
    pub interval: Interval,
    pub descending: bool,
}

impl fmt::Display for DirectedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-")?;
        }
        write!(f, "{}", self.interval)
    }
}

/// Compute quality and number for a letter-step distance and a chromatic
/// distance, both already folded to the ascending sense.
fn classify(steps: i32, semitones: i32) -> Interval {
    let simple = (steps % 7) as usize;
    let octaves = steps / 7;
    let expected = MAJOR_SCALE_SEMITONES[simple] + 12 * octaves;
    let diff = semitones - expected;
    // Unisons, fourths, fifths (and their compounds) are the perfect class.
    let perfect_class = matches!(simple, 0 | 3 | 4);

    let quality = if diff > 0 {
        Quality::Augmented(diff as u8)
    } else if perfect_class {
        if diff == 0 {
            Quality::Perfect
        } else {
            Quality::Diminished((-diff) as u8)
        }
    } else {
        match diff {
            0 => Quality::Major,
            -1 => Quality::Minor,
            d => Quality::Diminished((-d - 1) as u8),
        }
    };

    Interval {
        quality,
        number: (steps + 1) as u16,
    }
}

/// The unsigned interval between two pitches, in either order.
pub fn interval_between(a: &Pitch, b: &Pitch) -> Interval {
    directed_interval(a, b).interval
}

/// The directed interval from `a` to `b`. Direction follows the letter-name
/// distance; for chromatic unisons (C4→C#4) it follows the semitone sign.
pub fn directed_interval(a: &Pitch, b: &Pitch) -> DirectedInterval {
    let steps = b.diatonic_index() - a.diatonic_index();
    let semitones = b.midi() - a.midi();
    let descending = steps < 0 || (steps == 0 && semitones < 0);
    let (steps, semitones) = if descending {
        (-steps, -semitones)
    } else {
        (steps, semitones)
    };
    DirectedInterval {
        interval: classify(steps, semitones),
        descending,
    }
}
