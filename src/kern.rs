//! # Humdrum **kern Parser
//!
//! A minimal **kern reader covering the subset that two-voice outer-voice
//! reductions actually use: tab-separated spines, recip durations (with
//! dots and tuplet values), kern octave spelling, accidentals, rests,
//! chords, ties and barlines.
//!
//! ## Supported
//! - `**kern` exclusive interpretations; non-kern spines (`**harm`,
//!   `**dynam`, ...) are parsed past and dropped
//! - `!` comment lines, `=` barline lines, `.` null tokens
//! - recip `0` (breve) and `00` (longa), dotted values, tuplet divisors
//! - chords (space-separated subtokens) — kept as [`NoteEvent::Chord`] so
//!   the onset extractor can exclude them
//! - tied notes stay separate events, each at its own offset; a tie
//!   continuation therefore counts as a fresh onset downstream
//! - grace notes (`q`/`Q`, no meaningful duration) are skipped
//!
//! ## Not supported
//! Spine manipulation (`*^`, `*v`, `*x`, `*+`) is a [`BigramError::ParseError`];
//! a score whose voice count changes mid-piece has no stable outer voices.
//!
//! Spines are declared bass-to-soprano left-to-right, and stored reversed
//! so that `Score::voices[0]` is the soprano. See the `score` module.

use crate::error::BigramError;
use crate::score::{NoteEvent, Pitch, Score, Step, Ticks, Voice, TICKS_PER_QUARTER};

/// Per-spine accumulator while walking data lines.
struct Spine {
    is_kern: bool,
    position: Ticks,
    events: Vec<NoteEvent>,
}

/// Parse a complete **kern source into a [`Score`].
pub fn parse(source: &str) -> Result<Score, BigramError> {
    let mut spines: Option<Vec<Spine>> = None;

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        if line.is_empty() || line.starts_with('!') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();

        if fields[0].starts_with("**") {
            if spines.is_some() {
                return Err(BigramError::ParseError {
                    line: line_no,
                    message: "second exclusive interpretation line".to_string(),
                });
            }
            spines = Some(
                fields
                    .iter()
                    .map(|f| Spine {
                        is_kern: *f == "**kern",
                        position: 0,
                        events: Vec::new(),
                    })
                    .collect(),
            );
            continue;
        }

        let Some(spines) = spines.as_mut() else {
            return Err(BigramError::ParseError {
                line: line_no,
                message: format!("data before exclusive interpretation: '{}'", line),
            });
        };

        if fields[0].starts_with('*') {
            for field in &fields {
                if matches!(*field, "*^" | "*v" | "*x" | "*+") {
                    return Err(BigramError::ParseError {
                        line: line_no,
                        message: format!("spine manipulation '{}' is not supported", field),
                    });
                }
            }
            // Clefs, key signatures, meters, terminators: nothing to keep.
            continue;
        }

        if fields[0].starts_with('=') {
            continue;
        }

        if fields.len() != spines.len() {
            return Err(BigramError::ParseError {
                line: line_no,
                message: format!(
                    "expected {} spine tokens, found {}",
                    spines.len(),
                    fields.len()
                ),
            });
        }

        for (spine, token) in spines.iter_mut().zip(&fields) {
            if !spine.is_kern || *token == "." {
                continue;
            }
            if let Some(event) = parse_token(token, spine.position, line_no)? {
                spine.position += event.duration();
                spine.events.push(event);
            }
        }
    }

    let Some(spines) = spines else {
        return Err(BigramError::ParseError {
            line: 1,
            message: "no exclusive interpretation line found".to_string(),
        });
    };

    // File order is bass..soprano; the score stores voices top-down.
    let voices: Vec<Voice> = spines
        .into_iter()
        .filter(|s| s.is_kern)
        .map(|s| Voice { events: s.events })
        .rev()
        .collect();

    if voices.is_empty() {
        return Err(BigramError::ParseError {
            line: 1,
            message: "no **kern spines in source".to_string(),
        });
    }

    Ok(Score { voices })
}

/// Parse one spine token into an event at `offset`, or `None` for tokens
/// that carry no timeline weight (grace notes).
fn parse_token(
    token: &str,
    offset: Ticks,
    line_no: usize,
) -> Result<Option<NoteEvent>, BigramError> {
    let mut duration: Option<Ticks> = None;
    let mut pitches = Vec::new();
    let mut is_rest = false;

    for subtoken in token.split_whitespace() {
        if subtoken.contains('q') || subtoken.contains('Q') {
            continue;
        }
        let ticks = parse_recip(subtoken, line_no)?;
        // Chord subtokens share a duration; the first one wins.
        duration.get_or_insert(ticks);
        if subtoken.contains('r') {
            is_rest = true;
        } else {
            pitches.push(parse_pitch(subtoken, line_no)?);
        }
    }

    let Some(duration) = duration else {
        // Every subtoken was a grace note.
        return Ok(None);
    };

    let event = if is_rest {
        NoteEvent::Rest { offset, duration }
    } else if pitches.len() > 1 {
        NoteEvent::Chord {
            pitches,
            offset,
            duration,
        }
    } else {
        NoteEvent::Note {
            pitch: pitches[0],
            offset,
            duration,
        }
    };
    Ok(Some(event))
}

/// Duration in ticks from a token's recip digits and augmentation dots.
/// `4` = quarter, `8.` = dotted eighth, `12` = triplet eighth, `0` = breve,
/// `00` = longa.
fn parse_recip(subtoken: &str, line_no: usize) -> Result<Ticks, BigramError> {
    let digits: String = subtoken.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(BigramError::ParseError {
            line: line_no,
            message: format!("token '{}' has no duration", subtoken),
        });
    }

    let whole = 4 * TICKS_PER_QUARTER;
    let base = if digits.chars().all(|c| c == '0') {
        // 0 = breve (two wholes), 00 = longa (four wholes), ...
        whole * (1i64 << digits.len())
    } else {
        let value: Ticks = digits.parse().map_err(|_| BigramError::ParseError {
            line: line_no,
            message: format!("bad duration in token '{}'", subtoken),
        })?;
        if whole % value == 0 {
            whole / value
        } else {
            // Odd tuplet divisor: round to the nearest tick.
            (whole as f64 / value as f64).round() as Ticks
        }
    };

    let dots = subtoken.chars().filter(|c| *c == '.').count();
    let mut total = base;
    let mut add = base / 2;
    for _ in 0..dots {
        total += add;
        add /= 2;
    }
    Ok(total)
}

/// Pitch from a kern note subtoken: `c` = C4, `cc` = C5, `C` = C3, `CC` = C2,
/// with `#`/`-` accidentals and `n` naturals. Beam, stem, slur, tie and
/// ornament characters are ignored.
fn parse_pitch(subtoken: &str, line_no: usize) -> Result<Pitch, BigramError> {
    let mut letter: Option<char> = None;
    let mut count: i32 = 0;
    for c in subtoken.chars() {
        if !('a'..='g').contains(&c.to_ascii_lowercase()) {
            continue;
        }
        match letter {
            None => {
                letter = Some(c);
                count = 1;
            }
            Some(prev) if prev == c => count += 1,
            Some(prev) => {
                return Err(BigramError::ParseError {
                    line: line_no,
                    message: format!(
                        "mixed pitch letters '{}' and '{}' in token '{}'",
                        prev, c, subtoken
                    ),
                });
            }
        }
    }

    let Some(letter) = letter else {
        return Err(BigramError::ParseError {
            line: line_no,
            message: format!("token '{}' has no pitch", subtoken),
        });
    };

    let step = Step::from_letter(letter).ok_or_else(|| BigramError::ParseError {
        line: line_no,
        message: format!("bad pitch letter '{}' in token '{}'", letter, subtoken),
    })?;

    let octave = if letter.is_ascii_lowercase() {
        3 + count
    } else {
        4 - count
    };

    let sharps = subtoken.chars().filter(|c| *c == '#').count() as i8;
    let flats = subtoken.chars().filter(|c| *c == '-').count() as i8;
    let alter = sharps - flats;

    Ok(Pitch::new(step, alter, octave as i8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_voice_score() {
        let source = "**kern\t**kern\n*clefF4\t*clefG2\n=1\t=1\n4C\t4c\n4D\t4d\n*-\t*-\n";
        let score = parse(source).unwrap();
        assert_eq!(score.voices.len(), 2);
        // Right spine becomes the soprano.
        let soprano = score.soprano().unwrap();
        assert_eq!(
            soprano.events[0].pitch().unwrap(),
            &Pitch::new(Step::C, 0, 4)
        );
        let bass = score.bass().unwrap();
        assert_eq!(bass.events[0].pitch().unwrap(), &Pitch::new(Step::C, 0, 3));
        assert_eq!(bass.events[1].offset(), TICKS_PER_QUARTER);
    }

    #[test]
    fn test_recip_durations() {
        assert_eq!(parse_recip("4c", 1).unwrap(), 960);
        assert_eq!(parse_recip("8.c", 1).unwrap(), 720);
        assert_eq!(parse_recip("2c", 1).unwrap(), 1920);
        assert_eq!(parse_recip("12c", 1).unwrap(), 320);
        assert_eq!(parse_recip("0c", 1).unwrap(), 7680);
        assert_eq!(parse_recip("00c", 1).unwrap(), 15360);
        assert_eq!(parse_recip("4..c", 1).unwrap(), 1680);
    }

    #[test]
    fn test_pitch_spelling() {
        assert_eq!(parse_pitch("4c#", 1).unwrap(), Pitch::new(Step::C, 1, 4));
        assert_eq!(parse_pitch("8B-", 1).unwrap(), Pitch::new(Step::B, -1, 3));
        assert_eq!(parse_pitch("2cc", 1).unwrap(), Pitch::new(Step::C, 0, 5));
        assert_eq!(parse_pitch("4CC", 1).unwrap(), Pitch::new(Step::C, 0, 2));
        assert_eq!(parse_pitch("4en", 1).unwrap(), Pitch::new(Step::E, 0, 4));
    }

    #[test]
    fn test_rest_and_null_tokens() {
        let source = "**kern\t**kern\n4r\t4c\n.\t4d\n2C\t2e\n*-\t*-\n";
        let score = parse(source).unwrap();
        let bass = score.bass().unwrap();
        assert!(bass.events[0].is_rest());
        // The null token held the bass; its next event starts after the rest.
        assert_eq!(bass.events[1].offset(), 960);
        let soprano = score.soprano().unwrap();
        assert_eq!(soprano.events.len(), 3);
        assert_eq!(soprano.events[2].offset(), 1920);
    }

    #[test]
    fn test_chord_token() {
        let source = "**kern\n4c 4e 4g\n4d\n*-\n";
        let score = parse(source).unwrap();
        let voice = score.soprano().unwrap();
        assert!(voice.events[0].is_chord());
        match &voice.events[0] {
            NoteEvent::Chord { pitches, .. } => assert_eq!(pitches.len(), 3),
            other => panic!("expected chord, got {:?}", other),
        }
        assert_eq!(voice.events[1].offset(), 960);
    }

    #[test]
    fn test_tied_notes_stay_separate() {
        let source = "**kern\n[2c\n2c]\n*-\n";
        let score = parse(source).unwrap();
        let voice = score.soprano().unwrap();
        assert_eq!(voice.events.len(), 2);
        assert_eq!(voice.events[0].offset(), 0);
        assert_eq!(voice.events[1].offset(), 1920);
    }

    #[test]
    fn test_grace_note_skipped() {
        let source = "**kern\nqc\n4d\n*-\n";
        let score = parse(source).unwrap();
        let voice = score.soprano().unwrap();
        assert_eq!(voice.events.len(), 1);
        assert_eq!(voice.events[0].offset(), 0);
    }

    #[test]
    fn test_non_kern_spines_dropped() {
        let source = "**kern\t**dynam\t**kern\n4C\tf\t4c\n*-\t*-\t*-\n";
        let score = parse(source).unwrap();
        assert_eq!(score.voices.len(), 2);
    }

    #[test]
    fn test_spine_split_rejected() {
        let source = "**kern\t**kern\n*^\t*\n4c\t4d\t4e\n";
        let err = parse(source).unwrap_err();
        match err {
            BigramError::ParseError { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("spine manipulation"));
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_field_count_mismatch() {
        let source = "**kern\t**kern\n4c\n";
        assert!(parse(source).is_err());
    }

    #[test]
    fn test_comments_and_barlines_skipped() {
        let source = "!! global comment\n**kern\n! local\n=1\n4c\n==\n*-\n";
        let score = parse(source).unwrap();
        assert_eq!(score.soprano().unwrap().events.len(), 1);
    }
}
