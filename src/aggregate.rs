//! # Corpus Aggregation
//!
//! Accumulates annotated bigrams across files into occurrence lists keyed
//! by interval descriptor. Keys iterate in first-seen order and each key's
//! occurrences stay in corpus-processing order, so a corpus walked in a
//! stable file order yields a byte-identical report every run.

use std::collections::HashMap;

use crate::bigram::{AnnotatedBigram, IntervalDescriptor};
use crate::score::Ticks;

/// Where one bigram occurred: source file plus its start and end offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub file: String,
    pub start: Ticks,
    pub end: Ticks,
}

/// The corpus-wide descriptor → occurrences map.
#[derive(Debug, Default)]
pub struct BigramAggregate {
    entries: Vec<(IntervalDescriptor, Vec<Occurrence>)>,
    index: HashMap<IntervalDescriptor, usize>,
}

impl BigramAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one occurrence under its descriptor, creating the key on
    /// first sight.
    pub fn accumulate(&mut self, descriptor: IntervalDescriptor, occurrence: Occurrence) {
        match self.index.get(&descriptor) {
            Some(&i) => self.entries[i].1.push(occurrence),
            None => {
                self.index.insert(descriptor, self.entries.len());
                self.entries.push((descriptor, vec![occurrence]));
            }
        }
    }

    /// Fold one file's worth of annotated bigrams into the aggregate.
    pub fn merge_file(&mut self, file: &str, annotated: &[AnnotatedBigram]) {
        for bigram in annotated {
            self.accumulate(
                bigram.descriptor,
                Occurrence {
                    file: file.to_string(),
                    start: bigram.start,
                    end: bigram.end,
                },
            );
        }
    }

    /// Keys in first-seen order with their occurrence lists.
    pub fn iter(&self) -> impl Iterator<Item = (&IntervalDescriptor, &[Occurrence])> {
        self.entries
            .iter()
            .map(|(descriptor, occurrences)| (descriptor, occurrences.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigram::{HarmonicField, IntervalDescriptor, MelodicField};
    use crate::intervals::{Interval, Quality};

    fn descriptor(number: u16) -> IntervalDescriptor {
        IntervalDescriptor {
            h1: HarmonicField::Interval(Interval {
                quality: Quality::Perfect,
                number,
            }),
            m_bass: MelodicField::ToSilence,
            m_soprano: MelodicField::ToSilence,
            h2: HarmonicField::Silent,
        }
    }

    fn occurrence(file: &str, start: Ticks) -> Occurrence {
        Occurrence {
            file: file.to_string(),
            start,
            end: start + 480,
        }
    }

    #[test]
    fn test_accumulate_groups_by_key() {
        let mut agg = BigramAggregate::new();
        agg.accumulate(descriptor(5), occurrence("a.krn", 0));
        agg.accumulate(descriptor(8), occurrence("a.krn", 480));
        agg.accumulate(descriptor(5), occurrence("b.krn", 0));
        assert_eq!(agg.len(), 2);
        let entries: Vec<_> = agg.iter().collect();
        assert_eq!(entries[0].1.len(), 2);
        assert_eq!(entries[0].1[1].file, "b.krn");
        assert_eq!(entries[1].1.len(), 1);
    }

    #[test]
    fn test_first_seen_key_order() {
        let mut agg = BigramAggregate::new();
        agg.accumulate(descriptor(8), occurrence("a.krn", 0));
        agg.accumulate(descriptor(5), occurrence("a.krn", 480));
        agg.accumulate(descriptor(8), occurrence("a.krn", 960));
        let keys: Vec<_> = agg.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(keys, vec!["(P8 [- -] -)", "(P5 [- -] -)"]);
    }

    #[test]
    fn test_merge_file_preserves_temporal_order() {
        use crate::bigram::AnnotatedBigram;
        let mut agg = BigramAggregate::new();
        let annotated = vec![
            AnnotatedBigram {
                start: 0,
                end: 480,
                descriptor: descriptor(5),
            },
            AnnotatedBigram {
                start: 480,
                end: 960,
                descriptor: descriptor(5),
            },
        ];
        agg.merge_file("x.krn", &annotated);
        let entries: Vec<_> = agg.iter().collect();
        assert_eq!(entries[0].1[0].start, 0);
        assert_eq!(entries[0].1[1].start, 480);
    }
}
