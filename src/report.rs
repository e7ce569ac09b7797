//! # Report Rendering
//!
//! Renders the aggregate as text: each descriptor on its own line followed
//! by one indented `<file>, <start>-<end>` line per occurrence. Offsets
//! are printed in quarter-note units divided by a configurable display
//! divisor (1.0 prints quarters; the historical coarse convention used
//! 2.0 to print half units).

use std::fmt::Write;

use crate::aggregate::{BigramAggregate, Occurrence};
use crate::score::{Ticks, TICKS_PER_QUARTER};

/// Display conventions for a report.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub display_divisor: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            display_divisor: 1.0,
        }
    }
}

/// Ticks → display units. Whole values keep a trailing ".0" so the output
/// reads as offsets, not counts ("0.0-0.5", "2.0-2.5").
fn format_offset(ticks: Ticks, options: &ReportOptions) -> String {
    let quarters = ticks as f64 / TICKS_PER_QUARTER as f64 / options.display_divisor;
    if quarters == quarters.trunc() {
        format!("{:.1}", quarters)
    } else {
        format!("{}", quarters)
    }
}

fn write_entry(out: &mut String, descriptor: &str, occurrences: &[Occurrence], options: &ReportOptions) {
    // fmt::Write into a String cannot fail.
    writeln!(out, "{}", descriptor).unwrap();
    for occ in occurrences {
        writeln!(
            out,
            "\t{}, {}-{}",
            occ.file,
            format_offset(occ.start, options),
            format_offset(occ.end, options)
        )
        .unwrap();
    }
}

/// Render every descriptor with all of its occurrences.
pub fn report_all(aggregate: &BigramAggregate, options: &ReportOptions) -> String {
    let mut out = String::new();
    for (descriptor, occurrences) in aggregate.iter() {
        write_entry(&mut out, &descriptor.to_string(), occurrences, options);
    }
    out
}

/// Render only descriptors that occur exactly once in the corpus.
pub fn report_unique(aggregate: &BigramAggregate, options: &ReportOptions) -> String {
    let mut out = String::new();
    for (descriptor, occurrences) in aggregate.iter() {
        if occurrences.len() == 1 {
            write_entry(&mut out, &descriptor.to_string(), occurrences, options);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Occurrence;
    use crate::bigram::{HarmonicField, IntervalDescriptor, MelodicField};
    use crate::intervals::{Interval, Quality};
    use pretty_assertions::assert_eq;

    fn descriptor(number: u16) -> IntervalDescriptor {
        IntervalDescriptor {
            h1: HarmonicField::Interval(Interval {
                quality: Quality::Perfect,
                number,
            }),
            m_bass: MelodicField::FromSilence,
            m_soprano: MelodicField::ToSilence,
            h2: HarmonicField::Silent,
        }
    }

    fn sample_aggregate() -> BigramAggregate {
        let mut agg = BigramAggregate::new();
        agg.accumulate(
            descriptor(5),
            Occurrence {
                file: "a.krn".to_string(),
                start: 0,
                end: 480,
            },
        );
        agg.accumulate(
            descriptor(5),
            Occurrence {
                file: "b.krn".to_string(),
                start: 1440,
                end: 1920,
            },
        );
        agg.accumulate(
            descriptor(8),
            Occurrence {
                file: "a.krn".to_string(),
                start: 480,
                end: 960,
            },
        );
        agg
    }

    #[test]
    fn test_format_offset() {
        let options = ReportOptions::default();
        assert_eq!(format_offset(0, &options), "0.0");
        assert_eq!(format_offset(480, &options), "0.5");
        assert_eq!(format_offset(1920, &options), "2.0");
        assert_eq!(format_offset(-960, &options), "-1.0");
    }

    #[test]
    fn test_display_divisor() {
        let options = ReportOptions {
            display_divisor: 2.0,
        };
        assert_eq!(format_offset(1920, &options), "1.0");
        assert_eq!(format_offset(480, &options), "0.25");
    }

    #[test]
    fn test_report_all() {
        let report = report_all(&sample_aggregate(), &ReportOptions::default());
        let expected = "(P5 [X -] -)\n\
                        \ta.krn, 0.0-0.5\n\
                        \tb.krn, 1.5-2.0\n\
                        (P8 [X -] -)\n\
                        \ta.krn, 0.5-1.0\n";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_report_unique_filters_repeats() {
        let report = report_unique(&sample_aggregate(), &ReportOptions::default());
        let expected = "(P8 [X -] -)\n\ta.krn, 0.5-1.0\n";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_empty_aggregate() {
        let agg = BigramAggregate::new();
        let options = ReportOptions::default();
        assert_eq!(report_all(&agg, &options), "");
        assert_eq!(report_unique(&agg, &options), "");
    }
}
