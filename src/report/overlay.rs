//! Overlay data for visual inspection of alignments.
//!
//! An overlay lays the experimental signal on top of a reference, shifted by
//! the best offset. Nothing here feeds back into matching.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::catalog::store::ReferenceSet;
use crate::core::signal::Signal;
use crate::core::types::ReferenceName;
use crate::matching::aligner::{AlignmentResult, Alignments};
use crate::report::writer::ReportError;
use crate::utils::validation::delimiter_for;

/// A reference sample, with the experimental sample aligned to it if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub index: usize,
    pub time: f64,
    pub reference: f64,
    pub experimental: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub reference: ReferenceName,
    pub offset: usize,
    pub error: f64,
    pub points: Vec<OverlayPoint>,
}

impl Overlay {
    /// Place `experimental` onto `reference` at the alignment's best offset
    #[must_use]
    pub fn build(
        experimental: &Signal,
        name: &ReferenceName,
        reference: &Signal,
        alignment: &AlignmentResult,
    ) -> Self {
        let offset = alignment.best_offset;
        let shifted = experimental.intensities();

        let points = reference
            .samples()
            .enumerate()
            .map(|(index, sample)| OverlayPoint {
                index,
                time: sample.time,
                reference: sample.intensity,
                experimental: index
                    .checked_sub(offset)
                    .and_then(|i| shifted.get(i).copied()),
            })
            .collect();

        Self {
            reference: name.clone(),
            offset,
            error: alignment.best_error,
            points,
        }
    }
}

/// Build overlays for every successfully aligned reference, optionally
/// restricted to one name
#[must_use]
pub fn build_overlays(
    experimental: &Signal,
    references: &ReferenceSet,
    alignments: &Alignments,
    only: Option<&ReferenceName>,
) -> Vec<Overlay> {
    alignments
        .usable()
        .filter(|(name, _)| only.map_or(true, |wanted| *name == wanted))
        .filter_map(|(name, alignment)| {
            references
                .get(name)
                .map(|reference| Overlay::build(experimental, name, reference, alignment))
        })
        .collect()
}

/// Write overlays to `path`: JSON for `.json`, delimited text otherwise
///
/// # Errors
///
/// Returns a [`ReportError`] if the file cannot be created or written.
pub fn write_overlays(path: &Path, overlays: &[Overlay]) -> Result<(), ReportError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let mut file = BufWriter::new(std::fs::File::create(path)?);
    if is_json {
        serde_json::to_writer_pretty(&mut file, overlays)?;
        file.flush()?;
        Ok(())
    } else {
        write_delimited(file, overlays, delimiter_for(path))
    }
}

/// Long-format table: one row per reference sample per overlay
///
/// # Errors
///
/// Returns `ReportError::Csv` if writing fails.
pub fn write_delimited<W: Write>(
    writer: W,
    overlays: &[Overlay],
    delimiter: u8,
) -> Result<(), ReportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record([
        "reference",
        "offset",
        "index",
        "time",
        "reference_intensity",
        "experimental_intensity",
    ])?;

    for overlay in overlays {
        for point in &overlay.points {
            wtr.write_record([
                overlay.reference.to_string(),
                overlay.offset.to_string(),
                point.index.to_string(),
                point.time.to_string(),
                point.reference.to_string(),
                point.experimental.map(|v| v.to_string()).unwrap_or_default(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::aligner::Aligner;
    use crate::matching::metric::ErrorMetric;

    fn signal(values: &[f64]) -> Signal {
        Signal::from_intensities(values.to_vec()).unwrap()
    }

    #[test]
    fn test_overlay_places_experimental_at_offset() {
        let experimental = signal(&[1.0, 2.0, 3.0]);
        let reference = signal(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let alignment = AlignmentResult {
            best_offset: 1,
            best_error: 0.0,
        };

        let overlay = Overlay::build(&experimental, &"A".into(), &reference, &alignment);
        let placed: Vec<Option<f64>> = overlay.points.iter().map(|p| p.experimental).collect();
        assert_eq!(placed, vec![None, Some(1.0), Some(2.0), Some(3.0), None]);
        assert_eq!(overlay.points[4].time, 4.0);
        assert_eq!(overlay.offset, 1);
    }

    #[test]
    fn test_build_overlays_skips_unaligned_and_filters() {
        let mut references = ReferenceSet::new();
        references.insert("A".into(), signal(&[0.0, 1.0, 2.0, 3.0])).unwrap();
        references.insert("short".into(), signal(&[1.0])).unwrap();
        references.insert("B".into(), signal(&[2.0, 2.0, 2.0])).unwrap();

        let experimental = signal(&[1.0, 2.0]);
        let alignments = Aligner::new(ErrorMetric::SumOfSquares).align(&experimental, &references);

        let all = build_overlays(&experimental, &references, &alignments, None);
        let names: Vec<&str> = all.iter().map(|o| o.reference.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let only_b = ReferenceName::new("B");
        let one = build_overlays(&experimental, &references, &alignments, Some(&only_b));
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].reference, only_b);
    }

    #[test]
    fn test_write_delimited() {
        let overlay = Overlay::build(
            &signal(&[5.0]),
            &"R".into(),
            &signal(&[4.0, 5.0]),
            &AlignmentResult {
                best_offset: 1,
                best_error: 0.0,
            },
        );

        let mut out = Vec::new();
        write_delimited(&mut out, &[overlay], b'\t').unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "R\t1\t0\t0\t4\t");
        assert_eq!(lines[2], "R\t1\t1\t1\t5\t5");
    }

    #[test]
    fn test_write_overlays_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.json");
        let overlay = Overlay::build(
            &signal(&[1.0]),
            &"R".into(),
            &signal(&[1.0, 2.0]),
            &AlignmentResult {
                best_offset: 0,
                best_error: 0.0,
            },
        );

        write_overlays(&path, &[overlay]).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["reference"], "R");
        assert_eq!(value[0]["points"][1]["experimental"], serde_json::Value::Null);
    }
}
