//! Scan driver: cursor → decoder → scalar extraction → histogram fill.

use crate::config::{HistogramSpec, ScanConfig};
use crate::cursor::Cursor;
use crate::decode::RecordDecoder;
use crate::error::Result;
use crate::event::Event;
use crate::file::Catalog;
use crate::histogram::{Histogram, HistogramSnapshot};

/// Progress report handed to the callback at a fixed row cadence.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Row index just decoded.
    pub entry: u64,
    /// Total rows in the tree.
    pub total: u64,
    /// The decoded row.
    pub event: &'a Event,
}

/// A histogram slot after the scan.
#[derive(Debug, Clone)]
pub struct FilledHistogram {
    /// Slot configuration, including display metadata.
    pub spec: HistogramSpec,
    /// Accumulated counts.
    pub histogram: Histogram,
}

impl FilledHistogram {
    pub fn snapshot(&self) -> HistogramSnapshot {
        self.histogram.snapshot(self.spec.name.clone())
    }
}

/// Result of a complete scan.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Name of the scanned tree.
    pub tree: String,
    /// Rows decoded (equals the tree's row count).
    pub entries: u64,
    /// One histogram per configured slot, in configuration order.
    pub histograms: Vec<FilledHistogram>,
}

/// Row stride between progress reports, `None` when reporting is off.
///
/// With fewer rows than divisions there is no meaningful stride, so no
/// report is made at all.
pub fn progress_stride(total: u64, divisions: u64) -> Option<u64> {
    if divisions == 0 || total < divisions {
        return None;
    }
    Some(total / divisions)
}

/// Scan `config.tree` in `catalog` to completion.
///
/// Fails fast: the first open, decode, or cursor error aborts the scan and no
/// partial histograms are returned. The cursor is released on every path.
pub fn run<F>(catalog: &dyn Catalog, config: &ScanConfig, mut on_progress: F) -> Result<ScanOutput>
where
    F: FnMut(&Progress<'_>),
{
    let mut cursor = Cursor::open(catalog, &config.tree)?;

    let mut histograms = config
        .histograms
        .iter()
        .map(|spec| {
            spec.validate()?;
            Ok(FilledHistogram { spec: spec.clone(), histogram: spec.build()? })
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(object) = cursor.object() {
        config.mapping.check_schema(object)?;
    }

    let total = cursor.total_rows();
    let stride = progress_stride(total, config.progress_divisions);
    tracing::debug!(tree = %cursor.name(), total, ?stride, "scan started");

    let decoder = RecordDecoder::new(&config.mapping);
    let mut event = Event::default();
    while cursor.advance() {
        decoder.decode(&cursor, &mut event)?;
        for slot in &mut histograms {
            if let Some(v) = event.scalar(slot.spec.field) {
                slot.histogram.fill(v, 1.0);
            }
        }
        let entry = cursor.entry().unwrap_or_default();
        if let Some(stride) = stride
            && entry % stride == 0
        {
            on_progress(&Progress { entry, total, event: &event });
        }
    }

    if let Some(err) = cursor.last_error() {
        return Err(err);
    }
    let entries = cursor.position();
    let tree = cursor.name().to_string();
    cursor.close();
    tracing::debug!(tree = %tree, entries, "scan finished");

    Ok(ScanOutput { tree, entries, histograms })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_skips_small_trees() {
        assert_eq!(progress_stride(9, 10), None);
        assert_eq!(progress_stride(0, 10), None);
        assert_eq!(progress_stride(10, 10), Some(1));
        assert_eq!(progress_stride(25, 10), Some(2));
        assert_eq!(progress_stride(1000, 0), None);
    }
}
