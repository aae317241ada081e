//! Forward-only cursor over the rows of a tabular object.

use crate::column::RawValue;
use crate::error::{Error, Result};
use crate::file::Catalog;
use crate::tree::TabularObject;

/// Forward-only scan over one tabular object.
///
/// `position()` counts the rows advanced onto, so it starts at 0, the current
/// row index is `position() - 1`, and it ends at `total_rows()`. The object is
/// released exactly once: on exhaustion, on a failed advance, on `close()`, or
/// on drop, whichever comes first.
pub struct Cursor {
    object: Option<Box<dyn TabularObject>>,
    name: String,
    position: u64,
    total: u64,
    last_error: Option<String>,
}

impl Cursor {
    /// Resolve `key` in `catalog` and position before the first row.
    pub fn open(catalog: &dyn Catalog, key: &str) -> Result<Self> {
        let object = catalog.resolve(key)?;
        Ok(Self::new(object))
    }

    /// Wrap an already-resolved object.
    pub fn new(object: Box<dyn TabularObject>) -> Self {
        let name = object.name().to_string();
        let total = object.row_count();
        Self { object: Some(object), name, position: 0, total, last_error: None }
    }

    /// Move to the next row.
    ///
    /// Returns `false` at the end or on failure; `last_error()` tells the two
    /// apart. Either way the cursor is closed afterwards.
    pub fn advance(&mut self) -> bool {
        if self.position >= self.total {
            self.close();
            return false;
        }
        let Some(object) = self.object.as_mut() else {
            return false;
        };
        let row = self.position;
        match object.prefetch(row) {
            Ok(()) => {
                self.position += 1;
                true
            }
            Err(e) => {
                tracing::debug!(tree = %self.name, row, error = %e, "advance failed");
                self.last_error = Some(format!("'{}' entry {row}: {e}", self.name));
                self.close();
                false
            }
        }
    }

    /// Rows advanced onto so far; `0 ≤ position ≤ total_rows`.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Current row index, `None` before the first advance.
    pub fn entry(&self) -> Option<u64> {
        self.position.checked_sub(1)
    }

    /// Declared number of rows.
    pub fn total_rows(&self) -> u64 {
        self.total
    }

    /// Name of the scanned object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying object while the cursor is open.
    pub fn object(&self) -> Option<&dyn TabularObject> {
        self.object.as_deref()
    }

    /// Whether the underlying object is still held.
    pub fn is_open(&self) -> bool {
        self.object.is_some()
    }

    /// Release the underlying object. Idempotent.
    pub fn close(&mut self) {
        if self.object.take().is_some() {
            tracing::trace!(tree = %self.name, position = self.position, "cursor closed");
        }
    }

    /// Sticky error from a failed advance.
    pub fn last_error(&self) -> Option<Error> {
        self.last_error.as_ref().map(|msg| Error::Cursor(msg.clone()))
    }

    /// Read `column` at the current row.
    pub fn read(&self, column: &str) -> Result<RawValue<'_>> {
        let object = self
            .object
            .as_deref()
            .ok_or_else(|| Error::Cursor(format!("read of '{column}' on closed cursor")))?;
        let row = self
            .entry()
            .ok_or_else(|| Error::Cursor(format!("read of '{column}' before first advance")))?;
        object.read_column(row, column)
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("total", &self.total)
            .field("open", &self.is_open())
            .field("last_error", &self.last_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::ResourceBuilder;
    use crate::tree::TreeBuilder;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Object that counts releases and can fail at a chosen row.
    struct Probe {
        rows: u64,
        fail_at: Option<u64>,
        drops: Rc<Cell<u32>>,
    }

    impl TabularObject for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn row_count(&self) -> u64 {
            self.rows
        }

        fn read_column(&self, row: u64, _column: &str) -> Result<RawValue<'_>> {
            Ok(RawValue::I64(row as i64))
        }

        fn prefetch(&mut self, row: u64) -> Result<()> {
            if self.fail_at == Some(row) {
                return Err(Error::Format("bad basket".into()));
            }
            Ok(())
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn probe(rows: u64, fail_at: Option<u64>) -> (Cursor, Rc<Cell<u32>>) {
        let drops = Rc::new(Cell::new(0));
        let cursor = Cursor::new(Box::new(Probe { rows, fail_at, drops: drops.clone() }));
        (cursor, drops)
    }

    #[test]
    fn position_is_monotonic_until_exhaustion() {
        let (mut c, drops) = probe(5, None);
        assert_eq!(c.position(), 0);
        assert_eq!(c.entry(), None);
        for expected in 1..=5 {
            assert!(c.advance());
            assert_eq!(c.position(), expected);
            assert_eq!(c.read("x").unwrap(), RawValue::I64(expected as i64 - 1));
        }
        for _ in 0..3 {
            assert!(!c.advance());
            assert_eq!(c.position(), c.total_rows());
        }
        assert!(!c.is_open());
        assert!(c.last_error().is_none());
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn failed_advance_is_sticky_and_releases_once() {
        let (mut c, drops) = probe(10, Some(3));
        let mut advanced = 0;
        while c.advance() {
            advanced += 1;
        }
        assert_eq!(advanced, 3);
        assert_eq!(c.position(), 3);
        assert_eq!(drops.get(), 1);

        let err = c.last_error().expect("error must be recorded");
        assert!(err.to_string().contains("entry 3: malformed resource: bad basket"), "{err}");
        assert!(!c.advance());
        assert!(c.last_error().is_some());

        c.close();
        drop(c);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn close_is_idempotent_and_drop_releases() {
        let (mut c, drops) = probe(3, None);
        assert!(c.advance());
        c.close();
        c.close();
        assert_eq!(drops.get(), 1);
        assert!(!c.advance());
        assert!(matches!(c.read("x"), Err(Error::Cursor(_))));

        let (c, drops) = probe(3, None);
        drop(c);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn read_before_first_advance_fails() {
        let (c, _) = probe(1, None);
        let err = c.read("x").unwrap_err();
        assert!(err.to_string().contains("before first advance"), "{err}");
    }

    #[test]
    fn empty_tree_exhausts_immediately() {
        let (mut c, drops) = probe(0, None);
        assert!(!c.advance());
        assert_eq!(c.position(), 0);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn open_resolves_through_catalog() {
        let resource = ResourceBuilder::new()
            .tree(TreeBuilder::new("events").f32("x", vec![1.0, 2.0]).build())
            .object("h", "TH1D")
            .build();
        let c = Cursor::open(&resource, "events").unwrap();
        assert_eq!(c.total_rows(), 2);
        assert_eq!(c.name(), "events");
        assert!(matches!(Cursor::open(&resource, "jets"), Err(Error::ObjectNotFound(_))));
        assert!(matches!(Cursor::open(&resource, "h"), Err(Error::WrongObjectKind { .. })));
    }
}
