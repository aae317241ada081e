//! Column element kinds, typed column storage, and borrowed row values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Element kind of a stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// 32-bit float scalar.
    #[serde(rename = "f32")]
    F32,
    /// 64-bit float scalar.
    #[serde(rename = "f64")]
    F64,
    /// 32-bit signed integer scalar.
    #[serde(rename = "i32")]
    I32,
    /// 64-bit signed integer scalar.
    #[serde(rename = "i64")]
    I64,
    /// Variable-length sequence of 32-bit floats.
    #[serde(rename = "f32[]")]
    VecF32,
    /// Variable-length sequence of 64-bit floats.
    #[serde(rename = "f64[]")]
    VecF64,
    /// Variable-length sequence of 32-bit signed integers.
    #[serde(rename = "i32[]")]
    VecI32,
}

impl ElementKind {
    /// Type tag as written in resource files.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::F32 => "f32",
            ElementKind::F64 => "f64",
            ElementKind::I32 => "i32",
            ElementKind::I64 => "i64",
            ElementKind::VecF32 => "f32[]",
            ElementKind::VecF64 => "f64[]",
            ElementKind::VecI32 => "i32[]",
        }
    }

    /// Whether one row holds a variable number of elements.
    pub fn is_sequence(self) -> bool {
        matches!(self, ElementKind::VecF32 | ElementKind::VecF64 | ElementKind::VecI32)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "f32" => Ok(ElementKind::F32),
            "f64" => Ok(ElementKind::F64),
            "i32" => Ok(ElementKind::I32),
            "i64" => Ok(ElementKind::I64),
            "f32[]" => Ok(ElementKind::VecF32),
            "f64[]" => Ok(ElementKind::VecF64),
            "i32[]" => Ok(ElementKind::VecI32),
            other => Err(Error::Format(format!("unknown element kind '{other}'"))),
        }
    }
}

/// Flat values plus per-entry offsets: entry `i` spans `flat[offsets[i]..offsets[i + 1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Jagged<T> {
    /// All values of all entries, back to back.
    pub flat: Vec<T>,
    /// Entry boundaries: `offsets.len() == n_entries + 1`.
    pub offsets: Vec<usize>,
}

impl<T: Clone> Jagged<T> {
    /// Flatten nested per-entry vectors.
    pub fn from_nested(rows: Vec<Vec<T>>) -> Self {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        offsets.push(0);
        let mut flat = Vec::with_capacity(rows.iter().map(Vec::len).sum());
        for row in rows {
            flat.extend(row);
            offsets.push(flat.len());
        }
        Self { flat, offsets }
    }

    /// Rebuild the nested per-entry form.
    pub fn to_nested(&self) -> Vec<Vec<T>> {
        self.offsets.windows(2).map(|w| self.flat[w[0]..w[1]].to_vec()).collect()
    }
}

impl<T> Jagged<T> {
    /// Slice for entry `row`, or `None` past the end.
    pub fn get(&self, row: usize) -> Option<&[T]> {
        let start = *self.offsets.get(row)?;
        let end = *self.offsets.get(row + 1)?;
        self.flat.get(start..end)
    }

    /// Number of entries.
    pub fn n_entries(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }
}

/// Materialized column data.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// `f32` scalars.
    F32(Vec<f32>),
    /// `f64` scalars.
    F64(Vec<f64>),
    /// `i32` scalars.
    I32(Vec<i32>),
    /// `i64` scalars.
    I64(Vec<i64>),
    /// `f32` sequences.
    VecF32(Jagged<f32>),
    /// `f64` sequences.
    VecF64(Jagged<f64>),
    /// `i32` sequences.
    VecI32(Jagged<i32>),
}

impl Column {
    /// Stored element kind.
    pub fn kind(&self) -> ElementKind {
        match self {
            Column::F32(_) => ElementKind::F32,
            Column::F64(_) => ElementKind::F64,
            Column::I32(_) => ElementKind::I32,
            Column::I64(_) => ElementKind::I64,
            Column::VecF32(_) => ElementKind::VecF32,
            Column::VecF64(_) => ElementKind::VecF64,
            Column::VecI32(_) => ElementKind::VecI32,
        }
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        match self {
            Column::F32(v) => v.len(),
            Column::F64(v) => v.len(),
            Column::I32(v) => v.len(),
            Column::I64(v) => v.len(),
            Column::VecF32(j) => j.n_entries(),
            Column::VecF64(j) => j.n_entries(),
            Column::VecI32(j) => j.n_entries(),
        }
    }

    /// Whether the column holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the value of entry `row`.
    pub fn value(&self, row: usize) -> Option<RawValue<'_>> {
        match self {
            Column::F32(v) => v.get(row).copied().map(RawValue::F32),
            Column::F64(v) => v.get(row).copied().map(RawValue::F64),
            Column::I32(v) => v.get(row).copied().map(RawValue::I32),
            Column::I64(v) => v.get(row).copied().map(RawValue::I64),
            Column::VecF32(j) => j.get(row).map(RawValue::VecF32),
            Column::VecF64(j) => j.get(row).map(RawValue::VecF64),
            Column::VecI32(j) => j.get(row).map(RawValue::VecI32),
        }
    }
}

/// One column value at one row. Sequences borrow the column's storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    /// `f32` scalar.
    F32(f32),
    /// `f64` scalar.
    F64(f64),
    /// `i32` scalar.
    I32(i32),
    /// `i64` scalar.
    I64(i64),
    /// `f32` sequence.
    VecF32(&'a [f32]),
    /// `f64` sequence.
    VecF64(&'a [f64]),
    /// `i32` sequence.
    VecI32(&'a [i32]),
}

impl RawValue<'_> {
    /// Element kind of this value.
    pub fn kind(&self) -> ElementKind {
        match self {
            RawValue::F32(_) => ElementKind::F32,
            RawValue::F64(_) => ElementKind::F64,
            RawValue::I32(_) => ElementKind::I32,
            RawValue::I64(_) => ElementKind::I64,
            RawValue::VecF32(_) => ElementKind::VecF32,
            RawValue::VecF64(_) => ElementKind::VecF64,
            RawValue::VecI32(_) => ElementKind::VecI32,
        }
    }

    /// Number of elements (1 for scalars).
    pub fn len(&self) -> usize {
        match self {
            RawValue::VecF32(s) => s.len(),
            RawValue::VecF64(s) => s.len(),
            RawValue::VecI32(s) => s.len(),
            _ => 1,
        }
    }

    /// Whether a sequence value is empty. Scalars are never empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jagged_round_trips_nested_rows() {
        let rows = vec![vec![1.0_f32, 2.0], vec![], vec![3.0]];
        let j = Jagged::from_nested(rows.clone());
        assert_eq!(j.offsets, vec![0, 2, 2, 3]);
        assert_eq!(j.n_entries(), 3);
        assert_eq!(j.get(1), Some(&[][..]));
        assert_eq!(j.get(2), Some(&[3.0_f32][..]));
        assert_eq!(j.get(3), None);
        assert_eq!(j.to_nested(), rows);
    }

    #[test]
    fn column_value_reports_kind() {
        let c = Column::VecF32(Jagged::from_nested(vec![vec![0.5_f32, 1.5]]));
        let v = c.value(0).unwrap();
        assert_eq!(v.kind(), ElementKind::VecF32);
        assert_eq!(v.len(), 2);
        assert!(c.value(1).is_none());
        assert_eq!(Column::I32(vec![4, 5]).value(1), Some(RawValue::I32(5)));
    }

    #[test]
    fn element_kind_parses_tags() {
        for kind in [
            ElementKind::F32,
            ElementKind::F64,
            ElementKind::I32,
            ElementKind::I64,
            ElementKind::VecF32,
            ElementKind::VecF64,
            ElementKind::VecI32,
        ] {
            assert_eq!(kind.as_str().parse::<ElementKind>().unwrap(), kind);
        }
        assert!("u8".parse::<ElementKind>().is_err());
        assert!(ElementKind::VecI32.is_sequence());
        assert!(!ElementKind::I64.is_sequence());
    }
}
