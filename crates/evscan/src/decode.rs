//! Row decoding: mapping-driven reads from a cursor into an `Event`.

use crate::column::RawValue;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::event::{Event, EventField, FieldShape};
use crate::mapping::{FieldEntry, FieldMapping};

/// Decodes the cursor's current row into an [`Event`].
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder<'m> {
    mapping: &'m FieldMapping,
}

impl<'m> RecordDecoder<'m> {
    /// Decoder over a validated mapping.
    pub fn new(mapping: &'m FieldMapping) -> Self {
        Self { mapping }
    }

    /// The mapping in use.
    pub fn mapping(&self) -> &'m FieldMapping {
        self.mapping
    }

    /// Decode into a fresh record.
    pub fn decode_new(&self, cursor: &Cursor) -> Result<Event> {
        let mut event = Event::default();
        self.decode(cursor, &mut event)?;
        Ok(event)
    }

    /// Decode into `event`, reusing its sequence buffers.
    ///
    /// Sequences are copied out of the cursor's storage. On error `event` is
    /// left partially written and must not be used.
    pub fn decode(&self, cursor: &Cursor, event: &mut Event) -> Result<()> {
        for entry in self.mapping.entries() {
            let raw = cursor.read(&entry.column)?;
            if raw.kind() != entry.kind {
                return Err(mismatch(entry, raw));
            }
            match entry.field.shape() {
                FieldShape::Float => {
                    let v = match raw {
                        RawValue::F32(v) => v,
                        RawValue::F64(v) => v as f32,
                        other => return Err(mismatch(entry, other)),
                    };
                    set_float(event, entry.field, v);
                }
                FieldShape::Integer => {
                    let v = match raw {
                        RawValue::I32(v) => v,
                        RawValue::I64(v) => i32::try_from(v).map_err(|_| {
                            Error::Format(format!(
                                "column '{}' entry {}: {v} overflows i32",
                                entry.column,
                                cursor.entry().unwrap_or_default()
                            ))
                        })?,
                        other => return Err(mismatch(entry, other)),
                    };
                    set_integer(event, entry.field, v);
                }
                FieldShape::FloatSeq => {
                    let Some(dst) = event.sequence_mut(entry.field) else {
                        return Err(mismatch(entry, raw));
                    };
                    dst.clear();
                    match raw {
                        RawValue::VecF32(s) => dst.extend_from_slice(s),
                        RawValue::VecF64(s) => dst.extend(s.iter().map(|&v| v as f32)),
                        other => return Err(mismatch(entry, other)),
                    }
                }
            }
        }
        self.check_multiplicities(cursor.entry().unwrap_or_default(), event)
    }

    fn check_multiplicities(&self, row: u64, event: &Event) -> Result<()> {
        for field in EventField::ALL {
            let (Some(group), Some(seq)) = (field.group(), event.sequence(field)) else {
                continue;
            };
            let declared = event.multiplicity(group);
            if declared < 0 || seq.len() != declared as usize {
                return Err(Error::Multiplicity {
                    entry: row,
                    group: group.as_str(),
                    column: self.mapping.get(field).column.clone(),
                    expected: declared as i64,
                    found: seq.len(),
                });
            }
        }
        Ok(())
    }
}

fn mismatch(entry: &FieldEntry, raw: RawValue<'_>) -> Error {
    Error::TypeMismatch { column: entry.column.clone(), expected: entry.kind, found: raw.kind() }
}

fn set_float(event: &mut Event, field: EventField, v: f32) {
    match field {
        EventField::JetPt => event.jet_pt = v,
        EventField::JetEta => event.jet_eta = v,
        EventField::JetPhi => event.jet_phi = v,
        EventField::JetMass => event.jet_mass = v,
        _ => {}
    }
}

fn set_integer(event: &mut Event, field: EventField, v: i32) {
    match field {
        EventField::NTracks => event.n_tracks = v,
        EventField::NTowers => event.n_towers = v,
        _ => {}
    }
}
