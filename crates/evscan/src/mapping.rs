//! Declarative field mapping: record field → store column + declared kind.

use serde::{Deserialize, Serialize};

use crate::column::ElementKind;
use crate::error::{Error, Result};
use crate::event::{EventField, FieldShape};
use crate::tree::TabularObject;

/// One mapping row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Record field being populated.
    pub field: EventField,
    /// Column read from the store.
    pub column: String,
    /// Element kind the column is declared to hold.
    pub kind: ElementKind,
}

impl FieldEntry {
    /// Convenience constructor.
    pub fn new(field: EventField, column: impl Into<String>, kind: ElementKind) -> Self {
        Self { field, column: column.into(), kind }
    }
}

/// Immutable table covering every `Event` field exactly once.
///
/// Built once at startup and shared read-only by all decode calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<FieldEntry>", try_from = "Vec<FieldEntry>")]
pub struct FieldMapping {
    /// Sorted in `EventField::ALL` order.
    entries: Vec<FieldEntry>,
}

impl FieldMapping {
    /// Validate and build a mapping.
    ///
    /// Every record field must appear exactly once with a kind its shape can
    /// hold: float scalars take `f32`/`f64`, integer scalars `i32`/`i64`,
    /// sequences `f32[]`/`f64[]`.
    pub fn new(entries: Vec<FieldEntry>) -> Result<Self> {
        let mut slots: Vec<Option<FieldEntry>> = vec![None; EventField::ALL.len()];
        for entry in entries {
            if !shape_accepts(entry.field.shape(), entry.kind) {
                return Err(Error::InvalidMapping(format!(
                    "field {} cannot hold {} (column '{}')",
                    entry.field, entry.kind, entry.column
                )));
            }
            let slot = &mut slots[field_index(entry.field)];
            if slot.is_some() {
                return Err(Error::InvalidMapping(format!("field {} mapped twice", entry.field)));
            }
            *slot = Some(entry);
        }

        let entries = EventField::ALL
            .iter()
            .zip(slots)
            .map(|(field, slot)| slot.ok_or_else(|| Error::FieldNotFound(field.to_string())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Mapping for the `treeJets` layout.
    pub fn jets() -> Self {
        use ElementKind::{F32, I32, VecF32};
        use EventField::*;

        let entries = [
            (JetPt, "jetPt", F32),
            (JetEta, "jetEta", F32),
            (JetPhi, "jetPhi", F32),
            (JetMass, "jetMass", F32),
            (NTracks, "ntracks", I32),
            (NTowers, "ntowers", I32),
            (TrackPt, "trackPt", VecF32),
            (TrackEta, "trackEta", VecF32),
            (TrackPhi, "trackPhi", VecF32),
            (TrackCharge, "trackCharge", VecF32),
            (TowerE, "towerE", VecF32),
            (TowerEem, "towerEem", VecF32),
            (TowerEhad, "towerEhad", VecF32),
            (TowerEta, "towerEta", VecF32),
            (TowerPhi, "towerPhi", VecF32),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(field, column, kind)| FieldEntry::new(field, column, kind))
                .collect(),
        }
    }

    /// Entry for `field`. Total: every field is mapped.
    pub fn get(&self, field: EventField) -> &FieldEntry {
        &self.entries[field_index(field)]
    }

    /// Entry for a record field given by name.
    pub fn lookup(&self, field: &str) -> Result<&FieldEntry> {
        let field: EventField = field.parse()?;
        Ok(self.get(field))
    }

    /// All entries in record order.
    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    /// Check declared kinds against the kinds `object` reports up front.
    ///
    /// Columns the object cannot describe without reading, and absent
    /// columns, are left for the decoder to detect on first read.
    pub fn check_schema(&self, object: &dyn TabularObject) -> Result<()> {
        for entry in &self.entries {
            if let Some(found) = object.column_kind(&entry.column)
                && found != entry.kind
            {
                return Err(Error::TypeMismatch {
                    column: entry.column.clone(),
                    expected: entry.kind,
                    found,
                });
            }
        }
        Ok(())
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::jets()
    }
}

impl TryFrom<Vec<FieldEntry>> for FieldMapping {
    type Error = Error;

    fn try_from(entries: Vec<FieldEntry>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<FieldMapping> for Vec<FieldEntry> {
    fn from(mapping: FieldMapping) -> Self {
        mapping.entries
    }
}

// `EventField::ALL` lists variants in declaration order.
fn field_index(field: EventField) -> usize {
    field as usize
}

fn shape_accepts(shape: FieldShape, kind: ElementKind) -> bool {
    match shape {
        FieldShape::Float => matches!(kind, ElementKind::F32 | ElementKind::F64),
        FieldShape::Integer => matches!(kind, ElementKind::I32 | ElementKind::I64),
        FieldShape::FloatSeq => matches!(kind, ElementKind::VecF32 | ElementKind::VecF64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    #[test]
    fn jets_mapping_is_valid() {
        let m = FieldMapping::jets();
        assert_eq!(FieldMapping::new(m.entries().to_vec()).unwrap(), m);
        assert_eq!(m.get(EventField::NTowers).column, "ntowers");
        assert_eq!(m.lookup("JetMass").unwrap().kind, ElementKind::F32);
        assert!(matches!(m.lookup("Bogus"), Err(Error::FieldNotFound(_))));
    }

    #[test]
    fn missing_field_rejected() {
        let mut entries = FieldMapping::jets().entries().to_vec();
        entries.retain(|e| e.field != EventField::TowerPhi);
        let err = FieldMapping::new(entries).unwrap_err();
        assert!(matches!(err, Error::FieldNotFound(ref f) if f == "TowerPhi"), "{err}");
    }

    #[test]
    fn duplicate_and_incompatible_entries_rejected() {
        let mut entries = FieldMapping::jets().entries().to_vec();
        entries.push(FieldEntry::new(EventField::JetPt, "jetPt2", ElementKind::F64));
        assert!(matches!(FieldMapping::new(entries), Err(Error::InvalidMapping(_))));

        let mut entries = FieldMapping::jets().entries().to_vec();
        entries[4] = FieldEntry::new(EventField::NTracks, "ntracks", ElementKind::F32);
        let err = FieldMapping::new(entries).unwrap_err();
        assert!(err.to_string().contains("NTracks cannot hold f32"), "{err}");
    }

    #[test]
    fn deserializes_through_validation() {
        let json = serde_json::to_string(&FieldMapping::jets()).unwrap();
        let back: FieldMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FieldMapping::jets());

        let short = r#"[{"field": "JetPt", "column": "pt", "kind": "f32"}]"#;
        assert!(serde_json::from_str::<FieldMapping>(short).is_err());
    }

    #[test]
    fn check_schema_flags_known_kinds_only() {
        let tree = TreeBuilder::new("t").f64("jetMass", vec![1.0]).build();
        let err = FieldMapping::jets().check_schema(&tree).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { ref column, expected: ElementKind::F32, found: ElementKind::F64 }
                if column == "jetMass"
        ));

        let tree = TreeBuilder::new("t").f32("jetMass", vec![1.0]).build();
        FieldMapping::jets().check_schema(&tree).unwrap();
    }
}
