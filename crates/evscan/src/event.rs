//! The decoded jet event record and its field identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One decoded row of a jet tree.
///
/// Track sequences have `n_tracks` elements and tower sequences `n_towers`
/// elements; the decoder enforces this.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Event {
    /// Jet transverse momentum [GeV/c].
    pub jet_pt: f32,
    /// Jet pseudorapidity.
    pub jet_eta: f32,
    /// Jet azimuthal angle.
    pub jet_phi: f32,
    /// Reconstructed jet mass [GeV/c^2].
    pub jet_mass: f32,
    /// Number of tracks.
    pub n_tracks: i32,
    /// Number of calorimeter towers.
    pub n_towers: i32,
    pub track_pt: Vec<f32>,
    pub track_eta: Vec<f32>,
    pub track_phi: Vec<f32>,
    pub track_charge: Vec<f32>,
    /// Tower total energy.
    pub tower_e: Vec<f32>,
    /// Tower electromagnetic energy.
    pub tower_eem: Vec<f32>,
    /// Tower hadronic energy.
    pub tower_ehad: Vec<f32>,
    pub tower_eta: Vec<f32>,
    pub tower_phi: Vec<f32>,
}

/// Shape of a record field, which bounds the element kinds it can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Floating-point scalar.
    Float,
    /// Integer scalar.
    Integer,
    /// Floating-point sequence.
    FloatSeq,
}

/// Variable-length groups sharing one multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceGroup {
    /// Per-track quantities, sized by `n_tracks`.
    Tracks,
    /// Per-tower quantities, sized by `n_towers`.
    Towers,
}

impl SequenceGroup {
    /// Group name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            SequenceGroup::Tracks => "tracks",
            SequenceGroup::Towers => "towers",
        }
    }
}

/// Identifier of one `Event` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventField {
    JetPt,
    JetEta,
    JetPhi,
    JetMass,
    NTracks,
    NTowers,
    TrackPt,
    TrackEta,
    TrackPhi,
    TrackCharge,
    TowerE,
    TowerEem,
    TowerEhad,
    TowerEta,
    TowerPhi,
}

impl EventField {
    /// Every field, in record order.
    pub const ALL: [EventField; 15] = [
        EventField::JetPt,
        EventField::JetEta,
        EventField::JetPhi,
        EventField::JetMass,
        EventField::NTracks,
        EventField::NTowers,
        EventField::TrackPt,
        EventField::TrackEta,
        EventField::TrackPhi,
        EventField::TrackCharge,
        EventField::TowerE,
        EventField::TowerEem,
        EventField::TowerEhad,
        EventField::TowerEta,
        EventField::TowerPhi,
    ];

    /// Field name.
    pub fn as_str(self) -> &'static str {
        match self {
            EventField::JetPt => "JetPt",
            EventField::JetEta => "JetEta",
            EventField::JetPhi => "JetPhi",
            EventField::JetMass => "JetMass",
            EventField::NTracks => "NTracks",
            EventField::NTowers => "NTowers",
            EventField::TrackPt => "TrackPt",
            EventField::TrackEta => "TrackEta",
            EventField::TrackPhi => "TrackPhi",
            EventField::TrackCharge => "TrackCharge",
            EventField::TowerE => "TowerE",
            EventField::TowerEem => "TowerEem",
            EventField::TowerEhad => "TowerEhad",
            EventField::TowerEta => "TowerEta",
            EventField::TowerPhi => "TowerPhi",
        }
    }

    pub fn shape(self) -> FieldShape {
        match self {
            EventField::JetPt | EventField::JetEta | EventField::JetPhi | EventField::JetMass => {
                FieldShape::Float
            }
            EventField::NTracks | EventField::NTowers => FieldShape::Integer,
            _ => FieldShape::FloatSeq,
        }
    }

    /// Multiplicity group for sequence fields.
    pub fn group(self) -> Option<SequenceGroup> {
        match self {
            EventField::TrackPt
            | EventField::TrackEta
            | EventField::TrackPhi
            | EventField::TrackCharge => Some(SequenceGroup::Tracks),
            EventField::TowerE
            | EventField::TowerEem
            | EventField::TowerEhad
            | EventField::TowerEta
            | EventField::TowerPhi => Some(SequenceGroup::Towers),
            _ => None,
        }
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EventField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::FieldNotFound(s.to_string()))
    }
}

impl Event {
    /// Scalar value of `field` as `f64`; `None` for sequence fields.
    pub fn scalar(&self, field: EventField) -> Option<f64> {
        let v = match field {
            EventField::JetPt => self.jet_pt as f64,
            EventField::JetEta => self.jet_eta as f64,
            EventField::JetPhi => self.jet_phi as f64,
            EventField::JetMass => self.jet_mass as f64,
            EventField::NTracks => self.n_tracks as f64,
            EventField::NTowers => self.n_towers as f64,
            _ => return None,
        };
        Some(v)
    }

    /// Sequence storage of `field`; `None` for scalar fields.
    pub fn sequence(&self, field: EventField) -> Option<&Vec<f32>> {
        match field {
            EventField::TrackPt => Some(&self.track_pt),
            EventField::TrackEta => Some(&self.track_eta),
            EventField::TrackPhi => Some(&self.track_phi),
            EventField::TrackCharge => Some(&self.track_charge),
            EventField::TowerE => Some(&self.tower_e),
            EventField::TowerEem => Some(&self.tower_eem),
            EventField::TowerEhad => Some(&self.tower_ehad),
            EventField::TowerEta => Some(&self.tower_eta),
            EventField::TowerPhi => Some(&self.tower_phi),
            _ => None,
        }
    }

    pub(crate) fn sequence_mut(&mut self, field: EventField) -> Option<&mut Vec<f32>> {
        match field {
            EventField::TrackPt => Some(&mut self.track_pt),
            EventField::TrackEta => Some(&mut self.track_eta),
            EventField::TrackPhi => Some(&mut self.track_phi),
            EventField::TrackCharge => Some(&mut self.track_charge),
            EventField::TowerE => Some(&mut self.tower_e),
            EventField::TowerEem => Some(&mut self.tower_eem),
            EventField::TowerEhad => Some(&mut self.tower_ehad),
            EventField::TowerEta => Some(&mut self.tower_eta),
            EventField::TowerPhi => Some(&mut self.tower_phi),
            _ => None,
        }
    }

    /// Declared multiplicity of `group`.
    pub fn multiplicity(&self, group: SequenceGroup) -> i32 {
        match group {
            SequenceGroup::Tracks => self.n_tracks,
            SequenceGroup::Towers => self.n_towers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for f in EventField::ALL {
            assert_eq!(f.as_str().parse::<EventField>().unwrap(), f);
        }
        assert!(matches!("JetE".parse::<EventField>(), Err(Error::FieldNotFound(_))));
    }

    #[test]
    fn shapes_and_groups_agree() {
        for f in EventField::ALL {
            assert_eq!(f.shape() == FieldShape::FloatSeq, f.group().is_some(), "{f}");
        }
        assert_eq!(EventField::TrackCharge.group(), Some(SequenceGroup::Tracks));
        assert_eq!(EventField::TowerEhad.group(), Some(SequenceGroup::Towers));
    }

    #[test]
    fn scalar_reads() {
        let evt = Event { jet_mass: 1.5, n_towers: 7, ..Default::default() };
        assert_eq!(evt.scalar(EventField::JetMass), Some(1.5));
        assert_eq!(evt.scalar(EventField::NTowers), Some(7.0));
        assert_eq!(evt.scalar(EventField::TowerE), None);
        assert!(evt.sequence(EventField::JetPt).is_none());
    }
}
