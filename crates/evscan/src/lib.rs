//! # evscan
//!
//! Streaming decode-and-aggregate over columnar event stores.
//!
//! A [`Resource`] is a catalog of named objects; trees among them are scanned
//! row by row with a forward-only [`Cursor`]. Each row is decoded into an
//! [`Event`] through a declarative [`FieldMapping`], and configured scalar
//! fields are accumulated into fixed-width [`Histogram`]s.
//!
//! ## Example
//!
//! ```no_run
//! use evscan::{Resource, ScanConfig};
//!
//! let resource = Resource::open("jets.json").unwrap();
//! let out = evscan::pipeline::run(&resource, &ScanConfig::default(), |p| {
//!     println!("evt[{}] mass={}", p.entry, p.event.jet_mass);
//! })
//! .unwrap();
//! for slot in &out.histograms {
//!     println!("{}: mean={:?}", slot.spec.name, slot.histogram.mean());
//! }
//! ```

#![warn(clippy::all)]

pub mod column;
pub mod config;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod event;
pub mod file;
pub mod histogram;
pub mod mapping;
pub mod pipeline;
pub mod tree;

pub use column::{Column, ElementKind, Jagged, RawValue};
pub use config::{DEFAULT_TREE, HistogramSpec, ScanConfig};
pub use cursor::Cursor;
pub use decode::RecordDecoder;
pub use error::{Error, Result};
pub use event::{Event, EventField, FieldShape, SequenceGroup};
pub use file::{Catalog, KeyInfo, Resource, ResourceBuilder, TREE_CLASS};
pub use histogram::{Histogram, HistogramSnapshot};
pub use mapping::{FieldEntry, FieldMapping};
pub use pipeline::{FilledHistogram, Progress, ScanOutput};
pub use tree::{TabularObject, Tree, TreeBuilder};
