//! Resource files: a JSON catalog of named objects, trees among them.
//!
//! Layout:
//!
//! ```text
//! {
//!   "objects": {
//!     "<key>": {
//!       "class": "TTree",
//!       "entries": <u64, optional; defaults to the longest branch>,
//!       "branches": { "<column>": { "type": "<kind>", "values": [...] } }
//!     },
//!     "<other key>": { "class": "<anything else>" }
//!   }
//! }
//! ```
//!
//! Sequence kinds (`f32[]`, `f64[]`, `i32[]`) store one JSON array per entry.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::column::{Column, Jagged};
use crate::error::{Error, Result};
use crate::tree::{TabularObject, Tree};

/// Class name that marks an object as a tree.
pub const TREE_CLASS: &str = "TTree";

/// Catalog lookup: resolve object keys into tabular objects.
pub trait Catalog {
    /// Resolve `key` into a tabular object.
    ///
    /// Fails with `ObjectNotFound` when the key is absent and
    /// `WrongObjectKind` when it names a non-tabular object.
    fn resolve(&self, key: &str) -> Result<Box<dyn TabularObject>>;

    /// List every object in the catalog.
    fn list_keys(&self) -> Vec<KeyInfo>;
}

/// Public info about a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Object name.
    pub name: String,
    /// Class name (`TTree` for tabular objects).
    pub class_name: String,
}

#[derive(Debug, Clone)]
enum CatalogObject {
    Tree(Tree),
    Other { class: String },
}

/// A resource file opened for scanning.
#[derive(Debug, Clone)]
pub struct Resource {
    path: PathBuf,
    objects: BTreeMap<String, CatalogObject>,
}

impl Resource {
    /// Open and parse a resource file from disk using memory mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source| Error::ResourceOpen { path: path.clone(), source };
        let file = fs::File::open(&path).map_err(open_err)?;
        let len = file.metadata().map_err(open_err)?.len();
        if len == 0 {
            return Self::from_slice(&[], path);
        }
        // SAFETY: the map is read-only and dropped before this function
        // returns; concurrent truncation of the file is outside our contract.
        let mmap = unsafe { memmap2::Mmap::map(&file) }.map_err(open_err)?;
        tracing::debug!(path = %path.display(), bytes = mmap.len(), "mapped resource");
        Self::from_slice(&mmap, path)
    }

    /// Parse a resource from bytes (for testing).
    pub fn from_bytes(data: Vec<u8>, path: PathBuf) -> Result<Self> {
        Self::from_slice(&data, path)
    }

    fn from_slice(data: &[u8], path: PathBuf) -> Result<Self> {
        let repr: ResourceRepr = serde_json::from_slice(data)?;
        let objects = repr
            .objects
            .into_iter()
            .map(|(name, obj)| {
                let object = obj.into_object(&name)?;
                Ok((name, object))
            })
            .collect::<Result<_>>()?;
        Ok(Self { path, objects })
    }

    /// Path the resource was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a tree by name.
    pub fn get_tree(&self, name: &str) -> Result<Tree> {
        match self.objects.get(name) {
            Some(CatalogObject::Tree(tree)) => Ok(tree.clone()),
            Some(CatalogObject::Other { class }) => {
                Err(Error::WrongObjectKind { key: name.to_string(), class: class.clone() })
            }
            None => Err(Error::ObjectNotFound(name.to_string())),
        }
    }

    /// Serialize back to the on-disk JSON layout.
    pub fn to_json(&self) -> Result<String> {
        let objects = self
            .objects
            .iter()
            .map(|(name, obj)| (name.clone(), ObjectRepr::from_object(obj)))
            .collect();
        Ok(serde_json::to_string(&ResourceRepr { objects })?)
    }

    /// Write the resource to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .map_err(|source| Error::ResourceOpen { path: path.to_path_buf(), source })
    }
}

impl Catalog for Resource {
    fn resolve(&self, key: &str) -> Result<Box<dyn TabularObject>> {
        Ok(Box::new(self.get_tree(key)?))
    }

    fn list_keys(&self) -> Vec<KeyInfo> {
        self.objects
            .iter()
            .map(|(name, obj)| KeyInfo {
                name: name.clone(),
                class_name: match obj {
                    CatalogObject::Tree(_) => TREE_CLASS.to_string(),
                    CatalogObject::Other { class } => class.clone(),
                },
            })
            .collect()
    }
}

/// Programmatic construction of resources.
#[derive(Debug, Default)]
pub struct ResourceBuilder {
    objects: BTreeMap<String, CatalogObject>,
}

impl ResourceBuilder {
    /// Start an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tree under its own name.
    pub fn tree(mut self, tree: Tree) -> Self {
        self.objects.insert(tree.name().to_string(), CatalogObject::Tree(tree));
        self
    }

    /// Add a non-tabular object.
    pub fn object(mut self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.objects.insert(name.into(), CatalogObject::Other { class: class.into() });
        self
    }

    /// Finish the resource.
    pub fn build(self) -> Resource {
        Resource { path: PathBuf::from("<memory>"), objects: self.objects }
    }
}

// ── On-disk representation ─────────────────────────────────

#[derive(Serialize, Deserialize)]
struct ResourceRepr {
    objects: BTreeMap<String, ObjectRepr>,
}

#[derive(Serialize, Deserialize)]
struct ObjectRepr {
    class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    entries: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    branches: BTreeMap<String, BranchRepr>,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "values")]
enum BranchRepr {
    #[serde(rename = "f32")]
    F32(Vec<f32>),
    #[serde(rename = "f64")]
    F64(Vec<f64>),
    #[serde(rename = "i32")]
    I32(Vec<i32>),
    #[serde(rename = "i64")]
    I64(Vec<i64>),
    #[serde(rename = "f32[]")]
    VecF32(Vec<Vec<f32>>),
    #[serde(rename = "f64[]")]
    VecF64(Vec<Vec<f64>>),
    #[serde(rename = "i32[]")]
    VecI32(Vec<Vec<i32>>),
}

impl ObjectRepr {
    fn into_object(self, name: &str) -> Result<CatalogObject> {
        if self.class != TREE_CLASS {
            return Ok(CatalogObject::Other { class: self.class });
        }
        let columns: BTreeMap<String, Column> =
            self.branches.into_iter().map(|(k, b)| (k, b.into_column())).collect();
        let longest = columns.values().map(|c| c.len() as u64).max().unwrap_or(0);
        let entries = self.entries.unwrap_or(longest);
        if entries < longest {
            return Err(Error::Format(format!(
                "tree '{name}' declares {entries} entries but a branch holds {longest}"
            )));
        }
        Ok(CatalogObject::Tree(Tree::new(name, entries, columns)))
    }

    fn from_object(obj: &CatalogObject) -> Self {
        match obj {
            CatalogObject::Tree(tree) => ObjectRepr {
                class: TREE_CLASS.to_string(),
                entries: Some(tree.row_count()),
                branches: tree
                    .columns()
                    .iter()
                    .map(|(k, c)| (k.clone(), BranchRepr::from_column(c)))
                    .collect(),
            },
            CatalogObject::Other { class } => {
                ObjectRepr { class: class.clone(), entries: None, branches: BTreeMap::new() }
            }
        }
    }
}

impl BranchRepr {
    fn into_column(self) -> Column {
        match self {
            BranchRepr::F32(v) => Column::F32(v),
            BranchRepr::F64(v) => Column::F64(v),
            BranchRepr::I32(v) => Column::I32(v),
            BranchRepr::I64(v) => Column::I64(v),
            BranchRepr::VecF32(rows) => Column::VecF32(Jagged::from_nested(rows)),
            BranchRepr::VecF64(rows) => Column::VecF64(Jagged::from_nested(rows)),
            BranchRepr::VecI32(rows) => Column::VecI32(Jagged::from_nested(rows)),
        }
    }

    fn from_column(col: &Column) -> Self {
        match col {
            Column::F32(v) => BranchRepr::F32(v.clone()),
            Column::F64(v) => BranchRepr::F64(v.clone()),
            Column::I32(v) => BranchRepr::I32(v.clone()),
            Column::I64(v) => BranchRepr::I64(v.clone()),
            Column::VecF32(j) => BranchRepr::VecF32(j.to_nested()),
            Column::VecF64(j) => BranchRepr::VecF64(j.to_nested()),
            Column::VecI32(j) => BranchRepr::VecI32(j.to_nested()),
        }
    }
}
