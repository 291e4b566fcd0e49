//! The per-extraction collection of decoded directories.

use std::collections::HashMap;

use bytes::Bytes;

use crate::describe;
use crate::directory::{Directory, DirectoryKind};

/// All directories decoded from one buffer, in creation order.
///
/// Parents precede the directories they point to. Several directories of one
/// kind (a chain of thumbnails, multiple SubIFDs) are all retained and stay
/// reachable through [`Metadata::stores_of_kind`]; lookups by kind such as
/// [`Metadata::first_of_kind`] resolve to the first one created.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    directories: Vec<Directory>,
    first_by_kind: HashMap<DirectoryKind, usize>,
    thumbnail: Option<Bytes>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed directory.
    pub fn add(&mut self, directory: Directory) {
        self.first_by_kind
            .entry(directory.kind())
            .or_insert(self.directories.len());
        self.directories.push(directory);
    }

    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Directory> {
        self.directories.iter()
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    pub fn contains_kind(&self, kind: DirectoryKind) -> bool {
        self.first_by_kind.contains_key(&kind)
    }

    /// Every directory of `kind`, in creation order.
    pub fn stores_of_kind(&self, kind: DirectoryKind) -> impl Iterator<Item = &Directory> + '_ {
        self.directories.iter().filter(move |d| d.kind() == kind)
    }

    pub fn first_of_kind(&self, kind: DirectoryKind) -> Option<&Directory> {
        self.first_by_kind
            .get(&kind)
            .map(|&index| &self.directories[index])
    }

    pub fn has_errors(&self) -> bool {
        self.directories.iter().any(Directory::has_errors)
    }

    /// `(kind, message)` for every recorded error.
    pub fn errors(&self) -> impl Iterator<Item = (DirectoryKind, &str)> + '_ {
        self.directories.iter().flat_map(|d| {
            d.errors()
                .iter()
                .map(move |message| (d.kind(), message.as_str()))
        })
    }

    /// Embedded JPEG thumbnail, when the thumbnail IFD locates one.
    pub fn thumbnail(&self) -> Option<&Bytes> {
        self.thumbnail.as_ref()
    }

    pub(crate) fn set_thumbnail(&mut self, data: Bytes) {
        self.thumbnail = Some(data);
    }

    /// Signed decimal (latitude, longitude) from the first GPS directory.
    pub fn geo_location(&self) -> Option<(f64, f64)> {
        describe::geo_location(self.first_of_kind(DirectoryKind::Gps)?)
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = &'a Directory;
    type IntoIter = std::slice::Iter<'a, Directory>;

    fn into_iter(self) -> Self::IntoIter {
        self.directories.iter()
    }
}
