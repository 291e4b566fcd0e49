use std::fmt;

use crate::describe;

use super::kind::DirectoryKind;
use super::store::Directory;
use super::value::TagValue;

/// A lightweight handle to one tag of a directory.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    id: u16,
    directory: &'a Directory,
}

impl<'a> Tag<'a> {
    pub(crate) fn new(id: u16, directory: &'a Directory) -> Self {
        Self { id, directory }
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn directory(&self) -> &'a Directory {
        self.directory
    }

    pub fn kind(&self) -> DirectoryKind {
        self.directory.kind()
    }

    pub fn value(&self) -> Option<&'a TagValue> {
        self.directory.get(self.id)
    }

    /// Known name, if the tag belongs to the directory kind's vocabulary.
    pub fn name(&self) -> Option<&'static str> {
        describe::tag_name(self.kind(), self.id)
    }

    /// Name, or `Unknown tag (0x....)`.
    pub fn name_or_hex(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("Unknown tag (0x{:04x})", self.id),
        }
    }

    pub fn description(&self) -> Option<String> {
        describe::describe(self.directory, self.id)
    }
}

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = self
            .description()
            .unwrap_or_else(|| "[No description]".to_string());
        write!(
            f,
            "[{}] {} - {}",
            self.directory.name(),
            self.name_or_hex(),
            description
        )
    }
}
