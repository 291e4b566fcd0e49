//! The IFD walker.
//!
//! Walks the directory graph of one TIFF structure, decoding every entry into
//! the [`Directory`] being built and following directory pointers (EXIF, GPS,
//! interoperability, SubIFDs, MakerNote) and next-IFD links.
//!
//! # Resource guard
//!
//! A single visited set of absolute directory offsets is shared by the whole
//! walk. An offset already in the set is skipped silently, so cyclic or
//! repeated pointers cannot make the walk revisit a directory. Next-IFD
//! links are followed iteratively and pointer nesting is limited to the
//! fixed hierarchy IFD0 → EXIF → interoperability/MakerNote, so the stack
//! depth does not depend on the input either.
//!
//! # Failures
//!
//! Only header problems are fatal. Anything wrong inside a directory is
//! recorded on that directory and the walk continues with what it has.

use std::collections::HashSet;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::config::{DecodeOptions, FatalPolicy};
use crate::directory::{new_store, Directory, DirectoryKind, TagArray, TagValue, ValueSink};
use crate::error::TiffError;
use crate::io::ByteReader;
use crate::makernote::{MakernoteBase, MakernoteResolver, SignatureResolver};
use crate::metadata::Metadata;

use super::parser::{IfdEntry, TiffHeader, EXIF_SIGNATURE, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE};
use super::tags::ExifTag;
use super::values::decode_value;

// =============================================================================
// Constants
// =============================================================================

/// Overrun of a directory's extent past the end of the data that is accepted
/// without error. Older versions of jhead truncated EXIF segments two bytes
/// short of the final next-IFD pointer.
const JHEAD_TRUNCATION_SLACK: usize = 2;

/// Size of the next-IFD pointer that follows the entry table
const NEXT_IFD_POINTER_SIZE: usize = 4;

// =============================================================================
// Decoder
// =============================================================================

/// Decodes EXIF/TIFF buffers into [`Metadata`].
pub struct Decoder {
    options: DecodeOptions,
    resolver: Box<dyn MakernoteResolver>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Decoder {
    /// Default options and the [`SignatureResolver`].
    pub fn new() -> Self {
        Self {
            options: DecodeOptions::default(),
            resolver: Box::new(SignatureResolver),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver(mut self, resolver: impl MakernoteResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Decode an EXIF payload starting with `Exif\0\0`. Never panics.
    pub fn decode(&self, buffer: &[u8]) -> Metadata {
        self.decode_bytes(Bytes::copy_from_slice(buffer))
    }

    /// Like [`Decoder::decode`], without copying the buffer.
    pub fn decode_bytes(&self, buffer: Bytes) -> Metadata {
        self.try_decode(buffer)
            .unwrap_or_else(|err| self.fatal(err))
    }

    /// Decode a buffer that starts directly with a TIFF header.
    pub fn decode_tiff(&self, buffer: &[u8]) -> Metadata {
        self.try_decode_tiff(Bytes::copy_from_slice(buffer))
            .unwrap_or_else(|err| self.fatal(err))
    }

    /// Decode an EXIF payload, reporting header failures as an error.
    pub fn try_decode(&self, buffer: Bytes) -> Result<Metadata, TiffError> {
        let header = TiffHeader::parse_exif(&buffer)?;
        Ok(self.walk(buffer, header, EXIF_SIGNATURE.len()))
    }

    /// Decode a bare TIFF structure, reporting header failures as an error.
    pub fn try_decode_tiff(&self, buffer: Bytes) -> Result<Metadata, TiffError> {
        let header = TiffHeader::parse(&buffer)?;
        Ok(self.walk(buffer, header, 0))
    }

    fn fatal(&self, err: TiffError) -> Metadata {
        warn!(error = %err, "cannot decode TIFF header");
        let mut metadata = Metadata::new();
        if self.options.fatal_policy == FatalPolicy::ErrorDirectory {
            metadata.add(Directory::error(err.to_string()));
        }
        metadata
    }

    fn walk(&self, buffer: Bytes, header: TiffHeader, tiff_base: usize) -> Metadata {
        let reader = ByteReader::new(buffer, header.byte_order);
        let mut walk = Walk::new(self.resolver.as_ref());
        walk.run(&reader, header, tiff_base);
        walk.finish()
    }
}

/// Decode an EXIF payload with the default [`Decoder`].
pub fn decode(buffer: &[u8]) -> Metadata {
    Decoder::new().decode(buffer)
}

/// Decode a bare TIFF structure with the default [`Decoder`].
pub fn decode_tiff(buffer: &[u8]) -> Metadata {
    Decoder::new().decode_tiff(buffer)
}

// =============================================================================
// Walk
// =============================================================================

/// State of one extraction pass.
struct Walk<'r> {
    resolver: &'r dyn MakernoteResolver,

    /// Absolute offsets of every directory entered so far
    visited: HashSet<usize>,

    /// Directories in creation order; a slot is filled once its directory completes
    slots: Vec<Option<Directory>>,

    make: Option<String>,
    model: Option<String>,
    thumbnail: Option<Bytes>,
}

impl<'r> Walk<'r> {
    fn new(resolver: &'r dyn MakernoteResolver) -> Self {
        Self {
            resolver,
            visited: HashSet::new(),
            slots: Vec::new(),
            make: None,
            model: None,
            thumbnail: None,
        }
    }

    fn run(&mut self, reader: &ByteReader, header: TiffHeader, tiff_base: usize) {
        let mut ifd0 = new_store(DirectoryKind::Ifd0);

        let mut start = tiff_base.saturating_add(header.first_ifd_offset as usize);
        if !reader.contains(start, 2) {
            let fallback = tiff_base + TIFF_HEADER_SIZE;
            ifd0.record_error(format!(
                "First IFD offset {} is beyond the end of the TIFF data, trying offset {}",
                header.first_ifd_offset, TIFF_HEADER_SIZE
            ));
            warn!(offset = header.first_ifd_offset, "first IFD offset out of range");
            start = fallback;
        }

        self.visited.insert(start);
        self.decode_chain(reader, start, tiff_base, ifd0);
    }

    fn finish(self) -> Metadata {
        let mut metadata = Metadata::new();
        for directory in self.slots.into_iter().flatten() {
            metadata.add(directory);
        }
        if let Some(thumbnail) = self.thumbnail {
            metadata.set_thumbnail(thumbnail);
        }
        metadata
    }

    /// Decode the directory at `start` and everything linked after it.
    ///
    /// `start` must already be in the visited set.
    fn decode_chain(
        &mut self,
        reader: &ByteReader,
        mut start: usize,
        base: usize,
        mut directory: Directory,
    ) {
        loop {
            let slot = self.slots.len();
            self.slots.push(None);

            debug!(kind = %directory.kind(), offset = start, "decoding directory");
            let next = self.decode_ifd(reader, start, base, &mut directory);
            let kind = directory.kind();
            self.complete(slot, directory, reader, base);

            match next {
                Some(next_start) => {
                    start = next_start;
                    directory = new_store(kind.chained());
                }
                None => break,
            }
        }
    }

    /// Store a finished directory in its slot.
    fn complete(&mut self, slot: usize, mut directory: Directory, reader: &ByteReader, base: usize) {
        if directory.kind() == DirectoryKind::Thumbnail && self.thumbnail.is_none() {
            self.extract_thumbnail(&mut directory, reader, base);
        }
        debug!(
            kind = %directory.kind(),
            tags = directory.len(),
            errors = directory.errors().len(),
            "directory complete"
        );
        self.slots[slot] = Some(directory);
    }

    /// Decode the entries of one directory. Returns the absolute offset of
    /// the next directory in the chain, already marked visited.
    fn decode_ifd(
        &mut self,
        reader: &ByteReader,
        start: usize,
        base: usize,
        directory: &mut Directory,
    ) -> Option<usize> {
        let count = match reader.read_u16(start) {
            Ok(count) => count as usize,
            Err(err) => {
                record(directory, format!("Directory at offset {} is unreadable: {}", start, err));
                return None;
            }
        };

        let table_end = start + 2 + IFD_ENTRY_SIZE * count;
        let extent = table_end + NEXT_IFD_POINTER_SIZE;
        let overrun = extent.saturating_sub(reader.len());
        if overrun != 0 && overrun != JHEAD_TRUNCATION_SLACK {
            record(
                directory,
                format!(
                    "Illegally sized IFD: {} entries at offset {} overrun the data by {} bytes",
                    count, start, overrun
                ),
            );
            return None;
        }

        for index in 0..count {
            self.decode_entry(reader, start + 2 + IFD_ENTRY_SIZE * index, base, directory);
        }

        // Missing when the directory was accepted within the slack
        let next = reader.read_u32(table_end).ok()?;
        if next == 0 {
            return None;
        }
        let target = base.saturating_add(next as usize);
        if !reader.contains(target, 2) {
            record(
                directory,
                format!("Next IFD offset {} is beyond the end of the data", next),
            );
            return None;
        }
        if !self.visited.insert(target) {
            debug!(offset = target, "next IFD already decoded, skipping");
            return None;
        }
        Some(target)
    }

    fn decode_entry(
        &mut self,
        reader: &ByteReader,
        position: usize,
        base: usize,
        directory: &mut Directory,
    ) {
        let entry = match IfdEntry::read(reader, position) {
            Ok(entry) => entry,
            Err(err) => {
                record(directory, format!("Unreadable IFD entry at offset {}: {}", position, err));
                return;
            }
        };

        let Some(field_type) = entry.field_type else {
            record(
                directory,
                format!(
                    "Invalid TIFF tag format code {} for tag 0x{:04X}",
                    entry.field_type_raw, entry.tag
                ),
            );
            return;
        };

        let byte_count = field_type.size_in_bytes() as u64 * entry.count as u64;
        let value_position = if entry.is_inline() {
            entry.value_field_position
        } else {
            let offset = entry.value_offset(reader.byte_order());
            let target = base.checked_add(offset as usize);
            match (target, usize::try_from(byte_count)) {
                (Some(target), Ok(len)) if reader.contains(target, len) => target,
                _ => {
                    record(
                        directory,
                        format!(
                            "Illegal TIFF tag pointer offset for tag 0x{:04X}: {} bytes at offset {} exceed the data",
                            entry.tag, byte_count, offset
                        ),
                    );
                    return;
                }
            }
        };

        let value = match decode_value(reader, field_type, entry.count, value_position) {
            Ok(value) => value,
            Err(err) => {
                record(
                    directory,
                    format!("Cannot decode tag 0x{:04X}: {}", entry.tag, err),
                );
                return;
            }
        };
        trace!(
            tag = entry.tag,
            field_type = field_type.name(),
            count = entry.count,
            "decoded entry"
        );

        let kind = directory.kind();
        let pointer = pointer_target(kind, entry.tag).map(|target| (target, pointer_offsets(&value)));
        let is_makernote = kind == DirectoryKind::Exif && entry.tag == ExifTag::MakerNote.as_u16();

        if let Err(err) = directory.set_value(entry.tag, value) {
            record(directory, err.to_string());
            return;
        }
        if kind == DirectoryKind::Ifd0 {
            if entry.tag == ExifTag::Make.as_u16() {
                self.make = directory.get_string(entry.tag);
            } else if entry.tag == ExifTag::Model.as_u16() {
                self.model = directory.get_string(entry.tag);
            }
        }

        if let Some((target_kind, offsets)) = pointer {
            if offsets.is_empty() {
                record(
                    directory,
                    format!(
                        "{} pointer (tag 0x{:04X}) has no usable offset",
                        target_kind, entry.tag
                    ),
                );
            }
            for offset in offsets {
                self.follow(reader, base, offset, target_kind, directory);
            }
        } else if is_makernote {
            self.follow_makernote(reader, base, value_position, byte_count as usize, directory);
        }
    }

    /// Enter the directory an IFD pointer refers to.
    fn follow(
        &mut self,
        reader: &ByteReader,
        base: usize,
        offset: u32,
        kind: DirectoryKind,
        parent: &mut Directory,
    ) {
        let target = base.saturating_add(offset as usize);
        if !reader.contains(target, 2) {
            record(
                parent,
                format!("{} IFD offset {} is beyond the end of the data", kind, offset),
            );
            return;
        }
        if !self.visited.insert(target) {
            debug!(%kind, offset = target, "directory already decoded, skipping");
            return;
        }
        self.decode_chain(reader, target, base, new_store(kind));
    }

    fn follow_makernote(
        &mut self,
        reader: &ByteReader,
        base: usize,
        position: usize,
        len: usize,
        parent: &mut Directory,
    ) {
        let data = match reader.read_bytes(position, len) {
            Ok(data) => data,
            Err(_) => return,
        };
        let Some(layout) =
            self.resolver
                .resolve(self.make.as_deref(), self.model.as_deref(), &data)
        else {
            debug!(make = ?self.make, "unrecognised makernote, kept as raw bytes");
            return;
        };
        debug!(kind = %layout.kind, base = ?layout.base, ifd_offset = layout.ifd_offset, "makernote resolved");

        let makernote_base = match layout.base {
            MakernoteBase::Tiff => base,
            MakernoteBase::Makernote => position,
            MakernoteBase::MakernoteOffset(offset) => position.saturating_add(offset),
        };
        let start = position.saturating_add(layout.ifd_offset);
        let reader = match layout.byte_order {
            Some(byte_order) => reader.with_byte_order(byte_order),
            None => reader.clone(),
        };

        if !reader.contains(start, 2) {
            record(
                parent,
                format!("{} offset {} is beyond the end of the data", layout.kind, start),
            );
            return;
        }
        if !self.visited.insert(start) {
            debug!(offset = start, "makernote directory already decoded, skipping");
            return;
        }
        self.decode_chain(&reader, start, makernote_base, new_store(layout.kind));
    }

    fn extract_thumbnail(&mut self, directory: &mut Directory, reader: &ByteReader, base: usize) {
        let offset = directory.get_int(ExifTag::ThumbnailOffset.as_u16());
        let length = directory.get_int(ExifTag::ThumbnailLength.as_u16());
        let (Ok(offset), Ok(length)) = (offset, length) else {
            return;
        };

        let located = usize::try_from(offset)
            .ok()
            .zip(usize::try_from(length).ok())
            .and_then(|(offset, length)| {
                reader.read_bytes(base.checked_add(offset)?, length).ok()
            });
        match located {
            Some(data) => self.thumbnail = Some(data),
            None => record(
                directory,
                format!(
                    "Thumbnail data ({} bytes at offset {}) is beyond the end of the data",
                    length, offset
                ),
            ),
        }
    }
}

fn record(directory: &mut Directory, message: String) {
    warn!(kind = %directory.kind(), "{}", message);
    ValueSink::record_error(directory, message);
}

/// Kind of the directory a pointer tag leads to, for the directory being decoded.
fn pointer_target(kind: DirectoryKind, tag: u16) -> Option<DirectoryKind> {
    match (kind, ExifTag::from_u16(tag)?) {
        (DirectoryKind::Ifd0, ExifTag::ExifOffset) => Some(DirectoryKind::Exif),
        (DirectoryKind::Ifd0, ExifTag::GpsInfo) => Some(DirectoryKind::Gps),
        (DirectoryKind::Ifd0, ExifTag::SubIfds) => Some(DirectoryKind::SubIfd),
        (DirectoryKind::Ifd0 | DirectoryKind::Exif, ExifTag::InteropOffset) => {
            Some(DirectoryKind::Interop)
        }
        _ => None,
    }
}

fn pointer_offsets(value: &TagValue) -> Vec<u32> {
    match value {
        TagValue::Unsigned(offset) => vec![*offset],
        TagValue::Array(TagArray::Unsigned(offsets)) => offsets.clone(),
        // SLONG pointers; negative offsets are dropped
        TagValue::Signed(offset) => u32::try_from(*offset).into_iter().collect(),
        TagValue::Array(TagArray::Signed(offsets)) => offsets
            .iter()
            .filter_map(|&offset| u32::try_from(offset).ok())
            .collect(),
        _ => Vec::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================
