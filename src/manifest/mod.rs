mod error;

#[cfg(test)]
mod tests;

pub use error::ManifestError;

use log::debug;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Location of the manifest inside a jar
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Key that names the entry class, matched case-insensitively
const MAIN_CLASS_PREFIX: &[u8] = b"Main-Class: ";

/// Scan raw manifest bytes for the first `Main-Class: ` line
///
/// Lines are maximal runs of bytes that are neither `\n` nor `\r`, so blank
/// lines and CRLF endings are skipped and a missing final newline still
/// yields a complete line. The value runs to the end of the line and is not
/// trimmed. Continuation lines are not folded.
pub fn scan_main_class(bytes: &[u8]) -> Option<String> {
    manifest_lines(bytes)
        .find(|line| is_main_class_line(line))
        .map(|line| String::from_utf8_lossy(&line[MAIN_CLASS_PREFIX.len()..]).into_owned())
}

fn manifest_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|&b| b == b'\n' || b == b'\r')
        .filter(|line| !line.is_empty())
}

fn is_main_class_line(line: &[u8]) -> bool {
    line.len() >= MAIN_CLASS_PREFIX.len()
        && line[..MAIN_CLASS_PREFIX.len()].eq_ignore_ascii_case(MAIN_CLASS_PREFIX)
}

/// Read-only view over a jar (zip) archive
pub struct JarArchive<R> {
    archive: ZipArchive<R>,
}

impl JarArchive<File> {
    /// Open a jar on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> JarArchive<R> {
    /// Wrap any seekable reader holding zip bytes
    pub fn from_reader(reader: R) -> Result<Self, ManifestError> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a named entry in full
    ///
    /// A missing entry is `Ok(None)`; only I/O and format problems are errors.
    pub fn find(&mut self, name: &str) -> Result<Option<Vec<u8>>, ManifestError> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        Ok(Some(contents))
    }

    /// Entry class declared by the manifest, if any
    pub fn main_class(&mut self) -> Result<Option<String>, ManifestError> {
        Ok(self
            .find(MANIFEST_PATH)?
            .and_then(|manifest| scan_main_class(&manifest)))
    }
}

/// Detect the entry class of the jar at `path`
///
/// An unreadable archive and a manifest without `Main-Class` both give
/// `None`; the cause is only logged.
pub fn detect_main_class(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();

    match JarArchive::open(path).and_then(|mut jar| jar.main_class()) {
        Ok(Some(class)) => {
            debug!("{}: Main-Class is {}", path.display(), class);
            Some(class)
        }
        Ok(None) => {
            debug!("{}: no Main-Class in {}", path.display(), MANIFEST_PATH);
            None
        }
        Err(e) => {
            debug!("{}: cannot read manifest: {}", path.display(), e);
            None
        }
    }
}
