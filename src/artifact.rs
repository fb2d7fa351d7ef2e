//! Versioned on-disk container for trained intent classifiers.
//!
//! Layout (little endian):
//!
//! ```text
//! magic    [u8; 8]  b"FNDINTNT"
//! version  u16
//! crc32    u32      checksum of the payload
//! length   u64      payload size in bytes
//! payload  [u8]     bincode-encoded `IntentClassifier`
//! ```

use std::{
    fs,
    io::{Cursor, Read, Write},
    path::{Path, PathBuf},
};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::info;

use crate::{
    classifier::IntentClassifier,
    error::{ClassifierError, Result},
};

pub const MAGIC: [u8; 8] = *b"FNDINTNT";
pub const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 8 + 2 + 4 + 8;

/// Encode a classifier into the container format.
pub fn to_bytes(classifier: &IntentClassifier) -> Result<Vec<u8>> {
    let payload = bincode::serialize(classifier)
        .map_err(|e| ClassifierError::Training(format!("encoding artifact: {e}")))?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    write_container(&mut out, &payload)
        .map_err(|e| ClassifierError::Training(format!("encoding artifact: {e}")))?;
    Ok(out)
}

fn write_container(out: &mut impl Write, payload: &[u8]) -> std::io::Result<()> {
    out.write_all(&MAGIC)?;
    out.write_u16::<LittleEndian>(FORMAT_VERSION)?;
    out.write_u32::<LittleEndian>(crc32fast::hash(payload))?;
    out.write_u64::<LittleEndian>(payload.len() as u64)?;
    out.write_all(payload)
}

/// Decode and validate a container produced by [`to_bytes`].
pub fn from_bytes(bytes: &[u8]) -> Result<IntentClassifier> {
    let mut cursor = Cursor::new(bytes);
    let mut magic = [0u8; 8];
    cursor
        .read_exact(&mut magic)
        .map_err(|_| mismatch("file is too short to be an intent model"))?;
    if magic != MAGIC {
        return Err(mismatch("not an intent model (bad magic bytes)"));
    }
    let version = cursor
        .read_u16::<LittleEndian>()
        .map_err(|_| mismatch("truncated header"))?;
    if version != FORMAT_VERSION {
        return Err(ClassifierError::TypeMismatch(format!(
            "unsupported artifact format version {version} (expected {FORMAT_VERSION})"
        )));
    }
    let checksum = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| mismatch("truncated header"))?;
    let length = cursor
        .read_u64::<LittleEndian>()
        .map_err(|_| mismatch("truncated header"))?;

    let payload = &bytes[HEADER_LEN..];
    if payload.len() as u64 != length {
        return Err(ClassifierError::TypeMismatch(format!(
            "payload is {} bytes, header declares {length}",
            payload.len()
        )));
    }
    if crc32fast::hash(payload) != checksum {
        return Err(mismatch("payload checksum mismatch"));
    }

    let classifier: IntentClassifier = bincode::deserialize(payload)
        .map_err(|e| ClassifierError::TypeMismatch(format!("decoding payload: {e}")))?;
    classifier.validate()?;
    Ok(classifier)
}

/// Write the classifier to `path`, replacing any previous artifact only once
/// the new one is fully on disk.
pub fn save(classifier: &IntentClassifier, path: &Path) -> Result<()> {
    let bytes = to_bytes(classifier)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ClassifierError::io(parent, e))?;
    }
    let staging = staging_path(path);
    fs::write(&staging, &bytes).map_err(|e| ClassifierError::io(&staging, e))?;
    fs::rename(&staging, path).map_err(|e| ClassifierError::io(path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "saved intent model");
    Ok(())
}

pub fn load(path: &Path) -> Result<IntentClassifier> {
    info!(path = %path.display(), "loading intent model");
    let bytes = fs::read(path).map_err(|e| ClassifierError::io(path, e))?;
    let classifier = from_bytes(&bytes)?;
    info!(
        labels = ?classifier.labels(),
        vectorizer = %classifier.vectorizer(),
        "loaded intent model"
    );
    Ok(classifier)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn mismatch(reason: &str) -> ClassifierError {
    ClassifierError::TypeMismatch(reason.to_string())
}
