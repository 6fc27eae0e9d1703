//! File I/O operations with encoding detection and atomic writes
//!
//! Provides safe file reading and writing with:
//! - UTF-8 and UTF-16 encoding detection
//! - Atomic writes to prevent data loss
//! - File size limits

use crate::error::{FileError, FileResult};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Detected encoding of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileEncoding {
    /// UTF-8 without BOM
    #[default]
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// UTF-16 Little Endian with BOM
    Utf16Le,
    /// UTF-16 Big Endian with BOM
    Utf16Be,
    /// Unknown/binary (lossy UTF-8 conversion used)
    Unknown,
}

/// Result of reading a file
#[derive(Debug, Clone)]
pub struct FileReadResult {
    /// The file content as a string
    pub content: String,
    /// Detected encoding
    pub encoding: FileEncoding,
    /// Original file size in bytes
    pub size_bytes: u64,
    /// Whether lossy conversion was used
    pub lossy: bool,
}

/// Detect file encoding from raw bytes
fn detect_encoding(bytes: &[u8]) -> FileEncoding {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return FileEncoding::Utf8Bom;
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return FileEncoding::Utf16Le;
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return FileEncoding::Utf16Be;
    }

    if std::str::from_utf8(bytes).is_ok() {
        FileEncoding::Utf8
    } else {
        FileEncoding::Unknown
    }
}

/// Decode bytes to string based on detected encoding
fn decode_content(bytes: &[u8], encoding: FileEncoding) -> (String, bool) {
    match encoding {
        FileEncoding::Utf8 => decode_utf8(bytes),
        // Skip BOM bytes
        FileEncoding::Utf8Bom => decode_utf8(&bytes[3..]),
        FileEncoding::Utf16Le => decode_utf16(&bytes[2..], u16::from_le_bytes),
        FileEncoding::Utf16Be => decode_utf16(&bytes[2..], u16::from_be_bytes),
        FileEncoding::Unknown => (String::from_utf8_lossy(bytes).into_owned(), true),
    }
}

fn decode_utf8(bytes: &[u8]) -> (String, bool) {
    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), false),
        Err(_) => (String::from_utf8_lossy(bytes).into_owned(), true),
    }
}

/// Decode UTF-16 code units; a dangling odd byte counts as lossy
fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> (String, bool) {
    let mut lossy = bytes.len() % 2 != 0;
    let units = bytes
        .chunks_exact(2)
        .map(|chunk| to_unit([chunk[0], chunk[1]]));

    let result: String = char::decode_utf16(units)
        .map(|r| {
            r.unwrap_or_else(|_| {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();

    (result, lossy)
}

/// Read a document with encoding detection, refusing files over `max_size` bytes
pub fn read_document(path: impl AsRef<Path>, max_size: u64) -> FileResult<FileReadResult> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();

    let metadata = std::fs::metadata(path).map_err(|e| FileError::from_read(&path_buf, e))?;
    if !metadata.is_file() {
        return Err(FileError::NotAFile { path: path_buf });
    }

    let size_bytes = metadata.len();
    if size_bytes > max_size {
        return Err(FileError::FileTooLarge {
            path: path_buf,
            size: size_bytes,
            max_size,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| FileError::from_read(&path_buf, e))?;
    Ok(decode_document(path, &bytes))
}

/// Read a document from a stream such as standard input.
///
/// At most `max_size + 1` bytes are consumed; a longer stream is refused with
/// [`FileError::FileTooLarge`]. `source` names the stream in errors and logs.
pub fn read_stream<R: Read>(reader: R, source: &Path, max_size: u64) -> FileResult<FileReadResult> {
    let mut bytes = Vec::new();
    reader
        .take(max_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| FileError::from_read(source, e))?;

    let size = bytes.len() as u64;
    if size > max_size {
        return Err(FileError::FileTooLarge {
            path: source.to_path_buf(),
            size,
            max_size,
        });
    }

    Ok(decode_document(source, &bytes))
}

fn decode_document(path: &Path, bytes: &[u8]) -> FileReadResult {
    let size_bytes = bytes.len() as u64;
    let encoding = detect_encoding(bytes);
    let (content, lossy) = decode_content(bytes, encoding);

    if lossy {
        log::warn!(
            "{} is not valid {:?}; invalid sequences were replaced",
            path.display(),
            encoding
        );
    } else {
        log::debug!("Read {} ({} bytes, {:?})", path.display(), size_bytes, encoding);
    }

    FileReadResult {
        content,
        encoding,
        size_bytes,
        lossy,
    }
}

/// Write content to a file using atomic write
///
/// The file is either fully written or unchanged.
pub fn write_file_atomic(path: impl AsRef<Path>, content: &str) -> FileResult<()> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();
    let temp_path = temp_path_for(path);

    let write_result = (|| {
        let mut file = std::fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        file.sync_all()?;
        Ok::<(), std::io::Error>(())
    })();

    if let Err(e) = write_result {
        // Clean up temp file on failure
        let _ = std::fs::remove_file(&temp_path);
        return Err(FileError::WriteError {
            path: path_buf,
            source: e,
        });
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(FileError::RenameError {
            path: path_buf,
            source: e,
        });
    }

    log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Hidden temp file next to `path`, so the final rename stays on one filesystem
fn temp_path_for(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());

    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    parent.join(format!(".{}.{}.tmp", filename, timestamp))
}
