//! Version extraction from editor binaries and project version files.
//!
//! Editor binaries carry their product version in a version resource whose
//! string table stores `ProductVersion` as a `String` entry: a
//! `wLength`/`wValueLength`/`wType` header, the NUL-terminated UTF-16LE key,
//! alignment padding, and the NUL-terminated UTF-16LE value. The binary is
//! scanned for that key in fixed-size chunks, so multi-hundred megabyte
//! executables are never loaded whole. Occurrences of the key without a
//! plausible header (query paths such as
//! `\StringFileInfo\040904b0\ProductVersion` in the data section) are skipped.

use crate::ProbeError;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use vhub_schema::{parse_project_version, EditorVersion};

const PRODUCT_VERSION_KEY: &str = "ProductVersion";
const CHUNK_SIZE: usize = 1 << 20;
const MAX_VALUE_UNITS: usize = 128;
const MAX_PADDING_UNITS: usize = 2;
/// `wLength`, `wValueLength`, `wType`.
const HEADER_LEN: usize = 6;
/// `wType` of a `String` entry holding text.
const TEXT_TYPE: usize = 1;

/// Derive an engine's version from its executable, or [`EditorVersion::unknown`]
/// when nothing can be read.
pub fn extract_engine_version(executable: &Path) -> EditorVersion {
    match read_product_version(executable) {
        Ok(Some(version)) => return EditorVersion::new(version),
        Ok(None) => debug!("no product version in {}", executable.display()),
        Err(e) => warn!("cannot read {}: {e}", executable.display()),
    }
    if let Some(version) = bundle_version(executable) {
        return EditorVersion::new(version);
    }
    EditorVersion::unknown()
}

/// Read a project's declared version, or [`EditorVersion::unknown`] when the
/// file is unreadable or has no version line.
pub fn extract_project_version(version_file: &Path) -> EditorVersion {
    match std::fs::read(version_file) {
        Ok(bytes) => parse_project_version(&String::from_utf8_lossy(&bytes))
            .unwrap_or_else(EditorVersion::unknown),
        Err(e) => {
            warn!("cannot read {}: {e}", version_file.display());
            EditorVersion::unknown()
        }
    }
}

/// The `ProductVersion` value of the first version resource found in `path`.
pub fn read_product_version(path: &Path) -> Result<Option<String>, ProbeError> {
    let mut file = File::open(path)?;
    let key = utf16le_key(PRODUCT_VERSION_KEY);
    // Bytes kept between chunks so a key and its value never straddle a read.
    let tail = key.len() + (MAX_PADDING_UNITS + MAX_VALUE_UNITS + 1) * 2;

    let mut buf: Vec<u8> = Vec::with_capacity(CHUNK_SIZE + tail);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut chunk)?;
        let eof = n == 0;
        buf.extend_from_slice(&chunk[..n]);

        let limit = if eof {
            buf.len()
        } else {
            buf.len().saturating_sub(tail)
        };
        let mut from = 0;
        while let Some(pos) = find(&buf, &key, from) {
            if pos >= limit {
                break;
            }
            if has_string_header(&buf, pos, key.len()) {
                if let Some(value) = decode_value(&buf[pos + key.len()..]) {
                    return Ok(Some(value));
                }
            }
            from = pos + 1;
        }

        if eof {
            return Ok(None);
        }
        // Keep the bytes a header for a key at `limit` would occupy.
        buf.drain(..limit.saturating_sub(HEADER_LEN));
    }
}

/// `CFBundleVersion` from the `Info.plist` of an application bundle when the
/// executable lives at `<bundle>.app/Contents/MacOS/<exe>`.
fn bundle_version(executable: &Path) -> Option<String> {
    let plist = bundle_info_plist(executable)?;
    let content = std::fs::read_to_string(&plist).ok()?;
    let re = Regex::new(r"<key>CFBundleVersion</key>\s*<string>([^<]+)</string>").ok()?;
    let version = re.captures(&content)?.get(1)?.as_str().trim().to_owned();
    (!version.is_empty()).then_some(version)
}

fn bundle_info_plist(executable: &Path) -> Option<PathBuf> {
    let macos_dir = executable.parent()?;
    let contents = macos_dir.parent()?;
    if macos_dir.file_name()? != "MacOS" || contents.file_name()? != "Contents" {
        return None;
    }
    let plist = contents.join("Info.plist");
    plist.is_file().then_some(plist)
}

fn utf16le_key(key: &str) -> Vec<u8> {
    key.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// Whether the key at `pos` sits behind a `String` header whose lengths can
/// hold it and a value of at most [`MAX_VALUE_UNITS`].
fn has_string_header(buf: &[u8], pos: usize, key_len: usize) -> bool {
    let Some(start) = pos.checked_sub(HEADER_LEN) else {
        return false;
    };
    let word = |i: usize| usize::from(u16::from_le_bytes([buf[start + i], buf[start + i + 1]]));
    let (length, value_length, kind) = (word(0), word(2), word(4));
    let max_length = HEADER_LEN + key_len + (MAX_PADDING_UNITS + MAX_VALUE_UNITS + 1) * 2;
    kind == TEXT_TYPE
        && value_length <= MAX_VALUE_UNITS + 1
        && (HEADER_LEN + key_len..=max_length).contains(&length)
}

fn decode_value(bytes: &[u8]) -> Option<String> {
    let mut units = Vec::new();
    let mut padding = 0;
    for pair in bytes.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0 {
            if units.is_empty() && padding < MAX_PADDING_UNITS {
                padding += 1;
                continue;
            }
            break;
        }
        units.push(unit);
        if units.len() > MAX_VALUE_UNITS {
            return None;
        }
    }
    let value = String::from_utf16(&units).ok()?;
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_control) {
        return None;
    }
    Some(value.to_owned())
}
