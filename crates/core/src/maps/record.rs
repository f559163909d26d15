use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::MapLineError;

/// Suffix the kernel appends to mappings whose backing file was unlinked.
const DELETED_MARKER: &[u8] = b" (deleted)";

/// One parsed line of `/proc/<pid>/maps`:
/// `<start>-<end> <perms> <offset> <major>:<minor> <inode> [<path>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRecord {
    pub start: u64,
    pub end: u64,
    pub perms: String,
    pub offset: u64,
    pub dev_major: u32,
    pub dev_minor: u32,
    pub inode: u64,
    /// Backing path exactly as the kernel wrote it, or `None` for anonymous mappings.
    pub path: Option<PathBuf>,
}

/// How a record participates in a process scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind<'a> {
    /// Path looks like a shared library (`.so` anywhere in it).
    Library(&'a Path),
    /// Non-empty, non-bracketed path that may name the process.
    NameCandidate(&'a Path),
    /// Anonymous or pseudo (`[heap]`, `[stack]`, ...) mapping.
    Other,
}

impl MapRecord {
    /// Parse one line given as raw bytes.
    ///
    /// The header fields must be ASCII; the path is kept byte-for-byte so a
    /// non-UTF-8 name still refers to the file on disk.
    pub fn from_bytes(line: &[u8]) -> Result<Self, MapLineError> {
        let mut rest = line;

        let range = next_field(&mut rest, "address range")?;
        let (start, end) = split_pair(range, b'-')
            .and_then(|(s, e)| Some((parse_hex_u64(s)?, parse_hex_u64(e)?)))
            .filter(|(s, e)| s <= e)
            .ok_or_else(|| MapLineError::AddressRange(lossy(range)))?;

        let perms = next_field(&mut rest, "permissions")?;
        if !valid_perms(perms) {
            return Err(MapLineError::Permissions(lossy(perms)));
        }

        let offset_field = next_field(&mut rest, "offset")?;
        let offset =
            parse_hex_u64(offset_field).ok_or_else(|| MapLineError::Offset(lossy(offset_field)))?;

        let device = next_field(&mut rest, "device")?;
        let (dev_major, dev_minor) = split_pair(device, b':')
            .and_then(|(major, minor)| Some((parse_hex_u32(major)?, parse_hex_u32(minor)?)))
            .ok_or_else(|| MapLineError::Device(lossy(device)))?;

        let inode_field = next_field(&mut rest, "inode")?;
        let inode = std::str::from_utf8(inode_field)
            .ok()
            .and_then(|text| text.parse::<u64>().ok())
            .ok_or_else(|| MapLineError::Inode(lossy(inode_field)))?;

        Ok(MapRecord {
            start,
            end,
            perms: lossy(perms),
            offset,
            dev_major,
            dev_minor,
            inode,
            path: parse_path(rest),
        })
    }

    pub fn kind(&self) -> RecordKind<'_> {
        let Some(path) = self.path.as_deref() else {
            return RecordKind::Other;
        };
        let bytes = path.as_os_str().as_bytes();
        if bytes.windows(3).any(|window| window == b".so") {
            RecordKind::Library(path)
        } else if !bytes.is_empty() && bytes[0] != b'[' {
            RecordKind::NameCandidate(path)
        } else {
            RecordKind::Other
        }
    }
}

impl FromStr for MapRecord {
    type Err = MapLineError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(line.as_bytes())
    }
}

/// Pop the next whitespace-delimited field off `rest`.
fn next_field<'a>(rest: &mut &'a [u8], name: &'static str) -> Result<&'a [u8], MapLineError> {
    let trimmed = rest.trim_ascii_start();
    if trimmed.is_empty() {
        return Err(MapLineError::MissingField(name));
    }
    let end = trimmed.iter().position(u8::is_ascii_whitespace).unwrap_or(trimmed.len());
    let (field, remainder) = trimmed.split_at(end);
    *rest = remainder;
    Ok(field)
}

fn split_pair(field: &[u8], separator: u8) -> Option<(&[u8], &[u8])> {
    let at = field.iter().position(|b| *b == separator)?;
    Some((&field[..at], &field[at + 1..]))
}

/// Everything after the inode is the path, spaces included.
fn parse_path(rest: &[u8]) -> Option<PathBuf> {
    let path = rest.trim_ascii();
    let path = path.strip_suffix(DELETED_MARKER).unwrap_or(path).trim_ascii_end();
    (!path.is_empty()).then(|| PathBuf::from(OsStr::from_bytes(path)))
}

fn lossy(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

fn parse_hex_u64(field: &[u8]) -> Option<u64> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = std::str::from_utf8(field).ok()?;
    u64::from_str_radix(text, 16).ok()
}

fn parse_hex_u32(field: &[u8]) -> Option<u32> {
    parse_hex_u64(field).and_then(|v| u32::try_from(v).ok())
}

fn valid_perms(perms: &[u8]) -> bool {
    perms.len() == 4
        && matches!(perms[0], b'r' | b'-')
        && matches!(perms[1], b'w' | b'-')
        && matches!(perms[2], b'x' | b'-')
        && matches!(perms[3], b'p' | b's')
}
