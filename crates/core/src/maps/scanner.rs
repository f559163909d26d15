use std::fs::File;
use std::io::{self, BufRead, BufReader};

use tracing::trace;

use crate::error::{ScanError, ScanResult};
use crate::maps::{MapRecord, RecordKind};
use crate::model::{ProcessId, ProcessScan, SharedObjectPath};
use crate::procfs::ProcLayout;
use crate::symlink;

/// Scan one process's map file under `layout`.
///
/// The file handle is dropped on every return path.
pub fn scan_process(
    layout: &ProcLayout,
    pid: ProcessId,
    max_symlink_depth: usize,
) -> ScanResult<ProcessScan> {
    let path = layout.maps_path(pid);
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(source) => return Err(ScanError::MapsUnreadable { pid, path, source }),
    };
    scan_reader(pid, BufReader::new(file), max_symlink_depth)
        .map_err(|source| ScanError::MapsUnreadable { pid, path, source })
}

/// Scan map records from any buffered reader.
///
/// Lines are handled as bytes: a non-UTF-8 path neither aborts the scan nor
/// loses its identity on disk. Text is decoded lossily only for the stored
/// object path and display name.
pub fn scan_reader<R: BufRead>(
    pid: ProcessId,
    mut reader: R,
    max_symlink_depth: usize,
) -> io::Result<ProcessScan> {
    let mut scan = ProcessScan::new(pid);
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        match MapRecord::from_bytes(line) {
            Ok(record) => observe(&mut scan, &record, max_symlink_depth),
            Err(err) => {
                trace!(%pid, line = line_no, error = %err, "skipping malformed map record");
            }
        }
    }

    Ok(scan)
}

fn observe(scan: &mut ProcessScan, record: &MapRecord, max_symlink_depth: usize) {
    match record.kind() {
        RecordKind::Library(raw) => {
            let resolved = symlink::resolve_with_limit(raw, max_symlink_depth);
            scan.objects.insert(SharedObjectPath::from_path(&resolved));
        }
        RecordKind::NameCandidate(path) => {
            if scan.name.is_none() {
                scan.name = Some(path.to_string_lossy().into_owned());
            }
        }
        RecordKind::Other => {}
    }
}
