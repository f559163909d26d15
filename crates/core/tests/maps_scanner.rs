use std::ffi::OsStr;
use std::fs;
use std::io::Cursor;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::symlink;
use std::path::Path;

use shared_info_core::maps::{scan_process, scan_reader};
use shared_info_core::procfs::ProcLayout;
use shared_info_core::symlink::resolve;
use shared_info_core::{Inventory, ProcessId, ScanError, SharedObjectPath};
use tempfile::tempdir;

const DEPTH: usize = 40;

fn pid(raw: u32) -> ProcessId {
    ProcessId::new(raw).expect("non-zero pid")
}

fn scan_text(raw: u32, body: &str) -> shared_info_core::ProcessScan {
    scan_reader(pid(raw), Cursor::new(body.as_bytes().to_vec()), DEPTH).expect("scan")
}

#[test]
fn end_to_end_single_process() {
    let body = "\
00400000-00452000 r-xp 00000000 08:01 123456 /usr/bin/app
7f0000000000-7f0000020000 r-xp 00000000 08:01 234567 /usr/lib/libc.so.6
7f0000020000-7f0000021000 rw-p 00000000 00:00 0 [heap]
";
    let scan = scan_text(100, body);

    // On hosts where the literal path is itself a link, compare against its target.
    let libc = SharedObjectPath::from_path(&resolve(Path::new("/usr/lib/libc.so.6")));

    assert_eq!(scan.name.as_deref(), Some("/usr/bin/app"));
    assert_eq!(scan.objects.iter().collect::<Vec<_>>(), vec![&libc]);

    let mut inventory = Inventory::new();
    inventory.ingest(&scan);

    let procs = inventory.processes().get(&pid(100)).expect("process entry");
    assert_eq!(procs.iter().collect::<Vec<_>>(), vec![&libc]);
    let users = inventory.objects().get(&libc).expect("object entry");
    assert_eq!(users.iter().copied().collect::<Vec<_>>(), vec![pid(100)]);
    assert_eq!(inventory.name_of(pid(100)), Some("/usr/bin/app"));
}

#[test]
fn first_name_candidate_wins() {
    let body = "\
00400000-00452000 r-xp 00000000 08:01 1 /usr/bin/first
00652000-00653000 r--p 00052000 08:01 2 /usr/bin/second
00700000-00701000 r--p 00000000 08:01 3 /var/cache/data.bin
7f0000000000-7f0000020000 r-xp 00000000 08:01 4 /nonexistent-shared-info/libfoo.so
";
    let scan = scan_text(5, body);
    assert_eq!(scan.name.as_deref(), Some("/usr/bin/first"));
}

#[test]
fn name_candidate_after_libraries_still_counts_when_first() {
    let body = "\
7f0000000000-7f0000020000 r-xp 00000000 08:01 4 /nonexistent-shared-info/libfoo.so
7f0000020000-7f0000021000 rw-p 00000000 00:05 9 /dev/zero (deleted)
";
    let scan = scan_text(6, body);
    assert_eq!(scan.name.as_deref(), Some("/dev/zero"));
}

#[test]
fn bracketed_paths_never_become_names() {
    let body = "\
7f0000020000-7f0000021000 rw-p 00000000 00:00 0 [heap]
7ffc00000000-7ffc00021000 rw-p 00000000 00:00 0 [stack]
7ffc00100000-7ffc00102000 r-xp 00000000 00:00 0 [vdso]
7f0000000000-7f0000001000 rw-p 00000000 00:00 0
";
    let scan = scan_text(7, body);
    assert_eq!(scan.name, None);
    assert!(scan.objects.is_empty());
}

#[test]
fn malformed_lines_are_skipped_without_aborting() {
    let body = "\
this is not a map record
00400000-00452000 r-xp 00000000 08:01 123456 /usr/bin/app
7f00-7e00 r-xp 00000000 08:01 1 /nonexistent-shared-info/libbackwards.so

7f0000000000-7f0000020000 r-xp 00000000 08:01 234567 /nonexistent-shared-info/libok.so.3
";
    let scan = scan_text(8, body);
    assert_eq!(scan.name.as_deref(), Some("/usr/bin/app"));
    assert_eq!(
        scan.objects.iter().map(SharedObjectPath::as_str).collect::<Vec<_>>(),
        vec!["/nonexistent-shared-info/libok.so.3"]
    );
}

#[test]
fn non_utf8_paths_do_not_abort_scan() {
    let mut body = b"00400000-00452000 r-xp 00000000 08:01 1 /usr/bin/caf\xe9\n".to_vec();
    body.extend_from_slice(
        b"7f0000000000-7f0000020000 r-xp 00000000 08:01 2 /nonexistent-shared-info/libz.so.1\n",
    );
    let scan = scan_reader(pid(9), Cursor::new(body), DEPTH).expect("scan");
    assert!(scan.name.expect("name").starts_with("/usr/bin/caf"));
    assert_eq!(scan.objects.len(), 1);
}

#[test]
fn symlinked_libraries_deduplicate_to_one_entry() {
    let tmp = tempdir().expect("tempdir");
    let real = tmp.path().join("libssl.so.3.0.2");
    fs::write(&real, b"elf").expect("write lib");
    let soname = tmp.path().join("libssl.so.3");
    let dev = tmp.path().join("libssl.so");
    symlink(&real, &soname).expect("soname link");
    symlink(&soname, &dev).expect("dev link");

    let body = format!(
        "7f0000000000-7f0000020000 r-xp 00000000 08:01 1 {}\n\
         7f0000020000-7f0000040000 r--p 00020000 08:01 1 {}\n\
         7f0000040000-7f0000041000 rw-p 00040000 08:01 1 {}\n",
        soname.display(),
        dev.display(),
        real.display()
    );
    let scan = scan_text(10, &body);
    assert_eq!(scan.objects.len(), 1);
    assert_eq!(scan.objects.iter().next().unwrap(), &SharedObjectPath::from_path(&real));

    let mut inventory = Inventory::new();
    inventory.ingest(&scan);
    assert_eq!(inventory.objects().len(), 1);
    assert_eq!(inventory.processes()[&pid(10)].len(), 1);
}

#[test]
fn non_utf8_symlink_deduplicates_with_its_target() {
    let tmp = tempdir().expect("tempdir");
    let real = tmp.path().join("libreal.so.1");
    fs::write(&real, b"elf").expect("write lib");
    let link = tmp.path().join(OsStr::from_bytes(b"lib\xe9.so"));
    symlink(&real, &link).expect("non-utf8 link");

    let mut body = b"7f0000000000-7f0000020000 r-xp 00000000 08:01 1 ".to_vec();
    body.extend_from_slice(link.as_os_str().as_bytes());
    body.extend_from_slice(b"\n7f0000020000-7f0000040000 r--p 00020000 08:01 1 ");
    body.extend_from_slice(real.as_os_str().as_bytes());
    body.push(b'\n');

    let scan = scan_reader(pid(11), Cursor::new(body), DEPTH).expect("scan");
    assert_eq!(scan.objects.len(), 1, "objects: {:?}", scan.objects);
    assert_eq!(scan.objects.iter().next().unwrap(), &SharedObjectPath::from_path(&real));
}

#[test]
fn scan_process_reads_from_layout() {
    let tmp = tempdir().expect("tempdir");
    let layout = ProcLayout::new(tmp.path());
    fs::create_dir_all(layout.process_dir(pid(100))).expect("pid dir");
    fs::write(
        layout.maps_path(pid(100)),
        "00400000-00452000 r-xp 00000000 08:01 1 /usr/sbin/daemon\n\
         7f0000000000-7f0000020000 r-xp 00000000 08:01 2 /nonexistent-shared-info/libd.so\n",
    )
    .expect("write maps");

    let scan = scan_process(&layout, pid(100), DEPTH).expect("scan");
    assert_eq!(scan.pid, pid(100));
    assert_eq!(scan.name.as_deref(), Some("/usr/sbin/daemon"));
    assert_eq!(scan.objects.len(), 1);
}

#[test]
fn missing_maps_file_is_recoverable_error() {
    let tmp = tempdir().expect("tempdir");
    let layout = ProcLayout::new(tmp.path());

    match scan_process(&layout, pid(4242), DEPTH) {
        Err(ScanError::MapsUnreadable { pid: failed, path, .. }) => {
            assert_eq!(failed, pid(4242));
            assert_eq!(path, layout.maps_path(pid(4242)));
        }
        other => panic!("expected MapsUnreadable, got {other:?}"),
    }
}
