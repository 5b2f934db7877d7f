//! End-to-end import workflow against a disposable managed root: locate a
//! file referenced by an export, copy it into the store, validate the
//! result, then reconcile the store against the reference set.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use gramps_media_store::error::IndexError;
use gramps_media_store::orphans::ReferenceIndex;
use gramps_media_store::store::CopyOptions;
use gramps_media_store::{CanonicalPath, MediaConfig, MediaStore};

struct RecordedReferences(HashSet<CanonicalPath>);

impl ReferenceIndex for RecordedReferences {
    fn referenced_paths(&self) -> Result<HashSet<CanonicalPath>, IndexError> {
        Ok(self.0.clone())
    }
}

fn write_file(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::File::create(path).unwrap().write_all(contents).unwrap();
}

#[test]
fn import_workflow_locates_copies_validates_and_reconciles() {
    let dir = tempfile::tempdir().unwrap();
    let config = MediaConfig::with_root(dir.path().join("media"))
        .with_project_base(dir.path().join("project"));
    let store = MediaStore::new(config);

    // a Gramps export directory somewhere outside the managed root
    let export_dir = dir.path().join("gramps_export");
    write_file(&export_dir.join("wedding (1).jpg"), b"wedding bytes");

    // the exported database recorded an absolute path from another machine;
    // only the filename can be trusted
    let raw_reference = "C:\\Users\\bob\\photos\\wedding (1).jpg";

    let located = store
        .locate(raw_reference, &[export_dir.clone()])
        .expect("file present in the export directory");
    assert_eq!(located.path, export_dir.join("wedding (1).jpg"));

    let outcome = store
        .copy_to_store(&located.path, "imported", &CopyOptions::default())
        .unwrap();
    let stored = outcome.stored_path().expect("copy succeeded").clone();
    assert_eq!(stored.as_str(), "imported/wedding_1.jpg");

    let on_disk = fs::read(stored.to_absolute(&store.config().media_root)).unwrap();
    assert_eq!(on_disk, b"wedding bytes");

    let validation = store.validate(Path::new(stored.as_str()));
    assert!(validation.is_valid, "reason: {}", validation.reason);

    assert_eq!(store.url_for(&stored), "/media/imported/wedding_1.jpg");

    // a second record pointing at the same filename gets its own copy
    let second = store
        .copy_to_store(&located.path, "imported", &CopyOptions::default())
        .unwrap();
    let second_path = second.stored_path().unwrap().clone();
    assert_eq!(second_path.as_str(), "imported/wedding_1_1.jpg");

    // persistence kept only the first path; the second copy is an orphan
    let references = RecordedReferences(HashSet::from([stored.clone()]));
    let report = store.find_orphans("imported", &references).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.orphans[0], second_path);

    let deletion = store.delete_orphans(&report).unwrap();
    assert_eq!(deletion.deleted, 1);
    assert!(!second_path.to_absolute(&store.config().media_root).exists());
    assert!(stored.to_absolute(&store.config().media_root).exists());
}

#[test]
fn records_without_exported_files_keep_their_reference_unresolved() {
    let dir = tempfile::tempdir().unwrap();
    let store = MediaStore::new(MediaConfig::with_root(dir.path().join("media")));

    // no export directory at all; the locator misses and the import keeps
    // the normalized reference for a later retry
    assert!(store.locate("photos/lost cousin.jpg", &[]).is_none());

    let normalized = store
        .normalize("photos/lost cousin.jpg", "imported", false)
        .unwrap();
    assert_eq!(normalized.path.as_str(), "imported/lost_cousin.jpg");
    assert!(!normalized.was_absolute);
}

#[test]
fn traversal_attempts_never_validate() {
    let dir = tempfile::tempdir().unwrap();
    let store = MediaStore::new(MediaConfig::with_root(dir.path().join("media")));
    fs::create_dir_all(store.config().media_root.join("imported")).unwrap();
    write_file(&dir.path().join("etc_stand_in"), b"secret");

    let sneaky = store
        .config()
        .media_root
        .join("imported/../../etc_stand_in");
    let validation = store.validate(&sneaky);
    assert!(!validation.is_valid);
    assert_eq!(validation.reason, "path traversal detected");
}
