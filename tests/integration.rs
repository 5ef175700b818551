use std::fs;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::sync::Arc;

use sandboxed_fs::error::StorageError;
use sandboxed_fs::info::ROOT_ID;
use sandboxed_fs::info::identity::process_uid;
use sandboxed_fs::storage::{
    ContentKind, ContentNode, CreateOptions, ListOptions, TransferOptions, WriteOptions,
};
use sandboxed_fs::{FsConfig, Sandbox, Storage};
use tempfile::TempDir;

// Helper to build a storage confined to a fresh temporary directory
fn setup() -> (TempDir, String, Storage) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_string_lossy().to_string();
    let sandbox = Sandbox::new([root.as_str()]).unwrap();
    (dir, root, Storage::new(Arc::new(sandbox)))
}

fn with_parents() -> WriteOptions {
    WriteOptions {
        create_missing_parents: true,
        ..WriteOptions::default()
    }
}

fn running_as_root() -> bool {
    process_uid() == ROOT_ID
}

#[test]
fn test_album_scenario() {
    let (_dir, root, storage) = setup();
    let album = format!("{}/album", root);
    let backup = format!("{}/backup", root);

    storage
        .write_file(&format!("{}/1.jpg", album), b"first", &with_parents())
        .unwrap();
    assert!(!storage.is_directory_empty(&album).unwrap());

    assert!(matches!(
        storage.write_file("/etc/passwd", b"x", &WriteOptions::default()),
        Err(StorageError::Sandbox(_))
    ));

    assert!(matches!(
        storage.delete_directory_if_exists(&root, false),
        Err(StorageError::DirectoryNotEmpty(_))
    ));

    storage
        .write_file(&format!("{}/1.jpg", backup), b"old", &with_parents())
        .unwrap();
    assert!(matches!(
        storage.move_directory(&album, &backup, &TransferOptions::default()),
        Err(StorageError::DestinationCollision { .. })
    ));
    assert!(storage.is_directory_empty(&album).is_ok());

    let overwrite = TransferOptions {
        overwrite: true,
        ..TransferOptions::default()
    };
    assert!(storage.move_directory(&album, &backup, &overwrite).unwrap());
    assert!(!fs::exists(&album).unwrap());
    assert_eq!(
        storage.read_file(&format!("{}/1.jpg", backup)).unwrap(),
        b"first"
    );
}

#[test]
fn test_write_read_copy_round_trip() {
    let (_dir, root, storage) = setup();
    let a = format!("{}/docs/a.txt", root);
    let b = format!("{}/docs/b.txt", root);

    storage.write_file(&a, b"line one\n", &with_parents()).unwrap();
    let append = WriteOptions {
        append: true,
        ..WriteOptions::default()
    };
    storage.write_file(&a, b"line two\n", &append).unwrap();
    assert_eq!(storage.read_file(&a).unwrap(), b"line one\nline two\n");

    storage.copy_file(&a, &b, &TransferOptions::default()).unwrap();
    assert_eq!(storage.read_file(&b).unwrap(), storage.read_file(&a).unwrap());
}

#[test]
fn test_delete_file_twice() {
    let (_dir, root, storage) = setup();
    let path = format!("{}/a.txt", root);
    storage
        .write_file(&path, b"a", &WriteOptions::default())
        .unwrap();

    assert!(storage.delete_file_if_exists(&path).unwrap());
    assert!(!storage.delete_file_if_exists(&path).unwrap());
}

#[test]
fn test_listing_variants() {
    let (_dir, root, storage) = setup();
    storage
        .write_file(&format!("{}/2024/jan/a.jpg", root), b"a", &with_parents())
        .unwrap();
    storage
        .write_file(&format!("{}/readme.txt", root), b"r", &with_parents())
        .unwrap();
    symlink(
        format!("{}/readme.txt", root),
        format!("{}/latest", root),
    )
    .unwrap();

    let flat = storage
        .list_directory_content(&root, &ListOptions::default())
        .unwrap();
    assert_eq!(
        flat.get(&format!("{}/2024", root)),
        Some(&ContentNode::Kind(ContentKind::Directory))
    );
    assert_eq!(flat.len(), 3);

    let only_dirs = ListOptions {
        included_kinds: vec![ContentKind::Directory],
        ..ListOptions::default()
    };
    let dirs = storage.list_directory_content(&root, &only_dirs).unwrap();
    assert_eq!(dirs.len(), 1);

    let recursive = ListOptions {
        recursive: true,
        full_paths: false,
        included_kinds: vec![ContentKind::File],
    };
    let tree = storage.list_directory_content(&root, &recursive).unwrap();
    let Some(ContentNode::Tree(year)) = tree.get("2024") else {
        panic!("2024 should be a sub-tree");
    };
    let Some(ContentNode::Tree(month)) = year.get("jan") else {
        panic!("jan should be a sub-tree");
    };
    assert_eq!(month.get("a.jpg"), Some(&ContentNode::Kind(ContentKind::File)));
    assert!(tree.get("latest").is_none());
}

#[test]
fn test_copy_directory_keeps_source() {
    let (_dir, root, storage) = setup();
    let src = format!("{}/src", root);
    storage
        .write_file(&format!("{}/nested/deep/a.txt", src), b"a", &with_parents())
        .unwrap();

    let dst = format!("{}/out/dst", root);
    assert!(
        !storage
            .copy_directory(&src, &dst, &TransferOptions::default())
            .unwrap()
    );
    assert_eq!(
        storage
            .read_file(&format!("{}/nested/deep/a.txt", dst))
            .unwrap(),
        b"a"
    );
    assert!(!storage.is_directory_empty(&src).unwrap());

    let no_parents = TransferOptions {
        create_missing_parents: false,
        overwrite: false,
    };
    assert!(matches!(
        storage.copy_directory(&src, &format!("{}/missing/dst", root), &no_parents),
        Err(StorageError::ParentMissing(_))
    ));
}

#[test]
fn test_modes_and_permissions() {
    let (_dir, root, storage) = setup();
    let dir = format!("{}/shared", root);
    let options = CreateOptions {
        mode: 0o755,
        ..CreateOptions::default()
    };
    storage.create_directory_if_missing(&dir, &options).unwrap();
    storage.chmod_directory(&dir, 0o750, false, true).unwrap();

    assert_eq!(storage.path_mode(&dir, true).unwrap(), "0750");
    assert_eq!(storage.path_mode(&dir, false).unwrap(), "drwxr-x---");

    let permissions = storage.path_permissions(&dir).unwrap();
    assert_eq!(permissions.mode, "drwxr-x---");
    assert_eq!(permissions.owner, storage.path_owner(&dir).unwrap().name);
    assert!(storage.has_owner_rights(&dir).unwrap());

    assert!(matches!(
        storage.path_mode(&format!("{}/missing", root), true),
        Err(StorageError::PathNotFound(_))
    ));
}

#[test]
fn test_disk_space_inside_sandbox() {
    let (_dir, root, storage) = setup();
    let space = storage.disk_space(&root).unwrap();
    assert!(space.total > 0);
    assert_eq!(space.used, space.total - space.free);

    assert!(matches!(
        storage.disk_space("/"),
        Err(StorageError::Sandbox(_))
    ));
}

#[test]
fn test_every_operation_rejects_outside_paths() {
    let (_dir, root, storage) = setup();
    let inside = format!("{}/a.txt", root);
    storage
        .write_file(&inside, b"a", &WriteOptions::default())
        .unwrap();
    let outside = "/etc/sandboxed-fs-test";
    let escape = format!("{}/../escape", root);
    let transfer = TransferOptions::default();

    let results = [
        storage.disk_space(outside).map(|_| ()),
        storage.path_owner(outside).map(|_| ()),
        storage.path_group(outside).map(|_| ()),
        storage.path_mode(outside, true).map(|_| ()),
        storage.path_permissions(outside).map(|_| ()),
        storage
            .create_directory_if_missing(&escape, &CreateOptions::default())
            .map(|_| ()),
        storage.is_directory_empty(outside).map(|_| ()),
        storage
            .list_directory_content(outside, &ListOptions::default())
            .map(|_| ()),
        storage.delete_directory_content_if_exists(outside).map(|_| ()),
        storage.delete_directory_if_exists(outside, true).map(|_| ()),
        storage.copy_directory(&root, outside, &transfer).map(|_| ()),
        storage.move_directory(outside, &root, &transfer).map(|_| ()),
        storage.copy_file(&inside, outside, &transfer).map(|_| ()),
        storage.move_file(&inside, &escape, &transfer).map(|_| ()),
        storage.chmod_directory(outside, 0o777, true, false),
        storage.chmod_file(outside, 0o777),
        storage.read_file(outside).map(|_| ()),
        storage
            .write_file(&escape, b"x", &WriteOptions::default())
            .map(|_| ()),
        storage.delete_file_if_exists(outside).map(|_| ()),
    ];

    for result in results {
        assert!(matches!(result, Err(StorageError::Sandbox(_))));
    }
    assert!(fs::exists(&inside).unwrap());
}

#[test]
fn test_sibling_prefix_is_not_inside() {
    let (_dir, root, storage) = setup();
    let sibling = format!("{}2/a.txt", root);
    assert!(matches!(
        storage.read_file(&sibling),
        Err(StorageError::Sandbox(_))
    ));
}

#[test]
fn test_storage_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_string_lossy().to_string();
    let config = FsConfig::from_toml(&format!(
        "allowed_directories = [{:?}]\ndirectory_mode = \"0700\"",
        root
    ))
    .unwrap();
    let storage = Storage::new(Arc::new(config.build_sandbox().unwrap()));

    let path = format!("{}/private", root);
    storage
        .create_directory_if_missing(&path, &config.create_options().unwrap())
        .unwrap();
    assert_eq!(storage.path_mode(&path, true).unwrap(), "0700");
}

#[test]
fn test_read_only_directory_refuses_writes() {
    if running_as_root() {
        return;
    }
    let (_dir, root, storage) = setup();
    let locked = format!("{}/locked", root);
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();

    let result = storage.write_file(
        &format!("{}/a.txt", locked),
        b"x",
        &WriteOptions::default(),
    );
    assert!(matches!(result, Err(StorageError::ParentNotWritable(_))));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
}

#[test]
fn test_unreadable_file_refuses_reads() {
    if running_as_root() {
        return;
    }
    let (_dir, root, storage) = setup();
    let secret = format!("{}/secret.txt", root);
    fs::write(&secret, b"s").unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o200)).unwrap();

    assert!(matches!(
        storage.read_file(&secret),
        Err(StorageError::NotReadable(_))
    ));
}
