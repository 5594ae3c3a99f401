#![cfg(target_os = "linux")]

mod common;

use common::{TIMEOUT, drain, init_tracing, wait_for};
use crossbeam_channel::{RecvTimeoutError, TryRecvError};
use rnotify::{Backend, Op, WatchResult, Watcher, WatcherConfig};
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn watcher_on(backend: Backend) -> WatchResult<Watcher> {
    init_tracing();
    Watcher::with_config(
        WatcherConfig::default()
            .with_backend(backend)
            .with_errors_capacity(64),
    )
}

fn temp_root() -> WatchResult<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let root = fs::canonicalize(dir.path())?;
    Ok((dir, root))
}

#[test]
fn watcher_full_integration_test() -> WatchResult<()> {
    let (_dir, root) = temp_root()?;
    fs::create_dir(root.join("foo"))?;

    let watcher = watcher_on(Backend::PerDirectory)?;
    watcher.add(&root)?;
    assert_eq!(watcher.watched_paths(), vec![root.clone(), root.join("foo")]);

    println!("Test 1: File creation detection");
    let file_a = root.join("a");
    fs::write(&file_a, "a")?;
    wait_for(&watcher, &file_a, Op::Create);

    println!("Test 2: File modification detection");
    fs::write(&file_a, "aa")?;
    wait_for(&watcher, &file_a, Op::Write);

    println!("Test 3: New directory becomes watched");
    let dir_b = root.join("b");
    fs::create_dir(&dir_b)?;
    wait_for(&watcher, &dir_b, Op::Create);
    assert!(watcher.watched_paths().contains(&dir_b));

    println!("Test 4: File inside the new directory");
    let file_c = dir_b.join("c");
    fs::write(&file_c, "c")?;
    wait_for(&watcher, &file_c, Op::Create);

    println!("Test 5: File in a pre-existing subdirectory");
    let file_foo = root.join("foo").join("c");
    fs::write(&file_foo, "c")?;
    wait_for(&watcher, &file_foo, Op::Create);

    println!("Test 6: Recursive removal");
    fs::remove_dir_all(&dir_b)?;
    wait_for(&watcher, &dir_b, Op::Remove);

    watcher.close()?;
    assert!(watcher.errors().try_recv().is_err());
    Ok(())
}

#[test]
fn file_deep_in_existing_tree_is_reported_once() -> WatchResult<()> {
    let (_dir, root) = temp_root()?;
    let deep = root.join("x").join("y").join("z");
    fs::create_dir_all(&deep)?;

    let watcher = watcher_on(Backend::PerDirectory)?;
    watcher.add(&root)?;

    let file = deep.join("f.txt");
    fs::File::create(&file)?;
    wait_for(&watcher, &file, Op::Create);

    let rest = drain(&watcher, Duration::from_millis(300));
    assert!(
        !rest.iter().any(|e| e.path() == file && e.op() == Op::Create),
        "duplicate create: {rest:?}"
    );
    Ok(())
}

#[test]
fn directory_created_after_add_is_extended() -> WatchResult<()> {
    let (_dir, root) = temp_root()?;
    let watcher = watcher_on(Backend::PerDirectory)?;
    watcher.add(&root)?;

    let dir_d = root.join("d");
    fs::create_dir(&dir_d)?;
    // the watch on a new directory is set up asynchronously
    thread::sleep(Duration::from_millis(100));
    let file_e = dir_d.join("e");
    fs::write(&file_e, "e")?;

    let seen = wait_for(&watcher, &file_e, Op::Create);
    assert!(
        seen.iter().any(|e| e.path() == dir_d && e.op() == Op::Create),
        "missing directory create: {seen:?}"
    );
    Ok(())
}

#[test]
fn moved_in_tree_is_registered() -> WatchResult<()> {
    let (_outside, staging) = temp_root()?;
    let (_dir, root) = temp_root()?;
    fs::create_dir_all(staging.join("tree").join("inner"))?;

    let watcher = watcher_on(Backend::PerDirectory)?;
    watcher.add(&root)?;

    let moved = root.join("tree");
    if fs::rename(staging.join("tree"), &moved).is_err() {
        // different filesystems; nothing to test
        return Ok(());
    }
    wait_for(&watcher, &moved, Op::Create);
    assert!(watcher.watched_paths().contains(&moved.join("inner")));

    let file = moved.join("inner").join("f");
    fs::write(&file, "f")?;
    wait_for(&watcher, &file, Op::Create);
    Ok(())
}

#[test]
fn ignored_paths_are_not_delivered() -> WatchResult<()> {
    let (_dir, root) = temp_root()?;
    fs::create_dir(root.join("skipped"))?;

    let watcher = watcher_on(Backend::PerDirectory)?;
    watcher.ignore(["skipped"]);
    watcher.add(&root)?;
    assert_eq!(watcher.watched_paths(), vec![root.clone()]);

    fs::write(root.join("skipped").join("inside"), "x")?;
    fs::write(root.join("skipped.txt"), "x")?;
    let sentinel = root.join("sentinel");
    fs::write(&sentinel, "x")?;

    let seen = wait_for(&watcher, &sentinel, Op::Create);
    assert!(
        seen.iter().all(|e| !e.path().to_string_lossy().contains("skipped")),
        "ignored path delivered: {seen:?}"
    );
    Ok(())
}

#[test]
fn removed_and_recreated_directory_keeps_working() -> WatchResult<()> {
    let (_dir, root) = temp_root()?;
    let sub = root.join("sub");
    fs::create_dir(&sub)?;

    let watcher = watcher_on(Backend::PerDirectory)?;
    watcher.add(&root)?;

    fs::remove_dir(&sub)?;
    wait_for(&watcher, &sub, Op::Remove);
    fs::create_dir(&sub)?;
    wait_for(&watcher, &sub, Op::Create);

    let file = sub.join("again");
    fs::write(&file, "x")?;
    wait_for(&watcher, &file, Op::Create);

    assert!(matches!(watcher.errors().try_recv(), Err(TryRecvError::Empty)));
    Ok(())
}

#[test]
fn recursive_backend_sees_new_subtrees() -> WatchResult<()> {
    let (_dir, root) = temp_root()?;
    let watcher = watcher_on(Backend::Recursive)?;
    watcher.add(&root)?;
    assert_eq!(watcher.watched_paths(), vec![root.clone()]);

    let nested = root.join("n1").join("n2");
    fs::create_dir_all(&nested)?;
    thread::sleep(Duration::from_millis(100));
    let file = nested.join("f");
    fs::write(&file, "x")?;

    wait_for(&watcher, &file, Op::Create);
    Ok(())
}

#[test]
fn close_ends_the_event_stream() -> WatchResult<()> {
    let (_dir, root) = temp_root()?;
    let watcher = watcher_on(Backend::PerDirectory)?;
    watcher.add(&root)?;
    fs::write(root.join("late"), "x")?;

    watcher.close()?;

    loop {
        match watcher.events().recv_timeout(TIMEOUT) {
            Ok(_) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => panic!("event stream did not close"),
        }
    }
    assert!(matches!(watcher.add(&root), Err(rnotify::WatchError::Closed)));
    Ok(())
}

#[test]
fn cloned_stream_is_drained_on_its_own_thread() -> WatchResult<()> {
    let (_dir, root) = temp_root()?;
    let watcher = watcher_on(Backend::PerDirectory)?;
    let file = root.join("f.txt");

    let events = watcher.events().clone();
    let (found_tx, found_rx) = mpsc::channel();
    let target = file.clone();
    let consumer = thread::spawn(move || {
        let mut seen = Vec::new();
        for event in events.iter() {
            if event.path() == target && event.op() == Op::Create {
                let _ = found_tx.send(());
            }
            seen.push(event);
        }
        seen
    });

    watcher.add(&root)?;
    fs::write(&file, "x")?;
    found_rx
        .recv_timeout(TIMEOUT)
        .expect("consumer thread never saw the create");

    drop(watcher);
    let seen = consumer.join().unwrap();
    assert!(seen.iter().any(|e| e.path() == file && e.op() == Op::Create));
    Ok(())
}
