use crate::helpers::test_harness::TestHarness;
use std::sync::Arc;
use std::time::Duration;
use symdex::watcher::{FileChange, FileChangeCoordinator, WatcherHandle};
use tokio::sync::{mpsc, oneshot};

const DEBOUNCE: Duration = Duration::from_millis(250);

#[tokio::test(start_paused = true)]
async fn test_new_file_is_indexed_after_debounce() {
    let harness = TestHarness::with_src_alias().unwrap();
    let engine = harness.engine();
    engine.scan_all(false).await.unwrap();
    assert_eq!(engine.symbol_count(), 0);

    let (tx, rx) = mpsc::channel(16);
    let (_shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(FileChangeCoordinator::new(Arc::clone(&engine), DEBOUNCE).run(rx, shutdown_rx));

    let path = harness
        .create_test_file("src/fresh.ts", "export class Fresh {}")
        .unwrap();
    tx.send(FileChange::created(path)).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(engine.symbol_count(), 0);

    // The timer fires with the channel still open
    tokio::time::sleep(Duration::from_millis(200)).await;
    {
        let index = engine.index().lock().unwrap();
        assert_eq!(index.find_by_name("Fresh")[0].module.as_deref(), Some("fresh"));
    }

    drop(tx);
    let stats = task.await.unwrap();
    assert_eq!(stats.flushes, 1);
    assert_eq!(stats.files_reindexed, 1);
}

#[tokio::test]
async fn test_delete_during_initial_scan_is_not_lost() {
    let harness = TestHarness::new().unwrap();
    for i in 0..150 {
        harness
            .create_test_file(&format!("src/m{:03}.ts", i), &format!("export const V{} = {};", i, i))
            .unwrap();
    }

    let engine = harness.engine();
    let (tx, mut handle) = WatcherHandle::spawn(Arc::clone(&engine), DEBOUNCE);

    let scan = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.scan_all(false).await }
    });

    // Lands between chunks, whether or not the scan already read the file
    tokio::task::yield_now().await;
    let gone = harness.remove_test_file("src/m000.ts").unwrap();
    tx.send(FileChange::deleted(gone)).await.unwrap();

    scan.await.unwrap().unwrap();
    while !engine.index().lock().unwrap().find_by_name("V0").is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    handle.shutdown();
    let stats = handle.wait().await.unwrap();
    assert_eq!(stats.files_deleted, 1);
    assert_eq!(engine.symbol_count(), 149);
}

#[tokio::test]
async fn test_deleted_file_leaves_index() {
    let harness = TestHarness::new().unwrap();
    harness.create_test_file("a.ts", "export class A {}").unwrap();
    harness.create_test_file("b.ts", "export class B {}").unwrap();

    let engine = harness.engine();
    engine.scan_all(false).await.unwrap();
    assert_eq!(engine.symbol_count(), 2);

    let (tx, rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(FileChangeCoordinator::new(Arc::clone(&engine), DEBOUNCE).run(rx, shutdown_rx));

    let gone = harness.remove_test_file("a.ts").unwrap();
    tx.send(FileChange::deleted(gone)).await.unwrap();
    while engine.symbol_count() != 1 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    shutdown_tx.send(()).unwrap();
    let stats = task.await.unwrap();
    assert_eq!(stats.files_deleted, 1);
    assert_eq!(stats.flushes, 0);

    let index = engine.index().lock().unwrap();
    assert!(index.find_by_name("A").is_empty());
    assert_eq!(index.find_by_name("B").len(), 1);
}

#[tokio::test]
async fn test_shutdown_drops_pending_changes() {
    let harness = TestHarness::new().unwrap();
    let engine = harness.engine();

    let (tx, rx) = mpsc::channel(16);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(
        FileChangeCoordinator::new(Arc::clone(&engine), Duration::from_secs(60)).run(rx, shutdown_rx),
    );

    let path = harness.create_test_file("late.ts", "export class Late {}").unwrap();
    tx.send(FileChange::modified(path)).await.unwrap();
    tokio::task::yield_now().await;
    shutdown_tx.send(()).unwrap();

    let stats = task.await.unwrap();
    assert_eq!(stats.flushes, 0);
    assert_eq!(engine.symbol_count(), 0);
}
