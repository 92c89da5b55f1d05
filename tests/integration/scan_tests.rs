use crate::helpers::test_harness::TestHarness;
use symdex::{ScanMode, SymbolKind, SymbolStore};

#[tokio::test]
async fn test_full_scan_indexes_declarations_and_imports() {
    let harness = TestHarness::with_src_alias().unwrap();
    harness
        .create_test_file(
            "src/shapes/circle.ts",
            "import { Observable } from 'rxjs';\n\
             import { Point } from './point';\n\
             export class Circle {}\n\
             export interface Radius {}\n",
        )
        .unwrap();
    harness
        .create_test_file("src/util.ts", "export function clamp(x: number) { return x; }")
        .unwrap();

    let engine = harness.engine();
    let summary = engine.scan_all(false).await.unwrap();

    assert_eq!(summary.total_files, 2);
    assert!(summary.is_success());
    // Circle, Radius, Observable (./point is relative), clamp
    assert_eq!(summary.symbol_count, 4);

    let index = engine.index().lock().unwrap();
    let circle = &index.find_by_name("Circle")[0];
    assert_eq!(circle.module.as_deref(), Some("shapes/circle"));
    assert_eq!(circle.kind, Some(SymbolKind::Class));
    assert_eq!(
        circle.file_path.as_deref(),
        Some(harness.path().join("src/shapes/circle.ts").as_path())
    );

    let observable = &index.find_by_name("Observable")[0];
    assert_eq!(observable.module.as_deref(), Some("rxjs"));
    assert!(observable.file_path.is_none());
    assert!(index.find_by_name("Point").is_empty());

    assert_eq!(index.find_by_name("clamp")[0].module.as_deref(), Some("util"));
}

#[tokio::test]
async fn test_scan_without_manifest_leaves_modules_unset() {
    let harness = TestHarness::new().unwrap();
    harness.create_test_file("lib/a.ts", "export const A = 1;").unwrap();

    let engine = harness.engine();
    engine.scan_all(false).await.unwrap();

    assert!(engine.aliases().is_empty());
    let index = engine.index().lock().unwrap();
    let a = &index.find_by_name("A")[0];
    assert!(a.module.is_none());
    assert_eq!(a.kind, Some(SymbolKind::Const));
}

#[tokio::test]
async fn test_ignored_directories_are_skipped() {
    let harness = TestHarness::new().unwrap();
    harness.create_test_file("src/kept.ts", "export class Kept {}").unwrap();
    harness
        .create_test_file("node_modules/pkg/index.ts", "export class Vendored {}")
        .unwrap();
    harness
        .create_test_file("typings/globals.ts", "export interface Global {}")
        .unwrap();
    harness
        .create_test_file("jspm_packages/npm/x.ts", "export enum Jspm { A }")
        .unwrap();

    let engine = harness.engine();
    let summary = engine.scan_all(false).await.unwrap();

    assert_eq!(summary.total_files, 1);
    let index = engine.index().lock().unwrap();
    assert_eq!(index.symbol_count(), 1);
    assert!(index.find_by_name("Global").is_empty());
    assert!(index.find_by_name("Jspm").is_empty());
}

#[tokio::test]
async fn test_non_matching_extensions_are_not_scanned() {
    let harness = TestHarness::new().unwrap();
    harness.create_test_file("a.ts", "export type A = string;").unwrap();
    harness.create_test_file("b.js", "export const B = 1;").unwrap();

    let engine = harness.engine();
    let summary = engine.scan_all(false).await.unwrap();

    assert_eq!(summary.total_files, 1);
    assert_eq!(summary.symbol_count, 1);
}

#[tokio::test]
async fn test_empty_project_completes() {
    let harness = TestHarness::new().unwrap();
    let engine = harness.engine();

    let summary = engine.scan_all(false).await.unwrap();

    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.symbol_count, 0);
    assert_eq!(summary.yields, 0);
}

#[tokio::test]
async fn test_large_scan_yields_between_chunks() {
    let harness = TestHarness::new().unwrap();
    for i in 0..120 {
        harness
            .create_test_file(&format!("src/m{:03}.ts", i), &format!("export const V{} = {};", i, i))
            .unwrap();
    }

    let engine = harness.engine();
    let summary = engine.scan_all(false).await.unwrap();

    assert_eq!(summary.total_files, 120);
    assert_eq!(summary.symbol_count, 120);
    // Chunks of 50: 50 + 50 + 20
    assert_eq!(summary.yields, 2);
}

#[tokio::test]
async fn test_reindexing_a_file_is_idempotent() {
    let harness = TestHarness::with_src_alias().unwrap();
    let path = harness
        .create_test_file(
            "src/api.ts",
            "import { map } from 'rxjs/operators';\nexport class Api {}\nexport const VERSION = 2;",
        )
        .unwrap();

    let engine = harness.engine();
    engine.scan_all(false).await.unwrap();
    let before = {
        let index = engine.index().lock().unwrap();
        let mut names: Vec<_> = index.get_by_file(&path).into_iter().map(|r| r.name).collect();
        names.sort();
        names
    };

    engine.process_files(vec![path.clone()], ScanMode::Incremental, false).await;
    engine.process_files(vec![path.clone()], ScanMode::Incremental, false).await;

    let index = engine.index().lock().unwrap();
    let mut after: Vec<_> = index.get_by_file(&path).into_iter().map(|r| r.name).collect();
    after.sort();
    assert_eq!(before, after);
    assert_eq!(index.find_by_name("Api").len(), 1);
}

#[tokio::test]
async fn test_missing_file_is_reported_not_fatal() {
    let harness = TestHarness::new().unwrap();
    let good = harness.create_test_file("good.ts", "export class Good {}").unwrap();
    let missing = harness.path().join("missing.ts");

    let engine = harness.engine();
    let summary = engine
        .process_files(vec![missing.clone(), good], ScanMode::Incremental, false)
        .await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors[0].path, missing);
    assert!(summary.error_report().has_errors());
    assert_eq!(engine.symbol_count(), 1);
}
