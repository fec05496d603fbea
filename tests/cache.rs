mod common;

use common::scenario_workbook;
use sales_dashboard::config::SourceConfig;
use sales_dashboard::loader::{LoadErrorKind, is_loaded, load};
use std::sync::Arc;

// The cache is process-wide, so every step lives in one test
#[test]
fn loads_once_per_process() {
    let missing = SourceConfig {
        path: "does/not/exist.xlsx".into(),
        ..SourceConfig::default()
    };
    let err = load(&missing).unwrap_err();
    assert_eq!(err.kind(), LoadErrorKind::ResourceNotFound);
    assert!(!is_loaded(), "a failed load must not be cached");
    println!("✓ Failed load left the cache empty");

    let fixture = scenario_workbook();
    let first = load(&fixture.config()).unwrap();
    assert!(is_loaded());
    assert_eq!(first.len(), 4);

    let second = load(&fixture.config()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);
    println!("✓ Second load returned the cached table");

    // Once loaded, the workbook is never read again, even when it is gone
    let path = fixture.path.clone();
    drop(fixture);
    assert!(!path.exists());
    let third = load(&SourceConfig {
        path,
        ..SourceConfig::default()
    })
    .unwrap();
    assert!(Arc::ptr_eq(&first, &third));

    let other = load(&missing).unwrap();
    assert!(Arc::ptr_eq(&first, &other));
}
