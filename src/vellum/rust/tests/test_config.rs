// SPDX-License-Identifier: GPL-3.0-or-later
use vellum::{Config, Status};

// Only one test in this binary, the configuration is process-wide.
#[test]
fn test_configure_once() {
    let config = Config {
        liveness_checks: false,
    };
    assert_eq!(vellum::configure(config), Ok(()));
    assert_eq!(*vellum::config(), config);

    let other = Config {
        liveness_checks: true,
    };
    assert_eq!(vellum::configure(other), Err(other));
    assert_eq!(*vellum::config(), config);

    vellum::init();
    vellum::init();
    assert!(!vellum::library_version().is_empty());
    assert_eq!(
        vellum::status_message(Status::InvalidRestore),
        "vl_restore() without matching vl_save()"
    );
}
