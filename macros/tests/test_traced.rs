use stagebloom_macros::test_traced;
use tracing::{debug, error, info, trace, warn};

#[test_traced("INFO")]
fn test_info_level() {
    info!("This is an info log");
    debug!("This is a debug log (won't be shown)");
    assert_eq!(2 + 2, 4);
}

#[test_traced]
fn test_default_level() {
    debug!("This is a debug log");
    trace!("This is a trace log (won't be shown)");
    assert_eq!(3 * 3, 9);
}

#[test_traced("warn")]
fn test_lowercase_level() {
    warn!("This is a warn log");
    assert_eq!(4 - 1, 3);
}

#[test_traced("ERROR")]
fn test_error_level() {
    error!("This is an error log");
    assert_eq!(5 * 2, 10);
}

#[test_traced]
#[should_panic(expected = "inside traced test")]
fn test_panic_propagates() {
    info!("about to panic");
    panic!("inside traced test");
}
