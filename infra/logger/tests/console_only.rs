use quill_logger::{EventLog, LevelFilter, Logger, TracingLog, fields};

#[test]
fn init_console_only_has_no_guard() {
    let logger = Logger::builder()
        .name("integration-console-only")
        .console(true)
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(logger.guard().is_none(), "console-only logger should not create a file guard");

    TracingLog::new("integration").info("console sink is live", &fields! { "ok" => true });
}
