#[test]
fn quill_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/quill_error_pass.rs");
    t.pass("tests/ui/quill_error_bridge.rs");
    t.compile_fail("tests/ui/quill_error_no_context.rs");
    t.compile_fail("tests/ui/quill_error_bad_context_type.rs");
    t.compile_fail("tests/ui/quill_error_tuple_variant.rs");
    t.compile_fail("tests/ui/quill_error_bridge_missing_code.rs");
    t.compile_fail("tests/ui/quill_error_bridge_unknown_key.rs");
    t.compile_fail("tests/ui/quill_error_bridge_bad_retryable.rs");
}
