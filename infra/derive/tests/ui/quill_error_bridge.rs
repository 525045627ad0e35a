use quill_derive::quill_error;
use quill_errors::{ErrorCode, QuillError};
use std::borrow::Cow;

#[quill_error]
pub enum DemoError {
    #[quill(code = SystemFile)]
    #[error("Demo I/O failed{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[quill(code = PublishNetwork, retryable = false)]
    #[error("Demo endpoint refused{}: {message}", format_context(.context))]
    Refused { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Demo fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let io = std::io::Error::other("disk gone");
    let mapped: QuillError = DemoError::from(io).into();
    assert_eq!(mapped.code(), ErrorCode::SystemFile);
    assert!(!mapped.retryable());

    let refused: QuillError =
        DemoError::Refused { message: "503".into(), context: None }.into();
    assert_eq!(refused.code(), ErrorCode::PublishNetwork);
    assert!(!refused.retryable(), "explicit override must beat the network default");

    let internal: QuillError = DemoError::from("unexpected").into();
    assert_eq!(internal.code(), ErrorCode::SystemUnknown);
}
