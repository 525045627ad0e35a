use quill_derive::quill_error;

#[quill_error]
pub enum DemoError {
    #[quill(code = SystemFile, retryable = "yes")]
    Internal { message: std::borrow::Cow<'static, str> },
}

fn main() {}
