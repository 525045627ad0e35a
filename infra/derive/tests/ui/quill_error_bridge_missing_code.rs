use quill_derive::quill_error;

#[quill_error]
pub enum DemoError {
    #[quill(retryable = true)]
    Internal { message: std::borrow::Cow<'static, str> },
}

fn main() {}
