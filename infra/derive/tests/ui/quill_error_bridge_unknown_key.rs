use quill_derive::quill_error;

#[quill_error]
pub enum DemoError {
    #[quill(code = SystemFile, level = 3)]
    Internal { message: std::borrow::Cow<'static, str> },
}

fn main() {}
