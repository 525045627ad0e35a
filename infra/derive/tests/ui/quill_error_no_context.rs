use quill_derive::quill_error;

#[quill_error]
pub enum DemoError {
    Io { source: std::io::Error },
}

fn main() {}
