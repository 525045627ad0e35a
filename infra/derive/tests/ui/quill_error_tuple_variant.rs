use quill_derive::quill_error;

#[quill_error]
pub enum DemoError {
    Io(std::io::Error),
}

fn main() {}
