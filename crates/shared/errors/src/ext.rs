use crate::error::QuillError;
use std::error::Error as StdError;

/// Re-wraps foreign errors into the taxonomy at a component boundary.
pub trait QuillResultExt<T> {
    /// Maps the error through [`QuillError::wrap`]: taxonomy errors pass through
    /// unchanged, anything else becomes the cause of `make()`.
    fn or_quill(self, make: impl FnOnce() -> QuillError) -> Result<T, QuillError>;
}

impl<T, E> QuillResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    #[inline]
    fn or_quill(self, make: impl FnOnce() -> QuillError) -> Result<T, QuillError> {
        self.map_err(|err| QuillError::wrap(Box::new(err), make))
    }
}

/// Finds the taxonomy error inside an arbitrary error value.
///
/// Errors that carry no taxonomy information yield `None`; callers treat those as
/// transient.
pub trait AsQuillError {
    fn as_quill_error(&self) -> Option<&QuillError>;
}

impl AsQuillError for QuillError {
    #[inline]
    fn as_quill_error(&self) -> Option<&QuillError> {
        Some(self)
    }
}

impl AsQuillError for anyhow::Error {
    fn as_quill_error(&self) -> Option<&QuillError> {
        self.chain().find_map(|err| err.downcast_ref::<QuillError>())
    }
}

impl AsQuillError for Box<dyn StdError + Send + Sync + 'static> {
    fn as_quill_error(&self) -> Option<&QuillError> {
        self.downcast_ref::<QuillError>()
    }
}

impl AsQuillError for std::io::Error {
    #[inline]
    fn as_quill_error(&self) -> Option<&QuillError> {
        self.get_ref().and_then(|inner| inner.downcast_ref::<QuillError>())
    }
}
