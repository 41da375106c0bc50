use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// A defect in the problem description, detected during normalization and
/// reported before the search runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A primary item occurs in no option, so no exact cover can exist.
    /// Reported rather than silently yielding zero solutions, since it is
    /// almost always an input mistake.
    #[error("primary item `{item}` appears in no option")]
    EmptyPrimary { item: String },
    #[error("option {option} lists item `{item}` more than once")]
    DuplicateItem { option: usize, item: String },
    #[error("option {option} assigns a color to primary item `{item}`")]
    ColorOnPrimary { option: usize, item: String },
    /// Only raised when explicit item lists were supplied; otherwise unseen
    /// identifiers are interned as new items.
    #[error("option {option} mentions item `{token}`, which is not declared")]
    UnknownItem { option: usize, token: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<InputError>,
        backtrace: Box<Backtrace>,
    },
}

impl Error {
    /// The normalization defect behind this error.
    pub fn input_error(&self) -> &InputError {
        let Error::Inner { inner, .. } = self;
        inner
    }
}

impl From<InputError> for Error {
    fn from(inner: InputError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
