use thiserror::Error;

pub type Result<T> = std::result::Result<T, SampleError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    /// A candidate set had nothing to choose from.
    #[error("invalid argument: candidate set `{field}` is empty")]
    EmptyCandidates { field: &'static str },
    /// A candidate is too large for a size derived from it.
    #[error("invalid argument: candidate {value} in `{field}` overflows a derived size")]
    SizeOverflow { field: &'static str, value: usize },
}
