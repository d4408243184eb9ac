use thiserror::Error;

/// Failures raised by buffer mutations. The buffer is left untouched whenever
/// one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The edit would grow the buffer to `requested` chars, which is not below `max`.
    #[error("buffer capacity exceeded: {requested} chars requested, limit is {max}")]
    CapacityExceeded { requested: usize, max: usize },
    #[error("offset {offset} is outside the buffer (length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },
}
