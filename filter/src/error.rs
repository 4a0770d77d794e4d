/// Errors that can occur when constructing a bloom filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A filter was configured without any hash function.
    #[error("at least one hash function is required")]
    NoHashers,
}
