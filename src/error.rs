/// Everything that can go wrong when sizing or converting an image
///
/// Every error is a deterministic function of the arguments, nothing is worth retrying.
/// When a conversion fails the destination buffers must be considered to be in an
/// unspecified state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[repr(C)]
pub enum ErrorKind {
    /// [`initialize`](crate::initialize) was never called
    #[error("the library was not initialized")]
    NotInitialized,

    /// One or more parameters have values which are not legal on their own
    #[error("one or more parameters have not legal values for the command")]
    InvalidValue,

    /// Every parameter is legal on its own, but their combination is not supported
    #[error("the combination of parameters is not legal for the command")]
    InvalidOperation,

    /// Fewer planes, strides or bytes than the image format requires were provided
    #[error("not enough data provided")]
    NotEnoughData,
}
