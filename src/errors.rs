use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OmCodecError {
    #[error("Invalid compression type")]
    InvalidCompressionType,
    #[error("Invalid data type")]
    InvalidDataType,
    #[error("Invalid LUT chunk length")]
    InvalidLutChunkLength,
    #[error("Out of bound read: offset {offset}, count {count}, allowed {allowed}")]
    OutOfBoundRead {
        offset: usize,
        count: usize,
        allowed: usize,
    },
    #[error(
        "Offset and count exceed dimension: offset {offset}, count {count}, dimension {dimension}"
    )]
    OffsetAndCountExceedDimension {
        offset: u64,
        count: u64,
        dimension: u64,
    },
    #[error("Dimension must be larger than 0")]
    DimensionMustBeLargerThan0,
    #[error("Mismatching cube dimension length")]
    MismatchingCubeDimensionLength,
    #[error("Buffer too small: required {required} bytes, got {actual}")]
    BufferTooSmall { required: usize, actual: usize },
}
