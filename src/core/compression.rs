use crate::core::data_types::DataType;
use crate::errors::OmCodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionType {
    /// Lossy compression of floats scaled to 16-bit integers, 2D delta
    /// filtered and entropy coded with zig-zag delta PFOR.
    PforDelta2dInt16 = 0,
    /// Lossless float/double compression using 2D xor filtering.
    FpxXor2d = 1,
    /// Same as `PforDelta2dInt16`, but applies `log10(1+x)` before scaling.
    PforDelta2dInt16Logarithmic = 3,
}

impl CompressionType {
    /// Element widths `(uncompressed, compressed)` in bytes for this mode
    /// applied to `data_type`. Fails for combinations the wire format does
    /// not define.
    pub fn element_widths(&self, data_type: DataType) -> Result<(usize, usize), OmCodecError> {
        match self {
            CompressionType::PforDelta2dInt16 | CompressionType::PforDelta2dInt16Logarithmic => {
                if data_type != DataType::Float {
                    return Err(OmCodecError::InvalidDataType);
                }
                Ok((4, 2))
            }
            CompressionType::FpxXor2d => {
                if !data_type.is_float() {
                    return Err(OmCodecError::InvalidDataType);
                }
                let width = data_type.bytes_per_element();
                Ok((width, width))
            }
        }
    }
}

impl TryFrom<u8> for CompressionType {
    type Error = OmCodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CompressionType::PforDelta2dInt16),
            1 => Ok(CompressionType::FpxXor2d),
            3 => Ok(CompressionType::PforDelta2dInt16Logarithmic),
            _ => Err(OmCodecError::InvalidCompressionType),
        }
    }
}

/// For encoding: compression lib read and write more data to buffers
/// https://github.com/powturbo/TurboPFor-Integer-Compression/issues/59
/// Only the output buffer for encoding needs padding.
pub fn p4nenc256_bound(n: usize, bytes_per_element: usize) -> usize {
    (n + 255) / 256 + (n + 32) * bytes_per_element
}

/// For decoding: compression lib read and write more data to buffers
/// https://github.com/powturbo/TurboPFor-Integer-Compression/issues/59
pub fn p4ndec256_bound(n: usize, bytes_per_element: usize) -> usize {
    n * bytes_per_element + 32 * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_widths_follow_the_mode_table() {
        let pfor = CompressionType::PforDelta2dInt16;
        assert_eq!(pfor.element_widths(DataType::Float), Ok((4, 2)));
        assert_eq!(
            pfor.element_widths(DataType::Double),
            Err(OmCodecError::InvalidDataType)
        );
        assert_eq!(
            pfor.element_widths(DataType::Int32),
            Err(OmCodecError::InvalidDataType)
        );

        let fpx = CompressionType::FpxXor2d;
        assert_eq!(fpx.element_widths(DataType::Float), Ok((4, 4)));
        assert_eq!(fpx.element_widths(DataType::Double), Ok((8, 8)));
        assert_eq!(
            fpx.element_widths(DataType::Uint16),
            Err(OmCodecError::InvalidDataType)
        );
    }

    #[test]
    fn unknown_compression_value_is_rejected() {
        assert_eq!(
            CompressionType::try_from(2),
            Err(OmCodecError::InvalidCompressionType)
        );
        assert_eq!(
            CompressionType::try_from(3),
            Ok(CompressionType::PforDelta2dInt16Logarithmic)
        );
    }
}
