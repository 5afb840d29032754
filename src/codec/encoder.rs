//! Write-side facade: chunk packing, filtering, entropy coding and LUT
//! compression for one variable.

use crate::codec::cube;
use crate::codec::lut;
use crate::core::bytes::{as_typed_slice, as_typed_slice_mut};
use crate::core::compression::{p4nenc256_bound, CompressionType};
use crate::core::data_types::DataType;
use crate::core::delta2d;
use crate::core::entropy;
use crate::core::scalar;
use crate::errors::OmCodecError;
use crate::utils::divide_rounded_up_u64;

/// Immutable per-variable configuration. Constructed once before a write;
/// all buffers are owned by the caller, so distinct chunks can be
/// compressed in parallel on disjoint scratch.
pub struct OmEncoder {
    scale_factor: f32,
    add_offset: f32,
    compression: CompressionType,
    data_type: DataType,
    dimensions: Vec<u64>,
    chunks: Vec<u64>,
    lut_chunk_element_count: usize,
    bytes_per_element: usize,
    bytes_per_element_compressed: usize,
}

impl OmEncoder {
    /// `lut_chunk_element_count` should be 256 for production files.
    pub fn new(
        scale_factor: f32,
        add_offset: f32,
        compression: CompressionType,
        data_type: DataType,
        dimensions: Vec<u64>,
        chunks: Vec<u64>,
        lut_chunk_element_count: usize,
    ) -> Result<Self, OmCodecError> {
        let (bytes_per_element, bytes_per_element_compressed) =
            compression.element_widths(data_type)?;
        validate_layout(&dimensions, &chunks, lut_chunk_element_count)?;
        Ok(Self {
            scale_factor,
            add_offset,
            compression,
            data_type,
            dimensions,
            chunks,
            lut_chunk_element_count,
            bytes_per_element,
            bytes_per_element_compressed,
        })
    }

    pub fn compression(&self) -> CompressionType {
        self.compression
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn add_offset(&self) -> f32 {
        self.add_offset
    }

    pub fn dimensions(&self) -> &[u64] {
        &self.dimensions
    }

    pub fn chunk_dimensions(&self) -> &[u64] {
        &self.chunks
    }

    pub fn lut_chunk_element_count(&self) -> usize {
        self.lut_chunk_element_count
    }

    /// Width of one element in the caller's array in bytes.
    pub fn bytes_per_element(&self) -> usize {
        self.bytes_per_element
    }

    /// Width of one element in the packed chunk buffer in bytes.
    pub fn bytes_per_element_compressed(&self) -> usize {
        self.bytes_per_element_compressed
    }

    /// Total number of chunks covering `dimensions`.
    pub fn count_chunks(&self) -> u64 {
        self.dimensions
            .iter()
            .zip(&self.chunks)
            .map(|(dim, chunk)| divide_rounded_up_u64(*dim, *chunk))
            .product()
    }

    /// Number of chunks contained in a sub-array of extent `array_count`.
    pub fn count_chunks_in_array(&self, array_count: &[u64]) -> u64 {
        array_count
            .iter()
            .zip(&self.chunks)
            .map(|(count, chunk)| divide_rounded_up_u64(*count, *chunk))
            .product()
    }

    /// Bytes of scratch needed for one packed, uncompressed chunk.
    pub fn chunk_buffer_size(&self) -> usize {
        let chunk_length: u64 = self.chunks.iter().product();
        chunk_length as usize * self.bytes_per_element_compressed
    }

    /// Upper bound on the entropy-coded output of one chunk, including the
    /// coder's write-ahead.
    pub fn compressed_chunk_buffer_size(&self) -> usize {
        let chunk_length: u64 = self.chunks.iter().product();
        p4nenc256_bound(chunk_length as usize, self.bytes_per_element_compressed)
    }

    /// Size of the output buffer `compress_lut` needs for `lut`.
    pub fn lut_buffer_size(&self, lut: &[u64]) -> usize {
        lut::lut_buffer_size(lut, self.lut_chunk_element_count)
    }

    /// Compresses the finalized chunk-offset table, see [`lut::compress_lut`].
    pub fn compress_lut(&self, lut: &[u64], out: &mut [u8]) -> Result<usize, OmCodecError> {
        lut::compress_lut(lut, self.lut_chunk_element_count, out)
    }

    /// Packs chunk `chunk_index` from the caller's buffer, filters it and
    /// entropy-codes it into `out`. Returns the number of bytes written.
    ///
    /// `array` is the raw byte view of a buffer with shape
    /// `array_dimensions`, holding valid data in the hyper-rectangle
    /// `(array_offset, array_count)`; that rectangle must cover the slab the
    /// chunk addresses. `chunk_index_offset_in_array` is the chunk index of
    /// the buffer's first chunk in the mixed radices of the full chunk grid
    /// (zero when the buffer holds the whole array).
    ///
    /// `chunk_buffer` needs [`Self::chunk_buffer_size`] bytes aligned for
    /// the compressed element type and `out` needs
    /// [`Self::compressed_chunk_buffer_size`] bytes; see
    /// [`crate::core::bytes::ScratchBuffer`].
    #[allow(clippy::too_many_arguments)]
    pub fn compress_chunk(
        &self,
        array: &[u8],
        array_dimensions: &[u64],
        array_offset: &[u64],
        array_count: &[u64],
        chunk_index: u64,
        chunk_index_offset_in_array: u64,
        out: &mut [u8],
        chunk_buffer: &mut [u8],
    ) -> Result<usize, OmCodecError> {
        validate_array_arguments(
            self.dimensions.len(),
            array.len(),
            self.bytes_per_element,
            array_dimensions,
            array_offset,
            array_count,
        )?;
        if chunk_buffer.len() < self.chunk_buffer_size() {
            return Err(OmCodecError::BufferTooSmall {
                required: self.chunk_buffer_size(),
                actual: chunk_buffer.len(),
            });
        }
        if out.len() < self.compressed_chunk_buffer_size() {
            return Err(OmCodecError::BufferTooSmall {
                required: self.compressed_chunk_buffer_size(),
                actual: out.len(),
            });
        }
        let chunk_buffer = &mut chunk_buffer[..self.chunk_buffer_size()];

        match self.compression {
            CompressionType::PforDelta2dInt16 | CompressionType::PforDelta2dInt16Logarithmic => {
                let logarithmic =
                    self.compression == CompressionType::PforDelta2dInt16Logarithmic;
                let src: &[f32] = as_typed_slice(array);
                let packed: &mut [i16] = as_typed_slice_mut(chunk_buffer);
                let (scale, offset) = (self.scale_factor, self.add_offset);
                let shape = cube::walk_runs(
                    &self.dimensions,
                    &self.chunks,
                    array_dimensions,
                    array_offset,
                    array_count,
                    chunk_index,
                    chunk_index_offset_in_array,
                    |read, write, count| {
                        let run = &src[read..read + count];
                        let out_run = &mut packed[write..write + count];
                        if logarithmic {
                            scalar::float_to_int16_log10(scale, offset, run, out_run);
                        } else {
                            scalar::float_to_int16(scale, offset, run, out_run);
                        }
                    },
                )?;
                delta2d::delta2d_encode(shape.rows, shape.cols, &mut packed[..shape.len]);
                Ok(entropy::pfor16_encode(
                    as_typed_slice_mut(&mut packed[..shape.len]),
                    out,
                ))
            }
            CompressionType::FpxXor2d => {
                let width = self.bytes_per_element;
                let shape = cube::walk_runs(
                    &self.dimensions,
                    &self.chunks,
                    array_dimensions,
                    array_offset,
                    array_count,
                    chunk_index,
                    chunk_index_offset_in_array,
                    |read, write, count| {
                        scalar::copy_identity(
                            &array[read * width..(read + count) * width],
                            &mut chunk_buffer[write * width..(write + count) * width],
                        );
                    },
                )?;
                match self.data_type {
                    DataType::Float => {
                        let packed: &mut [f32] =
                            as_typed_slice_mut(&mut chunk_buffer[..shape.len * width]);
                        delta2d::delta2d_encode_xor(shape.rows, shape.cols, packed);
                        Ok(entropy::fpx32_encode(as_typed_slice_mut(packed), out))
                    }
                    DataType::Double => {
                        let packed: &mut [f64] =
                            as_typed_slice_mut(&mut chunk_buffer[..shape.len * width]);
                        delta2d::delta2d_encode_xor_double(shape.rows, shape.cols, packed);
                        Ok(entropy::fpx64_encode(as_typed_slice_mut(packed), out))
                    }
                    _ => Err(OmCodecError::InvalidDataType),
                }
            }
        }
    }
}

pub(crate) fn validate_layout(
    dimensions: &[u64],
    chunks: &[u64],
    lut_chunk_element_count: usize,
) -> Result<(), OmCodecError> {
    if dimensions.is_empty() {
        return Err(OmCodecError::DimensionMustBeLargerThan0);
    }
    if dimensions.len() != chunks.len() {
        return Err(OmCodecError::MismatchingCubeDimensionLength);
    }
    if chunks.iter().any(|&chunk| chunk == 0) {
        return Err(OmCodecError::DimensionMustBeLargerThan0);
    }
    if lut_chunk_element_count == 0 || lut_chunk_element_count > lut::MAX_LUT_ELEMENTS {
        return Err(OmCodecError::InvalidLutChunkLength);
    }
    Ok(())
}

pub(crate) fn validate_array_arguments(
    dimension_count: usize,
    array_bytes: usize,
    bytes_per_element: usize,
    array_dimensions: &[u64],
    array_offset: &[u64],
    array_count: &[u64],
) -> Result<(), OmCodecError> {
    if array_dimensions.len() != dimension_count
        || array_offset.len() != dimension_count
        || array_count.len() != dimension_count
    {
        return Err(OmCodecError::MismatchingCubeDimensionLength);
    }
    for ((dimension, offset), count) in array_dimensions.iter().zip(array_offset).zip(array_count)
    {
        if offset + count > *dimension {
            return Err(OmCodecError::OffsetAndCountExceedDimension {
                offset: *offset,
                count: *count,
                dimension: *dimension,
            });
        }
    }
    let array_total_count: u64 = array_dimensions.iter().product();
    if array_bytes != array_total_count as usize * bytes_per_element {
        return Err(OmCodecError::MismatchingCubeDimensionLength);
    }
    Ok(())
}
