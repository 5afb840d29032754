//! Read-side facade: entropy decoding, inverse filtering and scattering of
//! chunks into a caller-supplied hyper-rectangle, plus LUT decoding.

use crate::codec::cube;
use crate::codec::encoder::{validate_array_arguments, validate_layout};
use crate::codec::lut;
use crate::core::bytes::as_typed_slice_mut;
use crate::core::compression::{p4ndec256_bound, CompressionType};
use crate::core::data_types::DataType;
use crate::core::delta2d;
use crate::core::entropy;
use crate::core::scalar;
use crate::errors::OmCodecError;
use crate::utils::divide_rounded_up_u64;

/// Read-side counterpart of [`crate::codec::encoder::OmEncoder`]. The
/// configuration must match the one the variable was written with; the
/// container records it.
pub struct OmDecoder {
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

impl OmDecoder {
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

    pub fn count_chunks(&self) -> u64 {
        self.dimensions
            .iter()
            .zip(&self.chunks)
            .map(|(dim, chunk)| divide_rounded_up_u64(*dim, *chunk))
            .product()
    }

    /// Bytes of scratch needed to decode one chunk, including the entropy
    /// coder's read-ahead slack.
    pub fn chunk_buffer_size(&self) -> usize {
        let chunk_length: u64 = self.chunks.iter().product();
        p4ndec256_bound(chunk_length as usize, self.bytes_per_element_compressed)
    }

    /// Decodes chunk `chunk_index` from `compressed` and scatters it into
    /// the hyper-rectangle `(array_offset, array_count)` of the caller's
    /// buffer, converting back to the uncompressed element type. Returns the
    /// number of compressed bytes consumed, which must equal the chunk's
    /// LUT extent for a well-formed payload.
    ///
    /// `compressed` starts at the chunk's LUT offset; the entropy coders may
    /// read ahead of the compressed data, so the slice should extend past
    /// the chunk where possible (within the payload stream it naturally
    /// does).
    #[allow(clippy::too_many_arguments)]
    pub fn decompress_chunk(
        &self,
        compressed: &[u8],
        array_dimensions: &[u64],
        array_offset: &[u64],
        array_count: &[u64],
        chunk_index: u64,
        chunk_index_offset_in_array: u64,
        array: &mut [u8],
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
        let chunk_buffer = &mut chunk_buffer[..self.chunk_buffer_size()];
        let shape = cube::chunk_shape(&self.dimensions, &self.chunks, chunk_index);

        match self.compression {
            CompressionType::PforDelta2dInt16 | CompressionType::PforDelta2dInt16Logarithmic => {
                let logarithmic =
                    self.compression == CompressionType::PforDelta2dInt16Logarithmic;
                let packed: &mut [i16] = as_typed_slice_mut(chunk_buffer);
                let consumed =
                    entropy::pfor16_decode(compressed, shape.len, as_typed_slice_mut(packed));
                delta2d::delta2d_decode(shape.rows, shape.cols, &mut packed[..shape.len]);

                let packed = &packed[..shape.len];
                let dst: &mut [f32] = as_typed_slice_mut(array);
                let (scale, offset) = (self.scale_factor, self.add_offset);
                cube::walk_runs(
                    &self.dimensions,
                    &self.chunks,
                    array_dimensions,
                    array_offset,
                    array_count,
                    chunk_index,
                    chunk_index_offset_in_array,
                    |write, read, count| {
                        let run = &packed[read..read + count];
                        let out_run = &mut dst[write..write + count];
                        if logarithmic {
                            scalar::int16_to_float_log10(scale, offset, run, out_run);
                        } else {
                            scalar::int16_to_float(scale, offset, run, out_run);
                        }
                    },
                )?;
                Ok(consumed)
            }
            CompressionType::FpxXor2d => {
                let width = self.bytes_per_element;
                let consumed = match self.data_type {
                    DataType::Float => {
                        let packed: &mut [f32] = as_typed_slice_mut(chunk_buffer);
                        let consumed =
                            entropy::fpx32_decode(compressed, shape.len, as_typed_slice_mut(packed));
                        delta2d::delta2d_decode_xor(shape.rows, shape.cols, &mut packed[..shape.len]);
                        consumed
                    }
                    DataType::Double => {
                        let packed: &mut [f64] = as_typed_slice_mut(chunk_buffer);
                        let consumed =
                            entropy::fpx64_decode(compressed, shape.len, as_typed_slice_mut(packed));
                        delta2d::delta2d_decode_xor_double(
                            shape.rows,
                            shape.cols,
                            &mut packed[..shape.len],
                        );
                        consumed
                    }
                    _ => return Err(OmCodecError::InvalidDataType),
                };

                let chunk_buffer = &chunk_buffer[..shape.len * width];
                cube::walk_runs(
                    &self.dimensions,
                    &self.chunks,
                    array_dimensions,
                    array_offset,
                    array_count,
                    chunk_index,
                    chunk_index_offset_in_array,
                    |write, read, count| {
                        scalar::copy_identity(
                            &chunk_buffer[read * width..(read + count) * width],
                            &mut array[write * width..(write + count) * width],
                        );
                    },
                )?;
                Ok(consumed)
            }
        }
    }

    /// Decodes the whole LUT; `lut.len()` is the uncompressed length and
    /// `stride` the padded group width recorded by the container.
    pub fn decompress_lut(
        &self,
        data: &[u8],
        stride: usize,
        lut: &mut [u64],
    ) -> Result<(), OmCodecError> {
        lut::decompress_lut(data, stride, self.lut_chunk_element_count, lut)
    }

    /// Decodes a single LUT group in O(1), see [`lut::decompress_lut_group`].
    pub fn decompress_lut_group(
        &self,
        data: &[u8],
        stride: usize,
        lut_len: usize,
        group_index: usize,
        out: &mut [u64],
    ) -> Result<usize, OmCodecError> {
        lut::decompress_lut_group(
            data,
            stride,
            self.lut_chunk_element_count,
            lut_len,
            group_index,
            out,
        )
    }
}
