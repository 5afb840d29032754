//! Group-wise compression of the chunk-offset lookup table.
//!
//! The LUT holds `number_of_chunks + 1` monotonically non-decreasing byte
//! offsets into the chunk payload stream. It is stored as fixed-size groups
//! of delta-PFOR coded values, every compressed group padded to the width of
//! the largest one, so a reader can seek to group `k / group size` without
//! decoding anything else.

use crate::core::compression::p4nenc256_bound;
use crate::core::entropy;
use crate::errors::OmCodecError;
use crate::utils::divide_rounded_up;
use std::cmp::min;

/// Upper bound on `lut_chunk_element_count`.
pub const MAX_LUT_ELEMENTS: usize = 256;

/// The 64-bit PFOR coder may write up to 32 values past the compressed end.
const LUT_SLACK_BYTES: usize = 32 * std::mem::size_of::<u64>();

/// Size of the output buffer `compress_lut` needs for `lut`. Trial-encodes
/// every group to find the common padded group width.
pub fn lut_buffer_size(lut: &[u64], lut_chunk_element_count: usize) -> usize {
    let n_lut_chunks = divide_rounded_up(lut.len(), lut_chunk_element_count);
    let mut scratch = vec![0u8; p4nenc256_bound(MAX_LUT_ELEMENTS, std::mem::size_of::<u64>())];
    let mut max_length = 0;
    for lut_chunk in lut.chunks(lut_chunk_element_count) {
        let len = entropy::pfor64_encode(lut_chunk, &mut scratch);
        if len > max_length {
            max_length = len;
        }
    }
    max_length * n_lut_chunks + LUT_SLACK_BYTES
}

/// Compresses `lut` into equally strided groups. `out` must be sized by
/// [`lut_buffer_size`]; the group stride becomes
/// `(out.len() - slack) / n_groups` and the returned byte count is
/// `out.len() - slack`, the portion of `out` the container stores.
pub fn compress_lut(
    lut: &[u64],
    lut_chunk_element_count: usize,
    out: &mut [u8],
) -> Result<usize, OmCodecError> {
    if lut_chunk_element_count == 0 || lut_chunk_element_count > MAX_LUT_ELEMENTS {
        return Err(OmCodecError::InvalidLutChunkLength);
    }
    if lut.is_empty() {
        return Err(OmCodecError::InvalidLutChunkLength);
    }
    let n_lut_chunks = divide_rounded_up(lut.len(), lut_chunk_element_count);
    if out.len() < LUT_SLACK_BYTES {
        return Err(OmCodecError::BufferTooSmall {
            required: LUT_SLACK_BYTES,
            actual: out.len(),
        });
    }
    let lut_size = out.len() - LUT_SLACK_BYTES;
    let lut_chunk_length = lut_size / n_lut_chunks;

    for (i, lut_chunk) in lut.chunks(lut_chunk_element_count).enumerate() {
        let len = entropy::pfor64_encode(lut_chunk, &mut out[i * lut_chunk_length..]);
        if len > lut_chunk_length {
            return Err(OmCodecError::BufferTooSmall {
                required: len * n_lut_chunks + LUT_SLACK_BYTES,
                actual: out.len(),
            });
        }
    }
    Ok(lut_size)
}

/// Decodes group `group_index` of a compressed LUT into `out` and returns
/// the number of offsets written. `data` is the stored LUT payload (extra
/// trailing bytes are fine); `stride` is the padded group width recorded by
/// the container; `lut_len` is the uncompressed LUT length.
pub fn decompress_lut_group(
    data: &[u8],
    stride: usize,
    lut_chunk_element_count: usize,
    lut_len: usize,
    group_index: usize,
    out: &mut [u64],
) -> Result<usize, OmCodecError> {
    if lut_chunk_element_count == 0 || lut_chunk_element_count > MAX_LUT_ELEMENTS {
        return Err(OmCodecError::InvalidLutChunkLength);
    }
    let n_lut_chunks = divide_rounded_up(lut_len, lut_chunk_element_count);
    if group_index >= n_lut_chunks {
        return Err(OmCodecError::OutOfBoundRead {
            offset: group_index,
            count: 1,
            allowed: n_lut_chunks,
        });
    }
    let start = group_index * lut_chunk_element_count;
    let count = min(lut_chunk_element_count, lut_len - start);
    if out.len() < count {
        return Err(OmCodecError::BufferTooSmall {
            required: count * std::mem::size_of::<u64>(),
            actual: out.len() * std::mem::size_of::<u64>(),
        });
    }
    let offset = group_index * stride;
    if offset >= data.len() {
        return Err(OmCodecError::OutOfBoundRead {
            offset,
            count: stride,
            allowed: data.len(),
        });
    }
    entropy::pfor64_decode(&data[offset..], count, &mut out[..count]);
    Ok(count)
}

/// Decodes the whole LUT. `out.len()` is the uncompressed LUT length.
pub fn decompress_lut(
    data: &[u8],
    stride: usize,
    lut_chunk_element_count: usize,
    out: &mut [u64],
) -> Result<(), OmCodecError> {
    let lut_len = out.len();
    let n_lut_chunks = divide_rounded_up(lut_len, lut_chunk_element_count.max(1));
    for group_index in 0..n_lut_chunks {
        let start = group_index * lut_chunk_element_count;
        decompress_lut_group(
            data,
            stride,
            lut_chunk_element_count,
            lut_len,
            group_index,
            &mut out[start..],
        )?;
    }
    Ok(())
}
