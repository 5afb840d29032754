//! Chunk geometry and run enumeration.
//!
//! A chunk is a hyper-rectangle of the logical array; the caller's buffer
//! holds another hyper-rectangle (possibly the whole array) with the chunk's
//! data somewhere inside it. [`walk_runs`] enumerates every maximal run of
//! elements that is contiguous in both, so a chunk can be packed or unpacked
//! with a minimal number of copies.

use crate::errors::OmCodecError;
use crate::utils::divide_rounded_up_u64;
use std::cmp::min;

/// Shape of one chunk after edge truncation, together with the row-major 2D
/// view the filters operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkShape {
    /// Number of elements in the packed chunk.
    pub len: usize,
    /// Rows of the 2D filter view.
    pub rows: usize,
    /// Columns of the 2D filter view, the extent along the innermost axis.
    pub cols: usize,
}

/// Decodes `chunk_index` as a mixed-radix number over the per-axis chunk
/// counts (axis 0 most significant) and returns the extent of the chunk it
/// addresses. Chunks at the upper edge of an axis may be truncated.
pub fn chunk_shape(dimensions: &[u64], chunks: &[u64], chunk_index: u64) -> ChunkShape {
    let mut rolling_multiply = 1u64;
    let mut length_in_chunk = 1u64;
    let mut length_last = 1u64;
    for i in (0..dimensions.len()).rev() {
        let n_chunks_in_this_dimension = divide_rounded_up_u64(dimensions[i], chunks[i]);
        let c0 = (chunk_index / rolling_multiply) % n_chunks_in_this_dimension;
        let length0 = min((c0 + 1) * chunks[i], dimensions[i]) - c0 * chunks[i];
        if i == dimensions.len() - 1 {
            length_last = length0;
        }
        length_in_chunk *= length0;
        rolling_multiply *= n_chunks_in_this_dimension;
    }
    ChunkShape {
        len: length_in_chunk as usize,
        rows: (length_in_chunk / length_last) as usize,
        cols: length_last as usize,
    }
}

/// Enumerates the maximal contiguous runs shared by chunk `chunk_index` and
/// the hyper-rectangle `(array_offset, array_count)` of a caller buffer with
/// shape `array_dimensions`. For every run, `copy(array_element,
/// chunk_element, length)` is invoked in row-major order of the chunk's
/// local coordinates; gathering reads at `array_element` and writes at
/// `chunk_element`, scattering goes the other way around.
///
/// `chunk_index_offset` is the chunk index of the buffer's first chunk,
/// expressed in the mixed radices of the full chunk grid; for a buffer
/// holding the whole array it equals zero and `chunk_index` counts through
/// every chunk.
///
/// Every run is bound-checked against both buffers before `copy` runs, so a
/// malformed request fails with `OutOfBoundRead` instead of touching data.
pub(crate) fn walk_runs<F>(
    dimensions: &[u64],
    chunks: &[u64],
    array_dimensions: &[u64],
    array_offset: &[u64],
    array_count: &[u64],
    chunk_index: u64,
    chunk_index_offset: u64,
    mut copy: F,
) -> Result<ChunkShape, OmCodecError>
where
    F: FnMut(usize, usize, usize),
{
    let dimension_count = dimensions.len();
    let array_total_count: u64 = array_dimensions.iter().product();

    let mut rolling_multiply = 1u64;
    let mut rolling_multiply_chunk_length = 1u64;
    let mut rolling_multiply_target_cube = 1u64;
    let mut read_coordinate = 0u64;
    let mut write_coordinate = 0u64;
    let mut linear_read_count = 1u64;
    let mut linear_read = true;
    let mut length_last = 1u64;

    // Decode the chunk coordinate and the read start position, and detect
    // how many inner axes are fully covered and contiguous.
    for i in (0..dimension_count).rev() {
        let n_chunks_in_this_dimension = divide_rounded_up_u64(dimensions[i], chunks[i]);
        let c0 = (chunk_index / rolling_multiply) % n_chunks_in_this_dimension;
        let c0_offset = (chunk_index_offset / rolling_multiply) % n_chunks_in_this_dimension;
        let length0 = min((c0 + 1) * chunks[i], dimensions[i]) - c0 * chunks[i];

        if i == dimension_count - 1 {
            length_last = length0;
        }

        read_coordinate += rolling_multiply_target_cube * (c0_offset * chunks[i] + array_offset[i]);

        if length0 > array_count[i] || length0 > array_dimensions[i] {
            return Err(OmCodecError::OutOfBoundRead {
                offset: array_offset[i] as usize,
                count: length0 as usize,
                allowed: array_count[i] as usize,
            });
        }

        if i == dimension_count - 1
            && !(array_count[i] == length0 && array_dimensions[i] == length0)
        {
            linear_read_count = length0;
            linear_read = false;
        }
        if linear_read && array_count[i] == length0 && array_dimensions[i] == length0 {
            linear_read_count *= length0;
        } else {
            linear_read = false;
        }

        rolling_multiply *= n_chunks_in_this_dimension;
        rolling_multiply_target_cube *= array_dimensions[i];
        rolling_multiply_chunk_length *= length0;
    }

    let length_in_chunk = rolling_multiply_chunk_length;

    loop {
        let read_end = read_coordinate.checked_add(linear_read_count);
        if read_end.map_or(true, |end| end > array_total_count) {
            return Err(OmCodecError::OutOfBoundRead {
                offset: read_coordinate as usize,
                count: linear_read_count as usize,
                allowed: array_total_count as usize,
            });
        }
        if write_coordinate + linear_read_count > length_in_chunk {
            return Err(OmCodecError::OutOfBoundRead {
                offset: write_coordinate as usize,
                count: linear_read_count as usize,
                allowed: length_in_chunk as usize,
            });
        }
        copy(
            read_coordinate as usize,
            write_coordinate as usize,
            linear_read_count as usize,
        );

        read_coordinate = (read_coordinate + linear_read_count).wrapping_sub(1);
        write_coordinate += linear_read_count;

        rolling_multiply_target_cube = 1;
        linear_read = true;
        linear_read_count = 1;

        // Advance to the next run: step the innermost axis one chunk-aligned
        // position and carry outwards on wrap. Coordinates one past the edge
        // of the hyper-rectangle wrap modulo 2^64; the carry conditions
        // account for that, and the bound checks above keep every run inside
        // both buffers.
        for i in (0..dimension_count).rev() {
            let q_pos = ((read_coordinate / rolling_multiply_target_cube) % array_dimensions[i])
                .wrapping_sub(array_offset[i])
                / chunks[i];
            let length0 = min(
                q_pos.wrapping_add(1).wrapping_mul(chunks[i]),
                array_count[i],
            )
            .wrapping_sub(q_pos.wrapping_mul(chunks[i]));

            read_coordinate = read_coordinate.wrapping_add(rolling_multiply_target_cube);

            if i == dimension_count - 1
                && !(array_count[i] == length0 && array_dimensions[i] == length0)
            {
                linear_read_count = length0;
                linear_read = false;
            }
            if linear_read && array_count[i] == length0 && array_dimensions[i] == length0 {
                linear_read_count = linear_read_count.wrapping_mul(length0);
            } else {
                linear_read = false;
            }

            let q0 = ((read_coordinate / rolling_multiply_target_cube) % array_dimensions[i])
                .wrapping_sub(array_offset[i])
                % chunks[i];
            if q0 != 0 && q0 != length0 {
                break;
            }
            read_coordinate = read_coordinate.wrapping_sub(length0.wrapping_mul(rolling_multiply_target_cube));
            rolling_multiply_target_cube *= array_dimensions[i];

            if i == 0 {
                return Ok(ChunkShape {
                    len: length_in_chunk as usize,
                    rows: (length_in_chunk / length_last) as usize,
                    cols: length_last as usize,
                });
            }
        }
    }
}
