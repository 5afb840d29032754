//! In-place 2D prediction filters applied to packed chunk buffers before
//! entropy coding. The buffer is viewed as a row-major `(length0, length1)`
//! grid; each row after the first is predicted from the previous row.

use crate::core::bytes::as_typed_slice_mut;

/// Subtracts the previous row from each row of a 16-bit chunk buffer.
#[inline(always)]
pub fn delta2d_encode(length0: usize, length1: usize, chunk_buffer: &mut [i16]) {
    if length0 <= 1 {
        return;
    }
    for d0 in (1..length0).rev() {
        for d1 in 0..length1 {
            let index = d0 * length1 + d1;
            let prev_index = (d0 - 1) * length1 + d1;
            chunk_buffer[index] = chunk_buffer[index].wrapping_sub(chunk_buffer[prev_index]);
        }
    }
}

/// Inverse of [`delta2d_encode`].
#[inline(always)]
pub fn delta2d_decode(length0: usize, length1: usize, chunk_buffer: &mut [i16]) {
    if length0 <= 1 {
        return;
    }
    for d0 in 1..length0 {
        for d1 in 0..length1 {
            let index = d0 * length1 + d1;
            let prev_index = (d0 - 1) * length1 + d1;
            chunk_buffer[index] = chunk_buffer[index].wrapping_add(chunk_buffer[prev_index]);
        }
    }
}

/// XORs each row with the previous row on the IEEE-754 bit patterns.
#[inline(always)]
pub fn delta2d_encode_xor(length0: usize, length1: usize, chunk_buffer: &mut [f32]) {
    if length0 <= 1 {
        return;
    }
    let chunk_buffer_int = as_typed_slice_mut::<i32, f32>(chunk_buffer);
    for d0 in (1..length0).rev() {
        for d1 in 0..length1 {
            let index = d0 * length1 + d1;
            let prev_index = (d0 - 1) * length1 + d1;
            chunk_buffer_int[index] ^= chunk_buffer_int[prev_index];
        }
    }
}

/// Inverse of [`delta2d_encode_xor`].
#[inline(always)]
pub fn delta2d_decode_xor(length0: usize, length1: usize, chunk_buffer: &mut [f32]) {
    if length0 <= 1 {
        return;
    }
    let chunk_buffer_int = as_typed_slice_mut::<i32, f32>(chunk_buffer);
    for d0 in 1..length0 {
        for d1 in 0..length1 {
            let index = d0 * length1 + d1;
            let prev_index = (d0 - 1) * length1 + d1;
            chunk_buffer_int[index] ^= chunk_buffer_int[prev_index];
        }
    }
}

/// 64-bit variant of [`delta2d_encode_xor`].
#[inline(always)]
pub fn delta2d_encode_xor_double(length0: usize, length1: usize, chunk_buffer: &mut [f64]) {
    if length0 <= 1 {
        return;
    }
    let chunk_buffer_int = as_typed_slice_mut::<i64, f64>(chunk_buffer);
    for d0 in (1..length0).rev() {
        for d1 in 0..length1 {
            let index = d0 * length1 + d1;
            let prev_index = (d0 - 1) * length1 + d1;
            chunk_buffer_int[index] ^= chunk_buffer_int[prev_index];
        }
    }
}

/// Inverse of [`delta2d_encode_xor_double`].
#[inline(always)]
pub fn delta2d_decode_xor_double(length0: usize, length1: usize, chunk_buffer: &mut [f64]) {
    if length0 <= 1 {
        return;
    }
    let chunk_buffer_int = as_typed_slice_mut::<i64, f64>(chunk_buffer);
    for d0 in 1..length0 {
        for d1 in 0..length1 {
            let index = d0 * length1 + d1;
            let prev_index = (d0 - 1) * length1 + d1;
            chunk_buffer_int[index] ^= chunk_buffer_int[prev_index];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta2d_encode() {
        let mut buffer: Vec<i16> = vec![1, 2, 3, 4, 5, 7, 9, 11, 13, 15];
        delta2d_encode(2, 5, &mut buffer);
        assert_eq!(buffer, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_delta2d_decode() {
        let mut buffer: Vec<i16> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        delta2d_decode(2, 5, &mut buffer);
        assert_eq!(buffer, vec![1, 2, 3, 4, 5, 7, 9, 11, 13, 15]);
    }

    #[test]
    fn test_delta2d_roundtrip() {
        let original: Vec<i16> = vec![-30, 0, 3, 9, 2, 8, 7, 1, -5, 4, 6, 11];
        let mut buffer = original.clone();
        delta2d_encode(4, 3, &mut buffer);
        delta2d_decode(4, 3, &mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_delta2d_single_row_is_identity() {
        let original: Vec<i16> = vec![5, 6, 7];
        let mut buffer = original.clone();
        delta2d_encode(1, 3, &mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_delta2d_xor_roundtrip() {
        let original: Vec<f32> = vec![1.0, 2.5, -3.0, 4.0, 5.5, 6.0, 7.0, -8.25];
        let mut buffer = original.clone();
        delta2d_encode_xor(2, 4, &mut buffer);
        delta2d_decode_xor(2, 4, &mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_delta2d_xor_identical_rows_collapse_to_zero() {
        let mut buffer: Vec<f32> = vec![1.5, -2.0, 1.5, -2.0];
        delta2d_encode_xor(2, 2, &mut buffer);
        assert_eq!(&buffer[2..], &[0.0, 0.0]);
    }

    #[test]
    fn test_delta2d_xor_double_roundtrip() {
        let original: Vec<f64> = vec![1.0, f64::NAN, -3.0, 1e300, 5.5, -0.0];
        let mut buffer = original.clone();
        delta2d_encode_xor_double(3, 2, &mut buffer);
        delta2d_decode_xor_double(3, 2, &mut buffer);
        for (a, b) in buffer.iter().zip(&original) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
