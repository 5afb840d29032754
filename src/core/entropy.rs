//! Sealed entropy primitives. The wire format is fixed to the TurboPFor
//! integer coders and the fpx XOR float coders vendored by
//! `om-file-format-sys`; this module only wraps the raw calls.
//!
//! Buffer contracts: the encoders may write up to 32 elements plus one byte
//! per 256 values past the compressed length, so encode outputs must be
//! sized with [`p4nenc256_bound`]. The decoders may read ahead of the
//! compressed data and write ahead of the decoded length, covered by
//! [`p4ndec256_bound`] on the output side and trailing slack on the input
//! side.
//!
//! [`p4nenc256_bound`]: crate::core::compression::p4nenc256_bound
//! [`p4ndec256_bound`]: crate::core::compression::p4ndec256_bound

use om_file_format_sys::{
    fpxdec32, fpxdec64, fpxenc32, fpxenc64, p4nddec64, p4ndenc64, p4nzdec128v16, p4nzenc128v16,
};

/// 16-bit zig-zag delta PFOR. Returns the number of compressed bytes.
pub fn pfor16_encode(src: &mut [u16], out: &mut [u8]) -> usize {
    unsafe { p4nzenc128v16(src.as_mut_ptr(), src.len(), out.as_mut_ptr()) }
}

/// Decodes `count` elements, returns the number of compressed bytes consumed.
pub fn pfor16_decode(src: &[u8], count: usize, out: &mut [u16]) -> usize {
    debug_assert!(out.len() >= count);
    // The C API takes mutable pointers but does not write through the input.
    unsafe { p4nzdec128v16(src.as_ptr() as *mut u8, count, out.as_mut_ptr()) }
}

/// 64-bit delta PFOR used for LUT offsets.
pub fn pfor64_encode(src: &[u64], out: &mut [u8]) -> usize {
    unsafe { p4ndenc64(src.as_ptr() as *mut u64, src.len(), out.as_mut_ptr()) }
}

pub fn pfor64_decode(src: &[u8], count: usize, out: &mut [u64]) -> usize {
    debug_assert!(out.len() >= count);
    unsafe { p4nddec64(src.as_ptr() as *mut u8, count, out.as_mut_ptr()) }
}

/// XOR-predicted float coder, 32-bit lanes.
pub fn fpx32_encode(src: &mut [u32], out: &mut [u8]) -> usize {
    unsafe { fpxenc32(src.as_mut_ptr(), src.len(), out.as_mut_ptr(), 0) }
}

pub fn fpx32_decode(src: &[u8], count: usize, out: &mut [u32]) -> usize {
    debug_assert!(out.len() >= count);
    unsafe { fpxdec32(src.as_ptr() as *mut u8, count, out.as_mut_ptr(), 0) }
}

/// XOR-predicted float coder, 64-bit lanes.
pub fn fpx64_encode(src: &mut [u64], out: &mut [u8]) -> usize {
    unsafe { fpxenc64(src.as_mut_ptr(), src.len(), out.as_mut_ptr(), 0) }
}

pub fn fpx64_decode(src: &[u8], count: usize, out: &mut [u64]) -> usize {
    debug_assert!(out.len() >= count);
    unsafe { fpxdec64(src.as_ptr() as *mut u8, count, out.as_mut_ptr(), 0) }
}
