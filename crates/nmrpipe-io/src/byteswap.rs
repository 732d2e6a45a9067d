//! Byte swapping and float (de)serialization in a chosen byte order.

use nmrpipe_core::enums::Endian;

/// Swap bytes of 4-byte words in place.
pub fn bswap4(buf: &mut [u8]) {
    debug_assert!(buf.len() % 4 == 0, "bswap4: buffer length must be multiple of 4");
    for chunk in buf.chunks_exact_mut(4) {
        chunk.swap(0, 3);
        chunk.swap(1, 2);
    }
}

/// Decode 4-byte floats stored in `endian` order.
pub fn floats_from_bytes(mut buf: Vec<u8>, endian: Endian) -> Vec<f32> {
    if !endian.is_native() {
        bswap4(&mut buf);
    }
    buf.chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Encode floats as 4-byte words in `endian` order.
pub fn floats_to_bytes(data: &[f32], endian: Endian) -> Vec<u8> {
    let mut buf: Vec<u8> = data.iter().flat_map(|v| v.to_ne_bytes()).collect();
    if !endian.is_native() {
        bswap4(&mut buf);
    }
    buf
}
