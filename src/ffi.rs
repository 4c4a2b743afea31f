// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! C ABI entry points for hosts that capture frames outside Rust.
//!
//! The host owns the buffer. These functions never allocate, free, or keep
//! the pointer past the call. Declarations live in `include/rfbpack.h`.

use std::slice;

use crate::error::PackError;
use crate::pack::{check_len, pack_in_place, ChannelShifts};
use crate::BYTES_PER_PIXEL;

/// Packs `len` bytes of `BGRA` pixels at `data` in place.
///
/// Trailing bytes past the last whole pixel are ignored. A null `data` or a
/// `len` below one pixel returns without touching memory.
///
/// # Safety
///
/// `data` must be valid for reads and writes of `len` bytes, and no other
/// thread may access that range for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn pack_rfb_pixels_rgba32(
    data: *mut u8,
    len: usize,
    shift_r: u8,
    shift_g: u8,
    shift_b: u8,
    shift_a: u8,
) {
    if data.is_null() || len < BYTES_PER_PIXEL {
        return;
    }

    #[cfg(feature = "debug-logging")]
    log::trace!(
        "pack_rfb_pixels_rgba32: {} bytes, shifts r={} g={} b={} a={}",
        len,
        shift_r,
        shift_g,
        shift_b,
        shift_a
    );

    // SAFETY: caller guarantees `data` is valid and exclusively ours for `len` bytes.
    let buf = unsafe { slice::from_raw_parts_mut(data, len) };
    pack_in_place(buf, ChannelShifts::new(shift_r, shift_g, shift_b, shift_a));
}

/// Validating variant of [`pack_rfb_pixels_rgba32`].
///
/// `capacity` is the size of the allocation behind `data`. Returns `0` on
/// success or a negative [`PackError::code`]; the buffer is untouched on
/// failure.
///
/// # Safety
///
/// If `data` is non-null it must be valid for reads and writes of `capacity`
/// bytes, and no other thread may access that range for the duration of the
/// call.
#[no_mangle]
pub unsafe extern "C" fn pack_rfb_pixels_rgba32_checked(
    data: *mut u8,
    len: usize,
    capacity: usize,
    shift_r: u8,
    shift_g: u8,
    shift_b: u8,
    shift_a: u8,
) -> i32 {
    let checked = if data.is_null() {
        Err(PackError::NullBuffer)
    } else {
        check_len(len, capacity)
    };

    if let Err(e) = checked {
        log::warn!("Rejected pixel buffer: {e}");
        return e.code();
    }

    // SAFETY: non-null, and `len <= capacity` bytes are valid per the contract.
    unsafe { pack_rfb_pixels_rgba32(data, len, shift_r, shift_g, shift_b, shift_a) };
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_packs_through_pointer() {
        let mut buf = vec![0x10u8, 0x20, 0x30, 0x40, 0x00, 0x00, 0xFF, 0xFF];
        unsafe { pack_rfb_pixels_rgba32(buf.as_mut_ptr(), buf.len(), 16, 8, 0, 24) };

        assert_eq!(&buf[..4], &0x4030_2010u32.to_ne_bytes());
        assert_eq!(&buf[4..], &0xFFFF_0000u32.to_ne_bytes());
    }

    #[test]
    fn test_null_and_empty_are_noops() {
        unsafe { pack_rfb_pixels_rgba32(ptr::null_mut(), 0, 16, 8, 0, 24) };
        unsafe { pack_rfb_pixels_rgba32(ptr::null_mut(), 64, 16, 8, 0, 24) };

        let mut buf = vec![1u8, 2, 3, 4];
        unsafe { pack_rfb_pixels_rgba32(buf.as_mut_ptr(), 0, 0, 8, 16, 24) };
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn test_len_limits_the_write() {
        let mut buf = vec![0x00u8, 0x00, 0xFF, 0xFF, 0x10, 0x20, 0x30, 0x40, 0x99];
        // one pixel plus three trailing bytes that must be ignored
        unsafe { pack_rfb_pixels_rgba32(buf.as_mut_ptr(), 7, 0, 8, 16, 24) };

        assert_eq!(&buf[..4], &0xFF00_00FFu32.to_ne_bytes());
        assert_eq!(&buf[4..], &[0x10, 0x20, 0x30, 0x40, 0x99]);
    }

    #[test]
    fn test_checked_success() {
        let mut buf = vec![0x00u8, 0x00, 0xFF, 0xFF, 0xEE, 0xEE, 0xEE, 0xEE];
        let status =
            unsafe { pack_rfb_pixels_rgba32_checked(buf.as_mut_ptr(), 4, buf.len(), 16, 8, 0, 24) };

        assert_eq!(status, 0);
        assert_eq!(&buf[..4], &0xFFFF_0000u32.to_ne_bytes());
        assert_eq!(&buf[4..], &[0xEE; 4]);
    }

    #[test]
    fn test_checked_rejections() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut buf = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let p = buf.as_mut_ptr();

        let null = unsafe { pack_rfb_pixels_rgba32_checked(ptr::null_mut(), 4, 4, 16, 8, 0, 24) };
        assert_eq!(null, PackError::NullBuffer.code());

        let too_long = unsafe { pack_rfb_pixels_rgba32_checked(p, 12, 8, 16, 8, 0, 24) };
        assert_eq!(too_long, PackError::LengthExceedsBuffer { len: 12, capacity: 8 }.code());

        let ragged = unsafe { pack_rfb_pixels_rgba32_checked(p, 6, 8, 16, 8, 0, 24) };
        assert_eq!(ragged, PackError::LengthNotMultipleOfFour { len: 6 }.code());

        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
    }
    #[test]
    fn test_checked_agrees_with_try_pack() {
        for len in 0..=9usize {
            let mut by_ffi = vec![0x3Cu8; len];
            let mut by_slice = by_ffi.clone();

            let status = unsafe {
                pack_rfb_pixels_rgba32_checked(by_ffi.as_mut_ptr(), len, len, 16, 8, 0, 24)
            };
            let result = crate::pack::try_pack(&mut by_slice, ChannelShifts::RGBA32);

            assert_eq!(status == 0, result.is_ok(), "len {len}");
            if let Err(e) = result {
                assert_eq!(status, e.code());
            }
            assert_eq!(by_ffi, by_slice);
        }
    }
}
