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


//! # rfbpack
//!
//! In-place conversion of captured `BGRA` frames into the 32-bit pixel words a
//! VNC (RFB) client asked for.
//!
//! Screen capture produces 4-byte pixels in blue, green, red, alpha order. A
//! client's negotiated pixel format places each channel at some bit shift in a
//! 32-bit word. This crate rewrites the capture buffer into those words without
//! allocating, in a loop simple enough for the compiler to vectorize.
//!
//! ## Features
//!
//! - **Zero allocation**: the caller's buffer is rewritten in place
//! - **Branch-free hot loop**: per-channel shifts are resolved once per call
//! - **Pixel format mapping**: derive shifts straight from an RFB `PIXEL_FORMAT`
//! - **C ABI**: `pack_rfb_pixels_rgba32` for hosts written in other languages
//! - **Optional rayon**: pack large frames as disjoint stripes (`parallel` feature)
//!
//! ## Quick Start
//!
//! ```
//! use rfbpack::{ChannelShifts, Packer, PixelFormat};
//!
//! // One BGRA pixel: B=0x10, G=0x20, R=0x30, A=0x40
//! let mut frame = vec![0x10u8, 0x20, 0x30, 0x40];
//!
//! rfbpack::pack_in_place(&mut frame, ChannelShifts::RGBA32);
//! assert_eq!(u32::from_ne_bytes([frame[0], frame[1], frame[2], frame[3]]), 0x4030_2010);
//!
//! // Or configure once from the client's SetPixelFormat
//! let mut client_format = PixelFormat::rgba32();
//! client_format.big_endian_flag = u8::from(cfg!(target_endian = "big"));
//! let packer = Packer::from_pixel_format(&client_format)?;
//! packer.try_pack(&mut frame)?;
//! # Ok::<(), rfbpack::PackError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Host (capture + RFB session)     │
//! │                                         │
//! │  • Owns the BGRA frame buffer           │
//! │  • Negotiates the client pixel format   │
//! └──────────────────┬──────────────────────┘
//!                    │
//!          ┌─────────┴─────────┐
//!          ▼                   ▼
//!   ┌─────────────┐     ┌─────────────┐
//!   │  Rust API   │     │    C ABI    │
//!   │   Packer    │     │   (ffi)     │
//!   └──────┬──────┘     └──────┬──────┘
//!          └─────────┬─────────┘
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        pack_in_place (hot loop)         │
//! │                                         │
//! │  • SourceLayout::BGRA byte offsets      │
//! │  • ChannelShifts → native-order word    │
//! └─────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ffi;
pub mod layout;
pub mod pack;
pub mod protocol;

// Re-exports
pub use error::{PackError, Result};
pub use layout::SourceLayout;
pub use pack::{pack_in_place, pack_pixel, pack_prefix, pack_with_layout, try_pack, ChannelShifts, Packer};
pub use protocol::PixelFormat;

#[cfg(feature = "parallel")]
pub use pack::pack_striped;

/// Bytes per packed and unpacked pixel.
pub const BYTES_PER_PIXEL: usize = 4;
