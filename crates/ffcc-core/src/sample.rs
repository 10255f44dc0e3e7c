//! Sample types accepted by the pipeline.
//!
//! Images arrive from a decoder in whatever depth the file had. The pipeline
//! reads samples as `f32` with no rescaling of its own: a `u8` value of 200
//! becomes `200.0`, not `0.784`. Callers may hand over data on any scale
//! (a decoder that normalizes 16-bit files to `[0, 1]` is fine), since
//! log-chrominance is a ratio of channels and the final min-max stretch
//! removes any common factor.
//!
//! # Supported Types
//!
//! | Type  | Bits | Float |
//! |-------|------|-------|
//! | `u8`  | 8    | no    |
//! | `u16` | 16   | no    |
//! | `f32` | 32   | yes   |
//! | `f64` | 64   | yes   |

/// A single channel value that can be converted to `f32`.
pub trait Sample: Copy + Default + Send + Sync + PartialOrd + 'static {
    /// Number of bits per channel.
    const BITS: u32;

    /// Whether this is a floating-point format.
    const IS_FLOAT: bool;

    /// Converts to `f32` without normalization.
    fn to_f32(self) -> f32;
}

impl Sample for u8 {
    const BITS: u32 = 8;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl Sample for u16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }
}

impl Sample for f32 {
    const BITS: u32 = 32;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }
}

impl Sample for f64 {
    const BITS: u32 = 64;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_samples_are_not_normalized() {
        assert_eq!(200u8.to_f32(), 200.0);
        assert_eq!(4096u16.to_f32(), 4096.0);
    }

    #[test]
    fn test_float_samples_pass_through() {
        assert_eq!(0.25f32.to_f32(), 0.25);
        assert!(f32::NAN.to_f32().is_nan());
        assert_eq!(f64::INFINITY.to_f32(), f32::INFINITY);
    }

    #[test]
    fn test_bits() {
        assert_eq!(<u8 as Sample>::BITS, 8);
        assert_eq!(<u16 as Sample>::BITS, 16);
        assert!(<f32 as Sample>::IS_FLOAT);
        assert!(!<u8 as Sample>::IS_FLOAT);
    }
}
