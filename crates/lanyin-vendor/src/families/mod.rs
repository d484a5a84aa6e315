//! 内置厂商编解码器族.
//!
//! 身份键常量始终可用 (编解码器索引需要它们), 各族实现按 cargo
//! feature 编译. [`BUILTIN`] 是编译期确定的注册表条目.

use lanyin_core::VendorCodecKey;

use crate::codec::VendorCodec;

#[cfg(any(
    feature = "aptx",
    feature = "aptx-hd",
    feature = "ldac",
    feature = "opus",
    feature = "lhdc"
))]
mod field;
#[cfg(any(
    feature = "aptx",
    feature = "aptx-hd",
    feature = "ldac",
    feature = "opus",
    feature = "lhdc"
))]
pub(crate) use field::{
    describe_bits, parse_any, read_timestamp, retain_bits, select_bits, write_frame_count_header,
};

#[cfg(any(feature = "aptx", feature = "aptx-hd"))]
pub mod aptx;
#[cfg(feature = "ldac")]
pub mod ldac;
#[cfg(feature = "lhdc")]
pub mod lhdc;
#[cfg(feature = "opus")]
pub mod opus;

/// aptX (Qualcomm)
pub const APTX_KEY: VendorCodecKey = VendorCodecKey::new(0x0000_004F, 0x0001);
/// aptX-HD (Qualcomm)
pub const APTX_HD_KEY: VendorCodecKey = VendorCodecKey::new(0x0000_00D7, 0x0024);
/// LDAC (Sony)
pub const LDAC_KEY: VendorCodecKey = VendorCodecKey::new(0x0000_012D, 0x00AA);
/// Opus (Google)
pub const OPUS_KEY: VendorCodecKey = VendorCodecKey::new(0x0000_00E0, 0x0001);
/// Savitech 厂商标识, LHDC 各版本共用
pub const LHDC_VENDOR_ID: u32 = 0x0000_053A;
/// LHDC V2
pub const LHDCV2_KEY: VendorCodecKey = VendorCodecKey::new(LHDC_VENDOR_ID, 0x4C32);
/// LHDC V3
pub const LHDCV3_KEY: VendorCodecKey = VendorCodecKey::new(LHDC_VENDOR_ID, 0x4C33);
/// LHDC V5
pub const LHDCV5_KEY: VendorCodecKey = VendorCodecKey::new(LHDC_VENDOR_ID, 0x4C35);

/// 内置编解码器族注册表条目
pub const BUILTIN: &[&dyn VendorCodec] = &[
    #[cfg(feature = "aptx")]
    &aptx::APTX,
    #[cfg(feature = "aptx-hd")]
    &aptx::APTX_HD,
    #[cfg(feature = "ldac")]
    &ldac::LDAC,
    #[cfg(feature = "opus")]
    &opus::OPUS,
    #[cfg(feature = "lhdc")]
    &lhdc::LHDC_V2,
    #[cfg(feature = "lhdc")]
    &lhdc::LHDC_V3,
    #[cfg(feature = "lhdc")]
    &lhdc::LHDC_V5,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_身份键互不重复() {
        let keys = [
            APTX_KEY,
            APTX_HD_KEY,
            LDAC_KEY,
            OPUS_KEY,
            LHDCV2_KEY,
            LHDCV3_KEY,
            LHDCV5_KEY,
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
        // aptX 与 Opus 的编解码器标识相同, 但厂商标识不同
        assert_eq!(APTX_KEY.codec_id, OPUS_KEY.codec_id);
    }
}
