//! LHDC 编解码器族 (V2, V3, V5).
//!
//! 三个版本共用 Savitech 厂商标识, 以编解码器标识区分, 在注册表中是
//! 三个独立条目, 共用本模块的实现. 字段布局由 [`LhdcLayout`] 描述:
//!
//! | 版本 | LOSC | 采样率 | 位深 | 最大码率 | 版本号 | 特性 |
//! |------|------|--------|------|----------|--------|------|
//! | V2/V3 | 11 | 9 (低 4 位) | 9 (第 4~5 位) | 10 | - | 11 |
//! | V5 | 13 | 9 | 10 | 11 | 12 | 13 |
//!
//! 双声道固定, 负载头部 2 字节, 第一个字节为帧数.

use lanyin_core::codec_info::{VENDOR_HEADER_LEN, check_vendor_header, write_vendor_header};
use lanyin_core::{
    A2dpError, A2dpResult, MediaPacket, MediaType, SinkChannelType, StreamEndpointConfig,
    VendorCodecKey,
};

use super::{
    LHDCV2_KEY, LHDCV3_KEY, LHDCV5_KEY, describe_bits, parse_any, read_timestamp, retain_bits,
    select_bits, write_frame_count_header,
};
use crate::codec::VendorCodec;
use crate::codec_index::Direction;
use crate::interface::{DecoderInterface, EncoderInterface};
use crate::role::{Role, RoleSet};

const HEADER_LEN: usize = 2;
const MAX_FRAMES_PER_PACKET: u16 = 63;
const CHANNELS: u32 = 2;

/// 最大码率代码 (低 2 位) 对应的码率
const BIT_RATES: [u32; 4] = [400_000, 500_000, 900_000, 1_000_000];
const BIT_RATE_CODE_MASK: u8 = 0x03;

const FEATURE_LL: u8 = 0x40;
const FEATURE_JAS: u8 = 0x80;
const FEATURE_MASK: u8 = FEATURE_LL | FEATURE_JAS;
const FEATURE_NAMES: [(u8, &str); 2] = [(FEATURE_LL, "LL"), (FEATURE_JAS, "JAS")];

/// 位域取值与其数值
type BitTable = &'static [(u8, u32, &'static str)];

const V3_SAMPLE_RATES: BitTable = &[
    (0x08, 44_100, "44100"),
    (0x04, 48_000, "48000"),
    (0x02, 88_200, "88200"),
    (0x01, 96_000, "96000"),
];
const V3_BITS: BitTable = &[(0x20, 16, "16"), (0x10, 24, "24")];

const V5_SAMPLE_RATES: BitTable = &[
    (0x10, 44_100, "44100"),
    (0x08, 48_000, "48000"),
    (0x04, 96_000, "96000"),
    (0x02, 192_000, "192000"),
];
const V5_BITS: BitTable = &[(0x04, 16, "16"), (0x02, 24, "24"), (0x01, 32, "32")];

const fn table_mask(table: BitTable) -> u8 {
    let mut mask = 0;
    let mut i = 0;
    while i < table.len() {
        mask |= table[i].0;
        i += 1;
    }
    mask
}

fn table_value(table: BitTable, bits: u8) -> Option<u32> {
    table.iter().find(|(bit, _, _)| *bit == bits).map(|(_, v, _)| *v)
}

fn table_names(table: BitTable) -> Vec<(u8, &'static str)> {
    table.iter().map(|(bit, _, name)| (*bit, *name)).collect()
}

/// 版本相关的字段布局
#[derive(Debug)]
pub struct LhdcLayout {
    losc: u8,
    sample_rate_idx: usize,
    sample_rates: BitTable,
    bits_idx: usize,
    bits: BitTable,
    bit_rate_idx: usize,
    max_bit_rate_code: u8,
    version_idx: Option<usize>,
    features_idx: usize,
}

const LAYOUT_V3: LhdcLayout = LhdcLayout {
    losc: 11,
    sample_rate_idx: VENDOR_HEADER_LEN,
    sample_rates: V3_SAMPLE_RATES,
    bits_idx: VENDOR_HEADER_LEN,
    bits: V3_BITS,
    bit_rate_idx: VENDOR_HEADER_LEN + 1,
    max_bit_rate_code: 2,
    version_idx: None,
    features_idx: VENDOR_HEADER_LEN + 2,
};

const LAYOUT_V5: LhdcLayout = LhdcLayout {
    losc: 13,
    sample_rate_idx: VENDOR_HEADER_LEN,
    sample_rates: V5_SAMPLE_RATES,
    bits_idx: VENDOR_HEADER_LEN + 1,
    bits: V5_BITS,
    bit_rate_idx: VENDOR_HEADER_LEN + 2,
    max_bit_rate_code: 3,
    version_idx: Some(VENDOR_HEADER_LEN + 3),
    features_idx: VENDOR_HEADER_LEN + 4,
};

/// 一组默认能力
#[derive(Debug, Clone, Copy)]
struct LhdcCaps {
    sample_rate: u8,
    bits: u8,
    bit_rate_code: u8,
    version: u8,
    features: u8,
}

/// LHDC 编解码器族的一个版本
#[derive(Debug)]
pub struct Lhdc {
    key: VendorCodecKey,
    name: &'static str,
    roles: RoleSet,
    layout: LhdcLayout,
    source_caps: LhdcCaps,
    sink_caps: Option<LhdcCaps>,
    source_str: &'static str,
    sink_str: Option<&'static str>,
    encoder: &'static EncoderInterface,
    decoder: Option<&'static DecoderInterface>,
}

const V2_ENCODER: EncoderInterface = EncoderInterface {
    name: "LHDC V2",
    key: LHDCV2_KEY,
};
const V3_ENCODER: EncoderInterface = EncoderInterface {
    name: "LHDC V3",
    key: LHDCV3_KEY,
};
const V3_DECODER: DecoderInterface = DecoderInterface {
    name: "LHDC V3",
    key: LHDCV3_KEY,
};
const V5_ENCODER: EncoderInterface = EncoderInterface {
    name: "LHDC V5",
    key: LHDCV5_KEY,
};
const V5_DECODER: DecoderInterface = DecoderInterface {
    name: "LHDC V5",
    key: LHDCV5_KEY,
};

/// LHDC V2, 仅源端
pub const LHDC_V2: Lhdc = Lhdc {
    key: LHDCV2_KEY,
    name: "LHDC V2",
    roles: RoleSet::SOURCE_ONLY,
    layout: LAYOUT_V3,
    source_caps: LhdcCaps {
        sample_rate: 0x0C,
        bits: 0x30,
        bit_rate_code: 2,
        version: 0,
        features: 0,
    },
    sink_caps: None,
    source_str: "LHDC V2",
    sink_str: None,
    encoder: &V2_ENCODER,
    decoder: None,
};

/// LHDC V3
pub const LHDC_V3: Lhdc = Lhdc {
    key: LHDCV3_KEY,
    name: "LHDC V3",
    roles: RoleSet::all(),
    layout: LAYOUT_V3,
    source_caps: LhdcCaps {
        sample_rate: 0x0D,
        bits: 0x30,
        bit_rate_code: 2,
        version: 0,
        features: FEATURE_LL,
    },
    sink_caps: Some(LhdcCaps {
        sample_rate: 0x0D,
        bits: 0x30,
        bit_rate_code: 2,
        version: 0,
        features: FEATURE_MASK,
    }),
    source_str: "LHDC V3",
    sink_str: Some("LHDC V3 SINK"),
    encoder: &V3_ENCODER,
    decoder: Some(&V3_DECODER),
};

/// LHDC V5
pub const LHDC_V5: Lhdc = Lhdc {
    key: LHDCV5_KEY,
    name: "LHDC V5",
    roles: RoleSet::all(),
    layout: LAYOUT_V5,
    source_caps: LhdcCaps {
        sample_rate: 0x1E,
        bits: 0x07,
        bit_rate_code: 3,
        version: 0x01,
        features: FEATURE_LL,
    },
    sink_caps: Some(LhdcCaps {
        sample_rate: 0x1C,
        bits: 0x06,
        bit_rate_code: 3,
        version: 0x01,
        features: FEATURE_MASK,
    }),
    source_str: "LHDC V5",
    sink_str: Some("LHDC V5 SINK"),
    encoder: &V5_ENCODER,
    decoder: Some(&V5_DECODER),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LhdcParams {
    sample_rate: u8,
    bits: u8,
    bit_rate_code: u8,
    version: u8,
    features: u8,
}

impl Lhdc {
    fn parse(&self, codec_info: &[u8], is_capability: bool) -> A2dpResult<LhdcParams> {
        let layout = &self.layout;
        check_vendor_header(codec_info, layout.losc, self.key)?;

        let rate = codec_info[layout.sample_rate_idx];
        let sample_rate = select_bits(rate, table_mask(layout.sample_rates), is_capability)
            .ok_or(A2dpError::BadSampleRate(rate))?;
        let bits_octet = codec_info[layout.bits_idx];
        let bits = select_bits(bits_octet, table_mask(layout.bits), is_capability)
            .ok_or(A2dpError::BadBitsPerSample(bits_octet))?;
        let bit_rate_code = codec_info[layout.bit_rate_idx] & BIT_RATE_CODE_MASK;
        if bit_rate_code > layout.max_bit_rate_code {
            return Err(A2dpError::BadBitRate(codec_info[layout.bit_rate_idx]));
        }

        Ok(LhdcParams {
            sample_rate,
            bits,
            bit_rate_code,
            version: layout.version_idx.map_or(0, |idx| codec_info[idx]),
            features: codec_info[layout.features_idx] & FEATURE_MASK,
        })
    }

    fn parse_config(&self, codec_info: &[u8]) -> Option<LhdcParams> {
        self.parse(codec_info, false)
            .inspect_err(|err| log::debug!("{} 配置解析失败: {err}", self.name))
            .ok()
    }

    fn matches_sink_caps(&self, params: &LhdcParams) -> bool {
        self.sink_caps.is_some_and(|caps| {
            params.sample_rate & caps.sample_rate != 0
                && params.bits & caps.bits != 0
                && params.bit_rate_code <= caps.bit_rate_code
        })
    }

    /// 各字节中已定义的位
    fn known_bits(&self) -> Vec<(usize, u8)> {
        let layout = &self.layout;
        let mut known = vec![
            (layout.sample_rate_idx, table_mask(layout.sample_rates)),
            (layout.bit_rate_idx, BIT_RATE_CODE_MASK),
            (layout.features_idx, FEATURE_MASK),
        ];
        if layout.bits_idx == layout.sample_rate_idx {
            known[0].1 |= table_mask(layout.bits);
        } else {
            known.push((layout.bits_idx, table_mask(layout.bits)));
        }
        known
    }
}

impl VendorCodec for Lhdc {
    fn key(&self) -> VendorCodecKey {
        self.key
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn roles(&self) -> RoleSet {
        self.roles
    }

    fn is_valid(&self, _role: Role, codec_info: &[u8]) -> bool {
        parse_any(|cap| self.parse(codec_info, cap)).is_ok()
    }

    fn is_supported(&self, role: Role, codec_info: &[u8]) -> bool {
        let parsed = match role {
            Role::LocalSink => self.parse(codec_info, false),
            Role::PeerSource => self.parse(codec_info, true),
            Role::LocalSource | Role::PeerSink => return false,
        };
        parsed.is_ok_and(|params| self.matches_sink_caps(&params))
    }

    fn codec_type_equals(&self, codec_info_a: &[u8], codec_info_b: &[u8]) -> bool {
        self.parse(codec_info_a, true).is_ok() && self.parse(codec_info_b, true).is_ok()
    }

    fn codec_equals(&self, codec_info_a: &[u8], codec_info_b: &[u8]) -> bool {
        match (
            parse_any(|cap| self.parse(codec_info_a, cap)),
            parse_any(|cap| self.parse(codec_info_b, cap)),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    fn bit_rate(&self, codec_info: &[u8]) -> Option<u32> {
        let params = self.parse_config(codec_info)?;
        BIT_RATES.get(usize::from(params.bit_rate_code)).copied()
    }

    fn track_sample_rate(&self, codec_info: &[u8]) -> Option<u32> {
        table_value(self.layout.sample_rates, self.parse_config(codec_info)?.sample_rate)
    }

    fn track_bits_per_sample(&self, codec_info: &[u8]) -> Option<u32> {
        table_value(self.layout.bits, self.parse_config(codec_info)?.bits)
    }

    fn track_channel_count(&self, codec_info: &[u8]) -> Option<u32> {
        self.parse_config(codec_info).map(|_| CHANNELS)
    }

    fn sink_track_channel_type(&self, codec_info: &[u8]) -> Option<SinkChannelType> {
        self.parse_config(codec_info).map(|_| SinkChannelType::Stereo)
    }

    fn uses_rtp_header(&self, _content_protection_enabled: bool, _codec_info: &[u8]) -> bool {
        true
    }

    fn build_codec_header(
        &self,
        _codec_info: &[u8],
        packet: &mut MediaPacket,
        frames_per_packet: u16,
    ) -> bool {
        write_frame_count_header(packet, HEADER_LEN, frames_per_packet, MAX_FRAMES_PER_PACKET)
    }

    fn packet_timestamp(&self, _codec_info: &[u8], data: &[u8]) -> Option<u32> {
        read_timestamp(data)
    }

    fn encoder_interface(&self, codec_info: &[u8]) -> Option<&'static EncoderInterface> {
        self.is_valid(Role::LocalSource, codec_info).then_some(self.encoder)
    }

    fn decoder_interface(&self, codec_info: &[u8]) -> Option<&'static DecoderInterface> {
        self.decoder.filter(|_| self.is_valid(Role::LocalSink, codec_info))
    }

    fn adjust_codec(&self, codec_info: &mut [u8]) -> bool {
        if check_vendor_header(codec_info, self.layout.losc, self.key).is_err() {
            return false;
        }
        let mut changed = false;
        for (idx, keep) in self.known_bits() {
            changed |= retain_bits(&mut codec_info[idx], keep);
        }
        let code = &mut codec_info[self.layout.bit_rate_idx];
        if *code > self.layout.max_bit_rate_code {
            *code = self.layout.max_bit_rate_code;
            changed = true;
        }
        changed
    }

    fn codec_info_string(&self, codec_info: &[u8]) -> String {
        let params = match parse_any(|cap| self.parse(codec_info, cap)) {
            Ok(params) => params,
            Err(err) => return format!("{} parse failed: {err}", self.name),
        };
        let layout = &self.layout;
        let mut text = format!(
            "\tname: {}\n\tsamp_freq: {}\n\tbits_per_sample: {}\n\tmax_bit_rate: {} kbit/s (code {})\n",
            self.name,
            describe_bits(params.sample_rate, &table_names(layout.sample_rates)),
            describe_bits(params.bits, &table_names(layout.bits)),
            BIT_RATES[usize::from(params.bit_rate_code)] / 1000,
            params.bit_rate_code,
        );
        if layout.version_idx.is_some() {
            text.push_str(&format!("\tversion: 0x{:02x}\n", params.version));
        }
        text.push_str(&format!(
            "\tfeatures: {}\n",
            describe_bits(params.features, &FEATURE_NAMES)
        ));
        text
    }

    fn index_str(&self, direction: Direction) -> Option<&'static str> {
        match direction {
            Direction::Source => Some(self.source_str),
            Direction::Sink => self.sink_str,
        }
    }

    fn init_codec_config(&self, direction: Direction, cfg: &mut StreamEndpointConfig) -> bool {
        let caps = match direction {
            Direction::Source => self.source_caps,
            Direction::Sink => match self.sink_caps {
                Some(caps) => caps,
                None => return false,
            },
        };
        let layout = &self.layout;
        if let Err(err) = write_vendor_header(&mut cfg.codec_info, layout.losc, MediaType::Audio, self.key) {
            log::warn!("{} 写入默认能力失败: {err}", self.name);
            return false;
        }
        let end = usize::from(layout.losc) + 1;
        cfg.codec_info[VENDOR_HEADER_LEN..end].fill(0);
        cfg.codec_info[layout.sample_rate_idx] |= caps.sample_rate;
        cfg.codec_info[layout.bits_idx] |= caps.bits;
        cfg.codec_info[layout.bit_rate_idx] = caps.bit_rate_code;
        if let Some(idx) = layout.version_idx {
            cfg.codec_info[idx] = caps.version;
        }
        cfg.codec_info[layout.features_idx] = caps.features;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v3_info(codec_id: u8, octet9: u8, code: u8, features: u8) -> Vec<u8> {
        vec![
            0x0B, 0x00, 0xFF, 0x3A, 0x05, 0x00, 0x00, codec_id, 0x4C, octet9, code, features,
        ]
    }

    fn v5_info(rate: u8, bits: u8, code: u8) -> Vec<u8> {
        vec![
            0x0D, 0x00, 0xFF, 0x3A, 0x05, 0x00, 0x00, 0x35, 0x4C, rate, bits, code, 0x01, 0x00,
        ]
    }

    #[test]
    fn test_同一厂商不同版本互不混淆() {
        let v3 = v3_info(0x33, 0x24, 2, 0);
        assert!(LHDC_V3.is_valid(Role::LocalSource, &v3));
        assert!(!LHDC_V2.is_valid(Role::LocalSource, &v3));
        assert!(LHDC_V2.is_valid(Role::LocalSource, &v3_info(0x32, 0x24, 2, 0)));
        assert!(!LHDC_V5.is_valid(Role::LocalSource, &v3));
    }

    #[test]
    fn test_v3轨道参数() {
        // 16 bit, 48 kHz, 900 kbit/s
        let v3 = v3_info(0x33, 0x24, 2, FEATURE_LL);
        assert_eq!(LHDC_V3.track_sample_rate(&v3), Some(48_000));
        assert_eq!(LHDC_V3.track_bits_per_sample(&v3), Some(16));
        assert_eq!(LHDC_V3.track_channel_count(&v3), Some(2));
        assert_eq!(LHDC_V3.bit_rate(&v3), Some(900_000));
        assert_eq!(
            LHDC_V3.sink_track_channel_type(&v3),
            Some(SinkChannelType::Stereo)
        );
        // 码率代码 3 只在 V5 合法
        assert!(!LHDC_V3.is_valid(Role::LocalSource, &v3_info(0x33, 0x24, 3, 0)));
    }

    #[test]
    fn test_v5轨道参数() {
        let v5 = v5_info(0x02, 0x01, 3);
        assert!(LHDC_V5.is_valid(Role::PeerSource, &v5));
        assert_eq!(LHDC_V5.track_sample_rate(&v5), Some(192_000));
        assert_eq!(LHDC_V5.track_bits_per_sample(&v5), Some(32));
        assert_eq!(LHDC_V5.bit_rate(&v5), Some(1_000_000));
        // 192 kHz 与 32 bit 不在接收端能力内
        assert!(!LHDC_V5.is_supported(Role::LocalSink, &v5));
        assert!(LHDC_V5.is_supported(Role::LocalSink, &v5_info(0x08, 0x02, 1)));
    }

    #[test]
    fn test_两字节帧数头部() {
        let v3 = v3_info(0x33, 0x24, 2, 0);
        let mut pkt = MediaPacket::with_headroom(2, &[0xAB]);
        assert!(LHDC_V3.build_codec_header(&v3, &mut pkt, 63));
        assert_eq!(pkt.data(), &[63, 0x00, 0xAB]);

        let mut pkt = MediaPacket::with_headroom(2, &[0xAB]);
        assert!(!LHDC_V3.build_codec_header(&v3, &mut pkt, 64));
        assert_eq!(pkt.data(), &[0xAB]);
    }

    #[test]
    fn test_规范化限制码率并清除保留位() {
        let mut v3 = v3_info(0x33, 0xE4, 0xF3, 0xFF);
        assert!(LHDC_V3.adjust_codec(&mut v3));
        assert_eq!(&v3[9..], &[0x24, 0x02, 0xC0]);
        assert!(!LHDC_V3.adjust_codec(&mut v3));
    }

    #[test]
    fn test_v2没有接收端() {
        let mut cfg = StreamEndpointConfig::new();
        assert!(!LHDC_V2.init_codec_config(Direction::Sink, &mut cfg));
        assert_eq!(LHDC_V2.index_str(Direction::Sink), None);
        assert!(LHDC_V2.decoder_interface(&v3_info(0x32, 0x24, 2, 0)).is_none());
        assert!(LHDC_V2.init_codec_config(Direction::Source, &mut cfg));
        assert!(LHDC_V2.is_valid(Role::LocalSource, cfg.codec_info()));
    }

    #[test]
    fn test_默认配置可被解析() {
        for family in [&LHDC_V3, &LHDC_V5] {
            for direction in [Direction::Source, Direction::Sink] {
                let mut cfg = StreamEndpointConfig::new();
                assert!(family.init_codec_config(direction, &mut cfg));
                assert!(family.is_valid(Role::PeerSource, cfg.codec_info()));
            }
        }
    }

    #[test]
    fn test_信息字符串() {
        let text = LHDC_V5.codec_info_string(&v5_info(0x08, 0x02, 1));
        assert!(text.contains("samp_freq: 48000 (0x08)"));
        assert!(text.contains("max_bit_rate: 500 kbit/s (code 1)"));
        assert!(text.contains("version: 0x01"));
        assert!(LHDC_V3.codec_info_string(&v5_info(0x08, 0x02, 1)).starts_with("LHDC V3 parse failed"));
    }
}
