//! aptX 与 aptX-HD 编解码器族.
//!
//! 两者共用一套能力解析, 区别在于 LOSC, 位深, 保留字段与 RTP 头策略,
//! 由 [`AptxVariant`] 描述. 两者都只能作为源端参与协商.

use lanyin_core::codec_info::{VENDOR_HEADER_LEN, check_vendor_header, write_vendor_header};
use lanyin_core::{A2dpError, A2dpResult, MediaPacket, MediaType, StreamEndpointConfig, VendorCodecKey};

use super::{describe_bits, parse_any, read_timestamp, retain_bits, select_bits};
use crate::codec::VendorCodec;
use crate::codec_index::Direction;
use crate::interface::EncoderInterface;
use crate::role::{Role, RoleSet};

/// 采样率与声道模式所在字节
const SETTINGS_IDX: usize = VENDOR_HEADER_LEN;

const SAMPLE_RATE_44100: u8 = 0x20;
const SAMPLE_RATE_48000: u8 = 0x10;
const SAMPLE_RATE_MASK: u8 = SAMPLE_RATE_44100 | SAMPLE_RATE_48000;

const CHANNELS_MONO: u8 = 0x01;
const CHANNELS_STEREO: u8 = 0x02;
const CHANNELS_MASK: u8 = CHANNELS_MONO | CHANNELS_STEREO;

/// 默认源端能力: 44.1/48 kHz, 立体声
const SOURCE_CAPS: u8 = SAMPLE_RATE_MASK | CHANNELS_STEREO;

const SAMPLE_RATE_NAMES: [(u8, &str); 2] = [(SAMPLE_RATE_44100, "44100"), (SAMPLE_RATE_48000, "48000")];
const CHANNEL_NAMES: [(u8, &str); 2] = [(CHANNELS_MONO, "MONO"), (CHANNELS_STEREO, "STEREO")];

/// aptX 变体描述
#[derive(Debug)]
pub struct AptxVariant {
    key: VendorCodecKey,
    name: &'static str,
    losc: u8,
    /// 采样率字节之后的保留字节数
    reserved_len: usize,
    bits_per_sample: u32,
    /// 不论是否编译 SCMS-T 都带 RTP 头
    always_rtp: bool,
    encoder: &'static EncoderInterface,
}

#[cfg(feature = "aptx")]
const APTX_ENCODER: EncoderInterface = EncoderInterface {
    name: "aptX",
    key: super::APTX_KEY,
};

#[cfg(feature = "aptx-hd")]
const APTX_HD_ENCODER: EncoderInterface = EncoderInterface {
    name: "aptX-HD",
    key: super::APTX_HD_KEY,
};

/// aptX
#[cfg(feature = "aptx")]
pub const APTX: AptxVariant = AptxVariant {
    key: super::APTX_KEY,
    name: "aptX",
    losc: 9,
    reserved_len: 0,
    bits_per_sample: 16,
    always_rtp: false,
    encoder: &APTX_ENCODER,
};

/// aptX-HD
#[cfg(feature = "aptx-hd")]
pub const APTX_HD: AptxVariant = AptxVariant {
    key: super::APTX_HD_KEY,
    name: "aptX-HD",
    losc: 13,
    reserved_len: 4,
    bits_per_sample: 24,
    always_rtp: true,
    encoder: &APTX_HD_ENCODER,
};

/// 解析后的 aptX 能力/配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AptxParams {
    sample_rate: u8,
    channel_mode: u8,
    reserved: [u8; 4],
}

impl AptxParams {
    fn sample_rate_hz(&self) -> Option<u32> {
        match self.sample_rate {
            SAMPLE_RATE_44100 => Some(44_100),
            SAMPLE_RATE_48000 => Some(48_000),
            _ => None,
        }
    }

    fn channels(&self) -> Option<u32> {
        match self.channel_mode {
            CHANNELS_MONO => Some(1),
            CHANNELS_STEREO => Some(2),
            _ => None,
        }
    }
}

impl AptxVariant {
    fn parse(&self, codec_info: &[u8], is_capability: bool) -> A2dpResult<AptxParams> {
        check_vendor_header(codec_info, self.losc, self.key)?;
        let octet = codec_info[SETTINGS_IDX];
        let sample_rate = select_bits(octet, SAMPLE_RATE_MASK, is_capability)
            .ok_or(A2dpError::BadSampleRate(octet))?;
        let channel_mode = select_bits(octet, CHANNELS_MASK, is_capability)
            .ok_or(A2dpError::BadChannelMode(octet))?;

        let mut reserved = [0u8; 4];
        let start = SETTINGS_IDX + 1;
        reserved[..self.reserved_len].copy_from_slice(&codec_info[start..start + self.reserved_len]);
        Ok(AptxParams {
            sample_rate,
            channel_mode,
            reserved,
        })
    }

    fn parse_config(&self, codec_info: &[u8]) -> Option<AptxParams> {
        self.parse(codec_info, false)
            .inspect_err(|err| log::debug!("{} 配置解析失败: {err}", self.name))
            .ok()
    }
}

impl VendorCodec for AptxVariant {
    fn key(&self) -> VendorCodecKey {
        self.key
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn roles(&self) -> RoleSet {
        RoleSet::SOURCE_ONLY
    }

    fn is_valid(&self, _role: Role, codec_info: &[u8]) -> bool {
        parse_any(|cap| self.parse(codec_info, cap)).is_ok()
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
        // 固定 4:1 压缩比
        Some(params.sample_rate_hz()? * self.bits_per_sample * params.channels()? / 4)
    }

    fn track_sample_rate(&self, codec_info: &[u8]) -> Option<u32> {
        self.parse_config(codec_info)?.sample_rate_hz()
    }

    fn track_bits_per_sample(&self, codec_info: &[u8]) -> Option<u32> {
        self.parse_config(codec_info).map(|_| self.bits_per_sample)
    }

    fn track_channel_count(&self, codec_info: &[u8]) -> Option<u32> {
        self.parse_config(codec_info)?.channels()
    }

    // aptX 是否带 RTP 头取决于编译期的 SCMS-T 开关, 与运行时状态无关
    fn uses_rtp_header(&self, _content_protection_enabled: bool, _codec_info: &[u8]) -> bool {
        self.always_rtp || cfg!(feature = "scms-t")
    }

    fn build_codec_header(
        &self,
        _codec_info: &[u8],
        _packet: &mut MediaPacket,
        _frames_per_packet: u16,
    ) -> bool {
        // aptX 负载不带编解码器头部
        true
    }

    fn packet_timestamp(&self, _codec_info: &[u8], data: &[u8]) -> Option<u32> {
        read_timestamp(data)
    }

    fn encoder_interface(&self, codec_info: &[u8]) -> Option<&'static EncoderInterface> {
        self.is_valid(Role::LocalSource, codec_info).then_some(self.encoder)
    }

    fn adjust_codec(&self, codec_info: &mut [u8]) -> bool {
        if check_vendor_header(codec_info, self.losc, self.key).is_err() {
            return false;
        }
        let mut changed = retain_bits(&mut codec_info[SETTINGS_IDX], SAMPLE_RATE_MASK | CHANNELS_MASK);
        for byte in &mut codec_info[SETTINGS_IDX + 1..SETTINGS_IDX + 1 + self.reserved_len] {
            changed |= retain_bits(byte, 0);
        }
        changed
    }

    fn codec_info_string(&self, codec_info: &[u8]) -> String {
        match parse_any(|cap| self.parse(codec_info, cap)) {
            Ok(params) => format!(
                "\tname: {}\n\tsamp_freq: {}\n\tch_mode: {}\n",
                self.name,
                describe_bits(params.sample_rate, &SAMPLE_RATE_NAMES),
                describe_bits(params.channel_mode, &CHANNEL_NAMES),
            ),
            Err(err) => format!("{} parse failed: {err}", self.name),
        }
    }

    fn index_str(&self, direction: Direction) -> Option<&'static str> {
        match direction {
            Direction::Source => Some(self.name),
            Direction::Sink => None,
        }
    }

    fn init_codec_config(&self, direction: Direction, cfg: &mut StreamEndpointConfig) -> bool {
        if direction != Direction::Source {
            return false;
        }
        if let Err(err) = write_vendor_header(&mut cfg.codec_info, self.losc, MediaType::Audio, self.key) {
            log::warn!("{} 写入默认能力失败: {err}", self.name);
            return false;
        }
        cfg.codec_info[SETTINGS_IDX] = SOURCE_CAPS;
        cfg.codec_info[SETTINGS_IDX + 1..SETTINGS_IDX + 1 + self.reserved_len].fill(0);
        #[cfg(feature = "scms-t")]
        cfg.add_scms_t();
        true
    }
}
