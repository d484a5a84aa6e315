//! Opus 编解码器族.
//!
//! 私有字段只有第 9 字节: 低 3 位声道模式, 第 3~4 位帧长, 最高位
//! 48 kHz 采样率.

use lanyin_core::codec_info::{VENDOR_HEADER_LEN, check_vendor_header, write_vendor_header};
use lanyin_core::{
    A2dpError, A2dpResult, MediaPacket, MediaType, SinkChannelType, StreamEndpointConfig,
    VendorCodecKey,
};

use super::{
    OPUS_KEY, describe_bits, parse_any, read_timestamp, retain_bits, select_bits,
    write_frame_count_header,
};
use crate::codec::VendorCodec;
use crate::codec_index::Direction;
use crate::interface::{DecoderInterface, EncoderInterface};
use crate::role::{Role, RoleSet};

const LOSC: u8 = 9;
const SETTINGS_IDX: usize = VENDOR_HEADER_LEN;

const CHANNEL_MODE_MONO: u8 = 0x01;
const CHANNEL_MODE_STEREO: u8 = 0x02;
const CHANNEL_MODE_DUAL: u8 = 0x04;
const CHANNEL_MODE_MASK: u8 = 0x07;

const FRAMESIZE_10MS: u8 = 0x08;
const FRAMESIZE_20MS: u8 = 0x10;
const FRAMESIZE_MASK: u8 = 0x18;

const SAMPLE_RATE_48000: u8 = 0x80;
const SAMPLE_RATE_MASK: u8 = 0x80;

const MAX_FRAMES_PER_PACKET: u16 = 0x0F;
const BITS_PER_SAMPLE: u32 = 16;

/// 源端能力: 48 kHz, 20 ms, 立体声
const SOURCE_CAPS: u8 = SAMPLE_RATE_48000 | FRAMESIZE_20MS | CHANNEL_MODE_STEREO;
/// 接收端能力: 48 kHz, 20 ms, 全部声道模式
const SINK_CAPS: u8 = SAMPLE_RATE_48000 | FRAMESIZE_20MS | CHANNEL_MODE_MASK;

const CHANNEL_NAMES: [(u8, &str); 3] = [
    (CHANNEL_MODE_MONO, "MONO"),
    (CHANNEL_MODE_STEREO, "STEREO"),
    (CHANNEL_MODE_DUAL, "DUAL"),
];
const FRAMESIZE_NAMES: [(u8, &str); 2] = [(FRAMESIZE_10MS, "10ms"), (FRAMESIZE_20MS, "20ms")];
const SAMPLE_RATE_NAMES: [(u8, &str); 1] = [(SAMPLE_RATE_48000, "48000")];

const ENCODER: EncoderInterface = EncoderInterface {
    name: "Opus",
    key: OPUS_KEY,
};

const DECODER: DecoderInterface = DecoderInterface {
    name: "Opus",
    key: OPUS_KEY,
};

/// Opus
pub const OPUS: Opus = Opus;

/// Opus 编解码器族
#[derive(Debug)]
pub struct Opus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpusParams {
    sample_rate: u8,
    frame_size: u8,
    channel_mode: u8,
}

impl OpusParams {
    fn channels(&self) -> Option<u32> {
        match self.channel_mode {
            CHANNEL_MODE_MONO => Some(1),
            CHANNEL_MODE_STEREO | CHANNEL_MODE_DUAL => Some(2),
            _ => None,
        }
    }

    fn matches(&self, caps: u8) -> bool {
        self.sample_rate & caps != 0 && self.frame_size & caps != 0 && self.channel_mode & caps != 0
    }
}

impl Opus {
    fn parse(&self, codec_info: &[u8], is_capability: bool) -> A2dpResult<OpusParams> {
        check_vendor_header(codec_info, LOSC, OPUS_KEY)?;
        let octet = codec_info[SETTINGS_IDX];
        Ok(OpusParams {
            sample_rate: select_bits(octet, SAMPLE_RATE_MASK, is_capability)
                .ok_or(A2dpError::BadSampleRate(octet))?,
            frame_size: select_bits(octet, FRAMESIZE_MASK, is_capability)
                .ok_or(A2dpError::BadFrameSize(octet))?,
            channel_mode: select_bits(octet, CHANNEL_MODE_MASK, is_capability)
                .ok_or(A2dpError::BadChannelMode(octet))?,
        })
    }

    fn parse_config(&self, codec_info: &[u8]) -> Option<OpusParams> {
        self.parse(codec_info, false)
            .inspect_err(|err| log::debug!("Opus 配置解析失败: {err}"))
            .ok()
    }
}

impl VendorCodec for Opus {
    fn key(&self) -> VendorCodecKey {
        OPUS_KEY
    }

    fn name(&self) -> &'static str {
        "Opus"
    }

    fn roles(&self) -> RoleSet {
        RoleSet::all()
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
        parsed.is_ok_and(|params| params.matches(SINK_CAPS))
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
        match self.parse_config(codec_info)?.channel_mode {
            CHANNEL_MODE_MONO => Some(128_000),
            CHANNEL_MODE_STEREO | CHANNEL_MODE_DUAL => Some(256_000),
            _ => None,
        }
    }

    fn track_sample_rate(&self, codec_info: &[u8]) -> Option<u32> {
        self.parse_config(codec_info).map(|_| 48_000)
    }

    fn track_bits_per_sample(&self, codec_info: &[u8]) -> Option<u32> {
        self.parse_config(codec_info).map(|_| BITS_PER_SAMPLE)
    }

    fn track_channel_count(&self, codec_info: &[u8]) -> Option<u32> {
        self.parse_config(codec_info)?.channels()
    }

    fn sink_track_channel_type(&self, codec_info: &[u8]) -> Option<SinkChannelType> {
        let params = self.parse_config(codec_info)?;
        Some(match params.channel_mode {
            CHANNEL_MODE_MONO => SinkChannelType::Mono,
            _ => SinkChannelType::Stereo,
        })
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
        write_frame_count_header(packet, 1, frames_per_packet, MAX_FRAMES_PER_PACKET)
    }

    fn packet_timestamp(&self, _codec_info: &[u8], data: &[u8]) -> Option<u32> {
        read_timestamp(data)
    }

    fn encoder_interface(&self, codec_info: &[u8]) -> Option<&'static EncoderInterface> {
        self.is_valid(Role::LocalSource, codec_info).then_some(&ENCODER)
    }

    fn decoder_interface(&self, codec_info: &[u8]) -> Option<&'static DecoderInterface> {
        self.is_valid(Role::LocalSink, codec_info).then_some(&DECODER)
    }

    fn adjust_codec(&self, codec_info: &mut [u8]) -> bool {
        if check_vendor_header(codec_info, LOSC, OPUS_KEY).is_err() {
            return false;
        }
        retain_bits(
            &mut codec_info[SETTINGS_IDX],
            SAMPLE_RATE_MASK | FRAMESIZE_MASK | CHANNEL_MODE_MASK,
        )
    }

    fn codec_info_string(&self, codec_info: &[u8]) -> String {
        match parse_any(|cap| self.parse(codec_info, cap)) {
            Ok(params) => format!(
                "\tname: Opus\n\tsamp_freq: {}\n\tframe_size: {}\n\tch_mode: {}\n",
                describe_bits(params.sample_rate, &SAMPLE_RATE_NAMES),
                describe_bits(params.frame_size, &FRAMESIZE_NAMES),
                describe_bits(params.channel_mode, &CHANNEL_NAMES),
            ),
            Err(err) => format!("Opus parse failed: {err}"),
        }
    }

    fn index_str(&self, direction: Direction) -> Option<&'static str> {
        Some(match direction {
            Direction::Source => "Opus",
            Direction::Sink => "Opus SINK",
        })
    }

    fn init_codec_config(&self, direction: Direction, cfg: &mut StreamEndpointConfig) -> bool {
        if let Err(err) = write_vendor_header(&mut cfg.codec_info, LOSC, MediaType::Audio, OPUS_KEY) {
            log::warn!("Opus 写入默认能力失败: {err}");
            return false;
        }
        cfg.codec_info[SETTINGS_IDX] = match direction {
            Direction::Source => SOURCE_CAPS,
            Direction::Sink => SINK_CAPS,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(octet: u8) -> Vec<u8> {
        vec![0x09, 0x00, 0xFF, 0xE0, 0x00, 0x00, 0x00, 0x01, 0x00, octet]
    }

    #[test]
    fn test_默认能力取值() {
        assert_eq!(SOURCE_CAPS, 0x92);
        assert_eq!(SINK_CAPS, 0x97);
    }

    #[test]
    fn test_配置与轨道参数() {
        let mono = info(SAMPLE_RATE_48000 | FRAMESIZE_20MS | CHANNEL_MODE_MONO);
        assert!(OPUS.is_valid(Role::PeerSource, &mono));
        assert_eq!(OPUS.bit_rate(&mono), Some(128_000));
        assert_eq!(OPUS.track_channel_count(&mono), Some(1));
        assert_eq!(OPUS.track_sample_rate(&mono), Some(48_000));
        assert_eq!(OPUS.sink_track_channel_type(&mono), Some(SinkChannelType::Mono));

        let dual = info(SAMPLE_RATE_48000 | FRAMESIZE_10MS | CHANNEL_MODE_DUAL);
        assert_eq!(OPUS.bit_rate(&dual), Some(256_000));
        assert_eq!(OPUS.track_channel_count(&dual), Some(2));
    }

    #[test]
    fn test_缺少采样率无效() {
        assert!(!OPUS.is_valid(Role::LocalSource, &info(FRAMESIZE_20MS | CHANNEL_MODE_STEREO)));
        assert_eq!(OPUS.track_bits_per_sample(&info(0x00)), None);
    }

    #[test]
    fn test_支持性检查() {
        // 10 ms 帧长不在接收端能力内
        assert!(!OPUS.is_supported(
            Role::LocalSink,
            &info(SAMPLE_RATE_48000 | FRAMESIZE_10MS | CHANNEL_MODE_STEREO)
        ));
        assert!(OPUS.is_supported(
            Role::LocalSink,
            &info(SAMPLE_RATE_48000 | FRAMESIZE_20MS | CHANNEL_MODE_STEREO)
        ));
        assert!(OPUS.is_supported(Role::PeerSource, &info(0x9F)));
    }

    #[test]
    fn test_信息字符串() {
        let text = OPUS.codec_info_string(&info(SOURCE_CAPS));
        assert!(text.contains("frame_size: 20ms (0x10)"));
        assert!(text.contains("ch_mode: STEREO (0x02)"));
    }
}
