//! LDAC 编解码器族.
//!
//! 私有字段: 第 9 字节为采样率位域, 第 10 字节为声道模式位域.
//! 支持全部四种角色, 负载头部为 1 字节帧数.

use lanyin_core::codec_info::{VENDOR_HEADER_LEN, check_vendor_header, write_vendor_header};
use lanyin_core::{
    A2dpError, A2dpResult, MediaPacket, MediaType, SinkChannelType, StreamEndpointConfig,
    VendorCodecKey,
};

use super::{
    LDAC_KEY, describe_bits, parse_any, read_timestamp, retain_bits, select_bits,
    write_frame_count_header,
};
use crate::codec::VendorCodec;
use crate::codec_index::Direction;
use crate::interface::{DecoderInterface, EncoderInterface};
use crate::role::{Role, RoleSet};

const LOSC: u8 = 10;
const SAMPLE_RATE_IDX: usize = VENDOR_HEADER_LEN;
const CHANNEL_MODE_IDX: usize = VENDOR_HEADER_LEN + 1;

const SAMPLE_RATE_44100: u8 = 0x20;
const SAMPLE_RATE_48000: u8 = 0x10;
const SAMPLE_RATE_88200: u8 = 0x08;
const SAMPLE_RATE_96000: u8 = 0x04;
const SAMPLE_RATE_176400: u8 = 0x02;
const SAMPLE_RATE_192000: u8 = 0x01;
const SAMPLE_RATE_MASK: u8 = 0x3F;

const CHANNEL_MODE_MONO: u8 = 0x04;
const CHANNEL_MODE_DUAL: u8 = 0x02;
const CHANNEL_MODE_STEREO: u8 = 0x01;
const CHANNEL_MODE_MASK: u8 = 0x07;

/// 负载头部帧数字段只有低 4 位
const MAX_FRAMES_PER_PACKET: u16 = 0x0F;
const BITS_PER_SAMPLE: u32 = 32;

/// 源端能力: 44.1/48/88.2/96 kHz, 双声道或立体声
const SOURCE_CAPS: (u8, u8) = (
    SAMPLE_RATE_44100 | SAMPLE_RATE_48000 | SAMPLE_RATE_88200 | SAMPLE_RATE_96000,
    CHANNEL_MODE_DUAL | CHANNEL_MODE_STEREO,
);

/// 接收端能力: 源端能力再加单声道
const SINK_CAPS: (u8, u8) = (SOURCE_CAPS.0, CHANNEL_MODE_MASK);

const SAMPLE_RATE_NAMES: [(u8, &str); 6] = [
    (SAMPLE_RATE_44100, "44100"),
    (SAMPLE_RATE_48000, "48000"),
    (SAMPLE_RATE_88200, "88200"),
    (SAMPLE_RATE_96000, "96000"),
    (SAMPLE_RATE_176400, "176400"),
    (SAMPLE_RATE_192000, "192000"),
];
const CHANNEL_NAMES: [(u8, &str); 3] = [
    (CHANNEL_MODE_MONO, "MONO"),
    (CHANNEL_MODE_DUAL, "DUAL"),
    (CHANNEL_MODE_STEREO, "STEREO"),
];

const ENCODER: EncoderInterface = EncoderInterface {
    name: "LDAC",
    key: LDAC_KEY,
};

const DECODER: DecoderInterface = DecoderInterface {
    name: "LDAC",
    key: LDAC_KEY,
};

/// LDAC
pub const LDAC: Ldac = Ldac;

/// LDAC 编解码器族
#[derive(Debug)]
pub struct Ldac;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LdacParams {
    sample_rate: u8,
    channel_mode: u8,
}

impl LdacParams {
    fn sample_rate_hz(&self) -> Option<u32> {
        match self.sample_rate {
            SAMPLE_RATE_44100 => Some(44_100),
            SAMPLE_RATE_48000 => Some(48_000),
            SAMPLE_RATE_88200 => Some(88_200),
            SAMPLE_RATE_96000 => Some(96_000),
            SAMPLE_RATE_176400 => Some(176_400),
            SAMPLE_RATE_192000 => Some(192_000),
            _ => None,
        }
    }

    fn channels(&self) -> Option<u32> {
        match self.channel_mode {
            CHANNEL_MODE_MONO => Some(1),
            CHANNEL_MODE_DUAL | CHANNEL_MODE_STEREO => Some(2),
            _ => None,
        }
    }

    /// 与能力掩码逐字段有交集
    fn matches(&self, caps: (u8, u8)) -> bool {
        self.sample_rate & caps.0 != 0 && self.channel_mode & caps.1 != 0
    }
}

impl Ldac {
    fn parse(&self, codec_info: &[u8], is_capability: bool) -> A2dpResult<LdacParams> {
        check_vendor_header(codec_info, LOSC, LDAC_KEY)?;
        let rate = codec_info[SAMPLE_RATE_IDX];
        let mode = codec_info[CHANNEL_MODE_IDX];
        Ok(LdacParams {
            sample_rate: select_bits(rate, SAMPLE_RATE_MASK, is_capability)
                .ok_or(A2dpError::BadSampleRate(rate))?,
            channel_mode: select_bits(mode, CHANNEL_MODE_MASK, is_capability)
                .ok_or(A2dpError::BadChannelMode(mode))?,
        })
    }

    fn parse_config(&self, codec_info: &[u8]) -> Option<LdacParams> {
        self.parse(codec_info, false)
            .inspect_err(|err| log::debug!("LDAC 配置解析失败: {err}"))
            .ok()
    }
}

impl VendorCodec for Ldac {
    fn key(&self) -> VendorCodecKey {
        LDAC_KEY
    }

    fn name(&self) -> &'static str {
        "LDAC"
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
        let params = self.parse_config(codec_info)?;
        match params.sample_rate {
            SAMPLE_RATE_44100 | SAMPLE_RATE_88200 | SAMPLE_RATE_176400 => Some(909_000),
            SAMPLE_RATE_48000 | SAMPLE_RATE_96000 | SAMPLE_RATE_192000 => Some(990_000),
            _ => None,
        }
    }

    fn track_sample_rate(&self, codec_info: &[u8]) -> Option<u32> {
        self.parse_config(codec_info)?.sample_rate_hz()
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
        if check_vendor_header(codec_info, LOSC, LDAC_KEY).is_err() {
            return false;
        }
        let rate = retain_bits(&mut codec_info[SAMPLE_RATE_IDX], SAMPLE_RATE_MASK);
        let mode = retain_bits(&mut codec_info[CHANNEL_MODE_IDX], CHANNEL_MODE_MASK);
        rate || mode
    }

    fn codec_info_string(&self, codec_info: &[u8]) -> String {
        match parse_any(|cap| self.parse(codec_info, cap)) {
            Ok(params) => format!(
                "\tname: LDAC\n\tsamp_freq: {}\n\tch_mode: {}\n",
                describe_bits(params.sample_rate, &SAMPLE_RATE_NAMES),
                describe_bits(params.channel_mode, &CHANNEL_NAMES),
            ),
            Err(err) => format!("LDAC parse failed: {err}"),
        }
    }

    fn index_str(&self, direction: Direction) -> Option<&'static str> {
        Some(match direction {
            Direction::Source => "LDAC",
            Direction::Sink => "LDAC SINK",
        })
    }

    fn init_codec_config(&self, direction: Direction, cfg: &mut StreamEndpointConfig) -> bool {
        let caps = match direction {
            Direction::Source => SOURCE_CAPS,
            Direction::Sink => SINK_CAPS,
        };
        if let Err(err) = write_vendor_header(&mut cfg.codec_info, LOSC, MediaType::Audio, LDAC_KEY) {
            log::warn!("LDAC 写入默认能力失败: {err}");
            return false;
        }
        cfg.codec_info[SAMPLE_RATE_IDX] = caps.0;
        cfg.codec_info[CHANNEL_MODE_IDX] = caps.1;
        true
    }
}
