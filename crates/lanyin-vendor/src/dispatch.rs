//! 查询分发.
//!
//! 注册表对外提供的全部查询入口. 每个查询先从能力缓冲区读取身份键,
//! 找到所属编解码器族后转发; 找不到时返回约定的哨兵值:
//!
//! - 合法性/支持性检查返回 `false`
//! - 数值查询返回 [`NOT_APPLICABLE`] (-1)
//! - `uses_rtp_header` 返回 `true`
//! - 名称查询返回固定的未知字符串
//!
//! 缓冲区过短不会越界读取, 只记录一条警告并按未知编解码器处理.

use lanyin_core::codec_info;
use lanyin_core::{
    A2dpResult, CodecType, MediaPacket, ServiceCategories, StreamEndpointConfig, VendorCodecKey,
};

use crate::codec::VendorCodec;
use crate::codec_index::{CodecIndex, Direction, IndexOwner};
use crate::interface::{DecoderInterface, EncoderInterface};
use crate::registry::VendorCodecRegistry;
use crate::role::Role;

/// 数值查询不适用时的返回值
pub const NOT_APPLICABLE: i32 = -1;

/// 未知厂商编解码器的名称
pub const UNKNOWN_VENDOR_CODEC: &str = "UNKNOWN VENDOR CODEC";

/// 未知编解码器索引的名称
pub const UNKNOWN_CODEC_INDEX: &str = "UNKNOWN CODEC INDEX";

/// 已分配但未实现的 LC3 索引名称
pub const LC3_NOT_IMPLEMENTED: &str = "LC3 not implemented";

fn to_i32(value: Option<u32>) -> i32 {
    value
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(NOT_APPLICABLE)
}

impl VendorCodecRegistry {
    /// 查找缓冲区所属的编解码器族
    fn lookup(&self, codec_info: &[u8]) -> Option<&'static dyn VendorCodec> {
        match self.resolve_codec_info(codec_info) {
            Ok(Some(family)) => Some(family),
            Ok(None) => {
                log::trace!(
                    "未注册的厂商编解码器: {}",
                    VendorCodecKey::from_codec_info(codec_info)
                        .map(|k| k.to_string())
                        .unwrap_or_default()
                );
                None
            }
            Err(err) => {
                log::warn!("能力缓冲区无法识别: {err}");
                None
            }
        }
    }

    /// 查找缓冲区所属且声明支持 `role` 的编解码器族
    fn lookup_for_role(&self, role: Role, codec_info: &[u8]) -> Option<&'static dyn VendorCodec> {
        self.lookup(codec_info).filter(|family| {
            let supported = family.roles().supports(role);
            if !supported {
                log::trace!("{} 不支持角色 {role}", family.name());
            }
            supported
        })
    }

    // ========================
    // 身份
    // ========================

    /// 厂商标识
    pub fn vendor_id(&self, codec_info: &[u8]) -> A2dpResult<u32> {
        codec_info::vendor_id(codec_info)
    }

    /// 编解码器标识
    pub fn codec_id(&self, codec_info: &[u8]) -> A2dpResult<u16> {
        codec_info::codec_id(codec_info)
    }

    // ========================
    // 合法性
    // ========================

    /// 缓冲区在指定角色下是否合法
    pub fn is_valid_for(&self, role: Role, codec_info: &[u8]) -> bool {
        self.lookup_for_role(role, codec_info)
            .is_some_and(|family| family.is_valid(role, codec_info))
    }

    /// 是否为合法的本地源端编解码器
    pub fn is_valid_local_source_codec(&self, codec_info: &[u8]) -> bool {
        self.is_valid_for(Role::LocalSource, codec_info)
    }

    /// 是否为合法的本地接收端编解码器
    pub fn is_valid_local_sink_codec(&self, codec_info: &[u8]) -> bool {
        self.is_valid_for(Role::LocalSink, codec_info)
    }

    /// 是否为合法的对端源端编解码器
    pub fn is_valid_peer_source_codec(&self, codec_info: &[u8]) -> bool {
        self.is_valid_for(Role::PeerSource, codec_info)
    }

    /// 是否为合法的对端接收端编解码器
    pub fn is_valid_peer_sink_codec(&self, codec_info: &[u8]) -> bool {
        self.is_valid_for(Role::PeerSink, codec_info)
    }

    /// 本地接收端是否支持该配置
    pub fn is_local_sink_codec_supported(&self, codec_info: &[u8]) -> bool {
        self.lookup_for_role(Role::LocalSink, codec_info)
            .is_some_and(|family| family.is_supported(Role::LocalSink, codec_info))
    }

    /// 对端源端能力是否被本地接收端支持
    pub fn is_peer_source_codec_supported(&self, codec_info: &[u8]) -> bool {
        self.lookup_for_role(Role::PeerSource, codec_info)
            .is_some_and(|family| family.is_supported(Role::PeerSource, codec_info))
    }

    // ========================
    // 比较
    // ========================

    /// 两个缓冲区的身份键相同时返回该键及其所属编解码器族
    ///
    /// 任一缓冲区不是厂商编解码器类型时不读取厂商字段. 身份键相同但
    /// 未注册时返回 `Some((key, None))`.
    fn matching_key(
        &self,
        codec_info_a: &[u8],
        codec_info_b: &[u8],
    ) -> Option<(VendorCodecKey, Option<&'static dyn VendorCodec>)> {
        if !codec_info::is_vendor_codec(codec_info_a) || !codec_info::is_vendor_codec(codec_info_b) {
            return None;
        }
        let key_a = VendorCodecKey::from_codec_info(codec_info_a).ok()?;
        let key_b = VendorCodecKey::from_codec_info(codec_info_b).ok()?;
        (key_a == key_b).then(|| (key_a, self.resolve(key_a)))
    }

    /// 编解码器类型是否相同
    ///
    /// 身份键相同即视为同一类型, 已注册的编解码器族可以进一步比较.
    pub fn codec_type_equals(&self, codec_info_a: &[u8], codec_info_b: &[u8]) -> bool {
        match self.matching_key(codec_info_a, codec_info_b) {
            Some((_, Some(family))) => family.codec_type_equals(codec_info_a, codec_info_b),
            Some((key, None)) => {
                log::trace!("未注册的厂商编解码器 {key} 按身份键比较类型");
                true
            }
            None => false,
        }
    }

    /// 编解码器配置是否相同
    ///
    /// 配置相同蕴含类型相同. 未注册的编解码器配置总是不同.
    pub fn codec_equals(&self, codec_info_a: &[u8], codec_info_b: &[u8]) -> bool {
        match self.matching_key(codec_info_a, codec_info_b) {
            Some((_, Some(family))) => {
                family.codec_type_equals(codec_info_a, codec_info_b)
                    && family.codec_equals(codec_info_a, codec_info_b)
            }
            Some((_, None)) | None => false,
        }
    }

    // ========================
    // 数值查询
    // ========================

    /// 码率 (bit/s), 不适用时返回 -1
    pub fn bit_rate(&self, codec_info: &[u8]) -> i32 {
        to_i32(self.lookup(codec_info).and_then(|f| f.bit_rate(codec_info)))
    }

    /// 播放轨道采样率, 不适用时返回 -1
    pub fn track_sample_rate(&self, codec_info: &[u8]) -> i32 {
        to_i32(self.lookup(codec_info).and_then(|f| f.track_sample_rate(codec_info)))
    }

    /// 播放轨道位深, 不适用时返回 -1
    pub fn track_bits_per_sample(&self, codec_info: &[u8]) -> i32 {
        to_i32(self.lookup(codec_info).and_then(|f| f.track_bits_per_sample(codec_info)))
    }

    /// 播放轨道声道数, 不适用时返回 -1
    pub fn track_channel_count(&self, codec_info: &[u8]) -> i32 {
        to_i32(self.lookup(codec_info).and_then(|f| f.track_channel_count(codec_info)))
    }

    /// 接收端播放轨道声道类型, 不适用时返回 -1
    ///
    /// 只有声明本地接收端角色的编解码器族会回答.
    pub fn sink_track_channel_type(&self, codec_info: &[u8]) -> i32 {
        to_i32(
            self.lookup_for_role(Role::LocalSink, codec_info)
                .and_then(|f| f.sink_track_channel_type(codec_info))
                .map(|ty| ty.as_u32()),
        )
    }

    // ========================
    // 传输
    // ========================

    /// 媒体包是否使用 RTP 头, 未知编解码器默认使用
    pub fn uses_rtp_header(&self, content_protection_enabled: bool, codec_info: &[u8]) -> bool {
        self.lookup(codec_info)
            .is_none_or(|f| f.uses_rtp_header(content_protection_enabled, codec_info))
    }

    /// 在媒体包负载前写入编解码器头部
    pub fn build_codec_header(
        &self,
        codec_info: &[u8],
        packet: &mut MediaPacket,
        frames_per_packet: u16,
    ) -> bool {
        self.lookup(codec_info)
            .is_some_and(|f| f.build_codec_header(codec_info, packet, frames_per_packet))
    }

    /// 从已编码负载中提取时间戳
    pub fn packet_timestamp(&self, codec_info: &[u8], data: &[u8]) -> Option<u32> {
        self.lookup(codec_info)?.packet_timestamp(codec_info, data)
    }

    // ========================
    // 编解码器句柄
    // ========================

    /// 源端编码器接口
    pub fn encoder_interface(&self, codec_info: &[u8]) -> Option<&'static EncoderInterface> {
        self.lookup_for_role(Role::LocalSource, codec_info)?
            .encoder_interface(codec_info)
    }

    /// 接收端解码器接口
    pub fn decoder_interface(&self, codec_info: &[u8]) -> Option<&'static DecoderInterface> {
        self.lookup_for_role(Role::LocalSink, codec_info)?
            .decoder_interface(codec_info)
    }

    /// 原地规范化配置字段, 返回是否有字节被修改
    pub fn adjust_codec(&self, codec_info: &mut [u8]) -> bool {
        match self.lookup(codec_info) {
            Some(family) => family.adjust_codec(codec_info),
            None => false,
        }
    }

    // ========================
    // 编解码器索引
    // ========================

    /// 缓冲区对应的源端编解码器索引
    pub fn source_codec_index(&self, codec_info: &[u8]) -> Option<CodecIndex> {
        let family = self.lookup_for_role(Role::LocalSource, codec_info)?;
        CodecIndex::for_key(family.key(), Direction::Source)
    }

    /// 缓冲区对应的接收端编解码器索引
    pub fn sink_codec_index(&self, codec_info: &[u8]) -> Option<CodecIndex> {
        let family = self.lookup_for_role(Role::LocalSink, codec_info)?;
        CodecIndex::for_key(family.key(), Direction::Sink)
    }

    /// 编解码器索引的显示名称
    pub fn codec_index_str(&self, index: CodecIndex) -> &'static str {
        match index.owner() {
            IndexOwner::Standard => UNKNOWN_CODEC_INDEX,
            IndexOwner::Unimplemented => LC3_NOT_IMPLEMENTED,
            IndexOwner::Vendor(key) => self
                .resolve(key)
                .and_then(|family| family.index_str(index.direction()))
                .unwrap_or(UNKNOWN_CODEC_INDEX),
        }
    }

    /// 以编解码器索引的默认能力填充流端点配置
    ///
    /// 标准编解码器与未实现的索引返回 `false`, 配置保持不变.
    pub fn init_codec_config(&self, index: CodecIndex, cfg: &mut StreamEndpointConfig) -> bool {
        let family = match index.owner() {
            IndexOwner::Vendor(key) => match self.resolve(key) {
                Some(family) => family,
                None => {
                    log::debug!("编解码器索引 {index} 所属的编解码器族未编译");
                    return false;
                }
            },
            IndexOwner::Standard | IndexOwner::Unimplemented => return false,
        };

        // 复用的配置可能残留上一个编解码器的能力与内容保护
        cfg.codec_info = [0; codec_info::CODEC_INFO_SIZE];
        cfg.clear_protection();
        cfg.num_codec = 1;
        cfg.psc_mask |= ServiceCategories::MEDIA_CODEC;
        family.init_codec_config(index.direction(), cfg)
    }

    /// 编解码器索引的默认流端点配置
    pub fn default_codec_config(&self, index: CodecIndex) -> Option<StreamEndpointConfig> {
        let mut cfg = StreamEndpointConfig::new();
        self.init_codec_config(index, &mut cfg).then_some(cfg)
    }

    // ========================
    // 名称与描述
    // ========================

    /// 缓冲区对应的编解码器名称
    pub fn codec_name(&self, codec_info: &[u8]) -> &'static str {
        self.lookup(codec_info)
            .map_or(UNKNOWN_VENDOR_CODEC, |f| f.codec_name(codec_info))
    }

    /// 缓冲区的详细信息
    pub fn codec_info_string(&self, codec_info: &[u8]) -> String {
        if let Some(family) = self.lookup(codec_info) {
            return family.codec_info_string(codec_info);
        }
        match VendorCodecKey::from_codec_info(codec_info) {
            Ok(key) => format!(
                "Unsupported codec vendor_id: 0x{:08x} codec_id: 0x{:04x}",
                key.vendor_id, key.codec_id
            ),
            Err(err) => format!("Unsupported codec: {err}"),
        }
    }

    /// 缓冲区的编解码器类型
    pub fn codec_type(&self, codec_info: &[u8]) -> A2dpResult<CodecType> {
        codec_info::codec_type(codec_info)
    }
}
