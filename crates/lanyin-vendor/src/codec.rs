//! 厂商编解码器族 trait 定义.
//!
//! 每个编解码器族实现 [`VendorCodec`] 并在注册表中登记一个条目.

use lanyin_core::{MediaPacket, SinkChannelType, StreamEndpointConfig, VendorCodecKey};

use crate::codec_index::Direction;
use crate::interface::{DecoderInterface, EncoderInterface};
use crate::role::{Role, RoleSet};

/// 厂商编解码器族 trait
///
/// 编解码器族只需实现与其支持角色相关的操作. 所有操作都有默认实现,
/// 返回 "不支持" 的结果 (`false`, `None` 等), 分发层把它当作正常结果,
/// 而不是错误.
///
/// 传入的 `codec_info` 已经由分发层按身份键路由到本族, 但其余字段
/// 未经校验, 实现必须自行做长度与取值检查.
pub trait VendorCodec: Send + Sync {
    /// 身份键
    fn key(&self) -> VendorCodecKey;

    /// 编解码器族名称
    fn name(&self) -> &'static str;

    /// 支持的角色集合
    fn roles(&self) -> RoleSet;

    /// 结构性校验: 缓冲区是否是本族在该角色下的合法能力或配置
    fn is_valid(&self, _role: Role, _codec_info: &[u8]) -> bool {
        false
    }

    /// 支持性校验: 在结构合法的基础上, 是否与本地配置的接收端能力匹配
    ///
    /// 只对 [`Role::LocalSink`] 与 [`Role::PeerSource`] 有意义.
    fn is_supported(&self, _role: Role, _codec_info: &[u8]) -> bool {
        false
    }

    /// 编解码器类型是否相同 (身份键已匹配)
    fn codec_type_equals(&self, _codec_info_a: &[u8], _codec_info_b: &[u8]) -> bool {
        true
    }

    /// 编解码器配置是否相同 (身份键已匹配)
    fn codec_equals(&self, _codec_info_a: &[u8], _codec_info_b: &[u8]) -> bool {
        false
    }

    /// 码率 (bit/s)
    fn bit_rate(&self, _codec_info: &[u8]) -> Option<u32> {
        None
    }

    /// 播放轨道采样率 (Hz)
    fn track_sample_rate(&self, _codec_info: &[u8]) -> Option<u32> {
        None
    }

    /// 播放轨道位深
    fn track_bits_per_sample(&self, _codec_info: &[u8]) -> Option<u32> {
        None
    }

    /// 播放轨道声道数
    fn track_channel_count(&self, _codec_info: &[u8]) -> Option<u32> {
        None
    }

    /// 接收端播放轨道声道类型
    fn sink_track_channel_type(&self, _codec_info: &[u8]) -> Option<SinkChannelType> {
        None
    }

    /// 媒体包是否使用 RTP 头
    fn uses_rtp_header(&self, _content_protection_enabled: bool, _codec_info: &[u8]) -> bool {
        true
    }

    /// 在媒体包负载前写入编解码器头部
    fn build_codec_header(
        &self,
        _codec_info: &[u8],
        _packet: &mut MediaPacket,
        _frames_per_packet: u16,
    ) -> bool {
        false
    }

    /// 从已编码负载中提取 RTP 相对时间戳
    fn packet_timestamp(&self, _codec_info: &[u8], _data: &[u8]) -> Option<u32> {
        None
    }

    /// 解析编码器接口句柄
    fn encoder_interface(&self, _codec_info: &[u8]) -> Option<&'static EncoderInterface> {
        None
    }

    /// 解析解码器接口句柄
    fn decoder_interface(&self, _codec_info: &[u8]) -> Option<&'static DecoderInterface> {
        None
    }

    /// 原地规范化本族配置字段, 返回是否有字节被修改
    fn adjust_codec(&self, _codec_info: &mut [u8]) -> bool {
        false
    }

    /// 缓冲区对应的显示名称
    fn codec_name(&self, _codec_info: &[u8]) -> &'static str {
        self.name()
    }

    /// 详细信息字符串
    fn codec_info_string(&self, _codec_info: &[u8]) -> String {
        format!("\tname: {}\n", self.name())
    }

    /// 指定方向编解码器索引的显示名称
    fn index_str(&self, _direction: Direction) -> Option<&'static str> {
        None
    }

    /// 以本族默认 (最大) 能力填充流端点配置
    fn init_codec_config(&self, _direction: Direction, _cfg: &mut StreamEndpointConfig) -> bool {
        false
    }
}
