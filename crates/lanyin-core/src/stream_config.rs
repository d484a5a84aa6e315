//! 流端点 (SEP) 配置.
//!
//! 本地流端点对外声明的编解码能力与内容保护能力. 厂商编解码器族
//! 根据编解码器索引填入默认 (最大) 能力.

use bitflags::bitflags;

use crate::codec_info::CODEC_INFO_SIZE;

/// 内容保护信息最大长度
pub const PROTECT_INFO_SIZE: usize = 90;

/// SCMS-T 内容保护标识
pub const SCMS_T_ID: u16 = 0x0002;

bitflags! {
    /// 端点声明的服务类别
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ServiceCategories: u16 {
        /// 媒体传输
        const MEDIA_TRANSPORT    = 1 << 0;
        /// 报告
        const REPORTING          = 1 << 1;
        /// 恢复
        const RECOVERY           = 1 << 2;
        /// 内容保护
        const CONTENT_PROTECTION = 1 << 3;
        /// 头部压缩
        const HEADER_COMPRESSION = 1 << 4;
        /// 复用
        const MULTIPLEXING       = 1 << 5;
        /// 媒体编解码
        const MEDIA_CODEC        = 1 << 6;
        /// 延迟报告
        const DELAY_REPORTING    = 1 << 7;
    }
}

/// 流端点配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEndpointConfig {
    /// 编解码能力缓冲区
    pub codec_info: [u8; CODEC_INFO_SIZE],
    /// 内容保护信息
    pub protect_info: [u8; PROTECT_INFO_SIZE],
    /// 编解码能力条目数
    pub num_codec: u8,
    /// 内容保护条目数
    pub num_protect: u8,
    /// 服务类别掩码
    pub psc_mask: ServiceCategories,
}

impl StreamEndpointConfig {
    /// 创建空配置
    pub fn new() -> Self {
        Self {
            codec_info: [0; CODEC_INFO_SIZE],
            protect_info: [0; PROTECT_INFO_SIZE],
            num_codec: 0,
            num_protect: 0,
            psc_mask: ServiceCategories::empty(),
        }
    }

    /// 有效的能力缓冲区 (按 LOSC 截取)
    pub fn codec_info(&self) -> &[u8] {
        let len = (usize::from(self.codec_info[0]) + 1).min(CODEC_INFO_SIZE);
        &self.codec_info[..len]
    }

    /// 清除内容保护信息与对应的服务类别
    pub fn clear_protection(&mut self) {
        self.protect_info = [0; PROTECT_INFO_SIZE];
        self.num_protect = 0;
        self.psc_mask.remove(ServiceCategories::CONTENT_PROTECTION);
    }

    /// 追加 SCMS-T 内容保护
    pub fn add_scms_t(&mut self) {
        let id = SCMS_T_ID.to_le_bytes();
        self.protect_info[0] = 2;
        self.protect_info[1] = id[0];
        self.protect_info[2] = id[1];
        self.num_protect = 1;
        self.psc_mask |= ServiceCategories::CONTENT_PROTECTION;
    }
}

impl Default for StreamEndpointConfig {
    fn default() -> Self {
        Self::new()
    }
}
