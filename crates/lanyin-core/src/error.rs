//! 统一错误类型定义.
//!
//! 所有 Lanyin crate 共用的错误类型. 能力缓冲区解析失败, 字段越界读取
//! 等都以类型化错误返回, 不会 panic.

use thiserror::Error;

/// Lanyin 统一错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum A2dpError {
    /// 缓冲区过短, 无法读取所需字段
    #[error("缓冲区过短: 需要 {needed} 字节, 实际 {actual} 字节")]
    TruncatedBuffer {
        /// 所需的最小长度
        needed: usize,
        /// 实际长度
        actual: usize,
    },

    /// LOSC (能力长度字段) 与编解码器定义不符
    #[error("能力长度错误: 期望 {expected}, 实际 {actual}")]
    BadLength {
        /// 编解码器要求的 LOSC
        expected: u8,
        /// 缓冲区中的 LOSC
        actual: u8,
    },

    /// 媒体类型不是音频
    #[error("错误的媒体类型: 0x{0:02x}")]
    WrongMediaType(u8),

    /// 编解码器类型错误 (例如不是厂商编解码器)
    #[error("错误的编解码器类型: 0x{0:02x}")]
    WrongCodecType(u8),

    /// 厂商标识与编解码器标识不属于当前编解码器族
    #[error("错误的编解码器: vendor_id=0x{vendor_id:08x} codec_id=0x{codec_id:04x}")]
    WrongCodec {
        /// 厂商标识
        vendor_id: u32,
        /// 编解码器标识
        codec_id: u16,
    },

    /// 采样率字段无效
    #[error("无效采样率: 0x{0:02x}")]
    BadSampleRate(u8),

    /// 声道模式字段无效
    #[error("无效声道模式: 0x{0:02x}")]
    BadChannelMode(u8),

    /// 位深字段无效
    #[error("无效位深: 0x{0:02x}")]
    BadBitsPerSample(u8),

    /// 帧长字段无效
    #[error("无效帧长: 0x{0:02x}")]
    BadFrameSize(u8),

    /// 码率字段无效
    #[error("无效码率: 0x{0:02x}")]
    BadBitRate(u8),

    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 媒体包头部空间不足, 无法写入编解码器头
    #[error("头部空间不足: 需要 {needed} 字节, 剩余 {available} 字节")]
    NoHeadroom {
        /// 需要的头部长度
        needed: usize,
        /// 剩余的头部空间
        available: usize,
    },
}

/// Lanyin 统一 Result 类型
pub type A2dpResult<T> = Result<T, A2dpError>;
