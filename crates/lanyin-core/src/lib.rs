//! # lanyin-core
//!
//! Lanyin A2DP 编解码器框架核心库, 提供能力缓冲区字段访问、错误处理
//! 与协商层共用的基础类型.
//!
//! 能力缓冲区中厂商身份字段的字节布局只在 [`codec_info`] 中解释,
//! 其余 crate 一律通过 [`VendorCodecKey`] 使用解码后的身份键.

pub mod channel_layout;
pub mod codec_info;
pub mod error;
pub mod media_packet;
pub mod media_type;
pub mod stream_config;

// 重导出常用类型
pub use channel_layout::SinkChannelType;
pub use codec_info::{CodecType, VendorCodecKey};
pub use error::{A2dpError, A2dpResult};
pub use media_packet::MediaPacket;
pub use media_type::MediaType;
pub use stream_config::{ServiceCategories, StreamEndpointConfig};
