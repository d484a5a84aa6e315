//! # Lanyin (蓝音)
//!
//! 纯 Rust 实现的 A2DP 厂商编解码器能力注册表与分发引擎.
//!
//! 蓝牙音频协商时, 厂商编解码器由能力缓冲区中的 `(vendor_id, codec_id)`
//! 标识. Lanyin 负责:
//! - **字段访问**: 从能力缓冲区安全读取厂商身份
//! - **注册表**: 按身份键找到编解码器族, 每个族声明自己支持的角色
//! - **查询分发**: 合法性, 比较, 轨道参数, RTP 头策略, 媒体包头部等
//! - **编解码器索引**: 显示名称与默认端点配置
//!
//! # 快速开始
//!
//! ```rust
//! use lanyin::vendor::CodecIndex;
//!
//! let registry = lanyin::vendor_registry();
//! for index in CodecIndex::ALL {
//!     println!("{index}: {}", registry.codec_index_str(index));
//! }
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `lanyin-core` | 能力缓冲区字段访问, 错误类型, 媒体包, 端点配置 |
//! | `lanyin-vendor` | 编解码器族, 注册表与查询分发 |

/// 核心类型与字段访问
pub use lanyin_core as core;

/// 厂商编解码器注册表与分发
pub use lanyin_vendor as vendor;

static VENDOR_REGISTRY: lanyin_vendor::VendorCodecRegistry =
    lanyin_vendor::VendorCodecRegistry::builtin();

/// 获取 Lanyin 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 包含全部已编译编解码器族的注册表
pub fn vendor_registry() -> &'static lanyin_vendor::VendorCodecRegistry {
    &VENDOR_REGISTRY
}
