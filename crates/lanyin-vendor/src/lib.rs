//! # lanyin-vendor
//!
//! Lanyin 厂商编解码器注册与分发库.
//!
//! 按能力缓冲区中的 `(vendor_id, codec_id)` 找到所属编解码器族, 并把
//! 合法性, 比较, 轨道参数, 媒体包头部等查询转发给它.
//!
//! ## 内置编解码器族
//!
//! | 编解码器族 | cargo feature | 角色 |
//! |------------|---------------|------|
//! | aptX | `aptx` | 仅源端 |
//! | aptX-HD | `aptx-hd` | 仅源端 |
//! | LDAC | `ldac` | 全部 |
//! | Opus | `opus` | 全部 |
//! | LHDC V2 | `lhdc` | 仅源端 |
//! | LHDC V3/V5 | `lhdc` | 全部 |
//!
//! ## 使用示例
//!
//! ```rust
//! use lanyin_vendor::{CodecIndex, VendorCodecRegistry};
//!
//! const REGISTRY: VendorCodecRegistry = VendorCodecRegistry::builtin();
//!
//! let info = [0x09, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
//! assert!(!REGISTRY.is_valid_local_source_codec(&info));
//! assert_eq!(REGISTRY.bit_rate(&info), -1);
//! assert_eq!(REGISTRY.codec_index_str(CodecIndex::SourceLc3), "LC3 not implemented");
//! ```

pub mod codec;
pub mod codec_index;
pub mod dispatch;
pub mod families;
pub mod interface;
pub mod registry;
pub mod role;

// 重导出常用类型
pub use codec::VendorCodec;
pub use codec_index::{CodecIndex, Direction, IndexOwner};
pub use dispatch::{LC3_NOT_IMPLEMENTED, NOT_APPLICABLE, UNKNOWN_CODEC_INDEX, UNKNOWN_VENDOR_CODEC};
pub use interface::{DecoderInterface, EncoderInterface};
pub use registry::VendorCodecRegistry;
pub use role::{Role, RoleSet};
