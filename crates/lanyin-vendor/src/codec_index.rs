//! 编解码器索引.
//!
//! 上层使用的稳定编解码器句柄, 区分源端与接收端实例: 源端 LDAC 与
//! 接收端 LDAC 是两个不同的索引, 尽管它们共享同一个身份键.
//!
//! [`CodecIndex::owner`] 对全部变体做穷尽匹配且不含通配分支. 新增变体
//! 时编译器会要求在这里给出归属, 从而不会被分发层静默忽略.

use std::fmt;

use lanyin_core::VendorCodecKey;

use crate::families;

/// 编解码器方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 源端 (编码发送)
    Source,
    /// 接收端 (接收解码)
    Sink,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Sink => write!(f, "sink"),
        }
    }
}

/// 索引归属
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOwner {
    /// 标准编解码器 (SBC, AAC), 不归厂商注册表管理
    Standard,
    /// 已分配索引但尚未实现
    Unimplemented,
    /// 厂商编解码器族
    Vendor(VendorCodecKey),
}

/// 编解码器索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecIndex {
    // ========================
    // 源端
    // ========================
    /// SBC 源端
    SourceSbc,
    /// AAC 源端
    SourceAac,
    /// aptX 源端
    SourceAptx,
    /// aptX-HD 源端
    SourceAptxHd,
    /// LDAC 源端
    SourceLdac,
    /// LC3 源端
    SourceLc3,
    /// Opus 源端
    SourceOpus,
    /// LHDC V2 源端
    SourceLhdcV2,
    /// LHDC V3 源端
    SourceLhdcV3,
    /// LHDC V5 源端
    SourceLhdcV5,

    // ========================
    // 接收端
    // ========================
    /// SBC 接收端
    SinkSbc,
    /// AAC 接收端
    SinkAac,
    /// LDAC 接收端
    SinkLdac,
    /// Opus 接收端
    SinkOpus,
    /// LHDC V3 接收端
    SinkLhdcV3,
    /// LHDC V5 接收端
    SinkLhdcV5,
}

impl CodecIndex {
    /// 全部索引, 按声明顺序
    pub const ALL: [CodecIndex; 16] = [
        Self::SourceSbc,
        Self::SourceAac,
        Self::SourceAptx,
        Self::SourceAptxHd,
        Self::SourceLdac,
        Self::SourceLc3,
        Self::SourceOpus,
        Self::SourceLhdcV2,
        Self::SourceLhdcV3,
        Self::SourceLhdcV5,
        Self::SinkSbc,
        Self::SinkAac,
        Self::SinkLdac,
        Self::SinkOpus,
        Self::SinkLhdcV3,
        Self::SinkLhdcV5,
    ];

    /// 索引方向
    pub const fn direction(&self) -> Direction {
        match self {
            Self::SourceSbc
            | Self::SourceAac
            | Self::SourceAptx
            | Self::SourceAptxHd
            | Self::SourceLdac
            | Self::SourceLc3
            | Self::SourceOpus
            | Self::SourceLhdcV2
            | Self::SourceLhdcV3
            | Self::SourceLhdcV5 => Direction::Source,

            Self::SinkSbc
            | Self::SinkAac
            | Self::SinkLdac
            | Self::SinkOpus
            | Self::SinkLhdcV3
            | Self::SinkLhdcV5 => Direction::Sink,
        }
    }

    /// 索引归属
    pub const fn owner(&self) -> IndexOwner {
        match self {
            Self::SourceSbc | Self::SinkSbc | Self::SourceAac | Self::SinkAac => {
                IndexOwner::Standard
            }
            Self::SourceLc3 => IndexOwner::Unimplemented,
            Self::SourceAptx => IndexOwner::Vendor(families::APTX_KEY),
            Self::SourceAptxHd => IndexOwner::Vendor(families::APTX_HD_KEY),
            Self::SourceLdac | Self::SinkLdac => IndexOwner::Vendor(families::LDAC_KEY),
            Self::SourceOpus | Self::SinkOpus => IndexOwner::Vendor(families::OPUS_KEY),
            Self::SourceLhdcV2 => IndexOwner::Vendor(families::LHDCV2_KEY),
            Self::SourceLhdcV3 | Self::SinkLhdcV3 => IndexOwner::Vendor(families::LHDCV3_KEY),
            Self::SourceLhdcV5 | Self::SinkLhdcV5 => IndexOwner::Vendor(families::LHDCV5_KEY),
        }
    }

    /// 机器可读名称
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SourceSbc => "source_sbc",
            Self::SourceAac => "source_aac",
            Self::SourceAptx => "source_aptx",
            Self::SourceAptxHd => "source_aptx_hd",
            Self::SourceLdac => "source_ldac",
            Self::SourceLc3 => "source_lc3",
            Self::SourceOpus => "source_opus",
            Self::SourceLhdcV2 => "source_lhdcv2",
            Self::SourceLhdcV3 => "source_lhdcv3",
            Self::SourceLhdcV5 => "source_lhdcv5",
            Self::SinkSbc => "sink_sbc",
            Self::SinkAac => "sink_aac",
            Self::SinkLdac => "sink_ldac",
            Self::SinkOpus => "sink_opus",
            Self::SinkLhdcV3 => "sink_lhdcv3",
            Self::SinkLhdcV5 => "sink_lhdcv5",
        }
    }

    /// 按机器可读名称查找索引
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|index| index.name() == name)
    }

    /// 查找归属于指定身份键和方向的索引
    pub fn for_key(key: VendorCodecKey, direction: Direction) -> Option<Self> {
        Self::ALL.into_iter().find(|index| {
            index.direction() == direction && index.owner() == IndexOwner::Vendor(key)
        })
    }
}

impl fmt::Display for CodecIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_名称往返() {
        for index in CodecIndex::ALL {
            assert_eq!(CodecIndex::from_name(index.name()), Some(index));
        }
        assert_eq!(CodecIndex::from_name("source_mp3"), None);
    }

    #[test]
    fn test_方向与归属() {
        assert_eq!(CodecIndex::SinkLdac.direction(), Direction::Sink);
        assert_eq!(CodecIndex::SourceLhdcV2.direction(), Direction::Source);
        assert_eq!(CodecIndex::SinkAac.owner(), IndexOwner::Standard);
        assert_eq!(CodecIndex::SourceLc3.owner(), IndexOwner::Unimplemented);
        assert_eq!(
            CodecIndex::SourceLdac.owner(),
            CodecIndex::SinkLdac.owner(),
            "源端与接收端 LDAC 共享身份键"
        );
    }

    #[test]
    fn test_按身份键反查索引() {
        assert_eq!(
            CodecIndex::for_key(families::LDAC_KEY, Direction::Sink),
            Some(CodecIndex::SinkLdac)
        );
        assert_eq!(
            CodecIndex::for_key(families::APTX_KEY, Direction::Sink),
            None
        );
        assert_eq!(
            CodecIndex::for_key(families::LHDCV5_KEY, Direction::Source),
            Some(CodecIndex::SourceLhdcV5)
        );
        assert_eq!(
            CodecIndex::for_key(VendorCodecKey::new(0xFFFF_FFFF, 0xFFFF), Direction::Source),
            None
        );
    }
}
