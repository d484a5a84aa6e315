//! 媒体类型定义.
//!
//! 对应 AVDTP 媒体编解码能力中的媒体类型字段 (位于字节高 4 位).

use std::fmt;

/// 媒体流类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// 音频流
    Audio,
    /// 视频流
    Video,
    /// 多媒体流
    Multimedia,
    /// 保留值
    Reserved(u8),
}

impl MediaType {
    /// 从 4 位媒体类型值解析
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::Audio,
            0x01 => Self::Video,
            0x02 => Self::Multimedia,
            v => Self::Reserved(v),
        }
    }

    /// 转换为 4 位媒体类型值
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::Audio => 0x00,
            Self::Video => 0x01,
            Self::Multimedia => 0x02,
            Self::Reserved(v) => *v,
        }
    }

    /// 从能力缓冲区中的媒体类型字节解析 (取高 4 位)
    pub const fn from_octet(octet: u8) -> Self {
        Self::from_u8(octet >> 4)
    }

    /// 转换为能力缓冲区中的媒体类型字节
    pub const fn to_octet(&self) -> u8 {
        self.as_u8() << 4
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "音频"),
            Self::Video => write!(f, "视频"),
            Self::Multimedia => write!(f, "多媒体"),
            Self::Reserved(v) => write!(f, "保留(0x{v:x})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_媒体类型字节高4位() {
        assert_eq!(MediaType::from_octet(0x00), MediaType::Audio);
        assert_eq!(MediaType::from_octet(0x10), MediaType::Video);
        assert_eq!(MediaType::Audio.to_octet(), 0x00);
        assert_eq!(MediaType::Multimedia.to_octet(), 0x20);
        assert_eq!(MediaType::from_octet(0x70), MediaType::Reserved(0x07));
    }
}
