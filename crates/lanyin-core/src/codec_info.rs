//! 编解码器能力缓冲区 (codec info) 字段访问.
//!
//! 能力缓冲区布局:
//!
//! | 偏移 | 长度 | 含义 |
//! |------|------|------|
//! | 0 | 1 | LOSC, 其后字节数 |
//! | 1 | 1 | 媒体类型 (高 4 位) |
//! | 2 | 1 | 编解码器类型, 厂商编解码器为 `0xFF` |
//! | 3 | 4 | 厂商标识 (小端) |
//! | 7 | 2 | 编解码器标识 (小端) |
//! | 9 | - | 编解码器族私有字段 |
//!
//! 本模块是唯一解释厂商身份字节布局的地方. 所有读取都先做长度检查,
//! 缓冲区过短时返回 [`A2dpError::TruncatedBuffer`].

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::media_type::MediaType;
use crate::{A2dpError, A2dpResult};

/// LOSC 字段偏移
pub const LOSC_IDX: usize = 0;
/// 媒体类型字段偏移
pub const MEDIA_TYPE_IDX: usize = 1;
/// 编解码器类型字段偏移
pub const CODEC_TYPE_IDX: usize = 2;
/// 厂商标识起始偏移
pub const VENDOR_ID_START_IDX: usize = 3;
/// 编解码器标识起始偏移
pub const CODEC_ID_START_IDX: usize = 7;
/// 厂商编解码器公共头部长度, 族私有字段从此处开始
pub const VENDOR_HEADER_LEN: usize = 9;
/// 端点配置中能力缓冲区的最大长度
pub const CODEC_INFO_SIZE: usize = 20;

/// 编解码器类型
///
/// 标准编解码器 (SBC, AAC 等) 走协议定义的识别路径, 只有 `NonA2dp`
/// 类型的缓冲区才携带厂商标识.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecType {
    /// SBC
    Sbc,
    /// MPEG-1,2 Audio
    Mpeg12,
    /// MPEG-2,4 AAC
    Aac,
    /// MPEG-D USAC
    Usac,
    /// ATRAC 系列
    Atrac,
    /// 厂商自定义编解码器
    NonA2dp,
    /// 保留值
    Reserved(u8),
}

impl CodecType {
    /// 从编解码器类型字节解析
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::Sbc,
            0x01 => Self::Mpeg12,
            0x02 => Self::Aac,
            0x03 => Self::Usac,
            0x04 => Self::Atrac,
            0xFF => Self::NonA2dp,
            v => Self::Reserved(v),
        }
    }

    /// 转换为编解码器类型字节
    pub const fn as_u8(&self) -> u8 {
        match self {
            Self::Sbc => 0x00,
            Self::Mpeg12 => 0x01,
            Self::Aac => 0x02,
            Self::Usac => 0x03,
            Self::Atrac => 0x04,
            Self::NonA2dp => 0xFF,
            Self::Reserved(v) => *v,
        }
    }
}

/// 厂商编解码器身份键
///
/// 在厂商编解码器空间内唯一标识一个编解码器族.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VendorCodecKey {
    /// 厂商标识
    pub vendor_id: u32,
    /// 编解码器标识
    pub codec_id: u16,
}

impl VendorCodecKey {
    /// 创建身份键
    pub const fn new(vendor_id: u32, codec_id: u16) -> Self {
        Self {
            vendor_id,
            codec_id,
        }
    }

    /// 从能力缓冲区读取身份键
    pub fn from_codec_info(codec_info: &[u8]) -> A2dpResult<Self> {
        Ok(Self {
            vendor_id: vendor_id(codec_info)?,
            codec_id: codec_id(codec_info)?,
        })
    }
}

impl fmt::Display for VendorCodecKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}:0x{:04x}", self.vendor_id, self.codec_id)
    }
}

/// 检查缓冲区至少有 `needed` 字节
pub fn ensure_len(codec_info: &[u8], needed: usize) -> A2dpResult<()> {
    if codec_info.len() < needed {
        return Err(A2dpError::TruncatedBuffer {
            needed,
            actual: codec_info.len(),
        });
    }
    Ok(())
}

/// 读取 LOSC 字段
pub fn losc(codec_info: &[u8]) -> A2dpResult<u8> {
    ensure_len(codec_info, LOSC_IDX + 1)?;
    Ok(codec_info[LOSC_IDX])
}

/// 读取媒体类型
pub fn media_type(codec_info: &[u8]) -> A2dpResult<MediaType> {
    ensure_len(codec_info, MEDIA_TYPE_IDX + 1)?;
    Ok(MediaType::from_octet(codec_info[MEDIA_TYPE_IDX]))
}

/// 读取编解码器类型
pub fn codec_type(codec_info: &[u8]) -> A2dpResult<CodecType> {
    ensure_len(codec_info, CODEC_TYPE_IDX + 1)?;
    Ok(CodecType::from_u8(codec_info[CODEC_TYPE_IDX]))
}

/// 读取厂商标识 (4 字节小端)
pub fn vendor_id(codec_info: &[u8]) -> A2dpResult<u32> {
    ensure_len(codec_info, VENDOR_ID_START_IDX + 4)?;
    Ok(LittleEndian::read_u32(
        &codec_info[VENDOR_ID_START_IDX..VENDOR_ID_START_IDX + 4],
    ))
}

/// 读取编解码器标识 (2 字节小端)
pub fn codec_id(codec_info: &[u8]) -> A2dpResult<u16> {
    ensure_len(codec_info, CODEC_ID_START_IDX + 2)?;
    Ok(LittleEndian::read_u16(
        &codec_info[CODEC_ID_START_IDX..CODEC_ID_START_IDX + 2],
    ))
}

/// 判断缓冲区是否为厂商编解码器类型
///
/// 缓冲区过短时视为非厂商编解码器.
pub fn is_vendor_codec(codec_info: &[u8]) -> bool {
    matches!(codec_type(codec_info), Ok(CodecType::NonA2dp))
}

/// 校验厂商编解码器公共头部
///
/// 依次检查: 长度, LOSC, 媒体类型, 编解码器类型, 身份键.
/// 各编解码器族解析私有字段之前都先调用此函数.
pub fn check_vendor_header(codec_info: &[u8], losc: u8, key: VendorCodecKey) -> A2dpResult<()> {
    ensure_len(codec_info, VENDOR_HEADER_LEN)?;
    let actual = codec_info[LOSC_IDX];
    if actual != losc {
        return Err(A2dpError::BadLength {
            expected: losc,
            actual,
        });
    }
    ensure_len(codec_info, usize::from(losc) + 1)?;

    let media = codec_info[MEDIA_TYPE_IDX];
    if MediaType::from_octet(media) != MediaType::Audio {
        return Err(A2dpError::WrongMediaType(media));
    }
    let ty = codec_info[CODEC_TYPE_IDX];
    if CodecType::from_u8(ty) != CodecType::NonA2dp {
        return Err(A2dpError::WrongCodecType(ty));
    }

    let found = VendorCodecKey::from_codec_info(codec_info)?;
    if found != key {
        return Err(A2dpError::WrongCodec {
            vendor_id: found.vendor_id,
            codec_id: found.codec_id,
        });
    }
    Ok(())
}

/// 写入厂商编解码器公共头部
///
/// `out` 至少需要 `losc + 1` 字节, 返回写入的总长度.
pub fn write_vendor_header(
    out: &mut [u8],
    losc: u8,
    media_type: MediaType,
    key: VendorCodecKey,
) -> A2dpResult<usize> {
    let total = usize::from(losc) + 1;
    if out.len() < total || total < VENDOR_HEADER_LEN {
        return Err(A2dpError::InvalidArgument(format!(
            "能力缓冲区长度 {} 不足以容纳 LOSC={losc}",
            out.len()
        )));
    }
    out[LOSC_IDX] = losc;
    out[MEDIA_TYPE_IDX] = media_type.to_octet();
    out[CODEC_TYPE_IDX] = CodecType::NonA2dp.as_u8();
    LittleEndian::write_u32(
        &mut out[VENDOR_ID_START_IDX..VENDOR_ID_START_IDX + 4],
        key.vendor_id,
    );
    LittleEndian::write_u16(
        &mut out[CODEC_ID_START_IDX..CODEC_ID_START_IDX + 2],
        key.codec_id,
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> [u8; 10] {
        [0x09, 0x00, 0xFF, 0x4F, 0x00, 0x00, 0x00, 0x01, 0x00, 0x22]
    }

    #[test]
    fn test_小端读取厂商与编解码器标识() {
        let info = [0x0A, 0x00, 0xFF, 0x2D, 0x01, 0x00, 0x00, 0xAA, 0x00, 0x04, 0x01];
        assert_eq!(vendor_id(&info).unwrap(), 0x0000_012D);
        assert_eq!(codec_id(&info).unwrap(), 0x00AA);
        assert_eq!(
            VendorCodecKey::from_codec_info(&info).unwrap(),
            VendorCodecKey::new(0x12D, 0xAA)
        );
    }

    #[test]
    fn test_过短缓冲区返回截断错误() {
        let info = [0x09, 0x00, 0xFF, 0x4F, 0x00];
        assert_eq!(
            vendor_id(&info),
            Err(A2dpError::TruncatedBuffer {
                needed: 7,
                actual: 5
            })
        );
        assert_eq!(
            codec_id(&sample()[..8]),
            Err(A2dpError::TruncatedBuffer {
                needed: 9,
                actual: 8
            })
        );
        assert!(codec_type(&[]).is_err());
        assert!(!is_vendor_codec(&[0x09, 0x00]));
    }

    #[test]
    fn test_公共头部校验() {
        let key = VendorCodecKey::new(0x4F, 0x01);
        assert!(check_vendor_header(&sample(), 9, key).is_ok());

        let mut bad = sample();
        bad[LOSC_IDX] = 8;
        assert_eq!(
            check_vendor_header(&bad, 9, key),
            Err(A2dpError::BadLength {
                expected: 9,
                actual: 8
            })
        );

        let mut bad = sample();
        bad[CODEC_TYPE_IDX] = 0x00;
        assert_eq!(
            check_vendor_header(&bad, 9, key),
            Err(A2dpError::WrongCodecType(0x00))
        );

        let mut bad = sample();
        bad[MEDIA_TYPE_IDX] = 0x10;
        assert_eq!(
            check_vendor_header(&bad, 9, key),
            Err(A2dpError::WrongMediaType(0x10))
        );

        assert!(matches!(
            check_vendor_header(&sample(), 9, VendorCodecKey::new(0x4F, 0x02)),
            Err(A2dpError::WrongCodec { .. })
        ));

        // LOSC 声明的长度超出实际缓冲区
        assert!(matches!(
            check_vendor_header(&sample()[..9], 9, key),
            Err(A2dpError::TruncatedBuffer { .. })
        ));
    }

    #[test]
    fn test_写入公共头部() {
        let mut out = [0u8; CODEC_INFO_SIZE];
        let key = VendorCodecKey::new(0x053A, 0x4C33);
        let len = write_vendor_header(&mut out, 11, MediaType::Audio, key).unwrap();
        assert_eq!(len, 12);
        assert_eq!(&out[..9], &[11, 0x00, 0xFF, 0x3A, 0x05, 0x00, 0x00, 0x33, 0x4C]);
        assert_eq!(VendorCodecKey::from_codec_info(&out).unwrap(), key);

        let mut small = [0u8; 4];
        assert!(write_vendor_header(&mut small, 9, MediaType::Audio, key).is_err());
    }

    #[test]
    fn test_身份键显示格式() {
        let key = VendorCodecKey::new(0x4F, 0x01);
        assert_eq!(key.to_string(), "0x0000004f:0x0001");
    }
}
