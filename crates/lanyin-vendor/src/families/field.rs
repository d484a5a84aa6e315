//! 编解码器族共用的字段辅助函数.

use byteorder::{ByteOrder, LittleEndian};
use lanyin_core::{A2dpResult, MediaPacket};

/// 校验位域字段
///
/// 能力 (`is_capability`) 至少置位一个已知位, 配置必须恰好置位一个.
/// 返回屏蔽未知位之后的值.
pub(crate) fn select_bits(value: u8, known: u8, is_capability: bool) -> Option<u8> {
    let bits = value & known;
    let ok = if is_capability {
        bits != 0
    } else {
        bits.count_ones() == 1
    };
    ok.then_some(bits)
}

/// 先按配置解析, 失败再按能力解析
pub(crate) fn parse_any<T>(parse: impl Fn(bool) -> A2dpResult<T>) -> A2dpResult<T> {
    parse(false).or_else(|_| parse(true))
}

/// 清除字节中 `keep` 之外的位, 返回是否有改动
pub(crate) fn retain_bits(byte: &mut u8, keep: u8) -> bool {
    let before = *byte;
    *byte &= keep;
    before != *byte
}

/// 读取负载开头的 32 位小端时间戳
pub(crate) fn read_timestamp(data: &[u8]) -> Option<u32> {
    (data.len() >= 4).then(|| LittleEndian::read_u32(&data[..4]))
}

/// 写入只携带帧数的媒体负载头部
///
/// 头部第一个字节低位为帧数, 其余字节清零. 帧数超出 `max_frames`
/// 或头部空间不足时返回 `false`.
pub(crate) fn write_frame_count_header(
    packet: &mut MediaPacket,
    header_len: usize,
    frames_per_packet: u16,
    max_frames: u16,
) -> bool {
    if frames_per_packet > max_frames {
        log::debug!("每包帧数 {frames_per_packet} 超出上限 {max_frames}");
        return false;
    }
    match packet.prepend(header_len) {
        Ok(header) => {
            header.fill(0);
            header[0] = frames_per_packet as u8;
            true
        }
        Err(err) => {
            log::debug!("写入编解码器头部失败: {err}");
            false
        }
    }
}

/// 把位域字段格式化为 `名称列表 (0x..)`
pub(crate) fn describe_bits(value: u8, table: &[(u8, &str)]) -> String {
    let names: Vec<&str> = table
        .iter()
        .filter(|(bit, _)| value & bit != 0)
        .map(|(_, name)| *name)
        .collect();
    let names = if names.is_empty() {
        "NONE".to_string()
    } else {
        names.join(" ")
    };
    format!("{names} (0x{value:02x})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_位域能力与配置语义() {
        assert_eq!(select_bits(0x30, 0x30, true), Some(0x30));
        assert_eq!(select_bits(0x30, 0x30, false), None);
        assert_eq!(select_bits(0x20, 0x30, false), Some(0x20));
        assert_eq!(select_bits(0xC0, 0x30, true), None);
        assert_eq!(select_bits(0x00, 0x30, true), None);
    }

    #[test]
    fn test_时间戳读取() {
        assert_eq!(read_timestamp(&[0x78, 0x56, 0x34, 0x12, 0xFF]), Some(0x1234_5678));
        assert_eq!(read_timestamp(&[0x01, 0x02, 0x03]), None);
    }

    #[test]
    fn test_帧数头部() {
        let mut pkt = MediaPacket::with_headroom(2, &[0xEE]);
        assert!(write_frame_count_header(&mut pkt, 1, 5, 15));
        assert_eq!(pkt.data(), &[0x05, 0xEE]);
        assert!(!write_frame_count_header(&mut pkt, 1, 16, 15));
        assert!(!write_frame_count_header(&mut pkt, 2, 1, 15));
        assert_eq!(pkt.data(), &[0x05, 0xEE]);
    }

    #[test]
    fn test_位域描述() {
        let table = [(0x20, "44100"), (0x10, "48000")];
        assert_eq!(describe_bits(0x30, &table), "44100 48000 (0x30)");
        assert_eq!(describe_bits(0x00, &table), "NONE (0x00)");
    }
}
