//! lanyin-probe - A2DP 能力缓冲区探测工具
//!
//! 解析十六进制能力缓冲区, 对内置注册表执行全部查询并输出结果;
//! 也可以列出内置编解码器族, 或打印编解码器索引的默认端点配置.

mod logging;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use serde::Serialize;

use lanyin_core::StreamEndpointConfig;
use lanyin_vendor::{CodecIndex, Direction, NOT_APPLICABLE, Role, VendorCodecRegistry};

const REGISTRY: VendorCodecRegistry = VendorCodecRegistry::builtin();

/// Lanyin A2DP 能力缓冲区探测工具
#[derive(Parser, Debug)]
#[command(name = "lanyin-probe", version, about = "A2DP 厂商编解码器能力探测工具")]
struct Cli {
    /// 十六进制能力缓冲区 (可含空格, ':' 与 0x 前缀)
    input: Option<String>,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 列出内置编解码器族
    #[arg(long)]
    list_families: bool,

    /// 打印编解码器索引的默认端点配置 (如 source_ldac)
    #[arg(long, value_name = "NAME")]
    index: Option<String>,

    /// 查询 RTP 头策略时假定已启用内容保护
    #[arg(long)]
    content_protection: bool,

    /// 日志配置文件 (JSON)
    #[arg(long, value_name = "PATH")]
    log_config: Option<PathBuf>,

    /// 日志级别 (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================
// JSON 输出结构体
// ============================================================

/// 单个能力缓冲区的探测结果
#[derive(Serialize)]
struct CodecReport {
    codec_info: String,
    codec_type: String,
    vendor_id: String,
    codec_id: String,
    name: &'static str,
    valid: RoleReport,
    local_sink_supported: bool,
    peer_source_supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bit_rate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bits_per_sample: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channels: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sink_channel_type: Option<i32>,
    uses_rtp_header: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sink_index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decoder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjusted: Option<String>,
    info: String,
}

/// 四种角色下的合法性
#[derive(Serialize)]
struct RoleReport {
    local_source: bool,
    local_sink: bool,
    peer_source: bool,
    peer_sink: bool,
}

/// 编解码器族信息
#[derive(Serialize)]
struct FamilyReport {
    name: &'static str,
    key: String,
    roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_index: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sink_index: Option<&'static str>,
}

/// 默认端点配置
#[derive(Serialize)]
struct ConfigReport {
    index: String,
    display_name: &'static str,
    codec_info: String,
    num_codec: u8,
    num_protect: u8,
    protect_info: String,
    psc_mask: u16,
}

// ============================================================
// 主逻辑
// ============================================================

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = match &cli.log_config {
        Some(path) => logging::LoggingConfig::load(path)?,
        None => logging::LoggingConfig::default(),
    };
    logging::init(&log_config, cli.verbose)?;
    tracing::debug!("已编译的编解码器族: {REGISTRY:?}");

    if cli.list_families {
        return print_output(list_families().as_slice(), cli.json, print_families);
    }

    if let Some(name) = &cli.index {
        let report = default_config(name)?;
        return print_output(&report, cli.json, print_config);
    }

    let Some(input) = &cli.input else {
        print_banner();
        return Ok(());
    };

    let mut codec_info = parse_hex(input)?;
    let report = probe(&mut codec_info, cli.content_protection);
    print_output(&report, cli.json, print_report)
}

/// 解析十六进制输入
fn parse_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let cleaned: String = input
        .split_whitespace()
        .flat_map(|part| part.split(':'))
        .map(|part| part.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();
    let bytes = hex::decode(&cleaned).with_context(|| format!("无效的十六进制输入: {input}"))?;
    if bytes.is_empty() {
        bail!("能力缓冲区为空");
    }
    Ok(bytes)
}

/// -1 表示不适用, 输出时省略
fn applicable(value: i32) -> Option<i32> {
    (value != NOT_APPLICABLE).then_some(value)
}

/// 对能力缓冲区执行全部查询
fn probe(codec_info: &mut [u8], content_protection: bool) -> CodecReport {
    let info: &[u8] = codec_info;
    let report = CodecReport {
        codec_info: hex::encode(info),
        codec_type: REGISTRY
            .codec_type(info)
            .map(|ty| format!("{ty:?}"))
            .unwrap_or_else(|err| err.to_string()),
        vendor_id: REGISTRY
            .vendor_id(info)
            .map(|id| format!("0x{id:08x}"))
            .unwrap_or_else(|err| err.to_string()),
        codec_id: REGISTRY
            .codec_id(info)
            .map(|id| format!("0x{id:04x}"))
            .unwrap_or_else(|err| err.to_string()),
        name: REGISTRY.codec_name(info),
        valid: RoleReport {
            local_source: REGISTRY.is_valid_for(Role::LocalSource, info),
            local_sink: REGISTRY.is_valid_for(Role::LocalSink, info),
            peer_source: REGISTRY.is_valid_for(Role::PeerSource, info),
            peer_sink: REGISTRY.is_valid_for(Role::PeerSink, info),
        },
        local_sink_supported: REGISTRY.is_local_sink_codec_supported(info),
        peer_source_supported: REGISTRY.is_peer_source_codec_supported(info),
        bit_rate: applicable(REGISTRY.bit_rate(info)),
        sample_rate: applicable(REGISTRY.track_sample_rate(info)),
        bits_per_sample: applicable(REGISTRY.track_bits_per_sample(info)),
        channels: applicable(REGISTRY.track_channel_count(info)),
        sink_channel_type: applicable(REGISTRY.sink_track_channel_type(info)),
        uses_rtp_header: REGISTRY.uses_rtp_header(content_protection, info),
        source_index: REGISTRY.source_codec_index(info).map(|i| i.to_string()),
        sink_index: REGISTRY.sink_codec_index(info).map(|i| i.to_string()),
        encoder: REGISTRY.encoder_interface(info).map(|e| e.name),
        decoder: REGISTRY.decoder_interface(info).map(|d| d.name),
        adjusted: None,
        info: REGISTRY.codec_info_string(info),
    };

    let adjusted = REGISTRY
        .adjust_codec(codec_info)
        .then(|| hex::encode(&*codec_info));
    CodecReport { adjusted, ..report }
}

/// 列出内置编解码器族
fn list_families() -> Vec<FamilyReport> {
    REGISTRY
        .families()
        .iter()
        .map(|family| FamilyReport {
            name: family.name(),
            key: family.key().to_string(),
            roles: Role::ALL
                .iter()
                .filter(|role| family.roles().supports(**role))
                .map(|role| role.to_string())
                .collect(),
            source_index: family.index_str(Direction::Source),
            sink_index: family.index_str(Direction::Sink),
        })
        .collect()
}

/// 编解码器索引的默认端点配置
fn default_config(name: &str) -> anyhow::Result<ConfigReport> {
    let Some(index) = CodecIndex::from_name(name) else {
        let names: Vec<&str> = CodecIndex::ALL.iter().map(|i| i.name()).collect();
        bail!("未知的编解码器索引 '{name}', 可选: {}", names.join(", "));
    };
    let cfg = REGISTRY
        .default_codec_config(index)
        .with_context(|| format!("编解码器索引 {index} 没有厂商默认配置"))?;
    Ok(config_report(index, &cfg))
}

fn config_report(index: CodecIndex, cfg: &StreamEndpointConfig) -> ConfigReport {
    let protect_len = if cfg.num_protect > 0 {
        usize::from(cfg.protect_info[0]) + 1
    } else {
        0
    };
    ConfigReport {
        index: index.to_string(),
        display_name: REGISTRY.codec_index_str(index),
        codec_info: hex::encode(cfg.codec_info()),
        num_codec: cfg.num_codec,
        num_protect: cfg.num_protect,
        protect_info: hex::encode(&cfg.protect_info[..protect_len]),
        psc_mask: cfg.psc_mask.bits(),
    }
}

// ============================================================
// 输出
// ============================================================

fn print_output<T: Serialize + ?Sized>(
    value: &T,
    json: bool,
    print_text: fn(&T),
) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(value).context("序列化输出失败")?;
        println!("{text}");
    } else {
        print_text(value);
    }
    Ok(())
}

fn print_report(report: &CodecReport) {
    println!("[CODEC]");
    println!("codec_info={}", report.codec_info);
    println!("codec_type={}", report.codec_type);
    println!("vendor_id={}", report.vendor_id);
    println!("codec_id={}", report.codec_id);
    println!("name={}", report.name);
    println!(
        "valid=local_source:{} local_sink:{} peer_source:{} peer_sink:{}",
        report.valid.local_source,
        report.valid.local_sink,
        report.valid.peer_source,
        report.valid.peer_sink,
    );
    println!("local_sink_supported={}", report.local_sink_supported);
    println!("peer_source_supported={}", report.peer_source_supported);
    let numbers = [
        ("bit_rate", report.bit_rate),
        ("sample_rate", report.sample_rate),
        ("bits_per_sample", report.bits_per_sample),
        ("channels", report.channels),
        ("sink_channel_type", report.sink_channel_type),
    ];
    for (key, value) in numbers {
        match value {
            Some(v) => println!("{key}={v}"),
            None => println!("{key}=N/A"),
        }
    }
    println!("uses_rtp_header={}", report.uses_rtp_header);
    if let Some(index) = &report.source_index {
        println!("source_index={index}");
    }
    if let Some(index) = &report.sink_index {
        println!("sink_index={index}");
    }
    if let Some(name) = report.encoder {
        println!("encoder={name}");
    }
    if let Some(name) = report.decoder {
        println!("decoder={name}");
    }
    if let Some(adjusted) = &report.adjusted {
        println!("adjusted={adjusted}");
    }
    println!("[/CODEC]");
    print!("{}", report.info);
    if !report.info.ends_with('\n') {
        println!();
    }
}

fn print_families(families: &[FamilyReport]) {
    for family in families {
        println!(
            "{:<10} {}  roles: {}",
            family.name,
            family.key,
            family.roles.join(", ")
        );
        if let Some(name) = family.source_index {
            println!("{:<10} source: {name}", "");
        }
        if let Some(name) = family.sink_index {
            println!("{:<10} sink:   {name}", "");
        }
    }
}

fn print_config(report: &ConfigReport) {
    println!("[ENDPOINT_CONFIG]");
    println!("index={}", report.index);
    println!("display_name={}", report.display_name);
    println!("codec_info={}", report.codec_info);
    println!("num_codec={}", report.num_codec);
    println!("num_protect={}", report.num_protect);
    if !report.protect_info.is_empty() {
        println!("protect_info={}", report.protect_info);
    }
    println!("psc_mask=0x{:04x}", report.psc_mask);
    println!("[/ENDPOINT_CONFIG]");
}

fn print_banner() {
    println!(
        "lanyin-probe 版本 {} -- A2DP 厂商编解码器能力探测工具",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("用法: lanyin-probe [选项] <十六进制能力缓冲区>");
    println!();
    println!("选项:");
    println!("  --json                 输出 JSON 格式");
    println!("  --list-families        列出内置编解码器族");
    println!("  --index <NAME>         打印编解码器索引的默认端点配置");
    println!("  --content-protection   假定已启用内容保护 (aptX 由编译期 SCMS-T 开关决定)");
    println!("  --log-config <PATH>    日志配置文件 (JSON)");
    println!("  -v, -vv                提升日志级别");
    println!();
    println!("示例:");
    println!("  lanyin-probe 0a00ff2d010000aa001001");
    println!("  lanyin-probe --index sink_ldac --json");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_十六进制输入清理() {
        assert_eq!(parse_hex("0a 00:ff").unwrap(), vec![0x0A, 0x00, 0xFF]);
        assert_eq!(parse_hex("0x0A0B").unwrap(), vec![0x0A, 0x0B]);
        assert!(parse_hex("zz").is_err());
        assert!(parse_hex("   ").is_err());
    }

    #[test]
    fn test_探测ldac配置() {
        let mut info = parse_hex("0a00ff2d010000aa001001").unwrap();
        let report = probe(&mut info, false);
        assert_eq!(report.name, "LDAC");
        assert!(report.valid.local_source);
        assert_eq!(report.bit_rate, Some(990_000));
        assert_eq!(report.source_index.as_deref(), Some("source_ldac"));
        assert_eq!(report.decoder, Some("LDAC"));
        assert!(report.adjusted.is_none());
    }

    #[test]
    fn test_探测未知编解码器() {
        let mut info = parse_hex("0900ffffffffffffff00").unwrap();
        let report = probe(&mut info, false);
        assert_eq!(report.name, "UNKNOWN VENDOR CODEC");
        assert_eq!(report.bit_rate, None);
        assert!(report.uses_rtp_header);
        assert!(!report.valid.peer_sink);
    }

    #[test]
    fn test_默认配置报告() {
        let report = default_config("sink_lhdcv5").unwrap();
        assert_eq!(report.display_name, "LHDC V5 SINK");
        assert_eq!(report.num_codec, 1);
        assert!(default_config("source_sbc").is_err());
        assert!(default_config("bogus").is_err());
    }

    #[test]
    fn test_列出编解码器族() {
        let families = list_families();
        assert_eq!(families.len(), 7);
        let aptx = families.iter().find(|f| f.name == "aptX").unwrap();
        assert_eq!(aptx.roles, vec!["local-source", "peer-sink"]);
        assert_eq!(aptx.sink_index, None);
    }

    #[test]
    fn test_编解码器族列表输出() {
        let families = list_families();
        assert!(print_output(families.as_slice(), true, print_families).is_ok());
        assert!(print_output(families.as_slice(), false, print_families).is_ok());
        assert!(print_output(&families[..0], false, print_families).is_ok());
    }
}
