//! 编解码器索引集成测试.
//!
//! 索引名称与默认端点配置对全部索引都有定义, 且默认配置能被所属
//! 编解码器族解析回同一个索引.

#![cfg(all(
    feature = "aptx",
    feature = "aptx-hd",
    feature = "ldac",
    feature = "opus",
    feature = "lhdc"
))]

use lanyin::core::{ServiceCategories, StreamEndpointConfig};
use lanyin::vendor::{
    CodecIndex, Direction, IndexOwner, LC3_NOT_IMPLEMENTED, UNKNOWN_CODEC_INDEX,
    VendorCodecRegistry,
};

const REGISTRY: VendorCodecRegistry = VendorCodecRegistry::builtin();

#[test]
fn test_索引显示名称() {
    let expected = [
        (CodecIndex::SourceSbc, UNKNOWN_CODEC_INDEX),
        (CodecIndex::SourceAac, UNKNOWN_CODEC_INDEX),
        (CodecIndex::SourceAptx, "aptX"),
        (CodecIndex::SourceAptxHd, "aptX-HD"),
        (CodecIndex::SourceLdac, "LDAC"),
        (CodecIndex::SourceLc3, LC3_NOT_IMPLEMENTED),
        (CodecIndex::SourceOpus, "Opus"),
        (CodecIndex::SourceLhdcV2, "LHDC V2"),
        (CodecIndex::SourceLhdcV3, "LHDC V3"),
        (CodecIndex::SourceLhdcV5, "LHDC V5"),
        (CodecIndex::SinkSbc, UNKNOWN_CODEC_INDEX),
        (CodecIndex::SinkAac, UNKNOWN_CODEC_INDEX),
        (CodecIndex::SinkLdac, "LDAC SINK"),
        (CodecIndex::SinkOpus, "Opus SINK"),
        (CodecIndex::SinkLhdcV3, "LHDC V3 SINK"),
        (CodecIndex::SinkLhdcV5, "LHDC V5 SINK"),
    ];
    assert_eq!(expected.len(), CodecIndex::ALL.len());
    for (index, name) in expected {
        assert_eq!(REGISTRY.codec_index_str(index), name, "{index}");
    }
}

#[test]
fn test_默认配置对全部索引有定义() {
    for index in CodecIndex::ALL {
        let mut cfg = StreamEndpointConfig::new();
        let ok = REGISTRY.init_codec_config(index, &mut cfg);
        match index.owner() {
            IndexOwner::Vendor(_) => assert!(ok, "{index} 应有默认配置"),
            IndexOwner::Standard | IndexOwner::Unimplemented => {
                assert!(!ok);
                assert_eq!(cfg, StreamEndpointConfig::new());
            }
        }
    }
}

#[test]
fn test_默认配置可解析回同一索引() {
    for index in CodecIndex::ALL {
        let Some(cfg) = REGISTRY.default_codec_config(index) else {
            continue;
        };
        let info = cfg.codec_info();
        assert_eq!(cfg.num_codec, 1);
        assert!(cfg.psc_mask.contains(ServiceCategories::MEDIA_CODEC));

        match index.direction() {
            Direction::Source => {
                assert!(REGISTRY.is_valid_local_source_codec(info), "{index}");
                assert!(REGISTRY.is_valid_peer_sink_codec(info), "{index}");
                assert_eq!(REGISTRY.source_codec_index(info), Some(index));
            }
            Direction::Sink => {
                assert!(REGISTRY.is_valid_local_sink_codec(info), "{index}");
                assert!(REGISTRY.is_peer_source_codec_supported(info), "{index}");
                assert_eq!(REGISTRY.sink_codec_index(info), Some(index));
            }
        }
    }
}

#[test]
fn test_源端能力与接收端能力协商() {
    // 本地源端默认能力作为对端源端能力时, 应被本地接收端支持
    let pairs = [
        (CodecIndex::SourceLdac, CodecIndex::SinkLdac),
        (CodecIndex::SourceOpus, CodecIndex::SinkOpus),
        (CodecIndex::SourceLhdcV3, CodecIndex::SinkLhdcV3),
        (CodecIndex::SourceLhdcV5, CodecIndex::SinkLhdcV5),
    ];
    for (source, sink) in pairs {
        let source_cfg = REGISTRY.default_codec_config(source).unwrap();
        let sink_cfg = REGISTRY.default_codec_config(sink).unwrap();
        assert!(REGISTRY.is_peer_source_codec_supported(source_cfg.codec_info()));
        assert!(REGISTRY.codec_type_equals(source_cfg.codec_info(), sink_cfg.codec_info()));
    }
}

#[test]
fn test_仅源端族没有接收端索引() {
    let cfg = REGISTRY.default_codec_config(CodecIndex::SourceAptxHd).unwrap();
    assert_eq!(REGISTRY.sink_codec_index(cfg.codec_info()), None);
    let cfg = REGISTRY.default_codec_config(CodecIndex::SourceLhdcV2).unwrap();
    assert_eq!(REGISTRY.sink_codec_index(cfg.codec_info()), None);
}

#[test]
fn test_复用配置不残留上一个编解码器() {
    let mut cfg = StreamEndpointConfig::new();
    assert!(REGISTRY.init_codec_config(CodecIndex::SourceLhdcV5, &mut cfg));
    assert!(REGISTRY.init_codec_config(CodecIndex::SourceAptx, &mut cfg));
    assert!(REGISTRY.init_codec_config(CodecIndex::SourceLdac, &mut cfg));

    let fresh = REGISTRY.default_codec_config(CodecIndex::SourceLdac).unwrap();
    assert_eq!(cfg, fresh);
    assert_eq!(cfg.num_protect, 0);
    assert!(!cfg.psc_mask.contains(ServiceCategories::CONTENT_PROTECTION));
}

#[cfg(feature = "scms-t")]
#[test]
fn test_scms_t内容保护() {
    let cfg = REGISTRY.default_codec_config(CodecIndex::SourceAptx).unwrap();
    assert_eq!(cfg.num_protect, 1);
    assert_eq!(&cfg.protect_info[..3], &[0x02, 0x02, 0x00]);
    assert!(cfg.psc_mask.contains(ServiceCategories::CONTENT_PROTECTION));

    let ldac = REGISTRY.default_codec_config(CodecIndex::SourceLdac).unwrap();
    assert_eq!(ldac.num_protect, 0);
}

#[cfg(not(feature = "scms-t"))]
#[test]
fn test_默认不带内容保护() {
    let cfg = REGISTRY.default_codec_config(CodecIndex::SourceAptx).unwrap();
    assert_eq!(cfg.num_protect, 0);
    assert!(!cfg.psc_mask.contains(ServiceCategories::CONTENT_PROTECTION));
}
