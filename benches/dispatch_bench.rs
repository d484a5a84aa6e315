//! Lanyin 查询分发性能基准测试.
//!
//! 覆盖身份键查找, 合法性检查, 数值查询与媒体包头部写入等热路径.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lanyin::core::MediaPacket;
use lanyin::vendor::{CodecIndex, VendorCodecRegistry};

const REGISTRY: VendorCodecRegistry = VendorCodecRegistry::builtin();

/// LDAC 48 kHz 立体声配置
const LDAC_CONFIG: [u8; 11] = [0x0A, 0x00, 0xFF, 0x2D, 0x01, 0x00, 0x00, 0xAA, 0x00, 0x10, 0x01];

/// LHDC V5 48 kHz 24 bit 配置
const LHDCV5_CONFIG: [u8; 14] = [
    0x0D, 0x00, 0xFF, 0x3A, 0x05, 0x00, 0x00, 0x35, 0x4C, 0x08, 0x02, 0x01, 0x01, 0x00,
];

/// 未注册的身份键
const UNKNOWN: [u8; 10] = [0x09, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_codec_info_lhdcv5", |b| {
        b.iter(|| REGISTRY.resolve_codec_info(black_box(&LHDCV5_CONFIG)));
    });
    c.bench_function("resolve_codec_info_unknown", |b| {
        b.iter(|| REGISTRY.resolve_codec_info(black_box(&UNKNOWN)));
    });
}

fn bench_validity(c: &mut Criterion) {
    c.bench_function("is_valid_local_source_ldac", |b| {
        b.iter(|| REGISTRY.is_valid_local_source_codec(black_box(&LDAC_CONFIG)));
    });
    c.bench_function("is_peer_source_supported_lhdcv5", |b| {
        b.iter(|| REGISTRY.is_peer_source_codec_supported(black_box(&LHDCV5_CONFIG)));
    });
}

fn bench_getters(c: &mut Criterion) {
    c.bench_function("track_params_ldac", |b| {
        b.iter(|| {
            let info = black_box(&LDAC_CONFIG);
            (
                REGISTRY.bit_rate(info),
                REGISTRY.track_sample_rate(info),
                REGISTRY.track_bits_per_sample(info),
                REGISTRY.track_channel_count(info),
            )
        });
    });
    c.bench_function("codec_equals_ldac", |b| {
        b.iter(|| REGISTRY.codec_equals(black_box(&LDAC_CONFIG), black_box(&LDAC_CONFIG)));
    });
}

fn bench_codec_header(c: &mut Criterion) {
    let payload = vec![0u8; 660];
    c.bench_function("build_codec_header_ldac_660", |b| {
        b.iter(|| {
            let mut pkt = MediaPacket::with_headroom(13, &payload);
            REGISTRY.build_codec_header(&LDAC_CONFIG, &mut pkt, black_box(2));
            pkt
        });
    });
}

fn bench_default_config(c: &mut Criterion) {
    c.bench_function("default_codec_config_all", |b| {
        b.iter(|| {
            CodecIndex::ALL
                .iter()
                .filter_map(|index| REGISTRY.default_codec_config(*index))
                .count()
        });
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_validity,
    bench_getters,
    bench_codec_header,
    bench_default_config,
);
criterion_main!(benches);
