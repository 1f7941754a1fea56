use std::hint::black_box;
use std::sync::Arc;

use bencher::{TestCase, TestFile};
use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use micro_detect::{
    AppProto, DetectEngine, DetectEngineBuilder, DetectEngineCtx, DetectEngineThreadCtx, DetectEngineTransforms, Direction, Signature,
    Transform,
};
use micro_detect_http::http1::Http1Transaction;
use micro_detect_http::http2::Http2Transaction;
use micro_detect_http::{register_http_header_keywords, Http1Limits};

static SMALL_REQUEST: TestFile = TestFile::new(include_str!("../resources/request/get_small.txt"));
static LARGE_REQUEST: TestFile = TestFile::new(include_str!("../resources/request/get_large.txt"));

fn engine() -> Arc<DetectEngine> {
    let mut builder = DetectEngineBuilder::new();
    register_http_header_keywords(&mut builder).expect("built-in keywords should register");
    Arc::new(builder.build())
}

fn http1_request(file: &TestFile) -> Http1Transaction {
    let mut tx = Http1Transaction::new();
    let mut bytes = BytesMut::from(file.content());
    tx.parse_request(&mut bytes, &Http1Limits::default()).expect("input should be valid http request head");
    tx
}

fn benchmark_extractor(criterion: &mut Criterion) {
    let engine = engine();
    let list_id = engine.buffer_type_get_by_name("http_user_agent").unwrap();
    let extractor = Arc::clone(engine.inspect_engine(list_id, AppProto::Http1, Direction::ToServer).unwrap().extractor());
    let lowercase: DetectEngineTransforms = [Transform::ToLowercase].into_iter().collect();
    let mut group = criterion.benchmark_group("header_extractor");

    for case in [TestCase::small("small", SMALL_REQUEST), TestCase::large("large", LARGE_REQUEST)] {
        let tx = http1_request(case.file());

        group.bench_with_input(BenchmarkId::new("cold", case.name()), &tx, |b, tx| {
            let mut det_ctx = DetectEngineThreadCtx::new();
            b.iter(|| {
                black_box(extractor.get_data(&mut det_ctx, &lowercase, Direction::ToServer, tx, list_id).map(|buffer| buffer.len()));
                det_ctx.clear_buffers();
            });
        });

        group.bench_with_input(BenchmarkId::new("warm", case.name()), &tx, |b, tx| {
            let mut det_ctx = DetectEngineThreadCtx::new();
            extractor.get_data(&mut det_ctx, &lowercase, Direction::ToServer, tx, list_id);
            b.iter(|| black_box(extractor.get_data(&mut det_ctx, &lowercase, Direction::ToServer, tx, list_id).map(|buffer| buffer.len())));
        });
    }

    let mut h2 = Http2Transaction::new(1);
    h2.push_headers(Direction::ToServer, [(":method", "GET"), (":path", "/"), ("user-agent", "Mozilla/5.0"), ("accept", "*/*")], true);
    let h2_extractor = Arc::clone(engine.inspect_engine(list_id, AppProto::Http2, Direction::ToServer).unwrap().extractor());
    group.bench_function("cold/http2", |b| {
        let mut det_ctx = DetectEngineThreadCtx::new();
        b.iter(|| {
            black_box(h2_extractor.get_data(&mut det_ctx, &lowercase, Direction::ToServer, &h2, list_id).map(|buffer| buffer.len()));
            det_ctx.clear_buffers();
        });
    });

    group.finish();
}

fn benchmark_detect_tx(criterion: &mut Criterion) {
    let engine = engine();
    let rules = [("http.user_agent", "Chrome"), ("http.accept_lang", "zh-CN"), ("http.referer", "example.com"), ("http.accept", "json")];
    let signatures = rules
        .iter()
        .zip(1..)
        .map(|((keyword, content), id)| {
            let mut sig = Signature::new(id);
            sig.apply_keyword(&engine, keyword, "").unwrap();
            sig.add_content(*content).unwrap();
            sig
        })
        .collect();
    let ctx = DetectEngineCtx::build(Arc::clone(&engine), signatures).unwrap();
    let tx = http1_request(&LARGE_REQUEST);

    criterion.bench_function("detect_tx/large", |b| {
        let mut det_ctx = DetectEngineThreadCtx::new();
        b.iter(|| black_box(ctx.detect_tx(&mut det_ctx, Direction::ToServer, &tx)));
    });
}

criterion_group!(extractor, benchmark_extractor, benchmark_detect_tx);
criterion_main!(extractor);
