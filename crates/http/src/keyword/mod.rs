//! Per-header sticky-buffer keywords.
//!
//! A [`HeaderKeyword`] exposes the value of one HTTP header as an inspection
//! buffer. Registering it wires a keyword descriptor, prefilter and inspection
//! entries for HTTP/1 and HTTP/2 in every configured direction, and a buffer
//! type whose id is memoized for the setup hook.

mod catalog;
mod extractor;

use std::fmt;
use std::sync::Arc;

use http::HeaderName;
use micro_detect::{
    AppProto, BufferExtractor, BufferId, DEFAULT_MPM_PRIORITY, DetectEngine, DetectEngineBuilder, DirectionSet, KeywordId, KeywordSetup,
    RegistrationError, SetupError, SigMatchFlags, SigTableElmt, Signature, inspect_buffer_generic, prefilter_generic_mpm_register,
};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::source::HttpVersion;
use crate::utils::ensure;
use crate::{ConfigError, HeaderKeywordConfig};

pub use catalog::{CatalogEntry, HTTP_HEADER_KEYWORDS, register_http_header_keywords};
pub use extractor::HeaderExtractor;

/// One instantiation of the header keyword template.
pub struct HeaderKeyword {
    config: HeaderKeywordConfig,
    header: HeaderName,
    directions: DirectionSet,
    buffer_id: OnceCell<BufferId>,
}

impl HeaderKeyword {
    /// Validates `config` and parses its header name.
    pub fn new(config: HeaderKeywordConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let header = HeaderName::from_bytes(config.header.as_bytes()).map_err(|e| ConfigError::invalid_header_name(&config.header, e))?;
        let directions = config.direction_set();
        Ok(Self { config, header, directions, buffer_id: OnceCell::new() })
    }

    /// Slot of the keyword in the engine's keyword table.
    pub fn id(&self) -> KeywordId {
        KeywordId(self.config.id)
    }

    /// Rule-language name, e.g. `http.user_agent`.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Older alias the rule parser still accepts, e.g. `http_user_agent`.
    pub fn legacy_name(&self) -> Option<&str> {
        self.config.legacy_name.as_deref()
    }

    /// Name of the buffer type the keyword fills.
    pub fn buffer_name(&self) -> &str {
        &self.config.buffer_name
    }

    /// The inspected header.
    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    /// Directions in which the header is inspected.
    pub fn directions(&self) -> DirectionSet {
        self.directions
    }

    /// The parameters the keyword was built from.
    pub fn config(&self) -> &HeaderKeywordConfig {
        &self.config
    }

    /// The buffer id, once registration resolved it.
    pub fn buffer_id(&self) -> Option<BufferId> {
        self.buffer_id.get().copied()
    }

    /// Parser flags: a keyword registered for both directions takes an
    /// optional `to_server` / `to_client` modifier, otherwise no option.
    pub fn flags(&self) -> SigMatchFlags {
        if self.directions.is_bidirectional() {
            SigMatchFlags::OPTIONAL_OPT | SigMatchFlags::INFO_STICKY_BUFFER | SigMatchFlags::SUPPORT_DIR
        } else {
            SigMatchFlags::NOOPT | SigMatchFlags::INFO_STICKY_BUFFER
        }
    }

    /// Descriptor text: `"<name> sticky buffer for the <buffer desc>"`.
    pub fn description(&self) -> String {
        format!("{} sticky buffer for the {}", self.config.name, self.config.buffer_desc)
    }

    /// Documentation path: `"/rules/<doc>"`.
    pub fn url(&self) -> String {
        format!("/rules/{}", self.config.doc)
    }

    /// Registers the keyword, its buffer type and the app-layer entries.
    ///
    /// Everything that can fail is checked before the first table is touched,
    /// so an error leaves `builder` as it was.
    pub fn register(self, builder: &mut DetectEngineBuilder) -> Result<Arc<Self>, RegistrationError> {
        builder.check_keyword(self.id(), self.name(), self.legacy_name())?;
        ensure!(builder.buffer_type_get_by_name(self.buffer_name()).is_none(), RegistrationError::buffer_name_collision(self.buffer_name()));

        let keyword = Arc::new(self);

        let mut elmt = SigTableElmt::new(keyword.name())
            .with_desc(keyword.description())
            .with_url(keyword.url())
            .with_flags(keyword.flags())
            .with_setup(Arc::clone(&keyword) as Arc<dyn KeywordSetup>);
        if let Some(legacy) = keyword.legacy_name() {
            elmt = elmt.with_alias(legacy);
        }
        builder.register_keyword(keyword.id(), elmt)?;

        let buffer_name = keyword.buffer_name();
        for direction in keyword.directions.directions() {
            for version in HttpVersion::ALL {
                let extractor: Arc<dyn BufferExtractor> = Arc::new(HeaderExtractor::new(keyword.header.clone(), direction, version));
                let progress = version.header_progress(direction);
                builder.register_mpm(
                    buffer_name,
                    direction,
                    DEFAULT_MPM_PRIORITY,
                    prefilter_generic_mpm_register,
                    Arc::clone(&extractor),
                    version.app_proto(),
                    progress,
                );
                builder.register_inspect_engine(buffer_name, version.app_proto(), direction, progress, inspect_buffer_generic, extractor);
            }
        }

        let buffer_id = builder
            .buffer_type_set_description_by_name(buffer_name, &keyword.config.buffer_desc)
            .ok_or_else(|| RegistrationError::invalid_keyword(format!("{}: buffer {buffer_name} not created", keyword.name())))?;
        let buffer_id = *keyword.buffer_id.get_or_init(|| buffer_id);

        debug!(keyword = keyword.name(), buffer = buffer_name, %buffer_id, header = %keyword.header, "registered header keyword");
        Ok(keyword)
    }
}

impl KeywordSetup for HeaderKeyword {
    /// Makes the keyword's buffer the signature's sticky buffer and pins the
    /// signature to HTTP.
    fn setup(&self, engine: &DetectEngine, sig: &mut Signature, _option: &str) -> Result<(), SetupError> {
        let list_id = self.buffer_id().ok_or_else(|| SetupError::buffer_unresolved(self.name()))?;
        ensure!(sig.app_proto().merge(AppProto::Http).is_some(), SetupError::app_proto_conflict(sig.app_proto(), AppProto::Http));

        sig.set_active_list(engine, list_id)?;
        sig.set_app_proto(AppProto::Http)
    }
}

impl fmt::Debug for HeaderKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderKeyword")
            .field("name", &self.config.name)
            .field("header", &self.header)
            .field("directions", &self.directions)
            .field("buffer_id", &self.buffer_id.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use bytes::BytesMut;
    use indoc::indoc;
    use micro_detect::{
        DetectEngineCtx, DetectEngineThreadCtx, DetectEngineTransforms, Direction, RegistrationError, Transaction, Transform,
    };

    use super::*;
    use crate::http1::Http1Transaction;
    use crate::http2::Http2Transaction;
    use crate::utils::init_test_tracing;
    use crate::{Http1Limits, load_keywords_json};

    fn engine() -> Arc<DetectEngine> {
        init_test_tracing();
        let mut builder = DetectEngineBuilder::new();
        register_http_header_keywords(&mut builder).unwrap();
        Arc::new(builder.build())
    }

    fn request(raw: &str) -> Http1Transaction {
        let mut tx = Http1Transaction::new();
        assert!(tx.parse_request(&mut BytesMut::from(raw), &Http1Limits::default()).unwrap());
        tx
    }

    fn list_id(engine: &DetectEngine, buffer: &str) -> BufferId {
        engine.buffer_type_get_by_name(buffer).unwrap()
    }

    /// Runs the extractor registered for (`buffer`, protocol of `tx`, `direction`).
    fn extract(engine: &DetectEngine, buffer: &str, direction: Direction, tx: &dyn Transaction, transforms: &DetectEngineTransforms) -> Option<Vec<u8>> {
        let list_id = list_id(engine, buffer);
        let inspect = engine.inspect_engine(list_id, tx.app_proto(), direction)?;
        let mut det_ctx = DetectEngineThreadCtx::new();
        inspect.extractor().get_data(&mut det_ctx, transforms, direction, tx, list_id).map(|buffer| buffer.bytes().to_vec())
    }

    fn rule(engine: &DetectEngine, id: u32, keyword: &str, option: &str, content: &'static str) -> Signature {
        let mut sig = Signature::new(id);
        sig.apply_keyword(engine, keyword, option).unwrap();
        sig.add_content(content).unwrap();
        sig
    }

    #[test]
    fn http1_user_agent_present() {
        let engine = engine();
        let tx = request("GET / HTTP/1.1\r\nHost: a\r\nUser-Agent: curl/8.0\r\n\r\n");

        let value = extract(&engine, "http_user_agent", Direction::ToServer, &tx, &DetectEngineTransforms::new()).unwrap();
        assert_eq!(value, b"curl/8.0");
        assert_eq!(value.len(), 8);

        let ctx = DetectEngineCtx::build(Arc::clone(&engine), vec![rule(&engine, 1, "http.user_agent", "", "curl")]).unwrap();
        assert_eq!(ctx.detect_tx(&mut DetectEngineThreadCtx::new(), Direction::ToServer, &tx), vec![1]);
    }

    #[test]
    fn http1_header_absent() {
        let engine = engine();
        let tx = request("GET / HTTP/1.1\r\nHost: a\r\n\r\n");

        assert_eq!(extract(&engine, "http_user_agent", Direction::ToServer, &tx, &DetectEngineTransforms::new()), None);

        let ctx = DetectEngineCtx::build(Arc::clone(&engine), vec![rule(&engine, 1, "http.user_agent", "", "curl")]).unwrap();
        assert!(ctx.detect_tx(&mut DetectEngineThreadCtx::new(), Direction::ToServer, &tx).is_empty());
    }

    #[test]
    fn http1_header_empty() {
        let engine = engine();
        let tx = request("GET / HTTP/1.1\r\nUser-Agent:\r\n\r\n");

        assert_eq!(extract(&engine, "http_user_agent", Direction::ToServer, &tx, &DetectEngineTransforms::new()), None);
    }

    #[test]
    fn http1_headers_not_parsed_yet() {
        let engine = engine();
        let list_id = list_id(&engine, "http_user_agent");
        let tx = Http1Transaction::new();

        let mut det_ctx = DetectEngineThreadCtx::new();
        let extractor = engine.inspect_engine(list_id, AppProto::Http1, Direction::ToServer).unwrap().extractor();
        assert!(extractor.get_data(&mut det_ctx, &DetectEngineTransforms::new(), Direction::ToServer, &tx, list_id).is_none());
        assert!(det_ctx.filled_buffer(list_id).is_none());
    }

    #[test]
    fn http1_repeated_and_case_insensitive() {
        let engine = engine();
        let tx = request(indoc! {r##"
        GET / HTTP/1.1
        accept-language: en
        ACCEPT-LANGUAGE: fr

        "##});

        let value = extract(&engine, "http_accept_lang", Direction::ToServer, &tx, &DetectEngineTransforms::new());
        assert_eq!(value.as_deref(), Some(&b"en, fr"[..]));
    }

    #[test]
    fn http2_user_agent() {
        let engine = engine();
        let mut tx = Http2Transaction::new(1);
        tx.push_headers(Direction::ToServer, [(":method", "GET"), ("user-agent", "Mozilla/5.0")], true);

        let value = extract(&engine, "http_user_agent", Direction::ToServer, &tx, &DetectEngineTransforms::new()).unwrap();
        assert_eq!(value, b"Mozilla/5.0");
        assert_eq!(value.len(), 11);

        let ctx = DetectEngineCtx::build(Arc::clone(&engine), vec![rule(&engine, 7, "http.user_agent", "", "Mozilla")]).unwrap();
        assert_eq!(ctx.detect_tx(&mut DetectEngineThreadCtx::new(), Direction::ToServer, &tx), vec![7]);
    }

    #[test]
    fn http2_waits_for_header_milestone() {
        let engine = engine();
        let ctx = DetectEngineCtx::build(Arc::clone(&engine), vec![rule(&engine, 7, "http.user_agent", "", "Mozilla")]).unwrap();
        let mut det_ctx = DetectEngineThreadCtx::new();

        let mut tx = Http2Transaction::new(1);
        tx.push_headers(Direction::ToServer, [(":method", "POST"), ("user-agent", "Mozilla/5.0")], false);
        assert!(ctx.detect_tx(&mut det_ctx, Direction::ToServer, &tx).is_empty());

        tx.push_data(Direction::ToServer, false);
        assert_eq!(ctx.detect_tx(&mut det_ctx, Direction::ToServer, &tx), vec![7]);
    }

    #[test]
    fn wrong_direction_is_not_registered() {
        let engine = engine();
        let list_id = list_id(&engine, "http_user_agent");
        assert!(!engine.has_mpm(list_id, AppProto::Http1, Direction::ToClient));
        assert!(engine.inspect_engine(list_id, AppProto::Http2, Direction::ToClient).is_none());

        let mut tx = request("GET / HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n");
        tx.set_response_head(http::Response::new(()).into());
        let ctx = DetectEngineCtx::build(Arc::clone(&engine), vec![rule(&engine, 1, "http.user_agent", "", "curl")]).unwrap();
        assert!(ctx.detect_tx(&mut DetectEngineThreadCtx::new(), Direction::ToClient, &tx).is_empty());
    }

    #[test]
    fn lowercase_transform() {
        let engine = engine();
        let tx = request("GET / HTTP/1.1\r\nUser-Agent: CURL/8.0\r\n\r\n");

        let transforms: DetectEngineTransforms = [Transform::ToLowercase].into_iter().collect();
        let value = extract(&engine, "http_user_agent", Direction::ToServer, &tx, &transforms).unwrap();
        assert_eq!(value, b"curl/8.0");

        let mut sig = Signature::new(3);
        sig.apply_keyword(&engine, "http_user_agent", "").unwrap();
        sig.add_transform(&engine, Transform::ToLowercase).unwrap();
        sig.add_content("curl/").unwrap();
        let ctx = DetectEngineCtx::build(Arc::clone(&engine), vec![sig, rule(&engine, 4, "http.user_agent", "", "curl/")]).unwrap();
        assert_eq!(ctx.detect_tx(&mut DetectEngineThreadCtx::new(), Direction::ToServer, &tx), vec![3]);
    }

    #[test]
    fn filled_buffer_is_reused() {
        let engine = engine();
        let list_id = list_id(&engine, "http_user_agent");
        let extractor = Arc::clone(engine.inspect_engine(list_id, AppProto::Http1, Direction::ToServer).unwrap().extractor());
        let first = request("GET / HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n");
        let second = request("GET / HTTP/1.1\r\nUser-Agent: wget\r\n\r\n");

        let mut det_ctx = DetectEngineThreadCtx::new();
        let transforms = DetectEngineTransforms::new();
        let once = extractor.get_data(&mut det_ctx, &transforms, Direction::ToServer, &first, list_id).map(|b| b.bytes().to_vec());
        // the slot stays filled until the worker clears it
        let again = extractor.get_data(&mut det_ctx, &transforms, Direction::ToServer, &second, list_id).map(|b| b.bytes().to_vec());
        assert_eq!(once, again);

        det_ctx.clear_buffers();
        let fresh = extractor.get_data(&mut det_ctx, &transforms, Direction::ToServer, &second, list_id).map(|b| b.bytes().to_vec());
        assert_eq!(fresh.as_deref(), Some(&b"wget"[..]));
    }

    #[test]
    fn registration_wires_every_cell() {
        let engine = engine();

        for entry in HTTP_HEADER_KEYWORDS {
            let list_id = list_id(&engine, entry.buffer_name);
            assert!(list_id.get() > 0);
            assert_eq!(engine.buffer_types().description(list_id), Some(entry.buffer_desc));

            for direction in [Direction::ToServer, Direction::ToClient] {
                for version in HttpVersion::ALL {
                    let alproto = version.app_proto();
                    let has_mpm = engine.has_mpm(list_id, alproto, direction);
                    let inspect = engine.inspect_engine(list_id, alproto, direction);
                    assert_eq!(has_mpm, inspect.is_some(), "{} {direction} {version}", entry.name);
                    assert_eq!(has_mpm, entry.directions.has(direction));
                    if let Some(inspect) = inspect {
                        assert_eq!(inspect.progress(), version.header_progress(direction));
                    }
                }
            }
            assert_eq!(engine.mpm_priority(list_id), Some(DEFAULT_MPM_PRIORITY));
        }
    }

    #[test]
    fn descriptor_fields() {
        let engine = engine();

        let (id, ua) = engine.find_keyword("http_user_agent").unwrap();
        assert_eq!(id, KeywordId(204));
        assert_eq!(ua.name(), "http.user_agent");
        assert_eq!(ua.alias(), Some("http_user_agent"));
        assert_eq!(ua.desc(), "http.user_agent sticky buffer for the http user agent header");
        assert_eq!(ua.url(), "/rules/http-keywords.html#http-user-agent");
        assert_eq!(ua.flags(), SigMatchFlags::NOOPT | SigMatchFlags::INFO_STICKY_BUFFER);

        let (_, connection) = engine.find_keyword("http.connection").unwrap();
        assert_eq!(connection.flags(), SigMatchFlags::OPTIONAL_OPT | SigMatchFlags::INFO_STICKY_BUFFER | SigMatchFlags::SUPPORT_DIR);

        let (_, server) = engine.find_keyword("http.server").unwrap();
        assert_eq!(server.alias(), None);
        assert_eq!(server.flags(), SigMatchFlags::NOOPT | SigMatchFlags::INFO_STICKY_BUFFER);
    }

    #[test]
    fn buffer_id_is_memoized() {
        init_test_tracing();
        let mut builder = DetectEngineBuilder::new();
        let keywords = register_http_header_keywords(&mut builder).unwrap();
        let engine = builder.build();

        assert_eq!(keywords.len(), HTTP_HEADER_KEYWORDS.len());
        for keyword in &keywords {
            assert_eq!(keyword.buffer_id(), engine.buffer_type_get_by_name(keyword.buffer_name()));
        }
    }

    #[test]
    fn second_registration_fails_cleanly() {
        init_test_tracing();
        let mut builder = DetectEngineBuilder::new();
        register_http_header_keywords(&mut builder).unwrap();

        let config = HeaderKeywordConfig::from(&HTTP_HEADER_KEYWORDS[0]);
        let err = HeaderKeyword::new(config).unwrap().register(&mut builder).unwrap_err();
        assert!(matches!(err, RegistrationError::KeywordSlotTaken { id: 200, .. }));

        let mut config = HeaderKeywordConfig::from(&HTTP_HEADER_KEYWORDS[0]);
        config.id = 400;
        config.name = "http.accept2".to_owned();
        config.legacy_name = None;
        let err = HeaderKeyword::new(config).unwrap().register(&mut builder).unwrap_err();
        assert!(matches!(err, RegistrationError::BufferNameCollision { .. }));
        assert!(builder.keyword(KeywordId(400)).is_none());
    }

    #[test]
    fn setup_rejects_other_protocols() {
        let engine = engine();
        let mut sig = Signature::new(1);
        sig.set_app_proto(AppProto::Tls).unwrap();

        let err = sig.apply_keyword(&engine, "http.user_agent", "").unwrap_err();
        assert_eq!(err, SetupError::app_proto_conflict(AppProto::Tls, AppProto::Http));
        assert_eq!(sig.active_list(), None);
        assert!(sig.lists().is_empty());
    }

    #[test]
    fn setup_narrows_app_proto() {
        let engine = engine();
        let mut sig = Signature::new(1);
        sig.set_app_proto(AppProto::Http2).unwrap();
        sig.apply_keyword(&engine, "http.referer", "").unwrap();

        assert_eq!(sig.app_proto(), AppProto::Http2);
        assert_eq!(sig.active_list(), engine.buffer_type_get_by_name("http_referer"));
    }

    #[test]
    fn setup_before_registration() {
        let engine = engine();
        let keyword = HeaderKeyword::new(HeaderKeywordConfig::from(&HTTP_HEADER_KEYWORDS[1])).unwrap();
        let mut sig = Signature::new(1);

        let err = keyword.setup(&engine, &mut sig, "").unwrap_err();
        assert_eq!(err, SetupError::buffer_unresolved("http.accept_enc"));
        assert_eq!(sig.app_proto(), AppProto::Unknown);
    }

    #[test]
    fn options_follow_flags() {
        let engine = engine();

        let mut sig = Signature::new(1);
        assert!(matches!(sig.apply_keyword(&engine, "http.user_agent", "to_client"), Err(SetupError::UnexpectedOption { .. })));

        let mut sig = Signature::new(2);
        assert!(matches!(sig.apply_keyword(&engine, "http.connection", "sideways"), Err(SetupError::InvalidDirection { .. })));

        let mut sig = Signature::new(3);
        sig.apply_keyword(&engine, "http.connection", "to_client").unwrap();
        assert_eq!(sig.direction(), Some(Direction::ToClient));
    }

    #[test]
    fn bidirectional_keyword() {
        let engine = engine();
        let mut tx = request("GET / HTTP/1.1\r\nConnection: keep-alive\r\n\r\n");
        let mut response = BytesMut::from("HTTP/1.1 200 OK\r\nConnection: close\r\nServer: nginx\r\n\r\n");
        tx.parse_response(&mut response, &Http1Limits::default()).unwrap();

        let ctx = DetectEngineCtx::build(
            Arc::clone(&engine),
            vec![
                rule(&engine, 1, "http.connection", "", "close"),
                rule(&engine, 2, "http.connection", "", "keep-alive"),
                rule(&engine, 3, "http.connection", "to_server", "close"),
                rule(&engine, 4, "http.server", "", "nginx"),
            ],
        )
        .unwrap();

        let mut det_ctx = DetectEngineThreadCtx::new();
        assert_eq!(ctx.detect_tx(&mut det_ctx, Direction::ToServer, &tx), vec![2]);
        assert_eq!(ctx.detect_tx(&mut det_ctx, Direction::ToClient, &tx), vec![1, 4]);
    }

    #[test]
    fn keyword_from_json() {
        init_test_tracing();
        let configs = load_keywords_json(indoc! {r#"
            [{
              "id": 300,
              "name": "http.x_forwarded_for",
              "buffer_name": "http_x_forwarded_for",
              "buffer_desc": "http x-forwarded-for header",
              "doc": "http-keywords.html#http-x-forwarded-for",
              "header": "X-Forwarded-For",
              "directions": ["to_server"]
            }]
        "#})
        .unwrap();

        let mut builder = DetectEngineBuilder::new();
        for config in configs {
            HeaderKeyword::new(config).unwrap().register(&mut builder).unwrap();
        }
        let engine = Arc::new(builder.build());

        let tx = request("GET / HTTP/1.1\r\nX-Forwarded-For: 10.0.0.1\r\n\r\n");
        let ctx = DetectEngineCtx::build(Arc::clone(&engine), vec![rule(&engine, 9, "http.x_forwarded_for", "", "10.0.0.")]).unwrap();
        assert_eq!(ctx.detect_tx(&mut DetectEngineThreadCtx::new(), Direction::ToServer, &tx), vec![9]);
    }

    #[test]
    fn invalid_header_name() {
        let mut config = HeaderKeywordConfig::from(&HTTP_HEADER_KEYWORDS[0]);
        config.header = "Bad Header".to_owned();

        assert!(matches!(HeaderKeyword::new(config), Err(ConfigError::InvalidHeaderName { .. })));
    }

    #[test]
    fn concurrent_workers() {
        let engine = engine();
        let ctx = Arc::new(DetectEngineCtx::build(Arc::clone(&engine), vec![rule(&engine, 1, "http.user_agent", "", "curl")]).unwrap());

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let ctx = Arc::clone(&ctx);
                thread::spawn(move || {
                    let mut det_ctx = DetectEngineThreadCtx::new();
                    let agent = if worker % 2 == 0 { "curl/8.0" } else { "wget/1.21" };
                    let mut matched = 0;
                    for _ in 0..100 {
                        let tx = request(&format!("GET / HTTP/1.1\r\nUser-Agent: {agent}\r\n\r\n"));
                        matched += ctx.detect_tx(&mut det_ctx, Direction::ToServer, &tx).len();
                    }
                    (worker, matched)
                })
            })
            .collect();

        for handle in workers {
            let (worker, matched) = handle.join().unwrap();
            assert_eq!(matched, if worker % 2 == 0 { 100 } else { 0 });
        }
    }
}
