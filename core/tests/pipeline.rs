//! Pipeline runs against an in-memory transport.
//!
//! `Recorder` captures every request and answers with a canned response, so
//! these tests can assert both what went out on the wire and how the
//! response was post-processed.

use base64::Engine;
use reqpipe_core::{
    prepare, CodecError, ConfigError, ExecutionMode, HttpRequest, HttpResponse, Pipeline, PipelineError,
    RequestConfig, TransformError, Transport, TransportError,
};

const KEY: &str = "abcdeABCDEabcdeA";

struct Recorder {
    requests: Vec<HttpRequest>,
    reply: Result<HttpResponse, TransportError>,
}

impl Recorder {
    fn replying(status: u16, body: &[u8]) -> Self {
        Self {
            requests: Vec::new(),
            reply: Ok(HttpResponse {
                status,
                body: body.to_vec(),
            }),
        }
    }

    fn failing(status: u16, message: &str) -> Self {
        Self {
            requests: Vec::new(),
            reply: Err(TransportError {
                status,
                message: message.to_string(),
            }),
        }
    }
}

impl Transport for Recorder {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.push(request.clone());
        match &self.reply {
            Ok(response) => Ok(response.clone()),
            Err(e) => Err(TransportError {
                status: e.status,
                message: e.message.clone(),
            }),
        }
    }
}

fn pipeline_for(input: &str) -> (Pipeline, Vec<u8>) {
    let (config, body) = prepare(RequestConfig::default(), input.as_bytes()).unwrap();
    (Pipeline::new(config).unwrap(), body)
}

fn aes_base64(plaintext: &[u8]) -> Vec<u8> {
    let spec = reqpipe_core::CipherSpec::parse("AES/ECB/PKCS5PADDING").unwrap();
    let transform = reqpipe_core::BlockTransform::new(KEY.as_bytes(), &spec).unwrap();
    base64::engine::general_purpose::STANDARD
        .encode(transform.encrypt(plaintext).unwrap())
        .into_bytes()
}

#[test]
fn send_plain_body() {
    let (pipeline, body) = pipeline_for("URL=http://api.test/echo\nMETHOD=PUT\nHEADERS=A:1,A:2\n\n hello \n");
    let mut transport = Recorder::replying(200, b"  world\n");

    let outcome = pipeline.run(&body, &mut transport).unwrap();

    assert_eq!(transport.requests.len(), 1);
    let req = &transport.requests[0];
    assert_eq!(req.method, "PUT");
    assert_eq!(req.url, "http://api.test/echo");
    assert_eq!(req.headers, vec![("A".into(), "1".into()), ("A".into(), "2".into())]);
    assert_eq!(req.body, b"hello".to_vec());

    // No inbound stages: the response is passed through untrimmed.
    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.body, b"  world\n".to_vec());
    assert_eq!(outcome.render(false), b"200\n  world\n".to_vec());
}

#[test]
fn send_encrypts_then_encodes_and_reverses_response() {
    let input = format!(
        "URL=http://api.test/secure\nCIPHER_KEY={KEY}\nENCRYPTION=AES/ECB/PKCS5PADDING\nENCODE=base64\nDECODE=base64\nping"
    );
    let (pipeline, body) = pipeline_for(&input);
    let mut response = aes_base64(b"pong");
    response.extend_from_slice(b"\r\n");
    let mut transport = Recorder::replying(201, &response);

    let outcome = pipeline.run(&body, &mut transport).unwrap();

    assert_eq!(transport.requests[0].body, aes_base64(b"ping"));
    assert_eq!(outcome.status, 201);
    assert_eq!(outcome.body, b"pong".to_vec());
}

#[test]
fn encode_mode_never_calls_transport() {
    let (pipeline, body) = pipeline_for("URL=http://api.test/\nENCODE=base64\nMODE=encode\nhello");
    let mut transport = Recorder::replying(200, b"");

    let outcome = pipeline.run(&body, &mut transport).unwrap();

    assert!(transport.requests.is_empty());
    assert_eq!(outcome.status, 0);
    assert_eq!(outcome.body, b"aGVsbG8=".to_vec());
    assert_eq!(outcome.render(false), b"0\naGVsbG8=".to_vec());
}

#[test]
fn decode_mode_never_calls_transport() {
    let (pipeline, body) = pipeline_for("URL=http://api.test/\nDECODE=base64\nMODE=decode\naGVsbG8=\n");
    let mut transport = Recorder::replying(200, b"");

    let outcome = pipeline.run(&body, &mut transport).unwrap();

    assert!(transport.requests.is_empty());
    assert_eq!(outcome.body, b"hello".to_vec());
}

#[test]
fn missing_url_fails_before_transport() {
    let (pipeline, body) = pipeline_for("METHOD=GET\nhello");
    let mut transport = Recorder::replying(200, b"");

    let err = pipeline.run(&body, &mut transport).unwrap_err();

    assert!(matches!(err, PipelineError::MissingUrl));
    assert_eq!(err.to_string(), "URL must be provided");
    assert_eq!(err.status(), 0);
    assert!(transport.requests.is_empty());
}

#[test]
fn transport_error_keeps_status() {
    let (pipeline, body) = pipeline_for("URL=http://api.test/\nhello");
    let mut transport = Recorder::failing(0, "connection refused");

    let err = pipeline.run(&body, &mut transport).unwrap_err();

    assert!(matches!(err, PipelineError::Transport(_)));
    assert_eq!(err.status(), 0);
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn malformed_response_is_a_decode_error() {
    let (pipeline, body) = pipeline_for("URL=http://api.test/\nDECODE=base64\nhello");
    let mut transport = Recorder::replying(500, b"<html>oops</html>");

    let err = pipeline.run(&body, &mut transport).unwrap_err();

    assert!(matches!(err, PipelineError::Codec(CodecError::Base64(_))));
}

#[test]
fn crc32_pipeline_cannot_be_decoded() {
    let (pipeline, body) = pipeline_for("ENCODE=base64,crc32\nMODE=decode\n157952578");
    let mut transport = Recorder::replying(200, b"");

    let err = pipeline.run(&body, &mut transport).unwrap_err();

    assert!(matches!(err, PipelineError::Codec(CodecError::OneWay(ref name)) if name == "crc32"));
    assert!(transport.requests.is_empty());
}

#[test]
fn crc32_as_decode_name_is_rejected() {
    let (pipeline, body) = pipeline_for("DECODE=crc32\nMODE=decode\n157952578");

    let err = pipeline.run(&body, &mut Recorder::replying(200, b"")).unwrap_err();

    assert!(matches!(err, PipelineError::Codec(CodecError::OneWay(_))));
}

#[test]
fn config_errors_surface_from_new() {
    let cases = [
        ("ENCRYPTION=DES/ECB/PKCS5PADDING\nCIPHER_KEY=abcdeABCDEabcdeA\nx", ConfigError::UnknownCipher("DES".into())),
        ("ENCRYPTION=AES/CBC/PKCS5PADDING\nCIPHER_KEY=abcdeABCDEabcdeA\nx", ConfigError::UnknownBlockMode("CBC".into())),
        ("ENCRYPTION=AES/ECB/ISO10126PADDING\nCIPHER_KEY=abcdeABCDEabcdeA\nx", ConfigError::UnknownPadding("ISO10126".into())),
        ("ENCRYPTION=AES/ECB/PKCS5PADDING\nCIPHER_KEY=tooshort\nx", ConfigError::InvalidKeyLength { algorithm: "AES", len: 8 }),
        ("ENCODE=crc32,base64\nx", ConfigError::OneWayNotLast("crc32".into())),
    ];
    for (input, expected) in cases {
        let (config, _) = prepare(RequestConfig::default(), input.as_bytes()).unwrap();
        assert_eq!(Pipeline::new(config).unwrap_err(), expected, "{input}");
    }
}

#[test]
fn flags_are_overridden_by_directives() {
    let flags = RequestConfig {
        url: "http://flag.test/".into(),
        mode: ExecutionMode::Encode,
        ..Default::default()
    };
    let (config, body) = prepare(flags, b"URL=http://file.test/\nMODE=send\npayload").unwrap();
    let pipeline = Pipeline::new(config).unwrap();
    let mut transport = Recorder::replying(204, b"");

    pipeline.run(&body, &mut transport).unwrap();

    assert_eq!(transport.requests[0].url, "http://file.test/");
}

#[test]
fn verbose_run_traces_every_stage() {
    let input = format!("VERBOSE=1\nMODE=encode\nCIPHER_KEY={KEY}\nENCRYPTION=AES/ECB/PKCS5PADDING\nENCODE=base64,crc32\n hi ");
    let (pipeline, body) = pipeline_for(&input);

    let outcome = pipeline.run(&body, &mut Recorder::replying(200, b"")).unwrap();

    let labels: Vec<&str> = outcome.trace.stages().iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Original", "Trimmed", "Encrypted", "Base64 encoded", "Crc32 checksum"]);
    assert_eq!(outcome.trace.stages()[1].snapshot, "hi");
}

#[test]
fn quiet_run_has_empty_trace() {
    let (pipeline, body) = pipeline_for("MODE=encode\nENCODE=base64\nhi");

    let outcome = pipeline.run(&body, &mut Recorder::replying(200, b"")).unwrap();

    assert!(outcome.trace.stages().is_empty());
}

#[test]
fn unpadded_partial_block_is_never_sent() {
    let input = format!(
        "URL=http://api.test/\nCIPHER_KEY={KEY}\nENCRYPTION=AES/ECB/NOPADDING\n0123456789abcdefSECRET"
    );
    let (pipeline, body) = pipeline_for(&input);
    let mut transport = Recorder::replying(200, b"");

    let err = pipeline.run(&body, &mut transport).unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Transform(TransformError::Misaligned { len: 22, block_size: 16 })
    ));
    assert!(transport.requests.is_empty());
}

#[test]
fn binary_body_is_sent_byte_exact() {
    let (config, body) = prepare(RequestConfig::default(), b"URL=http://api.test/\nMETHOD=PUT\n\xff\xfe\x00bin").unwrap();
    assert_eq!(body, b"\xff\xfe\x00bin".to_vec());
    let pipeline = Pipeline::new(config).unwrap();
    let mut transport = Recorder::replying(200, b"\x80ok");

    let outcome = pipeline.run(&body, &mut transport).unwrap();

    assert_eq!(transport.requests[0].method, "PUT");
    assert_eq!(transport.requests[0].body, b"\xff\xfe\x00bin".to_vec());
    assert_eq!(outcome.body, b"\x80ok".to_vec());
}

#[test]
fn binary_body_survives_encryption_round_trip() {
    let input: Vec<u8> = [
        format!("URL=http://api.test/\nCIPHER_KEY={KEY}\nENCRYPTION=AES/ECB/PKCS5PADDING\nENCODE=base64\n").as_bytes(),
        &b"\xc3\x28\xa0\xa1 payload"[..],
    ]
    .concat();
    let (config, body) = prepare(RequestConfig::default(), &input).unwrap();
    let pipeline = Pipeline::new(config).unwrap();
    let mut transport = Recorder::replying(200, b"");

    pipeline.run(&body, &mut transport).unwrap();

    assert_eq!(transport.requests[0].body, aes_base64(b"\xc3\x28\xa0\xa1 payload"));
}
