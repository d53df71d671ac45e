//! Pipeline orchestration: trim, encrypt, encode, send, decode, decrypt.
//!
//! # Design
//! `Pipeline::new` resolves every algorithm name up front, so configuration
//! errors surface before any network activity. After that the pipeline is
//! immutable. Each direction is split into a step that can be called on its
//! own (`encode_body`, `build_request`, `decode_response`) and `run`, which
//! sequences them around a host-supplied `Transport`. The outbound order is
//! encrypt then encode; the inbound order is its mirror, decode then decrypt.

use log::debug;

use crate::cipher::BlockTransform;
use crate::codec::{CodecChain, Decoder};
use crate::config::{ExecutionMode, RequestConfig};
use crate::error::{CodecError, ConfigError, PipelineError};
use crate::http::{HttpRequest, Transport};

/// One diagnostic snapshot of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub label: String,
    pub snapshot: String,
}

/// Snapshots of the body after each transform stage. Only records when
/// enabled; never consulted for control flow.
#[derive(Debug, Clone, Default)]
pub struct StageTrace {
    enabled: bool,
    stages: Vec<Stage>,
}

impl StageTrace {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            stages: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn record(&mut self, label: &str, data: &[u8]) {
        if self.enabled {
            self.stages.push(Stage {
                label: label.to_string(),
                snapshot: String::from_utf8_lossy(data).into_owned(),
            });
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// HTTP status, or 0 when no request was sent.
    pub status: u16,
    pub body: Vec<u8>,
    pub trace: StageTrace,
}

impl Outcome {
    /// Bytes for the output sink: the bare body when the status travels in
    /// the exit code, otherwise `"<status>\n<body>"`.
    pub fn render(&self, exit_as_return_code: bool) -> Vec<u8> {
        if exit_as_return_code {
            return self.body.clone();
        }
        let mut out = format!("{}\n", self.status).into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

fn trim(data: &[u8]) -> &[u8] {
    data.trim_ascii()
}

#[derive(Debug)]
pub struct Pipeline {
    config: RequestConfig,
    transform: Option<BlockTransform>,
    encoders: CodecChain,
    decoder: Option<Decoder>,
}

impl Pipeline {
    /// Freeze `config` and build its transform stages.
    pub fn new(config: RequestConfig) -> Result<Self, ConfigError> {
        let transform = config
            .encryption
            .as_ref()
            .map(|spec| BlockTransform::new(&config.cipher_key, spec))
            .transpose()?;
        let encoders = CodecChain::from_names(&config.encode)?;
        let decoder = config.decode.as_deref().map(Decoder::from_name);

        Ok(Self {
            config,
            transform,
            encoders,
            decoder,
        })
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    fn new_trace(&self) -> StageTrace {
        if self.config.verbose {
            StageTrace::enabled()
        } else {
            StageTrace::disabled()
        }
    }

    /// Trim the body, then encrypt and encode it if any such stage exists.
    ///
    /// Fails when an unpadded cipher is given a body that is not
    /// block-aligned.
    pub fn encode_body(&self, body: &[u8], trace: &mut StageTrace) -> Result<Vec<u8>, PipelineError> {
        trace.record("Original", body);
        let trimmed = trim(body).to_vec();
        if self.transform.is_none() && self.encoders.is_empty() {
            return Ok(trimmed);
        }
        trace.record("Trimmed", &trimmed);

        let data = match &self.transform {
            Some(transform) => {
                let encrypted = transform.encrypt(&trimmed)?;
                trace.record("Encrypted", &encrypted);
                encrypted
            }
            None => trimmed,
        };
        Ok(self.encoders.encode(data, trace))
    }

    /// Describe the outbound request. Fails without a URL.
    pub fn build_request(&self, body: Vec<u8>) -> Result<HttpRequest, PipelineError> {
        if self.config.url.is_empty() {
            return Err(PipelineError::MissingUrl);
        }
        Ok(HttpRequest {
            method: self.config.method.clone(),
            url: self.config.url.clone(),
            headers: self.config.headers.clone(),
            body,
        })
    }

    /// Reverse the inbound transforms: trim, decode, then decrypt. A body is
    /// returned untouched when neither a decoding nor a cipher is configured.
    pub fn decode_response(&self, body: Vec<u8>, trace: &mut StageTrace) -> Result<Vec<u8>, PipelineError> {
        if self.decoder.is_none() && self.transform.is_none() {
            return Ok(body);
        }
        let mut data = trim(&body).to_vec();
        trace.record("Response trimmed", &data);

        if let Some(decoder) = &self.decoder {
            data = decoder.decode(data, trace)?;
        }
        if let Some(transform) = &self.transform {
            data = transform.decrypt(&data)?;
            trace.record("Decrypted", &data);
        }
        Ok(data)
    }

    /// Run the configured mode. Only `send` calls `transport`.
    pub fn run<T: Transport>(&self, body: &[u8], transport: &mut T) -> Result<Outcome, PipelineError> {
        let mut trace = self.new_trace();

        let (status, body) = match self.config.mode {
            ExecutionMode::Encode => (0, self.encode_body(body, &mut trace)?),
            ExecutionMode::Decode => {
                if let Some(name) = self.encoders.one_way_stage() {
                    return Err(CodecError::OneWay(name.to_string()).into());
                }
                (0, self.decode_response(trim(body).to_vec(), &mut trace)?)
            }
            ExecutionMode::Send => {
                let encoded = self.encode_body(body, &mut trace)?;
                let request = self.build_request(encoded)?;
                debug!(
                    "sending {} {} ({} bytes, {} headers)",
                    request.method,
                    request.url,
                    request.body.len(),
                    request.headers.len()
                );
                let response = transport.send(&request)?;
                debug!("received status {} ({} bytes)", response.status, response.body.len());
                (response.status, self.decode_response(response.body, &mut trace)?)
            }
        };

        Ok(Outcome {
            status,
            body,
            trace,
        })
    }
}
