//! The request executor every endpoint operation funnels through.
//!
//! One call, one connection, one HTTP exchange. [`RestClient`] assembles
//! the request from the configuration and the per-operation
//! [`RequestOptions`], runs it over a freshly connected transport, and
//! hands the parsed response back. JSON operations go through
//! [`RestClient::execute`]; operations that also need response headers or
//! raw bytes drive [`RestClient::request`] directly and decode with
//! [`decode_response`].

use heapless::{String, Vec};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::network::Connect;
use crate::network::http::{self, Header, MAX_HEADERS, Method};

use super::config::Config;
use super::{Error, RequestOptions, StatusCarrier};

/// Capacity of a full request path (base path plus sub-path plus query).
pub const MAX_PATH_LEN: usize = 576;

/// Capacity of a serialized JSON request body.
pub const MAX_REQUEST_BODY_LEN: usize = 4096;

/// Content type of JSON request bodies.
const CONTENT_TYPE_JSON: &str = "application/json";

/// A raw request body with its content type, for the upload transports
/// that do not send JSON.
#[derive(Debug, Clone, Copy)]
pub struct RawBody<'a> {
    /// Value of the `Content-Type` header.
    pub content_type: &'a str,
    /// The body bytes, written to the wire unmodified.
    pub data: &'a [u8],
}

/// Performs one HTTP exchange per endpoint operation.
///
/// The executor owns a connector and a [`Config`] clone. Every call opens a
/// fresh connection, assembles the request, reads the response (an HTTP
/// error status with a body is still a response) and closes the connection.
/// No retries, no redirect following; whatever timeout applies comes from
/// the connector's transport.
#[derive(Debug)]
pub struct RestClient<N: Connect> {
    network: N,
    config: Config,
}

impl<N: Connect> RestClient<N> {
    /// Build an executor from a connector and its configuration.
    pub fn new(network: N, config: Config) -> Self {
        Self { network, config }
    }

    /// The configuration used for every exchange.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration, e.g. to rotate the account.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Perform one exchange and hand back the raw HTTP response.
    ///
    /// `sub_path` extends the configured base path and must start with `/`.
    /// The `Authorization` and `Accept-Language` headers are attached only
    /// when the matching option flag is set *and* the configured value is
    /// non-empty.
    pub fn request(
        &mut self,
        method: Method,
        sub_path: &str,
        options: RequestOptions,
        body: Option<RawBody<'_>>,
    ) -> Result<http::Response, Error> {
        let parsed = self.config.parsed_url()?;
        let authority = parsed.authority()?;

        let mut path: String<MAX_PATH_LEN> = String::new();
        path.push_str(parsed.base_path).map_err(|_| Error::Encode)?;
        path.push_str(sub_path).map_err(|_| Error::Encode)?;

        let mut headers: Vec<Header, MAX_HEADERS> = Vec::new();
        push_header(&mut headers, "Host", &parsed.host_header()?)?;
        push_header(
            &mut headers,
            "Connection",
            if self.config.keep_alive {
                "keep-alive"
            } else {
                "close"
            },
        )?;
        if options.authorization && !self.config.authorization_token().is_empty() {
            push_header(&mut headers, "Authorization", self.config.authorization_token())?;
        }
        if options.accept_language && !self.config.accept_language().is_empty() {
            push_header(&mut headers, "Accept-Language", self.config.accept_language())?;
        }
        if let Some(raw) = body {
            push_header(&mut headers, "Content-Type", raw.content_type)?;
        }

        let connection = self.network.connect(&authority).map_err(|_| Error::Connect)?;
        let mut client = http::Client::new(connection);
        let request = http::Request {
            method,
            path: path.as_str(),
            headers,
            body: body.map(|raw| raw.data),
        };
        let response = client.request(&request).map_err(Error::Transport)?;
        let _ = client.close();
        Ok(response)
    }

    /// Perform one JSON exchange: serialize `payload`, send, deserialize
    /// the response body into `Resp` and stamp the observed status code
    /// into it.
    ///
    /// An empty response body yields `(status, None)`; update and delete
    /// style operations answer `204 No Content`. A non-empty body is
    /// deserialized regardless of the status code, since the service
    /// reports failures through the same `{code, message}` shape it uses
    /// for success.
    pub fn execute<Req, Resp>(
        &mut self,
        method: Method,
        sub_path: &str,
        options: RequestOptions,
        payload: Option<&Req>,
    ) -> Result<(u16, Option<Resp>), Error>
    where
        Req: Serialize,
        Resp: DeserializeOwned + StatusCarrier,
    {
        let mut body_buf = [0u8; MAX_REQUEST_BODY_LEN];
        let body = match payload {
            Some(value) => {
                let len =
                    serde_json_core::to_slice(value, &mut body_buf).map_err(|_| Error::Encode)?;
                Some(RawBody {
                    content_type: CONTENT_TYPE_JSON,
                    data: &body_buf[..len],
                })
            }
            None => None,
        };

        let response = self.request(method, sub_path, options, body)?;
        if response.body.is_empty() {
            return Ok((response.status_code, None));
        }
        match serde_json_core::from_slice::<Resp>(&response.body) {
            Ok((mut value, _)) => {
                value.set_status_code(response.status_code);
                Ok((response.status_code, Some(value)))
            }
            Err(_) => Err(Error::Decode),
        }
    }
}

/// Decode a JSON response body into `Resp`, stamping the observed status
/// code into it. Empty and undecodable bodies yield `None`.
///
/// For operations that drive [`RestClient::request`] directly because they
/// also need response headers or raw body bytes.
pub fn decode_response<Resp>(response: &http::Response) -> Option<Resp>
where
    Resp: DeserializeOwned + StatusCarrier,
{
    if response.body.is_empty() {
        return None;
    }
    let (mut value, _) = serde_json_core::from_slice::<Resp>(&response.body).ok()?;
    value.set_status_code(response.status_code);
    Some(value)
}

fn push_header(
    headers: &mut Vec<Header, MAX_HEADERS>,
    name: &str,
    value: &str,
) -> Result<(), Error> {
    let header = Header {
        name: String::try_from(name).map_err(|_| Error::Encode)?,
        value: String::try_from(value).map_err(|_| Error::Encode)?,
    };
    headers.push(header).map_err(|_| Error::Encode)
}
