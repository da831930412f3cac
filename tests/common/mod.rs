//! Shared scripted transport for the endpoint integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use smartcosmos::client::Config;
use smartcosmos::network::{Close, Connect, Connection, Read, Write, error};

#[derive(Default)]
struct State {
    responses: VecDeque<Vec<u8>>,
    written: Vec<Vec<u8>>,
    remotes: Vec<String>,
    connects: usize,
}

/// Scripted in-memory connector. Every `connect` starts a fresh
/// connection that replays the next queued response and records whatever
/// the client writes.
#[derive(Clone, Default)]
pub struct MockNetwork {
    state: Rc<RefCell<State>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw HTTP response for the next connection.
    pub fn push_response(&self, bytes: &[u8]) {
        self.state.borrow_mut().responses.push_back(bytes.to_vec());
    }

    /// How many connections the client opened.
    pub fn connect_count(&self) -> usize {
        self.state.borrow().connects
    }

    /// The authority passed to the nth `connect`.
    pub fn remote(&self, index: usize) -> String {
        self.state.borrow().remotes[index].clone()
    }

    /// Everything the client wrote on the nth connection, as text.
    pub fn written(&self, index: usize) -> String {
        String::from_utf8(self.state.borrow().written[index].clone()).unwrap()
    }
}

impl Connect for MockNetwork {
    type Connection = MockConnection;
    type Error = error::Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        let mut state = self.state.borrow_mut();
        state.connects += 1;
        state.remotes.push(remote.to_string());
        state.written.push(Vec::new());
        let index = state.written.len() - 1;
        let response = state
            .responses
            .pop_front()
            .ok_or(error::Error::ConnectionRefused)?;
        Ok(MockConnection {
            response,
            read_pos: 0,
            index,
            state: Rc::clone(&self.state),
        })
    }
}

pub struct MockConnection {
    response: Vec<u8>,
    read_pos: usize,
    index: usize,
    state: Rc<RefCell<State>>,
}

impl Read for MockConnection {
    type Error = error::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.read_pos >= self.response.len() {
            return Ok(0);
        }
        let remaining = self.response.len() - self.read_pos;
        let to_read = buf.len().min(remaining);
        buf[..to_read].copy_from_slice(&self.response[self.read_pos..self.read_pos + to_read]);
        self.read_pos += to_read;
        Ok(to_read)
    }
}

impl Write for MockConnection {
    type Error = error::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.state.borrow_mut().written[self.index].extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = error::Error;

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for MockConnection {}

/// Build a raw HTTP/1.1 response; `Content-Length` is filled in.
pub fn http_response(status: u16, reason: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {status} {reason}\r\n").into_bytes();
    for (name, value) in headers {
        out.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    out.extend_from_slice(format!("Content-Length: {}\r\n\r\n", body.len()).as_bytes());
    out.extend_from_slice(body);
    out
}

/// JSON response shorthand.
pub fn json_response(status: u16, body: &str) -> Vec<u8> {
    http_response(
        status,
        reason_phrase(status),
        &[("Content-Type", "application/json")],
        body.as_bytes(),
    )
}

pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        409 => "Conflict",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Configuration pointing at the mock host, with a user account set so
/// authorized requests carry the derived token.
pub fn test_config() -> Config {
    let mut config = Config::new();
    config
        .set_server_url("http://mock.smart-cosmos.test/service/rest")
        .unwrap();
    config.set_user_account("Aladdin", "open sesame");
    config
}
