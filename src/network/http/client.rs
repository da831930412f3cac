use super::{MAX_BODY_LEN, MAX_HEADER_NAME_LEN, MAX_HEADER_VALUE_LEN, MAX_HEADERS};
use crate::network::Connection;
use crate::network::error::Error;
use core::fmt::Write;
use heapless::{String, Vec};

/// Capacity of the serialized request line + header block.
const MAX_HEAD_LEN: usize = 2048;
/// Size of the buffer used for the initial response read.
const READ_WINDOW_LEN: usize = 2048;

/// Default `User-Agent` sent when the caller does not provide one.
const USER_AGENT: &str = concat!("smartcosmos/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Header {
    pub name: String<MAX_HEADER_NAME_LEN>,
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

pub struct Request<'a> {
    pub method: Method,
    pub path: &'a str,
    pub headers: Vec<Header, MAX_HEADERS>,
    pub body: Option<&'a [u8]>,
}

#[derive(Debug)]
pub struct Response {
    pub status_code: u16,
    pub headers: Vec<Header, MAX_HEADERS>,
    pub body: Vec<u8, MAX_BODY_LEN>,
}

impl Response {
    /// Look up a response header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

pub struct Client<C: Connection> {
    connection: C,
}

impl<C: Connection> Client<C> {
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    /// Perform one request/response exchange.
    ///
    /// The head (request line + headers) is serialized into a fixed buffer;
    /// the body, if any, is written straight from the caller's slice so
    /// large uploads never need a combined copy. Reading stops once
    /// `Content-Length` bytes of body have arrived, or when the peer closes
    /// the connection.
    pub fn request(&mut self, request: &Request) -> Result<Response, Error> {
        let mut head: Vec<u8, MAX_HEAD_LEN> = Vec::new();

        // Request line
        head.extend_from_slice(request.method.as_str().as_bytes())
            .map_err(|_| Error::WriteError)?;
        head.push(b' ').map_err(|_| Error::WriteError)?;
        head.extend_from_slice(request.path.as_bytes())
            .map_err(|_| Error::WriteError)?;
        head.extend_from_slice(b" HTTP/1.1\r\n")
            .map_err(|_| Error::WriteError)?;

        // Headers
        let mut has_user_agent = false;
        for header in &request.headers {
            if header.name.eq_ignore_ascii_case("User-Agent") {
                has_user_agent = true;
            }
            head.extend_from_slice(header.name.as_bytes())
                .map_err(|_| Error::WriteError)?;
            head.extend_from_slice(b": ").map_err(|_| Error::WriteError)?;
            head.extend_from_slice(header.value.as_bytes())
                .map_err(|_| Error::WriteError)?;
            head.extend_from_slice(b"\r\n").map_err(|_| Error::WriteError)?;
        }

        if !has_user_agent {
            head.extend_from_slice(b"User-Agent: ")
                .map_err(|_| Error::WriteError)?;
            head.extend_from_slice(USER_AGENT.as_bytes())
                .map_err(|_| Error::WriteError)?;
            head.extend_from_slice(b"\r\n").map_err(|_| Error::WriteError)?;
        }

        if let Some(body) = request.body {
            let mut len_str: String<10> = String::new();
            write!(len_str, "{}", body.len()).map_err(|_| Error::WriteError)?;
            head.extend_from_slice(b"Content-Length: ")
                .map_err(|_| Error::WriteError)?;
            head.extend_from_slice(len_str.as_bytes())
                .map_err(|_| Error::WriteError)?;
            head.extend_from_slice(b"\r\n").map_err(|_| Error::WriteError)?;
        }
        head.extend_from_slice(b"\r\n").map_err(|_| Error::WriteError)?;

        // --- Send ---
        self.write_all(&head)?;
        if let Some(body) = request.body {
            self.write_all(body)?;
        }
        self.connection.flush().map_err(|_| Error::WriteError)?;

        // --- Receive the head and whatever body arrives with it ---
        let mut window = [0u8; READ_WINDOW_LEN];
        let mut total_read = 0;
        loop {
            match self.connection.read(&mut window[total_read..]) {
                Ok(0) if total_read > 0 => break, // closed, but we have data
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => {
                    total_read += n;
                    if total_read >= window.len() {
                        break;
                    }
                    if find_slice(&window[..total_read], b"\r\n\r\n").is_some() {
                        break;
                    }
                }
                Err(_) => return Err(Error::ReadError),
            }
        }

        // --- Parse ---
        let response_data = &window[..total_read];
        let header_end_pos = find_slice(response_data, b"\r\n\r\n").ok_or(Error::ProtocolError)?;
        let header_data = &response_data[..header_end_pos];
        let body_data = &response_data[header_end_pos + 4..];

        let header_str = core::str::from_utf8(header_data).map_err(|_| Error::ProtocolError)?;
        let mut lines = header_str.lines();

        let status_line = lines.next().ok_or(Error::ProtocolError)?;
        let mut status_parts = status_line.splitn(3, ' ');
        status_parts.next(); // HTTP version
        let status_code = status_parts
            .next()
            .ok_or(Error::ProtocolError)?
            .parse::<u16>()
            .map_err(|_| Error::ProtocolError)?;

        let mut headers: Vec<Header, MAX_HEADERS> = Vec::new();
        let mut content_length: Option<usize> = None;

        for line in lines {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, ':');
            let name = parts.next().ok_or(Error::ProtocolError)?.trim();
            let value = parts.next().ok_or(Error::ProtocolError)?.trim();

            if name.eq_ignore_ascii_case("Content-Length") {
                content_length = value.parse::<usize>().ok();
            }

            headers
                .push(Header {
                    name: String::try_from(name).map_err(|_| Error::ProtocolError)?,
                    value: String::try_from(value).map_err(|_| Error::ProtocolError)?,
                })
                .map_err(|_| Error::ProtocolError)?;
        }

        let mut body: Vec<u8, MAX_BODY_LEN> =
            Vec::from_slice(body_data).map_err(|_| Error::ProtocolError)?;

        if let Some(len) = content_length {
            if len > body.capacity() {
                return Err(Error::ProtocolError);
            }
            while body.len() < len {
                let mut chunk = [0u8; 256];
                let remaining = len - body.len();
                let read_len = core::cmp::min(remaining, chunk.len());

                match self.connection.read(&mut chunk[..read_len]) {
                    Ok(0) => return Err(Error::ConnectionClosed), // prematurely closed
                    Ok(n) => {
                        if body.extend_from_slice(&chunk[..n]).is_err() {
                            return Err(Error::ProtocolError);
                        }
                    }
                    Err(_) => return Err(Error::ReadError),
                }
            }
            if body.len() > len {
                body.truncate(len);
            }
        }

        Ok(Response {
            status_code,
            headers,
            body,
        })
    }

    /// Close the underlying connection.
    pub fn close(self) -> Result<(), Error> {
        self.connection.close().map_err(|_| Error::ConnectionClosed)
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), Error> {
        while !data.is_empty() {
            let written = self.connection.write(data).map_err(|_| Error::WriteError)?;
            if written == 0 {
                return Err(Error::WriteError);
            }
            data = &data[written..];
        }
        Ok(())
    }
}

/// Finds the first occurrence of a slice in another slice and returns its starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
