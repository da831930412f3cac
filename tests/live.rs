//! Smoke test against a live service instance.
//!
//! Set `SMARTCOSMOS_SERVER_URL` in the environment or a `.env` file to an
//! `http://` deployment (the plain-TCP connector here does not speak TLS)
//! to enable it; without the variable the test passes without connecting.

use dotenvy::dotenv;
use smartcosmos::client::Config;
use smartcosmos::endpoints::registration::{RegistrationActionResult, RegistrationEndpoint};
use smartcosmos::network::{Close, Connect, Connection, Read, Write, error};
use std::env;
use std::io::{Read as StdRead, Write as StdWrite};
use std::net::TcpStream;
use std::time::Duration;

#[derive(Clone)]
struct TcpConnector;

struct LiveConnection {
    stream: TcpStream,
}

impl Read for LiveConnection {
    type Error = error::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream.read(buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut
            {
                error::Error::Timeout
            } else {
                error::Error::ReadError
            }
        })
    }
}

impl Write for LiveConnection {
    type Error = error::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream.write(buf).map_err(|_| error::Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush().map_err(|_| error::Error::WriteError)
    }
}

impl Close for LiveConnection {
    type Error = error::Error;

    fn close(self) -> Result<(), Self::Error> {
        let _ = self.stream.shutdown(std::net::Shutdown::Both);
        Ok(())
    }
}

impl Connection for LiveConnection {}

impl Connect for TcpConnector {
    type Connection = LiveConnection;
    type Error = error::Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        let stream =
            TcpStream::connect(remote).map_err(|_| error::Error::ConnectionRefused)?;
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .map_err(|_| error::Error::ConnectionRefused)?;
        Ok(LiveConnection { stream })
    }
}

#[test]
fn realm_availability_against_a_live_service() {
    dotenv().ok();
    let Ok(server_url) = env::var("SMARTCOSMOS_SERVER_URL") else {
        return;
    };

    let mut config = Config::new();
    config.set_server_url(&server_url).unwrap();
    let mut registration = RegistrationEndpoint::new(TcpConnector, config);

    let (result, response) = registration.realm_availability("a-realm-nobody-registered");
    assert_eq!(result, RegistrationActionResult::Successful);
    let response = response.expect("realm check should return a body");
    assert_eq!(response.http_status_code, 200);
    assert_eq!(response.realm.as_str(), "a-realm-nobody-registered");
}
