use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use heapless::String;
use smartcosmos::client::{Config, derive_token};
use smartcosmos::endpoints::objects::{NewObjectRequest, ObjectManagementEndpoint};
use smartcosmos::network::{Close, Connect, Connection, Read, Write, error};
use std::hint::black_box;
use std::rc::Rc;

/// Replays the same canned response on every connection; writes go to a
/// sink. Keeps the benchmark on the client, not on any real socket.
#[derive(Clone)]
struct CannedNetwork {
    response: Rc<Vec<u8>>,
}

struct CannedConnection {
    response: Rc<Vec<u8>>,
    read_pos: usize,
}

impl Read for CannedConnection {
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

impl Write for CannedConnection {
    type Error = error::Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for CannedConnection {
    type Error = error::Error;

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for CannedConnection {}

impl Connect for CannedNetwork {
    type Connection = CannedConnection;
    type Error = error::Error;

    fn connect(&mut self, _remote: &str) -> Result<Self::Connection, Self::Error> {
        Ok(CannedConnection {
            response: Rc::clone(&self.response),
            read_pos: 0,
        })
    }
}

fn canned_response() -> Vec<u8> {
    let body = br#"{"code":3,"message":"urn:uuid:0a9ff8b6-2943-4d08-bd33-92ab45a9d269"}"#;
    let mut response = format!(
        "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

pub fn bench_derive_token(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_token");
    group.bench_function("derive_token", |b| {
        b.iter(|| derive_token(black_box("Aladdin"), black_box("open sesame")))
    });
    group.finish();
}

pub fn bench_object_create(c: &mut Criterion) {
    let network = CannedNetwork {
        response: Rc::new(canned_response()),
    };
    let mut config = Config::new();
    config
        .set_server_url("http://bench.smart-cosmos.test/service/rest")
        .unwrap();
    config.set_user_account("Aladdin", "open sesame");
    let mut objects = ObjectManagementEndpoint::new(network, config);

    let mut request = NewObjectRequest::default();
    request.object_type = String::try_from("thermostat").unwrap();
    request.name = String::try_from("Living room sensor").unwrap();

    let mut group = c.benchmark_group("object_create");
    group.throughput(Throughput::Elements(1));
    group.bench_function("create", |b| b.iter(|| objects.create(black_box(&request))));
    group.finish();
}

criterion_group!(benches, bench_derive_token, bench_object_create);
criterion_main!(benches);
