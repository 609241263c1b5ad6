//! Shared test helpers: a one-thread HTTP server that answers each
//! incoming connection with the next canned response and records the raw
//! requests it received.

use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long the server waits for each expected connection before giving
/// up and failing the test.
const ACCEPT_DEADLINE: Duration = Duration::from_secs(5);

pub struct CannedResponse {
    pub status: u32,
    pub content_type: &'static str,
    pub body: &'static str,
}

impl CannedResponse {
    pub fn json(body: &'static str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body,
        }
    }

    pub fn text(status: u32, body: &'static str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body,
        }
    }
}

pub struct CannedServer {
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl CannedServer {
    /// Start a server on an ephemeral port that serves the given
    /// responses, one per connection, in order.
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let handle = thread::spawn(move || {
            listener
                .set_nonblocking(true)
                .expect("set listener nonblocking");
            let mut requests = Vec::new();
            for response in responses {
                let mut stream = accept_with_deadline(&listener);
                requests.push(read_request(&mut stream));
                let payload = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response.status,
                    reason(response.status),
                    response.content_type,
                    response.body.len(),
                    response.body
                );
                stream
                    .write_all(payload.as_bytes())
                    .expect("write response");
            }
            requests
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Wait for all canned responses to be consumed and return the raw
    /// requests the server saw.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().expect("server thread")
    }
}

/// Accept the next connection, failing instead of blocking forever when
/// a test makes fewer requests than it queued responses for.
fn accept_with_deadline(listener: &TcpListener) -> TcpStream {
    let deadline = Instant::now() + ACCEPT_DEADLINE;
    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                stream
                    .set_nonblocking(false)
                    .expect("set stream blocking");
                return stream;
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    panic!("timed out waiting for a request; a canned response went unused");
                }
                thread::sleep(Duration::from_millis(10));
            }
            Err(e) => panic!("accept connection: {e}"),
        }
    }
}

fn reason(status: u32) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        if let Some(pos) = find_blank_line(&buf) {
            break pos;
        }
        let n = stream.read(&mut chunk).expect("read request head");
        if n == 0 {
            return String::from_utf8_lossy(&buf).into_owned();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < header_end + 4 + content_length {
        let n = stream.read(&mut chunk).expect("read request body");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}
