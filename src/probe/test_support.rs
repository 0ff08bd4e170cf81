use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Scripted reply for one connection, served in order; the last one repeats.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json {
        status: u16,
        body: &'static str,
        headers: Vec<(&'static str, &'static str)>,
    },
    Text {
        status: u16,
        body: &'static str,
    },
    Echo,
    Silent,
    /// Sends the head and part of the body, then never finishes.
    Stall {
        declared_len: usize,
        sent: &'static str,
    },
}

impl Reply {
    pub(crate) const fn json(body: &'static str) -> Self {
        Reply::Json {
            status: 200,
            body,
            headers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Captured {
    pub(crate) request_line: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl Captured {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub(crate) struct MockServer {
    pub(crate) base_url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl MockServer {
    pub(crate) fn captured(&self) -> Result<Vec<Captured>, String> {
        self.captured
            .lock()
            .map(|guard| guard.clone())
            .map_err(|err| format!("captured lock poisoned: {}", err))
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawns a one-request-per-connection HTTP/1.1 server on 127.0.0.1.
pub(crate) fn spawn_mock(replies: Vec<Reply>) -> Result<MockServer, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let captured = Arc::new(Mutex::new(Vec::new()));
    let shutdown = Arc::new(AtomicBool::new(false));
    let thread_captured = Arc::clone(&captured);
    let thread_shutdown = Arc::clone(&shutdown);

    let handle = thread::spawn(move || {
        let mut served = 0usize;
        loop {
            if thread_shutdown.load(Ordering::SeqCst) {
                break;
            }
            match listener.accept() {
                Ok((stream, _)) => {
                    let reply = replies
                        .get(served)
                        .or_else(|| replies.last())
                        .cloned()
                        .unwrap_or(Reply::Silent);
                    served = served.saturating_add(1);
                    let captured = Arc::clone(&thread_captured);
                    let shutdown = Arc::clone(&thread_shutdown);
                    thread::spawn(move || handle_client(stream, &reply, &captured, &shutdown));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok(MockServer {
        base_url: format!("http://{}", addr),
        captured,
        shutdown,
        thread: Some(handle),
    })
}

/// Returns a base URL on which nothing listens.
pub(crate) fn unused_base_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind probe port failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("probe addr failed: {}", err))?;
    drop(listener);
    Ok(format!("http://{}", addr))
}

fn handle_client(
    mut stream: TcpStream,
    reply: &Reply,
    captured: &Mutex<Vec<Captured>>,
    shutdown: &AtomicBool,
) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let echo_body = request.body.clone();
    if let Ok(mut guard) = captured.lock() {
        guard.push(request);
    }

    let response = match reply {
        Reply::Json {
            status,
            body,
            headers,
        } => render_response(*status, "application/json", headers, body.as_bytes()),
        Reply::Text { status, body } => render_response(*status, "text/html", &[], body.as_bytes()),
        Reply::Echo => render_response(200, "application/json", &[], &echo_body),
        Reply::Silent => {
            wait_for_shutdown(shutdown);
            return;
        }
        Reply::Stall { declared_len, sent } => {
            let head = format!(
                "HTTP/1.1 200 Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                declared_len, sent
            );
            if stream.write_all(head.as_bytes()).is_err() || stream.flush().is_err() {
                return;
            }
            wait_for_shutdown(shutdown);
            return;
        }
    };
    if stream.write_all(&response).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn wait_for_shutdown(shutdown: &AtomicBool) {
    while !shutdown.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(20));
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Captured> {
    let mut data = Vec::new();
    let mut buffer = [0u8; 1024];
    let header_end = loop {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            return None;
        }
        data.extend_from_slice(buffer.get(..read)?);
        if let Some(pos) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
    };
    let head = String::from_utf8_lossy(data.get(..header_end)?).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end.checked_add(4)?;
    let mut body = data.get(body_start..)?.to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(buffer.get(..read)?);
    }

    Some(Captured {
        request_line,
        headers,
        body,
    })
}

fn render_response(
    status: u16,
    content_type: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> Vec<u8> {
    let mut head = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        content_type,
        body.len()
    );
    for (key, value) in headers {
        head.push_str(key);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    let mut response = head.into_bytes();
    response.extend_from_slice(body);
    response
}
