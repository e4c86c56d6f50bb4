//! Minimal HTTP/1.1 file server for integration tests.
//!
//! Serves scripted replies per path (the last reply repeats), counts requests
//! per path, and tracks the peak number of requests being handled at once.
//! Unknown paths get 404.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    /// Pause between the response head and the first body byte.
    pub stall: Duration,
    /// Pause between body bytes; zero sends the body in one write.
    pub byte_interval: Duration,
}

impl Reply {
    pub fn ok(body: &[u8]) -> Self {
        Self {
            status: 200,
            body: body.to_vec(),
            ..Self::default()
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// 200 whose body arrives one byte every `interval`.
    pub fn trickle(body: &[u8], interval: Duration) -> Self {
        Self {
            byte_interval: interval,
            ..Self::ok(body)
        }
    }

    /// 200 that sends its head, then nothing for `pause`.
    pub fn stall(body: &[u8], pause: Duration) -> Self {
        Self {
            stall: pause,
            ..Self::ok(body)
        }
    }
}

#[derive(Default)]
struct State {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    hits: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    delay: Mutex<Duration>,
}

pub struct FileServer {
    url: String,
    state: Arc<State>,
}

impl FileServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(State::default());
        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&accept_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            url: format!("http://127.0.0.1:{}/", port),
            state,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Every request waits this long before it is answered.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    /// Always answer `path` with 200 and `body`.
    pub fn serve(&self, path: &str, body: &[u8]) {
        self.script(path, vec![Reply::ok(body)]);
    }

    /// Answer `path` with `replies` in order; the last one repeats.
    pub fn script(&self, path: &str, replies: Vec<Reply>) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path.trim_start_matches('/').to_string(), replies.into());
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(path.trim_start_matches('/'))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.hits.lock().unwrap().values().sum()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.state.peak.load(Ordering::SeqCst)
    }
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some(request) = read_head(&mut stream) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("/").trim_start_matches('/').to_string();

    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.peak.fetch_max(now, Ordering::SeqCst);
    *state.hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let reply = {
        let mut routes = state.routes.lock().unwrap();
        match routes.get_mut(&path) {
            Some(q) if q.len() > 1 => q.pop_front().unwrap(),
            Some(q) => q.front().cloned().unwrap_or_else(|| Reply::status(404)),
            None => Reply::status(404),
        }
    };

    let body: &[u8] = if method.eq_ignore_ascii_case("HEAD") {
        &[]
    } else {
        &reply.body
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.body.len()
    );
    // Leave the in-flight count before replying so the client's next request is never counted twice.
    state.in_flight.fetch_sub(1, Ordering::SeqCst);
    if stream.write_all(head.as_bytes()).and_then(|_| stream.flush()).is_err() {
        return;
    }
    if !reply.stall.is_zero() {
        thread::sleep(reply.stall);
    }
    if reply.byte_interval.is_zero() {
        let _ = stream.write_all(body);
    } else {
        for byte in body {
            if stream.write_all(&[*byte]).and_then(|_| stream.flush()).is_err() {
                return;
            }
            thread::sleep(reply.byte_interval);
        }
    }
    let _ = stream.flush();
}

/// Reads until the blank line that ends the request head.
fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(buf).ok()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
