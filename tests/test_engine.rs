use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use metronome::config::Config;
use metronome::http::request::Method;
use metronome::http::response::Response;
use metronome::server::engine::Engine;
use metronome::server::router::Router;

fn config() -> Config {
    Config {
        request_timeout_seconds: 10,
        ..Config::default()
    }
}

fn hello_router() -> Router {
    let mut router = Router::new();
    router
        .register(
            "/",
            Method::GET,
            Box::new(|_, _, _| Ok(Response::html("<b>Hello, world!</b>"))),
        )
        .unwrap();
    router
}

/// Ticks the engine while pulling whatever the server has sent, until the
/// server closes the connection or the step cap trips.
fn drive_until_closed(engine: &mut Engine, client: &mut TcpStream) -> Vec<u8> {
    client.set_nonblocking(true).unwrap();
    let mut received = Vec::new();
    let mut buf = [0u8; 1024];

    for _ in 0..100_000 {
        engine.step();
        match client.read(&mut buf) {
            Ok(0) => return received,
            Ok(n) => received.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(e) => panic!("client read failed: {e}"),
        }
    }
    panic!("server never closed the connection");
}

#[test]
fn test_end_to_end_hello_world() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let mut engine = Engine::new(listener, hello_router(), config()).unwrap();

    let mut client = TcpStream::connect(addr).unwrap();
    client.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();

    let received = drive_until_closed(&mut engine, &mut client);
    assert_eq!(
        received,
        b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 20\r\n\r\n<b>Hello, world!</b>"
    );
    assert_eq!(engine.active_connections(), 0);
}

#[test]
fn test_end_to_end_missing_route_404() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let mut engine = Engine::new(listener, hello_router(), config()).unwrap();

    let mut client = TcpStream::connect(addr).unwrap();
    client
        .write_all(b"GET /missing HTTP/1.1\r\nHost: x\r\n\r\n")
        .unwrap();

    let received = drive_until_closed(&mut engine, &mut client);
    assert!(received.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
}

#[test]
fn test_request_spread_over_many_writes() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let mut engine = Engine::new(listener, hello_router(), config()).unwrap();

    let mut client = TcpStream::connect(addr).unwrap();
    let request = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";

    // Dribble the request a few bytes at a time, ticking in between.
    for chunk in request.chunks(5) {
        client.write_all(chunk).unwrap();
        for _ in 0..10 {
            engine.step();
        }
    }

    let received = drive_until_closed(&mut engine, &mut client);
    assert!(received.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(received.ends_with(b"<b>Hello, world!</b>"));
}

#[test]
fn test_connection_cap_is_enforced() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let cfg = Config {
        max_connections: 1,
        ..config()
    };
    let mut engine = Engine::new(listener, hello_router(), cfg).unwrap();

    // Two clients; only one may be admitted at a time.
    let _idle = TcpStream::connect(addr).unwrap();
    let _second = TcpStream::connect(addr).unwrap();

    for _ in 0..50 {
        engine.step();
        assert!(engine.active_connections() <= 1);
    }
    assert_eq!(engine.active_connections(), 1);
}

#[test]
fn test_silent_connection_is_torn_down_by_deadline() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let cfg = Config {
        request_timeout_seconds: 0,
        ..config()
    };
    let mut engine = Engine::new(listener, hello_router(), cfg).unwrap();

    let mut client = TcpStream::connect(addr).unwrap();

    // Tick until the connection is accepted and then reaped.
    let mut seen_active = false;
    for _ in 0..1000 {
        std::thread::sleep(Duration::from_millis(1));
        let active = engine.step();
        seen_active |= active > 0;
        if seen_active && active == 0 {
            break;
        }
    }
    assert!(seen_active, "connection was never accepted");
    assert_eq!(engine.active_connections(), 0);

    // Torn down silently: the client sees EOF with no response bytes.
    client
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let mut buf = Vec::new();
    client.read_to_end(&mut buf).unwrap();
    assert!(buf.is_empty());
}

#[test]
fn test_two_connections_serviced_independently() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let mut engine = Engine::new(listener, hello_router(), config()).unwrap();

    // One well-formed client and one that sends garbage; the bad peer must
    // not affect the good one.
    let mut good = TcpStream::connect(addr).unwrap();
    let mut bad = TcpStream::connect(addr).unwrap();
    good.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
    bad.write_all(b"not an http request\r\n\r\n").unwrap();

    let received = drive_until_closed(&mut engine, &mut good);
    assert!(received.starts_with(b"HTTP/1.1 200 OK\r\n"));

    bad.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
    let mut bad_resp = Vec::new();
    bad.read_to_end(&mut bad_resp).unwrap();
    assert!(bad_resp.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
}
