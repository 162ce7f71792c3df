use std::net::TcpListener;
use std::time::Duration;

use metronome::config::Config;
use metronome::http::request::Method;
use metronome::http::response::Response;
use metronome::server::engine::Engine;
use metronome::server::router::Router;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let mut router = Router::new();
    router.register(
        "/",
        Method::GET,
        Box::new(|_query, _headers, _body| Ok(Response::html("<b>Hello, world!</b>"))),
    )?;

    let listener = TcpListener::bind(&cfg.listen_addr)?;
    tracing::info!("listening on {}", cfg.listen_addr);

    let mut engine = Engine::new(listener, router, cfg)?;
    loop {
        engine.step();
        // Anything time-critical would run here, between ticks.
        std::thread::sleep(Duration::from_millis(1));
    }
}
