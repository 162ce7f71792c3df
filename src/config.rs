use serde::Deserialize;

/// Server limits and tuning knobs, supplied at construction.
///
/// Loaded from a YAML file when `METRONOME_CONFIG` points at one, otherwise
/// defaults apply. `LISTEN` overrides the listen address either way.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Byte cap on any single unterminated line (start line or header line).
    pub max_request_line_size: usize,
    /// Cap on the number of header lines in one request.
    pub max_header_count: usize,
    /// Byte cap on the declared request body.
    pub max_body_bytes: usize,
    /// Wall-clock budget from accept to full response drain.
    pub request_timeout_seconds: u64,
    /// Most bytes one fill() will buffer before the parser consumes them.
    pub read_chunk_size: usize,
    /// Most bytes one drain() will hand to the OS.
    pub write_chunk_size: usize,
    /// Accepts are refused while this many connections are active.
    pub max_connections: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_request_line_size: 4096,
            max_header_count: 50,
            max_body_bytes: 65536,
            request_timeout_seconds: 10,
            read_chunk_size: 1024,
            write_chunk_size: 1024,
            max_connections: 5,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("METRONOME_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&raw)?
            }
            Err(_) => Config::default(),
        };
        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.listen_addr = addr;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// A chunk smaller than one line's budget could stall line parsing,
    /// and zero-sized buffers cannot make progress at all.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.read_chunk_size == 0 || self.write_chunk_size == 0 {
            anyhow::bail!("read/write chunk sizes must be non-zero");
        }
        if self.max_request_line_size == 0 {
            anyhow::bail!("max_request_line_size must be non-zero");
        }
        if self.max_connections == 0 {
            anyhow::bail!("max_connections must be non-zero");
        }
        Ok(())
    }
}
