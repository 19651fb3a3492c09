use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Config, LengthRange, ModelId};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub inference: Option<InferenceSection>,
    pub summary: Option<SummarySection>,
    pub server: Option<ServerSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InferenceSection {
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarySection {
    pub model: Option<ModelId>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_mb: Option<usize>,
}

/// Platform config directory path: `<config_dir>/pdfsum/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfsum").join("config.toml"))
}

/// Load config by cascading CWD `.pdfsum.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfsum.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bi = base.inference.unwrap_or_default();
    let oi = overlay.inference.unwrap_or_default();
    let bs = base.summary.unwrap_or_default();
    let os = overlay.summary.unwrap_or_default();
    let bv = base.server.unwrap_or_default();
    let ov = overlay.server.unwrap_or_default();

    ConfigFile {
        inference: Some(InferenceSection {
            endpoint: oi.endpoint.or(bi.endpoint),
            api_token: oi.api_token.or(bi.api_token),
            timeout_secs: oi.timeout_secs.or(bi.timeout_secs),
        }),
        summary: Some(SummarySection {
            model: os.model.or(bs.model),
            min_length: os.min_length.or(bs.min_length),
            max_length: os.max_length.or(bs.max_length),
        }),
        server: Some(ServerSection {
            host: ov.host.or(bv.host),
            port: ov.port.or(bv.port),
            max_upload_mb: ov.max_upload_mb.or(bv.max_upload_mb),
        }),
    }
}

impl Config {
    /// Apply config file values over the defaults.
    ///
    /// A length pair that is inverted or outside the interactive bounds is
    /// ignored (with a warning) and the default range is kept.
    pub fn from_file(file: &ConfigFile) -> Self {
        let mut config = Config::default();

        if let Some(ref inference) = file.inference {
            if let Some(ref endpoint) = inference.endpoint {
                config.inference.endpoint = endpoint.clone();
            }
            if inference.api_token.is_some() {
                config.inference.api_token = inference.api_token.clone();
            }
            if let Some(secs) = inference.timeout_secs {
                config.inference.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(ref summary) = file.summary {
            if let Some(model) = summary.model {
                config.default_model = model;
            }
            let min = summary.min_length.unwrap_or(config.default_lengths.min());
            let max = summary.max_length.unwrap_or(config.default_lengths.max());
            match LengthRange::bounded(min, max) {
                Ok(range) => config.default_lengths = range,
                Err(e) => tracing::warn!(error = %e, "ignoring configured summary lengths"),
            }
        }

        if let Some(ref server) = file.server {
            if let Some(ref host) = server.host {
                config.host = host.clone();
            }
            if let Some(port) = server.port {
                config.port = port;
            }
            if let Some(mb) = server.max_upload_mb {
                config.max_upload_bytes = mb.saturating_mul(1024 * 1024);
            }
        }

        config
    }

    /// Apply environment overrides. `lookup` is `std::env::var` in binaries.
    ///
    /// Recognized: `HF_API_TOKEN`, `PDFSUM_INFERENCE_URL`, `PDFSUM_HOST`,
    /// `PDFSUM_PORT`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("HF_API_TOKEN").filter(|t| !t.is_empty()) {
            self.inference.api_token = Some(token);
        }
        if let Some(url) = lookup("PDFSUM_INFERENCE_URL").filter(|u| !u.is_empty()) {
            self.inference.endpoint = url;
        }
        if let Some(host) = lookup("PDFSUM_HOST").filter(|h| !h.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup("PDFSUM_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
    }

    /// Defaults, then config files, then the process environment.
    pub fn load() -> Self {
        let mut config = Config::from_file(&load_config());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }
}
