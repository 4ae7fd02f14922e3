use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostic::Diagnostic;
use crate::godel::{GodelError, PrimeValueGenerator};
use crate::span::Span;

pub const CONFIG_FILE: &str = "quiche.toml";

/// Encoder settings from quiche.toml. Every field has a default, so a
/// missing file and an empty file mean the same thing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// First prime handed out is the smallest prime >= this.
    pub first_prime: u64,
    pub first_value: u32,
    pub parallel: bool,
    /// Directory for snapshot files, relative to `root_dir`.
    pub snapshot_dir: Option<PathBuf>,
    /// Directory holding the quiche.toml (or `.` for defaults).
    pub root_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            first_prime: PrimeValueGenerator::DEFAULT_PRIME_FLOOR,
            first_value: PrimeValueGenerator::DEFAULT_FIRST_VALUE,
            parallel: false,
            snapshot_dir: None,
            root_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load settings from a quiche.toml file.
    pub fn load(toml_path: &Path) -> Result<Config, Diagnostic> {
        let content = std::fs::read_to_string(toml_path).map_err(|e| {
            Diagnostic::error(
                format!("cannot read '{}': {}", toml_path.display(), e),
                Span::dummy(),
            )
        })?;
        let root_dir = toml_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::parse(&content, root_dir)
    }

    /// Read `[encoder]` and `[output]` from quiche.toml text. Unknown
    /// sections and keys are ignored.
    pub fn parse(content: &str, root_dir: PathBuf) -> Result<Config, Diagnostic> {
        let file: QuicheToml = toml::from_str(content).map_err(|e| {
            let span = e
                .span()
                .map(|r| Span::new(r.start as u32, r.end as u32))
                .unwrap_or_else(Span::dummy);
            Diagnostic::error(format!("invalid {}: {}", CONFIG_FILE, e.message()), span)
        })?;

        let mut config = Config {
            root_dir,
            ..Config::default()
        };
        if let Some(first_prime) = file.encoder.first_prime {
            config.first_prime = first_prime.into_inner();
        }
        if let Some(first_value) = file.encoder.first_value {
            let span = first_value.span();
            let value = first_value.into_inner();
            if value < 2 {
                return Err(Diagnostic::error(
                    format!("`encoder.first_value` must be at least 2, got {}", value),
                    Span::new(span.start as u32, span.end as u32),
                )
                .with_help("values are exponents; 0 and 1 would not be decodable".to_string()));
            }
            config.first_value = value;
        }
        if let Some(parallel) = file.encoder.parallel {
            config.parallel = parallel;
        }
        config.snapshot_dir = file.output.snapshot_dir;

        Ok(config)
    }

    /// Try to find a quiche.toml in the given directory or its ancestors.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Settings for encoding `input`: the nearest quiche.toml above it,
    /// or defaults when there is none.
    pub fn discover(input: &Path) -> Result<Config, Diagnostic> {
        let start = match input.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        match Self::find(&start) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using configuration");
                Self::load(&path)
            }
            None => Ok(Config::default()),
        }
    }

    pub fn generator(&self) -> Result<PrimeValueGenerator, GodelError> {
        PrimeValueGenerator::seeded(self.first_prime, self.first_value)
    }

    /// Where the snapshot for `input` goes by default:
    /// `<snapshot_dir>/<name>.symbols.json`, or next to the input.
    pub fn snapshot_path_for(&self, input: &Path) -> PathBuf {
        let mut file_name = input
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "program".into());
        file_name.push(".symbols.json");
        match &self.snapshot_dir {
            Some(dir) => self.root_dir.join(dir).join(file_name),
            None => input.with_file_name(file_name),
        }
    }
}

/// On-disk layout of quiche.toml.
#[derive(Debug, Default, Deserialize)]
struct QuicheToml {
    #[serde(default)]
    encoder: EncoderSection,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Default, Deserialize)]
struct EncoderSection {
    first_prime: Option<toml::Spanned<u64>>,
    first_value: Option<toml::Spanned<u32>>,
    parallel: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputSection {
    snapshot_dir: Option<PathBuf>,
}
