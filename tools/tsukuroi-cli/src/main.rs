//! Tsukuroi command line tool
//!
//! Parses release and subtitle file names, optionally standardizes them with
//! the shipped rules, and prints one JSON object per name.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tsukuroi_core::model::{EntityRef, EntitySnapshot, Media};
use tsukuroi_core::{ChangeRecord, CorrectionService, StandardParsers, StandardizingConfig};

/// CLI arguments
#[derive(Parser)]
#[command(name = "tsukuroi")]
#[command(about = "Parse and standardize release and subtitle file names")]
#[command(version)]
struct Cli {
    /// Names to parse; read from stdin, one per line, when omitted
    names: Vec<String>,

    /// How to read the names
    #[arg(short, long, value_enum, default_value_t = Kind::Auto)]
    kind: Kind,

    /// JSON file with standardization settings
    #[arg(short, long, env = "TSUKUROI_CONFIG")]
    config: Option<PathBuf>,

    /// Print parse results without applying correction rules
    #[arg(long)]
    no_correct: bool,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Subtitle file, then release, then bare media
    Auto,
    Subtitle,
    Release,
    Media,
}

/// One line of output.
#[derive(Serialize)]
struct Report {
    input: String,
    kind: Option<&'static str>,
    entities: Vec<EntityReport>,
    changes: Vec<ChangeRecord>,
}

/// A parsed root entity with everything nested in it.
#[derive(Serialize)]
struct EntityReport {
    root: EntitySnapshot,
    nested: Vec<EntitySnapshot>,
}

struct App {
    parsers: StandardParsers,
    service: CorrectionService,
    kind: Kind,
}

impl App {
    fn new(cli: &Cli) -> Result<Self> {
        let parsers = StandardParsers::new().context("failed to build the pattern catalog")?;
        let config = match (&cli.config, cli.no_correct) {
            (_, true) => StandardizingConfig::empty(),
            (Some(path), false) => load_config(path)?,
            (None, false) => StandardizingConfig::default(),
        };
        let service =
            CorrectionService::standard(&config).context("invalid standardization settings")?;

        Ok(Self {
            parsers,
            service,
            kind: cli.kind,
        })
    }

    fn roots(&self, name: &str) -> Result<Option<(&'static str, Vec<EntityRef>)>> {
        let try_subtitle = matches!(self.kind, Kind::Auto | Kind::Subtitle);
        let try_release = matches!(self.kind, Kind::Auto | Kind::Release);
        let try_media = matches!(self.kind, Kind::Auto | Kind::Media);

        if try_subtitle {
            if let Some(file) = self.parsers.subtitle_releases.parse(name)? {
                return Ok(Some(("subtitle_file", vec![EntityRef::new(&file)])));
            }
        }
        if try_release {
            if let Some(releases) = self.parsers.releases.parse(name)? {
                let roots = releases.iter().map(EntityRef::new).collect();
                return Ok(Some(("release", roots)));
            }
        }
        if try_media {
            if let Some(media) = self.parsers.media.parse(name)? {
                let roots = media.iter().map(Media::entity).collect();
                return Ok(Some(("media", roots)));
            }
        }
        Ok(None)
    }

    fn report(&self, name: &str) -> Result<Report> {
        let Some((kind, roots)) = self.roots(name)? else {
            warn!(name, "name not recognized");
            return Ok(Report {
                input: name.to_string(),
                kind: None,
                entities: Vec::new(),
                changes: Vec::new(),
            });
        };

        let mut changes = Vec::new();
        let mut entities = Vec::with_capacity(roots.len());
        for root in &roots {
            changes.extend(
                self.service
                    .process(root)
                    .with_context(|| format!("failed to standardize {name:?}"))?,
            );
            entities.push(EntityReport {
                root: root.snapshot(),
                nested: self
                    .service
                    .reachable(root)
                    .iter()
                    .skip(1)
                    .map(EntityRef::snapshot)
                    .collect(),
            });
        }
        debug!(name, kind, changes = changes.len(), "processed name");

        Ok(Report {
            input: name.to_string(),
            kind: Some(kind),
            entities,
            changes,
        })
    }
}

fn load_config(path: &Path) -> Result<StandardizingConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::new(&cli)?;

    let names: Vec<String> = if cli.names.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("failed to read names from stdin")?
    } else {
        cli.names.clone()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let report = app.report(name)?;
        let line = if cli.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        writeln!(out, "{line}")?;
    }

    Ok(())
}
