//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use browscap_cache::cache::meta::DEFAULT_EXPIRATION;
use browscap_cache::core::model::{Op, Record};
use browscap_cache::core::paths::is_safe_key;
use browscap_cache::core::render::{OutputFormat, RenderConfig, Renderer};
use browscap_cache::{
    AdapterConfig, CacheAdapter, ConfigOverrides, FileStoreAdapter, VersionedCacheProxy,
};

/// browscap-cache - inspect and edit a browscap JSON file cache.
#[derive(Parser, Debug)]
#[command(name = "browscap-cache")]
#[command(
    author,
    version,
    about,
    long_about = r#"browscap-cache reads and writes the JSON file cache used for browser-capability data.

Logical keys are suffixed with the current data version (stored under
`browscap.version`) unless --no-version is given, and values are stored
inside a {"content": ...} envelope.

Each command prints records in the selected format (default: jsonl).

Examples:
    browscap-cache --dir ./cache set browscap.version 6000 --no-version
    browscap-cache --dir ./cache set browser '{"Parent": "Firefox"}'
    browscap-cache --dir ./cache get browser
    browscap-cache --dir ./cache info
    browscap-cache --dir ./cache list
"#
)]
pub struct Cli {
    /// Cache root directory.
    #[arg(
        long,
        global = true,
        env = "BROWSCAP_CACHE_DIR",
        value_name = "DIR",
        long_help = "Cache root directory. Created if missing.\n\n\
If DIR names an existing file, its parent directory is used."
    )]
    pub dir: Option<PathBuf>,

    /// JSON config file (dir, namespace, cacheExpiration, readonly, cacheVersion).
    #[arg(long, global = true, env = "BROWSCAP_CACHE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Cosmetic cache namespace.
    #[arg(long, global = true, value_name = "NAME")]
    pub namespace: Option<String>,

    /// Skip the writability check on the cache directory.
    #[arg(long, global = true)]
    pub readonly: bool,

    /// Output format (jsonl/json/raw).
    #[arg(long, global = true, default_value = "jsonl", value_name = "FORMAT")]
    pub format: String,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose mode (debug logging on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the value stored under KEY.
    Get {
        #[arg(value_name = "KEY")]
        key: String,

        /// Use KEY as-is instead of suffixing the data version.
        #[arg(long)]
        no_version: bool,
    },

    /// Store VALUE under KEY. VALUE is parsed as JSON, falling back to a string.
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE")]
        value: String,

        /// Use KEY as-is instead of suffixing the data version.
        #[arg(long)]
        no_version: bool,
    },

    /// Check whether KEY exists.
    Has {
        #[arg(value_name = "KEY")]
        key: String,

        /// Use KEY as-is instead of suffixing the data version.
        #[arg(long)]
        no_version: bool,
    },

    /// Delete KEY.
    Remove {
        #[arg(value_name = "KEY")]
        key: String,

        /// Use KEY as-is instead of suffixing the data version.
        #[arg(long)]
        no_version: bool,
    },

    /// Delete the whole cache directory.
    Flush,

    /// Show the data version, release date and type.
    Info,

    /// List every stored entry.
    List,
}

/// Install the stderr log subscriber
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let renderer = Renderer::with_config(RenderConfig::with_pretty(format, cli.pretty));

    let config = load_config(&cli)?;
    let adapter = FileStoreAdapter::new(config).context("Failed to open cache directory")?;
    let expiration = match adapter.expiration() {
        0 => DEFAULT_EXPIRATION,
        seconds => seconds,
    };
    let cache = VersionedCacheProxy::with_expiration(adapter, expiration);

    let records = match cli.command {
        Commands::Get { key, no_version } => {
            check_key(&key)?;
            let physical = cache.physical_key(&key, !no_version);
            let record = match cache.get_item(&key, !no_version) {
                Some(value) => Record::new(Op::Get, true).with_value(value),
                None => Record::new(Op::Get, false),
            };
            vec![record.with_key(&key, physical)]
        }

        Commands::Set {
            key,
            value,
            no_version,
        } => {
            check_key(&key)?;
            let value = parse_value(&value);
            let physical = cache.physical_key(&key, !no_version);
            let ok = cache.set_item(&key, &value, !no_version);
            vec![Record::new(Op::Set, ok).with_key(&key, physical)]
        }

        Commands::Has { key, no_version } => {
            check_key(&key)?;
            let physical = cache.physical_key(&key, !no_version);
            let ok = cache.has_item(&key, !no_version);
            vec![Record::new(Op::Has, ok).with_key(&key, physical)]
        }

        Commands::Remove { key, no_version } => {
            check_key(&key)?;
            let physical = cache.physical_key(&key, !no_version);
            let ok = cache.remove_item(&key, !no_version);
            vec![Record::new(Op::Remove, ok).with_key(&key, physical)]
        }

        Commands::Flush => vec![Record::new(Op::Flush, cache.flush())],

        Commands::Info => {
            let version = cache.version();
            let info = json!({
                "version": version,
                "releaseDate": cache.release_date(),
                "type": cache.data_type(),
                "dir": cache.adapter().root(),
                "namespace": cache.adapter().namespace(),
                "cacheVersion": cache.adapter().cache_version(),
                "readonly": cache.adapter().is_readonly(),
            });
            vec![Record::new(Op::Info, version.is_some()).with_value(info)]
        }

        Commands::List => cache
            .adapter()
            .entries()
            .into_iter()
            .map(|entry| {
                let key = entry.key.clone();
                let value = serde_json::to_value(&entry).unwrap_or(Value::Null);
                Record::new(Op::List, true)
                    .with_key(&key, key.clone())
                    .with_value(value)
            })
            .collect(),
    };

    let output = renderer.render(&records);
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Layer defaults, the config file, then command-line values
fn load_config(cli: &Cli) -> Result<AdapterConfig> {
    let base = match &cli.config {
        Some(path) => AdapterConfig::from_file(path).context("Failed to load config")?,
        None => AdapterConfig::default(),
    };

    Ok(base.merge(ConfigOverrides {
        dir: cli.dir.clone(),
        namespace: cli.namespace.clone(),
        readonly: cli.readonly.then_some(true),
        ..Default::default()
    }))
}

fn check_key(key: &str) -> Result<()> {
    if !is_safe_key(key) {
        bail!("Invalid key {:?}: use only letters, digits, '.', '_' and '-'", key);
    }
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
