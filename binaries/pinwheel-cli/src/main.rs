//! Pinwheel CLI
//!
//! Encrypt and decrypt with a wheel set key, recover a key from known
//! plaintext or a per-line crib, estimate XOR wheels statistically, generate
//! random keys.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use std::io::Read;
use std::path::{Path, PathBuf};

use pinwheel_cipher::{
    AttackConfig, AttackSession, Cipher, KeyConfig, KnownText, TranspositionModel, XorEstimator,
    DEFAULT_CATALOG,
};

lazy_static! {
    static ref LINE_ENDINGS: Regex = Regex::new(r"\r\n?").unwrap();
}

#[derive(Parser)]
#[command(name = "pinwheel")]
#[command(about = "Ten-wheel XOR/transposition cipher and known-plaintext key recovery")]
#[command(version)]
struct Cli {
    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a message
    Encrypt {
        #[command(flatten)]
        key: KeySource,

        #[command(flatten)]
        message: Message,
    },

    /// Decrypt a message
    Decrypt {
        #[command(flatten)]
        key: KeySource,

        #[command(flatten)]
        message: Message,
    },

    /// Recover the wheel set from matching plaintext and ciphertext
    Learn {
        /// Plaintext file ('-' marks unknown symbols)
        #[arg(long, required_unless_present = "crib_header")]
        plaintext: Option<PathBuf>,

        /// Ciphertext file
        #[arg(long)]
        ciphertext: PathBuf,

        /// Known opening of every ciphertext line, used instead of --plaintext
        #[arg(long, conflicts_with = "plaintext")]
        crib_header: Option<String>,

        /// Known closing of every ciphertext line
        #[arg(long, requires = "crib_header")]
        crib_trailer: Option<String>,

        /// Attack settings file (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Candidate periods, comma separated
        #[arg(long, value_delimiter = ',')]
        catalog: Option<Vec<usize>>,

        /// Wheel i has the i-th catalog period
        #[arg(long)]
        pinned: bool,

        /// Write the learned key here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate an XOR wheel's bits from plaintext/ciphertext statistics
    Estimate {
        /// Plaintext file ('-' marks unknown symbols)
        #[arg(long)]
        plaintext: PathBuf,

        /// Ciphertext file
        #[arg(long)]
        ciphertext: PathBuf,

        /// XOR wheel to estimate (0-4)
        #[arg(long)]
        wheel: usize,

        /// Assumed period of that wheel
        #[arg(long)]
        period: usize,

        /// Minimum mean evidence for a slot to be reported
        #[arg(long, default_value_t = 0.1)]
        threshold: f64,
    },

    /// Generate a random key
    Keygen {
        /// Seed for a reproducible key
        #[arg(long)]
        seed: Option<u64>,

        /// Wheel periods, comma separated
        #[arg(long, value_delimiter = ',')]
        catalog: Option<Vec<usize>>,

        /// Write the key here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the transposition probability model
    Model {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct KeySource {
    /// Key settings file (YAML or JSON)
    #[arg(short, long)]
    key: Option<PathBuf>,

    /// Use the built-in reference key
    #[arg(long)]
    reference: bool,
}

#[derive(Args)]
struct Message {
    /// Read the message from a file
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Message text; stdin when neither this nor --input is given
    text: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match cli.command {
        Commands::Encrypt { key, message } => cmd_crypt(key, message, Direction::Encrypt),
        Commands::Decrypt { key, message } => cmd_crypt(key, message, Direction::Decrypt),
        Commands::Learn {
            plaintext,
            ciphertext,
            crib_header,
            crib_trailer,
            config,
            catalog,
            pinned,
            output,
        } => {
            let source = match (plaintext, crib_header) {
                (Some(path), _) => KnownSource::Plaintext(path),
                (None, Some(header)) => KnownSource::Crib {
                    header,
                    trailer: crib_trailer.unwrap_or_default(),
                },
                (None, None) => anyhow::bail!("either --plaintext or --crib-header is required"),
            };
            cmd_learn(source, ciphertext, config, catalog, pinned, output)
        }
        Commands::Estimate {
            plaintext,
            ciphertext,
            wheel,
            period,
            threshold,
        } => cmd_estimate(plaintext, ciphertext, wheel, period, threshold),
        Commands::Keygen {
            seed,
            catalog,
            output,
        } => cmd_keygen(seed, catalog, output),
        Commands::Model { json } => cmd_model(json),
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("pinwheel_cipher=info".parse().unwrap())
        .add_directive("pinwheel=info".parse().unwrap());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Encrypt,
    Decrypt,
}

fn cmd_crypt(source: KeySource, message: Message, direction: Direction) -> Result<()> {
    let key = match source.key {
        Some(path) => KeyConfig::load(&path)
            .with_context(|| format!("loading key {}", path.display()))?,
        None => KeyConfig::reference(),
    };
    let mut cipher = Cipher::new(key.build().context("building wheel set")?);

    let text = match (message.input, message.text) {
        (Some(path), _) => read_normalized(&path)?,
        (None, Some(text)) => normalize(&text),
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            normalize(&buffer)
        }
    };

    let output = match direction {
        Direction::Encrypt => cipher.encrypt_stream(&text).context("encrypting")?,
        Direction::Decrypt => cipher.decrypt_stream(&text).context("decrypting")?,
    };
    println!("{}", output);
    Ok(())
}

/// Where the known plaintext comes from
enum KnownSource {
    Plaintext(PathBuf),
    Crib { header: String, trailer: String },
}

fn cmd_learn(
    source: KnownSource,
    ciphertext: PathBuf,
    config: Option<PathBuf>,
    catalog: Option<Vec<usize>>,
    pinned: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut attack = match config {
        Some(path) => AttackConfig::load(&path)
            .with_context(|| format!("loading attack settings {}", path.display()))?,
        None => AttackConfig::default(),
    };
    if let Some(catalog) = catalog {
        attack.catalog = catalog;
    }
    attack.pinned |= pinned;

    let cipher = read_normalized(&ciphertext)?;
    let text = match source {
        KnownSource::Plaintext(path) => {
            tracing::info!("Learning from {} and {}", path.display(), ciphertext.display());
            KnownText::align(&read_normalized(&path)?, &cipher)
        }
        KnownSource::Crib { header, trailer } => {
            tracing::info!(
                "Learning from {} with crib {:?} ... {:?}",
                ciphertext.display(),
                header,
                trailer
            );
            KnownText::crib(&cipher, &header, &trailer)
        }
    }
    .context("aligning known text")?;

    let wheels = AttackSession::new(text, &attack)
        .and_then(AttackSession::run)
        .context("learning wheel set")?;
    for (role, wheel) in wheels.wheels().iter().enumerate() {
        tracing::info!("[{}] period {:>3}  {}", role, wheel.period(), wheel.to_bit_string());
    }

    write_key(&KeyConfig::from_wheel_set(&wheels), output)
}

fn cmd_estimate(
    plaintext: PathBuf,
    ciphertext: PathBuf,
    wheel: usize,
    period: usize,
    threshold: f64,
) -> Result<()> {
    let text = KnownText::align(&read_normalized(&plaintext)?, &read_normalized(&ciphertext)?)
        .context("aligning known text")?;
    let estimate = XorEstimator::new(threshold)
        .estimate(&text, wheel, period)
        .with_context(|| format!("estimating wheel {}", wheel))?;
    tracing::info!(
        "Wheel {} period {}: {} of {} slots above threshold {}",
        wheel,
        period,
        estimate.iter().filter(|b| b.is_some()).count(),
        period,
        threshold
    );
    println!("{}", render_estimate(&estimate));
    Ok(())
}

/// Estimated bits as a bit string, `?` where the evidence was too weak
fn render_estimate(estimate: &[Option<bool>]) -> String {
    estimate
        .iter()
        .map(|bit| match bit {
            Some(true) => '1',
            Some(false) => '0',
            None => '?',
        })
        .collect()
}

fn cmd_keygen(seed: Option<u64>, catalog: Option<Vec<usize>>, output: Option<PathBuf>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let catalog = catalog.unwrap_or_else(|| DEFAULT_CATALOG.to_vec());
    let key = KeyConfig::random(&catalog, &mut rng).context("generating key")?;
    tracing::info!("Generated key with periods {:?}", catalog);
    write_key(&key, output)
}

fn cmd_model(json: bool) -> Result<()> {
    let model = TranspositionModel::exact();
    if json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        println!("\n  TRANSPOSITION MODEL");
        println!("  ===================\n");
        print!("{}", model);
    }
    Ok(())
}

fn write_key(key: &KeyConfig, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            key.save(&path)
                .with_context(|| format!("writing key {}", path.display()))?;
            tracing::info!("Key written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(key)?),
    }
    Ok(())
}

fn read_normalized(path: &Path) -> Result<String> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(normalize(&data))
}

/// `\r\n` and lone `\r` become `\n`; trailing line breaks are dropped
fn normalize(text: &str) -> String {
    LINE_ENDINGS
        .replace_all(text, "\n")
        .trim_end_matches('\n')
        .to_string()
}
