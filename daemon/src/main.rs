//! agora: run block scripts against a persisted governance chain and query its state.

use agora_chain::{Chain, ChainConfig, ChainSnapshot, ReceiptSummary, Tx};
use agora_types::{ActionName, BlockHeight, Principal, VoteId};
use agora_utils::{init_logging, LogFormat};
use anyhow::{bail, Context};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "agora", about = "Capability-gated, token-weighted governance chain")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "AGORA_CONFIG")]
    config: Option<PathBuf>,

    /// Chain state snapshot file.
    #[arg(long, env = "AGORA_STATE")]
    state: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "AGORA_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "AGORA_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Write the genesis state described by the configuration.
    Init {
        /// Overwrite an existing state file.
        #[arg(long)]
        force: bool,
    },
    /// Mine every block of a JSON block script and print the receipts.
    Apply { script: PathBuf },
    /// Show a vote.
    Vote { id: u64 },
    /// Show a voter's ballot on a vote.
    Voter { id: u64, principal: Principal },
    /// Check whether `who` may call `what` on `target`.
    CanCall {
        who: Principal,
        target: Principal,
        what: ActionName,
    },
    /// Show a balance, optionally as of a past height.
    Balance {
        principal: Principal,
        #[arg(long)]
        at: Option<u64>,
    },
}

/// One entry of a block script: a block of transactions, or a run of empty blocks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptBlock {
    Txs(Vec<Tx>),
    Empty { empty_blocks: u64 },
}

#[derive(Debug, Serialize)]
struct BlockReport {
    height: BlockHeight,
    receipts: Vec<ReceiptSummary>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ChainConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ChainConfig::default(),
    };
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    let format = match cli.log_format {
        Some(format) => format,
        None => config.log_format.parse()?,
    };
    init_logging(format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Init { force } => {
            if config.state_path.exists() && !force {
                bail!(
                    "state file {} already exists (use --force to overwrite)",
                    config.state_path.display()
                );
            }
            let chain = Chain::from_config(&config)?;
            save(&chain, &config.state_path)?;
            tracing::info!(
                state = %config.state_path.display(),
                deployer = %chain.deployer(),
                "genesis state written"
            );
            print_json(&serde_json::json!({
                "deployer": chain.deployer(),
                "auth": chain.auth_address(),
                "token": chain.token_address(),
                "voting": chain.voting_address(),
            }))?;
        }
        Command::Apply { script } => {
            let raw = std::fs::read_to_string(&script)
                .with_context(|| format!("reading block script {}", script.display()))?;
            let blocks: Vec<ScriptBlock> =
                serde_json::from_str(&raw).context("parsing block script")?;

            let mut chain = load(&config.state_path)?;
            let mut reports = Vec::new();
            for entry in blocks {
                match entry {
                    ScriptBlock::Txs(txs) => {
                        let block = chain.mine_block(txs);
                        reports.push(BlockReport {
                            height: block.height,
                            receipts: block
                                .receipts
                                .iter()
                                .enumerate()
                                .map(|(i, r)| r.summary(i))
                                .collect(),
                        });
                    }
                    ScriptBlock::Empty { empty_blocks } => {
                        chain.mine_empty_blocks(empty_blocks);
                    }
                }
            }
            save(&chain, &config.state_path)?;
            tracing::info!(height = %chain.height(), blocks = reports.len(), "script applied");
            print_json(&reports)?;
        }
        Command::Vote { id } => {
            let chain = load(&config.state_path)?;
            print_json(&chain.get_vote(VoteId::new(id))?)?;
        }
        Command::Voter { id, principal } => {
            let chain = load(&config.state_path)?;
            print_json(&chain.get_voter(VoteId::new(id), &principal)?)?;
        }
        Command::CanCall { who, target, what } => {
            let chain = load(&config.state_path)?;
            print_json(&chain.can_call(&who, &target, &what))?;
        }
        Command::Balance { principal, at } => {
            let chain = load(&config.state_path)?;
            let balance = match at {
                Some(height) => chain.balance_at(&principal, BlockHeight::new(height)),
                None => chain.balance_of(&principal),
            };
            print_json(&balance)?;
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Chain> {
    let snapshot = ChainSnapshot::read_from(path).with_context(|| {
        format!(
            "reading chain state from {} (run `agora init` first)",
            path.display()
        )
    })?;
    Ok(Chain::restore(snapshot)?)
}

fn save(chain: &Chain, path: &Path) -> anyhow::Result<()> {
    chain
        .snapshot()?
        .write_to(path)
        .with_context(|| format!("writing chain state to {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
