//! EVM transaction codec CLI
//!
//! Thin wrapper around the library: parses arguments, reads files and prints
//! hex results. All encoding happens in the library.

use anyhow::Context;
use clap::{Parser, Subcommand};
use evm_tx_codec::constants::{keccak256_params, tx_defaults};
use evm_tx_codec::utils::bytes::{bytes_to_hex, hex_to_bytes, parse_address, parse_quantity};
use evm_tx_codec::{
    contract_address, keccak256_hex, method_selector, RlpValue, Transaction, TxBuilder, TxPolicy,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "evm-tx",
    about = "Build and inspect legacy EVM transactions",
    version,
    long_about = r#"Build and inspect legacy EVM transactions.

Quantities (nonces, amounts) are decimal or 0x-prefixed hex. Addresses are
20-byte hex strings with or without 0x. Every command prints its result as
lowercase hex on stdout; logs go to stderr and are controlled by RUST_LOG."#
)]
struct Cli {
    /// JSON policy file overriding gas price, gas limits and placeholder v
    #[arg(long, global = true, value_name = "FILE")]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the address of a contract deployed by FROM at NONCE
    Address { from: String, nonce: String },

    /// Build a contract creation transaction from a hex bytecode file
    Create {
        nonce: String,

        /// File containing the init code as hex text
        #[arg(value_name = "BINFILE")]
        binfile: PathBuf,

        /// Initial supply appended to the init code as a 32-byte word
        #[arg(long)]
        supply: Option<String>,
    },

    /// Build a call or value transaction
    Call {
        nonce: String,
        to: String,

        #[arg(long, default_value = "0")]
        value: String,

        /// Call data as hex
        #[arg(long, default_value = "")]
        data: String,
    },

    /// Build a token wrap transaction (sends AMOUNT as value)
    Wrap {
        nonce: String,
        contract: String,
        amount: String,
    },

    /// Build a token unwrap transaction
    Unwrap {
        nonce: String,
        contract: String,
        amount: String,
    },

    /// Build a token transfer transaction
    Transfer {
        nonce: String,
        contract: String,
        to: String,
        amount: String,
    },

    /// Build a native value transfer
    NativeTransfer {
        nonce: String,
        to: String,
        amount: String,
    },

    /// Print the 4-byte method selector of a function signature
    Selector { signature: String },

    /// Keccak-256 of hex input
    Hash { hex: String },

    /// RLP-encode a JSON value made of hex strings and arrays
    Rlp { json: String },

    /// Encode a transaction described by a JSON file
    Encode {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Decode a hex transaction and print it as JSON
    Decode { hex: String },

    /// Show hashing parameters and the active transaction policy
    Info,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let policy = load_policy(cli.policy.as_deref())?;
    let builder = TxBuilder::new(policy);

    match cli.command {
        Commands::Address { from, nonce } => {
            let address = contract_address(parse_address(&from)?, parse_quantity(&nonce)?)?;
            println!("{}", bytes_to_hex(address.as_slice()));
        }
        Commands::Create {
            nonce,
            binfile,
            supply,
        } => {
            let bytecode = read_hex_file(&binfile)?;
            let supply = supply.as_deref().map(parse_quantity).transpose()?;
            let tx = builder.contract_creation(parse_quantity(&nonce)?, &bytecode, supply);
            println!("{}", tx.encode_hex()?);
        }
        Commands::Call {
            nonce,
            to,
            value,
            data,
        } => {
            let tx = builder.call(
                parse_quantity(&nonce)?,
                parse_address(&to)?,
                parse_quantity(&value)?,
                hex_to_bytes(&data)?,
            );
            println!("{}", tx.encode_hex()?);
        }
        Commands::Wrap {
            nonce,
            contract,
            amount,
        } => {
            let tx = builder.wrap_native(
                parse_quantity(&nonce)?,
                parse_address(&contract)?,
                parse_quantity(&amount)?,
            );
            println!("{}", tx.encode_hex()?);
        }
        Commands::Unwrap {
            nonce,
            contract,
            amount,
        } => {
            let tx = builder.unwrap_native(
                parse_quantity(&nonce)?,
                parse_address(&contract)?,
                parse_quantity(&amount)?,
            );
            println!("{}", tx.encode_hex()?);
        }
        Commands::Transfer {
            nonce,
            contract,
            to,
            amount,
        } => {
            let tx = builder.token_transfer(
                parse_quantity(&nonce)?,
                parse_address(&contract)?,
                parse_address(&to)?,
                parse_quantity(&amount)?,
            );
            println!("{}", tx.encode_hex()?);
        }
        Commands::NativeTransfer { nonce, to, amount } => {
            let tx = builder.native_transfer(
                parse_quantity(&nonce)?,
                parse_address(&to)?,
                parse_quantity(&amount)?,
            );
            println!("{}", tx.encode_hex()?);
        }
        Commands::Selector { signature } => {
            println!("{}", bytes_to_hex(&method_selector(&signature)));
        }
        Commands::Hash { hex } => {
            println!("{}", keccak256_hex(&hex_to_bytes(&hex)?));
        }
        Commands::Rlp { json } => {
            let value: serde_json::Value =
                serde_json::from_str(&json).context("Failed to parse RLP JSON")?;
            let encoded = RlpValue::try_from(&value)?.encode()?;
            println!("{}", bytes_to_hex(&encoded));
        }
        Commands::Encode { input } => {
            let tx = read_transaction(&input)?;
            println!("{}", tx.encode_hex()?);
        }
        Commands::Decode { hex } => {
            let tx = Transaction::decode_hex(&hex)?;
            let report = serde_json::json!({
                "hash": format!("0x{}", bytes_to_hex(&tx.hash()?)),
                "chain_id": tx.chain_id(),
                "transaction": tx,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Info => {
            show_system_info(builder.policy())?;
        }
    }

    Ok(())
}

fn init_logging() {
    // The fmt subscriber also bridges the library's `log` records
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_policy(path: Option<&Path>) -> anyhow::Result<TxPolicy> {
    let Some(path) = path else {
        return Ok(TxPolicy::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file: {}", path.display()))?;
    let policy = TxPolicy::from_json_str(&json)
        .with_context(|| format!("Invalid policy file: {}", path.display()))?;
    log::debug!("loaded transaction policy {policy:?}");
    Ok(policy)
}

fn read_hex_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bytecode file: {}", path.display()))?;
    hex_to_bytes(text.trim())
        .with_context(|| format!("Bytecode file is not hex: {}", path.display()))
}

fn read_transaction(path: &Path) -> anyhow::Result<Transaction> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| "Failed to parse transaction JSON")
}

fn show_system_info(policy: &TxPolicy) -> anyhow::Result<()> {
    println!("EVM Tx Codec - System Information");
    println!("=================================");
    println!();

    println!("Hash Function:");
    println!("  Construction:             Keccak sponge (multi-rate padding)");
    println!("  Rate:                     {} bits", keccak256_params::RATE_BITS);
    println!("  Capacity:                 {} bits", keccak256_params::CAPACITY_BITS);
    println!("  Output:                   {} bits", keccak256_params::OUTPUT_BITS);
    println!("  Empty Input Digest:       {}", keccak256_hex(b""));
    println!();

    println!("Built-in Policy Defaults:");
    println!("  Gas Price:                {}", tx_defaults::GAS_PRICE);
    println!("  Create Gas Limit:         {}", tx_defaults::CREATE_GAS_LIMIT);
    println!("  Call Gas Limit:           {}", tx_defaults::CALL_GAS_LIMIT);
    println!("  Placeholder v:            {}", tx_defaults::PLACEHOLDER_V);
    println!();

    println!("Active Policy:");
    println!("{}", serde_json::to_string_pretty(policy)?);

    Ok(())
}
