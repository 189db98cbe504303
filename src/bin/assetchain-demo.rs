#![forbid(unsafe_code)]
//! Walkthrough of the ledger: issue an asset, move some of it, seal a block
//! and print what the chain now says.

use assetchain::blockchain::Blockchain;
use assetchain::config::load_config;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::Level;

const ISSUER: &str = "RAddress123456789";
const RECIPIENT_A: &str = "RAddress987654321";
const RECIPIENT_B: &str = "RAddress555555555";
const TOKEN: &str = "MYTOKEN";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the configured difficulty
    #[arg(long)]
    difficulty: Option<u32>,

    /// Log ledger events at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn short(hash: &str) -> &str {
    &hash[..hash.len().min(10)]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let mut config = load_config(&cli.config)?;
    if let Some(difficulty) = cli.difficulty {
        config.ledger.difficulty = difficulty;
    }

    println!("{}", "=== AssetChain walkthrough ===".bright_cyan().bold());
    println!();

    let mut chain = Blockchain::with_config(&config.ledger)?;
    println!("{}", "1. Chain created with its genesis block".bright_green());
    println!("   Blocks: {}", chain.blocks().len());
    println!("   Difficulty: {}", chain.difficulty());

    println!();
    println!("{}", "2. Issuing a new asset".bright_green());
    match chain.issue_asset(
        ISSUER,
        TOKEN,
        1000,
        0,
        true,
        Some("QmXoypizjW3WknFiJnKLwL7Q19drKo1q".to_string()),
    ) {
        Ok(record) => println!("   {} issued: {} to {}", TOKEN, record.quantity, record.issuer),
        Err(e) => println!("   {}", e.to_string().red()),
    }

    println!();
    println!("{}", "3. Submitting transfers".bright_green());
    for (recipient, amount) in [(RECIPIENT_A, 100.0), (RECIPIENT_B, 50.0)] {
        let next = chain.submit_transaction(ISSUER, recipient, amount, TOKEN)?;
        println!("   {} -> {} ({} {}), block {}", ISSUER, recipient, amount, TOKEN, next);
    }

    println!();
    println!("{}", "4. Sealing the next block...".bright_green());
    let previous_hash = chain.last_block()?.hash();
    let block = chain.seal_next_block(Some(previous_hash))?;
    println!(
        "   Block {} sealed with hash {}... (nonce {})",
        block.index,
        short(&block.hash()),
        block.nonce
    );

    println!();
    println!("{}", "5. Chain state".bright_green());
    println!("   Blocks: {}", chain.blocks().len());
    let validity = if chain.is_valid() {
        "valid".green()
    } else {
        "invalid".red()
    };
    println!("   Validity: {}", validity);

    println!();
    println!("{}", "6. Issued assets".bright_green());
    for (name, record) in chain.assets().iter() {
        println!("   - {}: {} issued by {}", name, record.quantity, record.issuer);
    }

    println!();
    println!("{}", "7. Balances".bright_green());
    for address in [ISSUER, RECIPIENT_A, RECIPIENT_B] {
        println!(
            "   {} holds {} {}",
            address,
            chain.balance_of(address, TOKEN),
            TOKEN
        );
    }

    println!();
    println!("{}", "8. Blocks".bright_green());
    for block in chain.blocks() {
        println!("   Block {}:", block.index);
        println!("     Hash: {}...", short(&block.hash()));
        println!("     Transactions: {}", block.transactions.len());
        for (i, tx) in block.transactions.iter().enumerate() {
            println!(
                "       {}. {} -> {} ({} {})",
                i + 1,
                tx.sender,
                tx.recipient,
                tx.amount,
                tx.asset_name
            );
        }
    }

    Ok(())
}
