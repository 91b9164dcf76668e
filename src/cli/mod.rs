// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod verify;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::version::VERSION_NUMBER;

/// Label Verifier CLI
#[derive(Parser, Debug)]
#[command(name = "label-verifier-cli")]
#[command(version = VERSION_NUMBER)]
#[command(about = "Check beverage label images against application claims", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Verify a label image against claimed fields
    Verify(verify::VerifyArgs),

    /// Print the text the OCR backend reads from a label image
    Extract(verify::ExtractArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Verify(args) => verify::verify_label(args).await,
        Commands::Extract(args) => verify::extract_text(args).await,
    }
}
