// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and configuration layering.
//
// Precedence, lowest first: built-in defaults, `--config` file,
// `WEBPRINT_SERVER`, then flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use webprint_core::config::ClientConfig;
use webprint_core::error::Result;
use webprint_core::types::OptionName;

/// Webprint command-line client
#[derive(Debug, Parser)]
#[command(name = "webprint")]
#[command(about = "Submit documents to a print service and follow them to completion", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Print service base URL (overrides $WEBPRINT_SERVER and the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// JSON config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seconds between job status queries
    #[arg(long, global = true)]
    pub poll_interval: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the printers the service offers
    Printers,

    /// Show the options a printer supports
    Options {
        /// Printer name as listed by `printers`
        printer: String,
    },

    /// Print a file and wait until the job settles
    Print {
        #[arg(long)]
        printer: String,

        #[arg(long)]
        file: PathBuf,

        /// Print option as name=value (media, quality, sides, print-color-mode)
        #[arg(long = "option", value_parser = parse_option)]
        options: Vec<OptionArg>,

        #[arg(long)]
        copies: Option<u32>,
    },
}

/// One `--option name=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionArg {
    pub name: OptionName,
    pub value: String,
}

fn parse_option(raw: &str) -> std::result::Result<OptionArg, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("option '{name}' needs a value"));
    }
    Ok(OptionArg {
        name: name.trim().parse::<OptionName>()?,
        value: value.to_string(),
    })
}

impl Cli {
    /// Resolve the effective client configuration.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let base = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        let mut config = base.with_env_overrides();
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(secs) = self.poll_interval {
            config.poll_interval_secs = secs;
        }
        config.validate()?;
        Ok(config)
    }
}
