// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Webprint: command-line print job client.
//
// Entry point. Initialises logging, resolves configuration, and drives the
// orchestrator for the chosen subcommand.

mod cli;
mod print;
mod surface;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use webprint_client::{HttpPrintService, Orchestrator, PrinterChoice, UiEvent};
use webprint_core::error::{ErrorClass, Result, WebprintError};
use webprint_core::types::{FilePayload, PrinterId};

use cli::{Cli, Commands};
use surface::TerminalSurface;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "webprint failed");
            eprintln!("webprint: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &WebprintError) -> u8 {
    match err.class() {
        ErrorClass::Validation | ErrorClass::Local => 2,
        ErrorClass::Application => 3,
        ErrorClass::Transport => 4,
        ErrorClass::ProtocolExhaustion => 5,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.client_config()?;
    info!(server = %config.server_url, "webprint starting");

    let service = Arc::new(HttpPrintService::from_config(&config)?);
    let orch = Orchestrator::new(service, Arc::new(TerminalSurface), &config);

    match cli.command {
        Commands::Printers => {
            orch.start().await?;
            for choice in orch.snapshot().printers {
                if let PrinterChoice::Printer(printer) = choice {
                    println!("{printer}");
                }
            }
            Ok(())
        }

        Commands::Options { printer } => {
            orch.handle(UiEvent::SelectionChanged(Some(PrinterId::new(printer))))
                .await?;
            if let Some(schema) = orch.snapshot().schema {
                if schema.is_empty() {
                    println!("(no configurable options)");
                }
                for (name, values) in schema.groups() {
                    println!("{} [{}]: {}", name.label(), name.field_name(), values.join(", "));
                }
            }
            Ok(())
        }

        Commands::Print {
            printer,
            file,
            options,
            copies,
        } => {
            let printer = PrinterId::new(printer);
            orch.start().await?;
            let listed = orch
                .snapshot()
                .printers
                .iter()
                .any(|choice| matches!(choice, PrinterChoice::Printer(p) if *p == printer));
            if !listed {
                warn!(printer = %printer, "printer is not in the service directory");
            }

            let payload = FilePayload::from_path(&file, config.max_upload_bytes)?;
            print::prepare_form(&orch, printer, options, copies, payload).await?;

            let last = orch.confirm().await?;
            info!(state = %last.state, "job settled");
            Ok(())
        }
    }
}
