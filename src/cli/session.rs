use std::io::{BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::format_cents;

use super::{ViewCommand, run_view_command};

/// Behaviour switches for a session
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Report ignored entries and other diagnostics on stderr
    pub verbose: bool,
    /// Print a prompt before reading each line
    pub prompt: bool,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Record a transaction: add <name> <amount> [category]
    Add {
        /// Description of the transaction
        name: String,

        /// Amount as an unsigned number (e.g. "50" or "12.50")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Food, Transport, Entertainment, Shopping, Bills, Health, Education, Income, Other
        #[arg(default_value = "Other")]
        category: String,
    },

    /// Clear all financial data
    Clear,

    #[command(flatten)]
    View(ViewCommand),

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Run ledger commands read line by line from `input` until EOF or `quit`.
///
/// Rejected entries are a silent no-op. Every other failure is reported on
/// stderr and the session goes on. Returns the number of commands executed.
pub fn run_session<R: BufRead, W: Write>(
    service: &mut LedgerService,
    input: R,
    mut out: W,
    options: SessionOptions,
) -> Result<usize> {
    let mut executed = 0;
    let mut lines = input.lines();

    loop {
        if options.prompt {
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = match split_line(trimmed) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("Error: {}", e);
                continue;
            }
        };

        let command = match SessionLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Help and usage messages; clap routes them to stdout/stderr
                e.print()?;
                continue;
            }
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Add {
                name,
                amount,
                category,
            } => match service.add_transaction(&name, &amount, &category) {
                Ok(transaction) => {
                    if options.verbose {
                        eprintln!(
                            "[ledger] added #{} {} {} ({})",
                            transaction.sequence,
                            transaction.name,
                            format_cents(transaction.amount),
                            transaction.category
                        );
                    }
                }
                Err(e) if e.is_rejected_entry() => {
                    if options.verbose {
                        eprintln!("[ledger] ignored: {}", e);
                    }
                }
                Err(e) => eprintln!("Error: {}", e),
            },
            SessionCommand::Clear => {
                service.clear_all();
                if options.verbose {
                    eprintln!("[ledger] cleared");
                }
            }
            SessionCommand::View(cmd) => {
                if let Err(e) = run_view_command(service, cmd, &mut out, options.verbose) {
                    eprintln!("Error: {:#}", e);
                }
            }
        }
        executed += 1;
    }

    out.flush()?;
    Ok(executed)
}

/// Split a command line into arguments. Whitespace separates arguments;
/// single or double quotes group words, and a quoted empty string is kept.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_arg {
        args.push(current);
    }

    Ok(args)
}
