use std::fs::File;
use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{CategoryReport, InsightsReport, LedgerService};
use crate::domain::{Transaction, format_currency};
use crate::io::{ExportType, Exporter};

mod session;

pub use session::{SessionOptions, run_session, split_line};

/// Number of transactions shown when no limit is given
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Budgetboard - Personal Finance Dashboard
#[derive(Parser)]
#[command(name = "budgetboard")]
#[command(about = "A single-session personal finance dashboard: balance, expenses, savings and insights")]
#[command(version)]
pub struct Cli {
    /// Start with an empty ledger instead of the demonstration data
    #[arg(long, global = true)]
    pub empty: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run (defaults to an interactive session)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read ledger commands from stdin, one per line, until EOF or `quit`
    Session,

    #[command(flatten)]
    View(ViewCommand),
}

/// Read-only commands, available both one-shot and inside a session
#[derive(Subcommand, Debug, PartialEq)]
pub enum ViewCommand {
    /// Show balance, expenses and savings
    Summary,

    /// List transactions, most recent first
    #[command(alias = "list")]
    Transactions {
        /// Show every transaction, grouped by category
        #[arg(long)]
        all: bool,

        /// Maximum number of transactions to show
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Per-category totals
    Categories {
        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Top expense category, monthly spending and savings rate
    Insights {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export the session to CSV or JSON
    Export {
        /// What to export: transactions, categories, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut service = if self.empty {
            LedgerService::empty()
        } else {
            LedgerService::with_demo_data()
        };

        if self.verbose {
            eprintln!(
                "[ledger] started with {} transaction(s)",
                service.transactions().len()
            );
        }

        match self.command.unwrap_or(Commands::Session) {
            Commands::Session => {
                let stdin = io::stdin();
                let options = SessionOptions {
                    verbose: self.verbose,
                    prompt: stdin.is_terminal(),
                };
                run_session(&mut service, stdin.lock(), io::stdout().lock(), options)?;
            }
            Commands::View(cmd) => {
                run_view_command(&service, cmd, &mut io::stdout().lock(), self.verbose)?;
            }
        }

        Ok(())
    }
}

pub fn run_view_command(
    service: &LedgerService,
    cmd: ViewCommand,
    out: &mut dyn Write,
    verbose: bool,
) -> Result<()> {
    match cmd {
        ViewCommand::Summary => print_summary(service, out)?,

        ViewCommand::Transactions { all, limit } => {
            if all {
                print_by_category(service, out)?;
            } else {
                print_transactions(service.recent(limit), out)?;
            }
        }

        ViewCommand::Categories { format } => {
            let report = service.category_report();
            match format.as_str() {
                "json" => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
                "csv" => {
                    Exporter::new(service).export_categories_csv(&mut *out)?;
                }
                _ => print_category_table(&report, out)?,
            }
        }

        ViewCommand::Insights { format } => {
            let report = service.insights();
            match format.as_str() {
                "json" => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
                _ => print_insights(&report, out)?,
            }
        }

        ViewCommand::Export {
            export_type,
            output,
        } => {
            let kind: ExportType = export_type.parse()?;
            let exporter = Exporter::new(service);

            let count = match output.as_deref() {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("Failed to create output file: {}", path))?;
                    exporter.export(kind, file)?
                }
                None => exporter.export(kind, &mut *out)?,
            };

            if verbose || output.is_some() {
                eprintln!("Exported {} {} record(s)", count, kind.as_str());
            }
        }
    }

    Ok(())
}

fn print_summary(service: &LedgerService, out: &mut dyn Write) -> Result<()> {
    let summary = service.summary();
    writeln!(out, "Balance:   {:>16}", format_currency(summary.balance))?;
    writeln!(out, "Expenses:  {:>16}", format_currency(summary.expenses))?;
    writeln!(out, "Savings:   {:>16}", format_currency(summary.savings))?;
    Ok(())
}

fn print_transactions(transactions: &[Transaction], out: &mut dyn Write) -> Result<()> {
    if transactions.is_empty() {
        writeln!(out, "No transactions found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<12} {:<30} {:<14} {:>14}",
        "DATE", "NAME", "CATEGORY", "AMOUNT"
    )?;
    writeln!(out, "{}", "-".repeat(73))?;
    for transaction in transactions {
        print_transaction_row(transaction, out)?;
    }
    Ok(())
}

fn print_transaction_row(transaction: &Transaction, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{:<12} {:<30} {:<14} {:>14}",
        transaction.date.format("%Y-%m-%d"),
        truncate(&transaction.name, 30),
        transaction.category,
        signed_amount(transaction)
    )?;
    Ok(())
}

fn print_by_category(service: &LedgerService, out: &mut dyn Write) -> Result<()> {
    let groups = service.transactions_by_category();
    if groups.is_empty() {
        writeln!(out, "No transactions found.")?;
        return Ok(());
    }

    for (index, (category, transactions)) in groups.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{} ({})", category, transactions.len())?;
        writeln!(out, "{}", "-".repeat(73))?;
        for transaction in transactions {
            print_transaction_row(transaction, out)?;
        }
    }
    Ok(())
}

fn print_category_table(report: &CategoryReport, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{:<16} {:>16} {:>8} {:>8}",
        "CATEGORY", "TOTAL", "COUNT", "PERCENT"
    )?;
    writeln!(out, "{}", "-".repeat(51))?;

    for cat in &report.categories {
        writeln!(
            out,
            "{:<16} {:>16} {:>8} {:>7.1}%",
            cat.category,
            format_currency(cat.total),
            cat.count,
            cat.percentage
        )?;
    }

    writeln!(out, "{}", "-".repeat(51))?;
    writeln!(
        out,
        "{:<16} {:>16}",
        "EXPENSES",
        format_currency(report.total_expense)
    )?;
    writeln!(
        out,
        "{:<16} {:>16}",
        "INCOME",
        format_currency(report.total_income)
    )?;
    Ok(())
}

fn print_insights(report: &InsightsReport, out: &mut dyn Write) -> Result<()> {
    match report.top_expense {
        Some(top) => writeln!(
            out,
            "Your highest expense category is {} at {}.",
            top.category,
            format_currency(top.total)
        )?,
        None => writeln!(out, "No expenses recorded yet.")?,
    }
    writeln!(
        out,
        "Monthly spending ({}): {}",
        report.as_of.format("%B %Y"),
        format_currency(report.monthly_spending)
    )?;
    writeln!(
        out,
        "Current savings rate: {:.1}% of income",
        report.savings_rate
    )?;
    Ok(())
}

/// Income is shown with a leading `+`, outflows with `-`.
fn signed_amount(transaction: &Transaction) -> String {
    let formatted = format_currency(transaction.amount);
    if transaction.amount > 0 {
        format!("+{}", formatted)
    } else {
        formatted
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(service: &LedgerService, cmd: ViewCommand) -> String {
        let mut out = Vec::new();
        run_view_command(service, cmd, &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cli_defaults_to_session() {
        let cli = Cli::try_parse_from(["budgetboard"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.empty);
    }

    #[test]
    fn test_cli_parses_view_commands() {
        let cli = Cli::try_parse_from(["budgetboard", "--empty", "transactions", "--all"]).unwrap();
        assert!(cli.empty);
        assert!(matches!(
            cli.command,
            Some(Commands::View(ViewCommand::Transactions { all: true, limit: 5 }))
        ));
    }

    #[test]
    fn test_summary_output() {
        let service = LedgerService::with_demo_data();
        let text = render(&service, ViewCommand::Summary);

        assert!(text.contains("₹64,202"));
        assert!(text.contains("₹20,798"));
        assert!(text.contains("₹17,000"));
    }

    #[test]
    fn test_transactions_default_shows_recent_five() {
        let service = LedgerService::with_demo_data();
        let text = render(
            &service,
            ViewCommand::Transactions {
                all: false,
                limit: DEFAULT_RECENT_LIMIT,
            },
        );

        assert!(text.contains("Grocery Shopping"));
        assert!(text.contains("+₹85,000"));
        assert!(text.contains("-₹5,250"));
        assert!(!text.contains("Shopping Mall"));
    }

    #[test]
    fn test_transactions_all_groups_by_category() {
        let service = LedgerService::with_demo_data();
        let text = render(
            &service,
            ViewCommand::Transactions {
                all: true,
                limit: DEFAULT_RECENT_LIMIT,
            },
        );

        assert!(text.contains("Food (1)"));
        assert!(text.contains("Shopping Mall"));
        assert!(!text.contains("Other ("));
        let food = text.find("Food (1)").unwrap();
        let income = text.find("Income (1)").unwrap();
        assert!(food < income);
    }

    #[test]
    fn test_categories_csv_matches_export() {
        let mut service = LedgerService::empty();
        service.add_transaction("Rent", "900", "Bills").unwrap();

        let text = render(
            &service,
            ViewCommand::Categories {
                format: "csv".into(),
            },
        );
        let mut exported = Vec::new();
        Exporter::new(&service)
            .export(ExportType::Categories, &mut exported)
            .unwrap();

        assert_eq!(text, String::from_utf8(exported).unwrap());
        assert!(text.starts_with("category,total_cents,count,percentage\n"));
        assert!(text.contains("Bills,90000,1,100.00"));
    }

    #[test]
    fn test_insights_without_expenses() {
        let service = LedgerService::empty();
        let text = render(
            &service,
            ViewCommand::Insights {
                format: "table".into(),
            },
        );

        assert!(text.contains("No expenses recorded yet."));
        assert!(text.contains("Current savings rate: 0.0% of income"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long transaction name", 10), "a very ...");
    }
}
