mod common;

use anyhow::Result;
use budgetboard::application::LedgerService;
use budgetboard::domain::{Category, LedgerSummary};
use common::run_script;

#[test]
fn test_session_add_and_summary() -> Result<()> {
    let mut service = LedgerService::empty();
    let script = r#"
# one expense, one income
add Coffee 50 Food
add "Monthly Pay" 1000 income
summary
"#;

    let (output, executed) = run_script(&mut service, script)?;

    assert_eq!(executed, 3);
    assert_eq!(
        service.summary(),
        LedgerSummary {
            balance: 95000,
            expenses: 5000,
            savings: 20000,
        }
    );
    assert!(output.contains("₹950"));
    assert!(output.contains("₹200"));
    assert_eq!(service.transactions()[0].name, "Monthly Pay");
    Ok(())
}

#[test]
fn test_session_category_defaults_to_other() -> Result<()> {
    let mut service = LedgerService::empty();
    run_script(&mut service, "add Misc 7\n")?;

    assert_eq!(service.transactions()[0].category, Category::Other);
    assert_eq!(service.transactions()[0].amount, -700);
    Ok(())
}

#[test]
fn test_session_negative_amount_is_normalized() -> Result<()> {
    let mut service = LedgerService::empty();
    run_script(&mut service, "add Refund -30 Income\n")?;

    assert_eq!(service.transactions()[0].amount, 3000);
    Ok(())
}

#[test]
fn test_session_rejected_entries_are_silent() -> Result<()> {
    let mut service = LedgerService::empty();
    let script = r#"
add "" 100 Food
add X abc Food
add X 10 Groceries
"#;

    let (output, executed) = run_script(&mut service, script)?;

    assert_eq!(executed, 3);
    assert!(output.is_empty());
    assert!(service.transactions().is_empty());
    assert_eq!(service.summary(), LedgerSummary::default());
    Ok(())
}

#[test]
fn test_session_clear_then_views() -> Result<()> {
    let mut service = LedgerService::with_demo_data();
    let script = "clear\nclear\ntransactions\ninsights\n";

    let (output, _) = run_script(&mut service, script)?;

    assert!(service.transactions().is_empty());
    assert!(output.contains("No transactions found."));
    assert!(output.contains("No expenses recorded yet."));
    Ok(())
}

#[test]
fn test_session_stops_at_quit() -> Result<()> {
    let mut service = LedgerService::empty();
    let script = "add A 1 Food\nquit\nadd B 2 Food\n";

    let (_, executed) = run_script(&mut service, script)?;

    assert_eq!(executed, 1);
    assert_eq!(service.transactions().len(), 1);
    Ok(())
}

#[test]
fn test_session_survives_bad_lines() -> Result<()> {
    let mut service = LedgerService::empty();
    let script = "frobnicate\nadd \"unterminated 5\nexport balances\nadd Tea 2 Food\n";

    let (_, executed) = run_script(&mut service, script)?;

    // Unknown commands and unbalanced quotes are skipped; the bad export
    // type is reported but still counts as an executed command
    assert_eq!(executed, 2);
    assert_eq!(service.transactions().len(), 1);
    Ok(())
}

#[test]
fn test_session_continues_after_help() -> Result<()> {
    let mut service = LedgerService::empty();
    let (_, executed) = run_script(&mut service, "help\nadd Tea 2 Food\n")?;

    assert_eq!(executed, 1);
    assert_eq!(service.transactions().len(), 1);
    Ok(())
}

#[test]
fn test_session_oversized_amount_is_ignored() -> Result<()> {
    let mut service = LedgerService::empty();
    let script = "add Rent 50000000000000000 Bills\nadd Rent 50000000000000000 Bills\n";

    let (output, executed) = run_script(&mut service, script)?;

    assert_eq!(executed, 2);
    assert!(output.is_empty());
    assert_eq!(service.transactions().len(), 1);
    assert_eq!(service.summary().expenses, 5_000_000_000_000_000_000);
    Ok(())
}

#[test]
fn test_session_export_to_stdout() -> Result<()> {
    let mut service = LedgerService::empty();
    let (output, _) = run_script(&mut service, "add Bus 2 Transport\nexport transactions\n")?;

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "id,sequence,date,name,category,amount_cents");
    assert!(lines[1].ends_with(",Bus,Transport,-200"));
    Ok(())
}
