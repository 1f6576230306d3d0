use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::{Command, LedgerService, LedgerView, Notification};
use crate::config::Config;
use crate::domain::{
    date, month_buckets, transactions_on, Cents, DayBucket, Transaction, TransactionForm,
    TransactionKind,
};
use crate::io::Exporter;

/// Tally - Personal income and expense tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Record income and expenses, see your balance and a calendar of entries")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record an income or an expense
    Add {
        /// Kind of entry: income, expense
        kind: String,

        /// What the money was for
        #[arg(short, long)]
        name: String,

        /// Amount (e.g., "50.00" or "50")
        #[arg(short, long)]
        amount: String,

        /// Date of the entry (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change name, amount or date of an entry
    Edit {
        /// Transaction ID
        id: String,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Transaction ID
        id: String,
    },

    /// List entries, most recent first
    List {
        /// Only show one kind: income, expense
        #[arg(short, long)]
        kind: Option<String>,

        /// Only show entries from the last month
        #[arg(long)]
        recent: bool,
    },

    /// Show net worth and current balance
    Summary,

    /// Show a month as a calendar with daily totals
    Calendar {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Show every entry on one day
    Day {
        /// Day to show (YYYY-MM-DD)
        date: String,
    },

    /// Export the ledger to CSV or JSON
    Export {
        /// Format: csv, json
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let today = self.config.today()?;

        if let Commands::Init = self.command {
            LedgerService::init(&self.config.database).await?;
            println!("Database initialized: {}", self.config.database);
            return Ok(());
        }

        let mut service = LedgerService::connect(&self.config.database)
            .await
            .with_context(|| format!("Failed to open {}. Run `tally init` first", self.config.database))?;
        report(service.dispatch(Command::Refresh).await, false)?;

        let currency = self.config.currency.as_str();

        match self.command {
            Commands::Init => unreachable!("handled above"),

            Commands::Add {
                kind,
                name,
                amount,
                date,
            } => {
                let kind = parse_kind(&kind)?;
                let form = add_form(today, name, amount, date);
                report(service.dispatch(Command::Add { kind, form }).await, true)?;
            }

            Commands::Edit {
                id,
                name,
                amount,
                date,
            } => {
                let id = parse_id(&id)?;
                let existing = service
                    .state()
                    .find(id)
                    .with_context(|| format!("Transaction not found: {}", id))?;

                let mut form = TransactionForm::from_transaction(existing);
                if let Some(name) = name {
                    form.name = name;
                }
                if let Some(amount) = amount {
                    form.amount = amount;
                }
                if let Some(date) = date {
                    form.date = date;
                }
                report(service.dispatch(Command::Edit { id, form }).await, true)?;
            }

            Commands::Delete { id } => {
                let id = parse_id(&id)?;
                let kind = service
                    .state()
                    .find(id)
                    .map(|t| t.kind)
                    .with_context(|| format!("Transaction not found: {}", id))?;
                report(service.dispatch(Command::Delete { id, kind }).await, true)?;
            }

            Commands::List { kind, recent } => {
                let kinds = match kind {
                    Some(kind) => vec![parse_kind(&kind)?],
                    None => vec![TransactionKind::Income, TransactionKind::Expense],
                };
                let view = service.view(today);
                for (i, kind) in kinds.into_iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    let entries = if recent {
                        view.recent(kind)
                    } else {
                        view.list(kind)
                    };
                    print_list(kind, entries, currency);
                }
            }

            Commands::Summary => print_summary(&service.view(today), currency),

            Commands::Calendar { month } => {
                let (year, month) = match month {
                    Some(raw) => parse_month(&raw)?,
                    None => (today.year(), today.month()),
                };
                print_calendar(&service, year, month, today, currency);
            }

            Commands::Day { date } => {
                let day = date::parse_day(&date)
                    .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date))?;
                let bucket = transactions_on(service.state(), day);
                print_day(day, &bucket, currency);
            }

            Commands::Export { format, output } => {
                run_export_command(&service, &format, output.as_deref())?;
            }
        }

        Ok(())
    }
}

/// Print a notification; error notifications end the command with a failure.
fn report(notification: Notification, show_success: bool) -> Result<()> {
    if notification.is_error() {
        anyhow::bail!(notification.message);
    }
    if show_success {
        println!("{}", notification.message);
    }
    Ok(())
}

/// A blank form dated `today`, filled with the given flags.
fn add_form(today: NaiveDate, name: String, amount: String, date: Option<String>) -> TransactionForm {
    let mut form = TransactionForm::blank(today);
    form.name = name;
    form.amount = amount;
    if let Some(date) = date {
        form.date = date;
    }
    form
}

fn parse_kind(raw: &str) -> Result<TransactionKind> {
    raw.parse().map_err(|e| {
        anyhow::anyhow!("Invalid kind '{}'. Valid kinds: income, expense. Error: {}", raw, e)
    })
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).context("Invalid transaction ID format (expected UUID)")
}

/// Parse a `YYYY-MM` month.
fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let first = date::parse_day(&format!("{}-01", raw.trim()))
        .with_context(|| format!("Invalid month '{}'. Use YYYY-MM", raw))?;
    Ok((first.year(), first.month()))
}

fn run_export_command(service: &LedgerService, format: &str, output: Option<&str>) -> Result<()> {
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service.state());

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_transactions_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "json" => {
            let snapshot = exporter.export_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported {} incomes and {} expenses",
                    snapshot.incomes.len(),
                    snapshot.expenses.len()
                );
            }
        }
        _ => {
            anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
    }

    Ok(())
}

fn print_summary(view: &LedgerView, currency: &str) {
    println!("Net Worth");
    println!("  {:>16}", format_money(view.net_worth, currency));
    println!("  Everything recorded, including future entries");
    println!();
    println!("Current Balance");
    println!("  {:>16}", format_money(view.current_balance, currency));
    println!("  Balance up to {}", date::format_day(view.today));
}

fn print_list(kind: TransactionKind, entries: &[Transaction], currency: &str) {
    let title = match kind {
        TransactionKind::Income => "INCOME",
        TransactionKind::Expense => "EXPENSES",
    };
    println!("{}", title);

    if entries.is_empty() {
        match kind {
            TransactionKind::Income => println!("No income recorded yet"),
            TransactionKind::Expense => println!("No expenses recorded yet"),
        }
        return;
    }

    println!("{:<12} {:<24} {:>14}  {}", "DATE", "NAME", "AMOUNT", "ID");
    println!("{}", "-".repeat(90));
    for entry in entries {
        println!(
            "{:<12} {:<24} {:>14}  {}",
            date::format_day(entry.date),
            truncate(&entry.name, 24),
            signed_money(entry, currency),
            entry.id
        );
    }
}

fn print_calendar(service: &LedgerService, year: i32, month: u32, today: NaiveDate, currency: &str) {
    let Some((first, last)) = date::month_bounds(year, month) else {
        return;
    };
    let days = month_buckets(service.state(), year, month);

    println!("{:^28}", first.format("%B %Y").to_string());
    println!(" Mo  Tu  We  Th  Fr  Sa  Su");

    // Each tile: day number, `*` when something was recorded, `<` for today
    let mut line = "    ".repeat(first.weekday().num_days_from_monday() as usize);
    for day in first.iter_days().take_while(|d| *d <= last) {
        let marker = if day == today {
            '<'
        } else if days.contains_key(&day) {
            '*'
        } else {
            ' '
        };
        line.push_str(&format!(" {:>2}{}", day.day(), marker));

        if day.weekday().num_days_from_monday() == 6 {
            println!("{}", line.trim_end());
            line.clear();
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }

    if days.is_empty() {
        println!();
        println!("No entries this month");
        return;
    }

    println!();
    println!("{:<12} {:>14} {:>14} {:>14}", "DATE", "INCOME", "EXPENSES", "NET");
    println!("{}", "-".repeat(57));
    for (day, bucket) in &days {
        println!(
            "{:<12} {:>14} {:>14} {:>14}",
            date::format_day(*day),
            format_money(bucket.income_total(), currency),
            format_money(bucket.expense_total(), currency),
            format_money(bucket.net(), currency)
        );
    }
}

fn print_day(day: NaiveDate, bucket: &DayBucket, currency: &str) {
    println!("Transactions on {}", date::format_day(day));
    if bucket.is_empty() {
        println!("  Nothing recorded");
        return;
    }

    for entry in bucket.incomes.iter().chain(bucket.expenses.iter()) {
        println!(
            "  {:<24} {:>14}  {}",
            truncate(&entry.name, 24),
            signed_money(entry, currency),
            entry.id
        );
    }
    println!("  {}", "-".repeat(39));
    println!("  {:<24} {:>14}", "Net", format_money(bucket.net(), currency));
}

fn signed_money(entry: &Transaction, currency: &str) -> String {
    let sign = match entry.kind {
        TransactionKind::Income => '+',
        TransactionKind::Expense => '-',
    };
    format!("{}{}", sign, format_money(entry.amount_cents, currency))
}

/// Display form of an amount: currency symbol and thousands separators.
/// Example: 123456 -> "$1,234.56", -500 -> "-$5.00"
fn format_money(cents: Cents, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = (abs_cents / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}{}{}.{:02}", sign, currency, grouped, abs_cents % 100)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0, "$"), "$0.00");
        assert_eq!(format_money(5, "$"), "$0.05");
        assert_eq!(format_money(123456, "$"), "$1,234.56");
        assert_eq!(format_money(100000000, "€"), "€1,000,000.00");
        assert_eq!(format_money(-50000, "$"), "-$500.00");
    }

    #[test]
    fn test_signed_money() {
        let entry = Transaction {
            id: Uuid::new_v4(),
            name: "Rent".into(),
            amount_cents: 90000,
            date: date::parse_day("2025-01-05").unwrap(),
            kind: TransactionKind::Expense,
            created_at: Utc::now(),
        };
        assert_eq!(signed_money(&entry, "$"), "-$900.00");
    }

    #[test]
    fn test_add_form_defaults_date_to_today() {
        let today = date::parse_day("2025-03-14").unwrap();

        let form = add_form(today, "Coffee".into(), "3.50".into(), None);
        assert_eq!(form.date, "2025-03-14");
        assert_eq!(form.validate().unwrap().amount_cents, 350);

        let form = add_form(today, "Coffee".into(), "3.50".into(), Some("2025-03-01".into()));
        assert_eq!(form.date, "2025-03-01");
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-02").unwrap(), (2025, 2));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("Feb 2025").is_err());
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Groceries", 24), "Groceries");
        assert_eq!(truncate("Çok uzun bir işlem açıklaması", 10), "Çok uzu...");
    }

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "tally", "add", "expense", "--name", "Rent", "--amount", "900", "--date", "2025-01-05",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { kind, name, amount, date } => {
                assert_eq!(kind, "expense");
                assert_eq!(name, "Rent");
                assert_eq!(amount, "900");
                assert_eq!(date.as_deref(), Some("2025-01-05"));
            }
            _ => panic!("expected add command"),
        }
    }
}
