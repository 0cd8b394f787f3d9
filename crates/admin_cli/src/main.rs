use std::error::Error;

use chrono::{DateTime, FixedOffset, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{Amount, Currency, Engine, EngineError, ExpenseCategory};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

/// Users created by `seed`.
const SEED_USERS: [(&str, &str, Currency); 2] = [
    ("Anthony", "Stark", Currency::Usd),
    ("Natasha", "Romanova", Currency::Rub),
];

#[derive(Parser, Debug)]
#[command(name = "expenses_admin")]
#[command(about = "Admin utilities for the expenses service (users, seed data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./expenses.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Expense(Expense),
    /// Creates the default users, skipping the ones already present.
    Seed,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long, default_value = "USD")]
    currency: String,
}

#[derive(Args, Debug)]
struct Expense {
    #[command(subcommand)]
    command: ExpenseCommand,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
    List(ExpenseListArgs),
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// Currency of both the user and the expense.
    #[arg(long, default_value = "USD")]
    currency: String,
    /// `Restaurant`, `Hotel` or `Misc`.
    #[arg(long)]
    category: String,
    /// Major units, e.g. `12.34` or `12,34`.
    #[arg(long)]
    amount: Amount,
    #[arg(long)]
    comment: String,
    /// RFC3339 timestamp; defaults to now.
    #[arg(long)]
    date: Option<DateTime<FixedOffset>>,
}

#[derive(Args, Debug)]
struct ExpenseListArgs {
    #[arg(long)]
    user_id: Uuid,
    /// `date` or `amount`.
    #[arg(long)]
    sort_by: Option<String>,
    /// `asc` or `desc`.
    #[arg(long)]
    sort_order: Option<String>,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let currency = match Currency::try_from(args.currency.as_str()) {
                Ok(v) => v,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };

            match engine
                .create_user(&args.first_name, &args.last_name, currency)
                .await
            {
                Ok(user) => println!("created user: {} ({})", user.full_name(), user.id),
                Err(err @ EngineError::DuplicateUser { .. }) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::User(User {
            command: UserCommand::List,
        }) => {
            for user in engine.list_users().await? {
                println!("{}\t{}\t{}", user.id, user.full_name(), user.currency);
            }
        }
        Command::Expense(Expense {
            command: ExpenseCommand::Add(args),
        }) => {
            let currency = Currency::try_from(args.currency.as_str())?;
            let user = engine::User::new(args.first_name, args.last_name, currency);
            let date = args.date.map_or_else(Utc::now, |date| date.with_timezone(&Utc));
            let expense = engine::Expense::new(
                date,
                ExpenseCategory::try_from(args.category.as_str())?,
                args.amount,
                currency,
                args.comment,
                user,
            )?;

            match engine.submit_expense(expense).await {
                Ok(stored) => println!(
                    "created expense: {} {} for user {}",
                    stored.amount(),
                    stored.currency(),
                    stored.user_id()
                ),
                Err(err @ EngineError::DuplicateExpense { .. }) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Expense(Expense {
            command: ExpenseCommand::List(args),
        }) => {
            let expenses = engine
                .expenses_for_user(
                    args.user_id,
                    args.sort_by.as_deref(),
                    args.sort_order.as_deref(),
                )
                .await?;
            for expense in expenses {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    expense.date.format("%Y-%m-%d"),
                    expense.category,
                    Amount::new(expense.amount_minor),
                    expense.currency,
                    expense.comment
                );
            }
        }
        Command::Seed => {
            for (first_name, last_name, currency) in SEED_USERS {
                let user = engine.resolve_user(first_name, last_name, currency).await?;
                println!("user: {} {} ({})", user.full_name(), user.currency, user.id);
            }
        }
    }

    Ok(())
}
