use api_types::auth::{Credentials, Registration};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand, ValueEnum};
use engine::{Category, CategoryFilter, ExpenseDraft, Filter, TimePreset};
use spedilo_client::{AppContext, AppError, AuthStatus, ClientError, Result, View, config::AppConfig};

use crate::{export, prompt, render};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        /// Read from the environment; prompted for when missing.
        #[arg(long, env = "SPEDILO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account. Sign in afterwards with `login`.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SPEDILO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List expenses, optionally filtered.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print CSV instead of a table.
        #[arg(long)]
        csv: bool,
    },
    Add(ExpenseArgs),
    /// Edit an expense; omitted fields keep their current value.
    Update {
        id: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    Delete {
        id: String,
    },
    /// Weekly, monthly and yearly totals.
    Summary,
    /// Totals grouped by month, category or day.
    Analytics {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value_t = GroupBy::Month)]
        by: GroupBy,
    },
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Category name, or `all`.
    #[arg(long, default_value = "all")]
    category: String,
    /// all, last-month, last-3-months, last-6-months or this-year.
    #[arg(long, default_value = "all", conflicts_with_all = ["from", "to"])]
    range: String,
    /// First day included (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct ExpenseArgs {
    #[arg(long, help = category_help())]
    category: String,
    #[arg(long)]
    amount: String,
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long, help = category_help())]
    category: Option<String>,
    #[arg(long)]
    amount: Option<String>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum GroupBy {
    Month,
    Category,
    Day,
}

pub async fn run(config: AppConfig, command: Command) -> Result<()> {
    let mut ctx = AppContext::new(config)?;
    let status = ctx.start().await;
    tracing::debug!(?status, "session restored");

    match command {
        Command::Login { email, password } => {
            ctx.navigate(View::Login);
            let password = match password {
                Some(password) => password,
                None => prompt::password("Password: ")?,
            };
            let user = ctx
                .login(Credentials { email, password })
                .await
                .map_err(|err| failure(&ctx, err, "Login failed"))?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            ctx.navigate(View::Register);
            let password = match password {
                Some(password) => password,
                None => prompt::new_password()?,
            };
            let registration = Registration {
                name,
                email,
                password,
            };
            ctx.session()
                .register(&registration)
                .await
                .map_err(|err| failure(&ctx, err, "Registration failed"))?;
            println!("Registered {}. Sign in with `spedilo login`.", registration.email);
        }
        Command::Logout => {
            if status == AuthStatus::Unauthenticated {
                println!("Not logged in.");
                return Ok(());
            }
            ctx.logout().await;
            println!("Logged out.");
        }
        Command::Whoami => match ctx.session().current_user() {
            Some(user) => println!("{} <{}>", user.name, user.email),
            None => println!("Not logged in."),
        },
        Command::List { filter, csv } => {
            enter(&mut ctx, View::Dashboard)?;
            refresh(&mut ctx).await?;
            let filter = build_filter(&ctx, &filter)?;
            let report = ctx.report(&filter);
            if csv {
                export::write_csv(std::io::stdout().lock(), &report.rows, ctx.tz())?;
            } else {
                print!("{}", render::expense_table(&report.rows, ctx.tz()));
            }
        }
        Command::Add(args) => {
            enter(&mut ctx, View::Dashboard)?;
            let today = Utc::now().with_timezone(&ctx.tz()).date_naive();
            let draft = ExpenseDraft {
                category: args.category,
                amount: args.amount,
                date: args.date.unwrap_or(today).format("%Y-%m-%d").to_string(),
                description: args.description.unwrap_or_default(),
            };
            ctx.add_expense(&draft)
                .await
                .map_err(|err| failure(&ctx, err, "Failed to add expense"))?;
            println!("Expense added.");
        }
        Command::Update { id, fields } => {
            enter(&mut ctx, View::Dashboard)?;
            refresh(&mut ctx).await?;
            let Some(current) = ctx
                .expenses()
                .items()
                .iter()
                .find(|expense| expense.id.as_deref() == Some(id.as_str()))
            else {
                return Err(AppError::Terminal(format!("no expense with id {id}")));
            };

            let mut draft = ExpenseDraft::from_expense(current, ctx.tz());
            if let Some(category) = fields.category {
                draft.category = category;
            }
            if let Some(amount) = fields.amount {
                draft.amount = amount;
            }
            if let Some(date) = fields.date {
                draft.date = date.format("%Y-%m-%d").to_string();
            }
            if let Some(description) = fields.description {
                draft.description = description;
            }

            ctx.update_expense(&id, &draft)
                .await
                .map_err(|err| failure(&ctx, err, "Failed to update expense"))?;
            println!("Expense updated.");
        }
        Command::Delete { id } => {
            enter(&mut ctx, View::Dashboard)?;
            ctx.delete_expense(&id)
                .await
                .map_err(|err| failure(&ctx, err, "Failed to delete expense"))?;
            println!("Expense deleted.");
        }
        Command::Summary => {
            enter(&mut ctx, View::Dashboard)?;
            refresh(&mut ctx).await?;
            print!("{}", render::summary(&ctx.report(&Filter::default())));
        }
        Command::Analytics { filter, by } => {
            enter(&mut ctx, View::Analytics)?;
            refresh(&mut ctx).await?;
            let filter = build_filter(&ctx, &filter)?;
            let report = ctx.report(&filter);
            let chart = match by {
                GroupBy::Month => render::monthly_chart(&report.monthly),
                GroupBy::Category => render::category_chart(&report.by_category),
                GroupBy::Day => render::daily_chart(&report.daily),
            };
            if chart.is_empty() {
                println!("No expenses found.");
            } else {
                print!("{chart}");
            }
        }
    }

    Ok(())
}

fn category_help() -> String {
    let presets: Vec<&str> = Category::PRESETS.iter().map(Category::label).collect();
    format!("{} or a custom label", presets.join(", "))
}

fn enter(ctx: &mut AppContext, view: View) -> Result<()> {
    if ctx.navigate(view) != view {
        return Err(AppError::Terminal(
            "Not logged in. Sign in with `spedilo login`.".to_string(),
        ));
    }
    Ok(())
}

async fn refresh(ctx: &mut AppContext) -> Result<()> {
    ctx.refresh()
        .await
        .map_err(|err| failure(ctx, err, "Failed to fetch expenses"))
}

fn build_filter(ctx: &AppContext, args: &FilterArgs) -> Result<Filter> {
    let category: CategoryFilter = args.category.parse().map_err(ClientError::from)?;
    let preset = if args.from.is_some() || args.to.is_some() {
        TimePreset::Custom {
            from: args.from,
            to: args.to,
        }
    } else {
        args.range.parse::<TimePreset>().map_err(ClientError::from)?
    };
    tracing::debug!(range = preset.label(), "applying filter");
    Ok(Filter {
        category,
        range: preset.range_at(Utc::now().with_timezone(&ctx.tz())),
    })
}

/// Message for a failed action; a redirect to the login view means the
/// session expired.
fn failure(ctx: &AppContext, err: ClientError, fallback: &str) -> AppError {
    let message = if matches!(err, ClientError::Unauthorized) && ctx.view() == View::Login {
        "Session expired. Sign in again with `spedilo login`.".to_string()
    } else {
        ctx.expenses()
            .error()
            .map(str::to_string)
            .unwrap_or_else(|| err.user_message(fallback))
    };
    AppError::Terminal(message)
}
