use chrono::Local;
use family_ledger::config::Config;
use family_ledger::service::ledger_actor;
use family_ledger::service::monthly_report::{MonthlyOutcome, MonthlyReporter, UserSelection};
use family_ledger::service::notifier::SystemNotifier;
use family_ledger::service::preferences::Preferences;
use family_ledger::service::schedule;
use family_ledger::service::summary::Dashboard;
use family_ledger::types::cli::{self, Command};
use family_ledger::types::input::validate_user_name;
use family_ledger::{LedgerError, LedgerHandle};
use mimalloc::MiMalloc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    info!(
        database_url = %cfg.database_url,
        preferences = %cfg.preferences_path.display(),
        notify_command = %cfg.notify_command.as_deref().unwrap_or("<log>"),
        loglevel = %cfg.loglevel
    );

    let ledger = ledger_actor::open(&cfg.database_url).await?;
    let result = run(command, &cfg, &ledger).await;
    if let Err(e) = ledger.shutdown().await {
        error!(error = %e, "ledger shutdown failed");
    }

    match result {
        Err(e) if e.is_input_error() => {
            eprintln!("{e}");
            std::process::exit(2);
        }
        other => other.map_err(Into::into),
    }
}

async fn run(command: Command, cfg: &Config, ledger: &LedgerHandle) -> Result<(), LedgerError> {
    let today = Local::now().date_naive();
    let reporter = MonthlyReporter::new(
        ledger.clone(),
        SystemNotifier::from_command(cfg.notify_command.as_deref()),
        UserSelection::new(cfg.preferences_path.clone(), cfg.default_user.clone()),
    );

    let monthly_check = command.runs_monthly_check();
    match command {
        Command::Summary { user } => {
            let user = current_user(cfg, user)?;
            println!("{}", Dashboard::load(ledger, &user, today).await?);
            if monthly_check {
                print_outcome(&reporter.check_and_notify(today).await?);
            }
        }
        Command::Add { kind, form, user } => {
            let user = current_user(cfg, user)?;
            let entry = form.into_new_entry(&user, kind, today)?;
            let id = ledger.add_entry(entry).await?;
            println!("Saved entry #{id} for {user}");
            println!("{}", Dashboard::load(ledger, &user, today).await?);
        }
        Command::Users => {
            let prefs = Preferences::load(&cfg.preferences_path)?;
            let users = ledger.list_users().await?;
            if users.is_empty() {
                println!("(no users yet; add one with `select <name>`)");
            }
            for name in users {
                let marker = if prefs.selected_user() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {name}");
            }
        }
        Command::Select { name } => {
            let name = validate_user_name(&name)?;
            let id = ledger.ensure_user(&name).await?;
            Preferences::load(&cfg.preferences_path)?.save_selected_user(&name)?;
            println!("User: {name} (#{id})");
        }
        Command::History { user } => {
            let user = current_user(cfg, user)?;
            let entries = ledger.list_entries_for_user(&user).await?;
            if entries.is_empty() {
                println!("(no entries for {user})");
            }
            for entry in entries {
                println!("{entry}");
            }
        }
        Command::Notify => {
            print_outcome(&reporter.check_and_notify_today().await?);
        }
        Command::Watch => watch(&reporter, cfg.notify_hour).await,
        Command::Help => println!("{}", cli::USAGE),
    }
    Ok(())
}

/// Run the monthly hook now and then on the 1st of every month until Ctrl-C.
/// A check that did not deliver is retried after `schedule::RETRY_INTERVAL`.
async fn watch(reporter: &MonthlyReporter<SystemNotifier>, hour: u32) {
    loop {
        let delivered = match reporter.check_and_notify_today().await {
            Ok(outcome) => {
                print_outcome(&outcome);
                !matches!(outcome, MonthlyOutcome::DeliveryFailed { .. })
            }
            Err(e) => {
                error!(error = %e, "monthly check failed");
                false
            }
        };

        let until_wake = schedule::sleep_until_next_wake(hour);
        let nap = if delivered {
            until_wake
        } else {
            schedule::retry_delay(until_wake)
        };
        info!(secs = nap.as_secs(), retry = !delivered, "sleeping until next monthly check");
        tokio::select! {
            _ = tokio::time::sleep(nap) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; stopping watch");
                return;
            }
        }
    }
}

/// Explicit `--user`, else the selected user, else the configured default.
fn current_user(cfg: &Config, explicit: Option<String>) -> Result<String, LedgerError> {
    match explicit {
        Some(name) => validate_user_name(&name),
        None => {
            let prefs = Preferences::load(&cfg.preferences_path)?;
            validate_user_name(prefs.user_or(&cfg.default_user))
        }
    }
}

fn print_outcome(outcome: &MonthlyOutcome) {
    match outcome {
        MonthlyOutcome::AlreadyNotified { month } => {
            info!(%month, "monthly summary already sent");
        }
        MonthlyOutcome::Sent {
            month,
            user,
            summary,
        } => {
            println!("Monthly summary for {user} ({month}) sent: {summary}");
        }
        MonthlyOutcome::DeliveryFailed { month, reason } => {
            eprintln!("Monthly summary for {month} not delivered: {reason}");
        }
    }
}
