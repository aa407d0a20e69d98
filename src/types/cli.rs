use crate::db::models::EntryKind;
use crate::error::LedgerError;
use crate::types::input::EntryForm;

pub const USAGE: &str = "\
usage: family-ledger [command]

commands:
  summary [--user U]                       today and month-to-date totals (default);
                                           without --user also runs `notify`
  add <income|expense> <amount> [--category C] [--note N] [--date YYYY-MM-DD] [--user U]
  users                                    list users
  select <name>                            choose the current user
  history [--user U]                       entries, newest first
  notify                                   send this month's summary if not sent yet
  watch                                    run `notify` now and on the 1st of every month";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Summary {
        user: Option<String>,
    },
    Add {
        kind: EntryKind,
        form: EntryForm,
        user: Option<String>,
    },
    Users,
    Select {
        name: String,
    },
    History {
        user: Option<String>,
    },
    Notify,
    Watch,
    Help,
}

impl Command {
    /// Whether the command also runs the monthly hook. The hook always reports
    /// for the selected user, so a `summary --user` for someone else skips it.
    pub fn runs_monthly_check(&self) -> bool {
        matches!(self, Command::Summary { user: None })
    }
}

/// Parse process arguments (without the program name).
pub fn parse_args<I, S>(args: I) -> Result<Command, LedgerError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let Some(cmd) = args.next() else {
        return Ok(Command::Summary { user: None });
    };
    let rest: Vec<String> = args.collect();

    match cmd.as_str() {
        "summary" => {
            let (positional, flags) = split_flags(rest, &["--user"])?;
            no_positional(&cmd, &positional)?;
            Ok(Command::Summary {
                user: flags.get("--user"),
            })
        }
        "add" => {
            let (positional, flags) =
                split_flags(rest, &["--category", "--note", "--date", "--user"])?;
            let [kind, amount]: [String; 2] = positional.try_into().map_err(|_| {
                LedgerError::Usage("add expects <income|expense> <amount>".to_string())
            })?;
            Ok(Command::Add {
                kind: kind.parse()?,
                form: EntryForm {
                    amount,
                    category: flags.get("--category"),
                    note: flags.get("--note"),
                    date: flags.get("--date"),
                },
                user: flags.get("--user"),
            })
        }
        "users" => {
            no_positional(&cmd, &rest)?;
            Ok(Command::Users)
        }
        "select" => {
            let [name]: [String; 1] = rest
                .try_into()
                .map_err(|_| LedgerError::Usage("select expects exactly one <name>".to_string()))?;
            Ok(Command::Select { name })
        }
        "history" => {
            let (positional, flags) = split_flags(rest, &["--user"])?;
            no_positional(&cmd, &positional)?;
            Ok(Command::History {
                user: flags.get("--user"),
            })
        }
        "notify" => {
            no_positional(&cmd, &rest)?;
            Ok(Command::Notify)
        }
        "watch" => {
            no_positional(&cmd, &rest)?;
            Ok(Command::Watch)
        }
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(LedgerError::Usage(format!("unknown command {other:?}"))),
    }
}

struct Flags(Vec<(String, String)>);

impl Flags {
    fn get(&self, name: &str) -> Option<String> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

/// Separate `--flag value` pairs (only those in `known`) from positionals.
fn split_flags(args: Vec<String>, known: &[&str]) -> Result<(Vec<String>, Flags), LedgerError> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if !arg.starts_with("--") {
            positional.push(arg);
            continue;
        }
        if !known.contains(&arg.as_str()) {
            return Err(LedgerError::Usage(format!("unknown option {arg}")));
        }
        let value = iter
            .next()
            .ok_or_else(|| LedgerError::Usage(format!("{arg} needs a value")))?;
        flags.push((arg, value));
    }
    Ok((positional, Flags(flags)))
}

fn no_positional(cmd: &str, args: &[String]) -> Result<(), LedgerError> {
    match args.first() {
        Some(extra) => Err(LedgerError::Usage(format!(
            "{cmd}: unexpected argument {extra:?}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_shows_the_dashboard() {
        assert_eq!(
            parse_args(Vec::<String>::new()).unwrap(),
            Command::Summary { user: None }
        );
    }

    #[test]
    fn summary_for_another_user_skips_the_monthly_check() {
        assert!(parse_args(["summary"]).unwrap().runs_monthly_check());
        assert!(
            !parse_args(["summary", "--user", "Bob"])
                .unwrap()
                .runs_monthly_check()
        );
        assert!(!parse_args(["history"]).unwrap().runs_monthly_check());
    }

    #[test]
    fn add_collects_flags_into_the_form() {
        let cmd = parse_args([
            "add",
            "expense",
            "200",
            "--category",
            "Food",
            "--date",
            "2024-03-10",
            "--user",
            "Alice",
        ])
        .unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                kind: EntryKind::Expense,
                form: EntryForm {
                    amount: "200".to_string(),
                    category: Some("Food".to_string()),
                    note: None,
                    date: Some("2024-03-10".to_string()),
                },
                user: Some("Alice".to_string()),
            }
        );
    }

    #[test]
    fn add_rejects_bad_kind_and_missing_amount() {
        assert!(matches!(
            parse_args(["add", "gift", "5"]),
            Err(LedgerError::UnknownKind(_))
        ));
        assert!(matches!(
            parse_args(["add", "income"]),
            Err(LedgerError::Usage(_))
        ));
    }

    #[test]
    fn unknown_options_and_dangling_flags_are_usage_errors() {
        assert!(matches!(
            parse_args(["history", "--verbose"]),
            Err(LedgerError::Usage(_))
        ));
        assert!(matches!(
            parse_args(["history", "--user"]),
            Err(LedgerError::Usage(_))
        ));
        assert!(matches!(parse_args(["frobnicate"]), Err(LedgerError::Usage(_))));
    }

    #[test]
    fn select_takes_one_name() {
        assert_eq!(
            parse_args(["select", "Bob"]).unwrap(),
            Command::Select {
                name: "Bob".to_string()
            }
        );
        assert!(parse_args(["select"]).is_err());
    }
}
