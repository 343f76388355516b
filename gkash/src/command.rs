use thiserror::Error;

pub const USAGE: &str = "usage: gkash <dev|prod> <command> [args]

commands:
  balance <user>
  complete <user> <module> [score]
  purchase <user> <offer>
  history <user>
  progress <user>
  purchases <user>
  portfolio <user>
  audit <user>
  rewards [category]
  stocks";

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Balance { user_id: String },
    Complete {
        user_id: String,
        module_id: String,
        score: Option<f64>,
    },
    Purchase { user_id: String, offer_id: String },
    History { user_id: String },
    Progress { user_id: String },
    Purchases { user_id: String },
    Portfolio { user_id: String },
    Audit { user_id: String },
    Rewards { category: Option<String> },
    Stocks,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("missing command")]
    Missing,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("command '{command}' expects {expected}")]
    Arity {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid score '{0}'")]
    Score(String),
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, CommandError> {
        let (name, rest) = args.split_first().ok_or(CommandError::Missing)?;
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
        match name.as_str() {
            "balance" => one_user("balance", &rest).map(|user_id| Command::Balance { user_id }),
            "history" => one_user("history", &rest).map(|user_id| Command::History { user_id }),
            "progress" => one_user("progress", &rest).map(|user_id| Command::Progress { user_id }),
            "purchases" => {
                one_user("purchases", &rest).map(|user_id| Command::Purchases { user_id })
            }
            "portfolio" => {
                one_user("portfolio", &rest).map(|user_id| Command::Portfolio { user_id })
            }
            "audit" => one_user("audit", &rest).map(|user_id| Command::Audit { user_id }),
            "complete" => match rest.as_slice() {
                [user, module] => Ok(Command::Complete {
                    user_id: user.to_string(),
                    module_id: module.to_string(),
                    score: None,
                }),
                [user, module, score] => Ok(Command::Complete {
                    user_id: user.to_string(),
                    module_id: module.to_string(),
                    score: Some(
                        score
                            .parse::<f64>()
                            .map_err(|_| CommandError::Score(score.to_string()))?,
                    ),
                }),
                _ => Err(CommandError::Arity {
                    command: "complete",
                    expected: "<user> <module> [score]",
                }),
            },
            "purchase" => match rest.as_slice() {
                [user, offer] => Ok(Command::Purchase {
                    user_id: user.to_string(),
                    offer_id: offer.to_string(),
                }),
                _ => Err(CommandError::Arity {
                    command: "purchase",
                    expected: "<user> <offer>",
                }),
            },
            "rewards" => match rest.as_slice() {
                [] => Ok(Command::Rewards { category: None }),
                [category] => Ok(Command::Rewards {
                    category: Some(category.to_string()),
                }),
                _ => Err(CommandError::Arity {
                    command: "rewards",
                    expected: "[category]",
                }),
            },
            "stocks" if rest.is_empty() => Ok(Command::Stocks),
            "stocks" => Err(CommandError::Arity {
                command: "stocks",
                expected: "no arguments",
            }),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// Whether the command can change ledger state.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Command::Complete { .. } | Command::Purchase { .. })
    }
}

fn one_user(command: &'static str, rest: &[&str]) -> Result<String, CommandError> {
    match rest {
        [user] => Ok(user.to_string()),
        _ => Err(CommandError::Arity {
            command,
            expected: "<user>",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_complete_with_and_without_score() {
        assert_eq!(
            Command::parse(&args(&["complete", "alice", "module_budgeting_101"])).unwrap(),
            Command::Complete {
                user_id: "alice".to_string(),
                module_id: "module_budgeting_101".to_string(),
                score: None,
            }
        );
        let cmd = Command::parse(&args(&["complete", "alice", "m", "0.5"])).unwrap();
        assert!(matches!(cmd, Command::Complete { score: Some(s), .. } if s == 0.5));
        assert!(cmd.is_mutation());
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Command::parse(&[]), Err(CommandError::Missing));
        assert_eq!(
            Command::parse(&args(&["transfer"])),
            Err(CommandError::Unknown("transfer".to_string()))
        );
        assert!(matches!(
            Command::parse(&args(&["purchase", "alice"])),
            Err(CommandError::Arity { .. })
        ));
        assert_eq!(
            Command::parse(&args(&["complete", "a", "m", "lots"])),
            Err(CommandError::Score("lots".to_string()))
        );
    }

    #[test]
    fn parses_read_commands() {
        assert_eq!(
            Command::parse(&args(&["rewards", "Investing"])).unwrap(),
            Command::Rewards {
                category: Some("Investing".to_string())
            }
        );
        assert_eq!(Command::parse(&args(&["stocks"])).unwrap(), Command::Stocks);
        assert!(!Command::parse(&args(&["audit", "bob"])).unwrap().is_mutation());
    }
}
