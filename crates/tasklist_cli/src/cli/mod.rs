use clap::{Parser, Subcommand};
use tasklist_core::config::{ConfigOverrides, NoticeBackend, canonical_key};
use tasklist_core::error::AppError;

/// In-memory to-do list session. Commands are read from stdin, one per line.
#[derive(Parser, Debug)]
#[command(name = "tasklist", author, version, about, long_about = None)]
pub struct Cli {
    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,
}

/// One line typed into the session.
#[derive(Parser, Debug)]
#[command(
    name = "tasklist",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Add a task; with no arguments the current draft is submitted
    ///
    /// Example: add "Buy milk" "2% from the corner shop"
    Add {
        title: Option<String>,
        description: Option<String>,
    },
    /// Set the draft title
    ///
    /// Example: title Buy milk
    Title { text: Vec<String> },
    /// Set the draft description
    ///
    /// Example: desc 2% from the corner shop
    #[command(alias = "desc")]
    Description { text: Vec<String> },
    /// Show the draft
    Draft,
    /// Mark a task in the current view as done, or undo that
    ///
    /// Example: toggle 1
    #[command(visible_alias = "done")]
    Toggle { position: usize },
    /// Ask to delete a task in the current view
    ///
    /// Example: delete 2
    #[command(visible_alias = "rm")]
    Delete { position: usize },
    /// Confirm the outstanding delete
    #[command(visible_aliases = ["yes", "y"])]
    Confirm,
    /// Keep the task that was about to be deleted
    #[command(visible_aliases = ["no", "n"])]
    Cancel,
    /// Switch between the To Do and Completed views
    ///
    /// Example: view completed
    #[command(visible_alias = "tab")]
    View { view: String },
    /// List tasks in the current view
    #[command(visible_alias = "ls")]
    List,
    /// Show counts and any pending delete
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Alias(String),
    NoticeBackend,
    NoticeDismissAfter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let field = canonical_key(field);
    if field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match (field.as_str(), remainder) {
        ("theme", None) => ConfigOverrideTarget::Theme,
        ("theme", Some(_)) => return Err("theme override cannot have subfields".to_string()),
        ("aliases" | "alias", remainder) => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            ConfigOverrideTarget::Alias(alias_name.to_string())
        }
        ("notice", Some(sub)) => match canonical_key(sub).as_str() {
            "backend" => ConfigOverrideTarget::NoticeBackend,
            "dismiss_after_ms" => ConfigOverrideTarget::NoticeDismissAfter,
            other => return Err(format!("unknown notice field '{other}'")),
        },
        ("notice", None) => return Err("notice override requires a subfield".to_string()),
        (other, _) => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

pub fn overrides_from_args(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();

    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
            ConfigOverrideTarget::NoticeBackend => {
                overrides.notice_backend = Some(parsed.value.parse::<NoticeBackend>()?);
            }
            ConfigOverrideTarget::NoticeDismissAfter => {
                let ms = parsed.value.parse::<u64>().map_err(|_| {
                    AppError::invalid_input("notice.dismiss_after_ms must be a whole number")
                })?;
                overrides.dismiss_after_ms = Some(ms);
            }
        }
    }

    Ok(overrides)
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

/// Splits a session line into arguments. Single or double quotes group
/// words; inside double quotes a backslash escapes `"` and `\`.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut has_token = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match quote {
            Some('"') if ch == '\\' => match chars.peek() {
                Some(&next) if next == '"' || next == '\\' => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push(ch),
            },
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                has_token = true;
            }
            None if ch.is_whitespace() => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            None => {
                current.push(ch);
                has_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if has_token {
        args.push(current);
    }

    Ok(args)
}
