use anyhow::{bail, Context, Result};
use crossterm::style::Stylize;
use std::path::PathBuf;
use std::sync::Arc;

use column_state::api::notifier::{HttpNotifier, LoggingNotifier, Notifier};
use column_state::column_menu::ColumnMenu;
use column_state::column_ops::{self, ColumnTransition, MoveDirection, MoveEdge};
use column_state::config::config::Config;
use column_state::data::{ColumnType, SortOrder};
use column_state::state::ViewerSession;
use column_state::styling::build_styling;

mod table_display;

use table_display::{display_columns, display_menu, display_style};

fn print_help() {
    println!("{}", "column-state - column layout engine for the data viewer".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  column-state [OPTIONS] <SESSION.json> <COMMAND> [ARGS...]");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}           - Write the updated session back to the file", "--write".green());
    println!("  {}   - Use this config file instead of the default", "--config <FILE>".green());
    println!("  {} - Generate config file with defaults", "--generate-config".green());
    println!("  {}            - Show this help", "--help".green());
    println!();
    println!("{}", "Commands:".yellow());
    println!("  {}                      - Show columns", "show".green());
    println!("  {}          - Move one step within unlocked columns", "left|right <col>".green());
    println!("  {}          - Move to the edge of unlocked columns", "front|back <col>".green());
    println!("  {}    - Pin or release columns", "lock|unlock <col>...".green());
    println!("  {} - Change sort", "sort ASC|DESC|NONE <col>...".green());
    println!("  {}       - Resolve cell style", "style <value> <dtype>".green());
    println!("  {}                - Show the column menu", "menu <col>".green());
    println!();
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {}", path.display()))?;
    println!("Configuration file created at: {:?}", path);
    Ok(())
}

fn require<'a>(args: &'a [String], what: &str) -> Result<&'a [String]> {
    if args.is_empty() {
        bail!("Missing {}", what);
    }
    Ok(args)
}

fn transition_for(command: &str, args: &[String], session: &ViewerSession) -> Result<ColumnTransition> {
    let data_id = session.data_id.as_str();
    let transition = match command {
        "left" | "right" => {
            let direction: MoveDirection = command.parse()?;
            let col = &require(args, "column name")?[0];
            column_ops::move_one_position(col, &session.columns, data_id, direction)
        }
        "front" | "back" => {
            let col = &require(args, "column name")?[0];
            column_ops::move_to(col, &session.columns, data_id, MoveEdge::from(command))
        }
        "lock" => column_ops::lock_cols(require(args, "column names")?, &session.columns, data_id),
        "unlock" => {
            column_ops::unlock_cols(require(args, "column names")?, &session.columns, data_id)
        }
        "sort" => {
            let (order, cols) = require(args, "sort direction")?
                .split_first()
                .map(|(order, cols)| (SortOrder::from(order.as_str()), cols))
                .context("Missing sort direction")?;
            column_ops::update_sort(require(cols, "column names")?, order, &session.sort_info)
        }
        other => bail!("Unknown command '{}'", other),
    };
    Ok(transition)
}

fn run(args: Vec<String>) -> Result<()> {
    let mut write_back = false;
    let mut config_path: Option<PathBuf> = None;
    let mut positional = Vec::new();

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--generate-config" => return generate_config(),
            "--write" => write_back = true,
            "--config" => {
                config_path = Some(iter.next().context("--config needs a file")?.into());
            }
            _ => positional.push(arg),
        }
    }

    let config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let [session_path, command, rest @ ..] = positional.as_slice() else {
        print_help();
        bail!("Expected a session file and a command");
    };
    let session_path = PathBuf::from(session_path);
    let mut session = ViewerSession::load(&session_path)?;

    match command.as_str() {
        "show" => {
            display_columns(&session, &config.display.icons);
            return Ok(());
        }
        "style" => {
            let [value, dtype, ..] = rest else {
                bail!("style needs a value and a dtype");
            };
            let value: serde_json::Value = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.clone()));
            let style = build_styling(
                Some(&value),
                ColumnType::from_dtype(dtype),
                Some(&config.style_options()),
            );
            display_style(&value.to_string(), &style);
            return Ok(());
        }
        "menu" => {
            let col = require(rest, "column name")?[0].as_str();
            match ColumnMenu::for_column(Some(col), &session.columns, &session.sort_info) {
                Some(menu) => display_menu(&menu),
                None => println!("{}", format!("No column named '{}'", col).yellow()),
            }
            return Ok(());
        }
        _ => {}
    }

    let http = if config.backend.enabled {
        Some(Arc::new(HttpNotifier::from_config(&config.backend)?))
    } else {
        None
    };
    let notifier: Arc<dyn Notifier> = match &http {
        Some(http) => http.clone() as Arc<dyn Notifier>,
        None => Arc::new(LoggingNotifier),
    };

    let transition = transition_for(command, rest, &session)?;
    if transition.is_noop() {
        println!("{}", "Nothing to change.".yellow());
    }
    transition.commit(&mut session, &notifier);

    display_columns(&session, &config.display.icons);

    if write_back {
        session.save(&session_path)?;
        println!("{}", format!("Session written to {}", session_path.display()).green());
    }

    if let Some(http) = http {
        http.wait_idle();
    }

    Ok(())
}

fn main() {
    let log_buffer = column_state::utils::logging::init_tracing();

    if let Err(e) = run(std::env::args().collect()) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }

    for entry in log_buffer.at_least(tracing::Level::WARN) {
        eprintln!("{}", entry.format_for_display().yellow());
    }
}
