//! Run command - dispatch one bot trigger and print its result

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, check};
use anstream::{eprintln, println};
use repo_bots::bots::BUILTIN_BOTS;
use repo_bots::error::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Raw JSON trigger body
    pub payload: Option<String>,
    /// Force `dryRun: true` into the payload
    pub dry_run: bool,
}

/// Build the trigger body from the command line
///
/// A missing or non-object payload becomes `{}` before `--dry-run` is merged
/// in; otherwise the payload is passed through untouched.
pub fn build_payload(options: &RunOptions) -> Result<Value> {
    let payload = match &options.payload {
        Some(raw) => serde_json::from_str(raw)?,
        None => Value::Object(Map::new()),
    };
    if !options.dry_run {
        return Ok(payload);
    }

    let mut object = match payload {
        Value::Object(object) => object,
        _ => Map::new(),
    };
    object.insert("dryRun".to_string(), Value::Bool(true));
    Ok(Value::Object(object))
}

/// Run the run command
pub async fn run_bot(config_path: Option<&Path>, bot: &str, options: RunOptions) -> Result<()> {
    if !BUILTIN_BOTS.iter().any(|(name, _)| *name == bot) {
        return Err(Error::UnknownBot(bot.to_string()));
    }
    let payload = build_payload(&options)?;
    let ctx = CommandContext::new(config_path).await?;

    eprintln!("{} {}", "Running".muted(), bot.accent());
    let result = ctx.registry.dispatch(bot, payload).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    eprintln!("{} {} finished", check(), bot.accent());
    Ok(())
}
