//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - serve: Run the task endpoint
//! - generate: Print tasks for a goal
//! - play: Sort tasks in the terminal
//! - history / settings: Persisted scores and sound settings
//! - doctor: Show configuration and whether live generation is on

use anyhow::{Context, Result};
use serde_json::json;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;

use focus_sdk::{Bucket, BucketSet, Slot};
use tokio_util::sync::CancellationToken;

use crate::client::{FetchOutcome, TaskApiClient};
use crate::config::Config;
use crate::game::{Action, GameState, Screen};
use crate::generation::TaskGenerator;
use crate::store::{FileStorage, ScoreHistory, SoundSettings, SoundType};

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

fn storage(config: &Config) -> FileStorage {
    FileStorage::in_dir(&config.core.data_dir)
}

/// Run the generation endpoint until interrupted
pub async fn handle_serve(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = config.clone();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    crate::api::serve(&config)
        .await
        .with_context(|| format!("Failed to serve on {}:{}", config.server.host, config.server.port))
}

/// Tasks for a goal, either in-process or from a running endpoint.
///
/// Ctrl-C while waiting on the endpoint cancels the request and yields the
/// fallback list.
async fn obtain_tasks(goal: &str, server: Option<String>, config: &Config) -> FetchOutcome {
    match server {
        Some(endpoint) => {
            let client = TaskApiClient::new(
                endpoint,
                Duration::from_secs(config.client.timeout_secs),
                config.buckets.bucket_set(),
            );

            let cancel = CancellationToken::new();
            let watcher = {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                })
            };

            let outcome = client.fetch_or_fallback(goal, &cancel).await;
            watcher.abort();
            outcome
        }
        None => {
            let generator = TaskGenerator::from_config(config);
            let (tasks, source) = generator.generate_with_source(goal).await;
            FetchOutcome {
                tasks,
                source,
                notice: None,
            }
        }
    }
}

/// Generate tasks for a goal and print them
pub async fn handle_generate(
    goal: String,
    server: Option<String>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let outcome = obtain_tasks(&goal, server, config).await;

    match format {
        OutputFormat::Text => {
            if let Some(notice) = &outcome.notice {
                println!("⚠ {}", notice);
                println!();
            }
            println!("Tasks for: {} ({})", goal.trim(), outcome.source.as_str());
            println!();
            for task in &outcome.tasks {
                println!("  {:<4} {:<50} [{}]", task.id, task.text, task.correct_bucket);
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "goal": goal.trim(),
                "source": outcome.source.as_str(),
                "notice": outcome.notice,
                "tasks": outcome.tasks,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Map a typed choice to a bucket: `1`-`3` or a label (case-insensitive).
pub fn parse_choice(choice: &str, buckets: &BucketSet) -> Option<Bucket> {
    let choice = choice.trim();
    if let Ok(n) = choice.parse::<usize>() {
        return Slot::ALL
            .into_iter()
            .find(|slot| slot.index() + 1 == n)
            .map(|slot| buckets.bucket(slot));
    }

    Slot::ALL
        .into_iter()
        .find(|slot| buckets.label(*slot).eq_ignore_ascii_case(choice))
        .map(|slot| buckets.bucket(slot))
}

/// Drive a sorting round from line input.
///
/// Returns `true` when every task was sorted, `false` when the input ended or
/// the player quit with `q`.
pub fn play_round<R: BufRead, W: Write>(
    state: &mut GameState,
    buckets: &BucketSet,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    loop {
        let next = state.remaining().next().cloned();
        let Some(task) = next else {
            break;
        };
        writeln!(out)?;
        writeln!(
            out,
            "[{}/{}] {}",
            state.sorted_count + 1,
            state.tasks.len(),
            task.text
        )?;
        for slot in Slot::ALL {
            writeln!(out, "  {}) {}", slot.index() + 1, buckets.label(slot))?;
        }
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(false);
        }

        let Some(bucket) = parse_choice(choice, buckets) else {
            writeln!(out, "Pick 1, 2 or 3 (q to quit)")?;
            continue;
        };

        state.reduce(Action::DropTask {
            id: task.id.clone(),
            bucket,
        });
        if let Some(message) = &state.last_message {
            writeln!(out, "{}", message)?;
        }
        state.reduce(Action::ClearMessage);
    }

    Ok(state.is_complete())
}

/// Play a sorting round in the terminal
pub async fn handle_play(
    goal: String,
    server: Option<String>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let storage = storage(config);
    let history = ScoreHistory::new(&storage);
    let buckets = config.buckets.bucket_set();

    let mut state = GameState::new(SoundSettings::load(&storage), history.list());
    state.reduce(Action::SetGoal(goal.trim().to_string()));
    state.reduce(Action::SetShowOnboarding(false));
    state.reduce(Action::GenerationStarted);

    let outcome = obtain_tasks(&goal, server, config).await;
    if let Some(notice) = &outcome.notice {
        println!("⚠ {}", notice);
    }
    state.reduce(Action::SetTasks(outcome.tasks));
    state.reduce(Action::GoToScreen(Screen::Sort));

    println!("Goal: {}", state.goal);
    println!("Sort each task into a bucket. Type q to quit.");

    let completed = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut out = std::io::stdout();
        play_round(&mut state, &buckets, &mut input, &mut out)?
    };

    if !completed {
        println!();
        println!("Round abandoned ({} of {} sorted).", state.sorted_count, state.tasks.len());
        return Ok(());
    }

    let score = state.score();
    let saved = history.save(score).context("Failed to save score")?;
    state.reduce(Action::RecordScore(score));
    tracing::debug!(score, history = ?saved, "Recorded score");

    match format {
        OutputFormat::Text => {
            println!();
            println!("Results");
            println!("=======");
            println!(
                "Score: {}% ({} of {} correct)",
                score,
                state.correct_count,
                state.tasks.len()
            );
            println!();
            for task in &state.tasks {
                let picked = task
                    .sorted_bucket
                    .as_ref()
                    .map(Bucket::as_str)
                    .unwrap_or("-");
                let mark = if task.sorted_bucket.as_ref() == Some(&task.correct_bucket) {
                    "✓"
                } else {
                    "✗"
                };
                println!(
                    "  {} {:<50} {} (answer: {})",
                    mark, task.text, picked, task.correct_bucket
                );
            }
            println!();
            println!("Recent scores: {}", format_scores(&state.score_history));
        }
        OutputFormat::Json => {
            let output = json!({
                "goal": state.goal,
                "score": score,
                "correct": state.correct_count,
                "total": state.tasks.len(),
                "tasks": state.tasks,
                "history": state.score_history,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn format_scores(scores: &[u8]) -> String {
    if scores.is_empty() {
        return "none".to_string();
    }
    scores
        .iter()
        .map(|s| format!("{}%", s))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Show or clear score history
pub async fn handle_history(clear: bool, config: &Config, format: OutputFormat) -> Result<()> {
    let storage = storage(config);
    let history = ScoreHistory::new(&storage);

    if clear {
        history.clear().context("Failed to clear score history")?;
        match format {
            OutputFormat::Text => println!("✓ Score history cleared"),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&json!({ "cleared": true }))?)
            }
        }
        return Ok(());
    }

    let scores = history.list();
    match format {
        OutputFormat::Text => {
            if scores.is_empty() {
                println!("No scores yet");
                return Ok(());
            }
            println!("Recent scores (most recent first):");
            for (i, score) in scores.iter().enumerate() {
                println!("  {}. {}%", i + 1, score);
            }
        }
        OutputFormat::Json => {
            let output = json!({ "scores": scores, "count": scores.len() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_settings(settings: &SoundSettings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Sound:   {}", settings.sound_type);
            println!("Volume:  {:.2}", settings.volume);
            println!("Vibrate: {}", settings.vibrate);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(settings)?),
    }
    Ok(())
}

/// Show sound settings
pub async fn handle_settings_show(config: &Config, format: OutputFormat) -> Result<()> {
    let settings = SoundSettings::load(&storage(config));
    print_settings(&settings, format)
}

/// Update sound settings; unspecified fields keep their current value
pub async fn handle_settings_set(
    sound: Option<SoundType>,
    volume: Option<f64>,
    vibrate: Option<bool>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let storage = storage(config);
    let mut settings = SoundSettings::load(&storage);

    if let Some(sound) = sound {
        settings.sound_type = sound;
    }
    if let Some(volume) = volume {
        settings.volume = volume;
    }
    if let Some(vibrate) = vibrate {
        settings.vibrate = vibrate;
    }

    let saved = settings.save(&storage).context("Failed to save settings")?;
    if let OutputFormat::Text = format {
        println!("✓ Settings saved");
    }
    print_settings(&saved, format)
}

/// Show configuration and generation status
pub async fn handle_doctor(
    config: &Config,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut issues = Vec::new();
    let mut checks: Vec<(&str, String)> = Vec::new();

    // Config is already validated when loaded
    let path = match config_path {
        Some(path) => path.display().to_string(),
        None => Config::default_config_path()?.display().to_string(),
    };
    checks.push(("Configuration", format!("Valid ({})", path)));

    let data_dir = &config.core.data_dir;
    if data_dir.exists() {
        checks.push(("Data directory", data_dir.display().to_string()));
    } else {
        checks.push(("Data directory", "Not created yet".to_string()));
    }

    if config.has_api_key() {
        checks.push(("API key", "Configured".to_string()));
    } else {
        checks.push(("API key", "Not configured".to_string()));
        issues.push(format!(
            "{} is not set. Only fallback tasks will be served.",
            crate::config::API_KEY_ENV
        ));
    }

    checks.push(("Model", config.llm.model.clone()));
    checks.push(("API base URL", config.llm.base_url.clone()));
    checks.push(("Buckets", config.buckets.labels.join(" | ")));
    checks.push((
        "Rebalancing",
        if config.generation.rebalance {
            format!("On (min {} per bucket)", config.generation.min_per_bucket)
        } else {
            "Off".to_string()
        },
    ));
    checks.push((
        "Endpoint",
        format!("{}:{}", config.server.host, config.server.port),
    ));
    checks.push(("Client endpoint", config.client.endpoint.clone()));

    match format {
        OutputFormat::Text => {
            println!("Focus Sort Diagnostics");
            println!("======================");
            println!();

            for (check, status) in &checks {
                println!("  {:<20} {}", format!("{}:", check), status);
            }

            println!();

            if issues.is_empty() {
                println!("✓ All checks passed!");
            } else {
                println!("⚠ Issues found:");
                println!();
                for (i, issue) in issues.iter().enumerate() {
                    println!("  {}. {}", i + 1, issue);
                }
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "checks": checks.iter().map(|(name, status)| {
                    json!({
                        "name": name,
                        "status": status
                    })
                }).collect::<Vec<_>>(),
                "issues": issues,
                "live": config.has_api_key(),
                "healthy": issues.is_empty()
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
