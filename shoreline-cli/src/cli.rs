use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{CustomType, Text};
use shoreline_core::{
    Config, Scheduler, Trigger, Visibility, VisibilityTracker, WeatherUpdater, WidgetContainer,
    counter::{self, FRAME_INTERVAL},
    provider_from_config, render,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "shoreline",
    version,
    about = "Beach-cleanup site weather widget and impact counters"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the weather once and print the widget.
    Weather {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Keep the widget live: refresh on start, on the timer and on demand.
    ///
    /// Reads commands from stdin: r (retry), h (hide), v (show), q (quit).
    /// Runs until q or Ctrl-C, even after stdin is closed.
    Watch {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Interactively set the target area, refresh interval and API base.
    Configure,

    /// Count the impact figures up from zero.
    Stats {
        /// Animation length in milliseconds; 0 prints the totals straight away.
        #[arg(long, default_value_t = 2000)]
        duration_ms: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

impl From<OutputFormat> for render::Format {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Text => render::Format::Text,
            OutputFormat::Html => render::Format::Html,
        }
    }
}

/// A line typed into `watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchInput {
    Retry,
    Hide,
    Show,
    Quit,
    Unknown,
}

impl WatchInput {
    fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "r" | "retry" => WatchInput::Retry,
            "h" | "hide" => WatchInput::Hide,
            "v" | "show" => WatchInput::Show,
            "q" | "quit" | "exit" => WatchInput::Quit,
            _ => WatchInput::Unknown,
        }
    }
}

/// What `watch` does in response to one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchAction {
    Send(Trigger),
    Nothing,
    RetryUnavailable,
    Unknown,
    Quit,
}

/// Map input to an action. Retry is only offered while the widget shows a
/// failure; showing the page fires only after it was hidden.
fn route_input(
    input: WatchInput,
    widget_failed: bool,
    visibility: &mut VisibilityTracker,
) -> WatchAction {
    match input {
        WatchInput::Retry if widget_failed => WatchAction::Send(Trigger::Retry),
        WatchInput::Retry => WatchAction::RetryUnavailable,
        WatchInput::Hide => {
            visibility.update(Visibility::Hidden);
            WatchAction::Nothing
        }
        WatchInput::Show => match visibility.update(Visibility::Visible) {
            Some(trigger) => WatchAction::Send(trigger),
            None => WatchAction::Nothing,
        },
        WatchInput::Quit => WatchAction::Quit,
        WatchInput::Unknown => WatchAction::Unknown,
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Weather { format } => {
                let config = Config::load()?;
                show_once(&config, format.into()).await
            }
            Command::Watch { format } => {
                let config = Config::load()?;
                watch(&config, format.into()).await
            }
            Command::Configure => configure(),
            Command::Stats { duration_ms } => {
                let config = Config::load()?;
                stats(&config, Duration::from_millis(duration_ms)).await
            }
        }
    }
}

fn build_updater(config: &Config, container: WidgetContainer) -> Result<WeatherUpdater> {
    let provider = provider_from_config(config)?;
    let area = config.weather.target_area.as_str();
    Ok(WeatherUpdater::new(provider, container, area))
}

async fn show_once(config: &Config, format: render::Format) -> Result<()> {
    let container = WidgetContainer::new();
    let updater = build_updater(config, container.clone())?;

    updater.refresh_weather().await;

    println!("{}", render::render(&container.current(), format));
    Ok(())
}

async fn watch(config: &Config, format: render::Format) -> Result<()> {
    let container = WidgetContainer::new();
    let updater = build_updater(config, container.clone())?;

    let mut updates = container.subscribe();
    let initial = render::render(&updates.borrow_and_update(), format);
    println!("{initial}\n");

    let (tx, rx) = mpsc::channel(16);
    let scheduler = Scheduler::new(updater, config.weather.refresh_interval());
    let scheduler = tokio::spawn(scheduler.run(rx));

    tracing::info!(
        area = %config.weather.target_area,
        interval_secs = config.weather.refresh_interval_secs,
        "watching weather; commands: r (retry), h (hide), v (show), q (quit)"
    );

    let mut visibility = VisibilityTracker::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = render::render(&updates.borrow_and_update(), format);
                println!("{view}\n");
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    tracing::info!("stdin closed; refreshing on the timer until Ctrl-C");
                    stdin_open = false;
                    continue;
                };
                let failed = container.current().is_failed();
                match route_input(WatchInput::parse(&line), failed, &mut visibility) {
                    WatchAction::Send(trigger) => tx.send(trigger).await?,
                    WatchAction::Nothing => {}
                    WatchAction::RetryUnavailable => {
                        eprintln!("Retry is only offered after a failed update.");
                    }
                    WatchAction::Unknown => {
                        eprintln!("Unknown command '{}'. Use r, h, v or q.", line.trim());
                    }
                    WatchAction::Quit => break,
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    drop(tx);
    let fired = scheduler.await.context("Scheduler task failed")?;
    tracing::debug!(fired, "watch finished");
    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let area = Text::new("Target area:")
        .with_default(&config.weather.target_area)
        .with_help_message("Matched case-insensitively against forecast area names")
        .prompt()?;

    let minutes = CustomType::<u64>::new("Refresh interval (minutes):")
        .with_default((config.weather.refresh_interval_secs / 60).max(1))
        .with_error_message("Please enter a whole number of minutes")
        .prompt()?;

    let api_base = Text::new("API base URL:")
        .with_default(&config.weather.api_base)
        .prompt()?;

    config.set_target_area(&area);
    config.weather.refresh_interval_secs = minutes.saturating_mul(60);
    config.set_api_base(&api_base);
    config.validate()?;
    config.save()?;

    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn stats(config: &Config, duration: Duration) -> Result<()> {
    let counters = counter::impact_counters(&config.impact);
    let frames: Vec<Vec<u64>> = counters.iter().map(|c| c.frames(duration)).collect();
    let total_frames = frames.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = tokio::io::stdout();
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);

    for i in 0..total_frames {
        ticker.tick().await;
        let line = counters
            .iter()
            .zip(&frames)
            .map(|(c, f)| {
                let value = f.get(i).or(f.last()).copied().unwrap_or(c.target);
                format!("{}: {:>7}", c.label, counter::format_count(value))
            })
            .collect::<Vec<_>>()
            .join("   ");
        out.write_all(format!("\r{line}").as_bytes()).await?;
        out.flush().await?;
    }
    out.write_all(b"\n").await?;
    out.flush().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_watch_input() {
        assert_eq!(WatchInput::parse("r"), WatchInput::Retry);
        assert_eq!(WatchInput::parse(" RETRY \n"), WatchInput::Retry);
        assert_eq!(WatchInput::parse("h"), WatchInput::Hide);
        assert_eq!(WatchInput::parse("v"), WatchInput::Show);
        assert_eq!(WatchInput::parse("q"), WatchInput::Quit);
        assert_eq!(WatchInput::parse("what"), WatchInput::Unknown);
    }

    #[test]
    fn retry_requires_a_failed_widget() {
        let mut visibility = VisibilityTracker::default();

        let action = route_input(WatchInput::Retry, true, &mut visibility);
        assert_eq!(action, WatchAction::Send(Trigger::Retry));

        let action = route_input(WatchInput::Retry, false, &mut visibility);
        assert_eq!(action, WatchAction::RetryUnavailable);
    }

    #[test]
    fn show_fires_only_after_hide() {
        let mut visibility = VisibilityTracker::default();

        let action = route_input(WatchInput::Show, false, &mut visibility);
        assert_eq!(action, WatchAction::Nothing);

        let action = route_input(WatchInput::Hide, false, &mut visibility);
        assert_eq!(action, WatchAction::Nothing);

        let action = route_input(WatchInput::Show, true, &mut visibility);
        assert_eq!(action, WatchAction::Send(Trigger::VisibilityRegained));

        let action = route_input(WatchInput::Show, true, &mut visibility);
        assert_eq!(action, WatchAction::Nothing);
    }

    #[test]
    fn quit_and_unknown_input() {
        let mut visibility = VisibilityTracker::default();

        let quit = route_input(WatchInput::Quit, true, &mut visibility);
        assert_eq!(quit, WatchAction::Quit);

        let unknown = route_input(WatchInput::parse("x"), true, &mut visibility);
        assert_eq!(unknown, WatchAction::Unknown);
    }

    #[test]
    fn parses_weather_format() {
        let cli = Cli::try_parse_from(["shoreline", "weather", "--format", "html"])
            .expect("valid args");
        let Command::Weather { format } = cli.command else {
            panic!("expected the weather command, got {:?}", cli.command);
        };
        assert_eq!(format, OutputFormat::Html);
    }

    #[test]
    fn stats_defaults_to_two_seconds() {
        let cli = Cli::try_parse_from(["shoreline", "stats"]).expect("valid args");
        let Command::Stats { duration_ms } = cli.command else {
            panic!("expected the stats command, got {:?}", cli.command);
        };
        assert_eq!(duration_ms, 2000);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
