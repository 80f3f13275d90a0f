//! The terminal chat frontend.

#[macro_use]
extern crate tracing;

use std::collections::HashMap;
use std::env;
use std::io::Write as _;
use std::time::Duration;

use codepane::host::SystemHost;
use codepane::relay::RelayProvider;
use codepane_core::conversation::{CodeLine, Turn, TurnId};
use codepane_core::{Controller, ControllerBuilder, ControllerEvent};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";
const DEFAULT_RELAY_URL: &str = "http://localhost:3001";

const COMMANDS: &[(&str, &str)] = &[
    ("/copy", "Copy the last generated code to the clipboard"),
    ("/open", "Open the last generated code in an external viewer"),
    ("/clear", "Clear the conversation"),
    ("/help", "Show available commands"),
    ("/quit", "Exit codepane"),
];

/// Tracks what has already been printed for each revealing turn.
#[derive(Default)]
struct Renderer {
    lines: HashMap<TurnId, Vec<CodeLine>>,
    printed: HashMap<TurnId, usize>,
}

impl Renderer {
    fn turn_added(&mut self, id: TurnId, code_lines: Vec<CodeLine>) {
        self.lines.insert(id, code_lines);
        self.printed.insert(id, 0);
    }

    fn reveal(&mut self, id: TurnId, visible: usize) {
        let Some(lines) = self.lines.get(&id) else {
            return;
        };
        let printed = self.printed.entry(id).or_insert(0);
        while *printed < visible.min(lines.len()) {
            let line = &lines[*printed];
            let number = format!("{:>4}", line.number);
            println!("{} {}", number.dimmed(), line.content);
            *printed += 1;
        }
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.printed.clear();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let relay_url = env::var("CODEPANE_RELAY_URL")
        .unwrap_or_else(|_| DEFAULT_RELAY_URL.to_owned());
    let provider = RelayProvider::new(relay_url);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let controller = ControllerBuilder::with_relay_provider(provider)
        .with_host(SystemHost)
        .on_event(move |event| {
            event_tx.send(event).ok();
        })
        .build();

    println!(
        "{} Describe the code you need, or type {} for commands.",
        "codepane".bright_white().bold(),
        "/help".bright_cyan()
    );

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut renderer = Renderer::default();
    let mut last_code: Option<String> = None;

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.starts_with('/') {
            if !handle_command(input, &controller, &mut renderer, &last_code)
                .await
            {
                break;
            }
            continue;
        }
        controller.submit(input);

        let mut progress_bar: Option<ProgressBar> = None;
        let mut active_reveal: Option<TurnId> = None;
        let mut waiting = true;

        loop {
            if waiting {
                progress_bar
                    .get_or_insert_with(|| {
                        let progress_bar = ProgressBar::new_spinner();
                        progress_bar.set_style(progress_style.clone());
                        progress_bar.set_message("Generating...");
                        progress_bar
                    })
                    .inc(1);
            }

            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep(Duration::from_millis(100)) => {
                    continue;
                }
            };

            match event {
                ControllerEvent::TurnAdded(turn) => match turn {
                    Turn::Assistant {
                        id,
                        content,
                        code_lines,
                    } => {
                        finish_spinner(&mut progress_bar);
                        println!("{} {}", BAR_CHAR.bright_cyan(), "AI".bold());
                        last_code = Some(content);
                        renderer.turn_added(id, code_lines);
                        active_reveal = Some(id);
                    }
                    Turn::Error { content, .. } => {
                        finish_spinner(&mut progress_bar);
                        println!(
                            "{} {}",
                            BAR_CHAR.bright_red(),
                            content.red()
                        );
                    }
                    Turn::User { .. } => {}
                },
                ControllerEvent::LinesRevealed { id, visible } => {
                    renderer.reveal(id, visible);
                }
                ControllerEvent::RevealFinished { id } => {
                    if active_reveal == Some(id) {
                        println!();
                        break;
                    }
                }
                ControllerEvent::Idle => {
                    waiting = false;
                    finish_spinner(&mut progress_bar);
                    if active_reveal.is_none() {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
}

fn finish_spinner(progress_bar: &mut Option<ProgressBar>) {
    if let Some(progress_bar) = progress_bar.take() {
        progress_bar.finish_and_clear();
    }
}

/// Handles a slash command locally. Returns `false` to quit.
async fn handle_command(
    input: &str,
    controller: &Controller,
    renderer: &mut Renderer,
    last_code: &Option<String>,
) -> bool {
    match input {
        "/help" => {
            for (cmd, desc) in COMMANDS {
                println!("  {} - {desc}", cmd.bright_cyan());
            }
        }
        "/clear" => {
            controller.reset();
            controller.snapshot().await;
            renderer.clear();
            println!("Chat cleared");
        }
        "/copy" => {
            let Some(code) = last_code else {
                println!("Nothing to copy yet");
                return true;
            };
            controller.copy(code.clone());
            // The snapshot doubles as a sync point: by the time it
            // answers, the copy has either raised the flag or failed.
            if controller.snapshot().await.copied {
                println!("{}", "Copied!".bright_green());
            }
        }
        "/open" => {
            let Some(code) = last_code else {
                println!("Nothing to open yet");
                return true;
            };
            controller.open_external(code.clone());
            controller.snapshot().await;
        }
        "/quit" => {
            return false;
        }
        _ => {
            println!(
                "Unknown command: {input}. Type /help for available commands."
            );
        }
    }
    true
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
