//! Terminal front end for the sales coach.
//!
//! Type an utterance and press enter. Commands:
//! `/chips` lists quick prompts, `/<n>` sends chip n, `/notes <competitor>`
//! prints competitor notes, `/history` reprints the conversation, `/quit` exits.

use clap::Parser;
use coach_core::{CoachConfig, ConfigOverrides, Role, SessionObserver, Turn};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "coach-demo", about = "Scripted sales coaching chat in the terminal")]
struct Args {
    /// Config TOML file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Playbook TOML file; overrides the config file and COACH_PLAYBOOK.
    #[arg(long)]
    playbook: Option<PathBuf>,

    /// Ask this proxy endpoint for replies instead of the scripted rules.
    #[arg(long)]
    proxy_url: Option<String>,

    /// Pause before each reply, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Give up on a reply after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

struct TerminalObserver;

impl TerminalObserver {
    fn print_turn(turn: &Turn) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(
            out,
            "\n[{}] {}\n{}",
            turn.role().avatar_label(),
            turn.meta_label(),
            turn.text()
        );
        let _ = out.flush();
    }
}

impl SessionObserver for TerminalObserver {
    fn on_turn(&self, turn: &Turn) {
        // User input is already on screen.
        if turn.role() == Role::Assistant {
            Self::print_turn(turn);
        }
    }

    fn on_pending(&self, pending: bool) {
        if pending {
            println!("Coach is typing…");
        }
    }
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            playbook: self.playbook.clone(),
            proxy_url: self.proxy_url.clone(),
            reply_delay_ms: self.delay_ms,
            reply_timeout_ms: self.timeout_ms,
        }
    }
}

fn build_config(args: &Args) -> Result<CoachConfig, coach_core::ConfigError> {
    let base = match &args.config {
        Some(path) => CoachConfig::load(path)?,
        None => CoachConfig::default(),
    };
    Ok(base.apply_env()?.apply_overrides(&args.overrides()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coach_core=info,coach_playbook=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let mut session = config
        .build_session()?
        .with_observer(Box::new(TerminalObserver));

    for turn in session.log().snapshot() {
        TerminalObserver::print_turn(turn);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        match input.strip_prefix('/') {
            Some("quit") | Some("exit") => break,
            Some("chips") => {
                for (i, chip) in session.playbook().quick_prompts.iter().enumerate() {
                    println!("  /{}  {}", i + 1, chip.label);
                }
            }
            Some("history") => {
                for turn in session.log().snapshot() {
                    TerminalObserver::print_turn(turn);
                }
            }
            Some(rest) if rest.starts_with("notes") => {
                let competitor = rest.trim_start_matches("notes").trim();
                match session.knowledge().notes_for(competitor) {
                    Some(notes) => {
                        for note in notes {
                            println!("  • {note}");
                        }
                    }
                    None => {
                        let known: Vec<_> = session.knowledge().competitors().collect();
                        println!("  Known competitors: {}", known.join(", "));
                    }
                }
            }
            Some(rest) => match rest.parse::<usize>() {
                Ok(n) if n > 0 => {
                    if session.select_prompt(n - 1).await.is_ignored() {
                        println!("  No quick prompt {n}; try /chips");
                    }
                }
                _ => println!("  Unknown command /{rest}"),
            },
            None => {
                session.submit(input).await;
            }
        }
    }

    tracing::info!(turns = session.log().len(), "Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_become_overrides() {
        let args = Args::parse_from([
            "coach-demo",
            "--proxy-url",
            "http://b/api",
            "--delay-ms",
            "5",
        ]);
        assert_eq!(
            args.overrides(),
            ConfigOverrides {
                proxy_url: Some("http://b/api".to_string()),
                reply_delay_ms: Some(5),
                ..ConfigOverrides::default()
            }
        );
    }

    #[test]
    fn test_proxy_flag_keeps_file_remote_settings() {
        let path = std::env::temp_dir().join(format!("coach-demo-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[remote]\nendpoint = \"http://a/api\"\ndemo_mode = false\nrequest_timeout_ms = 2000\n",
        )
        .unwrap();

        let args = Args::parse_from([
            "coach-demo",
            "--config",
            path.to_str().unwrap(),
            "--proxy-url",
            "http://b/api",
        ]);
        let base = CoachConfig::load(&path).unwrap();
        let config = base.apply_overrides(&args.overrides());
        std::fs::remove_file(&path).ok();

        let remote = config.remote.unwrap();
        assert_eq!(remote.endpoint, "http://b/api");
        assert!(!remote.demo_mode);
        assert_eq!(remote.request_timeout_ms, Some(2000));
    }
}
