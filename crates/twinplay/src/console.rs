//! Interactive console: the local control surface.
//!
//! Each line is one command. Actions that talk to the partner run on their
//! own task so a slow or unreachable partner never blocks the prompt, and a
//! dedicated thread prints status events as they arrive.

use anyhow::{anyhow, bail, Result};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use twinplay_control::PlaybackSync;
use twinplay_core::StatusReceiver;

const HELP: &str = "\
Commands:
  open <path>        load a medium and check the partner
  peer <url>         set the partner address
  play | pause | stop
  seek <seconds>     jump to an absolute position
  skip <+/-seconds>  jump relative to the current position
  goto <HH.MM.SS>    jump to a clock time
  info               show the loaded medium
  progress           show position and duration
  help               show this text
  quit               stop both sides and exit";

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Open(PathBuf),
    Peer(String),
    Play,
    Pause,
    Stop,
    Seek(u64),
    Skip(i64),
    Goto(String),
    Info,
    Progress,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse a line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "open" | "load" => Self::Open(PathBuf::from(required(word, rest)?)),
            "peer" => Self::Peer(required(word, rest)?.to_string()),
            "play" => Self::Play,
            "pause" => Self::Pause,
            "stop" => Self::Stop,
            "seek" => Self::Seek(
                required(word, rest)?
                    .parse()
                    .map_err(|_| anyhow!("seek expects a non-negative number of seconds"))?,
            ),
            "skip" => Self::Skip(
                required(word, rest)?
                    .parse()
                    .map_err(|_| anyhow!("skip expects a signed number of seconds"))?,
            ),
            "goto" => Self::Goto(required(word, rest)?.to_string()),
            "info" => Self::Info,
            "progress" => Self::Progress,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("Unknown command '{}'. Type 'help' for a list.", other),
        };

        Ok(Some(command))
    }
}

fn required<'a>(word: &str, rest: &'a str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!("'{}' needs an argument", word);
    }
    Ok(rest)
}

/// Actions started from the console that may still be running
#[derive(Default)]
struct PendingActions {
    tasks: JoinSet<()>,
}

impl PendingActions {
    /// Run an action in the background, reporting its error on the console
    fn spawn<F>(&mut self, action: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        while self.tasks.try_join_next().is_some() {}
        self.tasks.spawn(async move {
            if let Err(e) = action.await {
                println!("Error: {}", e);
            }
        });
    }

    /// Wait until every started action has finished
    async fn finish(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Console action did not complete: {}", e);
            }
        }
    }
}

/// Print status events until every sender is gone
fn spawn_status_printer(events: StatusReceiver) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for event in events.iter() {
            debug!(?event, "status");
            println!("[status] {}", event);
        }
    })
}

async fn execute(sync: &PlaybackSync, command: ConsoleCommand) -> Result<()> {
    match command {
        ConsoleCommand::Open(path) => {
            let phase = sync.open_media(&path).await?;
            println!("Readiness: {}", phase);
        }
        ConsoleCommand::Peer(url) => {
            let peer = sync.set_peer(&url)?;
            println!("Partner set to {}", peer);
        }
        ConsoleCommand::Play => sync.play().await?,
        ConsoleCommand::Pause => sync.pause().await?,
        ConsoleCommand::Stop => sync.stop().await?,
        ConsoleCommand::Seek(secs) => sync.seek_to(secs).await?,
        ConsoleCommand::Skip(delta) => sync.skip(delta).await?,
        ConsoleCommand::Goto(clock) => sync.seek_to_clock(&clock).await?,
        ConsoleCommand::Info => println!("{}", sync.media_info()),
        ConsoleCommand::Progress => println!("{}", sync.progress()),
        ConsoleCommand::Help => println!("{}", HELP),
        ConsoleCommand::Quit => {}
    }
    Ok(())
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(sync: Arc<PlaybackSync>, events: StatusReceiver) -> Result<()> {
    spawn_status_printer(events);
    println!("{}", HELP);

    let mut pending = PendingActions::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Info | ConsoleCommand::Progress | ConsoleCommand::Help => {
                execute(&sync, command).await?;
            }
            command => {
                let sync = sync.clone();
                pending.spawn(async move { execute(&sync, command).await });
            }
        }
    }

    // A command the partner already confirmed must still be applied here
    pending.finish().await;

    // Leave the partner stopped when this side goes away
    if sync.session().is_local_loaded() {
        info!("Stopping playback before exit");
        if let Err(e) = sync.stop().await {
            debug!("Stop on exit failed: {}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ConsoleCommand {
        ConsoleCommand::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("play"), ConsoleCommand::Play);
        assert_eq!(parse("  PAUSE "), ConsoleCommand::Pause);
        assert_eq!(parse("stop"), ConsoleCommand::Stop);
        assert_eq!(parse("exit"), ConsoleCommand::Quit);
        assert_eq!(parse("?"), ConsoleCommand::Help);
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse("seek 120"), ConsoleCommand::Seek(120));
        assert_eq!(parse("skip +30"), ConsoleCommand::Skip(30));
        assert_eq!(parse("skip -10"), ConsoleCommand::Skip(-10));
        assert_eq!(
            parse("goto 01.02.03"),
            ConsoleCommand::Goto("01.02.03".into())
        );
        assert_eq!(
            parse("open /media/My Movie.mkv"),
            ConsoleCommand::Open(PathBuf::from("/media/My Movie.mkv"))
        );
        assert_eq!(
            parse("peer 192.168.1.20:5000"),
            ConsoleCommand::Peer("192.168.1.20:5000".into())
        );
    }

    #[tokio::test]
    async fn test_finish_waits_for_running_actions() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        let done = Arc::new(AtomicUsize::new(0));
        let mut pending = PendingActions::default();

        for delay in [50, 10] {
            let done = done.clone();
            pending.spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }
        pending.spawn(async { bail!("partner refused") });

        pending.finish().await;
        assert_eq!(done.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_blank_line_is_ignored() {
        assert!(ConsoleCommand::parse("   ").unwrap().is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(ConsoleCommand::parse("seek").is_err());
        assert!(ConsoleCommand::parse("seek -5").is_err());
        assert!(ConsoleCommand::parse("skip soon").is_err());
        assert!(ConsoleCommand::parse("rewind").is_err());
    }
}
