//! Terminal front end: argument handling, input parsing, rendering and the
//! game loop

use anyhow::{Context, Result};
use metaparser_bridge::{EngineInteractor, GameSession, Outcome, Paragraph, SaveSlot};
use metaparser_core::BridgeConfig;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::warn;

/// Build the bridge config from command line arguments.
///
/// `metaparser [APP_DIR | CONFIG.json]`: a `.json` argument is read as a config
/// file, anything else is taken as the application directory.
pub fn config_from_args(args: &[String]) -> Result<BridgeConfig> {
    match args.get(1) {
        Some(arg) if arg.ends_with(".json") => BridgeConfig::from_json_file(Path::new(arg))
            .with_context(|| format!("loading config {}", arg)),
        Some(arg) => Ok(BridgeConfig::with_app_dir(arg)),
        None => Ok(BridgeConfig::default()),
    }
}

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Leave the game (autosaves)
    Quit,
    /// Save to a numbered slot, or the autosave
    Save(Option<u32>),
    /// Load a numbered slot
    Load(u32),
    /// `:save N` / `:load N` with N outside the slot range
    NoSuchSlot(u32),
    /// List save slots
    Slots,
    /// Nothing typed
    Empty,
    /// Player text for the parser
    Text(String),
}

/// Parse a prompt line. Host commands start with a colon; slot numbers are
/// checked against `slots`.
pub fn parse_input(line: &str, slots: u32) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Input::Text(line.to_string());
    };
    let mut parts = command.split_whitespace();
    let in_range = |n: u32| (1..=slots).contains(&n);
    match (parts.next(), parts.next().map(str::parse::<u32>)) {
        (Some("quit" | "q"), _) => Input::Quit,
        (Some("save"), None) => Input::Save(None),
        (Some("save" | "load"), Some(Ok(n))) if !in_range(n) => Input::NoSuchSlot(n),
        (Some("save"), Some(Ok(n))) => Input::Save(Some(n)),
        (Some("load"), Some(Ok(n))) => Input::Load(n),
        (Some("slots"), _) => Input::Slots,
        _ => Input::Text(line.to_string()),
    }
}

/// Parse a slot number answer to a menu prompt
pub fn parse_slot(line: &str, slots: u32) -> Option<u32> {
    line.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (1..=slots).contains(n))
}

/// Plain-text rendering of one transcript entry
pub fn render_paragraph(paragraph: &Paragraph) -> String {
    let response = paragraph.response.plain();
    if paragraph.command.is_empty() {
        response
    } else {
        format!("{}\n{}", paragraph.command, response)
    }
}

pub fn render_slots(slots: &[SaveSlot]) -> String {
    slots
        .iter()
        .map(|slot| {
            format!(
                "  {}: {}",
                slot.number,
                slot.saved_at.as_deref().unwrap_or("empty")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin> Console<R, W> {
    async fn say(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(self.lines.next_line().await?)
    }
}

/// Run the prompt loop on a started session until `:quit` or end of input.
///
/// A failed turn is reported and the loop keeps reading; only console I/O
/// errors end it. The caller still owns shutdown through
/// [`GameSession::finish`].
pub async fn play<I, R, W>(session: &mut GameSession<I>, input: R, out: W) -> Result<()>
where
    I: EngineInteractor,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut console = Console {
        lines: input.lines(),
        out,
    };
    if let Some(paragraph) = session.history().first() {
        console.say(&render_paragraph(paragraph)).await?;
    }

    let slots = session.save_slots().len() as u32;
    while let Some(line) = console.prompt("> ").await? {
        let input = parse_input(&line, slots);
        if input == Input::Quit {
            break;
        }
        if let Err(e) = handle_input(session, &mut console, input, slots).await {
            warn!("Turn failed: {:#}", e);
            console.say(&format!("Error: {:#}", e)).await?;
        }
    }
    Ok(())
}

async fn handle_input<I, R, W>(
    session: &mut GameSession<I>,
    console: &mut Console<R, W>,
    input: Input,
    slots: u32,
) -> Result<()>
where
    I: EngineInteractor,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match input {
        Input::Empty | Input::Quit => {}
        Input::NoSuchSlot(n) => {
            console
                .say(&format!("No such slot: {} (1-{})", n, slots))
                .await?
        }
        Input::Slots => console.say(&render_slots(&session.save_slots())).await?,
        Input::Save(slot) => save_to(session, console, slot).await?,
        Input::Load(slot) => load_from(session, console, slot).await?,
        Input::Text(text) => {
            let turn = session.send_text(&text).await?;
            console.say(&turn.paragraph.response.plain()).await?;
            match turn.outcome {
                Outcome::Continue => {}
                Outcome::Restarted => {
                    if let Some(paragraph) = session.history().first() {
                        console.say(&render_paragraph(paragraph)).await?;
                    }
                }
                Outcome::ShowSaveMenu => {
                    if let Some(n) = pick_slot(session, console, "Save to").await? {
                        save_to(session, console, Some(n)).await?;
                    }
                }
                Outcome::ShowLoadMenu => {
                    if let Some(n) = pick_slot(session, console, "Load from").await? {
                        load_from(session, console, n).await?;
                    }
                }
            }
        }
    }
    Ok(())
}

async fn pick_slot<I, R, W>(
    session: &GameSession<I>,
    console: &mut Console<R, W>,
    action: &str,
) -> Result<Option<u32>>
where
    I: EngineInteractor,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let slots = session.save_slots();
    console.say(&render_slots(&slots)).await?;
    let answer = console
        .prompt(&format!("{} slot (blank to cancel): ", action))
        .await?;
    Ok(answer.and_then(|line| parse_slot(&line, slots.len() as u32)))
}

async fn save_to<I, R, W>(
    session: &mut GameSession<I>,
    console: &mut Console<R, W>,
    slot: Option<u32>,
) -> Result<()>
where
    I: EngineInteractor,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match slot {
        Some(n) => {
            session.save_state(Some(&SaveSlot::file_name(n))).await?;
            console.say("Game saved.").await?;
        }
        None => session.save_state(None).await?,
    }
    Ok(())
}

async fn load_from<I, R, W>(
    session: &mut GameSession<I>,
    console: &mut Console<R, W>,
    slot: u32,
) -> Result<()>
where
    I: EngineInteractor,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    session.load_state(&SaveSlot::file_name(slot)).await?;
    console.say("Game loaded.").await?;
    if let Some(paragraph) = session.history().last() {
        console.say(&render_paragraph(paragraph)).await?;
    }
    Ok(())
}
