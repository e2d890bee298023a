/// Interactive note editor
///
/// Each line typed is appended to the note as a paragraph. Edits go through
/// the debounced draft autosave, so the draft slot is written once typing
/// pauses rather than on every line. Dot-commands set the title, share the
/// note, or open a link.

use crate::Store;
use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{
    completion::{Completer, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    Helper,
};
use snote_api::{share_url, DocId, DraftAutosave, EditorState};
use std::time::Instant;
use tracing::{debug, warn};

const META_COMMANDS: &[&str] = &[
    ".help", ".title", ".show", ".share", ".open", ".discard", ".exit", ".quit",
];

/// Autocomplete helper for dot-commands
#[derive(Clone)]
struct EditorHelper;

impl Completer for EditorHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        if !prefix.starts_with('.') || prefix.contains(char::is_whitespace) {
            return Ok((0, Vec::new()));
        }

        let candidates = META_COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for EditorHelper {
    type Hint = String;
}

impl Highlighter for EditorHelper {}

impl Validator for EditorHelper {}

impl Helper for EditorHelper {}

/// What the read loop should do after a line
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Leave the editor; `draft_saved` is false when the final flush failed
    Exit { draft_saved: bool },
}

/// Note being edited plus its autosave state
pub struct NoteBuffer {
    pub title: String,
    pub content: String,
    autosave: DraftAutosave,
}

impl NoteBuffer {
    /// Start from whatever the editor opens with (draft or empty)
    pub fn restore(store: &Store) -> Result<Self> {
        let mut autosave = DraftAutosave::for_store(store);
        let opened = store.open(None).context("Failed to restore draft")?;

        if let Some(notice) = &opened.notice {
            eprintln!("{} {}", "Notice:".yellow().bold(), notice);
        }

        let (title, content) = match opened.state {
            EditorState::Draft(draft) => {
                let restored = (draft.title.clone(), draft.content.clone());
                autosave.mark_saved(draft);
                restored
            }
            _ => (String::new(), String::new()),
        };

        Ok(Self {
            title,
            content,
            autosave,
        })
    }

    fn edited(&mut self, now: Instant) {
        self.autosave.edit(self.title.clone(), self.content.clone(), now);
    }

    /// Write any pending edits before leaving
    fn finish(&mut self, store: &Store) -> Flow {
        match self.autosave.flush(store) {
            Ok(_) => Flow::Exit { draft_saved: true },
            Err(e) => {
                eprintln!("{} Draft not saved: {}", "Error:".red().bold(), e);
                Flow::Exit { draft_saved: false }
            }
        }
    }

    /// Apply one input line
    pub fn handle_line(&mut self, store: &Store, base_url: &str, line: &str, now: Instant) -> Result<Flow> {
        // Typing paused long enough since the previous line
        match self.autosave.tick(store, now) {
            Ok(true) => debug!("Draft autosaved"),
            Ok(false) => {}
            // The edit stays pending and is retried on the next line
            Err(e) => warn!("Draft autosave failed: {}", e),
        }

        if !line.starts_with('.') {
            self.content.push_str(&format!("<p>{}</p>", line));
            self.edited(now);
            return Ok(Flow::Continue);
        }

        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };

        match cmd {
            ".help" => show_help(),
            ".exit" | ".quit" => return Ok(self.finish(store)),
            ".title" => {
                self.title = arg.to_string();
                self.edited(now);
            }
            ".show" => {
                println!("{} {}", "Title:".bold(), self.title);
                println!("{}", self.content);
            }
            ".share" => {
                let id = store.share(&self.title, &self.content)?;
                // Shared text becomes the new baseline; nothing left to autosave
                self.autosave = DraftAutosave::for_store(store);
                println!("{} {}", "✓ Shared:".green().bold(), share_url(base_url, &id));
            }
            ".open" => {
                let opened = store.open(Some(arg))?;
                if let Some(notice) = &opened.notice {
                    eprintln!("{} {}", "Notice:".yellow().bold(), notice);
                }
                if let EditorState::Shared { id, record } = opened.state {
                    print_shared(&id, &record.title, &record.content, record.views);
                }
            }
            ".discard" => {
                self.title.clear();
                self.content.clear();
                self.autosave = DraftAutosave::for_store(store);
                store.clear_draft()?;
                println!("{}", "Draft discarded".dimmed());
            }
            _ => {
                println!("{} {}", "Unknown command:".yellow(), cmd);
                println!("Type .help for available commands");
            }
        }

        Ok(Flow::Continue)
    }
}

/// Interactive editor session state
pub struct EditorSession {
    store: Store,
    base_url: String,
    buffer: NoteBuffer,
    editor: rustyline::Editor<EditorHelper, rustyline::history::FileHistory>,
}

impl EditorSession {
    pub fn new(store: Store, base_url: String) -> Result<Self> {
        let buffer = NoteBuffer::restore(&store)?;

        let mut editor = rustyline::Editor::new()
            .context("Failed to initialize line editor")?;
        editor.set_helper(Some(EditorHelper));

        Ok(Self {
            store,
            base_url,
            buffer,
            editor,
        })
    }

    /// Run the read loop until `.exit` or end of input
    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let draft_saved = loop {
            let prompt = format!("{} ", "note>".green().bold());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim_end();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);

                    match self.buffer.handle_line(&self.store, &self.base_url, line, Instant::now()) {
                        Ok(Flow::Exit { draft_saved }) => break draft_saved,
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("{} {:#}", "Error:".red().bold(), e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    break matches!(self.buffer.finish(&self.store), Flow::Exit { draft_saved: true });
                }
                Err(err) => {
                    eprintln!("Error reading line: {}", err);
                    break matches!(self.buffer.finish(&self.store), Flow::Exit { draft_saved: true });
                }
            }
        };

        if draft_saved {
            println!("{}", "Draft saved. Bye!".green().bold());
        } else {
            println!("{}", "Bye! Unsaved edits were lost.".yellow().bold());
        }
        Ok(())
    }

    fn print_welcome(&self) {
        println!("{}", "sharenote editor".cyan().bold());
        println!("  Type to add paragraphs. {} lists commands.", ".help".bold());
        if !self.buffer.title.is_empty() || !self.buffer.content.is_empty() {
            println!("  {} Restored draft \"{}\"", "Note:".yellow().bold(), self.buffer.title);
        }
        println!();
    }
}

fn show_help() {
    println!("{}", "Commands:".bold());
    println!("  .title <text>   Set the note title");
    println!("  .show           Print the note");
    println!("  .share          Share the note and print its link");
    println!("  .open <link>    Open a shared note (counts a view)");
    println!("  .discard        Empty the note and its draft");
    println!("  .exit           Save the draft and leave");
}

fn print_shared(id: &DocId, title: &str, content: &str, views: u64) {
    println!("{} {} ({} views)", "Shared document".green().bold(), id, views);
    println!("{} {}", "Title:".bold(), title);
    println!("{}", content);
}
