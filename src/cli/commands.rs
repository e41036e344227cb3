use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::diff::{DiffDecision, DiffResolver};
use crate::models::{ConversationRecord, SessionKey};
use crate::rewind::{
    ChatClient, ClientTurn, ContextManager, FileReverter, RewindEngine, RewindOutcome,
    RewindReport, convert_messages,
};
use crate::store::SessionStore;
use crate::utils::get_data_dir;

const DIFF_DIR: &str = "diff";

#[derive(Parser)]
#[command(name = "ai-session-rewind")]
#[command(version = "0.1.0")]
#[command(about = "Browse, rewind and manage recorded AI conversation sessions", long_about = None)]
pub struct Cli {
    /// Override the session data directory (defaults to ~/.ai-sessions)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List recorded sessions across all projects, newest first
    List,
    /// Print one session's messages with their display ordinals
    Show { hash: String, file_name: String },
    /// Delete one session record
    Delete { hash: String, file_name: String },
    /// Truncate a session to the given message index (inclusive)
    Rewind { hash: String, file_name: String, index: usize },
    /// Resolve a pending diff proposal
    ResolveDiff {
        /// Proposal directory, must live under the diff root
        path: PathBuf,
        #[arg(value_parser = ["approve", "reject"])]
        decision: String,
        /// Approved file content (approve only)
        #[arg(long)]
        content: Option<String>,
    },
}

/// The CLI has no file-revert collaborator; only RewindOnly is reachable
/// from here, so this reverter existing at all is a type-level formality.
struct UnavailableReverter;

impl FileReverter for UnavailableReverter {
    fn revert_changes_since(&self, _record: &ConversationRecord, _index: usize) -> Result<()> {
        bail!("file revert is not available from the command line")
    }
}

/// No live chat client is attached to a CLI invocation; the derived history
/// is discarded after printing.
#[derive(Default)]
struct DetachedClient;

impl ChatClient for DetachedClient {
    fn set_history(&mut self, _history: Vec<ClientTurn>) {}
}

#[derive(Default)]
struct NoopContext;

impl ContextManager for NoopContext {
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match &cli.root {
        Some(root) => root.clone(),
        None => get_data_dir()?,
    };
    let settings = Settings::load(&data_dir);
    let store = SessionStore::new(&data_dir, settings);

    match &cli.command {
        Some(Commands::List) => list_sessions(&store),
        Some(Commands::Show { hash, file_name }) => {
            show_session(&store, &SessionKey::new(hash, file_name))?;
        }
        Some(Commands::Delete { hash, file_name }) => {
            store.delete(&SessionKey::new(hash, file_name))?;
            println!("Deleted {}/{}", hash, file_name);
        }
        Some(Commands::Rewind { hash, file_name, index }) => {
            rewind_session(&store, &SessionKey::new(hash, file_name), *index)?;
        }
        Some(Commands::ResolveDiff { path, decision, content }) => {
            let resolver = DiffResolver::new(data_dir.join(DIFF_DIR));
            let decision = match decision.as_str() {
                "approve" => DiffDecision::Approve,
                _ => DiffDecision::Reject,
            };
            resolver.resolve(path, decision, content.as_deref())?;
            println!("Diff {} recorded for {}", decision.status(), path.display());
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn list_sessions(store: &SessionStore) {
    let entries = store.list_recent();
    if entries.is_empty() {
        println!("No sessions recorded under {}", store.root().display());
        return;
    }

    for entry in entries {
        let when = entry
            .mtime
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        let project = entry
            .project_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Unknown project".to_string());
        println!(
            "{}  {:3} msgs  {}  {}  ({})",
            when, entry.message_count, entry.display_name, project, entry.key
        );
    }
}

fn show_session(store: &SessionStore, key: &SessionKey) -> Result<()> {
    let record = store.load(key)?;
    println!("Session {} ({} messages)", record.session_id, record.messages.len());

    let (ui_history, _) = convert_messages(&record.messages);
    for item in ui_history {
        println!("{:3}. [{}] {}", item.id, item.message_type, item.text);
    }
    Ok(())
}

fn rewind_session(store: &SessionStore, key: &SessionKey, index: usize) -> Result<()> {
    let record = store.load(key)?;

    let reverter = UnavailableReverter;
    let mut client = DetachedClient;
    let mut context = NoopContext;
    let mut engine = RewindEngine::new(store, &reverter, &mut client, &mut context);

    match engine.perform(key, &record, index, RewindOutcome::RewindOnly)? {
        RewindReport::Rewound { record, .. } => {
            println!(
                "Rewound {} to message {} ({} messages retained)",
                key,
                index,
                record.messages.len()
            );
        }
        // RewindOnly can only produce Rewound, but the report is a closed
        // set the compiler makes us acknowledge.
        RewindReport::Cancelled | RewindReport::Reverted => {}
    }
    Ok(())
}
