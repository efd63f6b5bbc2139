use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "fiszki", version, about = "Fiszki flashcard CLI")]
pub struct Cli {
    /// Store file path (defaults to the app data dir)
    #[arg(long)]
    pub store_path: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Folder operations
    #[command(subcommand)]
    Folder(FolderCmd),
    /// Card operations
    #[command(subcommand)]
    Card(CardCmd),
    /// List cards due for study
    Due(DueCmd),
    /// Interactive study loop
    Study(StudyCmd),
    /// Spread today's due cards evenly across the next N days
    Spread(SpreadCmd),
}

#[derive(Debug, Subcommand, Clone)]
pub enum FolderCmd {
    Add { name: String },
    List,
    Rm { folder: String },
}

#[derive(Debug, Subcommand, Clone)]
pub enum CardCmd {
    Add(CardAdd),
    List {
        #[arg(long)]
        folder: Option<String>,
    },
    Rm {
        card_id: String,
    },
    Edit(CardEdit),
}

#[derive(Debug, Args, Clone)]
pub struct CardAdd {
    #[arg(long)]
    pub folder: String,
    #[arg(long)]
    pub front: String,
    #[arg(long)]
    pub back: String,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CardEdit {
    pub card_id: String,
    #[arg(long)]
    pub front: Option<String>,
    #[arg(long)]
    pub back: Option<String>,
    #[arg(long = "add-tag")]
    pub add_tags: Vec<String>,
    #[arg(long = "rm-tag")]
    pub rm_tags: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct DueCmd {
    /// Exact day bucket (YYYY-MM-DD); default is everything due today
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub folder: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct StudyCmd {
    #[arg(long)]
    pub folder: Option<String>,
    /// Study the cards due exactly on this day (YYYY-MM-DD) instead of today's bucket
    #[arg(long)]
    pub date: Option<String>,
    /// Show the back and type the front
    #[arg(long)]
    pub reverse: bool,
    /// Serve the queue in fixed-size sets, unseen cards first
    #[arg(long)]
    pub sets: bool,
    /// Shuffle seed; the fixed default keeps today's order stable
    #[arg(long)]
    pub seed: Option<i64>,
}

#[derive(Debug, Args, Clone)]
pub struct SpreadCmd {
    /// Number of future days to spread the due cohort over
    #[arg(long)]
    pub days: u32,
    #[arg(long)]
    pub folder: Option<String>,
}
