use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use shelfmark_core::BookId;

#[derive(Parser)]
#[command(name = "shelfmark")]
#[command(about = "Category tree manager for a library catalog")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.shelfmark)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the catalog file (seeded with default categories unless --empty)
    Init {
        /// Start with no categories
        #[arg(long)]
        empty: bool,

        /// Overwrite an existing catalog file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the category tree
    Tree {
        /// Show book ids filed in each category
        #[arg(short, long)]
        books: bool,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// File books under categories
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Find categories whose name contains a term, and the books under them
    Search {
        /// Search term (case-insensitive)
        term: String,
    },

    /// Suggest categories for a book from its title, author and genre
    Suggest {
        /// Book title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Book author
        #[arg(short, long, default_value = "")]
        author: String,

        /// Book genre
        #[arg(short, long, default_value = "")]
        genre: String,

        /// Maximum suggestions to show (overrides classifier.top_k)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show catalog statistics
    Stats {
        /// Show statistics for one category (name, or #id)
        #[arg(short, long)]
        category: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category (a new root unless --parent is given)
    Add {
        /// Category name
        name: String,

        /// Parent category name, or #id
        #[arg(short, long)]
        parent: Option<String>,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Remove a category
    Remove {
        /// Category name, or #id
        category: String,

        /// Remove subcategories too, detaching their books
        #[arg(long)]
        cascade: bool,
    },

    /// Show details of a category
    Show {
        /// Category name, or #id
        category: String,
    },

    /// List all category names
    List,
}

#[derive(Subcommand)]
pub enum BookAction {
    /// File a book under a category
    File {
        /// Book id from the book catalog
        book: BookId,

        /// Category name, or #id
        category: String,
    },

    /// Remove a book from a category
    Unfile {
        /// Book id
        book: BookId,

        /// Category name, or #id
        category: String,
    },

    /// List the categories a book is filed under
    Where {
        /// Book id
        book: BookId,
    },

    /// List the books in a category
    List {
        /// Category name, or #id
        category: String,

        /// Only books filed directly, not in subcategories
        #[arg(long)]
        direct: bool,
    },

    /// Detach a deleted book from every category
    Forget {
        /// Book id
        book: BookId,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., catalog.remove_policy)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., classifier.top_k)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
