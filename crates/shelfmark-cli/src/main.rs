use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use shelfmark_core::category::{CategoryTree, RemovePolicy, StatisticsCollector};
use shelfmark_core::{load_tree, save_tree, BookId, CatalogFile, Config, Result, ShelfmarkError};

mod args;
use args::{BookAction, CategoryAction, Cli, Commands, ConfigAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let base_dir = match resolve_base_dir(cli.base_dir) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(base_dir = %base_dir.display(), "resolved base directory");

    let result = match cli.command {
        Some(Commands::Init { empty, force }) => handle_init(&base_dir, empty, force),
        Some(Commands::Tree { books }) => handle_tree(&base_dir, books),
        Some(Commands::Category { action }) => handle_category(action, &base_dir),
        Some(Commands::Book { action }) => handle_book(action, &base_dir),
        Some(Commands::Search { term }) => handle_search(&base_dir, &term),
        Some(Commands::Suggest {
            title,
            author,
            genre,
            limit,
        }) => handle_suggest(&base_dir, &title, &author, &genre, limit),
        Some(Commands::Stats { category, json }) => {
            handle_stats(&base_dir, category.as_deref(), json)
        }
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SHELFMARK_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "shelfmark", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(base) = cli_base {
        return Ok(base);
    }

    if let Ok(base) = std::env::var("SHELFMARK_BASE") {
        return Ok(PathBuf::from(base));
    }

    dirs::home_dir()
        .map(|h| h.join(".shelfmark"))
        .ok_or(ShelfmarkError::HomeNotFound)
}

/// Load config and tree together
fn open_catalog(base_dir: &Path) -> Result<(Config, CategoryTree)> {
    let config = Config::load(base_dir)?;
    let tree = load_tree(base_dir, &config)?;
    Ok((config, tree))
}

fn handle_init(base_dir: &Path, empty: bool, force: bool) -> Result<()> {
    let path = CatalogFile::path(base_dir);
    if path.exists() && !force {
        println!(
            "{} {} (use --force to overwrite)",
            "Already initialized:".yellow(),
            path.display()
        );
        return Ok(());
    }

    let tree = if empty {
        CategoryTree::new()
    } else {
        CategoryTree::with_defaults()
    };
    let path = save_tree(base_dir, &tree)?;
    Config::init(base_dir)?;

    println!("{} {}", "Initialized:".green(), path.display());
    println!("  Categories: {}", tree.len());
    Ok(())
}

fn handle_tree(base_dir: &Path, books: bool) -> Result<()> {
    let (_, tree) = open_catalog(base_dir)?;
    if tree.is_empty() {
        println!("No categories yet.");
        println!();
        println!("Create one with: shelfmark category add <name>");
        return Ok(());
    }

    println!();
    print!("{}", tree.render(books));
    println!();
    Ok(())
}

fn handle_category(action: CategoryAction, base_dir: &Path) -> Result<()> {
    let (config, mut tree) = open_catalog(base_dir)?;

    match action {
        CategoryAction::Add {
            name,
            parent,
            description,
        } => {
            let parent_id = parent.as_deref().map(|p| tree.resolve(p)).transpose()?;
            let id = tree.add_category(&name, &description, parent_id)?;
            save_tree(base_dir, &tree)?;

            let path = tree.path(id)?.join(" -> ");
            println!("{} {} {}", "Created:".green(), id.to_string().dimmed(), path);
        }
        CategoryAction::Remove { category, cascade } => {
            let id = tree.resolve(&category)?;
            let policy = if cascade {
                RemovePolicy::Cascade
            } else {
                config.catalog.remove_policy
            };
            let name = tree.require(id)?.name().to_string();
            let report = tree.remove_category(id, policy)?;
            save_tree(base_dir, &tree)?;

            println!(
                "{} '{}' ({} categories)",
                "Removed:".green(),
                name,
                report.removed.len()
            );
            if !report.detached_books.is_empty() {
                println!("  Detached books: {}", join_ids(&report.detached_books));
            }
            if !report.orphaned_books.is_empty() {
                println!(
                    "  {} {}",
                    "No longer categorized:".yellow(),
                    join_ids(&report.orphaned_books)
                );
            }
        }
        CategoryAction::Show { category } => {
            let id = tree.resolve(&category)?;
            let stats = StatisticsCollector::new(&tree).category_stats(id)?;

            println!();
            println!("Category: {} {}", stats.name.cyan().bold(), stats.id.to_string().dimmed());
            println!("Path: {}", stats.path.join(" -> "));
            if !stats.description.is_empty() {
                println!("Description: {}", stats.description);
            }
            println!(
                "Books: {} direct, {} total",
                stats.direct_book_count, stats.total_book_count
            );
            if stats.subcategory_count > 0 {
                println!("Subcategories ({}):", stats.subcategory_count);
                for name in &stats.subcategory_names {
                    println!("  - {}", name);
                }
            }
            println!();
        }
        CategoryAction::List => {
            for name in tree.category_names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn handle_book(action: BookAction, base_dir: &Path) -> Result<()> {
    let (_, mut tree) = open_catalog(base_dir)?;

    match action {
        BookAction::File { book, category } => {
            let id = tree.resolve(&category)?;
            tree.add_book(id, book)?;
            save_tree(base_dir, &tree)?;
            println!(
                "{} book {} -> {}",
                "Filed:".green(),
                book,
                tree.path(id)?.join(" -> ")
            );
        }
        BookAction::Unfile { book, category } => {
            let id = tree.resolve(&category)?;
            tree.remove_book(id, book)?;
            save_tree(base_dir, &tree)?;
            println!(
                "{} book {} from '{}'",
                "Unfiled:".green(),
                book,
                tree.require(id)?.name()
            );
        }
        BookAction::Where { book } => {
            let categories = tree.categories_of_book(book);
            if categories.is_empty() {
                println!("Book {} is not filed under any category.", book);
                return Ok(());
            }
            println!("Book {} is filed under {} categories:", book, categories.len());
            for node in categories {
                println!("  {}", node.path().join(" -> ").cyan());
            }
        }
        BookAction::List { category, direct } => {
            let id = tree.resolve(&category)?;
            let books = tree.books_in(id, !direct)?;
            let name = tree.require(id)?.name().to_string();
            if books.is_empty() {
                println!("No books in '{}'.", name);
                return Ok(());
            }
            println!("{} books in '{}':", books.len(), name.cyan());
            println!("  {}", join_ids(&books));
        }
        BookAction::Forget { book } => {
            let affected = tree.forget_book(book);
            if affected.is_empty() {
                println!("Book {} was not filed anywhere.", book);
                return Ok(());
            }
            save_tree(base_dir, &tree)?;
            println!(
                "{} book {} from {} categories",
                "Forgot:".green(),
                book,
                affected.len()
            );
        }
    }

    Ok(())
}

fn handle_search(base_dir: &Path, term: &str) -> Result<()> {
    let (_, tree) = open_catalog(base_dir)?;
    let hit = tree.search(term);

    if hit.categories.is_empty() {
        println!("No categories match \"{}\".", term);
        return Ok(());
    }

    println!();
    println!(
        "Found {} books in {} categories matching \"{}\":",
        hit.books.len(),
        hit.categories.len(),
        term
    );
    println!();
    for node in &hit.categories {
        println!(
            "  {} ({})",
            node.path().join(" -> ").cyan(),
            book_count(node.total_book_count())
        );
    }
    if !hit.books.is_empty() {
        println!();
        println!("  Books: {}", join_ids(&hit.books));
    }
    println!();
    Ok(())
}

fn handle_suggest(
    base_dir: &Path,
    title: &str,
    author: &str,
    genre: &str,
    limit: Option<usize>,
) -> Result<()> {
    let (config, tree) = open_catalog(base_dir)?;
    let mut engine = config.classification_engine();
    if let Some(limit) = limit {
        engine = engine.with_top_k(limit);
    }

    let suggestions = engine.suggest(&tree, title, author, genre);
    if suggestions.is_empty() {
        println!("No category suggestions for this book.");
        return Ok(());
    }

    println!();
    println!("Suggested categories:");
    println!();
    for (rank, suggestion) in suggestions.iter().enumerate() {
        println!(
            "  {}. {} {} (score {})",
            rank + 1,
            suggestion.category.path().join(" -> ").cyan().bold(),
            suggestion.category.id().to_string().dimmed(),
            suggestion.score
        );
    }
    println!();
    Ok(())
}

fn handle_stats(base_dir: &Path, category: Option<&str>, json: bool) -> Result<()> {
    let (_, tree) = open_catalog(base_dir)?;
    let collector = StatisticsCollector::new(&tree);

    if let Some(category) = category {
        let stats = collector.category_stats(tree.resolve(category)?)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!();
            println!("Category: {}", stats.path.join(" -> ").cyan().bold());
            println!("  Direct books: {}", stats.direct_book_count);
            println!("  Total books: {}", stats.total_book_count);
            println!("  Subcategories: {}", stats.subcategory_count);
            println!();
        }
        return Ok(());
    }

    let stats = collector.system_stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("Catalog statistics:");
    println!();
    println!("  Categories: {}", stats.total_categories);
    println!("  With books: {}", stats.categories_with_books);
    println!("  Empty: {}", stats.categories_empty);
    println!("  Utilization: {:.2}%", stats.utilization_percent);
    println!("  Books categorized: {}", stats.total_books_categorized);
    match &stats.most_popular_category {
        Some(popular) => println!(
            "  Most popular: {} ({})",
            popular.name.cyan(),
            book_count(popular.book_count)
        ),
        None => println!("  Most popular: -"),
    }
    println!();
    Ok(())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(ShelfmarkError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

fn book_count(n: usize) -> String {
    if n == 1 {
        "1 book".to_string()
    } else {
        format!("{} books", n)
    }
}

fn join_ids(ids: &[BookId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
