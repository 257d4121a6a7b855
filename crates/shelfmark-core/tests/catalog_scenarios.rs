use std::collections::HashSet;

use shelfmark_core::category::{KeywordStore, RemovePolicy};
use shelfmark_core::{
    load_tree, save_tree, BookId, CategoryId, CategoryTree, ClassificationEngine, Config,
    ErrorKind, Result, StatisticsCollector,
};
use tempfile::TempDir;

/// Fiction (book A=1) -> Sci-Fi (book B=2)
fn fiction_with_scifi() -> Result<(CategoryTree, CategoryId, CategoryId)> {
    let mut tree = CategoryTree::new();
    let fiction = tree.add_category("Fiction", "", None)?;
    let scifi = tree.add_category("Sci-Fi", "", Some(fiction))?;
    tree.add_book(fiction, 1)?;
    tree.add_book(scifi, 2)?;
    Ok((tree, fiction, scifi))
}

#[test]
fn fiction_stats_scenario() -> Result<()> {
    let (tree, _, _) = fiction_with_scifi()?;
    let fiction = tree.find_by_name("Fiction").unwrap().id();
    let stats = StatisticsCollector::new(&tree).category_stats(fiction)?;
    assert_eq!(stats.direct_book_count, 1);
    assert_eq!(stats.total_book_count, 2);
    assert_eq!(stats.subcategory_count, 1);
    Ok(())
}

#[test]
fn empty_tree_system_stats() {
    let tree = CategoryTree::new();
    let stats = StatisticsCollector::new(&tree).system_stats();
    assert_eq!(stats.total_categories, 0);
    assert_eq!(stats.utilization_percent, 0.0);
    assert!(stats.most_popular_category.is_none());
}

#[test]
fn dune_suggests_scifi_first() -> Result<()> {
    let (tree, _, scifi) = fiction_with_scifi()?;
    let keywords: KeywordStore = [("Sci-Fi".to_string(), vec!["dune".to_string()])]
        .into_iter()
        .collect();
    let engine = ClassificationEngine::new(keywords);

    let suggestions = engine.suggest(&tree, "Dune", "Frank Herbert", "");
    let first = suggestions.first().expect("a suggestion");
    assert_eq!(first.category.id(), scifi);
    assert!(first.score >= 1);
    Ok(())
}

#[test]
fn shared_book_counts_once() -> Result<()> {
    let (mut tree, fiction, scifi) = fiction_with_scifi()?;
    tree.add_book(fiction, 2)?;
    assert_eq!(tree.categories_of_book(2).len(), 2);
    let stats = StatisticsCollector::new(&tree).system_stats();
    assert_eq!(stats.total_books_categorized, 2);
    assert!(tree.get(scifi).unwrap().has_book(2));
    Ok(())
}

#[test]
fn failed_duplicate_leaves_state_unchanged() -> Result<()> {
    let (mut tree, fiction, _) = fiction_with_scifi()?;
    let before = tree.to_snapshot();
    let err = tree.add_book(fiction, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(tree.to_snapshot(), before);

    let err = tree.add_category("sci-fi", "", Some(fiction)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(tree.to_snapshot(), before);
    Ok(())
}

#[test]
fn rejected_removal_leaves_state_unchanged() -> Result<()> {
    let (mut tree, fiction, _) = fiction_with_scifi()?;
    let before = tree.to_snapshot();
    let err = tree.remove_category(fiction, RemovePolicy::Reject).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(tree.to_snapshot(), before);
    Ok(())
}

#[test]
fn externally_deleted_books_are_tolerated() -> Result<()> {
    let (mut tree, fiction, _) = fiction_with_scifi()?;
    tree.add_book(fiction, 99)?;

    let live: HashSet<BookId> = [1, 2].into_iter().collect();
    let stats = StatisticsCollector::new(&tree).with_catalog(&live).system_stats();
    assert_eq!(stats.total_books_categorized, 2);

    let affected = tree.forget_book(99);
    assert_eq!(affected, vec![fiction]);
    Ok(())
}

#[test]
fn persisted_catalog_survives_reload() -> Result<()> {
    let temp = TempDir::new()?;
    let config = Config::default();

    let mut tree = load_tree(temp.path(), &config)?;
    let scifi = tree.resolve("Sci-Fi")?;
    let cyberpunk = tree.add_category("Cyberpunk", "High tech, low life", Some(scifi))?;
    tree.add_book(cyberpunk, 501)?;
    save_tree(temp.path(), &tree)?;

    let reloaded = load_tree(temp.path(), &config)?;
    let node = reloaded.find_by_id(cyberpunk).expect("restored category");
    assert_eq!(node.path(), vec!["Fiction", "Sci-Fi", "Cyberpunk"]);
    assert!(node.has_book(501));

    let mut reloaded = reloaded;
    let next = reloaded.add_category("Solarpunk", "", Some(scifi))?;
    assert!(next.get() > cyberpunk.get());
    Ok(())
}
