//! Builtin Category Definitions
//!
//! The default category forest seeded into a fresh catalog, together with the
//! keyword sets the classifier starts from.

/// Statically defined default category
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    /// Category name (unique among siblings)
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Seed keywords for classification
    pub keywords: &'static [&'static str],
    /// Subcategories, in display order
    pub children: &'static [BuiltinCategory],
}

const fn leaf(
    name: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
) -> BuiltinCategory {
    BuiltinCategory {
        name,
        description,
        keywords,
        children: &[],
    }
}

/// Default category forest
pub const DEFAULT_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "Fiction",
        description: "Fiction and imaginative narrative",
        keywords: &["novel", "story", "stories", "tale", "fiction"],
        children: &[
            leaf("Novel", "Long-form fiction", &["novel", "saga"]),
            leaf(
                "Short Stories",
                "Short fiction and collected tales",
                &["stories", "tales", "collection"],
            ),
            leaf(
                "Sci-Fi",
                "Science fiction and futurism",
                &[
                    "science fiction",
                    "sci-fi",
                    "space",
                    "robot",
                    "future",
                    "galaxy",
                    "alien",
                    "dune",
                ],
            ),
            leaf(
                "Fantasy",
                "Fantasy and imaginary worlds",
                &["fantasy", "dragon", "magic", "wizard", "kingdom"],
            ),
            leaf(
                "Mystery",
                "Mystery and suspense",
                &["mystery", "detective", "murder", "crime", "thriller"],
            ),
            leaf("Romance", "Romantic fiction", &["romance", "love", "heart"]),
            leaf(
                "Horror",
                "Horror and terror",
                &["horror", "ghost", "vampire", "haunted", "terror"],
            ),
        ],
    },
    BuiltinCategory {
        name: "Non-Fiction",
        description: "Works grounded in facts and knowledge",
        keywords: &["true", "guide", "essays"],
        children: &[
            leaf(
                "History",
                "History and past events",
                &["history", "war", "empire", "ancient", "century"],
            ),
            leaf(
                "Biography",
                "Biographies and autobiographies",
                &["biography", "autobiography", "memoir", "life"],
            ),
            leaf(
                "Science",
                "Popular science and academic texts",
                &["science", "physics", "universe", "evolution"],
            ),
            leaf(
                "Technology",
                "Technology and innovation",
                &["technology", "computer", "software", "programming", "internet"],
            ),
            leaf(
                "Philosophy",
                "Philosophy and thought",
                &["philosophy", "ethics", "mind", "meditations"],
            ),
            leaf("Art", "Art and culture", &["art", "painting", "music", "design"]),
            leaf(
                "Sports",
                "Sports and physical activity",
                &["sport", "sports", "football", "training"],
            ),
        ],
    },
    BuiltinCategory {
        name: "Education",
        description: "Educational and academic material",
        keywords: &["textbook", "course", "lessons", "introduction"],
        children: &[
            leaf(
                "Mathematics",
                "Mathematics and algebra",
                &["mathematics", "math", "algebra", "calculus", "geometry"],
            ),
            leaf(
                "Language",
                "Grammar, literature and linguistics",
                &["grammar", "linguistics", "writing"],
            ),
            leaf(
                "Natural Sciences",
                "Biology, chemistry, physics",
                &["biology", "chemistry", "physics"],
            ),
            leaf(
                "Social Sciences",
                "Sociology, anthropology, politics",
                &["sociology", "anthropology", "politics", "economics"],
            ),
            leaf(
                "Languages",
                "Foreign language learning",
                &["spanish", "french", "english", "german", "vocabulary"],
            ),
        ],
    },
    BuiltinCategory {
        name: "Reference",
        description: "Reference and lookup material",
        keywords: &["reference", "handbook"],
        children: &[
            leaf(
                "Dictionaries",
                "Monolingual and bilingual dictionaries",
                &["dictionary", "thesaurus"],
            ),
            leaf(
                "Encyclopedias",
                "General and specialised encyclopedias",
                &["encyclopedia", "encyclopaedia"],
            ),
            leaf("Atlases", "Geographic atlases and maps", &["atlas", "maps", "geography"]),
            leaf("Manuals", "Technical manuals and guides", &["manual", "guide", "handbook"]),
        ],
    },
    BuiltinCategory {
        name: "Children's",
        description: "Books for children and young readers",
        keywords: &["children", "kids"],
        children: &[
            leaf(
                "Children's Stories",
                "Stories for young children",
                &["bedtime", "fairy", "picture"],
            ),
            leaf("Young Adult", "Books for teenagers", &["teen", "young adult", "coming of age"]),
            leaf("Illustrated", "Illustrated books", &["illustrated", "pictures", "comic"]),
            leaf(
                "Early Learning",
                "Educational material for children",
                &["abc", "alphabet", "counting"],
            ),
        ],
    },
];

/// Walk the builtin forest in DFS pre-order.
pub fn walk_builtin(mut visit: impl FnMut(&'static BuiltinCategory)) {
    fn go(cat: &'static BuiltinCategory, visit: &mut dyn FnMut(&'static BuiltinCategory)) {
        visit(cat);
        for child in cat.children {
            go(child, visit);
        }
    }
    for cat in DEFAULT_CATEGORIES {
        go(cat, &mut visit);
    }
}
