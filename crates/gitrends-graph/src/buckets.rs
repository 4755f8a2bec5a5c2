//! Treemap inputs with overflow bucketing
//!
//! Turns flat records into the two-level trees the treemap views draw:
//! module -> author for the commit spread, category leaves for the main
//! developer histogram, module -> file for the module breakdown.

use gitrends_types::{CommitSpreadEntry, ModuleEntry};
use tracing::debug;

use crate::colors::{CategoryRanking, OTHERS};
use crate::error::TreeError;
use crate::tree::{PathTree, PathTreeBuilder, Payload, SiblingOrder};

/// A tree together with the ranking its leaves were bucketed by
#[derive(Debug, Clone)]
pub struct BucketedTree {
    pub tree: PathTree,
    pub ranking: CategoryRanking,
}

/// Module -> author tree of revision counts
///
/// Modules whose total is below `min_module_commits` are left out. Authors
/// are ranked by the number of modules they appear in; authors past
/// `max_authors` are merged into one "Others" leaf per module.
pub fn commit_spread(
    entries: &[CommitSpreadEntry],
    max_authors: usize,
    min_module_commits: u64,
) -> Result<BucketedTree, TreeError> {
    let modules = group_by_first_seen(entries, |e| e.module_name.as_str());
    let kept: Vec<(&str, Vec<&CommitSpreadEntry>)> = modules
        .into_iter()
        .filter(|(_, rows)| rows.iter().map(|r| r.num_revisions).sum::<u64>() >= min_module_commits)
        .collect();

    let ranking = CategoryRanking::count(
        kept.iter()
            .flat_map(|(_, rows)| rows.iter().map(|r| r.author.as_str())),
        max_authors,
    );

    let mut builder = PathTreeBuilder::new();
    for (module, rows) in &kept {
        let buckets = sum_by_first_seen(
            rows.iter()
                .map(|r| (ranking.bucket_of(&r.author), r.num_revisions as f64)),
        );
        for (bucket, revisions) in buckets {
            builder.insert_segments(&[*module, bucket], revisions, Payload::new())?;
        }
    }

    let mut tree = builder.build();
    tree.sort_siblings(SiblingOrder::Treemap);
    debug!(modules = kept.len(), authors = ranking.retained().len(), "commit spread bucketed");
    Ok(BucketedTree { tree, ranking })
}

/// One leaf per retained category plus an "Others" leaf for the overflow
///
/// A zero "Others" total gets no leaf; the ranking still carries its slot.
pub fn histogram<I, S>(observations: I, max_categories: usize) -> Result<BucketedTree, TreeError>
where
    I: IntoIterator<Item = (S, f64)>,
    S: AsRef<str>,
{
    let ranking = CategoryRanking::rank(observations, max_categories);

    let mut builder = PathTreeBuilder::new();
    for category in ranking.retained() {
        builder.insert_segments(&[category.name.as_str()], category.count, Payload::new())?;
    }
    if ranking.others() > 0.0 {
        builder.insert_segments(&[OTHERS], ranking.others(), Payload::new())?;
    }

    let mut tree = builder.build();
    tree.sort_siblings(SiblingOrder::Treemap);
    Ok(BucketedTree { tree, ranking })
}

/// Which file metric sizes the module breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleMetric {
    #[default]
    CodeLines,
    Complexity,
}

impl ModuleMetric {
    pub fn display_name(&self) -> &'static str {
        match self {
            ModuleMetric::CodeLines => "Lines of code",
            ModuleMetric::Complexity => "Complexity",
        }
    }

    pub fn all() -> &'static [ModuleMetric] {
        &[ModuleMetric::CodeLines, ModuleMetric::Complexity]
    }
}

/// Module -> file tree sized by the chosen metric
pub fn module_breakdown(modules: &[ModuleEntry], metric: ModuleMetric) -> Result<PathTree, TreeError> {
    let mut builder = PathTreeBuilder::new();
    for module in modules {
        for file in &module.files {
            let value = match metric {
                ModuleMetric::CodeLines => file.num_code_lines,
                ModuleMetric::Complexity => file.total_indent_levels,
            } as f64;
            builder.insert_segments(&[module.name.as_str(), file.name.as_str()], value, Payload::new())?;
        }
    }
    let mut tree = builder.build();
    tree.sort_siblings(SiblingOrder::Treemap);
    Ok(tree)
}

/// Rank the values of a payload tag over all leaves
pub fn rank_leaf_tag(tree: &PathTree, tag: &str, max_categories: usize) -> CategoryRanking {
    CategoryRanking::count(
        tree.leaves()
            .into_iter()
            .filter_map(|leaf| tree.node(leaf).payload.tag(tag)),
        max_categories,
    )
}

fn group_by_first_seen<'a, T, F>(items: &'a [T], key: F) -> Vec<(&'a str, Vec<&'a T>)>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut groups: Vec<(&'a str, Vec<&'a T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(name, _)| *name == k) {
            Some((_, rows)) => rows.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}

fn sum_by_first_seen<'a>(values: impl Iterator<Item = (&'a str, f64)>) -> Vec<(&'a str, f64)> {
    let mut sums: Vec<(&'a str, f64)> = Vec::new();
    for (k, v) in values {
        match sums.iter_mut().find(|(name, _)| *name == k) {
            Some((_, total)) => *total += v,
            None => sums.push((k, v)),
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TAG_MAIN_DEVELOPER;
    use gitrends_types::ModuleFile;
    use pretty_assertions::assert_eq;

    fn spread(module: &str, author: &str, revisions: u64) -> CommitSpreadEntry {
        CommitSpreadEntry {
            module_name: module.to_string(),
            author: author.to_string(),
            num_revisions: revisions,
        }
    }

    fn child_names(tree: &PathTree, path: &str) -> Vec<String> {
        let id = tree.find(path).unwrap();
        tree.children(id)
            .iter()
            .map(|c| tree.node(*c).name.clone())
            .collect()
    }

    #[test]
    fn test_commit_spread_drops_small_modules() {
        let entries = vec![
            spread("core", "ann", 8),
            spread("core", "bob", 4),
            spread("docs", "ann", 3),
        ];
        let result = commit_spread(&entries, 13, 10).unwrap();
        assert_eq!(child_names(&result.tree, ""), vec!["core"]);
        assert_eq!(result.tree.node(result.tree.root()).value, 12.0);
    }

    #[test]
    fn test_commit_spread_folds_rare_authors() {
        let entries = vec![
            spread("src/core", "ann", 10),
            spread("src/core", "bob", 4),
            spread("src/core", "cid", 3),
            spread("src/ui", "ann", 10),
            spread("src/ui", "dan", 2),
        ];
        let result = commit_spread(&entries, 1, 0).unwrap();
        let tree = &result.tree;

        assert_eq!(
            result.ranking.retained().iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["ann"]
        );
        // Module names keep their slashes as a single level
        assert_eq!(child_names(tree, "")[0], "src/core");
        let others = tree.find_leaf("src/core/Others").unwrap();
        assert_eq!(tree.node(others).value, 7.0);
        assert_eq!(tree.node(tree.find_leaf("src/ui/Others").unwrap()).value, 2.0);
    }

    #[test]
    fn test_histogram_overflow() {
        let observations = vec![("a", 5.0), ("b", 4.0), ("c", 3.0), ("d", 1.0), ("e", 1.0)];
        let result = histogram(observations, 3).unwrap();
        let names = child_names(&result.tree, "");
        assert_eq!(names, vec!["a", "b", "c", "Others"]);
        let others = result.tree.find_leaf(OTHERS).unwrap();
        assert_eq!(result.tree.node(others).value, 2.0);
    }

    #[test]
    fn test_histogram_without_overflow_has_no_others_leaf() {
        let result = histogram(vec![("a", 1.0), ("b", 1.0)], 5).unwrap();
        assert_eq!(result.tree.leaves().len(), 2);
        assert_eq!(result.ranking.entries().len(), 3);
    }

    #[test]
    fn test_module_breakdown_metric() {
        let modules = vec![ModuleEntry {
            name: "core".to_string(),
            files: vec![
                ModuleFile {
                    name: "src/core/a.rs".to_string(),
                    num_code_lines: 100,
                    total_indent_levels: 7,
                },
                ModuleFile {
                    name: "src/core/b.rs".to_string(),
                    num_code_lines: 50,
                    total_indent_levels: 30,
                },
            ],
        }];

        let lines = module_breakdown(&modules, ModuleMetric::CodeLines).unwrap();
        assert_eq!(lines.node(lines.root()).value, 150.0);
        assert_eq!(child_names(&lines, "core"), vec!["src/core/a.rs", "src/core/b.rs"]);

        let complexity = module_breakdown(&modules, ModuleMetric::Complexity).unwrap();
        assert_eq!(child_names(&complexity, "core"), vec!["src/core/b.rs", "src/core/a.rs"]);
    }

    #[test]
    fn test_rank_leaf_tag() {
        let mut builder = PathTreeBuilder::new();
        for (path, dev) in [("a", "Ann"), ("b", "Bob"), ("c", "Bob")] {
            builder
                .insert(path, 1.0, Payload::new().with_tag(TAG_MAIN_DEVELOPER, dev))
                .unwrap();
        }
        let tree = builder.build();
        let ranking = rank_leaf_tag(&tree, TAG_MAIN_DEVELOPER, 9);
        assert_eq!(ranking.retained()[0].name, "Bob");
    }
}
