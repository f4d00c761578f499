//! Category tree construction.
//!
//! Turns the flat category list returned by the catalog API into a forest of
//! [`CategoryNode`]s with every sibling group stably sorted. The builder is
//! total: dangling parent references become roots, duplicate ids keep the
//! first record as the parent target, and parent cycles are cut so that
//! every input record ends up in the output exactly once.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use crate::features::categories::dtos::{CategoryNode, CategorySortBy, SortDirection};
use crate::features::categories::models::CategoryRecord;

/// Default sibling order: ascending `sort_order`
pub fn by_sort_order(a: &CategoryRecord, b: &CategoryRecord) -> Ordering {
    a.sort_order.cmp(&b.sort_order)
}

/// Build the forest with the default sibling order
pub fn build_tree(records: &[CategoryRecord]) -> Vec<CategoryNode> {
    build_tree_by(records, by_sort_order)
}

/// Build the forest, ordering every sibling group (roots included) with `compare`
///
/// The sort is stable: siblings that compare equal keep their input order.
pub fn build_tree_by<F>(records: &[CategoryRecord], mut compare: F) -> Vec<CategoryNode>
where
    F: FnMut(&CategoryRecord, &CategoryRecord) -> Ordering,
{
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        index.entry(record.id).or_insert(pos);
    }

    let mut parent_of: Vec<Option<usize>> = vec![None; records.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (pos, record) in records.iter().enumerate() {
        match record.parent_id.and_then(|id| index.get(&id).copied()) {
            Some(parent) if parent != pos => {
                parent_of[pos] = Some(parent);
                children[parent].push(pos);
            }
            _ => roots.push(pos),
        }
    }

    // Anything not reachable from a root hangs off a parent cycle
    let mut reached = vec![false; records.len()];
    mark_reachable(&roots, &children, &mut reached);
    for pos in 0..records.len() {
        if reached[pos] {
            continue;
        }
        let head = cycle_head(pos, &parent_of);
        if let Some(parent) = parent_of[head].take() {
            children[parent].retain(|&child| child != head);
        }
        roots.push(head);
        mark_reachable(&[head], &children, &mut reached);
    }

    sort_positions(&mut roots, records, &mut compare);
    for siblings in children.iter_mut() {
        sort_positions(siblings, records, &mut compare);
    }

    roots
        .iter()
        .map(|&pos| materialize(pos, records, &children))
        .collect()
}

/// Total number of nodes in a forest
pub fn count_nodes(forest: &[CategoryNode]) -> usize {
    forest
        .iter()
        .map(|node| 1 + count_nodes(&node.children))
        .sum()
}

/// Depth-first lookup by slug
pub fn find_by_slug<'a>(forest: &'a [CategoryNode], slug: &str) -> Option<&'a CategoryNode> {
    forest.iter().find_map(|node| {
        if node.category.slug == slug {
            Some(node)
        } else {
            find_by_slug(&node.children, slug)
        }
    })
}

/// Records whose name or slug contains `term`, ignoring case and accents
///
/// Input order is preserved.
pub fn search(records: &[CategoryRecord], term: &str) -> Vec<CategoryRecord> {
    let needle = fold_key(term.trim());
    records
        .iter()
        .filter(|r| fold_key(&r.name).contains(&needle) || fold_key(&r.slug).contains(&needle))
        .cloned()
        .collect()
}

/// Comparator for the admin sort controls
pub fn comparator(
    sort_by: CategorySortBy,
    direction: SortDirection,
) -> impl Fn(&CategoryRecord, &CategoryRecord) -> Ordering {
    move |a, b| {
        let ordering = match sort_by {
            CategorySortBy::Name => compare_names(&a.name, &b.name),
            CategorySortBy::SortOrder => by_sort_order(a, b),
            CategorySortBy::IsActive => a.is_active.cmp(&b.is_active),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

// =============================================================================
// ACTIVE FILTERING
// =============================================================================

/// What happens to the descendants of an inactive category in public views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InactivePolicy {
    /// Drop inactive records before building; their children surface as roots
    #[default]
    Promote,
    /// Drop inactive nodes together with their whole subtree
    Prune,
}

impl FromStr for InactivePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "promote" => Ok(Self::Promote),
            "prune" => Ok(Self::Prune),
            other => Err(format!(
                "unknown inactive policy '{}', expected 'promote' or 'prune'",
                other
            )),
        }
    }
}

/// Forest of active categories only, in default sibling order
pub fn build_active_tree(records: &[CategoryRecord], policy: InactivePolicy) -> Vec<CategoryNode> {
    match policy {
        InactivePolicy::Promote => {
            let active: Vec<CategoryRecord> =
                records.iter().filter(|r| r.is_active).cloned().collect();
            build_tree(&active)
        }
        InactivePolicy::Prune => {
            let mut forest = build_tree(records);
            prune_inactive(&mut forest);
            forest
        }
    }
}

fn prune_inactive(nodes: &mut Vec<CategoryNode>) {
    nodes.retain(|node| node.category.is_active);
    for node in nodes.iter_mut() {
        prune_inactive(&mut node.children);
    }
}

// =============================================================================
// INTERNALS
// =============================================================================

fn mark_reachable(from: &[usize], children: &[Vec<usize>], reached: &mut [bool]) {
    let mut stack = from.to_vec();
    while let Some(pos) = stack.pop() {
        if std::mem::replace(&mut reached[pos], true) {
            continue;
        }
        stack.extend(&children[pos]);
    }
}

/// Walk up from `start` to the parent cycle it hangs off and return the
/// cycle member that comes first in the input.
fn cycle_head(start: usize, parent_of: &[Option<usize>]) -> usize {
    let mut seen = HashSet::new();
    let mut current = start;
    while seen.insert(current) {
        match parent_of[current] {
            Some(parent) => current = parent,
            None => return current,
        }
    }

    let mut head = current;
    let mut walker = parent_of[current];
    while let Some(pos) = walker {
        if pos == current {
            break;
        }
        head = head.min(pos);
        walker = parent_of[pos];
    }
    head
}

fn sort_positions<F>(positions: &mut [usize], records: &[CategoryRecord], compare: &mut F)
where
    F: FnMut(&CategoryRecord, &CategoryRecord) -> Ordering,
{
    positions.sort_by(|&a, &b| compare(&records[a], &records[b]));
}

fn materialize(pos: usize, records: &[CategoryRecord], children: &[Vec<usize>]) -> CategoryNode {
    let mut category = records[pos].clone();
    category.strip_children();
    CategoryNode {
        category,
        children: children[pos]
            .iter()
            .map(|&child| materialize(child, records, children))
            .collect(),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    fold_key(a)
        .cmp(&fold_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Lowercase and strip Vietnamese/Latin diacritics so "Giày" sorts and
/// matches like "giay".
fn fold_key(s: &str) -> String {
    s.to_lowercase().chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ' | 'ẩ'
        | 'ẫ' | 'ậ' | 'ä' | 'å' => 'a',
        'đ' => 'd',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' | 'ë' => 'e',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ' | 'ở'
        | 'ỡ' | 'ợ' | 'ö' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' | 'û' | 'ü' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' | 'ÿ' => 'y',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::category;
    use fake::faker::lorem::en::Word;
    use fake::Fake;
    use std::collections::HashSet;

    fn ids(nodes: &[CategoryNode]) -> Vec<i64> {
        nodes.iter().map(|n| n.category.id).collect()
    }

    fn collect_ids(nodes: &[CategoryNode], out: &mut Vec<i64>) {
        for node in nodes {
            out.push(node.category.id);
            collect_ids(&node.children, out);
        }
    }

    /// Every child's parent_id must point at the node it sits under
    fn assert_parent_fidelity(nodes: &[CategoryNode]) {
        for node in nodes {
            for child in &node.children {
                assert_eq!(child.category.parent_id, Some(node.category.id));
            }
            assert_parent_fidelity(&node.children);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(&[]).is_empty());
    }

    #[test]
    fn test_three_levels() {
        let records = vec![
            category(1, "A", None, 0),
            category(2, "B", Some(1), 0),
            category(3, "C", Some(2), 0),
        ];

        let forest = build_tree(&records);

        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(ids(&forest[0].children), vec![2]);
        assert_eq!(ids(&forest[0].children[0].children), vec![3]);
        assert!(forest[0].children[0].children[0].children.is_empty());
    }

    #[test]
    fn test_all_orphans_sorted_by_sort_order() {
        let records = vec![category(1, "A", None, 2), category(2, "B", Some(99), 1)];

        let forest = build_tree(&records);

        assert_eq!(ids(&forest), vec![2, 1]);
        assert!(forest.iter().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_default_sort_orders_siblings() {
        let records = vec![
            category(10, "root", None, 0),
            category(11, "c", Some(10), 3),
            category(12, "a", Some(10), 1),
            category(13, "b", Some(10), 2),
        ];

        let forest = build_tree(&records);
        let sort_orders: Vec<i32> = forest[0]
            .children
            .iter()
            .map(|n| n.category.sort_order)
            .collect();

        assert_eq!(sort_orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_sort_order_keeps_input_order() {
        let records = vec![
            category(5, "e", None, 1),
            category(3, "c", None, 0),
            category(4, "d", None, 1),
            category(1, "a", None, 1),
        ];

        assert_eq!(ids(&build_tree(&records)), vec![3, 5, 4, 1]);
    }

    #[test]
    fn test_custom_comparator_name_descending() {
        let records = vec![
            category(1, "Áo", None, 0),
            category(2, "Giày", None, 0),
            category(3, "Quần", None, 0),
        ];

        let forest = build_tree_by(&records, comparator(CategorySortBy::Name, SortDirection::Desc));
        let names: Vec<&str> = forest.iter().map(|n| n.category.name.as_str()).collect();

        assert_eq!(names, vec!["Quần", "Giày", "Áo"]);
    }

    #[test]
    fn test_custom_comparator_applies_at_every_depth() {
        let records = vec![
            category(1, "Root", None, 0),
            category(2, "b", Some(1), 0),
            category(3, "a", Some(1), 1),
            category(4, "z", Some(3), 0),
            category(5, "y", Some(3), 1),
        ];

        let forest = build_tree_by(&records, |a, b| a.name.cmp(&b.name));

        assert_eq!(ids(&forest[0].children), vec![3, 2]);
        assert_eq!(ids(&forest[0].children[0].children), vec![5, 4]);
    }

    #[test]
    fn test_sorting_is_applied_at_depth_two() {
        let records = vec![
            category(1, "root-b", None, 2),
            category(2, "root-a", None, 1),
            category(3, "mid", Some(1), 0),
            category(4, "leaf-3", Some(3), 3),
            category(5, "leaf-1", Some(3), 1),
            category(6, "leaf-2", Some(3), 2),
        ];

        let forest = build_tree(&records);

        assert_eq!(ids(&forest), vec![2, 1]);
        let mid = &forest[1].children[0];
        assert_eq!(mid.category.id, 3);
        assert_eq!(ids(&mid.children), vec![5, 6, 4]);
    }

    #[test]
    fn test_descending_sort_order() {
        let records = vec![
            category(1, "a", None, 1),
            category(2, "b", None, 3),
            category(3, "c", None, 2),
        ];

        let forest = build_tree_by(
            &records,
            comparator(CategorySortBy::SortOrder, SortDirection::Desc),
        );

        assert_eq!(ids(&forest), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_is_active() {
        let mut hidden = category(1, "hidden", None, 0);
        hidden.is_active = false;
        let records = vec![category(2, "shown", None, 0), hidden];

        let asc = build_tree_by(&records, comparator(CategorySortBy::IsActive, SortDirection::Asc));
        let desc = build_tree_by(
            &records,
            comparator(CategorySortBy::IsActive, SortDirection::Desc),
        );

        assert_eq!(ids(&asc), vec![1, 2]);
        assert_eq!(ids(&desc), vec![2, 1]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = vec![
            category(3, "c", Some(1), 2),
            category(1, "a", None, 1),
            category(2, "b", Some(1), 1),
        ];
        let before = records.clone();

        let _ = build_tree(&records);

        assert_eq!(records, before);
    }

    #[test]
    fn test_repeated_builds_are_equal() {
        let records = vec![
            category(1, "a", None, 1),
            category(2, "b", Some(1), 2),
            category(3, "c", Some(1), 1),
            category(4, "d", Some(42), 0),
        ];

        assert_eq!(build_tree(&records), build_tree(&records));
    }

    #[test]
    fn test_extra_fields_survive() {
        let mut shoes = category(1, "Giày", None, 0);
        shoes
            .extra
            .insert("imageUrl".to_string(), serde_json::json!("giay.png"));

        let forest = build_tree(&[shoes]);

        assert_eq!(
            forest[0].category.extra.get("imageUrl"),
            Some(&serde_json::json!("giay.png"))
        );
    }

    #[test]
    fn test_upstream_children_key_is_not_duplicated() {
        let parent: CategoryRecord = serde_json::from_str(
            r#"{"id":1,"name":"Áo","slug":"ao","parentId":null,"sortOrder":0,"isActive":true,"children":[]}"#,
        )
        .unwrap();
        let child: CategoryRecord = serde_json::from_str(
            r#"{"id":2,"name":"Áo thun","slug":"ao-thun","parentId":1,"sortOrder":0,"isActive":true,"children":[]}"#,
        )
        .unwrap();

        let forest = build_tree(&[parent, child]);
        let json = serde_json::to_string(&forest).unwrap();

        assert_eq!(json.matches("\"children\"").count(), 2);
        let back: Vec<CategoryNode> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, forest);
        assert_eq!(back[0].children[0].category.id, 2);
    }

    #[test]
    fn test_duplicate_ids_keep_first_and_lose_nothing() {
        let records = vec![
            category(1, "first", None, 0),
            category(1, "second", None, 1),
            category(2, "child", Some(1), 0),
        ];

        let forest = build_tree(&records);

        assert_eq!(count_nodes(&forest), 3);
        assert_eq!(forest[0].category.name, "first");
        assert_eq!(ids(&forest[0].children), vec![2]);
        assert_eq!(forest[1].category.name, "second");
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_self_parent_becomes_root() {
        let records = vec![category(1, "loop", Some(1), 0)];

        let forest = build_tree(&records);

        assert_eq!(ids(&forest), vec![1]);
    }

    #[test]
    fn test_cycle_is_cut_at_first_member() {
        // 2 -> 3 -> 2, with 4 hanging below 3
        let records = vec![
            category(4, "leaf", Some(3), 0),
            category(2, "x", Some(3), 0),
            category(3, "y", Some(2), 0),
            category(1, "root", None, 0),
        ];

        let forest = build_tree(&records);

        assert_eq!(count_nodes(&forest), 4);
        assert_eq!(ids(&forest), vec![1, 2]);
        let cut = &forest[1];
        assert_eq!(ids(&cut.children), vec![3]);
        assert_eq!(ids(&cut.children[0].children), vec![4]);
    }

    #[test]
    fn test_bulk_completeness_and_fidelity() {
        let records: Vec<CategoryRecord> = (1..=300i64)
            .map(|id| {
                let parent = match id % 5 {
                    0 => None,
                    1 => Some(10_000 + id),
                    _ => Some(id / 2).filter(|p| *p > 0),
                };
                let name: String = Word().fake();
                category(id, &name, parent, ((id * 13) % 17) as i32)
            })
            .collect();

        let forest = build_tree(&records);

        assert_eq!(count_nodes(&forest), records.len());
        let mut seen = Vec::new();
        collect_ids(&forest, &mut seen);
        seen.sort_unstable();
        assert_eq!(seen, (1..=300).collect::<Vec<_>>());
        assert_parent_fidelity(&forest);

        let known: HashSet<i64> = records.iter().map(|r| r.id).collect();
        for root in &forest {
            assert!(root
                .category
                .parent_id
                .map_or(true, |p| !known.contains(&p)));
        }
    }

    #[test]
    fn test_find_by_slug_searches_subtrees() {
        let records = vec![
            category(1, "Thời trang", None, 0),
            category(2, "Giày", Some(1), 0),
        ];
        let forest = build_tree(&records);

        let found = find_by_slug(&forest, "cat-2").map(|n| n.category.id);

        assert_eq!(found, Some(2));
        assert!(find_by_slug(&forest, "missing").is_none());
    }

    #[test]
    fn test_search_ignores_case_and_accents() {
        let records = vec![
            category(1, "Giày thể thao", None, 0),
            category(2, "Áo", None, 0),
            category(3, "giày da", Some(2), 0),
        ];

        let hits: Vec<i64> = search(&records, " GIAY ").iter().map(|r| r.id).collect();

        assert_eq!(hits, vec![1, 3]);
    }

    #[test]
    fn test_promote_policy_surfaces_orphaned_children() {
        let mut parent = category(1, "hidden", None, 0);
        parent.is_active = false;
        let records = vec![parent, category(2, "child", Some(1), 0)];

        let forest = build_active_tree(&records, InactivePolicy::Promote);

        assert_eq!(ids(&forest), vec![2]);
    }

    #[test]
    fn test_prune_policy_hides_subtree() {
        let mut parent = category(1, "hidden", None, 0);
        parent.is_active = false;
        let records = vec![
            parent,
            category(2, "child", Some(1), 0),
            category(3, "visible", None, 1),
        ];

        let forest = build_active_tree(&records, InactivePolicy::Prune);

        assert_eq!(ids(&forest), vec![3]);
    }

    #[test]
    fn test_inactive_policy_from_str() {
        assert_eq!("Prune".parse::<InactivePolicy>(), Ok(InactivePolicy::Prune));
        assert_eq!(
            " promote ".parse::<InactivePolicy>(),
            Ok(InactivePolicy::Promote)
        );
        assert!("hide".parse::<InactivePolicy>().is_err());
    }
}
