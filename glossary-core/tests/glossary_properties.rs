use std::collections::HashSet;

use glossary_core::{
    parse_synonyms, Category, CategoryFilter, Dataset, DatasetFilter, FilterState, Glossary,
    MetricDraft, SequentialIds,
};

fn empty_glossary() -> Glossary {
    Glossary::with_metrics(Vec::new(), Box::new(SequentialIds::new("m")), "Admin")
}

fn draft(name: &str) -> MetricDraft {
    MetricDraft::new(name, Category::Financial, Dataset::Finance)
}

fn names(metrics: &[&glossary_core::GlossaryMetric]) -> Vec<String> {
    metrics.iter().map(|m| m.name.clone()).collect()
}

#[test]
fn created_ids_are_pairwise_distinct() {
    let mut glossary = Glossary::with_samples("Admin");
    for i in 0..25 {
        glossary.create(draft(&format!("Metric {}", i))).unwrap();
    }

    let ids: HashSet<&str> = glossary.metrics().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), glossary.metrics().len());
    assert_eq!(ids.len(), 37);
}

#[test]
fn toggling_favorite_twice_restores_membership() {
    let mut glossary = Glossary::with_samples("Admin");

    assert!(!glossary.is_favorite("4"));
    glossary.toggle_favorite("4");
    glossary.toggle_favorite("4");
    assert!(!glossary.is_favorite("4"));

    glossary.toggle_favorite("5");
    glossary.toggle_favorite("4");
    glossary.toggle_favorite("4");
    assert!(glossary.is_favorite("5"));
}

#[test]
fn edits_append_to_changelog() {
    let mut glossary = Glossary::with_samples("Admin");
    let before = glossary.get("1").unwrap().clone();

    let mut edit = MetricDraft::from_metric(&before);
    edit.description = "An itemised bill".into();
    let after = glossary.update("1", edit).unwrap().unwrap();

    assert!(after.changelog.len() > before.changelog.len());
    assert_eq!(after.changelog[..before.changelog.len()], before.changelog[..]);
}

#[test]
fn diff_records_name_and_synonyms() {
    let mut glossary = empty_glossary();
    let mut initial = draft("Revenue");
    initial.synonyms = vec!["Income".into()];
    let created = glossary.create(initial).unwrap();

    let mut edit = MetricDraft::from_metric(&created);
    edit.name = "Sales".into();
    edit.synonyms = parse_synonyms("Income, Earnings");
    let updated = glossary.update(&created.id, edit).unwrap().unwrap();

    assert_eq!(updated.changelog.len(), 2);
    let name = &updated.changelog[0];
    assert_eq!(
        (name.field.as_str(), name.old_value.as_str(), name.new_value.as_str()),
        ("name", "Revenue", "Sales")
    );
    let synonyms = &updated.changelog[1];
    assert_eq!(
        (synonyms.field.as_str(), synonyms.old_value.as_str(), synonyms.new_value.as_str()),
        ("synonyms", "Income", "Income, Earnings")
    );
}

#[test]
fn identical_edit_records_nothing() {
    let mut glossary = Glossary::with_samples("Admin");
    let before = glossary.get("3").unwrap().clone();

    let after = glossary
        .update("3", MetricDraft::from_metric(&before))
        .unwrap()
        .unwrap();

    assert_eq!(after.changelog, before.changelog);
}

#[test]
fn search_matches_synonyms_ignoring_case() {
    let mut glossary = empty_glossary();
    glossary.create(draft("GMV")).unwrap();
    let mut revenue = draft("Revenue");
    revenue.synonyms = vec!["Income".into()];
    glossary.create(revenue).unwrap();

    let listed = glossary.list(&FilterState::search("income"));
    assert_eq!(names(&listed), vec!["Revenue"]);
}

#[test]
fn deleted_dependency_is_omitted_from_lineage() {
    let mut glossary = Glossary::with_samples("Admin");
    let before: Vec<String> = glossary.depends_on("1").iter().map(|m| m.id.clone()).collect();
    assert_eq!(before, vec!["3", "12"]);

    glossary.delete("3");

    let after: Vec<String> = glossary.depends_on("1").iter().map(|m| m.id.clone()).collect();
    assert_eq!(after, vec!["12"]);
    assert_eq!(glossary.get("1").unwrap().related_metric_ids, vec!["3", "12"]);
}

#[test]
fn references_are_not_symmetric() {
    let mut glossary = empty_glossary();
    let b = glossary.create(draft("B")).unwrap();
    let mut a = draft("A");
    a.related_metric_ids = vec![b.id.clone()];
    let a = glossary.create(a).unwrap();

    assert!(glossary.depends_on(&b.id).is_empty());
    assert_eq!(names(&glossary.referenced_by(&b.id)), vec!["A"]);
    assert_eq!(names(&glossary.depends_on(&a.id)), vec!["B"]);
    assert!(glossary.referenced_by(&a.id).is_empty());
}

#[test]
fn favorites_are_listed_first_in_stable_order() {
    let mut glossary = empty_glossary();
    let a = glossary.create(draft("A")).unwrap();
    glossary.create(draft("B")).unwrap();
    let c = glossary.create(draft("C")).unwrap();
    glossary.toggle_favorite(&a.id);
    glossary.toggle_favorite(&c.id);

    assert_eq!(names(&glossary.list(&FilterState::default())), vec!["A", "C", "B"]);
}

#[test]
fn category_counts_ignore_the_selected_category() {
    let glossary = Glossary::with_samples("Admin");
    let filter = FilterState::new(
        "",
        CategoryFilter::Only(Category::Customer),
        DatasetFilter::Only(Dataset::Finance),
    );

    let counts = glossary.category_counts(&filter);
    let count_of = |pill: CategoryFilter| {
        counts
            .iter()
            .find(|(c, _)| *c == pill)
            .map(|(_, n)| *n)
            .unwrap()
    };

    assert_eq!(count_of(CategoryFilter::All), 4);
    assert_eq!(count_of(CategoryFilter::Only(Category::Financial)), 3);
    assert_eq!(count_of(CategoryFilter::Only(Category::Metric)), 1);
    assert_eq!(count_of(CategoryFilter::Only(Category::Customer)), 0);
    assert!(glossary.list(&filter).is_empty());
}

#[test]
fn table_view_groups_unpinned_by_first_occurrence() {
    let mut glossary = Glossary::with_samples("Admin");
    glossary.toggle_favorite("9");

    let view = glossary.table_view(&FilterState::default());
    assert_eq!(names(&view.pinned), vec!["DAU"]);

    let order: Vec<Category> = view.groups.iter().map(|(c, _)| *c).collect();
    assert_eq!(
        order,
        vec![
            Category::Financial,
            Category::Marketing,
            Category::Customer,
            Category::Metric
        ]
    );
}

#[test]
fn deleting_a_metric_unpins_it() {
    let mut glossary = Glossary::with_samples("Admin");
    glossary.toggle_favorite("7");
    glossary.delete("7");

    assert!(!glossary.is_favorite("7"));
    assert!(glossary.favorites().is_empty());
    assert!(!glossary.delete("7"));
}
