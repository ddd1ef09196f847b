use std::sync::Arc;

use super::{
    entities::{NormalizedRecord, RawEntry},
    grammar::{parse, Facets},
};

/// Turns the facets of one note into records, one per category × domain pair. An empty category
/// or domain set takes part in the product as a single missing value, so every note gets at least
/// one record. Action, reference and thoughts describe the whole note and are shared by all
/// records.
pub fn expand(entry: &RawEntry, facets: Facets) -> Vec<NormalizedRecord> {
    let Facets {
        categories,
        action,
        domains,
        reference,
        thoughts,
    } = facets;

    let template = NormalizedRecord {
        timestamp: entry.timestamp.clone(),
        raw_content: entry.raw_content.clone(),
        category: None,
        action: action.map(Arc::from),
        domain: None,
        reference: reference.map(Arc::from),
        thoughts: thoughts.map(Arc::from),
    };

    let categories = or_missing(&categories);
    let domains = or_missing(&domains);

    let mut records = Vec::with_capacity(categories.len() * domains.len());
    for category in &categories {
        for domain in &domains {
            records.push(
                template
                    .clone()
                    .with_category(*category)
                    .with_domain(*domain),
            );
        }
    }
    records
}

fn or_missing<'a>(values: impl IntoIterator<Item = &'a String>) -> Vec<Option<&'a str>> {
    let values = values
        .into_iter()
        .map(|v| Some(v.as_str()))
        .collect::<Vec<_>>();
    if values.is_empty() {
        vec![None]
    } else {
        values
    }
}

/// Parses and expands a single raw entry. Blank notes yield nothing.
pub fn normalize(entry: &RawEntry) -> Vec<NormalizedRecord> {
    parse(&entry.raw_content)
        .map(|facets| expand(entry, facets))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeSet, sync::Arc};

    use crate::notes::{
        entities::RawEntry,
        grammar::{parse, Facets},
    };

    use super::{expand, normalize};

    fn facets(categories: &[&str], domains: &[&str]) -> Facets {
        Facets {
            categories: categories.iter().map(|v| v.to_string()).collect(),
            action: Some("写代码".into()),
            domains: domains.iter().map(|v| v.to_string()).collect(),
            reference: None,
            thoughts: Some("fun".into()),
        }
    }

    #[test]
    fn expands_example_note() {
        let entry = RawEntry::new("2026-01-01", "## 工作 学习\n### 写代码\n@ 统计 心理学\n$PyQt$");
        let records = normalize(&entry);
        assert_eq!(records.len(), 4);

        let pairs = records
            .iter()
            .map(|v| (v.category.clone().unwrap(), v.domain.clone().unwrap()))
            .collect::<BTreeSet<_>>();
        let expected = [("工作", "统计"), ("工作", "心理学"), ("学习", "统计"), ("学习", "心理学")]
            .into_iter()
            .map(|(c, d)| (Arc::<str>::from(c), Arc::<str>::from(d)))
            .collect::<BTreeSet<_>>();
        assert_eq!(pairs, expected);

        for record in records {
            assert_eq!(record.timestamp.as_ref(), "2026-01-01");
            assert_eq!(record.action.as_deref(), Some("写代码"));
            assert_eq!(record.reference.as_deref(), Some("PyQt"));
            assert_eq!(record.thoughts, None);
            assert_eq!(record.raw_content, entry.raw_content);
        }
    }

    #[test]
    fn cardinality_is_product_with_missing_substitution() {
        let entry = RawEntry::new("2026-01-01 10:00:00", "");
        let cases: [(&[&str], &[&str], usize); 5] = [
            (&["a", "b", "c"], &["x", "y"], 6),
            (&["a", "b", "c"], &[], 3),
            (&[], &["x", "y"], 2),
            (&[], &[], 1),
            (&["a"], &["x"], 1),
        ];
        for (categories, domains, expected) in cases {
            let records = expand(&entry, facets(categories, domains));
            assert_eq!(records.len(), expected, "{categories:?} {domains:?}");
        }
    }

    #[test]
    fn missing_facets_are_explicit() {
        let entry = RawEntry::new("2026-01-01 10:00:00", "### 做饭");
        let records = expand(&entry, parse(&entry.raw_content).unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, None);
        assert_eq!(records[0].domain, None);
        assert_eq!(records[0].action.as_deref(), Some("做饭"));
    }

    #[test]
    fn scalar_facets_share_allocation() {
        let entry = RawEntry::new("2026-01-01 10:00:00", "");
        let records = expand(&entry, facets(&["a", "b"], &["x"]));
        let first = records[0].thoughts.as_ref().unwrap();
        let second = records[1].thoughts.as_ref().unwrap();
        assert!(Arc::ptr_eq(first, second));
    }

    #[test]
    fn blank_note_produces_nothing() {
        assert!(normalize(&RawEntry::new("2026-01-01 10:00:00", "   \n")).is_empty());
    }
}
