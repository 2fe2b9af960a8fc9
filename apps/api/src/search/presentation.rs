use std::collections::HashSet;

use crate::models::listing::JobListing;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Drops listings whose link was already seen. The first occurrence wins and
/// the relative order of survivors is unchanged.
pub fn dedupe_by_link(listings: Vec<JobListing>) -> Vec<JobListing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|listing| seen.insert(listing.link.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Returns page `page` (1-based) of `items`. Pages past the end are empty.
/// Callers must pass `page >= 1` and `page_size >= 1`.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let start = page.saturating_sub(1).saturating_mul(page_size);

    let items = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items,
        page,
        total,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, link: &str) -> JobListing {
        JobListing {
            title: title.to_string(),
            link: link.to_string(),
            description: String::new(),
            publication_date: String::new(),
            source: "test".to_string(),
            company: None,
            location: None,
            salary: None,
        }
    }

    #[test]
    fn test_dedupe_keeps_first_seen() {
        let listings = vec![
            listing("First", "https://x/1"),
            listing("Other", "https://x/2"),
            listing("Second copy", "https://x/1"),
        ];

        let unique = dedupe_by_link(listings);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "First");
        assert_eq!(unique[1].link, "https://x/2");
    }

    #[test]
    fn test_paginate_middle_and_last_page() {
        let items: Vec<u32> = (1..=23).collect();

        let second = paginate(items.clone(), 2, 10);
        assert_eq!(second.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(second.total, 23);
        assert_eq!(second.total_pages, 3);

        let third = paginate(items, 3, 10);
        assert_eq!(third.items, vec![21, 22, 23]);
    }

    #[test]
    fn test_paginate_reports_position_and_totals() {
        assert_eq!(
            paginate(vec!['a', 'b', 'c'], 1, 2),
            Page {
                items: vec!['a', 'b'],
                page: 1,
                total: 3,
                total_pages: 2,
            }
        );
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let page = paginate(vec![1, 2, 3], 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_paginate_empty_input() {
        let page: Page<u32> = paginate(Vec::new(), 1, DEFAULT_PAGE_SIZE);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
    }
}
