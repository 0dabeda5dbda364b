use super::AppError;

/// One page of a list, 1-based
pub struct Page<'a, T> {
    items: &'a [T],
    per_page: usize,
    current_page: usize,
}

impl<'a, T> Page<'a, T> {
    /// Select `page` out of `items`.
    ///
    /// Page 1 of an empty list is valid and empty; any page past the end is rejected.
    pub fn new(items: &'a [T], per_page: usize, page: usize) -> Result<Self, AppError> {
        let per_page = per_page.max(1);
        let total_pages = items.len().div_ceil(per_page).max(1);

        if page == 0 || page > total_pages {
            return Err(AppError::Validation(format!(
                "❌ Invalid page number. History has {} page(s)",
                total_pages
            )));
        }

        Ok(Page {
            items,
            per_page,
            current_page: page,
        })
    }

    /// Items on the current page
    pub fn items(&self) -> &'a [T] {
        let start = (self.current_page - 1) * self.per_page;
        let end = (start + self.per_page).min(self.items.len());
        &self.items[start..end]
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Get total number of pages
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page).max(1)
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Check if on first page
    pub fn is_first(&self) -> bool {
        self.current_page == 1
    }

    /// Check if on last page
    pub fn is_last(&self) -> bool {
        self.current_page == self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_items_into_pages() {
        let items: Vec<u32> = (0..25).collect();

        let first = Page::new(&items, 10, 1).expect("page 1");
        assert_eq!(first.items(), &items[0..10]);
        assert_eq!(first.total_pages(), 3);
        assert!(first.is_first());
        assert!(!first.is_last());

        let last = Page::new(&items, 10, 3).expect("page 3");
        assert_eq!(last.items(), &items[20..25]);
        assert!(last.is_last());
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let items: Vec<u32> = Vec::new();
        let page = Page::new(&items, 10, 1).expect("page 1");
        assert!(page.items().is_empty());
        assert_eq!(page.total_pages(), 1);
        assert!(page.is_first() && page.is_last());
    }

    #[test]
    fn rejects_out_of_range_pages() {
        let items: Vec<u32> = (0..5).collect();
        assert!(Page::new(&items, 10, 0).is_err());
        let err = Page::new(&items, 10, 2).err().expect("page 2 must fail");
        assert!(err.to_string().contains("1 page(s)"));
    }
}
