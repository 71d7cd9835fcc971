//! Page arithmetic and page-button layout.

use serde::Serialize;

/// Page buttons are shown in full up to this many pages.
pub const MAX_UNELIDED_PAGES: u32 = 5;

/// Upper bound on rendered page items, ellipses included.
pub const MAX_PAGE_ITEMS: usize = 7;

/// Number of pages for `total` items; never less than one.
pub fn total_pages(total: usize, page_size: usize) -> u32 {
	if total == 0 || page_size == 0 {
		return 1;
	}
	total.div_ceil(page_size) as u32
}

/// Clamps a requested page into `1..=total_pages`.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
	page.clamp(1, total_pages.max(1))
}

/// One element of the page-button bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "camelCase")]
pub enum PageItem {
	Page(u32),
	Ellipsis,
}

/// Lays out the page buttons for `current` out of `total` pages.
///
/// Up to five pages are all shown. Beyond that the bar holds the first and
/// last page, a three-page window around the current page, and an ellipsis
/// for any gap wider than one page; a one-page gap shows that page instead.
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
	let total = total.max(1);
	if total <= MAX_UNELIDED_PAGES {
		return (1..=total).map(PageItem::Page).collect();
	}

	let current = clamp_page(current, total);
	let mut start = current.saturating_sub(1).max(2);
	let mut end = current.saturating_add(1).min(total - 1);
	if end - start < 2 {
		if start == 2 {
			end = (start + 2).min(total - 1);
		} else {
			start = end.saturating_sub(2).max(2);
		}
	}

	let mut items = Vec::with_capacity(MAX_PAGE_ITEMS);
	items.push(PageItem::Page(1));
	match start {
		3 => items.push(PageItem::Page(2)),
		s if s > 3 => items.push(PageItem::Ellipsis),
		_ => {},
	}
	items.extend((start..=end).map(PageItem::Page));
	match total - end {
		2 => items.push(PageItem::Page(total - 1)),
		gap if gap > 2 => items.push(PageItem::Ellipsis),
		_ => {},
	}
	items.push(PageItem::Page(total));
	items
}
