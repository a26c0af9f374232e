use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use leptos::prelude::*;

/// Pages shown around the current one.
const WINDOW_PAGES: u32 = 3;
/// Pages always shown at each end.
const MARGIN_PAGES: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PageItem {
    Page(u32),
    Gap,
}

/// Page buttons for `current` out of `total` (both 1-based): the margin pages, a
/// window around `current`, and a gap wherever two or more pages are skipped.
pub(crate) fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }

    let current = current.clamp(1, total);
    let end = (current.saturating_sub(WINDOW_PAGES / 2).max(1) + WINDOW_PAGES - 1).min(total);
    let start = end.saturating_sub(WINDOW_PAGES - 1).max(1);

    let mut pages: Vec<u32> = (1..=MARGIN_PAGES.min(total))
        .chain(start..=end)
        .chain(total.saturating_sub(MARGIN_PAGES - 1).max(1)..=total)
        .collect();
    pages.sort_unstable();
    pages.dedup();

    let mut items = Vec::with_capacity(pages.len() + 2);
    let mut prev = 0;
    for page in pages {
        match page - prev {
            1 => {}
            // A single hidden page takes as much room as the gap marker.
            2 => items.push(PageItem::Page(page - 1)),
            _ => items.push(PageItem::Gap),
        }
        items.push(PageItem::Page(page));
        prev = page;
    }
    items
}

#[component]
pub fn Pagination(
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] current: Signal<u32>,
    #[prop(into)] on_change: Callback<u32>,
) -> impl IntoView {
    let go = move |page: u32| {
        if page != current.get_untracked() {
            on_change.run(page);
        }
    };

    view! {
        <Show when=move || { total_pages.get() > 1 }>
            <nav class="flex items-center gap-1" aria-label="Pagination">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Page
                    attr:aria-label="Previous page"
                    attr:disabled=move || current.get() <= 1
                    on:click=move |_| go(current.get_untracked().saturating_sub(1).max(1))
                >
                    "<"
                </Button>
                {move || {
                    page_window(current.get(), total_pages.get())
                        .into_iter()
                        .map(|item| match item {
                            PageItem::Gap => {
                                view! { <span class="px-1 text-xs text-muted-foreground">"..."</span> }
                                    .into_any()
                            }
                            PageItem::Page(page) => {
                                let variant = if page == current.get_untracked() {
                                    ButtonVariant::Current
                                } else {
                                    ButtonVariant::Ghost
                                };
                                view! {
                                    <Button
                                        variant=variant
                                        size=ButtonSize::Page
                                        on:click=move |_| go(page)
                                    >
                                        {page}
                                    </Button>
                                }
                                    .into_any()
                            }
                        })
                        .collect_view()
                }}
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Page
                    attr:aria-label="Next page"
                    attr:disabled=move || current.get() >= total_pages.get()
                    on:click=move |_| go((current.get_untracked() + 1).min(total_pages.get_untracked()))
                >
                    ">"
                </Button>
            </nav>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Gap, Page};
    use super::*;

    #[test]
    fn test_single_page_has_one_item() {
        assert_eq!(page_window(1, 1), vec![Page(1)]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_short_range_shows_every_page() {
        assert_eq!(
            page_window(1, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
    }

    #[test]
    fn test_window_in_the_middle_has_gaps_on_both_sides() {
        assert_eq!(
            page_window(5, 10),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Gap, Page(10)]
        );
    }

    #[test]
    fn test_window_sticks_to_the_ends() {
        assert_eq!(
            page_window(10, 10),
            vec![Page(1), Gap, Page(8), Page(9), Page(10)]
        );
        assert_eq!(
            page_window(3, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Gap, Page(10)]
        );
    }

    #[test]
    fn test_out_of_range_current_is_clamped() {
        assert_eq!(page_window(0, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_window(9, 3), vec![Page(1), Page(2), Page(3)]);
    }
}
