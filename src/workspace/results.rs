//! Rendering for previews and tabular results.

use gpui::{prelude::FluentBuilder as _, *};
use gpui_component::{ActiveTheme as _, StyledExt as _, h_flex, label::Label, v_flex};

use bucketdesk::services::{Preview, TablePreview};

/// Rows drawn per grid; the rest is summarized in a footer line.
const MAX_RENDERED_ROWS: usize = 500;
const CELL_WIDTH: f32 = 160.;
const CELL_CHARS: usize = 24;

/// Render a table of strings as a scrollable grid.
pub fn render_table(id: impl Into<ElementId>, table: &TablePreview, cx: &App) -> AnyElement {
    let header = h_flex()
        .border_b_1()
        .border_color(cx.theme().border)
        .bg(cx.theme().title_bar)
        .children(table.headers.iter().map(|name| {
            div()
                .w(px(CELL_WIDTH))
                .flex_shrink_0()
                .px_2()
                .py_1()
                .child(Label::new(truncate(name, CELL_CHARS)).text_sm().font_semibold())
        }));

    let rows = table
        .rows
        .iter()
        .take(MAX_RENDERED_ROWS)
        .enumerate()
        .map(|(ix, row)| {
            let bg = if ix % 2 == 0 {
                cx.theme().list
            } else {
                cx.theme().list_even
            };

            h_flex().bg(bg).children(row.iter().map(|value| {
                div()
                    .w(px(CELL_WIDTH))
                    .flex_shrink_0()
                    .px_2()
                    .py_1()
                    .child(Label::new(truncate(value, CELL_CHARS)).text_sm())
            }))
        });

    let hidden = table.row_count().saturating_sub(MAX_RENDERED_ROWS);

    v_flex()
        .size_full()
        .child(
            div()
                .id(id)
                .flex_1()
                .overflow_scroll()
                .child(v_flex().child(header).children(rows)),
        )
        .child(
            div().px_2().py_1().child(
                Label::new(if hidden > 0 {
                    format!("{} rows ({} not shown)", table.row_count(), hidden)
                } else {
                    format!("{} rows", table.row_count())
                })
                .text_xs()
                .text_color(cx.theme().muted_foreground),
            ),
        )
        .into_any_element()
}

/// Render a file preview.
pub fn render_preview(preview: &Preview, cx: &App) -> AnyElement {
    match preview {
        Preview::Table(table) => render_table("preview-table", table, cx),
        Preview::Pages(pages) => div()
            .id("preview-pages")
            .size_full()
            .overflow_y_scroll()
            .child(v_flex().gap_3().p_2().children(pages.iter().enumerate().map(
                |(ix, text)| {
                    v_flex()
                        .gap_1()
                        .child(
                            Label::new(format!("Page {}", ix + 1))
                                .text_xs()
                                .text_color(cx.theme().muted_foreground),
                        )
                        .child(div().text_sm().child(text.clone()))
                },
            )))
            .into_any_element(),
        Preview::Paragraphs(paragraphs) => div()
            .id("preview-paragraphs")
            .size_full()
            .overflow_y_scroll()
            .child(
                v_flex()
                    .gap_2()
                    .p_2()
                    .children(paragraphs.iter().map(|p| div().text_sm().child(p.clone()))),
            )
            .into_any_element(),
        Preview::Unsupported => render_message(Preview::UNSUPPORTED_MESSAGE, None, cx),
        Preview::Failed(failure) => {
            render_message(&failure.message, Some(failure.detail.as_str()), cx)
        }
    }
}

/// Centered message with an optional muted detail line.
pub fn render_message(message: &str, detail: Option<&str>, cx: &App) -> AnyElement {
    v_flex()
        .flex_1()
        .size_full()
        .items_center()
        .justify_center()
        .gap_2()
        .child(Label::new(message.to_string()).font_semibold())
        .when_some(detail, |d, detail| {
            d.child(
                Label::new(detail.to_string())
                    .text_sm()
                    .text_color(cx.theme().muted_foreground),
            )
        })
        .into_any_element()
}

/// Truncate to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
