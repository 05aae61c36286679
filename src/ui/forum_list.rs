//! The forum list widget: one flat sequence of header, favorite, and forum
//! rows, rendered with indentation, expand indicators, stars, and separator
//! rule lines.

use crate::app::App;
use crate::model::Row;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the forum list panel.
pub fn render(f: &mut Frame, app: &App, state: &mut ListState, area: Rect) {
    let palette = &app.palette;
    let inner_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = if app.builder.is_empty() {
        vec![ListItem::new("No forums imported. Run with --import")]
    } else {
        app.builder
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| render_row(app, row, i == app.selected, inner_width))
            .collect()
    };

    let title = format!("Forums ({})", app.builder.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border_focused)
            .title(title),
    );

    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, state);
}

fn render_row<'a>(app: &App, row: &'a Row, selected: bool, width: usize) -> ListItem<'a> {
    let palette = &app.palette;

    match row {
        Row::Header(title) => ListItem::new(Line::from(Span::styled(
            truncate_to_width(title, width).into_owned(),
            palette.section_header,
        ))),

        Row::Forum(card) | Row::Favorite(card) => {
            let mut spans: Vec<Span> = Vec::with_capacity(5);

            let indent = "  ".repeat(card.indent);
            if !indent.is_empty() {
                spans.push(Span::raw(indent));
            }

            let indicator = match card.expanded {
                Some(true) => "▾ ",
                Some(false) => "▸ ",
                None => "  ",
            };
            spans.push(Span::styled(indicator, palette.expand_indicator));

            if card.favorite {
                spans.push(Span::styled("★ ", palette.favorite_star));
            }

            let used: usize = spans.iter().map(|span| span.width()).sum();
            let name_style = if selected {
                palette.forum_selected
            } else {
                palette.forum
            };
            let name_width = width.saturating_sub(used + 6);
            spans.push(Span::styled(
                truncate_to_width(&card.name, name_width).into_owned(),
                name_style,
            ));

            if card.subforum_count > 0 {
                spans.push(Span::styled(
                    format!(" ({})", card.subforum_count),
                    palette.expand_indicator,
                ));
            }

            let mut lines = vec![Line::from(spans)];
            if card.show_separator {
                lines.push(Line::from(Span::styled(
                    "─".repeat(width),
                    palette.separator,
                )));
            }
            ListItem::new(lines)
        }
    }
}
