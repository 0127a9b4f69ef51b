use ratatui::{
    layout::{Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use crate::app::App;

pub struct ItemListWidget;

impl ItemListWidget {
    /// Rows available for items inside the border
    pub fn inner_rows(area: Rect) -> u32 {
        area.height.saturating_sub(2) as u32
    }

    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let listing = &app.listing;

        let title = format!(
            " Items · page {}/{} ",
            listing.current_page,
            listing.total_pages.max(1)
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg0));

        let display = app.pager.display();
        let rows = app.visible_rows();
        let show_markers = app.config.ui.show_page_markers;

        let mut items: Vec<ListItem> = display.items()[rows.clone()]
            .iter()
            .zip(rows.clone())
            .map(|(item, row)| {
                let page_start = display
                    .page_of_row(row)
                    .filter(|page| display.page_start(*page) == Some(row));

                let gutter = match page_start {
                    Some(page) if show_markers => Span::styled(
                        format!("p{:<3}", page),
                        Style::default()
                            .fg(theme.page_marker)
                            .add_modifier(Modifier::BOLD),
                    ),
                    _ => Span::raw("    "),
                };

                ListItem::new(Line::from(vec![
                    gutter,
                    Span::styled(
                        format!("{:>5} ", row + 1),
                        Style::default().fg(theme.grey0),
                    ),
                    Span::styled(item.title.clone(), Style::default().fg(theme.fg0)),
                ]))
            })
            .collect();

        // Loading row sits right after the last item when it fits on screen
        if app.is_loading() && items.len() < app.viewport_rows as usize {
            items.push(ListItem::new(Line::from(Span::styled(
                "    Loading...",
                Style::default()
                    .fg(theme.loading)
                    .add_modifier(Modifier::ITALIC),
            ))));
        }

        frame.render_widget(List::new(items).block(block), area);

        let mut scrollbar_state = ScrollbarState::new(app.max_scroll() as usize)
            .position(app.scroll_offset as usize)
            .viewport_content_length(app.viewport_rows as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(theme.grey2)),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}
