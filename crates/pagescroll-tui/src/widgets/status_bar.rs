use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let listing = &app.listing;

        let state_str = if app.is_loading() {
            "LOADING"
        } else if !app.pending_jumps.is_empty() {
            "FETCHING"
        } else {
            "IDLE"
        };

        let (status_text, status_style) = if let Some(msg) = &app.status_message {
            (format!(" {}", msg), Style::default().fg(theme.fg0).bg(theme.bg2))
        } else if let Some(err) = app.pager.last_error() {
            (format!(" {}", err), Style::default().fg(theme.error).bg(theme.bg2))
        } else {
            (
                format!(
                    " {} | Page {}/{} | Loaded: {} | Items: {} | Offset: {}",
                    state_str,
                    listing.current_page,
                    listing.total_pages,
                    listing.cache.len(),
                    listing.cache.item_count(),
                    app.scroll_offset,
                ),
                Style::default().fg(theme.fg0).bg(theme.bg2),
            )
        };

        let help_hint = " q:quit j/k:scroll ^d/^u:half [/]:page g/G:top/bottom ";
        let padding_len = area
            .width
            .saturating_sub(status_text.chars().count() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(status_text, status_style),
            Span::styled(
                " ".repeat(padding_len),
                Style::default().bg(theme.bg2),
            ),
            Span::styled(
                help_hint,
                Style::default().fg(theme.grey2).bg(theme.bg2),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
