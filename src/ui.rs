use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::details::DetailsWidget;
use crate::components::overview::OverviewWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(outer[1]);

    let theme = &app.theme;
    let border = Style::default().fg(theme.border_fg);
    let title = Style::default()
        .fg(theme.accent_fg)
        .add_modifier(Modifier::BOLD);

    let tree_block = Block::default()
        .title(" Files ")
        .title_style(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused_fg));

    // Mouse hits and scrolling work against the inner area.
    let tree_inner = tree_block.inner(panels[0]);
    app.tree_area = tree_inner;
    app.update_scroll(tree_inner.height as usize);

    let theme = &app.theme;
    let overview_block = Block::default()
        .title(" Storage ")
        .title_style(title)
        .borders(Borders::ALL)
        .border_style(border);
    let overview = OverviewWidget::new(app.explorer.usage(), app.explorer.stats(), theme)
        .block(overview_block);
    frame.render_widget(overview, outer[0]);

    let rows = app.visual.visible_rows();
    let tree = TreeWidget::new(&rows, app.explorer.view(), theme, app.use_icons)
        .cursor(app.cursor, app.scroll_offset)
        .block(tree_block);
    frame.render_widget(tree, panels[0]);

    let details = app.explorer.details();
    let details_block = Block::default()
        .title(" Details ")
        .title_style(title)
        .borders(Borders::ALL)
        .border_style(border);
    frame.render_widget(
        DetailsWidget::new(details.as_ref(), theme).block(details_block),
        panels[1],
    );

    let status = StatusBarWidget::new(&app.device_label, theme)
        .notice(app.status_message.as_ref().map(|(notice, _)| notice))
        .loading(app.explorer.is_loading());
    frame.render_widget(status, outer[2]);
}
