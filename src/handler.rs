use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::App;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_current(),
        KeyCode::Char('l') | KeyCode::Right => app.expand_current(),
        KeyCode::Char('h') | KeyCode::Left => app.collapse_current(),

        KeyCode::Char('e') => app.expand_all(),
        KeyCode::Char('c') => app.collapse_all(),
        KeyCode::Char('r') | KeyCode::F(5) => app.refresh(),
        KeyCode::Char('d') => app.download_current(),
        _ => {}
    }
}

/// Handle a mouse event. Coordinates are absolute terminal cells.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let area = app.tree_area;
    let inside = mouse.column >= area.x
        && mouse.column < area.x + area.width
        && mouse.row >= area.y
        && mouse.row < area.y + area.height;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => {
            app.click(mouse.column - area.x, mouse.row - area.y);
        }
        MouseEventKind::ScrollDown if inside => app.select_next(),
        MouseEventKind::ScrollUp if inside => app.select_previous(),
        _ => {}
    }
}
