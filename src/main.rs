mod app;
mod calendar;
mod components;
mod config;
mod event;
mod logging;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, InputMode};
use color_eyre::Result;
use config::Config;
use crossterm::event::{KeyCode, KeyModifiers};
use log::info;
use ratatui::layout::{Constraint, Layout, Rect};

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;
    logging::init(&config)?;
    theme::init(config.theme.clone());
    match config.source {
        Some(ref path) => info!("Using config {}", path.display()),
        None => info!("No config file, using defaults"),
    }

    eprintln!("Loading events from {}...", config.data_dir.display());
    let mut app = App::new(&config)?;
    info!("Starting with {} events, week starts on {}", app.store().len(), config.week_start);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| draw(frame, app))?;

        if let Some(key) = event::next_key_event(Duration::from_millis(250))? {
            // Clear status message on any key
            app.status_message = None;

            match app.input_mode() {
                InputMode::Help => {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                        app.show_help = false;
                    }
                }
                InputMode::Form => handle_form_input(app, key.code),
                InputMode::DayModal => handle_modal_input(app, key.code),
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    // Main layout: content + status bar
    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

    render_month_layout(frame, layout[0], app);

    let day_events = app.day_events();
    if app.day_modal_open {
        components::DayModal::render(frame, area, app.selected_date, &day_events, app.event_cursor);
    }

    // Render event form overlay
    if let Some(ref form) = app.editor {
        components::EventForm::render(frame, area, form);
    }

    // Render help overlay
    if app.show_help {
        render_help(frame, area);
    }

    components::StatusBar::render(
        frame,
        layout[1],
        app.input_mode(),
        app.status_message.as_deref(),
        app.store().len(),
    );
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.quit(),
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('n'), _) => app.open_event_form(),
        (KeyCode::Char('e'), _) => app.edit_selected_event(),
        (KeyCode::Char('d'), _) | (KeyCode::Delete, _) => app.delete_selected_event(),
        (KeyCode::Enter, _) => app.open_day_modal(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Char('H'), _) => app.prev_week(),
        (KeyCode::Char('L'), _) => app.next_week(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.cursor_up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.cursor_down(),
        (KeyCode::Char('['), _) | (KeyCode::PageUp, _) => app.prev_month(),
        (KeyCode::Char(']'), _) | (KeyCode::PageDown, _) => app.next_month(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_modal_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_day_modal(),
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),
        KeyCode::Char('e') | KeyCode::Enter => app.edit_selected_event(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_event(),
        KeyCode::Char('n') => app.open_event_form(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_event_form(),
        KeyCode::Enter => app.submit_event_form(),
        KeyCode::Tab | KeyCode::Down => app.form_tab(),
        KeyCode::BackTab | KeyCode::Up => app.form_backtab(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let grid = app.month_grid();
    let day_events = app.day_events();

    if area.width < 80 {
        // Narrow terminals stack the day list under the grid
        let content = Layout::vertical([Constraint::Min(10), Constraint::Length(7)]).split(area);
        components::MonthView::render(frame, content[0], &grid);
        components::DayView::render(frame, content[1], app.selected_date, &day_events, app.event_cursor);
    } else {
        let list_w = if area.width >= 140 { 44 } else { 32 };
        let content = Layout::horizontal([Constraint::Min(40), Constraint::Length(list_w)]).split(area);

        components::MonthView::render(frame, content[0], &grid);
        components::DayView::render(frame, content[1], app.selected_date, &day_events, app.event_cursor);
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_area = components::centered(area, area.width.min(52).max(30), area.height.min(24).max(12));
    let dim = theme::current().dim;

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let binding = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        Line::from(vec![
            Span::styled("  h/l ", key_style),
            Span::styled("or ", dim),
            Span::styled("\u{2190}/\u{2192}  ", key_style),
            Span::raw("Previous/next day"),
        ]),
        binding("H/L", "Previous/next week"),
        binding("[/]", "Previous/next month"),
        binding("j/k", "Move through the day's events"),
        binding("t", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Events", section_style)),
        binding("Enter", "Show all events of the day"),
        binding("n", "Add event on selected day"),
        binding("e", "Edit highlighted event"),
        binding("d", "Delete highlighted event"),
        Line::from(""),
        Line::from(Span::styled("Form", section_style)),
        binding("Tab", "Next field"),
        binding("Enter", "Save"),
        binding("Esc", "Cancel"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", dim),
            Span::styled("Esc     ", key_style),
            Span::raw("Quit / close popup"),
        ]),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
