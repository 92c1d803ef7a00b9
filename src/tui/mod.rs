//! Terminal UI for the onboarding wizard.
//!
//! Layout:
//! - Centered window frame titled "Blueprint Setup"
//! - Left banner panel with ASCII logo
//! - Content panel: welcome, one question at a time, then the model viewer
//! - Bottom button row: [ Let's Begin | Next | Finish ] [ Quit ]
//! - Loading overlay with rotating status messages while the model is prepared
//!
//! Note: Logging is file-only in TUI mode (stdout logging is disabled) to avoid corrupting the terminal UI.

pub mod anim;

use crate::config::WizardConfig;
use crate::models::state::{WizardPhase, WizardState, QUESTIONS};
use crate::viewer::{BlueprintSurface, RenderSurface, SurfaceInput};
use crate::wizard::{WizardController, WizardEvent};
use anim::{Slot, TransitionTracker};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use log::{debug, info};
use ratatui::backend::{Backend, CrosstermBackend, TestBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver};

const ASCII_LOGO: &str = r#"
 ___ _   _   _ ___
| _ ) | | | | | __|
| _ \ |_| |_| | _|
|___/____\___/|___|
 ___ ___ ___ _  _ _____
| _ \ _ \_ _| \| |_   _|
|  _/   /| || .` | | |
|_| |_|_\___|_|\_| |_|"#;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonFocus {
    Next,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modal {
    ConfirmQuit { yes_focused: bool },
}

#[derive(Debug, Clone, Default)]
struct TextInput {
    value: String,
    /// Cursor position in chars.
    cursor: usize,
}

impl TextInput {
    fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Returns true when the value changed.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => {
                let idx = self.byte_index();
                self.value.insert(idx, c);
                self.cursor += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let idx = self.byte_index();
                self.value.remove(idx);
                true
            }
            KeyCode::Delete => {
                if self.cursor >= self.value.chars().count() {
                    return false;
                }
                let idx = self.byte_index();
                self.value.remove(idx);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                false
            }
            _ => false,
        }
    }
}

struct TuiState {
    input: TextInput,
    focus: ButtonFocus,
    modal: Option<Modal>,
    quit: bool,
    transitions: TransitionTracker,
}

impl TuiState {
    fn new() -> Self {
        Self {
            input: TextInput::default(),
            focus: ButtonFocus::Next,
            modal: None,
            quit: false,
            transitions: TransitionTracker::new(),
        }
    }
}

fn next_label(state: &WizardState) -> Option<&'static str> {
    match state.phase {
        WizardPhase::Start => Some("Let's Begin"),
        WizardPhase::Query if state.is_last_question() => Some("Finish"),
        WizardPhase::Query => Some("Next"),
        WizardPhase::Finished => None,
    }
}

/// The confirm button is absent (not disabled) until the guard holds.
fn confirm_visible(state: &WizardState) -> bool {
    match state.phase {
        WizardPhase::Start => true,
        WizardPhase::Query => state.can_confirm(),
        WizardPhase::Finished => false,
    }
}

pub fn run(config: &WizardConfig) -> Result<()> {
    info!("[PHASE: tui] [STEP: start] Starting TUI wizard");

    let (tx, mut rx) = mpsc::unbounded_channel::<WizardEvent>();
    let mut controller = WizardController::mount(config.timings(), Arc::new(tx));

    let mut terminal = setup_terminal()?;
    let result = run_loop(&mut terminal, &mut controller, &mut rx, config.tick_rate());
    controller.teardown();
    restore_terminal(&mut terminal)?;

    info!("[PHASE: tui] [STEP: exit] TUI wizard closed");
    result
}

fn seeded_state(target: &str) -> WizardState {
    // Smoke-only: seeded state for deterministic page rendering in CI/tooling.
    let mut state = WizardState::new();
    match target {
        "query" => {
            state.begin();
        }
        "ready" => {
            state.begin();
            state.set_answer(QUESTIONS[0].id, "1000");
        }
        "loading" | "finished" => {
            state.begin();
            for (q, v) in QUESTIONS.iter().zip(["1000", "5", "5"]) {
                state.set_answer(q.id, v);
                state.confirm_answer();
            }
            state.message_cursor = 3;
            if target == "finished" {
                state.clear_loading();
            }
        }
        _ => {}
    }
    state
}

/// Non-interactive smoke mode: render a single frame and exit.
/// Targets: start|query|ready|loading|finished
pub fn smoke(target: &str) -> Result<String> {
    info!(
        "[PHASE: tui] [STEP: smoke] Rendering single-frame TUI smoke target={}",
        target
    );

    let t = target.trim().to_ascii_lowercase();
    let state = seeded_state(t.as_str());
    let mut tui = TuiState::new();
    tui.input.set(state.current_answer().unwrap_or_default());

    // In-memory backend: no raw mode or alternate screen.
    render_to_string(&state, &tui, 100, 30)
}

fn render_to_string(state: &WizardState, tui: &TuiState, width: u16, height: u16) -> Result<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height))?;
    let now = Instant::now();
    terminal.draw(|f| draw(f.size(), f, state, tui, &BlueprintSurface, now))?;
    Ok(buffer_text(terminal.backend()))
}

fn buffer_text(backend: &TestBackend) -> String {
    let buffer = backend.buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width.max(1))
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut WizardController,
    rx: &mut UnboundedReceiver<WizardEvent>,
    tick_rate: Duration,
) -> Result<()> {
    let mut tui = TuiState::new();
    let mut last_tick = Instant::now();

    while !tui.quit {
        let now = Instant::now();
        drain_events(&mut tui, rx, now);
        let state = controller.snapshot();
        tui.transitions.note_confirm_visible(confirm_visible(&state), now);
        terminal.draw(|f| draw(f.size(), f, &state, &tui, &BlueprintSurface, now))?;

        // Redraw faster while an effect is running.
        let frame_budget = if tui.transitions.is_animating(now) {
            Duration::from_millis(30).min(tick_rate)
        } else {
            tick_rate
        };
        let timeout = frame_budget
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key_event(&mut tui, controller, key);
            }
        }

        if last_tick.elapsed() >= frame_budget {
            tui.transitions.prune(Instant::now());
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn drain_events(tui: &mut TuiState, rx: &mut UnboundedReceiver<WizardEvent>, now: Instant) {
    while let Ok(event) = rx.try_recv() {
        debug!("[PHASE: tui] [STEP: transition] {:?}", event);
        tui.transitions.on_event(&event, now);
    }
}

fn handle_key_event(tui: &mut TuiState, controller: &mut WizardController, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        info!("[PHASE: tui] [STEP: quit] Ctrl+C");
        tui.quit = true;
        return;
    }
    // Ctrl/Alt chords are not text.
    if matches!(key.code, KeyCode::Char(_))
        && !key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
    {
        debug!("[PHASE: tui] [STEP: input] Ignoring chord {:?}", key);
        return;
    }
    handle_key(tui, controller, key.code);
}

fn handle_key(tui: &mut TuiState, controller: &mut WizardController, code: KeyCode) {
    // Modal handling
    if let Some(Modal::ConfirmQuit { yes_focused }) = tui.modal {
        match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                tui.modal = Some(Modal::ConfirmQuit {
                    yes_focused: !yes_focused,
                });
            }
            KeyCode::Enter => {
                tui.modal = None;
                if yes_focused {
                    info!("[PHASE: tui] [STEP: quit] User confirmed quit");
                    tui.quit = true;
                }
            }
            KeyCode::Esc => {
                tui.modal = None;
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Esc => {
            tui.modal = Some(Modal::ConfirmQuit { yes_focused: false });
        }
        KeyCode::Tab | KeyCode::BackTab => {
            tui.focus = match tui.focus {
                ButtonFocus::Next => ButtonFocus::Quit,
                ButtonFocus::Quit => ButtonFocus::Next,
            };
        }
        KeyCode::Enter => {
            if tui.focus == ButtonFocus::Quit {
                tui.modal = Some(Modal::ConfirmQuit { yes_focused: false });
                return;
            }
            activate_next(tui, controller);
        }
        other => {
            let state = controller.snapshot();
            if state.phase == WizardPhase::Query && tui.input.handle_key(other) {
                controller.set_current_answer(tui.input.value.clone());
            }
        }
    }
}

fn activate_next(tui: &mut TuiState, controller: &mut WizardController) {
    let state = controller.snapshot();
    match state.phase {
        WizardPhase::Start => controller.begin(),
        WizardPhase::Query => {
            if !controller.can_confirm() {
                return;
            }
            controller.confirm_answer();
        }
        WizardPhase::Finished => return,
    }
    let state = controller.snapshot();
    tui.input.set(state.current_answer().unwrap_or_default());
}

fn draw(
    area: Rect,
    f: &mut ratatui::Frame<'_>,
    state: &WizardState,
    tui: &TuiState,
    surface: &dyn RenderSurface,
    now: Instant,
) {
    let window_area = centered_window(area, 100, 30);

    // Outer frame
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Blueprint Setup");
    f.render_widget(outer_block, window_area);

    // Inner layout: banner + content + buttons row
    let inner = window_area.inner(&ratatui::layout::Margin {
        vertical: 1,
        horizontal: 1,
    });
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(inner);

    let body = rows[0];
    let buttons = rows[1];

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(0)].as_ref())
        .split(body);

    // Left banner
    let banner = Paragraph::new(ASCII_LOGO)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(banner, cols[0]);

    // Right content
    let content = cols[1];
    match state.phase {
        WizardPhase::Start => draw_start_page(f, content, tui, now),
        WizardPhase::Query => draw_question_page(f, content, state, tui, now),
        WizardPhase::Finished => {
            let input = SurfaceInput {
                loading: state.loading,
                params: &state.params,
            };
            surface.render(f, content, &input);
        }
    }

    draw_buttons(f, buttons, state, tui, now);

    if state.loading {
        draw_loading_overlay(f, window_area, state, tui, now);
    }

    if let Some(Modal::ConfirmQuit { yes_focused }) = tui.modal {
        draw_quit_modal(f, window_area, yes_focused);
    }
}

fn centered_window(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2)).max(60).min(area.width);
    let h = height.min(area.height.saturating_sub(2)).max(20).min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect {
        x,
        y,
        width: w,
        height: h,
    }
}

fn draw_start_page(f: &mut ratatui::Frame<'_>, area: Rect, tui: &TuiState, now: Instant) {
    let p = tui.transitions.progress(Slot::Content, now);
    let block = Block::default().borders(Borders::ALL);
    let body = Paragraph::new(Text::from(vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            anim::reveal_from_center("Welcome", p),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            anim::reveal_from_center("Press Enter to get started", p),
            Style::default().fg(Color::Gray),
        )),
    ]))
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: false });
    f.render_widget(body, area);
}

fn draw_question_page(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &WizardState,
    tui: &TuiState,
    now: Instant,
) {
    let Some(question) = state.current_question() else {
        return;
    };

    let block = Block::default().borders(Borders::ALL).title(format!(
        "Question {} of {}",
        state.question_index + 1,
        QUESTIONS.len()
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let offset = anim::slide_offset(tui.transitions.progress(Slot::Content, now));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1 + offset),
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(inner);

    let label = Paragraph::new(Span::styled(
        question.label,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(label, rows[1]);

    let field = centered_field(rows[2], 40);
    let shown = if tui.input.value.is_empty() {
        Span::styled(question.placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(tui.input.value.clone())
    };
    let input = Paragraph::new(Line::from(shown)).block(Block::default().borders(Borders::ALL));
    f.render_widget(input, field);
    if tui.modal.is_none() && field.width > 2 {
        let cursor_x = field.x + 1 + (tui.input.cursor as u16).min(field.width - 3);
        f.set_cursor(cursor_x, field.y + 1);
    }

    let hint = Paragraph::new(Text::from(vec![
        Line::from(""),
        Line::from("Type your answer. Enter continues once something is entered."),
        Line::from("Tab switches buttons. Esc quits."),
    ]))
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(hint, rows[3]);
}

fn centered_field(area: Rect, width: u16) -> Rect {
    let w = width.min(area.width);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y,
        width: w,
        height: area.height,
    }
}

fn draw_buttons(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &WizardState,
    tui: &TuiState,
    now: Instant,
) {
    let mut spans = Vec::new();
    if let Some(label) = next_label(state).filter(|_| confirm_visible(state)) {
        let fade = anim::fade_style(tui.transitions.progress(Slot::Confirm, now));
        spans.push(button_text(label, tui.focus == ButtonFocus::Next, fade));
        spans.push(Span::raw(" "));
    }
    spans.push(button_text(
        "Quit",
        tui.focus == ButtonFocus::Quit,
        Style::default(),
    ));

    let p = Paragraph::new(Text::from(Line::from(spans))).alignment(Alignment::Right);
    f.render_widget(p, area);
}

fn button_text(label: &str, focused: bool, base: Style) -> Span<'static> {
    let style = if focused {
        base.add_modifier(Modifier::REVERSED)
    } else {
        base
    };
    Span::styled(format!("[ {} ]", label), style)
}

fn draw_loading_overlay(
    f: &mut ratatui::Frame<'_>,
    window_area: Rect,
    state: &WizardState,
    tui: &TuiState,
    now: Instant,
) {
    let p = tui.transitions.progress(Slot::Overlay, now);
    let full_w = 50u16.min(window_area.width.saturating_sub(4));
    let w = ((full_w as f32) * (0.4 + 0.6 * p)).round() as u16;
    let h = 7u16.min(window_area.height);
    let area = Rect {
        x: window_area.x + (window_area.width.saturating_sub(w)) / 2,
        y: window_area.y + (window_area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    };

    let spinner = SPINNER[state.message_cursor % SPINNER.len()];
    let body = Paragraph::new(Text::from(vec![
        Line::from(""),
        Line::from(format!("[ {} ]", spinner)),
        Line::from(""),
        Line::from(state.loading_message()),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Building"))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn draw_quit_modal(f: &mut ratatui::Frame<'_>, window_area: Rect, yes_focused: bool) {
    let modal_w = 52u16
        .min(window_area.width.saturating_sub(4))
        .max(40)
        .min(window_area.width);
    let modal_h = 6u16.min(window_area.height);
    let x = window_area.x + (window_area.width.saturating_sub(modal_w)) / 2;
    let y = window_area.y + (window_area.height.saturating_sub(modal_h)) / 2;
    let area = Rect {
        x,
        y,
        width: modal_w,
        height: modal_h,
    };

    let block = Block::default().borders(Borders::ALL).title("Quit Setup?");
    let body = Paragraph::new(Text::from(vec![
        Line::from("Your answers will not be kept."),
        Line::from(""),
    ]))
    .block(block)
    .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(body, area);

    if area.height < 3 || area.width < 3 {
        return;
    }

    // Buttons: [Yes, quit] [No] (primary on right)
    let buttons_area = Rect {
        x: area.x + 1,
        y: area.y + area.height - 2,
        width: area.width - 2,
        height: 1,
    };
    let yes = button_text("Yes, quit", yes_focused, Style::default());
    let no = button_text("No", !yes_focused, Style::default());
    let line = Line::from(vec![yes, Span::raw(" "), no]);
    let p = Paragraph::new(Text::from(line)).alignment(Alignment::Right);
    f.render_widget(p, buttons_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::state::QuestionId;
    use crate::wizard::{NullSink, Timings};

    fn type_text(tui: &mut TuiState, controller: &mut WizardController, text: &str) {
        for c in text.chars() {
            handle_key(tui, controller, KeyCode::Char(c));
        }
    }

    fn mount() -> WizardController {
        WizardController::mount(Timings::default(), Arc::new(NullSink))
    }

    #[test]
    fn text_input_edits_multibyte_values() {
        let mut input = TextInput::default();
        for c in "5€x".chars() {
            assert!(input.handle_key(KeyCode::Char(c)));
        }
        assert!(!input.handle_key(KeyCode::Left));
        assert!(input.handle_key(KeyCode::Backspace));
        assert_eq!(input.value, "5x");
        assert!(input.handle_key(KeyCode::Delete));
        assert_eq!(input.value, "5");
        assert!(!input.handle_key(KeyCode::Delete));
        input.handle_key(KeyCode::Home);
        assert!(!input.handle_key(KeyCode::Backspace));
        input.handle_key(KeyCode::Char('$'));
        assert_eq!(input.value, "$5");
    }

    #[test]
    fn start_page_renders_welcome_and_begin_button() {
        let out = smoke("start").unwrap();
        assert!(out.contains("Blueprint Setup"));
        assert!(out.contains("Welcome"));
        assert!(out.contains("[ Let's Begin ]"));
        assert!(out.contains("[ Quit ]"));
    }

    #[test]
    fn empty_answer_hides_confirm_button() {
        let out = smoke("query").unwrap();
        assert!(out.contains("What's your budget like?"));
        assert!(out.contains("$0.00"), "placeholder should show");
        assert!(!out.contains("[ Next ]"));
        assert!(out.contains("[ Quit ]"));
    }

    #[test]
    fn filled_answer_shows_confirm_button() {
        let out = smoke("ready").unwrap();
        assert!(out.contains("1000"));
        assert!(out.contains("[ Next ]"));
    }

    #[test]
    fn last_question_offers_finish() {
        let mut state = seeded_state("query");
        state.question_index = 2;
        state.set_answer(QuestionId::Length, "5");
        let mut tui = TuiState::new();
        tui.input.set("5");
        let out = render_to_string(&state, &tui, 100, 30).unwrap();
        assert!(out.contains("What’s the location length?"));
        assert!(out.contains("[ Finish ]"));
    }

    #[test]
    fn loading_overlay_shows_current_message() {
        let out = smoke("loading").unwrap();
        assert!(out.contains("Bringing together the pieces..."));
        assert!(out.contains("Model Viewer"));
        assert!(!out.contains("[ Finish ]"));
    }

    #[test]
    fn finished_page_hands_params_to_viewer() {
        let out = smoke("finished").unwrap();
        assert!(!out.contains("Bringing together the pieces..."));
        assert!(out.contains("Project - Budget: $1000.00, Location: 25 sqft"));
    }

    #[test]
    fn compact_terminal_renders() {
        let state = seeded_state("loading");
        let tui = TuiState::new();
        assert!(render_to_string(&state, &tui, 70, 22).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn keyboard_walkthrough_collects_answers() {
        let mut controller = mount();
        let mut tui = TuiState::new();

        handle_key(&mut tui, &mut controller, KeyCode::Enter);
        assert_eq!(controller.snapshot().phase, WizardPhase::Query);

        type_text(&mut tui, &mut controller, "10");
        handle_key(&mut tui, &mut controller, KeyCode::Backspace);
        type_text(&mut tui, &mut controller, "000");
        assert_eq!(controller.snapshot().params.budget, "1000");

        handle_key(&mut tui, &mut controller, KeyCode::Enter);
        assert_eq!(controller.snapshot().question_index, 1);
        assert_eq!(tui.input.value, "", "input resets for the next question");

        // Empty answer: Enter does nothing.
        handle_key(&mut tui, &mut controller, KeyCode::Enter);
        assert_eq!(controller.snapshot().question_index, 1);

        type_text(&mut tui, &mut controller, "5");
        handle_key(&mut tui, &mut controller, KeyCode::Enter);
        type_text(&mut tui, &mut controller, "5");
        handle_key(&mut tui, &mut controller, KeyCode::Enter);

        let state = controller.snapshot();
        assert_eq!(state.phase, WizardPhase::Finished);
        assert!(state.loading);
        assert_eq!(state.params.width, "5");
        assert_eq!(state.params.length, "5");

        // Typing after the flow ends changes nothing.
        type_text(&mut tui, &mut controller, "9");
        assert_eq!(controller.snapshot().params.length, "5");
    }

    #[tokio::test(start_paused = true)]
    async fn modifier_chords_do_not_type_into_answer() {
        let mut controller = mount();
        let mut tui = TuiState::new();
        handle_key(&mut tui, &mut controller, KeyCode::Enter);

        handle_key_event(
            &mut tui,
            &mut controller,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        handle_key_event(
            &mut tui,
            &mut controller,
            KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT),
        );
        assert_eq!(controller.snapshot().params.budget, "");
        assert_eq!(tui.input.value, "");

        handle_key_event(
            &mut tui,
            &mut controller,
            KeyEvent::new(KeyCode::Char('$'), KeyModifiers::SHIFT),
        );
        handle_key_event(
            &mut tui,
            &mut controller,
            KeyEvent::new(KeyCode::Char('5'), KeyModifiers::NONE),
        );
        assert_eq!(controller.snapshot().params.budget, "$5");
    }

    #[tokio::test(start_paused = true)]
    async fn quit_requires_confirmation() {
        let mut controller = mount();
        let mut tui = TuiState::new();

        handle_key(&mut tui, &mut controller, KeyCode::Esc);
        assert!(tui.modal.is_some());
        handle_key(&mut tui, &mut controller, KeyCode::Enter);
        assert!(!tui.quit, "No is focused by default");
        assert!(tui.modal.is_none());

        handle_key(&mut tui, &mut controller, KeyCode::Tab);
        handle_key(&mut tui, &mut controller, KeyCode::Enter);
        handle_key(&mut tui, &mut controller, KeyCode::Left);
        handle_key(&mut tui, &mut controller, KeyCode::Enter);
        assert!(tui.quit);
        assert_eq!(controller.snapshot().phase, WizardPhase::Start);
    }

    #[tokio::test(start_paused = true)]
    async fn transition_events_reach_tracker() {
        let (tx, mut rx) = mpsc::unbounded_channel::<WizardEvent>();
        let mut controller = WizardController::mount(Timings::default(), Arc::new(tx));
        let mut tui = TuiState::new();

        handle_key(&mut tui, &mut controller, KeyCode::Enter);
        let now = Instant::now();
        drain_events(&mut tui, &mut rx, now);
        assert!(tui.transitions.is_animating(now));
        assert_eq!(tui.transitions.progress(Slot::Content, now), 0.0);
    }
}
