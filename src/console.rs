//! # Console Interface Module
//!
//! Terminal front panel for hosts without a display server. Draws the hex
//! digits as segment art, the LED banks, switches and keys, and drives the
//! panel from the keyboard.
//!
//! ## Controls
//! - `Left`/`Right` select a switch, `Space` toggles it while no command
//!   is being typed
//! - `F1`-`F4` push KEY0-KEY3
//! - `Tab` runs a single tick
//! - Typed commands, executed with `Enter`: `t<n>` (tick n), `k<n>` (push
//!   KEY n), `s<n>` (toggle SW n), `reset`, `help`, `quit`

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use serde::{Deserialize, Serialize};
use std::io;
use std::time::{Duration, Instant};

use crate::components::{HexDisplay, LedBank, LedColor, Segment};
use crate::panel::{parse_tick_entry, PanelState};

/// Console configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub refresh_rate_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 50,
            poll_interval_ms: 10,
        }
    }
}

/// A typed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tick(u64),
    PushKey(u32),
    ToggleSwitch(u32),
    Reset,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a command line such as `t100`, `tick 5`, `k2` or `reset`.
    pub fn parse(input: &str) -> Option<Command> {
        let original = input.trim();
        if original.is_empty() {
            return None;
        }
        let input = original.to_lowercase();

        let split = input
            .find(|c: char| c.is_ascii_digit() || c.is_whitespace())
            .unwrap_or(input.len());
        let (verb, arg) = input.split_at(split);
        let arg = arg.trim();

        let command = match verb {
            "q" | "quit" | "exit" => Command::Quit,
            "h" | "help" => Command::Help,
            "reset" => Command::Reset,
            "t" | "tick" => Command::Tick(if arg.is_empty() {
                1
            } else {
                parse_tick_entry(arg)
            }),
            "k" | "key" => match arg.parse() {
                Ok(key) => Command::PushKey(key),
                Err(_) => Command::Unknown(original.to_string()),
            },
            "s" | "sw" => match arg.parse() {
                Ok(switch) => Command::ToggleSwitch(switch),
                Err(_) => Command::Unknown(original.to_string()),
            },
            _ => Command::Unknown(original.to_string()),
        };
        Some(command)
    }
}

/// Console UI application state
pub struct ConsoleApp {
    panel: PanelState,
    config: ConsoleConfig,
    running: bool,
    command_buffer: String,
    show_help: bool,
    selected_switch: u32,
    message: Option<String>,
}

impl ConsoleApp {
    pub fn new(panel: PanelState, config: ConsoleConfig) -> Self {
        Self {
            panel,
            config,
            running: false,
            command_buffer: String::new(),
            show_help: false,
            selected_switch: 0,
            message: None,
        }
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Setup terminal
        enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.running = true;
        let mut last_draw: Option<Instant> = None;
        let refresh = Duration::from_millis(self.config.refresh_rate_ms);
        let poll = Duration::from_millis(self.config.poll_interval_ms);

        // Main event loop
        while self.running {
            if let Ok(true) = event::poll(poll) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key.code);
                    }
                }
            }

            let due = last_draw.map_or(true, |at| at.elapsed() >= refresh);
            if due {
                if let Err(e) = terminal.draw(|f| self.draw_ui(f)) {
                    log::error!("Failed to draw console UI: {}", e);
                    break;
                }
                last_draw = Some(Instant::now());
            }
        }

        // Restore terminal
        disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;
        terminal
            .show_cursor()
            .map_err(|e| format!("Failed to show cursor: {}", e))?;

        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyCode) {
        if self.show_help && key != KeyCode::Esc {
            self.show_help = false;
            return;
        }

        match key {
            KeyCode::Esc => {
                debug!("Quit key pressed, stopping console");
                self.running = false;
            }
            KeyCode::Left => {
                let count = self.panel.switches().count();
                self.selected_switch = (self.selected_switch + 1) % count;
            }
            KeyCode::Right => {
                let count = self.panel.switches().count();
                self.selected_switch = (self.selected_switch + count - 1) % count;
            }
            KeyCode::Char(' ') if self.command_buffer.is_empty() => {
                self.panel.toggle_switch(self.selected_switch);
            }
            KeyCode::F(n @ 1..=4) => {
                self.panel.press_key(u32::from(n) - 1);
            }
            KeyCode::Tab => {
                self.panel.advance(1);
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.command_buffer);
                if let Some(command) = Command::parse(&line) {
                    self.execute_command(command);
                }
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    self.command_buffer.push(c);
                }
            }
            _ => {}
        }
    }

    pub fn execute_command(&mut self, command: Command) {
        debug!("Executing console command: {:?}", command);
        self.message = None;

        match command {
            Command::Quit => self.running = false,
            Command::Help => self.show_help = true,
            Command::Reset => self.panel.reset(),
            Command::Tick(count) => self.panel.advance(count),
            Command::PushKey(key) => self.panel.press_key(key),
            Command::ToggleSwitch(switch) => {
                self.selected_switch = switch % self.panel.switches().count();
                self.panel.toggle_switch(switch);
            }
            Command::Unknown(text) => {
                self.message = Some(format!(
                    "Unknown command '{}' (try t<n>, k<n>, s<n>, reset, help, quit)",
                    text
                ));
            }
        }
    }

    fn draw_ui(&self, f: &mut Frame) {
        let size = f.size();

        if self.show_help {
            self.draw_help_screen(f);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Hex displays
                Constraint::Length(4), // LEDs
                Constraint::Length(4), // Switches and keys
                Constraint::Length(3), // Status
                Constraint::Min(3),    // Command bar
            ])
            .split(size);

        let hex = Paragraph::new(hex_lines(self.panel.hex_display()))
            .block(Block::default().borders(Borders::ALL).title("HEX"));
        f.render_widget(hex, chunks[0]);

        let leds = Paragraph::new(vec![
            led_line(self.panel.red_leds()),
            led_line(self.panel.green_leds()),
        ])
        .block(Block::default().borders(Borders::ALL).title("LEDs"));
        f.render_widget(leds, chunks[1]);

        self.draw_inputs(f, chunks[2]);

        let mut status = vec![
            Span::styled(
                self.panel.cycle_text().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("   pending futures: {}", self.panel.pending_futures())),
        ];
        if let Some(message) = &self.message {
            status.push(Span::styled(
                format!("   {}", message),
                Style::default().fg(Color::Yellow),
            ));
        }
        let status = Paragraph::new(Line::from(status))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status, chunks[3]);

        let command_text = if self.command_buffer.is_empty() {
            "Enter command (type 'help' for help)..."
        } else {
            self.command_buffer.as_str()
        };
        let command_bar = Paragraph::new(command_text)
            .style(Style::default().fg(Color::White))
            .block(Block::default().borders(Borders::ALL).title("Command"));
        f.render_widget(command_bar, chunks[4]);
    }

    fn draw_inputs(&self, f: &mut Frame, area: Rect) {
        let switches = self.panel.switches();
        let mut switch_spans = vec![Span::raw("SW:   ")];
        for switch in (0..switches.count()).rev() {
            let glyph = if switches.is_on(switch) { "▲" } else { "▽" };
            let mut style = Style::default();
            if switch == self.selected_switch {
                style = style.add_modifier(Modifier::REVERSED);
            }
            switch_spans.push(Span::styled(glyph, style));
        }
        switch_spans.push(Span::raw(format!(" {}", self.panel.sw_text())));

        let keys = self.panel.keys();
        let mut key_spans = vec![Span::raw("KEY:  ")];
        for key in (0..keys.count()).rev() {
            let style = if keys.is_pressed(key) {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default()
            };
            key_spans.push(Span::styled(format!("[KEY{}]", key), style));
            key_spans.push(Span::raw(" "));
        }

        let inputs = Paragraph::new(vec![Line::from(switch_spans), Line::from(key_spans)])
            .block(Block::default().borders(Borders::ALL).title("Inputs"));
        f.render_widget(inputs, area);
    }

    fn draw_help_screen(&self, f: &mut Frame) {
        let size = f.size();
        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(keys, Style::default().fg(Color::Yellow)),
                Span::raw(what),
            ])
        };
        let help_text = vec![
            Line::from(vec![Span::styled(
                "DE2 Front Panel Console Help",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            entry("  Left/Right", " - Select switch"),
            entry("  Space", " - Toggle selected switch (empty command line)"),
            entry("  F1-F4", " - Push KEY0-KEY3"),
            entry("  Tab", " - Run one tick"),
            entry("  Esc", " - Quit"),
            Line::from(""),
            entry("  t<n>, tick <n>", " - Run n ticks"),
            entry("  k<n>", " - Push KEY n"),
            entry("  s<n>", " - Toggle SW n"),
            entry("  reset", " - Request a reset"),
            entry("  q, quit", " - Quit"),
            Line::from(""),
            Line::from(vec![Span::raw("Press any key to return to main view...")]),
        ];

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, size);
    }
}

/// Three text rows of segment art, digit 0 rightmost.
pub fn hex_lines(hex: &HexDisplay) -> Vec<Line<'static>> {
    let mut rows = [String::new(), String::new(), String::new()];
    for index in (0..hex.len()).rev() {
        let lit = |segment: Segment, on: char| {
            if hex.is_lit(index, segment) {
                on
            } else {
                ' '
            }
        };
        rows[0].push_str(&format!(" {}  ", lit(Segment::Top, '_')));
        rows[1].push_str(&format!(
            "{}{}{} ",
            lit(Segment::UpperLeft, '|'),
            lit(Segment::Middle, '_'),
            lit(Segment::UpperRight, '|')
        ));
        rows[2].push_str(&format!(
            "{}{}{} ",
            lit(Segment::LowerLeft, '|'),
            lit(Segment::Bottom, '_'),
            lit(Segment::LowerRight, '|')
        ));
    }

    let style = Style::default().fg(Color::Red);
    rows.into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect()
}

/// One LED bank as a row of dots, highest bit on the left.
pub fn led_line(leds: &LedBank) -> Line<'static> {
    let color = match leds.color() {
        LedColor::Red => Color::Red,
        LedColor::Green => Color::Green,
    };
    let dots: String = (0..leds.count())
        .rev()
        .map(|bit| if leds.is_lit(bit) { '●' } else { '○' })
        .collect();

    Line::from(vec![
        Span::raw(format!("{}: ", leds.color().label())),
        Span::styled(dots, Style::default().fg(color)),
        Span::raw(format!(" {}", leds.label())),
    ])
}

/// Public interface for launching the console
pub fn run_console(
    panel: PanelState,
    config: ConsoleConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = ConsoleApp::new(panel, config);
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::hex_display::glyph;
    use crate::timing::FixedDelay;

    fn app() -> ConsoleApp {
        let mut panel = PanelState::new().with_release_delay(FixedDelay::minimum());
        panel.set_on_tick(|panel, _| panel.set_tick(panel.tick() + 1));
        ConsoleApp::new(panel, ConsoleConfig::default())
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("t100"), Some(Command::Tick(100)));
        assert_eq!(Command::parse("tick 5"), Some(Command::Tick(5)));
        assert_eq!(Command::parse("t"), Some(Command::Tick(1)));
        assert_eq!(Command::parse("k2"), Some(Command::PushKey(2)));
        assert_eq!(Command::parse("S17"), Some(Command::ToggleSwitch(17)));
        assert_eq!(Command::parse("reset"), Some(Command::Reset));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("   "), None);
        assert_eq!(
            Command::parse("frobnicate"),
            Some(Command::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_unknown_command_keeps_typed_case() {
        assert_eq!(
            Command::parse("  FrobNicate 3 "),
            Some(Command::Unknown("FrobNicate 3".to_string()))
        );
        assert_eq!(
            Command::parse("K9x"),
            Some(Command::Unknown("K9x".to_string()))
        );
    }

    #[test]
    fn test_space_inside_command_is_text() {
        let mut app = app();
        for c in "tick 5".chars() {
            app.handle_key_event(KeyCode::Char(c));
        }
        app.handle_key_event(KeyCode::Enter);

        assert_eq!(app.panel().sw(), 0);
        assert_eq!(app.panel().tick(), 5);
        assert_eq!(app.panel().cycle_text(), "cycle# 5");
    }

    #[test]
    fn test_invalid_tick_count_runs_nothing() {
        assert_eq!(Command::parse("tick 9x"), Some(Command::Tick(0)));
    }

    #[test]
    fn test_typed_commands_drive_panel() {
        let mut app = app();
        for c in "k0".chars() {
            app.handle_key_event(KeyCode::Char(c));
        }
        app.handle_key_event(KeyCode::Enter);
        assert_eq!(app.panel().key(), 1);

        app.execute_command(Command::Tick(11));
        assert_eq!(app.panel().tick(), 11);
        assert_eq!(app.panel().key(), 0);
        assert_eq!(app.panel().cycle_text(), "cycle# 11");
    }

    #[test]
    fn test_switch_cursor() {
        let mut app = app();
        app.handle_key_event(KeyCode::Left);
        app.handle_key_event(KeyCode::Char(' '));
        assert_eq!(app.panel().sw(), 0b10);

        app.handle_key_event(KeyCode::Right);
        app.handle_key_event(KeyCode::Right);
        app.handle_key_event(KeyCode::Char(' '));
        // wrapped around to SW17
        assert_eq!(app.panel().sw(), 0x20002);
    }

    #[test]
    fn test_function_keys_and_tab() {
        let mut app = app();
        app.handle_key_event(KeyCode::F(4));
        assert_eq!(app.panel().key(), 0b1000);
        app.handle_key_event(KeyCode::Tab);
        assert_eq!(app.panel().tick(), 1);
    }

    #[test]
    fn test_hex_art() {
        let mut hex = HexDisplay::new(1);
        hex.set(0, glyph(8));
        let lines = hex_lines(&hex);
        let text: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text, vec![" _  ", "|_| ", "|_| "]);
    }

    #[test]
    fn test_led_line() {
        let mut leds = LedBank::new(4, LedColor::Green);
        leds.set(0b0011);
        let line = led_line(&leds);
        assert_eq!(line.spans[1].content, "○○●●");
        assert_eq!(line.spans[2].content, " (0x3)");
    }
}
