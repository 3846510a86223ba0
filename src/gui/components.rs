//! # GUI Components Module
//!
//! This module implements the individual sections of the desktop front panel.
//! Each component renders one strip of the board and forwards user input to
//! the panel's input router or tick driver.
//!
//! ## Component Architecture
//!
//! - **`GuiComponents`**: Main container managing all components
//! - **`HexView`**: The row of seven-segment displays
//! - **`LedStrip`**: One LED bank plus its hex readout
//! - **`SwitchRow`**: Toggle switches as checkboxes
//! - **`KeyRow`**: Momentary KEY push-buttons
//! - **`TickControls`**: Cycle counter, tick buttons, tick entry and reset
//!
//! ## Design Principles
//!
//! Components own no board state. Display components read the panel
//! through its read-only views; input components call back into
//! `PanelState`, which runs the caller's callbacks synchronously before
//! the frame finishes.

use super::state::GuiState;
use crate::components::{HexDisplay, LedBank, LedColor, Segment};
use crate::panel::PanelState;
use eframe::egui;

const RED_ACTIVE: egui::Color32 = egui::Color32::from_rgb(200, 25, 25);
const RED_INACTIVE: egui::Color32 = egui::Color32::from_rgba_premultiplied(6, 4, 4, 64);
const GREEN_ACTIVE: egui::Color32 = egui::Color32::from_rgb(25, 200, 25);
const GREEN_INACTIVE: egui::Color32 = egui::Color32::from_rgba_premultiplied(4, 6, 4, 64);

const HEX_HEIGHT: f32 = 75.0;
const HEX_WIDTH: f32 = HEX_HEIGHT * (7.5 / 14.0);
const HEX_PADDING: f32 = 4.0;
const HEX_SLANT: f32 = 0.1 * HEX_WIDTH;
const HEX_STROKE: f32 = 0.1 * HEX_WIDTH;
const HEX_V_LENGTH: f32 = (9.14 / 28.0) * HEX_HEIGHT;
const HEX_H_LENGTH: f32 = (4.8 / 7.5) * HEX_WIDTH;

const LED_RADIUS: f32 = 6.0;
const LED_BOX: f32 = 2.0 * LED_RADIUS + 4.0;

fn colors(color: LedColor) -> (egui::Color32, egui::Color32) {
    match color {
        LedColor::Red => (RED_ACTIVE, RED_INACTIVE),
        LedColor::Green => (GREEN_ACTIVE, GREEN_INACTIVE),
    }
}

/// Container for all GUI components
///
/// Acts as a facade over the individual panel sections so the application
/// only has to call one render method per row of the board.
pub struct GuiComponents {
    hex_view: HexView,
    red_leds: LedStrip,
    green_leds: LedStrip,
    switch_row: SwitchRow,
    key_row: KeyRow,
    tick_controls: TickControls,
}

impl GuiComponents {
    /// Create a new GUI components container with all components initialized
    pub fn new() -> Self {
        Self {
            hex_view: HexView,
            red_leds: LedStrip::new(LedColor::Red),
            green_leds: LedStrip::new(LedColor::Green),
            switch_row: SwitchRow,
            key_row: KeyRow,
            tick_controls: TickControls::new(),
        }
    }

    /// Render the output side of the board: hex digits and both LED banks
    ///
    /// # Arguments
    /// * `ui` - egui UI context for rendering
    /// * `panel` - Panel state to display
    pub fn render_outputs(&self, ui: &mut egui::Ui, panel: &PanelState) {
        self.hex_view.render(ui, panel.hex_display());
        self.red_leds.render(ui, panel.red_leds());
        self.green_leds.render(ui, panel.green_leds());
    }

    /// Render the switches and keys, routing any interaction to the panel
    ///
    /// # Arguments
    /// * `ui` - egui UI context for rendering
    /// * `panel` - Panel state receiving switch toggles and key presses
    ///
    /// Returns the KEY button responses in drawing order, highest key first.
    pub fn render_inputs(
        &mut self,
        ui: &mut egui::Ui,
        panel: &mut PanelState,
    ) -> Vec<egui::Response> {
        self.switch_row.render(ui, panel);
        self.key_row.render(ui, panel)
    }

    /// Render the tick controls and status line
    ///
    /// # Arguments
    /// * `ui` - egui UI context for rendering
    /// * `panel` - Panel state driven by the tick buttons
    /// * `state` - GUI state holding the tick entry text
    pub fn render_tick_controls(
        &mut self,
        ui: &mut egui::Ui,
        panel: &mut PanelState,
        state: &mut GuiState,
    ) -> TickResponses {
        self.tick_controls.render(ui, panel, state)
    }
}

impl Default for GuiComponents {
    fn default() -> Self {
        Self::new()
    }
}

/// Row of seven-segment displays, digit 0 drawn rightmost
pub struct HexView;

impl HexView {
    pub fn render(&self, ui: &mut egui::Ui, hex: &HexDisplay) {
        ui.horizontal(|ui| {
            for index in (0..hex.len()).rev() {
                Self::paint_digit(ui, hex, index);
            }
        });
    }

    fn paint_digit(ui: &mut egui::Ui, hex: &HexDisplay, index: usize) {
        let size = egui::vec2(HEX_WIDTH + 2.0 * HEX_PADDING, HEX_HEIGHT);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let origin = response.rect.min + egui::vec2(HEX_PADDING, HEX_PADDING);
        let point = |x: f32, y: f32| origin + egui::vec2(x, y);

        // Slanted like the real displays: top bar shifted right, bottom bar left
        let top = HEX_WIDTH / 2.0 + HEX_SLANT;
        let middle = HEX_WIDTH / 2.0;
        let bottom = HEX_WIDTH / 2.0 - HEX_SLANT;
        let half = HEX_H_LENGTH / 2.0;

        let top_left = point(top - half, 0.0);
        let top_right = point(top + half, 0.0);
        let mid_left = point(middle - half, HEX_V_LENGTH);
        let mid_right = point(middle + half, HEX_V_LENGTH);
        let bottom_left = point(bottom - half, 2.0 * HEX_V_LENGTH);
        let bottom_right = point(bottom + half, 2.0 * HEX_V_LENGTH);

        let ends = [
            (top_left, top_right),
            (top_right, mid_right),
            (mid_right, bottom_right),
            (bottom_right, bottom_left),
            (bottom_left, mid_left),
            (mid_left, top_left),
            (mid_left, mid_right),
        ];

        for (segment, (from, to)) in Segment::ALL.into_iter().zip(ends) {
            let color = if hex.is_lit(index, segment) {
                RED_ACTIVE
            } else {
                RED_INACTIVE
            };
            painter.line_segment([from, to], egui::Stroke::new(HEX_STROKE, color));
        }
    }
}

/// One LED bank drawn as a row of circles, highest bit on the left
pub struct LedStrip {
    color: LedColor,
}

impl LedStrip {
    pub fn new(color: LedColor) -> Self {
        Self { color }
    }

    pub fn render(&self, ui: &mut egui::Ui, leds: &LedBank) {
        let (on, off) = colors(self.color);
        let count = leds.count();

        ui.horizontal(|ui| {
            ui.label(format!("{}:", self.color.label()));

            let size = egui::vec2(count as f32 * LED_BOX, LED_BOX);
            let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
            for position in 0..count {
                let bit = count - 1 - position;
                let center = response.rect.min
                    + egui::vec2(
                        position as f32 * LED_BOX + LED_BOX / 2.0,
                        LED_BOX / 2.0,
                    );
                let color = if leds.is_lit(bit) { on } else { off };
                painter.circle_filled(center, LED_RADIUS, color);
            }

            ui.label(egui::RichText::new(leds.label()).monospace());
        });
    }
}

/// Toggle switches, SW17 on the left down to SW0 on the right
pub struct SwitchRow;

impl SwitchRow {
    pub fn render(&self, ui: &mut egui::Ui, panel: &mut PanelState) {
        ui.horizontal(|ui| {
            ui.label("SW:");
            for switch in (0..panel.switches().count()).rev() {
                let mut on = panel.switches().is_on(switch);
                if ui.checkbox(&mut on, "").changed() {
                    panel.set_switch(switch, on);
                }
            }
            ui.label(egui::RichText::new(panel.sw_text()).monospace());
        });
    }
}

/// KEY push-buttons, KEY3 on the left down to KEY0 on the right
pub struct KeyRow;

impl KeyRow {
    pub fn render(&self, ui: &mut egui::Ui, panel: &mut PanelState) -> Vec<egui::Response> {
        ui.horizontal(|ui| {
            let mut buttons = Vec::new();
            for key in (0..panel.keys().count()).rev() {
                let pressed = panel.keys().is_pressed(key);
                let button = egui::Button::new(format!("KEY{}", key)).selected(pressed);
                let response = ui.add(button);
                if response.clicked() {
                    panel.press_key(key);
                }
                buttons.push(response);
            }
            buttons
        })
        .inner
    }
}

/// Button responses from one frame of [`TickControls`]
pub struct TickResponses {
    /// One per batch size, in the order they are drawn
    pub batches: Vec<egui::Response>,
    pub tick_n: egui::Response,
    pub reset: egui::Response,
}

/// Cycle counter with the tick buttons, tick entry and reset
pub struct TickControls {
    /// Fixed batch sizes offered as buttons
    batches: [u64; 3],
}

impl TickControls {
    pub fn new() -> Self {
        Self {
            batches: [1, 10, 100],
        }
    }

    /// Render the tick controls
    ///
    /// # Layout
    /// ```text
    /// cycle# 42 [Tick 1] [Tick 10] [Tick 100] n=[____] [Tick N] [Reset]
    /// pending futures: 1 (next at tick 57)
    /// ```
    pub fn render(
        &mut self,
        ui: &mut egui::Ui,
        panel: &mut PanelState,
        state: &mut GuiState,
    ) -> TickResponses {
        let responses = ui
            .horizontal(|ui| {
                ui.label(egui::RichText::new(panel.cycle_text()).monospace());

                let mut batches = Vec::with_capacity(self.batches.len());
                for count in self.batches {
                    let response = ui.button(format!("Tick {}", count));
                    if response.clicked() {
                        panel.advance(count);
                    }
                    batches.push(response);
                }

                ui.label("n=");
                let entry = egui::TextEdit::singleline(&mut state.tick_entry).desired_width(60.0);
                if ui.add(entry).changed() {
                    state.tick_entry_changed();
                }
                let tick_n = ui.button("Tick N");
                if tick_n.clicked() {
                    panel.advance(state.tick_entry_value());
                }

                let reset = ui.button("Reset");
                if reset.clicked() {
                    panel.reset();
                }

                TickResponses {
                    batches,
                    tick_n,
                    reset,
                }
            })
            .inner;

        ui.horizontal(|ui| {
            let pending = match panel.next_future_tick() {
                Some(next) => format!(
                    "pending futures: {} (next at tick {})",
                    panel.pending_futures(),
                    next
                ),
                None => "pending futures: 0".to_string(),
            };
            ui.label(pending);

            if let Some(error) = state.get_error() {
                ui.colored_label(egui::Color32::RED, error);
            }
        });

        responses
    }
}

impl Default for TickControls {
    fn default() -> Self {
        Self::new()
    }
}
