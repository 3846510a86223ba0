//! # GUI Module
//!
//! This module provides the desktop front panel: the egui window that draws
//! the hex displays, LED banks, switches and keys of a [`PanelState`] and
//! feeds clicks back into it.

pub mod components;
pub mod state;

use crate::panel::PanelState;
use eframe::egui;

/// Main GUI application structure
///
/// Owns the panel outright; every callback the simulation installed on the
/// panel runs on the GUI thread from inside `update`.
pub struct FrontPanelApp {
    /// The panel being displayed and driven
    panel: PanelState,
    /// Window heading
    title: String,
    /// GUI-specific state management
    gui_state: state::GuiState,
    /// Container for all GUI components
    components: components::GuiComponents,
}

impl FrontPanelApp {
    /// Create a new GUI application around `panel`
    ///
    /// # Arguments
    /// * `panel` - Panel with the simulation's callbacks already installed
    /// * `title` - Heading shown above the board
    pub fn new(panel: PanelState, title: impl Into<String>) -> Self {
        Self {
            panel,
            title: title.into(),
            gui_state: state::GuiState::new(),
            components: components::GuiComponents::new(),
        }
    }

    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelState {
        &mut self.panel
    }

    /// Render the complete GUI interface
    ///
    /// # Layout Structure
    /// - Hex displays
    /// - LEDR and LEDG banks with their hex readouts
    /// - Switches and keys
    /// - Tick controls and status line
    fn render_gui(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            ui.separator();

            self.components.render_outputs(ui, &self.panel);
            ui.separator();
            self.components.render_inputs(ui, &mut self.panel);
            ui.separator();
            self.components
                .render_tick_controls(ui, &mut self.panel, &mut self.gui_state);
        });
    }
}

impl eframe::App for FrontPanelApp {
    /// The board only changes in response to input, so no continuous repaint is requested.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_gui(ctx);
    }
}

/// Run the desktop front panel until its window is closed
///
/// # Arguments
/// * `panel` - Panel with the simulation's callbacks installed
/// * `title` - Window and heading title
///
/// # Errors
/// Returns an error if eframe cannot create a window (for example when no
/// display server is available).
pub fn run_gui(panel: PanelState, title: &str) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 360.0])
            .with_title(title),
        ..Default::default()
    };

    let heading = title.to_string();
    eframe::run_native(
        title,
        options,
        Box::new(move |_cc| Box::new(FrontPanelApp::new(panel, heading))),
    )
}
