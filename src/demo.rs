//! Demo wiring for the panel binary.
//!
//! Stands in for a real simulation: the tick counter is shown on the red
//! LEDs and the hex digits, the keys are mirrored onto the low green LEDs,
//! and the switches onto the high green LEDs.

use log::info;

use crate::panel::PanelState;

/// Install the demo callbacks on `panel`, replacing any existing ones.
pub fn install(panel: &mut PanelState) {
    panel.set_on_key(|panel| {
        info!("KEY changed, key state is: 0x{:x}", panel.key());
        show_inputs(panel);
    });

    panel.set_on_sw(|panel| {
        info!("SW changed, switch state is 0x{:x}", panel.sw());
        show_inputs(panel);
    });

    // The panel never advances the tick counter on its own.
    panel.set_on_tick(|panel, final_step| {
        panel.set_tick(panel.tick() + 1);
        if final_step {
            let tick = panel.tick();
            panel.set_ledr(tick as u32);
            panel.set_hex_value(tick);
        }
    });

    panel.set_on_reset(|panel| {
        panel.set_tick(0);
        panel.set_ledr(0);
        panel.set_ledg(0);
        panel.clear_futures();
        panel.clear_switches();
        panel.blank_hex();
        info!("Panel reset");
    });
}

fn show_inputs(panel: &mut PanelState) {
    let keys = panel.key() & 0xF;
    let switches = panel.sw() & 0x1F;
    panel.set_ledg(keys | (switches << 4));
}
