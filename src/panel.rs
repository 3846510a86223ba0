//! # Panel State
//!
//! The single owned state object behind the front panel: tick counter,
//! scheduled futures, the input banks (keys, switches), the output banks
//! (red/green LEDs, hex digits) and the caller's callbacks.
//!
//! ## Tick Model
//!
//! The attached simulation runs in discrete ticks. [`PanelState::advance`]
//! runs one or more ticks; for each one it fires the futures that have
//! come due and then calls the per-tick callback. The panel never
//! increments [`tick`](PanelState::tick) itself: the per-tick callback is
//! expected to do that with [`set_tick`](PanelState::set_tick).
//!
//! ## Callbacks
//!
//! Every callback runs synchronously on the calling thread and must return
//! promptly. While a callback runs it is detached from its slot, so a
//! nested call into the panel from inside it sees that slot as empty. If
//! the callback installs a replacement for its own slot, the replacement
//! is kept.
//!
//! ## Usage
//!
//! ```rust
//! use de2_panel::panel::PanelState;
//!
//! let mut panel = PanelState::new();
//! panel.set_on_tick(|panel, final_step| {
//!     panel.set_tick(panel.tick() + 1);
//!     if final_step {
//!         panel.set_ledr(panel.tick() as u32);
//!     }
//! });
//! panel.advance(100);
//! assert_eq!(panel.ledr(), 100);
//! assert_eq!(panel.cycle_text(), "cycle# 100");
//! ```

use std::fmt;
use std::num::ParseIntError;

use log::{debug, trace, warn};

use crate::components::{HexDisplay, KeyBank, LedBank, LedColor, SwitchBank};
use crate::scheduler::FutureRegistry;
use crate::system_config::{KeyTiming, PanelConfig};
use crate::timing::{RandomDelay, ReleaseDelay};

/// Callback for key, switch and reset notifications.
pub type PanelCallback = Box<dyn FnMut(&mut PanelState)>;
/// Per-tick callback; the flag is true only on the last tick of a batch.
pub type TickCallback = Box<dyn FnMut(&mut PanelState, bool)>;

type Slot = fn(&mut PanelState) -> &mut Option<PanelCallback>;

fn key_slot(panel: &mut PanelState) -> &mut Option<PanelCallback> {
    &mut panel.on_key
}

fn sw_slot(panel: &mut PanelState) -> &mut Option<PanelCallback> {
    &mut panel.on_sw
}

fn reset_slot(panel: &mut PanelState) -> &mut Option<PanelCallback> {
    &mut panel.on_reset
}

pub struct PanelState {
    tick: u64,
    futures: FutureRegistry<PanelState>,

    keys: KeyBank,
    switches: SwitchBank,
    ledr: LedBank,
    ledg: LedBank,
    hex: HexDisplay,
    cycle_text: String,

    key_timing: KeyTiming,
    release_delay: Box<dyn ReleaseDelay>,

    on_key: Option<PanelCallback>,
    on_sw: Option<PanelCallback>,
    on_tick: Option<TickCallback>,
    on_reset: Option<PanelCallback>,
}

impl PanelState {
    /// A DE2-115 sized panel with random key hold times.
    pub fn new() -> Self {
        Self::with_config(&PanelConfig::default())
    }

    pub fn with_config(config: &PanelConfig) -> Self {
        let release_delay: Box<dyn ReleaseDelay> = match config.seed {
            Some(seed) => Box::new(RandomDelay::seeded(seed)),
            None => Box::new(RandomDelay::new()),
        };

        Self {
            tick: 0,
            futures: FutureRegistry::new(),
            keys: KeyBank::new(config.keys),
            switches: SwitchBank::new(config.switches),
            ledr: LedBank::new(config.red_leds, LedColor::Red),
            ledg: LedBank::new(config.green_leds, LedColor::Green),
            hex: HexDisplay::new(config.hex_digits),
            cycle_text: "cycle# --".to_string(),
            key_timing: config.key_timing,
            release_delay,
            on_key: None,
            on_sw: None,
            on_tick: None,
            on_reset: None,
        }
    }

    /// Replace the source of key hold times.
    pub fn with_release_delay(mut self, delay: impl ReleaseDelay + 'static) -> Self {
        self.release_delay = Box::new(delay);
        self
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// Text of the cycle counter, refreshed at the end of each non-empty advance.
    pub fn cycle_text(&self) -> &str {
        &self.cycle_text
    }

    /// Run `count` simulation ticks.
    ///
    /// Each tick fires the due futures, then calls the per-tick callback
    /// with `true` on the last tick only. A zero count does nothing at all.
    pub fn advance(&mut self, count: u64) {
        if count == 0 {
            return;
        }

        for step in 0..count {
            self.fire_due();

            let final_step = step + 1 == count;
            if let Some(mut on_tick) = self.on_tick.take() {
                on_tick(self, final_step);
                if self.on_tick.is_none() {
                    self.on_tick = Some(on_tick);
                }
            }
        }

        self.cycle_text = format!("cycle# {}", self.tick);
        debug!("Advanced {} tick(s), now at tick {}", count, self.tick);
    }

    /// Run every future due at the current tick; returns how many ran.
    pub fn fire_due(&mut self) -> usize {
        let due = self.futures.take_due(self.tick);
        let fired = due.len();
        for future in due {
            future(self);
        }
        if fired > 0 {
            trace!("Fired {} future(s) at tick {}", fired, self.tick);
        }
        fired
    }

    /// Run `future` on the first tick at or after `when`.
    pub fn schedule_future(&mut self, when: u64, future: impl FnOnce(&mut PanelState) + 'static) {
        self.futures.schedule(when, Box::new(future));
    }

    /// Discard every scheduled future without running it. Usually called from the reset callback.
    pub fn clear_futures(&mut self) {
        let dropped = self.futures.len();
        self.futures.clear();
        debug!("Cleared {} pending future(s)", dropped);
    }

    pub fn pending_futures(&self) -> usize {
        self.futures.len()
    }

    pub fn next_future_tick(&self) -> Option<u64> {
        self.futures.next_due()
    }

    /// Push KEY`key` (wrapping onto the available keys).
    ///
    /// The key goes down immediately and a release is scheduled a random
    /// number of ticks ahead. Pushing a key that is already down schedules
    /// a second release without touching the first, so the earlier release
    /// wins and the later one is a harmless repeat.
    pub fn press_key(&mut self, key: u32) {
        let key = self.keys.index(key);
        let delay = self
            .release_delay
            .next_delay(self.key_timing.min_ticks, self.key_timing.max_ticks);
        let release_at = self.tick.saturating_add(delay);

        self.keys.press(key);
        self.schedule_future(release_at, move |panel| panel.release_key(key));
        debug!(
            "KEY{} pressed at tick {}, release at tick {}",
            key, self.tick, release_at
        );

        self.notify(key_slot);
    }

    fn release_key(&mut self, key: u32) {
        self.keys.release(key);
        debug!("KEY{} released at tick {}", key, self.tick);
        self.notify(key_slot);
    }

    /// Flip switch `switch` (bit 0 is the rightmost) and notify.
    pub fn toggle_switch(&mut self, switch: u32) {
        let on = self.switches.toggle(switch);
        debug!("SW{} toggled {}", switch % self.switches.count(), if on { "on" } else { "off" });
        self.notify(sw_slot);
    }

    /// Checkbox-style form of [`toggle_switch`](Self::toggle_switch); only notifies on change.
    pub fn set_switch(&mut self, switch: u32, on: bool) {
        if self.switches.set(switch, on) {
            debug!("SW{} set {}", switch % self.switches.count(), if on { "on" } else { "off" });
            self.notify(sw_slot);
        }
    }

    /// Turn every switch off. No switch notification is sent.
    pub fn clear_switches(&mut self) {
        self.switches.clear();
    }

    /// Hand the reset request to the caller. Nothing is cleared here.
    pub fn reset(&mut self) {
        debug!("Reset requested at tick {}", self.tick);
        self.notify(reset_slot);
    }

    fn notify(&mut self, slot: Slot) {
        if let Some(mut callback) = slot(self).take() {
            callback(self);
            let current = slot(self);
            if current.is_none() {
                *current = Some(callback);
            }
        }
    }

    pub fn set_on_key(&mut self, callback: impl FnMut(&mut PanelState) + 'static) {
        self.on_key = Some(Box::new(callback));
    }

    pub fn set_on_sw(&mut self, callback: impl FnMut(&mut PanelState) + 'static) {
        self.on_sw = Some(Box::new(callback));
    }

    pub fn set_on_tick(&mut self, callback: impl FnMut(&mut PanelState, bool) + 'static) {
        self.on_tick = Some(Box::new(callback));
    }

    pub fn set_on_reset(&mut self, callback: impl FnMut(&mut PanelState) + 'static) {
        self.on_reset = Some(Box::new(callback));
    }

    /// Empty every callback slot. A callback that is running when this is
    /// called goes back into its slot once it returns.
    pub fn clear_callbacks(&mut self) {
        self.on_key = None;
        self.on_sw = None;
        self.on_tick = None;
        self.on_reset = None;
    }

    /// Set the segments of hex digit `index` (wrapping). Digit 0 is the
    /// rightmost; segments are active-low.
    pub fn set_hex(&mut self, index: usize, segments: u8) {
        self.hex.set(index, segments);
    }

    pub fn hex(&self, index: usize) -> u8 {
        self.hex.get(index)
    }

    /// Write `value` in hex across all digits, least significant nibble on digit 0.
    pub fn set_hex_value(&mut self, value: u64) {
        self.hex.show_value(value);
    }

    /// Turn every segment of every digit off.
    pub fn blank_hex(&mut self) {
        self.hex.blank();
    }

    /// Set the red LEDs; bits above the strip width are dropped.
    pub fn set_ledr(&mut self, state: u32) {
        self.ledr.set(state);
    }

    /// Set the green LEDs; bits above the strip width are dropped.
    pub fn set_ledg(&mut self, state: u32) {
        self.ledg.set(state);
    }

    pub fn ledr(&self) -> u32 {
        self.ledr.state()
    }

    pub fn ledg(&self) -> u32 {
        self.ledg.state()
    }

    pub fn ledr_text(&self) -> String {
        self.ledr.label()
    }

    pub fn ledg_text(&self) -> String {
        self.ledg.label()
    }

    /// Packed switch positions, rightmost switch in bit 0.
    pub fn sw(&self) -> u32 {
        self.switches.value()
    }

    pub fn sw_text(&self) -> String {
        self.switches.label()
    }

    /// Packed key state, KEY0 in bit 0.
    pub fn key(&self) -> u32 {
        self.keys.value()
    }

    pub fn hex_display(&self) -> &HexDisplay {
        &self.hex
    }

    pub fn red_leds(&self) -> &LedBank {
        &self.ledr
    }

    pub fn green_leds(&self) -> &LedBank {
        &self.ledg
    }

    pub fn switches(&self) -> &SwitchBank {
        &self.switches
    }

    pub fn keys(&self) -> &KeyBank {
        &self.keys
    }

    pub fn key_timing(&self) -> KeyTiming {
        self.key_timing
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelState")
            .field("tick", &self.tick)
            .field("futures", &self.futures)
            .field("keys", &self.keys)
            .field("switches", &self.switches)
            .field("ledr", &self.ledr)
            .field("ledg", &self.ledg)
            .field("hex", &self.hex)
            .field("key_timing", &self.key_timing)
            .finish_non_exhaustive()
    }
}

/// Parse a typed tick count. Surrounding whitespace is ignored.
pub fn try_parse_tick_entry(input: &str) -> Result<u64, ParseIntError> {
    input.trim().parse::<u64>()
}

/// Parse a typed tick count, treating anything invalid as zero ticks.
pub fn parse_tick_entry(input: &str) -> u64 {
    match try_parse_tick_entry(input) {
        Ok(count) => count,
        Err(e) => {
            warn!("Invalid tick entry value '{}': {}", input, e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::FixedDelay;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn counting_panel() -> PanelState {
        let mut panel = PanelState::new().with_release_delay(FixedDelay::minimum());
        panel.set_on_tick(|panel, _| panel.set_tick(panel.tick() + 1));
        panel
    }

    #[test]
    fn test_initial_state() {
        let panel = PanelState::new();
        assert_eq!(panel.tick(), 0);
        assert_eq!(panel.key(), 0);
        assert_eq!(panel.sw(), 0);
        assert_eq!(panel.ledr(), 0);
        assert_eq!(panel.ledg(), 0);
        assert!((0..8).all(|i| panel.hex(i) == 0xFF));
        assert_eq!(panel.cycle_text(), "cycle# --");
        assert_eq!(panel.pending_futures(), 0);
    }

    #[test]
    fn test_advance_zero_is_noop() {
        let mut panel = counting_panel();
        let fired = Rc::new(RefCell::new(false));
        let flag = fired.clone();
        panel.schedule_future(0, move |_| *flag.borrow_mut() = true);

        panel.advance(0);
        assert!(!*fired.borrow());
        assert_eq!(panel.tick(), 0);
        assert_eq!(panel.cycle_text(), "cycle# --");
    }

    #[test]
    fn test_final_step_flag() {
        let mut panel = PanelState::new();
        let flags = Rc::new(RefCell::new(Vec::new()));
        let seen = flags.clone();
        panel.set_on_tick(move |panel, final_step| {
            panel.set_tick(panel.tick() + 1);
            seen.borrow_mut().push(final_step);
        });

        panel.advance(3);
        assert_eq!(*flags.borrow(), vec![false, false, true]);
        assert_eq!(panel.cycle_text(), "cycle# 3");
    }

    #[test]
    fn test_futures_fire_before_tick_callback() {
        let mut panel = PanelState::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let from_future = order.clone();
        let from_tick = order.clone();
        panel.schedule_future(1, move |_| from_future.borrow_mut().push("future"));
        panel.set_on_tick(move |panel, _| {
            from_tick.borrow_mut().push("tick");
            panel.set_tick(panel.tick() + 1);
        });

        panel.advance(2);
        assert_eq!(*order.borrow(), vec!["tick", "future", "tick"]);
    }

    #[test]
    fn test_future_scheduled_while_draining_waits_one_step() {
        let mut panel = counting_panel();
        let fired_at = Rc::new(RefCell::new(Vec::new()));
        let outer = fired_at.clone();
        panel.schedule_future(2, move |panel| {
            outer.borrow_mut().push(panel.tick());
            let inner = outer.clone();
            panel.schedule_future(2, move |panel| inner.borrow_mut().push(panel.tick()));
        });

        panel.advance(5);
        assert_eq!(*fired_at.borrow(), vec![2, 3]);
        assert_eq!(panel.pending_futures(), 0);
    }

    #[test]
    fn test_press_key_releases_after_minimum() {
        let mut panel = counting_panel();
        panel.press_key(0);
        assert_eq!(panel.key(), 0b0001);
        assert_eq!(panel.next_future_tick(), Some(10));

        panel.advance(10);
        assert_eq!(panel.key(), 0b0001);
        // release fires on the step that observes tick 10
        panel.advance(1);
        assert_eq!(panel.key(), 0);
    }

    #[test]
    fn test_key_index_wraps() {
        let mut panel = counting_panel();
        panel.press_key(6);
        assert_eq!(panel.key(), 0b0100);
    }

    #[test]
    fn test_toggle_switch_notifies() {
        let mut panel = PanelState::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        panel.set_on_sw(move |panel| log.borrow_mut().push(panel.sw()));

        panel.toggle_switch(0);
        panel.toggle_switch(17);
        panel.set_switch(17, true);
        panel.set_switch(0, false);
        assert_eq!(*seen.borrow(), vec![0x00001, 0x20001, 0x20000]);
        assert_eq!(panel.sw_text(), "(0x20000)");
    }

    #[test]
    fn test_reset_only_calls_back() {
        let mut panel = counting_panel();
        panel.toggle_switch(2);
        panel.press_key(1);
        panel.reset();
        assert_eq!(panel.sw(), 0b100);
        assert_eq!(panel.pending_futures(), 1);

        panel.set_on_reset(|panel| {
            panel.set_tick(0);
            panel.clear_futures();
            panel.clear_switches();
        });
        panel.advance(3);
        panel.reset();
        assert_eq!(panel.tick(), 0);
        assert_eq!(panel.sw(), 0);
        assert_eq!(panel.pending_futures(), 0);
    }

    #[test]
    fn test_callback_replacing_itself_is_kept() {
        let mut panel = PanelState::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let first = calls.clone();
        panel.set_on_key(move |panel| {
            first.borrow_mut().push("first");
            let second = first.clone();
            panel.set_on_key(move |_| second.borrow_mut().push("second"));
        });

        panel.press_key(0);
        panel.press_key(1);
        assert_eq!(*calls.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_green_label_reports_green_bank() {
        let mut panel = PanelState::new();
        panel.set_ledr(0x3FFFF);
        panel.set_ledg(0x5);
        assert_eq!(panel.ledr_text(), "(0x3ffff)");
        assert_eq!(panel.ledg_text(), "(0x005)");
    }

    #[test]
    fn test_parse_tick_entry() {
        assert_eq!(parse_tick_entry("42"), 42);
        assert_eq!(parse_tick_entry("  7 "), 7);
        assert_eq!(parse_tick_entry("abc"), 0);
        assert_eq!(parse_tick_entry("-3"), 0);
        assert_eq!(parse_tick_entry(""), 0);
        assert!(try_parse_tick_entry("x").is_err());
    }
}
