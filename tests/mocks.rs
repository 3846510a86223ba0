//! Mock implementations for testing the front panel
//!
//! Recording callbacks that log every notification the panel sends, and a
//! scripted release-delay source for pinning key hold times.

#![allow(dead_code)]

use de2_panel::{PanelState, ReleaseDelay};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A notification observed by the recording callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Key-changed callback with the key bank value at that moment
    Key(u32),
    /// Switch-changed callback with the switch bank value
    Switch(u32),
    /// Per-tick callback, with the tick observed before incrementing it
    Tick { tick: u64, final_step: bool },
    Reset,
    /// A test future identified by its label
    Future(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Panel whose callbacks record every notification. The tick callback
/// advances the tick counter by one, as a simulation would.
pub fn recording_panel(delay: impl ReleaseDelay + 'static) -> (PanelState, EventLog) {
    let mut panel = PanelState::new().with_release_delay(delay);
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));

    let events = log.clone();
    panel.set_on_key(move |panel| events.borrow_mut().push(Event::Key(panel.key())));

    let events = log.clone();
    panel.set_on_sw(move |panel| events.borrow_mut().push(Event::Switch(panel.sw())));

    let events = log.clone();
    panel.set_on_tick(move |panel, final_step| {
        events.borrow_mut().push(Event::Tick {
            tick: panel.tick(),
            final_step,
        });
        panel.set_tick(panel.tick() + 1);
    });

    let events = log.clone();
    panel.set_on_reset(move |panel| {
        events.borrow_mut().push(Event::Reset);
        panel.set_tick(0);
        panel.clear_futures();
        panel.clear_switches();
    });

    (panel, log)
}

/// Schedule a future that records `Event::Future(label)` when it fires.
pub fn schedule_marker(panel: &mut PanelState, log: &EventLog, when: u64, label: u32) {
    let events = log.clone();
    panel.schedule_future(when, move |_| events.borrow_mut().push(Event::Future(label)));
}

pub fn count_ticks(log: &EventLog) -> usize {
    log.borrow()
        .iter()
        .filter(|e| matches!(e, Event::Tick { .. }))
        .count()
}

pub fn futures_fired(log: &EventLog) -> Vec<u32> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Future(label) => Some(*label),
            _ => None,
        })
        .collect()
}

/// Release delays handed out in order, falling back to the minimum when exhausted
#[derive(Debug, Default)]
pub struct ScriptedDelay {
    delays: VecDeque<u64>,
}

impl ScriptedDelay {
    pub fn new(delays: &[u64]) -> Self {
        Self {
            delays: delays.iter().copied().collect(),
        }
    }
}

impl ReleaseDelay for ScriptedDelay {
    fn next_delay(&mut self, min: u64, _span: u64) -> u64 {
        self.delays.pop_front().unwrap_or(min)
    }
}
