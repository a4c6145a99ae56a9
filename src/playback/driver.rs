use std::time::{Duration, Instant};

use crate::foundation::error::TelescrollResult;
use crate::playback::scheduler::{Player, TickOutcome};

pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// Source of display refresh events. Returns `false` once the display is gone.
pub trait RefreshSignal {
    fn wait_for_refresh(&mut self) -> bool;
}

/// Sleeps until the next slot of a fixed-period refresh grid.
///
/// Stands in for a display's vsync signal when there is no display. Ticks still read the
/// clock, so a late or early wake changes how many frames are drawn, not the scroll position.
#[derive(Debug)]
pub struct PacedRefresh {
    period: Duration,
    next: Option<Instant>,
}

impl Default for PacedRefresh {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_HZ)
    }
}

impl PacedRefresh {
    pub fn new(hz: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / f64::from(hz.max(1))),
            next: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl RefreshSignal for PacedRefresh {
    fn wait_for_refresh(&mut self) -> bool {
        let now = Instant::now();
        let due = self.next.unwrap_or(now);
        if due > now {
            std::thread::sleep(due - now);
        }
        // Missed slots are dropped rather than replayed in a burst.
        let after = due.max(now) + self.period;
        self.next = Some(after);
        true
    }
}

/// Hands out a fixed number of refreshes, then reports the display as closed.
#[derive(Clone, Copy, Debug)]
pub struct CountedRefresh {
    remaining: u64,
}

impl CountedRefresh {
    pub fn new(count: u64) -> Self {
        Self { remaining: count }
    }
}

impl RefreshSignal for CountedRefresh {
    fn wait_for_refresh(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Run the cooperative tick loop until nothing is pending or the refresh source ends.
///
/// `on_refresh` runs before every tick and may pause, reset, or restart the player.
pub fn drive<F>(
    player: &mut Player,
    refresh: &mut dyn RefreshSignal,
    mut on_refresh: F,
) -> TelescrollResult<u64>
where
    F: FnMut(&mut Player) -> TelescrollResult<()>,
{
    let mut ticks = 0u64;
    while player.pending_tick().is_some() {
        if !refresh.wait_for_refresh() {
            break;
        }
        on_refresh(player)?;
        let Some(handle) = player.pending_tick() else {
            continue;
        };
        match player.tick(handle)? {
            TickOutcome::Rendered { .. } => ticks += 1,
            TickOutcome::Completed => break,
            TickOutcome::Stale => {}
        }
    }
    tracing::debug!(ticks, "tick loop finished");
    Ok(ticks)
}

#[cfg(test)]
#[path = "../../tests/unit/playback/driver.rs"]
mod tests;
