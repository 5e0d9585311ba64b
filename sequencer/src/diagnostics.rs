use chrono::TimeDelta;
use clock::Timestamp;

/// Time-based rate limit for diagnostics that would otherwise fire every tick.
///
/// `hit` returns `Some(suppressed)` when a message may be logged, carrying the
/// number of events swallowed since the last one.
#[derive(Debug, Clone)]
pub struct DiagnosticThrottle {
    interval: TimeDelta,
    last: Option<Timestamp>,
    suppressed: u64,
}

impl DiagnosticThrottle {
    pub fn new(interval: TimeDelta) -> Self {
        DiagnosticThrottle {
            interval,
            last: None,
            suppressed: 0,
        }
    }

    pub fn hit(&mut self, now: Timestamp) -> Option<u64> {
        match self.last {
            Some(last) if now - last < self.interval => {
                self.suppressed += 1;
                None
            }
            _ => {
                self.last = Some(now);
                Some(std::mem::take(&mut self.suppressed))
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.suppressed = 0;
    }
}
