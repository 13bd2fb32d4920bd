/// Wall-clock seconds since the Unix epoch. A port so the reaper's expiry
/// arithmetic is testable against a settable clock.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}
