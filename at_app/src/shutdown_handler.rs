use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

const POLL_SLICE: Duration = Duration::from_millis(200);

/// Running flag cleared by Ctrl+C
#[derive(Clone, Debug)]
pub struct ShutdownFlag {
    running: Arc<AtomicBool>,
}

impl Default for ShutdownFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self { running: Arc::new(AtomicBool::new(true)) }
    }

    /// Create a flag and install the Ctrl+C handler that clears it
    pub fn install() -> Result<Self, ctrlc::Error> {
        let flag = Self::new();
        let running = flag.running.clone();
        ctrlc::set_handler(move || {
            tracing::info!("Shutdown signal received");
            running.store(false, Ordering::Relaxed);
        })?;
        Ok(flag)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn trigger(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Sleep up to `duration`, waking early on shutdown; returns whether still running
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        while self.is_running() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep(POLL_SLICE.min(deadline - now));
        }
        self.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_shared_between_clones() {
        let flag = ShutdownFlag::new();
        let clone = flag.clone();
        assert!(flag.is_running());

        clone.trigger();
        assert!(!flag.is_running());
    }

    #[test]
    fn test_sleep_wakes_on_shutdown() {
        let flag = ShutdownFlag::new();
        let trigger = flag.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            trigger.trigger();
        });

        let started = Instant::now();
        assert!(!flag.sleep(Duration::from_secs(30)));
        assert!(started.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
    }

    #[test]
    fn test_sleep_runs_to_deadline() {
        let flag = ShutdownFlag::new();
        assert!(flag.sleep(Duration::from_millis(20)));
    }
}
