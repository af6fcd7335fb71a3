//! Time source abstraction for real, simulated and manually driven time.
//!
//! The schedule engine never reads the system clock directly. It is handed a
//! [`TimeSource`], which lets the same code run against the wall clock, an
//! accelerated simulation (to watch a date rollover happen in seconds), or a
//! clock that tests move by hand.

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;

/// Global time source used for log timestamps, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current instant
    fn now(&self) -> DateTime<Utc>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    /// Check if this is a simulated time source
    fn is_simulated(&self) -> bool;

    /// Check if simulation has ended (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn to_chrono(duration: StdDuration) -> ChronoDuration {
    ChronoDuration::from_std(duration).unwrap_or_else(|_| ChronoDuration::MAX)
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time source for time-accelerated execution.
///
/// This implementation supports two modes:
/// - Linear acceleration: each sleep takes `duration / multiplier` of real time
/// - Fast-forward: time jumps instantly through sleep periods (multiplier = 0.0)
pub struct SimulatedTimeSource {
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    /// Time acceleration factor (e.g., 60.0 = 1 minute per second)
    time_multiplier: f64,
    /// Simulated time that has passed since `start_time`
    elapsed: Mutex<ChronoDuration>,
}

impl SimulatedTimeSource {
    /// Create a new simulated time source
    ///
    /// # Arguments
    /// * `start_time` - Starting time for the simulation
    /// * `end_time` - Ending time for the simulation
    /// * `multiplier` - Time acceleration (e.g., 60.0 = 1 simulated minute per real second)
    ///   0.0 means fast-forward mode
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, multiplier: f64) -> Self {
        Self {
            start_time,
            end_time,
            time_multiplier: if multiplier == 0.0 {
                0.0
            } else if multiplier < 0.0 || !multiplier.is_finite() {
                3600.0 // Default to 1 hour per second
            } else {
                multiplier
            },
            elapsed: Mutex::new(ChronoDuration::zero()),
        }
    }

    fn current_time(&self) -> DateTime<Utc> {
        (self.start_time + *lock(&self.elapsed)).min(self.end_time)
    }

    pub fn is_fast_forward(&self) -> bool {
        self.time_multiplier == 0.0
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.current_time()
    }

    fn sleep(&self, duration: StdDuration) {
        let remaining = self.end_time - self.current_time();
        if remaining <= ChronoDuration::zero() {
            return;
        }
        let step = to_chrono(duration).min(remaining);

        if self.is_fast_forward() {
            // Minimal sleep to allow other threads to run and logs to be output
            std::thread::sleep(StdDuration::from_millis(1));
        } else if let Ok(real) = step.to_std() {
            std::thread::sleep(real.div_f64(self.time_multiplier));
        }

        *lock(&self.elapsed) += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.end_time
    }
}

/// A clock that only moves when told to.
///
/// Sleeping advances the clock by the requested duration without blocking.
pub struct ManualTimeSource {
    current: Mutex<DateTime<Utc>>,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *lock(&self.current) = instant;
    }

    pub fn advance(&self, by: ChronoDuration) {
        *lock(&self.current) += by;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.current)
    }

    fn sleep(&self, duration: StdDuration) {
        self.advance(to_chrono(duration));
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// The global time source, defaulting to the real clock
pub fn global() -> Arc<dyn TimeSource> {
    Arc::clone(TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)))
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Utc> {
    global().now()
}

/// Check if we're running in simulation mode
pub fn is_simulated() -> bool {
    global().is_simulated()
}

/// Parse a datetime string in the format "YYYY-MM-DD HH:MM:SS" as host local time
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    parse_datetime_in(s, &Local)
}

/// Parse a datetime string in a specific timezone
pub fn parse_datetime_in<Z: TimeZone>(s: &str, zone: &Z) -> Result<DateTime<Utc>, String> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM:SS"))?;

    zone.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| "Ambiguous or invalid local time".to_string())
}
