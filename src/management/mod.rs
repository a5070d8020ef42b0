mod store;

pub use store::Clock;
pub use store::DEFAULT_SWEEP_INTERVAL;
pub use store::DEFAULT_TTL;
pub use store::RoastStore;
pub use store::SystemClock;
