//! Schedule resolution
//!
//! Decides which prayer-timing record to present for a masjid and date:
//!
//! 1. The timing row recorded for exactly that date, if any.
//! 2. Otherwise, when the date is the current day, the masjid's default
//!    schedule.
//! 3. Otherwise the masjid's most recent timing row by date — even when that
//!    date lies after the requested one.
//!
//! Resolution is a pure read; provenance travels on the result so clients
//! can tell a recorded timing from a template or a stand-in. [`daily`]
//! assembles the full per-day view on top of the resolver.

pub mod daily;
pub mod resolver;

pub use daily::{daily_schedule, DailySchedule};
pub use resolver::{resolve_timing, ResolvedTiming, TimingSource};
