//! HTTP API handlers for salah-api

pub mod additional;
pub mod default_schedule;
pub mod events;
pub mod health;
pub mod locations;
pub mod masjids;
pub mod timings;
