//! End-to-end tests driving the HTTP router with a stub weather service.

mod prediction;
mod stub_weather;
