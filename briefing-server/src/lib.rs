//! Aviation weather briefing server.
//!
//! A web dashboard that answers: "What is the weather at this airport right
//! now, and how is it expected to change?" Current observations (METAR) and
//! forecasts (TAF) are classified into flight categories and severity tiers
//! and rendered as a single briefing per station.

pub mod briefing;
pub mod cache;
pub mod config;
pub mod domain;
pub mod search;
pub mod stations;
pub mod weather;
pub mod web;
