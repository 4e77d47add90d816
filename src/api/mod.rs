// src/api/mod.rs
//!
//! HTTP API
//!
//! Endpoints:
//! - POST /ddos-alert - Attack start/end event
//! - POST /ip-blocked - IP block notification
//! - GET /status - Notification service connectivity
//! - GET /ongoing-attacks - Open attacks
//! - GET /recent-alerts - Last alerts, oldest first
//! - GET /blocked-ips - Blocked IPs in block order
//! - GET /network-stats - Derived statistics

pub mod handlers;
pub mod models;
pub mod server;
