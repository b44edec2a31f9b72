//! Python host binding
//!
//! Lets a Python host (test harness, notebook, or a game shell scripted in
//! Python) start a session, feed it selections and receive the single
//! completion callback.

pub mod session;
