//! gpumon - GPU job queue monitor
//!
//! Keeps a local, continuously refreshed picture of a GPU job scheduler:
//! GPU occupancy, the job list, the job runner's daily logs and the output
//! of the running job. Each resource is polled on its own cadence; views
//! (filtered job lists, log pages, readiness) are derived from the latest
//! state without further requests.

pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod model;
pub mod poller;
pub mod readiness;
pub mod resource;
pub mod retention;
pub mod store;
pub mod view;
