#![allow(clippy::module_inception)]

pub mod fork;
pub mod job;
pub mod process;
pub mod redirect;
pub mod signal;
pub mod state;
pub mod wait;

pub use job::Job;
pub use process::Process;
pub use redirect::{OutputMode, RedirectSpec, StdioSet};
pub use signal::signal_name;
pub use state::{JobStatus, ProcessState};
pub use wait::{is_job_completed, is_job_stopped};
