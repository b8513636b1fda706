pub mod controller;
pub mod scheduler;
pub mod state;

pub use controller::{RenderCallback, TimelineController, TimelineSnapshot};
pub use scheduler::{ManualScheduler, Scheduler, TickFn, TokioScheduler};
pub use state::{InitialPosition, TimelineState};
