pub mod clock;
pub mod engine;
pub mod format;
pub mod overrun;
pub mod state;
pub mod timespec;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{normalize_event_name, Tick, TimerEngine, TimerSnapshot, Transition, UNNAMED_TASK};
pub use format::format_hms;
pub use overrun::{OverrunNotifier, OverrunSignal};
pub use state::{TimerMode, TimerState};
pub use timespec::{parse, ParseError, SpecMode, TimeSpec, TimeSpecKind};
