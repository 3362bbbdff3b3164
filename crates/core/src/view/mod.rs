pub mod driver;
pub mod state;

pub use driver::{Delay, TokioDelay, ViewDriver, ViewHandle};
pub use state::{Analysis, AnalysisView, Control, Trigger, ViewState};
