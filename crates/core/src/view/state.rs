use crate::domain::catalog::reference_snapshots;
use crate::domain::snapshot::StockSnapshot;
use crate::screen::{best_pick, screen};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const LABEL_IDLE: &str = "Analyze Stocks Now";
pub const LABEL_LOADING: &str = "Analyzing Market...";
pub const LABEL_ANALYZED: &str = "Refresh Analysis";

/// Result of one completed analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub run_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub picks: Vec<StockSnapshot>,
}

impl Analysis {
    pub fn best_pick(&self) -> Option<&StockSnapshot> {
        best_pick(&self.picks)
    }

    /// Everything after the best pick.
    pub fn others(&self) -> &[StockSnapshot] {
        self.picks.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Idle,
    Loading,
    Analyzed(Analysis),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            ViewState::Analyzed(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn control(&self) -> Control {
        let (label, disabled) = match self {
            ViewState::Idle => (LABEL_IDLE, false),
            ViewState::Loading => (LABEL_LOADING, true),
            ViewState::Analyzed(_) => (LABEL_ANALYZED, false),
        };
        Control { label, disabled }
    }
}

/// The single action control, as it should be displayed for a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Control {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Started,
    Ignored,
}

/// Idle -> Loading -> Analyzed, with Analyzed -> Loading on refresh.
#[derive(Debug, Clone)]
pub struct AnalysisView {
    universe: Arc<[StockSnapshot]>,
    state: ViewState,
}

impl AnalysisView {
    pub fn new(universe: Arc<[StockSnapshot]>) -> Self {
        Self {
            universe,
            state: ViewState::Idle,
        }
    }

    pub fn reference() -> Self {
        Self::new(Arc::from(reference_snapshots()))
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn control(&self) -> Control {
        self.state.control()
    }

    pub fn trigger(&mut self) -> Trigger {
        if self.state.is_loading() {
            return Trigger::Ignored;
        }
        self.state = ViewState::Loading;
        Trigger::Started
    }

    /// Finishes a pending run. Returns false if no run was pending.
    pub fn complete(&mut self) -> bool {
        if !self.state.is_loading() {
            return false;
        }
        self.state = ViewState::Analyzed(Analysis {
            run_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            picks: screen(&self.universe),
        });
        true
    }
}
