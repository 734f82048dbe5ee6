use crate::models::PingRecord;
use crate::requests::FetchError;

/// Banner text for any failed fetch cycle, whatever the cause.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to load data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Ready,
    Errored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub records: Vec<PingRecord>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

pub type FetchOutcome = Result<Vec<PingRecord>, FetchError>;

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            records: vec![],
            is_loading: true,
            error_message: None,
        }
    }
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Initializing
        } else if self.error_message.is_some() {
            Phase::Errored
        } else {
            Phase::Ready
        }
    }

    /// Folds one completed fetch cycle into the state.
    ///
    /// A failure keeps the previous records; they stay in memory but the
    /// error banner hides them until the next success.
    pub fn apply(&mut self, outcome: &FetchOutcome) {
        match outcome {
            Ok(records) => {
                self.records = records.clone();
                self.error_message = None;
            }
            Err(_) => {
                self.error_message = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
        self.is_loading = false;
    }
}
