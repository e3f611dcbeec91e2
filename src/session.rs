//! Application state and its transitions.
//!
//! The front-end holds one [`AppState`] value. Every user action consumes it
//! and returns the next one, so the whole flow can be exercised without a
//! terminal attached.

use crate::acquire::{select_image, ImagePicker, ImageReference, PickerOptions};
use crate::analysis::{AnalysisError, Analyzer};

/// Title used for every error notice.
pub const ERROR_TITLE: &str = "Error";

/// A message for the user, shown once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            message: message.into(),
        }
    }

    /// Generic notice for any picker failure.
    pub fn pick_failed() -> Self {
        Self::error("Failed to pick image")
    }

    /// Precondition failures are shown as-is, everything else is wrapped.
    pub fn from_analysis_error(err: &AnalysisError) -> Self {
        if err.is_precondition() {
            Self::error(err.to_string())
        } else {
            Self::error(format!(
                "An error occurred while analyzing the image: {}",
                err
            ))
        }
    }
}

/// Everything the screen shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    image: Option<ImageReference>,
    result: String,
    notice: Option<Notice>,
    in_flight: bool,
}

/// Result of asking to start an analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The request may go ahead; the state is now marked in flight
    Started(AppState),
    /// Another analysis is still running; nothing changed
    Ignored(AppState),
}

impl Transition {
    pub fn into_state(self) -> AppState {
        match self {
            Transition::Started(state) | Transition::Ignored(state) => state,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&ImageReference> {
        self.image.as_ref()
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether the analyze action is enabled.
    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && !self.in_flight
    }

    /// Replace the selected image. The previous result stays on screen.
    pub fn select(self, image: ImageReference) -> Self {
        Self {
            image: Some(image),
            notice: None,
            ..self
        }
    }

    /// Record a picker failure.
    pub fn pick_failed(self) -> Self {
        Self {
            notice: Some(Notice::pick_failed()),
            ..self
        }
    }

    pub fn dismiss_notice(self) -> Self {
        Self {
            notice: None,
            ..self
        }
    }

    /// Mark an analysis as started, unless one is already running.
    pub fn begin_analysis(self) -> Transition {
        if self.in_flight {
            log::debug!("Analysis already in flight, ignoring request");
            return Transition::Ignored(self);
        }
        Transition::Started(Self {
            in_flight: true,
            notice: None,
            ..self
        })
    }

    /// Apply the outcome of an analysis call.
    ///
    /// Success overwrites the result. Failure keeps the old result and sets a
    /// notice.
    pub fn finish_analysis(self, outcome: Result<String, AnalysisError>) -> Self {
        match outcome {
            Ok(result) => Self {
                result,
                notice: None,
                in_flight: false,
                ..self
            },
            Err(err) => {
                log::warn!("Analysis failed: {}", err);
                Self {
                    notice: Some(Notice::from_analysis_error(&err)),
                    in_flight: false,
                    ..self
                }
            }
        }
    }
}

/// Run `picker` and fold its result into `state`.
///
/// A cancelled pick leaves the state untouched. A failed pick only sets the
/// generic notice; the cause goes to the log.
pub async fn pick<P: ImagePicker>(state: AppState, picker: &P) -> AppState {
    match select_image(picker, &PickerOptions::default()).await {
        Ok(Some(image)) => state.select(image),
        Ok(None) => state,
        Err(err) => {
            log::error!("Error picking image: {}", err);
            state.pick_failed()
        }
    }
}

/// Run one analysis against `state`, honouring the in-flight guard.
pub async fn analyze(state: AppState, analyzer: &Analyzer) -> AppState {
    match state.begin_analysis() {
        Transition::Ignored(state) => state,
        Transition::Started(state) => {
            let outcome = analyzer.analyze(state.image()).await;
            state.finish_analysis(outcome)
        }
    }
}
