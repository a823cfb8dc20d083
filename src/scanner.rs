// Historical backfill: walk seasons from the current year down to the floor, one request per year,
// and stop once the API has returned nothing for `empty_streak_threshold` years in a row.

use crate::completion::Completion;
use crate::config::ScanSettings;
use crate::meetings_api::{FetchError, MeetingsSource};
use chrono::Datelike;
use serde::de::IgnoredAny;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Earliest season the scan will request.
pub const FLOOR_YEAR: i32 = 1950;

/// Consecutive empty seasons that mark the end of the API's history.
pub const EMPTY_STREAK_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Inclusive lower bound.
    pub floor_year: i32,
    pub empty_streak_threshold: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            floor_year: FLOOR_YEAR,
            empty_streak_threshold: EMPTY_STREAK_THRESHOLD,
        }
    }
}

impl ScanConfig {
    /// A threshold below 1 would stop on a `Present` season, so it counts as 1.
    pub fn effective_threshold(&self) -> u32 {
        self.empty_streak_threshold.max(1)
    }
}

impl From<&ScanSettings> for ScanConfig {
    fn from(settings: &ScanSettings) -> Self {
        Self {
            floor_year: settings.floor_year,
            empty_streak_threshold: settings.empty_streak_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Present,
    Empty,
}

/// A body is `Present` only if it parses as a non-empty JSON array.
/// Malformed JSON, non-array JSON and `[]` are all `Empty`.
pub fn classify(body: &[u8]) -> Classification {
    match serde_json::from_slice::<Vec<IgnoredAny>>(body) {
        Ok(items) if !items.is_empty() => Classification::Present,
        _ => Classification::Empty,
    }
}

/// Scan state machine. `Scanning` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// `year` is the next season to request; `empty_streak` is the trailing run of empty seasons.
    Scanning { year: i32, empty_streak: u32 },
    /// The season at `year` completed the empty streak.
    StoppedByThreshold { year: i32 },
    StoppedByBoundary,
    /// Fetching `year` failed.
    Aborted { year: i32, error: ScanError },
    /// Cancelled before `year` was classified.
    Cancelled { year: i32 },
}

impl ScanState {
    pub fn start(start_year: i32, config: &ScanConfig) -> Self {
        if start_year < config.floor_year {
            ScanState::StoppedByBoundary
        } else {
            ScanState::Scanning {
                year: start_year,
                empty_streak: 0,
            }
        }
    }

    /// Applies one season's classification. Terminal states are returned unchanged.
    pub fn advance(self, classification: Classification, config: &ScanConfig) -> Self {
        let ScanState::Scanning { year, empty_streak } = self else {
            return self;
        };
        let empty_streak = match classification {
            Classification::Present => 0,
            Classification::Empty => empty_streak + 1,
        };
        if empty_streak >= config.effective_threshold() {
            return ScanState::StoppedByThreshold { year };
        }
        let next = year - 1;
        if next < config.floor_year {
            ScanState::StoppedByBoundary
        } else {
            ScanState::Scanning {
                year: next,
                empty_streak,
            }
        }
    }

    pub fn abort(self, error: ScanError) -> Self {
        match self {
            ScanState::Scanning { year, .. } => ScanState::Aborted { year, error },
            other => other,
        }
    }

    pub fn cancel(self) -> Self {
        match self {
            ScanState::Scanning { year, .. } => ScanState::Cancelled { year },
            other => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScanState::Scanning { .. })
    }

    pub fn empty_streak(&self) -> Option<u32> {
        match self {
            ScanState::Scanning { empty_streak, .. } => Some(*empty_streak),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Ran out of history: too many empty seasons in a row.
    Threshold,
    /// Passed the floor year.
    Boundary,
    Cancelled,
}

/// Summary of a scan that ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub start_year: i32,
    /// Requests issued.
    pub years_fetched: u32,
    pub present_years: u32,
    pub stop_reason: StopReason,
    /// Last season requested, if any.
    pub last_year: Option<i32>,
}

#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum ScanError {
    /// Transport failure. The year and cause are logged, not returned.
    #[error("cannot Access API")]
    CannotAccessApi,

    #[error("could not read for {year}")]
    ReadFailed { year: i32 },
}

pub struct Scanner {
    source: Arc<dyn MeetingsSource>,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(source: Arc<dyn MeetingsSource>, config: ScanConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scans from the current local year. `done` is signalled exactly once before returning.
    pub async fn run(&self, done: Completion) -> Result<ScanReport, ScanError> {
        self.run_with_cancel(done, CancellationToken::new()).await
    }

    /// Like [`Scanner::run`], stopping early with [`StopReason::Cancelled`] when `cancel` fires.
    pub async fn run_with_cancel(
        &self,
        done: Completion,
        cancel: CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        let start_year = chrono::Local::now().year();
        self.run_from(start_year, done, cancel).await
    }

    pub async fn run_from(
        &self,
        start_year: i32,
        done: Completion,
        cancel: CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        let result = self.scan(start_year, &cancel).await;
        done.signal();
        result
    }

    #[instrument(skip(self, cancel), fields(floor_year = self.config.floor_year))]
    async fn scan(
        &self,
        start_year: i32,
        cancel: &CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        info!(
            threshold = self.config.effective_threshold(),
            "backfill scan started"
        );

        let mut state = ScanState::start(start_year, &self.config);
        let mut years_fetched: u32 = 0;
        let mut present_years: u32 = 0;
        let mut last_year = None;

        let stop_reason = loop {
            let year = match state {
                ScanState::Scanning { year, .. } => year,
                ScanState::StoppedByThreshold { .. } => break StopReason::Threshold,
                ScanState::StoppedByBoundary => break StopReason::Boundary,
                ScanState::Cancelled { .. } => break StopReason::Cancelled,
                ScanState::Aborted { error, .. } => return Err(error),
            };

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.source.fetch_year(year) => Some(result),
            };
            let Some(fetched) = fetched else {
                state = state.cancel();
                continue;
            };
            years_fetched += 1;
            last_year = Some(year);

            let body = match fetched {
                Ok(body) => body,
                Err(FetchError::Transport(cause)) => {
                    warn!(year, error = %cause, "meetings request failed; aborting scan");
                    state = state.abort(ScanError::CannotAccessApi);
                    continue;
                }
                Err(FetchError::BodyRead(cause)) => {
                    warn!(year, error = %cause, "meetings body read failed; aborting scan");
                    state = state.abort(ScanError::ReadFailed { year });
                    continue;
                }
            };

            let classification = classify(&body);
            if classification == Classification::Present {
                present_years += 1;
            }
            state = state.advance(classification, &self.config);
            debug!(
                year,
                ?classification,
                empty_streak = state.empty_streak(),
                "season classified"
            );
        };

        info!(
            ?stop_reason,
            years_fetched,
            present_years,
            last_year,
            "backfill scan finished"
        );

        Ok(ScanReport {
            start_year,
            years_fetched,
            present_years,
            stop_reason,
            last_year,
        })
    }
}

/// Runs the scan on its own task. The returned handle yields the scan result;
/// `done` fires when the scan ends, even if the task is aborted.
pub fn spawn(
    scanner: Arc<Scanner>,
    done: Completion,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<Result<ScanReport, ScanError>> {
    tokio::spawn(async move { scanner.run_with_cancel(done, cancel).await })
}
