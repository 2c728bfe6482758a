use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};

/// Hard cap on the frame stride, matching the practical upper bound of
/// frame counts in the source format.
pub const MAX_FRAME_STRIDE: usize = 99_999;

/// Configuration for one run of the import pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub source: PathBuf,
    pub frame_stride: usize,
}

impl ImportRequest {
    pub fn new(source: PathBuf, frame_stride: usize) -> DomainResult<Self> {
        if frame_stride < 1 || frame_stride > MAX_FRAME_STRIDE {
            return Err(DomainError::InvalidStride {
                value: frame_stride,
            });
        }
        Ok(Self {
            source,
            frame_stride,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportPhase {
    Idle,
    Reading,
    Synthesizing,
    Finalizing,
    Succeeded,
    Failed,
}

/// Structured result of a completed import, rendered by the invoking UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub agents_imported: usize,
    pub agents_failed: usize,
    pub geometry_imported: usize,
    pub geometry_failed: usize,
    /// Minimum and maximum retained frame across all imported agents.
    /// None when no agents were imported.
    pub frame_range: Option<(i64, i64)>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// One run of the import pipeline. Tracks the phase transitions and the
/// counters that end up in the summary. Ephemeral: created when a run
/// starts, discarded once the status is reported.
#[derive(Debug)]
pub struct ImportSession {
    pub request: ImportRequest,
    phase: ImportPhase,
    started_at: DateTime<Utc>,
    agents_imported: usize,
    agents_failed: usize,
    geometry_imported: usize,
    geometry_failed: usize,
    frame_range: Option<(i64, i64)>,
}

impl ImportSession {
    pub fn new(request: ImportRequest) -> Self {
        Self {
            request,
            phase: ImportPhase::Idle,
            started_at: Utc::now(),
            agents_imported: 0,
            agents_failed: 0,
            geometry_imported: 0,
            geometry_failed: 0,
            frame_range: None,
        }
    }

    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    pub fn frame_range(&self) -> Option<(i64, i64)> {
        self.frame_range
    }

    pub fn begin_reading(&mut self) -> DomainResult<()> {
        self.transition(ImportPhase::Idle, ImportPhase::Reading)
    }

    pub fn begin_synthesizing(&mut self) -> DomainResult<()> {
        self.transition(ImportPhase::Reading, ImportPhase::Synthesizing)
    }

    pub fn begin_finalizing(&mut self) -> DomainResult<()> {
        self.transition(ImportPhase::Synthesizing, ImportPhase::Finalizing)
    }

    pub fn record_agent(&mut self, first_frame: i64, last_frame: i64) {
        self.agents_imported += 1;
        self.frame_range = Some(match self.frame_range {
            Some((start, end)) => (start.min(first_frame), end.max(last_frame)),
            None => (first_frame, last_frame),
        });
    }

    pub fn record_agent_failure(&mut self) {
        self.agents_failed += 1;
    }

    pub fn record_boundary(&mut self) {
        self.geometry_imported += 1;
    }

    pub fn record_boundary_failure(&mut self) {
        self.geometry_failed += 1;
    }

    /// Terminal success transition; produces the summary for the caller.
    pub fn succeed(&mut self) -> DomainResult<ImportSummary> {
        self.transition(ImportPhase::Finalizing, ImportPhase::Succeeded)?;
        Ok(ImportSummary {
            agents_imported: self.agents_imported,
            agents_failed: self.agents_failed,
            geometry_imported: self.geometry_imported,
            geometry_failed: self.geometry_failed,
            frame_range: self.frame_range,
            started_at: self.started_at,
            finished_at: Utc::now(),
        })
    }

    /// Terminal failure transition, valid from any non-terminal phase.
    pub fn fail(&mut self) {
        if self.phase != ImportPhase::Succeeded {
            self.phase = ImportPhase::Failed;
        }
    }

    fn transition(&mut self, from: ImportPhase, to: ImportPhase) -> DomainResult<()> {
        if self.phase != from {
            return Err(DomainError::InvalidTransition {
                from: format!("{:?}", self.phase),
                to: format!("{:?}", to),
            });
        }
        self.phase = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ImportRequest {
        ImportRequest::new(PathBuf::from("trajectories.sqlite"), 1).unwrap()
    }

    #[test]
    fn test_request_rejects_invalid_strides() {
        match ImportRequest::new(PathBuf::from("x.sqlite"), 0) {
            Err(DomainError::InvalidStride { value }) => assert_eq!(value, 0),
            other => panic!("Expected InvalidStride, got {:?}", other),
        }
        match ImportRequest::new(PathBuf::from("x.sqlite"), MAX_FRAME_STRIDE + 1) {
            Err(DomainError::InvalidStride { .. }) => {}
            other => panic!("Expected InvalidStride, got {:?}", other),
        }
        assert!(ImportRequest::new(PathBuf::from("x.sqlite"), 1).is_ok());
        assert!(ImportRequest::new(PathBuf::from("x.sqlite"), MAX_FRAME_STRIDE).is_ok());
    }

    #[test]
    fn test_full_phase_sequence() {
        let mut session = ImportSession::new(request());
        assert_eq!(session.phase(), ImportPhase::Idle);

        session.begin_reading().unwrap();
        session.begin_synthesizing().unwrap();
        session.record_agent(0, 9);
        session.record_agent(0, 4);
        session.record_agent_failure();
        session.record_boundary();
        session.begin_finalizing().unwrap();

        let summary = session.succeed().unwrap();
        assert_eq!(session.phase(), ImportPhase::Succeeded);
        assert_eq!(summary.agents_imported, 2);
        assert_eq!(summary.agents_failed, 1);
        assert_eq!(summary.geometry_imported, 1);
        assert_eq!(summary.geometry_failed, 0);
        assert_eq!(summary.frame_range, Some((0, 9)));
        assert!(summary.finished_at >= summary.started_at);
    }

    #[test]
    fn test_out_of_order_transition_is_rejected() {
        let mut session = ImportSession::new(request());
        match session.begin_synthesizing() {
            Err(DomainError::InvalidTransition { from, to }) => {
                assert_eq!(from, "Idle");
                assert_eq!(to, "Synthesizing");
            }
            other => panic!("Expected InvalidTransition, got {:?}", other),
        }
    }

    #[test]
    fn test_fail_is_terminal_from_any_phase() {
        let mut session = ImportSession::new(request());
        session.begin_reading().unwrap();
        session.fail();
        assert_eq!(session.phase(), ImportPhase::Failed);
        assert!(session.begin_synthesizing().is_err());
    }

    #[test]
    fn test_frame_range_extends_over_agents() {
        let mut session = ImportSession::new(request());
        assert_eq!(session.frame_range(), None);
        session.record_agent(10, 20);
        session.record_agent(5, 12);
        session.record_agent(15, 40);
        assert_eq!(session.frame_range(), Some((5, 40)));
    }
}
