//! Binge session detection.
//!
//! A binge session is a maximal run of plays where each play starts no more
//! than [`BINGE_GAP_SECS`] after the previous one.

use serde::{Deserialize, Serialize};

use crate::types::{secs_to_minutes, PlayHistoryRecord};

/// Maximum gap between consecutive play starts within one session (30 minutes).
pub const BINGE_GAP_SECS: i64 = 1800;

/// A run of closely spaced plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BingeSession {
    /// Start of the first play (Unix seconds)
    pub start_time: i64,
    /// Start of the last play (Unix seconds)
    pub end_time: i64,
    pub plays: u64,
    pub total_minutes: u64,
}

struct OpenSession {
    start_time: i64,
    end_time: i64,
    plays: u64,
    secs: u64,
}

impl OpenSession {
    fn new(record: &PlayHistoryRecord) -> Self {
        Self {
            start_time: record.viewed_at,
            end_time: record.viewed_at,
            plays: 1,
            secs: record.duration_secs(),
        }
    }

    fn push(&mut self, record: &PlayHistoryRecord) {
        self.end_time = record.viewed_at;
        self.plays += 1;
        self.secs += record.duration_secs();
    }

    fn close(self) -> BingeSession {
        BingeSession {
            start_time: self.start_time,
            end_time: self.end_time,
            plays: self.plays,
            total_minutes: secs_to_minutes(self.secs),
        }
    }
}

/// Split plays into binge sessions, in chronological order.
pub fn detect_all_binge_sessions(records: &[PlayHistoryRecord]) -> Vec<BingeSession> {
    let mut sorted: Vec<&PlayHistoryRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.viewed_at);

    let mut sessions = Vec::new();
    let mut current: Option<OpenSession> = None;

    for record in sorted {
        if let Some(open) = current.as_mut() {
            if record.viewed_at.saturating_sub(open.end_time) <= BINGE_GAP_SECS {
                open.push(record);
                continue;
            }
        }
        if let Some(done) = current.replace(OpenSession::new(record)) {
            sessions.push(done.close());
        }
    }

    if let Some(done) = current {
        sessions.push(done.close());
    }

    sessions
}

/// The session with the most watch minutes; ties go to the earliest session.
pub fn detect_longest_binge(records: &[PlayHistoryRecord]) -> Option<BingeSession> {
    detect_all_binge_sessions(records)
        .into_iter()
        .fold(None, |best: Option<BingeSession>, session| match best {
            Some(b) if b.total_minutes >= session.total_minutes => Some(b),
            _ => Some(session),
        })
}
