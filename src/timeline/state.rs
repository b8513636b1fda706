use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InitialPosition {
    #[default]
    Start,
    Latest,
}

/// Position and playback flag for a timeline of `week_count` weeks.
/// `position` is always `< week_count`, or 0 for an empty timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    pub position: usize,
    pub is_playing: bool,
    pub week_count: usize,
}

impl TimelineState {
    pub fn new(week_count: usize, initial: InitialPosition) -> Self {
        let position = match initial {
            InitialPosition::Start => 0,
            InitialPosition::Latest => week_count.saturating_sub(1),
        };
        Self {
            position,
            is_playing: false,
            week_count,
        }
    }

    pub fn last(&self) -> usize {
        self.week_count.saturating_sub(1)
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.last()
    }

    pub fn clamp(&self, position: i64) -> usize {
        let last = i64::try_from(self.last()).unwrap_or(i64::MAX);
        // last >= 0, so the clamped value always fits
        position.clamp(0, last) as usize
    }

    /// Stores the clamped position. `None` for an empty timeline, which has no week to show.
    pub fn set_position(&mut self, position: i64) -> Option<usize> {
        if self.week_count == 0 {
            return None;
        }
        self.position = self.clamp(position);
        Some(self.position)
    }

    /// Starts playback. Returns `false` when already playing or empty; rewinds
    /// to 0 when parked on the last week.
    pub fn begin_playing(&mut self) -> bool {
        if self.is_playing || self.week_count == 0 {
            return false;
        }
        if self.at_end() {
            self.position = 0;
        }
        self.is_playing = true;
        true
    }

    /// Advances one week while playing; stops once the last week is reached.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.is_playing {
            return None;
        }
        if !self.at_end() {
            self.position += 1;
        }
        if self.at_end() {
            self.is_playing = false;
        }
        Some(self.position)
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
    }
}
