// ============================================================================
// Frame clock and job queue
// ============================================================================
//
// Widgets never read wall time or spawn timers on their own. They ask a
// `FrameClock` for the next frame or for a one-shot timeout, and the host
// delivers the resulting `Job`s back to them. Every request is keyed by the
// owning widget so it can be cancelled explicitly on re-trigger or teardown.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::Duration;

use crate::reactive::WidgetId;

/// Handle to a pending one-shot timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Job types delivered to widgets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobType {
    /// The widget asked to run on the next frame
    Frame,
    /// A timeout set by the widget has expired
    Timer(TimerId),
}

/// A unit of work for one widget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Job {
    pub widget_id: WidgetId,
    pub job_type: JobType,
    /// Deadline of a timer, or the frame time for frame jobs
    pub at: Duration,
}

/// Scheduling capability handed to widgets.
///
/// Time is a `Duration` since an arbitrary origin chosen by the host.
pub trait FrameClock {
    /// Current time as seen by the clock
    fn now(&self) -> Duration;

    /// Ask for a `JobType::Frame` on the next frame. Requests from the same
    /// widget are merged, so one widget owns at most one frame chain.
    fn request_frame(&mut self, widget_id: WidgetId);

    /// Withdraw a pending frame request, including one already collected
    /// for the frame currently being dispatched.
    fn cancel_frame(&mut self, widget_id: WidgetId);

    /// Schedule a `JobType::Timer` to fire `delay` from now
    fn set_timeout(&mut self, widget_id: WidgetId, delay: Duration) -> TimerId;

    /// Cancel a pending timer. Unknown or expired ids are ignored.
    fn clear_timeout(&mut self, timer: TimerId);
}

#[derive(Debug)]
struct PendingTimer {
    widget_id: WidgetId,
    deadline: Duration,
}

/// Deterministic `FrameClock` implementation.
///
/// Time only moves through [`Scheduler::advance_to`]; the host then drains
/// [`Scheduler::next_job`] until it returns `None`. Due timers come first in
/// (deadline, id) order, then the frame requests collected when time advanced.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_timer_id: u64,
    timers: BTreeMap<TimerId, PendingTimer>,
    /// Frame requests waiting for the next `advance_to`
    requested_frames: BTreeSet<WidgetId>,
    /// Frame jobs collected for the frame being dispatched
    current_frame: VecDeque<WidgetId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward and collect this frame's frame requests.
    /// Time never goes backwards; an earlier `now` keeps the current time.
    pub fn advance_to(&mut self, now: Duration) {
        if now < self.now {
            log::debug!(
                "Ignoring clock regression from {:?} to {:?}",
                self.now,
                now
            );
        } else {
            self.now = now;
        }
        let requested = std::mem::take(&mut self.requested_frames);
        self.current_frame.extend(requested);
    }

    /// Pop the next job that is due at the current time
    pub fn next_job(&mut self) -> Option<Job> {
        if let Some(id) = self.earliest_due_timer() {
            let timer = self.timers.remove(&id)?;
            return Some(Job {
                widget_id: timer.widget_id,
                job_type: JobType::Timer(id),
                at: timer.deadline,
            });
        }

        self.current_frame.pop_front().map(|widget_id| Job {
            widget_id,
            job_type: JobType::Frame,
            at: self.now,
        })
    }

    fn earliest_due_timer(&self) -> Option<TimerId> {
        self.timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= self.now)
            .min_by_key(|(id, timer)| (timer.deadline, **id))
            .map(|(id, _)| *id)
    }

    /// Drop every frame request and timer owned by a widget
    pub fn unregister(&mut self, widget_id: WidgetId) {
        self.cancel_frame(widget_id);
        self.timers.retain(|_, timer| timer.widget_id != widget_id);
    }

    /// Check if anything is waiting, due or not
    pub fn has_pending_jobs(&self) -> bool {
        !self.timers.is_empty()
            || !self.requested_frames.is_empty()
            || !self.current_frame.is_empty()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    /// Number of pending timers owned by a widget
    pub fn pending_timers(&self, widget_id: WidgetId) -> usize {
        self.timers
            .values()
            .filter(|timer| timer.widget_id == widget_id)
            .count()
    }

    /// Whether a widget has a frame request queued
    pub fn has_frame_request(&self, widget_id: WidgetId) -> bool {
        self.requested_frames.contains(&widget_id) || self.current_frame.contains(&widget_id)
    }
}

impl FrameClock for Scheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn request_frame(&mut self, widget_id: WidgetId) {
        self.requested_frames.insert(widget_id);
    }

    fn cancel_frame(&mut self, widget_id: WidgetId) {
        self.requested_frames.remove(&widget_id);
        self.current_frame.retain(|id| *id != widget_id);
    }

    fn set_timeout(&mut self, widget_id: WidgetId, delay: Duration) -> TimerId {
        let id = TimerId(self.next_timer_id);
        self.next_timer_id += 1;
        self.timers.insert(
            id,
            PendingTimer {
                widget_id,
                deadline: self.now + delay,
            },
        );
        id
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }
}
