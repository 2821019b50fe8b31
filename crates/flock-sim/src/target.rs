//! The shared steering target.

use std::fmt;

use flock_core::Vec3;

/// A moving reference the flock can follow.
///
/// `sample` is called when the target is set and then at most once per
/// refresh period.  `None` means the reference is currently unavailable;
/// agents get no target contribution until the next successful sample.
pub trait TargetSource: Send + Sync {
    fn sample(&self) -> Option<Vec3>;
}

impl<F> TargetSource for F
where
    F: Fn() -> Option<Vec3> + Send + Sync,
{
    #[inline]
    fn sample(&self) -> Option<Vec3> {
        self()
    }
}

/// The point every agent's target-seeking contribution steers toward.
pub enum GlobalTarget {
    /// A fixed point.
    Fixed(Vec3),
    /// A reference resampled every `target_refresh_secs`.
    Tracked(Box<dyn TargetSource>),
}

impl GlobalTarget {
    /// Box `source` into a [`GlobalTarget::Tracked`].
    pub fn tracked(source: impl TargetSource + 'static) -> Self {
        GlobalTarget::Tracked(Box::new(source))
    }

    fn sample(&self) -> Option<Vec3> {
        match self {
            GlobalTarget::Fixed(p)    => Some(*p),
            GlobalTarget::Tracked(s)  => s.sample(),
        }
        .filter(|p| p.is_finite())
    }
}

impl From<Vec3> for GlobalTarget {
    fn from(p: Vec3) -> Self {
        GlobalTarget::Fixed(p)
    }
}

impl fmt::Debug for GlobalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalTarget::Fixed(p)   => f.debug_tuple("Fixed").field(p).finish(),
            GlobalTarget::Tracked(_) => f.write_str("Tracked(..)"),
        }
    }
}

// ── Refresh timer ─────────────────────────────────────────────────────────────

/// Current target position plus the timer that paces resampling.
#[derive(Debug, Default)]
pub(crate) struct TargetTracker {
    target:        Option<GlobalTarget>,
    current:       Option<Vec3>,
    since_refresh: f32,
}

impl TargetTracker {
    /// Replace the target and sample it immediately.
    pub(crate) fn set(&mut self, target: GlobalTarget) {
        self.current = target.sample();
        self.since_refresh = 0.0;
        self.target = Some(target);
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Position agents steer toward this tick.
    #[inline]
    pub(crate) fn current(&self) -> Option<Vec3> {
        self.current
    }

    /// Advance the timer by `dt`; resample a tracked target once it reaches
    /// `refresh_secs`.  Returns `true` if a resample happened.
    pub(crate) fn advance(&mut self, dt: f32, refresh_secs: f32) -> bool {
        let Some(GlobalTarget::Tracked(source)) = &self.target else {
            return false;
        };
        self.since_refresh += dt;
        if self.since_refresh < refresh_secs {
            return false;
        }
        self.since_refresh = 0.0;
        self.current = source.sample().filter(|p| p.is_finite());
        tracing::trace!(position = ?self.current, "global target resampled");
        true
    }
}
