use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::Duration;

/// A clock a [`Timestamp`] is expressed against. Purely a compile-time tag: two
/// timestamps in different domains cannot be subtracted or compared.
pub trait TimeDomain: Clone + Copy + fmt::Debug + Eq + PartialEq + 'static {
    /// Short name used in `Debug` output.
    const NAME: &'static str;
}

/// The compute module's own monotonic wall clock, microsecond resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Local;

impl TimeDomain for Local {
    const NAME: &'static str = "Local";
}

/// The MCB's clock, as reported inside odometry and referee messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Odometry;

impl TimeDomain for Odometry {
    const NAME: &'static str = "Odometry";
}

/// An integer microsecond count in domain `D`.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp<D: TimeDomain> {
    micros: i64,
    #[serde(skip)]
    _domain: PhantomData<D>,
}

impl<D: TimeDomain> Timestamp<D> {
    pub fn from_micros(micros: i64) -> Self {
        Timestamp {
            micros,
            _domain: PhantomData,
        }
    }

    pub fn micros(&self) -> i64 {
        self.micros
    }

    pub fn checked_add(&self, d: Duration) -> Self {
        Timestamp::from_micros(self.micros + d.micros())
    }

    pub fn checked_sub(&self, d: Duration) -> Self {
        Timestamp::from_micros(self.micros - d.micros())
    }

    pub fn duration_since(&self, earlier: &Self) -> Duration {
        Duration::from_micros(self.micros - earlier.micros)
    }
}

impl<D: TimeDomain> Clone for Timestamp<D> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<D: TimeDomain> Copy for Timestamp<D> {}

impl<D: TimeDomain> fmt::Debug for Timestamp<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp<{}>({} us)", D::NAME, self.micros)
    }
}

impl<D: TimeDomain> PartialEq for Timestamp<D> {
    fn eq(&self, other: &Self) -> bool {
        self.micros == other.micros
    }
}
impl<D: TimeDomain> Eq for Timestamp<D> {}

impl<D: TimeDomain> PartialOrd for Timestamp<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<D: TimeDomain> Ord for Timestamp<D> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.micros.cmp(&other.micros)
    }
}

impl<D: TimeDomain> std::ops::Add<Duration> for Timestamp<D> {
    type Output = Timestamp<D>;
    fn add(self, rhs: Duration) -> Self::Output {
        self.checked_add(rhs)
    }
}

impl<D: TimeDomain> std::ops::Sub<Duration> for Timestamp<D> {
    type Output = Timestamp<D>;
    fn sub(self, rhs: Duration) -> Self::Output {
        self.checked_sub(rhs)
    }
}

impl<D: TimeDomain> std::ops::Sub<Timestamp<D>> for Timestamp<D> {
    type Output = Duration;
    fn sub(self, rhs: Timestamp<D>) -> Self::Output {
        self.duration_since(&rhs)
    }
}
