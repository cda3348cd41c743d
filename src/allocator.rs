//! Priority-ordered route allocation.
//!
//! Given where every train is (its occupied route) and where each would like
//! to go next (its requested route), the [`Allocator`] grants each train the
//! longest prefix of its request that cannot bring it into contact with
//! another train.
//!
//! # Priority
//!
//! Input order is priority order. Train 0 is decided first and only has to
//! keep clear of where the other trains currently are. Every later train must
//! also keep clear of what the trains before it were actually granted; a
//! higher-priority request that was itself cut short no longer reserves the
//! track it did not get.
//!
//! # Cutting a segment
//!
//! Requested segments are examined in travel order against every blocking
//! segment:
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | The segment's first point is already claimed | [`Cut::Blocked`] |
//! | A blocker starts further along the same section | Truncated `clearance` before it |
//! | The segment reaches a junction a blocker touches | Truncated `clearance` before the junction |
//!
//! The nearest cut wins. A segment that survives intact lets the next one be
//! examined; anything cut ends the allocation there. A train whose first
//! segment is blocked is held on the empty route.
//!
//! # Example
//!
//! ```rust
//! use rs_interlock::{Allocator, Branch, Endpoint, Junction, Route, Section, Segment, Track};
//!
//! let ep = |j: &str, b| Endpoint::new(Junction::new(j).unwrap(), b);
//! let line = Section::new(10, ep("j1", Branch::Facing), ep("j2", Branch::Normal)).unwrap();
//! let mut track = Track::new();
//! track.add_section(line.clone()).unwrap();
//!
//! let from = ep("j1", Branch::Facing);
//! let seg = |start, end| Route::single(Segment::new(line.clone(), from.clone(), start, end).unwrap());
//!
//! // Train 0 wants to run up to offset 8; train 1 stands at [8, 9].
//! let occupied = [seg(0, 3), seg(8, 9)];
//! let requested = [seg(0, 8), seg(8, 9)];
//!
//! let allocated = Allocator::new(&track).allocate(&occupied, &requested).unwrap();
//! assert_eq!(allocated[0], seg(0, 7));
//! assert_eq!(allocated[1], requested[1]);
//! ```

use alloc::vec::Vec;

use crate::config::AllocatorConfig;
use crate::error::{AllocationError, RouteRole};
use crate::route::Route;
use crate::segment::Segment;
use crate::track::Track;
use crate::traits::Topology;

// ============================================================================
// Decision records
// ============================================================================

/// How far into a segment an allocation may run.
///
/// Ordered nearest first: `Blocked` sorts before any truncation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cut {
    /// Nothing of the segment may be used.
    Blocked,
    /// The segment may be used up to this end offset.
    TruncatedAt(u32),
}

/// Why a segment was cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CutReason {
    /// The first point of the segment lies on the blocker.
    StartOccupied,
    /// The segment departs from a junction the blocker touches.
    JunctionOccupied,
    /// A blocker travelling the other way lies further along the section.
    OpposingTrain,
    /// A blocker travelling the same way lies further along the section.
    FollowingTrain,
    /// The segment runs into a junction the blocker touches.
    JunctionContested,
}

impl CutReason {
    /// Returns the reason as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CutReason::StartOccupied => "start occupied",
            CutReason::JunctionOccupied => "junction occupied",
            CutReason::OpposingTrain => "opposing train",
            CutReason::FollowingTrain => "following train",
            CutReason::JunctionContested => "junction contested",
        }
    }
}

impl core::fmt::Display for CutReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The route that caused a cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blocker {
    /// Index of the train owning the route.
    pub train: usize,
    /// [`RouteRole::Occupied`] or [`RouteRole::Allocated`].
    pub role: RouteRole,
}

/// The binding cut applied to one train's request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limit {
    /// Index of the requested segment that was cut.
    pub segment: usize,
    /// How far into that segment the allocation runs.
    pub cut: Cut,
    /// Why the cut was needed.
    pub reason: CutReason,
    /// Whose route forced it.
    pub blocker: Blocker,
}

/// What the allocator decided for one train.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainDecision {
    /// Index of the train.
    pub train: usize,
    /// The binding cut, or `None` if the request was granted in full.
    pub limit: Option<Limit>,
}

impl TrainDecision {
    /// Returns true if the request was granted unchanged.
    pub fn is_intact(&self) -> bool {
        self.limit.is_none()
    }

    /// Returns true if the train was given the empty route.
    pub fn is_held(&self) -> bool {
        matches!(
            self.limit,
            Some(Limit {
                segment: 0,
                cut: Cut::Blocked,
                ..
            })
        )
    }
}

impl core::fmt::Display for TrainDecision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let Some(limit) = &self.limit else {
            return write!(f, "train {}: granted in full", self.train);
        };
        let outcome = if self.is_held() { "held" } else { "cut" };
        write!(f, "train {}: {} at segment {}", self.train, outcome, limit.segment)?;
        if let Cut::TruncatedAt(end) = limit.cut {
            write!(f, " offset {}", end)?;
        }
        write!(
            f,
            " ({}, {} route of train {})",
            limit.reason, limit.blocker.role, limit.blocker.train
        )
    }
}

/// The allocated routes together with the decision behind each one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationReport {
    /// One allocated route per train, in input order.
    pub routes: Vec<Route>,
    /// One decision per train, in input order.
    pub decisions: Vec<TrainDecision>,
}

impl AllocationReport {
    /// Indices of trains that were given the empty route.
    pub fn held_trains(&self) -> impl Iterator<Item = usize> + '_ {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, route)| route.is_empty())
            .map(|(train, _)| train)
    }

    /// Indices of trains whose request was cut in any way.
    pub fn limited_trains(&self) -> impl Iterator<Item = usize> + '_ {
        self.decisions
            .iter()
            .filter(|decision| !decision.is_intact())
            .map(|decision| decision.train)
    }

    /// Consumes the report, keeping only the routes.
    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }
}

// ============================================================================
// Allocator
// ============================================================================

/// Decides how far each train may advance.
///
/// The allocator borrows the layout it checks routes against and holds no
/// other state, so one instance can serve any number of calls.
pub struct Allocator<'a, T: Topology + ?Sized> {
    topology: &'a T,
    config: AllocatorConfig,
}

impl<T: Topology + ?Sized> Clone for Allocator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            topology: self.topology,
            config: self.config.clone(),
        }
    }
}

impl<T: Topology + ?Sized> core::fmt::Debug for Allocator<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Allocator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, T: Topology + ?Sized> Allocator<'a, T> {
    /// Creates an allocator over `topology` with the default configuration.
    pub fn new(topology: &'a T) -> Self {
        Self {
            topology,
            config: AllocatorConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: AllocatorConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Allocates a route to every train.
    ///
    /// `occupied[i]` and `requested[i]` belong to train `i`; lower indices
    /// have higher priority. The result has one route per train, each a
    /// prefix of the request and possibly empty.
    ///
    /// # Errors
    ///
    /// Fails without computing anything if the slices differ in length, a
    /// route is empty, a route leaves the layout, or two occupied routes
    /// intersect. With
    /// [`verify_postconditions`](AllocatorConfig::verify_postconditions) set,
    /// also fails if the result does not pass its own safety check.
    pub fn allocate(
        &self,
        occupied: &[Route],
        requested: &[Route],
    ) -> Result<Vec<Route>, AllocationError> {
        self.allocate_with_report(occupied, requested)
            .map(AllocationReport::into_routes)
    }

    /// Like [`allocate`](Self::allocate), but also explains every cut.
    pub fn allocate_with_report(
        &self,
        occupied: &[Route],
        requested: &[Route],
    ) -> Result<AllocationReport, AllocationError> {
        self.check_preconditions(occupied, requested)?;

        let mut report = AllocationReport {
            routes: Vec::with_capacity(requested.len()),
            decisions: Vec::with_capacity(requested.len()),
        };
        for (train, request) in requested.iter().enumerate() {
            let blockers = blockers_for(train, occupied, &report.routes);
            let (route, decision) = self.allocate_train(train, request, &blockers);
            report.routes.push(route);
            report.decisions.push(decision);
        }

        if self.config.verify_postconditions {
            check_postconditions(occupied, requested, &report.routes)?;
        }
        Ok(report)
    }

    fn check_preconditions(
        &self,
        occupied: &[Route],
        requested: &[Route],
    ) -> Result<(), AllocationError> {
        if occupied.len() != requested.len() {
            return Err(AllocationError::LengthMismatch {
                occupied: occupied.len(),
                requested: requested.len(),
            });
        }
        for (train, (current, wanted)) in occupied.iter().zip(requested).enumerate() {
            for (role, route) in [(RouteRole::Occupied, current), (RouteRole::Requested, wanted)] {
                if route.is_empty() {
                    return Err(AllocationError::EmptyRoute { train, role });
                }
                if let Some(segment) = self.topology.first_foreign_segment(route) {
                    return Err(AllocationError::OffTrack {
                        train,
                        role,
                        segment,
                    });
                }
            }
        }
        for (first, a) in occupied.iter().enumerate() {
            for (offset, b) in occupied[first + 1..].iter().enumerate() {
                if a.intersects(b) {
                    return Err(AllocationError::OccupiedRoutesIntersect {
                        first,
                        second: first + 1 + offset,
                    });
                }
            }
        }
        Ok(())
    }

    fn allocate_train(
        &self,
        train: usize,
        request: &Route,
        blockers: &[(Blocker, &Route)],
    ) -> (Route, TrainDecision) {
        let mut granted = Vec::with_capacity(request.len());
        let mut limit = None;

        for (index, segment) in request.iter().enumerate() {
            let Some((cut, reason, blocker)) = self.limit_segment(segment, blockers) else {
                granted.push(segment.clone());
                continue;
            };
            if let Cut::TruncatedAt(end) = cut {
                granted.push(segment.truncated(end));
            }
            limit = Some(Limit {
                segment: index,
                cut,
                reason,
                blocker,
            });
            break;
        }

        let decision = TrainDecision { train, limit };
        if decision.is_held() {
            tracing::warn!(train, %decision, "train held");
        } else {
            tracing::debug!(train, segments = granted.len(), %decision, "train allocated");
        }
        (Route::from_prefix(granted), decision)
    }

    /// The nearest cut any blocker forces on `segment`. Ties go to the
    /// blocker seen first.
    fn limit_segment(
        &self,
        segment: &Segment,
        blockers: &[(Blocker, &Route)],
    ) -> Option<(Cut, CutReason, Blocker)> {
        let mut nearest: Option<(Cut, CutReason, Blocker)> = None;
        for (blocker, route) in blockers {
            for other in route.iter() {
                let Some((cut, reason)) = self.conflict(segment, other) else {
                    continue;
                };
                tracing::trace!(
                    train = blocker.train,
                    role = %blocker.role,
                    %reason,
                    ?cut,
                    "conflict"
                );
                if nearest.map_or(true, |(best, _, _)| cut < best) {
                    nearest = Some((cut, reason, *blocker));
                }
            }
        }
        nearest
    }

    /// How far `segment` may run before it could touch `other`.
    fn conflict(&self, segment: &Segment, other: &Segment) -> Option<(Cut, CutReason)> {
        let first = segment.first_location();
        if other.contains(&first) {
            let reason = if first.at_a_junction() {
                CutReason::JunctionOccupied
            } else {
                CutReason::StartOccupied
            };
            return Some((Cut::Blocked, reason));
        }

        let start = segment.start_offset();
        let end = segment.end_offset();
        let length = segment.section().length();
        let mut nearest = None;

        if segment.section() == other.section() {
            let (near, _) = other.span_from(segment.departing_endpoint());
            if start < near && near <= end {
                let reason = if other.departing_endpoint() == segment.departing_endpoint() {
                    CutReason::FollowingTrain
                } else {
                    CutReason::OpposingTrain
                };
                nearest = Some((self.cut_before(near, start), reason));
            }
        }

        if end == length && other.contains(&segment.last_location()) {
            let cut = self.cut_before(length, start);
            if nearest.map_or(true, |(best, _)| cut < best) {
                nearest = Some((cut, CutReason::JunctionContested));
            }
        }
        nearest
    }

    fn cut_before(&self, boundary: u32, start: u32) -> Cut {
        match boundary.checked_sub(self.config.effective_clearance()) {
            Some(end) if end >= start => Cut::TruncatedAt(end),
            _ => Cut::Blocked,
        }
    }
}

/// The routes train `train` must keep clear of, in train order: every other
/// train's occupied route, then the allocations already granted.
fn blockers_for<'r>(
    train: usize,
    occupied: &'r [Route],
    allocated: &'r [Route],
) -> Vec<(Blocker, &'r Route)> {
    let occupied = occupied
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != train)
        .map(|(other, route)| {
            let blocker = Blocker {
                train: other,
                role: RouteRole::Occupied,
            };
            (blocker, route)
        });
    let allocated = allocated.iter().enumerate().map(|(other, route)| {
        let blocker = Blocker {
            train: other,
            role: RouteRole::Allocated,
        };
        (blocker, route)
    });
    occupied.chain(allocated).collect()
}

/// Re-checks an allocation against the inputs it was computed from.
fn check_postconditions(
    occupied: &[Route],
    requested: &[Route],
    allocated: &[Route],
) -> Result<(), AllocationError> {
    for (train, granted) in allocated.iter().enumerate() {
        if !granted.is_prefix_of(&requested[train]) {
            return Err(AllocationError::PostconditionViolated {
                train,
                other: train,
                role: RouteRole::Requested,
            });
        }
        for (other, route) in occupied.iter().enumerate() {
            if other != train && granted.intersects(route) {
                return Err(AllocationError::PostconditionViolated {
                    train,
                    other,
                    role: RouteRole::Occupied,
                });
            }
        }
        for (other, route) in allocated[..train].iter().enumerate() {
            if granted.intersects(route) {
                return Err(AllocationError::PostconditionViolated {
                    train,
                    other,
                    role: RouteRole::Allocated,
                });
            }
        }
    }
    Ok(())
}

/// Allocates routes on `track` with the default configuration.
///
/// Shorthand for `Allocator::new(track).allocate(occupied, requested)`.
pub fn allocate(
    track: &Track,
    occupied: &[Route],
    requested: &[Route],
) -> Result<Vec<Route>, AllocationError> {
    Allocator::new(track).allocate(occupied, requested)
}
