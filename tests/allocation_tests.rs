//! Allocator behaviour on whole layouts

mod common;

use common::{all_routes, ep, section, seg, single, yard};
use rs_interlock::{
    allocate, AllocationError, Allocator, AllocatorConfig, Branch, Cut, CutReason, Route,
    RouteRole, Segment, Track,
};

fn verifying(track: &Track) -> Allocator<'_, Track> {
    Allocator::new(track).with_config(AllocatorConfig::default().with_verify_postconditions(true))
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn train_behind_a_stationary_train_stops_one_unit_short() {
    let line = section(10, ep("j1", Branch::Facing), ep("j2", Branch::Normal));
    let track = Track::from_sections([line.clone()]).unwrap();
    let from = ep("j1", Branch::Facing);

    let occupied = [single(&line, &from, 0, 3), single(&line, &from, 8, 10)];
    let requested = [single(&line, &from, 0, 8), occupied[1].clone()];

    let allocated = verifying(&track).allocate(&occupied, &requested).unwrap();
    assert_eq!(allocated[0], single(&line, &from, 0, 7));
    assert_eq!(allocated[1], occupied[1]);
}

#[test]
fn train_starting_inside_another_is_held() {
    let y = yard();
    let j0 = ep("j0", Branch::Facing);
    let j1 = ep("j1", Branch::Normal);

    let occupied = [single(&y.west, &j0, 2, 6), single(&y.west, &j1, 0, 2)];
    // From j1, offset 5 is offset 5 from j0: inside train 0.
    let requested = [occupied[0].clone(), single(&y.west, &j1, 5, 9)];

    let report = verifying(&y.track)
        .allocate_with_report(&occupied, &requested)
        .unwrap();
    assert!(report.routes[1].is_empty());
    assert!(report.decisions[1].is_held());
    assert_eq!(report.held_trains().collect::<Vec<_>>(), [1]);
}

#[test]
fn trains_converging_on_a_junction() {
    let y = yard();
    let j0 = ep("j0", Branch::Facing);
    let j3 = ep("j3", Branch::Facing);

    let occupied = [single(&y.west, &j0, 0, 2), single(&y.south, &j3, 0, 2)];
    let requested = [single(&y.west, &j0, 0, 10), single(&y.south, &j3, 0, 8)];

    let report = verifying(&y.track)
        .allocate_with_report(&occupied, &requested)
        .unwrap();
    assert_eq!(report.routes[0], requested[0]);
    assert_eq!(report.routes[1], single(&y.south, &j3, 0, 7));

    let limit = report.decisions[1].limit.unwrap();
    assert_eq!(limit.cut, Cut::TruncatedAt(7));
    assert_eq!(limit.reason, CutReason::JunctionContested);
    assert_eq!(limit.blocker.train, 0);
    assert_eq!(limit.blocker.role, RouteRole::Allocated);
}

#[test]
fn swapping_priorities_swaps_the_winner() {
    let y = yard();
    let j0 = ep("j0", Branch::Facing);
    let j3 = ep("j3", Branch::Facing);

    let occupied = [single(&y.south, &j3, 0, 2), single(&y.west, &j0, 0, 2)];
    let requested = [single(&y.south, &j3, 0, 8), single(&y.west, &j0, 0, 10)];

    let allocated = verifying(&y.track).allocate(&occupied, &requested).unwrap();
    assert_eq!(allocated[0], requested[0]);
    assert_eq!(allocated[1], single(&y.west, &j0, 0, 9));
}

#[test]
fn occupied_junction_stops_both_trains() {
    let y = yard();
    let j0 = ep("j0", Branch::Facing);
    let j3 = ep("j3", Branch::Facing);
    let j1 = ep("j1", Branch::Facing);

    // Train 2 stands on the east section right at j1.
    let occupied = [
        single(&y.west, &j0, 0, 2),
        single(&y.south, &j3, 0, 2),
        single(&y.east, &j1, 0, 3),
    ];
    let requested = [
        single(&y.west, &j0, 0, 10),
        single(&y.south, &j3, 0, 8),
        occupied[2].clone(),
    ];

    let allocated = verifying(&y.track).allocate(&occupied, &requested).unwrap();
    assert_eq!(allocated[0], single(&y.west, &j0, 0, 9));
    assert_eq!(allocated[1], single(&y.south, &j3, 0, 7));
    assert_eq!(allocated[2], occupied[2]);
}

// ============================================================================
// Priority Semantics
// ============================================================================

#[test]
fn only_granted_track_is_reserved() {
    let y = yard();
    let j0 = ep("j0", Branch::Facing);
    let j1 = ep("j1", Branch::Facing);
    let j3 = ep("j3", Branch::Facing);

    // Train 0 asks to run through j1 onto the east section but train 2 is
    // parked in its way on the west section.
    let through = Route::new(vec![seg(&y.west, &j0, 0, 10), seg(&y.east, &j1, 0, 4)]).unwrap();
    let occupied = [
        single(&y.west, &j0, 0, 2),
        single(&y.south, &j3, 0, 2),
        single(&y.west, &j0, 5, 6),
    ];
    let requested = [
        through,
        single(&y.south, &j3, 0, 8),
        occupied[2].clone(),
    ];

    let allocated = verifying(&y.track).allocate(&occupied, &requested).unwrap();
    assert_eq!(allocated[0], single(&y.west, &j0, 0, 4));
    // Train 0 never reaches j1, so train 1 may run right up to it.
    assert_eq!(allocated[1], requested[1]);
    assert_eq!(allocated[2], occupied[2]);
}

#[test]
fn lower_priority_train_avoids_higher_priority_allocation() {
    let y = yard();
    let j0 = ep("j0", Branch::Facing);
    let j1 = ep("j1", Branch::Normal);

    // Both trains head towards each other along the west section.
    let occupied = [single(&y.west, &j0, 0, 1), single(&y.west, &j1, 0, 1)];
    let requested = [single(&y.west, &j0, 0, 7), single(&y.west, &j1, 0, 7)];

    let allocated = verifying(&y.track).allocate(&occupied, &requested).unwrap();
    assert_eq!(allocated[0], requested[0]);
    // Train 0 now holds [0, 7] from j0, i.e. [3, 10] from j1.
    assert_eq!(allocated[1], single(&y.west, &j1, 0, 2));
}

#[test]
fn allocation_is_deterministic() {
    let y = yard();
    let j0 = ep("j0", Branch::Facing);
    let j3 = ep("j3", Branch::Facing);
    let occupied = [single(&y.west, &j0, 0, 2), single(&y.south, &j3, 0, 2)];
    let requested = [single(&y.west, &j0, 0, 10), single(&y.south, &j3, 0, 8)];

    let allocator = verifying(&y.track);
    let first = allocator.allocate(&occupied, &requested).unwrap();
    for _ in 0..5 {
        assert_eq!(allocator.allocate(&occupied, &requested).unwrap(), first);
    }
}

#[test]
fn conflict_free_requests_are_returned_unchanged() {
    let y = yard();
    let j0 = ep("j0", Branch::Facing);
    let j2 = ep("j2", Branch::Facing);
    let j3 = ep("j3", Branch::Facing);

    let occupied = [
        single(&y.west, &j0, 0, 1),
        single(&y.east, &j2, 0, 1),
        single(&y.south, &j3, 0, 1),
    ];
    let requested = [
        single(&y.west, &j0, 0, 4),
        single(&y.east, &j2, 0, 5),
        single(&y.south, &j3, 0, 3),
    ];

    let report = verifying(&y.track)
        .allocate_with_report(&occupied, &requested)
        .unwrap();
    assert_eq!(report.routes, requested);
    assert!(report.decisions.iter().all(|d| d.is_intact()));
    assert_eq!(report.limited_trains().count(), 0);
}

// ============================================================================
// Precondition Failures
// ============================================================================

#[test]
fn routes_must_be_on_the_track() {
    let y = yard();
    let same_as_west = section(10, ep("j0", Branch::Facing), ep("j1", Branch::Normal));
    let shorter = section(9, ep("j0", Branch::Facing), ep("j1", Branch::Normal));
    let j0 = ep("j0", Branch::Facing);

    let on = single(&same_as_west, &j0, 0, 1);
    let off = single(&shorter, &j0, 0, 1);
    assert_eq!(
        allocate(&y.track, &[on.clone()], &[off]),
        Err(AllocationError::OffTrack {
            train: 0,
            role: RouteRole::Requested,
            segment: 0
        })
    );
    assert!(allocate(&y.track, &[on.clone()], &[on]).is_ok());
}

#[test]
fn occupied_routes_touching_at_a_junction_intersect() {
    let y = yard();
    let a = single(&y.west, &ep("j0", Branch::Facing), 5, 10);
    let b = single(&y.east, &ep("j1", Branch::Facing), 0, 2);
    assert_eq!(
        allocate(&y.track, &[a.clone(), b.clone()], &[a, b]),
        Err(AllocationError::OccupiedRoutesIntersect {
            first: 0,
            second: 1
        })
    );
}

// ============================================================================
// Exhaustive Checks
// ============================================================================

/// `a --s1(3)-- b --s2(2)-- c`
fn tiny() -> Track {
    Track::from_sections([
        section(3, ep("a", Branch::Facing), ep("b", Branch::Normal)),
        section(2, ep("b", Branch::Facing), ep("c", Branch::Facing)),
    ])
    .unwrap()
}

fn assert_safe(occupied: &[Route], requested: &[Route], allocated: &[Route]) {
    for (i, granted) in allocated.iter().enumerate() {
        assert!(
            granted.is_prefix_of(&requested[i]),
            "train {i} was granted more than it asked for"
        );
        for (j, route) in occupied.iter().enumerate() {
            assert!(
                i == j || !granted.intersects(route),
                "train {i} runs into train {j}"
            );
        }
        for (j, route) in allocated[..i].iter().enumerate() {
            assert!(
                !granted.intersects(route),
                "train {i} overlaps the allocation of train {j}"
            );
        }
    }
}

/// Every prefix of `route`, shortest first, starting with the empty route.
fn prefixes(route: &Route) -> Vec<Route> {
    let mut all = vec![Route::empty()];
    for (k, last) in route.iter().enumerate() {
        for end in last.start_offset()..=last.end_offset() {
            let mut segments = route.segments()[..k].to_vec();
            segments.push(
                Segment::new(
                    last.section().clone(),
                    last.departing_endpoint().clone(),
                    last.start_offset(),
                    end,
                )
                .unwrap(),
            );
            all.push(Route::new(segments).unwrap());
        }
    }
    all
}

/// Checks that no longer prefix of each request would still have been safe.
fn assert_longest(occupied: &[Route], requested: &[Route], allocated: &[Route]) {
    for (i, granted) in allocated.iter().enumerate() {
        let free = |candidate: &Route| {
            occupied
                .iter()
                .enumerate()
                .all(|(j, route)| i == j || !candidate.intersects(route))
                && allocated[..i].iter().all(|route| !candidate.intersects(route))
        };
        let longest = prefixes(&requested[i])
            .into_iter()
            .filter(|candidate| free(candidate))
            .last()
            .unwrap();
        assert_eq!(
            granted, &longest,
            "train {i} was cut short; occupied {occupied:?}, requested {requested:?}"
        );
    }
}

#[test]
fn two_trains_never_collide() {
    let track = tiny();
    let routes = all_routes(&track);
    let allocator = Allocator::new(&track);
    let mut cases = 0usize;

    for (x, o0) in routes.iter().enumerate() {
        for o1 in routes.iter().skip(x + 1).step_by(3) {
            if o0.intersects(o1) {
                continue;
            }
            let occupied = [o0.clone(), o1.clone()];
            for (k, r0) in routes.iter().enumerate() {
                let r1 = &routes[(k * 7 + x) % routes.len()];
                let requested = [r0.clone(), r1.clone()];
                let allocated = allocator.allocate(&occupied, &requested).unwrap();
                assert_safe(&occupied, &requested, &allocated);
                assert_longest(&occupied, &requested, &allocated);
                cases += 1;
            }
        }
    }
    assert!(cases > 1000);
}

#[test]
fn three_trains_never_collide() {
    let track = tiny();
    let routes: Vec<Route> = all_routes(&track).into_iter().filter(|r| r.len() == 1).collect();
    let allocator = Allocator::new(&track);

    for (x, o0) in routes.iter().enumerate().step_by(2) {
        for o1 in routes.iter().skip(x + 1).step_by(3) {
            for o2 in routes.iter().skip(x + 2).step_by(5) {
                if o0.intersects(o1) || o0.intersects(o2) || o1.intersects(o2) {
                    continue;
                }
                let occupied = [o0.clone(), o1.clone(), o2.clone()];
                for k in 0..routes.len() {
                    let requested = [
                        routes[k].clone(),
                        routes[(k * 3 + 1) % routes.len()].clone(),
                        routes[(k * 5 + 2) % routes.len()].clone(),
                    ];
                    let allocated = allocator.allocate(&occupied, &requested).unwrap();
                    assert_safe(&occupied, &requested, &allocated);
                    assert_longest(&occupied, &requested, &allocated);
                }
            }
        }
    }
}

#[test]
fn a_lone_train_always_gets_its_request() {
    let track = tiny();
    for route in all_routes(&track) {
        let allocated = allocate(&track, &[route.clone()], &[route.clone()]).unwrap();
        assert_eq!(allocated, vec![route]);
    }
}
