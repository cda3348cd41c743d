//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use rs_interlock::{Branch, Endpoint, Junction, Route, Section, Segment, Track};

pub fn ep(name: &str, branch: Branch) -> Endpoint {
    Endpoint::new(Junction::new(name).unwrap(), branch)
}

pub fn section(length: u32, a: Endpoint, b: Endpoint) -> Section {
    Section::new(length, a, b).unwrap()
}

pub fn seg(section: &Section, from: &Endpoint, start: u32, end: u32) -> Segment {
    Segment::new(section.clone(), from.clone(), start, end).unwrap()
}

pub fn single(section: &Section, from: &Endpoint, start: u32, end: u32) -> Route {
    Route::single(seg(section, from, start, end))
}

/// A small yard:
///
/// ```text
/// j0 --west(10)-- j1 --east(10)-- j2
///                 |
///            south(8)
///                 |
///                 j3
/// ```
///
/// `west` arrives on j1 NORMAL, `south` on j1 REVERSE and `east` leaves
/// from j1 FACING.
pub struct Yard {
    pub track: Track,
    pub west: Section,
    pub east: Section,
    pub south: Section,
}

pub fn yard() -> Yard {
    let west = section(10, ep("j0", Branch::Facing), ep("j1", Branch::Normal));
    let east = section(10, ep("j1", Branch::Facing), ep("j2", Branch::Facing));
    let south = section(8, ep("j3", Branch::Facing), ep("j1", Branch::Reverse));
    let track = Track::from_sections([west.clone(), east.clone(), south.clone()]).unwrap();
    Yard {
        track,
        west,
        east,
        south,
    }
}

/// Every route on `track` of at most two segments, in a fixed order.
///
/// Meant for layouts with a handful of short sections.
pub fn all_routes(track: &Track) -> Vec<Route> {
    let mut singles = Vec::new();
    for section in track {
        for from in section.endpoints() {
            for start in 0..=section.length() {
                for end in start..=section.length() {
                    singles.push(seg(section, from, start, end));
                }
            }
        }
    }

    let mut routes: Vec<Route> = singles.iter().cloned().map(Route::single).collect();
    for first in &singles {
        for next in &singles {
            if let Ok(route) = Route::new(vec![first.clone(), next.clone()]) {
                routes.push(route);
            }
        }
    }
    routes
}
