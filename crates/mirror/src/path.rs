use foundation::math::{Coord, LatLng};
use runtime::array::ObservableVec;
use runtime::event_bus::Subscription;
use scene::components::CoordArray;

/// Map position to globe coordinate: same lat/lng, on the ground.
pub fn project(p: &LatLng) -> Coord {
    Coord::from(*p)
}

/// Keeps `target` equal to the projection of `source`, edit by edit.
///
/// `target` is overwritten with the current path, then each insert, remove,
/// or set on `source` is replayed on `target` by shifting elements off the
/// nearer end, so an edit costs `O(min(i, len - i))` instead of a rebuild.
/// The returned subscriptions (one per edit kind) stop the mirroring when
/// dropped.
pub fn bind(source: &ObservableVec<LatLng>, target: &CoordArray) -> Vec<Subscription> {
    target.clear();
    for p in source.to_vec() {
        target.push_back(project(&p));
    }

    let on_insert = {
        let target = target.clone();
        source.on_insert_at(move |i, p| insert_at(&target, i, project(p)))
    };
    let on_remove = {
        let target = target.clone();
        source.on_remove_at(move |i, _| remove_at(&target, i))
    };
    let on_set = {
        let target = target.clone();
        source.on_set_at(move |i, _, p| target.set(i, project(p)))
    };
    vec![on_insert, on_remove, on_set]
}

fn insert_at(target: &CoordArray, i: usize, coord: Coord) {
    let len = target.len();
    if 2 * i < len {
        let head: Vec<Coord> = (0..i).filter_map(|_| target.pop_front()).collect();
        target.push_front(coord);
        for c in head.into_iter().rev() {
            target.push_front(c);
        }
    } else {
        let tail: Vec<Coord> = (i..len).filter_map(|_| target.pop_back()).collect();
        target.push_back(coord);
        for c in tail.into_iter().rev() {
            target.push_back(c);
        }
    }
}

fn remove_at(target: &CoordArray, i: usize) {
    let len = target.len();
    if 2 * i < len {
        let head: Vec<Coord> = (0..i).filter_map(|_| target.pop_front()).collect();
        target.pop_front();
        for c in head.into_iter().rev() {
            target.push_front(c);
        }
    } else {
        let tail: Vec<Coord> = (i + 1..len).filter_map(|_| target.pop_back()).collect();
        target.pop_back();
        for c in tail.into_iter().rev() {
            target.push_back(c);
        }
    }
}
