//! Operators combining several sources.

use std::{cell::RefCell, rc::Rc};

use crate::stream::{Replay, Source, Subject};

/// Combine the latest values of `a` and `b`.
///
/// Each source writes into its own single-slot cell. The joined stream emits
/// once both cells are filled and again on every later update of either
/// source, always with the latest value of each. It replays its latest pair.
pub fn join<A, B, SA, SB>(a: &SA, b: &SB) -> Replay<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    SA: Source<A>,
    SB: Source<B>,
{
    let joined = Replay::new();
    let cells: Rc<RefCell<(Option<A>, Option<B>)>> = Rc::new(RefCell::new((None, None)));

    {
        let cells = cells.clone();
        let joined = joined.clone();
        a.subscribe(move |value: &A| {
            let pair = {
                let mut cells = cells.borrow_mut();
                cells.0 = Some(value.clone());
                cells.1.clone().map(|b| (value.clone(), b))
            };
            if let Some(pair) = pair {
                joined.emit(pair);
            }
        });
    }
    {
        let joined = joined.clone();
        b.subscribe(move |value: &B| {
            let pair = {
                let mut cells = cells.borrow_mut();
                cells.1 = Some(value.clone());
                cells.0.clone().map(|a| (a, value.clone()))
            };
            if let Some(pair) = pair {
                joined.emit(pair);
            }
        });
    }

    joined
}

/// Pair every value of `trigger` with the latest value of `latest`.
///
/// Trigger values that arrive before `latest` has produced anything are
/// dropped. The latest value is read at trigger time, never re-derived.
pub fn with_latest_from<E, T, ST>(trigger: &ST, latest: &Replay<T>) -> Subject<(E, T)>
where
    E: Clone + 'static,
    T: Clone + 'static,
    ST: Source<E>,
{
    let sampled = Subject::new();
    let out = sampled.clone();
    let latest = latest.clone();
    trigger.subscribe(move |event: &E| match latest.latest() {
        Some(value) => out.next((event.clone(), value)),
        None => log::debug!("trigger ignored, nothing to combine with yet"),
    });
    sampled
}
