use crate::key::Record;
use crate::{Error, Query, RecordCache, RemoteModelOptions, RowRange, ScrollDirection};

/// Computes the fetch needed to fill `range`, or `None` when nothing should be fetched.
///
/// The range is scanned in `direction`; the span between the first and last missing rows (in scan
/// order) is what gets requested. Spans shorter than `options.minimum_load` are extended in the
/// scan direction so each request loads at least that many rows. Nothing is fetched when every
/// row is cached, or when the total is known and every missing row lies at or beyond it.
pub fn find_missing<R: Record>(
    cache: &RecordCache<R>,
    range: RowRange,
    direction: ScrollDirection,
    options: &RemoteModelOptions,
) -> Result<Option<Query>, Error> {
    if range.is_empty() {
        return Err(Error::InvalidRange {
            from: range.from as i64,
            to: range.to as i64,
        });
    }

    let mut first_missing = None;
    let mut last_missing = None;
    let mut note = |i: usize| {
        if !cache.contains(i) {
            first_missing.get_or_insert(i);
            last_missing = Some(i);
        }
    };
    match direction {
        ScrollDirection::Forward => (range.from..range.to).for_each(&mut note),
        ScrollDirection::Backward => (range.from..range.to).rev().for_each(&mut note),
    }

    let (Some(first), Some(last)) = (first_missing, last_missing) else {
        rtrace!(from = range.from, to = range.to, "find_missing: all rows cached");
        return Ok(None);
    };
    if let Some(total) = cache.total().known() {
        if first.min(last) >= total {
            rtrace!(
                from = range.from,
                to = range.to,
                total,
                "find_missing: gap lies past the end"
            );
            return Ok(None);
        }
    }

    let span = first.abs_diff(last) + 1;
    let end = match options.minimum_load {
        Some(min) if min > 0 && span < min => match direction {
            ScrollDirection::Forward => first.saturating_add(min - 1),
            ScrollDirection::Backward => first.saturating_sub(min - 1),
        },
        _ => last,
    };

    // `saturating_sub` above already clamps a backward extension at row 0.
    let from = first.min(end);
    let to = first.max(end) + 1;
    rtrace!(from, to, ?direction, "find_missing: will load");

    Ok(Some(options.query(from, to)))
}
