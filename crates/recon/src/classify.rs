use crate::model::Finding;

/// Classify one joined billing row. First matching rule wins.
///
/// `good` and `bad` are the per-key physical sums, `aggregate` is the joined
/// good+bad total (zero when the key never appears in the physical count).
/// The engine always passes `aggregate == good + bad`; the parameters stay
/// separate so the full decision table is expressible and testable.
pub fn classify(billed: i64, good: i64, bad: i64, aggregate: i64) -> Finding {
    let received = good + bad;
    if received > billed && received == aggregate {
        return Finding::ShouldPayMore;
    }
    // The two guards are mutually exclusive for integers; no input reaches
    // this arm.
    if aggregate - billed > 0 && aggregate < billed {
        return Finding::ImproperCharge;
    }
    if aggregate - billed > 0 {
        return Finding::CustomerSurplus;
    }
    if aggregate - billed < 0 {
        if aggregate > 0 {
            return Finding::EntryError;
        }
        return Finding::NothingReceived;
    }
    Finding::Correct
}
