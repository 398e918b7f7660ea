use super::responses::{Likert, LikertRangeError};

/// Reverse-codes a raw Likert rating (`6 - value`).
///
/// Fails for anything outside 1-5 rather than clamping.
pub fn reverse_likert(value: i64) -> Result<u8, LikertRangeError> {
    Likert::new(value).map(|rating| rating.reversed().get())
}

/// Rating as it contributes to its dimension.
pub(crate) fn coded_value(rating: Likert, reverse_scored: bool) -> Likert {
    if reverse_scored {
        rating.reversed()
    } else {
        rating
    }
}
