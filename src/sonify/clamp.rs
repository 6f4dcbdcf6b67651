/// Bound `n` into the inclusive range `[smallest, largest]`.
///
/// Comparisons run in order: below `smallest` wins first, then above `largest`.
/// Unlike `f64::clamp` this never panics, so an inverted range still yields
/// one of its two bounds.
pub fn clamp<T: PartialOrd>(n: T, smallest: T, largest: T) -> T {
    if n < smallest {
        smallest
    } else if n > largest {
        largest
    } else {
        n
    }
}
