//! Prime helpers for sizing the slot array.

/// Smallest capacity a table may have.
pub const MIN_PRIME: usize = 3;
/// Largest capacity a table may have; growth saturates here.
pub const MAX_PRIME: usize = 99_991;

/// Trial division up to `n / 2`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    (2..=n / 2).all(|d| n % d != 0)
}

/// Smallest prime strictly greater than `from` inside `[MIN_PRIME, MAX_PRIME]`.
///
/// Starting points below the range begin the scan at `MIN_PRIME`. When no
/// prime is found before the ceiling the result saturates to `MAX_PRIME`.
pub fn next_prime(from: usize) -> usize {
    let start = from.max(MIN_PRIME - 1).saturating_add(1);
    (start..MAX_PRIME).find(|&n| is_prime(n)).unwrap_or(MAX_PRIME)
}

/// Clamp a requested capacity into range and round it up to a prime.
pub(crate) fn clamp_capacity(requested: usize) -> usize {
    if requested < MIN_PRIME {
        MIN_PRIME
    } else if requested > MAX_PRIME {
        MAX_PRIME
    } else if is_prime(requested) {
        requested
    } else {
        next_prime(requested)
    }
}
