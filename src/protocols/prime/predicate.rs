//! Primality test.

/// Returns true if `n` is prime.
///
/// Trial division by 2, 3 and then every `6k - 1` / `6k + 1` candidate up
/// to `floor(sqrt(n))`. Candidates are squared in 128-bit arithmetic so the
/// loop bound cannot overflow near `i64::MAX`.
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let n = n as u64;
    let mut i: u64 = 5;
    while u128::from(i) * u128::from(i) <= u128::from(n) {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}
