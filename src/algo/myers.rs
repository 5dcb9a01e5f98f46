//! Myers alignment for opaque item sequences.
//!
//! # Algorithm Choice: Why Myers?
//!
//! | Algorithm | Time | Space | Best for |
//! |-----------|------|-------|----------|
//! | DP | O(n*m) | O(min(n,m)) | General |
//! | **Myers** | O((n+m)*d) | O(d*(n+m)) | **Small diffs** |
//!
//! Display-bound collections change a handful of rows per update, so the
//! edit distance `d` is typically tiny and Myers is effectively linear.
//! Sequences of at most 8 items skip Myers entirely and run a
//! cache-friendly DP table instead.
//!
//! Unlike textbook Myers, items are matched with a caller-supplied
//! predicate rather than `Eq`: identity lives in the comparator, not in
//! the item type. When several items match under the predicate, the snake
//! extension pairs the earliest unmatched candidate in sequence order.
//!
//! # References
//!
//! - Myers, E.W. "An O(ND) Difference Algorithm and Its Variations" (1986)
//!
//! # Implementation Notes
//!
//! - Common prefix/suffix stripping before the core loop
//! - Full trace kept for backtracking: O(d) snapshots of size O(n+m)

/// Compute the longest common subsequence of `old` and `new` under the
/// `same` predicate.
///
/// Returns ascending `(old_idx, new_idx)` pairs. Empty inputs align to
/// nothing.
pub fn align<T, F>(old: &[T], new: &[T], same: F) -> Vec<(usize, usize)>
where
    F: Fn(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();

    if n == 0 || m == 0 {
        return Vec::new();
    }

    let same = &same;

    // Optimization: strip common prefix
    let mut prefix_len = 0;
    while prefix_len < n && prefix_len < m && same(&old[prefix_len], &new[prefix_len]) {
        prefix_len += 1;
    }

    // Optimization: strip common suffix
    let mut suffix_len = 0;
    while suffix_len < (n - prefix_len)
        && suffix_len < (m - prefix_len)
        && same(&old[n - 1 - suffix_len], &new[m - 1 - suffix_len])
    {
        suffix_len += 1;
    }

    let mut pairs: Vec<(usize, usize)> = (0..prefix_len).map(|i| (i, i)).collect();

    // Process middle portion with Myers
    let old_mid = &old[prefix_len..n - suffix_len];
    let new_mid = &new[prefix_len..m - suffix_len];

    if !old_mid.is_empty() && !new_mid.is_empty() {
        for (oi, ni) in myers_core(old_mid, new_mid, same) {
            pairs.push((oi + prefix_len, ni + prefix_len));
        }
    }

    for i in 0..suffix_len {
        pairs.push((n - suffix_len + i, m - suffix_len + i));
    }

    pairs
}

/// Myers algorithm core.
///
/// The key insight: explore the edit graph by d (edit distance), not by
/// position. For each d, track the furthest-reaching path on each
/// diagonal k = x - y.
fn myers_core<T, F>(old: &[T], new: &[T], same: &F) -> Vec<(usize, usize)>
where
    F: Fn(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();

    // Small array optimization: a plain DP table beats the diagonal
    // bookkeeping for short sequences.
    if n <= SMALL_DP_LIMIT && m <= SMALL_DP_LIMIT {
        return small_dp(old, new, same);
    }

    let max_d = n + m;
    let offset = max_d; // To handle negative k indices

    // V[k + offset] = furthest x on diagonal k
    let mut v = vec![0usize; 2 * max_d + 1];

    // Store V at each d for backtracking
    let mut trace: Vec<Vec<usize>> = Vec::new();

    // Forward pass: find shortest edit script
    'outer: for d in 0..=max_d {
        trace.push(v.clone());

        // Iterate over diagonals k in [-d, d] with same parity as d
        for k in (-(d as isize)..=(d as isize)).step_by(2) {
            let kk = (k + offset as isize) as usize;

            // Decide: come from k-1 (delete) or k+1 (insert)?
            // At k=-d, must come from k+1; at k=d, from k-1;
            // otherwise pick whichever reaches further right.
            let mut x = if k == -(d as isize) || (k != d as isize && v[kk - 1] < v[kk + 1]) {
                v[kk + 1] // insert: x stays, y advances
            } else {
                v[kk - 1] + 1 // delete: x advances
            };

            let mut y = (x as isize - k) as usize;

            // Extend snake: follow the diagonal while items match
            while x < n && y < m && same(&old[x], &new[y]) {
                x += 1;
                y += 1;
            }

            v[kk] = x;

            if x >= n && y >= m {
                break 'outer;
            }
        }
    }

    backtrack(&trace, old, new, same, offset)
}

/// Backtrack through the trace to extract LCS pairs.
fn backtrack<T, F>(
    trace: &[Vec<usize>],
    old: &[T],
    new: &[T],
    same: &F,
    offset: usize,
) -> Vec<(usize, usize)>
where
    F: Fn(&T, &T) -> bool,
{
    let mut x = old.len();
    let mut y = new.len();
    let mut pairs = Vec::new();

    for (d, v) in trace.iter().enumerate().rev() {
        let k = x as isize - y as isize;
        let kk = (k + offset as isize) as usize;

        // Determine the diagonal we arrived from
        let prev_k = if d == 0 {
            0isize
        } else if k == -(d as isize) || (k != d as isize && v[kk - 1] < v[kk + 1]) {
            k + 1 // came from insert
        } else {
            k - 1 // came from delete
        };

        let prev_kk = (prev_k + offset as isize) as usize;
        let prev_x = if d == 0 { 0 } else { v[prev_kk] };
        let prev_y = (prev_x as isize - prev_k) as usize;

        // Collect matches along the snake (diagonal moves)
        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            if same(&old[x], &new[y]) {
                pairs.push((x, y));
            }
        }

        // Step back across the edit itself
        if d > 0 {
            if prev_k < k {
                x = prev_x;
            } else {
                y = prev_y;
            }
        }

        if x == 0 && y == 0 {
            break;
        }
    }

    pairs.reverse();
    pairs
}

/// Largest input handled by the DP fast path.
const SMALL_DP_LIMIT: usize = 8;

/// Simple O(n*m) DP for short sequences.
///
/// A stack-allocated table with sequential access beats the diagonal
/// search below [`SMALL_DP_LIMIT`].
fn small_dp<T, F>(old: &[T], new: &[T], same: &F) -> Vec<(usize, usize)>
where
    F: Fn(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();

    // dp[i][j] = LCS length of old[0..i] and new[0..j]
    let mut dp = [[0u8; SMALL_DP_LIMIT + 1]; SMALL_DP_LIMIT + 1];

    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if same(&old[i - 1], &new[j - 1]) {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut pairs = Vec::with_capacity(dp[n][m] as usize);
    let mut i = n;
    let mut j = m;

    while i > 0 && j > 0 {
        if same(&old[i - 1], &new[j - 1]) {
            pairs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    pairs.reverse();
    pairs
}
