//! Stop-ordering solvers.
//!
//! A solver takes an N×N cost matrix and returns a visiting order over all
//! indices, starting at 0 (the vehicle's current position).  The client
//! accepts any `FnOnce(&[Vec<f64>]) -> Vec<usize>`; this module provides the
//! default.

/// Nearest-neighbour tour: from the current index, always go to the
/// cheapest unvisited one.  Ties break toward the lower index.
pub fn greedy_ordering(matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = matrix.len();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[0] = true;
    order.push(0);

    while order.len() < n {
        let next = (0..n)
            .filter(|&j| !visited[j])
            .min_by(|&a, &b| {
                let ca = matrix[current].get(a).copied().unwrap_or(f64::INFINITY);
                let cb = matrix[current].get(b).copied().unwrap_or(f64::INFINITY);
                ca.total_cmp(&cb).then(a.cmp(&b))
            });
        let Some(next) = next else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }
    order
}
