use super::SpanDistribs;
use crate::Result;
use crate::errors::MeshError;

/// Computes the bending moment at each station from the strip forces already stored in
/// `spans`.  The moment at a station sums the moments, about its quarter chord point, of the
/// forces of every station between it and the tip of its side.  Stations at negative span
/// positions accumulate from the lower indices, the others from the higher indices, so the
/// stations must be ordered from the left tip to the right tip.
///
/// Only the y and z lever arms contribute to the moment about the x axis.
pub fn compute_bending(spans: &mut SpanDistribs) -> Result<()> {
    let n = spans.len();
    if !spans.is_consistent() {
        return Err(Box::new(MeshError::StationMismatch {
            expected: n,
            found: spans.f.len().min(spans.c4.len()),
        }));
    }

    let moments: Vec<f64> = (0..n)
        .map(|j| {
            let c4 = spans.c4[j];
            if spans.strip_pos[j] <= 0.0 {
                (0..j).map(|jj| -(spans.c4[jj] - c4).cross(&spans.f[jj]).x).sum()
            } else {
                (j + 1..n).map(|jj| (spans.c4[jj] - c4).cross(&spans.f[jj]).x).sum()
            }
        })
        .collect();

    spans.bending_moment = moments;
    Ok(())
}
