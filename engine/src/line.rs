use crate::grid::MAX_TILE;

/// Result of sliding one line toward index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    pub line: Vec<u32>,
    pub moved: bool,
    /// Indices in `line` holding a tile produced by a merge.
    pub merged: Vec<usize>,
    pub score: u64,
}

/// Slide every tile toward index 0 and merge equal neighbours.
///
/// Merges happen in a single pass from the front: a tile produced by a merge
/// is never merged again in the same call, so `[2, 2, 2, 2]` becomes
/// `[4, 4, 0, 0]` rather than `[8, 0, 0, 0]`. Tiles at [`MAX_TILE`] stay as
/// they are.
pub fn slide_and_merge(line: &[u32]) -> LineOutcome {
    let mut filtered: Vec<u32> = line.iter().copied().filter(|v| *v != 0).collect();
    let mut merged = Vec::new();
    let mut score = 0;

    let mut i = 0;
    while i + 1 < filtered.len() {
        if filtered[i] == filtered[i + 1] && filtered[i] < MAX_TILE {
            filtered[i] *= 2;
            score += u64::from(filtered[i]);
            filtered[i + 1] = 0;
            // every earlier merge left one zero behind, which compaction removes
            merged.push(i - merged.len());
        }
        i += 1;
    }

    filtered.retain(|v| *v != 0);
    filtered.resize(line.len(), 0);

    let moved = filtered != line;

    LineOutcome {
        line: filtered,
        moved,
        merged,
        score,
    }
}
