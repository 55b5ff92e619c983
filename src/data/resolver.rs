use super::model::ComplexSample;

// ---------------------------------------------------------------------------
// Resolution – where a marker frequency lands in a sweep
// ---------------------------------------------------------------------------

/// Outcome of [`resolve`]: the matched sample index plus the neighbouring
/// frequencies a step-navigation control can jump to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    pub index: Option<usize>,
    pub prev_freq: Option<u64>,
    pub next_freq: Option<u64>,
}

impl Resolution {
    pub const UNRESOLVED: Resolution = Resolution {
        index: None,
        prev_freq: None,
        next_freq: None,
    };

    pub fn is_resolved(&self) -> bool {
        self.index.is_some()
    }
}

// ---------------------------------------------------------------------------
// Nearest-sample search
// ---------------------------------------------------------------------------

/// Find the sample nearest to `target_freq`.
///
/// The data range is widened by half a step on each side (half the first
/// step below, half the last step above); targets outside it stay
/// unresolved. Inside it a single pass keeps the running minimum distance
/// and stops at the first sample that is farther away than that minimum.
/// Equal distances keep the scan going, so a target exactly between two
/// points resolves to the upper one.
///
/// `prev_freq` is taken two positions before the sample where the distance
/// first grew, and `next_freq` is that sample itself.
pub fn resolve(target_freq: u64, samples: &[ComplexSample]) -> Resolution {
    if target_freq == 0 || samples.is_empty() {
        return Resolution::UNRESOLVED;
    }

    let n = samples.len();
    let min_freq = samples[0].freq;
    let max_freq = samples[n - 1].freq;
    let (lower_step, upper_step) = if n >= 2 {
        (
            samples[1].freq.saturating_sub(samples[0].freq),
            samples[n - 1].freq.saturating_sub(samples[n - 2].freq),
        )
    } else {
        (0, 0)
    };

    // Compare doubled values so the half-step margins stay exact in integers.
    let target2 = u128::from(target_freq) * 2;
    if target2 + u128::from(lower_step) < u128::from(min_freq) * 2
        || target2 > u128::from(max_freq) * 2 + u128::from(upper_step)
    {
        log::debug!(
            "Frequency {target_freq} Hz is outside the sweep {min_freq}..={max_freq} Hz"
        );
        return Resolution::UNRESOLVED;
    }

    let mut min_distance = u64::MAX;
    for (i, sample) in samples.iter().enumerate() {
        let distance = sample.freq.abs_diff(target_freq);
        if distance <= min_distance {
            min_distance = distance;
            continue;
        }
        // Moving away from the nearest point now.
        return Resolution {
            index: Some(i - 1),
            prev_freq: i.checked_sub(2).map(|p| samples[p].freq),
            next_freq: Some(sample.freq),
        };
    }

    // Distance never grew: the last point is the nearest.
    Resolution {
        index: Some(n - 1),
        prev_freq: n.checked_sub(2).map(|p| samples[p].freq),
        next_freq: None,
    }
}
