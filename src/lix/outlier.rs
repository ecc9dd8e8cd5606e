//! Median and standard-deviation based rejection of outlying item scores.

/// Default standard deviation above which outliers are removed.
pub const DEFAULT_DEVIATION_CAP: f64 = 10.0;

/// Items split by [`filter_outliers`]. Both halves keep input order.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierSplit<T> {
    pub kept: Vec<T>,
    pub removed: Vec<T>,
}

/// Median of `values`; the mean of the two middle values when the count is
/// even. `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation. `None` for an empty slice.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Remove items whose score lies more than one standard deviation from the
/// median, but only when the standard deviation exceeds `cap`.
///
/// Items exactly one deviation away are kept. If the deviation is within
/// the cap, every item is kept.
pub fn filter_outliers<T, F>(items: Vec<T>, score: F, cap: f64) -> OutlierSplit<T>
where
    F: Fn(&T) -> u32,
{
    let scores: Vec<f64> = items.iter().map(|item| f64::from(score(item))).collect();
    let (Some(median), Some(sd)) = (median(&scores), std_dev(&scores)) else {
        return OutlierSplit {
            kept: items,
            removed: Vec::new(),
        };
    };

    if sd <= cap {
        return OutlierSplit {
            kept: items,
            removed: Vec::new(),
        };
    }

    let (low, high) = (median - sd, median + sd);
    log::debug!("standard deviation {sd:.2} exceeds {cap}, keeping scores in {low:.2}..={high:.2}");

    let (kept, removed): (Vec<T>, Vec<T>) = items.into_iter().partition(|item| {
        let value = f64::from(score(item));
        (low..=high).contains(&value)
    });

    // Rounding in the deviation can leave nothing when two middle values
    // sit exactly one deviation out.
    if kept.is_empty() {
        let mut items = removed;
        items.sort_by_key(|item| score(item));
        return OutlierSplit {
            kept: items,
            removed: Vec::new(),
        };
    }
    OutlierSplit { kept, removed }
}
