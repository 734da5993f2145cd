// src/data_analysis/sentinel.rs

use crate::types::SampleGroups;

/// Replaces every exact zero with `sentinel` so the values can be shown on a log axis.
/// Other values, including ones already equal to the sentinel, are left alone.
pub fn substitute_zeros(groups: &SampleGroups, sentinel: f64) -> SampleGroups {
    let mut substituted = groups.clone();
    substitute_zeros_in_place(&mut substituted, sentinel);
    substituted
}

pub fn substitute_zeros_in_place(groups: &mut SampleGroups, sentinel: f64) -> usize {
    let mut replaced = 0;
    for values in groups.values_mut() {
        for v in values.iter_mut().filter(|v| **v == 0.0) {
            *v = sentinel;
            replaced += 1;
        }
    }
    replaced
}

/// Inverse of [`substitute_zeros`]: maps the sentinel back to zero.
///
/// Measurements that genuinely equal the sentinel cannot be told apart from
/// substituted zeros and are mapped to zero as well.
pub fn restore_zeros(groups: &SampleGroups, sentinel: f64) -> SampleGroups {
    let mut restored = groups.clone();
    for values in restored.values_mut() {
        for v in values.iter_mut().filter(|v| **v == sentinel) {
            *v = 0.0;
        }
    }
    restored
}


// src/data_analysis/sentinel.rs
