// src/types.rs

use crate::data_analysis::box_stats::BoxStats;

/// One labeled group of measurements, in figure order.
pub type NamedSample = (String, Vec<f64>);

/// Ordered collection of labeled samples (left-to-right figure order).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleGroups {
    groups: Vec<NamedSample>,
}

impl SampleGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a group, replacing the values of an existing group with the same label.
    pub fn insert(&mut self, label: impl Into<String>, values: Vec<f64>) {
        let label = label.into();
        match self.groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = values,
            None => self.groups.push((label, values)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.groups.iter().map(|(l, v)| (l.as_str(), v.as_slice()))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Vec<f64>> {
        self.groups.iter_mut().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<NamedSample> for SampleGroups {
    fn from_iter<T: IntoIterator<Item = NamedSample>>(iter: T) -> Self {
        let mut groups = SampleGroups::new();
        for (label, values) in iter {
            groups.insert(label, values);
        }
        groups
    }
}

/// A group ready to draw: plotted values with their swarm offsets and box summary.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLayout {
    pub label: String,
    pub values: Vec<f64>,
    pub offsets: Vec<f64>,
    pub box_stats: Option<BoxStats>,
}

impl GroupLayout {
    /// Scatter coordinates for a group centered at `center`.
    pub fn points(&self, center: f64) -> Vec<(f64, f64)> {
        self.offsets
            .iter()
            .zip(self.values.iter())
            .map(|(dx, y)| (center + dx, *y))
            .collect()
    }
}


// src/types.rs
