//! Per-segment road metadata.
//!
//! Attributes are keyed by the `(from, to)` vertex pair rather than by
//! `EdgeId` so a table can be written before the graph exists (e.g. from a
//! scenario file).  Pairs that were never set read back as
//! [`RoadAttributes::default`].

use std::collections::HashMap;

use tsim_core::VertexId;

/// Metadata attached to one directed road segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoadAttributes {
    /// Lane width.  Display only.
    pub width: f64,
    /// Free-form name shown by renderers.
    pub label: String,
    /// Fraction of a vehicle's top speed allowed on this segment, in `(0, 1]`.
    pub speed_factor: f64,
}

impl Default for RoadAttributes {
    fn default() -> Self {
        Self { width: 1.0, label: String::new(), speed_factor: 1.0 }
    }
}

impl RoadAttributes {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    pub fn with_speed_factor(mut self, speed_factor: f64) -> Self {
        self.speed_factor = speed_factor;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// `true` if `speed_factor` is in `(0, 1]` and `width` is finite.
    pub fn is_valid(&self) -> bool {
        self.speed_factor > 0.0 && self.speed_factor <= 1.0 && self.width.is_finite()
    }
}

/// Lookup table from `(from, to)` to [`RoadAttributes`].
#[derive(Debug, Clone, Default)]
pub struct RoadTable {
    entries:  HashMap<(VertexId, VertexId), RoadAttributes>,
    fallback: RoadAttributes,
}

impl RoadTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes of `from → to`, or the default when unset.
    #[inline]
    pub fn get(&self, from: VertexId, to: VertexId) -> &RoadAttributes {
        self.entries.get(&(from, to)).unwrap_or(&self.fallback)
    }

    /// Store attributes for `from → to`, returning the previous entry.
    pub fn insert(
        &mut self,
        from: VertexId,
        to: VertexId,
        attrs: RoadAttributes,
    ) -> Option<RoadAttributes> {
        self.entries.insert((from, to), attrs)
    }

    pub fn contains(&self, from: VertexId, to: VertexId) -> bool {
        self.entries.contains_key(&(from, to))
    }

    /// Explicitly set entries, sorted by `(from, to)`.
    pub fn iter(&self) -> Vec<((VertexId, VertexId), &RoadAttributes)> {
        let mut out: Vec<_> = self.entries.iter().map(|(k, v)| (*k, v)).collect();
        out.sort_by_key(|(k, _)| *k);
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<((VertexId, VertexId), RoadAttributes)> for RoadTable {
    fn from_iter<I: IntoIterator<Item = ((VertexId, VertexId), RoadAttributes)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect(), fallback: RoadAttributes::default() }
    }
}
