//! Per-run transform set
//!
//! Transforms are keyed by kind: a later `\frz` replaces an earlier one in
//! place instead of stacking, so the list keeps first-seen order.

use smallvec::SmallVec;

use crate::utils::math::lerp;

/// One element transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Translation in script pixels (shapes only)
    Translate {
        /// Horizontal offset
        x: f64,
        /// Vertical offset
        y: f64,
    },
    /// Horizontal shear factor (`\fax`)
    SkewX(f64),
    /// Vertical shear factor (`\fay`)
    SkewY(f64),
    /// Rotation around the X axis in degrees (`\frx`)
    RotateX(f64),
    /// Rotation around the Y axis in degrees (`\fry`)
    RotateY(f64),
    /// Counter-clockwise rotation in degrees (`\frz`, style angle)
    RotateZ(f64),
    /// Horizontal scale factor, 1.0 is unscaled (`\fscx`)
    ScaleX(f64),
    /// Vertical scale factor (`\fscy`)
    ScaleY(f64),
}

/// Discriminant used to key a [`TransformSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// [`Transform::Translate`]
    Translate,
    /// [`Transform::SkewX`]
    SkewX,
    /// [`Transform::SkewY`]
    SkewY,
    /// [`Transform::RotateX`]
    RotateX,
    /// [`Transform::RotateY`]
    RotateY,
    /// [`Transform::RotateZ`]
    RotateZ,
    /// [`Transform::ScaleX`]
    ScaleX,
    /// [`Transform::ScaleY`]
    ScaleY,
}

impl Transform {
    /// Kind of this transform
    #[must_use]
    pub const fn kind(&self) -> TransformKind {
        match self {
            Self::Translate { .. } => TransformKind::Translate,
            Self::SkewX(_) => TransformKind::SkewX,
            Self::SkewY(_) => TransformKind::SkewY,
            Self::RotateX(_) => TransformKind::RotateX,
            Self::RotateY(_) => TransformKind::RotateY,
            Self::RotateZ(_) => TransformKind::RotateZ,
            Self::ScaleX(_) => TransformKind::ScaleX,
            Self::ScaleY(_) => TransformKind::ScaleY,
        }
    }

    /// Transform of the same kind that leaves the element unchanged
    #[must_use]
    pub const fn identity_of(kind: TransformKind) -> Self {
        match kind {
            TransformKind::Translate => Self::Translate { x: 0.0, y: 0.0 },
            TransformKind::SkewX => Self::SkewX(0.0),
            TransformKind::SkewY => Self::SkewY(0.0),
            TransformKind::RotateX => Self::RotateX(0.0),
            TransformKind::RotateY => Self::RotateY(0.0),
            TransformKind::RotateZ => Self::RotateZ(0.0),
            TransformKind::ScaleX => Self::ScaleX(1.0),
            TransformKind::ScaleY => Self::ScaleY(1.0),
        }
    }

    /// Interpolate towards a transform of the same kind
    ///
    /// Mismatched kinds jump to `other`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        match (*self, *other) {
            (Self::Translate { x: x1, y: y1 }, Self::Translate { x: x2, y: y2 }) => {
                Self::Translate {
                    x: lerp(x1, x2, t),
                    y: lerp(y1, y2, t),
                }
            }
            (Self::SkewX(a), Self::SkewX(b)) => Self::SkewX(lerp(a, b, t)),
            (Self::SkewY(a), Self::SkewY(b)) => Self::SkewY(lerp(a, b, t)),
            (Self::RotateX(a), Self::RotateX(b)) => Self::RotateX(lerp(a, b, t)),
            (Self::RotateY(a), Self::RotateY(b)) => Self::RotateY(lerp(a, b, t)),
            (Self::RotateZ(a), Self::RotateZ(b)) => Self::RotateZ(lerp(a, b, t)),
            (Self::ScaleX(a), Self::ScaleX(b)) => Self::ScaleX(lerp(a, b, t)),
            (Self::ScaleY(a), Self::ScaleY(b)) => Self::ScaleY(lerp(a, b, t)),
            _ => *other,
        }
    }
}

/// Ordered transform list with at most one entry per kind
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformSet {
    items: SmallVec<[Transform; 4]>,
}

impl TransformSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the transform of the same kind
    pub fn set(&mut self, transform: Transform) {
        let kind = transform.kind();
        if let Some(slot) = self.items.iter_mut().find(|t| t.kind() == kind) {
            *slot = transform;
        } else {
            self.items.push(transform);
        }
    }

    /// Transform of the given kind, if set
    #[must_use]
    pub fn get(&self, kind: TransformKind) -> Option<&Transform> {
        self.items.iter().find(|t| t.kind() == kind)
    }

    /// Whether a transform of the given kind is set
    #[must_use]
    pub fn contains(&self, kind: TransformKind) -> bool {
        self.get(kind).is_some()
    }

    /// Transforms in application order
    #[must_use]
    pub fn as_slice(&self) -> &[Transform] {
        &self.items
    }

    /// Whether no transform is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Interpolate every kind present in `other`
    ///
    /// Kinds missing from `self` start from their identity value; kinds only
    /// present in `self` are kept as they are.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mut result = self.clone();
        for target in &other.items {
            let from = self
                .get(target.kind())
                .copied()
                .unwrap_or_else(|| Transform::identity_of(target.kind()));
            result.set(from.lerp(target, t));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_tags_replace_in_place() {
        let mut set = TransformSet::new();
        set.set(Transform::RotateZ(10.0));
        set.set(Transform::ScaleX(2.0));
        set.set(Transform::RotateZ(45.0));
        assert_eq!(
            set.as_slice(),
            &[Transform::RotateZ(45.0), Transform::ScaleX(2.0)]
        );
    }

    #[test]
    fn lerp_starts_missing_kinds_from_identity() {
        let from = TransformSet::new();
        let mut to = TransformSet::new();
        to.set(Transform::ScaleX(3.0));
        to.set(Transform::RotateZ(90.0));
        let mid = from.lerp(&to, 0.5);
        assert_eq!(
            mid.as_slice(),
            &[Transform::ScaleX(2.0), Transform::RotateZ(45.0)]
        );
    }
}
