// Copyright 2026 the Reflex Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What a layer paints.

use crate::paint::{Color, LinearGradient, Replicator};

/// The paint attached to a layer.
///
/// Every layer can have children; the content only decides what the layer
/// itself contributes and, for [`Replicator`](Self::Replicator), how its
/// children are instanced.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LayerContent {
    /// Paints nothing. Used for pure containers such as the rotation node.
    #[default]
    Group,
    /// A solid color over the layer's bounds.
    Fill(Color),
    /// A linear gradient over the layer's bounds.
    Gradient(LinearGradient),
    /// Paints nothing itself; draws its children once per instance.
    Replicator(Replicator),
}

impl LayerContent {
    /// Returns the replicator parameters, if this is a replicator layer.
    #[inline]
    #[must_use]
    pub fn as_replicator(&self) -> Option<&Replicator> {
        match self {
            Self::Replicator(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the gradient, if this is a gradient layer.
    #[inline]
    #[must_use]
    pub fn as_gradient(&self) -> Option<&LinearGradient> {
        match self {
            Self::Gradient(g) => Some(g),
            _ => None,
        }
    }

    /// Short name for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Fill(_) => "fill",
            Self::Gradient(_) => "gradient",
            Self::Replicator(_) => "replicator",
        }
    }
}
