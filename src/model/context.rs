//! Situational contexts: a small bit-set of situation tags.
//!
//! A question may belong to several situations at once (a stressful
//! conflict at work is `WORK | STRESS | CONFLICT`). The empty set
//! [`SituationalContext::NONE`] carries no contextual data.

use serde::{Deserialize, Serialize};

/// Bit-set of situation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SituationalContext(u16);

impl SituationalContext {
    pub const NONE: Self = Self(0);
    pub const WORK: Self = Self(1 << 0);
    pub const SOCIAL: Self = Self(1 << 1);
    pub const STRESS: Self = Self(1 << 2);
    pub const CONFLICT: Self = Self(1 << 3);
    pub const LEARNING: Self = Self(1 << 4);
    pub const CREATIVE: Self = Self(1 << 5);
    pub const CRISIS: Self = Self(1 << 6);
    pub const LEISURE: Self = Self(1 << 7);

    /// Every single tag, in bit order.
    pub const TAGS: [Self; 8] = [
        Self::WORK,
        Self::SOCIAL,
        Self::STRESS,
        Self::CONFLICT,
        Self::LEARNING,
        Self::CREATIVE,
        Self::CRISIS,
        Self::LEISURE,
    ];

    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Build from raw bits, dropping bits that name no tag.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & 0x00FF)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when the two sets share at least one tag.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// The single tags set in this context, in bit order.
    pub fn tags(self) -> impl Iterator<Item = SituationalContext> {
        Self::TAGS.into_iter().filter(move |t| self.contains(*t))
    }

    /// Tag name for a single-tag context; `None` for empty or combined sets.
    pub fn tag_name(self) -> Option<&'static str> {
        match self {
            Self::WORK => Some("work"),
            Self::SOCIAL => Some("social"),
            Self::STRESS => Some("stress"),
            Self::CONFLICT => Some("conflict"),
            Self::LEARNING => Some("learning"),
            Self::CREATIVE => Some("creative"),
            Self::CRISIS => Some("crisis"),
            Self::LEISURE => Some("leisure"),
            _ => None,
        }
    }

    /// Parse a single tag name (case-insensitive).
    pub fn parse_tag(name: &str) -> Option<Self> {
        Self::TAGS
            .into_iter()
            .find(|t| t.tag_name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }
}

impl std::ops::BitOr for SituationalContext {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for SituationalContext {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for SituationalContext {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Display for SituationalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.tags().filter_map(|t| t.tag_name()).collect();
        write!(f, "{}", names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_context_intersects_members() {
        let ctx = SituationalContext::WORK | SituationalContext::STRESS;
        assert!(ctx.intersects(SituationalContext::WORK));
        assert!(ctx.intersects(SituationalContext::STRESS));
        assert!(!ctx.intersects(SituationalContext::SOCIAL));
        assert!(!ctx.intersects(SituationalContext::NONE));
    }

    #[test]
    fn test_tags_iterate_in_bit_order() {
        let ctx = SituationalContext::LEISURE | SituationalContext::WORK;
        let tags: Vec<_> = ctx.tags().collect();
        assert_eq!(tags, vec![SituationalContext::WORK, SituationalContext::LEISURE]);
        assert_eq!(ctx.to_string(), "work|leisure");
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(SituationalContext::parse_tag("Crisis"), Some(SituationalContext::CRISIS));
        assert_eq!(SituationalContext::parse_tag("unknown"), None);
        assert_eq!(SituationalContext::NONE.to_string(), "none");
    }

    #[test]
    fn test_truncate_drops_unknown_bits() {
        let ctx = SituationalContext::from_bits_truncate(0xFF01);
        assert_eq!(ctx, SituationalContext::WORK);
    }
}
