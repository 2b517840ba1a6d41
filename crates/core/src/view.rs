//! Top-level pages.
//!
//! A plain selector: every view is reachable from every other and switching
//! carries no state beyond which page renders.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a view name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown view: {0}")]
pub struct UnknownView(pub String);

/// One of the storefront's three pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Shop,
    About,
}

impl View {
    /// Navigation order.
    pub const ALL: [Self; 3] = [Self::Home, Self::Shop, Self::About];

    /// Route path serving this view.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Shop => "/shop",
            Self::About => "/about",
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Shop => "shop",
            Self::About => "about",
        }
    }

    /// Navigation label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Shop => "Plant Library",
            Self::About => "Our Story",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownView(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trips_through_from_str() {
        for view in View::ALL {
            assert_eq!(view.slug().parse::<View>().unwrap(), view);
        }
    }

    #[test]
    fn test_paths_are_distinct() {
        assert_eq!(View::Home.path(), "/");
        assert_eq!(View::Shop.path(), "/shop");
        assert_eq!(View::About.path(), "/about");
    }

    #[test]
    fn test_unknown_view() {
        assert_eq!(
            "checkout".parse::<View>(),
            Err(UnknownView("checkout".to_string()))
        );
    }

    #[test]
    fn test_default_is_home() {
        assert_eq!(View::default(), View::Home);
    }
}
