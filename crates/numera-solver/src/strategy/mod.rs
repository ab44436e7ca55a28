//! Solving strategies as data.
//!
//! A [`Strategy`] is a name, a [`Difficulty`], an [`InstanceHandling`] policy and a
//! [`StrategyKind`] with its parameters. The kind selects a search function that reads
//! the grid and proposes changes; it never mutates anything itself. Strategies are
//! collected in a [`StrategyRegistry`](crate::StrategyRegistry) and run in order by the
//! [`StrategySolver`](crate::StrategySolver).

use std::{collections::BTreeMap, fmt, ops::ControlFlow};

pub(crate) use self::context::StrategyContext;
use crate::{SolverError, StrategyPreset};

mod axis;
mod brute_force;
mod bug;
mod chains;
mod coloring;
mod combinations;
mod context;
mod fish;
mod forcing_nets;
mod intersections;
mod single_digit;
mod singles;
mod subsets;
mod unique_rectangle;
mod wings;

/// How hard a strategy is for a human solver.
///
/// A puzzle is rated by the hardest strategy its solve needed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Singles.
    #[display("basic")]
    Basic,
    /// Locked candidates, pairs.
    #[display("easy")]
    Easy,
    /// Triples, quads, basic fish.
    #[display("medium")]
    Medium,
    /// Wings, single-digit patterns, uniqueness.
    #[display("hard")]
    Hard,
    /// Large fish, coloring, chains.
    #[display("extreme")]
    Extreme,
    /// Forcing nets.
    #[display("inhuman")]
    Inhuman,
    /// Trial and error.
    #[display("by trial")]
    ByTrial,
}

/// What one application of a strategy commits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InstanceHandling {
    /// The first instance found.
    #[default]
    FirstOnly,
    /// Every instance found, in discovery order.
    ///
    /// When two instances conflict, the one found first wins: later changes that an
    /// earlier one already made obsolete are skipped.
    UnorderedAll,
    /// The instance with the most changes; ties go to the earliest.
    BestOnly,
    /// Every instance, the ones with the most changes first.
    SortedAll,
}

impl InstanceHandling {
    /// All policies.
    pub const ALL: [Self; 4] = [
        Self::FirstOnly,
        Self::UnorderedAll,
        Self::BestOnly,
        Self::SortedAll,
    ];

    /// Returns the snake-case name used in presets.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstOnly => "first_only",
            Self::UnorderedAll => "unordered_all",
            Self::BestOnly => "best_only",
            Self::SortedAll => "sorted_all",
        }
    }
}

impl fmt::Display for InstanceHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The search a strategy runs, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// A cell with one candidate left.
    NakedSingle,
    /// A digit with one place left in a house.
    HiddenSingle,
    /// `size` cells of a house sharing `size` candidates.
    NakedSubset {
        /// Number of cells (2-4).
        size: u8,
    },
    /// `size` digits confined to `size` cells of a house.
    HiddenSubset {
        /// Number of digits (2-4).
        size: u8,
    },
    /// A digit confined to one line inside a box.
    PointingSet,
    /// A digit confined to one box inside a line.
    ClaimingSet,
    /// A basic fish: X-Wing (2), Swordfish (3), Jellyfish (4).
    Fish {
        /// Number of base lines (2-4).
        size: u8,
    },
    /// An X-Wing with extra candidates in one box.
    FinnedXWing,
    /// Two conjugate lines sharing one end.
    Skyscraper,
    /// A conjugate row and column joined in a box.
    TwoStringKite,
    /// A bivalue pivot with two bivalue pincers.
    XyWing,
    /// A trivalue pivot with two bivalue pincers.
    XyzWing,
    /// Avoid a deadly pattern of four cells (types 1 and 2).
    UniqueRectangle,
    /// Bivalue universal grave plus a few extra candidates.
    Bug {
        /// Largest number of extra candidates handled.
        max_additional_candidates: u8,
    },
    /// Two-coloring of one digit's conjugate pairs.
    SimpleColoring,
    /// Two-coloring across digits and cells.
    Medusa,
    /// A chain of bivalue cells.
    XyChain {
        /// Longest chain, in links.
        max_length: u8,
    },
    /// A chain alternating strong and weak links.
    AlternatingInferenceChain {
        /// Longest chain, in links.
        max_length: u8,
    },
    /// A candidate whose truth leads to a contradiction.
    NishioForcingNet,
    /// A candidate whose truth and falsehood force the same thing.
    DigitForcingNet,
    /// Every candidate of a cell forces the same thing.
    CellForcingNet {
        /// Largest cell handled, in candidates.
        max_possibilities: u8,
    },
    /// Every position of a digit in a house forces the same thing.
    UnitForcingNet {
        /// Largest number of positions handled.
        max_possibilities: u8,
    },
    /// Solve by exhaustive search if the solution is unique.
    BruteForce,
}

impl StrategyKind {
    fn settings(self) -> BTreeMap<String, String> {
        let (key, value) = match self {
            Self::NakedSubset { size } | Self::HiddenSubset { size } | Self::Fish { size } => {
                ("size", size)
            }
            Self::Bug {
                max_additional_candidates,
            } => ("max_additional_candidates", max_additional_candidates),
            Self::XyChain { max_length } | Self::AlternatingInferenceChain { max_length } => {
                ("max_length", max_length)
            }
            Self::CellForcingNet { max_possibilities }
            | Self::UnitForcingNet { max_possibilities } => {
                ("max_possibilities", max_possibilities)
            }
            _ => return BTreeMap::new(),
        };
        BTreeMap::from([(key.to_owned(), value.to_string())])
    }

    fn setting_mut(&mut self, key: &str) -> Option<(&mut u8, u8, u8)> {
        match (self, key) {
            (
                Self::NakedSubset { size } | Self::HiddenSubset { size } | Self::Fish { size },
                "size",
            ) => Some((size, 2, 4)),
            (
                Self::Bug {
                    max_additional_candidates,
                },
                "max_additional_candidates",
            ) => Some((max_additional_candidates, 1, 8)),
            (
                Self::XyChain { max_length } | Self::AlternatingInferenceChain { max_length },
                "max_length",
            ) => Some((max_length, 2, 64)),
            (
                Self::CellForcingNet { max_possibilities }
                | Self::UnitForcingNet { max_possibilities },
                "max_possibilities",
            ) => Some((max_possibilities, 2, 9)),
            _ => None,
        }
    }
}

/// A configured solving strategy.
///
/// # Examples
///
/// ```
/// use numera_solver::StrategyRegistry;
///
/// let registry = StrategyRegistry::standard();
/// let mut chain = registry.get("Alternating Inference Chain").unwrap().clone();
/// chain.apply_setting("max_length", "12")?;
/// assert_eq!(chain.settings()["max_length"], "12");
/// assert!(chain.apply_setting("max_length", "many").is_err());
/// # Ok::<(), numera_solver::SolverError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    name: &'static str,
    difficulty: Difficulty,
    handling: InstanceHandling,
    kind: StrategyKind,
    enabled: bool,
    locked: bool,
}

impl Strategy {
    /// Creates an enabled, unlocked strategy that commits its first instance.
    #[must_use]
    pub const fn new(name: &'static str, difficulty: Difficulty, kind: StrategyKind) -> Self {
        Self {
            name,
            difficulty,
            handling: InstanceHandling::FirstOnly,
            kind,
            enabled: true,
            locked: false,
        }
    }

    /// Sets the instance handling policy.
    #[must_use]
    pub const fn with_handling(mut self, handling: InstanceHandling) -> Self {
        self.handling = handling;
        self
    }

    /// Sets whether the strategy is enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Locks the strategy so it cannot be disabled.
    #[must_use]
    pub const fn with_locked(mut self) -> Self {
        self.locked = true;
        self.enabled = true;
        self
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the difficulty.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the instance handling policy.
    #[must_use]
    pub const fn handling(&self) -> InstanceHandling {
        self.handling
    }

    /// Returns the search kind and its parameters.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Returns `true` if the solver runs this strategy.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` if the strategy cannot be disabled.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Enables or disables the strategy. Returns `false` if it is locked and
    /// `enabled` is `false`.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.locked && !enabled {
            return false;
        }
        self.enabled = enabled;
        true
    }

    /// Sets the lock flag. Locking also enables the strategy.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.enabled = true;
        }
    }

    /// Sets the instance handling policy.
    pub fn set_handling(&mut self, handling: InstanceHandling) {
        self.handling = handling;
    }

    /// Returns the current settings as strings.
    #[must_use]
    pub fn settings(&self) -> BTreeMap<String, String> {
        self.kind.settings()
    }

    /// Changes one setting.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidSetting`] if the key does not apply to this strategy
    /// or the value is not an integer in the allowed range.
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<(), SolverError> {
        let invalid = |reason| SolverError::InvalidSetting {
            strategy: self.name.to_owned(),
            key: key.to_owned(),
            value: value.to_owned(),
            reason,
        };
        let mut kind = self.kind;
        let Some((slot, min, max)) = kind.setting_mut(key) else {
            return Err(invalid("unknown key"));
        };
        let parsed: u8 = value
            .trim()
            .parse()
            .map_err(|_| invalid("not an integer"))?;
        if !(min..=max).contains(&parsed) {
            return Err(invalid("out of range"));
        }
        *slot = parsed;
        self.kind = kind;
        Ok(())
    }

    /// Captures the configuration as a preset entry.
    #[must_use]
    pub fn to_preset(&self) -> StrategyPreset {
        StrategyPreset {
            name: self.name.to_owned(),
            enabled: self.enabled,
            locked: self.locked,
            handling: self.handling,
            settings: self.settings(),
        }
    }

    pub(crate) fn search(&self, ctx: &mut StrategyContext<'_>) -> ControlFlow<()> {
        match self.kind {
            StrategyKind::NakedSingle => singles::naked_single(ctx),
            StrategyKind::HiddenSingle => singles::hidden_single(ctx),
            StrategyKind::NakedSubset { size } => subsets::naked_subset(ctx, usize::from(size)),
            StrategyKind::HiddenSubset { size } => subsets::hidden_subset(ctx, usize::from(size)),
            StrategyKind::PointingSet => intersections::pointing(ctx),
            StrategyKind::ClaimingSet => intersections::claiming(ctx),
            StrategyKind::Fish { size } => fish::basic_fish(ctx, usize::from(size)),
            StrategyKind::FinnedXWing => fish::finned_x_wing(ctx),
            StrategyKind::Skyscraper => single_digit::skyscraper(ctx),
            StrategyKind::TwoStringKite => single_digit::two_string_kite(ctx),
            StrategyKind::XyWing => wings::xy_wing(ctx),
            StrategyKind::XyzWing => wings::xyz_wing(ctx),
            StrategyKind::UniqueRectangle => unique_rectangle::unique_rectangle(ctx),
            StrategyKind::Bug {
                max_additional_candidates,
            } => bug::bug(ctx, usize::from(max_additional_candidates)),
            StrategyKind::SimpleColoring => coloring::simple_coloring(ctx),
            StrategyKind::Medusa => coloring::medusa(ctx),
            StrategyKind::XyChain { max_length } => chains::xy_chain(ctx, usize::from(max_length)),
            StrategyKind::AlternatingInferenceChain { max_length } => {
                chains::alternating_inference_chain(ctx, usize::from(max_length))
            }
            StrategyKind::NishioForcingNet => forcing_nets::nishio(ctx),
            StrategyKind::DigitForcingNet => forcing_nets::digit_forcing_net(ctx),
            StrategyKind::CellForcingNet { max_possibilities } => {
                forcing_nets::cell_forcing_net(ctx, usize::from(max_possibilities))
            }
            StrategyKind::UnitForcingNet { max_possibilities } => {
                forcing_nets::unit_forcing_net(ctx, usize::from(max_possibilities))
            }
            StrategyKind::BruteForce => brute_force::brute_force(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_roundtrip() {
        let mut fish = Strategy::new("Fish", Difficulty::Medium, StrategyKind::Fish { size: 2 });
        assert_eq!(fish.settings()["size"], "2");
        fish.apply_setting("size", " 3 ").unwrap();
        assert_eq!(fish.kind(), StrategyKind::Fish { size: 3 });
        assert!(matches!(
            fish.apply_setting("size", "5"),
            Err(SolverError::InvalidSetting { reason: "out of range", .. })
        ));
        assert!(matches!(
            fish.apply_setting("max_length", "5"),
            Err(SolverError::InvalidSetting { reason: "unknown key", .. })
        ));
        assert_eq!(fish.kind(), StrategyKind::Fish { size: 3 });
    }

    #[test]
    fn test_kinds_without_settings() {
        let single = Strategy::new("Naked Single", Difficulty::Basic, StrategyKind::NakedSingle);
        assert!(single.settings().is_empty());
    }

    #[test]
    fn test_locked_cannot_be_disabled() {
        let mut single =
            Strategy::new("Naked Single", Difficulty::Basic, StrategyKind::NakedSingle)
                .with_enabled(false)
                .with_locked();
        assert!(single.is_enabled());
        assert!(!single.set_enabled(false));
        assert!(single.is_enabled());
        single.set_locked(false);
        assert!(single.set_enabled(false));
        assert!(!single.is_enabled());
    }

    #[test]
    fn test_difficulty_order() {
        assert!(Difficulty::Basic < Difficulty::Easy);
        assert!(Difficulty::Inhuman < Difficulty::ByTrial);
        assert_eq!(Difficulty::ByTrial.to_string(), "by trial");
    }
}
