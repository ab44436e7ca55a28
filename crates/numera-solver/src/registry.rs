use crate::{Difficulty, SolverError, Strategy, StrategyKind, StrategyPreset};

/// Every strategy the engine knows, in pipeline order.
///
/// The registry is a plain value: build one with [`StrategyRegistry::standard`] and pass it
/// to whatever needs to look strategies up by name.
///
/// # Examples
///
/// ```
/// use numera_solver::{Difficulty, StrategyRegistry};
///
/// let registry = StrategyRegistry::standard();
/// let wing = registry.get("xy-wing").unwrap();
/// assert_eq!(wing.name(), "XY-Wing");
/// assert_eq!(wing.difficulty(), Difficulty::Hard);
/// assert!(registry.get("guesswork").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    /// Creates the standard catalog, cheapest first.
    ///
    /// The singles are locked. Brute Force is included but disabled.
    #[must_use]
    pub fn standard() -> Self {
        use Difficulty::{Basic, ByTrial, Easy, Extreme, Hard, Inhuman, Medium};
        use StrategyKind as K;

        let strategies = vec![
            Strategy::new("Naked Single", Basic, K::NakedSingle).with_locked(),
            Strategy::new("Hidden Single", Basic, K::HiddenSingle).with_locked(),
            Strategy::new("Pointing Set", Easy, K::PointingSet),
            Strategy::new("Claiming Set", Easy, K::ClaimingSet),
            Strategy::new("Naked Pair", Easy, K::NakedSubset { size: 2 }),
            Strategy::new("Hidden Pair", Easy, K::HiddenSubset { size: 2 }),
            Strategy::new("Naked Triple", Medium, K::NakedSubset { size: 3 }),
            Strategy::new("Hidden Triple", Medium, K::HiddenSubset { size: 3 }),
            Strategy::new("X-Wing", Medium, K::Fish { size: 2 }),
            Strategy::new("Naked Quad", Medium, K::NakedSubset { size: 4 }),
            Strategy::new("Hidden Quad", Medium, K::HiddenSubset { size: 4 }),
            Strategy::new("Swordfish", Hard, K::Fish { size: 3 }),
            Strategy::new("Skyscraper", Hard, K::Skyscraper),
            Strategy::new("Two-String Kite", Hard, K::TwoStringKite),
            Strategy::new("Finned X-Wing", Hard, K::FinnedXWing),
            Strategy::new("XY-Wing", Hard, K::XyWing),
            Strategy::new("XYZ-Wing", Hard, K::XyzWing),
            Strategy::new("Unique Rectangle", Hard, K::UniqueRectangle),
            Strategy::new(
                "BUG",
                Hard,
                K::Bug {
                    max_additional_candidates: 3,
                },
            ),
            Strategy::new("Jellyfish", Extreme, K::Fish { size: 4 }),
            Strategy::new("Simple Coloring", Extreme, K::SimpleColoring),
            Strategy::new("XY-Chain", Extreme, K::XyChain { max_length: 16 }),
            Strategy::new("3D Medusa", Extreme, K::Medusa),
            Strategy::new(
                "Alternating Inference Chain",
                Extreme,
                K::AlternatingInferenceChain { max_length: 12 },
            ),
            Strategy::new("Nishio Forcing Net", Inhuman, K::NishioForcingNet),
            Strategy::new("Digit Forcing Net", Inhuman, K::DigitForcingNet),
            Strategy::new(
                "Cell Forcing Net",
                Inhuman,
                K::CellForcingNet {
                    max_possibilities: 5,
                },
            ),
            Strategy::new(
                "Unit Forcing Net",
                Inhuman,
                K::UnitForcingNet {
                    max_possibilities: 5,
                },
            ),
            Strategy::new("Brute Force", ByTrial, K::BruteForce).with_enabled(false),
        ];
        Self { strategies }
    }

    /// Returns every strategy in pipeline order.
    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Looks a strategy up by name, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Strategy> {
        let name = name.trim();
        self.strategies
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Builds a pipeline from presets, in preset order.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::UnknownStrategy`] for a name the registry does not know and
    /// [`SolverError::InvalidSetting`] for a rejected setting.
    pub fn build(&self, presets: &[StrategyPreset]) -> Result<Vec<Strategy>, SolverError> {
        presets
            .iter()
            .map(|preset| {
                let Some(strategy) = self.get(&preset.name) else {
                    return Err(SolverError::UnknownStrategy {
                        name: preset.name.clone(),
                    });
                };
                let mut strategy = strategy.clone();
                strategy.set_locked(preset.locked);
                if !strategy.set_enabled(preset.enabled) {
                    log::debug!("{} is locked and stays enabled", strategy.name());
                }
                strategy.set_handling(preset.handling);
                for (key, value) in &preset.settings {
                    strategy.apply_setting(key, value)?;
                }
                Ok(strategy)
            })
            .collect()
    }

    /// Returns the presets of the standard catalog.
    #[must_use]
    pub fn default_preset(&self) -> Vec<StrategyPreset> {
        self.strategies.iter().map(Strategy::to_preset).collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InstanceHandling, StrategySolver, testing::StrategyTester};

    const HARD: [&str; 3] = [
        "4.....8.5.3..........7......2.....6.....8.4......1.......6.3.7.5..2.....1.4......",
        "52...6.........7.13...........4..8..6......5...........418.........3..2...87.....",
        "8..........36......7..9.2...5...7.......457.....1...3...1....68..85...1..9....4..",
    ];

    #[test]
    fn test_standard_order() {
        let registry = StrategyRegistry::standard();
        let strategies = registry.strategies();
        assert_eq!(strategies.len(), 29);
        assert_eq!(strategies[0].name(), "Naked Single");
        assert_eq!(strategies[28].name(), "Brute Force");
        assert!(
            strategies
                .windows(2)
                .all(|w| w[0].difficulty() <= w[1].difficulty())
        );
        assert!(!registry.get("brute force").unwrap().is_enabled());
        assert!(registry.get("Hidden Single").unwrap().is_locked());
    }

    #[test]
    fn test_names_are_unique() {
        let registry = StrategyRegistry::standard();
        for (i, a) in registry.strategies().iter().enumerate() {
            for b in &registry.strategies()[i + 1..] {
                assert!(!a.name().eq_ignore_ascii_case(b.name()), "{}", a.name());
            }
        }
    }

    #[test]
    fn test_default_preset_rebuilds_standard() {
        let registry = StrategyRegistry::standard();
        let strategies = registry.build(&registry.default_preset()).unwrap();
        assert_eq!(strategies, registry.strategies());
    }

    #[test]
    fn test_build_applies_preset() {
        let registry = StrategyRegistry::standard();
        let mut preset = registry.get("Swordfish").unwrap().to_preset();
        preset.enabled = false;
        preset.handling = InstanceHandling::BestOnly;
        preset.settings.insert("size".to_owned(), "4".to_owned());
        let mut locked = registry.get("naked single").unwrap().to_preset();
        locked.enabled = false;

        let strategies = registry.build(&[preset, locked]).unwrap();
        assert_eq!(strategies[0].kind(), StrategyKind::Fish { size: 4 });
        assert!(!strategies[0].is_enabled());
        assert_eq!(strategies[0].handling(), InstanceHandling::BestOnly);
        assert!(strategies[1].is_enabled());
    }

    #[test]
    fn test_every_strategy_is_sound_with_all_instances() {
        let registry = StrategyRegistry::standard();
        for puzzle in HARD {
            let mut solver = StrategySolver::standard();
            solver.set_grid(&puzzle.parse().unwrap());
            solver.solve();
            let mut stages: Vec<_> = solver.steps().iter().map(|r| r.before.clone()).collect();
            stages.push(solver.grid().snapshot());
            for stage in &stages {
                for strategy in registry.strategies() {
                    let tester = StrategyTester::new(stage)
                        .with_handling(InstanceHandling::UnorderedAll)
                        .apply_once(strategy)
                        .assert_sound();
                    tester.grid().verify_agreement();
                }
            }
        }
    }

    #[test]
    fn test_build_rejects_unknown() {
        let registry = StrategyRegistry::standard();
        let mut preset = registry.get("X-Wing").unwrap().to_preset();
        preset.name = "Y-Wing".to_owned();
        assert_eq!(
            registry.build(&[preset]),
            Err(SolverError::UnknownStrategy {
                name: "Y-Wing".to_owned()
            })
        );

        let mut preset = registry.get("X-Wing").unwrap().to_preset();
        preset.settings.insert("size".to_owned(), "9".to_owned());
        assert!(matches!(
            registry.build(&[preset]),
            Err(SolverError::InvalidSetting { .. })
        ));
    }
}
