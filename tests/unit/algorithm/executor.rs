//! Tests for the collapse engine's tick, reset and query surface

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use wavetile::WfcError;
    use wavetile::algorithm::executor::{CellView, CollapseEngine, TickOutcome};
    use wavetile::spatial::grid::Position;
    use wavetile::tileset::compiler::{compile_str, inline_origin};
    use wavetile::tileset::model::AdjacencyModel;

    const SINGLE: &str = "no rotation

{1,1}

self - {0,0}

{0,0} - self
";

    const DEAD_END: &str = "no rotation

{1,1}{1,1}

partner - {1,0}

{0,0} - partner
";

    const COAST: &str = "no rotation

{1,4}{1,2}{1,4}

nearwater - {0,0} {1,0}
nearsand - {0,0} {1,0} {2,0}
neargrass - {1,0} {2,0}

{0,0} - nearwater
{1,0} - nearsand
{2,0} - neargrass
";

    fn model(text: &str) -> Arc<AdjacencyModel> {
        Arc::new(compile_str(text, &inline_origin()).expect("model should compile"))
    }

    // Tests zero and oversized dimensions are rejected
    // Verified by removing the dimension validation loop
    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(matches!(
            CollapseEngine::new(model(SINGLE), 0, 4, 1),
            Err(WfcError::InvalidParameter {
                parameter: "width",
                ..
            })
        ));
        assert!(matches!(
            CollapseEngine::new(model(SINGLE), 4, 10_001, 1),
            Err(WfcError::InvalidParameter {
                parameter: "height",
                ..
            })
        ));
    }

    // Tests a new engine starts with every cell at full entropy
    // Verified by filling the entropy index with entropy one
    #[test]
    fn test_initial_state() {
        let engine = CollapseEngine::new(model(COAST), 5, 4, 1).expect("engine");
        assert_eq!(engine.entropy().len(), 20);
        assert_eq!(engine.entropy().bucket(3).len(), 20);
        assert_eq!(engine.grid().resolved_count(), 0);
        assert!(engine.updates().is_empty());
        assert!(engine.is_running());
        assert!(!engine.is_collapsed());
    }

    // Tests each tick collapses one cell and records it in the update log
    // Verified by not appending to the update log on collapse
    #[test]
    fn test_tick_records_update() {
        let mut engine = CollapseEngine::new(model(COAST), 4, 4, 7).expect("engine");
        let outcome = engine.tick().expect("tick");

        let TickOutcome::Collapsed(update) = outcome else {
            unreachable!("coast never contradicts, got {outcome:?}");
        };
        assert_eq!(engine.updates(), &[update]);
        assert_eq!(engine.grid().resolved(update.position), Some(update.variant));
        assert!(!engine.entropy().contains(update.position));
    }

    // Tests a paused engine does nothing
    // Verified by ignoring the running flag in tick
    #[test]
    fn test_paused_tick_is_idle() {
        let mut engine = CollapseEngine::new(model(COAST), 3, 3, 7).expect("engine");
        engine.set_running(false);
        assert_eq!(engine.tick().ok(), Some(TickOutcome::Idle));
        assert_eq!(engine.grid().resolved_count(), 0);
        assert!(!engine.is_running());
    }

    // Tests running to completion fills every cell and then idles
    // Verified by marking the grid collapsed when a bucket empties instead of the index
    #[test]
    fn test_run_until_collapsed() {
        let mut engine = CollapseEngine::new(model(COAST), 6, 5, 3).expect("engine");
        let summary = engine.run_until_collapsed(0).expect("coast never contradicts");

        assert_eq!(summary.collapses, 30);
        assert_eq!(summary.resets, 0);
        assert!(engine.is_collapsed());
        assert_eq!(engine.grid().resolved_count(), 30);
        assert!(engine.entropy().is_empty());
        assert_eq!(engine.tick().ok(), Some(TickOutcome::Idle));
    }

    // Tests the last collapse is reported as completion
    // Verified by reporting the final collapse as an ordinary collapse
    #[test]
    fn test_single_cell_completes() {
        let mut engine = CollapseEngine::new(model(SINGLE), 1, 1, 3).expect("engine");
        let outcome = engine.tick().expect("tick");
        assert!(matches!(outcome, TickOutcome::Completed(update) if update.position == Position::new(0, 0)));
        assert!(engine.is_collapsed());
    }

    // Tests a contradiction resets the grid instead of failing
    // Verified by returning the contradiction without resetting
    #[test]
    fn test_contradiction_resets() {
        let mut engine = CollapseEngine::new(model(DEAD_END), 3, 3, 5).expect("engine");
        let outcome = engine.tick().expect("contradiction is not an error");

        assert!(matches!(outcome, TickOutcome::Reset { .. }));
        assert_eq!(engine.contradictions(), 1);
        assert!(engine.updates().is_empty());
        assert_eq!(engine.grid().resolved_count(), 0);
        assert_eq!(engine.entropy().bucket(2).len(), 9);
    }

    // Tests the reset limit stops a grid that never completes
    // Verified by counting resets without comparing against the limit
    #[test]
    fn test_reset_limit() {
        let mut engine = CollapseEngine::new(model(DEAD_END), 3, 3, 5).expect("engine");
        let result = engine.run_until_collapsed(4);
        assert!(matches!(
            result,
            Err(WfcError::ResetLimitExceeded { resets: 5 })
        ));
    }

    // Tests cell views report unresolved cells as base zero, orientation zero
    // Verified by returning the first possible variant for unresolved cells
    #[test]
    fn test_cell_view() {
        let mut engine = CollapseEngine::new(model(COAST), 2, 2, 1).expect("engine");
        assert_eq!(
            engine.cell_view(Position::new(1, 1)),
            Some(CellView {
                resolved: false,
                base: 0,
                orientation: 0
            })
        );
        assert_eq!(engine.cell_view(Position::new(2, 0)), None);

        let TickOutcome::Collapsed(update) = engine.tick().expect("tick") else {
            unreachable!("coast never contradicts");
        };
        let view = engine.cell_view(update.position).expect("cell exists");
        assert!(view.resolved);
        assert_eq!(view.base, update.variant.base);
    }

    // Tests disabled tiles are excluded once the grid is reset
    // Verified by committing staged switches only at construction
    #[test]
    fn test_disabled_tile_excluded_after_reset() {
        let mut engine = CollapseEngine::new(model(COAST), 6, 6, 9).expect("engine");
        engine.set_base_tile_enabled(0, false).expect("base 0 exists");
        engine.reset();
        engine.run_until_collapsed(0).expect("coast never contradicts");

        assert!(engine.updates().iter().all(|update| update.variant.base != 0));
        assert_eq!(engine.weights().weight(0), 0);
    }

    // Tests swapping the model restarts the grid at the new full entropy
    // Verified by keeping the old weights after a model swap
    #[test]
    fn test_replace_model() {
        let mut engine = CollapseEngine::new(model(COAST), 3, 3, 9).expect("engine");
        engine.tick().expect("tick");
        engine.replace_model(model(SINGLE));

        assert_eq!(engine.model().variant_count(), 1);
        assert_eq!(engine.weights().weights(), &[1]);
        assert_eq!(engine.entropy().bucket(1).len(), 9);
        assert!(engine.updates().is_empty());
    }
}
