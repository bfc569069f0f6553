//! Tests for the presenter-facing control surface

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use wavetile::WfcError;
    use wavetile::io::catalog::TilesetCatalog;
    use wavetile::io::session::{Session, SessionConfig};
    use wavetile::spatial::grid::Position;

    const SINGLE: &str = "no rotation

{1,1}

self - {0,0}

{0,0} - self
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

    const CONFIG: SessionConfig = SessionConfig {
        width: 5,
        height: 4,
        seed: 3,
        speed: 100,
    };

    fn catalog() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        for (name, text) in [
            ("single", SINGLE),
            ("coast", COAST),
            ("broken", "sideways\n"),
        ] {
            let tileset = dir.path().join(name);
            fs::create_dir(&tileset).expect("tileset dir");
            fs::write(tileset.join("data.txt"), text).expect("description");
        }
        dir
    }

    // Tests opening a named tileset starts an empty grid of the requested size
    // Verified by opening the first listed tileset regardless of name
    #[test]
    fn test_open_named() {
        let dir = catalog();
        let session =
            Session::open(TilesetCatalog::new(dir.path()), Some("coast"), CONFIG).expect("open");

        assert_eq!(session.tileset().name, "coast");
        assert_eq!(session.model().variant_count(), 3);
        assert_eq!(session.engine().grid().cell_count(), 20);
        assert_eq!(session.scheduler().speed(), 100);
        assert_eq!(session.catalog().root(), dir.path());
    }

    // Tests a broken description fails to open
    // Verified by ignoring compile errors on open
    #[test]
    fn test_open_broken() {
        let dir = catalog();
        let result = Session::open(TilesetCatalog::new(dir.path()), Some("broken"), CONFIG);
        assert!(matches!(result, Err(ref error) if error.is_configuration()));
    }

    // Tests advancing by wall-clock time fills the grid
    // Verified by discarding the elapsed time in advance
    #[test]
    fn test_advance_fills_grid() {
        let dir = catalog();
        let mut session =
            Session::open(TilesetCatalog::new(dir.path()), Some("coast"), CONFIG).expect("open");

        let advance = session
            .advance(Duration::from_millis(100))
            .expect("advance");
        assert_eq!(advance.collapses, 10);

        session.advance(Duration::from_secs(1)).expect("advance");
        assert!(session.engine().is_collapsed());
        let view = session.cell(Position::new(4, 3)).expect("cell exists");
        assert!(view.resolved);
        assert!(session.cell(Position::new(5, 0)).is_none());
    }

    // Tests pausing stops ticks until resumed
    // Verified by ignoring the running flag
    #[test]
    fn test_pause_and_resume() {
        let dir = catalog();
        let mut session =
            Session::open(TilesetCatalog::new(dir.path()), Some("coast"), CONFIG).expect("open");

        session.set_running(false);
        let paused = session.advance(Duration::from_secs(1)).expect("advance");
        assert_eq!(paused.collapses, 0);

        session.set_running(true);
        let resumed = session
            .advance(Duration::from_millis(50))
            .expect("advance");
        assert_eq!(resumed.collapses, 5);
    }

    // Tests switching tilesets replaces the model and empties the grid
    // Verified by keeping the old model after a switch
    #[test]
    fn test_switch_tileset() {
        let dir = catalog();
        let mut session =
            Session::open(TilesetCatalog::new(dir.path()), Some("coast"), CONFIG).expect("open");
        session.advance(Duration::from_millis(100)).expect("advance");

        session.set_tileset_directory("single").expect("switch");
        assert_eq!(session.tileset().name, "single");
        assert_eq!(session.model().variant_count(), 1);
        assert_eq!(session.engine().grid().resolved_count(), 0);
        assert!(session.engine().updates().is_empty());
    }

    // Tests a failed switch keeps the current tileset and grid
    // Verified by replacing the model before compiling the new tileset
    #[test]
    fn test_failed_switch_keeps_state() {
        let dir = catalog();
        let mut session =
            Session::open(TilesetCatalog::new(dir.path()), Some("coast"), CONFIG).expect("open");
        session.advance(Duration::from_millis(100)).expect("advance");

        assert!(session.set_tileset_directory("broken").is_err());
        assert!(matches!(
            session.set_tileset_directory("absent"),
            Err(WfcError::UnknownTileset { .. })
        ));
        assert_eq!(session.tileset().name, "coast");
        assert_eq!(session.engine().updates().len(), 10);
    }

    // Tests disabled tiles never appear after the following reset
    // Verified by committing switches on set_base_tile_enabled instead of reset
    #[test]
    fn test_disable_then_reset() {
        let dir = catalog();
        let mut session =
            Session::open(TilesetCatalog::new(dir.path()), Some("coast"), CONFIG).expect("open");

        session.set_base_tile_enabled(0, false).expect("base 0");
        session.reset();
        session.advance(Duration::from_secs(1)).expect("advance");

        assert!(session.engine().is_collapsed());
        assert!(session
            .engine()
            .updates()
            .iter()
            .all(|update| update.variant.base != 0));
    }

    // Tests weight and speed changes are validated
    // Verified by accepting any speed
    #[test]
    fn test_invalid_controls() {
        let dir = catalog();
        let mut session =
            Session::open(TilesetCatalog::new(dir.path()), Some("coast"), CONFIG).expect("open");

        assert!(session.set_speed(u32::MAX).is_err());
        assert!(session.set_base_tile_weight(7, 10).is_err());
        assert!(session.set_base_tile_weight(1, 0).is_err());
        session.set_base_tile_weight(1, 50).expect("valid weight");
        assert_eq!(session.engine().weights().weight(1), 50);
    }

    // Tests the inspector walks every variant and restarts after a switch
    // Verified by not rewinding the inspector on tileset change
    #[test]
    fn test_inspector_pages() {
        let dir = catalog();
        let mut session =
            Session::open(TilesetCatalog::new(dir.path()), Some("coast"), CONFIG).expect("open");

        let mut pages = 0;
        while session.inspect_next().is_some() {
            pages += 1;
        }
        assert_eq!(pages, 3);

        session.set_tileset_directory("single").expect("switch");
        assert!(session.inspect_next().is_some());
        assert!(session.inspect_next().is_none());
    }

    // Tests a random tileset is chosen when none is named
    // Verified by requiring a tileset name
    #[test]
    fn test_open_random() {
        let dir = TempDir::new().expect("temp dir");
        let tileset = dir.path().join("only");
        fs::create_dir(&tileset).expect("tileset dir");
        fs::write(tileset.join("data.txt"), SINGLE).expect("description");

        let session = Session::open(TilesetCatalog::new(dir.path()), None, CONFIG).expect("open");
        assert_eq!(session.tileset().name, "only");
    }
}
