//=========================================================================
// Level Director
//=========================================================================
//
// Loads and unloads levels in response to performed game actions.
//
//   StartLevel(n)  ─> load n
//   RestartLevel   ─> load current
//   LoadNextLevel  ─> load current + 1, or unload + BeatLastLevel
//   EnterMainMenu  ─> unload
//
// Loading is synchronous. Each load publishes LoadStarted, then Unloaded
// for the previous level, then Loaded. Observers get a borrowed view of
// each level before it is dropped and right after it is created.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{LevelCatalog, LevelData};
use crate::core::error::ConfigError;
use crate::core::game_state::{BeatLastLevel, GameAction, GameActionEvent};
use crate::core::message_bus::{EventBus, Inbox};

//=== LevelEvent ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    LoadStarted { number: u32 },
    Loaded { number: u32 },
    Unloaded { number: u32 },
}

//=== LevelChange =========================================================

/// Passed to the observer around every load and unload.
pub enum LevelChange<'a> {
    /// About to be dropped.
    Unloading(&'a LevelData),
    /// Just instantiated.
    Loaded(&'a LevelData),
}

//=== LevelDirector =======================================================

pub struct LevelDirector {
    catalog: LevelCatalog,
    bus: EventBus,
    actions: Inbox<GameActionEvent>,
    current: Option<LevelData>,
}

impl LevelDirector {
    pub fn new(catalog: LevelCatalog, bus: &EventBus) -> Self {
        info!("Level director ready with {} levels", catalog.len());
        Self {
            catalog,
            bus: bus.clone(),
            actions: bus.inbox(),
            current: None,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn current(&self) -> Option<&LevelData> {
        self.current.as_ref()
    }

    pub fn current_number(&self) -> Option<u32> {
        self.current.as_ref().map(LevelData::number)
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    //--- Update -----------------------------------------------------------

    /// Applies every game action performed since the last call.
    ///
    /// Stops at the first configuration error; later actions in the same
    /// batch are discarded with it.
    pub fn update<F>(&mut self, mut observer: F) -> Result<(), ConfigError>
    where
        F: FnMut(LevelChange<'_>),
    {
        for event in self.actions.drain() {
            self.apply(event, &mut observer)?;
        }
        Ok(())
    }

    /// Loads level `number` directly, replacing the current one.
    pub fn load<F>(&mut self, number: u32, mut observer: F) -> Result<(), ConfigError>
    where
        F: FnMut(LevelChange<'_>),
    {
        self.load_level(number, &mut observer)
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply<F>(&mut self, event: GameActionEvent, observer: &mut F) -> Result<(), ConfigError>
    where
        F: FnMut(LevelChange<'_>),
    {
        match event.action {
            GameAction::StartLevel => {
                let number = event.level.ok_or(ConfigError::MissingLevelNumber)?;
                self.load_level(number, observer)
            }
            GameAction::RestartLevel => {
                match self.current_number() {
                    Some(number) => self.load_level(number, observer)?,
                    None => warn!("RestartLevel ignored: no level loaded"),
                }
                Ok(())
            }
            GameAction::LoadNextLevel => {
                let Some(number) = self.current_number() else {
                    warn!("LoadNextLevel ignored: no level loaded");
                    return Ok(());
                };
                let next = number + 1;
                if self.catalog.contains(next) {
                    self.load_level(next, observer)
                } else {
                    info!("Level {} was the last one", number);
                    self.unload(observer);
                    self.bus.publish(BeatLastLevel);
                    Ok(())
                }
            }
            GameAction::EnterMainMenu => {
                self.unload(observer);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn load_level<F>(&mut self, number: u32, observer: &mut F) -> Result<(), ConfigError>
    where
        F: FnMut(LevelChange<'_>),
    {
        let config = self
            .catalog
            .get(number)
            .ok_or(ConfigError::UnknownLevel(number))?;

        self.bus.publish(LevelEvent::LoadStarted { number });
        let level = LevelData::instantiate(config, &self.bus);

        self.unload(observer);

        observer(LevelChange::Loaded(&level));
        info!("Loaded level {} ({} pieces)", number, level.pieces().len());
        self.current = Some(level);
        self.bus.publish(LevelEvent::Loaded { number });
        Ok(())
    }

    fn unload<F>(&mut self, observer: &mut F)
    where
        F: FnMut(LevelChange<'_>),
    {
        let Some(level) = self.current.take() else {
            return;
        };
        let number = level.number();
        observer(LevelChange::Unloading(&level));
        drop(level);
        debug!("Unloaded level {}", number);
        self.bus.publish(LevelEvent::Unloaded { number });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    const CATALOG: &str = r#"
        [[levels]]
        number = 1
        [[levels.pieces]]
        name = "a"
        shape = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
        start = { x = 1.0 }

        [[levels]]
        number = 2
        [[levels.pieces]]
        name = "b"
        shape = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
        start = { x = 2.0 }
        [[levels.pieces]]
        name = "c"
        shape = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]
        start = { x = 3.0 }
    "#;

    struct Rig {
        bus: EventBus,
        director: LevelDirector,
        level_events: Inbox<LevelEvent>,
        beat: Inbox<BeatLastLevel>,
    }

    fn rig() -> Rig {
        let bus = EventBus::new();
        let catalog = LevelCatalog::from_toml_str(CATALOG).unwrap();
        let director = LevelDirector::new(catalog, &bus);
        let level_events = bus.inbox();
        let beat = bus.inbox();
        Rig { bus, director, level_events, beat }
    }

    fn perform(rig: &mut Rig, action: GameAction, level: Option<u32>) -> Result<Vec<String>, ConfigError> {
        rig.bus.publish(GameActionEvent { action, level });
        rig.bus.flush();

        let mut log = Vec::new();
        rig.director.update(|change| match change {
            LevelChange::Unloading(l) => log.push(format!("unloading {}", l.number())),
            LevelChange::Loaded(l) => log.push(format!("loaded {}", l.number())),
        })?;
        rig.bus.flush();
        Ok(log)
    }

    //=====================================================================
    // Loading Tests
    //=====================================================================

    #[test]
    fn start_level_loads_requested_number() {
        let mut rig = rig();
        let log = perform(&mut rig, GameAction::StartLevel, Some(2)).unwrap();

        assert_eq!(log, vec!["loaded 2"]);
        assert_eq!(rig.director.current_number(), Some(2));
        assert_eq!(rig.director.current().unwrap().pieces().len(), 2);
        assert_eq!(
            rig.level_events.drain(),
            vec![LevelEvent::LoadStarted { number: 2 }, LevelEvent::Loaded { number: 2 }]
        );
    }

    #[test]
    fn start_level_without_number_fails() {
        let mut rig = rig();
        let err = perform(&mut rig, GameAction::StartLevel, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingLevelNumber));
        assert!(rig.director.current().is_none());
    }

    #[test]
    fn start_unknown_level_fails() {
        let mut rig = rig();
        let err = perform(&mut rig, GameAction::StartLevel, Some(9)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownLevel(9)));
    }

    #[test]
    fn restart_replaces_current_level() {
        let mut rig = rig();
        perform(&mut rig, GameAction::StartLevel, Some(1)).unwrap();
        let old_piece = rig.director.current().unwrap().pieces()[0].clone();
        rig.level_events.clear();

        let log = perform(&mut rig, GameAction::RestartLevel, None).unwrap();
        assert_eq!(log, vec!["unloading 1", "loaded 1"]);

        let new_piece = &rig.director.current().unwrap().pieces()[0];
        assert!(!std::rc::Rc::ptr_eq(&old_piece, new_piece));
        assert_eq!(
            rig.level_events.drain(),
            vec![
                LevelEvent::LoadStarted { number: 1 },
                LevelEvent::Unloaded { number: 1 },
                LevelEvent::Loaded { number: 1 },
            ]
        );
    }

    #[test]
    fn restart_without_level_is_ignored() {
        let mut rig = rig();
        let log = perform(&mut rig, GameAction::RestartLevel, None).unwrap();
        assert!(log.is_empty());
    }

    //=====================================================================
    // Progression Tests
    //=====================================================================

    #[test]
    fn next_level_advances() {
        let mut rig = rig();
        perform(&mut rig, GameAction::StartLevel, Some(1)).unwrap();
        let log = perform(&mut rig, GameAction::LoadNextLevel, None).unwrap();

        assert_eq!(log, vec!["unloading 1", "loaded 2"]);
        assert_eq!(rig.director.current_number(), Some(2));
        assert!(rig.beat.is_empty());
    }

    #[test]
    fn next_after_last_level_beats_game() {
        let mut rig = rig();
        perform(&mut rig, GameAction::StartLevel, Some(2)).unwrap();
        let log = perform(&mut rig, GameAction::LoadNextLevel, None).unwrap();

        assert_eq!(log, vec!["unloading 2"]);
        assert!(rig.director.current().is_none());
        assert_eq!(rig.beat.len(), 1);
    }

    #[test]
    fn main_menu_unloads() {
        let mut rig = rig();
        perform(&mut rig, GameAction::StartLevel, Some(1)).unwrap();
        let log = perform(&mut rig, GameAction::EnterMainMenu, None).unwrap();

        assert_eq!(log, vec!["unloading 1"]);
        assert!(rig.director.current().is_none());
    }

    #[test]
    fn unrelated_actions_ignored() {
        let mut rig = rig();
        perform(&mut rig, GameAction::StartLevel, Some(1)).unwrap();
        for action in [GameAction::PauseGame, GameAction::ResumeGame, GameAction::CompleteLevel] {
            assert!(perform(&mut rig, action, None).unwrap().is_empty());
        }
        assert_eq!(rig.director.current_number(), Some(1));
    }
}
