//! Game shell
//!
//! Turns display-refresh timestamps into frame deltas, routes input to the
//! current scene, applies scene switch requests and smooths the camera zoom.

use glam::Vec2;

use crate::error::DuelError;
use crate::scene::{
    ButtonBounds, FrameContext, GAME, GameScene, Key, MAIN_MENU, MainMenuScene, PointerEvent,
    SceneManager, SceneRequest,
};
use crate::settings::Settings;
use crate::sim::MatchState;

/// Zoom change per 100 units of scroll
const ZOOM_PER_SCROLL: f32 = 0.1;

/// Top-level game: scenes plus frame timing and zoom
pub struct Game {
    scenes: SceneManager,
    previous_ms: Option<f64>,
    /// Milliseconds between the last two frames
    pub delta_ms: f32,
    /// Current zoom in [-1, 1] (0 = camera fitted to the arena)
    pub zoom: f32,
    pub target_zoom: f32,
}

impl Game {
    pub fn new(scenes: SceneManager) -> Self {
        Self {
            scenes,
            previous_ms: None,
            delta_ms: 0.0,
            zoom: 0.0,
            target_zoom: 0.0,
        }
    }

    /// Register the main menu and the duel, and open the main menu
    pub fn with_default_scenes(
        settings: Settings,
        seed: u64,
        play_button: ButtonBounds,
    ) -> Result<Self, DuelError> {
        settings.validate()?;
        let mut scenes = SceneManager::new();
        scenes.add_scene(MAIN_MENU, Box::new(MainMenuScene::new(play_button)))?;
        scenes.add_scene(GAME, Box::new(GameScene::new(settings, seed)))?;
        scenes.set_scene(MAIN_MENU)?;
        Ok(Self::new(scenes))
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// The running match, if the current scene hosts one
    pub fn current_match(&self) -> Option<&MatchState> {
        self.scenes.current()?.match_state()
    }

    pub fn current_match_mut(&mut self) -> Option<&mut MatchState> {
        self.scenes.current_mut()?.match_state_mut()
    }

    /// One display refresh at `timestamp_ms`
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        pointer_target: Option<Vec2>,
        pointer_screen: Vec2,
    ) -> Result<(), DuelError> {
        if let Some(previous) = self.previous_ms {
            self.delta_ms = (timestamp_ms - previous).max(0.0) as f32;
        }
        self.previous_ms = Some(timestamp_ms);

        let ctx = FrameContext {
            delta_ms: self.delta_ms,
            pointer_target,
            pointer_screen,
        };
        let request = match self.scenes.current_mut() {
            Some(scene) => scene.frame(&ctx)?,
            None => None,
        };
        self.apply(request)?;
        self.update_zoom();
        Ok(())
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> Result<(), DuelError> {
        let request = self
            .scenes
            .current_mut()
            .and_then(|scene| scene.on_pointer_down(event));
        self.apply(request)
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> Result<(), DuelError> {
        let request = self
            .scenes
            .current_mut()
            .and_then(|scene| scene.on_pointer_up(event));
        self.apply(request)
    }

    pub fn key_down(&mut self, key: Key) -> Result<(), DuelError> {
        let request = self
            .scenes
            .current_mut()
            .and_then(|scene| scene.on_key_down(key));
        self.apply(request)
    }

    pub fn key_up(&mut self, key: Key) -> Result<(), DuelError> {
        let request = self
            .scenes
            .current_mut()
            .and_then(|scene| scene.on_key_up(key));
        self.apply(request)
    }

    /// Mouse wheel: positive `delta_y` zooms out
    pub fn scroll(&mut self, delta_y: f32) {
        let change = delta_y / 100.0;
        self.target_zoom = (self.target_zoom - ZOOM_PER_SCROLL * change).clamp(-1.0, 1.0);
    }

    fn apply(&mut self, request: Option<SceneRequest>) -> Result<(), DuelError> {
        match request {
            Some(SceneRequest::Switch(id)) => self.scenes.set_scene(&id),
            None => Ok(()),
        }
    }

    fn update_zoom(&mut self) {
        self.zoom += (self.target_zoom - self.zoom) / 3.0;
        let allowed = self.scenes.current().is_some_and(|s| s.allow_zoom());
        if !allowed {
            self.zoom = 0.0;
            self.target_zoom = 0.0;
        }
    }
}
