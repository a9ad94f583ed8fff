//! Scenes and the scene registry
//!
//! A scene implements whichever [`SceneState`] capabilities it needs; the rest
//! fall back to no-ops. Input handlers answer with an optional
//! [`SceneRequest`] which the [`crate::Game`] applies after dispatch.

use std::collections::HashMap;

use glam::Vec2;

use crate::error::DuelError;
use crate::settings::Settings;
use crate::sim::{FrameInput, MatchState, PointerButton};

/// Scene id of the main menu
pub const MAIN_MENU: &str = "main-menu";
/// Scene id of the duel itself
pub const GAME: &str = "game";

/// Keyboard keys the scenes care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(u32),
}

impl Key {
    /// Map a DOM-style key code
    pub fn from_code(code: u32) -> Self {
        match code {
            27 => Key::Escape,
            other => Key::Other(other),
        }
    }
}

/// A pointer press or release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub button: PointerButton,
    /// Screen-space cursor position (pixels, origin bottom-left)
    pub screen: Vec2,
}

/// Per-frame context handed to the active scene
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    pub delta_ms: f32,
    /// World-space point under the cursor, when the cursor is over the arena plane
    pub pointer_target: Option<Vec2>,
    /// Screen-space cursor position
    pub pointer_screen: Vec2,
}

/// What a scene asks the game to do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    Switch(String),
}

/// Capabilities of a scene; every method has a no-op default
pub trait SceneState {
    /// Called each time the scene becomes current
    fn init(&mut self) -> Result<(), DuelError> {
        Ok(())
    }

    fn frame(&mut self, _ctx: &FrameContext) -> Result<Option<SceneRequest>, DuelError> {
        Ok(None)
    }

    fn on_pointer_down(&mut self, _event: &PointerEvent) -> Option<SceneRequest> {
        None
    }

    fn on_pointer_up(&mut self, _event: &PointerEvent) -> Option<SceneRequest> {
        None
    }

    fn on_key_down(&mut self, _key: Key) -> Option<SceneRequest> {
        None
    }

    fn on_key_up(&mut self, _key: Key) -> Option<SceneRequest> {
        None
    }

    fn allow_zoom(&self) -> bool {
        false
    }

    /// The running match, for scenes that host one
    fn match_state(&self) -> Option<&MatchState> {
        None
    }

    fn match_state_mut(&mut self) -> Option<&mut MatchState> {
        None
    }
}

/// Screen-space rectangle of a menu button, supplied by the display side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl ButtonBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// How the play button should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonLook {
    Normal,
    Hover,
    Pressed,
}

/// Title screen with a single play button
#[derive(Debug, Clone)]
pub struct MainMenuScene {
    pub play_button: ButtonBounds,
    pressed: bool,
    hovered: bool,
}

impl MainMenuScene {
    pub fn new(play_button: ButtonBounds) -> Self {
        Self {
            play_button,
            pressed: false,
            hovered: false,
        }
    }

    pub fn button_look(&self) -> ButtonLook {
        if self.pressed {
            ButtonLook::Pressed
        } else if self.hovered {
            ButtonLook::Hover
        } else {
            ButtonLook::Normal
        }
    }
}

impl SceneState for MainMenuScene {
    fn init(&mut self) -> Result<(), DuelError> {
        self.pressed = false;
        self.hovered = false;
        Ok(())
    }

    fn frame(&mut self, ctx: &FrameContext) -> Result<Option<SceneRequest>, DuelError> {
        self.hovered = self.play_button.contains(ctx.pointer_screen);
        Ok(None)
    }

    fn on_pointer_down(&mut self, event: &PointerEvent) -> Option<SceneRequest> {
        if event.button == PointerButton::Primary && self.play_button.contains(event.screen) {
            self.pressed = true;
        }
        None
    }

    fn on_pointer_up(&mut self, event: &PointerEvent) -> Option<SceneRequest> {
        if event.button != PointerButton::Primary {
            return None;
        }
        self.pressed = false;
        if self.play_button.contains(event.screen) {
            Some(SceneRequest::Switch(GAME.to_string()))
        } else {
            None
        }
    }
}

/// Hosts a match; every `init` starts a new one on a fresh level
pub struct GameScene {
    settings: Settings,
    next_seed: u64,
    state: Option<MatchState>,
}

impl GameScene {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings,
            next_seed: seed,
            state: None,
        }
    }
}

impl SceneState for GameScene {
    fn init(&mut self) -> Result<(), DuelError> {
        // Dropping the previous match also drops any death burst still running
        self.state = None;
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        self.state = Some(MatchState::new(self.settings.clone(), seed)?);
        Ok(())
    }

    fn frame(&mut self, ctx: &FrameContext) -> Result<Option<SceneRequest>, DuelError> {
        if let Some(state) = self.state.as_mut() {
            state.frame(&FrameInput {
                delta_ms: ctx.delta_ms,
                pointer_target: ctx.pointer_target,
            })?;
        }
        Ok(None)
    }

    fn on_pointer_down(&mut self, event: &PointerEvent) -> Option<SceneRequest> {
        if let Some(state) = self.state.as_mut() {
            state.pointer_down(event.button);
        }
        None
    }

    fn on_pointer_up(&mut self, event: &PointerEvent) -> Option<SceneRequest> {
        if let Some(state) = self.state.as_mut() {
            state.pointer_up(event.button);
        }
        None
    }

    fn on_key_down(&mut self, key: Key) -> Option<SceneRequest> {
        match key {
            Key::Escape => Some(SceneRequest::Switch(MAIN_MENU.to_string())),
            Key::Other(_) => None,
        }
    }

    fn allow_zoom(&self) -> bool {
        true
    }

    fn match_state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    fn match_state_mut(&mut self) -> Option<&mut MatchState> {
        self.state.as_mut()
    }
}

/// Registry of scenes by id, with one current scene
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, Box<dyn SceneState>>,
    current: Option<String>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scene(&mut self, id: &str, scene: Box<dyn SceneState>) -> Result<(), DuelError> {
        if self.scenes.contains_key(id) {
            return Err(DuelError::DuplicateScene(id.to_string()));
        }
        self.scenes.insert(id.to_string(), scene);
        Ok(())
    }

    /// Make `id` current and (re)initialise it
    pub fn set_scene(&mut self, id: &str) -> Result<(), DuelError> {
        let scene = self
            .scenes
            .get_mut(id)
            .ok_or_else(|| DuelError::UnknownScene(id.to_string()))?;
        scene.init()?;
        log::info!("Scene switched to {id}");
        self.current = Some(id.to_string());
        Ok(())
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&dyn SceneState> {
        let id = self.current.as_ref()?;
        self.scenes.get(id).map(|s| &**s)
    }

    pub fn current_mut(&mut self) -> Option<&mut (dyn SceneState + 'static)> {
        let id = self.current.as_ref()?;
        self.scenes.get_mut(id).map(|s| &mut **s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> ButtonBounds {
        ButtonBounds::new(Vec2::new(100.0, 50.0), Vec2::new(200.0, 90.0))
    }

    fn press(button: PointerButton, screen: Vec2) -> PointerEvent {
        PointerEvent { button, screen }
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code(27), Key::Escape);
        assert_eq!(Key::from_code(32), Key::Other(32));
    }

    #[test]
    fn test_duplicate_scene_rejected() {
        let mut scenes = SceneManager::new();
        scenes
            .add_scene(MAIN_MENU, Box::new(MainMenuScene::new(button())))
            .expect("first add");
        let err = scenes
            .add_scene(MAIN_MENU, Box::new(MainMenuScene::new(button())))
            .unwrap_err();
        assert!(matches!(err, DuelError::DuplicateScene(id) if id == MAIN_MENU));
    }

    #[test]
    fn test_unknown_scene_rejected() {
        let mut scenes = SceneManager::new();
        let err = scenes.set_scene("credits").unwrap_err();
        assert!(matches!(err, DuelError::UnknownScene(id) if id == "credits"));
        assert!(scenes.current_id().is_none());
    }

    #[test]
    fn test_menu_button_click() {
        let mut menu = MainMenuScene::new(button());
        let inside = Vec2::new(150.0, 70.0);
        let outside = Vec2::new(10.0, 10.0);

        assert!(menu.on_pointer_down(&press(PointerButton::Secondary, inside)).is_none());
        assert_eq!(menu.button_look(), ButtonLook::Normal);

        menu.on_pointer_down(&press(PointerButton::Primary, inside));
        assert_eq!(menu.button_look(), ButtonLook::Pressed);

        // Releasing outside the button cancels the click
        assert!(menu.on_pointer_up(&press(PointerButton::Primary, outside)).is_none());
        assert_eq!(menu.button_look(), ButtonLook::Normal);

        menu.on_pointer_down(&press(PointerButton::Primary, inside));
        assert_eq!(
            menu.on_pointer_up(&press(PointerButton::Primary, inside)),
            Some(SceneRequest::Switch(GAME.to_string()))
        );
    }

    #[test]
    fn test_menu_hover() {
        let mut menu = MainMenuScene::new(button());
        let ctx = FrameContext {
            pointer_screen: Vec2::new(120.0, 60.0),
            ..Default::default()
        };
        menu.frame(&ctx).expect("frame");
        assert_eq!(menu.button_look(), ButtonLook::Hover);
        assert!(!menu.allow_zoom());
    }

    #[test]
    fn test_game_scene_escape_and_reinit() {
        let mut game = GameScene::new(Settings::default(), 10);
        assert!(game.match_state().is_none());
        game.init().expect("init");
        let first_seed = game.match_state().map(|m| m.seed);
        assert_eq!(first_seed, Some(10));

        game.init().expect("re-init");
        assert_eq!(game.match_state().map(|m| m.seed), Some(11));
        assert!(game.allow_zoom());
        assert_eq!(
            game.on_key_down(Key::Escape),
            Some(SceneRequest::Switch(MAIN_MENU.to_string()))
        );
        assert!(game.on_key_down(Key::Other(65)).is_none());
    }
}
