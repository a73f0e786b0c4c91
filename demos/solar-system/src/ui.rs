/// HUD state machine.
///
/// All UI state lives in one value; every user intent is an [`Action`] and
/// [`transition`] maps `(state, action)` to the next state plus the side
/// effects the game must carry out. Nothing here touches the scene.

use stellar_engine::QualityTier;

use crate::bodies::{BodyRef, Bodies};

// ── Custom event kinds from the host UI ─────────────────────────────

/// `a` = -1 for auto, else tier code (0 low, 1 medium, 2 high).
pub const CUSTOM_SET_QUALITY: u32 = 1;
/// `a` = 0 or 1.
pub const CUSTOM_SET_LOD: u32 = 2;
/// `a` = 0 or 1.
pub const CUSTOM_SET_SOUND: u32 = 3;
/// `a` = effect code, `b` = 0 or 1.
pub const CUSTOM_SET_EFFECT: u32 = 4;
/// `a` = panel code.
pub const CUSTOM_TOGGLE_PANEL: u32 = 5;
/// `a` = navigation index: 0 is the sun, 1.. the planets in order.
pub const CUSTOM_NAVIGATE: u32 = 6;
pub const CUSTOM_CLEAR_SELECTION: u32 = 7;
pub const CUSTOM_RESET_VIEW: u32 = 8;

/// Focus targets for the number keys 1-4.
const KEY_FOCUS: [(char, &str); 4] = [('1', "Mercury"), ('2', "Venus"), ('3', "Earth"), ('4', "Mars")];

// ── State ────────────────────────────────────────────────────────────

/// User-facing effect toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectToggles {
    pub nebula: bool,
    pub comets: bool,
    pub solar_wind: bool,
    pub lens_flare: bool,
    pub warp: bool,
    pub particles: bool,
}

impl Default for EffectToggles {
    fn default() -> Self {
        Self {
            nebula: false,
            comets: false,
            solar_wind: false,
            lens_flare: true,
            warp: false,
            particles: true,
        }
    }
}

impl EffectToggles {
    pub fn get(&self, effect: Effect) -> bool {
        match effect {
            Effect::Nebula => self.nebula,
            Effect::Comets => self.comets,
            Effect::SolarWind => self.solar_wind,
            Effect::LensFlare => self.lens_flare,
            Effect::Warp => self.warp,
            Effect::Particles => self.particles,
        }
    }

    fn slot(&mut self, effect: Effect) -> &mut bool {
        match effect {
            Effect::Nebula => &mut self.nebula,
            Effect::Comets => &mut self.comets,
            Effect::SolarWind => &mut self.solar_wind,
            Effect::LensFlare => &mut self.lens_flare,
            Effect::Warp => &mut self.warp,
            Effect::Particles => &mut self.particles,
        }
    }

    /// Packed as a bit field for the host (bit = effect code).
    pub fn bits(&self) -> u32 {
        Effect::ALL
            .iter()
            .filter(|e| self.get(**e))
            .fold(0, |acc, e| acc | (1 << e.code()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Nebula,
    Comets,
    SolarWind,
    LensFlare,
    Warp,
    Particles,
}

impl Effect {
    pub const ALL: [Effect; 6] = [
        Effect::Nebula,
        Effect::Comets,
        Effect::SolarWind,
        Effect::LensFlare,
        Effect::Warp,
        Effect::Particles,
    ];

    pub fn code(self) -> u32 {
        match self {
            Effect::Nebula => 0,
            Effect::Comets => 1,
            Effect::SolarWind => 2,
            Effect::LensFlare => 3,
            Effect::Warp => 4,
            Effect::Particles => 5,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Hud,
    Info,
    Controls,
}

impl Panel {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Panel::Hud),
            1 => Some(Panel::Info),
            2 => Some(Panel::Controls),
            _ => None,
        }
    }
}

/// Quality menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityChoice {
    Auto,
    Manual(QualityTier),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub selected: Option<BodyRef>,
    pub hovered: Option<BodyRef>,
    pub show_hud: bool,
    pub show_info: bool,
    /// Camera controls are live only while this is set.
    pub show_controls: bool,
    pub effects: EffectToggles,
    pub sound_enabled: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected: None,
            hovered: None,
            show_hud: true,
            show_info: false,
            show_controls: true,
            effects: EffectToggles::default(),
            sound_enabled: false,
        }
    }
}

impl UiState {
    /// Panel flags packed for the host: bit 0 HUD, bit 1 info, bit 2 controls.
    pub fn panel_bits(&self) -> u32 {
        (self.show_hud as u32) | (self.show_info as u32) << 1 | (self.show_controls as u32) << 2
    }
}

// ── Actions and outcomes ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Hover(BodyRef),
    Unhover(BodyRef),
    /// Pick a body in the scene.
    Select(BodyRef),
    ClearSelection,
    /// Fly the camera to a body without changing the selection.
    Focus(BodyRef),
    /// Select a body and fly to it (navigation panel).
    Navigate(BodyRef),
    ResetView,
    TogglePanel(Panel),
    SetQuality(QualityChoice),
    SetLod(bool),
    SetSound(bool),
    SetEffect(Effect, bool),
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    SelectionChanged(Option<BodyRef>),
    HoverChanged(Option<BodyRef>),
    FocusCamera(BodyRef),
    ResetCamera,
    SelectionTone(BodyRef),
    WarpSweep,
    AutoRotate(bool),
    AmbientDrone(bool),
    Quality(QualityChoice),
    Lod(bool),
    PanelsChanged,
    EffectsChanged,
}

/// Pure state transition.
pub fn transition(state: &UiState, action: Action) -> (UiState, Vec<Outcome>) {
    let mut next = state.clone();
    let mut out = Vec::new();

    match action {
        Action::Hover(body) => {
            if next.hovered != Some(body) {
                next.hovered = Some(body);
                out.push(Outcome::HoverChanged(Some(body)));
            }
        }
        Action::Unhover(body) => {
            // A late pointer-out for a body we already left is stale
            if next.hovered == Some(body) {
                next.hovered = None;
                out.push(Outcome::HoverChanged(None));
            }
        }
        Action::Select(body) => select(&mut next, &mut out, body),
        Action::ClearSelection => {
            if next.selected.take().is_some() {
                out.push(Outcome::SelectionChanged(None));
            }
        }
        Action::Focus(body) => out.push(Outcome::FocusCamera(body)),
        Action::Navigate(body) => {
            select(&mut next, &mut out, body);
            out.push(Outcome::FocusCamera(body));
        }
        Action::ResetView => out.push(Outcome::ResetCamera),
        Action::TogglePanel(panel) => {
            let flag = match panel {
                Panel::Hud => &mut next.show_hud,
                Panel::Info => &mut next.show_info,
                Panel::Controls => &mut next.show_controls,
            };
            *flag = !*flag;
            out.push(Outcome::PanelsChanged);
        }
        Action::SetQuality(choice) => out.push(Outcome::Quality(choice)),
        Action::SetLod(enabled) => out.push(Outcome::Lod(enabled)),
        Action::SetSound(enabled) => {
            if next.sound_enabled != enabled {
                next.sound_enabled = enabled;
                out.push(Outcome::AmbientDrone(enabled));
            }
        }
        Action::SetEffect(effect, on) => {
            let slot = next.effects.slot(effect);
            if *slot != on {
                *slot = on;
                out.push(Outcome::EffectsChanged);
                if effect == Effect::Warp {
                    out.push(Outcome::AutoRotate(on));
                    if on && next.sound_enabled {
                        out.push(Outcome::WarpSweep);
                    }
                }
            }
        }
    }

    (next, out)
}

fn select(next: &mut UiState, out: &mut Vec<Outcome>, body: BodyRef) {
    if next.selected == Some(body) {
        return;
    }
    next.selected = Some(body);
    out.push(Outcome::SelectionChanged(Some(body)));
    if next.sound_enabled {
        out.push(Outcome::SelectionTone(body));
    }
}

// ── Input mapping ────────────────────────────────────────────────────

/// Resolve a body name for navigation. Unknown names are a no-op.
pub fn focus_by_name(bodies: &Bodies, name: &str) -> Option<BodyRef> {
    let found = bodies.find(name);
    if found.is_none() {
        log::debug!("Navigation: no body named {:?}", name);
    }
    found
}

/// Map a key press to an action.
pub fn key_action(bodies: &Bodies, key_code: u32) -> Option<Action> {
    let key = char::from_u32(key_code)?.to_ascii_lowercase();
    match key {
        '0' => Some(Action::ResetView),
        'h' => Some(Action::TogglePanel(Panel::Hud)),
        'i' => Some(Action::TogglePanel(Panel::Info)),
        _ => {
            let (_, name) = KEY_FOCUS.iter().find(|(k, _)| *k == key)?;
            focus_by_name(bodies, name).map(Action::Focus)
        }
    }
}

/// Map a custom host event to an action.
pub fn custom_action(bodies: &Bodies, kind: u32, a: f32, b: f32) -> Option<Action> {
    match kind {
        CUSTOM_SET_QUALITY => {
            if a.is_finite() && a < 0.0 {
                Some(Action::SetQuality(QualityChoice::Auto))
            } else {
                let tier = wire_code(a).and_then(QualityTier::from_code)?;
                Some(Action::SetQuality(QualityChoice::Manual(tier)))
            }
        }
        CUSTOM_SET_LOD => Some(Action::SetLod(a != 0.0)),
        CUSTOM_SET_SOUND => Some(Action::SetSound(a != 0.0)),
        CUSTOM_SET_EFFECT => wire_code(a)
            .and_then(Effect::from_code)
            .map(|e| Action::SetEffect(e, b != 0.0)),
        CUSTOM_TOGGLE_PANEL => wire_code(a).and_then(Panel::from_code).map(Action::TogglePanel),
        CUSTOM_NAVIGATE => navigation_target(bodies, a).map(Action::Navigate),
        CUSTOM_CLEAR_SELECTION => Some(Action::ClearSelection),
        CUSTOM_RESET_VIEW => Some(Action::ResetView),
        _ => {
            log::debug!("Ignoring custom event kind {}", kind);
            None
        }
    }
}

/// A small non-negative integer sent as f32. NaN, infinities and
/// fractions are rejected rather than truncated.
fn wire_code(a: f32) -> Option<u32> {
    if a.is_finite() && a >= 0.0 && a.fract() == 0.0 && a <= u32::MAX as f32 {
        Some(a as u32)
    } else {
        log::debug!("Ignoring malformed code {}", a);
        None
    }
}

fn navigation_target(bodies: &Bodies, index: f32) -> Option<BodyRef> {
    if index < 0.0 || !index.is_finite() {
        log::debug!("Navigation: invalid index {}", index);
        return None;
    }
    match index as usize {
        0 => Some(BodyRef::Sun),
        i if i <= bodies.planets.len() => Some(BodyRef::Planet(i - 1)),
        i => {
            log::debug!("Navigation: no body at index {}", i);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies() -> Bodies {
        Bodies::builtin().unwrap()
    }

    #[test]
    fn defaults_match_first_launch() {
        let s = UiState::default();
        assert!(s.show_hud && !s.show_info && s.show_controls);
        assert!(!s.sound_enabled);
        assert!(s.effects.lens_flare && s.effects.particles);
        assert!(!s.effects.nebula && !s.effects.warp);
    }

    #[test]
    fn select_is_silent_while_sound_disabled() {
        let (s, out) = transition(&UiState::default(), Action::Select(BodyRef::Planet(2)));
        assert_eq!(s.selected, Some(BodyRef::Planet(2)));
        assert_eq!(out, vec![Outcome::SelectionChanged(Some(BodyRef::Planet(2)))]);
    }

    #[test]
    fn select_plays_tone_when_sound_enabled() {
        let (s, _) = transition(&UiState::default(), Action::SetSound(true));
        let (_, out) = transition(&s, Action::Select(BodyRef::Sun));
        assert!(out.contains(&Outcome::SelectionTone(BodyRef::Sun)));
    }

    #[test]
    fn reselecting_same_body_is_noop() {
        let (s, _) = transition(&UiState::default(), Action::Select(BodyRef::Sun));
        let (s2, out) = transition(&s, Action::Select(BodyRef::Sun));
        assert_eq!(s2, s);
        assert!(out.is_empty());
    }

    #[test]
    fn stale_unhover_is_ignored() {
        let (s, _) = transition(&UiState::default(), Action::Hover(BodyRef::Planet(0)));
        let (s, _) = transition(&s, Action::Hover(BodyRef::Planet(1)));
        let (s, out) = transition(&s, Action::Unhover(BodyRef::Planet(0)));
        assert_eq!(s.hovered, Some(BodyRef::Planet(1)));
        assert!(out.is_empty());
    }

    #[test]
    fn navigate_selects_and_focuses() {
        let (s, out) = transition(&UiState::default(), Action::Navigate(BodyRef::Planet(4)));
        assert_eq!(s.selected, Some(BodyRef::Planet(4)));
        assert_eq!(out.last(), Some(&Outcome::FocusCamera(BodyRef::Planet(4))));
    }

    #[test]
    fn warp_toggles_auto_rotate_and_sweep() {
        let (s, _) = transition(&UiState::default(), Action::SetSound(true));
        let (s, out) = transition(&s, Action::SetEffect(Effect::Warp, true));
        assert!(s.effects.warp);
        assert!(out.contains(&Outcome::AutoRotate(true)));
        assert!(out.contains(&Outcome::WarpSweep));

        let (_, out) = transition(&s, Action::SetEffect(Effect::Warp, false));
        assert!(out.contains(&Outcome::AutoRotate(false)));
        assert!(!out.contains(&Outcome::WarpSweep));
    }

    #[test]
    fn panel_toggle_flips_flag() {
        let (s, out) = transition(&UiState::default(), Action::TogglePanel(Panel::Controls));
        assert!(!s.show_controls);
        assert_eq!(out, vec![Outcome::PanelsChanged]);
        assert_eq!(s.panel_bits(), 1);
    }

    #[test]
    fn keys_map_to_actions() {
        let b = bodies();
        assert_eq!(key_action(&b, '3' as u32), Some(Action::Focus(BodyRef::Planet(2))));
        assert_eq!(key_action(&b, '0' as u32), Some(Action::ResetView));
        assert_eq!(key_action(&b, 'H' as u32), Some(Action::TogglePanel(Panel::Hud)));
        assert_eq!(key_action(&b, 'i' as u32), Some(Action::TogglePanel(Panel::Info)));
        assert_eq!(key_action(&b, 'x' as u32), None);
    }

    #[test]
    fn key_focus_missing_from_scene_is_noop() {
        let mut b = bodies();
        b.planets.retain(|p| p.name() != "Mars");
        assert_eq!(key_action(&b, '4' as u32), None);
    }

    #[test]
    fn custom_quality_events() {
        let b = bodies();
        assert_eq!(
            custom_action(&b, CUSTOM_SET_QUALITY, -1.0, 0.0),
            Some(Action::SetQuality(QualityChoice::Auto))
        );
        assert_eq!(
            custom_action(&b, CUSTOM_SET_QUALITY, 2.0, 0.0),
            Some(Action::SetQuality(QualityChoice::Manual(QualityTier::High)))
        );
        assert_eq!(custom_action(&b, CUSTOM_SET_QUALITY, 7.0, 0.0), None);
    }

    #[test]
    fn malformed_codes_are_dropped_not_truncated() {
        let b = bodies();
        // NaN would otherwise cast to 0 and pin Low
        assert_eq!(custom_action(&b, CUSTOM_SET_QUALITY, f32::NAN, 0.0), None);
        assert_eq!(custom_action(&b, CUSTOM_SET_QUALITY, 1.5, 0.0), None);
        assert_eq!(custom_action(&b, CUSTOM_SET_QUALITY, f32::INFINITY, 0.0), None);
        assert_eq!(custom_action(&b, CUSTOM_SET_QUALITY, f32::NEG_INFINITY, 0.0), None);
        assert_eq!(custom_action(&b, CUSTOM_SET_EFFECT, 0.5, 1.0), None);
        assert_eq!(custom_action(&b, CUSTOM_TOGGLE_PANEL, f32::NAN, 0.0), None);
        assert_eq!(
            custom_action(&b, CUSTOM_TOGGLE_PANEL, 1.0, 0.0),
            Some(Action::TogglePanel(Panel::Info))
        );
    }

    #[test]
    fn custom_navigation_by_index() {
        let b = bodies();
        assert_eq!(custom_action(&b, CUSTOM_NAVIGATE, 0.0, 0.0), Some(Action::Navigate(BodyRef::Sun)));
        assert_eq!(
            custom_action(&b, CUSTOM_NAVIGATE, 8.0, 0.0),
            Some(Action::Navigate(BodyRef::Planet(7)))
        );
        assert_eq!(custom_action(&b, CUSTOM_NAVIGATE, 9.0, 0.0), None);
        assert_eq!(custom_action(&b, CUSTOM_NAVIGATE, -2.0, 0.0), None);
    }

    #[test]
    fn focus_by_unknown_name_is_none() {
        let b = bodies();
        assert_eq!(focus_by_name(&b, "pluto"), None);
        assert_eq!(focus_by_name(&b, "earth"), Some(BodyRef::Planet(2)));
    }

    #[test]
    fn effect_bits_pack_codes() {
        let t = EffectToggles::default();
        assert_eq!(t.bits(), (1 << 3) | (1 << 5));
    }
}
