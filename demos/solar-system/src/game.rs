/// Solar System: sun, planets, comet and wormhole on animated orbits.
///
/// Orbital positions are recomputed at 10 Hz and particle motion at 5 Hz;
/// everything else is cheap per-frame animation. Effect visibility follows
/// the quality tier the engine's performance monitor maintains.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use stellar_engine::*;

use crate::backdrop;
use crate::bodies::{self, BodyInfo, BodyRef, Bodies};
use crate::comet::Comet;
use crate::config::{self, SceneSpec, UniverseConfig};
use crate::emitters::{
    EmitterSwitches, Emitters, Wormhole, BATCH_ASTEROIDS, BATCH_COMET_TRAIL, BATCH_STARS,
};
use crate::orbit::compute_position;
use crate::ui::{self, Action, Outcome, QualityChoice, UiState};

// ── Game event kinds to the host ─────────────────────────────────────

/// a = navigation index (-1 none), b = distance from the sun.
pub const EVENT_SELECTION: f32 = 1.0;
/// a = navigation index (-1 none).
pub const EVENT_HOVER: f32 = 2.0;
/// a = tier code, b = 1 when pinned by the user, c = average fps (-1 before the first sample).
pub const EVENT_QUALITY: f32 = 3.0;
/// a = max particles, b = LOD on, c = bloom on.
pub const EVENT_QUALITY_SETTINGS: f32 = 4.0;
/// a = panel bits, b = sound enabled.
pub const EVENT_PANELS: f32 = 5.0;
/// a = effect toggle bits, b = built emitters, c = live wormhole tunnel particles.
pub const EVENT_EFFECTS: f32 = 6.0;
/// a = frequency (Hz), b = duration (s), c = navigation index.
pub const EVENT_TONE: f32 = 7.0;
/// a = start frequency, b = end frequency, c = duration (s).
pub const EVENT_SWEEP: f32 = 8.0;

// ── Sound cues ───────────────────────────────────────────────────────

pub const SOUND_SELECT: SoundEvent = SoundEvent(1);
pub const SOUND_WARP: SoundEvent = SoundEvent(2);
pub const SOUND_AMBIENT_START: SoundEvent = SoundEvent(3);
pub const SOUND_AMBIENT_STOP: SoundEvent = SoundEvent(4);

const TONE_SECONDS: f32 = 0.5;
const SWEEP_FROM: f32 = 100.0;
const SWEEP_TO: f32 = 1000.0;
const SWEEP_SECONDS: f32 = 2.0;

// ── Camera ───────────────────────────────────────────────────────────

const FOCUS_OFFSET: Vec3 = Vec3::new(5.0, 3.0, 5.0);
const HOME_EYE: Vec3 = Vec3::new(0.0, 5.0, 20.0);

// ── Animation rates ──────────────────────────────────────────────────

/// Whole-system yaw, radians per second.
const SYSTEM_SPIN: f32 = 0.005;
const HOVER_SCALE: f32 = 1.1;
const SUN_SPIN: f32 = 0.005;
const CORONA_SPIN: Vec3 = Vec3::new(0.0, 0.002, 0.001);
const WORMHOLE_SPIN: Vec3 = Vec3::new(0.01, 0.0, 0.02);

// ── Sun visuals ──────────────────────────────────────────────────────

/// Radius factor, color, opacity. The first layer pulses and spins.
const CORONA_LAYERS: [(f32, u32, f32); 3] = [(1.3, 0xFFD700, 0.4), (1.8, 0xFF8C00, 0.2), (2.5, 0xFF4500, 0.05)];
const FLARE_COUNT: usize = 6;
const FLARE_COLORS: [u32; 3] = [0xFF4500, 0xFF6347, 0xFFD700];
const FIELD_LINE_COUNT: usize = 4;

// ── Planet visuals ───────────────────────────────────────────────────

const SATURN_RING_COLOR: u32 = 0xFAD5A5;
const ICE_RING_COLOR: u32 = 0x4FD0E7;
const ATMOSPHERE_COLOR: u32 = 0x87CEEB;
const RED_SPOT_COLOR: u32 = 0x8B0000;
/// Offset (in planet radii), size (in planet radii), color.
const NEPTUNE_STORMS: [(Vec3, f32, u32); 2] = [
    (Vec3::new(0.6, 0.3, 0.0), 0.2, 0x87CEEB),
    (Vec3::new(-0.5, -0.4, 0.0), 0.15, 0xADD8E6),
];
const COMET_COLOR: u32 = 0x4A4A4A;
const COMET_RADIUS: f32 = 0.3;

// ── Wormhole visuals ─────────────────────────────────────────────────

const BOLT_COUNT: usize = 8;

// ── Entity bookkeeping ───────────────────────────────────────────────

/// A mesh glued to a planet at a fixed offset.
struct Attachment {
    id: EntityId,
    offset: Vec3,
}

struct PlanetIds {
    body: EntityId,
    glow: EntityId,
    ring: Option<EntityId>,
    attachments: Vec<Attachment>,
}

struct SunIds {
    core: EntityId,
    corona: Vec<EntityId>,
    flares: Vec<(EntityId, Vec3)>,
    field_lines: Vec<(EntityId, Vec3)>,
}

struct WormholeIds {
    ring: EntityId,
    /// Static parts: inner glow, outer field and bolts, with their offsets.
    parts: Vec<(EntityId, Vec3)>,
}

#[derive(Default)]
struct SceneIds {
    sun: Option<SunIds>,
    planets: Vec<PlanetIds>,
    comet: Option<EntityId>,
    wormhole: Option<WormholeIds>,
}

// ── State ────────────────────────────────────────────────────────────

/// Everything the scene is derived from.
pub struct UniverseState {
    pub bodies: Bodies,
    /// Planet positions in the system's local frame, refreshed by the orbit gate.
    pub positions: Vec<Vec3>,
    pub comet: Option<Comet>,
    pub ui: UiState,
    /// Yaw of the whole system about Y.
    pub system_yaw: f32,
    /// Wall-clock seconds orbits were last evaluated at.
    pub now: f64,
}

impl UniverseState {
    fn from_scene(scene: SceneSpec) -> Self {
        let positions = vec![Vec3::ZERO; scene.bodies.planets.len()];
        Self {
            bodies: scene.bodies,
            positions,
            comet: scene.comet.map(Comet::new),
            ui: UiState::default(),
            system_yaw: 0.0,
            now: 0.0,
        }
    }

    /// Position in the system's local frame.
    pub fn local_position(&self, body: BodyRef) -> Vec3 {
        match body {
            BodyRef::Sun => Vec3::ZERO,
            BodyRef::Planet(i) => self.positions.get(i).copied().unwrap_or(Vec3::ZERO),
        }
    }

    pub fn world_position(&self, body: BodyRef) -> Vec3 {
        self.to_world(self.local_position(body))
    }

    fn to_world(&self, local: Vec3) -> Vec3 {
        Quat::from_rotation_y(self.system_yaw) * local
    }

    /// Recompute every planet's orbital position at `time`.
    pub fn recompute_orbits(&mut self, time: f64) {
        for (slot, planet) in self.positions.iter_mut().zip(&self.bodies.planets) {
            *slot = compute_position(&planet.orbit, time).as_vec3();
        }
    }
}

/// Index used by the navigation panel: 0 is the sun, planets follow in order.
pub fn nav_index(body: BodyRef) -> f32 {
    match body {
        BodyRef::Sun => 0.0,
        BodyRef::Planet(i) => (i + 1) as f32,
    }
}

fn spin(angle: f32, step: f32) -> f32 {
    (angle + step).rem_euclid(TAU)
}

fn spin_vec(angles: Vec3, step: Vec3) -> Vec3 {
    Vec3::new(spin(angles.x, step.x), spin(angles.y, step.y), spin(angles.z, step.z))
}

/// `1 + sin(rate · t) · amplitude`, evaluated in f64 so long sessions stay smooth.
fn pulse(elapsed: f64, rate: f64, amplitude: f64) -> f32 {
    (1.0 + (elapsed * rate).sin() * amplitude) as f32
}

// ── Game struct ──────────────────────────────────────────────────────

pub struct SolarSystem {
    state: UniverseState,
    emitters: Emitters,
    ids: SceneIds,
    orbit_gate: UpdateGate,
    particle_gate: UpdateGate,
    /// Tier the star field and asteroid belt were last built for.
    backdrop_tier: Option<QualityTier>,
    stars: Vec<PointVertex>,
    asteroids: Vec<PointVertex>,
}

impl SolarSystem {
    pub fn new() -> Self {
        let scene = UniverseConfig::default().validate().unwrap_or_else(|e| {
            log::error!("Built-in scene rejected: {}", e);
            SceneSpec::empty()
        });
        Self::with_scene(scene)
    }

    pub fn with_scene(scene: SceneSpec) -> Self {
        let config = game_config();
        let emitters = Emitters::new().with_wormhole_radius(scene.wormhole_radius);
        Self {
            state: UniverseState::from_scene(scene),
            emitters,
            ids: SceneIds::default(),
            orbit_gate: UpdateGate::new(config.orbit_interval),
            particle_gate: UpdateGate::new(config.particle_interval),
            backdrop_tier: None,
            stars: Vec::new(),
            asteroids: Vec::new(),
        }
    }

    /// Fact sheet for a body or the comet by name, as JSON for the HUD.
    pub fn body_info_json(&self, name: &str) -> Option<String> {
        let comet = self
            .state
            .comet
            .as_ref()
            .map(Comet::orbit)
            .filter(|orbit| orbit.name().eq_ignore_ascii_case(name));
        let info: BodyInfo = match comet {
            Some(orbit) => bodies::comet_info(orbit),
            None => {
                let body = ui::focus_by_name(&self.state.bodies, name)?;
                self.state.bodies.info(body)?
            }
        };
        serde_json::to_string(&info)
            .map_err(|e| log::warn!("Could not serialize info for {}: {}", name, e))
            .ok()
    }

    /// Run one UI action and carry out its side effects.
    pub fn dispatch(&mut self, ctx: &mut EngineContext, action: Action) {
        let (next, outcomes) = ui::transition(&self.state.ui, action);
        self.state.ui = next;
        for outcome in outcomes {
            self.apply_outcome(ctx, outcome);
        }
    }

    // ── Scene construction ─────────────────────────────────────────

    fn spawn_scene(&mut self, ctx: &mut EngineContext) {
        ctx.scene.clear();
        self.ids = SceneIds::default();
        self.spawn_sun(ctx);
        self.spawn_planets(ctx);
        self.spawn_comet(ctx);
        self.spawn_wormhole(ctx);
        log::info!(
            "Scene spawned: {} planets, {} entities",
            self.state.bodies.planets.len(),
            ctx.scene.len()
        );
    }

    fn spawn_sun(&mut self, ctx: &mut EngineContext) {
        let r = self.state.bodies.sun_radius;

        let core = ctx.next_id();
        ctx.scene.spawn(
            Entity::new(core).with_tag(bodies::SUN_NAME).with_mesh(
                MeshComponent::new(MeshShape::Sphere { radius: r }, MeshColor::hex(bodies::SUN_COLOR))
                    .with_emissive(1.0)
                    .with_opacity(0.9)
                    .with_pickable(true),
            ),
        );

        let mut corona = Vec::with_capacity(CORONA_LAYERS.len());
        for (factor, color, opacity) in CORONA_LAYERS {
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id).with_tag("corona").with_mesh(
                    MeshComponent::new(MeshShape::Sphere { radius: r * factor }, MeshColor::hex(color))
                        .with_emissive(1.0)
                        .with_opacity(opacity),
                ),
            );
            corona.push(id);
        }

        let mut flares = Vec::with_capacity(FLARE_COUNT);
        for i in 0..FLARE_COUNT {
            let k = i as f32;
            let angle = k / FLARE_COUNT as f32 * TAU;
            let distance = r * (1.5 + k.sin() * 0.3);
            let offset = Vec3::new(angle.cos() * distance, (k * 2.0).sin() * r * 0.5, angle.sin() * distance);
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id).with_tag("flare").with_pos(offset).with_mesh(
                    MeshComponent::new(
                        MeshShape::Sphere { radius: 0.15 + k.sin() * 0.1 },
                        MeshColor::hex(FLARE_COLORS[i % FLARE_COLORS.len()]),
                    )
                    .with_emissive(1.0)
                    .with_opacity(0.7),
                ),
            );
            flares.push((id, offset));
        }

        let mut field_lines = Vec::with_capacity(FIELD_LINE_COUNT);
        for i in 0..FIELD_LINE_COUNT {
            let angle = i as f32 / FIELD_LINE_COUNT as f32 * TAU;
            let distance = r * 2.0;
            let offset = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
            let id = ctx.next_id();
            let mut line = Entity::new(id)
                .with_tag("field-line")
                .with_pos(offset)
                .with_rotation(Vec3::new(0.0, angle, 0.0))
                .with_mesh(
                    MeshComponent::new(
                        MeshShape::Cylinder { radius: 0.02, height: distance },
                        MeshColor::hex(0xFFD700),
                    )
                    .with_emissive(1.0)
                    .with_opacity(0.2),
                );
            line.active = false;
            ctx.scene.spawn(line);
            field_lines.push((id, offset));
        }

        self.ids.sun = Some(SunIds {
            core,
            corona,
            flares,
            field_lines,
        });
    }

    fn spawn_planets(&mut self, ctx: &mut EngineContext) {
        for planet in &self.state.bodies.planets {
            let r = planet.radius;
            let color = MeshColor::hex(planet.color);
            let name = planet.name();
            let orbit_radius = planet.orbit.orbit_radius() as f32;

            let body = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(body)
                    .with_tag(name)
                    .with_rotation(Vec3::new(0.0, 0.0, planet.orbit.tilt_radians() as f32))
                    .with_mesh(MeshComponent::new(MeshShape::Sphere { radius: r }, color).with_pickable(true)),
            );

            let glow = ctx.next_id();
            let mut glow_entity = Entity::new(glow).with_tag("hover-glow").with_mesh(
                MeshComponent::new(MeshShape::Sphere { radius: r * 1.3 }, color)
                    .with_emissive(0.5)
                    .with_opacity(0.3),
            );
            glow_entity.active = false;
            ctx.scene.spawn(glow_entity);

            // Orbit path centred on the sun; never moves
            let path = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(path).with_tag("orbit-path").with_mesh(
                    MeshComponent::new(
                        MeshShape::Ring { inner: orbit_radius - 0.05, outer: orbit_radius + 0.05 },
                        MeshColor::new(1.0, 1.0, 1.0),
                    )
                    .with_opacity(0.1),
                ),
            );

            let ring = if planet.orbit.has_rings {
                let id = ctx.next_id();
                let ring_color = if name == "Saturn" { SATURN_RING_COLOR } else { ICE_RING_COLOR };
                ctx.scene.spawn(
                    Entity::new(id).with_tag("rings").with_mesh(
                        MeshComponent::new(
                            MeshShape::Ring { inner: r * 1.5, outer: r * 2.5 },
                            MeshColor::hex(ring_color),
                        )
                        .with_opacity(0.6),
                    ),
                );
                Some(id)
            } else {
                None
            };

            let mut attachments = Vec::new();
            let mut attach = |ctx: &mut EngineContext, tag: &str, offset: Vec3, radius: f32, color: u32, opacity: f32| {
                let id = ctx.next_id();
                ctx.scene.spawn(
                    Entity::new(id).with_tag(tag).with_mesh(
                        MeshComponent::new(MeshShape::Sphere { radius }, MeshColor::hex(color))
                            .with_opacity(opacity),
                    ),
                );
                attachments.push(Attachment { id, offset });
            };

            if name == "Earth" {
                attach(ctx, "atmosphere", Vec3::ZERO, r * 1.05, ATMOSPHERE_COLOR, 0.2);
            }
            if name == "Jupiter" {
                attach(ctx, "red-spot", Vec3::new(r * 0.8, 0.0, 0.0), r * 0.3, RED_SPOT_COLOR, 0.8);
            }
            if planet.orbit.has_storms {
                for (offset, size, color) in NEPTUNE_STORMS {
                    attach(ctx, "storm", offset * r, r * size, color, 0.6);
                }
            }

            self.ids.planets.push(PlanetIds {
                body,
                glow,
                ring,
                attachments,
            });
        }
    }

    fn spawn_comet(&mut self, ctx: &mut EngineContext) {
        if self.state.comet.is_none() {
            return;
        }
        let id = ctx.next_id();
        let mut nucleus = Entity::new(id).with_tag("comet").with_mesh(MeshComponent::new(
            MeshShape::Sphere { radius: COMET_RADIUS },
            MeshColor::hex(COMET_COLOR),
        ));
        nucleus.active = false;
        ctx.scene.spawn(nucleus);
        self.ids.comet = Some(id);
    }

    fn spawn_wormhole(&mut self, ctx: &mut EngineContext) {
        let r = self.emitters.wormhole_radius();

        let ring = ctx.next_id();
        let mut main = Entity::new(ring).with_tag("wormhole").with_mesh(
            MeshComponent::new(MeshShape::Torus { radius: r, tube: r * 0.3 }, MeshColor::hex(0x4B0082))
                .with_emissive(0.5)
                .with_opacity(0.6),
        );
        main.active = false;
        ctx.scene.spawn(main);

        let mut parts = Vec::new();
        let mut add = |ctx: &mut EngineContext, offset: Vec3, mesh: MeshComponent| {
            let id = ctx.next_id();
            let mut e = Entity::new(id).with_tag("wormhole-part").with_mesh(mesh);
            e.active = false;
            ctx.scene.spawn(e);
            parts.push((id, offset));
        };

        add(
            ctx,
            Vec3::ZERO,
            MeshComponent::new(MeshShape::Torus { radius: r, tube: r * 0.3 }, MeshColor::hex(0x8A2BE2))
                .with_emissive(0.5)
                .with_opacity(0.3),
        );
        add(
            ctx,
            Vec3::ZERO,
            MeshComponent::new(MeshShape::Torus { radius: r * 1.5, tube: r * 0.2 }, MeshColor::hex(0xFF00FF))
                .with_emissive(0.5)
                .with_opacity(0.2),
        );
        for i in 0..BOLT_COUNT {
            let angle = i as f32 / BOLT_COUNT as f32 * TAU;
            add(
                ctx,
                Vec3::new(angle.cos() * r * 1.2, angle.sin() * r * 1.2, 0.0),
                MeshComponent::new(MeshShape::Cylinder { radius: 0.05, height: 2.0 }, MeshColor::hex(0x00FFFF))
                    .with_emissive(1.0)
                    .with_opacity(0.7),
            );
        }

        self.ids.wormhole = Some(WormholeIds { ring, parts });
    }

    // ── Input ──────────────────────────────────────────────────────

    fn body_for(&self, entity: EntityId) -> Option<BodyRef> {
        if self.ids.sun.as_ref().map(|s| s.core) == Some(entity) {
            return Some(BodyRef::Sun);
        }
        self.ids.planets.iter().position(|p| p.body == entity).map(BodyRef::Planet)
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            let action = match *event {
                InputEvent::PointerOver { entity } => self.body_for(entity).map(Action::Hover),
                InputEvent::PointerOut { entity } => self.body_for(entity).map(Action::Unhover),
                InputEvent::Click { entity } => self.body_for(entity).map(Action::Select),
                InputEvent::KeyDown { key_code } => ui::key_action(&self.state.bodies, key_code),
                InputEvent::Orbit { dx, dy } => {
                    if self.state.ui.show_controls {
                        ctx.camera.orbit(dx, dy);
                    }
                    None
                }
                InputEvent::Zoom { delta } => {
                    if self.state.ui.show_controls {
                        ctx.camera.zoom(delta);
                    }
                    None
                }
                InputEvent::Custom { kind, a, b, .. } => ui::custom_action(&self.state.bodies, kind, a, b),
            };
            if let Some(action) = action {
                self.dispatch(ctx, action);
            }
        }
    }

    fn apply_outcome(&mut self, ctx: &mut EngineContext, outcome: Outcome) {
        match outcome {
            Outcome::SelectionChanged(body) => {
                let name = body.and_then(|b| self.state.bodies.name_of(b)).unwrap_or("none");
                log::debug!("Selected: {}", name);
            }
            Outcome::FocusCamera(body) => {
                let target = self.state.world_position(body);
                ctx.camera.fly_to(target + FOCUS_OFFSET, target);
            }
            Outcome::ResetCamera => ctx.camera.fly_to(HOME_EYE, Vec3::ZERO),
            Outcome::SelectionTone(body) => {
                let tone = self
                    .state
                    .bodies
                    .name_of(body)
                    .map(bodies::selection_tone)
                    .unwrap_or(bodies::DEFAULT_TONE);
                play(ctx, SOUND_SELECT, GameEvent::new(EVENT_TONE, tone, TONE_SECONDS, nav_index(body)));
            }
            Outcome::WarpSweep => {
                play(ctx, SOUND_WARP, GameEvent::new(EVENT_SWEEP, SWEEP_FROM, SWEEP_TO, SWEEP_SECONDS));
            }
            Outcome::AutoRotate(on) => ctx.camera.auto_rotate = on,
            Outcome::AmbientDrone(on) => {
                ctx.emit_sound(if on { SOUND_AMBIENT_START } else { SOUND_AMBIENT_STOP });
            }
            Outcome::Quality(QualityChoice::Auto) => {
                ctx.quality.resume_auto();
                log::info!("Quality: auto ({})", ctx.quality.tier().name());
            }
            Outcome::Quality(QualityChoice::Manual(tier)) => {
                ctx.quality.set_manual(tier);
                log::info!("Quality: {} (manual)", tier.name());
            }
            Outcome::Lod(enabled) => ctx.quality.set_lod(enabled),
            Outcome::HoverChanged(_) | Outcome::PanelsChanged | Outcome::EffectsChanged => {}
        }
    }

    // ── Per-frame work ─────────────────────────────────────────────

    /// Advance the comet when visible; drop its trail when hidden.
    fn update_comet(&mut self, visible: bool, elapsed: f64) {
        if let Some(comet) = self.state.comet.as_mut() {
            if visible {
                comet.advance(elapsed);
            } else if !comet.trail().is_empty() {
                comet.reset_trail();
            }
        }
    }

    fn animate_sun(&self, ctx: &mut EngineContext, profile: &QualityProfile, elapsed: f64) {
        let Some(sun) = &self.ids.sun else { return };

        if let Some(e) = ctx.scene.get_mut(sun.core) {
            e.rotation.y = spin(e.rotation.y, SUN_SPIN);
            e.scale = pulse(elapsed, 2.0, 0.05);
        }
        if let Some(e) = sun.corona.first().and_then(|id| ctx.scene.get_mut(*id)) {
            e.rotation = spin_vec(e.rotation, CORONA_SPIN);
            e.scale = pulse(elapsed, 1.5, 0.1);
        }
        for (i, (id, offset)) in sun.flares.iter().enumerate() {
            let intensity = ((3.0 * (elapsed + i as f64 * 2.0)).sin() * 0.5 + 0.5) as f32;
            if let Some(e) = ctx.scene.get_mut(*id) {
                e.pos = self.state.to_world(*offset);
                e.scale = 1.0 + intensity * 0.5;
                if let Some(mesh) = e.mesh.as_mut() {
                    mesh.opacity = intensity * 0.8;
                }
            }
        }
        let field_lines = self.state.ui.effects.solar_wind && profile.ambient_effects;
        for (id, offset) in &sun.field_lines {
            if let Some(e) = ctx.scene.get_mut(*id) {
                e.active = field_lines;
                e.pos = self.state.to_world(*offset);
            }
        }
    }

    fn animate_planets(&self, ctx: &mut EngineContext) {
        let hovered = self.state.ui.hovered;
        for (i, (ids, planet)) in self.ids.planets.iter().zip(&self.state.bodies.planets).enumerate() {
            let center = self.state.to_world(self.state.positions.get(i).copied().unwrap_or(Vec3::ZERO));
            let is_hovered = hovered == Some(BodyRef::Planet(i));
            let rot = planet.orbit.rotation_speed as f32;

            if let Some(e) = ctx.scene.get_mut(ids.body) {
                e.pos = center;
                e.rotation.y = spin(e.rotation.y, rot);
                e.scale = if is_hovered { HOVER_SCALE } else { 1.0 };
            }
            if let Some(e) = ctx.scene.get_mut(ids.glow) {
                e.pos = center;
                e.active = is_hovered;
            }
            if let Some(e) = ids.ring.and_then(|id| ctx.scene.get_mut(id)) {
                e.pos = center;
                // Ring spins about its own axis
                e.rotation.y = spin(e.rotation.y, rot * 0.5);
            }
            for a in &ids.attachments {
                if let Some(e) = ctx.scene.get_mut(a.id) {
                    e.pos = center + a.offset;
                }
            }
        }
    }

    fn animate_comet(&self, ctx: &mut EngineContext, visible: bool) {
        let (Some(id), Some(comet)) = (self.ids.comet, self.state.comet.as_ref()) else {
            return;
        };
        if let Some(e) = ctx.scene.get_mut(id) {
            e.active = visible;
            e.pos = self.state.to_world(comet.head());
            e.rotation = comet.spin;
        }
    }

    fn animate_wormhole(&self, ctx: &mut EngineContext, visible: bool, elapsed: f64) {
        let Some(w) = &self.ids.wormhole else { return };
        let center = self.state.to_world(Wormhole::ORIGIN);
        if let Some(e) = ctx.scene.get_mut(w.ring) {
            e.active = visible;
            e.pos = center;
            if visible {
                e.rotation = spin_vec(e.rotation, WORMHOLE_SPIN);
                e.scale = pulse(elapsed, 3.0, 0.1);
            }
        }
        for (id, offset) in &w.parts {
            if let Some(e) = ctx.scene.get_mut(*id) {
                e.active = visible;
                e.pos = center + *offset;
            }
        }
    }

    fn refresh_backdrop(&mut self, ctx: &mut EngineContext, profile: &QualityProfile) {
        if self.backdrop_tier == Some(profile.tier) {
            return;
        }
        self.stars = backdrop::starfield(profile.star_count as usize, &mut ctx.rng);
        self.asteroids = backdrop::asteroid_belt(profile.asteroid_count as usize, &mut ctx.rng);
        self.backdrop_tier = Some(profile.tier);
        log::debug!(
            "Backdrop rebuilt for {}: {} stars, {} asteroids",
            profile.tier.name(),
            self.stars.len(),
            self.asteroids.len()
        );
    }

    fn write_points(&mut self, ctx: &mut EngineContext, comet_visible: bool) {
        let yaw = self.state.system_yaw;
        ctx.points.push_batch_rotated(BATCH_STARS, Vec3::ZERO, 1.0, yaw, &self.stars);
        ctx.points.push_batch_rotated(BATCH_ASTEROIDS, Vec3::ZERO, 1.0, yaw, &self.asteroids);
        self.emitters.write_points(&mut ctx.points, yaw);
        if comet_visible {
            if let Some(comet) = self.state.comet.as_mut() {
                ctx.points.push_batch_rotated(BATCH_COMET_TRAIL, Vec3::ZERO, 1.0, yaw, comet.trail_vertices());
            }
        }
    }

    fn emit_state(&self, ctx: &mut EngineContext) {
        let ui = &self.state.ui;
        let selected = ui.selected.map(nav_index).unwrap_or(-1.0);
        let distance = ui.selected.map(|b| self.state.local_position(b).length()).unwrap_or(0.0);
        ctx.emit_event(GameEvent::new(EVENT_SELECTION, selected, distance, 0.0));
        ctx.emit_event(GameEvent::new(EVENT_HOVER, ui.hovered.map(nav_index).unwrap_or(-1.0), 0.0, 0.0));

        let profile = ctx.quality.profile();
        let avg = ctx.monitor.average_fps().unwrap_or(-1.0);
        let pinned = if ctx.quality.is_pinned() { 1.0 } else { 0.0 };
        ctx.emit_event(GameEvent::new(EVENT_QUALITY, profile.tier.code() as f32, pinned, avg));
        ctx.emit_event(GameEvent::new(
            EVENT_QUALITY_SETTINGS,
            profile.max_particles as f32,
            profile.enable_lod as u32 as f32,
            profile.enable_bloom as u32 as f32,
        ));
        ctx.emit_event(GameEvent::new(
            EVENT_PANELS,
            ui.panel_bits() as f32,
            ui.sound_enabled as u32 as f32,
            0.0,
        ));
        let tunnel = self.emitters.wormhole().map(|w| w.len()).unwrap_or(0);
        ctx.emit_event(GameEvent::new(
            EVENT_EFFECTS,
            ui.effects.bits() as f32,
            self.emitters.built() as f32,
            tunnel as f32,
        ));
    }
}

/// Queue a sound cue with its tone parameters. The parameters are only
/// sent when the host can play them.
fn play(ctx: &mut EngineContext, sound: SoundEvent, params: GameEvent) {
    ctx.emit_sound(sound);
    if ctx.audio_available() {
        ctx.emit_event(params);
    }
}

fn game_config() -> GameConfig {
    GameConfig {
        max_meshes: 128,
        max_points: 8192,
        max_point_batches: 16,
        max_events: 64,
        initial_tier: QualityTier::Medium,
        ..GameConfig::default()
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SolarSystem {
    fn config(&self) -> GameConfig {
        game_config()
    }

    fn init(&mut self, ctx: &mut EngineContext, clock: &FrameClock) {
        ctx.camera.auto_rotate = self.state.ui.effects.warp;
        self.state.now = clock.wall_time();
        self.state.recompute_orbits(self.state.now);
        self.spawn_scene(ctx);
        let profile = ctx.quality.profile();
        self.refresh_backdrop(ctx, &profile);
        self.animate_planets(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, clock: &FrameClock) {
        // ── Input and UI transitions ─────────────────────────────────
        self.handle_input(ctx, input);

        let profile = ctx.quality.profile();
        let elapsed = clock.elapsed();
        let delta = clock.delta();
        let effects = self.state.ui.effects;

        // ── Gated orbital recompute ─────────────────────────────────
        self.state.now = clock.wall_time();
        if self.orbit_gate.fires_on(clock) {
            self.state.recompute_orbits(self.state.now);
        }

        // ── Comet and emitters ───────────────────────────────────────
        let comet_visible = effects.comets && profile.ambient_effects && self.state.comet.is_some();
        self.update_comet(comet_visible, elapsed);

        let particles = effects.particles;
        let switches = EmitterSwitches::resolve(
            &profile,
            effects.nebula && particles,
            effects.solar_wind && particles,
            effects.warp && particles,
        );
        let particle_tick = self.particle_gate.fires_on(clock);
        self.emitters.update(switches, &profile, particle_tick, delta, elapsed, &mut ctx.rng);

        // ── Scene write-back ─────────────────────────────────────────
        self.state.system_yaw = spin(self.state.system_yaw, delta * SYSTEM_SPIN);
        self.animate_sun(ctx, &profile, elapsed);
        self.animate_planets(ctx);
        self.animate_comet(ctx, comet_visible);
        self.animate_wormhole(ctx, effects.warp, elapsed);

        // ── Points and host events ───────────────────────────────────
        self.refresh_backdrop(ctx, &profile);
        self.write_points(ctx, comet_visible);
        self.emit_state(ctx);
    }

    fn load_config(&mut self, json: &str, ctx: &mut EngineContext) -> bool {
        let scene = match config::parse_scene(json) {
            Ok(scene) => scene,
            Err(e) => {
                log::warn!("Scene config rejected, keeping current scene: {}", e);
                return false;
            }
        };

        let ui = UiState {
            selected: None,
            hovered: None,
            ..self.state.ui.clone()
        };
        let (now, yaw) = (self.state.now, self.state.system_yaw);
        self.emitters = Emitters::new().with_wormhole_radius(scene.wormhole_radius);
        self.state = UniverseState::from_scene(scene);
        self.state.ui = ui;
        self.state.now = now;
        self.state.system_yaw = yaw;
        self.state.recompute_orbits(now);
        self.spawn_scene(ctx);
        self.animate_planets(ctx);
        true
    }
}
