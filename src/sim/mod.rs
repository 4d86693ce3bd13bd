// sim/ - Countdown simulation
//
// Entity management using Structure-of-Arrays, one module per entity type.
// Show is the single simulation context: every piece of mutable state lives
// here and is touched only from tick() and the host callbacks.

mod firework;
mod meteor;
mod particle;
mod ripple;
mod shockwave;
mod trail;

pub use firework::Fireworks;
pub use meteor::{HEADING as METEOR_HEADING, Meteors};
pub use particle::{Frame, MARGIN, Mode, Particles, Spawn};
pub use ripple::Ripples;
pub use shockwave::Shockwaves;
pub use trail::Trails;

use glam::{Vec2, Vec3};
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ShowConfig;
use crate::error::Result;
use crate::glyph;
use crate::input::InputSource;
use crate::phase::{Phase, PhaseMachine, Scheduler, TimedTransition};

// Capacity limits
pub const MAX_SPARKS: usize = 4096;
pub const MAX_RIPPLES: usize = 32;
pub const MAX_SHOCKWAVES: usize = 8;
pub const MAX_METEORS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        Vec3::new(self.width * 0.5, self.height * 0.5, 0.0)
    }

    #[inline]
    pub fn diagonal(&self) -> f32 {
        Vec2::new(self.width, self.height).length()
    }
}

/// Uniform in [0, 1).
#[inline(always)]
pub fn unit(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.0f32..1.0)
}

/// Uniform in [lo, hi); returns `lo` when the range is empty.
#[inline(always)]
pub fn between(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * unit(rng)
}

/// Deferred work for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    Advance(TimedTransition),
    Firework,
}

pub struct Show {
    cfg: ShowConfig,
    viewport: Viewport,

    // Entities
    particles: Particles,
    fireworks: Fireworks,
    ripples: Ripples,
    shockwaves: Shockwaves,
    meteors: Meteors,

    // Phase
    machine: PhaseMachine,
    scheduler: Scheduler<Cue>,
    glyph: Option<String>,
    blessing: bool,

    attractor: Option<Vec2>,
    frame: u64,
    rng: SmallRng,
}

impl Show {
    pub fn new(cfg: ShowConfig, viewport: Viewport, seed: u64) -> Result<Self> {
        cfg.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let particles = Particles::new(&cfg, viewport, &mut rng);
        info!(
            "show ready: {} particles, {}x{}",
            particles.len(),
            viewport.width,
            viewport.height
        );

        Ok(Self {
            machine: PhaseMachine::new(&cfg.timing),
            cfg,
            viewport,
            particles,
            fireworks: Fireworks::new(),
            ripples: Ripples::new(),
            shockwaves: Shockwaves::new(),
            meteors: Meteors::new(),
            scheduler: Scheduler::new(),
            glyph: None,
            blessing: false,
            attractor: None,
            frame: 0,
            rng,
        })
    }

    /// One frame. Order: input, trigger, due timers, pool, effects.
    pub fn tick(&mut self, now_ms: f64, input: &mut impl InputSource) {
        let state = input.sample(now_ms);
        self.attractor = state.attractor;

        if state.trigger {
            self.trigger_at(now_ms, state.origin);
        }

        while let Some((at, cue)) = self.scheduler.pop_due(now_ms) {
            self.run(cue, at);
        }

        let frame = Frame {
            cfg: &self.cfg,
            viewport: self.viewport,
            phase: self.machine.phase(),
            attractor: self.attractor,
            sustained: state.sustained,
            frame: self.frame,
        };
        self.particles.update(&frame, &mut self.rng);

        self.fireworks.update();
        self.ripples.update();
        self.shockwaves.update(self.viewport.diagonal());
        self.meteors.update(self.viewport);
        if self.machine.phase() == Phase::Celebrating && unit(&mut self.rng) < self.cfg.effects.meteor_chance {
            self.meteors.spawn(self.viewport, &mut self.rng);
        }

        self.frame += 1;
    }

    /// Feed a user trigger straight to the state machine. Returns the phase
    /// entered, if the trigger was accepted.
    pub fn trigger(&mut self, now_ms: f64) -> Option<Phase> {
        self.trigger_at(now_ms, None)
    }

    /// As `trigger`; the ripple starts at `origin`, else the attractor, else
    /// the viewport center.
    pub fn trigger_at(&mut self, now_ms: f64, origin: Option<Vec2>) -> Option<Phase> {
        let entered = self.machine.trigger(now_ms)?;
        if self.cfg.effects.ripples {
            let at = origin
                .or(self.attractor)
                .unwrap_or_else(|| self.viewport.center().truncate());
            self.ripples.spawn(at);
        }
        self.enter(entered, now_ms);
        Some(entered)
    }

    fn run(&mut self, cue: Cue, at: f64) {
        match cue {
            Cue::Advance(t) => match self.machine.fire(t) {
                Some(entered) => self.enter(entered, at),
                None => debug!("dropped stale timer {} -> {}", t.from.name(), t.to.name()),
            },
            Cue::Firework => {
                let vp = self.viewport;
                let at = Vec2::new(unit(&mut self.rng) * vp.width, unit(&mut self.rng) * vp.height * 0.5);
                self.fireworks
                    .burst(at, self.cfg.effects.firework_sparks, self.cfg.palette.len(), &mut self.rng);
            }
        }
    }

    fn enter(&mut self, phase: Phase, at: f64) {
        info!("phase -> {}", phase.name());

        match phase {
            Phase::Floating => {}
            Phase::MorphingToFirstYear => {
                let digits = self.cfg.glyph.first.clone();
                self.show_glyph(digits);
            }
            Phase::Exploding => {
                self.glyph = None;
                let pivot = self.viewport.center();
                self.particles.explode(pivot, &self.cfg, &mut self.rng);
                if self.cfg.effects.shockwaves {
                    self.shockwaves.spawn(pivot.truncate());
                }
            }
            Phase::Gathering => self.particles.begin_gather(&self.cfg, &mut self.rng),
            Phase::MorphingToSecondYear => {
                let digits = self.cfg.glyph.second.clone();
                self.show_glyph(digits);
            }
            Phase::Celebrating => {
                let stagger = self.cfg.timing.firework_stagger_ms;
                for i in 0..self.cfg.effects.firework_count {
                    self.scheduler.schedule(at + i as f64 * stagger, Cue::Firework);
                }
                self.blessing = true;
            }
        }

        if let Some(t) = self.machine.timed_from(phase) {
            debug!("scheduled {} -> {} at {}", t.from.name(), t.to.name(), at + t.delay_ms);
            self.scheduler.schedule(at + t.delay_ms, Cue::Advance(t));
        }
    }

    fn show_glyph(&mut self, digits: String) {
        let depth = self.cfg.is_volume().then_some(self.cfg.depth);
        let points = glyph::generate_points(&digits, self.viewport, &self.cfg.glyph, depth, &mut self.rng);
        self.particles.assign_targets(&points);
        self.glyph = Some(digits);
    }

    /// New viewport size. A glyph on screen is laid out again for it; sparks
    /// placed for the old size are dropped.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        debug!("resize {}x{}", width, height);
        self.fireworks.clear();
        if let Some(digits) = self.glyph.take() {
            self.show_glyph(digits);
        }
    }

    /// Cancel pending timers; the show stops advancing on its own.
    pub fn teardown(&mut self) {
        debug!("teardown, cancelling {} timers", self.scheduler.len());
        self.scheduler.cancel_all();
    }

    // Accessors
    pub fn phase(&self) -> Phase { self.machine.phase() }
    pub fn config(&self) -> &ShowConfig { &self.cfg }
    pub fn viewport(&self) -> Viewport { self.viewport }
    pub fn particles(&self) -> &Particles { &self.particles }
    pub fn fireworks(&self) -> &Fireworks { &self.fireworks }
    pub fn ripples(&self) -> &Ripples { &self.ripples }
    pub fn shockwaves(&self) -> &Shockwaves { &self.shockwaves }
    pub fn meteors(&self) -> &Meteors { &self.meteors }
    pub fn glyph(&self) -> Option<&str> { self.glyph.as_deref() }
    pub fn blessing_visible(&self) -> bool { self.blessing }
    pub fn attractor(&self) -> Option<Vec2> { self.attractor }
    pub fn pending_timers(&self) -> usize { self.scheduler.len() }
    pub fn next_timer(&self) -> Option<f64> { self.scheduler.next_due() }
}
