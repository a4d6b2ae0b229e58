use rand::seq::SliceRandom;
use rand::Rng;

use crate::sinks::Position;

pub const PARTICLES_PER_BURST: usize = 20;

const SYMBOLS: [char; 5] = ['*', '+', '·', '•', '✦'];

/// Particle thrown off by a successful hit
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Particle {
    fn new<R: Rng + ?Sized>(at: Position, rng: &mut R) -> Self {
        Self {
            x: at.x,
            y: at.y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-3.0..3.0),
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: rng.gen_range(0.3..0.7),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        // Drag keeps the burst close to the panel it came from.
        self.vel_x *= 0.9;
        self.vel_y *= 0.9;

        self.age += dt;
        self.age < self.max_age
    }
}

/// All live particles on screen. Bursts overlap freely.
#[derive(Debug, Default)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub bounds: (f64, f64),
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_burst(&mut self, at: Position) {
        let mut rng = rand::thread_rng();
        self.particles
            .extend((0..PARTICLES_PER_BURST).map(|_| Particle::new(at, &mut rng)));
    }

    pub fn set_bounds(&mut self, width: u16, height: u16) {
        self.bounds = (width as f64, height as f64);
    }

    /// Steps every particle by `dt` seconds and drops dead or off-screen ones.
    pub fn update(&mut self, dt: f64) {
        let (width, height) = self.bounds;
        self.particles.retain_mut(|particle| {
            let alive = particle.update(dt);
            let on_screen = width == 0.0
                || (particle.x >= 0.0
                    && particle.y >= 0.0
                    && particle.x < width
                    && particle.y < height);
            alive && on_screen
        });
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
