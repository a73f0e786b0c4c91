//! Particle effect building blocks: seeded RNG, fixed-capacity particle pools
//! and recency trails. Game code owns the emitters built from these.

mod rng;
mod particle;
mod trail;

pub use rng::Rng;
pub use particle::ParticlePool;
pub use trail::TrailRing;
