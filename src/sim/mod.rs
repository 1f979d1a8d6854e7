//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Time is the game clock, never the host's
//! - No rendering or platform dependencies

pub mod actor;
pub mod fog;
pub mod hazards;
pub mod levels;
pub mod powerups;
pub mod score;
pub mod sleigh;
pub mod spawn;
pub mod state;
pub mod targets;
pub mod tick;

pub use actor::{Character, Drive, Facing};
pub use fog::{Fog, Hole};
pub use hazards::IceCloud;
pub use levels::{FogDensity, LevelConfig};
pub use powerups::{ActiveEffects, PowerUp, PowerUpKind};
pub use score::{Bonus, LevelResult, LevelStats};
pub use sleigh::Sleigh;
pub use spawn::{Placement, Region};
pub use state::{Outcome, World};
pub use targets::{Chimney, ChimneyState, Chimneys, Delivery};
pub use tick::{TickInput, TickReport, start_level, tick};
