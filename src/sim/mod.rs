//! Simulation core
//!
//! All gameplay logic lives here. Advancing state is driven purely by the
//! time samples passed in:
//! - No wall clock reads, no sleeping
//! - Events are delivered synchronously to registered listeners
//! - No rendering or platform dependencies

pub mod events;
pub mod game;
pub mod paddle;
pub mod puck;
pub mod side;
pub mod track;

pub use events::{EventBus, SubscriptionId};
pub use game::{Game, GameEvent, GameSnapshot, Player};
pub use paddle::{Paddle, PaddleEvent, PaddlePhase};
pub use puck::Puck;
pub use side::{Side, Sided};
pub use track::{Track, TrackEvent, TrackSnapshot};
