//! `flock-agent`: agent storage and kinematics for the flock engine.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`agent`]       | `Agent`: owned per-agent value (register / snapshot)      |
//! | [`store`]       | `AgentStore`: SoA arena + `AgentId → slot` registry       |
//! | [`integrate`]   | `integrate`: velocity/position update with speed clamp    |
//! | [`builder`]     | `AgentStoreBuilder`: seeded population scatter            |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash for the registry map instead of SipHash.            |
//! | `serde`   | Derives `Serialize`/`Deserialize` on all public types.     |

pub mod agent;
pub mod builder;
pub mod integrate;
pub mod store;


pub use agent::Agent;
pub use builder::AgentStoreBuilder;
pub use integrate::integrate;
pub use store::AgentStore;
