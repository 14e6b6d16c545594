//! Questforge engine - the application layer of the character-sheet plugin
//!
//! Orchestrates the domain rules against the host's collaborators: the roll
//! evaluator, the actor store, the inventory collection, and the message
//! transport. The host owns rendering, persistence, and networking; this
//! crate only computes and issues update requests.

pub mod application;
pub mod error;
pub mod infrastructure;

pub use application::dto::{
    AttackReport, AttributeRollReport, ConsumableReport, DamageRouting, TargetReport,
};
pub use application::ports::outbound::{
    ActorPatch, ActorStorePort, HostEvent, InventoryError, InventoryPort, MessageTransportPort,
    RollError, RollEvaluatorPort, RollOutcome, StoreError, TransportError,
};
pub use application::services::{
    CharacterService, CombatService, ConsumableService, EquipmentService,
};
pub use error::EngineError;
