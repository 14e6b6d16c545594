//! Application services - the pipelines the sheet UI invokes

mod character_service;
mod combat_service;
mod consumable_service;
mod equipment_service;

pub use character_service::CharacterService;
pub use combat_service::CombatService;
pub use consumable_service::ConsumableService;
pub use equipment_service::EquipmentService;
