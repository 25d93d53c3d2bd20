//! Domain outcome enums returned by aggregate and entity mutations.

mod character_events;
mod combat_events;
mod inventory_events;
mod resource_events;

pub use character_events::{ConditionChange, LevelChange};
pub use combat_events::{
    DamageOutcome, HealOutcome, LongRestOutcome, ShortRestOutcome, TempHpOutcome,
};
pub use inventory_events::{AttunementOutcome, EquipOutcome};
pub use resource_events::{ResourceOutcome, SlotOutcome};
