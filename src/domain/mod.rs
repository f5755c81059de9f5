// Domain layer: list models and the ports they read and write through.

pub mod checklist;
pub mod checklist_item;
pub mod entry_list;
pub mod flags;
pub mod ports;
pub mod undo;
