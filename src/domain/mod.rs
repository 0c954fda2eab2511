//! Pure data types shared by the engine. No I/O, no storage.

pub mod common;
pub mod mapping;
pub mod relation;

pub use common::{
    AreaId, BranchId, Displayable, ExpenseId, Identifiable, LineId, NamedEntity, NamedOption,
};
pub use mapping::{ExpenseMapping, ExpenseMappingField, ReferenceContact, ReferenceContactField, RowKey};
pub use relation::{AreaEntry, LineEntry, RelationRecord};
