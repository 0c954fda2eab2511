//! Selection and mapping engine. Synchronous, no I/O beyond the injected
//! [`KeyValueStore`](crate::storage::KeyValueStore).

pub mod cascade;
pub mod expense_search;
pub mod mapping;
pub mod memento;
pub mod relation_index;
pub mod sequence;
pub mod session;

pub use cascade::{CascadeController, CascadeEvent, CascadeState, CompleteSelection};
pub use expense_search::{Debouncer, ExpenseCatalog, ExpenseOption, SearchSequencer, SearchTicket};
pub use mapping::{
    CompleteMapping, DropBlankContacts, ExpenseMappingList, ExpenseSubmission, MappingListEditor,
    MappingRow, ReferenceContactList, RequireCompleteMappings, RowValidator,
};
pub use memento::{MementoMode, MementoStore, SelectionMemento};
pub use relation_index::RelationIndex;
pub use sequence::next_order;
pub use session::{SelectionOrigin, SelectionSession};
