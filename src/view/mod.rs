//! View Module
//!
//! Keeps the list, the form and the loading flag in sync with the store.
//!
//! ## State Machine
//! ```text
//!            mount / refresh
//!   Loading ───────────────▶ Loaded ◀─────────────────────────┐
//!      ▲                    │     │                           │
//!      │ submit ok          │     │ request_delete            │ cancel_delete
//!      │                    │     ▼                           │
//!      │     add_new /      │   DeleteConfirm(id) ────────────┘
//!      │     edit_row       │     │
//!      │                    ▼     │ confirm_delete
//!      └────────────── FormOpen   └──────────▶ Loading ──▶ Loaded
//!        (submit error: stays FormOpen, cancel_form: → Loaded)
//! ```
//!
//! Every successful mutation re-fetches columns and records instead of
//! patching the list in place.

mod controller;
mod render;
mod state;

pub use controller::ViewController;
pub use render::{
    EmptyState, FieldView, FormView, RowView, TableView, ViewSnapshot, DELETE_CONFIRM_MESSAGE,
    LOADING_MESSAGE,
};
pub use state::{FormDraft, FormMode, FormState, Phase, PhaseKind};
