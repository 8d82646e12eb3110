//! Headless views and the presentational components they drive.
//!
//! A view is a cloneable handle over shared state. Renderers read a
//! snapshot of that state; user actions are plain method calls.

pub mod components;
pub mod form;
pub mod list;

pub use components::{ConfirmationModal, LoadingIndicator, LoadingSize};
pub use form::{FormControl, FormMode, ProductForm, ProductFormState, ProductFormView, SubmitOutcome};
pub use list::{ProductListState, ProductListView};
