//! Create/edit form for a product.
//!
//! The mode is fixed when the view is built: `/products/new` gives
//! [`FormMode::New`], `/products/edit/:id` gives [`FormMode::Editing`]. In
//! edit mode the identifier control is disabled once the product is loaded.
//! The revision date control is always disabled and follows the release date.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use finprod_core::ProductId;
use finprod_products::date::ISO_DATE_FORMAT;
use finprod_products::{Field, FieldError, Product, ProductFormData, parse_iso_date, revision_date_for};

use crate::http::ApiError;
use crate::notification::NotificationStore;
use crate::router::{Navigator, Route};
use crate::scope::ViewScope;
use crate::service::ProductApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    New,
    Editing(ProductId),
}

impl FormMode {
    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::EditProduct(id) => FormMode::Editing(id.clone()),
            _ => FormMode::New,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Editing(_))
    }
}

/// One input of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormControl {
    pub value: String,
    /// Disabled controls are skipped by validation and by [`ProductForm::value`].
    pub disabled: bool,
    pub touched: bool,
    pub dirty: bool,
}

impl FormControl {
    fn clear(&mut self) {
        self.value.clear();
        self.touched = false;
        self.dirty = false;
    }
}

/// Controls of the product form plus the asynchronous "id exists" mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    id: FormControl,
    name: FormControl,
    description: FormControl,
    logo: FormControl,
    date_release: FormControl,
    date_revision: FormControl,
    id_exists: bool,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            id: FormControl::default(),
            name: FormControl::default(),
            description: FormControl::default(),
            logo: FormControl::default(),
            date_release: FormControl::default(),
            date_revision: FormControl {
                disabled: true,
                ..FormControl::default()
            },
            id_exists: false,
        }
    }
}

impl ProductForm {
    pub fn control(&self, field: Field) -> &FormControl {
        match field {
            Field::Id => &self.id,
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::Logo => &self.logo,
            Field::DateRelease => &self.date_release,
            Field::DateRevision => &self.date_revision,
        }
    }

    fn control_mut(&mut self, field: Field) -> &mut FormControl {
        match field {
            Field::Id => &mut self.id,
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
            Field::Logo => &mut self.logo,
            Field::DateRelease => &mut self.date_release,
            Field::DateRevision => &mut self.date_revision,
        }
    }

    pub fn id_exists(&self) -> bool {
        self.id_exists
    }

    /// Rule violations of an enabled control; disabled controls have none.
    pub fn errors(&self, field: Field) -> Vec<FieldError> {
        let control = self.control(field);
        if control.disabled {
            return Vec::new();
        }
        let mut errors = field.check(&control.value);
        if field == Field::Id && self.id_exists {
            errors.push(FieldError::IdExists);
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        Field::ALL.iter().all(|field| self.errors(*field).is_empty())
    }

    /// Invalid and already interacted with.
    pub fn has_error(&self, field: Field) -> bool {
        let control = self.control(field);
        (control.dirty || control.touched) && !self.errors(field).is_empty()
    }

    /// Message of the first failing rule.
    pub fn error_message(&self, field: Field) -> Option<String> {
        self.errors(field).first().map(ToString::to_string)
    }

    /// Values of the enabled controls; disabled controls read as empty.
    pub fn value(&self) -> ProductFormData {
        let read = |control: &FormControl| {
            if control.disabled {
                String::new()
            } else {
                control.value.clone()
            }
        };
        ProductFormData {
            id: read(&self.id),
            name: read(&self.name),
            description: read(&self.description),
            logo: read(&self.logo),
            date_release: read(&self.date_release),
            date_revision: read(&self.date_revision),
        }
    }

    fn patch(&mut self, product: &Product) {
        let data = ProductFormData::from(product);
        self.id.value = data.id;
        self.name.value = data.name;
        self.description.value = data.description;
        self.logo.value = data.logo;
        self.date_release.value = data.date_release;
        self.date_revision.value = data.date_revision;
    }

    /// Recompute the revision date from the release date without touching
    /// the revision control's interaction marks.
    fn derive_revision(&mut self) {
        let Ok(release) = parse_iso_date(&self.date_release.value) else {
            return;
        };
        if let Some(revision) = revision_date_for(release) {
            self.date_revision.value = revision.format(ISO_DATE_FORMAT).to_string();
        }
    }

    fn mark_all_touched(&mut self) {
        for field in Field::ALL {
            self.control_mut(field).touched = true;
        }
    }

    /// Read the payload with every disabled control temporarily enabled
    /// (the revision date always, the identifier when it is locked), then
    /// restore the disabled state.
    fn read_payload(&mut self) -> ProductFormData {
        let id_was_disabled = self.id.disabled;
        self.date_revision.disabled = false;
        if id_was_disabled {
            self.id.disabled = false;
        }

        let payload = self.value();

        self.date_revision.disabled = true;
        if id_was_disabled {
            self.id.disabled = true;
        }
        payload
    }

    fn reset(&mut self) {
        for field in Field::ALL {
            self.control_mut(field).clear();
        }
        self.id_exists = false;
    }
}

/// Everything the form screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFormState {
    pub mode: FormMode,
    pub form: ProductForm,
    pub is_submitting: bool,
}

/// Result of [`ProductFormView::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A rule failed; nothing was sent.
    Invalid,
    /// A previous submission is still running.
    Busy,
    Saved(Product),
    Failed(ApiError),
    /// The view went away before the backend answered.
    TornDown,
}

/// The create/edit screen.
#[derive(Clone)]
pub struct ProductFormView {
    api: Arc<dyn ProductApi>,
    notifications: NotificationStore,
    navigator: Navigator,
    scope: ViewScope,
    state: Arc<Mutex<ProductFormState>>,
}

impl core::fmt::Debug for ProductFormView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductFormView")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl ProductFormView {
    pub fn new(
        api: Arc<dyn ProductApi>,
        notifications: NotificationStore,
        navigator: Navigator,
        mode: FormMode,
    ) -> Self {
        Self {
            api,
            notifications,
            navigator,
            scope: ViewScope::new(),
            state: Arc::new(Mutex::new(ProductFormState {
                mode,
                form: ProductForm::default(),
                is_submitting: false,
            })),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.state().mode.clone()
    }

    /// Called once when the screen is shown; loads the product in edit mode.
    pub async fn activate(&self) {
        let mode = self.mode();
        tracing::info!(?mode, "product form activated");
        if let FormMode::Editing(id) = mode {
            self.load_product(&id).await;
        }
    }

    async fn load_product(&self, id: &ProductId) {
        let Some(result) = self.scope.guard(self.api.get_by_id(id)).await else {
            return;
        };

        match result {
            Ok(product) => {
                let mut state = self.state();
                state.form.patch(&product);
                state.form.id.disabled = true;
            }
            Err(e) => {
                self.notifications
                    .error(format!("Error loading product: {}", e.message()));
                self.navigator.navigate_to(Route::ProductList);
            }
        }
    }

    /// Type into a control. Ignored (returns `false`) for disabled controls.
    pub fn set_value(&self, field: Field, value: impl Into<String>) -> bool {
        let mut state = self.state();
        let form = &mut state.form;
        let control = form.control_mut(field);
        if control.disabled {
            return false;
        }
        control.value = value.into();
        control.dirty = true;

        match field {
            Field::Id => form.id_exists = false,
            Field::DateRelease => form.derive_revision(),
            _ => {}
        }
        true
    }

    /// Mark a control as visited (blur).
    pub fn touch(&self, field: Field) {
        self.state().form.control_mut(field).touched = true;
    }

    /// Ask the backend whether the typed identifier is taken.
    ///
    /// Skipped in edit mode and while the identifier breaks its length
    /// rule. A failing check is logged and otherwise ignored.
    pub async fn validate_id(&self) {
        let raw = {
            let state = self.state();
            if state.mode.is_editing() {
                return;
            }
            state.form.id.value.clone()
        };

        let length = raw.trim().chars().count();
        if !(3..=10).contains(&length) {
            return;
        }
        let Ok(id) = raw.parse::<ProductId>() else {
            return;
        };

        let Some(result) = self.scope.guard(self.api.verify_id_exists(&id)).await else {
            return;
        };

        match result {
            Ok(true) => {
                let mut state = self.state();
                // The user may have kept typing while the check ran.
                if state.form.id.value == raw {
                    state.form.id_exists = true;
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(product_id = %id, error = %e, "id verification failed"),
        }
    }

    /// Validate, then create or update depending on the mode.
    pub async fn submit(&self) -> SubmitOutcome {
        let (mode, payload) = {
            let mut state = self.state();
            if state.is_submitting {
                return SubmitOutcome::Busy;
            }
            if !state.form.is_valid() {
                state.form.mark_all_touched();
                drop(state);
                self.notifications
                    .error("Please complete all fields correctly");
                return SubmitOutcome::Invalid;
            }
            state.is_submitting = true;
            (state.mode.clone(), state.form.read_payload())
        };

        let request = async {
            match &mode {
                FormMode::Editing(id) => self.api.update(id, &payload).await,
                FormMode::New => self.api.create(&payload).await,
            }
        };
        let Some(result) = self.scope.guard(request).await else {
            return SubmitOutcome::TornDown;
        };

        self.state().is_submitting = false;
        match result {
            Ok(product) => {
                let message = if mode.is_editing() {
                    "Product updated successfully"
                } else {
                    "Product created successfully"
                };
                self.notifications.success(message);
                self.navigator.navigate_to(Route::ProductList);
                SubmitOutcome::Saved(product)
            }
            Err(e) => {
                let action = if mode.is_editing() { "updating" } else { "creating" };
                self.notifications
                    .error(format!("Error {action} product: {}", e.message()));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Clear values and interaction marks; the mode and disabled controls stay.
    pub fn reset(&self) {
        self.state().form.reset();
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.state().form.has_error(field)
    }

    pub fn error_message(&self, field: Field) -> Option<String> {
        self.state().form.error_message(field)
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }

    pub fn snapshot(&self) -> ProductFormState {
        self.state().clone()
    }

    fn state(&self) -> MutexGuard<'_, ProductFormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
