//! Filter form controller
//!
//! Holds the reference lists and the editable filter values, decides when
//! submission is allowed, and turns failures into toasts.
//!
//! ```text
//! LoadingReferences ──load──▶ Ready ──begin_submit──▶ Submitting
//!                               ▲                          │
//!                               └────── finish_submit ─────┘
//!                                 (error → toast, then Ready)
//! ```

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::ProposicaoApi;
use crate::error::{Error, Result, MSG_REFERENCES_FAILED};
use crate::models::{has_four_digit_year, ExportQuery, ReferenceItem, ReferenceKind};

use super::export::ExportClient;

pub const DEFAULT_MUNICIPALITY_ID: i64 = 9;
pub const DEFAULT_CATEGORY: &str = "0";

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    LoadingReferences,
    Ready,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Municipality,
    Category,
    StartDate,
    EndDate,
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormField::Municipality => "municipality",
            FormField::Category => "category",
            FormField::StartDate => "start_date",
            FormField::EndDate => "end_date",
        };
        write!(f, "{}", name)
    }
}

/// A failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Transient user-facing notification; every toast the form raises is an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Current field values; `None` means the field is empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub municipality_id: Option<i64>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for FormValues {
    fn default() -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            municipality_id: Some(DEFAULT_MUNICIPALITY_ID),
            category: Some(DEFAULT_CATEGORY.to_string()),
            start_date: Some(today),
            end_date: Some(today),
        }
    }
}

impl FormValues {
    /// Run every rule and collect the failures
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        match self.municipality_id {
            None => errors.push(FieldError::new(FormField::Municipality, "required")),
            Some(id) if id <= 0 => errors.push(FieldError::new(
                FormField::Municipality,
                format!("must be a positive id, got {}", id),
            )),
            Some(_) => {}
        }

        match self.category.as_deref().map(str::trim) {
            None | Some("") => errors.push(FieldError::new(FormField::Category, "required")),
            Some(_) => {}
        }

        for (field, value) in [
            (FormField::StartDate, self.start_date),
            (FormField::EndDate, self.end_date),
        ] {
            match value {
                None => errors.push(FieldError::new(field, "required")),
                Some(d) if !has_four_digit_year(d) => {
                    errors.push(FieldError::new(field, "year must have four digits"))
                }
                Some(_) => {}
            }
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                errors.push(FieldError::new(
                    FormField::EndDate,
                    format!("must not be before start date ({} > {})", start, end),
                ));
            }
        }

        errors
    }

    /// Build the query, if every rule passes
    pub fn to_query(&self) -> Result<ExportQuery> {
        let errors = self.validate();
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::validation(joined));
        }

        match (
            self.municipality_id,
            self.category.as_deref(),
            self.start_date,
            self.end_date,
        ) {
            (Some(id), Some(category), Some(start), Some(end)) => {
                ExportQuery::new(id, category.trim(), start, end)
            }
            _ => Err(Error::validation("missing required field")),
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

pub struct FilterForm {
    state: FormState,
    municipalities: Vec<ReferenceItem>,
    species: Vec<ReferenceItem>,
    values: FormValues,
    toasts: Vec<Toast>,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterForm {
    /// A form with default values, waiting for its reference lists
    pub fn new() -> Self {
        Self::with_values(FormValues::default())
    }

    pub fn with_values(values: FormValues) -> Self {
        Self {
            state: FormState::LoadingReferences,
            municipalities: Vec::new(),
            species: Vec::new(),
            values,
            toasts: Vec::new(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn municipalities(&self) -> &[ReferenceItem] {
        &self.municipalities
    }

    pub fn species(&self) -> &[ReferenceItem] {
        &self.species
    }

    /// Fetch both reference lists concurrently
    ///
    /// All or nothing: if either request fails both lists are left empty and
    /// an error toast is queued. The form is `Ready` afterwards either way.
    pub async fn load_references(&mut self, api: &dyn ProposicaoApi) {
        self.state = FormState::LoadingReferences;

        let result = tokio::try_join!(
            api.fetch_reference_list(ReferenceKind::Municipality),
            api.fetch_reference_list(ReferenceKind::Species),
        );

        match result {
            Ok((municipalities, species)) => {
                log::debug!(
                    "[form] Loaded {} municipalities, {} species",
                    municipalities.len(),
                    species.len()
                );
                self.municipalities = municipalities;
                self.species = species;
            }
            Err(e) => {
                log::warn!("[form] Reference lists unavailable: {}", e);
                self.municipalities = Vec::new();
                self.species = Vec::new();
                self.toasts.push(Toast::new(MSG_REFERENCES_FAILED));
            }
        }

        self.state = FormState::Ready;
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.state != FormState::Ready {
            return Err(Error::invalid_state(format!(
                "form is not editable while {:?}",
                self.state
            )));
        }
        Ok(())
    }

    pub fn set_municipality(&mut self, id: Option<i64>) -> Result<()> {
        self.ensure_editable()?;
        self.values.municipality_id = id;
        Ok(())
    }

    pub fn set_category(&mut self, category: Option<String>) -> Result<()> {
        self.ensure_editable()?;
        self.values.category = category;
        Ok(())
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.ensure_editable()?;
        self.values.start_date = date;
        Ok(())
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.ensure_editable()?;
        self.values.end_date = date;
        Ok(())
    }

    pub fn field_errors(&self) -> Vec<FieldError> {
        self.values.validate()
    }

    pub fn is_valid(&self) -> bool {
        self.field_errors().is_empty()
    }

    /// Whether the submit control is enabled
    pub fn submit_enabled(&self) -> bool {
        self.state == FormState::Ready && self.is_valid()
    }

    /// Freeze the current values into a query and enter `Submitting`
    pub fn begin_submit(&mut self) -> Result<ExportQuery> {
        if self.state != FormState::Ready {
            return Err(Error::invalid_state(format!(
                "cannot submit while {:?}",
                self.state
            )));
        }
        let query = self.values.to_query()?;
        self.state = FormState::Submitting;
        Ok(query)
    }

    /// Leave `Submitting`, queueing a toast if the export failed
    pub fn finish_submit<T>(&mut self, outcome: &Result<T>) {
        if let Err(e) = outcome {
            self.toasts.push(Toast::new(e.to_string()));
        }
        self.state = FormState::Ready;
    }

    /// Submit the form through `exporter`
    ///
    /// Export failures become a toast and are also returned; there is no
    /// automatic retry.
    pub async fn submit(&mut self, exporter: &ExportClient) -> Result<Vec<u8>> {
        let query = self.begin_submit()?;
        log::info!(
            "[form] Exporting municipality={} category={} {}..{}",
            query.municipality_id(),
            query.category(),
            query.start_date(),
            query.end_date()
        );

        let outcome = exporter.export(&query).await;
        self.finish_submit(&outcome);
        outcome
    }

    /// Display name of the selected municipality, if it is in the list
    pub fn selected_municipality_name(&self) -> Option<&str> {
        let id = self.values.municipality_id?;
        self.municipalities
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.as_str())
    }

    /// Display name of the selected species; the category holds its id
    pub fn selected_species_name(&self) -> Option<&str> {
        let id: i64 = self.values.category.as_deref()?.trim().parse().ok()?;
        self.species
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }

    /// Take every queued toast, oldest first
    pub fn drain_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}
