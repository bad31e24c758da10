//! Form Binder
//!
//! Bridges a structured entity and the flat string fields a form edits.
//! List fields go through the text-list codec; everything else passes
//! through as text.

use std::collections::BTreeMap;
use std::str::FromStr;

use log::debug;

use crate::codec;
use crate::error::ValidationErrors;
use crate::mutation::MutationStatus;
use crate::resource::Resource;

// ========================
// Field Table
// ========================

/// Input widget a field is edited with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidget {
    Text,
    Number,
    TextArea,
    /// One list item per line
    List,
    /// Fixed `(value, label)` choices
    Select(&'static [(&'static str, &'static str)]),
}

/// Static description of one editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: FieldWidget,
    /// Message shown when the field is left empty
    pub required: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, widget: FieldWidget) -> Self {
        Self {
            name,
            label,
            widget,
            required: None,
        }
    }

    pub const fn required(self, message: &'static str) -> Self {
        Self {
            required: Some(message),
            ..self
        }
    }
}

fn spec_for<'a>(specs: &'a [FieldSpec], name: &str) -> Option<&'a FieldSpec> {
    specs.iter().find(|spec| spec.name == name)
}

// ========================
// Field Values
// ========================

/// Edit-time representation: every value is the string its input holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    values: BTreeMap<&'static str, String>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.values.insert(name, value.into());
    }

    /// Builder-style `set`
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Store a list field as its text block
    pub fn set_list<S: AsRef<str>>(&mut self, name: &'static str, items: &[S]) {
        self.set(name, codec::encode(items));
    }

    /// Absent fields read as empty
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

/// Reads typed values out of validated fields, collecting failures
pub struct FieldReader<'a> {
    fields: &'a FormFields,
    specs: &'a [FieldSpec],
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a FormFields, specs: &'a [FieldSpec]) -> Self {
        Self {
            fields,
            specs,
            errors: ValidationErrors::new(),
        }
    }

    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).to_string()
    }

    pub fn list(&self, name: &str) -> Vec<String> {
        codec::decode(self.fields.get(name))
    }

    /// Parse a numeric field; failures are recorded and read as the default
    ///
    /// `NaN` and infinities count as failures.
    pub fn number<T: FromStr + Default>(&mut self, name: &'static str) -> T {
        let text = self.fields.get(name).trim();
        match text.parse::<T>() {
            Ok(value) if is_finite_number(text) => value,
            _ => {
                let label = spec_for(self.specs, name).map_or(name, |spec| spec.label);
                self.errors.push(name, format!("{} must be a number.", label));
                T::default()
            }
        }
    }

    /// `value` if every read succeeded
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        self.errors.into_result().map(|()| value)
    }
}

fn is_finite_number(text: &str) -> bool {
    text.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Required and numeric checks for every field in `specs`
///
/// Does not stop at the first failure: every violated field reports.
pub fn validate(fields: &FormFields, specs: &[FieldSpec]) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for spec in specs {
        let value = fields.get(spec.name);
        if value.is_empty() {
            if let Some(message) = spec.required {
                errors.push(spec.name, message);
            }
            continue;
        }
        if spec.widget == FieldWidget::Number && !is_finite_number(value.trim()) {
            errors.push(spec.name, format!("{} must be a number.", spec.label));
        }
    }
    errors
}

// ========================
// Binder
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// Edit form waiting for the entity to arrive
    Unpopulated,
    Populated,
    Submitting,
    /// Cancelled, declined or failed; editable again
    Idle,
    /// Submission succeeded
    Done,
}

/// One form instance for resource `R`
pub struct FormBinder<R: Resource> {
    mode: FormMode,
    state: FormState,
    fields: FormFields,
    previous: Option<R::Entity>,
    errors: ValidationErrors,
}

impl<R: Resource> FormBinder<R> {
    /// Empty form; selects start on their first choice
    pub fn new_create() -> Self {
        let mut fields = FormFields::new();
        for spec in R::FIELDS {
            let initial = match spec.widget {
                FieldWidget::Select(choices) => choices.first().map_or("", |(value, _)| *value),
                _ => "",
            };
            fields.set(spec.name, initial);
        }
        Self {
            mode: FormMode::Create,
            state: FormState::Populated,
            fields,
            previous: None,
            errors: ValidationErrors::new(),
        }
    }

    /// Form for an existing item, filled once `populate` is called
    pub fn new_edit(id: u32) -> Self {
        Self {
            mode: FormMode::Edit(id),
            state: FormState::Unpopulated,
            fields: FormFields::new(),
            previous: None,
            errors: ValidationErrors::new(),
        }
    }

    /// Pre-fill from the fetched entity; only the first call has an effect so
    /// a background refresh never overwrites edits in progress
    pub fn populate(&mut self, entity: &R::Entity) -> bool {
        if self.state != FormState::Unpopulated {
            return false;
        }
        self.fields = R::to_form_fields(entity);
        self.previous = Some(entity.clone());
        self.state = FormState::Populated;
        debug!("form: {} populated", R::KIND);
        true
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.set(name, value);
    }

    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_for(&self, name: &str) -> Option<&str> {
        self.errors.message_for(name)
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn target_id(&self) -> Option<u32> {
        match self.mode {
            FormMode::Edit(id) => Some(id),
            FormMode::Create => None,
        }
    }

    /// Entity the form was populated from
    pub fn previous(&self) -> Option<&R::Entity> {
        self.previous.as_ref()
    }

    /// Validate without converting
    pub fn validate(&mut self) -> Result<(), ValidationErrors> {
        self.errors = validate(&self.fields, R::FIELDS);
        self.errors.clone().into_result()
    }

    /// Validate and convert to the outgoing payload, entering `Submitting`
    ///
    /// Repeated calls while a submission is running still convert; duplicate
    /// sends are stopped by the mutation coordinator.
    pub fn begin_submit(&mut self) -> Result<R::Draft, ValidationErrors> {
        self.validate()?;
        match R::from_form_fields(&self.fields, self.previous.as_ref()) {
            Ok(draft) => {
                self.state = FormState::Submitting;
                Ok(draft)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Back to editing after a declined confirmation or a user cancel
    pub fn cancel(&mut self) {
        if self.state == FormState::Submitting {
            self.state = FormState::Idle;
        }
    }

    /// Apply the coordinator's terminal status
    pub fn finish(&mut self, status: MutationStatus) {
        if self.state != FormState::Submitting {
            return;
        }
        match status {
            MutationStatus::Success => self.state = FormState::Done,
            MutationStatus::Failed => self.state = FormState::Idle,
            MutationStatus::Idle | MutationStatus::Pending => {}
        }
    }
}
