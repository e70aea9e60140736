//! The form model: field values, validation state, sections and submission.

use crate::enums::Method;
use crate::error::{FormError, SchemaError, SubmitError};
use crate::options::FormOptions;
use crate::sections::{Section, SectionTracker};
use crate::store::ErrorStore;
use crate::transport::{
    CONTENT_TYPE_HEADER, FormDataBuilder, HttpClient, MULTIPART_CONTENT_TYPE, Payload,
    PayloadBuilder, Request, parse_errors,
};
use crate::types::*;
use crate::validator::Validator;
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde_json::Value;
use std::fmt;

type Hook = Box<dyn FnMut() + Send>;

#[derive(Default)]
struct Hooks {
    before_submit: Option<Hook>,
    after_submit: Option<Hook>,
    after_success: Option<Hook>,
    after_fail: Option<Hook>,
}

fn run(hook: &mut Option<Hook>) {
    if let Some(hook) = hook.as_mut() {
        hook();
    }
}

/// A set of named fields with rules, optional sections and a submission
/// lifecycle.
///
/// Field definitions (rules, messages, section) are fixed at construction;
/// values change through [`Form::set`] and [`Form::add_file`].
pub struct Form {
    definitions: IndexMap<String, FieldDefinition>,
    values: FieldMap,
    options: FormOptions,
    validator: Validator,
    sections: SectionTracker,
    errors: ErrorStore,
    files: IndexMap<String, FileUpload>,
    payload_builder: Box<dyn PayloadBuilder>,
    hooks: Hooks,
    is_valid: bool,
    submitting: bool,
    submittable: bool,
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("values", &self.values)
            .field("options", &self.options)
            .field("sections", &self.sections)
            .field("errors", &self.errors)
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .field("is_valid", &self.is_valid)
            .field("submitting", &self.submitting)
            .field("submittable", &self.submittable)
            .finish_non_exhaustive()
    }
}

impl Form {
    pub fn new(fields: IndexMap<String, FieldDefinition>) -> Self {
        Self::with_options(fields, FormOptions::default())
    }

    pub fn with_options(fields: IndexMap<String, FieldDefinition>, options: FormOptions) -> Self {
        let mut sections = SectionTracker::new(options.final_section_for_review);
        let mut values = FieldMap::new();
        for (name, definition) in &fields {
            values.insert(name.clone(), definition.value.clone());
            if let Some(section) = &definition.section {
                sections.assign_field(section, name);
            }
        }
        debug!(
            "form created with {} field(s) and {} section(s)",
            fields.len(),
            sections.len()
        );

        Form {
            definitions: fields,
            values,
            options,
            validator: Validator::new(),
            sections,
            errors: ErrorStore::new(),
            files: IndexMap::new(),
            payload_builder: Box::new(FormDataBuilder),
            hooks: Hooks::default(),
            is_valid: false,
            submitting: false,
            submittable: true,
        }
    }

    pub fn from_schema(schema: FormSchema) -> Self {
        Self::with_options(schema.fields, schema.options)
    }

    /// Build a form from a YAML or JSON schema document.
    pub fn from_yaml(input: &str) -> Result<Self, SchemaError> {
        crate::parse::parse_schema(input).map(Self::from_schema)
    }

    /// Replace the multipart encoder used when files are attached.
    pub fn with_payload_builder(mut self, builder: impl PayloadBuilder + 'static) -> Self {
        self.payload_builder = Box::new(builder);
        self
    }

    // ─── Values ─────────────────────────────────────────────────────────────

    /// Current values of every field, in definition order.
    pub fn data(&self) -> &FieldMap {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let slot = self
            .values
            .get_mut(field)
            .ok_or_else(|| FormError::UnknownField {
                name: field.to_string(),
            })?;
        *slot = value.into();
        Ok(())
    }

    /// Field names in definition order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn definition(&self, field: &str) -> Option<&FieldDefinition> {
        self.definitions.get(field)
    }

    /// The value the field was defined with.
    pub fn original(&self, field: &str) -> Option<&Value> {
        self.definitions.get(field).map(|d| &d.value)
    }

    /// Set every field to null and drop attached files and recorded errors.
    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            *value = Value::Null;
        }
        self.files.clear();
        self.errors.clear();
    }

    /// Attach a file to a field. The field value becomes the file's
    /// `{name, type, size}` descriptor.
    pub fn add_file(&mut self, field: &str, file: FileUpload) -> Result<(), FormError> {
        self.set(field, file.descriptor())?;
        self.files.insert(field.to_string(), file);
        Ok(())
    }

    pub fn files(&self) -> &IndexMap<String, FileUpload> {
        &self.files
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    // ─── Validation ─────────────────────────────────────────────────────────

    /// Register a named rule usable in this form's rule strings.
    pub fn extend(&mut self, name: impl Into<String>, rule: CustomRule) -> &mut Self {
        self.validator.extend(name, rule);
        self
    }

    /// Validate every field with rules and record the results.
    ///
    /// With strict sections, a form whose fields are not exactly covered by
    /// its sections is invalid without evaluating any rule.
    pub fn validate(&mut self) -> FormValidation {
        if self.options.strict_sections
            && !self.sections.is_empty()
            && !self.sections.covers(self.definitions.keys().map(String::as_str))
        {
            debug!("strict sections: field set does not match section assignments");
            self.errors.clear();
            self.is_valid = false;
            return FormValidation::default();
        }

        let report = self.validator.validate_fields(
            &self.definitions,
            self.definitions.keys().map(String::as_str),
            &self.values,
        );
        self.errors.record(report.errors);
        self.is_valid = report.validation.valid;
        report.validation
    }

    /// Validate one field, replacing only its entry in the error store.
    pub fn validate_field(&mut self, field: &str) -> Result<FieldValidation, FormError> {
        let definition = self
            .definitions
            .get(field)
            .ok_or_else(|| FormError::UnknownField {
                name: field.to_string(),
            })?;
        let result = self.validator.validate_field(
            field,
            &definition.rules,
            &self.values,
            &definition.messages,
        );

        let mut errors = ErrorMap::new();
        if !result.valid {
            errors.insert(field.to_string(), result.messages());
        }
        self.errors.replace_fields(&[field.to_string()], errors);
        Ok(result)
    }

    /// Validate the fields of one section.
    ///
    /// Sets the section's validity and replaces its fields' entries in the
    /// error store. The form-level validity is left as it was.
    pub fn validate_section(&mut self, name: &str) -> Result<FormValidation, FormError> {
        let fields = self.sections.section_fields(name)?.to_vec();
        let report = self.validator.validate_fields(
            &self.definitions,
            fields.iter().map(String::as_str),
            &self.values,
        );
        self.sections.set_valid(name, report.validation.valid);
        self.errors.replace_fields(&fields, report.errors);
        debug!("section '{}' valid: {}", name, report.validation.valid);
        Ok(report.validation)
    }

    /// Result of the last full validation.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &ErrorStore {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorStore {
        &mut self.errors
    }

    // ─── Sections ───────────────────────────────────────────────────────────

    pub fn define_section(&mut self, name: impl Into<String>, fields: Vec<String>) -> &mut Self {
        self.sections.define_section(name, fields);
        self
    }

    pub fn sections(&self) -> Vec<&Section> {
        self.sections.sections()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.section(name)
    }

    pub fn section_fields(&self, name: &str) -> Result<&[String], FormError> {
        self.sections.section_fields(name)
    }

    pub fn is_section_valid(&self, name: &str) -> bool {
        self.sections.is_section_valid(name)
    }

    pub fn order_sections<I, S>(&mut self, names: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections.order_sections(names)
    }

    pub fn set_current_section(&mut self, name: &str) -> Result<(), FormError> {
        self.sections.set_current_section(name)
    }

    pub fn next_section(&mut self) -> Result<(), FormError> {
        self.sections.next_section()
    }

    pub fn previous_section(&mut self) -> Result<(), FormError> {
        self.sections.previous_section()
    }

    pub fn update_progress(&mut self) -> Result<u32, FormError> {
        self.sections.update_progress()
    }

    pub fn current_section(&self) -> Option<&str> {
        self.sections.current_section()
    }

    pub fn progress(&self) -> u32 {
        self.sections.progress()
    }

    // ─── Submission ─────────────────────────────────────────────────────────

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_submittable(&self) -> bool {
        self.submittable
    }

    pub fn set_submittable(&mut self, submittable: bool) -> &mut Self {
        self.submittable = submittable;
        self
    }

    pub fn before_submit(&mut self, hook: impl FnMut() + Send + 'static) -> &mut Self {
        self.hooks.before_submit = Some(Box::new(hook));
        self
    }

    /// Runs once the request has completed, successful or not.
    pub fn after_submit(&mut self, hook: impl FnMut() + Send + 'static) -> &mut Self {
        self.hooks.after_submit = Some(Box::new(hook));
        self
    }

    pub fn after_success(&mut self, hook: impl FnMut() + Send + 'static) -> &mut Self {
        self.hooks.after_success = Some(Box::new(hook));
        self
    }

    pub fn after_fail(&mut self, hook: impl FnMut() + Send + 'static) -> &mut Self {
        self.hooks.after_fail = Some(Box::new(hook));
        self
    }

    /// The request [`Form::submit`] would send.
    pub fn build_request(&self, method: Method, url: &str) -> Request {
        let mut headers = self.options.headers.clone();
        let payload = if self.has_files() {
            headers.insert(
                CONTENT_TYPE_HEADER.to_string(),
                MULTIPART_CONTENT_TYPE.to_string(),
            );
            Payload::Multipart(self.payload_builder.build(&self.values, &self.files))
        } else {
            Payload::Json(Value::Object(self.values.clone()))
        };

        Request {
            method,
            url: url.to_string(),
            payload,
            headers,
            config: self.options.request_config.clone(),
        }
    }

    /// Validate (unless disabled) and send the form.
    ///
    /// On success the error store is cleared and the response body returned.
    /// A failure response records the server's errors; a transport failure
    /// records an empty error set.
    pub async fn submit(
        &mut self,
        client: &dyn HttpClient,
        method: Method,
        url: &str,
    ) -> Result<Value, SubmitError> {
        if !self.submittable {
            debug!("form is not submittable; {} {} skipped", method, url);
            return Err(SubmitError::NotSubmittable);
        }
        if self.options.validate_on_submit && !self.validate().valid {
            info!(
                "{} {} not sent: {} field(s) failed validation",
                method,
                url,
                self.errors.size()
            );
            return Err(SubmitError::Invalid);
        }

        self.submitting = true;
        run(&mut self.hooks.before_submit);
        let request = self.build_request(method, url);
        debug!("submitting {} {}", method, url);
        let outcome = client.request(request).await;
        self.submitting = false;
        run(&mut self.hooks.after_submit);

        match outcome {
            Ok(response) if response.is_success(&self.options.success_status) => {
                info!("{} {} succeeded with status {}", method, url, response.status);
                self.errors.clear();
                run(&mut self.hooks.after_success);
                Ok(response.data)
            }
            Ok(response) => {
                let errors = parse_errors(&response);
                info!(
                    "{} {} rejected with status {} ({} field error(s))",
                    method,
                    url,
                    response.status,
                    errors.len()
                );
                self.errors.record(errors.clone());
                run(&mut self.hooks.after_fail);
                Err(SubmitError::Rejected {
                    status: response.status,
                    errors,
                })
            }
            Err(err) => {
                warn!("{} {} failed: {}", method, url, err);
                self.errors.record(ErrorMap::new());
                run(&mut self.hooks.after_fail);
                Err(SubmitError::Transport(err))
            }
        }
    }

    pub async fn get(&mut self, client: &dyn HttpClient, url: &str) -> Result<Value, SubmitError> {
        self.submit(client, Method::Get, url).await
    }

    pub async fn post(&mut self, client: &dyn HttpClient, url: &str) -> Result<Value, SubmitError> {
        self.submit(client, Method::Post, url).await
    }

    pub async fn put(&mut self, client: &dyn HttpClient, url: &str) -> Result<Value, SubmitError> {
        self.submit(client, Method::Put, url).await
    }

    pub async fn patch(
        &mut self,
        client: &dyn HttpClient,
        url: &str,
    ) -> Result<Value, SubmitError> {
        self.submit(client, Method::Patch, url).await
    }

    pub async fn delete(
        &mut self,
        client: &dyn HttpClient,
        url: &str,
    ) -> Result<Value, SubmitError> {
        self.submit(client, Method::Delete, url).await
    }
}
