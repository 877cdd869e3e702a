use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::report::{ScenarioReport, Snapshot};
use super::{FieldSetup, Scenario, Step};
use crate::dom::Document;
use crate::field::{ControlValueAccessor, FieldError, FieldValue, TextField};
use crate::options::TextFieldOptions;
use crate::runtime::SchedulerError;
use crate::widgets::{HelperText, HelperTextFoundation, TextFieldIcon};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("step {step}: {source}")]
    Field {
        step: usize,
        #[source]
        source: FieldError,
    },
    #[error("step {step}: {source}")]
    Scheduler {
        step: usize,
        #[source]
        source: SchedulerError,
    },
}

/// Companions the field only references weakly; the runner keeps them alive.
struct Companions {
    _helper_text: Option<Rc<HelperText>>,
    _icons: Vec<Rc<TextFieldIcon>>,
}

fn field_error(step: usize) -> impl FnOnce(FieldError) -> ScenarioError {
    move |source| ScenarioError::Field { step, source }
}

fn scheduler_error(step: usize) -> impl FnOnce(SchedulerError) -> ScenarioError {
    move |source| ScenarioError::Scheduler { step, source }
}

/// Run `scenario` on a fresh document built from `options`. The event loop
/// is flushed after the last step.
pub fn run(scenario: &Scenario, options: &TextFieldOptions) -> Result<ScenarioReport, ScenarioError> {
    let document = options.document();
    let field = TextField::builder(&document)
        .options(options)
        .multiline(scenario.field.multiline)
        .build();
    let _companions = configure(&field, &document, &scenario.field).map_err(field_error(0))?;

    let changes = Rc::new(RefCell::new(Vec::<Value>::new()));
    let blurs = Rc::new(RefCell::new(Vec::<Value>::new()));
    let touched = Rc::new(Cell::new(0usize));
    {
        let changes = Rc::clone(&changes);
        field.register_on_change(Box::new(move |value: &FieldValue| {
            changes.borrow_mut().push(value.to_json());
        }));
        let touched = Rc::clone(&touched);
        field.register_on_touched(Box::new(move || touched.set(touched.get() + 1)));
        let blurs = Rc::clone(&blurs);
        field
            .blur_events()
            .subscribe(move |value: &FieldValue| blurs.borrow_mut().push(value.to_json()));
    }

    if scenario.field.attach {
        field.attach().map_err(field_error(0))?;
    }

    let mut snapshots = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        let number = index + 1;
        debug!(step = number, ?step, "scenario step");
        match step {
            Step::Attach => field.attach().map_err(field_error(number))?,
            Step::Destroy => field.destroy(),
            Step::Focus => {
                field.focus();
            }
            Step::Blur => field.input().blur(),
            Step::Type { text } => {
                field.input().type_text(text);
            }
            Step::Click => field.input().click(),
            Step::WriteValue { value } => field.write_value(value),
            Step::SetValue { value } => field.set_value(FieldValue::from_model(value)),
            Step::SetType { value } => field.set_type_str(value).map_err(field_error(number))?,
            Step::SetOutlined { value } => field.set_outlined(*value),
            Step::SetDisabled { value } => field.set_disabled(*value),
            Step::SetRequired { value } => field.set_required(*value),
            Step::SetValid { value } => field.set_valid(*value),
            Step::SetFullwidth { value } => field.set_fullwidth(*value),
            Step::SetDense { value } => field.set_dense(*value),
            Step::SetUseNativeValidation { value } => field.set_use_native_validation(*value),
            Step::SetLabel { value } => field.set_label(value.clone()),
            Step::Tick => {
                document.event_loop().tick();
            }
            Step::Flush => {
                document
                    .event_loop()
                    .run_until_idle()
                    .map_err(scheduler_error(number))?;
            }
            Step::Snapshot { label } => {
                snapshots.push(Snapshot::capture(&field, number, label.clone()));
            }
        }
    }

    let last = scenario.steps.len();
    document
        .event_loop()
        .run_until_idle()
        .map_err(scheduler_error(last))?;

    let report = ScenarioReport {
        id: field.id(),
        snapshots,
        changes: changes.borrow().clone(),
        blurs: blurs.borrow().clone(),
        touched: touched.get(),
        final_state: Snapshot::capture(&field, last, None),
    };
    Ok(report)
}

fn configure(
    field: &TextField,
    document: &Document,
    setup: &FieldSetup,
) -> Result<Companions, FieldError> {
    if let Some(id) = &setup.id {
        field.set_id(id.clone());
    }
    if let Some(name) = &setup.input_type {
        field.set_type_str(name)?;
    }
    if let Some(label) = &setup.label {
        field.set_label(label.clone());
    }
    if let Some(placeholder) = &setup.placeholder {
        field.set_placeholder(placeholder.clone());
    }
    field.set_pattern(setup.pattern.clone());
    field.set_maxlength(setup.maxlength);
    field.set_minlength(setup.minlength);
    field.set_max(setup.max);
    field.set_min(setup.min);
    field.set_size(setup.size);
    field.set_step(setup.step);
    field.set_required(setup.required);
    field.set_dense(setup.dense);
    if setup.fullwidth {
        field.set_fullwidth(true);
    }
    field.set_outlined(setup.outlined);
    if setup.disabled {
        field.set_disabled(true);
    }
    if let Some(use_native_validation) = setup.use_native_validation {
        field.set_use_native_validation(use_native_validation);
    }
    if let Some(valid) = setup.valid {
        field.set_valid(valid);
    }
    if let Some(value) = &setup.value {
        field.write_value(value);
    }

    let helper_text = setup.helper_text.as_deref().map(|content| {
        let helper = Rc::new(HelperText::new(document, content));
        helper.set_persistent(true);
        helper
    });
    field.set_helper_text(helper_text.as_ref());

    let icons: Vec<Rc<TextFieldIcon>> = setup
        .icons
        .iter()
        .map(|icon| {
            let built = TextFieldIcon::new(document, &icon.name);
            built.set_leading(icon.leading);
            built.set_trailing(icon.trailing);
            field.add_icon(Rc::clone(&built));
            built
        })
        .collect();

    Ok(Companions {
        _helper_text: helper_text,
        _icons: icons,
    })
}
