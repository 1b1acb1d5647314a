//! Contact form: validation, a pluggable submitter and the sending/success/reset cycle.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, FormData, HtmlButtonElement, HtmlElement, HtmlFormElement};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::{SiteError, SubmissionError};
use crate::scheduler::{BrowserScheduler, Scheduler};

// `\s` in browsers also covers U+FEFF, which Unicode White_Space does not.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@\x{FEFF}]+@[^\s@\x{FEFF}]+\.[^\s@\x{FEFF}]+$").unwrap()
});

pub const MISSING_FIELDS: &str = "Please fill in all required fields.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const SUBMIT_FAILED: &str = "Something went wrong. Please try again later.";
pub const SENDING_LABEL: &str = "Sending...";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields,
    InvalidEmail,
}

impl ValidationError {
    pub fn message(self) -> &'static str {
        match self {
            ValidationError::MissingFields => MISSING_FIELDS,
            ValidationError::InvalidEmail => INVALID_EMAIL,
        }
    }
}

impl ContactFields {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [&self.first_name, &self.last_name, &self.email, &self.message];
        if required.iter().any(|value| value.is_empty()) {
            return Err(ValidationError::MissingFields);
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Sending,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
}

impl MessageKind {
    pub fn class_name(self) -> &'static str {
        match self {
            MessageKind::Error => "error",
            MessageKind::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission is still in flight or showing its success panel.
    Ignored,
    Rejected(ValidationError),
    Started,
}

pub type SubmitCallback = Box<dyn FnOnce(Result<(), SubmissionError>)>;

/// Delivers a validated form somewhere and reports back through `done`.
pub trait Submitter: 'static {
    fn submit(&self, fields: &ContactFields, done: SubmitCallback);
}

/// Stand-in backend that accepts everything after a fixed delay.
pub struct SimulatedSubmitter<S: Scheduler> {
    scheduler: S,
    delay_ms: u32,
    pending: RefCell<Option<S::Pending>>,
}

impl<S: Scheduler> SimulatedSubmitter<S> {
    pub fn new(scheduler: S, delay_ms: u32) -> Self {
        Self {
            scheduler,
            delay_ms,
            pending: RefCell::new(None),
        }
    }
}

impl<S: Scheduler> Submitter for SimulatedSubmitter<S> {
    fn submit(&self, _fields: &ContactFields, done: SubmitCallback) {
        let reply = self.scheduler.after(self.delay_ms, Box::new(move || done(Ok(()))));
        *self.pending.borrow_mut() = Some(reply);
    }
}

/// The page elements the form controller drives.
pub trait FormView: 'static {
    type Message: 'static;

    fn read_fields(&self) -> ContactFields;
    /// Disables the submit button and relabels it, returning the previous label.
    fn begin_sending(&self, label: &str) -> Option<String>;
    fn restore_button(&self, label: Option<&str>);
    fn show_success(&self);
    /// Clears the fields, shows the form again and hides the success panel.
    fn reset(&self);
    /// Replaces any visible message with `text`.
    fn show_message(&self, text: &str, kind: MessageKind) -> Option<Self::Message>;
    fn remove_message(&self, message: &Self::Message);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTiming {
    pub reset_delay_ms: u32,
    pub message_lifetime_ms: u32,
}

impl From<&SiteConfig> for FormTiming {
    fn from(config: &SiteConfig) -> Self {
        Self {
            reset_delay_ms: config.form_reset_delay_ms,
            message_lifetime_ms: config.form_message_lifetime_ms,
        }
    }
}

struct FormState<V: FormView, S: Scheduler, B: Submitter> {
    view: V,
    scheduler: S,
    submitter: B,
    timing: FormTiming,
    phase: Cell<FormPhase>,
    original_label: RefCell<Option<String>>,
    reset_timer: RefCell<Option<S::Pending>>,
    message_timer: RefCell<Option<S::Pending>>,
}

pub struct ContactForm<V: FormView, S: Scheduler, B: Submitter> {
    state: Rc<FormState<V, S, B>>,
}

impl<V: FormView, S: Scheduler, B: Submitter> Clone for ContactForm<V, S, B> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<V: FormView, S: Scheduler, B: Submitter> ContactForm<V, S, B> {
    pub fn new(view: V, scheduler: S, submitter: B, timing: FormTiming) -> Self {
        Self {
            state: Rc::new(FormState {
                view,
                scheduler,
                submitter,
                timing,
                phase: Cell::new(FormPhase::Idle),
                original_label: RefCell::new(None),
                reset_timer: RefCell::new(None),
                message_timer: RefCell::new(None),
            }),
        }
    }

    fn upgrade(state: &Weak<FormState<V, S, B>>) -> Option<Self> {
        state.upgrade().map(|state| Self { state })
    }

    pub fn phase(&self) -> FormPhase {
        self.state.phase.get()
    }

    pub fn view(&self) -> &V {
        &self.state.view
    }

    pub fn submit(&self) -> SubmitOutcome {
        if self.phase() != FormPhase::Idle {
            debug!("Form busy ({:?}), ignoring submit", self.phase());
            return SubmitOutcome::Ignored;
        }

        let fields = self.state.view.read_fields();
        if let Err(problem) = fields.validate() {
            self.flash(problem.message(), MessageKind::Error);
            return SubmitOutcome::Rejected(problem);
        }

        self.state.phase.set(FormPhase::Sending);
        let label = self.state.view.begin_sending(SENDING_LABEL);
        *self.state.original_label.borrow_mut() = label;

        let weak = Rc::downgrade(&self.state);
        let captured = fields.clone();
        self.state.submitter.submit(
            &fields,
            Box::new(move |result| {
                if let Some(form) = Self::upgrade(&weak) {
                    form.finish(captured, result);
                }
            }),
        );
        SubmitOutcome::Started
    }

    fn finish(&self, fields: ContactFields, result: Result<(), SubmissionError>) {
        match result {
            Ok(()) => {
                self.state.phase.set(FormPhase::Success);
                self.state.view.show_success();
                match serde_json::to_string(&fields) {
                    Ok(json) => info!("Form submitted with data: {}", json),
                    Err(err) => warn!("Form submitted, could not serialize fields: {}", err),
                }

                let weak = Rc::downgrade(&self.state);
                let timer = self.state.scheduler.after(
                    self.state.timing.reset_delay_ms,
                    Box::new(move || {
                        if let Some(form) = Self::upgrade(&weak) {
                            form.reset();
                        }
                    }),
                );
                *self.state.reset_timer.borrow_mut() = Some(timer);
            }
            Err(err) => {
                error!("Contact form submission failed: {}", err);
                self.restore_button();
                self.state.phase.set(FormPhase::Idle);
                self.flash(SUBMIT_FAILED, MessageKind::Error);
            }
        }
    }

    fn restore_button(&self) {
        let label = self.state.original_label.borrow_mut().take();
        self.state.view.restore_button(label.as_deref());
    }

    fn reset(&self) {
        self.state.view.reset();
        self.restore_button();
        self.state.phase.set(FormPhase::Idle);
        debug!("Contact form reset");
    }

    /// Shows a message that removes itself after the configured lifetime.
    pub fn flash(&self, text: &str, kind: MessageKind) {
        let Some(message) = self.state.view.show_message(text, kind) else {
            return;
        };

        let weak = Rc::downgrade(&self.state);
        let timer = self.state.scheduler.after(
            self.state.timing.message_lifetime_ms,
            Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    state.view.remove_message(&message);
                }
            }),
        );
        // A newer message already replaced the old one, so its timer can go.
        *self.state.message_timer.borrow_mut() = Some(timer);
    }
}

/// `#contactForm` and its success panel.
pub struct DomFormView {
    document: Document,
    form: HtmlFormElement,
    success: Option<HtmlElement>,
    button: Option<HtmlButtonElement>,
}

impl DomFormView {
    pub fn new(document: &Document, form: HtmlFormElement) -> Result<Self, SiteError> {
        let success = document
            .get_element_by_id("formSuccess")
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        let button = form
            .query_selector("button[type=\"submit\"]")?
            .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok());

        Ok(Self {
            document: document.clone(),
            form,
            success,
            button,
        })
    }

    fn set_display(element: &HtmlElement, display: &str) {
        if let Err(err) = element.style().set_property("display", display) {
            warn!("Could not set display: {:?}", err);
        }
    }
}

impl FormView for DomFormView {
    type Message = Element;

    fn read_fields(&self) -> ContactFields {
        let data = match FormData::new_with_form(&self.form) {
            Ok(data) => data,
            Err(err) => {
                warn!("Could not read contact form: {:?}", err);
                return ContactFields::default();
            }
        };
        let field = |name: &str| data.get(name).as_string().unwrap_or_default();

        ContactFields {
            first_name: field("firstName"),
            last_name: field("lastName"),
            email: field("email"),
            message: field("message"),
        }
    }

    fn begin_sending(&self, label: &str) -> Option<String> {
        let button = self.button.as_ref()?;
        let original = button.text_content();
        button.set_text_content(Some(label));
        button.set_disabled(true);
        original
    }

    fn restore_button(&self, label: Option<&str>) {
        if let Some(button) = &self.button {
            if label.is_some() {
                button.set_text_content(label);
            }
            button.set_disabled(false);
        }
    }

    fn show_success(&self) {
        Self::set_display(&self.form, "none");
        if let Some(success) = &self.success {
            Self::set_display(success, "block");
        }
    }

    fn reset(&self) {
        self.form.reset();
        Self::set_display(&self.form, "block");
        if let Some(success) = &self.success {
            Self::set_display(success, "none");
        }
    }

    fn show_message(&self, text: &str, kind: MessageKind) -> Option<Element> {
        if let Ok(existing) = dom::query_all(&self.document, ".form-message") {
            for message in existing {
                message.remove();
            }
        }

        let build = || -> Result<Element, SiteError> {
            let message = self.document.create_element("div")?;
            message.set_class_name(&format!("form-message {}", kind.class_name()));
            let paragraph = self.document.create_element("p")?;
            paragraph.set_text_content(Some(text));
            message.append_child(&paragraph)?;
            self.form.insert_adjacent_element("afterend", &message)?;
            Ok(message)
        };

        match build() {
            Ok(message) => Some(message),
            Err(err) => {
                warn!("Could not show form message: {}", err);
                None
            }
        }
    }

    fn remove_message(&self, message: &Element) {
        message.remove();
    }
}

pub fn install(document: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let Some(form) = document
        .get_element_by_id("contactForm")
        .and_then(|element| element.dyn_into::<HtmlFormElement>().ok())
    else {
        debug!("No contact form on this page");
        return Ok(());
    };

    let view = DomFormView::new(document, form.clone())?;
    let submitter = SimulatedSubmitter::new(BrowserScheduler, config.form_submit_delay_ms);
    let controller = ContactForm::new(view, BrowserScheduler, submitter, FormTiming::from(config));

    dom::listen(&form, "submit", move |event| {
        event.prevent_default();
        controller.submit();
    })?;

    debug!("Contact form installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::manual::ManualScheduler;

    #[derive(Debug, Default)]
    struct Page {
        fields: ContactFields,
        form_visible: bool,
        success_visible: bool,
        button_label: String,
        button_disabled: bool,
        next_message: u32,
        messages: Vec<(u32, String)>,
    }

    #[derive(Clone)]
    struct FakeView(Rc<RefCell<Page>>);

    impl FakeView {
        fn new() -> Self {
            FakeView(Rc::new(RefCell::new(Page {
                form_visible: true,
                button_label: "Send Message".to_string(),
                ..Page::default()
            })))
        }

        fn fill(&self, first: &str, last: &str, email: &str, message: &str) {
            self.0.borrow_mut().fields = ContactFields {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
                message: message.to_string(),
            };
        }

        fn messages(&self) -> Vec<String> {
            self.0.borrow().messages.iter().map(|(_, text)| text.clone()).collect()
        }
    }

    impl FormView for FakeView {
        type Message = u32;

        fn read_fields(&self) -> ContactFields {
            self.0.borrow().fields.clone()
        }

        fn begin_sending(&self, label: &str) -> Option<String> {
            let mut page = self.0.borrow_mut();
            page.button_disabled = true;
            Some(std::mem::replace(&mut page.button_label, label.to_string()))
        }

        fn restore_button(&self, label: Option<&str>) {
            let mut page = self.0.borrow_mut();
            if let Some(label) = label {
                page.button_label = label.to_string();
            }
            page.button_disabled = false;
        }

        fn show_success(&self) {
            let mut page = self.0.borrow_mut();
            page.form_visible = false;
            page.success_visible = true;
        }

        fn reset(&self) {
            let mut page = self.0.borrow_mut();
            page.fields = ContactFields::default();
            page.form_visible = true;
            page.success_visible = false;
        }

        fn show_message(&self, text: &str, _kind: MessageKind) -> Option<u32> {
            let mut page = self.0.borrow_mut();
            page.messages.clear();
            let id = page.next_message;
            page.next_message += 1;
            page.messages.push((id, text.to_string()));
            Some(id)
        }

        fn remove_message(&self, message: &u32) {
            self.0.borrow_mut().messages.retain(|(id, _)| id != message);
        }
    }

    struct FailingSubmitter;

    impl Submitter for FailingSubmitter {
        fn submit(&self, _fields: &ContactFields, done: SubmitCallback) {
            done(Err(SubmissionError::Transport("offline".to_string())));
        }
    }

    fn timing() -> FormTiming {
        FormTiming::from(&SiteConfig::default())
    }

    fn simulated_form(
        scheduler: &ManualScheduler,
    ) -> (FakeView, ContactForm<FakeView, ManualScheduler, SimulatedSubmitter<ManualScheduler>>) {
        let view = FakeView::new();
        let submitter = SimulatedSubmitter::new(scheduler.clone(), 2000);
        let form = ContactForm::new(view.clone(), scheduler.clone(), submitter, timing());
        (view, form)
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("jane.doe@mail.example.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
    }

    #[test]
    fn byte_order_mark_counts_as_whitespace() {
        assert!(!is_valid_email("a\u{FEFF}b@c.co"));
        assert!(!is_valid_email("a@b\u{FEFF}c.co"));
        assert!(!is_valid_email("a@b.c\u{FEFF}o"));
        assert!(!is_valid_email("a\u{00A0}b@c.co"));
    }

    #[test]
    fn required_fields_are_checked_before_email() {
        let fields = ContactFields {
            first_name: "Ada".to_string(),
            last_name: String::new(),
            email: "not-an-email".to_string(),
            message: "Hi".to_string(),
        };
        assert_eq!(fields.validate(), Err(ValidationError::MissingFields));
    }

    #[test]
    fn full_round_trip() {
        let scheduler = ManualScheduler::default();
        let (view, form) = simulated_form(&scheduler);
        view.fill("Ada", "Lovelace", "ada@example.com", "Hello");

        assert_eq!(form.submit(), SubmitOutcome::Started);
        assert_eq!(form.phase(), FormPhase::Sending);
        {
            let page = view.0.borrow();
            assert!(page.button_disabled);
            assert_eq!(page.button_label, SENDING_LABEL);
            assert!(page.form_visible);
        }

        scheduler.advance_to(1999);
        assert_eq!(form.phase(), FormPhase::Sending);

        scheduler.advance_to(2000);
        assert_eq!(form.phase(), FormPhase::Success);
        {
            let page = view.0.borrow();
            assert!(!page.form_visible);
            assert!(page.success_visible);
        }

        scheduler.advance_to(6999);
        assert_eq!(form.phase(), FormPhase::Success);

        scheduler.advance_to(7000);
        assert_eq!(form.phase(), FormPhase::Idle);
        let page = view.0.borrow();
        assert!(page.form_visible);
        assert!(!page.success_visible);
        assert_eq!(page.fields, ContactFields::default());
        assert_eq!(page.button_label, "Send Message");
        assert!(!page.button_disabled);
    }

    #[test]
    fn invalid_input_stays_idle_with_a_message() {
        let scheduler = ManualScheduler::default();
        let (view, form) = simulated_form(&scheduler);

        assert_eq!(form.submit(), SubmitOutcome::Rejected(ValidationError::MissingFields));
        assert_eq!(form.phase(), FormPhase::Idle);
        assert_eq!(view.messages(), vec![MISSING_FIELDS.to_string()]);

        view.fill("Ada", "Lovelace", "a@b", "Hello");
        assert_eq!(form.submit(), SubmitOutcome::Rejected(ValidationError::InvalidEmail));
        assert_eq!(view.messages(), vec![INVALID_EMAIL.to_string()]);
        assert!(!view.0.borrow().button_disabled);
    }

    #[test]
    fn messages_expire_after_five_seconds() {
        let scheduler = ManualScheduler::default();
        let (view, form) = simulated_form(&scheduler);

        form.submit();
        scheduler.advance_to(4999);
        assert_eq!(view.messages().len(), 1);
        scheduler.advance_to(5000);
        assert!(view.messages().is_empty());
    }

    #[test]
    fn newer_message_replaces_older() {
        let scheduler = ManualScheduler::default();
        let (view, form) = simulated_form(&scheduler);

        form.submit();
        scheduler.advance_to(3000);
        view.fill("Ada", "Lovelace", "nope", "Hello");
        form.submit();
        assert_eq!(view.messages(), vec![INVALID_EMAIL.to_string()]);

        // The first message's removal time passes with the second still up.
        scheduler.advance_to(5000);
        assert_eq!(view.messages(), vec![INVALID_EMAIL.to_string()]);
        scheduler.advance_to(8000);
        assert!(view.messages().is_empty());
    }

    #[test]
    fn submits_while_busy_are_ignored() {
        let scheduler = ManualScheduler::default();
        let (view, form) = simulated_form(&scheduler);
        view.fill("Ada", "Lovelace", "ada@example.com", "Hello");

        form.submit();
        assert_eq!(form.submit(), SubmitOutcome::Ignored);
        scheduler.advance_to(2000);
        assert_eq!(form.submit(), SubmitOutcome::Ignored);
        scheduler.advance_to(7000);
        assert_eq!(form.phase(), FormPhase::Idle);
    }

    #[test]
    fn failed_submission_restores_the_form() {
        let scheduler = ManualScheduler::default();
        let view = FakeView::new();
        let form = ContactForm::new(view.clone(), scheduler.clone(), FailingSubmitter, timing());
        view.fill("Ada", "Lovelace", "ada@example.com", "Hello");

        assert_eq!(form.submit(), SubmitOutcome::Started);
        assert_eq!(form.phase(), FormPhase::Idle);
        let page = view.0.borrow();
        assert!(!page.button_disabled);
        assert_eq!(page.button_label, "Send Message");
        assert!(page.form_visible);
        assert_eq!(page.messages.len(), 1);
        assert_eq!(page.messages[0].1, SUBMIT_FAILED);
    }

    #[test]
    fn fields_serialize_with_form_names() {
        let fields = ContactFields {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hi".to_string(),
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
    }
}
