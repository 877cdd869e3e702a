use std::rc::Rc;

/// Shared listener. Registration and removal are keyed on the `Rc` identity,
/// the same way DOM listeners are keyed on the function object.
pub type EventHandler = Rc<dyn Fn(&Event)>;

pub fn handler(f: impl Fn(&Event) + 'static) -> EventHandler {
    Rc::new(f)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    event_type: String,
    bubbles: bool,
    client_x: Option<f64>,
    key: Option<String>,
}

impl Event {
    pub fn new(event_type: impl Into<String>) -> Self {
        let event_type = event_type.into();
        let bubbles = !matches!(event_type.as_str(), "focus" | "blur" | "transitionend");
        Self {
            event_type,
            bubbles,
            client_x: None,
            key: None,
        }
    }

    pub fn pointer(event_type: impl Into<String>, client_x: f64) -> Self {
        Self {
            client_x: Some(client_x),
            ..Self::new(event_type)
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new("keydown")
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn client_x(&self) -> Option<f64> {
        self.client_x
    }

    pub fn key_name(&self) -> Option<&str> {
        self.key.as_deref()
    }
}
