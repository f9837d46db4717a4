/// What kind of editing surface an input event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Input,
    TextArea,
    /// Structured rich-text region; no linear caret offset
    ContentEditable,
}

impl FieldKind {
    /// Only surfaces exposing plain text plus an integer caret are expanded
    pub fn is_linear(self) -> bool {
        matches!(self, FieldKind::Input | FieldKind::TextArea)
    }
}

/// Notifications a field emits so bound UI models pick up programmatic edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// Content changed
    Input,
    /// Content committed
    Change,
}

/// An editable text surface the expander can read and rewrite.
pub trait Field {
    fn kind(&self) -> FieldKind;

    fn value(&self) -> String;

    /// Caret position in chars
    fn caret(&self) -> usize;

    fn set_value(&mut self, value: String);

    fn set_caret(&mut self, offset: usize);

    fn dispatch(&mut self, event: FieldEvent);

    /// Emit the change and commit signals, in that order
    fn notify_changed(&mut self) {
        self.dispatch(FieldEvent::Input);
        self.dispatch(FieldEvent::Change);
    }
}

/// An in-memory text field.
///
/// Writing the value moves the caret to the end, as many native inputs do,
/// and every dispatched event is recorded.
#[derive(Debug, Clone)]
pub struct TextField {
    kind: FieldKind,
    value: String,
    caret: usize,
    events: Vec<FieldEvent>,
}

impl TextField {
    pub fn new(value: impl Into<String>, caret: usize) -> Self {
        Self::with_kind(FieldKind::Input, value, caret)
    }

    /// A field with the caret after the last char
    pub fn at_end(value: impl Into<String>) -> Self {
        let value = value.into();
        let caret = value.chars().count();
        Self::new(value, caret)
    }

    pub fn with_kind(kind: FieldKind, value: impl Into<String>, caret: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            caret,
            events: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.value
    }

    pub fn events(&self) -> &[FieldEvent] {
        &self.events
    }
}

impl Field for TextField {
    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn set_value(&mut self, value: String) {
        self.caret = value.chars().count();
        self.value = value;
    }

    fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.value.chars().count());
    }

    fn dispatch(&mut self, event: FieldEvent) {
        self.events.push(event);
    }
}
