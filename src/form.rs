//! The three-title input form.
//!
//! The form never talks to the network. `submit` and `trigger_surprise` hand a
//! `FormAction` back to the caller, which decides what to do with it.

use crate::movie::TitleTriple;

pub const FIELD_COUNT: usize = 3;
pub const FIELD_LABELS: [&str; FIELD_COUNT] =
    ["Movie/Series 1:", "Movie/Series 2:", "Movie/Series 3:"];
pub const FIELD_PLACEHOLDERS: [&str; FIELD_COUNT] =
    ["e.g., Inception", "e.g., Breaking Bad", "e.g., Stranger Things"];
pub const VALIDATION_MESSAGE: &str = "Please enter three movie titles.";

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(usize),
    RecommendButton,
    SurpriseButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Recommend(TitleTriple),
    Surprise,
}

#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub value: String,
    /// Cursor position in chars, not bytes.
    pub cursor: usize,
    /// Set when a submit found this field empty; cleared on the next edit.
    pub invalid: bool,
}

impl InputField {
    fn edited(&mut self) {
        self.invalid = false;
    }
}

#[derive(Debug, Clone)]
pub struct InputForm {
    fields: [InputField; FIELD_COUNT],
    pub focus: FormFocus,
    validation_message: Option<&'static str>,
}

impl Default for InputForm {
    fn default() -> Self {
        Self::new()
    }
}

impl InputForm {
    pub fn new() -> Self {
        Self {
            fields: Default::default(),
            focus: FormFocus::Field(0),
            validation_message: None,
        }
    }

    pub fn fields(&self) -> &[InputField; FIELD_COUNT] {
        &self.fields
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.value.as_str())
    }

    pub fn validation_message(&self) -> Option<&'static str> {
        self.validation_message
    }

    /// Replace the content of one field. Out-of-range indices are ignored.
    pub fn set_field(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
            field.cursor = field.value.chars().count();
            field.edited();
        }
    }

    /// Validate and produce the recommend action.
    ///
    /// On rejection every empty field is flagged and the validation message is
    /// set; the caller gets `None`. Field contents are never cleared.
    pub fn submit(&mut self) -> Option<FormAction> {
        let values = [
            self.fields[0].value.clone(),
            self.fields[1].value.clone(),
            self.fields[2].value.clone(),
        ];
        match TitleTriple::new(values) {
            Ok(titles) => {
                self.validation_message = None;
                Some(FormAction::Recommend(titles))
            }
            Err(err) => {
                for (field, missing) in self.fields.iter_mut().zip(err.missing) {
                    field.invalid = missing;
                }
                self.validation_message = Some(VALIDATION_MESSAGE);
                tracing::debug!(missing = ?err.missing, "Rejected incomplete form");
                None
            }
        }
    }

    pub fn trigger_surprise(&self) -> FormAction {
        FormAction::Surprise
    }

    /// What Enter does on the current focus.
    pub fn activate(&mut self) -> Option<FormAction> {
        match self.focus {
            FormFocus::Field(_) | FormFocus::RecommendButton => self.submit(),
            FormFocus::SurpriseButton => Some(self.trigger_surprise()),
        }
    }

    // Focus ring: fields, then the two buttons

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormFocus::Field(i) if i + 1 < FIELD_COUNT => FormFocus::Field(i + 1),
            FormFocus::Field(_) => FormFocus::RecommendButton,
            FormFocus::RecommendButton => FormFocus::SurpriseButton,
            FormFocus::SurpriseButton => FormFocus::Field(0),
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormFocus::Field(0) => FormFocus::SurpriseButton,
            FormFocus::Field(i) => FormFocus::Field(i - 1),
            FormFocus::RecommendButton => FormFocus::Field(FIELD_COUNT - 1),
            FormFocus::SurpriseButton => FormFocus::RecommendButton,
        };
    }

    fn focused_field(&mut self) -> Option<&mut InputField> {
        match self.focus {
            FormFocus::Field(i) => self.fields.get_mut(i),
            _ => None,
        }
    }

    // Editing of the focused field

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.focused_field() {
            let byte_pos = char_to_byte_index(&field.value, field.cursor);
            field.value.insert(byte_pos, c);
            field.cursor += 1;
            field.edited();
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_field() {
            if field.cursor > 0 {
                field.cursor -= 1;
                let byte_pos = char_to_byte_index(&field.value, field.cursor);
                field.value.remove(byte_pos);
                field.edited();
            }
        }
    }

    pub fn delete(&mut self) {
        if let Some(field) = self.focused_field() {
            let char_count = field.value.chars().count();
            if field.cursor < char_count {
                let byte_pos = char_to_byte_index(&field.value, field.cursor);
                field.value.remove(byte_pos);
                field.edited();
            }
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(field) = self.focused_field() {
            field.cursor = field.cursor.saturating_sub(1);
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(field) = self.focused_field() {
            let char_count = field.value.chars().count();
            field.cursor = (field.cursor + 1).min(char_count);
        }
    }

    pub fn cursor_home(&mut self) {
        if let Some(field) = self.focused_field() {
            field.cursor = 0;
        }
    }

    pub fn cursor_end(&mut self) {
        if let Some(field) = self.focused_field() {
            field.cursor = field.value.chars().count();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(a: &str, b: &str, c: &str) -> InputForm {
        let mut form = InputForm::new();
        form.set_field(0, a);
        form.set_field(1, b);
        form.set_field(2, c);
        form
    }

    #[test]
    fn test_submit_rejects_every_incomplete_combination() {
        // Bit i set means field i is filled; 0b111 is the only complete case.
        for mask in 0u8..7 {
            let pick = |i: u8| if mask & (1 << i) != 0 { "Movie" } else { "" };
            let mut form = filled(pick(0), pick(1), pick(2));

            assert_eq!(form.submit(), None, "mask {:03b} should be rejected", mask);
            assert_eq!(form.validation_message(), Some(VALIDATION_MESSAGE));
            for i in 0..3u8 {
                assert_eq!(form.fields()[i as usize].invalid, mask & (1 << i) == 0);
            }
        }
    }

    #[test]
    fn test_submit_yields_titles_in_field_order() {
        let mut form = filled("Movie A", "Movie B", "Movie C");
        let action = form.submit().expect("complete form should submit");

        match action {
            FormAction::Recommend(titles) => {
                assert_eq!(titles.as_slice(), ["Movie A", "Movie B", "Movie C"]);
            }
            other => panic!("unexpected action {:?}", other),
        }
        // Fields are kept after submitting
        assert_eq!(form.value(0), Some("Movie A"));
        assert_eq!(form.validation_message(), None);
    }

    #[test]
    fn test_whitespace_only_field_is_empty() {
        let mut form = filled("Alien", "   ", "Aliens");
        assert_eq!(form.submit(), None);
        assert!(form.fields()[1].invalid);
    }

    #[test]
    fn test_surprise_ignores_fields() {
        assert_eq!(InputForm::new().trigger_surprise(), FormAction::Surprise);
        assert_eq!(filled("a", "", "c").trigger_surprise(), FormAction::Surprise);

        let mut form = filled("a", "b", "c");
        form.focus = FormFocus::SurpriseButton;
        assert_eq!(form.activate(), Some(FormAction::Surprise));
    }

    #[test]
    fn test_editing_clears_invalid_mark_and_successful_submit_clears_message() {
        let mut form = filled("a", "", "c");
        form.submit();
        assert!(form.fields()[1].invalid);

        form.focus = FormFocus::Field(1);
        form.insert_char('b');
        assert!(!form.fields()[1].invalid);
        assert_eq!(form.validation_message(), Some(VALIDATION_MESSAGE));

        assert!(form.submit().is_some());
        assert_eq!(form.validation_message(), None);
    }

    #[test]
    fn test_focus_ring_wraps_both_ways() {
        let mut form = InputForm::new();
        for _ in 0..5 {
            form.focus_next();
        }
        assert_eq!(form.focus, FormFocus::Field(0));

        form.focus_prev();
        assert_eq!(form.focus, FormFocus::SurpriseButton);
        form.focus_prev();
        assert_eq!(form.focus, FormFocus::RecommendButton);
        form.focus_prev();
        assert_eq!(form.focus, FormFocus::Field(2));
    }

    #[test]
    fn test_utf8_editing() {
        let mut form = InputForm::new();
        for c in "Amélie".chars() {
            form.insert_char(c);
        }
        form.cursor_left();
        form.cursor_left();
        form.cursor_left();
        form.backspace();
        assert_eq!(form.value(0), Some("Amlie"));

        form.cursor_home();
        form.delete();
        assert_eq!(form.value(0), Some("mlie"));

        form.cursor_end();
        form.insert_char('!');
        assert_eq!(form.value(0), Some("mlie!"));
    }

    #[test]
    fn test_editing_ignored_on_buttons() {
        let mut form = filled("a", "b", "c");
        form.focus = FormFocus::RecommendButton;
        form.insert_char('x');
        form.backspace();
        assert_eq!(form.value(0), Some("a"));
        assert_eq!(form.value(2), Some("c"));
    }

    #[test]
    fn test_set_field_out_of_range_is_ignored() {
        let mut form = InputForm::new();
        form.set_field(3, "nope");
        assert_eq!(form.value(3), None);
    }
}
